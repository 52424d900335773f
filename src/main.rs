use std::env;
use std::process;

use math3d::config::Config;

fn main() {
    env_logger::init();

    let config = match Config::new(env::args().skip(1).collect()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };
    log::info!("{config}");

    for frame in math3d::run(&config) {
        println!("{frame}\n");
    }
}
