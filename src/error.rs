use std::fmt;

pub type Math3dResult<T> = Result<T, Math3dError>;

#[derive(Debug, PartialEq, Eq)]
pub enum Math3dError {
    ZeroLengthVector,
    UnknownScene(String),
    InvalidPrecision(String),
    InvalidFrameCount(String),
    MissingValue(String),
}
impl fmt::Display for Math3dError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Math3dError::ZeroLengthVector => {
                write!(f, "Cannot normalize a zero-length vector")
            }
            Math3dError::UnknownScene(name) => {
                write!(f, "
                    \rUnknown scene '{name}'
                    \rExpected one of: direction, rotate, slerp, all",
                )
            }
            Math3dError::InvalidPrecision(arg) => {
                write!(f, "Invalid precision '{arg}', expected a number of decimals")
            }
            Math3dError::InvalidFrameCount(arg) => {
                write!(f, "Invalid frame count '{arg}'")
            }
            Math3dError::MissingValue(flag) => {
                write!(f, "Missing value after '{flag}'")
            }
        }
    }
}
impl std::error::Error for Math3dError {}
