#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TimeoutError {
    #[error("timeout needs a number")]
    MissingNumber,

    #[error("{0:?} isn't a number")]
    BadNumber(String),

    #[error("unknown unit {0:?}; use ms, s, m, or h")]
    BadUnit(String),

    #[error("{0:?} is too long a timeout")]
    TooLarge(String),
}
