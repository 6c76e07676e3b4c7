use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// A tolerance is negative or not a finite number.
    InvalidTolerance { name: &'static str, value: f64 },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTolerance { name, value } => {
                write!(f, "invalid tolerance: {name} must be a finite number >= 0, got {value}")
            }
        }
    }
}

impl std::error::Error for ReconError {}
