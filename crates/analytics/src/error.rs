use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("non-finite value at index {index}: {value}")]
    NonFiniteValue { index: usize, value: f64 },

    #[error("length mismatch between parallel sequences: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
