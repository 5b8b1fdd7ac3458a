use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid filter '{spec}': expected COLUMN=VALUE")]
    InvalidFilter { spec: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
