//! Error types for Cartograph operations.
//!
//! [`CartographError`] wraps the model errors raised while building a
//! workspace together with configuration errors raised while applying an
//! [`AppConfig`](crate::config::AppConfig).

use thiserror::Error;

use cartograph_core::error::ModelError;

/// The main error type for Cartograph operations.
#[derive(Debug, Error)]
pub enum CartographError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Config error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_converts() {
        let err: CartographError = ModelError::NotFound {
            name: "db".to_string(),
        }
        .into();

        assert_eq!(err.to_string(), "Model error: no element named `db`");
    }
}
