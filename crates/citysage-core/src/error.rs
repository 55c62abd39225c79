use thiserror::Error;

/// Top-level error type for CitySage.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for CitySageError` so that `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CitySageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for CitySageError {
    fn from(err: toml::de::Error) -> Self {
        CitySageError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CitySageError {
    fn from(err: toml::ser::Error) -> Self {
        CitySageError::Config(err.to_string())
    }
}

/// A specialized `Result` type for CitySage operations.
pub type Result<T> = std::result::Result<T, CitySageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(CitySageError, &str)> = vec![
            (
                CitySageError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                CitySageError::Chat("assistant is busy".to_string()),
                "Chat error: assistant is busy",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: CitySageError = io_err.into();
        assert!(matches!(err, CitySageError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let err: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        assert!(err.is_err());
        let err: CitySageError = err.unwrap_err().into();
        assert!(matches!(err, CitySageError::Config(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(value.to_string())
        }

        assert_eq!(inner().unwrap(), "42");
    }
}
