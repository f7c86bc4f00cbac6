use thiserror::Error;

pub type Result<T> = std::result::Result<T, PwdHashError>;

#[derive(Debug, Error)]
pub enum PwdHashError {
    #[error("Malformed PHC string: {0}")]
    MalformedInput(String),

    #[error("Malformed PHC string: missing 'v=' version segment")]
    MissingVersion,

    #[error("Malformed PHC string: invalid version '{0}'")]
    InvalidVersion(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Invalid base64 encoding: {0}")]
    InvalidEncoding(String),

    #[error("Unsupported version {found} (expected {expected})")]
    UnsupportedVersion { expected: u32, found: u32 },

    #[error("Unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Unknown password policy: {0}")]
    UnknownPolicy(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Secure random source failed: {0}")]
    Random(String),

    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PwdHashError {
    /// True for errors raised because the encoded string could not be parsed,
    /// as opposed to a well-formed record this crate cannot check.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput(_)
                | Self::MissingVersion
                | Self::InvalidVersion(_)
                | Self::InvalidParam(_)
                | Self::InvalidEncoding(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_classification() {
        assert!(PwdHashError::MissingVersion.is_malformed());
        assert!(PwdHashError::InvalidEncoding("salt".into()).is_malformed());
        assert!(!PwdHashError::UnknownAlgorithm("bcrypt".into()).is_malformed());
        assert!(!PwdHashError::UnsupportedVersion { expected: 19, found: 16 }.is_malformed());
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = PwdHashError::UnknownPolicy("paranoid".into());
        assert_eq!(err.to_string(), "Unknown password policy: paranoid");

        let err = PwdHashError::UnsupportedVersion { expected: 19, found: 16 };
        assert_eq!(err.to_string(), "Unsupported version 16 (expected 19)");
    }
}
