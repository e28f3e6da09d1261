//! Unified error model for the core crate
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("STORAGE/{0}")]
    Storage(String),

    #[error("DIRECTORY/{0}")]
    Directory(String),

    #[error("TIMEOUT/last-updated lookup for {name} exceeded {timeout_ms}ms")]
    Timeout { name: String, timeout_ms: u64 },

    #[error("METADATA/{0}")]
    Metadata(String),
}

impl CoreError {
    /// Message without the family prefix, suitable for error-info bodies
    pub fn detail(&self) -> String {
        match self {
            Self::Storage(msg) | Self::Directory(msg) | Self::Metadata(msg) => msg.clone(),
            Self::Timeout { name, timeout_ms } => {
                format!("last-updated lookup for {} exceeded {}ms", name, timeout_ms)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_family_prefix() {
        let err = CoreError::Storage("connection refused".to_string());
        assert_eq!(err.to_string(), "STORAGE/connection refused");
        assert_eq!(err.detail(), "connection refused");
    }

    #[test]
    fn test_timeout_detail() {
        let err = CoreError::Timeout {
            name: "carers-allowance".to_string(),
            timeout_ms: 250,
        };
        assert!(err.to_string().starts_with("TIMEOUT/"));
        assert_eq!(err.detail(), "last-updated lookup for carers-allowance exceeded 250ms");
    }
}
