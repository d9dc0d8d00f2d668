use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid signature '{signature}': {reason}")]
    InvalidSignature { signature: String, reason: String },

    #[error("Signature for {name} not found: {signature}")]
    NoMatch { name: String, signature: String },

    #[error("Failed to read region for module '{module}': {message}")]
    RegionUnreadable { module: String, message: String },

    #[error("Address for {name} is null (signature: {signature})")]
    NullAddress { name: String, signature: String },

    #[error("Failed to read memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Descriptor already registered: {0}")]
    DuplicateDescriptor(String),

    #[error("Descriptor not registered: {0}")]
    UnknownDescriptor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_signature(signature: &str, reason: impl Into<String>) -> Self {
        Error::InvalidSignature {
            signature: signature.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Whether this error describes an address that could not be produced,
    /// as opposed to a malformed input or an environment fault.
    pub fn is_missing_address(&self) -> bool {
        matches!(self, Error::NoMatch { .. } | Error::NullAddress { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.is_not_found());

        let other_io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err2 = Error::Io(other_io_err);
        assert!(!err2.is_not_found());
    }

    #[test]
    fn test_null_address_message_names_descriptor() {
        let err = Error::NullAddress {
            name: "TestStruct.Instance".to_string(),
            signature: "AA BB CC DD".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("TestStruct.Instance"));
        assert!(message.contains("AA BB CC DD"));
        assert!(err.is_missing_address());
    }

    #[test]
    fn test_region_fault_is_not_missing_address() {
        let err = Error::RegionUnreadable {
            module: "main".to_string(),
            message: "access denied".to_string(),
        };
        assert!(!err.is_missing_address());
    }
}
