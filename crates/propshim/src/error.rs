//! Error types for property patching

use thiserror::Error;

/// Main error type for propshim operations.
///
/// The first two kinds are raised at patch time, before any mutation of the
/// target. The `Missing*` kinds are raised at access time, when a hook
/// invokes an original-access callable that the patched property never had.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// No descriptor for the key anywhere in the delegation chain
    #[error("property `{key}` does not exist")]
    NotFound {
        /// The property key that was looked up
        key: String,
    },

    /// A descriptor exists but refuses redefinition
    #[error("property `{key}` cannot be reconfigured")]
    NotConfigurable {
        /// The property key that was looked up
        key: String,
    },

    /// The original property has no read accessor
    #[error("original property `{key}` has no get accessor")]
    MissingGetter {
        /// The property key the accessor belongs to
        key: String,
    },

    /// The original property has no write accessor
    #[error("original property `{key}` has no set accessor")]
    MissingSetter {
        /// The property key the accessor belongs to
        key: String,
    },
}

impl PatchError {
    /// The property key this error refers to.
    pub fn key(&self) -> &str {
        match self {
            PatchError::NotFound { key }
            | PatchError::NotConfigurable { key }
            | PatchError::MissingGetter { key }
            | PatchError::MissingSetter { key } => key,
        }
    }
}

/// Result type alias for propshim operations
pub type Result<T> = std::result::Result<T, PatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_key() {
        let err = PatchError::NotFound {
            key: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "property `foo` does not exist");
        assert_eq!(err.key(), "foo");

        let err = PatchError::MissingSetter {
            key: "bar".to_string(),
        };
        assert_eq!(err.to_string(), "original property `bar` has no set accessor");
        assert_eq!(err.key(), "bar");
    }
}
