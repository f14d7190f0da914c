//! Error types for the web storage cache

use std::fmt;

#[derive(Debug)]
pub enum CacheError {
    /// Stored text could not be parsed, or a value could not be serialized
    Json(String),
    /// The blob stored under a top-level key is valid JSON but not an object
    MalformedBlob { key: String },
    Io(Box<std::io::Error>),
    /// Writing would exceed the backend's byte quota
    QuotaExceeded { key: String, quota: usize },
    /// The backend cannot be used at all
    Unavailable(String),
    Config(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Json(msg) => write!(f, "JSON error: {}", msg),
            CacheError::MalformedBlob { key } => {
                write!(f, "Cache blob at '{}' is not a JSON object", key)
            }
            CacheError::Io(err) => write!(f, "IO error: {}", err),
            CacheError::QuotaExceeded { key, quota } => {
                write!(f, "Storage quota of {} bytes exceeded writing '{}'", quota, key)
            }
            CacheError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            CacheError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Json(err.to_string())
    }
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Io(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_blob_display() {
        let err = CacheError::MalformedBlob {
            key: "MyAppGlobalCacheKey".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Cache blob at 'MyAppGlobalCacheKey' is not a JSON object"
        );
    }

    #[test]
    fn test_quota_exceeded_display() {
        let err = CacheError::QuotaExceeded {
            key: "G".to_string(),
            quota: 16,
        };
        assert_eq!(
            format!("{}", err),
            "Storage quota of 16 bytes exceeded writing 'G'"
        );
    }

    #[test]
    fn test_json_error_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CacheError = parse_err.into();
        assert!(matches!(err, CacheError::Json(_)));
        assert!(format!("{}", err).starts_with("JSON error: "));
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error;

        let err: CacheError = std::io::Error::new(std::io::ErrorKind::Other, "disk gone").into();
        assert!(err.source().is_some());
        assert_eq!(format!("{}", err), "IO error: disk gone");
    }
}
