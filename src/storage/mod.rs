//! Blob storage for model artifacts, addressed by `(bucket, key)`.
//!
//! Keys are `/`-separated relative paths. Stores never overwrite: a second
//! `put` to an existing key fails with [`StorageError::AlreadyExists`].

use thiserror::Error;

pub mod fs;
pub mod memory;

pub use self::fs::FsBlobStore;
pub use self::memory::MemoryBlobStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object {bucket}/{key} not found")]
    NotFound { bucket: String, key: String },
    #[error("object {bucket}/{key} already exists")]
    AlreadyExists { bucket: String, key: String },
    #[error("invalid key '{0}'")]
    InvalidKey(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub trait BlobStore: Send + Sync {
    /// Store `bytes` under a new key.
    fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Keys in `bucket` starting with `prefix`, sorted.
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError>;

    fn exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError>;
}

/// Reject empty keys, absolute paths and `..`/`.` segments.
pub(crate) fn check_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_key() {
        assert!(check_key("models/price_abc.bin").is_ok());
        assert!(check_key("").is_err());
        assert!(check_key("/etc/passwd").is_err());
        assert!(check_key("models/../secret").is_err());
        assert!(check_key("models//x").is_err());
    }
}
