use super::{check_key, BlobStore, StorageError};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-process store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<BTreeMap<(String, String), Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StorageError {
    StorageError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        "memory store lock poisoned",
    ))
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        check_key(bucket)?;
        check_key(key)?;
        let mut objects = self.objects.write().map_err(|_| poisoned())?;
        let id = (bucket.to_string(), key.to_string());
        if objects.contains_key(&id) {
            return Err(StorageError::AlreadyExists {
                bucket: id.0,
                key: id.1,
            });
        }
        objects.insert(id, bytes.to_vec());
        Ok(())
    }

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let objects = self.objects.read().map_err(|_| poisoned())?;
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let objects = self.objects.read().map_err(|_| poisoned())?;
        Ok(objects
            .keys()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .map(|(_, k)| k.clone())
            .collect())
    }

    fn exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError> {
        let objects = self.objects.read().map_err(|_| poisoned())?;
        Ok(objects.contains_key(&(bucket.to_string(), key.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_overwrite_and_listing() {
        let store = MemoryBlobStore::new();
        store.put("b", "m/1.bin", b"a").unwrap();
        store.put("b", "m/2.bin", b"b").unwrap();
        store.put("c", "m/3.bin", b"c").unwrap();
        assert!(matches!(
            store.put("b", "m/1.bin", b"z"),
            Err(StorageError::AlreadyExists { .. })
        ));
        assert_eq!(store.list("b", "m/").unwrap(), vec!["m/1.bin", "m/2.bin"]);
        assert_eq!(store.get("b", "m/1.bin").unwrap(), b"a");
        assert!(!store.exists("b", "m/3.bin").unwrap());
    }
}
