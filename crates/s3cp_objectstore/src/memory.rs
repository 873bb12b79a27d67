//! An in-process [`ObjectStore`] that keeps objects in a map.
//!
//! Counts every `get` and `put` so callers can assert exactly how many requests an operation
//! issued.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};

use super::errors::{Error, Result};
use super::{ByteStream, Key, ObjectBody, ObjectStore};

const CHUNK_SIZE: usize = 4;

struct StoredObject {
    bytes: Bytes,
    // simulates a connection dropped partway through the body
    truncate_at: Option<usize>,
}

pub struct MemoryStore {
    bucket_name: String,
    objects: Mutex<HashMap<String, StoredObject>>,
    gets: AtomicUsize,
    puts: AtomicUsize,
    put_failure: Mutex<Option<Error>>,
}

impl MemoryStore {
    pub fn new(bucket_name: impl Into<String>) -> MemoryStore {
        MemoryStore {
            bucket_name: bucket_name.into(),
            objects: Mutex::new(HashMap::new()),
            gets: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
            put_failure: Mutex::new(None),
        }
    }

    pub fn insert(&self, key: &str, bytes: impl Into<Bytes>) {
        self.store(key, bytes.into(), None);
    }

    /// Store an object whose body fails with [`Error::TruncatedBody`] after `after` bytes.
    pub fn insert_truncated(&self, key: &str, bytes: impl Into<Bytes>, after: usize) {
        self.store(key, bytes.into(), Some(after));
    }

    /// Make the next `put` fail with `error` instead of storing anything.
    pub fn fail_next_put(&self, error: Error) {
        *self
            .put_failure
            .lock()
            .expect("memory store lock should never be poisoned") = Some(error);
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.lock().get(key).map(|o| o.bytes.clone())
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    fn store(&self, key: &str, bytes: Bytes, truncate_at: Option<usize>) {
        self.lock()
            .insert(key.to_string(), StoredObject { bytes, truncate_at });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredObject>> {
        self.objects
            .lock()
            .expect("memory store lock should never be poisoned")
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket_name
    }

    async fn get(&self, key: &Key) -> Result<ObjectBody> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let (bytes, truncate_at) = match self.lock().get(key.as_str()) {
            Some(o) => (o.bytes.clone(), o.truncate_at),
            None => return Err(Error::ObjectNotFound(key.to_string())),
        };

        let served = truncate_at.unwrap_or(bytes.len()).min(bytes.len());
        let mut chunks: Vec<Result<Bytes>> = (0..served)
            .step_by(CHUNK_SIZE)
            .map(|start| Ok(bytes.slice(start..(start + CHUNK_SIZE).min(served))))
            .collect();
        if truncate_at.is_some() {
            chunks.push(Err(Error::TruncatedBody {
                expected: bytes.len() as u64,
                received: served as u64,
            }));
        }
        Ok(stream::iter(chunks).boxed())
    }

    async fn put(&self, key: &Key, body: ByteStream, content_length: u64) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let failure = self
            .put_failure
            .lock()
            .expect("memory store lock should never be poisoned")
            .take();
        if let Some(e) = failure {
            return Err(e);
        }
        let bytes = body.collect().await?.into_bytes();
        if bytes.len() as u64 != content_length {
            return Err(Error::TruncatedBody {
                expected: content_length,
                received: bytes.len() as u64,
            });
        }
        self.store(key.as_str(), bytes, None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;

    use super::*;

    #[tokio::test]
    async fn put_then_get() {
        let store = MemoryStore::new("b1");
        let key = Key::new("greeting");
        store
            .put(&key, ByteStream::from_static(b"hello world"), 11)
            .await
            .unwrap();

        let body: Vec<Bytes> = store.get(&key).await.unwrap().try_collect().await.unwrap();
        assert!(body.len() > 1, "body should arrive in several chunks");
        assert_eq!(b"hello world".to_vec(), body.concat());
        assert_eq!(1, store.put_count());
        assert_eq!(1, store.get_count());
    }

    #[tokio::test]
    async fn failed_put_stores_nothing() {
        let store = MemoryStore::new("b1");
        let key = Key::new("greeting");
        store.fail_next_put(Error::ObjectNotFound("b1".to_string()));

        let result = store.put(&key, ByteStream::from_static(b"hi"), 2).await;
        assert!(matches!(result, Err(Error::ObjectNotFound(_))), "{result:?}");
        assert_eq!(None, store.object("greeting"));

        store.put(&key, ByteStream::from_static(b"hi"), 2).await.unwrap();
        assert_eq!(Some(Bytes::from_static(b"hi")), store.object("greeting"));
        assert_eq!(2, store.put_count());
    }

    #[tokio::test]
    async fn get_missing_object() {
        let store = MemoryStore::new("b1");
        match store.get(&Key::new("nope")).await {
            Err(Error::ObjectNotFound(k)) => assert_eq!("nope", k),
            Err(e) => assert!(false, "unexpected error {e:?}"),
            Ok(_) => assert!(false, "expected an error"),
        }
        assert_eq!(1, store.get_count());
    }

    #[tokio::test]
    async fn truncated_body_errors_after_partial_content() {
        let store = MemoryStore::new("b1");
        store.insert_truncated("big", &b"0123456789"[..], 6);

        let mut body = store.get(&Key::new("big")).await.unwrap();
        let mut received = Vec::new();
        let err = loop {
            match body.try_next().await {
                Ok(Some(chunk)) => received.extend_from_slice(&chunk),
                Ok(None) => panic!("body should not end cleanly"),
                Err(e) => break e,
            }
        };
        assert_eq!(b"012345".to_vec(), received);
        assert!(matches!(
            err,
            Error::TruncatedBody {
                expected: 10,
                received: 6
            }
        ));
    }
}
