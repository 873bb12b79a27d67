use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::Deserialize;

mod errors;
pub use errors::{Error, KeyError, Result};
pub(crate) mod s3;
pub use s3::S3Config;
pub use s3::S3;
#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use aws_sdk_s3::primitives::ByteStream;

/// The name of an object within a bucket.
///
/// Keys derived from local files use [`Key::from_file_name`], which strips every directory
/// component. Keys supplied directly by users go through [`Key::new`] untouched; whether the
/// backend accepts them is left to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    key: String,
}

impl Key {
    pub fn new(key: impl Into<String>) -> Key {
        Key { key: key.into() }
    }

    /// Use the final component of `path` as the key, so `/tmp/a.txt` becomes `a.txt`.
    pub fn from_file_name(path: &Path) -> std::result::Result<Key, KeyError> {
        let name = path.file_name().ok_or(KeyError::MissingFileName)?;
        let name = name
            .to_str()
            .ok_or(KeyError::PathComponentsMustBeValidUnicode)?;
        Ok(Key::new(name))
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl From<&Key> for String {
    fn from(k: &Key) -> String {
        k.key.clone()
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// A credential that must never end up in logs or error messages.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: impl Into<String>) -> Secret {
        Secret(s.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::str::FromStr for Secret {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Secret, Self::Err> {
        Ok(Secret::new(s))
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("[redacted]")
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("[redacted]")
    }
}

pub type ObjectBody = BoxStream<'static, Result<Bytes>>;

/// Provides a common interface for interacting with different kinds of backend object stores.
///
/// Every store is bound to a single bucket. Object retrieval returns a
/// [`futures::stream::Stream`] over [`bytes::Bytes`] so callers never hold a whole object in
/// memory; uploads take a [`ByteStream`] which may be backed by an open file.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    fn bucket(&self) -> &str;

    async fn get(&self, key: &Key) -> Result<ObjectBody>;

    async fn put(&self, key: &Key, body: ByteStream, content_length: u64) -> Result<()>;
}
