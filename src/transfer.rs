use std::path::{Path, PathBuf};

use futures::TryStreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use s3cp_objectstore::{ByteStream, Key, ObjectStore};

use crate::errors::{CopyFailure, Error, Result};

/// The single request a validated invocation performs.
#[derive(Clone, Debug)]
pub enum Operation {
    Upload { local_path: PathBuf },
    Download { key: Key, output_path: PathBuf },
}

impl Operation {
    pub async fn execute<O: ObjectStore>(self, objects: &O) -> Result<Outcome> {
        match self {
            Operation::Upload { local_path } => upload(objects, &local_path).await,
            Operation::Download { key, output_path } => download(objects, &key, &output_path).await,
        }
    }
}

/// What a successful operation did, phrased for humans by its [`std::fmt::Display`] impl.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Uploaded {
        path: PathBuf,
        bucket: String,
        key: Key,
        bytes: u64,
    },
    Downloaded {
        key: Key,
        bucket: String,
        path: PathBuf,
        bytes: u64,
    },
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Outcome::Uploaded {
                path,
                bucket,
                key,
                bytes,
            } => write!(
                f,
                "uploaded {} to bucket {bucket} as {key} ({bytes} bytes)",
                path.display()
            ),
            Outcome::Downloaded {
                key,
                bucket,
                path,
                bytes,
            } => write!(
                f,
                "downloaded {key} from bucket {bucket} to {} ({bytes} bytes)",
                path.display()
            ),
        }
    }
}

/// Upload `local_path` under its file name, streaming the body straight from disk.
pub async fn upload<O: ObjectStore + ?Sized>(objects: &O, local_path: &Path) -> Result<Outcome> {
    let key = Key::from_file_name(local_path).map_err(|source| Error::InvalidObjectKey {
        path: local_path.to_path_buf(),
        source,
    })?;
    let open_error = |source| Error::FileOpenError {
        path: local_path.to_path_buf(),
        source,
    };

    let file = File::open(local_path).await.map_err(open_error)?;
    let metadata = file.metadata().await.map_err(open_error)?;
    if !metadata.is_file() {
        return Err(open_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    let content_length = metadata.len();

    // the file handle moves into the body and is closed when the request completes or fails
    let body = ByteStream::read_from()
        .file(file)
        .build()
        .await
        .map_err(|e| open_error(std::io::Error::other(e)))?;

    tracing::debug!(bucket = objects.bucket(), %key, content_length, "uploading");
    objects
        .put(&key, body, content_length)
        .await
        .map_err(|source| Error::UploadError {
            path: local_path.to_path_buf(),
            bucket: objects.bucket().to_string(),
            source,
        })?;

    Ok(Outcome::Uploaded {
        path: local_path.to_path_buf(),
        bucket: objects.bucket().to_string(),
        key,
        bytes: content_length,
    })
}

/// Fetch `key` and write it to `output_path`, one chunk at a time.
///
/// The output file is only created once the object has been found. A copy that fails midway
/// leaves whatever was written in place.
pub async fn download<O: ObjectStore + ?Sized>(
    objects: &O,
    key: &Key,
    output_path: &Path,
) -> Result<Outcome> {
    tracing::debug!(bucket = objects.bucket(), %key, "downloading");
    let mut body = objects
        .get(key)
        .await
        .map_err(|source| Error::ObjectFetchError {
            key: key.to_string(),
            bucket: objects.bucket().to_string(),
            source,
        })?;

    let mut file = File::create(output_path)
        .await
        .map_err(|source| Error::FileCreateError {
            path: output_path.to_path_buf(),
            source,
        })?;

    let copy_error = |source| Error::CopyError {
        key: key.clone(),
        path: output_path.to_path_buf(),
        source,
    };
    let mut bytes = 0u64;
    while let Some(chunk) = body
        .try_next()
        .await
        .map_err(|e| copy_error(CopyFailure::Read(e)))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| copy_error(CopyFailure::Write(e)))?;
        bytes += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| copy_error(CopyFailure::Write(e)))?;

    Ok(Outcome::Downloaded {
        key: key.clone(),
        bucket: objects.bucket().to_string(),
        path: output_path.to_path_buf(),
        bytes,
    })
}
