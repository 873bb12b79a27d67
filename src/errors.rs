use std::path::PathBuf;

use thiserror;

use s3cp_objectstore::{Key, KeyError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid action {0:?}, expected \"upload\" or \"download\"")]
    InvalidAction(String),
    #[error("missing required parameter(s): {}", .0.join(", "))]
    MissingRequiredParameter(Vec<&'static str>),
    #[error("upload requires a local file path (--file)")]
    MissingFilePath,
    #[error("download requires an output path (--output)")]
    MissingOutputPath,

    #[error("failed to read config file {}", .path.display())]
    ConfigFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", .path.display())]
    ConfigFileParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to configure storage session")]
    ConfigurationError(#[source] s3cp_objectstore::Error),

    #[error("cannot derive an object key from {}", .path.display())]
    InvalidObjectKey {
        path: PathBuf,
        #[source]
        source: KeyError,
    },
    #[error("failed to open {}", .path.display())]
    FileOpenError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to upload {} to bucket {bucket}", .path.display())]
    UploadError {
        path: PathBuf,
        bucket: String,
        #[source]
        source: s3cp_objectstore::Error,
    },

    #[error("failed to fetch object {key:?} from bucket {bucket}")]
    ObjectFetchError {
        key: String,
        bucket: String,
        #[source]
        source: s3cp_objectstore::Error,
    },
    #[error("failed to create {}", .path.display())]
    FileCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write object {key} to {}", .path.display())]
    CopyError {
        key: Key,
        path: PathBuf,
        #[source]
        source: CopyFailure,
    },
}

/// Which side of a download copy failed.
#[derive(thiserror::Error, Debug)]
pub enum CopyFailure {
    #[error("reading object body")]
    Read(#[source] s3cp_objectstore::Error),
    #[error("writing output file")]
    Write(#[source] std::io::Error),
}
