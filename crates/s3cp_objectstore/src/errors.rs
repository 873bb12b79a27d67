//! ObjectStore errors

use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::put_object::PutObjectError;
use thiserror;

pub type Result<T> = std::result::Result<T, Error>;

/// General purpose [`super::ObjectStore`] error handling.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid region: {0:?}")]
    InvalidRegion(String),

    #[error("invalid endpoint {0:?}: {1}")]
    InvalidEndpoint(String, &'static str),

    #[error("invalid endpoint uri")]
    InvalidEndpointUri(#[from] http::uri::InvalidUri),

    #[error("{0}")]
    ByteStreamError(#[from] aws_sdk_s3::primitives::ByteStreamError),

    #[error("aws sdk put object error")]
    AWSSDKPutObjectError(#[from] SdkError<PutObjectError, HttpResponse>),
    #[error("aws sdk get object error")]
    AWSSDKGetObjectError(#[from] SdkError<GetObjectError, HttpResponse>),
    #[error("aws sdk credentials error")]
    AWSSDKCredentialsError(#[from] aws_credential_types::provider::error::CredentialsError),

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("object body ended after {received} of {expected} bytes")]
    TruncatedBody { expected: u64, received: u64 },

    #[error("key error: {0}")]
    KeyError(#[from] KeyError),
}

/// Error type used when deriving a [`super::Key`] from a local path.
#[derive(thiserror::Error, Debug)]
pub enum KeyError {
    #[error("path has no file name component")]
    MissingFileName,

    #[error("path components must be valid unicode")]
    PathComponentsMustBeValidUnicode,
}
