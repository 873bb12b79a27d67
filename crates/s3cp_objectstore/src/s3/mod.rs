use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use futures::stream::{self, StreamExt};
use http::Uri;
use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) mod logging;
use super::errors::{Error, Result};
use super::s3::logging::LoggingInterceptor;
use super::{Key, ObjectBody, ObjectStore, Secret};

/// Everything needed to open an [`S3`] session against one bucket.
///
/// Credentials are static: nothing is discovered from the environment and nothing is refreshed.
#[derive(Clone, Debug)]
pub struct S3Config {
    bucket_name: String,
    access_key: String,
    secret_key: Secret,
    region: String,
    endpoint: Option<String>,
    force_path_style: bool,
}

impl S3Config {
    pub fn new(
        bucket_name: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: Secret,
        region: impl Into<String>,
    ) -> S3Config {
        S3Config {
            bucket_name: bucket_name.into(),
            access_key: access_key.into(),
            secret_key,
            region: region.into(),
            endpoint: None,
            force_path_style: false,
        }
    }

    /// Send requests to an S3-compatible service instead of AWS.
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> S3Config {
        self.endpoint = endpoint;
        self
    }

    pub fn with_force_path_style(mut self, force_path_style: bool) -> S3Config {
        self.force_path_style = force_path_style;
        self
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Build the client. This only assembles configuration; no request is sent.
    pub async fn new_objects(&self) -> Result<S3> {
        validate_region(&self.region)?;
        let endpoint = self.endpoint.as_deref().map(validate_endpoint).transpose()?;

        let scp = SharedCredentialsProvider::new(
            Credentials::new(
                self.access_key.clone(),
                self.secret_key.expose(),
                None,
                None,
                "s3cp",
            )
            .provide_credentials()
            .await?,
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(scp)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(self.force_path_style)
            .interceptor(LoggingInterceptor);
        if let Some(uri) = endpoint {
            builder = builder.endpoint_url(uri.to_string());
        }

        tracing::debug!(
            bucket = %self.bucket_name,
            region = %self.region,
            endpoint = ?self.endpoint,
            "configured s3 client"
        );

        Ok(S3 {
            bucket_name: self.bucket_name.clone(),
            client: Client::from_conf(builder.build()),
        })
    }
}

fn validate_region(region: &str) -> Result<()> {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());
    if !RE.is_match(region) {
        return Err(Error::InvalidRegion(region.to_string()));
    }
    Ok(())
}

fn validate_endpoint(endpoint: &str) -> Result<Uri> {
    let uri: Uri = endpoint.parse()?;
    match uri.scheme_str() {
        Some("http") | Some("https") => {}
        _ => {
            return Err(Error::InvalidEndpoint(
                endpoint.to_string(),
                "scheme must be http or https",
            ))
        }
    }
    if uri.authority().is_none() {
        return Err(Error::InvalidEndpoint(endpoint.to_string(), "missing host"));
    }
    Ok(uri)
}

#[derive(Clone, Debug)]
pub struct S3 {
    bucket_name: String,
    client: Client,
}

#[async_trait]
impl ObjectStore for S3 {
    fn bucket(&self) -> &str {
        &self.bucket_name
    }

    async fn get(&self, key: &Key) -> Result<ObjectBody> {
        let get_object_output = match self
            .client
            .get_object()
            .key(key.as_str())
            .bucket(&self.bucket_name)
            .send()
            .await
        {
            Err(SdkError::ServiceError(e)) if e.err().is_no_such_key() => {
                return Err(Error::ObjectNotFound(key.to_string()))
            }
            Err(e) => return Err(Error::AWSSDKGetObjectError(e)),
            Ok(o) => o,
        };

        let body = stream::try_unfold(get_object_output.body, |mut body| async move {
            let chunk = body.try_next().await?;
            Ok::<_, Error>(chunk.map(|bytes| (bytes, body)))
        });
        Ok(body.boxed())
    }

    async fn put(&self, key: &Key, body: ByteStream, content_length: u64) -> Result<()> {
        let _put_object_output = self
            .client
            .put_object()
            .key(key.as_str())
            .body(body)
            .content_length(content_length as i64)
            .bucket(&self.bucket_name)
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;

    #[rstest]
    #[case::aws("us-east-1", true)]
    #[case::aws_gov("us-gov-west-1", true)]
    #[case::r2("auto", true)]
    #[case::empty("", false)]
    #[case::uppercase("US-EAST-1", false)]
    #[case::spaces("us east 1", false)]
    #[case::trailing_hyphen("us-east-", false)]
    #[case::double_hyphen("us--east-1", false)]
    fn region_validation(#[case] region: &str, #[case] valid: bool) {
        assert_eq!(valid, validate_region(region).is_ok(), "{region:?}");
    }

    #[rstest]
    #[case::http("http://localhost:9000", true)]
    #[case::https("https://s3.example.com", true)]
    #[case::no_scheme("localhost:9000", false)]
    #[case::ftp("ftp://files.example.com", false)]
    #[case::garbage("not a uri", false)]
    fn endpoint_validation(#[case] endpoint: &str, #[case] valid: bool) {
        assert_eq!(valid, validate_endpoint(endpoint).is_ok(), "{endpoint:?}");
    }

    #[tokio::test]
    async fn new_objects_rejects_bad_region() {
        let config = S3Config::new("b1", "AK", Secret::new("SK"), "Not A Region");
        match config.new_objects().await {
            Err(Error::InvalidRegion(r)) => assert_eq!("Not A Region", r),
            Err(e) => assert!(false, "unexpected error {e:?}"),
            Ok(_) => assert!(false, "expected an error"),
        }
    }

    #[tokio::test]
    async fn new_objects_binds_bucket() {
        let config = S3Config::new("b1", "AK", Secret::new("SK"), "us-east-1")
            .with_endpoint(Some("http://localhost:9000".to_string()))
            .with_force_path_style(true);
        let s3 = config.new_objects().await.expect("configuration should load");
        assert_eq!("b1", s3.bucket());
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = S3Config::new("b1", "AK", Secret::new("very-secret"), "us-east-1");
        let debug = format!("{config:?}");
        assert!(!debug.contains("very-secret"), "{debug}");
    }
}
