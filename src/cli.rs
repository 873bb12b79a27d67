use std::path::PathBuf;

use clap::Parser;

use s3cp_objectstore::Secret;

use crate::config::Config;
use crate::request::TransferRequest;

pub const DEFAULT_REGION: &str = "us-east-1";

/// Copy a single file to or from an S3 bucket.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// `upload` or `download`
    #[arg(long, default_value = "upload")]
    pub action: String,

    /// Bucket name
    #[arg(long, default_value_t)]
    pub bucket: String,

    /// Local path to upload, or object key to download
    #[arg(long, default_value_t)]
    pub file: String,

    /// Where to write a downloaded object
    #[arg(long, default_value_t)]
    pub output: String,

    /// Access key id
    #[arg(long, default_value_t)]
    pub access: String,

    /// Secret access key
    #[arg(long, default_value = "", hide_default_value = true)]
    pub secret: Secret,

    /// Region identifier [default: us-east-1]
    #[arg(long)]
    pub region: Option<String>,

    /// Endpoint URL of an S3-compatible service
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
    #[arg(long)]
    pub force_path_style: bool,

    /// YAML file providing defaults for bucket, credentials, region and endpoint
    #[arg(short, long)]
    pub config_file: Option<PathBuf>,
}

impl Cli {
    /// Merge flags over `config`. Empty flags fall through to the file.
    pub fn into_request(self, config: Config) -> TransferRequest {
        TransferRequest {
            action: self.action,
            bucket: non_empty(self.bucket).or(config.bucket).unwrap_or_default(),
            file: self.file,
            output: self.output,
            access_key: non_empty(self.access)
                .or(config.access_key)
                .unwrap_or_default(),
            secret_key: Some(self.secret)
                .filter(|s| !s.is_empty())
                .or(config.secret_key)
                .unwrap_or_default(),
            region: self
                .region
                .and_then(non_empty)
                .or(config.region)
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint: self.endpoint.and_then(non_empty).or(config.endpoint),
            force_path_style: self.force_path_style || config.force_path_style,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
