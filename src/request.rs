use std::path::PathBuf;
use std::str::FromStr;

use s3cp_objectstore::{Key, S3Config, Secret};

use crate::errors::{Error, Result};
use crate::transfer::Operation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Upload,
    Download,
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Action> {
        match s {
            "upload" => Ok(Action::Upload),
            "download" => Ok(Action::Download),
            _ => Err(Error::InvalidAction(s.to_string())),
        }
    }
}

/// Everything one invocation was asked to do, before any of it is checked.
///
/// `file` is the local path when uploading and the object key when downloading.
#[derive(Clone, Debug)]
pub struct TransferRequest {
    pub action: String,
    pub bucket: String,
    pub file: String,
    pub output: String,
    pub access_key: String,
    pub secret_key: Secret,
    pub region: String,
    pub endpoint: Option<String>,
    pub force_path_style: bool,
}

/// A request that passed validation: the session to open and the single operation to run on it.
#[derive(Debug)]
pub struct TransferPlan {
    pub store: S3Config,
    pub operation: Operation,
}

impl TransferRequest {
    /// Validate the request without touching the network or the filesystem.
    pub fn plan(self) -> Result<TransferPlan> {
        let action: Action = self.action.parse()?;

        let missing: Vec<&'static str> = [
            ("bucket", self.bucket.is_empty()),
            ("access", self.access_key.is_empty()),
            ("secret", self.secret_key.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, empty)| empty.then_some(name))
        .collect();
        if !missing.is_empty() {
            return Err(Error::MissingRequiredParameter(missing));
        }

        let operation = match action {
            Action::Upload => {
                if self.file.is_empty() {
                    return Err(Error::MissingFilePath);
                }
                Operation::Upload {
                    local_path: PathBuf::from(self.file),
                }
            }
            Action::Download => {
                if self.output.is_empty() {
                    return Err(Error::MissingOutputPath);
                }
                Operation::Download {
                    key: Key::new(self.file),
                    output_path: PathBuf::from(self.output),
                }
            }
        };

        let store = S3Config::new(self.bucket, self.access_key, self.secret_key, self.region)
            .with_endpoint(self.endpoint)
            .with_force_path_style(self.force_path_style);

        Ok(TransferPlan { store, operation })
    }
}
