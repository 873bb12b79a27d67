mod cli;
pub use cli::Cli;
pub use cli::DEFAULT_REGION;

mod config;
pub use config::Config;

mod errors;
pub use errors::{CopyFailure, Error, Result};

mod request;
pub use request::{Action, TransferPlan, TransferRequest};

pub mod transfer;
pub use transfer::{Operation, Outcome};

/// Validate `request`, open a session and perform its single upload or download.
///
/// Every validation error is returned before any session is built.
pub async fn run(request: TransferRequest) -> Result<Outcome> {
    let TransferPlan { store, operation } = request.plan()?;

    let objects = store
        .new_objects()
        .await
        .map_err(Error::ConfigurationError)?;
    // credentials now live only inside the client
    drop(store);

    operation.execute(&objects).await
}

#[cfg(test)]
mod tests {
    use s3cp_objectstore::Secret;

    use super::*;

    fn request(action: &str) -> TransferRequest {
        TransferRequest {
            action: action.to_string(),
            bucket: "b1".to_string(),
            file: "a.txt".to_string(),
            output: "out.txt".to_string(),
            access_key: "AK".to_string(),
            secret_key: Secret::new("SK"),
            region: "us-east-1".to_string(),
            // nothing listens here, so a stray request fails instead of reaching AWS
            endpoint: Some("http://127.0.0.1:9".to_string()),
            force_path_style: true,
        }
    }

    #[tokio::test]
    async fn invalid_action_fails_before_session() {
        let mut req = request("sync");
        req.region = "Not A Region".to_string();

        assert!(matches!(run(req).await, Err(Error::InvalidAction(_))));
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_session() {
        let mut req = request("upload");
        req.secret_key = Secret::default();
        req.region = "Not A Region".to_string();

        assert!(matches!(
            run(req).await,
            Err(Error::MissingRequiredParameter(_))
        ));
    }

    #[tokio::test]
    async fn bad_region_is_a_configuration_error() {
        let mut req = request("download");
        req.region = "Not A Region".to_string();

        assert!(matches!(run(req).await, Err(Error::ConfigurationError(_))));
    }

    #[tokio::test]
    async fn bad_endpoint_is_a_configuration_error() {
        let mut req = request("download");
        req.endpoint = Some("localhost".to_string());

        assert!(matches!(run(req).await, Err(Error::ConfigurationError(_))));
    }

    #[tokio::test]
    async fn upload_of_missing_file_fails_after_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request("upload");
        req.file = dir.path().join("missing.txt").display().to_string();

        assert!(matches!(run(req).await, Err(Error::FileOpenError { .. })));
    }
}
