use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use s3cp_objectstore::Secret;

use crate::errors::{Error, Result};

/// Settings that can be kept in a YAML file instead of being passed as flags every time.
///
/// Flags given on the command line take precedence over anything here.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub bucket: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<Secret>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        let mut f = File::open(path).map_err(|source| Error::ConfigFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut s = String::new();
        f.read_to_string(&mut s)
            .map_err(|source| Error::ConfigFileRead {
                path: path.to_path_buf(),
                source,
            })?;
        serde_yaml::from_str(&s).map_err(|source| Error::ConfigFileParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn parse_full_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s3cp.yml");
        std::fs::write(
            &path,
            "bucket: b1\n\
             access_key: AK\n\
             secret_key: SK\n\
             region: eu-west-1\n\
             endpoint: http://localhost:9000\n\
             force_path_style: true\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(
            Config {
                bucket: Some("b1".to_string()),
                access_key: Some("AK".to_string()),
                secret_key: Some(Secret::new("SK")),
                region: Some("eu-west-1".to_string()),
                endpoint: Some("http://localhost:9000".to_string()),
                force_path_style: true,
            },
            config
        );
    }

    #[test]
    fn every_key_is_optional() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s3cp.yml");
        std::fs::write(&path, "region: ap-south-1\n").unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(Some("ap-south-1".to_string()), config.region);
        assert_eq!(None, config.bucket);
        assert!(!config.force_path_style);
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s3cp.yml");
        std::fs::write(&path, "buckit: b1\n").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(Error::ConfigFileParse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempdir().unwrap();

        assert!(matches!(
            Config::from_file(&dir.path().join("absent.yml")),
            Err(Error::ConfigFileRead { .. })
        ));
    }
}
