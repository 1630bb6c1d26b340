// ABOUTME: Reads the release version from the JSON package manifest.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Version;

pub const DEFAULT_MANIFEST: &str = "package.json";

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    version: Option<String>,
}

pub fn read_package_version(path: &Path) -> Result<Version> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Manifest {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let manifest: PackageManifest =
        serde_json::from_str(&content).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let raw = manifest.version.ok_or_else(|| Error::Manifest {
        path: path.to_path_buf(),
        reason: "no \"version\" field".to_string(),
    })?;

    Version::new(&raw).map_err(|e| Error::Manifest {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_version_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, r#"{"name": "site", "version": "1.4.0"}"#).unwrap();

        assert_eq!(read_package_version(&path).unwrap().as_str(), "1.4.0");
    }

    #[test]
    fn missing_version_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, r#"{"name": "site"}"#).unwrap();

        let err = read_package_version(&path).unwrap_err();
        assert!(err.to_string().contains("version"));
    }
}
