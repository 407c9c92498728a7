//! Manifest retrieval and decoding.
//!
//! A manifest can come from a local file or an HTTP(S) URL. Either way the
//! text is decoded as YAML and handed to [`load_distro`].

use crate::loader::load_distro;
use rosdistro_core::{DistroError, Distribution, Result};
use serde_yaml::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// Decode manifest text.
pub fn parse_manifest_str(input: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(input)?)
}

/// Read and decode a manifest file.
pub fn read_manifest_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Reading distro file");
    let content = std::fs::read_to_string(path)?;
    parse_manifest_str(&content)
}

/// Download and decode a manifest.
pub async fn fetch_manifest(url: &Url) -> Result<Value> {
    info!(url = %url, "Fetching distro");
    let fetch_err = |e: reqwest::Error| DistroError::Fetch {
        uri: url.to_string(),
        message: e.to_string(),
    };

    let response = reqwest::get(url.clone())
        .await
        .and_then(|r| r.error_for_status())
        .map_err(fetch_err)?;
    let body = response.text().await.map_err(fetch_err)?;
    parse_manifest_str(&body)
}

/// Where a manifest lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    Path(PathBuf),
    Url(Url),
}

impl ManifestSource {
    /// Classify a user-supplied location: an existing file wins, otherwise it must be an http(s) URL.
    pub fn parse(location: &str) -> Result<Self> {
        let path = Path::new(location);
        if path.is_file() {
            return Ok(ManifestSource::Path(path.to_path_buf()));
        }

        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(ManifestSource::Url(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(ManifestSource::Path)
                .map_err(|_| DistroError::Fetch {
                    uri: location.to_string(),
                    message: "invalid file URL".to_string(),
                }),
            _ => Err(DistroError::Fetch {
                uri: location.to_string(),
                message: "not an existing file or http(s) URL".to_string(),
            }),
        }
    }

    /// Retrieve and decode the manifest without resolving it.
    pub async fn fetch(&self) -> Result<Value> {
        match self {
            ManifestSource::Path(path) => read_manifest_file(path),
            ManifestSource::Url(url) => fetch_manifest(url).await,
        }
    }

    /// Retrieve, decode and resolve the manifest.
    pub async fn load(&self) -> Result<Distribution> {
        load_distro(self.fetch().await?)
    }
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::Path(path) => write!(f, "{}", path.display()),
            ManifestSource::Url(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = "release: cturtle\nstacks:\n  ros:\n    version: 1.2.0\n";

    #[test]
    fn test_decode_error_is_wrapped() {
        let err = parse_manifest_str("release: [unclosed").unwrap_err();
        assert!(matches!(err, DistroError::Decode(_)));
    }

    #[test]
    fn test_read_manifest_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let raw = read_manifest_file(file.path()).unwrap();
        assert_eq!(raw.get("release").and_then(Value::as_str), Some("cturtle"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_manifest_file(dir.path().join("absent.rosdistro")).unwrap_err();
        assert!(matches!(err, DistroError::Io(_)));
    }

    #[test]
    fn test_classify_sources() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let location = file.path().to_str().unwrap();
        assert_eq!(
            ManifestSource::parse(location).unwrap(),
            ManifestSource::Path(file.path().to_path_buf())
        );

        let url = "https://example.org/distros/cturtle.rosdistro";
        assert!(matches!(
            ManifestSource::parse(url).unwrap(),
            ManifestSource::Url(_)
        ));

        assert!(matches!(
            ManifestSource::parse("/does/not/exist.rosdistro").unwrap_err(),
            DistroError::Fetch { .. }
        ));
        assert!(ManifestSource::parse("ftp://example.org/x").is_err());
    }

    #[tokio::test]
    async fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let source = ManifestSource::Path(file.path().to_path_buf());
        let distro = source.load().await.unwrap();
        assert_eq!(distro.release_name(), "cturtle");
        assert_eq!(distro.stack("ros").unwrap().version.as_deref(), Some("1.2.0"));
    }
}
