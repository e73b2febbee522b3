//! Tool provisioning: download, verify, unpack and mark executable.

use crate::fetch::{AssetFetcher, HttpFetcher};
use crate::tool::{Packaging, ToolSpec};
use sha2::{Digest, Sha256};
use squawk_review_domain::{Result, ReviewError};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// An executable ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinary {
    pub tool_name: String,

    /// Absolute path of the executable.
    pub path: PathBuf,

    /// SHA-256 (hex) of the downloaded asset.
    pub asset_sha256: String,
}

/// Provisions tools into per-tool directories below `root`.
///
/// Nothing is cached between runs; every `acquire` downloads again.
pub struct ToolProvisioner<F = HttpFetcher> {
    fetcher: F,
    root: PathBuf,
}

impl ToolProvisioner<HttpFetcher> {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let fetcher = HttpFetcher::new().map_err(|e| ReviewError::provisioning("http", e))?;
        Ok(Self::with_fetcher(fetcher, root))
    }
}

impl<F: AssetFetcher> ToolProvisioner<F> {
    pub fn with_fetcher(fetcher: F, root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            root: root.into(),
        }
    }

    /// Download and prepare `spec`, returning the absolute executable path.
    pub async fn acquire(&self, spec: &ToolSpec) -> Result<ResolvedBinary> {
        let fail = |reason: String| ReviewError::provisioning(&spec.name, reason);

        info!(tool = %spec.name, version = %spec.version, "Installing tool");

        let dir = self.root.join(format!("{}-{}", spec.name, spec.version));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| fail(format!("cannot create {}: {e}", dir.display())))?;

        let asset = dir.join(spec.asset_file_name());
        self.fetcher
            .fetch(&spec.download_url, &asset)
            .await
            .map_err(|e| fail(format!("download of {} failed: {e}", spec.download_url)))?;

        let asset_sha256 = file_sha256(&asset)
            .await
            .map_err(|e| fail(format!("cannot read {}: {e}", asset.display())))?;
        debug!(tool = %spec.name, sha256 = %asset_sha256, "Asset downloaded");

        if let Some(expected) = &spec.expected_sha256 {
            if *expected != asset_sha256 {
                return Err(fail(format!(
                    "checksum mismatch: expected {expected}, got {asset_sha256}"
                )));
            }
        }

        if spec.packaging == Packaging::TarGz {
            extract_tar_gz(&asset, &dir).await.map_err(fail)?;
        }

        let executable = dir.join(&spec.executable_relative_path);
        if !tokio::fs::try_exists(&executable).await.unwrap_or(false) {
            return Err(fail(format!(
                "{} not found in downloaded asset",
                spec.executable_relative_path.display()
            )));
        }

        make_executable(&executable)
            .await
            .map_err(|e| fail(format!("cannot chmod {}: {e}", executable.display())))?;

        let path = tokio::fs::canonicalize(&executable)
            .await
            .map_err(|e| fail(format!("cannot resolve {}: {e}", executable.display())))?;

        info!(tool = %spec.name, version = %spec.version, path = %path.display(), "Tool installed");

        Ok(ResolvedBinary {
            tool_name: spec.name.clone(),
            path,
            asset_sha256,
        })
    }
}

async fn file_sha256(path: &Path) -> std::io::Result<String> {
    let content = tokio::fs::read(path).await?;
    Ok(hex::encode(Sha256::digest(&content)))
}

async fn extract_tar_gz(archive: &Path, into: &Path) -> std::result::Result<(), String> {
    let output = Command::new("tar")
        .arg("-xzf")
        .arg(archive)
        .arg("-C")
        .arg(into)
        .output()
        .await
        .map_err(|e| format!("cannot run tar: {e}"))?;

    if !output.status.success() {
        return Err(format!(
            "tar exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    Ok(())
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use async_trait::async_trait;
    use squawk_review_domain::resolve;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Serves canned bodies and records requested URLs.
    #[derive(Default)]
    struct FakeFetcher {
        assets: HashMap<String, Vec<u8>>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn serving(url: &str, body: &[u8]) -> Self {
            let mut fetcher = Self::default();
            fetcher.assets.insert(url.to_string(), body.to_vec());
            fetcher
        }
    }

    #[async_trait]
    impl AssetFetcher for FakeFetcher {
        async fn fetch(&self, url: &str, dest: &Path) -> std::result::Result<(), FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.assets.get(url) {
                Some(body) => {
                    tokio::fs::write(dest, body).await?;
                    Ok(())
                }
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }

    fn squawk_spec() -> ToolSpec {
        ToolSpec::squawk("v0.26.0", &resolve("linux", "x64").unwrap())
    }

    #[tokio::test]
    async fn test_acquire_raw_binary() {
        let root = tempdir().unwrap();
        let spec = squawk_spec();
        let fetcher = FakeFetcher::serving(&spec.download_url, b"#!/bin/sh\necho squawk\n");
        let provisioner = ToolProvisioner::with_fetcher(fetcher, root.path());

        let binary = provisioner.acquire(&spec).await.unwrap();

        assert_eq!(binary.tool_name, "squawk");
        assert!(binary.path.is_absolute());
        assert!(binary.path.ends_with("squawk-v0.26.0/squawk-linux-x86_64"));
        assert_eq!(
            binary.asset_sha256,
            hex::encode(Sha256::digest(b"#!/bin/sh\necho squawk\n"))
        );

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&binary.path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[tokio::test]
    async fn test_download_failure_is_provisioning_error() {
        let root = tempdir().unwrap();
        let provisioner = ToolProvisioner::with_fetcher(FakeFetcher::default(), root.path());

        let err = provisioner.acquire(&squawk_spec()).await.unwrap_err();
        match err {
            ReviewError::ProvisioningFailed { tool, reason } => {
                assert_eq!(tool, "squawk");
                assert!(reason.contains("404"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_checksum_mismatch() {
        let root = tempdir().unwrap();
        let spec = squawk_spec().with_sha256(Some("00".repeat(32)));
        let fetcher = FakeFetcher::serving(&spec.download_url, b"binary");
        let provisioner = ToolProvisioner::with_fetcher(fetcher, root.path());

        let err = provisioner.acquire(&spec).await.unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[tokio::test]
    async fn test_checksum_match() {
        let root = tempdir().unwrap();
        let digest = hex::encode(Sha256::digest(b"binary"));
        let spec = squawk_spec().with_sha256(Some(digest.to_uppercase()));
        let fetcher = FakeFetcher::serving(&spec.download_url, b"binary");
        let provisioner = ToolProvisioner::with_fetcher(fetcher, root.path());

        let binary = provisioner.acquire(&spec).await.unwrap();
        assert_eq!(binary.asset_sha256, digest);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_acquire_tar_gz() {
        let staging = tempdir().unwrap();
        std::fs::write(staging.path().join("reviewdog"), b"#!/bin/sh\n").unwrap();
        std::fs::write(staging.path().join("LICENSE"), b"MIT").unwrap();
        let archive = staging.path().join("asset.tar.gz");
        let status = std::process::Command::new("tar")
            .arg("-czf")
            .arg(&archive)
            .arg("-C")
            .arg(staging.path())
            .arg("reviewdog")
            .arg("LICENSE")
            .status()
            .unwrap();
        assert!(status.success());

        let spec = ToolSpec::reviewdog("0.20.3", &resolve("linux", "x64").unwrap());
        let fetcher = FakeFetcher::serving(&spec.download_url, &std::fs::read(&archive).unwrap());
        let root = tempdir().unwrap();
        let provisioner = ToolProvisioner::with_fetcher(fetcher, root.path());

        let binary = provisioner.acquire(&spec).await.unwrap();
        assert!(binary.path.ends_with("reviewdog"));
        assert!(binary.path.is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tar_gz_without_executable() {
        let staging = tempdir().unwrap();
        std::fs::write(staging.path().join("README.md"), b"docs").unwrap();
        let archive = staging.path().join("asset.tar.gz");
        let status = std::process::Command::new("tar")
            .arg("-czf")
            .arg(&archive)
            .arg("-C")
            .arg(staging.path())
            .arg("README.md")
            .status()
            .unwrap();
        assert!(status.success());

        let spec = ToolSpec::reviewdog("0.20.3", &resolve("linux", "x64").unwrap());
        let fetcher = FakeFetcher::serving(&spec.download_url, &std::fs::read(&archive).unwrap());
        let root = tempdir().unwrap();
        let provisioner = ToolProvisioner::with_fetcher(fetcher, root.path());

        let err = provisioner.acquire(&spec).await.unwrap_err();
        assert!(matches!(err, ReviewError::ProvisioningFailed { .. }));
    }

    #[tokio::test]
    async fn test_each_acquire_downloads_again() {
        let root = tempdir().unwrap();
        let spec = squawk_spec();
        let fetcher = FakeFetcher::serving(&spec.download_url, b"bin");
        let provisioner = ToolProvisioner::with_fetcher(fetcher, root.path());

        provisioner.acquire(&spec).await.unwrap();
        provisioner.acquire(&spec).await.unwrap();

        assert_eq!(provisioner.fetcher.requests.lock().unwrap().len(), 2);
    }
}
