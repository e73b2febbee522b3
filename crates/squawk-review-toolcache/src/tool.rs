//! Release asset specifications for the two external tools.

use squawk_review_domain::Platform;
use std::path::PathBuf;

/// How a release asset is packaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packaging {
    /// The asset is the executable itself.
    Raw,
    /// A gzip-compressed tarball containing the executable.
    TarGz,
}

/// A pinned release asset to provision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Tool name (`squawk`, `reviewdog`).
    pub name: String,

    /// Release version as configured.
    pub version: String,

    /// Fully resolved asset URL.
    pub download_url: String,

    /// Path of the executable inside the tool's download directory.
    pub executable_relative_path: PathBuf,

    pub packaging: Packaging,

    /// Optional SHA-256 (hex) the downloaded asset must hash to.
    pub expected_sha256: Option<String>,
}

impl ToolSpec {
    /// squawk publishes single binaries named `squawk-<os>-<arch>[.exe]`
    /// under the version tag as given.
    pub fn squawk(version: &str, platform: &Platform) -> Self {
        let asset = format!(
            "squawk-{}-{}{}",
            platform.os_lower(),
            platform.arch,
            platform.exe_ext
        );
        Self {
            name: "squawk".to_string(),
            version: version.to_string(),
            download_url: format!(
                "https://github.com/sbdchd/squawk/releases/download/{version}/{asset}"
            ),
            executable_relative_path: PathBuf::from(asset),
            packaging: Packaging::Raw,
            expected_sha256: None,
        }
    }

    /// reviewdog publishes `reviewdog_<ver>_<OS>_<arch>.tar.gz` under tag
    /// `v<ver>`. A leading `v` in `version` is accepted.
    pub fn reviewdog(version: &str, platform: &Platform) -> Self {
        let bare = version.trim_start_matches('v');
        Self {
            name: "reviewdog".to_string(),
            version: version.to_string(),
            download_url: format!(
                "https://github.com/reviewdog/reviewdog/releases/download/v{bare}/reviewdog_{bare}_{}_{}.tar.gz",
                platform.os, platform.arch
            ),
            executable_relative_path: PathBuf::from(format!("reviewdog{}", platform.exe_ext)),
            packaging: Packaging::TarGz,
            expected_sha256: None,
        }
    }

    /// Pin the asset digest.
    pub fn with_sha256(mut self, sha256: Option<String>) -> Self {
        self.expected_sha256 = sha256.map(|s| s.trim().to_lowercase());
        self
    }

    /// File name of the asset, taken from the last URL segment.
    pub fn asset_file_name(&self) -> &str {
        self.download_url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(self.name.as_str())
    }
}
