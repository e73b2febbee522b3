//! Host platform resolution.
//!
//! Maps an operating-system / CPU-architecture pair onto the tokens used in
//! the release asset names of squawk and reviewdog.

use crate::error::{Result, ReviewError};

/// Release-asset tokens for one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// OS token as it appears in asset names (`Darwin`, `Linux`, `Windows`).
    pub os: &'static str,

    /// Architecture token (`x86_64`, `arm64`, `i386`).
    pub arch: &'static str,

    /// Executable suffix (`.exe` on Windows, empty elsewhere).
    pub exe_ext: &'static str,
}

impl Platform {
    /// Resolve the platform this process is running on.
    pub fn host() -> Result<Self> {
        let (os, arch) = host_identifiers();
        resolve(os, arch)
    }

    /// Lower-cased OS token, as used by squawk's asset names.
    pub fn os_lower(&self) -> String {
        self.os.to_lowercase()
    }
}

/// Map an OS identifier and an architecture identifier to release tokens.
///
/// Identifiers use the `darwin`/`linux`/`win32` and `x64`/`arm64`/`x32`
/// vocabulary. Anything outside that table is rejected.
pub fn resolve(os: &str, arch: &str) -> Result<Platform> {
    let unsupported = || ReviewError::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
    };

    let (os_token, exe_ext) = match os {
        "darwin" => ("Darwin", ""),
        "linux" => ("Linux", ""),
        "win32" => ("Windows", ".exe"),
        _ => return Err(unsupported()),
    };

    let arch_token = match arch {
        "x64" => "x86_64",
        "arm64" => "arm64",
        "x32" => "i386",
        _ => return Err(unsupported()),
    };

    Ok(Platform {
        os: os_token,
        arch: arch_token,
        exe_ext,
    })
}

/// Identifiers for the current build target, translated from Rust's
/// `std::env::consts` names. Unknown values pass through unchanged so that
/// [`resolve`] reports them.
pub fn host_identifiers() -> (&'static str, &'static str) {
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    };
    let arch = match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "x32",
        other => other,
    };
    (os, arch)
}
