//! squawk-review toolcache
//!
//! Fetches the pinned release assets of squawk and reviewdog for the host
//! platform and returns absolute paths to ready-to-run executables.
//!
//! The two tools share no state, so callers may provision them
//! concurrently.

pub mod fetch;
pub mod provisioner;
pub mod tool;

pub use fetch::{AssetFetcher, FetchError, HttpFetcher};
pub use provisioner::{ResolvedBinary, ToolProvisioner};
pub use tool::{Packaging, ToolSpec};
