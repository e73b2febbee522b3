//! Logging setup.
//!
//! `RUST_LOG` wins when set. Otherwise the level follows `--debug`, with the
//! HTTP stack held at `info` so debug runs stay readable.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const QUIET_DEPENDENCIES: &[&str] = &[
    "hyper=info",
    "hyper_util=info",
    "reqwest=info",
    "rustls=info",
];

fn default_directives(debug: bool) -> String {
    if debug {
        std::iter::once("debug")
            .chain(QUIET_DEPENDENCIES.iter().copied())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        "info".to_string()
    }
}

/// Install the global subscriber. Only the first call takes effect.
pub fn init_tracing(json: bool, debug: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok();
    } else {
        registry.with(fmt::layer().with_target(false)).try_init().ok();
    }
}
