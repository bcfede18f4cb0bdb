//! Tracing subscriber setup for binaries and tests embedding the engine
//!
//! Events are emitted under these targets:
//!
//! | Target | Level | Event |
//! |---|---|---|
//! | `blend_core::engine` | `trace` | strategy chosen for each key, keys dropped |
//! | `blend_core::layers` | `debug` | each layer folded into the result |
//! | `blend_rules::rules` | `debug` | rule set loaded |

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is unset: host crates at `warn`, blend
/// crates at `info`.
pub const DEFAULT_FILTER: &str = "warn,blend_core=info,blend_rules=info";

/// Install a compact `fmt` subscriber filtered by `RUST_LOG` or
/// [`DEFAULT_FILTER`].
///
/// `RUST_LOG=blend_core::engine=trace` prints how every key was resolved.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;
    init_with(filter)
}

/// Install a compact `fmt` subscriber with an explicit filter.
pub fn init_with(filter: EnvFilter) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
