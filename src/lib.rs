pub mod datasets;
pub mod error;
pub mod perceptron;
pub mod pipeline;
pub mod plots;

pub use error::{Error, Result};

/// Installs the `tracing` subscriber used by the binaries, reading the
/// filter from `RUST_LOG` and defaulting to `info`.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
