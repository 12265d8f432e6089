//! Diagnostic logging for the CLI.
//!
//! ```bash
//! ILLUSIONIST_LOG=debug illusionist app.js
//! ILLUSIONIST_LOG="il_downlevel=trace" illusionist -t src -o dist
//! ```
//!
//! Nothing is installed unless `ILLUSIONIST_LOG` or `RUST_LOG` is set.

use tracing_subscriber::EnvFilter;

/// `ILLUSIONIST_LOG` wins over `RUST_LOG` when both are set.
fn build_filter() -> EnvFilter {
    match std::env::var("ILLUSIONIST_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber. Output goes to stderr so compiled code on
/// stdout stays clean.
pub fn init_tracing() {
    let requested = std::env::var_os("ILLUSIONIST_LOG").is_some() || std::env::var_os("RUST_LOG").is_some();
    if !requested {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .init();
}
