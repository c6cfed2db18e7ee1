pub mod authenticator;
pub mod config;
pub mod creator;
pub mod error;
pub mod focus;
pub mod platform;
pub mod prompt;
pub mod public_key;
pub mod status;

pub use error::{Error, Result};
pub use status::CredentialStatus;

/// Install the log subscriber. Logs go to stderr: stdout belongs to the
/// caller's protocol.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
