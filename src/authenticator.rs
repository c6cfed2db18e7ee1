//! `hello-authenticator`: sign stdin with a key credential after Windows
//! Hello has verified the user.

use crate::config;
use crate::error::{Error, Result};
use crate::focus::{self, DialogWindows};
use crate::platform::{KeyCredential, Platform, PlatformError};
use crate::status::{EXIT_PLATFORM_ERROR, EXIT_SUCCESS};
use std::io::Write;
use std::sync::Arc;

/// Run a blocking platform call off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, PlatformError>
where
    F: FnOnce() -> Result<T, PlatformError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PlatformError::Call(format!("platform task failed: {e}")))?
}

/// Sign `payload` with credential `name`. The name is normalised the same
/// way `hello-creator` normalises it.
///
/// The dialog focus task runs only while the signature request is pending
/// and is stopped before this returns, whatever the outcome.
pub async fn sign<P, W>(
    platform: Arc<P>,
    desktop: Arc<W>,
    name: &str,
    payload: Vec<u8>,
) -> Result<Vec<u8>>
where
    P: Platform,
    W: DialogWindows,
{
    let name = config::validate_name(name)?;

    let p = Arc::clone(&platform);
    let supported = blocking(move || p.is_supported())
        .await
        .map_err(|e| Error::from_platform(e, name))?;
    if !supported {
        tracing::warn!("Windows Hello is not supported on this device");
        return Err(Error::NotSupported);
    }

    let p = Arc::clone(&platform);
    let owned = name.to_string();
    let credential = blocking(move || p.open(&owned))
        .await
        .map_err(|e| Error::from_platform(e, name))?;
    tracing::info!(name, bytes = payload.len(), "Credential opened, requesting signature");

    let focus = focus::spawn_focus(desktop);
    let result = blocking(move || credential.request_sign(&payload)).await;
    let outcome = focus.stop().await;
    tracing::debug!(?outcome, "Focus task finished");

    let signature = result.map_err(|e| Error::from_platform(e, name))?;
    tracing::info!(bytes = signature.len(), "Signature ready");
    Ok(signature)
}

/// Run `hello-authenticator` and return its exit code.
///
/// `output` receives either the raw signature or a single message line,
/// never both.
pub async fn run<P, W, O>(
    platform: Arc<P>,
    desktop: Arc<W>,
    name: &str,
    payload: Vec<u8>,
    output: &mut O,
) -> u8
where
    P: Platform,
    W: DialogWindows,
    O: Write,
{
    match sign(platform, desktop, name, payload).await {
        Ok(signature) => match output.write_all(&signature).and_then(|()| output.flush()) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                tracing::error!("Cannot write the signature to stdout: {e}");
                EXIT_PLATFORM_ERROR
            }
        },
        Err(e) => {
            tracing::debug!(error = ?e, "Signing failed");
            if let Err(write_err) = writeln!(output, "{e}").and_then(|()| output.flush()) {
                tracing::warn!("Cannot print the error: {write_err}");
            }
            e.authenticator_exit_code()
        }
    }
}
