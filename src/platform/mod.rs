//! The platform credential store, seen through the operations this bridge
//! needs from it.
//!
//! Every method blocks until the platform answers. Signing in particular
//! blocks for as long as the user takes to finish the Windows Hello dialog,
//! so async callers run these on `spawn_blocking`.

#[cfg(windows)]
pub mod hello;
pub mod software;
pub mod unsupported;

use crate::status::CredentialStatus;

#[derive(Debug, Clone, thiserror::Error)]
pub enum PlatformError {
    /// The operation completed with a non-success status.
    #[error("credential status {0:?}")]
    Status(CredentialStatus),
    /// The platform call itself failed.
    #[error("{0}")]
    Call(String),
}

impl PlatformError {
    /// `Ok(())` for `Success`, otherwise the status as an error.
    pub fn check(status: CredentialStatus) -> Result<(), PlatformError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(PlatformError::Status(status))
        }
    }
}

/// A hardware-backed key credential. The private half never leaves the
/// platform.
pub trait KeyCredential: Clone + Send + Sync + 'static {
    /// DER-encoded X.509 SubjectPublicKeyInfo.
    fn public_key(&self) -> Result<Vec<u8>, PlatformError>;

    /// Ask the platform to sign `data`. Shows the user-presence challenge and
    /// blocks until it is completed, cancelled, or refused.
    fn request_sign(&self, data: &[u8]) -> Result<Vec<u8>, PlatformError>;
}

pub trait Platform: Send + Sync + 'static {
    type Credential: KeyCredential;

    fn is_supported(&self) -> Result<bool, PlatformError>;

    /// Create a credential under `name`. An existing credential is never
    /// replaced: a taken name reports `CredentialAlreadyExists`.
    fn request_create(&self, name: &str) -> Result<Self::Credential, PlatformError>;

    fn open(&self, name: &str) -> Result<Self::Credential, PlatformError>;
}

#[cfg(windows)]
pub type SystemPlatform = hello::WindowsHello;
#[cfg(not(windows))]
pub type SystemPlatform = unsupported::Unsupported;

/// The credential store of the host this process runs on.
pub fn system() -> SystemPlatform {
    #[cfg(windows)]
    {
        hello::WindowsHello
    }
    #[cfg(not(windows))]
    {
        unsupported::Unsupported
    }
}
