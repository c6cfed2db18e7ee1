use crate::platform::PlatformError;
use crate::status::{CredentialStatus, EXIT_FAILURE, EXIT_NOT_SUPPORTED, EXIT_PLATFORM_ERROR};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Windows Hello is not supported on this device.")]
    NotSupported,
    #[error("{}", .status.message(.name))]
    Status {
        status: CredentialStatus,
        name: String,
    },
    #[error("Platform: {0}")]
    Platform(String),
    #[error("Public key: {0}")]
    PublicKey(String),
    #[error("Invalid credential name: {0:?}")]
    InvalidName(String),
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Attach the credential name to a platform failure.
    pub fn from_platform(err: PlatformError, name: &str) -> Self {
        match err {
            PlatformError::Status(status) => Error::Status {
                status,
                name: name.to_string(),
            },
            PlatformError::Call(msg) => Error::Platform(msg),
        }
    }

    pub fn status(&self) -> Option<CredentialStatus> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Exit code of `hello-authenticator` for this failure.
    pub fn authenticator_exit_code(&self) -> u8 {
        match self {
            Error::NotSupported => EXIT_NOT_SUPPORTED,
            Error::Status { status, .. } => status.exit_code(),
            Error::InvalidName(_) => EXIT_FAILURE,
            Error::Platform(_) | Error::PublicKey(_) | Error::Io(_) => EXIT_PLATFORM_ERROR,
        }
    }

    /// Exit code of `hello-creator` for this failure. Only a name collision is
    /// distinguished; everything else is a generic creation failure.
    pub fn creator_exit_code(&self) -> u8 {
        match self {
            Error::Status {
                status: CredentialStatus::CredentialAlreadyExists,
                ..
            } => CredentialStatus::CredentialAlreadyExists.exit_code(),
            _ => EXIT_FAILURE,
        }
    }
}
