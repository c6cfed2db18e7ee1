use super::{KeyCredential, Platform, PlatformError};

const NOT_AVAILABLE: &str = "Windows Hello is only available on Windows hosts";

/// Backend for hosts without Windows Hello. Reports itself unsupported and
/// refuses every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

/// Uninhabited: no credential can ever be opened here.
#[derive(Debug, Clone)]
pub enum NoCredential {}

impl KeyCredential for NoCredential {
    fn public_key(&self) -> Result<Vec<u8>, PlatformError> {
        match *self {}
    }

    fn request_sign(&self, _data: &[u8]) -> Result<Vec<u8>, PlatformError> {
        match *self {}
    }
}

impl Platform for Unsupported {
    type Credential = NoCredential;

    fn is_supported(&self) -> Result<bool, PlatformError> {
        Ok(false)
    }

    fn request_create(&self, _name: &str) -> Result<NoCredential, PlatformError> {
        Err(PlatformError::Call(NOT_AVAILABLE.into()))
    }

    fn open(&self, _name: &str) -> Result<NoCredential, PlatformError> {
        Err(PlatformError::Call(NOT_AVAILABLE.into()))
    }
}
