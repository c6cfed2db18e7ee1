//! WinRT `KeyCredentialManager` backend.

use super::{KeyCredential, Platform, PlatformError};
use crate::status::CredentialStatus;
use windows::Security::Credentials::{
    KeyCredential as WinKeyCredential, KeyCredentialCreationOption, KeyCredentialManager,
    KeyCredentialRetrievalResult, KeyCredentialStatus,
};
use windows::Security::Cryptography::Core::CryptographicPublicKeyBlobType;
use windows::Security::Cryptography::CryptographicBuffer;
use windows::Storage::Streams::{DataReader, IBuffer};
use windows::core::HSTRING;

impl From<windows::core::Error> for PlatformError {
    fn from(e: windows::core::Error) -> Self {
        PlatformError::Call(e.to_string())
    }
}

/// Match by variant: the WinRT ordinals do not line up with the exit-code
/// table.
fn convert_status(status: KeyCredentialStatus) -> CredentialStatus {
    match status {
        KeyCredentialStatus::Success => CredentialStatus::Success,
        KeyCredentialStatus::CredentialAlreadyExists => CredentialStatus::CredentialAlreadyExists,
        KeyCredentialStatus::NotFound => CredentialStatus::NotFound,
        KeyCredentialStatus::SecurityDeviceLocked => CredentialStatus::SecurityDeviceLocked,
        KeyCredentialStatus::UserCanceled => CredentialStatus::UserCanceled,
        KeyCredentialStatus::UserPrefersPassword => CredentialStatus::UserPrefersPassword,
        KeyCredentialStatus::UnknownError => CredentialStatus::UnknownError,
        other => {
            tracing::warn!(status = other.0, "Unrecognised KeyCredentialStatus");
            CredentialStatus::UnknownError
        }
    }
}

fn ibuffer_to_vec(buf: &IBuffer) -> Result<Vec<u8>, PlatformError> {
    let reader = DataReader::FromBuffer(buf)?;
    let len = reader.UnconsumedBufferLength()? as usize;
    let mut bytes = vec![0u8; len];
    reader.ReadBytes(&mut bytes)?;
    Ok(bytes)
}

fn credential_of(result: KeyCredentialRetrievalResult) -> Result<HelloCredential, PlatformError> {
    PlatformError::check(convert_status(result.Status()?))?;
    Ok(HelloCredential(result.Credential()?))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsHello;

#[derive(Clone)]
pub struct HelloCredential(WinKeyCredential);

impl KeyCredential for HelloCredential {
    fn public_key(&self) -> Result<Vec<u8>, PlatformError> {
        let buf = self
            .0
            .RetrievePublicKeyWithBlobType(CryptographicPublicKeyBlobType::X509SubjectPublicKeyInfo)?;
        ibuffer_to_vec(&buf)
    }

    fn request_sign(&self, data: &[u8]) -> Result<Vec<u8>, PlatformError> {
        let buf = CryptographicBuffer::CreateFromByteArray(data)?;
        let result = self.0.RequestSignAsync(&buf)?.get()?;
        PlatformError::check(convert_status(result.Status()?))?;
        ibuffer_to_vec(&result.Result()?)
    }
}

impl Platform for WindowsHello {
    type Credential = HelloCredential;

    fn is_supported(&self) -> Result<bool, PlatformError> {
        Ok(KeyCredentialManager::IsSupportedAsync()?.get()?)
    }

    fn request_create(&self, name: &str) -> Result<HelloCredential, PlatformError> {
        let result = KeyCredentialManager::RequestCreateAsync(
            &HSTRING::from(name),
            KeyCredentialCreationOption::FailIfExists,
        )?
        .get()?;
        credential_of(result)
    }

    fn open(&self, name: &str) -> Result<HelloCredential, PlatformError> {
        let result = KeyCredentialManager::OpenAsync(&HSTRING::from(name))?.get()?;
        credential_of(result)
    }
}
