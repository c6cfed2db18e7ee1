//! In-process credential store with software RSA keys.
//!
//! Keys match what Windows Hello hands out (RSA, PKCS#1 v1.5 over SHA-256,
//! exported as SubjectPublicKeyInfo), so everything downstream of the
//! platform behaves the same. Statuses can be scripted to exercise the
//! failure paths.

use super::{KeyCredential, Platform, PlatformError};
use crate::status::CredentialStatus;
use rsa::pkcs8::EncodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub const DEFAULT_KEY_BITS: usize = 2048;

#[derive(Default)]
struct State {
    unsupported: AtomicBool,
    locked: AtomicBool,
    keys: Mutex<HashMap<String, Arc<RsaPrivateKey>>>,
    next_sign_failure: Mutex<Option<CredentialStatus>>,
    sign_delay: Mutex<Duration>,
    opens: AtomicUsize,
    signs: AtomicUsize,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl State {
    fn check_unlocked(&self) -> Result<(), PlatformError> {
        if self.locked.load(Ordering::Relaxed) {
            return Err(PlatformError::Status(CredentialStatus::SecurityDeviceLocked));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct SoftwarePlatform {
    state: Arc<State>,
    key_bits: usize,
}

impl Default for SoftwarePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwarePlatform {
    pub fn new() -> Self {
        Self::with_key_bits(DEFAULT_KEY_BITS)
    }

    pub fn with_key_bits(key_bits: usize) -> Self {
        Self {
            state: Arc::new(State::default()),
            key_bits,
        }
    }

    pub fn set_supported(&self, supported: bool) {
        self.state.unsupported.store(!supported, Ordering::Relaxed);
    }

    /// While locked, every create, open and sign reports
    /// `SecurityDeviceLocked`.
    pub fn set_locked(&self, locked: bool) {
        self.state.locked.store(locked, Ordering::Relaxed);
    }

    /// Make the next signature request end with `status` instead of a
    /// signature, as if the user had e.g. cancelled the dialog.
    pub fn fail_next_sign(&self, status: CredentialStatus) {
        *lock(&self.state.next_sign_failure) = Some(status);
    }

    /// Time every signature request spends "waiting for the user".
    pub fn set_sign_delay(&self, delay: Duration) {
        *lock(&self.state.sign_delay) = delay;
    }

    pub fn contains(&self, name: &str) -> bool {
        lock(&self.state.keys).contains_key(name)
    }

    pub fn open_count(&self) -> usize {
        self.state.opens.load(Ordering::Relaxed)
    }

    pub fn sign_count(&self) -> usize {
        self.state.signs.load(Ordering::Relaxed)
    }

    fn credential(&self, key: Arc<RsaPrivateKey>) -> SoftwareCredential {
        SoftwareCredential {
            key,
            state: Arc::clone(&self.state),
        }
    }
}

#[derive(Clone)]
pub struct SoftwareCredential {
    key: Arc<RsaPrivateKey>,
    state: Arc<State>,
}

impl KeyCredential for SoftwareCredential {
    fn public_key(&self) -> Result<Vec<u8>, PlatformError> {
        let der = self
            .key
            .to_public_key()
            .to_public_key_der()
            .map_err(|e| PlatformError::Call(e.to_string()))?;
        Ok(der.as_bytes().to_vec())
    }

    fn request_sign(&self, data: &[u8]) -> Result<Vec<u8>, PlatformError> {
        self.state.signs.fetch_add(1, Ordering::Relaxed);
        self.state.check_unlocked()?;

        let delay = *lock(&self.state.sign_delay);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        if let Some(status) = lock(&self.state.next_sign_failure).take() {
            return Err(PlatformError::Status(status));
        }

        let digest = Sha256::digest(data);
        self.key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| PlatformError::Call(e.to_string()))
    }
}

impl Platform for SoftwarePlatform {
    type Credential = SoftwareCredential;

    fn is_supported(&self) -> Result<bool, PlatformError> {
        Ok(!self.state.unsupported.load(Ordering::Relaxed))
    }

    fn request_create(&self, name: &str) -> Result<SoftwareCredential, PlatformError> {
        self.state.check_unlocked()?;
        if self.contains(name) {
            return Err(PlatformError::Status(
                CredentialStatus::CredentialAlreadyExists,
            ));
        }

        let key = RsaPrivateKey::new(&mut rand::thread_rng(), self.key_bits)
            .map_err(|e| PlatformError::Call(e.to_string()))?;
        let key = Arc::new(key);
        lock(&self.state.keys).insert(name.to_string(), Arc::clone(&key));
        tracing::debug!(name, bits = self.key_bits, "Software credential created");
        Ok(self.credential(key))
    }

    fn open(&self, name: &str) -> Result<SoftwareCredential, PlatformError> {
        self.state.opens.fetch_add(1, Ordering::Relaxed);
        self.state.check_unlocked()?;
        let key = lock(&self.state.keys)
            .get(name)
            .cloned()
            .ok_or(PlatformError::Status(CredentialStatus::NotFound))?;
        Ok(self.credential(key))
    }
}
