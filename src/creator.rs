//! `hello-creator`: make a key credential and export its public key.

use crate::config::{self, CreatorConfig, ExistingPolicy};
use crate::error::{Error, Result};
use crate::platform::{KeyCredential, Platform, PlatformError};
use crate::status::{CredentialStatus, EXIT_FAILURE, EXIT_SUCCESS};
use crate::{prompt, public_key};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A fresh credential was created.
    Created,
    /// The name was taken; the existing credential was exported instead.
    Reused,
}

#[derive(Debug, Clone)]
pub struct CreateOutcome {
    pub origin: Origin,
    pub pem_path: PathBuf,
    pub public_key: Vec<u8>,
}

impl CreateOutcome {
    /// A reused credential still wrote the file but is reported with the
    /// collision code so callers can tell the difference.
    pub fn exit_code(&self) -> u8 {
        match self.origin {
            Origin::Created => EXIT_SUCCESS,
            Origin::Reused => CredentialStatus::CredentialAlreadyExists.exit_code(),
        }
    }
}

/// Create credential `name` and write its public key to `<out_dir>/<name>.pem`.
///
/// Names that cannot be a file stem are refused before the platform is
/// asked for anything, so no credential is left behind without its PEM.
/// No file is written unless the key could be exported.
pub fn create_credential<P: Platform>(
    platform: &P,
    name: &str,
    out_dir: &Path,
    policy: ExistingPolicy,
) -> Result<CreateOutcome> {
    let name = config::validate_name(name)?;
    public_key::check_file_stem(name)?;

    if !platform
        .is_supported()
        .map_err(|e| Error::from_platform(e, name))?
    {
        return Err(Error::NotSupported);
    }

    let (credential, origin) = match platform.request_create(name) {
        Ok(credential) => (credential, Origin::Created),
        Err(PlatformError::Status(CredentialStatus::CredentialAlreadyExists))
            if policy == ExistingPolicy::Reuse =>
        {
            tracing::info!(name, "Credential exists, exporting the existing key");
            let credential = platform
                .open(name)
                .map_err(|e| Error::from_platform(e, name))?;
            (credential, Origin::Reused)
        }
        Err(e) => return Err(Error::from_platform(e, name)),
    };

    let public_key = credential
        .public_key()
        .map_err(|e| Error::from_platform(e, name))?;
    let pem_path = public_key::write_pem_file(out_dir, name, &public_key)?;
    tracing::info!(name, path = %pem_path.display(), ?origin, "Public key exported");

    Ok(CreateOutcome {
        origin,
        pem_path,
        public_key,
    })
}

/// Run `hello-creator` and return its exit code. `input`/`output` are the
/// terminal, used for the interactive prompt and for status messages.
pub fn run<P, R, W>(cfg: &CreatorConfig, platform: &P, input: &mut R, output: &mut W) -> u8
where
    P: Platform,
    R: BufRead,
    W: Write,
{
    let interactive = cfg.name.is_none();
    let name = match &cfg.name {
        Some(name) => name.clone(),
        None => match prompt::ask_name(input, output) {
            Ok(name) => name,
            Err(e) => {
                tracing::error!("Cannot read the credential name: {e}");
                return EXIT_FAILURE;
            }
        },
    };

    let code = match create_credential(platform, &name, &cfg.out_dir, cfg.on_exists) {
        Ok(outcome) => {
            let shown = outcome.pem_path.display();
            let written = match outcome.origin {
                Origin::Created => writeln!(
                    output,
                    "Done. The public credential key is written in '{shown}'"
                ),
                Origin::Reused => writeln!(
                    output,
                    "Warning: The credential '{}' already exists. Its public key is written in '{shown}'",
                    name.trim()
                ),
            };
            if let Err(e) = written {
                tracing::warn!("Cannot print the result: {e}");
            }
            outcome.exit_code()
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Credential creation failed");
            if let Err(write_err) = writeln!(output, "Error: {e}") {
                tracing::warn!("Cannot print the error: {write_err}");
            }
            e.creator_exit_code()
        }
    };

    if interactive {
        if let Err(e) = prompt::wait_for_enter(input, output) {
            tracing::warn!("Cannot wait for acknowledgement: {e}");
        }
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::software::SoftwarePlatform;

    #[test]
    fn test_blank_name_is_rejected_before_platform() {
        let platform = SoftwarePlatform::with_key_bits(1024);
        platform.set_supported(false);
        let dir = tempfile::tempdir().unwrap();
        let err = create_credential(&platform, "  \n", dir.path(), ExistingPolicy::Reuse)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidName(_)));
        assert_eq!(err.creator_exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_path_like_name_is_rejected_before_create() {
        let platform = SoftwarePlatform::with_key_bits(1024);
        let dir = tempfile::tempdir().unwrap();
        let err = create_credential(&platform, "team/svc-key", dir.path(), ExistingPolicy::Reuse)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidName(_)));
        assert_eq!(err.creator_exit_code(), EXIT_FAILURE);
        assert!(!platform.contains("team/svc-key"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_unwritable_output_keeps_exit_code() {
        let platform = SoftwarePlatform::with_key_bits(1024);
        let dir = tempfile::tempdir().unwrap();
        let cfg = CreatorConfig {
            name: Some("svc-key".into()),
            verbose: 0,
            out_dir: dir.path().to_path_buf(),
            on_exists: ExistingPolicy::Reuse,
        };
        let mut input = std::io::Cursor::new(Vec::new());

        assert_eq!(run(&cfg, &platform, &mut input, &mut BrokenPipe), EXIT_SUCCESS);
        assert!(public_key::pem_path(dir.path(), "svc-key").exists());
        assert_eq!(run(&cfg, &platform, &mut input, &mut BrokenPipe), 171);

        platform.set_supported(false);
        assert_eq!(run(&cfg, &platform, &mut input, &mut BrokenPipe), EXIT_FAILURE);
    }

    #[test]
    fn test_unsupported_writes_nothing() {
        let platform = SoftwarePlatform::with_key_bits(1024);
        platform.set_supported(false);
        let dir = tempfile::tempdir().unwrap();
        let err = create_credential(&platform, "k", dir.path(), ExistingPolicy::Reuse)
            .unwrap_err();
        assert!(matches!(err, Error::NotSupported));
        assert_eq!(err.creator_exit_code(), EXIT_FAILURE);
        assert!(!public_key::pem_path(dir.path(), "k").exists());
    }

    #[test]
    fn test_locked_device_is_generic_failure() {
        let platform = SoftwarePlatform::with_key_bits(1024);
        platform.set_locked(true);
        let dir = tempfile::tempdir().unwrap();
        let err = create_credential(&platform, "k", dir.path(), ExistingPolicy::Reuse)
            .unwrap_err();
        assert_eq!(err.status(), Some(CredentialStatus::SecurityDeviceLocked));
        assert_eq!(err.creator_exit_code(), EXIT_FAILURE);
        assert!(!public_key::pem_path(dir.path(), "k").exists());
    }
}
