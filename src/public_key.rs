use crate::error::{Error, Result};
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

pub const PEM_LABEL: &str = "PUBLIC KEY";

/// Armor a DER SubjectPublicKeyInfo as a `PUBLIC KEY` PEM block.
pub fn encode_pem(spki_der: &[u8]) -> String {
    let block = pem::Pem::new(PEM_LABEL, spki_der.to_vec());
    pem::encode_config(
        &block,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Extract the DER body of a `PUBLIC KEY` PEM block.
pub fn decode_pem(text: &str) -> Result<Vec<u8>> {
    let block = pem::parse(text).map_err(|e| Error::PublicKey(format!("bad PEM: {e}")))?;
    if block.tag() != PEM_LABEL {
        return Err(Error::PublicKey(format!(
            "expected {PEM_LABEL} PEM block, got {}",
            block.tag()
        )));
    }
    Ok(block.contents().to_vec())
}

/// Reject names that would not stay a plain file name inside the output
/// directory.
pub fn check_file_stem(name: &str) -> Result<()> {
    if name.contains(['/', '\\', ':']) || name.chars().any(char::is_control) {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Path the public key of credential `name` is exported to.
pub fn pem_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.pem"))
}

/// Write `<dir>/<name>.pem`, replacing any previous export.
pub fn write_pem_file(dir: &Path, name: &str, spki_der: &[u8]) -> Result<PathBuf> {
    let path = pem_path(dir, name);
    std::fs::write(&path, encode_pem(spki_der))?;
    Ok(path)
}

/// Check an RSA PKCS#1 v1.5 / SHA-256 signature against an exported PEM.
/// `Ok(false)` means the key parsed but the signature does not match.
pub fn verify_signature(pem_text: &str, payload: &[u8], signature: &[u8]) -> Result<bool> {
    let der = decode_pem(pem_text)?;
    let key = RsaPublicKey::from_public_key_der(&der)
        .map_err(|e| Error::PublicKey(format!("not an RSA public key: {e}")))?;
    let hashed = Sha256::digest(payload);
    Ok(key
        .verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, signature)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_has_armor_lines() {
        let text = encode_pem(b"abcd");
        assert!(text.starts_with("-----BEGIN PUBLIC KEY-----\n"));
        assert!(text.ends_with("-----END PUBLIC KEY-----\n"));
        assert!(!text.contains('\r'));
        assert_eq!(decode_pem(&text).unwrap(), b"abcd");
    }

    #[test]
    fn test_decode_rejects_wrong_label() {
        let text = "-----BEGIN CERTIFICATE-----\nYWJjZA==\n-----END CERTIFICATE-----\n";
        assert!(matches!(decode_pem(text), Err(Error::PublicKey(_))));
    }

    #[test]
    fn test_file_stem_rejects_path_components() {
        for name in ["team/svc-key", "../svc-key", "..\\svc-key", "C:svc-key", "a\nb"] {
            assert!(
                matches!(check_file_stem(name), Err(Error::InvalidName(_))),
                "{name:?}"
            );
        }
        for name in ["svc-key", "pam_wsl_hello_alice", "svc.key", "..key"] {
            assert!(check_file_stem(name).is_ok(), "{name:?}");
        }
    }

    #[test]
    fn test_verify_rejects_non_rsa_body() {
        let text = encode_pem(b"not a key");
        assert!(verify_signature(&text, b"hello", b"sig").is_err());
    }
}
