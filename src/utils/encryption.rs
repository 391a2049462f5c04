use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::Aes256Gcm;
use rand::RngCore;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;

type Nonce = [u8; 12];

const FORMAT_VERSION: u8 = 0x01;
const HEADER_LEN: usize = 1 + 12;

/// Cryptographic errors
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Encryption failed: {0}")]
    Encryption(String),
    #[error("Decryption failed: {0}")]
    Decryption(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Base64 decode error: {0}")]
    Base64Decode(String),
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(String),
}

/// AES256-GCM sealing of the stored session
///
/// Sealed format, base64 encoded: `[version_byte][nonce(12)][ciphertext]`
pub struct SessionCipher {
    cipher: Aes256Gcm,
}

impl SessionCipher {
    /// Build from a 64 char hex key
    pub fn from_hex_key(key_hex: &str) -> Result<Self, CryptoError> {
        let key_bytes = hex::decode(key_hex.trim())
            .map_err(|e| CryptoError::InvalidKey(format!("not hex: {}", e)))?;

        let key: [u8; 32] = key_bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey("Encryption key must be 32 bytes (256 bits)".to_string())
        })?;

        Ok(Self {
            cipher: Aes256Gcm::new(&key.into()),
        })
    }

    pub fn seal(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut nonce_bytes: Nonce = [0u8; 12];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt((&nonce_bytes).into(), plaintext.as_bytes())
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;

        let mut sealed = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        sealed.push(FORMAT_VERSION);
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(sealed))
    }

    pub fn open(&self, sealed_b64: &str) -> Result<String, CryptoError> {
        let sealed = BASE64
            .decode(sealed_b64.trim())
            .map_err(|e| CryptoError::Base64Decode(e.to_string()))?;

        if sealed.len() < HEADER_LEN {
            return Err(CryptoError::InvalidData(
                "Sealed session too short (need version + nonce)".to_string(),
            ));
        }

        if sealed[0] != FORMAT_VERSION {
            return Err(CryptoError::InvalidData(format!(
                "Unsupported session format version: {}",
                sealed[0]
            )));
        }

        let nonce: Nonce = sealed[1..HEADER_LEN]
            .try_into()
            .map_err(|_| CryptoError::InvalidData("Failed to extract nonce".to_string()))?;

        let plaintext = self
            .cipher
            .decrypt((&nonce).into(), &sealed[HEADER_LEN..])
            .map_err(|e| CryptoError::Decryption(e.to_string()))?;

        String::from_utf8(plaintext).map_err(|e| CryptoError::Utf8Error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_fresh_nonce_per_seal() {
        let cipher = SessionCipher::from_hex_key(KEY).unwrap();
        let a = cipher.seal("{\"access\":\"tok\"}").unwrap();
        let b = cipher.seal("{\"access\":\"tok\"}").unwrap();
        assert_ne!(a, b);
        assert_eq!(cipher.open(&a).unwrap(), cipher.open(&b).unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = SessionCipher::from_hex_key(KEY).unwrap().seal("secret").unwrap();
        let other = SessionCipher::from_hex_key(&"ab".repeat(32)).unwrap();
        assert!(matches!(other.open(&sealed), Err(CryptoError::Decryption(_))));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            SessionCipher::from_hex_key("abcd"),
            Err(CryptoError::InvalidKey(_))
        ));
        let cipher = SessionCipher::from_hex_key(KEY).unwrap();
        assert!(matches!(cipher.open("AAAA"), Err(CryptoError::InvalidData(_))));
        assert!(matches!(cipher.open("%%%"), Err(CryptoError::Base64Decode(_))));
    }
}
