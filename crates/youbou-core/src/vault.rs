//! Reversible encryption of submitter identifiers.
//!
//! Uses XChaCha20-Poly1305 with a random 24-byte nonce per identifier.
//! Key size: 32 bytes. Tag: 16 bytes.
//!
//! Sealed wire format, URL-safe base64 without padding:
//!   [ nonce (24 bytes) | ciphertext + tag ]
//!
//! The key lives only in process memory. A restart generates a new key, after
//! which identifiers sealed by the previous process can no longer be opened.

use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chacha20poly1305::{aead::Aead, Key, KeyInit, XChaCha20Poly1305, XNonce};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::{
    error::{Result, YoubouError},
    models::EncryptedUserId,
};

/// Key length in bytes.
pub const KEY_LEN: usize = 32;

const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;

/// Seals and opens submitter identifiers with a single process-lifetime key.
pub struct IdentityVault {
    cipher: XChaCha20Poly1305,
}

impl IdentityVault {
    /// Creates a vault with a fresh key from the operating system CSPRNG.
    pub fn generate() -> Self {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(&mut key[..]);
        Self::from_key(&key)
    }

    /// Creates a vault from existing key material.
    pub fn from_key(key: &[u8; KEY_LEN]) -> Self {
        Self { cipher: XChaCha20Poly1305::new(Key::from_slice(key)) }
    }

    /// Creates a vault from a URL-safe base64 (unpadded) encoding of a
    /// 32-byte key, so sealed identifiers survive restarts.
    ///
    /// # Errors
    ///
    /// Returns `YoubouError::InvalidKey` if the value does not decode to
    /// exactly [`KEY_LEN`] bytes.
    pub fn from_encoded_key(encoded: &str) -> Result<Self> {
        let decoded = Zeroizing::new(
            URL_SAFE_NO_PAD.decode(encoded.trim()).map_err(|_| YoubouError::InvalidKey)?,
        );
        let key: &[u8; KEY_LEN] =
            decoded.as_slice().try_into().map_err(|_| YoubouError::InvalidKey)?;

        Ok(Self::from_key(key))
    }

    /// Seals an identifier. Every call uses a new nonce, so sealing the same
    /// identifier twice yields different output.
    ///
    /// # Errors
    ///
    /// Returns `YoubouError::Encryption` if the cipher rejects the input.
    pub fn encrypt(&self, identifier: &str) -> Result<EncryptedUserId> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(XNonce::from_slice(&nonce), identifier.as_bytes())
            .map_err(|_| YoubouError::Encryption)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(EncryptedUserId::new(URL_SAFE_NO_PAD.encode(sealed)))
    }

    /// Opens an identifier sealed by this vault.
    ///
    /// # Errors
    ///
    /// Returns `YoubouError::Decryption` if the value is not valid base64, is
    /// too short to hold a nonce and tag, was sealed under another key, was
    /// modified, or does not decrypt to UTF-8.
    pub fn decrypt(&self, sealed: &EncryptedUserId) -> Result<String> {
        let bytes =
            URL_SAFE_NO_PAD.decode(sealed.as_str()).map_err(|_| YoubouError::Decryption)?;

        if bytes.len() < NONCE_LEN + TAG_LEN {
            return Err(YoubouError::Decryption);
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| YoubouError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| YoubouError::Decryption)
    }
}

impl fmt::Debug for IdentityVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityVault").finish_non_exhaustive()
    }
}
