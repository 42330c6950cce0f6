//! Symmetric cipher seam for the cookie codec.
//!
//! The codec only ever talks to [`Cipher`]; [`DesCipher`] is the shipped
//! implementation, matching the cookie format already deployed. DES/ECB
//! carries no integrity tag: ciphertext corrupted in transit can decrypt to
//! garbage without an error, so the output is confidential, not
//! authenticated.

use des::Des;
use des::cipher::block_padding::Pkcs7;
use des::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// A symmetric transform keyed at construction.
pub trait Cipher {
    fn encrypt(&self, plaintext: &[u8]) -> Vec<u8>;

    /// Fails when the ciphertext length or padding is inconsistent with the
    /// cipher's block structure.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError>;
}

/// The ciphertext does not line up with the cipher's block and padding
/// layout.
#[derive(Debug, Error)]
#[error("ciphertext length or padding is invalid")]
pub struct CipherError;

/// DES in ECB mode with PKCS#7 padding.
pub struct DesCipher {
    key: [u8; 8],
}

impl DesCipher {
    /// Key the cipher from the deployment secret. DES wants exactly eight
    /// key bytes; they are taken from the front of the secret's SHA-256
    /// digest so secrets of any length work.
    pub fn new(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let mut key = [0u8; 8];
        key.copy_from_slice(&digest[..8]);
        Self { key }
    }
}

impl Cipher for DesCipher {
    fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        ecb::Encryptor::<Des>::new(&self.key.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        ecb::Decryptor::<Des>::new(&self.key.into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CipherError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_restores_the_plaintext() {
        let cipher = DesCipher::new("a secret");
        let ciphertext = cipher.encrypt(b"attack at dawn");
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), b"attack at dawn");
    }

    #[test]
    fn ciphertext_is_block_aligned_and_differs_from_plaintext() {
        let cipher = DesCipher::new("a secret");
        let ciphertext = cipher.encrypt(b"bob");
        assert_eq!(ciphertext.len() % 8, 0);
        assert_ne!(&ciphertext[..3], b"bob");
    }

    #[test]
    fn empty_plaintext_still_pads_to_a_full_block() {
        let cipher = DesCipher::new("a secret");
        let ciphertext = cipher.encrypt(b"");
        assert_eq!(ciphertext.len(), 8);
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), b"");
    }

    #[test]
    fn truncated_ciphertext_is_rejected() {
        let cipher = DesCipher::new("a secret");
        let mut ciphertext = cipher.encrypt(b"attack at dawn");
        ciphertext.truncate(7);
        assert!(cipher.decrypt(&ciphertext).is_err());
    }

    #[test]
    fn key_derivation_is_stable_per_secret() {
        let ciphertext = DesCipher::new("a secret").encrypt(b"bob");
        assert_eq!(
            DesCipher::new("a secret").decrypt(&ciphertext).unwrap(),
            b"bob"
        );
    }
}
