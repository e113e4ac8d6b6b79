use std::num::NonZeroU32;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::util::random_bytes;

const HASH_LEN: usize = 32;
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

// Fixed KDF parameters for the deployment master key. The salt is a domain
// constant, not a secret: uniqueness of the key comes from the configured
// secret. Changing either invalidates every stored ciphertext.
const MASTER_KEY_SALT: &[u8] = b"taller::clave-maestra::v1";
const MASTER_KEY_ITERATIONS: u32 = 100_000;

/// Display value returned when a stored ciphertext cannot be decrypted
/// (key rotation, corrupt column). Callers show it; they never treat it as
/// an absent password.
pub const DECRYPT_ERROR: &str = "Error de desencriptación";

/// Hash a login password with a per-user salt.
pub fn hash_password(secret: &[u8], salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut out = vec![0u8; HASH_LEN];
    let iterations = NonZeroU32::new(iterations).expect("Iterations must be non-zero");
    pbkdf2_hmac::<Sha256>(secret, salt, iterations.get(), &mut out);
    out
}

pub fn verify_password_hash(secret: &[u8], salt: &[u8], expected: &[u8], iterations: u32) -> bool {
    let iterations = NonZeroU32::new(iterations).expect("Iterations must be non-zero");
    if expected.len() != HASH_LEN {
        return false;
    }

    // Derive and constant-time compare.
    let mut out = vec![0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(secret, salt, iterations.get(), &mut out);
    subtle::ConstantTimeEq::ct_eq(out.as_ref(), expected).into()
}

/// Deployment-wide encryption key for device passwords.
///
/// Derived exactly once at process start from the configured secret and
/// handed to handlers by reference; nothing reads ambient configuration at
/// encrypt/decrypt time.
pub struct MasterKey {
    key: [u8; KEY_LEN],
}

impl MasterKey {
    pub fn derive(secret: &str) -> Self {
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(
            secret.as_bytes(),
            MASTER_KEY_SALT,
            MASTER_KEY_ITERATIONS,
            &mut key,
        );
        Self { key }
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }

    /// AES-256-GCM with a fresh random nonce per call; the same plaintext
    /// never produces the same ciphertext twice. Stored form is
    /// base64(nonce || ciphertext).
    pub fn encrypt(&self, plaintext: &str) -> String {
        let nonce_bytes = random_bytes(NONCE_LEN);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher()
            .encrypt(nonce, plaintext.as_bytes())
            .expect("AES-GCM encryption cannot fail with a valid key");

        let mut blob = nonce_bytes;
        blob.extend_from_slice(&ciphertext);
        B64.encode(blob)
    }

    /// Decrypt a stored value. Any failure yields [`DECRYPT_ERROR`] rather
    /// than an error: a lost key must surface as a displayable string, not
    /// break the order view.
    pub fn decrypt(&self, stored: &str) -> String {
        let Ok(blob) = B64.decode(stored.as_bytes()) else {
            return DECRYPT_ERROR.to_string();
        };
        if blob.len() <= NONCE_LEN {
            return DECRYPT_ERROR.to_string();
        }

        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        match self.cipher().decrypt(nonce, ciphertext) {
            Ok(plain) => String::from_utf8(plain).unwrap_or_else(|_| DECRYPT_ERROR.to_string()),
            Err(_) => DECRYPT_ERROR.to_string(),
        }
    }
}
