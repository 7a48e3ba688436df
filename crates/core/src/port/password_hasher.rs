// Password Hasher Port

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

/// One-way, deterministic password digest
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> String;

    fn verify(&self, password: &str, hash: &str) -> bool {
        self.hash(password) == hash
    }
}

/// base64(SHA-256(password)), unsalted; always 44 characters
pub struct Sha256PasswordHasher;

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> String {
        STANDARD.encode(Sha256::digest(password.as_bytes()))
    }
}
