//! Admin key check
//!
//! The key is a single shared placeholder secret. Candidates are compared by
//! BLAKE3 digest, whose equality is constant-time; a candidate passes exactly
//! when it equals the configured string.

/// Digest of the configured admin secret
#[derive(Debug, Clone)]
pub struct AdminKey {
    digest: blake3::Hash,
}

impl AdminKey {
    pub fn new(secret: &str) -> Self {
        Self {
            digest: blake3::hash(secret.as_bytes()),
        }
    }

    pub fn verify(&self, candidate: &str) -> bool {
        blake3::hash(candidate.as_bytes()) == self.digest
    }
}
