use sha2::{Digest, Sha256};

/// Number of hex characters of the policy digest used in subject ids.
pub const SUBJECT_ID_DIGEST_LEN: usize = 16;

/// Compute the SHA-256 digest of a policy definition, hex encoded.
///
/// The text is hashed byte-for-byte: no trimming or newline normalization, so
/// two policies that differ only in whitespace get different digests.
pub fn policy_digest(policy: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(policy.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
