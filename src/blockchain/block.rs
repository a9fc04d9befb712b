use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 over `height ∥ nonce ∥ data`, where height and nonce are
/// rendered as decimal text. Returned as lowercase hex.
pub fn digest(height: u64, nonce: u64, data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(height.to_string().as_bytes());
    hasher.update(nonce.to_string().as_bytes());
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// True when `hash` starts with `difficulty` `'0'` characters.
pub fn is_valid_hash(hash: &str, difficulty: u32) -> bool {
    let d = difficulty as usize;
    hash.len() >= d && hash.bytes().take(d).all(|b| b == b'0')
}

/// A block in the hashing demo. `hash` is derived from height, nonce and data
/// and is recomputed by every mutator; `previous_hash` is display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoBlock {
    pub height: u64,
    pub nonce: u64,
    pub data: String,
    pub previous_hash: String,
    hash: String,
}

impl DemoBlock {
    /// Create an unmined block (nonce 0).
    pub fn new(height: u64, data: impl Into<String>, previous_hash: impl Into<String>) -> Self {
        let data = data.into();
        Self {
            hash: digest(height, 0, data.as_bytes()),
            height,
            nonce: 0,
            data,
            previous_hash: previous_hash.into(),
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn compute_hash(&self) -> String {
        digest(self.height, self.nonce, self.data.as_bytes())
    }

    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
        self.hash = self.compute_hash();
    }

    pub fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
        self.hash = self.compute_hash();
    }

    /// Hash matches the content and satisfies `difficulty`.
    pub fn is_signed(&self, difficulty: u32) -> bool {
        self.hash == self.compute_hash() && is_valid_hash(&self.hash, difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::{DemoBlock, digest, is_valid_hash};

    const KNOWN_HASH: &str = "0000f727854b50bb95c054b39c1fe5c92e5ebcfa4bcb5dc279f56aa96a365e5a";

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(digest(1, 72608, b""), KNOWN_HASH);
        assert_eq!(digest(1, 72608, b""), digest(1, 72608, b""));
    }

    #[test]
    fn digest_of_plain_height() {
        // sha256("10")
        assert_eq!(
            digest(1, 0, b""),
            "4a44dc15364204a80fe80e9039455cc1608281820fe2b24f1e5233ade6af1dd5"
        );
    }

    #[test]
    fn valid_hash_prefix() {
        assert!(is_valid_hash(KNOWN_HASH, 0));
        assert!(is_valid_hash(KNOWN_HASH, 4));
        assert!(!is_valid_hash(KNOWN_HASH, 5));
        assert!(!is_valid_hash("00", 3));
    }

    #[test]
    fn mutators_keep_hash_in_sync() {
        let mut b = DemoBlock::new(1, "", "0");
        b.set_nonce(72608);
        assert_eq!(b.hash(), KNOWN_HASH);
        assert!(b.is_signed(4));

        b.set_data("tampered");
        assert_eq!(b.hash(), b.compute_hash());
        assert!(!b.is_signed(4));
    }

    #[test]
    fn serialized_hash_matches_content() {
        let mut b = DemoBlock::new(2, "hello", "0");
        b.set_nonce(264);
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(
            json["hash"],
            "00e4d59224918bdf512b6f51de566301b6000956d5cfbc269a0e4b4f96625e0f"
        );
        assert!(b.is_signed(2));
    }
}
