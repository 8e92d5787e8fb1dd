//! State Fingerprints
//!
//! SHA-256 over the simulation's values, fed in a fixed order behind a
//! domain tag. Used to check a replay against the recorded session and to
//! tag log lines.

use sha2::{Digest, Sha256};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

const STATE_DOMAIN: &[u8] = b"SLASH_DUEL_STATE_V1";
const RECORDING_DOMAIN: &[u8] = b"SLASH_DUEL_RECORDING_V1";

/// A value with a fixed byte encoding for hashing.
pub trait HashField {
    /// Feed this value's bytes to `sha`.
    fn feed(&self, sha: &mut Sha256);
}

impl HashField for u8 {
    fn feed(&self, sha: &mut Sha256) {
        sha.update([*self]);
    }
}

impl HashField for bool {
    fn feed(&self, sha: &mut Sha256) {
        u8::from(*self).feed(sha);
    }
}

impl HashField for u32 {
    fn feed(&self, sha: &mut Sha256) {
        sha.update(self.to_le_bytes());
    }
}

impl HashField for u64 {
    fn feed(&self, sha: &mut Sha256) {
        sha.update(self.to_le_bytes());
    }
}

// Bit pattern, so -0.0 and 0.0 hash differently.
impl HashField for f64 {
    fn feed(&self, sha: &mut Sha256) {
        self.to_bits().feed(sha);
    }
}

/// Order-sensitive hasher with a domain tag.
pub struct StateHasher {
    sha: Sha256,
}

impl StateHasher {
    /// Start a hash under `domain`.
    pub fn new(domain: &[u8]) -> Self {
        let mut sha = Sha256::new();
        sha.update(domain);
        Self { sha }
    }

    /// Hasher for `GameState`.
    pub fn for_game_state() -> Self {
        Self::new(STATE_DOMAIN)
    }

    /// Hasher for recorded action lists.
    pub fn for_recording() -> Self {
        Self::new(RECORDING_DOMAIN)
    }

    /// Append one value.
    #[inline]
    pub fn write<T: HashField>(&mut self, value: T) -> &mut Self {
        value.feed(&mut self.sha);
        self
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.sha.update(bytes);
        self
    }

    /// Finish.
    pub fn finalize(self) -> StateHash {
        self.sha.finalize().into()
    }
}

/// Hash a game state: round and clock first, then whatever `body` adds.
pub fn compute_state_hash<F>(round: u32, timer: u32, body: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_game_state();
    hasher.write(round).write(timer);
    body(&mut hasher);
    hasher.finalize()
}

/// First six bytes as hex, for log lines.
pub fn short_hex(hash: &StateHash) -> String {
    hex::encode(&hash[..6])
}
