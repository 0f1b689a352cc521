use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x6a09e667f3bcc909;

/// Marker written in place of an absent child slot.
pub(crate) const NULL_CHILD_KEY: u32 = u32::MAX;

/// Append-only buffer of fixed-width key fields.
#[derive(Clone, Debug, Default)]
pub struct KeyBuilder {
    words: Vec<u32>,
}

impl KeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add32(&mut self, v: u32) {
        self.words.push(v);
    }

    pub fn add_bool(&mut self, v: bool) {
        self.add32(u32::from(v));
    }

    pub fn add_f32(&mut self, v: f32) {
        self.add32(v.to_bits());
    }

    /// Number of words written so far.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn finish(self) -> ProgramKey {
        ProgramKey { words: self.words }
    }
}

/// Serialized program-variant key. Equal keys select the same compiled program.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProgramKey {
    words: Vec<u32>,
}

impl ProgramKey {
    /// Key of the tree rooted at `root`.
    pub fn of(root: &crate::EffectNode) -> Self {
        let mut b = KeyBuilder::new();
        root.add_to_key(&mut b);
        b.finish()
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Stable 128-bit digest of the key words.
    pub fn fingerprint(&self) -> ProgramFingerprint {
        let mut h = Xxh3::with_seed(XXH3_SEED);
        h.update(&(self.words.len() as u64).to_le_bytes());
        for w in &self.words {
            h.update(&w.to_le_bytes());
        }
        let v = h.digest128();
        ProgramFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

/// Cache handle derived from a [`ProgramKey`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for ProgramFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codegen/key.rs"]
mod tests;
