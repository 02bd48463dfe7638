use rustc_hash::FxHasher;
use std::fmt;
use std::hash::{BuildHasherDefault, Hash, Hasher};

/// Station name borrowed from the mapped input, paired with a hash computed
/// once when the key is built.
///
/// Equality is by content. The stored hash only short-circuits mismatches.
#[derive(Clone, Copy)]
pub struct StationKey<'a> {
    name: &'a [u8],
    hash: u64,
}

impl<'a> StationKey<'a> {
    pub fn new(name: &'a [u8]) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write(name);
        Self {
            name,
            hash: hasher.finish(),
        }
    }

    pub fn name(&self) -> &'a [u8] {
        self.name
    }

    pub fn precomputed_hash(&self) -> u64 {
        self.hash
    }

    pub fn len(&self) -> usize {
        self.name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl PartialEq for StationKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.name == other.name
    }
}

impl Eq for StationKey<'_> {}

impl Hash for StationKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Debug for StationKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StationKey")
            .field("name", &String::from_utf8_lossy(self.name))
            .field("hash", &format_args!("{:#018x}", self.hash))
            .finish()
    }
}

/// Hasher for maps keyed by [`StationKey`]: passes the precomputed hash
/// straight through instead of hashing the name again.
#[derive(Default)]
pub struct PrehashedHasher(u64);

impl Hasher for PrehashedHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(byte);
        }
    }

    fn write_u64(&mut self, value: u64) {
        self.0 = value;
    }
}

pub type StationHashBuilder = BuildHasherDefault<PrehashedHasher>;
