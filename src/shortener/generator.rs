use rand::RngExt;

/// Symbols a short ID is drawn from: ASCII letters and digits.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_LENGTH: usize = 6;

/// Path segments served by the router itself. A short ID equal to one of
/// these would be unreachable.
const RESERVED_IDS: &[&str] = &["health", "api"];

/// Source of candidate short IDs.
///
/// Candidates are not assumed unique; the allocator checks every one
/// against the store.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniform random IDs of a fixed length over [`ALPHABET`].
#[derive(Debug, Clone)]
pub struct RandomIdGenerator {
    length: usize,
}

impl RandomIdGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    fn draw(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        loop {
            let candidate = self.draw();
            if !is_reserved(&candidate) {
                return candidate;
            }
        }
    }
}

pub fn is_reserved(id: &str) -> bool {
    RESERVED_IDS.contains(&id)
}
