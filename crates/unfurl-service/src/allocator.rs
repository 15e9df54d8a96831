use rand::Rng;
use unfurl_core::short_id::{SHORT_ID_ALPHABET, SHORT_ID_LEN};
use unfurl_core::ShortId;

/// Trait for generating candidate short ids.
///
/// Implementations are pure generators that don't interact with storage;
/// uniqueness enforcement (check-and-retry against the store) is the
/// caller's responsibility.
pub trait IdGenerator: Send + Sync + 'static {
    /// Generates one candidate short id.
    fn generate(&self) -> ShortId;
}

/// Generates uniformly random fixed-length ids over the base62 alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> ShortId {
        let mut rng = rand::thread_rng();
        let id: String = (0..SHORT_ID_LEN)
            .map(|_| SHORT_ID_ALPHABET[rng.gen_range(0..SHORT_ID_ALPHABET.len())] as char)
            .collect();
        ShortId::new_unchecked(id)
    }
}
