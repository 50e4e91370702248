use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses which of an intent's candidate responses is sent.
///
/// `candidates` is always at least one; returned indexes past the end are clamped.
pub trait ResponseSelector {
    fn pick(&mut self, candidates: usize) -> usize;
}

impl<F> ResponseSelector for F
where
    F: FnMut(usize) -> usize,
{
    fn pick(&mut self, candidates: usize) -> usize {
        self(candidates)
    }
}

/// Uniform choice backed by [`StdRng`].
#[derive(Clone, Debug)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Reproducible sequence of choices, for tests and scripted sessions.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseSelector for RandomSelector {
    fn pick(&mut self, candidates: usize) -> usize {
        if candidates <= 1 {
            return 0;
        }
        self.rng.gen_range(0..candidates)
    }
}
