use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::run_config::{Probability, SleepRange};

/// Returns `true` with probability `p`. Every call is an independent draw.
pub fn decide_to_send<R: Rng + ?Sized>(rng: &mut R, probability: Probability) -> bool {
    rng.gen_bool(probability.get())
}

/// Draws uniformly from the inclusive range `[min, max]`.
pub fn pick_sleep_interval<R: Rng + ?Sized>(rng: &mut R, range: SleepRange) -> u32 {
    rng.gen_range(range.min()..=range.max())
}

/// Source of the random decisions one virtual user makes.
pub trait RandomPolicy: Send + Sync {
    fn decide_to_send(&mut self, probability: Probability) -> bool;
    fn pick_sleep_interval(&mut self, range: SleepRange) -> u32;
}

/// [`RandomPolicy`] backed by a generator owned by a single user.
#[derive(Debug)]
pub struct UniformPolicy<R> {
    rng: R,
}

impl<R: Rng> UniformPolicy<R> {
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send + Sync> RandomPolicy for UniformPolicy<R> {
    fn decide_to_send(&mut self, probability: Probability) -> bool {
        decide_to_send(&mut self.rng, probability)
    }

    fn pick_sleep_interval(&mut self, range: SleepRange) -> u32 {
        pick_sleep_interval(&mut self.rng, range)
    }
}

/// Hands each virtual user its own policy so no generator is shared.
pub trait PolicySource: Send + Sync {
    fn policy_for(&self, user_id: usize) -> Box<dyn RandomPolicy>;
}

/// Gives every user an independent [`StdRng`].
///
/// Without a seed each generator is seeded from OS entropy. With a seed, user
/// `i` is seeded with `seed + i`, which makes a whole run reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropyPolicySource {
    seed: Option<u64>,
}

impl EntropyPolicySource {
    #[must_use]
    pub const fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }
}

impl PolicySource for EntropyPolicySource {
    fn policy_for(&self, user_id: usize) -> Box<dyn RandomPolicy> {
        let rng = match self.seed {
            Some(seed) => {
                let offset = u64::try_from(user_id).unwrap_or(u64::MAX);
                StdRng::seed_from_u64(seed.wrapping_add(offset))
            }
            None => StdRng::from_entropy(),
        };
        Box::new(UniformPolicy::new(rng))
    }
}
