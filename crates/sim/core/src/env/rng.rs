//! Seeded dice for behavior decisions.
//!
//! Roam rolls and camp jitter go through [`RngOracle`] so a scenario replays
//! identically from the same seed.

/// Deterministic random source keyed by an explicit seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Succeeds with `percent` chance. `0` never succeeds, `100` always does.
    fn chance(&self, seed: u64, percent: u8) -> bool {
        self.roll_d100(seed) <= u32::from(percent)
    }

    /// Uniform value in `[-radius, radius]`.
    fn jitter(&self, seed: u64, radius: i32) -> i32 {
        if radius <= 0 {
            return 0;
        }
        let span = (radius as u32) * 2 + 1;
        (self.next_u32(seed) % span) as i32 - radius
    }
}

/// PCG-XSH-RR generator: one LCG step followed by an xorshift and a random
/// rotation, 32-bit output from 64-bit state.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Derives the seed for one roll.
///
/// * `sim_seed` - seed the simulation was started with
/// * `now` - game time of the roll in milliseconds
/// * `actor_id` - actor making the roll
/// * `context` - distinguishes independent rolls made in the same tick
pub fn compute_seed(sim_seed: u64, now: u64, actor_id: u32, context: u32) -> u64 {
    let mut hash = sim_seed;
    hash ^= now.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(actor_id).wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}
