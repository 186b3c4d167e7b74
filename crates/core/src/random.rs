//! Random number helpers.
//!
//! Each solve owns a single generator. Seeding it through the config makes a
//! run reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Magnitude of the jitter added to tied priorities.
pub const TIE_BREAK_MAGNITUDE: f64 = 0.1;

/// Creates the solver generator, seeded when `seed` is given.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Small uniform jitter in `[0, 0.1)` used to break ties between equal
/// integer priorities.
pub fn tie_break_noise<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>() * TIE_BREAK_MAGNITUDE
}
