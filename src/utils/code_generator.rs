//! Short code generation.
//!
//! Candidate codes are drawn uniformly at random from the 62-symbol
//! alphanumeric alphabet. A generated code is not unique by itself; the
//! shortening engine checks the store and retries on collision.

use rand::distr::{Alphanumeric, SampleString};

/// Source of candidate short codes.
///
/// Behind a trait so the engine's collision handling can be exercised with a
/// scripted generator in tests.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces one candidate code. Stateless and side-effect free.
    fn generate(&self) -> String;
}

/// Generator producing fixed-length random alphanumeric codes.
///
/// With the default length of 6 the code space holds 62^6 (about 5.7e10)
/// values, so collisions are rare but possible and left to the caller.
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// Creates a generator emitting codes of exactly `length` characters.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        Alphanumeric.sample_string(&mut rand::rng(), self.length)
    }
}
