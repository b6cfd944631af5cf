//! Order-sensitive integer mixing.
//!
//! The accumulator is a fixed 64-bit word on every platform. Inputs are
//! limited to types that widen losslessly into `u64`; `usize`, `u128` and
//! signed values have to pass through `safe_cast` first, so there is no
//! implicit truncation anywhere in the mixing path.
//!
//! This is the only source of derived random seeds and of functional
//! fingerprints.

use crate::error::Result;
use crate::types::RandomSeedT;
use crate::utils::safe_cast::ensure_non_empty;

const MIX_MULTIPLIER: u64 = 0xdc3e_b94a_f8ab_4c93;
const MIX_ROTATION: u32 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashMix {
    hash: u64,
}

impl HashMix {
    pub fn new() -> Self {
        Self { hash: 1 }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            hash: seed.wrapping_add(83),
        }
    }

    pub fn mix(&mut self, value: u64) {
        self.hash = self
            .hash
            .wrapping_mul(MIX_MULTIPLIER)
            .rotate_left(MIX_ROTATION)
            .wrapping_add(value);
    }

    pub fn get(&self) -> u64 {
        self.hash
    }
}

impl Default for HashMix {
    fn default() -> Self {
        Self::new()
    }
}

/// IEEE-754 bit pattern with `-0.0` folded into `0.0` and every NaN into one
/// canonical NaN, so equal-behaving values always mix the same.
pub fn f64_key(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

/// Hash-mixes a non-empty sequence of numbers.
pub fn custom_hash_mix<N>(numbers: &[N]) -> Result<u64>
where
    N: Into<u64> + Copy,
{
    ensure_non_empty(numbers, "numbers to mix")?;
    let mut mix = HashMix::new();
    for &number in numbers {
        mix.mix(number.into());
    }
    Ok(mix.get())
}

/// Same as `custom_hash_mix(&[first, second])`.
pub fn custom_hash_mix_pair<N>(first: N, second: N) -> u64
where
    N: Into<u64>,
{
    let mut mix = HashMix::new();
    mix.mix(first.into());
    mix.mix(second.into());
    mix.get()
}

/// Seed for the `branch`-th child of `parent`.
pub fn derive_seed(parent: RandomSeedT, branch: RandomSeedT) -> RandomSeedT {
    custom_hash_mix_pair(parent, branch)
}
