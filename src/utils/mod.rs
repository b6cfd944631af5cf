pub mod hash_mix;
pub mod safe_cast;

pub use hash_mix::{custom_hash_mix, custom_hash_mix_pair, derive_seed, f64_key, HashMix};
pub use safe_cast::{
    ensure_non_empty, ensure_positive, ensure_present, ensure_size_below, safe_cast, Length,
};

/// Lets other threads do work. A scheduling hint only; it synchronizes nothing.
pub fn chill() {
    std::thread::yield_now();
}
