//! Level-of-detail selection over power-of-two blob buckets
//!
//! Blob catalogs are bucketed by [`assign_powers`](super::blob::assign_powers)
//! so that any prefix of the sequence is a well-distributed subsample. The
//! functions here decide how long that prefix is for a given view: the user
//! detail factor scales the raw count, and the per-bucket sprite shrink caps
//! it once a bucket's sprite size would drop below the smallest feature the
//! screen can resolve.

/// Per-bucket sprite shrink factor. Tuned for visual parity; bucket k
/// renders at `base_size * SPRITE_SCALE_FACTOR^k`.
pub const SPRITE_SCALE_FACTOR: f32 = 1.0 / 1.55;

/// Number of blobs selected by the user detail factor in [0, 1]
pub fn detail_count(total: usize, detail: f32) -> usize {
    (total as f32 * detail.clamp(0.0, 1.0)) as usize
}

/// Cap a blob count to the largest power-of-two prefix whose bucket sprite
/// size stays at or above the minimum feature size.
///
/// Bucket k's sprite size is `size * SPRITE_SCALE_FACTOR^k`, so the last
/// visible bucket index is `ln(min/size) / ln(factor)`; the prefix through
/// bucket k holds 2^k blobs.
pub fn capped_count(n_points: usize, size: f32, min_feature_size: f32) -> usize {
    if min_feature_size <= 0.0 || size <= 0.0 {
        return n_points;
    }
    let exponent = ((min_feature_size / size).ln() / SPRITE_SCALE_FACTOR.ln()).max(0.0);
    let prefix = 1usize << (exponent as u32).min(usize::BITS - 1);
    n_points.min(prefix)
}
