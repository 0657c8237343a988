//! Blob point samples and the forms they compose

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A single point-mass sample of a galaxy's point cloud.
///
/// Uploaded verbatim as a GPU instance buffer, so the layout must match the
/// point-sprite vertex layout exactly (12-byte position + 4 attribute bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Blob {
    pub position: Vec3,
    /// Index into the 256-entry hue ramp
    pub color_index: u8,
    /// Brightness [0.0, 1.0] packed as a normalized byte
    pub brightness: u8,
    /// LOD bucket exponent; sprites scale by SPRITE_SCALE_FACTOR^power
    pub power: u8,
    pub _pad: u8,
}

impl Blob {
    pub fn new(position: Vec3, color_index: u8, brightness: u8) -> Self {
        Self {
            position,
            color_index,
            brightness,
            power: 0,
            _pad: 0,
        }
    }
}

/// An ordered blob catalog plus the non-uniform scale that turns the
/// unit point cloud into a disk, bar, or ellipsoid.
#[derive(Clone, Debug)]
pub struct GalacticForm {
    pub blobs: Vec<Blob>,
    pub scale: Vec3,
}

/// Assign LOD bucket exponents.
///
/// Blobs are partitioned into buckets of sizes 1, 1, 2, 4, 8, ... 2^k;
/// every blob in bucket k gets `power = k`. Truncating the sequence at any
/// bucket boundary keeps a brightness-ranked prefix.
pub fn assign_powers(blobs: &mut [Blob]) {
    let mut pow2: usize = 1;
    let mut power: u8 = 0;
    for (i, blob) in blobs.iter_mut().enumerate() {
        if i & pow2 != 0 {
            pow2 <<= 1;
            power += 1;
        }
        blob.power = power;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_is_16_bytes() {
        assert_eq!(std::mem::size_of::<Blob>(), 16);
    }

    #[test]
    fn test_power_bucket_invariant() {
        let mut blobs = vec![Blob::new(Vec3::ZERO, 0, 0); 16];
        assign_powers(&mut blobs);
        let powers: Vec<u8> = blobs.iter().map(|b| b.power).collect();
        assert_eq!(powers[..8], [0, 1, 1, 2, 2, 2, 2, 3]);
        // bucket 4 spans indices 8..16
        assert!(powers[8..16].iter().all(|&p| p == 4));
    }

    #[test]
    fn test_bucket_sizes_double() {
        let mut blobs = vec![Blob::new(Vec3::ZERO, 0, 0); 1024];
        assign_powers(&mut blobs);
        // bucket k (k >= 1) has 2^(k-1) members
        for k in 1..=9u8 {
            let count = blobs.iter().filter(|b| b.power == k).count();
            assert_eq!(count, 1 << (k - 1) as usize, "bucket {}", k);
        }
    }
}
