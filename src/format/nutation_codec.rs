//! Packing of nutation multiplier vectors into 64 bit keys.
//!
//! Bits 0 to 14 flag the non-zero multipliers. Bits 15 to 63 hold up to seven
//! 7 bit slots; slot `k` stores `c + 64` for the `k`-th non-zero multiplier
//! `c`, in vector order.

/// Number of multipliers in a vector: γ, five Delaunay, nine planetary.
pub const MULTIPLIERS: usize = 15;

/// Largest number of non-zero multipliers a key can hold.
pub const MAX_NON_ZERO: usize = 7;

/// Smallest encodable multiplier.
pub const MIN_MULTIPLIER: i32 = -64;

/// Largest encodable multiplier.
pub const MAX_MULTIPLIER: i32 = 63;

const MASK_BITS: u32 = MULTIPLIERS as u32;
const SLOT_BITS: u32 = 7;
const SLOT_MASK: u64 = (1 << SLOT_BITS) - 1;

/// Encode a multiplier vector.
///
/// Returns `None` when more than seven multipliers are non-zero or when one
/// of them lies outside `[-64, 63]`.
pub fn encode(multipliers: &[i32; MULTIPLIERS]) -> Option<u64> {
    let mut key = 0u64;
    let mut slot = 0u32;
    for (index, &multiplier) in multipliers.iter().enumerate() {
        if multiplier == 0 {
            continue;
        }
        if slot as usize == MAX_NON_ZERO || !(MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(&multiplier)
        {
            return None;
        }
        key |= 1 << index;
        key |= ((multiplier - MIN_MULTIPLIER) as u64) << (MASK_BITS + SLOT_BITS * slot);
        slot += 1;
    }
    Some(key)
}

/// Decode a key produced by [`encode`].
pub fn decode(key: u64) -> [i32; MULTIPLIERS] {
    let mut multipliers = [0; MULTIPLIERS];
    let mut slot = 0u32;
    for (index, multiplier) in multipliers.iter_mut().enumerate() {
        if key & (1 << index) == 0 {
            continue;
        }
        if slot as usize == MAX_NON_ZERO {
            break;
        }
        let stored = (key >> (MASK_BITS + SLOT_BITS * slot)) & SLOT_MASK;
        *multiplier = stored as i32 + MIN_MULTIPLIER;
        slot += 1;
    }
    multipliers
}
