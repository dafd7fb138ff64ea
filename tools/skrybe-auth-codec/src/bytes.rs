//! Big-endian ABI word reader.

use alloy_primitives::U256;

/// ABI word size.
pub const WORD: usize = 32;

pub fn read_u256_be(bytes: &[u8], i: &mut usize) -> Option<U256> {
    if bytes.len() < *i + WORD {
        return None;
    }
    let out = U256::from_be_slice(&bytes[*i..*i + WORD]);
    *i += WORD;
    Some(out)
}
