//! Constant-time byte comparison
//!
//! A length mismatch returns `false` without inspecting contents. Lengths of
//! stored digests are public (they are in the PHC string), so only the
//! content comparison has to run in constant time.

use subtle::ConstantTimeEq;

/// Compare two byte slices without a data-dependent early exit
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
