use rand::SeedableRng;
use rand::rngs::StdRng;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const fn fnv1a_extend(mut state: u64, bytes: &[u8]) -> u64 {
    let mut i = 0;
    while i < bytes.len() {
        state ^= bytes[i] as u64;
        state = state.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    state
}

/// Deterministically derive a 64-bit seed for `table.column`.
pub const fn column_seed(table: &str, column: &str, seed: u64) -> u64 {
    let mut state = FNV_OFFSET_BASIS;
    state = fnv1a_extend(state, table.as_bytes());
    state = fnv1a_extend(state, b".");
    state = fnv1a_extend(state, column.as_bytes());
    state.wrapping_add(seed)
}

/// Create a deterministic RNG for a specific table + column combination.
///
/// Uses a const FNV-1a hash for `"table.column"`, then adds the user seed.
/// This ensures each column gets a unique but reproducible value sequence.
pub fn column_rng(table: &str, column: &str, seed: u64) -> StdRng {
    StdRng::seed_from_u64(column_seed(table, column, seed))
}
