//! Unique visit codes

use rand::Rng;

/// Characters a code is drawn from
pub const CODE_ALPHABET: &[u8] = b"1234567890ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const CODE_LENGTH: usize = 6;

/// Generate a random check-in code, e.g. `7KQ2ZD`
pub fn generate_unique_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
