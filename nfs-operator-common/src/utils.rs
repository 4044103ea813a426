// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use blake3::hash as blake3_hash;

/// Compute a short, stable hex digest of a string
///
/// # Arguments
/// * `input` - The string to hash
/// * `len` - The number of hex characters to keep, capped at the full digest length
pub fn short_hash(input: &str, len: usize) -> String {
    let hex = blake3_hash(input.as_bytes()).to_hex();
    hex.as_str().chars().take(len).collect()
}
