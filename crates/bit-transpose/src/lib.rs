//! Bit-level transpose of dense bit matrices.
//!
//! A matrix of `rows` rows and `columns` bit columns is stored row-major as
//! `rows * columns / 8` bytes, bits LSB-first within each byte. The transpose
//! rewrites the buffer so that bit (i, j) moves to bit (j, i): the buffer
//! becomes `columns` rows of `rows / 8` bytes each.

use thiserror::Error;

/// Transposes a bit matrix in place.
///
/// The number of rows must be a non-zero multiple of 8 and the buffer length
/// a multiple of the number of rows. Runs in time linear in the number of
/// bits, one 8x8 tile at a time.
pub fn transpose_bits(matrix: &mut [u8], rows: usize) -> Result<(), TransposeError> {
    if rows == 0 || rows % 8 != 0 {
        return Err(TransposeError::InvalidNumberOfRows);
    }
    if matrix.len() % rows != 0 {
        return Err(TransposeError::MalformedSlice);
    }

    let row_width = matrix.len() / rows;
    let out_width = rows / 8;
    let mut out = vec![0u8; matrix.len()];

    for tile_row in 0..rows / 8 {
        for tile_col in 0..row_width {
            let mut tile = [0u8; 8];
            for (k, byte) in tile.iter_mut().enumerate() {
                *byte = matrix[(tile_row * 8 + k) * row_width + tile_col];
            }
            let tile = transpose_tile(u64::from_le_bytes(tile)).to_le_bytes();
            for (k, byte) in tile.iter().enumerate() {
                out[(tile_col * 8 + k) * out_width + tile_row] = *byte;
            }
        }
    }

    matrix.copy_from_slice(&out);
    Ok(())
}

// 8x8 bit transpose by recursive delta swaps (Hacker's Delight 7-3). Byte k of
// the word is row k, bits LSB-first, so bit (r, c) sits at position 8r + c and
// each swap exchanges positions p and p + s over the masked pairs.
#[inline]
fn transpose_tile(mut x: u64) -> u64 {
    let mut t;
    t = (x ^ (x >> 7)) & 0x00aa00aa00aa00aa;
    x ^= t ^ (t << 7);
    t = (x ^ (x >> 14)) & 0x0000cccc0000cccc;
    x ^= t ^ (t << 14);
    t = (x ^ (x >> 28)) & 0x00000000f0f0f0f0;
    x ^= t ^ (t << 28);
    x
}

/// Errors that can occur when transposing a bit matrix.
#[derive(Debug, Error, PartialEq)]
pub enum TransposeError {
    /// The number of rows is zero or not a multiple of 8.
    #[error("number of rows must be a non-zero multiple of 8")]
    InvalidNumberOfRows,
    /// The buffer length is not a multiple of the number of rows.
    #[error("provided slice is not of rectangular shape")]
    MalformedSlice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{distributions::Standard, prelude::*};

    fn random_vec<T>(elements: usize) -> Vec<T>
    where
        Standard: Distribution<T>,
    {
        let mut rng = thread_rng();
        (0..elements).map(|_| rng.gen::<T>()).collect()
    }

    fn transpose_naive(data: &[u8], row_width: usize) -> Vec<u8> {
        use itybity::*;

        let bits: Vec<Vec<bool>> = data.chunks(row_width).map(|x| x.to_lsb0_vec()).collect();
        let col_count = bits[0].len();
        let row_count = bits.len();

        let mut bits_: Vec<Vec<bool>> = vec![vec![false; row_count]; col_count];

        #[allow(clippy::needless_range_loop)]
        for j in 0..row_count {
            #[allow(clippy::needless_range_loop)]
            for i in 0..col_count {
                bits_[i][j] = bits[j][i];
            }
        }

        bits_
            .into_iter()
            .flat_map(Vec::<u8>::from_lsb0_iter)
            .collect()
    }

    #[test]
    fn test_transpose_known_answer() {
        let mut matrix = [
            // ------- bits in lsb0
            3u8,   // 1 1 0 0 0 0 0 0
            76u8,  // 0 0 1 1 0 0 1 0
            120u8, // 0 0 0 1 1 1 1 0
            9u8,   // 1 0 0 1 0 0 0 0
            17u8,  // 1 0 0 0 1 0 0 0
            102u8, // 0 1 1 0 0 1 1 0
            53u8,  // 1 0 1 0 1 1 0 0
            125u8, // 1 0 1 1 1 1 1 0
        ];

        let expected = [
            // ------- bits in lsb0
            217u8, // 1 0 0 1 1 0 1 1
            33u8,  // 1 0 0 0 0 1 0 0
            226u8, // 0 1 0 0 0 1 1 1
            142u8, // 0 1 1 1 0 0 0 1
            212u8, // 0 0 1 0 1 0 1 1
            228u8, // 0 0 1 0 0 1 1 1
            166u8, // 0 1 1 0 0 1 0 1
            0u8,   // 0 0 0 0 0 0 0 0
        ];

        transpose_bits(&mut matrix, 8).unwrap();

        assert_eq!(matrix, expected);
    }

    #[test]
    fn test_transpose_matches_naive() {
        let rows = 128;
        let row_width = 32;

        let mut matrix: Vec<u8> = random_vec::<u8>(rows * row_width);
        let naive = transpose_naive(&matrix, row_width);

        transpose_bits(&mut matrix, rows).unwrap();

        assert_eq!(naive, matrix);
    }

    #[test]
    fn test_transpose_involution() {
        let rows = 128;
        let row_width = 64;

        let mut matrix: Vec<u8> = random_vec::<u8>(rows * row_width);
        let original = matrix.clone();

        transpose_bits(&mut matrix, rows).unwrap();
        transpose_bits(&mut matrix, row_width * 8).unwrap();

        assert_eq!(original, matrix);
    }

    #[test]
    fn test_transpose_rejects_bad_dimensions() {
        let mut matrix = vec![0u8; 24];

        assert_eq!(
            transpose_bits(&mut matrix, 12),
            Err(TransposeError::InvalidNumberOfRows)
        );
        assert_eq!(
            transpose_bits(&mut matrix, 16),
            Err(TransposeError::MalformedSlice)
        );
    }
}
