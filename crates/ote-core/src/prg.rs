//! An AES-CTR pseudo-random generator.
//!
//! Output is deterministic in the seed and byte-identical across platforms:
//! the counter is serialized little-endian before encryption. Two peers
//! expanding the same seed always produce the same pad.

use crate::{aes::AesEncryptor, Block};
use rand::Rng;
use rand_core::{
    block::{BlockRng, BlockRngCore},
    CryptoRng, RngCore, SeedableRng,
};

/// Core of the PRG: AES-128 over an incrementing counter.
#[derive(Clone)]
pub struct PrgCore {
    aes: AesEncryptor,
    state: u64,
}

impl BlockRngCore for PrgCore {
    type Item = u32;
    type Results = [u32; 4 * AesEncryptor::AES_BLOCK_COUNT];

    // Computes [AES(state), ..., AES(state + 7)].
    #[inline]
    fn generate(&mut self, results: &mut Self::Results) {
        let mut blocks = [Block::ZERO; AesEncryptor::AES_BLOCK_COUNT];
        for block in blocks.iter_mut() {
            let mut bytes = [0u8; Block::LEN];
            bytes[..8].copy_from_slice(&self.state.to_le_bytes());
            *block = Block::new(bytes);
            self.state += 1;
        }
        self.aes.encrypt_many_blocks(&mut blocks);

        for (chunk, block) in results.chunks_exact_mut(4).zip(blocks) {
            let bytes = block.to_bytes();
            for (word, bytes) in chunk.iter_mut().zip(bytes.chunks_exact(4)) {
                *word = u32::from_le_bytes(bytes.try_into().expect("chunk is 4 bytes"));
            }
        }
    }
}

impl SeedableRng for PrgCore {
    type Seed = Block;

    #[inline]
    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            aes: AesEncryptor::new(seed),
            state: 0,
        }
    }
}

impl CryptoRng for PrgCore {}

/// An AES-CTR PRG keyed by a 128-bit block.
#[derive(Clone)]
pub struct Prg(BlockRng<PrgCore>);

impl RngCore for Prg {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl SeedableRng for Prg {
    type Seed = <PrgCore as SeedableRng>::Seed;

    #[inline]
    fn from_seed(seed: Self::Seed) -> Self {
        Prg(BlockRng::<PrgCore>::from_seed(seed))
    }

    #[inline]
    fn from_rng<R: RngCore>(rng: R) -> Result<Self, rand_core::Error> {
        BlockRng::<PrgCore>::from_rng(rng).map(Prg)
    }
}

impl CryptoRng for Prg {}

impl Prg {
    /// Creates a Prg seeded from OS entropy.
    #[inline]
    pub fn new() -> Self {
        Prg::from_seed(rand::random::<Block>())
    }

    /// Replaces the entire generator state with one derived from `seed`.
    ///
    /// Nothing carries over from before the reseed: the output stream is
    /// identical to a generator freshly constructed from the same seed.
    #[inline]
    pub fn reseed(&mut self, seed: Block) {
        *self = Prg::from_seed(seed);
    }

    /// Generate a random bool value.
    #[inline]
    pub fn random_bool(&mut self) -> bool {
        self.gen()
    }

    /// Fill a bool slice with random values.
    #[inline]
    pub fn random_bools(&mut self, buf: &mut [bool]) {
        for bit in buf.iter_mut() {
            *bit = self.gen();
        }
    }

    /// Generate a random byte value.
    #[inline]
    pub fn random_byte(&mut self) -> u8 {
        self.gen()
    }

    /// Fill a byte slice with random values.
    #[inline]
    pub fn random_bytes(&mut self, buf: &mut [u8]) {
        self.fill_bytes(buf);
    }

    /// Generate a random block.
    #[inline]
    pub fn random_block(&mut self) -> Block {
        let mut bytes = [0u8; Block::LEN];
        self.fill_bytes(&mut bytes);
        Block::new(bytes)
    }

    /// Fill a block slice with random values.
    #[inline]
    pub fn random_blocks(&mut self, buf: &mut [Block]) {
        for block in buf.iter_mut() {
            *block = self.random_block();
        }
    }

    /// Returns a uniformly random `rows` x `cols` bit matrix.
    ///
    /// The buffer is laid out column-major: column j of the logical matrix
    /// occupies the byte range `[j * rows / 8, (j + 1) * rows / 8)`, bits
    /// LSB-first within each byte. `rows` must be a multiple of 8.
    #[inline]
    pub fn random_bit_matrix(&mut self, rows: usize, cols: usize) -> Vec<u8> {
        debug_assert_eq!(rows % 8, 0);
        let mut matrix = vec![0u8; rows * cols / 8];
        self.fill_bytes(&mut matrix);
        matrix
    }
}

impl Default for Prg {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // First counter block under the zero key is AES(0^128), the FIPS-197
    // zero-key vector. Pins the counter serialization across platforms.
    #[test]
    fn test_prg_known_answer() {
        let mut prg = Prg::from_seed(Block::ZERO);
        let mut out = [0u8; 16];
        prg.fill_bytes(&mut out);

        assert_eq!(
            out,
            [
                0x66, 0xe9, 0x4b, 0xd4, 0xef, 0x8a, 0x2c, 0x3b, 0x88, 0x4c, 0xfa, 0x59, 0xca,
                0x34, 0x2b, 0x2e
            ]
        );
    }

    #[test]
    fn test_prg_deterministic() {
        let seed = Block::new([7; 16]);
        let mut a = Prg::from_seed(seed);
        let mut b = Prg::from_seed(seed);

        let mut out_a = [0u8; 333];
        let mut out_b = [0u8; 333];
        a.fill_bytes(&mut out_a);
        b.fill_bytes(&mut out_b);

        assert_eq!(out_a.to_vec(), out_b.to_vec());
    }

    #[test]
    fn test_reseed_replaces_state() {
        let seed = Block::new([3; 16]);

        let mut reseeded = Prg::from_seed(Block::ONES);
        let mut burn = [0u8; 100];
        reseeded.fill_bytes(&mut burn);
        reseeded.reseed(seed);

        let mut fresh = Prg::from_seed(seed);

        let mut out_a = [0u8; 256];
        let mut out_b = [0u8; 256];
        reseeded.fill_bytes(&mut out_a);
        fresh.fill_bytes(&mut out_b);

        assert_eq!(out_a.to_vec(), out_b.to_vec());
    }

    #[test]
    fn test_random_blocks_distinct() {
        let mut prg = Prg::new();
        let mut blocks = vec![Block::ZERO; 2];
        prg.random_blocks(&mut blocks);

        assert_ne!(blocks[0], blocks[1]);
    }

    #[test]
    fn test_random_bit_matrix_size() {
        let mut prg = Prg::new();
        let matrix = prg.random_bit_matrix(256, 128);

        assert_eq!(matrix.len(), 256 * 128 / 8);
    }
}
