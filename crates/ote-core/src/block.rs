//! The 128-bit block and its bit-layout conversions.
//!
//! Bit order is LSB-first within each byte, byte 0 first. This layout is part
//! of the wire contract: both peers of a protocol must pack and unpack bits
//! identically or the extension matrices will not line up.

use cipher::{consts::U16, generic_array::GenericArray};
use core::ops::BitXor;
use itybity::{BitIterable, BitLength, FromBitIterator, GetBit, Lsb0, Msb0};
use rand::{distributions::Standard, prelude::Distribution, CryptoRng, Rng};
use serde::{Deserialize, Serialize};

/// A block of 128 bits
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block([u8; 16]);

impl Block {
    /// The length of a block in bytes
    pub const LEN: usize = 16;
    /// A zero block
    pub const ZERO: Self = Self([0; 16]);
    /// A block with all bits set to 1
    pub const ONES: Self = Self([0xff; 16]);

    /// Create a new block
    #[inline]
    pub fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns the byte representation of the block
    #[inline]
    pub fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Generate a random block using the provided RNG
    #[inline]
    pub fn random<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen())
    }

    /// Generate a random vector of blocks using the provided RNG
    #[inline]
    pub fn random_vec<R: Rng + CryptoRng + ?Sized>(rng: &mut R, n: usize) -> Vec<Self> {
        (0..n).map(|_| Self::random(rng)).collect()
    }
}

/// XORs two block slices pointwise.
///
/// # Panics
///
/// Panics if the slices have different lengths.
pub fn xor_vec(a: &[Block], b: &[Block]) -> Vec<Block> {
    assert_eq!(a.len(), b.len(), "block slices must have equal length");
    a.iter().zip(b).map(|(a, b)| *a ^ *b).collect()
}

/// Packs a block vector into its dense bit representation, 16 bytes per block.
///
/// The dense representation of a block is its byte representation: bit i of
/// the block is bit `i % 8` (LSB-first) of byte `i / 8`.
pub fn to_dense_bits(blocks: &[Block]) -> Vec<u8> {
    blocks.iter().flat_map(|block| block.to_bytes()).collect()
}

/// Reads a dense bit representation back into blocks.
///
/// # Panics
///
/// Panics unless the input is a whole number of blocks.
pub fn from_dense_bits(bits: &[u8]) -> Vec<Block> {
    assert_eq!(
        bits.len() % Block::LEN,
        0,
        "dense bits must be a whole number of blocks"
    );
    bits.chunks_exact(Block::LEN)
        .map(|chunk| Block::try_from(chunk).expect("chunk is 16 bytes"))
        .collect()
}

/// Packs a sparse bit vector, one `bool` per bit, into blocks.
///
/// Agrees with [`from_dense_bits`] on the same underlying bits.
///
/// # Panics
///
/// Panics unless the bit count is a multiple of 128.
pub fn from_bools(bits: &[bool]) -> Vec<Block> {
    assert_eq!(
        bits.len() % (Block::LEN * 8),
        0,
        "bit count must be a multiple of 128"
    );
    from_dense_bits(&Vec::<u8>::from_lsb0_iter(bits.iter().copied()))
}

impl BitLength for Block {
    const BITS: usize = 128;
}

impl GetBit<Lsb0> for Block {
    fn get_bit(&self, index: usize) -> bool {
        GetBit::<Lsb0>::get_bit(&self.0[index / 8], index % 8)
    }
}

impl GetBit<Msb0> for Block {
    fn get_bit(&self, index: usize) -> bool {
        GetBit::<Msb0>::get_bit(&self.0[15 - (index / 8)], index % 8)
    }
}

impl BitIterable for Block {}

impl From<[u8; 16]> for Block {
    #[inline]
    fn from(bytes: [u8; 16]) -> Self {
        Block::new(bytes)
    }
}

impl<'a> TryFrom<&'a [u8]> for Block {
    type Error = <[u8; 16] as TryFrom<&'a [u8]>>::Error;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        <[u8; 16]>::try_from(value).map(Self::from)
    }
}

impl From<Block> for GenericArray<u8, U16> {
    #[inline]
    fn from(b: Block) -> Self {
        b.0.into()
    }
}

impl From<GenericArray<u8, U16>> for Block {
    #[inline]
    fn from(b: GenericArray<u8, U16>) -> Self {
        Block::new(b.into())
    }
}

impl From<Block> for [u8; 16] {
    #[inline]
    fn from(b: Block) -> Self {
        b.0
    }
}

impl AsRef<[u8]> for Block {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for Block {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl BitXor for Block {
    type Output = Self;

    #[inline]
    fn bitxor(self, other: Self) -> Self::Output {
        Self(std::array::from_fn(|i| self.0[i] ^ other.0[i]))
    }
}

impl Distribution<Block> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Block {
        Block::new(rng.gen())
    }
}

impl zeroize::DefaultIsZeroes for Block {}
