//! Fixed-key AES and the correlation-robust hash.

use aes::Aes128Enc;
use cipher::{consts::U16, generic_array::GenericArray, BlockEncrypt, KeyInit};
use once_cell::sync::Lazy;

use crate::Block;

/// A fixed AES key (arbitrarily chosen).
///
/// The key is a protocol constant: the correlation-robust hash derived from it
/// is part of the protocol identity and must be identical on both peers.
pub const FIXED_KEY: [u8; 16] = [
    69, 42, 69, 42, 69, 42, 69, 42, 69, 42, 69, 42, 69, 42, 69, 42,
];

/// Fixed-key AES cipher
pub static FIXED_KEY_AES: Lazy<FixedKeyAes> = Lazy::new(|| FixedKeyAes {
    aes: Aes128Enc::new_from_slice(&FIXED_KEY).expect("fixed key is 16 bytes"),
});

/// Fixed-key AES cipher
pub struct FixedKeyAes {
    aes: Aes128Enc,
}

impl FixedKeyAes {
    #[inline]
    fn encrypt(&self, block: Block) -> Block {
        let mut buf: GenericArray<u8, U16> = block.into();
        self.aes.encrypt_block(&mut buf);
        buf.into()
    }

    /// Correlation-robust hash function instantiated using fixed-key AES
    /// (cf. <https://eprint.iacr.org/2019/074>, §7.2).
    ///
    /// `π(x) ⊕ x`, where `π` is instantiated using fixed-key AES.
    #[inline]
    pub fn cr(&self, block: Block) -> Block {
        self.encrypt(block) ^ block
    }

    /// Collapses a vector of blocks to a single block by chaining [`cr`](Self::cr).
    ///
    /// Reduces to `cr` on a single block.
    #[inline]
    pub fn cr_fold(&self, blocks: &[Block]) -> Block {
        blocks
            .iter()
            .fold(Block::ZERO, |acc, &block| self.cr(acc ^ block))
    }
}

/// A wrapper of aes, only for encryption.
#[derive(Clone)]
pub struct AesEncryptor(Aes128Enc);

impl AesEncryptor {
    /// Number of blocks encrypted per batch, always set to 8.
    pub const AES_BLOCK_COUNT: usize = 8;

    /// Initiate an AesEncryptor instance with key.
    #[inline]
    pub fn new(key: Block) -> Self {
        let key: [u8; 16] = key.into();
        AesEncryptor(Aes128Enc::new_from_slice(&key).expect("key is 16 bytes"))
    }

    /// Encrypt a block.
    #[inline]
    pub fn encrypt_block(&self, block: Block) -> Block {
        let mut buf: GenericArray<u8, U16> = block.into();
        self.0.encrypt_block(&mut buf);
        buf.into()
    }

    /// Encrypt many blocks in-place.
    #[inline]
    pub fn encrypt_many_blocks<const N: usize>(&self, blocks: &mut [Block; N]) {
        let mut bufs: [GenericArray<u8, U16>; N] = blocks.map(Into::into);
        self.0.encrypt_blocks(&mut bufs);
        for (block, buf) in blocks.iter_mut().zip(bufs) {
            *block = buf.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // FIPS-197 appendix C.1
    #[test]
    fn test_aes_known_answer() {
        let key = Block::new(std::array::from_fn(|i| i as u8));
        let plaintext = Block::new(std::array::from_fn(|i| (i as u8) * 0x11));
        let expected = Block::new([
            0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
            0xc5, 0x5a,
        ]);

        assert_eq!(AesEncryptor::new(key).encrypt_block(plaintext), expected);
    }

    #[test]
    fn test_aes_many_blocks_matches_single() {
        let aes = AesEncryptor::new(Block::ONES);
        let mut blocks = std::array::from_fn::<_, 8, _>(|i| Block::new([i as u8; 16]));
        let expected = blocks.map(|block| aes.encrypt_block(block));

        aes.encrypt_many_blocks(&mut blocks);

        assert_eq!(blocks, expected);
    }

    #[test]
    fn test_cr_fold_single_block() {
        let cipher = &(*FIXED_KEY_AES);
        let x = Block::new([0xab; 16]);

        assert_eq!(cipher.cr_fold(&[x]), cipher.cr(x));
        assert_ne!(cipher.cr(x), cipher.cr(Block::ZERO));
    }
}
