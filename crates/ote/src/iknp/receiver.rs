use tracing::instrument;
use zeroize::Zeroize;

use ote_core::{aes::FIXED_KEY_AES, block, prg::Prg, Block};

use crate::{
    iknp::{ReceiverError, BASE_LEN},
    io::Channel,
    BaseOtSender, PublicParams,
};

/// IKNP receiver.
///
/// Holds the choice bits of the extended OTs and acts as the *sender* of the
/// base OTs.
#[derive(Debug, Default)]
pub struct Receiver<BaseOt> {
    base: BaseOt,
}

impl<BaseOt> Receiver<BaseOt>
where
    BaseOt: BaseOtSender,
{
    /// Creates a new receiver on top of the provided base OT sender.
    pub fn new(base: BaseOt) -> Self {
        Receiver { base }
    }

    /// Obliviously receives one message per choice bit.
    ///
    /// The i-th output is the sender's `m0[i]` or `m1[i]`, selected by
    /// `choices[i]`. The choice count must be a non-zero multiple of 128; the
    /// check fails before any traffic is emitted.
    ///
    /// # Arguments
    ///
    /// * `channel` - The channel to the sender.
    /// * `pp` - The public parameters agreed with the peer.
    /// * `choices` - The receiver's choice bits.
    #[instrument(level = "debug", skip_all, err)]
    pub fn receive<C: Channel>(
        &mut self,
        channel: &mut C,
        pp: &PublicParams,
        choices: &[bool],
    ) -> Result<Vec<Block>, ReceiverError> {
        let mut rows = self.setup(channel, pp, choices)?;

        let mut outer0 = vec![Block::ZERO; choices.len()];
        let mut outer1 = vec![Block::ZERO; choices.len()];
        channel.recv_blocks(&mut outer0)?;
        channel.recv_blocks(&mut outer1)?;

        let cipher = &(*FIXED_KEY_AES);
        let result = rows
            .chunks_exact(BASE_LEN / 8)
            .zip(choices)
            .zip(outer0.iter().zip(&outer1))
            .map(|((row, b), (c0, c1))| {
                let t = Block::try_from(row).expect("rows are one block wide");
                let outer = if *b { *c1 } else { *c0 };
                outer ^ cipher.cr(t)
            })
            .collect();

        rows.zeroize();
        Ok(result)
    }

    /// One-sided variant: receives the message for every 1-choice, in choice
    /// order.
    ///
    /// 0-choices are discarded; the result length equals the number of set
    /// choice bits.
    #[instrument(level = "debug", skip_all, err)]
    pub fn receive_onesided<C: Channel>(
        &mut self,
        channel: &mut C,
        pp: &PublicParams,
        choices: &[bool],
    ) -> Result<Vec<Block>, ReceiverError> {
        let mut rows = self.setup(channel, pp, choices)?;

        let mut outer = vec![Block::ZERO; choices.len()];
        channel.recv_blocks(&mut outer)?;

        let cipher = &(*FIXED_KEY_AES);
        let result = rows
            .chunks_exact(BASE_LEN / 8)
            .zip(choices)
            .zip(outer)
            .filter(|((_, b), _)| **b)
            .map(|((row, _), e)| {
                let t = Block::try_from(row).expect("rows are one block wide");
                e ^ cipher.cr(t)
            })
            .collect();

        rows.zeroize();
        Ok(result)
    }

    /// Draws the random matrix and key seeds, runs the base OTs, and
    /// transfers the inner columns, yielding the row-major extension matrix.
    fn setup<C: Channel>(
        &mut self,
        channel: &mut C,
        pp: &PublicParams,
        choices: &[bool],
    ) -> Result<Vec<u8>, ReceiverError> {
        let count = choices.len();
        if count == 0 || count % BASE_LEN != 0 {
            return Err(ReceiverError::InvalidCount(count));
        }
        let row_width = count / 8;

        let mut rng = Prg::new();
        let mut matrix = rng.random_bit_matrix(count, BASE_LEN);
        let mut seeds0 = vec![Block::ZERO; BASE_LEN];
        let mut seeds1 = vec![Block::ZERO; BASE_LEN];
        rng.random_blocks(&mut seeds0);
        rng.random_blocks(&mut seeds1);

        let mut pairs = seeds0
            .iter()
            .zip(&seeds1)
            .map(|(k0, k1)| [*k0, *k1])
            .collect::<Vec<_>>();
        self.base.send(channel, pp, &pairs)?;
        pairs.zeroize();

        let choice_blocks = block::from_bools(choices);

        let mut pad_rng = Prg::new();
        let mut pad = vec![Block::ZERO; row_width / Block::LEN];
        for ((seed0, seed1), column) in seeds0
            .iter()
            .zip(&seeds1)
            .zip(matrix.chunks_exact(row_width))
        {
            let column = block::from_dense_bits(column);

            pad_rng.reseed(*seed0);
            pad_rng.random_blocks(&mut pad);
            let inner0 = block::xor_vec(&column, &pad);
            channel.send_blocks(&inner0)?;

            pad_rng.reseed(*seed1);
            pad_rng.random_blocks(&mut pad);
            let inner1 = column
                .iter()
                .zip(&choice_blocks)
                .zip(&pad)
                .map(|((t, b), p)| *t ^ *b ^ *p)
                .collect::<Vec<_>>();
            channel.send_blocks(&inner1)?;
        }
        channel.flush()?;
        seeds0.zeroize();
        seeds1.zeroize();

        bit_transpose::transpose_bits(&mut matrix, BASE_LEN)
            .expect("dimensions are multiples of 128");

        Ok(matrix)
    }
}
