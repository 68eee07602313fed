use itybity::ToBits;
use tracing::instrument;
use zeroize::Zeroize;

use ote_core::{aes::FIXED_KEY_AES, prg::Prg, Block};

use crate::{
    iknp::{SenderError, BASE_LEN},
    io::Channel,
    BaseOtReceiver, PublicParams,
};

/// IKNP sender.
///
/// Holds the message pairs of the extended OTs. The sender acts as the
/// *receiver* of the base OTs; the base protocol runs with the roles
/// reversed.
#[derive(Debug, Default)]
pub struct Sender<BaseOt> {
    base: BaseOt,
}

impl<BaseOt> Sender<BaseOt>
where
    BaseOt: BaseOtReceiver,
{
    /// Creates a new sender on top of the provided base OT receiver.
    pub fn new(base: BaseOt) -> Self {
        Sender { base }
    }

    /// Obliviously transfers one message pair per extended OT.
    ///
    /// The receiver learns `m0[i]` or `m1[i]`, selected by its i-th choice
    /// bit. The message count must be a non-zero multiple of 128; the check
    /// fails before any traffic is emitted.
    ///
    /// # Arguments
    ///
    /// * `channel` - The channel to the receiver.
    /// * `pp` - The public parameters agreed with the peer.
    /// * `m0` - The zero-messages.
    /// * `m1` - The one-messages.
    #[instrument(level = "debug", skip_all, err)]
    pub fn send<C: Channel>(
        &mut self,
        channel: &mut C,
        pp: &PublicParams,
        m0: &[Block],
        m1: &[Block],
    ) -> Result<(), SenderError> {
        if m0.len() != m1.len() {
            return Err(SenderError::CountMismatch(m0.len(), m1.len()));
        }
        let (delta, mut rows) = self.setup(channel, pp, m0.len())?;

        let cipher = &(*FIXED_KEY_AES);
        let mut outer0 = Vec::with_capacity(m0.len());
        let mut outer1 = Vec::with_capacity(m1.len());
        for (row, (m0, m1)) in rows.chunks_exact(BASE_LEN / 8).zip(m0.iter().zip(m1)) {
            let q = Block::try_from(row).expect("rows are one block wide");
            outer0.push(*m0 ^ cipher.cr(q));
            outer1.push(*m1 ^ cipher.cr(q ^ delta));
        }
        channel.send_blocks(&outer0)?;
        channel.send_blocks(&outer1)?;
        channel.flush()?;

        rows.zeroize();
        Ok(())
    }

    /// Transfers a single message per extended OT, delivered only where the
    /// receiver chose 1.
    ///
    /// Halves the outer bandwidth of [`send`](Self::send); the unchosen slot
    /// carries no message at all.
    #[instrument(level = "debug", skip_all, err)]
    pub fn send_onesided<C: Channel>(
        &mut self,
        channel: &mut C,
        pp: &PublicParams,
        msgs: &[Block],
    ) -> Result<(), SenderError> {
        let (delta, mut rows) = self.setup(channel, pp, msgs.len())?;

        let cipher = &(*FIXED_KEY_AES);
        let outer = rows
            .chunks_exact(BASE_LEN / 8)
            .zip(msgs)
            .map(|(row, m)| {
                let q = Block::try_from(row).expect("rows are one block wide");
                *m ^ cipher.cr(q ^ delta)
            })
            .collect::<Vec<_>>();
        channel.send_blocks(&outer)?;
        channel.flush()?;

        rows.zeroize();
        Ok(())
    }

    /// Runs the base OTs and the inner column transfer, yielding the
    /// selection block and the row-major extension matrix.
    fn setup<C: Channel>(
        &mut self,
        channel: &mut C,
        pp: &PublicParams,
        count: usize,
    ) -> Result<(Block, Vec<u8>), SenderError> {
        if count == 0 || count % BASE_LEN != 0 {
            return Err(SenderError::InvalidCount(count));
        }
        let row_width = count / 8;

        let mut rng = Prg::new();
        let delta = rng.random_block();
        let choices = delta.iter_lsb0().collect::<Vec<_>>();

        let mut seeds = self.base.receive(channel, pp, &choices)?;
        assert_eq!(seeds.len(), BASE_LEN, "base OT must yield one seed per choice");

        let mut pad_rng = Prg::new();
        let mut columns = vec![0u8; BASE_LEN * row_width];
        let mut inner0 = vec![Block::ZERO; row_width / Block::LEN];
        let mut inner1 = vec![Block::ZERO; row_width / Block::LEN];
        for ((b, seed), column) in choices
            .iter()
            .zip(&seeds)
            .zip(columns.chunks_exact_mut(row_width))
        {
            channel.recv_blocks(&mut inner0)?;
            channel.recv_blocks(&mut inner1)?;

            // Expand the one-time pad directly into the column slot.
            pad_rng.reseed(*seed);
            pad_rng.random_bytes(column);

            let inner = if *b { &inner1 } else { &inner0 };
            for (slot, block) in column.chunks_exact_mut(Block::LEN).zip(inner) {
                for (slot, byte) in slot.iter_mut().zip(block.to_bytes()) {
                    *slot ^= byte;
                }
            }
        }
        seeds.zeroize();

        bit_transpose::transpose_bits(&mut columns, BASE_LEN)
            .expect("dimensions are multiples of 128");

        Ok((delta, columns))
    }
}
