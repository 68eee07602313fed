//! An ideal (trusted-dealer) base OT.
//!
//! Choices and chosen messages cross the wire in the clear: this functionality
//! provides no security whatsoever. It exists to exercise the extension in
//! tests and benches without public-key work.

use itybity::{FromBitIterator, ToBits};

use ote_core::Block;

use crate::{io::Channel, BaseOtReceiver, BaseOtSender, OtError, PublicParams};

/// The sending side of the ideal base OT.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdealBaseOtSender;

/// The receiving side of the ideal base OT.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdealBaseOtReceiver;

impl BaseOtSender for IdealBaseOtSender {
    fn send<C: Channel>(
        &mut self,
        channel: &mut C,
        _pp: &PublicParams,
        msgs: &[[Block; 2]],
    ) -> Result<(), OtError> {
        let mut packed = vec![0u8; msgs.len().div_ceil(8)];
        channel.recv_bytes(&mut packed)?;

        let chosen = packed
            .iter_lsb0()
            .take(msgs.len())
            .zip(msgs)
            .map(|(c, [m0, m1])| if c { *m1 } else { *m0 })
            .collect::<Vec<_>>();
        channel.send_blocks(&chosen)?;
        channel.flush()?;

        Ok(())
    }
}

impl BaseOtReceiver for IdealBaseOtReceiver {
    fn receive<C: Channel>(
        &mut self,
        channel: &mut C,
        _pp: &PublicParams,
        choices: &[bool],
    ) -> Result<Vec<Block>, OtError> {
        channel.send_bytes(&Vec::<u8>::from_lsb0_iter(choices.iter().copied()))?;
        channel.flush()?;

        let mut msgs = vec![Block::ZERO; choices.len()];
        channel.recv_blocks(&mut msgs)?;

        Ok(msgs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::duplex;
    use ote_core::prg::Prg;
    use std::thread;

    #[test]
    fn test_ideal_base_ot() {
        let (mut channel_s, mut channel_r) = duplex();
        let pp = PublicParams::default();

        let mut prg = Prg::new();
        let msgs: Vec<[Block; 2]> = (0..128)
            .map(|_| [prg.random_block(), prg.random_block()])
            .collect();
        let mut choices = vec![false; 128];
        prg.random_bools(&mut choices);

        let expected: Vec<Block> = msgs
            .iter()
            .zip(&choices)
            .map(|([m0, m1], c)| if *c { *m1 } else { *m0 })
            .collect();

        let msgs_ = msgs.clone();
        let sender = thread::spawn(move || {
            IdealBaseOtSender
                .send(&mut channel_s, &pp, &msgs_)
                .unwrap();
        });
        let received = IdealBaseOtReceiver
            .receive(&mut channel_r, &pp, &choices)
            .unwrap();
        sender.join().unwrap();

        assert_eq!(received, expected);
    }
}
