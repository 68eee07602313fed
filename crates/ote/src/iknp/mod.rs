//! An implementation of the [`IKNP`](https://www.iacr.org/archive/crypto2003/27290145/27290145.pdf) oblivious transfer extension protocol,
//! with the optimizations of [`ALSZ13`](https://eprint.iacr.org/2013/552.pdf) and the fixed-key hashing of [`GKW+19`](https://eprint.iacr.org/2019/074.pdf).
//!
//! 128 base OTs running in the reverse direction are stretched into any
//! multiple of 128 transfers using only a PRG, a bit-matrix transpose, and a
//! correlation-robust hash. One call runs one complete session. On the wire:
//! the base OT sub-protocol first, then the 2·128 encrypted inner columns
//! from receiver to sender (column by column, the zero column before the one
//! column), then the outer ciphertexts from sender to receiver.
//!
//! Both variants share everything up to the outer transfer: the two-sided
//! variant sends both ciphertext vectors, the one-sided variant sends a
//! single vector that only 1-choices can unmask.

mod error;
mod receiver;
mod sender;

pub use error::{ReceiverError, SenderError};
pub use receiver::Receiver;
pub use sender::Sender;

/// Number of base OTs, and the bit width of the extension matrix.
pub const BASE_LEN: usize = 128;

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    use ote_core::prg::Prg;

    use crate::{
        ideal::{IdealBaseOtReceiver, IdealBaseOtSender},
        io::duplex,
        Block, PublicParams,
    };

    fn block(value: u128) -> Block {
        Block::new(value.to_le_bytes())
    }

    fn run_two_sided(m0: Vec<Block>, m1: Vec<Block>, choices: &[bool]) -> Vec<Block> {
        let (mut channel_s, mut channel_r) = duplex();
        let pp = PublicParams::default();

        let sender = thread::spawn(move || {
            Sender::new(IdealBaseOtReceiver)
                .send(&mut channel_s, &pp, &m0, &m1)
                .unwrap();
        });
        let result = Receiver::new(IdealBaseOtSender)
            .receive(&mut channel_r, &pp, choices)
            .unwrap();
        sender.join().unwrap();

        result
    }

    fn run_onesided(msgs: Vec<Block>, choices: &[bool]) -> Vec<Block> {
        let (mut channel_s, mut channel_r) = duplex();
        let pp = PublicParams::default();

        let sender = thread::spawn(move || {
            Sender::new(IdealBaseOtReceiver)
                .send_onesided(&mut channel_s, &pp, &msgs)
                .unwrap();
        });
        let result = Receiver::new(IdealBaseOtSender)
            .receive_onesided(&mut channel_r, &pp, choices)
            .unwrap();
        sender.join().unwrap();

        result
    }

    #[test]
    fn test_extension_all_zero_choices() {
        let m0 = (0..128).map(block).collect::<Vec<_>>();
        let m1 = (0..128).map(|i| block(i ^ 0xff)).collect::<Vec<_>>();

        let result = run_two_sided(m0.clone(), m1, &vec![false; 128]);

        assert_eq!(result, m0);
    }

    #[test]
    fn test_extension_all_one_choices() {
        let m0 = (0..128).map(block).collect::<Vec<_>>();
        let m1 = (0..128).map(|i| block(i ^ 0xff)).collect::<Vec<_>>();

        let result = run_two_sided(m0, m1.clone(), &vec![true; 128]);

        assert_eq!(result, m1);
    }

    #[test]
    fn test_extension_alternating_choices() {
        let count = 256;
        let choices = (0..count).map(|i| i % 2 == 1).collect::<Vec<_>>();

        let result = run_two_sided(
            vec![Block::ZERO; count],
            vec![Block::ONES; count],
            &choices,
        );

        for (i, block) in result.iter().enumerate() {
            let expected = if i % 2 == 0 { Block::ZERO } else { Block::ONES };
            assert_eq!(*block, expected, "index {i}");
        }
    }

    #[test]
    fn test_extension_random_batch() {
        let count = 512;
        let mut prg = Prg::new();

        let mut m0 = vec![Block::ZERO; count];
        let mut m1 = vec![Block::ZERO; count];
        let mut choices = vec![false; count];
        prg.random_blocks(&mut m0);
        prg.random_blocks(&mut m1);
        prg.random_bools(&mut choices);

        let result = run_two_sided(m0.clone(), m1.clone(), &choices);

        for (i, c) in choices.iter().enumerate() {
            let expected = if *c { m1[i] } else { m0[i] };
            assert_eq!(result[i], expected, "index {i}");
        }
    }

    #[test]
    fn test_onesided_set_positions() {
        let mut choices = vec![false; 128];
        for i in [0, 7, 63, 127] {
            choices[i] = true;
        }
        let msgs = (0..128).map(block).collect::<Vec<_>>();

        let result = run_onesided(msgs, &choices);

        assert_eq!(result, vec![block(0), block(7), block(63), block(127)]);
    }

    #[test]
    fn test_onesided_random_batch() {
        let count = 256;
        let mut prg = Prg::new();

        let mut msgs = vec![Block::ZERO; count];
        let mut choices = vec![false; count];
        prg.random_blocks(&mut msgs);
        prg.random_bools(&mut choices);

        let expected = msgs
            .iter()
            .zip(&choices)
            .filter(|(_, c)| **c)
            .map(|(m, _)| *m)
            .collect::<Vec<_>>();

        let result = run_onesided(msgs.clone(), &choices);

        assert_eq!(result.len(), choices.iter().filter(|c| **c).count());
        assert_eq!(result, expected);
    }

    #[test]
    fn test_invalid_count_fails_before_io() {
        // The far end is dropped: any I/O attempt would error rather than
        // hang, and the parameter check must fire first.
        let (mut channel, peer) = duplex();
        drop(peer);
        let pp = PublicParams::default();

        let msgs = vec![Block::ZERO; 129];
        let err = Sender::new(IdealBaseOtReceiver)
            .send(&mut channel, &pp, &msgs, &msgs)
            .unwrap_err();
        assert!(matches!(err, SenderError::InvalidCount(129)));

        let err = Receiver::new(IdealBaseOtSender)
            .receive(&mut channel, &pp, &vec![false; 129])
            .unwrap_err();
        assert!(matches!(err, ReceiverError::InvalidCount(129)));

        let err = Receiver::new(IdealBaseOtSender)
            .receive_onesided(&mut channel, &pp, &[])
            .unwrap_err();
        assert!(matches!(err, ReceiverError::InvalidCount(0)));
    }

    #[test]
    fn test_message_count_mismatch() {
        let (mut channel, peer) = duplex();
        drop(peer);
        let pp = PublicParams::default();

        let err = Sender::new(IdealBaseOtReceiver)
            .send(
                &mut channel,
                &pp,
                &vec![Block::ZERO; 128],
                &vec![Block::ZERO; 256],
            )
            .unwrap_err();

        assert!(matches!(err, SenderError::CountMismatch(128, 256)));
    }
}
