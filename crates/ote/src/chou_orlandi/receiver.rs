use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_TABLE,
    ristretto::{RistrettoBasepointTable, RistrettoPoint},
    scalar::Scalar,
};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use tracing::instrument;

use ote_core::Block;

use crate::{
    chou_orlandi::{
        hash_point,
        msgs::{ReceiverPayload, SenderPayload, SenderSetup},
        ReceiverError,
    },
    io::{self, Channel},
    BaseOtReceiver, OtError, PublicParams,
};

/// A [CO15](https://eprint.iacr.org/2015/267.pdf) receiver.
pub struct Receiver {
    rng: ChaCha20Rng,
    /// Number of OTs received so far, used as the key derivation tweak offset.
    counter: usize,
}

opaque_debug::implement!(Receiver);

impl Receiver {
    /// Creates a new receiver.
    pub fn new() -> Self {
        Receiver {
            rng: ChaCha20Rng::from_entropy(),
            counter: 0,
        }
    }

    /// Creates a new receiver with the provided RNG seed.
    ///
    /// # Arguments
    ///
    /// * `seed` - The RNG seed
    pub fn new_with_seed(seed: [u8; 32]) -> Self {
        Receiver {
            rng: ChaCha20Rng::from_seed(seed),
            counter: 0,
        }
    }

    /// Runs one complete receiving session over the channel.
    ///
    /// # Arguments
    ///
    /// * `channel` - The channel to the sender.
    /// * `choices` - The receiver's choices.
    #[instrument(level = "debug", skip_all, err)]
    fn receive_msgs<C: Channel>(
        &mut self,
        channel: &mut C,
        choices: &[bool],
    ) -> Result<Vec<Block>, ReceiverError> {
        let SenderSetup { public_key } = io::recv_msg(channel)?;
        let base_table = RistrettoBasepointTable::create(&public_key);

        let private_keys = choices
            .iter()
            .map(|_| Scalar::random(&mut self.rng))
            .collect::<Vec<_>>();

        let (blinded_choices, decryption_keys) =
            compute_decryption_keys(&base_table, &private_keys, choices, self.counter);
        self.counter += choices.len();

        io::send_msg(channel, &ReceiverPayload { blinded_choices })?;
        channel.flush()?;

        let SenderPayload { payload } = io::recv_msg(channel)?;
        if payload.len() != choices.len() {
            return Err(ReceiverError::CountMismatch(choices.len(), payload.len()));
        }

        Ok(decryption_keys
            .into_iter()
            .zip(payload)
            .map(|((c, key), [ct0, ct1])| if c { key ^ ct1 } else { key ^ ct0 })
            .collect())
    }
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseOtReceiver for Receiver {
    fn receive<C: Channel>(
        &mut self,
        channel: &mut C,
        _pp: &PublicParams,
        choices: &[bool],
    ) -> Result<Vec<Block>, OtError> {
        Ok(self.receive_msgs(channel, choices)?)
    }
}

/// Computes the blinded choices `B` and the decryption keys for the OT receiver.
///
/// # Arguments
///
/// * `base_table` - A Ristretto basepoint table from the sender's public key
/// * `private_keys` - The private keys of the OT receiver
/// * `choices` - The choices of the OT receiver
/// * `offset` - The number of OTs that have already been performed
///   (used for the key derivation tweak)
fn compute_decryption_keys(
    base_table: &RistrettoBasepointTable,
    private_keys: &[Scalar],
    choices: &[bool],
    offset: usize,
) -> (Vec<RistrettoPoint>, Vec<(bool, Block)>) {
    let zero = &Scalar::ZERO * base_table;
    let one = &Scalar::ONE * base_table;

    private_keys
        .iter()
        .zip(choices)
        .enumerate()
        .map(|(i, (b, &c))| {
            // blinded_choice is B in [ref1]
            //
            // if c = 0: B = g ^ b
            // if c = 1: B = A * g ^ b
            //
            // when choice is 0, we add the zero element to keep constant time.
            let blinded_choice = if c {
                one + b * RISTRETTO_BASEPOINT_TABLE
            } else {
                zero + b * RISTRETTO_BASEPOINT_TABLE
            };

            let decryption_key = hash_point(&(b * base_table), (offset + i) as u128);

            (blinded_choice, (c, decryption_key))
        })
        .unzip()
}
