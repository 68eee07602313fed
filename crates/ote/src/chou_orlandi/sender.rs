use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_TABLE, ristretto::RistrettoPoint, scalar::Scalar,
};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use tracing::instrument;

use ote_core::Block;

use crate::{
    chou_orlandi::{
        hash_point,
        msgs::{ReceiverPayload, SenderPayload, SenderSetup},
        SenderError,
    },
    io::{self, Channel},
    BaseOtSender, OtError, PublicParams,
};

/// A [CO15](https://eprint.iacr.org/2015/267.pdf) sender.
pub struct Sender {
    /// The private_key is random `a` in [ref1]
    private_key: Scalar,
    /// The public_key is `A == g^a` in [ref1]
    public_key: RistrettoPoint,
    /// Number of OTs sent so far, used as the key derivation tweak offset.
    counter: usize,
}

opaque_debug::implement!(Sender);

impl Sender {
    /// Creates a new sender with a fresh key pair.
    pub fn new() -> Self {
        let mut rng = ChaCha20Rng::from_entropy();
        let private_key = Scalar::random(&mut rng);
        Sender {
            private_key,
            public_key: &private_key * RISTRETTO_BASEPOINT_TABLE,
            counter: 0,
        }
    }

    /// Creates a new sender with the provided RNG seed
    ///
    /// # Arguments
    ///
    /// * `seed` - The RNG seed
    pub fn new_with_seed(seed: [u8; 32]) -> Self {
        let mut rng = ChaCha20Rng::from_seed(seed);
        let private_key = Scalar::random(&mut rng);
        Sender {
            private_key,
            public_key: &private_key * RISTRETTO_BASEPOINT_TABLE,
            counter: 0,
        }
    }

    /// Runs one complete sending session over the channel.
    ///
    /// # Arguments
    ///
    /// * `channel` - The channel to the receiver.
    /// * `msgs` - The message pairs to obliviously transfer.
    #[instrument(level = "debug", skip_all, err)]
    fn send_msgs<C: Channel>(
        &mut self,
        channel: &mut C,
        msgs: &[[Block; 2]],
    ) -> Result<(), SenderError> {
        io::send_msg(
            channel,
            &SenderSetup {
                public_key: self.public_key,
            },
        )?;
        channel.flush()?;

        let ReceiverPayload { blinded_choices } = io::recv_msg(channel)?;
        if blinded_choices.len() != msgs.len() {
            return Err(SenderError::CountMismatch(
                msgs.len(),
                blinded_choices.len(),
            ));
        }

        let mut payload = compute_encryption_keys(
            &self.private_key,
            &self.public_key,
            &blinded_choices,
            self.counter,
        );
        self.counter += msgs.len();

        // Encrypt the inputs
        for (input, payload) in msgs.iter().zip(payload.iter_mut()) {
            payload[0] = input[0] ^ payload[0];
            payload[1] = input[1] ^ payload[1];
        }

        io::send_msg(channel, &SenderPayload { payload })?;
        channel.flush()?;

        Ok(())
    }
}

impl Default for Sender {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseOtSender for Sender {
    fn send<C: Channel>(
        &mut self,
        channel: &mut C,
        _pp: &PublicParams,
        msgs: &[[Block; 2]],
    ) -> Result<(), OtError> {
        Ok(self.send_msgs(channel, msgs)?)
    }
}

/// Computes the encryption keys for the sender.
///
/// # Arguments
///
/// * `private_key` - The sender's private key.
/// * `public_key` - The sender's public key.
/// * `blinded_choices` - The receiver's blinded choices.
/// * `offset` - The number of OTs that have already been performed
///   (used for the key derivation tweak)
fn compute_encryption_keys(
    private_key: &Scalar,
    public_key: &RistrettoPoint,
    blinded_choices: &[RistrettoPoint],
    offset: usize,
) -> Vec<[Block; 2]> {
    // ys is A^a in [ref1]
    let ys = private_key * public_key;

    blinded_choices
        .iter()
        .enumerate()
        .map(|(i, blinded_choice)| {
            // yr is B^a in [ref1]
            let yr = private_key * blinded_choice;
            let k0 = hash_point(&yr, (offset + i) as u128);
            // yr - ys == (B/A)^a in [ref1]
            let k1 = hash_point(&(yr - ys), (offset + i) as u128);

            [k0, k1]
        })
        .collect()
}
