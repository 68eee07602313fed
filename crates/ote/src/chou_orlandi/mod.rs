//! An implementation of the Chou-Orlandi [`CO15`](https://eprint.iacr.org/2015/267.pdf) oblivious transfer protocol.
//!
//! Used as the base OT of the extension: 128 instances of 128-bit messages
//! are the only public-key work of a session.

mod error;
pub mod msgs;
mod receiver;
mod sender;

pub use error::{ReceiverError, SenderError};
pub use receiver::Receiver;
pub use sender::Sender;

use blake3::Hasher;
use curve25519_dalek::ristretto::RistrettoPoint;
use ote_core::Block;
use serde::{Deserialize, Serialize};

/// Public parameters of the base OT.
///
/// CO15 over ristretto255 requires no trusted setup; the marker exists so the
/// serialized parameter layout has a slot for base OT configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParams;

/// Hashes a ristretto point to a symmetric key
pub(crate) fn hash_point(point: &RistrettoPoint, tweak: u128) -> Block {
    // Compute H(tweak || point)
    let mut h = Hasher::new();
    h.update(&tweak.to_be_bytes());
    h.update(point.compress().as_bytes());
    let digest = h.finalize();
    let digest: &[u8; 32] = digest.as_bytes();

    // Copy the first 16 bytes into a Block
    let mut block = [0u8; 16];
    block.copy_from_slice(&digest[..16]);
    block.into()
}
