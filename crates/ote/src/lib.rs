//! Oblivious transfer extension over blocking channels.
//!
//! A small number of public-key base OTs ([`chou_orlandi`]) is stretched into
//! an arbitrarily large batch of transfers using only symmetric primitives
//! ([`iknp`]). Protocols run one complete session per call over any blocking
//! [`io::Channel`]; no state survives a call.
//!
//! # ⚠️ Warning ⚠️
//!
//! The extension is secure against semi-honest adversaries only. The
//! [`ideal`] base OT is insecure by construction and exists for tests and
//! benches.

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod chou_orlandi;
pub mod ideal;
pub mod iknp;
pub mod io;
pub mod params;

pub use ote_core::Block;
pub use params::{ParamsError, PublicParams};

use io::Channel;

/// An oblivious transfer error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum OtError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("sender error: {0}")]
    Sender(Box<dyn std::error::Error + Send + Sync>),
    #[error("receiver error: {0}")]
    Receiver(Box<dyn std::error::Error + Send + Sync>),
}

/// A 1-out-of-2 oblivious transfer sender of 128-bit messages.
///
/// One call runs one complete protocol session over the channel.
pub trait BaseOtSender {
    /// Obliviously transfers one message of each pair to the receiver.
    ///
    /// # Arguments
    ///
    /// * `channel` - The channel to the receiver.
    /// * `pp` - The public parameters agreed with the peer.
    /// * `msgs` - The message pairs to transfer.
    fn send<C: Channel>(
        &mut self,
        channel: &mut C,
        pp: &PublicParams,
        msgs: &[[Block; 2]],
    ) -> Result<(), OtError>;
}

/// A 1-out-of-2 oblivious transfer receiver of 128-bit messages.
pub trait BaseOtReceiver {
    /// Obliviously receives one message per pair, selected by `choices`.
    ///
    /// The j-th output is the message of the j-th pair at index `choices[j]`.
    ///
    /// # Arguments
    ///
    /// * `channel` - The channel to the sender.
    /// * `pp` - The public parameters agreed with the peer.
    /// * `choices` - The receiver's choice bits.
    fn receive<C: Channel>(
        &mut self,
        channel: &mut C,
        pp: &PublicParams,
        choices: &[bool],
    ) -> Result<Vec<Block>, OtError>;
}
