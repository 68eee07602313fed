//! Messages for the Chou-Orlandi protocol.

use curve25519_dalek::RistrettoPoint;
use ote_core::Block;
use serde::{Deserialize, Serialize};

/// Sender setup message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SenderSetup {
    /// The sender's public key
    pub public_key: RistrettoPoint,
}

/// Receiver payload message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverPayload {
    /// The receiver's blinded choices.
    pub blinded_choices: Vec<RistrettoPoint>,
}

/// Sender payload message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderPayload {
    /// The sender's ciphertexts
    pub payload: Vec<[Block; 2]>,
}
