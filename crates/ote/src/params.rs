//! Public parameters shared by both peers.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::chou_orlandi;

/// Public parameters of an extension session.
///
/// Set up once and shared between the peers; both must hold byte-identical
/// serialized values. Parameters are immutable and may be shared read-only
/// across concurrent sessions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParams {
    /// Parameters of the base OT protocol.
    pub base_ot: chou_orlandi::PublicParams,
    /// Whether to run the malicious-secure variant.
    ///
    /// Carried on the wire but currently unused: the protocol is semi-honest
    /// only. Do not infer malicious security from the flag.
    pub malicious: bool,
}

impl PublicParams {
    /// Serializes the parameters to a byte stream, little-endian packed.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), ParamsError> {
        Ok(bincode::serialize_into(writer, self)?)
    }

    /// Deserializes parameters from a byte stream.
    pub fn read_from<R: Read>(reader: R) -> Result<Self, ParamsError> {
        Ok(bincode::deserialize_from(reader)?)
    }
}

/// Error returned when public parameters fail to (de)serialize.
#[derive(Debug, thiserror::Error)]
#[error("malformed public parameters: {0}")]
pub struct ParamsError(#[from] bincode::Error);
