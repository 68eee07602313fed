//! The transport contract consumed by the protocols.
//!
//! [`Channel`] is a reliable ordered byte stream with framed transfer of
//! 128-bit blocks, raw bytes, and length-prefixed serialized messages. Any
//! blocking [`Read`] + [`Write`] transport (`TcpStream`, `UnixStream`, ...)
//! is a channel; [`duplex`] provides an in-memory pair for tests and for
//! running both parties in one process.
//!
//! A channel is exclusively owned by one protocol session at a time.

use std::io::{self, Read, Write};
use std::sync::mpsc;

use ote_core::Block;
use serde::{de::DeserializeOwned, Serialize};

/// Upper bound on a single length-prefixed frame.
const MAX_FRAME_LEN: usize = 1024 * 1024;

/// A reliable ordered byte stream with framed block and message transfer.
pub trait Channel {
    /// Writes raw bytes to the peer.
    fn send_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Reads exactly `buf.len()` bytes from the peer.
    fn recv_bytes(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Flushes buffered writes to the peer.
    fn flush(&mut self) -> io::Result<()>;

    /// Writes a vector of blocks, 16 bytes each, in order.
    fn send_blocks(&mut self, blocks: &[Block]) -> io::Result<()> {
        let mut buf = Vec::with_capacity(blocks.len() * Block::LEN);
        for block in blocks {
            buf.extend_from_slice(&block.to_bytes());
        }
        self.send_bytes(&buf)
    }

    /// Reads `blocks.len()` blocks from the peer.
    fn recv_blocks(&mut self, blocks: &mut [Block]) -> io::Result<()> {
        let mut buf = vec![0u8; blocks.len() * Block::LEN];
        self.recv_bytes(&mut buf)?;
        for (block, chunk) in blocks.iter_mut().zip(buf.chunks_exact(Block::LEN)) {
            *block = Block::try_from(chunk).expect("chunk is 16 bytes");
        }
        Ok(())
    }

    /// Writes a length-prefixed frame.
    fn send_frame(&mut self, bytes: &[u8]) -> io::Result<()> {
        if bytes.len() > MAX_FRAME_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "frame too large",
            ));
        }
        self.send_bytes(&(bytes.len() as u32).to_le_bytes())?;
        self.send_bytes(bytes)
    }

    /// Reads a length-prefixed frame.
    fn recv_frame(&mut self) -> io::Result<Vec<u8>> {
        let mut len = [0u8; 4];
        self.recv_bytes(&mut len)?;
        let len = u32::from_le_bytes(len) as usize;
        if len > MAX_FRAME_LEN {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "frame too large"));
        }
        let mut buf = vec![0u8; len];
        self.recv_bytes(&mut buf)?;
        Ok(buf)
    }
}

impl<T: Read + Write> Channel for T {
    fn send_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)
    }

    fn recv_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.read_exact(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}

/// Serializes a message and writes it as a frame.
pub fn send_msg<C, T>(channel: &mut C, msg: &T) -> io::Result<()>
where
    C: Channel + ?Sized,
    T: Serialize,
{
    let bytes = bincode::serialize(msg)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    channel.send_frame(&bytes)
}

/// Reads a frame and deserializes it into a message.
pub fn recv_msg<C, T>(channel: &mut C) -> io::Result<T>
where
    C: Channel + ?Sized,
    T: DeserializeOwned,
{
    let bytes = channel.recv_frame()?;
    bincode::deserialize(&bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// One end of an in-memory duplex channel.
///
/// Reads block until the peer writes; once the peer end is dropped, writes
/// fail with `BrokenPipe` and reads report end-of-stream.
pub struct MemoryChannel {
    tx: mpsc::Sender<Vec<u8>>,
    rx: mpsc::Receiver<Vec<u8>>,
    pending: Vec<u8>,
    offset: usize,
}

/// Creates a connected pair of in-memory channels.
pub fn duplex() -> (MemoryChannel, MemoryChannel) {
    let (tx_a, rx_a) = mpsc::channel();
    let (tx_b, rx_b) = mpsc::channel();
    (
        MemoryChannel {
            tx: tx_a,
            rx: rx_b,
            pending: Vec::new(),
            offset: 0,
        },
        MemoryChannel {
            tx: tx_b,
            rx: rx_a,
            pending: Vec::new(),
            offset: 0,
        },
    )
}

impl Read for MemoryChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.offset == self.pending.len() {
            match self.rx.recv() {
                Ok(bytes) => {
                    self.pending = bytes;
                    self.offset = 0;
                }
                // Peer hung up; report end-of-stream.
                Err(_) => return Ok(0),
            }
        }
        let n = (self.pending.len() - self.offset).min(buf.len());
        buf[..n].copy_from_slice(&self.pending[self.offset..self.offset + n]);
        self.offset += n;
        Ok(n)
    }
}

impl Write for MemoryChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.tx
            .send(buf.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "peer disconnected"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
