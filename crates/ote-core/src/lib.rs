//! Core types and primitives for oblivious transfer extension.

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod aes;
pub mod block;
pub mod prg;

pub use block::Block;
