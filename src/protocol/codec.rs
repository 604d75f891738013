//! Datagram Codec
//!
//! Envelopes are encoded with bincode, the same framing the gossip layer used, and
//! must fit in a single UDP datagram. Decoding is bounded by the same limit so a
//! corrupt length prefix cannot trigger a large allocation.

use super::types::Envelope;
use crate::error::{ClusterError, ClusterResult};
use bincode::Options;

/// Largest encoded envelope accepted on send or receive.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_DATAGRAM_SIZE as u64)
}

pub fn encode(envelope: &Envelope) -> ClusterResult<Vec<u8>> {
    let size = bincode::serialized_size(envelope)? as usize;
    if size > MAX_DATAGRAM_SIZE {
        return Err(ClusterError::Oversized(size, MAX_DATAGRAM_SIZE));
    }
    Ok(options().serialize(envelope)?)
}

pub fn decode(bytes: &[u8]) -> ClusterResult<Envelope> {
    Ok(options().deserialize(bytes)?)
}
