//! Encoding of the opaque `request` / `response` byte fields.
//!
//! Requests carry `(args, kwargs)`; responses carry a bare result map. Both
//! are postcard over the tagged [`Value`] representation, so floats travel as
//! raw IEEE-754 and byte buffers as length-prefixed bytes.

use crate::error::TransportResult;
use crate::value::{Map, Value};
use serde::{Deserialize, Serialize};

/// Arguments forwarded to a node command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    pub args: Vec<Value>,
    pub kwargs: Map,
}

impl CommandPayload {
    pub fn new(args: Vec<Value>, kwargs: Map) -> Self {
        Self { args, kwargs }
    }

    pub fn encode(&self) -> TransportResult<Vec<u8>> {
        encode_request(&self.args, &self.kwargs)
    }

    /// Decodes a request payload. An empty field means no arguments.
    pub fn decode(bytes: &[u8]) -> TransportResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        Ok(postcard::from_bytes(bytes)?)
    }
}

// Field order must match `CommandPayload`.
#[derive(Serialize)]
struct PayloadRef<'a> {
    args: &'a [Value],
    kwargs: &'a Map,
}

/// Encodes a request payload without taking ownership of the arguments.
pub fn encode_request(args: &[Value], kwargs: &Map) -> TransportResult<Vec<u8>> {
    Ok(postcard::to_stdvec(&PayloadRef { args, kwargs })?)
}

/// Encodes a node's result map.
pub fn encode_result(result: &Map) -> TransportResult<Vec<u8>> {
    Ok(postcard::to_stdvec(result)?)
}

/// Decodes a node's result map. An absent payload decodes to an empty map.
pub fn decode_result(bytes: &[u8]) -> TransportResult<Map> {
    if bytes.is_empty() {
        return Ok(Map::new());
    }
    Ok(postcard::from_bytes(bytes)?)
}
