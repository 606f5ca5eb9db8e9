use relay_transport::{NodeCommand, TransportError};
use thiserror::Error;

/// Errors surfaced by grouped environment operations.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Client setup or payload decoding failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A node gave no answer while the environment runs in strict mode.
    #[error("node {node} did not respond to {command}")]
    NoResponse { node: String, command: NodeCommand },
}
