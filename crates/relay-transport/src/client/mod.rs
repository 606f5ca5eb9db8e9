//! Client-side gRPC implementations.
//!
//! [`RelayClient`] is the async client; [`BlockingRelayClient`] wraps it in a
//! private runtime for callers that are not async.

mod blocking;
mod relay;

pub use blocking::BlockingRelayClient;
pub use relay::RelayClient;

use std::fmt;

/// Lifecycle and data commands understood by every relay node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCommand {
    Start,
    Stop,
    Reset,
    Exchange,
}

impl NodeCommand {
    /// Command string sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Reset => "reset",
            Self::Exchange => "exchange",
        }
    }
}

impl fmt::Display for NodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_strings() {
        assert_eq!(NodeCommand::Start.as_str(), "start");
        assert_eq!(NodeCommand::Stop.as_str(), "stop");
        assert_eq!(NodeCommand::Reset.as_str(), "reset");
        assert_eq!(NodeCommand::Exchange.to_string(), "exchange");
    }
}
