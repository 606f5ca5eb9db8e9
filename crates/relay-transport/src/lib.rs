//! Relay Transport - gRPC transport layer for remote ROS nodes.
//!
//! A relay process hosts a set of named nodes (`camera_node`, `lidar_node`,
//! ...) and exposes them through a single `ExecuteCommand` RPC. This crate
//! provides the controller side of that link, plus a small harness for
//! hosting command handlers behind the same RPC.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐         ┌─────────────────────────┐
//! │     Controller      │         │         Relay           │
//! │                     │  gRPC   │                         │
//! │  ┌───────────────┐  │◄───────►│  ┌───────────────────┐  │
//! │  │  RelayClient  │  │         │  │  RelayGrpcServer  │  │
//! │  └───────────────┘  │         │  └─────────┬─────────┘  │
//! │                     │         │            │            │
//! │                     │         │  ┌─────────▼─────────┐  │
//! │                     │         │  │  CommandHandler   │  │
//! │                     │         │  └───────────────────┘  │
//! └─────────────────────┘         └─────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`client`]: Async and blocking clients for calling the relay
//! - [`server`]: Server harness wrapping a [`server::CommandHandler`]
//! - [`value`]: The closed value model exchanged with nodes
//! - [`codec`]: Request and response payload encoding
//! - [`config`]: Client configuration
//! - [`error`]: Transport-specific error types
//! - [`proto`]: Generated Protocol Buffer types and service definitions
//!
//! # Example
//!
//! ```ignore
//! use relay_transport::{BlockingRelayClient, ClientConfig};
//!
//! let client = BlockingRelayClient::connect(ClientConfig::new("192.168.122.125", 50051))?;
//! client.start_node("camera_node", &[], &Map::new())?;
//! let frame = client.exchange_node("camera_node", &["camera_rgb".into()], &Map::new())?;
//! client.close();
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod server;
pub mod value;

/// Generated Protocol Buffer types and gRPC service definitions.
pub mod proto {
    /// The relay service definitions.
    pub mod relay {
        tonic::include_proto!("relay");
    }
}

pub use client::{BlockingRelayClient, NodeCommand, RelayClient};
pub use codec::CommandPayload;
pub use config::{ClientConfig, ConfigError};
pub use error::{TransportError, TransportResult};
pub use proto::relay::{CommandRequestMessage, CommandResponseMessage};
pub use server::{CommandHandler, RelayGrpcServer};
pub use value::{Map, Value};

/// Node that answers the version probe.
pub const RELAY_NODE: &str = "ros_relay_node";

/// Receive ceiling for responses. Camera frames routinely exceed tonic's
/// 4 MiB default.
pub const DEFAULT_MAX_RECEIVE_MESSAGE_SIZE: usize = 20 * 1024 * 1024;
