//! Server-side gRPC implementations.
//!
//! This module hosts [`CommandHandler`] implementations behind the relay's
//! `ExecuteCommand` RPC.

mod grpc;

pub use grpc::{CommandHandler, RelayGrpcServer};
