//! gRPC server implementation for the relay service.
//!
//! This module implements the `RpcCommunicator` service defined in the
//! protocol buffers, decoding each command payload and delegating to a
//! [`CommandHandler`].

use crate::codec::{self, CommandPayload};
use crate::error::TransportError;
use crate::proto::relay::{
    rpc_communicator_server::{RpcCommunicator, RpcCommunicatorServer},
    CommandRequestMessage, CommandResponseMessage,
};
use crate::value::Map;
use crate::DEFAULT_MAX_RECEIVE_MESSAGE_SIZE;
use async_trait::async_trait;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};
use tracing::{debug, info, instrument, warn};

/// Handler trait for relay commands.
///
/// Implement this trait to provide the nodes behind a relay. The gRPC server
/// decodes payloads and delegates every command to the handler.
#[async_trait]
pub trait CommandHandler: Send + Sync + 'static {
    /// Version reported in every response.
    fn version(&self) -> &str;

    /// Runs `command` against `node_name` and returns its result map.
    ///
    /// Returning an error makes the client see "no response".
    async fn execute(
        &self,
        node_name: &str,
        command: &str,
        payload: CommandPayload,
    ) -> Result<Map, TransportError>;
}

/// The gRPC server for the relay service.
pub struct RelayGrpcServer<H: CommandHandler> {
    handler: Arc<H>,
}

impl<H: CommandHandler> RelayGrpcServer<H> {
    /// Creates a new relay server with the given handler.
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Returns a reference to the handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    fn into_service(self) -> RpcCommunicatorServer<RelayServiceImpl<H>> {
        RpcCommunicatorServer::new(RelayServiceImpl {
            handler: self.handler,
        })
        .max_encoding_message_size(DEFAULT_MAX_RECEIVE_MESSAGE_SIZE)
        .max_decoding_message_size(DEFAULT_MAX_RECEIVE_MESSAGE_SIZE)
    }

    /// Serves on `addr` until `shutdown` resolves.
    #[instrument(skip(self, shutdown), fields(addr = %addr))]
    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> Result<(), TransportError>
    where
        F: Future<Output = ()> + Send,
    {
        info!("Starting relay gRPC server on {}", addr);
        tonic::transport::Server::builder()
            .add_service(self.into_service())
            .serve_with_shutdown(addr, shutdown)
            .await?;
        info!("Relay gRPC server stopped gracefully");
        Ok(())
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    ///
    /// Binding to port 0 first lets callers learn the port before serving.
    pub async fn serve_with_listener<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), TransportError>
    where
        F: Future<Output = ()> + Send,
    {
        let addr = listener.local_addr()?;
        info!("Starting relay gRPC server on {}", addr);
        tonic::transport::Server::builder()
            .add_service(self.into_service())
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
            .await?;
        info!("Relay gRPC server stopped gracefully");
        Ok(())
    }
}

/// Internal gRPC service implementation.
struct RelayServiceImpl<H: CommandHandler> {
    handler: Arc<H>,
}

#[async_trait]
impl<H: CommandHandler> RpcCommunicator for RelayServiceImpl<H> {
    #[instrument(
        skip(self, request),
        fields(node = %request.get_ref().node_name, command = %request.get_ref().command)
    )]
    async fn execute_command(
        &self,
        request: Request<CommandRequestMessage>,
    ) -> Result<Response<CommandResponseMessage>, Status> {
        let req = request.into_inner();
        let payload = CommandPayload::decode(&req.request)?;
        debug!(
            args = payload.args.len(),
            kwargs = payload.kwargs.len(),
            "Executing command"
        );

        let result = match self
            .handler
            .execute(&req.node_name, &req.command, payload)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Command failed");
                return Err(e.into());
            }
        };

        let response = if result.is_empty() {
            Vec::new()
        } else {
            codec::encode_result(&result)?
        };

        Ok(Response::new(CommandResponseMessage {
            time: Some(SystemTime::now().into()),
            version: self.handler.version().to_string(),
            response,
        }))
    }
}
