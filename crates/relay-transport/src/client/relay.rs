//! Async client for the relay's `ExecuteCommand` RPC.

use super::NodeCommand;
use crate::codec;
use crate::config::ClientConfig;
use crate::error::{TransportError, TransportResult};
use crate::proto::relay::rpc_communicator_client::RpcCommunicatorClient;
use crate::proto::relay::{CommandRequestMessage, CommandResponseMessage};
use crate::value::{Map, Value};
use crate::RELAY_NODE;
use std::time::SystemTime;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, info, info_span, instrument, warn, Span};

/// Single point of contact with a relay process.
///
/// The channel is plain-text HTTP/2 and connects lazily: an unreachable relay
/// shows up on the first call, not at construction. Every call failure is
/// logged and reported as `None` ("no response") instead of an error, since
/// nodes routinely refuse commands that do not apply to their current state
/// (starting an already started node, for instance).
///
/// # Example
///
/// ```ignore
/// use relay_transport::{ClientConfig, Map, RelayClient};
///
/// let client = RelayClient::connect(ClientConfig::new("192.168.122.125", 50051)).await?;
/// client.start_node("lidar_node", &[], &Map::new()).await?;
/// let scan = client
///     .exchange_node("lidar_node", &["lidar_angles".into(), "lidar_vector".into()], &Map::new())
///     .await?;
/// ```
pub struct RelayClient {
    config: ClientConfig,
    stub: RpcCommunicatorClient<Channel>,
    span: Span,
}

impl RelayClient {
    /// Opens a channel to the relay described by `config`.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn connect(config: ClientConfig) -> TransportResult<Self> {
        let span = info_span!("relay_client", endpoint = %config.endpoint());
        Self::connect_with_span(config, span).await
    }

    /// Opens a channel, logging every event under `span`.
    pub async fn connect_with_span(config: ClientConfig, span: Span) -> TransportResult<Self> {
        let uri = config.endpoint();
        let mut endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|e| TransportError::invalid_endpoint(&uri, e))?;
        if let Some(timeout) = config.connect_timeout() {
            endpoint = endpoint.connect_timeout(timeout);
        }

        let channel = endpoint.connect_lazy();
        let stub = RpcCommunicatorClient::new(channel)
            .max_decoding_message_size(config.max_receive_message_size);

        span.in_scope(|| {
            debug!(
                max_receive_message_size = config.max_receive_message_size,
                "Relay channel opened"
            )
        });

        Ok(Self { config, stub, span })
    }

    /// Sends one command to one node.
    ///
    /// Returns `Ok(None)` when the RPC itself fails; only payload encoding
    /// errors are returned as `Err`.
    #[instrument(parent = &self.span, skip(self, args, kwargs))]
    pub async fn invoke(
        &self,
        node_name: &str,
        command: &str,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Option<CommandResponseMessage>> {
        let request = CommandRequestMessage {
            time: Some(SystemTime::now().into()),
            node_name: node_name.to_string(),
            command: command.to_string(),
            request: codec::encode_request(args, kwargs)?,
        };

        let mut stub = self.stub.clone();
        match stub.execute_command(request).await {
            Ok(response) => Ok(Some(response.into_inner())),
            Err(status) => {
                warn!(
                    code = ?status.code(),
                    error = %status.message(),
                    "gRPC error triggered when trying to communicate with relay"
                );
                Ok(None)
            }
        }
    }

    /// Asks the relay for its version. `None` if it did not answer.
    pub async fn probe_version(&self) -> TransportResult<Option<String>> {
        let response = self.invoke(RELAY_NODE, "", &[], &Map::new()).await?;
        Ok(response.map(|r| r.version))
    }

    /// Runs `command` on `node_name` and decodes the node's result map.
    ///
    /// `None` means the relay did not answer.
    pub async fn call_node(
        &self,
        node_name: &str,
        command: NodeCommand,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Option<Map>> {
        let Some(response) = self.invoke(node_name, command.as_str(), args, kwargs).await? else {
            return Ok(None);
        };

        self.span.in_scope(|| match command {
            NodeCommand::Start | NodeCommand::Stop => info!(
                node = node_name,
                args = ?args,
                kwargs = ?kwargs,
                time = ?response.time,
                version = %response.version,
                "{} node {}",
                command,
                node_name
            ),
            NodeCommand::Reset | NodeCommand::Exchange => info!(
                node = node_name,
                args = ?args,
                kwargs = ?kwargs.keys().collect::<Vec<_>>(),
                response_bytes = response.response.len(),
                "{} node {}",
                command,
                node_name
            ),
        });

        codec::decode_result(&response.response).map(Some)
    }

    /// Starts a node. `None` if the relay did not answer, which is also what
    /// starting an already running node looks like.
    pub async fn start_node(
        &self,
        node_name: &str,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Option<Map>> {
        self.call_node(node_name, NodeCommand::Start, args, kwargs).await
    }

    /// Stops a node. `None` if the relay did not answer.
    pub async fn stop_node(
        &self,
        node_name: &str,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Option<Map>> {
        self.call_node(node_name, NodeCommand::Stop, args, kwargs).await
    }

    /// Resets a node. Empty if the relay did not answer.
    pub async fn reset_node(
        &self,
        node_name: &str,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Map> {
        let result = self.call_node(node_name, NodeCommand::Reset, args, kwargs).await?;
        Ok(result.unwrap_or_default())
    }

    /// Exchanges data with a node: `args` name the values wanted back,
    /// `kwargs` carry values pushed to it. Empty if the relay did not answer.
    pub async fn exchange_node(
        &self,
        node_name: &str,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Map> {
        let result = self.call_node(node_name, NodeCommand::Exchange, args, kwargs).await?;
        Ok(result.unwrap_or_default())
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Closes the channel.
    pub async fn close(self) {
        let Self { stub, span, .. } = self;
        drop(stub);
        span.in_scope(|| warn!("Relay client closed"));
    }
}
