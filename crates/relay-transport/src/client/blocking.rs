//! Synchronous face of [`RelayClient`].

use super::{NodeCommand, RelayClient};
use crate::config::ClientConfig;
use crate::error::TransportResult;
use crate::proto::relay::CommandResponseMessage;
use crate::value::{Map, Value};
use tokio::runtime::{Builder, Runtime};
use tracing::Span;

/// Blocking relay client.
///
/// Owns a current-thread runtime and blocks the calling thread until the
/// relay answers or the call fails. Must not be used from inside another
/// async runtime.
pub struct BlockingRelayClient {
    // Dropped before the runtime that drives its channel.
    inner: RelayClient,
    runtime: Runtime,
}

impl BlockingRelayClient {
    /// Opens a channel to the relay described by `config`.
    pub fn connect(config: ClientConfig) -> TransportResult<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let inner = runtime.block_on(RelayClient::connect(config))?;
        Ok(Self { inner, runtime })
    }

    /// Opens a channel, logging every event under `span`.
    pub fn connect_with_span(config: ClientConfig, span: Span) -> TransportResult<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let inner = runtime.block_on(RelayClient::connect_with_span(config, span))?;
        Ok(Self { inner, runtime })
    }

    /// See [`RelayClient::invoke`].
    pub fn invoke(
        &self,
        node_name: &str,
        command: &str,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Option<CommandResponseMessage>> {
        self.runtime
            .block_on(self.inner.invoke(node_name, command, args, kwargs))
    }

    /// See [`RelayClient::probe_version`].
    pub fn probe_version(&self) -> TransportResult<Option<String>> {
        self.runtime.block_on(self.inner.probe_version())
    }

    /// See [`RelayClient::call_node`].
    pub fn call_node(
        &self,
        node_name: &str,
        command: NodeCommand,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Option<Map>> {
        self.runtime
            .block_on(self.inner.call_node(node_name, command, args, kwargs))
    }

    /// See [`RelayClient::start_node`].
    pub fn start_node(
        &self,
        node_name: &str,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Option<Map>> {
        self.runtime
            .block_on(self.inner.start_node(node_name, args, kwargs))
    }

    /// See [`RelayClient::stop_node`].
    pub fn stop_node(
        &self,
        node_name: &str,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Option<Map>> {
        self.runtime
            .block_on(self.inner.stop_node(node_name, args, kwargs))
    }

    /// See [`RelayClient::reset_node`].
    pub fn reset_node(&self, node_name: &str, args: &[Value], kwargs: &Map) -> TransportResult<Map> {
        self.runtime
            .block_on(self.inner.reset_node(node_name, args, kwargs))
    }

    /// See [`RelayClient::exchange_node`].
    pub fn exchange_node(
        &self,
        node_name: &str,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Map> {
        self.runtime
            .block_on(self.inner.exchange_node(node_name, args, kwargs))
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    /// Closes the channel and shuts the runtime down.
    pub fn close(self) {
        let Self { inner, runtime } = self;
        runtime.block_on(inner.close());
    }
}
