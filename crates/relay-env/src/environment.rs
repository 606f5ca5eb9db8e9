//! Grouped relay operations.

use crate::config::EnvironmentConfig;
use crate::error::EnvError;
use crate::routing::RoutingTable;
use relay_transport::{BlockingRelayClient, Map, NodeCommand, TransportResult, Value};
use tracing::{debug, info_span, warn, Span};

/// Relay protocol version this environment is written against.
pub const VERSION: &str = "2.0";

/// Something that can run one command against one node.
///
/// [`BlockingRelayClient`] is the production implementation.
pub trait NodeDispatch {
    /// Version reported by the relay, `None` if it did not answer.
    fn probe_version(&self) -> TransportResult<Option<String>>;

    /// Runs `command` on `node`. `None` means the node gave no answer.
    fn dispatch(
        &self,
        node: &str,
        command: NodeCommand,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Option<Map>>;

    /// Releases the underlying connection.
    fn close(self)
    where
        Self: Sized;
}

impl NodeDispatch for BlockingRelayClient {
    fn probe_version(&self) -> TransportResult<Option<String>> {
        BlockingRelayClient::probe_version(self)
    }

    fn dispatch(
        &self,
        node: &str,
        command: NodeCommand,
        args: &[Value],
        kwargs: &Map,
    ) -> TransportResult<Option<Map>> {
        self.call_node(node, command, args, kwargs)
    }

    fn close(self) {
        BlockingRelayClient::close(self)
    }
}

/// Node-free view of a relay.
///
/// Every grouped operation takes positional keys and keyword entries that
/// may span several nodes, routes them through the [`RoutingTable`], calls
/// each node once in first-referenced order and merges the results. When two
/// nodes return the same key, the later node wins.
///
/// A node that gives no answer contributes nothing. Starting an already
/// running node looks exactly like that, so by default it is not an error;
/// set [`EnvironmentConfig::strict`] to turn it into
/// [`EnvError::NoResponse`].
pub struct RelayEnvironment<D: NodeDispatch = BlockingRelayClient> {
    dispatcher: D,
    routing: RoutingTable,
    strict: bool,
    server_version: Option<String>,
    span: Span,
}

impl RelayEnvironment<BlockingRelayClient> {
    /// Connects to the relay in `config` and checks its version.
    pub fn connect(config: EnvironmentConfig) -> Result<Self, EnvError> {
        let span = info_span!("relay_environment", endpoint = %config.relay.endpoint());
        Self::connect_in(config, span)
    }

    /// Like [`connect`](Self::connect), logging under `span`.
    pub fn connect_in(config: EnvironmentConfig, span: Span) -> Result<Self, EnvError> {
        let client_span = info_span!(parent: &span, "relay_client");
        let client = BlockingRelayClient::connect_with_span(config.relay.clone(), client_span)?;
        Self::with_dispatcher_in(client, config, span)
    }
}

impl<D: NodeDispatch> RelayEnvironment<D> {
    /// Wraps an existing dispatcher and checks the relay version.
    pub fn with_dispatcher(dispatcher: D, config: EnvironmentConfig) -> Result<Self, EnvError> {
        Self::with_dispatcher_in(dispatcher, config, info_span!("relay_environment"))
    }

    /// Like [`with_dispatcher`](Self::with_dispatcher), logging under `span`.
    ///
    /// A version mismatch, or no answer to the probe at all, is logged and
    /// otherwise ignored.
    pub fn with_dispatcher_in(
        dispatcher: D,
        config: EnvironmentConfig,
        span: Span,
    ) -> Result<Self, EnvError> {
        let server_version = span.in_scope(|| -> Result<_, EnvError> {
            let server_version = dispatcher.probe_version()?;
            match server_version.as_deref() {
                Some(VERSION) => debug!(version = VERSION, "Relay version matches"),
                Some(other) => warn!(
                    server_version = other,
                    client_version = VERSION,
                    "server version {} does not match client version {}",
                    other,
                    VERSION
                ),
                None => warn!(
                    client_version = VERSION,
                    "server version unavailable, relay did not answer the probe"
                ),
            }
            warn!(strict = config.strict, "Relay environment initialized");
            Ok(server_version)
        })?;

        Ok(Self {
            dispatcher,
            routing: config.routes,
            strict: config.strict,
            server_version,
            span,
        })
    }

    /// Starts the nodes owning the given keys.
    pub fn init_nodes<S: AsRef<str>>(&self, args: &[S], kwargs: &Map) -> Result<Map, EnvError> {
        self.perform(NodeCommand::Start, args, kwargs)
    }

    /// Resets the nodes owning the given keys.
    pub fn reset<S: AsRef<str>>(&self, args: &[S], kwargs: &Map) -> Result<Map, EnvError> {
        self.perform(NodeCommand::Reset, args, kwargs)
    }

    /// Fetches the named observations, pushing any keyword values along.
    pub fn collect_observations<S: AsRef<str>>(
        &self,
        args: &[S],
        kwargs: &Map,
    ) -> Result<Map, EnvError> {
        self.perform(NodeCommand::Exchange, args, kwargs)
    }

    /// Stops the nodes owning the given keys.
    pub fn stop_nodes<S: AsRef<str>>(&self, args: &[S], kwargs: &Map) -> Result<Map, EnvError> {
        self.perform(NodeCommand::Stop, args, kwargs)
    }

    fn perform<S: AsRef<str>>(
        &self,
        command: NodeCommand,
        args: &[S],
        kwargs: &Map,
    ) -> Result<Map, EnvError> {
        let _entered = self.span.enter();
        let grouping = self.routing.group(args, kwargs);
        debug!(%command, nodes = grouping.len(), "Dispatching grouped command");

        let mut merged = Map::new();
        for (node, batch) in &grouping {
            match self
                .dispatcher
                .dispatch(node, command, &batch.args, &batch.kwargs)?
            {
                Some(result) => merged.extend(result),
                None if self.strict => {
                    return Err(EnvError::NoResponse {
                        node: node.clone(),
                        command,
                    })
                }
                // Most likely a node that was already started.
                None => debug!(node = %node, %command, "No response, skipping node"),
            }
        }

        Ok(merged)
    }

    /// Version the relay reported at construction.
    pub fn server_version(&self) -> Option<&str> {
        self.server_version.as_deref()
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Closes the relay connection.
    pub fn close(self) {
        let Self {
            dispatcher, span, ..
        } = self;
        dispatcher.close();
        span.in_scope(|| warn!("Relay environment closed"));
    }
}
