//! Relay Env - node-free access to a relay's observations and actions.
//!
//! Callers name values by key (`lidar_angles`, `odom_pose`,
//! `unity_system_argument`) and never by node. A [`RoutingTable`] maps each
//! key to the node that owns it, and [`RelayEnvironment`] issues one relay
//! call per node and merges the answers.
//!
//! # Example
//!
//! ```ignore
//! use relay_env::{EnvironmentConfig, RelayEnvironment};
//! use relay_transport::Map;
//!
//! let env = RelayEnvironment::connect(EnvironmentConfig::default())?;
//! env.init_nodes(&["camera_node", "lidar_node", "odom_node"], &Map::new())?;
//! let obs = env.collect_observations(&["odom_pose", "lidar_angles"], &Map::new())?;
//! env.close();
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod routing;

pub use config::EnvironmentConfig;
pub use environment::{NodeDispatch, RelayEnvironment, VERSION};
pub use error::EnvError;
pub use routing::{Grouping, NodeBatch, RoutingTable};
