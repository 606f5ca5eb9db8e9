//! Key-to-node routing.
//!
//! Keys follow the `<prefix>_<rest>` convention: `lidar_angles` belongs to
//! the node serving prefix `lidar`. Unless a route says otherwise that node
//! is `<prefix>_node`.

use indexmap::IndexMap;
use relay_transport::{Map, Value};
use serde::{Deserialize, Serialize};

/// Appended to a prefix to name its default node.
pub const NODE_SUFFIX: &str = "_node";

/// Arguments collected for one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeBatch {
    pub args: Vec<Value>,
    pub kwargs: Map,
}

/// Per-node batches, in the order each node was first referenced.
pub type Grouping = IndexMap<String, NodeBatch>;

/// Explicit prefix → node overrides on top of the `<prefix>_node` default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingTable {
    routes: IndexMap<String, String>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes every key with `prefix` to `node`.
    pub fn with_route(mut self, prefix: impl Into<String>, node: impl Into<String>) -> Self {
        self.insert(prefix, node);
        self
    }

    /// Adds or replaces a route, returning the node it previously pointed at.
    pub fn insert(&mut self, prefix: impl Into<String>, node: impl Into<String>) -> Option<String> {
        self.routes.insert(prefix.into(), node.into())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The part of `key` before its first underscore, or all of it.
    pub fn prefix_of(key: &str) -> &str {
        key.split_once('_').map_or(key, |(prefix, _)| prefix)
    }

    /// Node owning `key`. Empty keys belong to no node.
    pub fn resolve(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        let prefix = Self::prefix_of(key);
        Some(
            self.routes
                .get(prefix)
                .cloned()
                .unwrap_or_else(|| format!("{prefix}{NODE_SUFFIX}")),
        )
    }

    /// Splits positional keys and keyword entries into per-node batches.
    ///
    /// Positional keys are forwarded whole, as strings. Empty keys are
    /// dropped. Nodes appear in order of first reference, positional keys
    /// first.
    pub fn group<S: AsRef<str>>(&self, args: &[S], kwargs: &Map) -> Grouping {
        let mut grouping = Grouping::new();

        for arg in args.iter().map(AsRef::as_ref) {
            if let Some(node) = self.resolve(arg) {
                grouping.entry(node).or_default().args.push(Value::from(arg));
            }
        }

        for (key, value) in kwargs {
            if let Some(node) = self.resolve(key) {
                grouping
                    .entry(node)
                    .or_default()
                    .kwargs
                    .insert(key.clone(), value.clone());
            }
        }

        grouping
    }
}

impl From<IndexMap<String, String>> for RoutingTable {
    fn from(routes: IndexMap<String, String>) -> Self {
        Self { routes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kwargs(entries: &[(&str, Value)]) -> Map {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_default_driver_names() {
        let table = RoutingTable::new();
        for key in ["cam_rgb", "lidar_angles", "unity_system_argument", "a_b_c"] {
            let expected = format!("{}_node", key.split('_').next().unwrap());
            assert_eq!(table.resolve(key), Some(expected));
        }
    }

    #[test]
    fn test_key_without_underscore_uses_whole_key() {
        let table = RoutingTable::new();
        assert_eq!(table.resolve("camera"), Some("camera_node".to_string()));
        assert_eq!(table.resolve("camera_node"), Some("camera_node".to_string()));
        assert_eq!(table.resolve("_hidden"), Some("_node".to_string()));
    }

    #[test]
    fn test_empty_keys_are_skipped() {
        let table = RoutingTable::new();
        assert_eq!(table.resolve(""), None);

        let grouping = table.group(&["", "odom_pose", ""], &kwargs(&[("", Value::Int(1))]));
        assert_eq!(grouping.len(), 1);
        assert!(grouping.contains_key("odom_node"));
    }

    #[test]
    fn test_groups_positional_keys_by_prefix() {
        let grouping = RoutingTable::new().group(&["cam_rgb", "cam_depth", "lidar_angles"], &Map::new());

        assert_eq!(grouping.len(), 2);
        assert_eq!(
            grouping["cam_node"].args,
            vec![Value::from("cam_rgb"), Value::from("cam_depth")]
        );
        assert_eq!(grouping["lidar_node"].args, vec![Value::from("lidar_angles")]);
        assert!(grouping["cam_node"].kwargs.is_empty());
    }

    #[test]
    fn test_groups_keyword_entries() {
        let grouping = RoutingTable::new().group(
            &["goal_status"],
            &kwargs(&[
                ("unity_system_argument", Value::Map(Map::new())),
                ("goal_position", Value::List(vec![1.0.into(), 2.0.into()])),
            ]),
        );

        let keys: Vec<&str> = grouping.keys().map(String::as_str).collect();
        assert_eq!(keys, ["goal_node", "unity_node"]);
        assert_eq!(grouping["goal_node"].args, vec![Value::from("goal_status")]);
        assert!(grouping["goal_node"].kwargs.contains_key("goal_position"));
        assert!(grouping["unity_node"].args.is_empty());
        assert_eq!(grouping["unity_node"].kwargs.len(), 1);
    }

    #[test]
    fn test_nodes_keep_first_seen_order() {
        let grouping =
            RoutingTable::new().group(&["odom_pose", "lidar_angles", "odom_twist", "goal_status"], &Map::new());
        let keys: Vec<&str> = grouping.keys().map(String::as_str).collect();
        assert_eq!(keys, ["odom_node", "lidar_node", "goal_node"]);
    }

    #[test]
    fn test_explicit_route_overrides_default() {
        let table = RoutingTable::new().with_route("rfid", "rfid_reader_node");

        assert_eq!(table.resolve("rfid_data"), Some("rfid_reader_node".to_string()));
        assert_eq!(table.resolve("map_occupation"), Some("map_node".to_string()));

        let grouping = table.group(&["rfid_data", "rfid_strength"], &Map::new());
        assert_eq!(grouping["rfid_reader_node"].args.len(), 2);
    }

    #[test]
    fn test_insert_replaces_route() {
        let mut table = RoutingTable::new();
        assert!(table.is_empty());
        assert_eq!(table.insert("cam", "camera_node"), None);
        assert_eq!(table.insert("cam", "front_camera_node"), Some("camera_node".to_string()));
        assert_eq!(table.len(), 1);
    }
}
