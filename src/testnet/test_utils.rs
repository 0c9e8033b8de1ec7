//! Node directories and configs for test networks

use crate::config::{NodeConfig, CONFIG_FILE_NAME, GLOBAL_SETTINGS};
use crate::entries::TypedEntry;
use crate::error::{ConfigError, Result};
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::TempDir;

pub const INITMINER_NAME: &str = "initminer";
pub const INITMINER_PRIVATE_KEY: &str = "5JNHfZYKGaomSFvd4NUdQ9qMcEAC43kujbfjueTHpVapX1Kzq2n";

const BASE_PORT: u16 = 12_000;
const PORTS_PER_NODE: u16 = 3;

const WITNESS_PLUGINS: [&str; 2] = ["witness", "p2p"];
const API_PLUGINS: [&str; 5] = [
    "p2p",
    "webserver",
    "json_rpc",
    "database_api",
    "network_broadcast_api",
];

/// Role a generated node plays in a test network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Produces blocks as `initminer` from genesis
    Init,
    Witness,
    Api,
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "init" => Ok(NodeKind::Init),
            "witness" => Ok(NodeKind::Witness),
            "api" => Ok(NodeKind::Api),
            _ => Err(format!(
                "Invalid node kind: {s}. Valid options: init, witness, api"
            )),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Init => write!(f, "init"),
            NodeKind::Witness => write!(f, "witness"),
            NodeKind::Api => write!(f, "api"),
        }
    }
}

/// Ports a node listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePorts {
    pub p2p: u16,
    pub http: u16,
    pub ws: u16,
}

impl NodePorts {
    /// Three consecutive ports starting at `p2p`
    pub fn starting_at(p2p: u16) -> Result<Self> {
        let (http, ws) = p2p
            .checked_add(1)
            .zip(p2p.checked_add(2))
            .ok_or_else(|| {
                ConfigError::Settings(format!(
                    "Port {p2p} leaves no room for http and ws ports"
                ))
            })?;
        Ok(Self { p2p, http, ws })
    }
}

/// Build the config a node of `kind` is started with
///
/// Witness names get the matching `witness` lines; only `initminer` has a
/// well-known key, so other witnesses need their keys added by the caller.
pub fn node_config_for(kind: NodeKind, witnesses: &[String], ports: NodePorts) -> NodeConfig {
    let mut config = NodeConfig::new();

    config
        .log_appender
        .set_item(r#"{"appender":"stderr","stream":"std::cerr"}"#.to_string());
    config
        .log_logger
        .set_item(r#"{"name":"default","level":"info","appender":"stderr"}"#.to_string());
    config.shared_file_size.set_value("1G".to_string());
    config.p2p_endpoint.set_value(format!("0.0.0.0:{}", ports.p2p));
    config
        .webserver_http_endpoint
        .set_value(format!("0.0.0.0:{}", ports.http));
    config
        .webserver_ws_endpoint
        .set_value(format!("0.0.0.0:{}", ports.ws));

    let mut plugins = GLOBAL_SETTINGS.get_default_plugins();
    let extra: &[&str] = match kind {
        NodeKind::Init | NodeKind::Witness => &WITNESS_PLUGINS,
        NodeKind::Api => &API_PLUGINS,
    };
    for plugin in extra {
        if !plugins.iter().any(|p| p == plugin) {
            plugins.push(plugin.to_string());
        }
    }
    config.plugin.set_value(plugins);

    if kind == NodeKind::Init {
        config.witness.set_item(INITMINER_NAME.to_string());
        config
            .private_key
            .set_item(INITMINER_PRIVATE_KEY.to_string());
        config.enable_stale_production.set_value(true);
        config.required_participation.set_value(0);
    }

    if kind != NodeKind::Api {
        let mut view = config.witness.view_mut();
        for name in witnesses {
            if !view.contains(name) {
                view.append(name.clone());
            }
        }
    }

    config
}

/// A prepared node directory with its config
#[derive(Debug, Clone)]
pub struct TestNode {
    name: String,
    kind: NodeKind,
    directory: PathBuf,
    ports: NodePorts,
    pub config: NodeConfig,
}

impl TestNode {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_kind(&self) -> NodeKind {
        self.kind
    }

    pub fn get_directory(&self) -> &Path {
        &self.directory
    }

    pub fn get_ports(&self) -> NodePorts {
        self.ports
    }

    /// Address other nodes use as a seed
    pub fn get_p2p_address(&self) -> String {
        format!("127.0.0.1:{}", self.ports.p2p)
    }

    pub fn get_config_path(&self) -> PathBuf {
        self.directory.join(CONFIG_FILE_NAME)
    }

    pub fn write_config(&self) -> Result<PathBuf> {
        let path = self.get_config_path();
        self.config.write(&path)?;
        Ok(path)
    }

    /// Replace the in-memory config with what is on disk
    pub fn reload_config(&mut self) -> Result<()> {
        self.config = NodeConfig::load(&self.get_config_path())?;
        Ok(())
    }

    pub fn dump_config(&self) -> String {
        self.config.to_text()
    }
}

/// Owns a temporary directory holding every node created through it
pub struct TestWorld {
    directory: TempDir,
    node_count: usize,
}

impl TestWorld {
    pub fn new() -> Result<TestWorld> {
        let directory = tempfile::tempdir().map_err(|e| ConfigError::Io(e.to_string()))?;
        debug!("Created test world in {}", directory.path().display());
        Ok(TestWorld {
            directory,
            node_count: 0,
        })
    }

    pub fn get_directory(&self) -> &Path {
        self.directory.path()
    }

    pub fn create_init_node(&mut self) -> Result<TestNode> {
        self.create_node(NodeKind::Init, &[])
    }

    pub fn create_witness_node(&mut self, witnesses: &[String]) -> Result<TestNode> {
        self.create_node(NodeKind::Witness, witnesses)
    }

    pub fn create_api_node(&mut self) -> Result<TestNode> {
        self.create_node(NodeKind::Api, &[])
    }

    /// One init node followed by api nodes, all seeded with each other
    pub fn create_network(&mut self, node_count: usize) -> Result<Vec<TestNode>> {
        let mut nodes = Vec::new();
        for i in 0..node_count {
            let node = if i == 0 {
                self.create_init_node()?
            } else {
                self.create_api_node()?
            };
            nodes.push(node);
        }

        let addresses: Vec<String> = nodes.iter().map(TestNode::get_p2p_address).collect();
        for node in nodes.iter_mut() {
            let own = node.get_p2p_address();
            let seeds = addresses.iter().filter(|a| **a != own).cloned().collect();
            node.config.p2p_seed_node.set_value(seeds);
            node.write_config()?;
        }

        info!("Created network of {node_count} nodes");
        Ok(nodes)
    }

    fn create_node(&mut self, kind: NodeKind, witnesses: &[String]) -> Result<TestNode> {
        let index = self.node_count;
        self.node_count += 1;

        let name = format!("{kind}{index}");
        let directory = self.directory.path().join(&name);
        std::fs::create_dir_all(&directory)?;

        let offset = u16::try_from(index)
            .ok()
            .and_then(|i| i.checked_mul(PORTS_PER_NODE))
            .and_then(|o| o.checked_add(BASE_PORT))
            .ok_or_else(|| ConfigError::Settings(format!("no free ports for node {index}")))?;
        let ports = NodePorts::starting_at(offset)?;

        let node = TestNode {
            name,
            kind,
            directory,
            ports,
            config: node_config_for(kind, witnesses, ports),
        };
        node.write_config()?;
        debug!("Prepared {} node {}", kind, node.name);
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::ConfigEntry;

    #[test]
    fn test_node_kind_from_str() {
        assert_eq!("Init".parse::<NodeKind>().unwrap(), NodeKind::Init);
        assert_eq!("api".parse::<NodeKind>().unwrap(), NodeKind::Api);
        assert!("seed".parse::<NodeKind>().is_err());
        assert_eq!(NodeKind::Witness.to_string(), "witness");
    }

    #[test]
    fn test_ports_starting_at() {
        let ports = NodePorts::starting_at(2001).unwrap();
        assert_eq!((ports.p2p, ports.http, ports.ws), (2001, 2002, 2003));

        let last = NodePorts::starting_at(u16::MAX - 2).unwrap();
        assert_eq!(last.ws, u16::MAX);
    }

    #[test]
    fn test_ports_without_room_are_rejected() {
        assert!(matches!(
            NodePorts::starting_at(u16::MAX),
            Err(ConfigError::Settings(_))
        ));
        assert!(NodePorts::starting_at(u16::MAX - 1).is_err());
    }

    #[test]
    fn test_init_node_config() {
        let config = node_config_for(NodeKind::Init, &[], NodePorts::starting_at(2001).unwrap());

        assert_eq!(config.witness.items(), &[INITMINER_NAME]);
        assert_eq!(config.private_key.items(), &[INITMINER_PRIVATE_KEY]);
        assert_eq!(config.enable_stale_production.get_value(), Some(&true));
        assert_eq!(config.required_participation.get_value(), Some(&0));
        assert_eq!(
            config.p2p_endpoint.get_value(),
            Some(&"0.0.0.0:2001".to_string())
        );
        assert_eq!(
            config.webserver_ws_endpoint.get_value(),
            Some(&"0.0.0.0:2003".to_string())
        );
        assert!(config.plugin.items().contains(&"witness".to_string()));
    }

    #[test]
    fn test_witness_node_lists_witnesses_once() {
        let witnesses = vec!["alice".to_string(), "bob".to_string(), "alice".to_string()];
        let config = node_config_for(NodeKind::Witness, &witnesses, NodePorts::starting_at(3000).unwrap());

        assert_eq!(config.witness.items(), &["alice", "bob"]);
        assert!(!config.private_key.is_set());
        assert!(!config.enable_stale_production.is_set());
    }

    #[test]
    fn test_api_node_has_no_witnesses() {
        let witnesses = vec!["alice".to_string()];
        let config = node_config_for(NodeKind::Api, &witnesses, NodePorts::starting_at(3000).unwrap());

        assert!(!config.witness.is_set());
        assert!(config.plugin.items().contains(&"json_rpc".to_string()));
    }

    #[test]
    fn test_plugins_are_not_duplicated() {
        let config = node_config_for(NodeKind::Init, &[], NodePorts::starting_at(2001).unwrap());
        let mut plugins = config.plugin.items().to_vec();
        let before = plugins.len();
        plugins.sort();
        plugins.dedup();
        assert_eq!(plugins.len(), before);
    }

    #[test]
    fn test_create_init_node_writes_config() {
        let mut world = TestWorld::new().unwrap();
        let node = world.create_init_node().unwrap();

        assert_eq!(node.get_name(), "init0");
        assert!(node.get_config_path().exists());
        assert!(node.get_directory().starts_with(world.get_directory()));

        let on_disk = NodeConfig::load(&node.get_config_path()).unwrap();
        assert_eq!(on_disk, node.config);
    }

    #[test]
    fn test_reload_config_picks_up_file_changes() {
        let mut world = TestWorld::new().unwrap();
        let mut node = world.create_api_node().unwrap();

        let mut edited = node.config.clone();
        edited.exit_before_sync.set_value(true);
        edited.write(&node.get_config_path()).unwrap();

        node.reload_config().unwrap();
        assert_eq!(node.config.exit_before_sync.get_value(), Some(&true));
    }

    #[test]
    fn test_dump_config_matches_written_file() {
        let mut world = TestWorld::new().unwrap();
        let node = world.create_init_node().unwrap();

        let written = std::fs::read_to_string(node.get_config_path()).unwrap();
        assert_eq!(node.dump_config(), written);
    }

    #[test]
    fn test_create_network_seeds_peers() {
        let mut world = TestWorld::new().unwrap();
        let nodes = world.create_network(3).unwrap();

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].get_kind(), NodeKind::Init);
        assert_eq!(nodes[1].get_kind(), NodeKind::Api);

        // all ports unique
        let mut ports: Vec<u16> = nodes
            .iter()
            .flat_map(|n| {
                let p = n.get_ports();
                [p.p2p, p.http, p.ws]
            })
            .collect();
        ports.sort();
        ports.dedup();
        assert_eq!(ports.len(), 9);

        for node in &nodes {
            let seeds = node.config.p2p_seed_node.items();
            assert_eq!(seeds.len(), 2);
            assert!(!seeds.contains(&node.get_p2p_address()));

            let on_disk = NodeConfig::load(&node.get_config_path()).unwrap();
            assert_eq!(on_disk.p2p_seed_node.items(), seeds);
        }
    }
}
