use crate::testnet::NodeKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "node-testkit")]
pub struct Opt {
    #[arg(
        long = "settings",
        global = true,
        help = "TOML file overriding toolkit settings"
    )]
    pub settings: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "generate", about = "Generate config.ini for a node")]
    Generate {
        #[arg(help = "Node kind (init, witness, api)")]
        kind: NodeKind,
        #[arg(long = "witness", help = "Witness produced by this node (repeatable)")]
        witness: Vec<String>,
        #[arg(long = "p2p-port", default_value_t = 2001, help = "First of three ports")]
        p2p_port: u16,
        #[arg(
            long = "output",
            help = "Where to write the config (default: <work dir>/config.ini)"
        )]
        output: Option<PathBuf>,
    },
    #[command(name = "show", about = "Print a parsed config file")]
    Show {
        #[arg(help = "Path to config.ini")]
        path: PathBuf,
        #[arg(long = "json", help = "Print as JSON")]
        json: bool,
    },
    #[command(name = "diff", about = "Compare two config files entry by entry")]
    Diff {
        #[arg(help = "Left config file")]
        left: PathBuf,
        #[arg(help = "Right config file")]
        right: PathBuf,
        #[arg(long, help = "Print the differences as JSON")]
        json: bool,
    },
    #[command(name = "normalize", about = "Rewrite a config file in canonical form")]
    Normalize {
        #[arg(help = "Path to config.ini")]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let opt = Opt::try_parse_from([
            "node-testkit",
            "generate",
            "witness",
            "--witness",
            "alice",
            "--witness",
            "bob",
            "--p2p-port",
            "4000",
        ])
        .unwrap();

        match opt.command {
            Command::Generate {
                kind,
                witness,
                p2p_port,
                output,
            } => {
                assert_eq!(kind, NodeKind::Witness);
                assert_eq!(witness, vec!["alice".to_string(), "bob".to_string()]);
                assert_eq!(p2p_port, 4000);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_diff_json() {
        let opt =
            Opt::try_parse_from(["node-testkit", "diff", "a.ini", "b.ini", "--json"]).unwrap();

        match opt.command {
            Command::Diff { left, right, json } => {
                assert_eq!(left, PathBuf::from("a.ini"));
                assert_eq!(right, PathBuf::from("b.ini"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_settings_flag() {
        let opt = Opt::try_parse_from([
            "node-testkit",
            "show",
            "config.ini",
            "--json",
            "--settings",
            "testkit.toml",
        ])
        .unwrap();

        assert_eq!(opt.settings, Some(PathBuf::from("testkit.toml")));
        assert!(matches!(opt.command, Command::Show { json: true, .. }));
    }

    #[test]
    fn test_rejects_unknown_node_kind() {
        let result = Opt::try_parse_from(["node-testkit", "generate", "seed"]);
        assert!(result.is_err());
    }
}
