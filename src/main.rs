// This is my main entry point for the node-testkit CLI
// I pull in the config model, the global settings and the node config builder
use clap::Parser;
use log::{error, info, LevelFilter};
use node_testkit::testnet::{node_config_for, NodePorts};
use node_testkit::{Command, NodeConfig, Opt, CONFIG_FILE_NAME, GLOBAL_SETTINGS};
use std::process;

fn main() {
    // I initialize logging so I can see what the toolkit does with each file
    // Info level shows loads and writes without the per-line parse chatter
    env_logger::builder().filter_level(LevelFilter::Info).init();

    // I parse the command line arguments using clap
    let opt = Opt::parse();

    // If I was given a settings file, it overrides the environment defaults
    // before any command reads the binary path, work dir or plugins
    if let Some(path) = &opt.settings {
        if let Err(e) = GLOBAL_SETTINGS.load_file(path) {
            error!("Error: {e}");
            process::exit(1);
        }
    }

    // I run the command and exit with whatever code it asks for
    // If something goes wrong, I log the error and exit with code 1
    match run_command(opt.command) {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Error: {e}");
            process::exit(1);
        }
    }
}

// This is where I handle the different CLI commands
// It returns the process exit code; `diff` exits with 1 when the files differ
fn run_command(command: Command) -> Result<i32, Box<dyn std::error::Error>> {
    match command {
        // When I want a fresh config for one node of a test network
        Command::Generate {
            kind,
            witness,
            p2p_port,
            output,
        } => {
            // I reserve the p2p port and the two after it for http and ws
            // This fails when the port is too close to the top of the range
            let ports = NodePorts::starting_at(p2p_port)?;
            let config = node_config_for(kind, &witness, ports);
            // Without an explicit output I write into the configured work dir
            let path = output.unwrap_or_else(|| GLOBAL_SETTINGS.get_work_dir().join(CONFIG_FILE_NAME));
            config.write(&path)?;
            println!("Generated {kind} node config: {}", path.display());
        }
        // When I want to look at a config file, either as written or as JSON
        Command::Show { path, json } => {
            let config = NodeConfig::load(&path)?;
            if json {
                println!("{}", config.to_json_string()?);
            } else {
                print!("{}", config.to_text());
            }
        }
        // When I want to see which keys differ between two node configs
        Command::Diff { left, right, json } => {
            // I load both sides; a malformed file stops here with its line number
            let left_config = NodeConfig::load(&left)?;
            let right_config = NodeConfig::load(&right)?;
            let differences = left_config.diff(&right_config);

            if json {
                // JSON output is always printed, even an empty array
                println!("{}", left_config.diff_json_string(&right_config)?);
            } else if differences.is_empty() {
                println!("No differences");
            } else {
                for difference in &differences {
                    println!("{difference}");
                }
            }

            // Like the diff tool, I exit with 1 when the files differ
            return Ok(if differences.is_empty() { 0 } else { 1 });
        }
        // When I want a hand-edited config rewritten in canonical form
        Command::Normalize { path } => {
            // Loading and writing back drops comments and unknown keys
            // and puts every known entry in schema order
            let config = NodeConfig::load(&path)?;
            config.write(&path)?;
            info!("Normalized {}", path.display());
        }
    }
    Ok(0)
}
