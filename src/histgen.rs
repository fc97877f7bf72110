//! Sample history dataset generator.
//!
//! Writes a deterministic synthetic transaction history as JSON, for demos
//! and for feeding the viewer a reproducible dataset of arbitrary size.

use anyhow::Result;
use rledger::sample::SampleDataset;
use std::env;
use std::path::PathBuf;

struct Config {
    seed: u64,
    num_groups: usize,
    output_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: 42,
            num_groups: 100,
            output_file: None,
        }
    }
}

fn parse_args() -> Result<Config> {
    let args: Vec<String> = env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-seed" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-seed requires an argument");
                }
                config.seed = args[i].parse()?;
            }
            "-num_groups" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-num_groups requires an argument");
                }
                config.num_groups = args[i].parse()?;
            }
            "-out" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("-out requires a file path argument");
                }
                config.output_file = Some(PathBuf::from(&args[i]));
            }
            "-h" | "-help" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Warning: Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_help() {
    println!("Transaction History Generator");
    println!("Usage: ledger-histgen [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -seed <N>          Random seed (default: 42)");
    println!("  -num_groups <N>    Number of history groups (default: 100)");
    println!("  -out <FILE>        Output file path (default: history.json)");
    println!("  -h, -help, --help  Show this help message");
}

fn main() -> Result<()> {
    let config = parse_args()?;

    let output_path = config
        .output_file
        .unwrap_or_else(|| PathBuf::from("history.json"));

    let dataset = SampleDataset::generate(config.seed, config.num_groups);
    dataset.save_to_file(&output_path)?;

    println!(
        "History written to: {} ({} groups, {} events)",
        output_path.display(),
        dataset.groups.len(),
        dataset.events.len()
    );

    Ok(())
}
