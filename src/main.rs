use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use duopoly::{data::Decision, manager::Manager};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    run_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Fit,

    Query {
        #[arg(long)]
        r: f64,
        #[arg(long)]
        position_a: usize,
        #[arg(long)]
        price_a: u32,
        #[arg(long)]
        position_b: usize,
        #[arg(long)]
        price_b: u32,
    },

    Clean,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.run_dir).context("failed to construct mgr")?;

    match args.command {
        Command::Fit => mgr.fit()?,
        Command::Query {
            r,
            position_a,
            price_a,
            position_b,
            price_b,
        } => {
            let decision = Decision {
                player_position: position_a,
                player_price: price_a,
                opp_position: position_b,
                opp_price: price_b,
            };
            mgr.query(r, &decision)?
        }
        Command::Clean => mgr.clean()?,
    }

    Ok(())
}
