use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use keylattice::config::Config;
use keylattice::error::LatticeResult;
use keylattice::geometry::BoardGeometry;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config; explicit command line arguments override it.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Map(cmd::map::MapArgs),
    Ring(cmd::ring::RingArgs),
    Positions(cmd::positions::PositionsArgs),
}

fn resolve_config(cli: &Cli, matches: &clap::ArgMatches) -> LatticeResult<Config> {
    let (cli_config, sub_matches) = match &cli.command {
        Commands::Map(args) => (&args.config, matches.subcommand_matches("map")),
        Commands::Ring(args) => (&args.config, matches.subcommand_matches("ring")),
        Commands::Positions(args) => (&args.config, matches.subcommand_matches("positions")),
    };

    let Some(path) = &cli.config else {
        return Ok(cli_config.clone());
    };

    info!("📂 Loading config: {}", path);
    let mut config = Config::load_from_file(path)?;
    if let Some(sub_matches) = sub_matches {
        config.merge_from_cli(cli_config, sub_matches);
    }
    Ok(config)
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&cli, &matches).unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    });

    let geometry = BoardGeometry::lumatone();
    let result = match &cli.command {
        Commands::Map(args) => cmd::map::run(args, &config, geometry),
        Commands::Ring(args) => cmd::ring::run(args, &config, geometry),
        Commands::Positions(args) => cmd::positions::run(args, &config, geometry),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
