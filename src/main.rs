//! Concordat -- a deterministic Diplomacy adjudicator.
//!
//! Reads a game state and the orders for its current phase as JSON on stdin,
//! writes the resolved state and report as JSON on stdout. Can also list the
//! legal orders for a state.

#![allow(clippy::print_stderr)]

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use concordat::board::{BoardGraph, GameState, GraphError, Order, Power, StateError};
use concordat::config::{Config, ConfigError};
use concordat::game::Game;
use concordat::resolve::PhaseReport;

/// Concordat - A deterministic Diplomacy adjudication engine
#[derive(Parser, Debug)]
#[command(name = "concordat")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the standard starting position
    Start {
        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Resolve one phase read from stdin
    Resolve {
        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List the powers due to order and their legal orders for a state read from stdin
    Orders {
        /// Only list orders for this power
        #[arg(long, value_parser = parse_power)]
        power: Option<Power>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn parse_power(name: &str) -> Result<Power, String> {
    Power::from_name(name).ok_or_else(|| format!("unknown power `{name}`"))
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt game state: {0}")]
    State(#[from] StateError),
    #[error("board graph: {0}")]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One submitted order and the power that gave it.
#[derive(Debug, Deserialize)]
struct Submission {
    power: Power,
    order: Order,
}

#[derive(Debug, Deserialize)]
struct ResolveInput {
    state: GameState,
    #[serde(default)]
    orders: Vec<Submission>,
}

#[derive(Debug, Serialize)]
struct PowerOrders {
    power: Power,
    orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
struct OrdersOutput {
    needs_orders_from: Vec<Power>,
    legal: Vec<PowerOrders>,
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    state: GameState,
    report: PhaseReport,
    winner: Option<Power>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("concordat=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let result = match args.command {
        Commands::Start { config, pretty } => start(config, pretty),
        Commands::Resolve { config, pretty } => resolve(config, pretty),
        Commands::Orders { power, pretty } => orders(power, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config, CliError> {
    match path {
        Some(path) => Ok(Config::load(&path)?),
        None => Ok(Config::default()),
    }
}

fn start(config: Option<PathBuf>, pretty: bool) -> Result<(), CliError> {
    let config = load_config(config)?;
    write_json(&GameState::standard_start(config.start_year), pretty)
}

fn resolve(config: Option<PathBuf>, pretty: bool) -> Result<(), CliError> {
    let config = load_config(config)?;
    let graph = BoardGraph::standard()?;

    let input: ResolveInput = read_stdin()?;
    let orders: Vec<(Order, Power)> = input.orders.into_iter().map(|s| (s.order, s.power)).collect();

    let mut game = Game::from_state(&graph, config, input.state)?;
    let report = game.advance(&orders)?.clone();
    let winner = game.winner();
    write_json(&ResolveOutput { state: game.into_state(), report, winner }, pretty)
}

fn orders(power: Option<Power>, pretty: bool) -> Result<(), CliError> {
    let graph = BoardGraph::standard()?;
    let state: GameState = read_stdin()?;
    let game = Game::from_state(&graph, Config::default(), state)?;

    let needs_orders_from = game.needs_orders_from();
    let powers = match power {
        Some(power) => vec![power],
        None => needs_orders_from.clone(),
    };
    let legal = powers
        .into_iter()
        .map(|power| PowerOrders { power, orders: game.legal_orders(power) })
        .collect();
    write_json(&OrdersOutput { needs_orders_from, legal }, pretty)
}

fn read_stdin<T: DeserializeOwned>() -> Result<T, CliError> {
    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
