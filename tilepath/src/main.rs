//! tilepath — lowest-cost routes over ASCII terrain maps.

mod config;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tilepath_core::{Point, TerrainMap};
use tilepath_paths::{Pathfinder, RelaxStats, Route};

use config::Config;

#[derive(Debug, Parser)]
#[command(version, about = "Find the cheapest route between two cells of a terrain map")]
struct Cli {
    /// Map file, one row per line.
    #[arg(default_value = "map.txt")]
    map: PathBuf,
    /// Start cell as ROW,COL.
    #[arg(long, value_parser = parse_cell, required_unless_present = "inspect")]
    from: Option<Point>,
    /// End cell as ROW,COL.
    #[arg(long, value_parser = parse_cell, required_unless_present = "inspect")]
    to: Option<Point>,
    /// Configuration file (default: ./tilepath.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the route as JSON.
    #[arg(long)]
    json: bool,
    /// Print the accumulated cost of every cell.
    #[arg(long)]
    costs: bool,
    /// Print the loaded map and its size, without routing.
    #[arg(long, conflicts_with_all = ["from", "to", "json", "costs"])]
    inspect: bool,
    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn parse_cell(s: &str) -> Result<Point, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got {s:?}"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<i32>()
            .map_err(|e| format!("invalid coordinate {v:?}: {e}"))
    };
    Ok(Point::at(parse(row)?, parse(col)?))
}

#[derive(Serialize)]
struct Report<'a> {
    map: &'a Path,
    cost: u64,
    /// `(row, col)` pairs from start to destination.
    path: Vec<(i32, i32)>,
    stats: RelaxStats,
}

fn init_logging(config: &Config, verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => config.logging.level.as_str(),
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_path) = Config::load(cli.config.as_deref())?;
    init_logging(&config, cli.verbose, cli.quiet);
    match &config_path {
        Some(p) => log::info!("loaded configuration from {}", p.display()),
        None => log::debug!("no configuration file, using defaults"),
    }

    let pathfinder = Pathfinder::new(config.cost_table()?);
    let map = pathfinder.read_map(&cli.map)?;

    if cli.inspect {
        println!("{} ({} columns, {} rows)", cli.map.display(), map.width(), map.height());
        println!("{map}");
        return Ok(());
    }
    let (Some(start), Some(end)) = (cli.from, cli.to) else {
        return Err("both --from and --to are required".into());
    };

    let search = pathfinder.search(&map, start, end)?;
    log::info!(
        "relaxed {} map in {:?}: {} cells reached, {} relaxations, {} dequeued",
        map.bounds(),
        search.elapsed,
        search.stats.reached,
        search.stats.relaxations,
        search.stats.dequeued
    );
    if cli.costs {
        print!("{}", render::cost_field(&search.graph));
    }

    let route = search.route_to(end)?;
    if cli.json {
        let report = Report {
            map: &cli.map,
            cost: route.cost(),
            path: route.iter_forward().map(Point::row_col).collect(),
            stats: search.stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_route(&map, &route, &config);
    }
    Ok(())
}

fn print_route(map: &TerrainMap, route: &Route, config: &Config) {
    println!("Traversal cost: {}", route.cost());
    println!("{}", render::overlay(map, route, &config.render));
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
