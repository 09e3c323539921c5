use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

use termsnake::play::{self, Settings, DEFAULT_TICK_MS};
use termsnake::{Coords, GameConfig, Obstacles};

#[derive(Debug, Parser)]
#[command(name = "termsnake", version, about = "Snake in the terminal")]
struct Cli {
    /// Board width, walls included
    #[arg(long, default_value_t = 40)]
    width: i32,

    /// Board height, walls included
    #[arg(long, default_value_t = 20)]
    height: i32,

    /// Terminal column of the left wall
    #[arg(long, default_value_t = 0)]
    origin_x: u16,

    /// Terminal row of the top wall
    #[arg(long, default_value_t = 0)]
    origin_y: u16,

    /// Milliseconds between snake steps
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u64,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Interior wall cell as X,Y (repeatable)
    #[arg(long = "obstacle", value_parser = parse_coords)]
    obstacles: Vec<Coords>,

    #[arg(long, default_value = "termsnake.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn parse_coords(s: &str) -> Result<Coords, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got {:?}", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in {:?}: {}", s, e))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in {:?}: {}", s, e))?;
    Ok((x, y))
}

fn layout(cli: &Cli) -> GameConfig {
    let config = if (cli.width, cli.height) == (40, 20) {
        GameConfig::demo()
    } else {
        GameConfig::sized(cli.width, cli.height)
    };
    let config = config.with_origin((cli.origin_x, cli.origin_y));

    if cli.obstacles.is_empty() {
        config
    } else {
        config.with_walls(Obstacles::new(cli.obstacles.iter().copied()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Error creating log file {}", cli.log_file.display()))?;
    WriteLogger::init(cli.log_level, Config::default(), log_file)
        .context("Error initializing logger")?;

    // Bad layouts are reported before the terminal switches screens
    layout(&cli).build().context("Invalid board")?;

    let settings = Settings { tick: Duration::from_millis(cli.tick_ms), seed: cli.seed };
    play::run(|| layout(&cli), settings)
}
