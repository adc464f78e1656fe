#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tileworld_rust::simulation::config::SimulationConfig;
use tileworld_rust::simulation::grid::Coord;
use tileworld_rust::simulation::Simulation;
use tileworld_rust::ui::{field::compute_field_grid, render::{draw_ui, format_hud}};

#[derive(Parser, Debug)]
#[command(name = "tileworld")]
#[command(about = "Decentralised foraging agents in a dynamic tile world")]
struct Cli {
    /// TOML file overriding the built-in parameters
    #[arg(short, long, env = "TILEWORLD_CONFIG")]
    config: Option<PathBuf>,

    /// Ticks to run; the terminal UI also stops early on `q`
    #[arg(short, long, default_value_t = 5000)]
    ticks: u64,

    /// World seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of agents
    #[arg(long)]
    agents: Option<usize>,

    /// Run without the terminal UI and print a summary
    #[arg(long)]
    headless: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    /// Write logs here while the terminal UI is up
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Milliseconds per tick in the terminal UI
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,
}

impl Cli {
    fn load_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SimulationConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.world.seed = seed;
        }
        if let Some(agents) = self.agents {
            config.agent.agent_count = agents;
        }
        config.validate()?;
        Ok(config)
    }

    fn init_logging(&self) -> Result<()> {
        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        if self.headless {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        } else if let Some(path) = &self.log_file {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging()?;
    let config = cli.load_config()?;
    let mut sim = Simulation::new(&config).context("placing agents")?;

    if cli.headless {
        let report = sim.run(cli.ticks);
        println!(
            "ticks: {} | score: {} | station known by {}/{} | min fuel {:.0}",
            report.ticks,
            report.total_score,
            report.fuel_station_known_by,
            sim.agents.len(),
            report.min_fuel
        );
        return Ok(());
    }

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut sim, cli.ticks, Duration::from_millis(cli.tick_ms));

    // Restore Terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    let report = sim.report();
    info!(ticks = report.ticks, score = report.total_score, "session closed");
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    sim: &mut Simulation,
    ticks: u64,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        // 1. Update
        if last_tick.elapsed() >= tick_rate && sim.tick() < ticks {
            sim.step();
            last_tick = Instant::now();
        }

        // 2. Render
        terminal.draw(|f| {
            let area = f.area();
            let rows = usize::from(area.height.saturating_sub(1)); // -1 for HUD
            let cols = usize::from(area.width);
            let agents: Vec<Coord> = sim.agents.iter().map(|a| a.status.pos).collect();
            let grid = compute_field_grid(&sim.world, &agents, rows, cols);
            let hud = format_hud(&sim.report(), &sim.agents);
            draw_ui(f, grid, &hud);
        })?;

        // 3. Input
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}
