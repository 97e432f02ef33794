//! Terminal Snake runner (default binary).
//!
//! Builds the configuration (defaults, then `--config` TOML, then flags),
//! installs a file logger, and runs a fixed-rate loop: draw, wait for input
//! until the next tick is due, advance the session.

use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use tui_snake::core::{GameConfig, GameSnapshot, Session};
use tui_snake::input::map_key_event;
use tui_snake::term::{FrameBuffer, GameView, Palette, TerminalRenderer, Viewport};

#[derive(Parser, Debug)]
#[command(name = "tui-snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Grid width in tiles
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in tiles
    #[arg(long)]
    height: Option<u16>,

    /// Terminal columns per tile
    #[arg(long)]
    tile_size: Option<u16>,

    /// Ticks per second
    #[arg(long)]
    fps: Option<u32>,

    /// Initial snake length
    #[arg(long)]
    start_length: Option<usize>,

    /// Wrap around the edges instead of crashing into them
    #[arg(long)]
    wrap: bool,

    /// Score file location
    #[arg(long, value_name = "PATH")]
    scores_file: Option<PathBuf>,

    /// Keep scores in memory only
    #[arg(long, conflicts_with = "scores_file")]
    no_save: bool,

    /// RNG seed; defaults to the clock
    #[arg(long)]
    seed: Option<u64>,

    /// Log file (stdout belongs to the game screen)
    #[arg(long, value_name = "PATH", default_value = "tui-snake.log")]
    log_file: PathBuf,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(start_length) = self.start_length {
            config.start_length = start_length;
        }
        if self.wrap {
            config.gameover_on_exit = false;
        }
        if let Some(path) = &self.scores_file {
            config.scores_file = Some(path.clone());
        }
        if self.no_save {
            config.scores_file = None;
        }

        config.validate()?;
        Ok(config)
    }

    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let level = LevelFilter::from_str(&cli.log_level)
        .map_err(|_| anyhow!("invalid log level {:?}", cli.log_level))?;
    if level == LevelFilter::Off {
        return Ok(());
    }

    let file = File::create(&cli.log_file)
        .with_context(|| format!("failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(
        level,
        ConfigBuilder::new()
            .set_target_level(LevelFilter::Error)
            .build(),
        file,
    )
    .context("failed to install logger")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let config = cli.game_config().context("invalid configuration")?;
    let seed = cli.seed();
    log::info!("starting: {:?}, seed {}", config, seed);

    let palette = Palette::from_config(&config);
    let view = GameView::from_config(&config);
    let mut session = Session::from_config(config, seed).context("failed to set up the game")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session, &view, &palette);

    // Always try to restore terminal state.
    if let Err(err) = term.exit() {
        log::error!("failed to restore terminal: {err:#}");
    }
    if let Err(err) = &result {
        log::error!("{err:#}");
    }
    log::info!("exiting in state {}", session.state());
    result
}

fn run(
    term: &mut TerminalRenderer,
    session: &mut Session,
    view: &GameView,
    palette: &Palette,
) -> Result<()> {
    let tick_duration = session.config().tick_interval();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        session.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, palette, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        if session.is_quit() {
            return Ok(());
        }

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(input) = map_key_event(key) {
                        session.handle_input(input);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick()?;
        }
    }
}
