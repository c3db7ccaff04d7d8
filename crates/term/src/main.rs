mod controls;
mod surface;

use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

use anyhow::Context;
use clap::{Arg, ArgMatches};
use life_common::{gameloop::Timer, intro, Game, GameConfig, Grid, Layout, Repaint, RunState};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    controls::Command,
    surface::{status, TextSurface},
};

const DEFAULT_WIDTH: &str = "800";
const DEFAULT_HEIGHT: &str = "400";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let matches = app().get_matches();

    use tracing_subscriber::layer::SubscriberExt;
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(tracing_subscriber::EnvFilter::try_new(
                matches
                    .value_of("log")
                    .unwrap_or("life_term=info,life_common=info"),
            )?),
    )?;

    let config = build_config(&matches)?;
    let pattern = matches.value_of("pattern").map(load_pattern).transpose()?;

    let (width, height) = match &pattern {
        Some(grid) => (
            grid.cols() as u32 * config.cell_size,
            grid.rows() as u32 * config.cell_size,
        ),
        None => (
            parse_arg::<u32>(&matches, "width")?,
            parse_arg::<u32>(&matches, "height")?,
        ),
    };
    let mut surface = TextSurface::new(width, height, config.cell_size);
    let layout = Layout::of(&surface, config.cell_size);
    for line in layout.to_string().lines() {
        info!("{}", line);
    }

    let mut game = Game::new(&config, layout.rows, layout.cols)?;
    let generations = matches
        .value_of("generations")
        .map(|value| value.parse::<u64>())
        .transpose()
        .context("could not parse --generations")?;

    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        controls::forward_lines(stdin.lock(), command_tx)
    });

    let mut stdout = std::io::stdout();
    prepare(&mut game, &mut surface, &mut stdout, &config, pattern).await?;
    drop_pending(&mut command_rx);

    if matches.is_present("autostart") {
        game.start();
    }
    info!("type start, pause, reset or quit");
    run(
        &mut game,
        &mut surface,
        &mut stdout,
        config.tick_period(),
        command_rx,
        generations,
    )
    .await?;

    info!(
        generation = game.generation().0,
        population = game.grid().population(),
        "game over"
    );
    Ok(())
}

fn app() -> clap::App<'static, 'static> {
    clap::App::new("life_term")
        .about("Conway's Game of Life on a toroidal grid, in the terminal")
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .help("read game settings from a JSON file"),
        )
        .arg(
            Arg::with_name("pattern")
                .long("pattern")
                .takes_value(true)
                .help("start from a plaintext pattern file, '!' lines are comments"),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .default_value(DEFAULT_WIDTH)
                .help("surface width in pixels, divided by the cell size into columns"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .default_value(DEFAULT_HEIGHT)
                .help("surface height in pixels, divided by the cell size into rows"),
        )
        .arg(
            Arg::with_name("cell-size")
                .long("cell-size")
                .takes_value(true)
                .help("cell size in pixels"),
        )
        .arg(
            Arg::with_name("period")
                .long("period")
                .takes_value(true)
                .help("milliseconds between generations"),
        )
        .arg(
            Arg::with_name("probability")
                .long("probability")
                .takes_value(true)
                .help("chance of each cell starting alive"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("seed the random population for a reproducible run"),
        )
        .arg(
            Arg::with_name("repaint")
                .long("repaint")
                .takes_value(true)
                .possible_values(&["full", "changed"])
                .help("repaint every cell or only changed cells each generation"),
        )
        .arg(
            Arg::with_name("generations")
                .long("generations")
                .takes_value(true)
                .help("stop after this many generations"),
        )
        .arg(
            Arg::with_name("autostart")
                .long("autostart")
                .help("start ticking without waiting for a start command"),
        )
        .arg(
            Arg::with_name("no-intro")
                .long("no-intro")
                .help("skip the start-up animation"),
        )
        .arg(
            Arg::with_name("log")
                .long("log")
                .takes_value(true)
                .help("tracing filter, e.g. life_common=trace"),
        )
}

fn parse_arg<T>(matches: &ArgMatches<'_>, name: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = matches
        .value_of(name)
        .with_context(|| format!("missing --{}", name))?;
    value
        .parse()
        .with_context(|| format!("could not parse --{} {:?}", name, value))
}

fn build_config(matches: &ArgMatches<'_>) -> anyhow::Result<GameConfig> {
    let mut config = match matches.value_of("config") {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("could not open {}", path))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("could not parse {}", path))?
        }
        None => GameConfig::default(),
    };
    if matches.is_present("cell-size") {
        config.cell_size = parse_arg(matches, "cell-size")?;
    }
    if matches.is_present("period") {
        config.tick_period_ms = parse_arg(matches, "period")?;
    }
    if matches.is_present("probability") {
        config.alive_probability = parse_arg(matches, "probability")?;
    }
    if matches.is_present("seed") {
        config.seed = Some(parse_arg(matches, "seed")?);
    }
    match matches.value_of("repaint") {
        Some("changed") => config.repaint = Repaint::Changed,
        Some("full") => config.repaint = Repaint::Full,
        _ => {}
    }
    if matches.is_present("no-intro") {
        config.intro = false;
    }
    config.validate()?;
    debug!(?config, "loaded config");
    Ok(config)
}

fn load_pattern<P: AsRef<Path>>(path: P) -> anyhow::Result<Grid> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    parse_pattern(&text).with_context(|| format!("could not load {}", path.display()))
}

fn parse_pattern(text: &str) -> life_common::Result<Grid> {
    let rows = text
        .lines()
        .map(|line| line.trim_end())
        .filter(|line| !line.starts_with('!') && !line.is_empty())
        .collect::<Vec<_>>();
    // plaintext patterns may leave trailing dead cells off
    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
    let padded = rows
        .iter()
        .map(|row| format!("{:.<width$}", row, width = width))
        .collect::<Vec<_>>();
    Grid::from_rows(&padded)
}

fn present<W: Write>(out: &mut W, surface: &mut TextSurface, game: &Game) -> std::io::Result<()> {
    let state = match game.run_state() {
        RunState::Unstarted => "waiting for start",
        RunState::Running => "running",
        RunState::Paused => "paused",
    };
    write!(out, "\x1b[2J\x1b[H{}", surface.take_frame())?;
    writeln!(
        out,
        "{}",
        status(game.generation().0, game.grid().population(), state)
    )?;
    out.flush()
}

/// Draws the starting grid, animated unless the config turns the intro off.
/// The game's controls are locked until it is done.
async fn prepare<W: Write>(
    game: &mut Game,
    surface: &mut TextSurface,
    out: &mut W,
    config: &GameConfig,
    pattern: Option<Grid>,
) -> anyhow::Result<()> {
    game.lock_controls();
    if let Some(pattern) = pattern {
        game.apply_intro(intro::IntroStep::DrawGrid, surface);
        game.load(pattern, surface)?;
    } else if config.intro {
        for (delay, step) in intro::schedule() {
            tokio::time::sleep(delay).await;
            game.apply_intro(step, surface);
            present(out, surface, game)?;
        }
    } else {
        for step in intro::immediate() {
            game.apply_intro(step, surface);
        }
    }
    game.unlock_controls();
    present(out, surface, game)?;
    Ok(())
}

/// Discards commands typed while the intro was playing.
fn drop_pending(commands: &mut mpsc::UnboundedReceiver<Command>) -> usize {
    let mut dropped = 0;
    while let Ok(command) = commands.try_recv() {
        debug!(?command, "ignoring input sent during the intro");
        dropped += 1;
    }
    dropped
}

async fn run<W: Write>(
    game: &mut Game,
    surface: &mut TextSurface,
    out: &mut W,
    period: std::time::Duration,
    mut commands: mpsc::UnboundedReceiver<Command>,
    generations: Option<u64>,
) -> anyhow::Result<()> {
    let mut timer = Timer::new(period);
    let mut ticking = game.run_state() == RunState::Running;
    let mut controls_open = true;
    let mut ticks = 0u64;

    loop {
        if !ticking && !controls_open {
            warn!("controls closed before the game started");
            return Ok(());
        }
        if ticking {
            timer.update();
        }

        tokio::select! {
            command = commands.recv(), if controls_open => {
                match command {
                    Some(Command::Start) => {
                        if game.start() {
                            timer.reset();
                            ticking = true;
                        }
                    }
                    Some(Command::Pause) => game.pause(),
                    Some(Command::Reset) => game.reset(surface),
                    Some(Command::Quit) => return Ok(()),
                    None => controls_open = false,
                }
                present(out, surface, game)?;
            }
            _ = tokio::time::sleep(timer.until_next_tick()), if ticking => {
                timer.update();
                while timer.tick() {
                    if game.tick(surface) {
                        ticks += 1;
                    }
                    if generations.map_or(false, |limit| ticks >= limit) {
                        present(out, surface, game)?;
                        return Ok(());
                    }
                }
                if surface.is_dirty() {
                    present(out, surface, game)?;
                }
            }
        }
    }
}
