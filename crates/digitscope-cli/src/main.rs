//! `digitscope` — headless terminal client for the inference peer.

use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use digitscope_board::render;
use digitscope_bridge::BoardSession;
use digitscope_client::{PeerConnection, WsSink};
use digitscope_core::config::{Config, SyncMode};
use digitscope_core::protocol::GRID_SIZE;

#[derive(Parser)]
#[command(
    name = "digitscope",
    about = "Draw digits against a live inference peer and see what it thinks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// WebSocket URL of the inference peer (overrides config)
    #[arg(long, global = true)]
    peer: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a pointer drag on the board and render the peer's answer
    Trace {
        /// Stroke path as space-separated "row,col" pairs, e.g. "5,5 5,6 6,6"
        path: String,

        /// Batch the drag and push once at release instead of per stroke
        #[arg(long)]
        batched: bool,

        /// Also paint diagonal neighbors on each stamp
        #[arg(long)]
        diagonals: bool,
    },

    /// Fetch a random example image of a class and render it
    Example {
        /// Digit class in [0,9]
        #[arg(value_parser = clap::value_parser!(u8).range(0..=9))]
        label: u8,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config
    let config_path = cli
        .config
        .as_ref()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(Config::config_dir);
    let config = Config::load(&config_path)?;

    init_logging(&config, cli.verbose);

    let peer_url = cli.peer.clone().unwrap_or_else(|| config.peer_url());

    match cli.command {
        Commands::Trace {
            path,
            batched,
            diagonals,
        } => {
            let strokes = parse_path(&path)?;
            let sync = if batched {
                SyncMode::OnRelease
            } else {
                config.sync_mode()
            };
            let diagonals = diagonals || config.diagonal_brush();

            let mut conn = digitscope_client::connect(&peer_url).await?;
            let mut session = BoardSession::new(conn.sink.clone(), sync, diagonals);

            tracing::info!(strokes = strokes.len(), ?sync, "Replaying drag");
            session.pointer_pressed();
            for (row, col) in strokes {
                session.pointer_moved(row, col).await;
            }
            session.pointer_released().await;

            drain_answers(&mut session, &mut conn).await?;
            print_session(&session);
        }

        Commands::Example { label } => {
            let mut conn = digitscope_client::connect(&peer_url).await?;
            let mut session =
                BoardSession::new(conn.sink.clone(), config.sync_mode(), config.diagonal_brush());

            tracing::info!(label, "Requesting example image");
            session.label_pressed(label).await;

            drain_answers(&mut session, &mut conn).await?;
            print_session(&session);
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let json = serde_json::to_string_pretty(&config)?;
                println!("{json}");
            }
        },
    }

    Ok(())
}

/// Initialize logging from the config's `[logging]` section; the verbose
/// flag and `RUST_LOG` take priority over the configured level.
fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        config
            .logging
            .as_ref()
            .and_then(|l| l.level.clone())
            .unwrap_or_else(|| "info".into())
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let json = config.logging.as_ref().is_some_and(|l| l.format == "json");
    let stdout = config.logging.as_ref().is_some_and(|l| l.output == "stdout");

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match (json, stdout) {
        (true, true) => builder.json().with_writer(std::io::stdout).init(),
        (true, false) => builder.json().with_writer(std::io::stderr).init(),
        (false, true) => builder.with_writer(std::io::stdout).init(),
        (false, false) => builder.with_writer(std::io::stderr).init(),
    }
}

/// Parse a stroke path like "5,5 5,6 6,6".
fn parse_path(path: &str) -> anyhow::Result<Vec<(usize, usize)>> {
    let mut strokes = Vec::new();
    for pair in path.split_whitespace() {
        let (row, col) = pair
            .split_once(',')
            .with_context(|| format!("Bad stroke '{pair}', expected row,col"))?;
        let row: usize = row
            .trim()
            .parse()
            .with_context(|| format!("Bad row in '{pair}'"))?;
        let col: usize = col
            .trim()
            .parse()
            .with_context(|| format!("Bad col in '{pair}'"))?;
        strokes.push((row, col));
    }
    if strokes.is_empty() {
        bail!("Empty stroke path");
    }
    Ok(strokes)
}

/// Apply peer answers until the line goes quiet.
async fn drain_answers(
    session: &mut BoardSession<WsSink>,
    conn: &mut PeerConnection,
) -> anyhow::Result<()> {
    let mut applied = false;
    // generous first wait, then just mop up stragglers
    let mut wait = Duration::from_secs(5);

    loop {
        match tokio::time::timeout(wait, conn.frames.recv()).await {
            Ok(Some(frame)) => {
                session.handle_frame(frame);
                applied = true;
                wait = Duration::from_millis(300);
            }
            Ok(None) | Err(_) => break,
        }
    }

    if !applied {
        bail!("No answer from peer at all");
    }
    Ok(())
}

const RAMP: [char; 5] = [' ', '░', '▒', '▓', '█'];

fn ramp_glyph(value: f32) -> char {
    let bucket = ((value * 4.0).ceil() as usize).min(4);
    RAMP[bucket]
}

fn print_session(session: &BoardSession<WsSink>) {
    println!("board:");
    let grid = session.grid();
    for row in 0..GRID_SIZE {
        let mut line = String::with_capacity(GRID_SIZE * 2 + 2);
        for col in 0..GRID_SIZE {
            let glyph = ramp_glyph(grid.intensity(row, col).unwrap_or(0.0));
            line.push(glyph);
            line.push(glyph);
        }
        println!("  {line}");
    }

    println!("probabilities:");
    let probs = session.probabilities();
    let styles = render::probability_styles(probs);
    for (digit, style) in styles.iter().enumerate() {
        let p = probs[digit];
        let bar = "█".repeat((p * 40.0).round() as usize);
        let marker = if style.highlighted { "  ◀" } else { "" };
        println!("  {digit}  {p:>6.3}  {bar}{marker}");
    }

    println!("activations:");
    let glyphs: Vec<char> = session.weights().iter().map(|&w| ramp_glyph(w)).collect();
    for row in glyphs.chunks(32) {
        println!("  {}", row.iter().collect::<String>());
    }
}
