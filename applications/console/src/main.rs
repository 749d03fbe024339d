/// Cadence - terminal music player
use cadence_console::{load_library, Command, ConsoleConfig, Session};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence music player console", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    /// JSON library snapshot to start from
    #[arg(short, long)]
    library: Option<PathBuf>,

    /// Commands to run before reading stdin
    #[arg(short = 'e', long = "exec")]
    exec: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr keeps stdout for player output)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_console=info,cadence_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ConsoleConfig::load(cli.config.as_deref())?;
    let library = load_library(&config.library, cli.library.as_deref())?;
    tracing::info!(
        songs = library.len(),
        playlists = library.playlists().len(),
        "Starting Cadence console"
    );

    let mut session = Session::new(library, &config);
    let tick = Duration::from_millis(config.engine.tick_interval_ms);

    let mut running = true;
    for line in &cli.exec {
        if !handle_line(&mut session, line).await {
            running = false;
            break;
        }
    }

    if running {
        println!("Type `help` for commands.");
        run(&mut session, tick).await?;
    }

    session.shutdown();
    tracing::info!("Cadence console stopped");
    Ok(())
}

/// Serve stdin commands and clock ticks until `quit` or end of input
async fn run(session: &mut Session, tick: Duration) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(tick);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };
                if !handle_line(session, &line).await {
                    return Ok(());
                }
            }
            _ = ticker.tick() => {
                match session.tick(tick) {
                    Ok(output) => print_lines(&output),
                    Err(e) => eprintln!("error: {e:#}"),
                }
            }
        }
    }
}

/// Run one input line, returning `false` on quit
async fn handle_line(session: &mut Session, line: &str) -> bool {
    if line.trim().is_empty() {
        return true;
    }

    match line.parse::<Command>() {
        Ok(Command::Quit) => false,
        Ok(command) => {
            match session.execute(command).await {
                Ok(output) => print_lines(&output),
                Err(e) => eprintln!("error: {e:#}"),
            }
            true
        }
        Err(e) => {
            eprintln!("{e}");
            true
        }
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
