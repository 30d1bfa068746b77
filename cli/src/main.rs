use clap::{Parser, Subcommand, ValueEnum};
use spellwatch_cli::commands::{self, Session};
use spellwatch_cli::{APP_NAME, readline};
use spellwatch_types::TrackerConfig;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), String> {
    init_logging();

    let config: TrackerConfig = confy::load(APP_NAME, None).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        TrackerConfig::default()
    });
    let mut session = Session::new(config);
    commands::restore_snapshot(&mut session);

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut session) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .from_env_lossy();

    // If SPELLWATCH_LOG_PATH is set, append to that file and keep the prompt clean
    if let Ok(path) = std::env::var("SPELLWATCH_LOG_PATH")
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser)]
#[command(version, about = "spellwatch")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CombatState {
    On,
    Off,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every tracked spell and item
    List,
    Add {
        name: String,
    },
    Remove {
        name: String,
    },
    Alpha {
        value: f32,
    },
    Size {
        value: f32,
    },
    Move {
        name: String,
        x: f32,
        y: f32,
    },
    /// Countdown text of every tracked icon
    Show,
    /// Re-read the saved configuration
    Reload {
        /// TOML file to load instead of the saved configuration
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    Save {
        /// Also export the configuration to this TOML file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    Exit,

    // Simulated client
    Learn {
        name: String,
        #[arg(short, long, default_value_t = 0)]
        tab: usize,
    },
    Cast {
        name: String,
        secs: f64,
    },
    BagPut {
        name: String,
    },
    BagTake {
        name: String,
    },
    UseItem {
        name: String,
        secs: f64,
    },
    Combat {
        #[arg(value_enum)]
        state: CombatState,
    },
    /// Let time pass
    Tick {
        #[arg(default_value_t = 1.0)]
        secs: f64,
    },
}

fn respond(line: &str, session: &mut Session) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, APP_NAME.to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::List) => commands::list(session)?,
        Some(Commands::Add { name }) => commands::add(session, name)?,
        Some(Commands::Remove { name }) => commands::remove(session, name)?,
        Some(Commands::Alpha { value }) => commands::set_alpha(session, *value)?,
        Some(Commands::Size { value }) => commands::set_size(session, *value)?,
        Some(Commands::Move { name, x, y }) => commands::move_icon(session, name, *x, *y)?,
        Some(Commands::Show) => commands::show(session)?,
        Some(Commands::Reload { file }) => commands::reload(session, file.as_deref())?,
        Some(Commands::Save { file }) => commands::save(session, file.as_deref())?,
        Some(Commands::Learn { name, tab }) => commands::learn(session, name, *tab)?,
        Some(Commands::Cast { name, secs }) => commands::cast(session, name, *secs)?,
        Some(Commands::BagPut { name }) => commands::bag_put(session, name)?,
        Some(Commands::BagTake { name }) => commands::bag_take(session, name)?,
        Some(Commands::UseItem { name, secs }) => commands::use_item(session, name, *secs)?,
        Some(Commands::Combat { state }) => {
            commands::combat(session, matches!(state, CombatState::On))?
        }
        Some(Commands::Tick { secs }) => commands::tick(session, *secs)?,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
