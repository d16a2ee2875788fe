use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "focusreel", version, about = "Focusreel CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch-session lifecycle
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Feed external player state transitions
    Player {
        #[command(subcommand)]
        action: commands::player::PlayerAction,
    },
    /// Learning-goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Accrued watch time per goal
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Reflection records
    Reflect {
        #[command(subcommand)]
        action: commands::reflect::ReflectAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Player { action } => commands::player::run(action),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Progress { action } => commands::progress::run(action),
        Commands::Reflect { action } => commands::reflect::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
