use clap::{ArgAction, Parser, Subcommand};
use commands::{config, interactive, lookup};
use popcorn_config::PathManager;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;
mod render;
mod ui;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "usePopcorn - search movies, rate them, keep a watched list")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to the rotating log file instead of stderr
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies by title
    Search {
        /// Search text (at least 3 characters)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show the full details of one movie
    Show {
        /// IMDb identifier, e.g. tt1375666
        imdb_id: String,
    },
    /// Interactive session: search, open, rate and track watched movies (default)
    #[command(long_about = "Start a line-based session. Type /<text> to search, select <n> to open a result, add <1-10> to rate it into the watched list, and summary for averages. The watched list lives only as long as the session.")]
    Interactive,
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a config file, prompting for the OMDb API key
    Init {
        /// OMDb API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,

        /// Overwrite an existing file without asking
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = if cli.log_file {
        let paths = PathManager::default();
        paths
            .ensure_directories()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create log directory: {}", e))?;
        Some(paths.log_file())
    } else {
        None
    };
    logging::init_logging(cli.verbose, cli.quiet, log_file.as_deref())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config_override = cli.config.as_deref();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Search { query } => {
            let controller = commands::build_controller(config_override)?;
            lookup::run_search(controller, &query.join(" "), &output).await
        }
        Commands::Show { imdb_id } => {
            let controller = commands::build_controller(config_override)?;
            lookup::run_show(controller, &imdb_id, &output).await
        }
        Commands::Interactive => {
            let controller = commands::build_controller(config_override)?;
            interactive::run_interactive(controller, &output).await
        }
        Commands::Config { cmd } => config::run_config(cmd, config_override, &output).await,
    }
}
