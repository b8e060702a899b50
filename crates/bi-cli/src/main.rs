//! CLI frontend for the Bracket Initiative engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use bi_engine::Viewer;

#[derive(Parser)]
#[command(
    name = "bi",
    about = "Bracket Initiative: grouped turn order and linked initiative for 5e encounters",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewerArg {
    Gm,
    Player,
}

impl From<ViewerArg> for Viewer {
    fn from(arg: ViewerArg) -> Self {
        match arg {
            ViewerArg::Gm => Viewer::Gm,
            ViewerArg::Player => Viewer::Player,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the combat tracker in bracketed turn order
    Order {
        /// Encounter JSON file
        #[arg(short, long, default_value = "encounter.json")]
        encounter: PathBuf,

        /// Render as seen by this viewer
        #[arg(short, long, value_enum, default_value = "gm")]
        viewer: ViewerArg,

        /// Skip the dexterity tie-break
        #[arg(long)]
        no_dex: bool,

        /// Print the tracker as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Mirror leaders' initiative onto their followers
    Follow {
        /// Encounter JSON file
        #[arg(short, long, default_value = "encounter.json")]
        encounter: PathBuf,

        /// Only re-resolve followers of this combatant (by name)
        #[arg(short, long)]
        leader: Option<String>,

        /// Save the updated encounter back to the file
        #[arg(short, long)]
        write: bool,
    },

    /// Advance to the next round and clear every roll
    NextRound {
        /// Encounter JSON file
        #[arg(short, long, default_value = "encounter.json")]
        encounter: PathBuf,

        /// Save the updated encounter back to the file
        #[arg(short, long)]
        write: bool,
    },

    /// Roll initiative, optionally with a physical die result
    Roll {
        /// Roll formula, e.g. "1d20 + 3" or "2d20kh + 3"
        formula: String,

        /// Raw die face rolled at the table (no modifiers)
        #[arg(short, long, allow_hyphen_values = true)]
        manual: Option<String>,

        /// RNG seed for a reproducible roll
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Show which game master is the elected writer
    Elect {
        /// User as ID:gm or ID:player, with an optional :inactive suffix
        #[arg(short, long = "user", required = true)]
        users: Vec<String>,

        /// Report whether this user is the writer
        #[arg(short, long)]
        local: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    commands::init_logging(cli.debug);

    let result = match cli.command {
        Commands::Order {
            encounter,
            viewer,
            no_dex,
            json,
        } => commands::order::run(&encounter, viewer.into(), no_dex, json, cli.debug),
        Commands::Follow {
            encounter,
            leader,
            write,
        } => commands::follow::run(&encounter, leader.as_deref(), write, cli.debug),
        Commands::NextRound { encounter, write } => commands::round::run(&encounter, write),
        Commands::Roll {
            formula,
            manual,
            seed,
        } => commands::roll::run(&formula, manual.as_deref(), seed, cli.debug),
        Commands::Elect { users, local } => commands::elect::run(&users, local.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
