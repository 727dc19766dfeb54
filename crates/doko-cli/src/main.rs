//! CLI frontend for tracking Doppelkopf club evenings.

mod commands;
mod store;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::store::SnapshotStore;

#[derive(Parser)]
#[command(
    name = "doko",
    about = "DoKo club: score game evenings and settle the kitty",
    version,
    propagate_version = true
)]
struct Cli {
    /// Snapshot file (default: platform data directory)
    #[arg(long, global = true, env = "DOKO_DATA")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage club members
    Member {
        #[command(subcommand)]
        action: MemberAction,
    },

    /// Create and inspect evenings
    Evening {
        #[command(subcommand)]
        action: EveningAction,
    },

    /// Record one round on an open evening
    Round {
        /// Winner name or id (repeat: 2 for normal, 1 or 3 for solo)
        #[arg(short, long = "winner", required = true)]
        winners: Vec<String>,

        /// Point value of the round
        #[arg(short, long)]
        points: String,

        /// The round was a solo
        #[arg(long)]
        solo: bool,

        /// Evening id (default: latest open evening)
        #[arg(short, long)]
        evening: Option<i64>,
    },

    /// Give a player a penalty, or take one back
    Penalty {
        /// Player name or id
        player: String,

        /// Take a penalty back instead of adding one
        #[arg(short, long)]
        remove: bool,

        /// Evening id (default: latest open evening)
        #[arg(short, long)]
        evening: Option<i64>,
    },

    /// Close an evening and print its settlement
    Finish {
        /// Evening id (default: latest open evening)
        #[arg(short, long)]
        evening: Option<i64>,
    },

    /// Enter rounds interactively
    Play {
        /// Evening id (default: latest open evening)
        #[arg(short, long)]
        evening: Option<i64>,
    },

    /// Show totals over all settled evenings
    Finance,

    /// Show or change settlement rates
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum MemberAction {
    /// Add a member
    Add {
        /// Member name
        name: String,
    },
    /// List members
    List,
    /// Remove a member who never played
    Remove {
        /// Member name or id
        member: String,
    },
}

#[derive(Subcommand)]
enum EveningAction {
    /// Open a new evening
    New {
        /// Participants in seat order, comma-separated (4 or 5)
        #[arg(short, long, value_delimiter = ',', required = true)]
        players: Vec<String>,

        /// Hosting member; omit for a neutral venue
        #[arg(long)]
        host: Option<String>,
    },
    /// List evenings
    List,
    /// Show standings, rounds and settlement of an evening
    Show {
        /// Evening id (default: latest evening)
        id: Option<i64>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current rates
    Show,
    /// Change one or more rates
    Set {
        /// Cost per penalty
        #[arg(long)]
        penalty_cost: Option<f64>,

        /// Amount each guest pays the host
        #[arg(long)]
        host_bonus: Option<f64>,

        /// Flat contribution per member and evening
        #[arg(long)]
        fixed_contribution: Option<f64>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = SnapshotStore::locate(cli.data).and_then(|store| run(&store, cli.command));

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(store: &SnapshotStore, command: Commands) -> Result<(), String> {
    match command {
        Commands::Member { action } => match action {
            MemberAction::Add { name } => commands::member::add(store, &name),
            MemberAction::List => commands::member::list(store),
            MemberAction::Remove { member } => commands::member::remove(store, &member),
        },
        Commands::Evening { action } => match action {
            EveningAction::New { players, host } => {
                commands::evening::new(store, &players, host.as_deref())
            }
            EveningAction::List => commands::evening::list(store),
            EveningAction::Show { id } => commands::evening::show(store, id),
        },
        Commands::Round {
            winners,
            points,
            solo,
            evening,
        } => commands::round::run(store, evening, &winners, &points, solo),
        Commands::Penalty {
            player,
            remove,
            evening,
        } => commands::penalty::run(store, evening, &player, remove),
        Commands::Finish { evening } => commands::finish::run(store, evening),
        Commands::Play { evening } => commands::play::run(store, evening),
        Commands::Finance => commands::finance::run(store),
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(store),
            SettingsAction::Set {
                penalty_cost,
                host_bonus,
                fixed_contribution,
            } => commands::settings::set(store, penalty_cost, host_bonus, fixed_contribution),
        },
    }
}
