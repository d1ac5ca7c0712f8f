//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};

/// Personal movie-list client
#[derive(Parser, Debug)]
#[command(name = "watchlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account management (login, register, logout, status)
    Auth(AuthCommand),

    /// Movie list management
    Movies(MoviesCommand),

    /// Show version
    Version,
}

// ─────────────────────────────────────────────────────────────────────────────
// Account Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub action: AuthAction,
}

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Log in and persist the session
    Login {
        /// Account email
        email: String,
    },

    /// Create a new account
    Register {
        /// Display name
        name: String,
        /// Account email
        email: String,
    },

    /// Clear the current session
    Logout,

    /// Show session status
    Status,
}

// ─────────────────────────────────────────────────────────────────────────────
// Movie Commands
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct MoviesCommand {
    #[command(subcommand)]
    pub action: MoviesAction,
}

#[derive(Subcommand, Debug)]
pub enum MoviesAction {
    /// List your movies
    List,

    /// Add a movie
    Add {
        /// Movie title
        title: String,

        #[arg(short, long)]
        director: Option<String>,

        #[arg(short, long)]
        genre: Option<String>,

        #[arg(short, long)]
        year: Option<u16>,

        /// Rating from 1 to 10
        #[arg(short, long)]
        rating: Option<u8>,
    },

    /// Edit a movie
    Edit {
        /// Movie id
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        director: Option<String>,

        #[arg(short, long)]
        genre: Option<String>,

        #[arg(short, long)]
        year: Option<u16>,

        /// Rating from 1 to 10
        #[arg(short, long)]
        rating: Option<u8>,
    },

    /// Remove a movie
    Rm {
        /// Movie id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
