use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "discipulado",
    version,
    about = "Administration CLI for the Discipulado course tracker"
)]
pub struct Args {
    /// Base URL of the API, including the version prefix
    #[arg(
        long,
        env = "DISCIPULADO_API_URL",
        default_value = "http://127.0.0.1:8000/api/v1"
    )]
    pub api_url: String,

    /// Credential file (defaults to the per-user config directory)
    #[arg(long, env = "DISCIPULADO_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and persist the session credentials
    Login {
        username: String,
        /// Password; prompted on stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Show the identity of the stored session
    Whoami,
    /// Drop the stored session credentials
    Logout,
    /// List courses
    Cursos,
    /// List students visible to the session's role
    Alumnos,
    /// Attendance summary for one class session
    Dashboard {
        /// Class session number (1 to 23)
        #[arg(long, default_value_t = 1)]
        clase: u8,
    },
}
