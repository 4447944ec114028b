use clap::{Parser, Subcommand};

/// Meu Alelo as a command line interface, but better
#[derive(Parser, Debug)]
#[command(name = "alelo", version, about)]
pub struct Cli {
    /// Subcommand chosen to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase the application verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show application environment variables
    #[arg(short, long, global = true)]
    pub env: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select default, create, delete and list user profiles for Meu Alelo
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// List available profiles under the current ALELO_HOME
    List,
    /// Create a new profile under the current ALELO_HOME
    Create {
        /// Name of the new profile
        name: String,
    },
    /// Delete a profile under the current ALELO_HOME
    Delete {
        /// Name of the profile to delete
        name: String,
    },
    /// Select a default profile for this shell session
    Select {
        /// Name of the profile to use
        name: String,
    },
    /// Authenticate or refresh the session for a profile
    Authenticate {
        /// Name of the profile to use (defaults to the current profile)
        name: Option<String>,
    },
    /// Show the profile used by default
    Current,
}
