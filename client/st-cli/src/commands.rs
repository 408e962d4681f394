use crate::{auth_commands::AuthCommands, profile_commands::ProfileCommands};

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Sign in, inspect and end the session
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },

    /// Read and save the profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
}
