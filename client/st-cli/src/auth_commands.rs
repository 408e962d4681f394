use clap::Subcommand;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with a Google ID token
    Google {
        #[arg(long)]
        id_token: String,
    },
    /// Sign in with an Apple ID token
    Apple {
        #[arg(long)]
        id_token: String,
    },
    /// Store an access/refresh pair obtained elsewhere
    Import {
        #[arg(long)]
        access_token: String,
        #[arg(long)]
        refresh_token: String,
    },
    /// Show whether credentials are stored and when they expire
    Status,
    /// Refresh the token pair now
    Refresh,
    /// Revoke the refresh token and forget local credentials
    Logout,
}
