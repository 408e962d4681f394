use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Fetch the profile from the gateway
    Get,
    /// Queue a full profile snapshot for delivery
    Save {
        /// JSON file holding the whole snapshot (other fields are then ignored)
        #[arg(long, conflicts_with_all = ["nickname", "avatar_type"])]
        file: Option<PathBuf>,
        #[arg(long, required_unless_present = "file")]
        nickname: Option<String>,
        /// boy or girl
        #[arg(long, required_unless_present = "file")]
        avatar_type: Option<String>,
        #[arg(long)]
        avatar_id: Option<String>,
        /// JSON object, e.g. '{"bedtime":true}'
        #[arg(long)]
        notifications: Option<String>,
        /// JSON object, e.g. '{"bedtime":"19:30"}'
        #[arg(long)]
        schedule: Option<String>,
        /// Return once the save is durable instead of waiting for delivery
        #[arg(long)]
        no_wait: bool,
    },
    /// List saves that have not reached the server yet
    Pending,
    /// Send pending saves now
    Flush,
    /// Delete the profile on the gateway
    Delete,
}
