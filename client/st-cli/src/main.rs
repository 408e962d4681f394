//! story - storyteller session client
//!
//! Signs in, keeps the session fresh and pushes profile changes through the
//! offline save queue.
//!
//! # Examples
//!
//! ```bash
//! # Sign in with a Google ID token
//! story auth google --id-token <token>
//!
//! # Queue a profile change and wait for it to reach the server
//! story profile save --nickname Mia --avatar-type girl --pretty
//!
//! # Push whatever is still pending from earlier runs
//! story profile flush
//! ```

use st_cli::Cli;

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let pretty = cli.pretty;

    match st_cli::run(cli).await {
        Ok(value) => {
            let output = if pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
