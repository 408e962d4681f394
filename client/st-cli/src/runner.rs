use crate::auth_commands::AuthCommands;
use crate::commands::Commands;
use crate::error::{CliError, Result as CliResult};
use crate::profile_commands::ProfileCommands;
use crate::{Cli, logger};

use st_config::Config;
use st_session::{
    AccessClaims, AuthProvider, ProfileUpdateData, SaveQueue, SaveQueueEvent, SessionContext,
    TokenPair,
};

use std::path::Path;

use log::{debug, info, warn};
use serde_json::{Map, Value, json};
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;

/// Load config, start logging, wire the session and execute one command.
pub async fn run(cli: Cli) -> CliResult<Value> {
    let mut config = Config::load()?;
    if let Some(server) = cli.server {
        config.api.base_url = server;
    }
    config.validate()?;

    logger::initialize(
        config.logging.level,
        config.log_file_path()?,
        config.logging.colored,
    )?;
    info!("story v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let context = SessionContext::from_config(&config)?;
    let result = match cli.command {
        Commands::Auth { action } => run_auth(&context, action).await,
        Commands::Profile { action } => run_profile(&context, action).await,
    };

    // Nothing may fire into a runtime that is shutting down.
    context.save_queue.cancel_pending_retries();
    result
}

async fn run_auth(context: &SessionContext, action: AuthCommands) -> CliResult<Value> {
    let session = &context.session;

    match action {
        AuthCommands::Google { id_token } => {
            let user = session.sign_in(AuthProvider::Google, &id_token).await?;
            Ok(json!({ "signedIn": true, "user": user }))
        }
        AuthCommands::Apple { id_token } => {
            let user = session.sign_in(AuthProvider::Apple, &id_token).await?;
            Ok(json!({ "signedIn": true, "user": user }))
        }
        AuthCommands::Import {
            access_token,
            refresh_token,
        } => {
            session
                .store_tokens(&TokenPair::new(access_token, refresh_token))
                .await?;
            Ok(json!({ "imported": true }))
        }
        AuthCommands::Status => {
            if !session.is_authenticated().await {
                return Ok(json!({ "authenticated": false }));
            }

            let mut status = json!({ "authenticated": true });
            match session.current_claims().await {
                Ok(Some(claims)) => {
                    claim_fields(&mut status, &claims, chrono::Utc::now().timestamp());
                }
                Ok(None) => {}
                Err(e) => {
                    debug!("Access token unreadable: {e}");
                    status["tokenReadable"] = json!(false);
                }
            }
            Ok(status)
        }
        AuthCommands::Refresh => {
            let profile = session.perform_token_refresh().await?;
            Ok(json!({ "refreshed": true, "profile": profile }))
        }
        AuthCommands::Logout => {
            session.sign_out().await?;
            Ok(json!({ "signedOut": true }))
        }
    }
}

async fn run_profile(context: &SessionContext, action: ProfileCommands) -> CliResult<Value> {
    let queue = &context.save_queue;

    match action {
        ProfileCommands::Get => {
            let profile = context.profiles.get_profile().await?;
            Ok(json!({ "profile": profile }))
        }
        ProfileCommands::Save {
            file,
            nickname,
            avatar_type,
            avatar_id,
            notifications,
            schedule,
            no_wait,
        } => {
            let data = match file {
                Some(path) => read_snapshot(&path)?,
                None => build_snapshot(nickname, avatar_type, avatar_id, notifications, schedule)?,
            };

            let mut events = queue.subscribe();
            let id = queue.queue_profile_save(data).await?;
            if no_wait {
                return Ok(json!({ "id": id, "status": "queued" }));
            }

            wait_for_outcome(queue, &mut events, &id).await
        }
        ProfileCommands::Pending => {
            let pending = queue.pending_saves().await?;
            Ok(json!({ "count": pending.len(), "pending": pending }))
        }
        ProfileCommands::Flush => {
            queue.retry_pending_saves().await?;
            let remaining = queue.pending_saves().await?.len();
            Ok(json!({ "remaining": remaining }))
        }
        ProfileCommands::Delete => {
            context.profiles.delete_profile().await?;
            Ok(json!({ "deleted": true }))
        }
    }
}

pub(crate) fn claim_fields(status: &mut Value, claims: &AccessClaims, now: i64) {
    status["userId"] = json!(claims.sub);
    status["provider"] = json!(claims.provider);
    status["expiresAt"] = json!(claims.exp);
    status["expiresInSecs"] = json!(claims.seconds_remaining(now));
}

/// Follow queue events until the entry `id` reaches a final state.
///
/// The entry can also leave the queue under another id's event, when an
/// older leftover with a later timestamp is sent and supersedes it.
pub(crate) async fn wait_for_outcome(
    queue: &SaveQueue,
    events: &mut Receiver<SaveQueueEvent>,
    id: &str,
) -> CliResult<Value> {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                debug!("Missed {skipped} save queue events");
                if !is_pending(queue, id).await? {
                    return Ok(json!({ "id": id, "status": "resolved" }));
                }
                continue;
            }
            Err(RecvError::Closed) => return Ok(json!({ "id": id, "status": "queued" })),
        };

        if event.id() == Some(id) {
            match event {
                SaveQueueEvent::Synced { .. } => {
                    return Ok(json!({ "id": id, "status": "synced" }));
                }
                SaveQueueEvent::Deferred { reason, .. } => {
                    return Ok(json!({ "id": id, "status": "deferred", "reason": reason }));
                }
                SaveQueueEvent::Abandoned { error, .. } => {
                    return Ok(json!({ "id": id, "status": "abandoned", "error": error }));
                }
                SaveQueueEvent::RetryScheduled {
                    retry_count, delay, ..
                } => {
                    info!("Attempt {retry_count} failed, retrying in {delay:?}");
                }
                SaveQueueEvent::Stalled { .. } => {}
            }
            continue;
        }

        match event {
            SaveQueueEvent::Stalled { error } => {
                warn!("Save queue stopped, entry {id} stays queued: {error}");
                return Ok(json!({ "id": id, "status": "stalled", "error": error }));
            }
            SaveQueueEvent::Deferred { .. } => {
                return Ok(json!({ "id": id, "status": "deferred" }));
            }
            SaveQueueEvent::Synced { id: sent, .. } => {
                if !is_pending(queue, id).await? {
                    return Ok(json!({ "id": id, "status": "superseded", "by": sent }));
                }
            }
            SaveQueueEvent::Abandoned { id: dropped, .. } => {
                if !is_pending(queue, id).await? {
                    return Ok(json!({ "id": id, "status": "abandoned", "with": dropped }));
                }
            }
            SaveQueueEvent::RetryScheduled { .. } => {}
        }
    }
}

async fn is_pending(queue: &SaveQueue, id: &str) -> CliResult<bool> {
    Ok(queue.pending_saves().await?.iter().any(|save| save.id == id))
}

pub(crate) fn read_snapshot(path: &Path) -> CliResult<ProfileUpdateData> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CliError::input("file", format!("{}: {e}", path.display())))?;
    serde_json::from_str(&contents)
        .map_err(|e| CliError::input("file", format!("{}: {e}", path.display())))
}

pub(crate) fn build_snapshot(
    nickname: Option<String>,
    avatar_type: Option<String>,
    avatar_id: Option<String>,
    notifications: Option<String>,
    schedule: Option<String>,
) -> CliResult<ProfileUpdateData> {
    Ok(ProfileUpdateData {
        nickname: nickname.ok_or_else(|| CliError::input("nickname", "required"))?,
        avatar_type: avatar_type.ok_or_else(|| CliError::input("avatar-type", "required"))?,
        avatar_id,
        notifications: parse_object("notifications", notifications)?,
        schedule: parse_object("schedule", schedule)?,
    })
}

fn parse_object(argument: &str, raw: Option<String>) -> CliResult<Map<String, Value>> {
    let Some(raw) = raw else {
        return Ok(Map::new());
    };

    match serde_json::from_str(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::input(argument, "expected a JSON object")),
        Err(e) => Err(CliError::input(argument, e.to_string())),
    }
}
