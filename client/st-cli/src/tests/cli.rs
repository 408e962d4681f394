use crate::Cli;
use crate::auth_commands::AuthCommands;
use crate::commands::Commands;
use crate::profile_commands::ProfileCommands;

use clap::{CommandFactory, Parser};

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn given_google_sign_in_when_parsing_then_id_token_captured() {
    // When
    let cli = Cli::try_parse_from(["story", "auth", "google", "--id-token", "tok"]).unwrap();

    // Then
    match cli.command {
        Commands::Auth {
            action: AuthCommands::Google { id_token },
        } => assert_eq!(id_token, "tok"),
        _ => panic!("expected auth google"),
    }
}

#[test]
fn given_global_flags_after_subcommand_when_parsing_then_accepted() {
    let cli = Cli::try_parse_from([
        "story",
        "auth",
        "status",
        "--pretty",
        "--server",
        "http://gateway:8080",
    ])
    .unwrap();

    assert!(cli.pretty);
    assert_eq!(cli.server.as_deref(), Some("http://gateway:8080"));
}

#[test]
fn given_save_without_nickname_or_file_when_parsing_then_rejected() {
    let result = Cli::try_parse_from(["story", "profile", "save", "--avatar-type", "boy"]);

    assert!(result.is_err());
}

#[test]
fn given_save_with_file_and_nickname_when_parsing_then_rejected() {
    let result = Cli::try_parse_from([
        "story",
        "profile",
        "save",
        "--file",
        "profile.json",
        "--nickname",
        "Mia",
    ]);

    assert!(result.is_err());
}

#[test]
fn given_save_flags_when_parsing_then_fields_captured() {
    // When
    let cli = Cli::try_parse_from([
        "story",
        "profile",
        "save",
        "--nickname",
        "Mia",
        "--avatar-type",
        "girl",
        "--schedule",
        r#"{"bedtime":"19:30"}"#,
        "--no-wait",
    ])
    .unwrap();

    // Then
    match cli.command {
        Commands::Profile {
            action:
                ProfileCommands::Save {
                    nickname,
                    avatar_type,
                    schedule,
                    no_wait,
                    file,
                    ..
                },
        } => {
            assert_eq!(nickname.as_deref(), Some("Mia"));
            assert_eq!(avatar_type.as_deref(), Some("girl"));
            assert!(schedule.is_some());
            assert!(no_wait);
            assert!(file.is_none());
        }
        _ => panic!("expected profile save"),
    }
}
