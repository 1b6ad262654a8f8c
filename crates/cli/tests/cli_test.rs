use chatlens_cli::app::{read_settings_file, App};
use chatlens_cli::commands::Cli;
use chatlens_cli::error::CliError;
use chatlens_core::AuthorReport;
use clap::Parser;
use std::fs;
use std::path::Path;

const CHAT: &str = "\
1/1/23, 9:00 AM - Ana María: morning pizza
1/1/23, 9:05 AM - Ben: pizza again?
1/2/23, 8:00 PM - Ana María: stupid rain
1/2/23, 8:01 PM - Ben: <Media omitted>
1/2/23, 8:02 PM - Ben: see you
";

fn app(dir: &Path, args: &[&str]) -> App {
    let config = dir.join("config.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    let mut argv = vec!["chatlens", "--config", config.to_str().unwrap()];
    argv.extend_from_slice(args);
    App::from_cli(Cli::try_parse_from(argv).unwrap()).unwrap()
}

#[test]
fn analyze_writes_one_report_per_author() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("chat.txt");
    fs::write(&transcript, CHAT).unwrap();
    let out = dir.path().join("reports");

    app(
        dir.path(),
        &[
            "analyze",
            transcript.to_str().unwrap(),
            "--out-dir",
            out.to_str().unwrap(),
            "--format",
            "json",
        ],
    )
    .run()
    .unwrap();

    let ana: AuthorReport =
        serde_json::from_str(&fs::read_to_string(out.join("Ana_Mar_a.json")).unwrap()).unwrap();
    assert_eq!(ana.author, "Ana María");
    assert_eq!(ana.stats.total_messages, 2);

    let ben: AuthorReport =
        serde_json::from_str(&fs::read_to_string(out.join("Ben.json")).unwrap()).unwrap();
    assert_eq!(ben.stats.total_messages, 2);
}

#[test]
fn sequential_analyze_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("chat.txt");
    fs::write(&transcript, CHAT).unwrap();

    app(
        dir.path(),
        &["analyze", transcript.to_str().unwrap(), "--sequential"],
    )
    .run()
    .unwrap();
}

#[test]
fn last_day_writes_renamed_lines() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("chat.txt");
    fs::write(&transcript, CHAT).unwrap();
    let output = dir.path().join("last.txt");

    app(
        dir.path(),
        &[
            "last-day",
            transcript.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--rename",
            "Ana María Ana",
        ],
    )
    .run()
    .unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "1/2/23, 8:00 PM - Ana: stupid rain\n\
         1/2/23, 8:01 PM - Ben: <Media omitted>\n\
         1/2/23, 8:02 PM - Ben: see you\n"
    );
}

#[test]
fn bad_rename_is_argument_error() {
    let dir = tempfile::tempdir().unwrap();
    let transcript = dir.path().join("chat.txt");
    fs::write(&transcript, CHAT).unwrap();

    let err = app(
        dir.path(),
        &["last-day", transcript.to_str().unwrap(), "--rename", "Ana"],
    )
    .run()
    .unwrap_err();
    assert!(matches!(err, CliError::Argument(_)));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("chatlens.toml");

    app(
        dir.path(),
        &["config", "init", "--path", target.to_str().unwrap()],
    )
    .run()
    .unwrap();
    let settings = read_settings_file(&target).unwrap();
    assert_eq!(settings.analysis.lexical.report_top_words, 10);

    let err = app(
        dir.path(),
        &["config", "init", "--path", target.to_str().unwrap()],
    )
    .run()
    .unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}

#[test]
fn missing_config_file_is_rejected() {
    let cli = Cli::try_parse_from(["chatlens", "--config", "/nonexistent/chatlens.toml", "config", "show"])
        .unwrap();
    assert!(matches!(App::from_cli(cli), Err(CliError::Config(_))));
}

#[test]
fn missing_transcript_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = app(dir.path(), &["analyze", "does-not-exist.txt"])
        .run()
        .unwrap_err();
    assert!(matches!(err, CliError::Io(_)));
}
