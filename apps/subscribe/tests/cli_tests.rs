//! End-to-end tests for CLI commands against snapshot files on disk.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use std::path::{Path, PathBuf};
use subscribe::cli::{Cli, execute, load_catalog};
use subscribe::config::Settings;
use subscribe_core::{Signature, SubscribeError, SubscriptionKeys};
use tempfile::{TempDir, tempdir};

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempdir().expect("temp dir"),
        }
    }

    fn snapshot(&self) -> PathBuf {
        self.dir.path().join("catalog.sub")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Run one command line against this workspace's snapshot.
    fn run(&self, args: &[&str]) -> Result<String, SubscribeError> {
        let cli = Cli::try_parse_from(std::iter::once("subscribe").chain(args.iter().copied()))
            .unwrap();
        let snapshot = self.snapshot();
        let settings = Settings::resolve(
            cli.config.as_deref(),
            Some(cli.snapshot.as_deref().unwrap_or(&snapshot)),
            |_: &str| None,
        )?;
        let mut out = Vec::new();
        execute(&cli, &settings, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }
}

fn sig(namespace: &str, identifier: &str) -> Signature {
    Signature::new(namespace, identifier).unwrap()
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let ws = Workspace::new();
    ws.run(&["init"]).unwrap();
    assert!(ws.snapshot().exists());

    assert!(matches!(ws.run(&["init"]), Err(SubscribeError::IoError(_))));
    ws.run(&["init", "--force"]).unwrap();
}

#[test]
fn index_then_search_round_trips_through_snapshot() {
    let ws = Workspace::new();
    ws.run(&["index", "--id", "Ford", "--uid", "U1", "--name", "like"])
        .unwrap();
    ws.run(&[
        "index", "--id", "Toyota", "--uid", "U1", "--name", "like", "--name", "love",
    ])
    .unwrap();

    let catalog = load_catalog(&ws.snapshot()).unwrap();
    assert_eq!(catalog.index_names().collect::<Vec<_>>(), vec!["like", "love"]);

    let out = ws
        .run(&["--json-mode", "search", "--query", r#"{"like": "U1", "love": "U1"}"#])
        .unwrap();
    let hits: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(hits, serde_json::json!([["member", "Toyota"]]));

    let out = ws.run(&["search", "--query", r#""U1""#]).unwrap();
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec!["subscriber (member, Ford)", "subscriber (member, Toyota)"]
    );
}

#[test]
fn unindex_removes_edge() {
    let ws = Workspace::new();
    ws.run(&["index", "--id", "Ford", "--uid", "U1", "--name", "like"])
        .unwrap();
    ws.run(&["-q", "unindex", "--id", "Ford", "--uid", "U1", "--name", "like"])
        .unwrap();

    let catalog = load_catalog(&ws.snapshot()).unwrap();
    assert!(catalog.get_index("like").unwrap().is_empty());
    assert_eq!(
        ws.run(&["search", "--query", r#"["member", "Ford"]"#]).unwrap(),
        "No results\n"
    );
}

#[test]
fn invalid_query_reports_error() {
    let ws = Workspace::new();
    assert!(matches!(
        ws.run(&["search", "--query", "42"]),
        Err(SubscribeError::InvalidQuery(_))
    ));
    assert!(matches!(
        ws.run(&["search", "--query", r#"["member"]"#]),
        Err(SubscribeError::InvalidSignature(_))
    ));
}

#[test]
fn empty_name_leaves_snapshot_untouched() {
    let ws = Workspace::new();
    ws.run(&["index", "--id", "Ford", "--uid", "U1", "--name", "like"])
        .unwrap();
    let before = std::fs::read(ws.snapshot()).unwrap();

    assert!(matches!(
        ws.run(&["index", "--id", "GM", "--uid", "U2", "--name", "hate", "--name", ""]),
        Err(SubscribeError::InvalidName)
    ));
    assert_eq!(std::fs::read(ws.snapshot()).unwrap(), before);
}

#[test]
fn status_reports_edge_counts() {
    let ws = Workspace::new();
    ws.run(&[
        "index", "--namespace", "email", "--id", "me@example.com", "--uid", "U1", "--name",
        "invited",
    ])
    .unwrap();

    let out = ws.run(&["--json-mode", "status"]).unwrap();
    let status: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(status["index_count"], 1);
    assert_eq!(status["edge_count"], 1);
    assert_eq!(status["indexes"][0]["name"], "invited");

    // no subcommand falls back to status
    let text = ws.run(&[]).unwrap();
    assert!(text.contains("Indexes:  1"));
}

#[test]
fn export_writes_json_snapshot() {
    let ws = Workspace::new();
    ws.run(&["index", "--id", "Ford", "--uid", "U1", "--name", "like"])
        .unwrap();
    let output = ws.path("export.json");
    ws.run(&["-q", "export", "--output", output.to_str().unwrap()])
        .unwrap();

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(exported["indexes"][0]["name"], "like");

    let missing_dir = ws.path("nope").join("export.json");
    assert!(ws
        .run(&["export", "--output", missing_dir.to_str().unwrap()])
        .is_err());
}

#[test]
fn key_matches_library_generation() {
    let ws = Workspace::new();
    let out = ws
        .run(&["key", "--id", "Ford", "--uid", "U1", "--name", "like"])
        .unwrap();
    let expected = SubscriptionKeys::generate("like", &sig("member", "Ford"), &"U1".into());
    assert_eq!(out.trim(), expected);
    // key generation is pure: no snapshot is written
    assert!(!ws.snapshot().exists());
}

#[test]
fn config_file_supplies_snapshot_path() {
    let ws = Workspace::new();
    let configured = ws.path("from-config.sub");
    let config = ws.path("subscribe.toml");
    std::fs::write(
        &config,
        format!("[catalog]\nsnapshot = {:?}\n", configured.to_str().unwrap()),
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "subscribe",
        "--config",
        config.to_str().unwrap(),
        "index",
        "--id",
        "Ford",
        "--uid",
        "U1",
        "--name",
        "like",
    ])
    .unwrap();
    let settings = Settings::resolve(cli.config.as_deref(), None, |_: &str| None).unwrap();
    assert_eq!(settings.snapshot, configured);

    execute(&cli, &settings, &mut Vec::new()).unwrap();
    assert!(Path::new(&configured).exists());
    assert!(!ws.snapshot().exists());
}
