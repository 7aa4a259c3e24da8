//! Commands against an on-disk database

use clap::Parser;
use reclaim_cli::{commands, config, Cli, Command, Formatter, OutputFormat};
use reclaim_domain::Table;
use reclaim_store::SqliteStore;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn seeded_db(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("site.db");
    let store = SqliteStore::new(&path).unwrap();
    store
        .execute_batch(
            "INSERT INTO elements (id, type, dateDeleted) VALUES
                (1, 'entry', NULL),
                (2, 'entry', '2001-01-01 00:00:00');
             INSERT INTO content (elementId, title) VALUES (1, 'Live'), (2, 'Trashed');
             INSERT INTO sessions (id, userId, token, dateUpdated)
                VALUES (1, 1, 'stale', '2001-01-01 00:00:00');",
        )
        .unwrap();
    path
}

#[test]
fn test_run_with_config_file() {
    let dir = TempDir::new().unwrap();
    let db = seeded_db(&dir);

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[janitor]").unwrap();
    writeln!(file, "probability = 0").unwrap();

    let cli = Cli::parse_from([
        "reclaim",
        "run",
        "--force",
        "--db",
        db.to_str().unwrap(),
        "--config",
        file.path().to_str().unwrap(),
    ]);
    let janitor_config = config::from_cli(&cli).unwrap();
    assert_eq!(janitor_config.probability, 0);

    let Command::Run(args) = cli.command else {
        panic!("Expected Run command");
    };
    let formatter = Formatter::new(OutputFormat::Json, false);
    let mut store = SqliteStore::new(&cli.db).unwrap();
    commands::execute_run(args, janitor_config, &mut store, &formatter).unwrap();
    drop(store);

    // Changes are durable across connections
    let store = SqliteStore::new(&db).unwrap();
    assert_eq!(store.count(Table::Sessions).unwrap(), 0);
    assert_eq!(store.count(Table::Elements).unwrap(), 1);
    assert_eq!(store.count(Table::Content).unwrap(), 1);
}

#[test]
fn test_preview_leaves_rows() {
    let dir = TempDir::new().unwrap();
    let db = seeded_db(&dir);

    let janitor_config = config::resolve(None, None).unwrap();
    let store = SqliteStore::new(&db).unwrap();
    let formatter = Formatter::new(OutputFormat::Table, false);

    commands::execute_preview(janitor_config, &store, &formatter).unwrap();

    assert_eq!(store.count(Table::Sessions).unwrap(), 1);
    assert_eq!(store.count(Table::Elements).unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_watch_bounded_cycles() {
    let dir = TempDir::new().unwrap();
    let db = seeded_db(&dir);

    let cli = Cli::parse_from(["reclaim", "watch", "--cycles", "2"]);
    let Command::Watch(args) = cli.command else {
        panic!("Expected Watch command");
    };
    let formatter = Formatter::new(OutputFormat::Table, false);

    let store = SqliteStore::new(&db).unwrap();
    commands::execute_watch(args, config::resolve(None, None).unwrap(), store, &formatter)
        .await
        .unwrap();

    let store = SqliteStore::new(&db).unwrap();
    assert_eq!(store.count(Table::Sessions).unwrap(), 0);
}
