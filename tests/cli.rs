mod common;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use rusqlite::Connection;

fn count_rows(database: &std::path::Path, table: &str) -> i64 {
    let conn = Connection::open(database).expect("open database");
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
        row.get(0)
    })
    .expect("count rows")
}

#[test]
fn pipeline_prints_progress_and_saves_rows() {
    let ws = TestWorkspace::new();
    let (messages, categories) = ws.write_samples();
    let database = ws.path().join("DisasterResponse.db");

    Command::cargo_bin("disaster-etl")
        .expect("binary exists")
        .args([
            messages.to_str().unwrap(),
            categories.to_str().unwrap(),
            database.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(
            contains("Loading data...")
                .and(contains(format!("    MESSAGES: {}", messages.display())))
                .and(contains(format!("    CATEGORIES: {}", categories.display())))
                .and(contains("Cleaning data..."))
                .and(contains(format!("    DATABASE: {}", database.display())))
                .and(contains("Cleaned data saved to database!")),
        );

    assert_eq!(count_rows(&database, "DisasterResponse"), 3);
}

#[test]
fn wrong_argument_count_prints_usage_without_io() {
    let ws = TestWorkspace::new();
    let (messages, categories) = ws.write_samples();

    Command::cargo_bin("disaster-etl")
        .expect("binary exists")
        .current_dir(ws.path())
        .args([messages.to_str().unwrap(), categories.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Please provide the filepaths").and(contains("Loading data").not()));

    let entries = std::fs::read_dir(ws.path()).unwrap().count();
    assert_eq!(entries, 2);
}

#[test]
fn second_run_fails_when_table_exists() {
    let ws = TestWorkspace::new();
    let (messages, categories) = ws.write_samples();
    let database = ws.path().join("out.db");
    let args = [
        messages.to_str().unwrap().to_string(),
        categories.to_str().unwrap().to_string(),
        database.to_str().unwrap().to_string(),
    ];

    Command::cargo_bin("disaster-etl")
        .expect("binary exists")
        .args(&args)
        .assert()
        .success();

    Command::cargo_bin("disaster-etl")
        .expect("binary exists")
        .args(&args)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Table 'DisasterResponse' already exists"))
        .stdout(contains("Cleaned data saved to database!").not());

    assert_eq!(count_rows(&database, "DisasterResponse"), 3);
}

#[test]
fn replace_policy_allows_rerun() {
    let ws = TestWorkspace::new();
    let (messages, categories) = ws.write_samples();
    let database = ws.path().join("out.db");

    for _ in 0..2 {
        Command::cargo_bin("disaster-etl")
            .expect("binary exists")
            .args([
                messages.to_str().unwrap(),
                categories.to_str().unwrap(),
                database.to_str().unwrap(),
                "--if-exists",
                "replace",
                "--table",
                "labelled",
            ])
            .assert()
            .success();
    }

    assert_eq!(count_rows(&database, "labelled"), 3);
}

#[test]
fn malformed_categories_fail_before_database_is_created() {
    let ws = TestWorkspace::new();
    let messages = ws.write("messages.csv", "id,message\n1,flood\n");
    let categories = ws.write("categories.csv", "id,categories\n1,related-1;offer-?\n");
    let database = ws.path().join("out.db");

    Command::cargo_bin("disaster-etl")
        .expect("binary exists")
        .args([
            messages.to_str().unwrap(),
            categories.to_str().unwrap(),
            database.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("offer-?"));

    assert!(!database.exists());
}

#[test]
fn pipe_delimited_inputs_are_supported() {
    let ws = TestWorkspace::new();
    let messages = ws.write("messages.txt", "id|message\n1|flood; again\n");
    let categories = ws.write("categories.txt", "id|categories\n1|related-1;offer-0\n");
    let database = ws.path().join("out.db");

    Command::cargo_bin("disaster-etl")
        .expect("binary exists")
        .args([
            messages.to_str().unwrap(),
            categories.to_str().unwrap(),
            database.to_str().unwrap(),
            "--delimiter",
            "pipe",
        ])
        .assert()
        .success();

    assert_eq!(count_rows(&database, "DisasterResponse"), 1);
}
