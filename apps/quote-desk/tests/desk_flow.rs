//! End-to-end: sign up, create through the CLI, edit, export, delete.

use clap::Parser;
use quote_db::{Database, DbConfig};
use quote_desk::cli::{execute, Cli};
use quote_desk::config::AppConfig;
use quote_desk::error::ErrorCode;
use quote_desk::App;

async fn app(export_dir: &std::path::Path) -> App {
    let mut config = AppConfig::default();
    config.export.output_dir = export_dir.to_path_buf();
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    App::with_database(config, db)
}

fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["quote-desk", "--email", "desk@mabric.in", "--password", "secret1"];
    full.extend_from_slice(args);
    Cli::try_parse_from(full).unwrap()
}

#[tokio::test]
async fn cli_round_trip() {
    let scratch = tempfile::tempdir().unwrap();
    let dir = scratch.path();
    let app = app(dir).await;

    execute(cli(&["signup", "--full-name", "Desk User"]), &app).await.unwrap();
    execute(
        cli(&[
            "new",
            "--client-name",
            "Asha Rao",
            "--project-name",
            "Villa 12",
            "--date",
            "2025-01-01",
            "--item",
            "TV unit;10;1;10",
            "--item",
            "Shoe rack;25.05;10;1",
        ]),
        &app,
    )
    .await
    .unwrap();

    let mut session = app.session();
    session.sign_in("desk@mabric.in", "secret1").await.unwrap();
    assert_eq!(session.records().len(), 1);
    let record = session.records()[0].clone();
    assert_eq!(record.client_name, "Asha Rao");
    assert_eq!(record.project_name.as_deref(), Some("Villa 12"));
    assert_eq!(app.view(&record).grand_total, "Rs. 385.55");
    assert_eq!(app.view(&record).valid_until, "16 January 2025");

    let number = record.quotation_number.clone();
    execute(cli(&["edit", &number, "--client-name", "Asha R."]), &app)
        .await
        .unwrap();
    session.reload().await.unwrap();
    let edited = session.find_by_number(&number).unwrap();
    assert_eq!(edited.client_name, "Asha R.");
    assert_eq!(edited.id, record.id);
    assert_eq!(edited.items.len(), 2);

    for format in ["pdf", "xlsx", "csv", "html"] {
        execute(cli(&["export", &number, "--format", format]), &app)
            .await
            .unwrap();
        assert!(dir.join(format!("{number}.{format}")).exists());
    }

    execute(cli(&["delete", &number]), &app).await.unwrap();
    session.reload().await.unwrap();
    assert!(session.records().is_empty());

    let err = execute(cli(&["show", &number]), &app).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let scratch = tempfile::tempdir().unwrap();
    let app = app(scratch.path()).await;
    execute(cli(&["signup", "--full-name", "Desk User"]), &app).await.unwrap();

    let cli = Cli::try_parse_from(["quote-desk", "--email", "desk@mabric.in", "--password", "nope-nope", "list"]).unwrap();
    let err = execute(cli, &app).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthFailed);
}

#[tokio::test]
async fn blank_client_name_is_rejected() {
    let scratch = tempfile::tempdir().unwrap();
    let app = app(scratch.path()).await;
    execute(cli(&["signup", "--full-name", "Desk User"]), &app).await.unwrap();

    let err = execute(cli(&["new", "--item", "Loft;7;2;900"]), &app).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let mut session = app.session();
    session.sign_in("desk@mabric.in", "secret1").await.unwrap();
    assert!(session.records().is_empty());
}
