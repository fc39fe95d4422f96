//! Integration tests for the record sources
//!
//! SQLite tests use an in-memory reference table; ClickHouse tests use a stub
//! HTTP server that speaks `FORMAT JSONCompact`.

use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use compass_domain::traits::RecordSource;
use compass_source::{ClickHouseSettings, ClickHouseSource, SeedQuery, Selection, SourceError, SqliteSource};
use rusqlite::{params, Connection};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Reference table with the status in column 32 and the ordering columns after it
fn reference_table() -> Connection {
    let conn = Connection::open_in_memory().unwrap();

    let filler: Vec<String> = (2..32).map(|i| format!("c{} TEXT", i)).collect();
    let ddl = format!(
        "CREATE TABLE reference_compass (uuid TEXT, inn TEXT, {}, dadata_status TEXT, last_updated TEXT, original_file_name TEXT)",
        filler.join(", ")
    );
    conn.execute(&ddl, []).unwrap();
    conn
}

fn insert(conn: &Connection, uuid: &str, inn: &str, status: Option<&str>, last_updated: Option<&str>, file: &str) {
    conn.execute(
        "INSERT INTO reference_compass (uuid, inn, dadata_status, last_updated, original_file_name) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![uuid, inn, status, last_updated, file],
    )
    .unwrap();
}

#[tokio::test]
async fn test_sqlite_all_rows() {
    let conn = reference_table();
    insert(&conn, "u1", "7707083893", Some("ACTIVE"), Some("2024-01-01 00:00:00"), "a.xlsx");
    insert(&conn, "u2", "7736050003", None, None, "b.xlsx");

    let source = SqliteSource::from_connection(conn, SeedQuery::new("reference_compass", Selection::All))
        .with_from_cache(true);
    let seeds = source.fetch_seeds().await.unwrap();

    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].uuid, "u1");
    assert_eq!(seeds[0].inn, "7707083893");
    assert_eq!(seeds[0].dadata_status.as_deref(), Some("ACTIVE"));
    assert_eq!(seeds[1].dadata_status, None);
    assert!(seeds.iter().all(|s| s.from_cache));
    assert_eq!(seeds[0].last_updated, seeds[1].last_updated);
}

#[tokio::test]
async fn test_sqlite_stalest_first() {
    let conn = reference_table();
    insert(&conn, "recent", "1", None, Some("2024-06-01 00:00:00"), "a.xlsx");
    insert(&conn, "never-b", "2", None, None, "b.xlsx");
    insert(&conn, "old", "3", None, Some("2023-01-01 00:00:00"), "c.xlsx");
    insert(&conn, "never-a", "4", None, None, "a.xlsx");

    let query = SeedQuery::new("reference_compass", Selection::stalest(3));
    let source = SqliteSource::from_connection(conn, query);
    let seeds = source.fetch_seeds().await.unwrap();

    let order: Vec<&str> = seeds.iter().map(|s| s.uuid.as_str()).collect();
    assert_eq!(order, vec!["never-a", "never-b", "old"]);
}

#[tokio::test]
async fn test_sqlite_empty_table() {
    let source = SqliteSource::from_connection(reference_table(), SeedQuery::new("reference_compass", Selection::All));
    assert!(matches!(source.fetch_seeds().await, Err(SourceError::Empty)));
}

#[tokio::test]
async fn test_sqlite_missing_table() {
    let conn = Connection::open_in_memory().unwrap();
    let source = SqliteSource::from_connection(conn, SeedQuery::new("reference_compass", Selection::All));
    assert!(matches!(source.fetch_seeds().await, Err(SourceError::Database(_))));
}

async fn spawn_stub(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn settings(port: u16) -> ClickHouseSettings {
    ClickHouseSettings {
        host: "127.0.0.1".to_string(),
        port,
        database: "reference".to_string(),
        username: "reader".to_string(),
        password: "secret".to_string(),
    }
}

fn compact_row(uuid: &str, inn: &str, status: Value) -> Value {
    let mut row = vec![json!(uuid), json!(inn)];
    row.extend((2..32).map(|_| Value::Null));
    row.push(status);
    Value::Array(row)
}

#[tokio::test]
async fn test_clickhouse_query_and_rows() {
    let app = Router::new().route(
        "/",
        post(|headers: HeaderMap, body: String| async move {
            if headers.get("X-ClickHouse-User").map(|v| v.as_bytes()) != Some(b"reader".as_slice())
                || headers.get("X-ClickHouse-Key").map(|v| v.as_bytes()) != Some(b"secret".as_slice())
            {
                return (StatusCode::UNAUTHORIZED, "Authentication failed").into_response();
            }
            if body
                != "SELECT * FROM reference_compass ORDER BY last_updated NULLS FIRST, original_file_name LIMIT 19000 FORMAT JSONCompact"
            {
                return (StatusCode::BAD_REQUEST, "Syntax error").into_response();
            }
            (
                StatusCode::OK,
                Json(json!({
                    "meta": [],
                    "data": [
                        compact_row("a1", "7707083893", json!("ACTIVE")),
                        compact_row("b2", "7736050003", Value::Null)
                    ],
                    "rows": 2
                })),
            )
                .into_response()
        }),
    );
    let addr = spawn_stub(app).await;

    let source = ClickHouseSource::new(
        settings(addr.port()),
        SeedQuery::new("reference_compass", Selection::stalest(19_000)),
    );
    let seeds = source.fetch_seeds().await.unwrap();

    assert_eq!(seeds.len(), 2);
    assert_eq!(seeds[0].uuid, "a1");
    assert_eq!(seeds[0].dadata_status.as_deref(), Some("ACTIVE"));
    assert_eq!(seeds[1].inn, "7736050003");
    assert!(!seeds[1].from_cache);
}

#[tokio::test]
async fn test_clickhouse_error_status() {
    let app = Router::new().route(
        "/",
        post(|| async { (StatusCode::NOT_FOUND, "Code: 60. DB::Exception: Table reference.reference_compass doesn't exist") }),
    );
    let addr = spawn_stub(app).await;

    let source = ClickHouseSource::new(settings(addr.port()), SeedQuery::new("reference_compass", Selection::All));
    match source.fetch_seeds().await {
        Err(SourceError::Query(message)) => assert!(message.contains("doesn't exist")),
        other => panic!("Expected Query error, got {:?}", other.map(|s| s.len())),
    }
}

#[tokio::test]
async fn test_clickhouse_no_rows() {
    let app = Router::new().route("/", post(|| async { Json(json!({"meta": [], "data": [], "rows": 0})) }));
    let addr = spawn_stub(app).await;

    let source = ClickHouseSource::new(settings(addr.port()), SeedQuery::new("reference_compass", Selection::All));
    assert!(matches!(source.fetch_seeds().await, Err(SourceError::Empty)));
}

#[tokio::test]
async fn test_clickhouse_unreachable() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let source = ClickHouseSource::new(settings(port), SeedQuery::new("reference_compass", Selection::All));
    assert!(matches!(source.fetch_seeds().await, Err(SourceError::Connection(_))));
}
