use crate::schema::Bill;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub fn open(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    init(&conn)?;
    Ok(conn)
}

fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS bills (
          session TEXT NOT NULL,
          bill_id TEXT NOT NULL,
          chamber TEXT NOT NULL,
          title TEXT NOT NULL,
          action_count INTEGER NOT NULL,
          vote_count INTEGER NOT NULL,
          retrieved_at TEXT NOT NULL,
          raw_json TEXT NOT NULL,
          inserted_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
          PRIMARY KEY (session, bill_id)
        );

        CREATE INDEX IF NOT EXISTS idx_bills_retrieved_at ON bills(retrieved_at);
        "#,
    )?;
    Ok(())
}

pub fn upsert_bill(conn: &Connection, bill: &Bill) -> Result<()> {
    let raw_json = serde_json::to_string(bill)?;
    let retrieved_at = OffsetDateTime::now_utc().format(&Rfc3339)?;

    conn.execute(
        r#"
        INSERT INTO bills (
          session, bill_id, chamber, title,
          action_count, vote_count, retrieved_at, raw_json
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(session, bill_id) DO UPDATE SET
          chamber=excluded.chamber,
          title=excluded.title,
          action_count=excluded.action_count,
          vote_count=excluded.vote_count,
          retrieved_at=excluded.retrieved_at,
          raw_json=excluded.raw_json
        "#,
        params![
            bill.session,
            bill.bill_id,
            bill.chamber.as_str(),
            bill.title,
            bill.actions.len() as i64,
            bill.votes().count() as i64,
            retrieved_at,
            raw_json
        ],
    )?;

    Ok(())
}

pub fn load_bill(conn: &Connection, session: &str, bill_id: &str) -> Result<Option<Bill>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT raw_json FROM bills WHERE session = ?1 AND bill_id = ?2",
            params![session, bill_id],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}
