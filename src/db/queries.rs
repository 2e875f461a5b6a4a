use crate::db::Database;
use crate::error::Result;
use crate::models::{AlertBatch, MatchedEvent, UserContext, WeatherSample};
use crate::transport::UpdateCursor;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::warn;

const UPDATE_CURSOR_KEY: &str = "telegram_update_cursor";

// Alert History Queries

impl Database {
    pub fn record_alert_batch(&self, batch: &AlertBatch) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                r#"
                INSERT INTO alert_batches
                    (sent_at, temperature_c, wind_speed_kmh, precipitation_mm)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    batch.sent_at.to_rfc3339(),
                    batch.sample.temperature_c,
                    batch.sample.wind_speed_kmh,
                    batch.sample.precipitation_mm,
                ],
            )?;
            let batch_id = tx.last_insert_rowid();

            for (position, event) in batch.events.iter().enumerate() {
                tx.execute(
                    r#"
                    INSERT INTO alert_events
                        (batch_id, position, time, context, situation, action)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    params![
                        batch_id,
                        position as i64,
                        event.time,
                        event.context.as_str(),
                        event.situation,
                        event.action,
                    ],
                )?;
            }

            tx.commit()?;
            Ok(batch_id)
        })
    }

    /// Most recent batches first, each with its events in original order
    pub fn recent_alert_batches(&self, limit: usize) -> Result<Vec<AlertBatch>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM alert_batches ORDER BY sent_at DESC, id DESC LIMIT ?1",
            )?;
            let mut batches: Vec<AlertBatch> = stmt
                .query_map([limit as i64], row_to_alert_batch)?
                .filter_map(|r| r.ok())
                .collect();

            for batch in &mut batches {
                if let Some(id) = batch.id {
                    batch.events = events_for_batch(conn, id)?;
                }
            }
            Ok(batches)
        })
    }

    /// Every recorded event, oldest first
    pub fn all_alert_events(&self) -> Result<Vec<MatchedEvent>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM alert_events ORDER BY batch_id ASC, position ASC",
            )?;
            let events = stmt
                .query_map([], row_to_event)?
                .filter_map(|r| r.ok())
                .flatten()
                .collect();
            Ok(events)
        })
    }
}

fn events_for_batch(conn: &Connection, batch_id: i64) -> Result<Vec<MatchedEvent>> {
    let mut stmt =
        conn.prepare("SELECT * FROM alert_events WHERE batch_id = ?1 ORDER BY position ASC")?;
    let events = stmt
        .query_map([batch_id], row_to_event)?
        .filter_map(|r| r.ok())
        .flatten()
        .collect();
    Ok(events)
}

fn row_to_alert_batch(row: &Row) -> rusqlite::Result<AlertBatch> {
    let sent_at_str: String = row.get("sent_at")?;

    Ok(AlertBatch {
        id: Some(row.get("id")?),
        sent_at: DateTime::parse_from_rfc3339(&sent_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        sample: WeatherSample::new(
            row.get("temperature_c")?,
            row.get("wind_speed_kmh")?,
            row.get("precipitation_mm")?,
        ),
        events: Vec::new(),
    })
}

/// Rows with an unknown context are skipped
fn row_to_event(row: &Row) -> rusqlite::Result<Option<MatchedEvent>> {
    let context_str: String = row.get("context")?;

    let Some(context) = UserContext::from_str(&context_str) else {
        warn!(context = %context_str, "Unknown user context in database, skipping event");
        return Ok(None);
    };

    Ok(Some(MatchedEvent {
        time: row.get("time")?,
        context,
        situation: row.get("situation")?,
        action: row.get("action")?,
    }))
}

// Bot State Queries

impl Database {
    pub fn get_update_cursor(&self) -> Result<UpdateCursor> {
        self.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM settings WHERE key = ?1",
                    [UPDATE_CURSOR_KEY],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;

            Ok(value
                .and_then(|v| v.parse::<i64>().ok())
                .map(UpdateCursor)
                .unwrap_or_default())
        })
    }

    pub fn set_update_cursor(&self, cursor: UpdateCursor) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
                params![UPDATE_CURSOR_KEY, cursor.0.to_string()],
            )?;
            Ok(())
        })
    }
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
