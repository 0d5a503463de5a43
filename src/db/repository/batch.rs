//! Repository functions for recycling batches.

use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::enums::{BatchStatus, PlasticType};
use crate::models::BatchRecord;

const BATCH_COLUMNS: &str =
    "batch_id, center_id, collector_profile_id, plastic_type, weight_grams, status, recorded_at";

/// Insert a batch, replacing any existing row with the same id.
pub fn upsert_batch(conn: &Connection, batch: &BatchRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO recycling_batches (batch_id, center_id, collector_profile_id, plastic_type, weight_grams, status, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(batch_id) DO UPDATE SET
            center_id = excluded.center_id,
            collector_profile_id = excluded.collector_profile_id,
            plastic_type = excluded.plastic_type,
            weight_grams = excluded.weight_grams,
            status = excluded.status,
            recorded_at = excluded.recorded_at",
        params![
            batch.batch_id,
            batch.center_id,
            batch.collector_profile_id,
            batch.plastic_type.as_str(),
            i64::from(batch.weight_grams),
            batch.status.as_str(),
            batch.recorded_at,
        ],
    )?;
    Ok(())
}

/// Get a batch by its id.
pub fn get_batch(conn: &Connection, batch_id: &str) -> Result<Option<BatchRecord>, DatabaseError> {
    let sql = format!("SELECT {BATCH_COLUMNS} FROM recycling_batches WHERE batch_id = ?1");
    let raw = conn
        .query_row(&sql, params![batch_id], read_batch_row)
        .optional()?;

    raw.map(BatchRow::into_record).transpose()
}

/// All batches dropped off at a recycling center, oldest first.
pub fn list_batches_by_center(
    conn: &Connection,
    center_id: &str,
) -> Result<Vec<BatchRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {BATCH_COLUMNS} FROM recycling_batches WHERE center_id = ?1
         ORDER BY recorded_at ASC, batch_id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![center_id], read_batch_row)?;

    let mut batches = Vec::new();
    for row in rows {
        batches.push(row?.into_record()?);
    }
    Ok(batches)
}

/// Column values as stored; enum columns are validated in `into_record`.
struct BatchRow {
    batch_id: String,
    center_id: String,
    collector_profile_id: String,
    plastic_type: String,
    weight_grams: i64,
    status: String,
    recorded_at: chrono::NaiveDateTime,
}

fn read_batch_row(row: &Row<'_>) -> rusqlite::Result<BatchRow> {
    Ok(BatchRow {
        batch_id: row.get(0)?,
        center_id: row.get(1)?,
        collector_profile_id: row.get(2)?,
        plastic_type: row.get(3)?,
        weight_grams: row.get(4)?,
        status: row.get(5)?,
        recorded_at: row.get(6)?,
    })
}

impl BatchRow {
    fn into_record(self) -> Result<BatchRecord, DatabaseError> {
        let weight_grams = u32::try_from(self.weight_grams).map_err(|_| {
            DatabaseError::ConstraintViolation(format!(
                "batch {} has out-of-range weight {}",
                self.batch_id, self.weight_grams
            ))
        })?;

        Ok(BatchRecord {
            plastic_type: PlasticType::from_str(&self.plastic_type)?,
            status: BatchStatus::from_str(&self.status)?,
            batch_id: self.batch_id,
            center_id: self.center_id,
            collector_profile_id: self.collector_profile_id,
            weight_grams,
            recorded_at: self.recorded_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use chrono::NaiveDate;

    fn batch(id: &str, center: &str, day: u32) -> BatchRecord {
        BatchRecord {
            batch_id: id.into(),
            center_id: center.into(),
            collector_profile_id: "user-1".into(),
            plastic_type: PlasticType::Pet,
            weight_grams: 1_250,
            status: BatchStatus::Collected,
            recorded_at: NaiveDate::from_ymd_opt(2026, 3, day)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn insert_and_get() {
        let conn = open_memory_database().unwrap();
        let b = batch("B-1", "RC-42", 1);
        upsert_batch(&conn, &b).unwrap();

        let loaded = get_batch(&conn, "B-1").unwrap().unwrap();
        assert_eq!(loaded, b);
    }

    #[test]
    fn get_missing_returns_none() {
        let conn = open_memory_database().unwrap();
        assert!(get_batch(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn upsert_replaces_existing_row() {
        let conn = open_memory_database().unwrap();
        let mut b = batch("B-1", "RC-42", 1);
        upsert_batch(&conn, &b).unwrap();

        b.status = BatchStatus::Recycled;
        b.weight_grams = 900;
        upsert_batch(&conn, &b).unwrap();

        let loaded = get_batch(&conn, "B-1").unwrap().unwrap();
        assert_eq!(loaded.status, BatchStatus::Recycled);
        assert_eq!(loaded.weight_grams, 900);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM recycling_batches", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn list_by_center_filters_and_orders() {
        let conn = open_memory_database().unwrap();
        upsert_batch(&conn, &batch("B-3", "RC-42", 3)).unwrap();
        upsert_batch(&conn, &batch("B-1", "RC-42", 1)).unwrap();
        upsert_batch(&conn, &batch("B-2", "RC-7", 2)).unwrap();

        let ids: Vec<String> = list_batches_by_center(&conn, "RC-42")
            .unwrap()
            .into_iter()
            .map(|b| b.batch_id)
            .collect();
        assert_eq!(ids, vec!["B-1", "B-3"]);
    }

    #[test]
    fn zero_weight_rejected_by_schema() {
        let conn = open_memory_database().unwrap();
        let mut b = batch("B-1", "RC-42", 1);
        b.weight_grams = 0;
        assert!(upsert_batch(&conn, &b).is_err());
    }

    #[test]
    fn corrupt_enum_column_surfaces_invalid_enum() {
        let conn = open_memory_database().unwrap();
        upsert_batch(&conn, &batch("B-1", "RC-42", 1)).unwrap();
        conn.execute(
            "UPDATE recycling_batches SET plastic_type = 'glass' WHERE batch_id = 'B-1'",
            [],
        )
        .unwrap();

        let err = get_batch(&conn, "B-1").unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }
}
