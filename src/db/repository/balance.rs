//! Repository functions for reward token balances.

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::RewardBalance;

/// Insert or overwrite a profile's balance.
pub fn upsert_balance(conn: &Connection, balance: &RewardBalance) -> Result<(), DatabaseError> {
    let tokens = i64::try_from(balance.tokens).map_err(|_| {
        DatabaseError::ConstraintViolation(format!(
            "balance for {} exceeds storable range",
            balance.profile_id
        ))
    })?;

    conn.execute(
        "INSERT INTO reward_balances (profile_id, tokens, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(profile_id) DO UPDATE SET
            tokens = excluded.tokens,
            updated_at = excluded.updated_at",
        params![balance.profile_id, tokens, balance.updated_at],
    )?;
    Ok(())
}

/// Get a profile's balance, `None` if the profile has no row yet.
pub fn get_balance(
    conn: &Connection,
    profile_id: &str,
) -> Result<Option<RewardBalance>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT profile_id, tokens, updated_at FROM reward_balances WHERE profile_id = ?1",
            params![profile_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, chrono::NaiveDateTime>(2)?,
                ))
            },
        )
        .optional()?;

    row.map(|(profile_id, tokens, updated_at)| -> Result<RewardBalance, DatabaseError> {
        let tokens = u64::try_from(tokens).map_err(|_| {
            DatabaseError::ConstraintViolation(format!("negative balance for {profile_id}"))
        })?;
        Ok(RewardBalance {
            profile_id,
            tokens,
            updated_at,
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use chrono::NaiveDate;

    fn balance(profile: &str, tokens: u64) -> RewardBalance {
        RewardBalance {
            profile_id: profile.into(),
            tokens,
            updated_at: NaiveDate::from_ymd_opt(2026, 5, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn unknown_profile_has_no_row() {
        let conn = open_memory_database().unwrap();
        assert!(get_balance(&conn, "ghost").unwrap().is_none());
    }

    #[test]
    fn upsert_then_overwrite() {
        let conn = open_memory_database().unwrap();
        upsert_balance(&conn, &balance("user-1", 40)).unwrap();
        upsert_balance(&conn, &balance("user-1", 75)).unwrap();

        let loaded = get_balance(&conn, "user-1").unwrap().unwrap();
        assert_eq!(loaded.tokens, 75);
    }

    #[test]
    fn balances_are_per_profile() {
        let conn = open_memory_database().unwrap();
        upsert_balance(&conn, &balance("user-1", 10)).unwrap();
        upsert_balance(&conn, &balance("user-2", 20)).unwrap();

        assert_eq!(get_balance(&conn, "user-1").unwrap().unwrap().tokens, 10);
        assert_eq!(get_balance(&conn, "user-2").unwrap().unwrap().tokens, 20);
    }

    #[test]
    fn oversized_balance_rejected() {
        let conn = open_memory_database().unwrap();
        let err = upsert_balance(&conn, &balance("whale", u64::MAX)).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }
}
