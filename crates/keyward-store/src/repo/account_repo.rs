use keyward_core::errors::{ExError, ExErrorKind};
use keyward_core::model::{Account, AccountChanges, AccountFilter};
use keyward_core::ops::{AccountStore, StoreResult};
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{decode_timestamp, encode_timestamp, SqliteStore};
use crate::errors::{from_rusqlite, Result};

const SELECT_ACCOUNT: &str =
    "SELECT id, username, credential_digest, created_at, updated_at FROM accounts";

struct AccountRow {
    id: String,
    username: String,
    credential_digest: String,
    created_at: String,
    updated_at: String,
}

impl AccountRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            credential_digest: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn into_account(self) -> Result<Account> {
        Ok(Account {
            created_at: decode_timestamp(&self.created_at, "account_decode")?,
            updated_at: decode_timestamp(&self.updated_at, "account_decode")?,
            id: self.id,
            username: self.username,
            credential_digest: self.credential_digest,
        })
    }
}

fn query_accounts(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params, AccountRow::read)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    rows.into_iter().map(AccountRow::into_account).collect()
}

fn find_one(conn: &Connection, id: &str) -> Result<Option<Account>> {
    conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_ACCOUNT),
        [id],
        AccountRow::read,
    )
    .optional()
    .map_err(from_rusqlite)?
    .map(AccountRow::into_account)
    .transpose()
}

impl AccountStore for SqliteStore {
    fn create(&self, username: &str, credential_digest: &str) -> StoreResult<Account> {
        let account = Account::new(
            Uuid::now_v7().to_string(),
            username.to_string(),
            credential_digest.to_string(),
        );
        let conn = self.conn("account_create")?;
        conn.execute(
            "INSERT INTO accounts (id, username, credential_digest, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                account.id,
                account.username,
                account.credential_digest,
                encode_timestamp(account.created_at),
                encode_timestamp(account.updated_at),
            ],
        )
        .map_err(|e| from_rusqlite(e).with_op("account_create"))?;
        Ok(account)
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>> {
        let conn = self.conn("account_find_by_id")?;
        find_one(&conn, id)
    }

    fn find_all(&self) -> StoreResult<Vec<Account>> {
        let conn = self.conn("account_find_all")?;
        query_accounts(&conn, &format!("{} ORDER BY seq", SELECT_ACCOUNT), [])
    }

    fn find_by_filter(&self, filter: &AccountFilter) -> StoreResult<Vec<Account>> {
        let conn = self.conn("account_find_by_filter")?;
        query_accounts(
            &conn,
            &format!(
                "{} WHERE (?1 IS NULL OR username = ?1) AND (?2 IS NULL OR id = ?2) ORDER BY seq",
                SELECT_ACCOUNT
            ),
            rusqlite::params![filter.username, filter.id],
        )
    }

    fn update(&self, id: &str, changes: &AccountChanges) -> StoreResult<Account> {
        let mut conn = self.conn("account_update")?;
        let tx = conn.transaction().map_err(from_rusqlite)?;

        let mut account = find_one(&tx, id)?.ok_or_else(|| {
            ExError::new(ExErrorKind::NotFound)
                .with_op("account_update")
                .with_entity_id(id)
                .with_message("Account not found")
        })?;
        changes.apply_to(&mut account);

        tx.execute(
            "UPDATE accounts SET username = ?1, credential_digest = ?2, updated_at = ?3
             WHERE id = ?4",
            rusqlite::params![
                account.username,
                account.credential_digest,
                encode_timestamp(account.updated_at),
                account.id,
            ],
        )
        .map_err(|e| from_rusqlite(e).with_op("account_update"))?;
        tx.commit().map_err(from_rusqlite)?;

        Ok(account)
    }

    fn delete(&self, id: &str) -> StoreResult<Option<Account>> {
        let mut conn = self.conn("account_delete")?;
        let tx = conn.transaction().map_err(from_rusqlite)?;

        let existing = find_one(&tx, id)?;
        if existing.is_some() {
            tx.execute("DELETE FROM accounts WHERE id = ?1", [id])
                .map_err(from_rusqlite)?;
        }
        tx.commit().map_err(from_rusqlite)?;

        Ok(existing)
    }
}
