//! Migration Runner
//!
//! Applies and reverts migrations, tracking applied versions in the
//! `VersionInfo` table. Each step runs in one transaction together with its
//! bookkeeping row.

use std::collections::BTreeSet;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{error, info};

use super::{find, Migration, DESCRIPTION_VERSION, MIGRATIONS};
use crate::error::{AppError, Result};
use crate::store::Database;

const CREATE_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS VersionInfo (
    Version INTEGER NOT NULL PRIMARY KEY,
    AppliedOn TEXT NOT NULL,
    Description TEXT NOT NULL
);
"#;

const VERSION_TABLE_EXISTS: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'VersionInfo'";

const SELECT_APPLIED_VERSIONS: &str = "SELECT Version FROM VersionInfo ORDER BY Version";

const INSERT_VERSION: &str =
    "INSERT INTO VersionInfo (Version, AppliedOn, Description) VALUES (?1, ?2, ?3)";

const DELETE_VERSION: &str = "DELETE FROM VersionInfo WHERE Version = ?1";

const TABLE_INFO: &str =
    r#"SELECT cid, name, type, "notnull" FROM pragma_table_info(?1) ORDER BY cid"#;

/// Rebuilds Products without Description, for engines lacking DROP COLUMN.
const REBUILD_WITHOUT_DESCRIPTION: &str = r#"
CREATE TABLE Products_temp (
    Id TEXT(36) NOT NULL PRIMARY KEY,
    Name TEXT(100) NOT NULL,
    Price NUMERIC(18,2) NOT NULL,
    CreatedAt TEXT NOT NULL
);
INSERT INTO Products_temp (Id, Name, Price, CreatedAt)
SELECT Id, Name, Price, CreatedAt FROM Products;
DROP TABLE Products;
ALTER TABLE Products_temp RENAME TO Products;
"#;

/// One column of a table, as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub not_null: bool,
    pub position: i64,
}

/// Applies and reverts [`MIGRATIONS`] against the product database.
#[derive(Debug, Clone)]
pub struct MigrationRunner {
    db: Database,
}

impl MigrationRunner {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // == Migrate Up ==
    /// Applies every pending migration in increasing version order.
    ///
    /// Returns the versions applied by this call.
    pub async fn migrate_up(&self) -> Result<Vec<i64>> {
        self.apply_up_to(i64::MAX).await
    }

    /// Applies pending migrations with version <= `target`.
    pub async fn migrate_up_to(&self, target: i64) -> Result<Vec<i64>> {
        if find(target).is_none() {
            return Err(unknown_version(target));
        }
        self.apply_up_to(target).await
    }

    async fn apply_up_to(&self, target: i64) -> Result<Vec<i64>> {
        let applied = self
            .db
            .call(move |conn| {
                ensure_version_table(conn)?;
                let already = load_applied(conn)?;
                let mut ran = Vec::new();
                for migration in MIGRATIONS
                    .iter()
                    .filter(|m| m.version <= target && !already.contains(&m.version))
                {
                    apply(conn, migration)?;
                    ran.push(migration.version);
                }
                Ok(ran)
            })
            .await
            .map_err(into_migration_error)?;

        for version in &applied {
            info!(version, "Migration applied");
        }
        Ok(applied)
    }

    // == Migrate Down ==
    /// Reverts applied migrations with version > `target`, newest first.
    /// A target of 0 reverts everything.
    ///
    /// Returns the versions reverted by this call.
    pub async fn migrate_down_to(&self, target: i64) -> Result<Vec<i64>> {
        if target != 0 && find(target).is_none() {
            return Err(unknown_version(target));
        }

        let reverted = self
            .db
            .call(move |conn| {
                ensure_version_table(conn)?;
                let already = load_applied(conn)?;
                let mut ran = Vec::new();
                for migration in MIGRATIONS
                    .iter()
                    .rev()
                    .filter(|m| m.version > target && already.contains(&m.version))
                {
                    revert(conn, migration)?;
                    ran.push(migration.version);
                }
                Ok(ran)
            })
            .await
            .map_err(into_migration_error)?;

        for version in &reverted {
            info!(version, "Migration reverted");
        }
        Ok(reverted)
    }

    // == Status ==
    /// Applied versions, ascending. Empty on a fresh database.
    pub async fn applied_versions(&self) -> Result<Vec<i64>> {
        self.db
            .call(|conn| {
                if !version_table_exists(conn)? {
                    return Ok(Vec::new());
                }
                Ok(load_applied(conn)?.into_iter().collect())
            })
            .await
    }

    /// Highest applied version, `None` on a fresh database.
    pub async fn current_version(&self) -> Result<Option<i64>> {
        Ok(self.applied_versions().await?.last().copied())
    }

    // == Inspection ==
    /// Column listing of `table`. Empty if the table does not exist.
    pub async fn table_info(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let table = table.to_string();
        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare(TABLE_INFO)?;
                let rows = stmt.query_map([&table], |row| {
                    Ok(ColumnInfo {
                        position: row.get(0)?,
                        name: row.get(1)?,
                        column_type: row.get(2)?,
                        not_null: row.get::<_, i64>(3)? == 1,
                    })
                })?;
                let columns = rows.collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(columns)
            })
            .await
    }

    // == Force Remove Description ==
    /// Rebuilds `Products` without the Description column, keeping every row,
    /// and drops the matching `VersionInfo` row so bookkeeping follows the schema.
    ///
    /// Returns false when there was no Description column to remove.
    pub async fn force_remove_description(&self) -> Result<bool> {
        let removed = self
            .db
            .call(|conn| {
                let has_description = conn
                    .query_row(
                        "SELECT name FROM pragma_table_info('Products') WHERE name = 'Description'",
                        [],
                        |row| row.get::<_, String>(0),
                    )
                    .optional()?
                    .is_some();
                if !has_description {
                    return Ok(false);
                }

                ensure_version_table(conn)?;
                let tx = conn.transaction()?;
                tx.execute_batch(REBUILD_WITHOUT_DESCRIPTION)?;
                tx.execute(DELETE_VERSION, [DESCRIPTION_VERSION])?;
                tx.commit()?;
                Ok(true)
            })
            .await
            .map_err(into_migration_error)?;

        if removed {
            info!("Description column removed by table rebuild");
        }
        Ok(removed)
    }
}

fn ensure_version_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_VERSION_TABLE)
}

fn version_table_exists(conn: &Connection) -> rusqlite::Result<bool> {
    Ok(conn
        .query_row(VERSION_TABLE_EXISTS, [], |row| row.get::<_, String>(0))
        .optional()?
        .is_some())
}

fn load_applied(conn: &Connection) -> rusqlite::Result<BTreeSet<i64>> {
    let mut stmt = conn.prepare(SELECT_APPLIED_VERSIONS)?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    let versions = rows.collect::<rusqlite::Result<BTreeSet<i64>>>()?;
    Ok(versions)
}

fn apply(conn: &mut Connection, migration: &Migration) -> rusqlite::Result<()> {
    info!(
        version = migration.version,
        description = migration.description,
        "Applying migration"
    );
    let tx = conn.transaction()?;
    tx.execute_batch(migration.up).inspect_err(|e| {
        error!(version = migration.version, error = %e, "Migration up failed");
    })?;
    tx.execute(
        INSERT_VERSION,
        params![migration.version, Utc::now().to_rfc3339(), migration.description],
    )?;
    tx.commit()
}

fn revert(conn: &mut Connection, migration: &Migration) -> rusqlite::Result<()> {
    info!(
        version = migration.version,
        description = migration.description,
        "Reverting migration"
    );
    let tx = conn.transaction()?;
    tx.execute_batch(migration.down).inspect_err(|e| {
        error!(version = migration.version, error = %e, "Migration down failed");
    })?;
    tx.execute(DELETE_VERSION, [migration.version])?;
    tx.commit()
}

fn unknown_version(version: i64) -> AppError {
    AppError::InvalidRequest(format!("Unknown migration version: {version}"))
}

fn into_migration_error(err: AppError) -> AppError {
    match err {
        AppError::Store(msg) | AppError::Conflict(msg) => AppError::Migration(msg),
        other => other,
    }
}
