//! Schema Migrations Module
//!
//! Versioned, linearly ordered schema changes for the product store, and the
//! runner that applies and reverts them.
//!
//! # Migrations
//! - `20250603001` - Create the Products table
//! - `20250603002` - Add the nullable Description column

mod runner;

pub use runner::{ColumnInfo, MigrationRunner};

/// A schema change with forward and reverse SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    pub up: &'static str,
    pub down: &'static str,
}

/// All migrations, in strictly increasing version order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 20250603001,
        description: "CreateProductTable",
        up: r#"
CREATE TABLE Products (
    Id TEXT(36) NOT NULL PRIMARY KEY,
    Name TEXT(100) NOT NULL,
    Price NUMERIC(18,2) NOT NULL,
    CreatedAt TEXT NOT NULL
);
"#,
        down: "DROP TABLE Products;",
    },
    Migration {
        version: 20250603002,
        description: "AddProductDescription",
        up: "ALTER TABLE Products ADD COLUMN Description TEXT(500);",
        down: "ALTER TABLE Products DROP COLUMN Description;",
    },
];

/// Version that introduced the Description column.
pub const DESCRIPTION_VERSION: i64 = 20250603002;

/// Looks up a migration by version.
pub fn find(version: i64) -> Option<&'static Migration> {
    MIGRATIONS.iter().find(|m| m.version == version)
}

/// Every known version, ascending.
pub fn available_versions() -> Vec<i64> {
    MIGRATIONS.iter().map(|m| m.version).collect()
}
