//! SQL statements used by the product repository.
//!
//! Each statement comes in two shapes: one for schemas that have the
//! `Description` column and a legacy one for schemas at the first migration.

/// Counts the `Description` column of `Products` (0 or 1).
pub const HAS_DESCRIPTION_COLUMN: &str = r#"
SELECT COUNT(*)
FROM pragma_table_info('Products')
WHERE name = 'Description'
"#;

pub const SELECT_PRODUCT_BY_ID: &str = r#"
SELECT Id, Name, Price, CreatedAt, Description
FROM Products
WHERE Id = ?1
"#;

pub const SELECT_PRODUCT_BY_ID_LEGACY: &str = r#"
SELECT Id, Name, Price, CreatedAt, NULL AS Description
FROM Products
WHERE Id = ?1
"#;

pub const SELECT_ALL_PRODUCTS: &str = r#"
SELECT Id, Name, Price, CreatedAt, Description
FROM Products
ORDER BY CreatedAt DESC
"#;

pub const SELECT_ALL_PRODUCTS_LEGACY: &str = r#"
SELECT Id, Name, Price, CreatedAt, NULL AS Description
FROM Products
ORDER BY CreatedAt DESC
"#;

pub const INSERT_PRODUCT: &str = r#"
INSERT INTO Products (Id, Name, Price, CreatedAt, Description)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const INSERT_PRODUCT_LEGACY: &str = r#"
INSERT INTO Products (Id, Name, Price, CreatedAt)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const UPDATE_PRODUCT: &str = r#"
UPDATE Products
SET Name = COALESCE(?2, Name),
    Price = COALESCE(?3, Price),
    Description = COALESCE(?4, Description)
WHERE Id = ?1
"#;

pub const UPDATE_PRODUCT_LEGACY: &str = r#"
UPDATE Products
SET Name = COALESCE(?2, Name),
    Price = COALESCE(?3, Price)
WHERE Id = ?1
"#;

pub const DELETE_PRODUCT: &str = r#"
DELETE FROM Products
WHERE Id = ?1
"#;

/// Statements matching one schema shape.
#[derive(Debug, Clone, Copy)]
pub struct ProductStatements {
    pub has_description: bool,
    pub select_by_id: &'static str,
    pub select_all: &'static str,
    pub insert: &'static str,
    pub update: &'static str,
}

impl ProductStatements {
    pub fn for_schema(has_description: bool) -> Self {
        if has_description {
            Self {
                has_description,
                select_by_id: SELECT_PRODUCT_BY_ID,
                select_all: SELECT_ALL_PRODUCTS,
                insert: INSERT_PRODUCT,
                update: UPDATE_PRODUCT,
            }
        } else {
            Self {
                has_description,
                select_by_id: SELECT_PRODUCT_BY_ID_LEGACY,
                select_all: SELECT_ALL_PRODUCTS_LEGACY,
                insert: INSERT_PRODUCT_LEGACY,
                update: UPDATE_PRODUCT_LEGACY,
            }
        }
    }
}
