//! Statement text and row extraction shared by the SQL backends.
//!
//! Every SQL variant composes these pieces with its own connection
//! handling and commit strategy.

use crate::core::{BenchError, Record};

/// How a dialect overwrites an existing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStyle {
    /// `REPLACE INTO`: delete the old row, insert the new one.
    Replace,
    /// `INSERT ... ON DUPLICATE KEY UPDATE` (MySQL).
    OnDuplicateKey,
}

/// When a store commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    /// One implicit commit per row.
    PerRow,
    /// One explicit transaction per store call.
    Batch,
}

/// The statements a SQL backend issues against its table.
#[derive(Debug, Clone, PartialEq)]
pub struct Statements {
    pub create_table: String,
    pub upsert: String,
    pub select: String,
    pub count: String,
    pub drop_table: String,
}

impl Statements {
    pub fn new(table: &str, style: UpsertStyle) -> Self {
        let insert_columns = "(`str`, `int`, `double`, `float`, `long`) VALUES (?, ?, ?, ?, ?)";
        let upsert = match style {
            UpsertStyle::Replace => format!("REPLACE INTO `{table}` {insert_columns}"),
            UpsertStyle::OnDuplicateKey => format!(
                "INSERT INTO `{table}` {insert_columns} ON DUPLICATE KEY UPDATE \
                 `int` = VALUES(`int`), `double` = VALUES(`double`), \
                 `float` = VALUES(`float`), `long` = VALUES(`long`)"
            ),
        };
        Self {
            create_table: format!(
                "CREATE TABLE IF NOT EXISTS `{table}` (\
                 `str` VARCHAR(36) PRIMARY KEY, \
                 `int` INT, \
                 `double` DOUBLE, \
                 `float` FLOAT, \
                 `long` BIGINT)"
            ),
            upsert,
            select: format!(
                "SELECT `int`, `double`, `float`, `long` FROM `{table}` WHERE `str` = ?"
            ),
            count: format!("SELECT COUNT(*) FROM `{table}`"),
            drop_table: format!("DROP TABLE `{table}`"),
        }
    }
}

/// Typed view of a record in column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row<'a> {
    pub key: &'a str,
    pub int: i32,
    pub double: f64,
    pub float: f32,
    pub long: i64,
}

impl<'a> TryFrom<&'a Record> for Row<'a> {
    type Error = BenchError;

    fn try_from(record: &'a Record) -> Result<Self, Self::Error> {
        Ok(Row {
            key: record.get(0)?,
            int: record.get(1)?,
            double: record.get(2)?,
            float: record.get(3)?,
            long: record.get(4)?,
        })
    }
}

/// Extracts typed rows for a whole batch up front so a conversion error
/// never leaves a transaction half-written.
pub fn rows(batch: &[Record]) -> Result<Vec<Row<'_>>, BenchError> {
    batch.iter().map(Row::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_statements() {
        let stmts = Statements::new("bench", UpsertStyle::Replace);
        assert_eq!(
            stmts.upsert,
            "REPLACE INTO `bench` (`str`, `int`, `double`, `float`, `long`) VALUES (?, ?, ?, ?, ?)"
        );
        assert!(stmts.create_table.contains("`str` VARCHAR(36) PRIMARY KEY"));
        assert_eq!(stmts.drop_table, "DROP TABLE `bench`");
    }

    #[test]
    fn test_on_duplicate_key_updates_every_value_column() {
        let stmts = Statements::new("t", UpsertStyle::OnDuplicateKey);
        assert!(stmts.upsert.starts_with("INSERT INTO `t`"));
        for column in ["int", "double", "float", "long"] {
            assert!(
                stmts
                    .upsert
                    .contains(&format!("`{column}` = VALUES(`{column}`)")),
                "{column} not updated"
            );
        }
    }

    #[test]
    fn test_rows_follow_record_order() {
        let batch = vec![Record::new("a".to_string(), 1, 2.0, 3.0, 4)];
        let rows = rows(&batch).unwrap();
        assert_eq!(
            rows,
            vec![Row {
                key: "a",
                int: 1,
                double: 2.0,
                float: 3.0,
                long: 4
            }]
        );
    }
}
