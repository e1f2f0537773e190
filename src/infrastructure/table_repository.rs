//! Relational upload of normalized tables
//!
//! One SQL table per scraped table. Uploads replace: an existing table of the
//! same name is dropped and recreated inside a single transaction. Every
//! column is `TEXT`; absent cells are `NULL`.

use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::domain::TableModel;

pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Drop and recreate `name` with the table's columns and rows
    ///
    /// Returns the number of rows inserted. A table with no columns at all
    /// only drops the previous contents.
    pub async fn replace_table(&self, name: &str, table: &TableModel) -> Result<u64> {
        let columns = column_names(table);
        let quoted_name = quote_identifier(name);

        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {quoted_name}"))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to drop table {name}"))?;

        if columns.is_empty() {
            tx.commit().await?;
            debug!("Table {} has no columns, nothing to upload", name);
            return Ok(0);
        }

        let column_list = columns.iter().map(|c| quote_identifier(c)).collect::<Vec<_>>().join(", ");
        let column_defs = columns
            .iter()
            .map(|c| format!("{} TEXT", quote_identifier(c)))
            .collect::<Vec<_>>()
            .join(", ");

        sqlx::query(&format!("CREATE TABLE {quoted_name} ({column_defs})"))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to create table {name}"))?;

        let placeholders = vec!["?"; columns.len()].join(", ");
        let insert_sql = format!("INSERT INTO {quoted_name} ({column_list}) VALUES ({placeholders})");

        let mut inserted = 0;
        for row in &table.rows {
            let mut query = sqlx::query(&insert_sql);
            for index in 0..columns.len() {
                query = query.bind(row.get(index).cloned().flatten());
            }
            inserted += query
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to insert into {name}"))?
                .rows_affected();
        }

        tx.commit().await.context("Failed to commit table upload")?;
        debug!("Replaced table {} with {} rows", name, inserted);
        Ok(inserted)
    }

    /// Upload every table under a name derived from its title
    ///
    /// Titles repeat across category pages, so later duplicates get a numeric
    /// suffix instead of replacing the earlier upload. Returns the names used.
    pub async fn replace_all(&self, tables: &[TableModel]) -> Result<Vec<String>> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut names = Vec::with_capacity(tables.len());

        for table in tables {
            let base = sanitize_table_name(&table.title);
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            let name = if *count == 1 { base } else { format!("{base}_{count}") };

            self.replace_table(&name, table).await?;
            names.push(name);
        }

        info!("🗄️ Uploaded {} tables", names.len());
        Ok(names)
    }

    /// Names of the user tables in the database
    pub async fn table_names(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get::<String, _>("name")).collect())
    }
}

/// SQL column names for a table
///
/// Header labels are used as-is; empty labels become `column_<n>` and repeated
/// labels get a `_<n>` suffix (1-based position, bumped until unused). Without
/// a header, columns are `column_1..column_<width>` for the widest row.
pub fn column_names(table: &TableModel) -> Vec<String> {
    if table.header.is_empty() {
        return (1..=table.width()).map(|n| format!("column_{n}")).collect();
    }

    let mut names: Vec<String> = Vec::with_capacity(table.header.len());
    for (index, label) in table.header.iter().enumerate() {
        let name = if label.is_empty() {
            unique_name(&names, "column", index + 1)
        } else if names.contains(label) {
            unique_name(&names, label, index + 1)
        } else {
            label.clone()
        };
        names.push(name);
    }
    names
}

/// First `<stem>_<n>` from `start` upwards that is not taken yet
fn unique_name(taken: &[String], stem: &str, start: usize) -> String {
    (start..)
        .map(|n| format!("{stem}_{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| stem.to_string())
}

/// Table name derived from a title: lowercase ASCII words joined by `_`
pub fn sanitize_table_name(title: &str) -> String {
    let name = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_");

    if name.is_empty() { "table".to_string() } else { name }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
