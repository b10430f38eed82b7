//! Table schemas for table-mode diagrams.
//!
//! This module provides:
//! - Data models for table schemas, columns, foreign keys and indexes
//! - DDL parsing for extracting schema information from SQL scripts

mod ddl;

pub use ddl::*;

use ahash::AHashMap;
use std::fmt;

/// Unique identifier for a table within a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableId({})", self.0)
    }
}

/// Unique identifier for a column within a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(pub u16);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnId({})", self.0)
    }
}

/// Column definition within a table
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Declared type as written (e.g. `VARCHAR(255)`)
    pub type_name: String,
    /// Position in table (0-indexed)
    pub ordinal: ColumnId,
    /// Whether this column is part of the primary key
    pub is_primary_key: bool,
    /// Whether this column alone is covered by a unique constraint
    pub is_unique: bool,
    /// Whether this column allows NULL values
    pub is_nullable: bool,
}

impl Column {
    /// Create a nullable, non-key column
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, ordinal: ColumnId) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ordinal,
            is_primary_key: false,
            is_unique: false,
            is_nullable: true,
        }
    }
}

/// Index definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    /// Index name
    pub name: String,
    /// Columns in the index
    pub columns: Vec<String>,
    /// Whether this is a unique index
    pub is_unique: bool,
}

/// Foreign key constraint definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name (optional)
    pub name: Option<String>,
    /// Column names in this table, paired by position with `referenced_columns`
    pub column_names: Vec<String>,
    /// Referenced table name
    pub referenced_table: String,
    /// Referenced column names
    pub referenced_columns: Vec<String>,
}

impl ForeignKey {
    /// Local/referenced column name pairs
    pub fn column_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.column_names
            .iter()
            .zip(&self.referenced_columns)
            .map(|(local, remote)| (local.as_str(), remote.as_str()))
    }
}

/// Complete table schema definition
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Table ID within the schema
    pub id: TableId,
    /// Column definitions in order
    pub columns: Vec<Column>,
    /// Primary key column IDs (ordered for composite PKs)
    pub primary_key: Vec<ColumnId>,
    /// Foreign key constraints
    pub foreign_keys: Vec<ForeignKey>,
    /// Secondary index definitions, in declaration order
    pub indexes: Vec<IndexDef>,
}

impl TableSchema {
    /// Create a new empty table schema
    pub fn new(name: impl Into<String>, id: TableId) -> Self {
        Self {
            name: name.into(),
            id,
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Get column ID by name
    pub fn get_column_id(&self, name: &str) -> Option<ColumnId> {
        self.get_column(name).map(|c| c.ordinal)
    }

    /// Get column by ID
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.get(id.0 as usize)
    }

    /// Check if column is part of the primary key
    pub fn is_pk_column(&self, col_id: ColumnId) -> bool {
        self.primary_key.contains(&col_id)
    }

    /// Primary key column names, in key order
    pub fn primary_key_names(&self) -> Vec<&str> {
        self.primary_key
            .iter()
            .filter_map(|id| self.column(*id))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Append a column, assigning its ordinal
    pub fn add_column(&mut self, mut column: Column) -> ColumnId {
        let id = ColumnId(self.columns.len() as u16);
        column.ordinal = id;
        if column.is_primary_key {
            column.is_nullable = false;
            self.primary_key.push(id);
        }
        self.columns.push(column);
        id
    }

    /// Mark the named columns as the primary key
    pub fn set_primary_key(&mut self, names: &[String]) {
        for name in names {
            if let Some(col) = self
                .columns
                .iter_mut()
                .find(|c| c.name.eq_ignore_ascii_case(name))
            {
                col.is_primary_key = true;
                col.is_nullable = false;
                if !self.primary_key.contains(&col.ordinal) {
                    self.primary_key.push(col.ordinal);
                }
            }
        }
    }

    /// Add a secondary index; a single-column unique index marks its column unique
    pub fn add_index(&mut self, index: IndexDef) {
        if index.is_unique {
            if let [only] = index.columns.as_slice() {
                if let Some(col) = self
                    .columns
                    .iter_mut()
                    .find(|c| c.name.eq_ignore_ascii_case(only))
                {
                    col.is_unique = true;
                }
            }
        }
        self.indexes.push(index);
    }
}

/// Complete database schema
#[derive(Debug, Default)]
pub struct Schema {
    /// Map from table name to table ID
    pub tables: AHashMap<String, TableId>,
    /// Table schemas indexed by TableId
    pub table_schemas: Vec<TableSchema>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Get table ID by name (case-insensitive)
    pub fn get_table_id(&self, name: &str) -> Option<TableId> {
        // Try exact match first
        if let Some(&id) = self.tables.get(name) {
            return Some(id);
        }
        let name_lower = name.to_lowercase();
        self.tables
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, &id)| id)
    }

    /// Get table schema by ID
    pub fn table(&self, id: TableId) -> Option<&TableSchema> {
        self.table_schemas.get(id.0 as usize)
    }

    /// Get mutable table schema by ID
    pub fn table_mut(&mut self, id: TableId) -> Option<&mut TableSchema> {
        self.table_schemas.get_mut(id.0 as usize)
    }

    /// Get table schema by name
    pub fn get_table(&self, name: &str) -> Option<&TableSchema> {
        self.get_table_id(name).and_then(|id| self.table(id))
    }

    /// Add a new table schema, returning its ID
    pub fn add_table(&mut self, mut schema: TableSchema) -> TableId {
        let id = TableId(self.table_schemas.len() as u32);
        schema.id = id;
        self.tables.insert(schema.name.clone(), id);
        self.table_schemas.push(schema);
        id
    }

    /// Get the number of tables
    pub fn len(&self) -> usize {
        self.table_schemas.len()
    }

    /// Check if schema is empty
    pub fn is_empty(&self) -> bool {
        self.table_schemas.is_empty()
    }

    /// Iterate over all table schemas
    pub fn iter(&self) -> impl Iterator<Item = &TableSchema> {
        self.table_schemas.iter()
    }

    /// Table schemas in declaration order
    pub fn into_tables(self) -> Vec<TableSchema> {
        self.table_schemas
    }
}
