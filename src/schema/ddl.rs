//! DDL parsing for schema extraction.
//!
//! Parses CREATE TABLE, ALTER TABLE and CREATE INDEX statements to extract:
//! - Column definitions with types, nullability and inline keys
//! - Primary key and unique constraints
//! - Foreign key constraints (table-level and inline REFERENCES)
//! - Secondary indexes

use super::{Column, ColumnId, ForeignKey, IndexDef, Schema, TableId, TableSchema};
use once_cell::sync::Lazy;
use regex::Regex;

/// Regex to extract table name from CREATE TABLE
/// Supports: `table` (MySQL), "table" (PostgreSQL), [table] (MSSQL), table (SQLite/unquoted), schema.table
static CREATE_TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)CREATE\s+(?:TEMP(?:ORARY)?\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:[\[\]`"\w]+\s*\.\s*)*[\[`"]?([^\[\]`"\s(]+)[\]`"]?"#)
        .unwrap()
});

/// Regex to extract table name from ALTER TABLE
static ALTER_TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)ALTER\s+TABLE\s+(?:ONLY\s+)?(?:[\[\]`"\w]+\s*\.\s*)*[\[`"]?([^\[\]`"\s]+)[\]`"]?"#).unwrap()
});

/// Regex for column definition: name followed by its type
static COLUMN_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*[\[`"]?([^\[\]`"\s,]+)[\]`"]?\s+(\w+(?:\s+varying)?(?:\s*\([^)]+\))?(?:\s+unsigned)?)"#)
        .unwrap()
});

/// Regex for PRIMARY KEY constraint
/// Supports MSSQL CLUSTERED/NONCLUSTERED keywords: PRIMARY KEY CLUSTERED ([col])
static PRIMARY_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)PRIMARY\s+KEY\s*(?:CLUSTERED\s+|NONCLUSTERED\s+)?\(([^)]+)\)").unwrap()
});

/// Regex for inline PRIMARY KEY on column
static INLINE_PRIMARY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").unwrap());

/// Regex for inline UNIQUE on column
static INLINE_UNIQUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bUNIQUE\b").unwrap());

/// Regex for inline REFERENCES on column: `REFERENCES parent (id)`
static INLINE_REFERENCES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\bREFERENCES\s+(?:[\[\]`"\w]+\s*\.\s*)*[\[`"]?([^\[\]`"\s(]+)[\]`"]?\s*\(([^)]+)\)"#,
    )
    .unwrap()
});

/// Regex for FOREIGN KEY constraint with optional constraint name
static FOREIGN_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:CONSTRAINT\s+[\[`"]?([^\[\]`"\s]+)[\]`"]?\s+)?FOREIGN\s+KEY\s*\(([^)]+)\)\s*REFERENCES\s+(?:[\[\]`"\w]+\s*\.\s*)*[\[`"]?([^\[\]`"\s(]+)[\]`"]?\s*\(([^)]+)\)"#,
    )
    .unwrap()
});

/// Regex for table-level UNIQUE constraint
/// Matches: UNIQUE (a, b), CONSTRAINT uq UNIQUE (a), UNIQUE KEY uq (a), UNIQUE INDEX uq (a)
static UNIQUE_CONSTRAINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^(?:CONSTRAINT\s+[\[`"]?(\w+)[\]`"]?\s+)?UNIQUE(?:\s+(?:KEY|INDEX))?\s*(?:[\[`"]?(\w+)[\]`"]?\s*)?\(([^)]+)\)"#,
    )
    .unwrap()
});

/// Regex to detect NOT NULL constraint
static NOT_NULL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b").unwrap());

/// Regex for inline INDEX/KEY in CREATE TABLE
/// Matches: INDEX idx_name (col1, col2), KEY idx_name (col1)
static INLINE_INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^(?:INDEX|KEY)\s+[\[`"]?(\w+)[\]`"]?\s*(?:USING\s+\w+\s*)?\(([^)]+)\)"#)
        .unwrap()
});

/// Regex for CREATE INDEX statement
/// Matches: CREATE [UNIQUE] [CLUSTERED|NONCLUSTERED] INDEX [IF NOT EXISTS] idx_name ON table [USING method] (columns)
static CREATE_INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)CREATE\s+(UNIQUE\s+)?(?:CLUSTERED\s+|NONCLUSTERED\s+)?INDEX\s+(?:CONCURRENTLY\s+)?(?:IF\s+NOT\s+EXISTS\s+)?[\[`"]?(\w+)[\]`"]?\s+ON\s+(?:ONLY\s+)?(?:[\[\]`"\w]+\s*\.\s*)*[\[`"]?(\w+)[\]`"]?\s*(?:USING\s+\w+\s*)?\(([^)]+)\)"#,
    )
    .unwrap()
});

/// Kind of DDL statement relevant to schema extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdlStatement {
    CreateTable,
    AlterTable,
    CreateIndex,
    Other,
}

impl DdlStatement {
    /// Classify a statement by its leading keywords
    pub fn classify(stmt: &str) -> Self {
        let words: Vec<String> = stmt
            .split_whitespace()
            .take(4)
            .map(|w| w.to_uppercase())
            .collect();
        let words: Vec<&str> = words.iter().map(|w| w.as_str()).collect();

        match words.as_slice() {
            ["CREATE", "TABLE", ..]
            | ["CREATE", "TEMP" | "TEMPORARY" | "UNLOGGED", "TABLE", ..] => {
                DdlStatement::CreateTable
            }
            ["ALTER", "TABLE", ..] => DdlStatement::AlterTable,
            ["CREATE", "INDEX", ..]
            | ["CREATE", "UNIQUE", "INDEX", ..]
            | ["CREATE", "UNIQUE", "CLUSTERED" | "NONCLUSTERED", "INDEX"]
            | ["CREATE", "CLUSTERED" | "NONCLUSTERED", "INDEX", ..] => DdlStatement::CreateIndex,
            _ => DdlStatement::Other,
        }
    }
}

/// Builder for constructing schema from DDL statements
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every supported statement of a SQL script
    pub fn parse_script(&mut self, sql: &str) -> &mut Self {
        for stmt in split_statements(sql) {
            match DdlStatement::classify(&stmt) {
                DdlStatement::CreateTable => {
                    self.parse_create_table(&stmt);
                }
                DdlStatement::AlterTable => {
                    self.parse_alter_table(&stmt);
                }
                DdlStatement::CreateIndex => {
                    self.parse_create_index(&stmt);
                }
                DdlStatement::Other => {}
            }
        }
        self
    }

    /// Parse a CREATE TABLE statement and add to schema
    pub fn parse_create_table(&mut self, stmt: &str) -> Option<TableId> {
        let table_name = extract_create_table_name(stmt)?;

        // Check if table already exists
        if let Some(id) = self.schema.get_table_id(&table_name) {
            return Some(id);
        }

        let mut table = TableSchema::new(table_name, TableId(0));
        let body = extract_table_body(stmt)?;
        parse_table_body(&body, &mut table);

        Some(self.schema.add_table(table))
    }

    /// Parse an ALTER TABLE statement and update existing table
    pub fn parse_alter_table(&mut self, stmt: &str) -> Option<TableId> {
        let table_name = extract_alter_table_name(stmt)?;
        let table_id = self.schema.get_table_id(&table_name)?;
        let table = self.schema.table_mut(table_id)?;

        // pg_dump adds primary keys after the fact
        if let Some(pk_cols) = parse_primary_key_constraint(stmt) {
            table.set_primary_key(&pk_cols);
        }
        table.foreign_keys.extend(parse_foreign_keys(stmt));

        Some(table_id)
    }

    /// Parse a CREATE INDEX statement and add to the appropriate table
    pub fn parse_create_index(&mut self, stmt: &str) -> Option<TableId> {
        let caps = CREATE_INDEX_RE.captures(stmt)?;

        let is_unique = caps.get(1).is_some();
        let name = caps.get(2)?.as_str().to_string();
        let table_name = caps.get(3)?.as_str();
        let columns = parse_column_list(caps.get(4)?.as_str());

        let table_id = self.schema.get_table_id(table_name)?;
        self.schema.table_mut(table_id)?.add_index(IndexDef {
            name,
            columns,
            is_unique,
        });

        Some(table_id)
    }

    /// Finalize the schema
    pub fn build(self) -> Schema {
        self.schema
    }

    /// Get current schema (for inspection during building)
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Parse a SQL script into a schema
pub fn parse_schema(sql: &str) -> Schema {
    let mut builder = SchemaBuilder::new();
    builder.parse_script(sql);
    builder.build()
}

/// Extract table name from CREATE TABLE statement
pub fn extract_create_table_name(stmt: &str) -> Option<String> {
    CREATE_TABLE_NAME_RE
        .captures(stmt)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract table name from ALTER TABLE statement
pub fn extract_alter_table_name(stmt: &str) -> Option<String> {
    ALTER_TABLE_NAME_RE
        .captures(stmt)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Split a SQL script into statements on `;`, skipping quoted text and comments.
///
/// Comments are dropped from the returned statements; empty statements are
/// omitted.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            current.push(ch);
            if ch == '\\' && q == '\'' {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => {
                quote = Some(ch);
                current.push(ch);
            }
            '-' if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            '#' if current.trim().is_empty() => {
                // MySQL line comment at statement start
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                current.push(' ');
            }
            ';' => {
                if !current.trim().is_empty() {
                    statements.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        statements.push(current.trim().to_string());
    }

    statements
}

/// Extract the body of a CREATE TABLE statement (between first ( and matching ))
fn extract_table_body(stmt: &str) -> Option<String> {
    let bytes = stmt.as_bytes();
    let mut depth = 0;
    let mut start = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &b) in bytes.iter().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }

        if b == b'\\' && in_string {
            escape_next = true;
            continue;
        }

        if b == b'\'' {
            in_string = !in_string;
            continue;
        }

        if in_string {
            continue;
        }

        if b == b'(' {
            if depth == 0 {
                start = Some(i + 1);
            }
            depth += 1;
        } else if b == b')' {
            depth -= 1;
            if depth == 0 {
                if let Some(s) = start {
                    return Some(stmt[s..i].to_string());
                }
            }
        }
    }

    None
}

/// Parse the body of a CREATE TABLE to extract columns and constraints
fn parse_table_body(body: &str, table: &mut TableSchema) {
    for part in split_table_body(body) {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }

        if is_constraint(trimmed) {
            parse_constraint(trimmed, table);
        } else if let Some(col) = parse_column_def(trimmed, ColumnId(table.columns.len() as u16))
        {
            // Inline REFERENCES becomes a single-column foreign key
            if let Some(caps) = INLINE_REFERENCES_RE.captures(trimmed) {
                let referenced_columns = parse_column_list(&caps[2]);
                table.foreign_keys.push(ForeignKey {
                    name: None,
                    column_names: vec![col.name.clone()],
                    referenced_table: caps[1].to_string(),
                    referenced_columns,
                });
            }
            table.add_column(col);
        }
    }
}

/// Whether a table body part is a constraint rather than a column, by its first keyword
fn is_constraint(part: &str) -> bool {
    let first = part
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default()
        .to_uppercase();
    matches!(
        first.as_str(),
        "PRIMARY"
            | "CONSTRAINT"
            | "FOREIGN"
            | "KEY"
            | "INDEX"
            | "UNIQUE"
            | "FULLTEXT"
            | "SPATIAL"
            | "CHECK"
            | "EXCLUDE"
    )
}

/// Apply a table-level constraint to the table
fn parse_constraint(constraint: &str, table: &mut TableSchema) {
    if let Some(pk_cols) = parse_primary_key_constraint(constraint) {
        table.set_primary_key(&pk_cols);
    } else if FOREIGN_KEY_RE.is_match(constraint) {
        table.foreign_keys.extend(parse_foreign_keys(constraint));
    } else if let Some(caps) = UNIQUE_CONSTRAINT_RE.captures(constraint) {
        let columns = parse_column_list(&caps[3]);
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| format!("{}_{}_key", table.name, columns.join("_")));
        table.add_index(IndexDef {
            name,
            columns,
            is_unique: true,
        });
    } else if let Some(caps) = INLINE_INDEX_RE.captures(constraint) {
        table.add_index(IndexDef {
            name: caps[1].to_string(),
            columns: parse_column_list(&caps[2]),
            is_unique: false,
        });
    }
}

/// Split table body by commas, respecting nested parentheses
pub fn split_table_body(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for ch in body.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            current.push(ch);
            escape_next = true;
            continue;
        }

        if ch == '\'' {
            in_string = !in_string;
            current.push(ch);
            continue;
        }

        if in_string {
            current.push(ch);
            continue;
        }

        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

/// Parse a column definition
fn parse_column_def(def: &str, ordinal: ColumnId) -> Option<Column> {
    let caps = COLUMN_DEF_RE.captures(def)?;
    let name = caps.get(1)?.as_str();
    let type_name = caps
        .get(2)?
        .as_str()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut column = Column::new(name, type_name, ordinal);
    column.is_nullable = !NOT_NULL_RE.is_match(def);
    column.is_primary_key = INLINE_PRIMARY_KEY_RE.is_match(def);
    column.is_unique = INLINE_UNIQUE_RE.is_match(def);
    Some(column)
}

/// Parse PRIMARY KEY constraint, returns column names
fn parse_primary_key_constraint(constraint: &str) -> Option<Vec<String>> {
    let caps = PRIMARY_KEY_RE.captures(constraint)?;
    let cols_str = caps.get(1)?.as_str();
    Some(parse_column_list(cols_str))
}

/// Parse FOREIGN KEY constraints from a statement
fn parse_foreign_keys(stmt: &str) -> Vec<ForeignKey> {
    let mut fks = Vec::new();

    for caps in FOREIGN_KEY_RE.captures_iter(stmt) {
        let name = caps.get(1).map(|m| m.as_str().to_string());
        let local_cols = caps
            .get(2)
            .map(|m| parse_column_list(m.as_str()))
            .unwrap_or_default();
        let ref_table = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let ref_cols = caps
            .get(4)
            .map(|m| parse_column_list(m.as_str()))
            .unwrap_or_default();

        if !local_cols.is_empty() && !ref_table.is_empty() && !ref_cols.is_empty() {
            fks.push(ForeignKey {
                name,
                column_names: local_cols,
                referenced_table: ref_table,
                referenced_columns: ref_cols,
            });
        }
    }

    fks
}

/// Parse a comma-separated column list, stripping quotes (backticks, double quotes, brackets)
pub fn parse_column_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|c| {
            c.trim()
                .trim_matches('`')
                .trim_matches('"')
                .trim_matches('[')
                .trim_matches(']')
                .to_string()
        })
        .filter(|c| !c.is_empty())
        .collect()
}
