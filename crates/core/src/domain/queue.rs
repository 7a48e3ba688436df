// Queue Domain Model

use super::error::{DomainError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the metadata table; reserved as a table name
pub const METADATA_TABLE: &str = "queues";

/// Name of the reserved admin credential row
pub const ADMIN_QUEUE: &str = "admin";

/// Width of the `name` / `table_name` metadata columns
pub const MAX_NAME_LEN: usize = 30;

pub const MAX_DESCRIPTION_LEN: usize = 1000;

const SQLITE_INTERNAL_PREFIX: &str = "sqlite_";

// ASCII word characters only, at least two of them
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{2,}$").expect("identifier pattern is valid"));

fn validate_identifier(kind: &'static str, name: &str) -> Result<()> {
    let invalid = |reason: &'static str| DomainError::InvalidName {
        kind,
        name: name.to_string(),
        reason,
    };

    if name.len() > MAX_NAME_LEN {
        return Err(invalid("longer than 30 characters"));
    }
    if !IDENTIFIER.is_match(name) {
        return Err(invalid(
            "must be at least two characters, alphanumeric or underscore only",
        ));
    }
    if name.eq_ignore_ascii_case(METADATA_TABLE) {
        return Err(DomainError::ReservedName(name.to_string()));
    }
    // SQLite refuses object names in its internal namespace
    if name
        .get(..SQLITE_INTERNAL_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(SQLITE_INTERNAL_PREFIX))
    {
        return Err(invalid("the sqlite_ prefix is reserved"));
    }
    Ok(())
}

/// Returns true if `name` may be used as a table or queue identifier.
pub fn check_name(name: &str) -> bool {
    validate_identifier("name", name).is_ok()
}

/// Validated queue name.
///
/// Both `admin` and `queues` are reserved (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QueueName(String);

impl QueueName {
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_identifier("queue name", &name)?;
        if name.eq_ignore_ascii_case(ADMIN_QUEUE) {
            return Err(DomainError::ReservedName(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated backing-table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TableName(String);

impl TableName {
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_identifier("table name", &name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier quoted for splicing into SQL (`"name"`, inner quotes doubled)
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0.replace('"', "\"\""))
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn validate_description(description: Option<&str>) -> Result<()> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(DomainError::FieldTooLong {
            field: "description",
            max: MAX_DESCRIPTION_LEN,
        }),
        _ => Ok(()),
    }
}

/// Row of the metadata table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRecord {
    pub name: String,
    pub table_name: String,
    pub hash: String,
    pub description: Option<String>,
}

impl QueueRecord {
    /// The admin credential row
    pub fn admin(hash: impl Into<String>) -> Self {
        Self {
            name: ADMIN_QUEUE.to_string(),
            table_name: METADATA_TABLE.to_string(),
            hash: hash.into(),
            description: None,
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.name.eq_ignore_ascii_case(ADMIN_QUEUE)
    }
}

/// Listing view of a queue (no credential)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueInfo {
    pub name: String,
    pub table_name: String,
    pub description: Option<String>,
}

impl From<QueueRecord> for QueueInfo {
    fn from(record: QueueRecord) -> Self {
        Self {
            name: record.name,
            table_name: record.table_name,
            description: record.description,
        }
    }
}

/// Request to create a queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQueue {
    pub name: String,
    /// Plaintext; hashed before it is stored
    pub password: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Backing table; defaults to `name`
    #[serde(default)]
    pub table_name: Option<String>,
}

impl NewQueue {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
            description: None,
            table_name: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Validate all fields; returns the parsed queue and table names
    pub fn validate(&self) -> Result<(QueueName, TableName)> {
        let name = QueueName::parse(self.name.as_str())?;
        let table = TableName::parse(self.table_name.as_deref().unwrap_or(&self.name))?;
        if self.password.is_empty() {
            return Err(DomainError::MissingField("password"));
        }
        validate_description(self.description.as_deref())?;
        Ok((name, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_name_accepts_word_identifiers() {
        assert!(check_name("abc"));
        assert!(check_name("a_b2"));
        assert!(check_name("CS101_lab"));
        assert!(check_name("123"));
    }

    #[test]
    fn test_check_name_rejects_invalid() {
        assert!(!check_name(""));
        assert!(!check_name("a"));
        assert!(!check_name("queues"));
        assert!(!check_name("QUEUES"));
        assert!(!check_name("Queues"));
        assert!(!check_name("ab-c"));
        assert!(!check_name("ab c"));
        assert!(!check_name("x\"; DROP TABLE queues; --"));
        assert!(!check_name(&"a".repeat(31)));
        assert!(!check_name("sqlite_lab"));
        assert!(!check_name("SQLite_Master"));
    }

    #[test]
    fn test_sqlite_prefix_is_only_rejected_as_prefix() {
        assert!(check_name("sqlite"));
        assert!(check_name("lab_sqlite_"));
        let err = TableName::parse("sqlite_x").unwrap_err();
        assert!(matches!(err, DomainError::InvalidName { .. }));
    }

    #[test]
    fn test_check_name_rejects_non_ascii_word_chars() {
        assert!(!check_name("café"));
    }

    #[test]
    fn test_queue_name_rejects_admin() {
        let err = QueueName::parse("Admin").unwrap_err();
        assert_eq!(err, DomainError::ReservedName("Admin".to_string()));
        assert!(TableName::parse("admin").is_ok());
    }

    #[test]
    fn test_table_name_quoted() {
        let table = TableName::parse("cs_101").unwrap();
        assert_eq!(table.quoted(), "\"cs_101\"");
    }

    #[test]
    fn test_new_queue_defaults_table_to_name() {
        let (name, table) = NewQueue::new("Test", "pw").validate().unwrap();
        assert_eq!(name.as_str(), "Test");
        assert_eq!(table.as_str(), "Test");
    }

    #[test]
    fn test_new_queue_requires_password() {
        let err = NewQueue::new("Test", "").validate().unwrap_err();
        assert_eq!(err, DomainError::MissingField("password"));
    }

    #[test]
    fn test_new_queue_rejects_bad_table_name() {
        let err = NewQueue::new("Test", "pw")
            .with_table_name("queues")
            .validate()
            .unwrap_err();
        assert_eq!(err, DomainError::ReservedName("queues".to_string()));
    }

    #[test]
    fn test_new_queue_rejects_long_description() {
        let err = NewQueue::new("Test", "pw")
            .with_description("x".repeat(MAX_DESCRIPTION_LEN + 1))
            .validate()
            .unwrap_err();
        assert!(matches!(err, DomainError::FieldTooLong { field: "description", .. }));
    }
}
