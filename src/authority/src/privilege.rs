//! Default privilege model
//!
//! Privileges are granted at three levels:
//! - Administrative: proxy-wide, e.g. `SUPER`
//! - Database: every table of one logical database
//! - Table: a single table
//!
//! The registry stores these as opaque values; only the connection layer
//! asks the questions below.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// SQL privilege types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivilegeType {
    /// Covers every other privilege
    All,
    /// Read rows
    Select,
    /// Add rows
    Insert,
    /// Modify rows
    Update,
    /// Remove rows
    Delete,
    /// Create databases or tables
    Create,
    /// Drop databases or tables
    Drop,
    /// Change table structure
    Alter,
    /// Create or drop indexes
    Index,
    /// Declare foreign keys
    References,
    /// Grant held privileges to others
    Grant,
    /// Proxy administration
    Super,
}

impl PrivilegeType {
    /// Parse privilege name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ALL" | "ALL PRIVILEGES" => Some(Self::All),
            "SELECT" => Some(Self::Select),
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "CREATE" => Some(Self::Create),
            "DROP" => Some(Self::Drop),
            "ALTER" => Some(Self::Alter),
            "INDEX" => Some(Self::Index),
            "REFERENCES" => Some(Self::References),
            "GRANT" | "GRANT OPTION" => Some(Self::Grant),
            "SUPER" => Some(Self::Super),
            _ => None,
        }
    }

    /// SQL name of the privilege
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::Drop => "DROP",
            Self::Alter => "ALTER",
            Self::Index => "INDEX",
            Self::References => "REFERENCES",
            Self::Grant => "GRANT",
            Self::Super => "SUPER",
        }
    }
}

impl FromStr for PrivilegeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown privilege type: {}", s))
    }
}

impl fmt::Display for PrivilegeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn covers(granted: &HashSet<PrivilegeType>, required: &[PrivilegeType]) -> bool {
    granted.contains(&PrivilegeType::All) || required.iter().all(|p| granted.contains(p))
}

/// Privileges on a single table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePrivileges {
    /// Granted privilege types
    #[serde(default)]
    pub privileges: HashSet<PrivilegeType>,
}

/// Privileges on one logical database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabasePrivileges {
    /// Privileges on every table of the database (`db.*`)
    #[serde(default)]
    pub global: HashSet<PrivilegeType>,

    /// Per-table grants keyed by table name
    #[serde(default)]
    pub tables: HashMap<String, TablePrivileges>,
}

impl DatabasePrivileges {
    /// Check table privileges, falling back to database-wide grants
    pub fn has_table_privileges(&self, table: &str, required: &[PrivilegeType]) -> bool {
        // Each privilege may come from either level
        let table_grants = self.tables.get(table).map(|t| &t.privileges);
        required.iter().all(|p| {
            covers(&self.global, std::slice::from_ref(p))
                || table_grants.is_some_and(|grants| covers(grants, std::slice::from_ref(p)))
        })
    }

    fn is_empty(&self) -> bool {
        self.global.is_empty() && self.tables.values().all(|t| t.privileges.is_empty())
    }
}

/// Privilege bundle of one identity
///
/// # Examples
///
/// ```
/// use proxy_authority::{Privileges, PrivilegeType};
///
/// let privileges = Privileges::new()
///     .grant_table("sales", "orders", [PrivilegeType::Select]);
///
/// assert!(privileges.has_database_privileges("sales"));
/// assert!(privileges.has_table_privileges("sales", "orders", &[PrivilegeType::Select]));
/// assert!(!privileges.has_table_privileges("sales", "orders", &[PrivilegeType::Delete]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Privileges {
    /// Proxy-wide privileges
    #[serde(default)]
    pub administrative: HashSet<PrivilegeType>,

    /// Per-database grants keyed by database name
    #[serde(default)]
    pub databases: HashMap<String, DatabasePrivileges>,
}

impl Privileges {
    /// Create an empty privilege bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Superuser bundle: `ALL` at the administrative level
    pub fn all() -> Self {
        Self::new().grant_administrative([PrivilegeType::All])
    }

    /// Add administrative privileges
    pub fn grant_administrative(mut self, privileges: impl IntoIterator<Item = PrivilegeType>) -> Self {
        self.administrative.extend(privileges);
        self
    }

    /// Add privileges on every table of a database
    pub fn grant_database(
        mut self,
        database: impl Into<String>,
        privileges: impl IntoIterator<Item = PrivilegeType>,
    ) -> Self {
        self.databases
            .entry(database.into())
            .or_default()
            .global
            .extend(privileges);
        self
    }

    /// Add privileges on one table
    pub fn grant_table(
        mut self,
        database: impl Into<String>,
        table: impl Into<String>,
        privileges: impl IntoIterator<Item = PrivilegeType>,
    ) -> Self {
        self.databases
            .entry(database.into())
            .or_default()
            .tables
            .entry(table.into())
            .or_default()
            .privileges
            .extend(privileges);
        self
    }

    /// Check administrative privileges
    pub fn has_privileges(&self, required: &[PrivilegeType]) -> bool {
        covers(&self.administrative, required)
    }

    /// Check whether the database is visible at all
    ///
    /// True when any privilege is held on the database or one of its tables,
    /// or when any administrative privilege is held.
    pub fn has_database_privileges(&self, database: &str) -> bool {
        if !self.administrative.is_empty() {
            return true;
        }
        self.databases
            .get(database)
            .is_some_and(|db| !db.is_empty())
    }

    /// Check privileges on one table
    ///
    /// Each required privilege may come from the administrative, database or
    /// table level independently.
    pub fn has_table_privileges(&self, database: &str, table: &str, required: &[PrivilegeType]) -> bool {
        let db = self.databases.get(database);
        required.iter().all(|p| {
            let required = std::slice::from_ref(p);
            self.has_privileges(required)
                || db.is_some_and(|db| db.has_table_privileges(table, required))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_parse() {
        assert_eq!(PrivilegeType::parse("select"), Some(PrivilegeType::Select));
        assert_eq!(PrivilegeType::parse("ALL PRIVILEGES"), Some(PrivilegeType::All));
        assert_eq!(PrivilegeType::parse(" grant option "), Some(PrivilegeType::Grant));
        assert_eq!(PrivilegeType::parse("TRUNCATE"), None);
        assert!("bogus".parse::<PrivilegeType>().is_err());
    }

    #[test]
    fn test_privilege_display_roundtrips_parse() {
        let p = PrivilegeType::References;
        assert_eq!(PrivilegeType::parse(&p.to_string()), Some(p));
    }

    #[test]
    fn test_superuser_bundle() {
        let privileges = Privileges::all();
        assert!(privileges.has_privileges(&[PrivilegeType::Super]));
        assert!(privileges.has_database_privileges("anything"));
        assert!(privileges.has_table_privileges("db", "t", &[PrivilegeType::Drop, PrivilegeType::Insert]));
    }

    #[test]
    fn test_empty_bundle_denies() {
        let privileges = Privileges::new();
        assert!(!privileges.has_privileges(&[PrivilegeType::Select]));
        assert!(!privileges.has_database_privileges("db"));
        assert!(!privileges.has_table_privileges("db", "t", &[PrivilegeType::Select]));
        // Nothing required, nothing to deny
        assert!(privileges.has_privileges(&[]));
    }

    #[test]
    fn test_database_level_covers_tables() {
        let privileges = Privileges::new().grant_database("sales", [PrivilegeType::Select, PrivilegeType::Insert]);
        assert!(privileges.has_table_privileges("sales", "orders", &[PrivilegeType::Select]));
        assert!(privileges.has_table_privileges("sales", "items", &[PrivilegeType::Insert]));
        assert!(!privileges.has_table_privileges("sales", "orders", &[PrivilegeType::Delete]));
        assert!(!privileges.has_table_privileges("hr", "people", &[PrivilegeType::Select]));
    }

    #[test]
    fn test_mixed_levels() {
        let privileges = Privileges::new()
            .grant_database("sales", [PrivilegeType::Select])
            .grant_table("sales", "orders", [PrivilegeType::Update]);

        assert!(privileges.has_table_privileges("sales", "orders", &[PrivilegeType::Select, PrivilegeType::Update]));
        assert!(!privileges.has_table_privileges("sales", "items", &[PrivilegeType::Select, PrivilegeType::Update]));
    }

    #[test]
    fn test_administrative_combines_with_lower_levels() {
        let privileges = Privileges::new()
            .grant_administrative([PrivilegeType::Select])
            .grant_table("sales", "orders", [PrivilegeType::Update]);
        let required = [PrivilegeType::Select, PrivilegeType::Update];

        assert!(privileges.has_table_privileges("sales", "orders", &required));
        assert!(!privileges.has_table_privileges("sales", "items", &required));
        assert!(privileges.has_table_privileges("hr", "people", &[PrivilegeType::Select]));

        let privileges = Privileges::new()
            .grant_administrative([PrivilegeType::Insert])
            .grant_database("sales", [PrivilegeType::Delete]);
        assert!(privileges.has_table_privileges("sales", "orders", &[PrivilegeType::Insert, PrivilegeType::Delete]));
    }

    #[test]
    fn test_administrative_makes_databases_visible() {
        let privileges = Privileges::new().grant_administrative([PrivilegeType::Super]);
        assert!(privileges.has_database_privileges("sales"));

        let privileges = Privileges::new().grant_administrative([PrivilegeType::Select]);
        assert!(privileges.has_database_privileges("hr"));
        assert!(!privileges.has_table_privileges("hr", "people", &[PrivilegeType::Delete]));
    }

    #[test]
    fn test_table_all_covers_table_only() {
        let privileges = Privileges::new().grant_table("sales", "orders", [PrivilegeType::All]);
        assert!(privileges.has_table_privileges("sales", "orders", &[PrivilegeType::Drop]));
        assert!(!privileges.has_table_privileges("sales", "items", &[PrivilegeType::Select]));
        assert!(privileges.has_database_privileges("sales"));
        assert!(!privileges.has_privileges(&[PrivilegeType::Select]));
    }

    #[test]
    fn test_privileges_json() {
        let json = r#"{
            "administrative": ["SUPER"],
            "databases": {
                "sales": {
                    "global": ["SELECT"],
                    "tables": { "orders": { "privileges": ["INSERT", "UPDATE"] } }
                }
            }
        }"#;
        let privileges: Privileges = serde_json::from_str(json).unwrap();

        assert!(privileges.has_privileges(&[PrivilegeType::Super]));
        assert!(privileges.has_table_privileges("sales", "orders", &[PrivilegeType::Insert, PrivilegeType::Select]));

        let encoded = serde_json::to_string(&privileges).unwrap();
        let decoded: Privileges = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, privileges);
    }
}
