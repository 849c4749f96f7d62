//! Domain value objects: Database, CssFramework, Choice.
//!
//! # Design
//!
//! These are pure value types with equality by value and no identity. Each
//! enumerated option carries its canonical string form and a `FromStr`
//! parser that accepts the documented aliases.
//!
//! Parsing never decides what to *do* with an unknown value. That is the job
//! of [`Choice`]: the resolver keeps the raw string around so the branch step
//! that consumes the option can warn and skip instead of aborting the run.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Database ──────────────────────────────────────────────────────────────────

/// Database adapter the generated application is configured for.
///
/// The list matches what the base generator accepts for `--database`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Postgresql,
    Mysql,
    Sqlite3,
    Oracle,
    Sqlserver,
    Frontbase,
    #[serde(rename = "ibm_db")]
    IbmDb,
    JdbcMysql,
    JdbcSqlite3,
    JdbcPostgresql,
    Jdbc,
}

impl Database {
    pub const ALL: [Database; 11] = [
        Self::Postgresql,
        Self::Mysql,
        Self::Sqlite3,
        Self::Oracle,
        Self::Sqlserver,
        Self::Frontbase,
        Self::IbmDb,
        Self::JdbcMysql,
        Self::JdbcSqlite3,
        Self::JdbcPostgresql,
        Self::Jdbc,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
            Self::Sqlite3 => "sqlite3",
            Self::Oracle => "oracle",
            Self::Sqlserver => "sqlserver",
            Self::Frontbase => "frontbase",
            Self::IbmDb => "ibm_db",
            Self::JdbcMysql => "jdbcmysql",
            Self::JdbcSqlite3 => "jdbcsqlite3",
            Self::JdbcPostgresql => "jdbcpostgresql",
            Self::Jdbc => "jdbc",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Database {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(Self::Postgresql),
            "mysql" => Ok(Self::Mysql),
            "sqlite3" | "sqlite" => Ok(Self::Sqlite3),
            "oracle" => Ok(Self::Oracle),
            "sqlserver" => Ok(Self::Sqlserver),
            "frontbase" => Ok(Self::Frontbase),
            "ibm_db" => Ok(Self::IbmDb),
            "jdbcmysql" => Ok(Self::JdbcMysql),
            "jdbcsqlite3" => Ok(Self::JdbcSqlite3),
            "jdbcpostgresql" => Ok(Self::JdbcPostgresql),
            "jdbc" => Ok(Self::Jdbc),
            other => Err(DomainError::UnknownVariant {
                option: "database",
                value: other.to_string(),
            }),
        }
    }
}

// ── CssFramework ─────────────────────────────────────────────────────────────

/// Styling framework installed by the `setup_css_framework` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CssFramework {
    BourbonNFriends,
    Bootstrap,
    Foundation,
}

impl CssFramework {
    pub const ALL: [CssFramework; 3] = [Self::BourbonNFriends, Self::Bootstrap, Self::Foundation];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BourbonNFriends => "bourbon_n_friends",
            Self::Bootstrap => "bootstrap",
            Self::Foundation => "foundation",
        }
    }
}

impl fmt::Display for CssFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CssFramework {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bourbon_n_friends" | "bourbon" => Ok(Self::BourbonNFriends),
            "bootstrap" => Ok(Self::Bootstrap),
            "foundation" => Ok(Self::Foundation),
            other => Err(DomainError::UnknownVariant {
                option: "css_framework",
                value: other.to_string(),
            }),
        }
    }
}

// ── Choice ───────────────────────────────────────────────────────────────────

/// A resolved enumerated option.
///
/// `Unrecognized` keeps the user's raw input. Branch steps match on
/// [`Choice::key`] and report a warning for unrecognized values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice<T> {
    Known(T),
    Unrecognized(String),
}

impl<T> Choice<T>
where
    T: FromStr + fmt::Display,
{
    /// Parse `raw`, falling back to `Unrecognized` instead of failing.
    pub fn parse(raw: &str) -> Self {
        raw.parse::<T>()
            .map(Self::Known)
            .unwrap_or_else(|_| Self::Unrecognized(raw.trim().to_string()))
    }

    /// The canonical string used for branch matching and template variables.
    pub fn key(&self) -> String {
        match self {
            Self::Known(value) => value.to_string(),
            Self::Unrecognized(raw) => raw.clone(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unrecognized(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => value.fmt(f),
            Self::Unrecognized(raw) => write!(f, "{raw} (unrecognized)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_parses_aliases() {
        assert_eq!("pg".parse::<Database>().unwrap(), Database::Postgresql);
        assert_eq!("Postgres".parse::<Database>().unwrap(), Database::Postgresql);
        assert_eq!("sqlite".parse::<Database>().unwrap(), Database::Sqlite3);
        assert!("mongodb".parse::<Database>().is_err());
    }

    #[test]
    fn database_round_trips_through_as_str() {
        for db in Database::ALL {
            assert_eq!(db.as_str().parse::<Database>().unwrap(), db);
        }
    }

    #[test]
    fn css_framework_accepts_bourbon_alias() {
        assert_eq!(
            "bourbon".parse::<CssFramework>().unwrap(),
            CssFramework::BourbonNFriends
        );
        assert!("material".parse::<CssFramework>().is_err());
    }

    #[test]
    fn choice_keeps_unrecognized_input() {
        let choice: Choice<CssFramework> = Choice::parse("material");
        assert!(!choice.is_recognized());
        assert_eq!(choice.key(), "material");
        assert_eq!(choice.known(), None);
    }

    #[test]
    fn choice_key_is_canonical_for_known_values() {
        let choice: Choice<Database> = Choice::parse("PG");
        assert_eq!(choice.key(), "postgresql");
        assert_eq!(choice.known(), Some(&Database::Postgresql));
    }
}
