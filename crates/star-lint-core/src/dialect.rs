//! SQL dialect selection.

use serde::{Deserialize, Serialize};
use sqlparser::dialect::{
    BigQueryDialect, DuckDbDialect, GenericDialect, MySqlDialect, PostgreSqlDialect,
    SnowflakeDialect,
};

/// SQL dialect used to parse model files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Dialect-agnostic parsing.
    #[default]
    Ansi,
    /// Google `BigQuery`.
    BigQuery,
    /// `PostgreSQL`.
    Postgres,
    /// Snowflake.
    Snowflake,
    /// `MySQL`.
    MySql,
    /// `DuckDB`.
    DuckDb,
}

impl Dialect {
    /// All supported dialects.
    pub const ALL: &'static [Self] = &[
        Self::Ansi,
        Self::BigQuery,
        Self::Postgres,
        Self::Snowflake,
        Self::MySql,
        Self::DuckDb,
    ];

    /// Returns the configuration name of this dialect.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ansi => "ansi",
            Self::BigQuery => "bigquery",
            Self::Postgres => "postgres",
            Self::Snowflake => "snowflake",
            Self::MySql => "mysql",
            Self::DuckDb => "duckdb",
        }
    }

    /// Builds the `sqlparser` dialect.
    #[must_use]
    pub fn parser_dialect(self) -> Box<dyn sqlparser::dialect::Dialect> {
        match self {
            Self::Ansi => Box::new(GenericDialect {}),
            Self::BigQuery => Box::new(BigQueryDialect {}),
            Self::Postgres => Box::new(PostgreSqlDialect {}),
            Self::Snowflake => Box::new(SnowflakeDialect {}),
            Self::MySql => Box::new(MySqlDialect {}),
            Self::DuckDb => Box::new(DuckDbDialect {}),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|d| d.name()).collect();
                format!("unknown dialect '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("bigquery".parse::<Dialect>(), Ok(Dialect::BigQuery));
        assert_eq!(" Snowflake ".parse::<Dialect>(), Ok(Dialect::Snowflake));
        assert!("oracle".parse::<Dialect>().unwrap_err().contains("ansi"));
    }

    #[test]
    fn test_every_name_parses() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.name().parse::<Dialect>(), Ok(*dialect));
        }
    }
}
