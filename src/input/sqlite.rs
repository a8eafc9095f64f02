//! Reads the country-year join out of the `Democracy_Data.db` artifact.

use std::io::Write;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::input::LoadError;
use crate::model::indicators::{Indicator, OUTCOME_KEY};
use crate::model::observation::{IndicatorValues, Observation, UnkeyedRow};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub const METADATA_TABLE: &str = "country_metadata";
pub const INDICATOR_TABLE: &str = "dsp_variables";
pub const OUTCOME_TABLE: &str = "vdem_variables";

const JOIN_QUERY: &str = "
    SELECT
        m.country_name,
        m.country_code,
        m.year,
        d.COM, d.OMP, d.PEC, d.GD, d.PD, d.OMF, d.SMV,
        v.EDI
    FROM country_metadata m
    JOIN dsp_variables d
        ON m.country_code = d.country_code AND m.year = d.year
    JOIN vdem_variables v
        ON m.country_code = v.country_code AND m.year = v.year
    ORDER BY m.country_name, m.year
";

// Result column positions of JOIN_QUERY.
const COL_NAME: usize = 0;
const COL_CODE: usize = 1;
const COL_YEAR: usize = 2;
const COL_FIRST_INDICATOR: usize = 3;
const COL_OUTCOME: usize = COL_FIRST_INDICATOR + Indicator::COUNT;

#[derive(Debug, Clone)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: Vec<&'static str>,
}

pub fn required_tables() -> [TableSpec; 3] {
    let mut indicator_columns = vec!["country_code", "year"];
    indicator_columns.extend(Indicator::ALL.iter().map(|ind| ind.key()));
    [
        TableSpec {
            name: METADATA_TABLE,
            columns: vec!["country_name", "country_code", "year"],
        },
        TableSpec {
            name: INDICATOR_TABLE,
            columns: indicator_columns,
        },
        TableSpec {
            name: OUTCOME_TABLE,
            columns: vec!["country_code", "year", OUTCOME_KEY],
        },
    ]
}

/// Rows of the join in query order, split by whether the year is usable as a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRows {
    pub observations: Vec<Observation>,
    pub unkeyed: Vec<UnkeyedRow>,
}

impl ParsedRows {
    pub fn len(&self) -> usize {
        self.observations.len() + self.unkeyed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses raw artifact bytes (plain or gzip-compressed SQLite) into ordered rows.
pub fn parse_database(resource: &str, bytes: &[u8]) -> Result<ParsedRows, LoadError> {
    let bytes = maybe_decompress(resource, bytes)?;

    // SQLite opens from a path; the temp file must outlive the connection.
    let mut tmp = tempfile::NamedTempFile::new().map_err(|e| parse_error(resource, e))?;
    tmp.write_all(&bytes).map_err(|e| parse_error(resource, e))?;
    tmp.flush().map_err(|e| parse_error(resource, e))?;

    let conn = Connection::open_with_flags(
        tmp.path(),
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| parse_error(resource, e))?;

    validate_schema(&conn, resource)?;
    let parsed = query_rows(&conn, resource)?;
    drop(conn);

    debug!(
        resource,
        rows = parsed.observations.len(),
        unkeyed = parsed.unkeyed.len(),
        "parsed country-year observations"
    );
    Ok(parsed)
}

fn parse_error(resource: &str, err: impl std::fmt::Display) -> LoadError {
    LoadError::Parse {
        resource: resource.to_string(),
        reason: err.to_string(),
    }
}

fn maybe_decompress<'a>(
    resource: &str,
    bytes: &'a [u8],
) -> Result<std::borrow::Cow<'a, [u8]>, LoadError> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(std::borrow::Cow::Borrowed(bytes));
    }
    #[cfg(feature = "gz")]
    {
        use std::io::Read;
        let mut decoder = flate2::read::GzDecoder::new(bytes);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|err| LoadError::Decompress {
                resource: resource.to_string(),
                reason: err.to_string(),
            })?;
        Ok(std::borrow::Cow::Owned(out))
    }
    #[cfg(not(feature = "gz"))]
    {
        Err(LoadError::GzipNotEnabled(resource.to_string()))
    }
}

/// Every required column missing from a table is reported at once.
pub fn validate_schema(conn: &Connection, resource: &str) -> Result<(), LoadError> {
    for table in required_tables() {
        let present = table_columns(conn, table.name).map_err(|e| parse_error(resource, e))?;
        let missing: Vec<String> = table
            .columns
            .iter()
            .filter(|col| !present.iter().any(|p| p.eq_ignore_ascii_case(col)))
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns {
                table: table.name.to_string(),
                columns: missing,
            });
        }
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info(\"{table}\")"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    rows.collect()
}

struct RawRow {
    country_name: String,
    country_code: String,
    year: f64,
    indicators: IndicatorValues,
    outcome: f64,
}

fn query_rows(conn: &Connection, resource: &str) -> Result<ParsedRows, LoadError> {
    let mut stmt = conn.prepare(JOIN_QUERY).map_err(|e| parse_error(resource, e))?;
    let rows = stmt
        .query_map([], |row| {
            let mut indicators = IndicatorValues::default();
            for (offset, indicator) in Indicator::ALL.into_iter().enumerate() {
                indicators.set(
                    indicator,
                    coerce_number(row.get_ref(COL_FIRST_INDICATOR + offset)?),
                );
            }
            Ok(RawRow {
                country_name: coerce_text(row.get_ref(COL_NAME)?),
                country_code: coerce_text(row.get_ref(COL_CODE)?),
                year: coerce_number(row.get_ref(COL_YEAR)?),
                indicators,
                outcome: coerce_number(row.get_ref(COL_OUTCOME)?),
            })
        })
        .map_err(|e| parse_error(resource, e))?;

    let mut parsed = ParsedRows::default();
    for raw in rows {
        let raw = raw.map_err(|e| parse_error(resource, e))?;
        match integral_year(raw.year) {
            Some(year) => parsed.observations.push(Observation {
                country_name: raw.country_name,
                country_code: raw.country_code,
                year,
                indicators: raw.indicators,
                outcome: raw.outcome,
            }),
            None => parsed.unkeyed.push(UnkeyedRow {
                country_name: raw.country_name,
                country_code: raw.country_code,
                year: raw.year,
                indicators: raw.indicators,
                outcome: raw.outcome,
            }),
        }
    }

    if parsed.is_empty() {
        return Err(LoadError::NoResults);
    }
    Ok(parsed)
}

/// Finite number or NaN. NULL and BLOB cells are NaN.
pub fn coerce_number(value: ValueRef<'_>) -> f64 {
    let n = match value {
        ValueRef::Integer(i) => i as f64,
        ValueRef::Real(f) => f,
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(f64::NAN),
        ValueRef::Null | ValueRef::Blob(_) => f64::NAN,
    };
    if n.is_finite() { n } else { f64::NAN }
}

pub fn coerce_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Null | ValueRef::Blob(_) => String::new(),
    }
}

fn integral_year(value: f64) -> Option<i32> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(value as i32)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/sqlite.rs"]
mod tests;
