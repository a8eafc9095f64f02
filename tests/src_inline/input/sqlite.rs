use super::*;
use crate::fixtures::{SCHEMA, database_bytes, database_bytes_from_sql, gzip, utopia};

#[test]
fn parses_join_in_name_year_order() {
    let mut rows = utopia();
    rows.reverse();
    rows.push(crate::fixtures::flat("Atlantis", "ATL", 1999, 0.3, 0.5));
    let bytes = database_bytes(&rows);

    let parsed = parse_database("fixture.db", &bytes).expect("parse");
    assert!(parsed.unkeyed.is_empty());
    let keys: Vec<(&str, i32)> = parsed
        .observations
        .iter()
        .map(|o| (o.country_name.as_str(), o.year))
        .collect();
    assert_eq!(keys, [("Atlantis", 1999), ("Utopia", 2020), ("Utopia", 2021)]);

    let first_utopia = &parsed.observations[1];
    assert_eq!(first_utopia.country_code, "UTO");
    assert_eq!(first_utopia.indicator(Indicator::Com), 1.0);
    assert_eq!(first_utopia.indicator(Indicator::Omf), -3.0);
    assert_eq!(first_utopia.outcome, 0.80);
}

#[test]
fn rows_without_all_three_tables_are_dropped() {
    let sql = format!(
        "{SCHEMA}
        INSERT INTO country_metadata VALUES ('Utopia', 'UTO', 2020), ('Utopia', 'UTO', 2021);
        INSERT INTO dsp_variables VALUES ('UTO', 2020, 1, 1, 1, 1, 1, 1, 1), ('UTO', 2021, 2, 2, 2, 2, 2, 2, 2);
        INSERT INTO vdem_variables VALUES ('UTO', 2021, 0.9);"
    );
    let parsed = parse_database("fixture.db", &database_bytes_from_sql(&sql)).expect("parse");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.observations[0].year, 2021);
}

#[test]
fn missing_columns_are_named() {
    let sql = "
        CREATE TABLE country_metadata (country_name TEXT, country_code TEXT, year INTEGER);
        CREATE TABLE dsp_variables (country_code TEXT, year INTEGER, COM REAL, OMP REAL, PEC REAL, GD REAL, PD REAL);
        CREATE TABLE vdem_variables (country_code TEXT, year INTEGER, EDI REAL);
    ";
    let err = parse_database("fixture.db", &database_bytes_from_sql(sql)).expect_err("schema");
    assert_eq!(
        err,
        LoadError::MissingColumns {
            table: "dsp_variables".to_string(),
            columns: vec!["OMF".to_string(), "SMV".to_string()],
        }
    );
    assert!(err.to_string().contains("OMF, SMV"));
}

#[test]
fn missing_table_reports_all_its_columns() {
    let sql = "
        CREATE TABLE country_metadata (country_name TEXT, country_code TEXT, year INTEGER);
        CREATE TABLE dsp_variables (country_code TEXT, year INTEGER, COM REAL, OMP REAL, PEC REAL, GD REAL, PD REAL, OMF REAL, SMV REAL);
    ";
    let err = parse_database("fixture.db", &database_bytes_from_sql(sql)).expect_err("schema");
    match err {
        LoadError::MissingColumns { table, columns } => {
            assert_eq!(table, "vdem_variables");
            assert_eq!(columns, ["country_code", "year", "EDI"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_join_is_no_results() {
    let err = parse_database("fixture.db", &database_bytes_from_sql(SCHEMA)).expect_err("empty");
    assert_eq!(err, LoadError::NoResults);
    assert_eq!(err.to_string(), "query returned no results");
}

#[test]
fn garbage_bytes_are_a_parse_error() {
    let bytes = b"this is certainly not a sqlite database, just some text padding".repeat(32);
    let err = parse_database("junk.db", &bytes).expect_err("junk");
    match err {
        LoadError::Parse { resource, .. } => assert_eq!(resource, "junk.db"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn uncoercible_values_become_nan_but_row_is_kept() {
    let sql = format!(
        "{SCHEMA}
        INSERT INTO country_metadata VALUES ('Utopia', 'UTO', 2020);
        INSERT INTO dsp_variables VALUES ('UTO', 2020, ' 1.5 ', 'n/a', NULL, '', 2, 3, 4);
        INSERT INTO vdem_variables VALUES ('UTO', 2020, 'unknown');"
    );
    let parsed = parse_database("fixture.db", &database_bytes_from_sql(&sql)).expect("parse");
    assert_eq!(parsed.len(), 1);
    let row = &parsed.observations[0];
    assert_eq!(row.indicator(Indicator::Com), 1.5);
    assert!(row.indicator(Indicator::Omp).is_nan());
    assert!(row.indicator(Indicator::Pec).is_nan());
    assert!(row.indicator(Indicator::Gd).is_nan());
    assert_eq!(row.indicator(Indicator::Pd), 2.0);
    assert!(row.outcome.is_nan());
}

#[test]
fn non_integer_year_keeps_the_row_unkeyed() {
    let sql = format!(
        "{SCHEMA}
        INSERT INTO country_metadata VALUES ('Utopia', 'UTO', 2020.5), ('Utopia', 'UTO', 2021);
        INSERT INTO dsp_variables VALUES ('UTO', 2020.5, 4, 4, 4, 4, 4, 4, 4), ('UTO', 2021, 1, 1, 1, 1, 1, 1, 1);
        INSERT INTO vdem_variables VALUES ('UTO', 2020.5, 0.5), ('UTO', 2021, 0.7);"
    );
    let parsed = parse_database("fixture.db", &database_bytes_from_sql(&sql)).expect("parse");
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.observations.len(), 1);
    assert_eq!(parsed.observations[0].year, 2021);

    let unkeyed = &parsed.unkeyed[0];
    assert_eq!(unkeyed.country_name, "Utopia");
    assert_eq!(unkeyed.year, 2020.5);
    assert_eq!(unkeyed.indicators.get(Indicator::Smv), 4.0);
    assert_eq!(unkeyed.outcome, 0.5);
}

#[test]
fn unreadable_year_is_nan_in_unkeyed_row() {
    let sql = format!(
        "{SCHEMA}
        INSERT INTO country_metadata VALUES ('Utopia', 'UTO', 'n/a');
        INSERT INTO dsp_variables VALUES ('UTO', 'n/a', 1, 1, 1, 1, 1, 1, 1);
        INSERT INTO vdem_variables VALUES ('UTO', 'n/a', 0.5);"
    );
    let parsed = parse_database("fixture.db", &database_bytes_from_sql(&sql)).expect("parse");
    assert!(parsed.observations.is_empty());
    assert_eq!(parsed.unkeyed.len(), 1);
    assert!(parsed.unkeyed[0].year.is_nan());
}

#[cfg(feature = "gz")]
#[test]
fn gzip_artifact_is_decompressed() {
    let bytes = gzip(&database_bytes(&utopia()));
    let parsed = parse_database("Democracy_Data.db.gz", &bytes).expect("parse");
    assert_eq!(parsed.len(), 2);
}

#[test]
fn coerce_text_stringifies_numbers() {
    assert_eq!(coerce_text(ValueRef::Integer(42)), "42");
    assert_eq!(coerce_text(ValueRef::Null), "");
    assert_eq!(coerce_text(ValueRef::Text(b"Chad")), "Chad");
}

#[test]
fn coerce_number_drops_non_finite() {
    assert!(coerce_number(ValueRef::Real(f64::INFINITY)).is_nan());
    assert!(coerce_number(ValueRef::Text(b"inf")).is_nan());
    assert_eq!(coerce_number(ValueRef::Integer(-3)), -3.0);
}
