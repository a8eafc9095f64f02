use super::*;
use crate::fixtures::{flat, obs};

#[test]
fn writes_header_and_rows_with_empty_nan_cells() {
    let rows = vec![
        obs("Utopia", "UTO", 2020, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.5], 0.8),
        flat("Nowhere", "NWH", 1999, f64::NAN, f64::NAN),
    ];
    let mut buf = Vec::new();
    write_observations(&mut buf, &rows).expect("write csv");
    let text = String::from_utf8(buf).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "country_name,country_code,year,COM,OMP,PEC,GD,PD,OMF,SMV,EDI"
    );
    assert_eq!(lines[1], "Utopia,UTO,2020,1,2,3,4,5,6,7.5,0.8");
    assert_eq!(lines[2], "Nowhere,NWH,1999,,,,,,,,");
}

#[test]
fn quotes_names_with_commas() {
    let rows = vec![flat("Korea, Republic of", "KOR", 2023, 1.0, 0.79)];
    let mut buf = Vec::new();
    write_observations(&mut buf, &rows).expect("write csv");
    let text = String::from_utf8(buf).expect("utf8");
    assert!(text.contains("\"Korea, Republic of\",KOR,2023"));
}
