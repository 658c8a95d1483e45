use super::{Cell, District, TableError};
use crate::scoring::CATEGORY_MAP;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use tracing::{debug, info, warn};

const DISTRICT_COLUMN: &str = "district";
const LATITUDE_COLUMN: &str = "latitude";
const LONGITUDE_COLUMN: &str = "longitude";

pub(crate) fn parse_table<R: Read>(reader: R) -> Result<(Vec<String>, Vec<District>), TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let district_index = headers
        .iter()
        .position(|header| header == DISTRICT_COLUMN)
        .ok_or(TableError::MissingDistrictColumn)?;

    let columns: Vec<String> = headers
        .iter()
        .filter(|header| !is_reserved(header))
        .cloned()
        .collect();

    let mut seen = HashSet::new();
    let mut districts = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let name = record.get(district_index).unwrap_or_default().to_string();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.clone()) {
            return Err(TableError::DuplicateDistrict(name));
        }

        let mut indicators = HashMap::new();
        let mut latitude = None;
        let mut longitude = None;

        for (header, raw) in headers.iter().zip(record.iter()) {
            match header.as_str() {
                DISTRICT_COLUMN => {}
                LATITUDE_COLUMN => latitude = raw.parse::<f64>().ok(),
                LONGITUDE_COLUMN => longitude = raw.parse::<f64>().ok(),
                column => {
                    let cell = parse_cell(raw);
                    if let Cell::Invalid(raw) = &cell {
                        debug!(district = %name, column, raw = %raw, "non-numeric indicator cell");
                    }
                    indicators.insert(column.to_string(), cell);
                }
            }
        }

        districts.push(District {
            name,
            indicators,
            latitude,
            longitude,
        });
    }

    if districts.is_empty() {
        return Err(TableError::Empty);
    }

    warn_missing_category_columns(&columns);
    info!(
        districts = districts.len(),
        columns = columns.len(),
        "indicator table loaded"
    );

    Ok((columns, districts))
}

fn normalize_header(value: &str) -> String {
    value.replace('\u{feff}', "").trim().to_ascii_lowercase()
}

fn is_reserved(header: &str) -> bool {
    matches!(header, DISTRICT_COLUMN | LATITUDE_COLUMN | LONGITUDE_COLUMN)
}

fn parse_cell(raw: &str) -> Cell {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Cell::Number(value),
        _ => Cell::Invalid(raw.to_string()),
    }
}

fn warn_missing_category_columns(columns: &[String]) {
    for category in &CATEGORY_MAP {
        let missing: Vec<&str> = category
            .columns
            .iter()
            .copied()
            .filter(|column| !columns.iter().any(|present| present == column))
            .collect();
        if !missing.is_empty() {
            warn!(
                category = category.key.as_str(),
                missing = ?missing,
                "category columns absent from indicator table"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn headers_are_trimmed_lowercased_and_stripped_of_bom() {
        let (columns, districts) = parse_table(Cursor::new(
            "\u{feff}District , Crime_Rate ,LATITUDE\nA,0.3,37.5\n",
        ))
        .expect("table parses");

        assert_eq!(columns, ["crime_rate"]);
        assert_eq!(districts[0].latitude, Some(37.5));
        assert_eq!(districts[0].to_float("crime_rate"), Ok(0.3));
    }

    #[test]
    fn blank_district_rows_are_skipped() {
        let (_, districts) =
            parse_table(Cursor::new("district,crime_rate\n,0.3\nB,0.4\n")).expect("table parses");
        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].name, "B");
    }

    #[test]
    fn infinite_values_are_invalid_cells() {
        assert_eq!(parse_cell("inf"), Cell::Invalid("inf".to_string()));
        assert_eq!(parse_cell("0.25"), Cell::Number(0.25));
    }
}
