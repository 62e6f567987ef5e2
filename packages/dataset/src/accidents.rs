//! Accident records CSV parsing.
//!
//! Rows are deserialized by header name, so optional columns may be absent
//! from the file. Rows whose mandatory fields (year, month, weekday,
//! department, severity) cannot be parsed are skipped and counted rather
//! than failing the whole load.

use std::collections::BTreeSet;
use std::io::Read;

use chrono::{NaiveDate, NaiveTime};
use dashbike_accident_models::{AccidentRecord, AgeGroup, Column};
use dashbike_geography_models::regions::zero_pad;
use serde::Deserialize;

use crate::DatasetError;

/// Raw CSV row; every field is optional so that missing columns and empty
/// cells are handled uniformly.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAccidentRow {
    an: Option<String>,
    mois: Option<String>,
    jour: Option<String>,
    dep: Option<String>,
    dep_name: Option<String>,
    reg: Option<String>,
    region_name: Option<String>,
    lat: Option<String>,
    long: Option<String>,
    grav: Option<String>,
    age: Option<String>,
    age_group: Option<String>,
    sexe: Option<String>,
    catr: Option<String>,
    obsm: Option<String>,
    atm: Option<String>,
    int: Option<String>,
    lum: Option<String>,
    situ: Option<String>,
    trajet: Option<String>,
    com_name: Option<String>,
    date: Option<String>,
    hrmn: Option<String>,
}

/// Accident records parsed from a CSV file.
#[derive(Debug, Clone)]
pub struct ParsedAccidents {
    /// Successfully parsed records, in file order.
    pub records: Vec<AccidentRecord>,
    /// Columns present in the file header.
    pub columns: BTreeSet<Column>,
    /// Number of rows skipped because a mandatory field was invalid.
    pub skipped: usize,
}

/// Reads accident records from a comma-separated reader.
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] if the header cannot be read and
/// [`DatasetError::MissingColumn`] if a mandatory column is absent.
pub fn read_accidents<R: Read>(reader: R) -> Result<ParsedAccidents, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

    for required in ["an", "mois", "jour", "dep", "grav"] {
        if !headers.iter().any(|h| h == required) {
            return Err(DatasetError::MissingColumn {
                file: "accidents".to_string(),
                column: required.to_string(),
            });
        }
    }

    let mut columns: BTreeSet<Column> = headers
        .iter()
        .filter_map(|h| h.parse::<Column>().ok())
        .collect();
    if headers.iter().any(|h| h == "age") {
        columns.insert(Column::AgeGroup);
    }

    let mut records = Vec::new();
    let mut skipped = 0;

    for (idx, result) in reader.deserialize::<RawAccidentRow>().enumerate() {
        let line = idx + 2;
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Skipping accident row {line}: {e}");
                skipped += 1;
                continue;
            }
        };
        match parse_row(raw) {
            Ok(record) => records.push(record),
            Err(message) => {
                log::warn!("Skipping accident row {line}: {message}");
                skipped += 1;
            }
        }
    }

    log::info!(
        "Parsed {} accident records ({skipped} skipped)",
        records.len()
    );

    Ok(ParsedAccidents {
        records,
        columns,
        skipped,
    })
}

fn parse_row(raw: RawAccidentRow) -> Result<AccidentRecord, String> {
    let year = raw
        .an
        .as_deref()
        .and_then(parse_integer)
        .and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| format!("invalid year {:?}", raw.an))?;

    let month = required(raw.mois.as_deref(), "month")?;
    let weekday = required(raw.jour.as_deref(), "weekday")?;
    let severity = required(raw.grav.as_deref(), "severity")?;

    let department = non_empty(raw.dep).ok_or("missing department")?;

    let age = raw
        .age
        .as_deref()
        .and_then(parse_integer)
        .and_then(|a| u16::try_from(a).ok());
    let age_group = age.map(AgeGroup::from_age).or_else(|| {
        raw.age_group
            .as_deref()
            .and_then(|label| label.parse::<AgeGroup>().ok())
    });

    Ok(AccidentRecord {
        year,
        month,
        weekday,
        department: zero_pad(&department, 2),
        department_name: non_empty(raw.dep_name),
        region: non_empty(raw.reg).map(|r| zero_pad(&r, 2)),
        region_name: non_empty(raw.region_name),
        latitude: raw.lat.as_deref().and_then(parse_decimal),
        longitude: raw.long.as_deref().and_then(parse_decimal),
        severity,
        age,
        age_group,
        sex: non_empty(raw.sexe),
        route_category: non_empty(raw.catr),
        obstacle: non_empty(raw.obsm),
        weather: non_empty(raw.atm),
        intersection: non_empty(raw.int),
        lighting: non_empty(raw.lum),
        situation: non_empty(raw.situ),
        trip: non_empty(raw.trajet),
        commune: non_empty(raw.com_name),
        date: raw.date.as_deref().and_then(parse_date),
        time: raw.hrmn.as_deref().and_then(parse_time),
    })
}

fn required<T: std::str::FromStr>(value: Option<&str>, what: &str) -> Result<T, String> {
    let value = value.map(str::trim).unwrap_or_default();
    value
        .parse::<T>()
        .map_err(|_| format!("invalid {what} '{value}'"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "nan")
}

/// Parses integers written either plainly or with a trailing `.0`, as
/// exported by dataframe tools.
fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        s.strip_suffix(".0")
            .and_then(|whole| whole.parse::<i64>().ok())
    })
}

fn parse_decimal(s: &str) -> Option<f64> {
    let value = s.trim().replace(',', ".").parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
        .or_else(|| {
            s.split_whitespace()
                .next()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        })
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use dashbike_accident_models::{Month, Severity, Weekday};

    use super::*;

    const SAMPLE: &str = "\
an,mois,jour,dep,dep_name,reg,region_name,lat,long,grav,age,sexe,catr,obsm,atm,int,lum,com_name,date,hrmn
2019,mars,lundi,75,Paris,11,Île-de-France,48.85,2.35,Tué,34.0,M,Voie Communales,Véhicule,Normale,Hors intersection,Plein jour,Paris,2019-03-04,08:15
2020,décembre,dimanche,1,Ain,84,Auvergne-Rhône-Alpes,\"46,2\",5.2,Indemne,,F,,,,,,,,
2020,brumaire,lundi,75,Paris,11,Île-de-France,,,Tué,,,,,,,,,,
";

    #[test]
    fn parses_valid_rows_and_skips_invalid() {
        let parsed = read_accidents(SAMPLE.as_bytes()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 1);

        let first = &parsed.records[0];
        assert_eq!(first.year, 2019);
        assert_eq!(first.month, Month::Mars);
        assert_eq!(first.weekday, Weekday::Lundi);
        assert_eq!(first.severity, Severity::Killed);
        assert_eq!(first.age, Some(34));
        assert_eq!(first.age_group, Some(AgeGroup::YoungAdult));
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2019, 3, 4));
        assert_eq!(first.time, NaiveTime::from_hms_opt(8, 15, 0));
    }

    #[test]
    fn normalises_codes_and_decimals() {
        let parsed = read_accidents(SAMPLE.as_bytes()).unwrap();
        let second = &parsed.records[1];
        assert_eq!(second.department, "01");
        assert_eq!(second.region.as_deref(), Some("84"));
        assert_eq!(second.latitude, Some(46.2));
        assert_eq!(second.age_group, None);
        assert_eq!(second.route_category, None);
    }

    #[test]
    fn records_header_columns() {
        let parsed = read_accidents(SAMPLE.as_bytes()).unwrap();
        assert!(parsed.columns.contains(&Column::Severity));
        assert!(parsed.columns.contains(&Column::AgeGroup));
        assert!(!parsed.columns.contains(&Column::Trip));
    }

    #[test]
    fn accepts_precomputed_age_group() {
        let csv = "an,mois,jour,dep,grav,age_group\n2021,mai,mardi,13,Blessé léger,65 ans et plus\n";
        let parsed = read_accidents(csv.as_bytes()).unwrap();
        assert_eq!(parsed.records[0].age_group, Some(AgeGroup::Senior));
        assert!(parsed.columns.contains(&Column::AgeGroup));
    }

    #[test]
    fn missing_mandatory_column_fails() {
        let csv = "an,mois,jour,dep\n2021,mai,mardi,13\n";
        let err = read_accidents(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { ref column, .. } if column == "grav"));
    }
}
