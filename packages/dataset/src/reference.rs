//! Reference tables: population by department and the
//! commune/department/region mapping.

use std::collections::BTreeMap;
use std::io::Read;

use dashbike_geography_models::regions::{OVERSEAS_COLLECTIVITIES, zero_pad};
use dashbike_geography_models::{DepartmentPopulation, DepartmentRef};
use serde::Deserialize;

use crate::DatasetError;

#[derive(Debug, Deserialize)]
struct RawPopulationRow {
    #[serde(rename = "Code Département")]
    code: String,
    #[serde(rename = "Département", default)]
    name: String,
    #[serde(rename = "Population")]
    population: String,
}

/// Reads the semicolon-separated population table and appends the overseas
/// collectivities it lacks. The result is sorted by department code.
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] on malformed CSV and
/// [`DatasetError::InvalidValue`] when a population is not a number.
pub fn read_population<R: Read>(reader: R) -> Result<Vec<DepartmentPopulation>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: BTreeMap<String, DepartmentPopulation> = BTreeMap::new();

    for result in reader.deserialize::<RawPopulationRow>() {
        let raw = result?;
        let digits: String = raw
            .population
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
            .collect();
        let population = digits
            .parse::<u64>()
            .map_err(|_| DatasetError::InvalidValue {
                column: "Population".to_string(),
                value: raw.population.clone(),
            })?;
        let code = zero_pad(&raw.code, 2);
        rows.insert(
            code.clone(),
            DepartmentPopulation {
                code,
                name: raw.name,
                population,
            },
        );
    }

    for (code, name, population) in OVERSEAS_COLLECTIVITIES {
        rows.entry((*code).to_string())
            .or_insert_with(|| DepartmentPopulation {
                code: (*code).to_string(),
                name: (*name).to_string(),
                population: *population,
            });
    }

    log::info!("Loaded population for {} departments", rows.len());

    Ok(rows.into_values().collect())
}

#[derive(Debug, Deserialize)]
struct RawCommuneRow {
    code_departement: Option<String>,
    nom_departement: Option<String>,
    code_region: Option<String>,
    nom_region: Option<String>,
}

/// Reads the commune-level reference table and reduces it to one entry per
/// department, keyed by department code.
///
/// Communes are listed many times per department; the first complete row
/// wins so that no department is duplicated in later joins.
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] on malformed CSV.
pub fn read_departments<R: Read>(
    reader: R,
) -> Result<BTreeMap<String, DepartmentRef>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut departments: BTreeMap<String, DepartmentRef> = BTreeMap::new();
    let mut incomplete = 0_usize;

    for result in reader.deserialize::<RawCommuneRow>() {
        let raw = result?;
        let (Some(code), Some(name), Some(region_code), Some(region_name)) = (
            raw.code_departement.filter(|s| !s.is_empty()),
            raw.nom_departement.filter(|s| !s.is_empty()),
            raw.code_region.filter(|s| !s.is_empty()),
            raw.nom_region.filter(|s| !s.is_empty()),
        ) else {
            incomplete += 1;
            continue;
        };

        let code = zero_pad(&code, 2);
        let region_code = zero_pad(&region_code, 2);

        if let Some(existing) = departments.get(&code) {
            if existing.region_code != region_code {
                log::warn!(
                    "Department {code} listed under regions {} and {region_code}; keeping {}",
                    existing.region_code,
                    existing.region_code
                );
            }
            continue;
        }

        departments.insert(
            code.clone(),
            DepartmentRef {
                code,
                name,
                region_code,
                region_name,
            },
        );
    }

    if incomplete > 0 {
        log::debug!("Ignored {incomplete} incomplete commune rows");
    }
    log::info!("Loaded {} department references", departments.len());

    Ok(departments)
}
