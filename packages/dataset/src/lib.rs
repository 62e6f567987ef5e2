#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV dataset loader and read-only data context.
//!
//! [`DataContext::load`] reads the accident records and the two reference
//! tables, fills in department/region names from the reference mapping,
//! and computes the per-department and per-region totals used by the
//! choropleth views. The resulting context is never mutated; every
//! filter produces a new [`TableView`] over row indices.

pub mod accidents;
pub mod aggregates;
pub mod paths;
pub mod reference;

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;

use dashbike_accident_models::{AccidentRecord, Column};
use dashbike_geography_models::{
    DepartmentPopulation, DepartmentRef, DepartmentStats, RegionStats,
};
use thiserror::Error;

pub use paths::DatasetPaths;

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A file could not be opened or read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File being read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A mandatory column is absent from a file header.
    #[error("Missing column '{column}' in {file} file")]
    MissingColumn {
        /// Which input file.
        file: String,
        /// Name of the missing column.
        column: String,
    },

    /// A cell could not be parsed.
    #[error("Invalid value '{value}' in column '{column}'")]
    InvalidValue {
        /// Column name.
        column: String,
        /// Offending cell.
        value: String,
    },
}

/// The accident records plus the schema and category domains derived from
/// them.
#[derive(Debug, Clone)]
pub struct AccidentTable {
    records: Vec<AccidentRecord>,
    columns: BTreeSet<Column>,
    domains: BTreeMap<Column, Vec<String>>,
}

impl AccidentTable {
    /// Builds a table from parsed records and the set of columns present.
    ///
    /// The domain of a column with a declared category set is that set in
    /// declared order, followed by any undeclared values seen in the data.
    /// Other columns use the sorted distinct values (years numerically).
    #[must_use]
    pub fn new(records: Vec<AccidentRecord>, columns: BTreeSet<Column>) -> Self {
        let mut domains = BTreeMap::new();

        for &column in &columns {
            let mut seen: BTreeSet<String> = BTreeSet::new();
            for record in &records {
                if let Some(key) = record.key(column) {
                    seen.insert(key.into_owned());
                }
            }

            let domain = if let Some(declared) = column.declared_categories() {
                let mut domain: Vec<String> =
                    declared.iter().map(|s| (*s).to_string()).collect();
                domain.extend(seen.into_iter().filter(|v| !declared.contains(&v.as_str())));
                domain
            } else if column.is_numeric() {
                let mut values: Vec<String> = seen.into_iter().collect();
                values.sort_by(|a, b| {
                    let a = a.parse::<f64>().unwrap_or(f64::NAN);
                    let b = b.parse::<f64>().unwrap_or(f64::NAN);
                    a.total_cmp(&b)
                });
                values
            } else {
                seen.into_iter().collect()
            };

            domains.insert(column, domain);
        }

        Self {
            records,
            columns,
            domains,
        }
    }

    /// All records, in file order.
    #[must_use]
    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether `column` exists in this table.
    #[must_use]
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Columns present in this table.
    #[must_use]
    pub const fn columns(&self) -> &BTreeSet<Column> {
        &self.columns
    }

    /// Category domain of `column`, empty when the column is absent.
    #[must_use]
    pub fn domain(&self, column: Column) -> &[String] {
        self.domains.get(&column).map_or(&[], Vec::as_slice)
    }

    /// Distinct years present, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.domain(Column::Year)
            .iter()
            .filter_map(|y| y.parse().ok())
            .collect()
    }

    /// A view over every record.
    #[must_use]
    pub fn view(&self) -> TableView<'_> {
        TableView {
            table: self,
            rows: (0..self.records.len()).collect(),
        }
    }

    /// A view over the given row indices; out-of-range indices are dropped.
    #[must_use]
    pub fn view_of(&self, rows: &[usize]) -> TableView<'_> {
        TableView {
            table: self,
            rows: rows
                .iter()
                .copied()
                .filter(|&i| i < self.records.len())
                .collect(),
        }
    }
}

/// An immutable subset of an [`AccidentTable`].
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    table: &'a AccidentTable,
    rows: Vec<usize>,
}

impl<'a> TableView<'a> {
    /// The table this view selects from.
    #[must_use]
    pub const fn table(&self) -> &'a AccidentTable {
        self.table
    }

    /// Number of rows in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the view has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row indices into the table.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.rows
    }

    /// Iterates over the selected records.
    pub fn iter(&self) -> impl Iterator<Item = &'a AccidentRecord> + '_ {
        let records = self.table.records();
        self.rows.iter().map(move |&i| &records[i])
    }

    /// A new view keeping only the rows that satisfy `predicate`.
    #[must_use]
    pub fn retain(&self, mut predicate: impl FnMut(&AccidentRecord) -> bool) -> Self {
        let records = self.table.records();
        Self {
            table: self.table,
            rows: self
                .rows
                .iter()
                .copied()
                .filter(|&i| predicate(&records[i]))
                .collect(),
        }
    }
}

/// Everything loaded at start-up, shared read-only by every request.
#[derive(Debug, Clone)]
pub struct DataContext {
    /// Accident records.
    pub table: AccidentTable,
    /// Population by department, sorted by code.
    pub population: Vec<DepartmentPopulation>,
    /// Department reference mapping keyed by code.
    pub department_refs: BTreeMap<String, DepartmentRef>,
    /// Accident totals per department.
    pub departments: Vec<DepartmentStats>,
    /// Accident totals per region.
    pub regions: Vec<RegionStats>,
}

impl DataContext {
    /// Loads the three input files.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if a file cannot be read or parsed.
    pub fn load(paths: &DatasetPaths) -> Result<Self, DatasetError> {
        log::info!("Loading accident records from {}", paths.accidents().display());
        let parsed = accidents::read_accidents(open(&paths.accidents())?)?;

        log::info!("Loading population from {}", paths.population().display());
        let population = reference::read_population(open(&paths.population())?)?;

        log::info!(
            "Loading department references from {}",
            paths.departments().display()
        );
        let department_refs = reference::read_departments(open(&paths.departments())?)?;

        Ok(Self::from_parts(
            parsed.records,
            parsed.columns,
            population,
            department_refs,
        ))
    }

    /// Builds a context from already-parsed parts: joins department
    /// references onto the records and computes the area totals.
    #[must_use]
    pub fn from_parts(
        mut records: Vec<AccidentRecord>,
        mut columns: BTreeSet<Column>,
        population: Vec<DepartmentPopulation>,
        department_refs: BTreeMap<String, DepartmentRef>,
    ) -> Self {
        let mut unmatched: BTreeSet<String> = BTreeSet::new();

        for record in &mut records {
            match department_refs.get(&record.department) {
                Some(dep) => {
                    record.department_name.get_or_insert_with(|| dep.name.clone());
                    record.region.get_or_insert_with(|| dep.region_code.clone());
                    record
                        .region_name
                        .get_or_insert_with(|| dep.region_name.clone());
                }
                None if record.region.is_none() => {
                    unmatched.insert(record.department.clone());
                }
                None => {}
            }
        }

        if !unmatched.is_empty() {
            log::warn!(
                "Departments without region mapping: {}",
                unmatched.into_iter().collect::<Vec<_>>().join(", ")
            );
        }

        if !department_refs.is_empty() {
            columns.extend([Column::DepartmentName, Column::Region, Column::RegionName]);
        }

        let departments = aggregates::department_stats(&records, &population);
        let regions = aggregates::region_stats(&departments);

        log::info!(
            "Data context ready: {} records, {} departments, {} regions",
            records.len(),
            departments.len(),
            regions.len()
        );

        Self {
            table: AccidentTable::new(records, columns),
            population,
            department_refs,
            departments,
            regions,
        }
    }
}

fn open(path: &Path) -> Result<File, DatasetError> {
    File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use dashbike_accident_models::{Month, Severity, Weekday};

    use super::*;

    fn record(year: i32, month: Month, dep: &str) -> AccidentRecord {
        AccidentRecord {
            year,
            month,
            weekday: Weekday::Mardi,
            department: dep.to_string(),
            department_name: None,
            region: None,
            region_name: None,
            latitude: None,
            longitude: None,
            severity: Severity::Uninjured,
            age: None,
            age_group: None,
            sex: None,
            route_category: Some("Piste inconnue".to_string()),
            obstacle: None,
            weather: None,
            intersection: None,
            lighting: None,
            situation: None,
            trip: None,
            commune: None,
            date: None,
            time: None,
        }
    }

    fn refs() -> BTreeMap<String, DepartmentRef> {
        BTreeMap::from([(
            "35".to_string(),
            DepartmentRef {
                code: "35".to_string(),
                name: "Ille-et-Vilaine".to_string(),
                region_code: "53".to_string(),
                region_name: "Bretagne".to_string(),
            },
        )])
    }

    fn columns() -> BTreeSet<Column> {
        BTreeSet::from([
            Column::Year,
            Column::Month,
            Column::Weekday,
            Column::Department,
            Column::Severity,
            Column::RouteCategory,
        ])
    }

    #[test]
    fn joins_reference_names_and_flags_unmatched() {
        let ctx = DataContext::from_parts(
            vec![record(2020, Month::Mai, "35"), record(2020, Month::Mai, "99")],
            columns(),
            vec![],
            refs(),
        );
        let records = ctx.table.records();
        assert_eq!(records[0].region.as_deref(), Some("53"));
        assert_eq!(records[0].department_name.as_deref(), Some("Ille-et-Vilaine"));
        assert_eq!(records[1].region, None);
        assert_eq!(ctx.departments.len(), 1);
        assert!(ctx.table.has_column(Column::RegionName));
    }

    #[test]
    fn domains_follow_declared_then_observed_order() {
        let ctx = DataContext::from_parts(
            vec![record(2021, Month::Mai, "35"), record(2009, Month::Mars, "35")],
            columns(),
            vec![],
            refs(),
        );
        let months = ctx.table.domain(Column::Month);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], "janvier");

        assert_eq!(ctx.table.years(), vec![2009, 2021]);

        let routes = ctx.table.domain(Column::RouteCategory);
        assert_eq!(routes.last().map(String::as_str), Some("Piste inconnue"));
        assert_eq!(routes[0], "Route Départementale");

        assert!(ctx.table.domain(Column::Trip).is_empty());
    }

    #[test]
    fn views_never_mutate_the_table() {
        let ctx = DataContext::from_parts(
            vec![record(2021, Month::Mai, "35"), record(2009, Month::Mars, "35")],
            columns(),
            vec![],
            refs(),
        );
        let view = ctx.table.view();
        let recent = view.retain(|r| r.year > 2010);
        assert_eq!(recent.len(), 1);
        assert_eq!(view.len(), 2);
        assert_eq!(ctx.table.len(), 2);

        let cached = ctx.table.view_of(&[1, 7]);
        assert_eq!(cached.indices(), &[1]);
    }
}
