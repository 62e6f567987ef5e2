//! Per-department and per-region accident totals computed once at load.

use std::collections::BTreeMap;

use dashbike_accident_models::AccidentRecord;
use dashbike_geography_models::{DepartmentPopulation, DepartmentStats, RegionStats};

/// Rounds to two decimals.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Accidents per 1,000 inhabitants, rounded to two decimals.
///
/// Returns `None` for an empty population.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio_per_thousand(accidents: u64, population: u64) -> Option<f64> {
    if population == 0 {
        return None;
    }
    Some(round2(accidents as f64 / population as f64 * 1000.0))
}

/// Counts accidents per department and joins the population table.
///
/// Records without a region are not attributable to a choropleth area and
/// are left out; departments without a population entry keep `None` for
/// population and ratio. Output is sorted by department code.
#[must_use]
pub fn department_stats(
    records: &[AccidentRecord],
    population: &[DepartmentPopulation],
) -> Vec<DepartmentStats> {
    let mut counts: BTreeMap<&str, (u64, &AccidentRecord)> = BTreeMap::new();
    let mut unattributed = 0_usize;

    for record in records {
        if record.region.is_none() {
            unattributed += 1;
            continue;
        }
        counts
            .entry(record.department.as_str())
            .and_modify(|(n, _)| *n += 1)
            .or_insert((1, record));
    }

    if unattributed > 0 {
        log::warn!("{unattributed} accident records have no region and are excluded from area totals");
    }

    let population_by_code: BTreeMap<&str, &DepartmentPopulation> =
        population.iter().map(|p| (p.code.as_str(), p)).collect();

    let mut missing_population = Vec::new();

    let stats: Vec<DepartmentStats> = counts
        .into_iter()
        .map(|(code, (accidents, sample))| {
            let pop = population_by_code.get(code).map(|p| p.population);
            if pop.is_none() {
                missing_population.push(code.to_string());
            }
            DepartmentStats {
                code: code.to_string(),
                name: sample
                    .department_name
                    .clone()
                    .or_else(|| population_by_code.get(code).map(|p| p.name.clone()))
                    .unwrap_or_else(|| code.to_string()),
                region_code: sample.region.clone().unwrap_or_default(),
                region_name: sample.region_name.clone().unwrap_or_default(),
                accidents,
                population: pop,
                ratio: pop.and_then(|p| ratio_per_thousand(accidents, p)),
            }
        })
        .collect();

    if !missing_population.is_empty() {
        log::warn!(
            "No population for departments: {}",
            missing_population.join(", ")
        );
    }

    stats
}

/// Rolls department totals up to regions: accident counts and populations
/// are summed, ratios are averaged over the departments that have one.
/// Output is sorted by region code.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn region_stats(departments: &[DepartmentStats]) -> Vec<RegionStats> {
    struct Acc<'a> {
        name: &'a str,
        accidents: u64,
        population: u64,
        ratio_sum: f64,
        ratio_count: u32,
    }

    let mut regions: BTreeMap<&str, Acc<'_>> = BTreeMap::new();

    for dep in departments {
        let acc = regions.entry(dep.region_code.as_str()).or_insert(Acc {
            name: &dep.region_name,
            accidents: 0,
            population: 0,
            ratio_sum: 0.0,
            ratio_count: 0,
        });
        acc.accidents += dep.accidents;
        acc.population += dep.population.unwrap_or(0);
        if let Some(ratio) = dep.ratio {
            acc.ratio_sum += ratio;
            acc.ratio_count += 1;
        }
    }

    regions
        .into_iter()
        .map(|(code, acc)| RegionStats {
            code: code.to_string(),
            name: acc.name.to_string(),
            accidents: acc.accidents,
            population: acc.population,
            ratio: (acc.ratio_count > 0)
                .then(|| round2(acc.ratio_sum / f64::from(acc.ratio_count))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use dashbike_accident_models::{Month, Severity, Weekday};

    use super::*;

    fn record(dep: &str, region: Option<&str>) -> AccidentRecord {
        AccidentRecord {
            year: 2020,
            month: Month::Mai,
            weekday: Weekday::Lundi,
            department: dep.to_string(),
            department_name: Some(format!("Dep {dep}")),
            region: region.map(str::to_string),
            region_name: region.map(|r| format!("Region {r}")),
            latitude: None,
            longitude: None,
            severity: Severity::LightlyInjured,
            age: None,
            age_group: None,
            sex: None,
            route_category: None,
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

    fn population(code: &str, population: u64) -> DepartmentPopulation {
        DepartmentPopulation {
            code: code.to_string(),
            name: format!("Dep {code}"),
            population,
        }
    }

    #[test]
    fn ratio_per_thousand_inhabitants() {
        assert_eq!(ratio_per_thousand(100, 50_000), Some(2.0));
        assert_eq!(ratio_per_thousand(1, 3_000), Some(0.33));
        assert_eq!(ratio_per_thousand(5, 0), None);
    }

    #[test]
    fn department_counts_join_population() {
        let mut records: Vec<AccidentRecord> = (0..100).map(|_| record("35", Some("53"))).collect();
        records.push(record("22", Some("53")));
        records.push(record("99", None));

        let stats = department_stats(&records, &[population("35", 50_000)]);
        assert_eq!(stats.len(), 2);

        let ille = stats.iter().find(|s| s.code == "35").unwrap();
        assert_eq!(ille.accidents, 100);
        assert_eq!(ille.ratio, Some(2.0));

        let cotes = stats.iter().find(|s| s.code == "22").unwrap();
        assert_eq!(cotes.population, None);
        assert_eq!(cotes.ratio, None);
    }

    #[test]
    fn regions_sum_counts_and_average_ratios() {
        let departments = vec![
            DepartmentStats {
                code: "22".to_string(),
                name: "Côtes-d'Armor".to_string(),
                region_code: "53".to_string(),
                region_name: "Bretagne".to_string(),
                accidents: 10,
                population: Some(10_000),
                ratio: Some(1.0),
            },
            DepartmentStats {
                code: "35".to_string(),
                name: "Ille-et-Vilaine".to_string(),
                region_code: "53".to_string(),
                region_name: "Bretagne".to_string(),
                accidents: 30,
                population: Some(10_000),
                ratio: Some(3.0),
            },
            DepartmentStats {
                code: "56".to_string(),
                name: "Morbihan".to_string(),
                region_code: "53".to_string(),
                region_name: "Bretagne".to_string(),
                accidents: 5,
                population: None,
                ratio: None,
            },
        ];

        let regions = region_stats(&departments);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].accidents, 45);
        assert_eq!(regions[0].population, 20_000);
        assert_eq!(regions[0].ratio, Some(2.0));
    }
}
