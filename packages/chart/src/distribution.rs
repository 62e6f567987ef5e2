//! Breakdown panels of the user-characteristics page.

use dashbike_accident_models::{Column, Severity};
use dashbike_analytics::{AnalyticsError, count_by, count_by_pair, select};
use dashbike_analytics_models::{SeverityChoice, VariableChoice, YearFilter};
use dashbike_chart_models::{
    Annotation, Axis, Datum, Domain, Figure, Font, Grid, Layout, Legend, Line, Marker, Mode,
    Text, Title, Trace, TraceType,
};
use dashbike_dataset::TableView;

use crate::palette::{PLOTLY, cycle, series_palette};
use crate::{COUNT_AXIS_TITLE, hover, selectable, series_by_second};

fn with_complement(title: String, complement: Option<&str>) -> String {
    match complement {
        Some(extra) => format!("{title} pour les {extra}"),
        None => title,
    }
}

fn in_year<'a>(view: &TableView<'a>, year: YearFilter) -> Result<TableView<'a>, AnalyticsError> {
    select(view, &year.to_selection())
}

/// Stacked area of accident counts: per year when every year is shown,
/// per month of the chosen year otherwise, optionally broken down by a
/// column.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if the breakdown column is
/// absent from the table.
pub fn density(
    view: &TableView<'_>,
    variable: VariableChoice,
    year: YearFilter,
    title_complement: Option<&str>,
) -> Result<Figure, AnalyticsError> {
    let rows = in_year(view, year)?;
    let (x_column, title) = match year {
        YearFilter::All => (Column::Year, "Nombres d'accidents par an"),
        YearFilter::Year(_) => (Column::Month, "Nombres d'accidents par mois"),
    };
    let x_label = x_column.title();

    let (data, legend) = match variable {
        VariableChoice::All => {
            let counts = count_by(&rows, x_column)?;
            let trace = Trace {
                mode: Some(Mode::Lines),
                stackgroup: Some("one".to_string()),
                x: Some(counts.rows.iter().map(|r| Datum::from(r.key.as_str())).collect()),
                y: Some(counts.rows.iter().map(|r| Datum::from(r.count)).collect()),
                customdata: Some(
                    counts
                        .rows
                        .iter()
                        .map(|r| vec![Datum::from(r.key.as_str()), Datum::from(r.count)])
                        .collect(),
                ),
                hovertemplate: Some(hover(&[
                    &format!("{x_label} : %{{customdata[0]}}"),
                    "Nombre d'accidents : %{customdata[1]}",
                ])),
                ..Trace::default()
            };
            (vec![trace], None)
        }
        VariableChoice::Column(column) => {
            let table = count_by_pair(&rows, x_column, column)?;
            let palette = series_palette(column);
            let template = hover(&[
                &format!("{x_label} : %{{customdata[0]}}"),
                "Nombre d'accidents : %{customdata[1]}",
            ]);
            let traces = series_by_second(&table)
                .into_iter()
                .enumerate()
                .map(|(i, (key, points))| Trace {
                    name: Some(key.to_string()),
                    legendgroup: Some(key.to_string()),
                    mode: Some(Mode::Lines),
                    stackgroup: Some("one".to_string()),
                    line: Some(Line {
                        color: Some(cycle(palette, i).to_string()),
                        ..Line::default()
                    }),
                    x: Some(points.iter().map(|p| Datum::from(p.first.as_str())).collect()),
                    y: Some(points.iter().map(|p| Datum::from(p.count)).collect()),
                    customdata: Some(
                        points
                            .iter()
                            .map(|p| {
                                vec![
                                    Datum::from(p.first.as_str()),
                                    Datum::from(p.count),
                                    Datum::from(key),
                                ]
                            })
                            .collect(),
                    ),
                    hovertemplate: Some(template.clone()),
                    ..Trace::default()
                })
                .collect();
            (traces, Some(column.title()))
        }
    };

    let layout = selectable(Layout {
        title: Some(Title::plain(with_complement(title.to_string(), title_complement))),
        xaxis: Some(Axis::titled(x_label)),
        yaxis: Some(Axis::titled(COUNT_AXIS_TITLE)),
        legend: legend.map(|t| Legend {
            title: Some(Text::new(t)),
        }),
        ..Layout::default()
    });

    Ok(Figure {
        data,
        layout,
        frames: Vec::new(),
    })
}

/// Accident counts per category, largest first, or a single total bar.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if the breakdown column is
/// absent from the table.
pub fn bar(
    view: &TableView<'_>,
    variable: VariableChoice,
    year: YearFilter,
    title_complement: Option<&str>,
) -> Result<Figure, AnalyticsError> {
    let rows = in_year(view, year)?;

    let (x, y, legend): (Vec<Datum>, Vec<Datum>, Option<&str>) = match variable {
        VariableChoice::All => (
            vec![Datum::from("Total d'accidents")],
            vec![Datum::from(rows.len() as u64)],
            None,
        ),
        VariableChoice::Column(column) => {
            let mut counts = count_by(&rows, column)?.rows;
            counts.sort_by(|a, b| b.count.cmp(&a.count));
            (
                counts.iter().map(|r| Datum::from(r.key.as_str())).collect(),
                counts.iter().map(|r| Datum::from(r.count)).collect(),
                Some(column.title()),
            )
        }
    };

    let years = view.table().years();
    let (title, x_title) = match (year, years.first(), years.last()) {
        (YearFilter::Year(y), _, _) => {
            (format!("Nombres d'accidents pour l'année {y}"), y.to_string())
        }
        (YearFilter::All, Some(first), Some(last)) => (
            format!("Nombres d'accidents sur la période {first}-{last}"),
            format!("De {first} à {last}"),
        ),
        (YearFilter::All, _, _) => ("Nombres d'accidents".to_string(), String::new()),
    };

    let trace = Trace {
        kind: TraceType::Bar,
        x: Some(x),
        y: Some(y),
        marker: Some(Marker {
            color: Some(cycle(PLOTLY, 0).to_string()),
            ..Marker::default()
        }),
        hovertemplate: Some(hover(&["%{x}", "Nombre d'accidents : %{y}"])),
        ..Trace::default()
    };

    let layout = selectable(Layout {
        title: Some(Title::plain(with_complement(title, title_complement))),
        xaxis: Some(Axis::titled(x_title)),
        yaxis: Some(Axis::titled(COUNT_AXIS_TITLE)),
        legend: legend.map(|t| Legend {
            title: Some(Text::new(t)),
        }),
        ..Layout::default()
    });

    Ok(Figure {
        data: vec![trace],
        layout,
        frames: Vec::new(),
    })
}

const PIE_HOVER: &str =
    "Age de l'usager: %{label}<br>Nombre d'accidents: %{value}<br>Pourcentage: %{percent}";

/// Positions of the severity labels in the 2×2 donut grid.
const GRID_LABELS: [(f64, f64); 4] = [(0.2, 0.81), (0.79, 0.81), (0.195, 0.19), (0.79, 0.19)];

fn pie_title(text: &str) -> Title {
    Title {
        text: text.to_string(),
        x: Some(0.5),
        y: Some(0.98),
        font: Some(Font {
            size: Some(20.0),
            ..Font::default()
        }),
        ..Title::default()
    }
}

/// Age-band shares of accidents, either for one severity class or as a
/// 2×2 grid of donuts, one per class.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if the table has no age band
/// column.
pub fn severity_age_pie(
    view: &TableView<'_>,
    severity: SeverityChoice,
    year: YearFilter,
) -> Result<Figure, AnalyticsError> {
    let rows = in_year(view, year)?;
    let table = count_by_pair(&rows, Column::Severity, Column::AgeGroup)?;
    let ages: Vec<String> = view.table().domain(Column::AgeGroup).to_vec();

    let slice = |class: Severity| -> Vec<Datum> {
        let label = class.to_string();
        table
            .rows
            .iter()
            .filter(|r| r.first == label)
            .map(|r| Datum::from(r.count))
            .collect()
    };
    let colors = |class: Severity| -> Vec<String> {
        class.pie_palette().iter().map(|c| (*c).to_string()).collect()
    };

    let figure = match severity {
        SeverityChoice::All => {
            let data = Severity::all()
                .iter()
                .zip(0_u32..)
                .map(|(class, i)| Trace {
                    kind: TraceType::Pie,
                    name: Some(class.to_string()),
                    labels: Some(ages.clone()),
                    values: Some(slice(*class)),
                    marker: Some(Marker {
                        colors: Some(colors(*class)),
                        ..Marker::default()
                    }),
                    hole: Some(0.45),
                    sort: Some(false),
                    hoverinfo: Some("label+percent+name".to_string()),
                    hovertemplate: Some(PIE_HOVER.to_string()),
                    domain: Some(Domain {
                        row: i / 2,
                        column: i % 2,
                    }),
                    ..Trace::default()
                })
                .collect();

            let annotations = Severity::all()
                .iter()
                .zip(GRID_LABELS)
                .map(|(class, (x, y))| Annotation {
                    text: class.short_label().to_string(),
                    x,
                    y,
                    showarrow: false,
                    font: Some(Font {
                        size: Some(20.0),
                        ..Font::default()
                    }),
                })
                .collect();

            Figure {
                data,
                layout: selectable(Layout {
                    title: Some(pie_title(
                        "Proportion d'accidents cycliste par âge en fonction de la gravité des blessures",
                    )),
                    grid: Some(Grid {
                        rows: 2,
                        columns: 2,
                    }),
                    height: Some(800),
                    legend: Some(Legend {
                        title: Some(Text::new("Age de l'usager:")),
                    }),
                    annotations: Some(annotations),
                    ..Layout::default()
                }),
                frames: Vec::new(),
            }
        }
        SeverityChoice::Only(class) => {
            let mut pull = vec![0.0; ages.len()];
            if let Some(last) = pull.last_mut() {
                *last = 0.2;
            }
            Figure {
                data: vec![Trace {
                    kind: TraceType::Pie,
                    name: Some(class.to_string()),
                    labels: Some(ages),
                    values: Some(slice(class)),
                    marker: Some(Marker {
                        colors: Some(colors(class)),
                        ..Marker::default()
                    }),
                    pull: Some(pull),
                    sort: Some(false),
                    hovertemplate: Some(PIE_HOVER.to_string()),
                    ..Trace::default()
                }],
                layout: selectable(Layout {
                    title: Some(pie_title(
                        "Proportion d'accidents cycliste en fonction de l'âge de l'usager",
                    )),
                    height: Some(600),
                    legend: Some(Legend {
                        title: Some(Text::new("Age de l'usager:")),
                    }),
                    ..Layout::default()
                }),
                frames: Vec::new(),
            }
        }
    };

    Ok(figure)
}

#[cfg(test)]
mod tests {
    use dashbike_accident_models::Month;

    use super::*;
    use crate::fixtures::{Row, table};

    fn sample() -> dashbike_dataset::AccidentTable {
        table(&[
            Row::new(2019, Month::Mai, Severity::Killed).age(70),
            Row::new(2019, Month::Juin, Severity::Killed).age(12),
            Row::new(2020, Month::Mai, Severity::LightlyInjured),
            Row::new(2020, Month::Mai, Severity::LightlyInjured),
            Row::new(2020, Month::Juin, Severity::Uninjured).age(41),
        ])
    }

    #[test]
    fn density_all_years_is_yearly() {
        let table = sample();
        let figure = density(&table.view(), VariableChoice::All, YearFilter::All, None).unwrap();
        assert_eq!(figure.title(), Some("Nombres d'accidents par an"));
        assert_eq!(
            figure.data[0].y,
            Some(vec![Datum::Number(2.0), Datum::Number(3.0)])
        );
    }

    #[test]
    fn density_single_year_is_monthly_with_breakdown() {
        let table = sample();
        let figure = density(
            &table.view(),
            VariableChoice::Column(Column::Severity),
            YearFilter::Year(2020),
            Some("35-64 ans"),
        )
        .unwrap();
        assert_eq!(
            figure.title(),
            Some("Nombres d'accidents par mois pour les 35-64 ans")
        );
        assert_eq!(figure.data.len(), 4);
        assert_eq!(figure.data[0].x.as_ref().map(Vec::len), Some(12));
        let light = &figure.data[1];
        assert_eq!(light.name.as_deref(), Some("Blessé léger"));
        assert_eq!(light.y.as_ref().unwrap()[4], Datum::Number(2.0));
    }

    #[test]
    fn bar_sorts_descending() {
        let table = sample();
        let figure = bar(
            &table.view(),
            VariableChoice::Column(Column::Severity),
            YearFilter::All,
            None,
        )
        .unwrap();
        let y = figure.data[0].y.as_ref().unwrap();
        assert_eq!(y[0], Datum::Number(2.0));
        assert_eq!(y[y.len() - 1], Datum::Number(0.0));
        assert_eq!(figure.title(), Some("Nombres d'accidents sur la période 2019-2020"));
    }

    #[test]
    fn bar_total_for_one_year() {
        let table = sample();
        let figure = bar(&table.view(), VariableChoice::All, YearFilter::Year(2019), None).unwrap();
        assert_eq!(figure.data[0].y, Some(vec![Datum::Number(2.0)]));
        assert_eq!(figure.title(), Some("Nombres d'accidents pour l'année 2019"));
    }

    #[test]
    fn pie_grid_has_one_donut_per_class() {
        let table = sample();
        let figure = severity_age_pie(&table.view(), SeverityChoice::All, YearFilter::All).unwrap();
        assert_eq!(figure.data.len(), 4);
        assert_eq!(figure.data[3].domain, Some(Domain { row: 1, column: 1 }));
        assert_eq!(
            figure.data[3].values,
            Some(vec![
                Datum::Number(1.0),
                Datum::Number(0.0),
                Datum::Number(0.0),
                Datum::Number(1.0)
            ])
        );
        assert_eq!(figure.data[0].hole, Some(0.45));
    }

    #[test]
    fn single_class_pie_pulls_last_band() {
        let table = sample();
        let figure = severity_age_pie(
            &table.view(),
            SeverityChoice::Only(Severity::Killed),
            YearFilter::Year(2020),
        )
        .unwrap();
        assert_eq!(figure.data.len(), 1);
        assert_eq!(figure.data[0].pull, Some(vec![0.0, 0.0, 0.0, 0.2]));
        assert!(
            figure.data[0]
                .values
                .as_ref()
                .unwrap()
                .iter()
                .all(|v| *v == Datum::Number(0.0))
        );
    }
}
