//! Time-series panels: yearly trend, monthly animation, seasonal
//! decomposition and the zoomable regional series.

use dashbike_accident_models::Column;
use dashbike_analytics::range::COUNT_COLUMN;
use dashbike_analytics::seasonal::MONTHS_PER_YEAR;
use dashbike_analytics::{
    AnalyticsError, RangeFilter, count_by, count_by_pair, monthly_series, seasonal_decompose,
};
use dashbike_analytics_models::{AxisZoom, PairCountTable};
use dashbike_chart_models::{
    AnimationSpeed, Axis, CurrentValue, Datum, Figure, Frame, Layout, Legend, Line, MenuButton,
    Mode, RangeSlider, Slider, SliderStep, Text, Trace, UpdateMenu, Visibility,
};
use dashbike_dataset::TableView;
use dashbike_geography_models::GeoLevel;
use serde_json::json;

use crate::palette::{DASHES, PLOTLY, cycle};
use crate::{COUNT_AXIS_TITLE, bold_title, hover, selectable, series_by_second, tight_margin};

/// One line per category of the table's second column, years on x.
fn line_per_category(table: &PairCountTable, category_label: &str) -> Vec<Trace> {
    let template = hover(&[
        "Année : %{customdata[0]}",
        &format!("{category_label} : %{{customdata[1]}}"),
        "Nombre d'accidents : %{customdata[2]}",
    ]);

    series_by_second(table)
        .into_iter()
        .enumerate()
        .map(|(i, (key, rows))| Trace {
            name: Some(key.to_string()),
            legendgroup: Some(key.to_string()),
            mode: Some(Mode::LinesMarkers),
            x: Some(rows.iter().map(|r| Datum::from(r.first.as_str())).collect()),
            y: Some(rows.iter().map(|r| Datum::from(r.count)).collect()),
            customdata: Some(
                rows.iter()
                    .map(|r| vec![r.first.as_str().into(), key.into(), r.count.into()])
                    .collect(),
            ),
            line: Some(Line {
                color: Some(cycle(PLOTLY, i).to_string()),
                dash: Some(cycle(DASHES, i).to_string()),
                width: None,
            }),
            hovertemplate: Some(template.clone()),
            ..Trace::default()
        })
        .collect()
}

/// Yearly accident counts, nationally or with one line per region or
/// department.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if the grouping column is
/// absent from the table.
pub fn yearly_trend(view: &TableView<'_>, level: GeoLevel) -> Result<Figure, AnalyticsError> {
    let mut layout = Layout {
        title: Some(bold_title(
            "Évolution des accidents cyclistes sur le territoire français",
            0.5,
        )),
        margin: Some(tight_margin(30.0)),
        xaxis: Some(Axis::titled(Column::Year.title())),
        yaxis: Some(Axis::titled(COUNT_AXIS_TITLE)),
        ..Layout::default()
    };

    let data = match level {
        GeoLevel::National => {
            let counts = count_by(view, Column::Year)?;
            vec![Trace {
                mode: Some(Mode::LinesMarkers),
                x: Some(counts.rows.iter().map(|r| Datum::from(r.key.as_str())).collect()),
                y: Some(counts.rows.iter().map(|r| Datum::from(r.count)).collect()),
                customdata: Some(
                    counts
                        .rows
                        .iter()
                        .map(|r| vec![r.key.as_str().into(), r.count.into()])
                        .collect(),
                ),
                hovertemplate: Some(hover(&[
                    "Année : %{customdata[0]}",
                    "Nombre d'accidents : %{customdata[1]}",
                ])),
                ..Trace::default()
            }]
        }
        GeoLevel::Region => {
            layout.legend = Some(Legend {
                title: Some(Text::new("Régions")),
            });
            line_per_category(
                &count_by_pair(view, Column::Year, Column::RegionName)?,
                "Région",
            )
        }
        GeoLevel::Department => {
            layout.legend = Some(Legend {
                title: Some(Text::new("Départements")),
            });
            line_per_category(
                &count_by_pair(view, Column::Year, Column::Department)?,
                "Département",
            )
        }
    };

    Ok(Figure {
        data,
        layout,
        frames: Vec::new(),
    })
}

/// Monthly counts animated year by year.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if the table lacks the year
/// or month column.
pub fn monthly_animation(
    view: &TableView<'_>,
    speed: AnimationSpeed,
) -> Result<Figure, AnalyticsError> {
    let table = count_by_pair(view, Column::Year, Column::Month)?;
    let template = hover(&[
        "Année : %{customdata[0]}",
        "Mois : %{customdata[1]}",
        "Nombre d'accidents : %{customdata[2]}",
    ]);

    let years = table.first_keys();
    let frames: Vec<Frame> = years
        .iter()
        .map(|year| {
            let rows: Vec<_> = table.rows.iter().filter(|r| r.first == *year).collect();
            Frame {
                name: (*year).to_string(),
                data: vec![Trace {
                    name: Some((*year).to_string()),
                    mode: Some(Mode::LinesMarkers),
                    x: Some(rows.iter().map(|r| Datum::from(r.second.as_str())).collect()),
                    y: Some(rows.iter().map(|r| Datum::from(r.count)).collect()),
                    customdata: Some(
                        rows.iter()
                            .map(|r| {
                                vec![r.first.as_str().into(), r.second.as_str().into(), r.count.into()]
                            })
                            .collect(),
                    ),
                    hovertemplate: Some(template.clone()),
                    ..Trace::default()
                }],
            }
        })
        .collect();

    let peak = table.rows.iter().map(|r| r.count).max().unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let y_range = (peak > 0).then(|| [0.0, peak as f64 * 1.1]);

    let duration = speed.frame_duration_ms();
    let play = MenuButton {
        label: "&#9654;".to_string(),
        method: "animate".to_string(),
        args: json!([null, {
            "frame": {"duration": duration, "redraw": false},
            "mode": "immediate",
            "fromcurrent": true,
            "transition": {"duration": 500, "easing": "linear"}
        }]),
    };
    let pause = MenuButton {
        label: "&#9724;".to_string(),
        method: "animate".to_string(),
        args: json!([[null], {
            "frame": {"duration": 0, "redraw": false},
            "mode": "immediate",
            "fromcurrent": true,
            "transition": {"duration": 0, "easing": "linear"}
        }]),
    };

    let steps = years
        .iter()
        .map(|year| SliderStep {
            label: (*year).to_string(),
            method: "animate".to_string(),
            args: json!([[year], {
                "frame": {"duration": 0, "redraw": false},
                "mode": "immediate",
                "fromcurrent": true,
                "transition": {"duration": 0, "easing": "linear"}
            }]),
        })
        .collect();

    let layout = Layout {
        title: Some(bold_title("Accidents cycliste sur une année", 0.5)),
        margin: Some(tight_margin(30.0)),
        xaxis: Some(Axis {
            categoryorder: Some("array".to_string()),
            categoryarray: Some(view.table().domain(Column::Month).to_vec()),
            ..Axis::titled(Column::Month.title())
        }),
        yaxis: Some(Axis {
            range: y_range,
            ..Axis::titled(COUNT_AXIS_TITLE)
        }),
        updatemenus: Some(vec![UpdateMenu {
            kind: "buttons".to_string(),
            showactive: false,
            buttons: vec![play, pause],
            x: Some(0.1),
            y: Some(0.0),
            xanchor: Some("right".to_string()),
            yanchor: Some("top".to_string()),
            direction: Some("left".to_string()),
        }]),
        sliders: Some(vec![Slider {
            active: 0,
            steps,
            currentvalue: Some(CurrentValue {
                prefix: format!("{}=", Column::Year),
            }),
        }]),
        ..Layout::default()
    };

    Ok(Figure {
        data: frames.first().map(|f| f.data.clone()).unwrap_or_default(),
        layout,
        frames,
    })
}

/// Observed monthly counts with their trend, seasonal and residual
/// components over a 12-month cycle.
///
/// A series shorter than two years yields a figure without traces.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if the table lacks the year
/// or month column.
pub fn seasonal_decomposition(view: &TableView<'_>) -> Result<Figure, AnalyticsError> {
    let layout = Layout {
        title: Some(bold_title("Évolution temporelle avec lissage sur 12 mois", 0.5)),
        margin: Some(tight_margin(30.0)),
        xaxis: Some(Axis {
            rangeslider: Some(RangeSlider { visible: true }),
            ..Axis::default()
        }),
        ..Layout::default()
    };

    let (labels, observed) = monthly_series(view)?;
    let decomposition = match seasonal_decompose(labels, observed, MONTHS_PER_YEAR) {
        Ok(decomposition) => decomposition,
        Err(AnalyticsError::InsufficientData { required, actual }) => {
            log::debug!("Seasonal decomposition skipped: {actual} months, {required} needed");
            return Ok(Figure::empty(layout));
        }
        Err(e) => return Err(e),
    };

    let x: Vec<Datum> = decomposition
        .labels
        .iter()
        .map(|l| Datum::from(l.as_str()))
        .collect();
    let customdata: Vec<Vec<Datum>> = decomposition
        .labels
        .iter()
        .zip(&decomposition.observed)
        .map(|(label, count)| {
            let (year, month) = label.split_once('-').unwrap_or((label.as_str(), ""));
            vec![year.into(), month.into(), (*count).into()]
        })
        .collect();
    let template = hover(&[
        "Année : %{customdata[0]}",
        "Mois : %{customdata[1]}",
        "Nombre d'accidents : %{customdata[2]}",
    ]);

    let component = |name: &str, y: Vec<Datum>, visible: Option<Visibility>| Trace {
        name: Some(name.to_string()),
        mode: Some(Mode::Lines),
        x: Some(x.clone()),
        y: Some(y),
        visible,
        customdata: Some(customdata.clone()),
        hovertemplate: Some(template.clone()),
        ..Trace::default()
    };

    let data = vec![
        component(
            "Composante observée",
            decomposition.observed.iter().map(|v| (*v).into()).collect(),
            None,
        ),
        component(
            "Saisonnalité",
            decomposition.seasonal.iter().map(|v| (*v).into()).collect(),
            Some(Visibility::LegendOnly),
        ),
        component(
            "Tendance",
            decomposition.trend.iter().map(|v| (*v).into()).collect(),
            None,
        ),
        component(
            "Résidus",
            decomposition.residual.iter().map(|v| (*v).into()).collect(),
            Some(Visibility::LegendOnly),
        ),
    ];

    Ok(Figure {
        data,
        layout,
        frames: Vec::new(),
    })
}

/// Yearly counts per region, narrowed to the zoom window of another
/// chart.
///
/// # Errors
///
/// Returns an [`AnalyticsError`] if the zoom range is inverted or the
/// table lacks the year or region column.
pub fn regional_series(view: &TableView<'_>, zoom: AxisZoom) -> Result<Figure, AnalyticsError> {
    let table = count_by_pair(view, Column::Year, Column::RegionName)?;
    let filtered =
        RangeFilter::from_zoom(Column::Year.as_ref(), COUNT_COLUMN, zoom).apply_to_pairs(&table)?;

    let layout = selectable(Layout {
        title: Some(bold_title("Évolution du nombre d'accidents de vélos", 0.4)),
        margin: Some(tight_margin(30.0)),
        width: Some(800),
        height: Some(500),
        xaxis: Some(Axis::titled(Column::Year.title())),
        yaxis: Some(Axis::titled(COUNT_AXIS_TITLE)),
        ..Layout::default()
    });

    Ok(Figure {
        data: line_per_category(&filtered, "Région"),
        layout,
        frames: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use dashbike_accident_models::{Month, Severity};
    use dashbike_analytics_models::AxisRange;

    use super::*;
    use crate::fixtures::{Row, table};

    fn sample() -> dashbike_dataset::AccidentTable {
        table(&[
            Row::new(2019, Month::Mai, Severity::Killed),
            Row::new(2019, Month::Juin, Severity::Killed).region("Île-de-France"),
            Row::new(2020, Month::Mai, Severity::LightlyInjured),
            Row::new(2021, Month::Mars, Severity::Uninjured),
        ])
    }

    #[test]
    fn national_trend_is_a_single_line() {
        let table = sample();
        let figure = yearly_trend(&table.view(), GeoLevel::National).unwrap();
        assert_eq!(figure.data.len(), 1);
        assert_eq!(
            figure.data[0].y,
            Some(vec![Datum::Number(2.0), Datum::Number(1.0), Datum::Number(1.0)])
        );
    }

    #[test]
    fn regional_trend_has_a_line_per_region() {
        let table = sample();
        let figure = yearly_trend(&table.view(), GeoLevel::Region).unwrap();
        let names: Vec<_> = figure.data.iter().filter_map(|t| t.name.as_deref()).collect();
        assert_eq!(names, vec!["Bretagne", "Île-de-France"]);
        assert_ne!(figure.data[0].line, figure.data[1].line);
    }

    #[test]
    fn animation_frame_duration_follows_speed() {
        let table = sample();
        let figure = monthly_animation(&table.view(), AnimationSpeed::X8).unwrap();
        assert_eq!(figure.frames.len(), 3);
        assert_eq!(figure.frames[0].data[0].x.as_ref().map(Vec::len), Some(12));

        let menus = figure.layout.updatemenus.unwrap();
        assert_eq!(menus[0].buttons[0].args[1]["frame"]["duration"], 187.5);
    }

    #[test]
    fn short_history_gives_empty_decomposition() {
        let table = table(&[
            Row::new(2021, Month::Janvier, Severity::Killed),
            Row::new(2021, Month::Decembre, Severity::Uninjured),
        ]);
        let figure = seasonal_decomposition(&table.view()).unwrap();
        assert!(figure.data.is_empty());
        assert!(figure.title().is_some());
    }

    #[test]
    fn long_history_gives_four_components() {
        let rows = [
            Row::new(2018, Month::Mars, Severity::Killed),
            Row::new(2019, Month::Juin, Severity::Killed),
        ];
        let table = table(&rows);
        let figure = seasonal_decomposition(&table.view()).unwrap();
        assert_eq!(figure.data.len(), 4);
        assert_eq!(figure.data[0].x.as_ref().map(Vec::len), Some(24));
        assert_eq!(figure.data[1].visible, Some(Visibility::LegendOnly));
        assert_eq!(figure.data[2].y.as_ref().unwrap()[0], Datum::Null);
    }

    #[test]
    fn regional_series_honours_zoom() {
        let table = sample();
        let zoom = AxisZoom {
            x: Some(AxisRange::new(2019.5, 2021.5)),
            y: None,
        };
        let figure = regional_series(&table.view(), zoom).unwrap();
        for trace in &figure.data {
            let years = trace.x.as_ref().unwrap();
            assert!(!years.contains(&Datum::from("2019")));
        }

        let inverted = AxisZoom {
            x: Some(AxisRange::new(2021.0, 2019.0)),
            y: None,
        };
        assert!(regional_series(&table.view(), inverted).is_err());
    }
}
