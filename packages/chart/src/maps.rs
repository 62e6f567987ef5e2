//! Point map of individual accidents and region/department choropleths.

use dashbike_analytics::AnalyticsError;
use dashbike_chart_models::{
    ColorAxis, ColorBar, Datum, Figure, LatLon, Layout, Legend, Mapbox, MapColor, Marker, Mode,
    Text, Trace, TraceType,
};
use dashbike_dataset::{DataContext, TableView};
use dashbike_geography_models::{Indicator, MapLevel};

use crate::palette::{map_color, thermal};
use crate::{hover, tight_margin};

const MAP_STYLE: &str = "carto-positron";

/// Center of metropolitan France for the point map.
const POINT_MAP_CENTER: LatLon = LatLon {
    lat: 46.6031,
    lon: 1.8883,
};

const CHOROPLETH_CENTER: LatLon = LatLon {
    lat: 46.7111,
    lon: 1.7191,
};

fn text(value: Option<&str>) -> Datum {
    value.map_or(Datum::Null, Datum::from)
}

/// One marker per accident with coordinates, colored by `color`.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownColumn`] if the color column is
/// absent from the table.
pub fn accident_map(view: &TableView<'_>, color: MapColor) -> Result<Figure, AnalyticsError> {
    let column = color.column();
    let table = view.table();
    if !table.has_column(column) {
        return Err(AnalyticsError::UnknownColumn {
            column: column.to_string(),
        });
    }

    let template = hover(&[
        "Date : %{customdata[0]}",
        "Heure : %{customdata[1]}",
        "Type de trajet : %{customdata[2]}",
        "Intersection: %{customdata[3]}",
        "Conditions d'éclairage: %{customdata[4]}",
        "Nom commune: %{customdata[5]}",
    ]);

    let mut without_position = 0_usize;
    let mut data = Vec::new();

    for (i, key) in table.domain(column).iter().enumerate() {
        let mut lat = Vec::new();
        let mut lon = Vec::new();
        let mut customdata = Vec::new();

        for record in view.iter() {
            if record.key(column).as_deref() != Some(key.as_str()) {
                continue;
            }
            let (Some(y), Some(x)) = (record.latitude, record.longitude) else {
                without_position += 1;
                continue;
            };
            lat.push(y);
            lon.push(x);
            customdata.push(vec![
                record
                    .date
                    .map_or(Datum::Null, |d| Datum::from(d.format("%Y-%m-%d").to_string())),
                record
                    .time
                    .map_or(Datum::Null, |t| Datum::from(t.format("%H:%M").to_string())),
                text(record.trip.as_deref()),
                text(record.intersection.as_deref()),
                text(record.lighting.as_deref()),
                text(record.commune.as_deref()),
            ]);
        }

        if lat.is_empty() {
            continue;
        }

        data.push(Trace {
            kind: TraceType::ScatterMapbox,
            name: Some(key.clone()),
            legendgroup: Some(key.clone()),
            mode: Some(Mode::Markers),
            lat: Some(lat),
            lon: Some(lon),
            marker: Some(Marker {
                color: Some(map_color(column, key, i).to_string()),
                ..Marker::default()
            }),
            customdata: Some(customdata),
            hovertemplate: Some(template.clone()),
            ..Trace::default()
        });
    }

    if without_position > 0 {
        log::debug!("{without_position} accidents without coordinates left off the map");
    }

    Ok(Figure {
        data,
        layout: Layout {
            mapbox: Some(Mapbox {
                style: MAP_STYLE.to_string(),
                center: POINT_MAP_CENTER,
                zoom: 4.8,
            }),
            legend: Some(Legend {
                title: Some(Text::new(color.legend_title())),
            }),
            margin: Some(tight_margin(0.0)),
            height: Some(700),
            width: Some(1000),
            ..Layout::default()
        },
        frames: Vec::new(),
    })
}

/// Accident counts or ratios per region or department, drawn over the
/// boundary collection at `geojson_url`.
#[must_use]
pub fn choropleth(
    ctx: &DataContext,
    level: MapLevel,
    indicator: Indicator,
    geojson_url: &str,
) -> Figure {
    let pick = |count: u64, ratio: Option<f64>| match indicator {
        Indicator::Count => Datum::from(count),
        Indicator::Ratio => Datum::from(ratio),
    };

    let (locations, z, customdata, template): (Vec<String>, Vec<Datum>, Vec<Vec<Datum>>, String) =
        match level {
            MapLevel::Region => (
                ctx.regions.iter().map(|r| r.code.clone()).collect(),
                ctx.regions
                    .iter()
                    .map(|r| pick(r.accidents, r.ratio))
                    .collect(),
                ctx.regions
                    .iter()
                    .map(|r| {
                        vec![
                            Datum::from(r.name.as_str()),
                            Datum::from(r.accidents),
                            Datum::from(r.population),
                            Datum::from(r.ratio),
                            Datum::from(r.code.as_str()),
                        ]
                    })
                    .collect(),
                hover(&[
                    "Région : %{customdata[0]}",
                    "Code :  %{customdata[4]}",
                    "Population : %{customdata[2]}",
                    "Nombre d'accidents :  %{customdata[1]}",
                    "Pour 1000 habitants : %{customdata[3]}",
                ]),
            ),
            MapLevel::Department => (
                ctx.departments.iter().map(|d| d.code.clone()).collect(),
                ctx.departments
                    .iter()
                    .map(|d| pick(d.accidents, d.ratio))
                    .collect(),
                ctx.departments
                    .iter()
                    .map(|d| {
                        vec![
                            Datum::from(d.name.as_str()),
                            Datum::from(d.code.as_str()),
                            Datum::from(d.accidents),
                            Datum::from(d.population),
                            Datum::from(d.ratio),
                        ]
                    })
                    .collect(),
                hover(&[
                    "Département : %{customdata[0]}",
                    "Code :  %{customdata[1]}",
                    "Population : %{customdata[3]}",
                    "Nombre d'accidents :  %{customdata[2]}",
                    "Pour 1000 habitants : %{customdata[4]}",
                ]),
            ),
        };

    let colorbar_title = match indicator {
        Indicator::Count => "Nombre d'accidents",
        Indicator::Ratio => "Nombre d'accidents pour 1000 habitants",
    };

    Figure {
        data: vec![Trace {
            kind: TraceType::ChoroplethMapbox,
            geojson: Some(geojson_url.to_string()),
            featureidkey: Some("properties.code".to_string()),
            locations: Some(locations),
            z: Some(z),
            coloraxis: Some("coloraxis".to_string()),
            marker: Some(Marker {
                opacity: Some(0.5),
                ..Marker::default()
            }),
            customdata: Some(customdata),
            hovertemplate: Some(template),
            ..Trace::default()
        }],
        layout: Layout {
            mapbox: Some(Mapbox {
                style: MAP_STYLE.to_string(),
                center: CHOROPLETH_CENTER,
                zoom: 4.6,
            }),
            coloraxis: Some(ColorAxis {
                colorscale: thermal(),
                colorbar: Some(ColorBar {
                    title: Text::new(colorbar_title),
                }),
            }),
            margin: Some(tight_margin(0.0)),
            height: Some(700),
            width: Some(1000),
            ..Layout::default()
        },
        frames: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use dashbike_accident_models::{Month, Severity};
    use dashbike_geography_models::DepartmentPopulation;

    use super::*;
    use crate::fixtures::{Row, table};

    #[test]
    fn map_has_a_trace_per_present_severity() {
        let table = table(&[
            Row::new(2020, Month::Mai, Severity::Killed),
            Row::new(2020, Month::Mai, Severity::Killed),
            Row::new(2020, Month::Mai, Severity::Uninjured),
        ]);
        let figure = accident_map(&table.view(), MapColor::Severity).unwrap();
        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[0].name.as_deref(), Some("Indemne"));
        let killed = &figure.data[1];
        assert_eq!(killed.lat.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            killed.marker.as_ref().and_then(|m| m.color.as_deref()),
            Some("red")
        );
        assert_eq!(
            figure.layout.legend.unwrap().title.unwrap().text,
            "Gravité de l'accident"
        );
    }

    #[test]
    fn empty_selection_gives_valid_empty_map() {
        let table = table(&[Row::new(2020, Month::Mai, Severity::Killed)]);
        let figure = accident_map(&table.view_of(&[]), MapColor::Lighting).unwrap();
        assert!(figure.data.is_empty());
        assert!(figure.layout.mapbox.is_some());
    }

    #[test]
    fn choropleth_switches_indicator() {
        let records = table(&[
            Row::new(2020, Month::Mai, Severity::Killed),
            Row::new(2020, Month::Mai, Severity::Killed).region("Île-de-France"),
        ])
        .records()
        .to_vec();
        let ctx = DataContext::from_parts(
            records,
            BTreeSet::new(),
            vec![DepartmentPopulation {
                code: "35".to_string(),
                name: "Ille-et-Vilaine".to_string(),
                population: 1000,
            }],
            std::collections::BTreeMap::new(),
        );

        let counts = choropleth(&ctx, MapLevel::Department, Indicator::Count, "deps.geojson");
        assert_eq!(
            counts.data[0].z,
            Some(vec![Datum::Number(1.0), Datum::Number(1.0)])
        );

        let ratios = choropleth(&ctx, MapLevel::Department, Indicator::Ratio, "deps.geojson");
        assert_eq!(ratios.data[0].z, Some(vec![Datum::Number(1.0), Datum::Null]));
        assert_eq!(
            ratios.data[0].locations,
            Some(vec!["35".to_string(), "75".to_string()])
        );

        let regions = choropleth(&ctx, MapLevel::Region, Indicator::Count, "regions.geojson");
        assert_eq!(
            regions.data[0].locations,
            Some(vec!["11".to_string(), "53".to_string()])
        );
        assert_eq!(regions.data[0].geojson.as_deref(), Some("regions.geojson"));
    }
}
