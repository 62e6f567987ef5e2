//! Color sequences.
//!
//! Categories are colored by position in their domain, so the same
//! category keeps its color across panels and requests.

use dashbike_accident_models::{Column, Severity};

/// Qualitative palette used when a column has no dedicated colors.
pub const SET1: &[&str] = &[
    "#E41A1C", "#377EB8", "#4DAF4A", "#984EA3", "#FF7F00", "#FFFF33", "#A65628", "#F781BF",
    "#999999",
];

/// Default qualitative palette for line and map series.
pub const PLOTLY: &[&str] = &[
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

const SEVERITY_SERIES: &[&str] = &["#4cae4c", "#6495ed", "#ffa54f", "#ff6666"];

const SEX_SERIES: &[&str] = &["#6495ed", "#ff6666"];

/// Line dash patterns cycled across series of multi-line charts.
pub const DASHES: &[&str] = &["solid", "dot", "dash", "longdash", "dashdot", "longdashdot"];

/// Stacked-area/bar colors for a breakdown column.
#[must_use]
pub fn series_palette(column: Column) -> &'static [&'static str] {
    match column {
        Column::Severity => SEVERITY_SERIES,
        Column::Sex => SEX_SERIES,
        _ => SET1,
    }
}

/// Color of the `index`-th category, cycling through `palette`.
#[must_use]
pub fn cycle(palette: &[&'static str], index: usize) -> &'static str {
    if palette.is_empty() {
        return "#444444";
    }
    palette[index % palette.len()]
}

/// Map marker color for a category of `column`.
#[must_use]
pub fn map_color(column: Column, key: &str, index: usize) -> &'static str {
    if column == Column::Severity
        && let Ok(severity) = key.parse::<Severity>()
    {
        return severity.map_color();
    }
    cycle(PLOTLY, index)
}

/// Thermal color scale used by the choropleths, from dark blue to yellow.
#[must_use]
pub fn thermal() -> Vec<(f64, String)> {
    const STOPS: &[&str] = &[
        "rgb(3, 35, 51)",
        "rgb(13, 48, 100)",
        "rgb(53, 50, 155)",
        "rgb(93, 62, 153)",
        "rgb(126, 77, 143)",
        "rgb(158, 89, 135)",
        "rgb(193, 100, 121)",
        "rgb(225, 113, 97)",
        "rgb(246, 139, 69)",
        "rgb(251, 173, 60)",
        "rgb(246, 211, 70)",
        "rgb(231, 250, 90)",
    ];
    #[allow(clippy::cast_precision_loss)]
    let last = (STOPS.len() - 1) as f64;
    STOPS
        .iter()
        .enumerate()
        .map(|(i, color)| {
            #[allow(clippy::cast_precision_loss)]
            let position = i as f64 / last;
            (position, (*color).to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_points_use_fixed_colors() {
        assert_eq!(map_color(Column::Severity, "Tué", 7), "red");
        assert_eq!(map_color(Column::Lighting, "Plein jour", 1), "#EF553B");
        assert_eq!(cycle(SET1, SET1.len()), SET1[0]);
    }

    #[test]
    fn thermal_spans_unit_interval() {
        let scale = thermal();
        assert!(scale[0].0.abs() < f64::EPSILON);
        assert!((scale[scale.len() - 1].0 - 1.0).abs() < f64::EPSILON);
    }
}
