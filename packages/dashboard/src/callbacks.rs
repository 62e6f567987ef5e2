//! Output registry and update dispatch.
//!
//! [`CALLBACKS`] lists every output with the controls it reads. Clients
//! send an [`UpdateRequest`] naming the output and carrying the current
//! values of those controls, keyed by control id; [`update`] runs the
//! matching handler.

use dashbike_accident_models::Column;
use dashbike_analytics::{build_selection, select};
use dashbike_analytics_models::{
    AxisZoom, Restriction, Selection, SeverityChoice, VariableChoice, YearFilter,
};
use dashbike_chart::{
    accident_map, bar, choropleth, density, monthly_animation, regional_series,
    seasonal_decomposition, severity_age_pie, yearly_trend,
};
use dashbike_chart_models::{AnimationSpeed, Figure, MapColor};
use dashbike_dataset::{DataContext, TableView};
use dashbike_geography_models::{GeoLevel, Indicator, MapLevel, ZoneLevel};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::pages::{PageContent, all_years_position, page_content};
use crate::state::{
    ClickData, ResetState, SidebarState, SidebarUpdate, SubmenuUpdate, ZoneSelection, chosen_zone,
    reset, restrict_to_zone, toggle_sidebar, toggle_submenu, zone_selection,
};
use crate::{Dashboard, DashboardError};

/// Identifier of a reactive output.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum OutputId {
    #[serde(rename = "graph1")]
    #[strum(serialize = "graph1")]
    YearlyTrend,
    #[serde(rename = "graph2")]
    #[strum(serialize = "graph2")]
    MonthlyAnimation,
    #[serde(rename = "graph3")]
    #[strum(serialize = "graph3")]
    SeasonalDecomposition,
    #[serde(rename = "graph4")]
    #[strum(serialize = "graph4")]
    Density,
    #[serde(rename = "graph5")]
    #[strum(serialize = "graph5")]
    Bar,
    #[serde(rename = "graph6")]
    #[strum(serialize = "graph6")]
    AgePie,
    #[serde(rename = "map")]
    #[strum(serialize = "map")]
    AccidentMap,
    #[serde(rename = "map_region_dep")]
    #[strum(serialize = "map_region_dep")]
    AreaMap,
    #[serde(rename = "graph-seri-reg")]
    #[strum(serialize = "graph-seri-reg")]
    RegionalSeries,
    #[serde(rename = "reset-button")]
    #[strum(serialize = "reset-button")]
    ResetButton,
    #[serde(rename = "sidebar")]
    #[strum(serialize = "sidebar")]
    Sidebar,
    #[serde(rename = "submenu-1-collapse")]
    #[strum(serialize = "submenu-1-collapse")]
    FirstSubmenu,
    #[serde(rename = "submenu-2-collapse")]
    #[strum(serialize = "submenu-2-collapse")]
    SecondSubmenu,
    #[serde(rename = "zone-selection")]
    #[strum(serialize = "zone-selection")]
    ZoneSelection,
    #[serde(rename = "page-content")]
    #[strum(serialize = "page-content")]
    PageContent,
}

/// A control property read by an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Control {
    pub id: &'static str,
    pub property: &'static str,
}

const fn value(id: &'static str) -> Control {
    Control {
        id,
        property: "value",
    }
}

const fn n_clicks(id: &'static str) -> Control {
    Control {
        id,
        property: "n_clicks",
    }
}

const PIE_CLICK: Control = Control {
    id: "graph6",
    property: "clickData",
};

/// One registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Callback {
    pub output: OutputId,
    pub inputs: &'static [Control],
}

const BREAKDOWN_INPUTS: &[Control] = &[
    value("variable-dropdown"),
    value("annee-slider"),
    PIE_CLICK,
    value("modalite-dropdown"),
];

/// Every reactive output with the controls it reads.
pub static CALLBACKS: &[Callback] = &[
    Callback {
        output: OutputId::YearlyTrend,
        inputs: &[value("niv_geo_dropdown")],
    },
    Callback {
        output: OutputId::MonthlyAnimation,
        inputs: &[value("speed-dropdown")],
    },
    Callback {
        output: OutputId::SeasonalDecomposition,
        inputs: &[],
    },
    Callback {
        output: OutputId::Density,
        inputs: BREAKDOWN_INPUTS,
    },
    Callback {
        output: OutputId::Bar,
        inputs: BREAKDOWN_INPUTS,
    },
    Callback {
        output: OutputId::AgePie,
        inputs: &[value("modalite-dropdown"), value("annee-slider")],
    },
    Callback {
        output: OutputId::AccidentMap,
        inputs: &[
            value("dropdown_color"),
            value("dropdown_an"),
            value("dropdown_mois"),
            value("dropdown_jour"),
            value("dropdown_catr"),
            value("dropdown_obsm"),
            value("dropdown_atm"),
            value("zone-data-filter"),
            value("zone-selection"),
        ],
    },
    Callback {
        output: OutputId::AreaMap,
        inputs: &[value("dropdown_regdep"), value("dropdown_indic")],
    },
    Callback {
        output: OutputId::RegionalSeries,
        inputs: &[Control {
            id: "graph-seri-reg",
            property: "relayoutData",
        }],
    },
    Callback {
        output: OutputId::ResetButton,
        inputs: &[PIE_CLICK, n_clicks("reset-button")],
    },
    Callback {
        output: OutputId::Sidebar,
        inputs: &[
            n_clicks("btn_sidebar"),
            Control {
                id: "side_click",
                property: "data",
            },
        ],
    },
    Callback {
        output: OutputId::FirstSubmenu,
        inputs: &[
            n_clicks("submenu-1"),
            Control {
                id: "submenu-1-collapse",
                property: "is_open",
            },
        ],
    },
    Callback {
        output: OutputId::SecondSubmenu,
        inputs: &[
            n_clicks("submenu-2"),
            Control {
                id: "submenu-2-collapse",
                property: "is_open",
            },
        ],
    },
    Callback {
        output: OutputId::ZoneSelection,
        inputs: &[value("zone-data-filter")],
    },
    Callback {
        output: OutputId::PageContent,
        inputs: &[Control {
            id: "url",
            property: "pathname",
        }],
    },
];

#[derive(Debug, Clone, Deserialize)]
pub struct TrendInputs {
    #[serde(rename = "niv_geo_dropdown")]
    pub level: GeoLevel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationInputs {
    #[serde(rename = "speed-dropdown", default)]
    pub speed: AnimationSpeed,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoInputs {}

/// Inputs of the density and bar panels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BreakdownInputs {
    #[serde(rename = "variable-dropdown", default)]
    pub variable: VariableChoice,
    #[serde(rename = "annee-slider", default)]
    pub year: YearFilter,
    /// Slice clicked on the age pie.
    #[serde(rename = "graph6")]
    pub click: Option<ClickData>,
    #[serde(rename = "modalite-dropdown", default)]
    pub severity: SeverityChoice,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PieInputs {
    #[serde(rename = "modalite-dropdown", default)]
    pub severity: SeverityChoice,
    #[serde(rename = "annee-slider", default)]
    pub year: YearFilter,
}

/// Inputs of the accident map. A missing or cleared filter selects every
/// value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapInputs {
    #[serde(rename = "dropdown_color", default)]
    pub color: MapColor,
    #[serde(rename = "dropdown_an")]
    pub years: Option<Restriction>,
    #[serde(rename = "dropdown_mois")]
    pub months: Option<Restriction>,
    #[serde(rename = "dropdown_jour")]
    pub weekdays: Option<Restriction>,
    #[serde(rename = "dropdown_catr")]
    pub route_categories: Option<Restriction>,
    #[serde(rename = "dropdown_obsm")]
    pub obstacles: Option<Restriction>,
    #[serde(rename = "dropdown_atm")]
    pub weather: Option<Restriction>,
    #[serde(rename = "zone-data-filter", default)]
    pub zone_level: ZoneLevel,
    #[serde(rename = "zone-selection")]
    pub zone: Option<String>,
}

impl MapInputs {
    /// Selection built from the filter dropdowns and the zone picker.
    #[must_use]
    pub fn selection(&self) -> Selection {
        let controls = [
            (Column::Year, &self.years),
            (Column::Month, &self.months),
            (Column::Weekday, &self.weekdays),
            (Column::RouteCategory, &self.route_categories),
            (Column::Obstacle, &self.obstacles),
            (Column::Weather, &self.weather),
        ]
        .map(|(column, restriction)| (column, restriction.clone().unwrap_or_default()));

        let zone = chosen_zone(self.zone_level, self.zone.as_deref());
        restrict_to_zone(build_selection(controls), zone.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaMapInputs {
    #[serde(rename = "dropdown_regdep")]
    pub level: MapLevel,
    #[serde(rename = "dropdown_indic")]
    pub indicator: Indicator,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionalSeriesInputs {
    /// Last relayout event of the chart.
    #[serde(rename = "graph-seri-reg")]
    pub relayout: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetInputs {
    #[serde(rename = "graph6")]
    pub click: Option<ClickData>,
    #[serde(rename = "reset-button")]
    pub n_clicks: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SidebarInputs {
    #[serde(rename = "btn_sidebar")]
    pub n_clicks: Option<u32>,
    #[serde(rename = "side_click")]
    pub state: Option<SidebarState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmenuInputs {
    #[serde(alias = "submenu-1", alias = "submenu-2")]
    pub n_clicks: Option<u32>,
    #[serde(alias = "submenu-1-collapse", alias = "submenu-2-collapse", default)]
    pub is_open: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneInputs {
    #[serde(rename = "zone-data-filter", default)]
    pub level: ZoneLevel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageInputs {
    #[serde(rename = "url")]
    pub pathname: String,
}

/// Request to recompute one output.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "output", content = "inputs")]
pub enum UpdateRequest {
    #[serde(rename = "graph1")]
    YearlyTrend(TrendInputs),
    #[serde(rename = "graph2")]
    MonthlyAnimation(AnimationInputs),
    #[serde(rename = "graph3")]
    SeasonalDecomposition(NoInputs),
    #[serde(rename = "graph4")]
    Density(BreakdownInputs),
    #[serde(rename = "graph5")]
    Bar(BreakdownInputs),
    #[serde(rename = "graph6")]
    AgePie(PieInputs),
    #[serde(rename = "map")]
    AccidentMap(MapInputs),
    #[serde(rename = "map_region_dep")]
    AreaMap(AreaMapInputs),
    #[serde(rename = "graph-seri-reg")]
    RegionalSeries(RegionalSeriesInputs),
    #[serde(rename = "reset-button")]
    ResetButton(ResetInputs),
    #[serde(rename = "sidebar")]
    Sidebar(SidebarInputs),
    #[serde(rename = "submenu-1-collapse")]
    FirstSubmenu(SubmenuInputs),
    #[serde(rename = "submenu-2-collapse")]
    SecondSubmenu(SubmenuInputs),
    #[serde(rename = "zone-selection")]
    ZoneSelection(ZoneInputs),
    #[serde(rename = "page-content")]
    PageContent(PageInputs),
}

impl UpdateRequest {
    /// Output this request recomputes.
    #[must_use]
    pub const fn output(&self) -> OutputId {
        match self {
            Self::YearlyTrend(_) => OutputId::YearlyTrend,
            Self::MonthlyAnimation(_) => OutputId::MonthlyAnimation,
            Self::SeasonalDecomposition(_) => OutputId::SeasonalDecomposition,
            Self::Density(_) => OutputId::Density,
            Self::Bar(_) => OutputId::Bar,
            Self::AgePie(_) => OutputId::AgePie,
            Self::AccidentMap(_) => OutputId::AccidentMap,
            Self::AreaMap(_) => OutputId::AreaMap,
            Self::RegionalSeries(_) => OutputId::RegionalSeries,
            Self::ResetButton(_) => OutputId::ResetButton,
            Self::Sidebar(_) => OutputId::Sidebar,
            Self::FirstSubmenu(_) => OutputId::FirstSubmenu,
            Self::SecondSubmenu(_) => OutputId::SecondSubmenu,
            Self::ZoneSelection(_) => OutputId::ZoneSelection,
            Self::PageContent(_) => OutputId::PageContent,
        }
    }
}

/// New value of an output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Update {
    Figure(Figure),
    Reset(ResetState),
    Sidebar(SidebarUpdate),
    Submenu(SubmenuUpdate),
    Zone(ZoneSelection),
    Page(PageContent),
}

/// Restricts the density and bar panels to the clicked age band. The
/// severity dropdown, when set, is applied before the age band. Returns
/// the restricted view and the title complement naming the band.
fn clicked_breakdown<'a>(
    view: &TableView<'a>,
    inputs: &BreakdownInputs,
) -> Result<(TableView<'a>, Option<String>), DashboardError> {
    let Some(click) = &inputs.click else {
        return Ok((view.clone(), None));
    };
    let age_group = click.age_group()?;

    let by_severity = match inputs.severity {
        SeverityChoice::All => view.clone(),
        SeverityChoice::Only(severity) => select(
            view,
            &Selection::new().with_values(Column::Severity, [severity.to_string()]),
        )?,
    };
    let by_age = select(
        &by_severity,
        &Selection::new().with_values(Column::AgeGroup, [age_group.to_string()]),
    )?;

    Ok((by_age, Some(age_group.to_string().to_lowercase())))
}

/// Rows of the accident map for the given filters.
///
/// # Errors
///
/// Returns [`DashboardError::Analytics`] if a filtered column is absent
/// from the table.
pub fn map_rows(ctx: &DataContext, inputs: &MapInputs) -> Result<Vec<usize>, DashboardError> {
    let rows = select(&ctx.table.view(), &inputs.selection())?;
    Ok(rows.indices().to_vec())
}

/// Accident map over an explicit set of rows.
///
/// # Errors
///
/// Returns [`DashboardError::Analytics`] if the color column is absent
/// from the table.
pub fn map_of_rows(
    ctx: &DataContext,
    rows: &[usize],
    color: MapColor,
) -> Result<Figure, DashboardError> {
    Ok(accident_map(&ctx.table.view_of(rows), color)?)
}

/// Recomputes one output.
///
/// # Errors
///
/// Returns [`DashboardError`] if the request names an unknown column or
/// category, or carries an invalid range.
pub fn update(dashboard: Dashboard<'_>, request: UpdateRequest) -> Result<Update, DashboardError> {
    let Dashboard { ctx, boundaries } = dashboard;
    let view = ctx.table.view();
    let all_position = all_years_position(ctx);
    log::debug!("Updating {}", request.output());

    let figure = match request {
        UpdateRequest::YearlyTrend(inputs) => yearly_trend(&view, inputs.level)?,
        UpdateRequest::MonthlyAnimation(inputs) => monthly_animation(&view, inputs.speed)?,
        UpdateRequest::SeasonalDecomposition(NoInputs {}) => seasonal_decomposition(&view)?,
        UpdateRequest::Density(inputs) => {
            let (rows, complement) = clicked_breakdown(&view, &inputs)?;
            density(
                &rows,
                inputs.variable,
                inputs.year.with_all_position(all_position),
                complement.as_deref(),
            )?
        }
        UpdateRequest::Bar(inputs) => {
            let (rows, complement) = clicked_breakdown(&view, &inputs)?;
            bar(
                &rows,
                inputs.variable,
                inputs.year.with_all_position(all_position),
                complement.as_deref(),
            )?
        }
        UpdateRequest::AgePie(inputs) => severity_age_pie(
            &view,
            inputs.severity,
            inputs.year.with_all_position(all_position),
        )?,
        UpdateRequest::AccidentMap(inputs) => {
            let rows = select(&view, &inputs.selection())?;
            log::debug!("Map selection kept {} of {} rows", rows.len(), view.len());
            accident_map(&rows, inputs.color)?
        }
        UpdateRequest::AreaMap(inputs) => choropleth(
            ctx,
            inputs.level,
            inputs.indicator,
            boundaries.url_for(inputs.level),
        ),
        UpdateRequest::RegionalSeries(inputs) => {
            let zoom = inputs
                .relayout
                .as_ref()
                .map(AxisZoom::from_relayout)
                .unwrap_or_default();
            regional_series(&view, zoom)?
        }
        UpdateRequest::ResetButton(inputs) => {
            return Ok(Update::Reset(reset(inputs.click, inputs.n_clicks)));
        }
        UpdateRequest::Sidebar(inputs) => {
            return Ok(Update::Sidebar(toggle_sidebar(inputs.n_clicks, inputs.state)));
        }
        UpdateRequest::FirstSubmenu(inputs) | UpdateRequest::SecondSubmenu(inputs) => {
            return Ok(Update::Submenu(toggle_submenu(inputs.n_clicks, inputs.is_open)));
        }
        UpdateRequest::ZoneSelection(inputs) => {
            return Ok(Update::Zone(zone_selection(ctx, inputs.level)));
        }
        UpdateRequest::PageContent(inputs) => {
            return Ok(Update::Page(page_content(ctx, &inputs.pathname)));
        }
    };

    Ok(Update::Figure(figure))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use dashbike_accident_models::Severity;
    use dashbike_chart_models::Datum;
    use serde_json::json;
    use strum::IntoEnumIterator as _;

    use super::*;
    use crate::Boundaries;
    use crate::fixtures::{context, record, sample};

    fn run(request: serde_json::Value) -> Result<Update, DashboardError> {
        let ctx = sample();
        let boundaries = Boundaries::default();
        let request: UpdateRequest = serde_json::from_value(request).unwrap();
        update(Dashboard::new(&ctx, &boundaries), request)
    }

    fn figure(update: Update) -> Figure {
        match update {
            Update::Figure(figure) => figure,
            other => panic!("expected a figure, got {other:?}"),
        }
    }

    #[test]
    fn registry_lists_each_output_once() {
        let listed: Vec<OutputId> = CALLBACKS.iter().map(|c| c.output).collect();
        let unique: BTreeSet<String> = listed.iter().map(ToString::to_string).collect();
        assert_eq!(listed.len(), unique.len());
        for output in OutputId::iter() {
            assert!(listed.contains(&output), "{output} is not registered");
        }
    }

    #[test]
    fn registry_serializes_control_ids() {
        let json = serde_json::to_value(CALLBACKS).unwrap();
        assert_eq!(json[0]["output"], "graph1");
        assert_eq!(
            json[3]["inputs"][2],
            json!({"id": "graph6", "property": "clickData"})
        );
    }

    #[test]
    fn request_names_its_output() {
        let request: UpdateRequest = serde_json::from_value(json!({
            "output": "graph3",
            "inputs": {}
        }))
        .unwrap();
        assert_eq!(request.output(), OutputId::SeasonalDecomposition);

        let unknown: Result<UpdateRequest, _> =
            serde_json::from_value(json!({"output": "graph9", "inputs": {}}));
        assert!(unknown.is_err());
    }

    #[test]
    fn bar_applies_severity_then_clicked_age_band() {
        let unfiltered = figure(
            run(json!({
                "output": "graph5",
                "inputs": {"variable-dropdown": "all", "annee-slider": 2019}
            }))
            .unwrap(),
        );
        assert_eq!(unfiltered.data[0].y, Some(vec![Datum::Number(12.0)]));

        let clicked = figure(
            run(json!({
                "output": "graph5",
                "inputs": {
                    "variable-dropdown": "all",
                    "annee-slider": 2019,
                    "graph6": {"points": [{"label": "18-34 ans"}]},
                    "modalite-dropdown": "Tué"
                }
            }))
            .unwrap(),
        );
        assert_eq!(clicked.data[0].y, Some(vec![Datum::Number(2.0)]));
        assert!(clicked.title().unwrap().ends_with(" pour les 18-34 ans"));

        let any_severity = figure(
            run(json!({
                "output": "graph5",
                "inputs": {
                    "variable-dropdown": "all",
                    "annee-slider": "all",
                    "graph6": {"points": [{"label": "18-34 ans"}]},
                    "modalite-dropdown": "all"
                }
            }))
            .unwrap(),
        );
        assert_eq!(any_severity.data[0].y, Some(vec![Datum::Number(5.0)]));
    }

    #[test]
    fn slider_year_before_data_means_every_year() {
        let ctx = context(vec![
            record(2004, Severity::Killed, 30, "44"),
            record(2005, Severity::Killed, 30, "44"),
            record(2005, Severity::Uninjured, 30, "35"),
        ]);
        let boundaries = Boundaries::default();
        let bar_for = |year: i64| {
            let request: UpdateRequest = serde_json::from_value(json!({
                "output": "graph5",
                "inputs": {"variable-dropdown": "all", "annee-slider": year}
            }))
            .unwrap();
            figure(update(Dashboard::new(&ctx, &boundaries), request).unwrap())
        };

        let first_year = bar_for(2004);
        assert_eq!(first_year.data[0].y, Some(vec![Datum::Number(1.0)]));

        let every_year = bar_for(2003);
        assert_eq!(every_year.data[0].y, Some(vec![Datum::Number(3.0)]));
    }

    #[test]
    fn severity_without_click_leaves_breakdown_unfiltered() {
        let figure = figure(
            run(json!({
                "output": "graph5",
                "inputs": {
                    "variable-dropdown": "all",
                    "annee-slider": 2020,
                    "modalite-dropdown": "Tué"
                }
            }))
            .unwrap(),
        );
        assert_eq!(figure.data[0].y, Some(vec![Datum::Number(6.0)]));
    }

    #[test]
    fn unknown_click_label_fails_that_update() {
        let result = run(json!({
            "output": "graph4",
            "inputs": {"graph6": {"points": [{"label": "centenaires"}]}}
        }));
        let Err(error) = result else {
            panic!("expected an error");
        };
        assert!(error.is_invalid_input());
        assert_eq!(error.to_string(), "Unknown selection label 'centenaires'");
    }

    #[test]
    fn map_filters_and_zone_restrict_points() {
        let ctx = sample();
        let all = map_rows(&ctx, &MapInputs::default()).unwrap();
        assert_eq!(all.len(), 12);

        let inputs: MapInputs = serde_json::from_value(json!({
            "dropdown_color": "lum",
            "dropdown_an": [2021],
            "dropdown_mois": "all",
            "dropdown_jour": [],
            "zone-data-filter": "reg",
            "zone-selection": "53"
        }))
        .unwrap();
        let rows = map_rows(&ctx, &inputs).unwrap();
        assert_eq!(rows.len(), 4);

        let map = map_of_rows(&ctx, &rows, inputs.color).unwrap();
        let points: usize = map
            .data
            .iter()
            .filter_map(|t| t.lat.as_ref().map(Vec::len))
            .sum();
        assert_eq!(points, 4);
    }

    #[test]
    fn map_update_is_a_figure() {
        let figure = figure(
            run(json!({
                "output": "map",
                "inputs": {"dropdown_color": "grav", "dropdown_an": ["2020"]}
            }))
            .unwrap(),
        );
        assert_eq!(figure.data.len(), 4);
    }

    #[test]
    fn choropleth_uses_configured_boundaries() {
        let figure = figure(
            run(json!({
                "output": "map_region_dep",
                "inputs": {"dropdown_regdep": "dep", "dropdown_indic": "ratio"}
            }))
            .unwrap(),
        );
        assert_eq!(
            figure.data[0].geojson.as_deref(),
            Some(crate::DEPARTMENTS_GEOJSON_URL)
        );
    }

    #[test]
    fn inverted_zoom_is_rejected() {
        let result = run(json!({
            "output": "graph-seri-reg",
            "inputs": {"graph-seri-reg": {"xaxis.range[0]": 2021, "xaxis.range[1]": 2019}}
        }));
        assert!(matches!(result, Err(DashboardError::Analytics(_))));
    }

    #[test]
    fn ui_state_outputs() {
        let Update::Reset(state) = run(json!({
            "output": "reset-button",
            "inputs": {"graph6": {"points": [{"label": "0-17 ans"}]}, "reset-button": 1}
        }))
        .unwrap() else {
            panic!("expected reset state");
        };
        assert!(state.disabled);
        assert_eq!(state.click_data, None);

        let Update::Submenu(menu) = run(json!({
            "output": "submenu-2-collapse",
            "inputs": {"submenu-2": 1, "submenu-2-collapse": false}
        }))
        .unwrap() else {
            panic!("expected submenu state");
        };
        assert!(menu.is_open);

        let Update::Sidebar(sidebar) = run(json!({
            "output": "sidebar",
            "inputs": {"btn_sidebar": 3, "side_click": "SHOW"}
        }))
        .unwrap() else {
            panic!("expected sidebar state");
        };
        assert_eq!(sidebar.state, SidebarState::Hidden);

        let Update::Page(page) = run(json!({
            "output": "page-content",
            "inputs": {"url": "/page-map"}
        }))
        .unwrap() else {
            panic!("expected page content");
        };
        assert!(page.found);
    }

    #[test]
    fn update_serializes_with_kind() {
        let json = serde_json::to_value(
            run(json!({"output": "zone-selection", "inputs": {"zone-data-filter": "all"}}))
                .unwrap(),
        )
        .unwrap();
        assert_eq!(json["kind"], "zone");
        assert_eq!(json["value"]["style"]["display"], "none");
    }
}
