//! UI state machines: selection reset, sidebar, submenus and the zone
//! picker.

use std::collections::BTreeMap;

use dashbike_accident_models::{AgeGroup, Column};
use dashbike_analytics_models::{Restriction, Selection};
use dashbike_dataset::DataContext;
use dashbike_geography_models::{Zone, ZoneLevel};
use serde::{Deserialize, Serialize};

use crate::DashboardError;

/// Inline CSS properties of a layout node.
pub type Style = BTreeMap<String, String>;

pub(crate) fn style(properties: &[(&str, &str)]) -> Style {
    properties
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Label/value pair of a dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label is its value.
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Dropdown options for every value of a column, in domain order.
#[must_use]
pub fn column_options(ctx: &DataContext, column: Column) -> Vec<DropdownOption> {
    ctx.table
        .domain(column)
        .iter()
        .map(DropdownOption::plain)
        .collect()
}

/// One clicked point of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClickPoint {
    #[serde(default)]
    pub label: Option<String>,
}

/// Click payload of a chart, as sent by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClickData {
    #[serde(default)]
    pub points: Vec<ClickPoint>,
}

impl ClickData {
    /// Click on a single labelled point.
    #[must_use]
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            points: vec![ClickPoint {
                label: Some(label.into()),
            }],
        }
    }

    /// Label of the first clicked point.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.points.first().and_then(|p| p.label.as_deref())
    }

    /// Age band of a click on the age pie.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::UnknownSelectionLabel`] if the click has
    /// no label or the label is not an age band.
    pub fn age_group(&self) -> Result<AgeGroup, DashboardError> {
        let label = self.label().unwrap_or_default();
        label
            .parse::<AgeGroup>()
            .map_err(|_| DashboardError::UnknownSelectionLabel {
                label: label.to_string(),
            })
    }
}

/// Output of the reset-button transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetState {
    /// Whether the reset button is disabled.
    pub disabled: bool,
    /// Selection kept on the pie chart.
    pub click_data: Option<ClickData>,
    /// Press counter written back to the button.
    pub n_clicks: u32,
}

/// Reset button transition.
///
/// A press clears the pie selection and the counter. Without a press the
/// selection is kept, and the button is enabled only while a selection
/// exists.
#[must_use]
pub fn reset(click: Option<ClickData>, n_clicks: Option<u32>) -> ResetState {
    if n_clicks.is_some_and(|n| n > 0) {
        log::debug!("Clearing pie selection");
        return ResetState {
            disabled: true,
            click_data: None,
            n_clicks: 0,
        };
    }
    ResetState {
        disabled: click.is_none(),
        click_data: click,
        n_clicks: 0,
    }
}

/// Visibility of the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SidebarState {
    #[default]
    #[serde(rename = "SHOW")]
    Shown,
    #[serde(rename = "HIDDEN")]
    Hidden,
}

impl SidebarState {
    /// Inline style of the sidebar in this state.
    #[must_use]
    pub fn sidebar_style(self) -> Style {
        let mut properties = vec![
            ("position", "fixed"),
            ("top", "62.5px"),
            ("bottom", "0"),
            ("width", "16rem"),
            ("padding", "2rem 1rem"),
            ("transition", "all 0.5s"),
            ("background-color", "#f8f9fa"),
        ];
        match self {
            Self::Shown => properties.push(("left", "0")),
            Self::Hidden => properties.extend([
                ("left", "-16rem"),
                ("height", "100%"),
                ("z-index", "1"),
                ("overflow-x", "hidden"),
            ]),
        }
        style(&properties)
    }

    /// Inline style of the page content next to the sidebar.
    #[must_use]
    pub fn content_style(self) -> Style {
        let mut properties = vec![
            ("transition", "margin-left .5s"),
            ("margin-right", "2rem"),
            ("padding", "2rem 1rem"),
        ];
        match self {
            Self::Shown => properties.push(("margin-left", "18rem")),
            Self::Hidden => properties.extend([
                ("margin-left", "2rem"),
                ("background-color", "#f8f9fa"),
            ]),
        }
        style(&properties)
    }
}

/// Output of the sidebar toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarUpdate {
    pub sidebar_style: Style,
    pub content_style: Style,
    pub state: SidebarState,
}

/// Menu button transition. A press flips a shown sidebar to hidden and
/// anything else to shown; no press always shows it.
#[must_use]
pub fn toggle_sidebar(n_clicks: Option<u32>, current: Option<SidebarState>) -> SidebarUpdate {
    let state = match (n_clicks, current) {
        (Some(n), Some(SidebarState::Shown)) if n > 0 => SidebarState::Hidden,
        _ => SidebarState::Shown,
    };
    SidebarUpdate {
        sidebar_style: state.sidebar_style(),
        content_style: state.content_style(),
        state,
    }
}

/// Output of a submenu click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmenuUpdate {
    pub is_open: bool,
    pub class_name: String,
}

/// Submenu collapse transition: a click toggles `is_open`.
#[must_use]
pub fn toggle_submenu(n_clicks: Option<u32>, is_open: bool) -> SubmenuUpdate {
    let is_open = if n_clicks.is_some_and(|n| n > 0) {
        !is_open
    } else {
        is_open
    };
    SubmenuUpdate {
        is_open,
        class_name: navitem_class(is_open).to_string(),
    }
}

/// Class of a nav item whose submenu is expanded or collapsed.
#[must_use]
pub const fn navitem_class(is_open: bool) -> &'static str {
    if is_open { "open" } else { "" }
}

/// Output of the zone picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSelection {
    pub style: Style,
    pub options: Vec<DropdownOption>,
    pub placeholder: String,
}

/// Zone dropdown for a zone level. Options are `"<code> <name>"` for
/// every region or department present in the data.
#[must_use]
pub fn zone_selection(ctx: &DataContext, level: ZoneLevel) -> ZoneSelection {
    let (options, placeholder): (Vec<DropdownOption>, &str) = match level {
        ZoneLevel::National => {
            return ZoneSelection {
                style: style(&[("display", "none")]),
                options: Vec::new(),
                placeholder: String::new(),
            };
        }
        ZoneLevel::Region => (
            ctx.regions
                .iter()
                .map(|r| DropdownOption::new(format!("{} {}", r.code, r.name), &r.code))
                .collect(),
            "Sélectionnez une région",
        ),
        ZoneLevel::Department => (
            ctx.departments
                .iter()
                .map(|d| DropdownOption::new(format!("{} {}", d.code, d.name), &d.code))
                .collect(),
            "Sélectionnez un département",
        ),
    };
    ZoneSelection {
        style: style(&[("display", "block")]),
        options,
        placeholder: placeholder.to_string(),
    }
}

/// Zone chosen in the picker, if any.
#[must_use]
pub fn chosen_zone(level: ZoneLevel, code: Option<&str>) -> Option<Zone> {
    let code = code.filter(|c| !c.is_empty())?.to_string();
    match level {
        ZoneLevel::National => None,
        ZoneLevel::Region => Some(Zone::Region(code)),
        ZoneLevel::Department => Some(Zone::Department(code)),
    }
}

/// Adds the restriction of `zone` to `selection`.
#[must_use]
pub fn restrict_to_zone(selection: Selection, zone: Option<&Zone>) -> Selection {
    match zone {
        None => selection,
        Some(Zone::Region(code)) => {
            selection.with(Column::Region, Restriction::one_of([code.as_str()]))
        }
        Some(Zone::Department(code)) => {
            selection.with(Column::Department, Restriction::one_of([code.as_str()]))
        }
    }
}
