//! Page router and layout trees.
//!
//! A layout is a tree of [`LayoutNode`]s describing the controls and
//! chart slots of a page. Chart slots carry only their output id; the
//! browser fills them through the update endpoint.

use std::collections::BTreeMap;

use dashbike_accident_models::{Column, Severity};
use dashbike_analytics::headline;
use dashbike_analytics_models::ALL;
use dashbike_chart_models::{AnimationSpeed, MapColor};
use dashbike_dataset::DataContext;
use dashbike_geography_models::{GeoLevel, Indicator, MapLevel};
use serde::Serialize;
use strum::IntoEnumIterator as _;

use crate::callbacks::OutputId;
use crate::state::{DropdownOption, SidebarState, Style, column_options, style};

const CARD_STYLE: &[(&str, &str)] = &[
    ("border", "0px solid black"),
    ("padding", "10px 20px"),
    ("border-radius", "25px"),
    ("text-align", "left"),
    (
        "box-shadow",
        "0 0 0 transparent, 0 0 0 transparent, 6px 4px 25px #d6d6d6",
    ),
    ("background", "#ffffff"),
    ("margin-bottom", "20px"),
];

const NUMBER_CARD_STYLE: &[(&str, &str)] = &[
    ("display", "flex"),
    ("flex-direction", "row"),
    ("justify-content", "center"),
    ("align-items", "center"),
    ("border", "0px solid black"),
    ("padding", "10px 20px"),
    ("border-radius", "25px"),
    ("text-align", "center"),
    (
        "box-shadow",
        "0 0 0 transparent, 0 0 0 transparent, 6px 4px 25px #d6d6d6",
    ),
    ("background", "#ffffff"),
    ("margin-bottom", "20px"),
    ("height", "200px"),
];

const MAP_LABEL_STYLE: &[(&str, &str)] = &[
    ("color", "white"),
    ("font-weight", "bold"),
    ("margin", "0 0 1% 0"),
];

/// Columns offered by the breakdown dropdown of the user page.
const BREAKDOWN_COLUMNS: &[Column] = &[
    Column::Severity,
    Column::Situation,
    Column::Trip,
    Column::Sex,
    Column::Department,
    Column::RegionName,
];

/// A node of a page layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LayoutNode {
    Div {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        class_name: Option<String>,
        #[serde(skip_serializing_if = "Style::is_empty")]
        style: Style,
        children: Vec<LayoutNode>,
    },
    Heading {
        level: u8,
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        class_name: Option<String>,
    },
    Paragraph {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        class_name: Option<String>,
    },
    Bold {
        text: String,
    },
    Rule,
    Image {
        src: String,
    },
    Link {
        href: String,
        text: String,
    },
    Collapse {
        id: String,
        is_open: bool,
        children: Vec<LayoutNode>,
    },
    Graph {
        id: String,
    },
    Button {
        id: String,
        label: String,
        disabled: bool,
    },
    Dropdown(Dropdown),
    Slider(Slider),
}

/// Dropdown control.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dropdown {
    pub id: String,
    pub options: Vec<DropdownOption>,
    pub value: serde_json::Value,
    pub multi: bool,
    pub clearable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Dropdown {
    fn single(id: &str, options: Vec<DropdownOption>, value: &str) -> Self {
        Self {
            id: id.to_string(),
            options,
            value: serde_json::Value::from(value),
            multi: false,
            clearable: false,
            placeholder: None,
        }
    }

    fn multi(id: &str, options: Vec<DropdownOption>) -> Self {
        Self {
            id: id.to_string(),
            options,
            value: serde_json::Value::from(ALL),
            multi: true,
            clearable: true,
            placeholder: Some(ALL.to_string()),
        }
    }
}

/// Slider control with labelled stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slider {
    pub id: String,
    pub min: i64,
    pub max: i64,
    pub value: i64,
    pub marks: BTreeMap<i64, String>,
}

impl LayoutNode {
    fn div(children: Vec<Self>) -> Self {
        Self::Div {
            id: None,
            class_name: None,
            style: Style::new(),
            children,
        }
    }

    fn styled(properties: &[(&str, &str)], children: Vec<Self>) -> Self {
        Self::Div {
            id: None,
            class_name: None,
            style: style(properties),
            children,
        }
    }

    fn card(children: Vec<Self>) -> Self {
        Self::styled(CARD_STYLE, children)
    }

    fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
            class_name: None,
        }
    }

    fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            class_name: None,
        }
    }

    fn graph(output: OutputId) -> Self {
        Self::Graph {
            id: output.to_string(),
        }
    }

    fn link(href: &str, text: &str) -> Self {
        Self::Link {
            href: href.to_string(),
            text: text.to_string(),
        }
    }

    /// Element id, if the node has one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Div { id, .. } => id.as_deref(),
            Self::Collapse { id, .. } | Self::Graph { id } | Self::Button { id, .. } => Some(id),
            Self::Dropdown(d) => Some(&d.id),
            Self::Slider(s) => Some(&s.id),
            _ => None,
        }
    }

    /// Direct children of the node.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Div { children, .. } | Self::Collapse { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first search for the node with element id `id`.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Self> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// All text carried by the subtree, depth first.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        let own = match self {
            Self::Heading { text, .. }
            | Self::Paragraph { text, .. }
            | Self::Bold { text }
            | Self::Link { text, .. } => Some(text.as_str()),
            Self::Button { label, .. } => Some(label.as_str()),
            _ => None,
        };
        own.into_iter()
            .chain(self.children().iter().flat_map(Self::texts))
            .collect()
    }
}

/// Routable page of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumIter)]
pub enum Page {
    /// Headline figures and time series.
    Home,
    /// Accident and user characteristics.
    Users,
    /// Point map of accidents.
    AccidentMap,
    /// Region and department choropleth.
    AreaMap,
}

impl Page {
    /// Resolves a URL path.
    #[must_use]
    pub fn route(path: &str) -> Option<Self> {
        match path {
            "/" | "/page-1/1" => Some(Self::Home),
            "/page-1/2" => Some(Self::Users),
            "/page-map" => Some(Self::AccidentMap),
            "/page-2/2" => Some(Self::AreaMap),
            _ => None,
        }
    }

    /// Canonical path of the page.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/page-1/1",
            Self::Users => "/page-1/2",
            Self::AccidentMap => "/page-map",
            Self::AreaMap => "/page-2/2",
        }
    }

    /// Builds the layout of the page.
    #[must_use]
    pub fn layout(self, ctx: &DataContext) -> LayoutNode {
        match self {
            Self::Home => home(ctx),
            Self::Users => users(ctx),
            Self::AccidentMap => accident_map(ctx),
            Self::AreaMap => area_map(),
        }
    }
}

/// Routed page content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub path: String,
    pub found: bool,
    pub layout: LayoutNode,
}

/// Layout for `path`, or the not-found fragment naming it.
#[must_use]
pub fn page_content(ctx: &DataContext, path: &str) -> PageContent {
    let (found, layout) = match Page::route(path) {
        Some(page) => (true, page.layout(ctx)),
        None => {
            log::debug!("No page at {path}");
            (false, not_found(path))
        }
    };
    PageContent {
        path: path.to_string(),
        found,
        layout,
    }
}

/// Fragment shown for unknown paths.
#[must_use]
pub fn not_found(path: &str) -> LayoutNode {
    LayoutNode::Div {
        id: None,
        class_name: Some("p-3 bg-light rounded-3".to_string()),
        style: Style::new(),
        children: vec![
            LayoutNode::Heading {
                level: 1,
                text: "404: Not found".to_string(),
                class_name: Some("text-danger".to_string()),
            },
            LayoutNode::Rule,
            LayoutNode::paragraph(format!("The pathname {path} was not recognised...")),
        ],
    }
}

fn headline_cards(ctx: &DataContext) -> LayoutNode {
    let Some(figures) = headline(&ctx.table.view()) else {
        return LayoutNode::styled(
            NUMBER_CARD_STYLE,
            vec![LayoutNode::paragraph("Aucun accident chargé.")],
        );
    };
    let year = figures.year;

    let block = |label: String, value: u64, share: Option<f64>| {
        let mut children = vec![
            LayoutNode::paragraph(label),
            LayoutNode::Bold {
                text: value.to_string(),
            },
        ];
        if let Some(share) = share {
            children.push(LayoutNode::paragraph(format!(
                "Représente {share:.0}% des accidents totaux."
            )));
        }
        LayoutNode::div(children)
    };

    LayoutNode::styled(
        NUMBER_CARD_STYLE,
        vec![
            block(
                format!("Nombre d'accidents recensés en {year}:"),
                figures.total,
                None,
            ),
            block(
                format!("Nombre de morts en {year}:"),
                figures.killed,
                Some(figures.killed_share),
            ),
            block(
                format!("Nombre d'hospitalisations en {year}:"),
                figures.hospitalized,
                Some(figures.hospitalized_share),
            ),
        ],
    )
}

fn home(ctx: &DataContext) -> LayoutNode {
    let levels = GeoLevel::iter()
        .map(|level| {
            let label = match level {
                GeoLevel::National => "National",
                GeoLevel::Region => "Régional",
                GeoLevel::Department => "Départemental",
            };
            DropdownOption::new(label, level.to_string())
        })
        .collect();
    let speeds = AnimationSpeed::all()
        .iter()
        .map(|speed| DropdownOption::plain(speed.to_string()))
        .collect();

    LayoutNode::div(vec![
        headline_cards(ctx),
        LayoutNode::card(vec![
            LayoutNode::div(vec![
                LayoutNode::Dropdown(Dropdown::single(
                    "speed-dropdown",
                    speeds,
                    AnimationSpeed::default().as_ref(),
                )),
                LayoutNode::graph(OutputId::MonthlyAnimation),
            ]),
            LayoutNode::div(vec![
                LayoutNode::Dropdown(Dropdown::single(
                    "niv_geo_dropdown",
                    levels,
                    GeoLevel::National.as_ref(),
                )),
                LayoutNode::graph(OutputId::YearlyTrend),
            ]),
        ]),
        LayoutNode::card(vec![LayoutNode::graph(OutputId::SeasonalDecomposition)]),
    ])
}

/// Year slider position standing for "every year": the year before the
/// first loaded year.
#[must_use]
pub fn all_years_position(ctx: &DataContext) -> i32 {
    ctx.table.years().first().map_or(0, |first| first - 1)
}

fn users(ctx: &DataContext) -> LayoutNode {
    let variables = std::iter::once(DropdownOption::plain(ALL))
        .chain(
            BREAKDOWN_COLUMNS
                .iter()
                .filter(|c| ctx.table.has_column(**c))
                .map(|c| DropdownOption::new(c.title(), c.to_string())),
        )
        .collect();
    let severities = std::iter::once(DropdownOption::plain(ALL))
        .chain(
            Severity::all()
                .iter()
                .map(|s| DropdownOption::plain(s.to_string())),
        )
        .collect();

    let years = ctx.table.years();
    let all_position = i64::from(all_years_position(ctx));
    let marks = std::iter::once((all_position, ALL.to_string()))
        .chain(years.iter().map(|y| (i64::from(*y), y.to_string())))
        .collect();
    let last = years.last().map_or(all_position, |y| i64::from(*y));

    LayoutNode::div(vec![
        LayoutNode::card(vec![LayoutNode::heading(
            1,
            "Description des accidents et états/situation des usagers mis en cause",
        )]),
        LayoutNode::card(vec![
            LayoutNode::paragraph("Choix de variable:"),
            LayoutNode::Dropdown(Dropdown::single("variable-dropdown", variables, ALL)),
            LayoutNode::graph(OutputId::Density),
            LayoutNode::graph(OutputId::Bar),
            LayoutNode::Slider(Slider {
                id: "annee-slider".to_string(),
                min: all_position,
                max: last,
                value: all_position,
                marks,
            }),
        ]),
        LayoutNode::card(vec![
            LayoutNode::paragraph("Gravité de la blessure:"),
            LayoutNode::Dropdown(Dropdown::single("modalite-dropdown", severities, ALL)),
            LayoutNode::Button {
                id: OutputId::ResetButton.to_string(),
                label: "Réinitialiser la sélection".to_string(),
                disabled: true,
            },
            LayoutNode::graph(OutputId::AgePie),
        ]),
    ])
}

/// Filter dropdowns of the accident map, with their labels and columns.
pub const MAP_FILTERS: &[(&str, &str, Column)] = &[
    ("dropdown_an", "Selectionner l'année", Column::Year),
    ("dropdown_mois", "Selectionner le mois", Column::Month),
    ("dropdown_jour", "Selectionner le jour", Column::Weekday),
    ("dropdown_catr", "Selectionner la catégorie de route", Column::RouteCategory),
    ("dropdown_obsm", "Selectionner l'obstacle", Column::Obstacle),
    ("dropdown_atm", "Selectionner la météo", Column::Weather),
];

fn accident_map(ctx: &DataContext) -> LayoutNode {
    let mut controls = Vec::new();
    for (id, label, column) in MAP_FILTERS {
        controls.push(LayoutNode::styled(
            MAP_LABEL_STYLE,
            vec![LayoutNode::paragraph(*label)],
        ));
        controls.push(LayoutNode::Dropdown(Dropdown::multi(
            id,
            column_options(ctx, *column),
        )));
    }

    let colors = MapColor::all()
        .iter()
        .map(|color| {
            let label = match color {
                MapColor::Severity => "Gravité de l'accident",
                MapColor::Intersection => "Intersection",
                MapColor::Lighting => "Lumière",
                MapColor::Weekday => "Jour",
            };
            DropdownOption::new(label, color.to_string())
        })
        .collect();
    controls.push(LayoutNode::styled(
        MAP_LABEL_STYLE,
        vec![LayoutNode::paragraph(
            "Selectionner la variable à être représentée en couleur",
        )],
    ));
    controls.push(LayoutNode::Dropdown(Dropdown::single(
        "dropdown_color",
        colors,
        MapColor::default().as_ref(),
    )));

    LayoutNode::div(vec![
        LayoutNode::styled(
            MAP_LABEL_STYLE,
            vec![LayoutNode::heading(1, "Accidentologie en france")],
        ),
        LayoutNode::styled(
            &[("display", "flex"), ("flexDirection", "row")],
            vec![
                LayoutNode::Div {
                    id: Some("selection".to_string()),
                    class_name: Some("float-child".to_string()),
                    style: Style::new(),
                    children: controls,
                },
                LayoutNode::Div {
                    id: None,
                    class_name: Some("float-child".to_string()),
                    style: style(&[("padding", "0 0 0 2%")]),
                    children: vec![LayoutNode::graph(OutputId::AccidentMap)],
                },
            ],
        ),
    ])
}

fn area_map() -> LayoutNode {
    let levels = MapLevel::iter()
        .map(|level| {
            let label = match level {
                MapLevel::Region => "Régions",
                MapLevel::Department => "Départements",
            };
            DropdownOption::new(label, level.to_string())
        })
        .collect();
    let indicators = Indicator::iter()
        .map(|indicator| {
            let label = match indicator {
                Indicator::Count => "Nombre d'accidents",
                Indicator::Ratio => "Accidents pour 1000 habitants",
            };
            DropdownOption::new(label, indicator.to_string())
        })
        .collect();

    LayoutNode::div(vec![
        LayoutNode::card(vec![LayoutNode::heading(
            1,
            "Accidents par région et département",
        )]),
        LayoutNode::card(vec![
            LayoutNode::Dropdown(Dropdown::single(
                "dropdown_regdep",
                levels,
                MapLevel::Region.as_ref(),
            )),
            LayoutNode::Dropdown(Dropdown::single(
                "dropdown_indic",
                indicators,
                Indicator::Count.as_ref(),
            )),
            LayoutNode::graph(OutputId::AreaMap),
        ]),
        LayoutNode::card(vec![LayoutNode::graph(OutputId::RegionalSeries)]),
    ])
}

fn submenu(index: u8, title: &str, links: &[(&str, &str)]) -> Vec<LayoutNode> {
    vec![
        LayoutNode::Div {
            id: Some(format!("submenu-{index}")),
            class_name: Some(String::new()),
            style: style(&[("cursor", "pointer")]),
            children: vec![LayoutNode::paragraph(title)],
        },
        LayoutNode::Collapse {
            id: format!("submenu-{index}-collapse"),
            is_open: false,
            children: links
                .iter()
                .map(|(href, text)| LayoutNode::link(href, text))
                .collect(),
        },
    ]
}

/// Page chrome: navigation bar with the zone picker, sidebar with the
/// page links, and the empty content slot.
#[must_use]
pub fn app_shell() -> LayoutNode {
    let zones = vec![
        DropdownOption::new("Nationale", "all"),
        DropdownOption::new("Régional", "reg"),
        DropdownOption::new("Département", "dep"),
    ];

    let navbar = LayoutNode::Div {
        id: Some("navbar".to_string()),
        class_name: Some("navbar navbar-dark bg-dark".to_string()),
        style: Style::new(),
        children: vec![
            LayoutNode::Button {
                id: "btn_sidebar".to_string(),
                label: "Menu".to_string(),
                disabled: false,
            },
            LayoutNode::Dropdown(Dropdown::single("zone-data-filter", zones, "all")),
            LayoutNode::Dropdown(Dropdown {
                id: OutputId::ZoneSelection.to_string(),
                options: Vec::new(),
                value: serde_json::Value::Null,
                multi: false,
                clearable: false,
                placeholder: Some(String::new()),
            }),
        ],
    };

    let mut nav = submenu(
        1,
        "Visualisations",
        &[
            (Page::Home.path(), "Evolution temporelle"),
            (Page::Users.path(), "Caractéristiques des accidents"),
        ],
    );
    nav.extend(submenu(
        2,
        "Cartes interactives",
        &[
            (Page::AccidentMap.path(), "Carte de la France"),
            (Page::AreaMap.path(), "Carte par région/département"),
        ],
    ));

    let sidebar = LayoutNode::Div {
        id: Some(OutputId::Sidebar.to_string()),
        class_name: None,
        style: SidebarState::Shown.sidebar_style(),
        children: vec![
            LayoutNode::Heading {
                level: 2,
                text: "DashBike".to_string(),
                class_name: Some("display-4".to_string()),
            },
            LayoutNode::Rule,
            LayoutNode::Image {
                src: "/assets/accident_bike.png".to_string(),
            },
            LayoutNode::Paragraph {
                text: "Vous trouverez ici les différentes pages du dashboard".to_string(),
                class_name: Some("lead".to_string()),
            },
            LayoutNode::div(nav),
        ],
    };

    let content = LayoutNode::Div {
        id: Some(OutputId::PageContent.to_string()),
        class_name: None,
        style: SidebarState::Shown.content_style(),
        children: Vec::new(),
    };

    LayoutNode::div(vec![navbar, sidebar, content])
}
