#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident record types, severity classes, and ordered calendar factors.
//!
//! This crate defines the canonical vocabulary shared by every dashbike
//! crate: the fixed set of severity classes (and their display order and
//! colors), calendar-ordered month and weekday factors, age bands, and the
//! closed set of column identifiers that selections and aggregations may
//! reference.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Injury severity of the person involved in an accident.
///
/// The declaration order is the display order used by every chart and
/// legend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Severity {
    /// Uninjured.
    #[serde(rename = "Indemne")]
    #[strum(serialize = "Indemne")]
    Uninjured,
    /// Lightly injured.
    #[serde(rename = "Blessé léger")]
    #[strum(serialize = "Blessé léger")]
    LightlyInjured,
    /// Injured and hospitalized.
    #[serde(rename = "Blessé hospitalisé")]
    #[strum(serialize = "Blessé hospitalisé")]
    Hospitalized,
    /// Killed.
    #[serde(rename = "Tué")]
    #[strum(serialize = "Tué")]
    Killed,
}

impl Severity {
    /// Returns all variants in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Uninjured,
            Self::LightlyInjured,
            Self::Hospitalized,
            Self::Killed,
        ]
    }

    /// Named color used for scatter-map markers.
    #[must_use]
    pub const fn map_color(self) -> &'static str {
        match self {
            Self::Uninjured => "lightgreen",
            Self::LightlyInjured => "steelblue",
            Self::Hospitalized => "orange",
            Self::Killed => "red",
        }
    }

    /// Hex color used for stacked area and bar series.
    #[must_use]
    pub const fn series_color(self) -> &'static str {
        match self {
            Self::Uninjured => "#4cae4c",
            Self::LightlyInjured => "#6495ed",
            Self::Hospitalized => "#ffa54f",
            Self::Killed => "#ff6666",
        }
    }

    /// Four-shade palette used for the slices of this class's age pie.
    #[must_use]
    pub const fn pie_palette(self) -> [&'static str; 4] {
        match self {
            Self::Uninjured => ["#c2f0c2", "#7ccf7c", "#4cae4c", "#238b23"],
            Self::LightlyInjured => ["#add8e6", "#87ceeb", "#6495ed", "#4169e1"],
            Self::Hospitalized => ["#ffdab9", "#ffcc80", "#ffa54f", "#ff8c00"],
            Self::Killed => ["#ffb6c1", "#ff9999", "#ff6666", "#ff3333"],
        }
    }

    /// Short label shown in the center of a donut chart.
    #[must_use]
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::Uninjured => "Indemne",
            Self::LightlyInjured => "Léger",
            Self::Hospitalized => "Hospitalisé",
            Self::Killed => "Tué",
        }
    }
}

/// Calendar month, ordered January to December.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Month {
    Janvier,
    #[serde(rename = "février")]
    #[strum(serialize = "février")]
    Fevrier,
    Mars,
    Avril,
    Mai,
    Juin,
    Juillet,
    #[serde(rename = "août")]
    #[strum(serialize = "août")]
    Aout,
    Septembre,
    Octobre,
    Novembre,
    #[serde(rename = "décembre")]
    #[strum(serialize = "décembre")]
    Decembre,
}

impl Month {
    /// Returns all months in calendar order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Janvier,
            Self::Fevrier,
            Self::Mars,
            Self::Avril,
            Self::Mai,
            Self::Juin,
            Self::Juillet,
            Self::Aout,
            Self::Septembre,
            Self::Octobre,
            Self::Novembre,
            Self::Decembre,
        ]
    }

    /// Month number, 1 for January.
    #[must_use]
    pub const fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Creates a month from its number (1-12).
    #[must_use]
    pub fn from_number(number: u32) -> Option<Self> {
        let idx = usize::try_from(number.checked_sub(1)?).ok()?;
        Self::all().get(idx).copied()
    }
}

/// Day of the week, ordered Monday to Sunday.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Weekday {
    Lundi,
    Mardi,
    Mercredi,
    Jeudi,
    Vendredi,
    Samedi,
    Dimanche,
}

impl Weekday {
    /// Returns all days in week order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Lundi,
            Self::Mardi,
            Self::Mercredi,
            Self::Jeudi,
            Self::Vendredi,
            Self::Samedi,
            Self::Dimanche,
        ]
    }
}

/// Age band of the person involved.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AgeGroup {
    #[serde(rename = "0-17 ans")]
    #[strum(serialize = "0-17 ans")]
    Minor,
    #[serde(rename = "18-34 ans")]
    #[strum(serialize = "18-34 ans")]
    YoungAdult,
    #[serde(rename = "35-64 ans")]
    #[strum(serialize = "35-64 ans")]
    Adult,
    #[serde(rename = "65 ans et plus")]
    #[strum(serialize = "65 ans et plus")]
    Senior,
}

impl AgeGroup {
    /// Returns all bands from youngest to oldest.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Minor, Self::YoungAdult, Self::Adult, Self::Senior]
    }

    /// Band containing the given age in years.
    #[must_use]
    pub const fn from_age(age: u16) -> Self {
        match age {
            0..=17 => Self::Minor,
            18..=34 => Self::YoungAdult,
            35..=64 => Self::Adult,
            _ => Self::Senior,
        }
    }
}

const SEVERITY_LABELS: &[&str] = &["Indemne", "Blessé léger", "Blessé hospitalisé", "Tué"];

const MONTH_LABELS: &[&str] = &[
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

const WEEKDAY_LABELS: &[&str] = &[
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

const AGE_GROUP_LABELS: &[&str] = &["0-17 ans", "18-34 ans", "35-64 ans", "65 ans et plus"];

const ROUTE_CATEGORY_LABELS: &[&str] = &[
    "Route Départementale",
    "Voie Communales",
    "Route nationale",
    "Parc de stationnement ouvert à la circulation publique",
    "Autoroute",
    "Hors réseau public",
    "Routes de métropole urbaine",
    "autre",
];

const OBSTACLE_LABELS: &[&str] = &[
    "Véhicule",
    "Piéton",
    "Véhicule sur rail",
    "Animal domestique",
    "Animal sauvage",
    "Autre",
    "Non renseigné",
];

const WEATHER_LABELS: &[&str] = &[
    "Normale",
    "Temps éblouissant",
    "Temps couvert",
    "Brouillard - fumée",
    "Pluie légère",
    "Pluie forte",
    "Vent fort - tempête",
    "Neige - grêle",
    "Autre",
];

/// Identifier of a filterable/groupable column of the accident table.
///
/// The string form is the header used in the source CSV.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Column {
    #[serde(rename = "an")]
    #[strum(serialize = "an")]
    Year,
    #[serde(rename = "mois")]
    #[strum(serialize = "mois")]
    Month,
    #[serde(rename = "jour")]
    #[strum(serialize = "jour")]
    Weekday,
    #[serde(rename = "dep")]
    #[strum(serialize = "dep")]
    Department,
    #[serde(rename = "dep_name")]
    #[strum(serialize = "dep_name")]
    DepartmentName,
    #[serde(rename = "reg")]
    #[strum(serialize = "reg")]
    Region,
    #[serde(rename = "region_name")]
    #[strum(serialize = "region_name")]
    RegionName,
    #[serde(rename = "grav")]
    #[strum(serialize = "grav")]
    Severity,
    #[serde(rename = "age_group")]
    #[strum(serialize = "age_group")]
    AgeGroup,
    #[serde(rename = "sexe")]
    #[strum(serialize = "sexe")]
    Sex,
    #[serde(rename = "catr")]
    #[strum(serialize = "catr")]
    RouteCategory,
    #[serde(rename = "obsm")]
    #[strum(serialize = "obsm")]
    Obstacle,
    #[serde(rename = "atm")]
    #[strum(serialize = "atm")]
    Weather,
    #[serde(rename = "int")]
    #[strum(serialize = "int")]
    Intersection,
    #[serde(rename = "lum")]
    #[strum(serialize = "lum")]
    Lighting,
    #[serde(rename = "situ")]
    #[strum(serialize = "situ")]
    Situation,
    #[serde(rename = "trajet")]
    #[strum(serialize = "trajet")]
    Trip,
    #[serde(rename = "com_name")]
    #[strum(serialize = "com_name")]
    Commune,
}

impl Column {
    /// Returns every column identifier.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Year,
            Self::Month,
            Self::Weekday,
            Self::Department,
            Self::DepartmentName,
            Self::Region,
            Self::RegionName,
            Self::Severity,
            Self::AgeGroup,
            Self::Sex,
            Self::RouteCategory,
            Self::Obstacle,
            Self::Weather,
            Self::Intersection,
            Self::Lighting,
            Self::Situation,
            Self::Trip,
            Self::Commune,
        ]
    }

    /// Fixed category set of this column, in display order, if it has one.
    ///
    /// Columns without a declared set take their domain from the loaded
    /// table.
    #[must_use]
    pub const fn declared_categories(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Severity => Some(SEVERITY_LABELS),
            Self::Month => Some(MONTH_LABELS),
            Self::Weekday => Some(WEEKDAY_LABELS),
            Self::AgeGroup => Some(AGE_GROUP_LABELS),
            Self::RouteCategory => Some(ROUTE_CATEGORY_LABELS),
            Self::Obstacle => Some(OBSTACLE_LABELS),
            Self::Weather => Some(WEATHER_LABELS),
            _ => None,
        }
    }

    /// Whether values of this column compare numerically.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Year)
    }

    /// Human-readable name used for legend and axis titles.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Year => "Année",
            Self::Month => "Mois",
            Self::Weekday => "Jour de la semaine",
            Self::Department => "Département",
            Self::DepartmentName => "Nom du département",
            Self::Region => "Code région",
            Self::RegionName => "Région",
            Self::Severity => "Gravité de la blessure",
            Self::AgeGroup => "Age de l'usager",
            Self::Sex => "Genre de l'usager",
            Self::RouteCategory => "Catégorie de route",
            Self::Obstacle => "Obstacle rencontré",
            Self::Weather => "Météo lors de l'accident",
            Self::Intersection => "Type d'intersection",
            Self::Lighting => "Conditions d'éclairage",
            Self::Situation => "Lieux",
            Self::Trip => "Trajet de l'usager",
            Self::Commune => "Commune",
        }
    }
}

/// One accident-involved person as loaded from the cleaned dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentRecord {
    /// Calendar year of the accident.
    pub year: i32,
    /// Month of the accident.
    pub month: Month,
    /// Day of the week.
    pub weekday: Weekday,
    /// Department code (`"75"`, `"2A"`, `"971"`).
    pub department: String,
    /// Department name.
    pub department_name: Option<String>,
    /// Two-character region code, `None` when the department could not be
    /// matched to a region.
    pub region: Option<String>,
    /// Region name.
    pub region_name: Option<String>,
    /// Latitude.
    pub latitude: Option<f64>,
    /// Longitude.
    pub longitude: Option<f64>,
    /// Injury severity.
    pub severity: Severity,
    /// Age in years.
    pub age: Option<u16>,
    /// Derived age band.
    pub age_group: Option<AgeGroup>,
    /// Sex.
    pub sex: Option<String>,
    /// Route category.
    pub route_category: Option<String>,
    /// Mobile obstacle hit.
    pub obstacle: Option<String>,
    /// Weather conditions.
    pub weather: Option<String>,
    /// Intersection type.
    pub intersection: Option<String>,
    /// Lighting conditions.
    pub lighting: Option<String>,
    /// Location situation (road, cycle lane, sidewalk...).
    pub situation: Option<String>,
    /// Trip purpose.
    pub trip: Option<String>,
    /// Commune name.
    pub commune: Option<String>,
    /// Full date.
    pub date: Option<NaiveDate>,
    /// Time of day.
    pub time: Option<NaiveTime>,
}

impl AccidentRecord {
    /// Returns the categorical value of `column` for this record.
    ///
    /// `None` means the value is missing, which never matches a selection
    /// and is skipped by grouping.
    #[must_use]
    pub fn key(&self, column: Column) -> Option<Cow<'_, str>> {
        fn borrowed(value: Option<&str>) -> Option<Cow<'_, str>> {
            value.map(Cow::Borrowed)
        }

        match column {
            Column::Year => Some(Cow::Owned(self.year.to_string())),
            Column::Month => Some(Cow::Borrowed(self.month.as_ref())),
            Column::Weekday => Some(Cow::Borrowed(self.weekday.as_ref())),
            Column::Department => Some(Cow::Borrowed(self.department.as_str())),
            Column::DepartmentName => borrowed(self.department_name.as_deref()),
            Column::Region => borrowed(self.region.as_deref()),
            Column::RegionName => borrowed(self.region_name.as_deref()),
            Column::Severity => Some(Cow::Borrowed(self.severity.as_ref())),
            Column::AgeGroup => self.age_group.as_ref().map(|g| Cow::Borrowed(g.as_ref())),
            Column::Sex => borrowed(self.sex.as_deref()),
            Column::RouteCategory => borrowed(self.route_category.as_deref()),
            Column::Obstacle => borrowed(self.obstacle.as_deref()),
            Column::Weather => borrowed(self.weather.as_deref()),
            Column::Intersection => borrowed(self.intersection.as_deref()),
            Column::Lighting => borrowed(self.lighting.as_deref()),
            Column::Situation => borrowed(self.situation.as_deref()),
            Column::Trip => borrowed(self.trip.as_deref()),
            Column::Commune => borrowed(self.commune.as_deref()),
        }
    }

    /// Returns the value of `column` as a number, if the column is numeric.
    #[must_use]
    pub fn numeric(&self, column: Column) -> Option<f64> {
        match column {
            Column::Year => Some(f64::from(self.year)),
            _ => None,
        }
    }
}
