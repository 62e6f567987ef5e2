//! Chart-specific control values.

use dashbike_accident_models::Column;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Playback speed of the monthly animation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AnimationSpeed {
    #[default]
    #[serde(rename = "normal")]
    #[strum(serialize = "normal")]
    Normal,
    #[serde(rename = "x1.5")]
    #[strum(serialize = "x1.5")]
    X1_5,
    #[serde(rename = "x2")]
    #[strum(serialize = "x2")]
    X2,
    #[serde(rename = "x4")]
    #[strum(serialize = "x4")]
    X4,
    #[serde(rename = "x8")]
    #[strum(serialize = "x8")]
    X8,
}

impl AnimationSpeed {
    /// Returns all speeds, slowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Normal, Self::X1_5, Self::X2, Self::X4, Self::X8]
    }

    /// Time each frame stays on screen, in milliseconds.
    #[must_use]
    pub const fn frame_duration_ms(self) -> f64 {
        match self {
            Self::Normal => 1500.0,
            Self::X1_5 => 1000.0,
            Self::X2 => 750.0,
            Self::X4 => 375.0,
            Self::X8 => 187.5,
        }
    }
}

/// Column used to color the points of the accident map.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum MapColor {
    #[default]
    #[serde(rename = "grav")]
    #[strum(serialize = "grav")]
    Severity,
    #[serde(rename = "int")]
    #[strum(serialize = "int")]
    Intersection,
    #[serde(rename = "lum")]
    #[strum(serialize = "lum")]
    Lighting,
    #[serde(rename = "jour")]
    #[strum(serialize = "jour")]
    Weekday,
}

impl MapColor {
    /// Returns all map color choices.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Severity,
            Self::Intersection,
            Self::Lighting,
            Self::Weekday,
        ]
    }

    /// The table column carrying the color category.
    #[must_use]
    pub const fn column(self) -> Column {
        match self {
            Self::Severity => Column::Severity,
            Self::Intersection => Column::Intersection,
            Self::Lighting => Column::Lighting,
            Self::Weekday => Column::Weekday,
        }
    }

    /// Legend title shown next to the map.
    #[must_use]
    pub const fn legend_title(self) -> &'static str {
        match self {
            Self::Severity => "Gravité de l'accident",
            Self::Intersection => "Type d'intersection ou<br>s'est produit l'accident",
            Self::Lighting => "Conditions d'éclairage<br>du lieu de l'accident",
            Self::Weekday => "Jour de la semaine",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speeds_divide_the_base_duration() {
        for speed in AnimationSpeed::all() {
            let factor = match speed {
                AnimationSpeed::Normal => 1.0,
                AnimationSpeed::X1_5 => 1.5,
                AnimationSpeed::X2 => 2.0,
                AnimationSpeed::X4 => 4.0,
                AnimationSpeed::X8 => 8.0,
            };
            assert!((speed.frame_duration_ms() * factor - 1500.0).abs() < 1e-9);
        }
        assert_eq!("x1.5".parse::<AnimationSpeed>().unwrap(), AnimationSpeed::X1_5);
    }

    #[test]
    fn map_color_matches_column_name() {
        for color in MapColor::all() {
            assert_eq!(color.as_ref(), color.column().as_ref());
        }
    }
}
