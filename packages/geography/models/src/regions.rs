//! French administrative region codes.
//!
//! Provides the INSEE codes and names of the 18 regions (13 metropolitan
//! and 5 overseas) plus helpers for normalising codes read from CSV files,
//! where leading zeros are often lost.

/// INSEE codes of the French regions, metropolitan first.
pub const REGION_CODES: &[&str] = &[
    "11", "24", "27", "28", "32", "44", "52", "53", "75", "76", "84", "93", "94", "01", "02", "03",
    "04", "06",
];

/// Overseas collectivities missing from the department population table,
/// as `(code, name, population)`.
pub const OVERSEAS_COLLECTIVITIES: &[(&str, &str, u64)] = &[
    ("978", "Saint-Martin", 72_240),
    ("987", "Polynésie française", 306_280),
    ("988", "Nouvelle calédonie", 210_407),
];

/// Maps a two-digit region code to the region name.
///
/// Returns `"Inconnue"` for unrecognized codes.
#[must_use]
pub fn region_name(code: &str) -> &'static str {
    match code {
        "11" => "Île-de-France",
        "24" => "Centre-Val de Loire",
        "27" => "Bourgogne-Franche-Comté",
        "28" => "Normandie",
        "32" => "Hauts-de-France",
        "44" => "Grand Est",
        "52" => "Pays de la Loire",
        "53" => "Bretagne",
        "75" => "Nouvelle-Aquitaine",
        "76" => "Occitanie",
        "84" => "Auvergne-Rhône-Alpes",
        "93" => "Provence-Alpes-Côte d'Azur",
        "94" => "Corse",
        "01" => "Guadeloupe",
        "02" => "Martinique",
        "03" => "Guyane",
        "04" => "La Réunion",
        "06" => "Mayotte",
        _ => "Inconnue",
    }
}

/// Left-pads a numeric code with zeros to `width` characters.
///
/// Alphanumeric codes (Corsica's `"2A"`) and codes that already have the
/// width are returned trimmed but otherwise unchanged.
#[must_use]
pub fn zero_pad(code: &str, width: usize) -> String {
    let code = code.trim();
    let code = code.strip_suffix(".0").unwrap_or(code);
    if code.is_empty() || code.len() >= width || !code.chars().all(|c| c.is_ascii_digit()) {
        return code.to_string();
    }
    format!("{code:0>width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_count() {
        assert_eq!(REGION_CODES.len(), 18);
    }

    #[test]
    fn name_coverage() {
        for code in REGION_CODES {
            assert_ne!(region_name(code), "Inconnue", "no name for region: {code}");
        }
    }

    #[test]
    fn unknown_region() {
        assert_eq!(region_name("99"), "Inconnue");
    }

    #[test]
    fn pads_numeric_codes() {
        assert_eq!(zero_pad("1", 2), "01");
        assert_eq!(zero_pad("84", 2), "84");
        assert_eq!(zero_pad("6.0", 2), "06");
        assert_eq!(zero_pad(" 978 ", 2), "978");
    }

    #[test]
    fn keeps_alphanumeric_codes() {
        assert_eq!(zero_pad("2A", 2), "2A");
        assert_eq!(zero_pad("", 2), "");
    }
}
