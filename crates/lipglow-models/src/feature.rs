//! Selectable facial features.
//!
//! The menu offers five features. Only [`Feature::Lips`] is wired to an
//! overlay; the others are accepted as a selection and draw nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A facial feature the user can pick from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Lips,
    Eyelashes,
    Eyelid,
    Chin,
    Cheek,
}

impl Feature {
    /// All features in menu order.
    pub const ALL: &'static [Feature] = &[
        Feature::Lips,
        Feature::Eyelashes,
        Feature::Eyelid,
        Feature::Chin,
        Feature::Cheek,
    ];

    /// Label shown in the menu.
    pub fn label(&self) -> &'static str {
        match self {
            Feature::Lips => "Lips",
            Feature::Eyelashes => "Eyelashes",
            Feature::Eyelid => "Eyelid",
            Feature::Chin => "Chin",
            Feature::Cheek => "Cheek",
        }
    }

    /// Whether selecting this feature produces a visible overlay.
    pub fn has_overlay(&self) -> bool {
        matches!(self, Feature::Lips)
    }

    /// Stable one-byte code, used to store the selection in an atomic cell.
    /// Zero is reserved for "nothing selected".
    pub fn code(&self) -> u8 {
        match self {
            Feature::Lips => 1,
            Feature::Eyelashes => 2,
            Feature::Eyelid => 3,
            Feature::Chin => 4,
            Feature::Cheek => 5,
        }
    }

    /// Inverse of [`Feature::code`].
    pub fn from_code(code: u8) -> Option<Feature> {
        match code {
            1 => Some(Feature::Lips),
            2 => Some(Feature::Eyelashes),
            3 => Some(Feature::Eyelid),
            4 => Some(Feature::Chin),
            5 => Some(Feature::Cheek),
            _ => None,
        }
    }

    /// The five static menu entries, in display order.
    pub fn menu_options() -> Vec<MenuOption> {
        Self::ALL.iter().map(|f| MenuOption::new(f.label())).collect()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Feature {
    type Err = FeatureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lips" => Ok(Feature::Lips),
            "eyelashes" => Ok(Feature::Eyelashes),
            "eyelid" => Ok(Feature::Eyelid),
            "chin" => Ok(Feature::Chin),
            "cheek" => Ok(Feature::Cheek),
            _ => Err(FeatureParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown feature: {0}")]
pub struct FeatureParseError(String);

/// Display-only menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuOption {
    pub label: String,
}

impl MenuOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The feature this entry selects.
    pub fn feature(&self) -> Result<Feature, FeatureParseError> {
        self.label.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_parse() {
        assert_eq!("Lips".parse::<Feature>().unwrap(), Feature::Lips);
        assert_eq!("chin".parse::<Feature>().unwrap(), Feature::Chin);
        assert_eq!(" EYELID ".parse::<Feature>().unwrap(), Feature::Eyelid);
        assert!("nose".parse::<Feature>().is_err());
    }

    #[test]
    fn test_code_roundtrip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_code(feature.code()), Some(*feature));
        }
        assert_eq!(Feature::from_code(0), None);
    }

    #[test]
    fn test_menu_order() {
        let labels: Vec<String> = Feature::menu_options()
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["Lips", "Eyelashes", "Eyelid", "Chin", "Cheek"]);
    }

    #[test]
    fn test_only_lips_has_overlay() {
        let wired: Vec<_> = Feature::ALL.iter().filter(|f| f.has_overlay()).collect();
        assert_eq!(wired, vec![&Feature::Lips]);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Feature::Eyelashes).unwrap();
        assert_eq!(json, "\"eyelashes\"");
    }
}
