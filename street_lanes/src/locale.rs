//! Where in the world a way is: country, subdivision, driving side, and the
//! defaults (lane widths, marking colours) that depend on them. The tables
//! here are static and embedded; geocoding a coordinate to a country happens
//! outside this crate.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::metric::Metre;
use crate::road::{Color, Designated, HighwayImportance, HighwayType};

/// An ISO 3166-1 alpha-2 country code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country(String);

impl Country {
    pub fn from_alpha2(code: &str) -> Result<Self> {
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            bail!("not an ISO 3166-1 alpha-2 code: {}", code);
        }
    }

    #[must_use]
    pub fn alpha2(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn united_states() -> Self {
        Self("US".to_string())
    }

    #[must_use]
    pub fn canada() -> Self {
        Self("CA".to_string())
    }

    #[must_use]
    pub fn united_kingdom() -> Self {
        Self("GB".to_string())
    }

    #[must_use]
    pub fn netherlands() -> Self {
        Self("NL".to_string())
    }

    #[must_use]
    pub fn germany() -> Self {
        Self("DE".to_string())
    }

    /// Countries painting centre lines yellow instead of white.
    fn yellow_centre_lines(&self) -> bool {
        matches!(
            self.0.as_str(),
            "US" | "CA" | "MX" | "BR" | "AR" | "CL" | "CO" | "PE" | "EC" | "UY" | "PY" | "BO"
        )
    }
}

/// Do vehicles travel on the right or left side of a road?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrivingSide {
    Right,
    Left,
}

impl DrivingSide {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Right => "right",
            Self::Left => "left",
        }
    }
}

impl std::str::FromStr for DrivingSide {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "right" => Ok(Self::Right),
            "left" => Ok(Self::Left),
            _ => Err(s.to_string()),
        }
    }
}

impl std::fmt::Display for DrivingSide {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Context about the place where an OSM way exists. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Locale {
    pub country: Option<Country>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision: Option<String>,
    pub driving_side: DrivingSide,
}

impl Locale {
    #[must_use]
    pub fn builder() -> LocaleBuilder {
        LocaleBuilder::default()
    }

    /// Default travel lane width for the given use.
    #[must_use]
    pub fn travel_width(&self, designated: &Designated, _highway: HighwayType) -> Metre {
        match designated {
            Designated::Foot => Metre::new(2.5),
            Designated::Bicycle => Metre::new(2.0),
            Designated::Motor
            | Designated::Bus
            | Designated::Taxi
            | Designated::Psv
            | Designated::Any => match &self.country {
                Some(c) if c == &Country::united_kingdom() => Metre::new(3.0),
                // https://puc.overheid.nl/rijkswaterstaat/doc/PUC_125514_31/ 4.2.5
                Some(c) if c == &Country::netherlands() => Metre::new(3.35),
                _ => Metre::new(3.5),
            },
        }
    }

    /// Paint colour separating opposite directions of motor traffic.
    #[must_use]
    pub fn separator_color(&self) -> Color {
        match &self.country {
            Some(c) if c.yellow_centre_lines() => Color::Yellow,
            _ => Color::White,
        }
    }

    /// Marking width separating opposite directions of motor traffic.
    #[must_use]
    pub fn separator_width(&self) -> Metre {
        match &self.country {
            // https://en.wikisource.org/wiki/Traffic_Signs_Manual/Chapter_5/2009/4
            Some(c) if c == &Country::united_kingdom() => Metre::new(0.1),
            _ => Metre::new(0.2),
        }
    }

    /// Does this class of highway carry shoulders when nothing is tagged?
    #[must_use]
    pub fn has_shoulder(&self, highway: HighwayType) -> bool {
        matches!(
            highway,
            HighwayType::Classified(
                HighwayImportance::Motorway
                    | HighwayImportance::Trunk
                    | HighwayImportance::Primary
                    | HighwayImportance::Secondary,
            ) | HighwayType::Link(
                HighwayImportance::Motorway
                    | HighwayImportance::Trunk
                    | HighwayImportance::Primary
                    | HighwayImportance::Secondary,
            )
        )
    }
}

/// Builder for `Locale`.
#[derive(Clone, Debug, Default)]
pub struct LocaleBuilder {
    country: Option<Country>,
    subdivision: Option<String>,
    driving_side: Option<DrivingSide>,
}

impl LocaleBuilder {
    /// Assign an ISO 3166 code: either alpha-2 (`NL`) or an ISO 3166-2
    /// subdivision (`DE-NW`). Unparseable codes are logged and skipped.
    #[must_use]
    pub fn iso_3166(mut self, code: &str) -> Self {
        let (country, subdivision) = match code.split_once('-') {
            Some((country, subdivision)) => (country, Some(subdivision)),
            None => (code, None),
        };
        match Country::from_alpha2(country) {
            Ok(country) => {
                self.country = Some(country);
                self.subdivision = subdivision.map(str::to_string);
            }
            Err(err) => warn!("ignoring {}: {}", code, err),
        }
        self
    }

    #[must_use]
    pub fn iso_3166_option(self, code: Option<&str>) -> Self {
        match code {
            Some(code) => self.iso_3166(code),
            None => self,
        }
    }

    #[must_use]
    pub fn country(mut self, country: Country) -> Self {
        self.country = Some(country);
        self
    }

    #[must_use]
    pub fn driving_side(mut self, side: DrivingSide) -> Self {
        self.driving_side = Some(side);
        self
    }

    #[must_use]
    pub fn build(self) -> Locale {
        Locale {
            country: self.country,
            subdivision: self.subdivision,
            driving_side: self.driving_side.unwrap_or(DrivingSide::Right),
        }
    }
}
