//! Width and speed quantities used across the lane model.

use serde::{Deserialize, Serialize};

/// A width in metres.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metre(f64);

impl Metre {
    #[must_use]
    pub const fn new(val: f64) -> Self {
        Self(val)
    }

    #[must_use]
    pub const fn val(&self) -> f64 {
        self.0
    }
}

impl std::ops::Add for Metre {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl std::ops::AddAssign for Metre {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl std::ops::Mul<Metre> for f64 {
    type Output = Metre;
    fn mul(self, other: Metre) -> Metre {
        Metre::new(self * other.val())
    }
}

impl std::iter::Sum for Metre {
    fn sum<I: Iterator<Item = Metre>>(iter: I) -> Self {
        Self(iter.map(|m| m.0).sum())
    }
}

#[derive(Debug)]
pub enum WidthError {
    Empty,
    Parse(std::num::ParseFloatError),
    UnknownUnit(String),
    Negative,
}

impl std::fmt::Display for WidthError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Parse(e) => e.fmt(f),
            Self::UnknownUnit(unit) => write!(f, "unknown unit '{}'", unit),
            Self::Negative => write!(f, "negative width"),
        }
    }
}

impl std::error::Error for WidthError {}

impl From<std::num::ParseFloatError> for WidthError {
    fn from(e: std::num::ParseFloatError) -> Self {
        WidthError::Parse(e)
    }
}

impl std::str::FromStr for Metre {
    type Err = WidthError;

    /// Parse an OSM width value: bare metres, `3.5 m`, or `12 ft`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(WidthError::Empty);
        }
        let metres: f64 = match s.split_once(' ') {
            None => s.parse()?,
            Some((v, "m")) => v.parse()?,
            Some((v, "ft")) => 0.3048_f64 * v.parse::<f64>()?,
            Some((_, unit)) => return Err(WidthError::UnknownUnit(unit.to_string())),
        };
        if metres < 0.0 {
            return Err(WidthError::Negative);
        }
        Ok(Metre::new(metres))
    }
}

/// A speed limit with the unit it was tagged in. Consumers doing distance
/// over time calculations can normalize with `kph`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Speed {
    Kph(f64),
    Mph(f64),
    Knots(f64),
}

impl Speed {
    #[must_use]
    pub fn kph(&self) -> f64 {
        match self {
            Self::Kph(val) => *val,
            Self::Mph(val) => 1.609_34_f64 * val,
            Self::Knots(val) => 1.852_f64 * val,
        }
    }
}

#[derive(Debug)]
pub enum SpeedError {
    Empty,
    Parse(std::num::ParseFloatError),
    UnknownUnit(String),
    OutOfRange,
}

impl std::fmt::Display for SpeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Parse(e) => e.fmt(f),
            Self::UnknownUnit(unit) => write!(f, "unknown unit '{}'", unit),
            Self::OutOfRange => write!(f, "out of range"),
        }
    }
}

impl std::error::Error for SpeedError {}

impl From<std::num::ParseFloatError> for SpeedError {
    fn from(e: std::num::ParseFloatError) -> Self {
        SpeedError::Parse(e)
    }
}

impl std::str::FromStr for Speed {
    type Err = SpeedError;

    /// Parse an OSM maxspeed value: bare km/h, `25 mph`, or `5 knots`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(SpeedError::Empty);
        }
        let speed = match s.split_once(' ') {
            None => Self::Kph(s.parse()?),
            Some((v, "mph")) => Self::Mph(v.parse()?),
            Some((v, "knots")) => Self::Knots(v.parse()?),
            Some((_, unit)) => return Err(SpeedError::UnknownUnit(unit.to_string())),
        };
        if speed.kph() < 0.0_f64 || speed.kph() > 300.0_f64 {
            return Err(SpeedError::OutOfRange);
        }
        Ok(speed)
    }
}

impl std::fmt::Display for Speed {
    /// The OSM tag form: bare km/h, otherwise suffixed with the unit.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Kph(v) => write!(f, "{}", v),
            Self::Mph(v) => write!(f, "{} mph", v),
            Self::Knots(v) => write!(f, "{} knots", v),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SpeedUnit {
    Kph,
    Mph,
    Knots,
}

#[derive(Serialize, Deserialize)]
struct SpeedRepr {
    unit: SpeedUnit,
    value: f64,
}

impl Serialize for Speed {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match *self {
            Self::Kph(value) => SpeedRepr {
                unit: SpeedUnit::Kph,
                value,
            },
            Self::Mph(value) => SpeedRepr {
                unit: SpeedUnit::Mph,
                value,
            },
            Self::Knots(value) => SpeedRepr {
                unit: SpeedUnit::Knots,
                value,
            },
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Speed {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = SpeedRepr::deserialize(deserializer)?;
        Ok(match repr.unit {
            SpeedUnit::Kph => Self::Kph(repr.value),
            SpeedUnit::Mph => Self::Mph(repr.value),
            SpeedUnit::Knots => Self::Knots(repr.value),
        })
    }
}
