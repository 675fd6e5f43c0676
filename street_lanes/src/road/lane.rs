use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::metric::{Metre, Speed};
use crate::road::highway::HighwayType;
use crate::road::marking::{Markings, Semantic};

/// A single element of the cross-section, ordered left to right across the
/// road.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Lane {
    Travel {
        /// Absent for foot traffic, which has no direction.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        direction: Option<Direction>,
        designated: Designated,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<Metre>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_speed: Option<Speed>,
        #[serde(
            default,
            rename = "turn_markings",
            skip_serializing_if = "Option::is_none"
        )]
        turn: Option<TurnMarkings>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        access: Option<AccessByMode>,
    },
    Parking {
        direction: Direction,
        designated: Designated,
        orientation: ParkingOrientation,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<Metre>,
    },
    Shoulder {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<Metre>,
    },
    Separator {
        semantic: Semantic,
        markings: Markings,
    },
    Construction {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<Metre>,
    },
}

impl Lane {
    /// Width in metres, falling back to the locale default for the lane's
    /// use.
    #[must_use]
    pub fn width(&self, locale: &Locale, highway: HighwayType) -> Metre {
        match self {
            Lane::Travel {
                width, designated, ..
            }
            | Lane::Parking {
                width, designated, ..
            } => width.unwrap_or_else(|| locale.travel_width(designated, highway)),
            Lane::Shoulder { width } | Lane::Construction { width } => {
                width.unwrap_or(Lane::DEFAULT_WIDTH)
            }
            Lane::Separator { markings, .. } => markings.width(),
        }
    }

    // EUROPEAN AGREEMENT ON MAIN INTERNATIONAL TRAFFIC ARTERIES (AGR) 1975, III.1.1
    pub const DEFAULT_WIDTH: Metre = Metre::new(3.5);

    #[must_use]
    pub fn is_separator(&self) -> bool {
        matches!(self, Lane::Separator { .. })
    }

    #[must_use]
    pub fn is_motor(&self) -> bool {
        matches!(
            self,
            Lane::Travel {
                designated: Designated::Motor,
                ..
            }
        )
    }

    #[must_use]
    pub fn is_foot(&self) -> bool {
        matches!(
            self,
            Lane::Travel {
                designated: Designated::Foot,
                ..
            }
        )
    }

    #[must_use]
    pub fn is_bicycle(&self) -> bool {
        matches!(
            self,
            Lane::Travel {
                designated: Designated::Bicycle,
                ..
            }
        )
    }

    #[must_use]
    pub fn is_bus(&self) -> bool {
        matches!(
            self,
            Lane::Travel {
                designated: Designated::Bus,
                ..
            }
        )
    }

    #[must_use]
    pub fn is_shoulder(&self) -> bool {
        matches!(self, Lane::Shoulder { .. })
    }

    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Travel { direction, .. } => *direction,
            Self::Parking { direction, .. } => Some(*direction),
            _ => None,
        }
    }
}

/// Direction of travel relative to the way's start-to-end orientation, not
/// compass bearing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    Both,
}

impl Direction {
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
            Self::Both => Self::Both,
        }
    }
}

/// The intended traffic mode of a lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Designated {
    Foot,
    Bicycle,
    #[serde(rename = "motor_vehicle")]
    Motor,
    Bus,
    Taxi,
    Psv,
    Any,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParkingOrientation {
    Parallel,
    Diagonal,
    Perpendicular,
}

impl ParkingOrientation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parallel => "parallel",
            Self::Diagonal => "diagonal",
            Self::Perpendicular => "perpendicular",
        }
    }
}

impl std::str::FromStr for ParkingOrientation {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parallel" => Ok(Self::Parallel),
            "diagonal" => Ok(Self::Diagonal),
            "perpendicular" => Ok(Self::Perpendicular),
            _ => Err(s.to_string()),
        }
    }
}

/// A painted turn arrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnMarking {
    Left,
    SlightLeft,
    SharpLeft,
    Through,
    Right,
    SlightRight,
    SharpRight,
    Reverse,
    MergeLeft,
    MergeRight,
}

impl std::str::FromStr for TurnMarking {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "left" => Self::Left,
            "slight_left" => Self::SlightLeft,
            "sharp_left" => Self::SharpLeft,
            "through" => Self::Through,
            "right" => Self::Right,
            "slight_right" => Self::SlightRight,
            "sharp_right" => Self::SharpRight,
            "reverse" => Self::Reverse,
            // OSM tags the merge arrows with a to_ infix.
            "merge_left" | "merge_to_left" => Self::MergeLeft,
            "merge_right" | "merge_to_right" => Self::MergeRight,
            _ => return Err(s.to_string()),
        })
    }
}

impl TurnMarking {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::SlightLeft => "slight_left",
            Self::SharpLeft => "sharp_left",
            Self::Through => "through",
            Self::Right => "right",
            Self::SlightRight => "slight_right",
            Self::SharpRight => "sharp_right",
            Self::Reverse => "reverse",
            Self::MergeLeft => "merge_left",
            Self::MergeRight => "merge_right",
        }
    }
}

/// The turn arrows painted on one lane, in tag order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnMarkings(Vec<TurnMarking>);

impl TurnMarkings {
    #[must_use]
    pub fn new(markings: Vec<TurnMarking>) -> Self {
        Self(markings)
    }

    /// The `;`-joined OSM tag value, `none` when empty.
    #[must_use]
    pub fn to_tag_value(&self) -> String {
        if self.0.is_empty() {
            return "none".to_string();
        }
        self.0
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl std::ops::Deref for TurnMarkings {
    type Target = Vec<TurnMarking>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Legal access for one mode, from
/// <https://wiki.openstreetmap.org/wiki/Key:access>.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Yes,
    No,
    Designated,
    Private,
    Permissive,
}

impl std::str::FromStr for Access {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            "designated" => Ok(Self::Designated),
            "private" => Ok(Self::Private),
            "permissive" => Ok(Self::Permissive),
            _ => Err(s.to_string()),
        }
    }
}

/// Access restrictions of one lane, by mode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessByMode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foot: Option<Access>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bicycle: Option<Access>,
    #[serde(
        default,
        rename = "motor_vehicle",
        skip_serializing_if = "Option::is_none"
    )]
    pub motor: Option<Access>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<Access>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxi: Option<Access>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psv: Option<Access>,
}

impl AccessByMode {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foot.is_none()
            && self.bicycle.is_none()
            && self.motor.is_none()
            && self.bus.is_none()
            && self.taxi.is_none()
            && self.psv.is_none()
    }
}

/// Render lane details as single characters, for compact test tables and
/// debug output.
pub trait Printable {
    fn as_ascii(&self) -> char;
}

impl Printable for Lane {
    fn as_ascii(&self) -> char {
        match self {
            Self::Travel {
                designated: Designated::Foot,
                ..
            } => 's',
            Self::Travel {
                designated: Designated::Bicycle,
                ..
            } => 'b',
            Self::Travel {
                designated: Designated::Motor,
                ..
            } => 'd',
            Self::Travel {
                designated: Designated::Bus,
                ..
            } => 'B',
            Self::Travel {
                designated: Designated::Taxi,
                ..
            } => 't',
            Self::Travel {
                designated: Designated::Psv,
                ..
            } => 'P',
            Self::Travel {
                designated: Designated::Any,
                ..
            } => 'a',
            Self::Shoulder { .. } => 'S',
            Self::Parking { .. } => 'p',
            Self::Construction { .. } => 'x',
            Self::Separator { .. } => '|',
        }
    }
}

impl Printable for Direction {
    fn as_ascii(&self) -> char {
        match self {
            Self::Forward => '^',
            Self::Backward => 'v',
            Self::Both => '|',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Lane, TurnMarking, TurnMarkings};

    #[test]
    fn test_reverse() {
        assert_eq!(Direction::Forward.reverse(), Direction::Backward);
        assert_eq!(Direction::Both.reverse(), Direction::Both);
    }

    #[test]
    fn test_turn_tag_value() {
        let turns = TurnMarkings::new(vec![TurnMarking::Through, TurnMarking::Right]);
        assert_eq!(turns.to_tag_value(), "through;right");
        assert_eq!(TurnMarkings::default().to_tag_value(), "none");
        assert_eq!(
            "merge_to_left".parse::<TurnMarking>().unwrap(),
            TurnMarking::MergeLeft
        );
    }

    #[test]
    fn test_predicates() {
        let shoulder = Lane::Shoulder { width: None };
        assert!(shoulder.is_shoulder());
        assert!(!shoulder.is_motor());
        assert_eq!(shoulder.direction(), None);
    }
}
