use std::collections::VecDeque;
use std::iter;

use osm_tags::TagSource;

use super::counts::Counts;
use super::infer::Infer;
use super::oneway::Oneway;
use crate::locale::{DrivingSide, Locale};
use crate::metric::{Metre, Speed};
use crate::road::{
    Access, AccessByMode, Designated, Direction, Highway, Lane, ParkingOrientation, TurnMarkings,
};
use crate::transform::error::{Diagnostic, Diagnostics};
use crate::transform::tags_to_lanes::TagsToLanesConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaneType {
    Travel,
    Parking,
    Shoulder,
}

/// Per-mode access being accumulated for one lane.
#[derive(Clone, Debug, Default)]
pub struct AccessBuilder {
    pub foot: Infer<Access>,
    pub bicycle: Infer<Access>,
    pub motor: Infer<Access>,
    pub bus: Infer<Access>,
    pub taxi: Infer<Access>,
    pub psv: Infer<Access>,
}

impl AccessBuilder {
    fn build(self) -> Option<AccessByMode> {
        let access = AccessByMode {
            foot: self.foot.explicit(),
            bicycle: self.bicycle.explicit(),
            motor: self.motor.explicit(),
            bus: self.bus.explicit(),
            taxi: self.taxi.explicit(),
            psv: self.psv.explicit(),
        };
        if access.is_empty() {
            None
        } else {
            Some(access)
        }
    }
}

/// One lane being assembled. Every attribute carries the confidence it was
/// established with, so later schemes can refine without clobbering direct
/// evidence.
#[derive(Clone, Debug, Default)]
pub struct LaneBuilder {
    pub kind: Infer<LaneType>,
    /// Always relative to the way's orientation.
    pub direction: Infer<Direction>,
    pub designated: Infer<Designated>,
    pub orientation: Infer<ParkingOrientation>,
    pub width: Infer<Metre>,
    pub max_speed: Infer<Speed>,
    pub turn: Infer<TurnMarkings>,
    pub access: AccessBuilder,
}

impl LaneBuilder {
    /// A travel lane added by an explicit scheme.
    pub fn travel(direction: Direction, designated: Designated) -> Self {
        Self {
            kind: Infer::Direct(LaneType::Travel),
            direction: Infer::Direct(direction),
            designated: Infer::Direct(designated),
            ..Default::default()
        }
    }

    /// A travel lane assumed from the lane count, open to refinement by
    /// per-lane schemes.
    pub fn seeded(direction: Direction, designated: Designated) -> Self {
        Self {
            kind: Infer::Default(LaneType::Travel),
            direction: Infer::Default(direction),
            designated: Infer::Default(designated),
            ..Default::default()
        }
    }

    pub fn is_travel(&self) -> bool {
        self.kind.as_option() == Some(&LaneType::Travel)
    }

    pub fn is_bicycle(&self) -> bool {
        self.designated.as_option() == Some(&Designated::Bicycle)
    }

    /// Is this a directional motor or bus travel lane, the kind per-lane
    /// `|`-separated schemes index over?
    pub fn is_indexable_travel(&self) -> bool {
        self.is_travel()
            && matches!(
                self.designated.as_option(),
                Some(Designated::Motor | Designated::Bus) | None
            )
            && self.direction.as_option() != Some(&Direction::Both)
    }

    fn build(self) -> Lane {
        match self.kind.some().unwrap_or(LaneType::Travel) {
            LaneType::Travel => {
                let designated = self.designated.some().unwrap_or(Designated::Any);
                let direction = if designated == Designated::Foot {
                    None
                } else {
                    self.direction.some()
                };
                Lane::Travel {
                    direction,
                    designated,
                    width: self.width.explicit(),
                    max_speed: self.max_speed.some(),
                    turn: self.turn.explicit(),
                    access: self.access.build(),
                }
            }
            LaneType::Parking => Lane::Parking {
                direction: self.direction.some().unwrap_or(Direction::Forward),
                designated: self.designated.some().unwrap_or(Designated::Motor),
                orientation: self.orientation.some().unwrap_or(ParkingOrientation::Parallel),
                width: self.width.explicit(),
            },
            LaneType::Shoulder => Lane::Shoulder {
                width: self.width.explicit(),
            },
        }
    }
}

/// The road under assembly: two sides of lanes, each ordered from the median
/// outwards. Left-to-right order only exists once `into_ltr` resolves the
/// driving side.
pub struct RoadBuilder {
    forward: VecDeque<LaneBuilder>,
    backward: VecDeque<LaneBuilder>,
    pub highway: Highway,
    pub oneway: Oneway,
}

impl RoadBuilder {
    /// Seed the motor travel lanes (plus centre turn lane) from the lane
    /// count scheme.
    pub fn seed(
        source: &TagSource,
        highway: Highway,
        oneway: Oneway,
        locale: &Locale,
        _config: &TagsToLanesConfig,
        warnings: &mut Diagnostics,
    ) -> Result<Self, Diagnostic> {
        if highway.kind().is_non_motorized() {
            return Ok(Self::seed_non_motorized(highway, oneway));
        }

        let counts = Counts::new(source, oneway, locale, warnings)?;
        trace!("lane counts: {:?}", counts);

        let road = match counts {
            Counts::One => Self {
                forward: VecDeque::from(vec![LaneBuilder::seeded(
                    Direction::Both,
                    Designated::Motor,
                )]),
                backward: VecDeque::new(),
                highway,
                oneway,
            },
            Counts::Directional {
                forward,
                backward,
                centre_turn_lane,
            } => {
                let mut forward_lanes: VecDeque<LaneBuilder> =
                    iter::repeat_with(|| LaneBuilder::seeded(Direction::Forward, Designated::Motor))
                        .take(forward.some().unwrap_or(0))
                        .collect();
                let backward_lanes: VecDeque<LaneBuilder> = iter::repeat_with(|| {
                    LaneBuilder::seeded(Direction::Backward, Designated::Motor)
                })
                .take(backward.some().unwrap_or(0))
                .collect();
                if centre_turn_lane.some().unwrap_or(false) {
                    forward_lanes
                        .push_front(LaneBuilder::seeded(Direction::Both, Designated::Motor));
                }
                Self {
                    forward: forward_lanes,
                    backward: backward_lanes,
                    highway,
                    oneway,
                }
            }
        };
        Ok(road)
    }

    fn seed_non_motorized(highway: Highway, oneway: Oneway) -> Self {
        let designated = match highway.kind() {
            crate::road::HighwayType::Cycleway => Designated::Bicycle,
            _ => Designated::Foot,
        };
        let direction = if bool::from(oneway) {
            Direction::Forward
        } else {
            Direction::Both
        };
        Self {
            forward: VecDeque::from(vec![LaneBuilder::travel(direction, designated)]),
            backward: VecDeque::new(),
            highway,
            oneway,
        }
    }

    pub fn len(&self) -> usize {
        self.forward.len() + self.backward.len()
    }

    /// Outermost forward lane, at the kerb.
    pub fn forward_outside(&self) -> Option<&LaneBuilder> {
        self.forward.back()
    }

    pub fn backward_outside(&self) -> Option<&LaneBuilder> {
        self.backward.back()
    }

    pub fn push_forward_outside(&mut self, lane: LaneBuilder) {
        self.forward.push_back(lane);
    }

    pub fn push_backward_outside(&mut self, lane: LaneBuilder) {
        self.backward.push_back(lane);
    }

    /// All lanes left to right.
    pub fn lanes_ltr_mut<'s>(
        &'s mut self,
        locale: &Locale,
    ) -> Box<dyn Iterator<Item = &'s mut LaneBuilder> + 's> {
        match locale.driving_side {
            DrivingSide::Right => Box::new(
                self.backward
                    .iter_mut()
                    .rev()
                    .chain(self.forward.iter_mut()),
            ),
            DrivingSide::Left => Box::new(
                self.forward
                    .iter_mut()
                    .rev()
                    .chain(self.backward.iter_mut()),
            ),
        }
    }

    /// Forward-side lanes left to right.
    pub fn forward_ltr_mut<'s>(
        &'s mut self,
        locale: &Locale,
    ) -> Box<dyn Iterator<Item = &'s mut LaneBuilder> + 's> {
        match locale.driving_side {
            DrivingSide::Right => Box::new(self.forward.iter_mut()),
            DrivingSide::Left => Box::new(self.forward.iter_mut().rev()),
        }
    }

    /// Backward-side lanes left to right.
    pub fn backward_ltr_mut<'s>(
        &'s mut self,
        locale: &Locale,
    ) -> Box<dyn Iterator<Item = &'s mut LaneBuilder> + 's> {
        match locale.driving_side {
            DrivingSide::Right => Box::new(self.backward.iter_mut().rev()),
            DrivingSide::Left => Box::new(self.backward.iter_mut()),
        }
    }

    /// Consume the builder into lanes ordered left to right.
    pub fn into_ltr(self, locale: &Locale) -> Vec<Lane> {
        match locale.driving_side {
            DrivingSide::Right => self
                .backward
                .into_iter()
                .rev()
                .chain(self.forward)
                .map(LaneBuilder::build)
                .collect(),
            DrivingSide::Left => self
                .forward
                .into_iter()
                .rev()
                .chain(self.backward)
                .map(LaneBuilder::build)
                .collect(),
        }
    }
}
