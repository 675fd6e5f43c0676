use serde::{Deserialize, Serialize};

use crate::metric::Metre;

/// What a separator between two lanes means, independent of how it is
/// painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Semantic {
    /// Boundary towards a shoulder, sidewalk, or the edge of the pavement.
    Shoulder,
    /// Between same-direction travel lanes.
    Lane,
    /// Between lanes designated for different modes.
    Modal,
    /// Between opposing directions of traffic.
    Centre,
}

/// The ordered markings of a separator, left to right.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Markings(Vec<Marking>);

impl Markings {
    #[must_use]
    pub fn new(markings: Vec<Marking>) -> Self {
        Self(markings)
    }

    /// Total painted width in metres.
    #[must_use]
    pub fn width(&self) -> Metre {
        self.0
            .iter()
            .map(|marking| marking.width.unwrap_or(Marking::DEFAULT_WIDTH))
            .sum()
    }
}

impl std::ops::Deref for Markings {
    type Target = Vec<Marking>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marking {
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Metre>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Marking {
    pub const DEFAULT_WIDTH: Metre = Metre::new(0.2);
    pub const DEFAULT_SPACE: Metre = Metre::new(0.1);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    SolidLine,
    BrokenLine,
    DashedLine,
    DottedLine,
    DoubleSolid,
    GoreChevron,
    DiagonalHatched,
    CrissCross,
    /// The unpainted gap of a double line.
    NoFill,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    Yellow,
    Red,
    Green,
}
