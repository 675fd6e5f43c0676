//! The output data model: a road as an ordered left-to-right sequence of
//! lanes, plus the road-level attributes that don't belong to any one lane.

use osm_tags::Tags;
use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::metric::Metre;

mod highway;
pub use highway::{Highway, HighwayImportance, HighwayType, Lit};

mod lane;
pub use lane::{
    Access, AccessByMode, Designated, Direction, Lane, ParkingOrientation, Printable, TurnMarking,
    TurnMarkings,
};

mod marking;
pub use marking::{Color, Marking, Markings, Semantic, Style};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Road {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub highway: Highway,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lit: Option<Lit>,

    /// Leftmost lane first.
    pub lanes: Vec<Lane>,

    /// Input tags outside the recognized schemes, passed through for
    /// round-trip fidelity.
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub other_attrs: Tags,
}

impl Road {
    #[must_use]
    pub fn has_separators(&self) -> bool {
        self.lanes.iter().any(Lane::is_separator)
    }

    /// Total width in metres, locale defaults filling unknown lane widths.
    #[must_use]
    pub fn width(&self, locale: &Locale) -> Metre {
        self.lanes
            .iter()
            .map(|lane| lane.width(locale, self.highway.kind()))
            .sum()
    }
}
