//! The two transformations: OSM tags to a left-to-right lane list, and the
//! inverse projection back to a minimal tag set.

use osm_tags::TagKey;

use crate::locale::DrivingSide;

mod error;
pub use error::{
    Diagnostic, DiagnosticCode, Diagnostics, RoadError, RoadFromTags, Severity, TagsFromLanes,
};

mod tags_to_lanes;
pub use tags_to_lanes::{tags_to_lanes, TagsToLanesConfig};

mod lanes_to_tags;
pub use lanes_to_tags::{lanes_to_tags, LanesToTagsConfig};

pub(crate) mod keys {
    use osm_tags::TagKey;

    pub const HIGHWAY: TagKey = TagKey::from_static("highway");
    pub const CONSTRUCTION: TagKey = TagKey::from_static("construction");
    pub const NAME: TagKey = TagKey::from_static("name");
    pub const LIT: TagKey = TagKey::from_static("lit");
    pub const ONEWAY: TagKey = TagKey::from_static("oneway");
    pub const JUNCTION: TagKey = TagKey::from_static("junction");
    pub const LANES: TagKey = TagKey::from_static("lanes");
    pub const CENTRE_TURN_LANE: TagKey = TagKey::from_static("centre_turn_lane");
    pub const SIDEWALK: TagKey = TagKey::from_static("sidewalk");
    pub const SHOULDER: TagKey = TagKey::from_static("shoulder");
    pub const CYCLEWAY: TagKey = TagKey::from_static("cycleway");
    pub const BUSWAY: TagKey = TagKey::from_static("busway");
    pub const MAXSPEED: TagKey = TagKey::from_static("maxspeed");
    pub const WIDTH: TagKey = TagKey::from_static("width");
}

impl DrivingSide {
    /// The key segment for this side: forward traffic keeps to the driving
    /// side, so in right-hand traffic `cycleway:right` is the forward side.
    pub(crate) fn tag(self) -> TagKey {
        match self {
            Self::Right => TagKey::from_static("right"),
            Self::Left => TagKey::from_static("left"),
        }
    }
}
