//! Transform the tags of an OpenStreetMap way into an ordered left-to-right
//! cross-section of lanes, and project lanes back to a minimal tag set.
//!
//! OSM describes a road segment with overlapping, redundant, and sometimes
//! mutually inconsistent tagging schemes: counted lanes, side-keyed modal
//! lanes, per-lane `|`-separated strings, locale-dependent defaults. The
//! transformation here reconciles them into one canonical lane list, from
//! the leftmost edge of the road to the rightmost, with separators and
//! structured diagnostics.
//!
//! The transformation is a pure function of `(Tags, Locale, Config)`.
//! Fetching ways and geocoding a coordinate to a `Locale` happen upstream.

#[macro_use]
extern crate log;

pub mod locale;
pub mod metric;
pub mod road;
pub mod transform;

pub use crate::locale::{Country, DrivingSide, Locale};
pub use crate::metric::{Metre, Speed};
pub use crate::road::{Lane, Road};
pub use crate::transform::{
    lanes_to_tags, tags_to_lanes, Diagnostic, DiagnosticCode, Diagnostics, LanesToTagsConfig,
    RoadError, RoadFromTags, Severity, TagsFromLanes, TagsToLanesConfig,
};

#[cfg(test)]
mod tests {
    use crate::metric::{Metre, Speed};
    use crate::road::{
        Color, Designated, Direction, Lane, Marking, Markings, Semantic, Style,
    };

    #[test]
    fn test_travel_lane_wire_format() {
        let lane = Lane::Travel {
            direction: Some(Direction::Backward),
            designated: Designated::Motor,
            width: Some(Metre::new(3.5)),
            max_speed: Some(Speed::Mph(25.0)),
            turn: None,
            access: None,
        };
        assert_eq!(
            serde_json::to_string(&lane).unwrap(),
            r#"{"type":"travel","direction":"backward","designated":"motor_vehicle","width":3.5,"max_speed":{"unit":"mph","value":25.0}}"#
        );
        let back: Lane = serde_json::from_str(&serde_json::to_string(&lane).unwrap()).unwrap();
        assert_eq!(back, lane);
    }

    #[test]
    fn test_separator_wire_format() {
        let lane = Lane::Separator {
            semantic: Semantic::Centre,
            markings: Markings::new(vec![
                Marking {
                    style: Style::SolidLine,
                    width: Some(Metre::new(0.2)),
                    color: Some(Color::White),
                },
                Marking {
                    style: Style::NoFill,
                    width: Some(Metre::new(0.1)),
                    color: None,
                },
                Marking {
                    style: Style::SolidLine,
                    width: Some(Metre::new(0.2)),
                    color: Some(Color::White),
                },
            ]),
        };
        assert_eq!(
            serde_json::to_string(&lane).unwrap(),
            r#"{"type":"separator","semantic":"centre","markings":[{"style":"solid_line","width":0.2,"color":"white"},{"style":"no_fill","width":0.1},{"style":"solid_line","width":0.2,"color":"white"}]}"#
        );
    }

    #[test]
    fn test_shoulder_wire_format() {
        assert_eq!(
            serde_json::to_string(&Lane::Shoulder { width: None }).unwrap(),
            r#"{"type":"shoulder"}"#
        );
    }
}
