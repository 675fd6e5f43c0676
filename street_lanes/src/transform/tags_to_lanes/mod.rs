//! From an OpenStreetMap way's tags, determine the lanes along the road from
//! left to right.

use osm_tags::{TagSource, Tags};

use crate::locale::Locale;
use crate::road::{Highway, HighwayType, Lane, Lit, Road};
use crate::transform::error::{
    Diagnostic, DiagnosticCode, Diagnostics, RoadError, RoadFromTags,
};
use crate::transform::keys;

mod counts;

pub(crate) mod infer;

pub(crate) mod oneway;
use oneway::OnewayScheme;

pub(crate) mod road;
use road::RoadBuilder;

pub(crate) mod modes;

pub(crate) mod per_lane;

mod separator;

/// Options for `tags_to_lanes`.
#[derive(Clone, Debug)]
pub struct TagsToLanesConfig {
    /// Treat any warning as a failure.
    pub error_on_warnings: bool,
    /// Insert separator elements between lanes.
    pub include_separators: bool,
    /// Add shoulders where the highway class implies them.
    pub include_shoulders: bool,
    /// Apply locale defaults when the tags are silent.
    pub infer_defaults: bool,
}

impl Default for TagsToLanesConfig {
    fn default() -> Self {
        Self {
            error_on_warnings: false,
            include_separators: true,
            include_shoulders: true,
            infer_defaults: true,
        }
    }
}

/// Tag prefixes this transformation understands. Anything else is foreign
/// and passes through untouched.
const RECOGNIZED_SCHEMES: [&str; 24] = [
    "highway",
    "construction",
    "name",
    "lit",
    "oneway",
    "junction",
    "lanes",
    "centre_turn_lane",
    "sidewalk",
    "shoulder",
    "cycleway",
    "busway",
    "parking",
    "access",
    "foot",
    "bicycle",
    "motor_vehicle",
    "vehicle",
    "bus",
    "psv",
    "taxi",
    "turn",
    "width",
    "maxspeed",
];

/// From an OSM way's tags, determine the lanes along the road from left to
/// right.
///
/// # Errors
///
/// Structurally broken input (an unknown highway class, `lanes=0`, a
/// negative width) aborts with a `RoadError` carrying the diagnostics
/// accumulated up to that point. Ambiguous input degrades to a defensible
/// default and a warning instead.
pub fn tags_to_lanes(
    tags: &Tags,
    locale: &Locale,
    config: &TagsToLanesConfig,
) -> Result<RoadFromTags, RoadError> {
    let mut warnings = Diagnostics::default();
    let source = TagSource::new(tags);
    match build_road(&source, locale, config, &mut warnings) {
        Ok(road) => {
            if config.error_on_warnings && !warnings.is_empty() {
                return Err(RoadError::promoted(warnings));
            }
            Ok(RoadFromTags { road, warnings })
        }
        Err(diagnostic) => Err(RoadError::new(diagnostic, warnings)),
    }
}

fn build_road(
    source: &TagSource,
    locale: &Locale,
    config: &TagsToLanesConfig,
    warnings: &mut Diagnostics,
) -> Result<Road, Diagnostic> {
    let highway = highway_scheme(source, warnings)?;
    let name = source.get_consume(keys::NAME).map(str::to_string);
    let lit = lit_scheme(source, warnings);

    // A road under construction has no usable lanes to describe.
    if highway.is_construction() {
        let other_attrs = sweep_unused(source, warnings);
        return Ok(Road {
            name,
            highway,
            lit,
            lanes: vec![Lane::Construction { width: None }],
            other_attrs,
        });
    }

    let oneway = OnewayScheme::from_source(source, warnings);
    let mut road = RoadBuilder::seed(source, highway, oneway.oneway, locale, config, warnings)?;

    if !highway.kind().is_non_motorized() {
        modes::bus(source, locale, &mut road, warnings)?;
        modes::parking(source, locale, &mut road, warnings)?;
        modes::bicycle(source, locale, &mut road, warnings)?;
        modes::foot_and_shoulder(source, locale, &mut road, config, warnings)?;
    }

    per_lane::apply(source, locale, &mut road, warnings)?;

    let mut lanes = road.into_ltr(locale);
    if oneway.reversed {
        reverse_directions(&mut lanes);
    }
    if config.include_separators {
        lanes = separator::insert_separators(lanes, locale);
    }

    let other_attrs = sweep_unused(source, warnings);
    Ok(Road {
        name,
        highway,
        lit,
        lanes,
        other_attrs,
    })
}

fn highway_scheme(
    source: &TagSource,
    warnings: &mut Diagnostics,
) -> Result<Highway, Diagnostic> {
    match source
        .get_consume(keys::HIGHWAY)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        None => Ok(Highway::active(HighwayType::UnknownRoad)),
        Some("construction") => Ok(match source.get_consume(keys::CONSTRUCTION) {
            None => Highway::construction(HighwayType::UnknownRoad),
            Some(v) => match v.to_ascii_lowercase().parse::<HighwayType>() {
                Ok(kind) => Highway::construction(kind),
                Err(_) => {
                    warnings.push(Diagnostic::new(
                        DiagnosticCode::UnknownValue,
                        format!("unknown construction value '{}'", v),
                        source.subset(&[keys::CONSTRUCTION]),
                    ));
                    Highway::construction(HighwayType::UnknownRoad)
                }
            },
        }),
        Some(v) => v.parse::<HighwayType>().map(Highway::active).map_err(|_| {
            Diagnostic::new(
                DiagnosticCode::UnknownHighwayClass,
                format!("unknown highway class '{}'", v),
                source.subset(&[keys::HIGHWAY]),
            )
        }),
    }
}

fn lit_scheme(source: &TagSource, warnings: &mut Diagnostics) -> Option<Lit> {
    let value = source.get_consume(keys::LIT)?;
    match value.to_ascii_lowercase().parse::<Lit>() {
        Ok(lit) => Some(lit),
        Err(_) => {
            warnings.push(Diagnostic::new(
                DiagnosticCode::UnknownValue,
                format!("unknown lit value '{}'", value),
                source.subset(&[keys::LIT]),
            ));
            None
        }
    }
}

/// `oneway=-1` flips every directional lane once the list is final.
fn reverse_directions(lanes: &mut [Lane]) {
    for lane in lanes {
        match lane {
            Lane::Travel { direction, .. } => {
                *direction = direction.map(crate::road::Direction::reverse);
            }
            Lane::Parking { direction, .. } => {
                *direction = direction.reverse();
            }
            _ => {}
        }
    }
}

/// Recognized keys nothing consumed become warnings; foreign keys ride along
/// on the road for round-trip fidelity.
fn sweep_unused(source: &TagSource, warnings: &mut Diagnostics) -> Tags {
    let mut other = Tags::empty();
    for (key, value) in source.unused() {
        let prefix = key.split(':').next().unwrap_or(key);
        if RECOGNIZED_SCHEMES.contains(&prefix) {
            warnings.push(Diagnostic::new(
                DiagnosticCode::UnconsumedKnownTag,
                format!("recognized tag was not used: {}", key),
                Tags::from_pair(key, value),
            ));
        } else if other.checked_insert(key.to_string(), value).is_err() {
            unreachable!("input keys are unique");
        }
    }
    other
}

#[cfg(test)]
mod tests {
    use osm_tags::Tags;

    use super::{tags_to_lanes, TagsToLanesConfig};
    use crate::locale::{DrivingSide, Locale};
    use crate::road::{Designated, Lane, Printable, Road};
    use crate::transform::{DiagnosticCode, Severity};

    static LOG_INIT: std::sync::Once = std::sync::Once::new();

    fn init_logging() {
        LOG_INIT.call_once(|| {
            let _ = env_logger::builder().is_test(true).try_init();
        });
    }

    fn tags(kv: &[&str]) -> Tags {
        Tags::from_pairs(kv.iter().map(|pair| {
            let (k, v) = pair.split_once('=').unwrap();
            [k, v]
        }))
        .unwrap()
    }

    fn lane_chars(road: &Road) -> String {
        road.lanes.iter().map(Printable::as_ascii).collect()
    }

    fn direction_chars(road: &Road) -> String {
        road.lanes
            .iter()
            .map(|lane| lane.direction().map_or(' ', |d| d.as_ascii()))
            .collect()
    }

    #[test]
    fn test_tags_to_lanes_ltr() {
        init_logging();
        let mut ok = true;
        for (name, input, driving_side, expected_lanes, expected_directions) in [
            (
                "https://www.openstreetmap.org/way/428294122",
                vec![
                    "lanes=2",
                    "oneway=yes",
                    "sidewalk=both",
                    "cycleway:left=lane",
                ],
                DrivingSide::Right,
                "sbdds",
                " ^^^ ",
            ),
            (
                "residential with parking and no sidewalks",
                vec![
                    "highway=residential",
                    "lanes=4",
                    "sidewalk=none",
                    "parking:lane:both=parallel",
                ],
                DrivingSide::Right,
                "SpddddpS",
                " vvv^^^ ",
            ),
            (
                "centre turn lane",
                vec!["lanes=3", "centre_turn_lane=yes"],
                DrivingSide::Right,
                "dddd",
                "v|^^",
            ),
            (
                "reversed oneway",
                vec!["oneway=-1", "lanes=2"],
                DrivingSide::Right,
                "dd",
                "vv",
            ),
            (
                "bus lane by per-lane designation",
                vec!["lanes=2", "bus:lanes=designated|no"],
                DrivingSide::Right,
                "Bd",
                "v^",
            ),
            (
                "empty tags default to a two-way road",
                vec![],
                DrivingSide::Right,
                "dd",
                "v^",
            ),
            (
                "left-hand traffic mirrors the defaults",
                vec!["lanes=2", "sidewalk=both"],
                DrivingSide::Left,
                "sdds",
                " ^v ",
            ),
            (
                "https://www.openstreetmap.org/way/8591383",
                vec![
                    "lanes=1",
                    "oneway=yes",
                    "sidewalk=both",
                    "cycleway:left=track",
                    "oneway:bicycle=no",
                ],
                DrivingSide::Right,
                "sbbds",
                " v^^ ",
            ),
            (
                "busway on a oneway",
                vec!["lanes=2", "oneway=yes", "busway=lane"],
                DrivingSide::Right,
                "ddB",
                "^^^",
            ),
            (
                "construction",
                vec!["highway=construction"],
                DrivingSide::Right,
                "x",
                " ",
            ),
            (
                "footway",
                vec!["highway=footway"],
                DrivingSide::Right,
                "s",
                " ",
            ),
        ] {
            let locale = Locale::builder().driving_side(driving_side).build();
            let config = TagsToLanesConfig {
                include_separators: false,
                ..TagsToLanesConfig::default()
            };
            let road = match tags_to_lanes(&tags(&input), &locale, &config) {
                Ok(output) => output.road,
                Err(e) => {
                    println!("For input (example from {}):", name);
                    println!("    error: {}", e);
                    ok = false;
                    continue;
                }
            };
            let actual_lanes = lane_chars(&road);
            let actual_directions = direction_chars(&road);
            if actual_lanes != expected_lanes || actual_directions != expected_directions {
                ok = false;
                println!("For input (example from {}):", name);
                for kv in &input {
                    println!("    {}", kv);
                }
                println!("Got:");
                println!("    {}", actual_lanes);
                println!("    {}", actual_directions);
                println!("Expected:");
                println!("    {}", expected_lanes);
                println!("    {}", expected_directions);
                println!();
            }
        }
        assert!(ok);
    }

    #[test]
    fn test_separator_between_every_pair() {
        init_logging();
        let locale = Locale::builder().driving_side(DrivingSide::Right).build();
        for input in [
            vec!["lanes=2"],
            vec!["lanes=4", "sidewalk=both"],
            vec!["lanes=2", "oneway=yes", "cycleway:left=lane", "sidewalk=both"],
            vec!["lanes=3", "lanes:both_ways=1", "parking:lane:both=parallel"],
        ] {
            let road = tags_to_lanes(&tags(&input), &locale, &TagsToLanesConfig::default())
                .unwrap()
                .road;
            let lanes = &road.lanes;
            for pair in lanes.windows(2) {
                assert!(
                    pair[0].is_separator() != pair[1].is_separator(),
                    "adjacent separators or missing separator in {:?} for {:?}",
                    lanes,
                    input,
                );
            }
        }
    }

    #[test]
    fn test_two_way_default_centre_marking() {
        // The simplest two-way road gets a single centre line, not the
        // double-solid form of wider roads.
        let locale = Locale::builder().build();
        let road = tags_to_lanes(&tags(&["lanes=2"]), &locale, &TagsToLanesConfig::default())
            .unwrap()
            .road;
        match &road.lanes[1] {
            Lane::Separator { markings, .. } => assert_eq!(markings.len(), 1),
            other => panic!("unexpected lane {:?}", other),
        }
        let road = tags_to_lanes(&tags(&["lanes=4"]), &locale, &TagsToLanesConfig::default())
            .unwrap()
            .road;
        match &road.lanes[3] {
            Lane::Separator { markings, .. } => assert_eq!(markings.len(), 3),
            other => panic!("unexpected lane {:?}", other),
        }
    }

    #[test]
    fn test_no_separators_when_disabled() {
        let locale = Locale::builder().build();
        let config = TagsToLanesConfig {
            include_separators: false,
            ..TagsToLanesConfig::default()
        };
        let road = tags_to_lanes(&tags(&["lanes=2"]), &locale, &config)
            .unwrap()
            .road;
        assert!(!road.has_separators());
    }

    #[test]
    fn test_lane_count_invariant() {
        init_logging();
        let locale = Locale::builder().build();
        for (input, count) in [
            (vec!["lanes=2"], 2),
            (vec!["lanes=5", "sidewalk=both"], 5),
            (vec!["lanes=2", "oneway=yes", "cycleway:left=lane"], 2),
        ] {
            let road = tags_to_lanes(&tags(&input), &locale, &TagsToLanesConfig::default())
                .unwrap()
                .road;
            let motor = road.lanes.iter().filter(|lane| lane.is_motor()).count();
            assert_eq!(motor, count, "for {:?}", input);
        }
    }

    #[test]
    fn test_malformed_lane_count() {
        let locale = Locale::builder().build();
        let err = tags_to_lanes(
            &tags(&["lanes=0"]),
            &locale,
            &TagsToLanesConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.diagnostic.code, DiagnosticCode::MalformedLaneCount);
        assert_eq!(err.diagnostic.severity(), Severity::Error);

        let err = tags_to_lanes(
            &tags(&["lanes=three"]),
            &locale,
            &TagsToLanesConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.diagnostic.code, DiagnosticCode::MalformedLaneCount);
    }

    #[test]
    fn test_negative_width_aborts() {
        let locale = Locale::builder().build();
        let err = tags_to_lanes(
            &tags(&["lanes=1", "width=-1"]),
            &locale,
            &TagsToLanesConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.diagnostic.code, DiagnosticCode::NegativeWidth);
    }

    #[test]
    fn test_unknown_highway_class() {
        let locale = Locale::builder().build();
        let err = tags_to_lanes(
            &tags(&["highway=spaceway"]),
            &locale,
            &TagsToLanesConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.diagnostic.code, DiagnosticCode::UnknownHighwayClass);
    }

    #[test]
    fn test_inconsistent_oneway_warns() {
        let locale = Locale::builder().build();
        let output = tags_to_lanes(
            &tags(&["oneway=yes", "lanes=2", "lanes:backward=1"]),
            &locale,
            &TagsToLanesConfig::default(),
        )
        .unwrap();
        assert!(output
            .warnings
            .iter()
            .any(|d| d.code == DiagnosticCode::InconsistentOneway));
    }

    #[test]
    fn test_error_on_warnings_promotes() {
        let locale = Locale::builder().build();
        let config = TagsToLanesConfig {
            error_on_warnings: true,
            ..TagsToLanesConfig::default()
        };
        assert!(tags_to_lanes(
            &tags(&["oneway=yes", "lanes=2", "lanes:backward=1"]),
            &locale,
            &config,
        )
        .is_err());
    }

    #[test]
    fn test_construction_warns_on_leftover_lane_tags() {
        let locale = Locale::builder().build();
        let output = tags_to_lanes(
            &tags(&["highway=construction", "lanes=2"]),
            &locale,
            &TagsToLanesConfig::default(),
        )
        .unwrap();
        assert!(matches!(
            output.road.lanes.as_slice(),
            [Lane::Construction { .. }]
        ));
        assert!(output
            .warnings
            .iter()
            .any(|d| d.code == DiagnosticCode::UnconsumedKnownTag));
    }

    #[test]
    fn test_foreign_tags_pass_through() {
        let locale = Locale::builder().build();
        let output = tags_to_lanes(
            &tags(&["lanes=2", "surface=asphalt"]),
            &locale,
            &TagsToLanesConfig::default(),
        )
        .unwrap();
        assert_eq!(output.road.other_attrs.get("surface"), Some("asphalt"));
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_mirror_symmetry() {
        init_logging();
        // Side-symmetric tags produce mirror-image roads in mirrored
        // locales: the same lanes, right to left. Directions are relative to
        // the way and unaffected by mirroring.
        for input in [
            vec!["lanes=2", "sidewalk=both"],
            vec!["lanes=3", "sidewalk=both"],
            vec!["lanes=4", "cycleway:both=lane", "sidewalk=both"],
        ] {
            let right = Locale::builder().driving_side(DrivingSide::Right).build();
            let left = Locale::builder().driving_side(DrivingSide::Left).build();
            let config = TagsToLanesConfig {
                include_separators: false,
                ..TagsToLanesConfig::default()
            };
            let rht = tags_to_lanes(&tags(&input), &right, &config).unwrap().road;
            let lht = tags_to_lanes(&tags(&input), &left, &config).unwrap().road;
            let mirrored: Vec<Lane> = lht.lanes.iter().rev().cloned().collect();
            assert_eq!(rht.lanes, mirrored, "for {:?}", input);
        }
    }

    #[test]
    fn test_idempotent() {
        let locale = Locale::builder().build();
        let input = tags(&["lanes=2", "sidewalk=both", "cycleway:left=lane"]);
        let first = tags_to_lanes(&input, &locale, &TagsToLanesConfig::default()).unwrap();
        let second = tags_to_lanes(&input, &locale, &TagsToLanesConfig::default()).unwrap();
        assert_eq!(first.road, second.road);
    }

    #[test]
    fn test_bus_designation() {
        let locale = Locale::builder().build();
        let output = tags_to_lanes(
            &tags(&["lanes=2", "bus:lanes=designated|no"]),
            &locale,
            &TagsToLanesConfig {
                include_separators: false,
                ..TagsToLanesConfig::default()
            },
        )
        .unwrap();
        match &output.road.lanes[0] {
            Lane::Travel { designated, .. } => assert_eq!(*designated, Designated::Bus),
            other => panic!("unexpected lane {:?}", other),
        }
    }
}
