//! The `|`-separated per-lane schemes: modal overrides, turn markings,
//! widths, speeds, and access. An entry applies to the matching travel lane;
//! missing entries leave lanes untouched, excess entries are reported.

use osm_tags::{TagSource, Tags};

use super::infer::{Infer, InferConflict};
use super::road::{LaneBuilder, LaneType, RoadBuilder};
use crate::locale::Locale;
use crate::metric::{Metre, Speed, WidthError};
use crate::road::{Access, Designated, Direction, TurnMarking, TurnMarkings};
use crate::transform::error::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::transform::keys;

/// How a per-lane scheme counts lanes: across the whole road from the left,
/// or along one side of it.
#[derive(Clone, Copy, Debug)]
pub enum Indexed {
    LeftToRight,
    Forward,
    Backward,
}

const SUFFIXES: [(&str, Indexed); 3] = [
    ("", Indexed::LeftToRight),
    (":forward", Indexed::Forward),
    (":backward", Indexed::Backward),
];

fn indexed_lanes<'r>(
    road: &'r mut RoadBuilder,
    indexed: Indexed,
    locale: &Locale,
) -> Vec<&'r mut LaneBuilder> {
    let lanes: Box<dyn Iterator<Item = &mut LaneBuilder>> = match indexed {
        Indexed::LeftToRight => road.lanes_ltr_mut(locale),
        Indexed::Forward => road.forward_ltr_mut(locale),
        Indexed::Backward => road.backward_ltr_mut(locale),
    };
    lanes.filter(|lane| lane.is_indexable_travel()).collect()
}

fn note_conflict(
    result: Result<(), InferConflict>,
    key: &str,
    source: &TagSource,
    warnings: &mut Diagnostics,
) {
    if result.is_err() {
        warnings.push(Diagnostic::new(
            DiagnosticCode::TagConflict,
            format!("conflicting values for {}", key),
            source.subset(&[key]),
        ));
    }
}

fn note_length_mismatch(
    entries: usize,
    lanes: usize,
    key: &str,
    source: &TagSource,
    warnings: &mut Diagnostics,
) {
    if entries > lanes {
        warnings.push(Diagnostic::new(
            DiagnosticCode::LaneCountMismatch,
            format!("{} lists {} lanes, the road has {}", key, entries, lanes),
            source.subset(&[key]),
        ));
    }
}

/// Apply a modal `<mode>:lanes` value: `designated` switches the lane's
/// designation, access values land on the per-mode access.
pub fn apply_designated_overrides(
    source: &TagSource,
    value: &str,
    key: &str,
    designated: Designated,
    indexed: Indexed,
    locale: &Locale,
    road: &mut RoadBuilder,
    warnings: &mut Diagnostics,
) {
    let entries: Vec<&str> = value.split('|').collect();
    let entry_count = entries.len();
    let mut lanes = indexed_lanes(road, indexed, locale);
    note_length_mismatch(entry_count, lanes.len(), key, source, warnings);
    for (lane, entry) in lanes.iter_mut().zip(entries.iter()) {
        match entry.trim().to_ascii_lowercase().as_str() {
            "designated" => {
                let result = lane.designated.set(Infer::Direct(designated));
                note_conflict(result, key, source, warnings);
            }
            "" => {}
            v => match v.parse::<Access>() {
                Ok(access) => {
                    let field = match designated {
                        Designated::Psv => &mut lane.access.psv,
                        _ => &mut lane.access.bus,
                    };
                    let result = field.set(Infer::Direct(access));
                    note_conflict(result, key, source, warnings);
                }
                Err(_) => warnings.push(Diagnostic::new(
                    DiagnosticCode::UnknownValue,
                    format!("unknown {} value '{}'", key, v),
                    Tags::from_pair(key, value),
                )),
            },
        }
    }
}

/// Apply the turn, width, speed, and access schemes once the cross-section
/// is fully assembled.
pub fn apply(
    source: &TagSource,
    locale: &Locale,
    road: &mut RoadBuilder,
    warnings: &mut Diagnostics,
) -> Result<(), Diagnostic> {
    apply_turns(source, locale, road, warnings);
    apply_widths(source, locale, road, warnings)?;
    apply_speeds(source, locale, road, warnings)?;
    apply_access(source, locale, road, warnings);
    Ok(())
}

fn apply_turns(
    source: &TagSource,
    locale: &Locale,
    road: &mut RoadBuilder,
    warnings: &mut Diagnostics,
) {
    for (suffix, indexed) in SUFFIXES {
        let key = format!("turn:lanes{}", suffix);
        let value = match source.get_consume(&key) {
            Some(value) => value,
            None => continue,
        };
        let entries: Vec<&str> = value.split('|').collect();
        let entry_count = entries.len();
        let mut lanes = indexed_lanes(road, indexed, locale);
        note_length_mismatch(entry_count, lanes.len(), &key, source, warnings);
        for (lane, entry) in lanes.iter_mut().zip(entries.iter()) {
            let entry = entry.trim();
            if entry.is_empty() || entry.eq_ignore_ascii_case("none") {
                continue;
            }
            let mut markings = Vec::new();
            for part in entry.split(';') {
                match part.trim().to_ascii_lowercase().parse::<TurnMarking>() {
                    Ok(marking) => markings.push(marking),
                    Err(_) => warnings.push(Diagnostic::new(
                        DiagnosticCode::UnknownValue,
                        format!("unknown turn value '{}'", part),
                        source.subset(&[key.as_str()]),
                    )),
                }
            }
            let result = lane.turn.set(Infer::Direct(TurnMarkings::new(markings)));
            note_conflict(result, &key, source, warnings);
        }
    }
}

pub(super) fn parse_width(
    value: &str,
    key: &str,
    source: &TagSource,
) -> Result<Option<Metre>, Diagnostic> {
    match value.parse::<Metre>() {
        Ok(width) => Ok(Some(width)),
        Err(WidthError::Empty) => Ok(None),
        Err(WidthError::Negative) => Err(Diagnostic::new(
            DiagnosticCode::NegativeWidth,
            format!("{} is negative", key),
            source.subset(&[key]),
        )),
        Err(e) => Err(Diagnostic::new(
            DiagnosticCode::UnitParseFailure,
            format!("cannot parse {}: {}", key, e),
            source.subset(&[key]),
        )),
    }
}

fn apply_widths(
    source: &TagSource,
    locale: &Locale,
    road: &mut RoadBuilder,
    warnings: &mut Diagnostics,
) -> Result<(), Diagnostic> {
    // A bare width= describes the whole carriageway; it only maps onto a
    // lane when there is exactly one travel lane.
    if let Some(value) = source.get_consume(keys::WIDTH) {
        if let Some(width) = parse_width(value, "width", source)? {
            let mut travel: Vec<&mut LaneBuilder> = road
                .lanes_ltr_mut(locale)
                .filter(|lane| lane.is_travel())
                .collect();
            if let [lane] = travel.as_mut_slice() {
                let result = lane.width.set(Infer::Direct(width));
                note_conflict(result, "width", source, warnings);
            }
        }
    }

    for (suffix, indexed) in SUFFIXES {
        let key = format!("width:lanes{}", suffix);
        let value = match source.get_consume(&key) {
            Some(value) => value,
            None => continue,
        };
        let entries: Vec<&str> = value.split('|').collect();
        let entry_count = entries.len();
        let mut lanes = indexed_lanes(road, indexed, locale);
        note_length_mismatch(entry_count, lanes.len(), &key, source, warnings);
        for (lane, entry) in lanes.iter_mut().zip(entries.iter()) {
            if let Some(width) = parse_width(entry.trim(), &key, source)? {
                let result = lane.width.set(Infer::Direct(width));
                note_conflict(result, &key, source, warnings);
            }
        }
    }

    if let Some(value) = source.get_consume("sidewalk:width") {
        if let Some(width) = parse_width(value, "sidewalk:width", source)? {
            for lane in road.lanes_ltr_mut(locale) {
                if lane.is_travel() && lane.designated.as_option() == Some(&Designated::Foot) {
                    let result = lane.width.set(Infer::Direct(width));
                    note_conflict(result, "sidewalk:width", source, warnings);
                }
            }
        }
    }
    Ok(())
}

fn parse_speed(value: &str, key: &str, source: &TagSource) -> Result<Speed, Diagnostic> {
    value.parse::<Speed>().map_err(|e| {
        Diagnostic::new(
            DiagnosticCode::UnitParseFailure,
            format!("cannot parse {}: {}", key, e),
            source.subset(&[key]),
        )
    })
}

fn apply_speeds(
    source: &TagSource,
    locale: &Locale,
    road: &mut RoadBuilder,
    warnings: &mut Diagnostics,
) -> Result<(), Diagnostic> {
    let base = match source.get_consume(keys::MAXSPEED) {
        Some(value) => Some(parse_speed(value, "maxspeed", source)?),
        None => None,
    };
    let forward = match source.get_consume(keys::MAXSPEED + "forward") {
        Some(value) => Some(parse_speed(value, "maxspeed:forward", source)?),
        None => None,
    };
    let backward = match source.get_consume(keys::MAXSPEED + "backward") {
        Some(value) => Some(parse_speed(value, "maxspeed:backward", source)?),
        None => None,
    };

    for lane in road.lanes_ltr_mut(locale) {
        if lane.kind.as_option() != Some(&LaneType::Travel)
            || lane.designated.as_option() == Some(&Designated::Foot)
            || lane.designated.as_option() == Some(&Designated::Bicycle)
        {
            continue;
        }
        let speed = match lane.direction.as_option() {
            Some(Direction::Forward) => forward.or(base),
            Some(Direction::Backward) => backward.or(base),
            Some(Direction::Both) | None => base,
        };
        if let Some(speed) = speed {
            let result = lane.max_speed.set(Infer::Direct(speed));
            note_conflict(result, "maxspeed", source, warnings);
        }
    }

    for (suffix, indexed) in SUFFIXES {
        let key = format!("maxspeed:lanes{}", suffix);
        let value = match source.get_consume(&key) {
            Some(value) => value,
            None => continue,
        };
        let entries: Vec<&str> = value.split('|').collect();
        let entry_count = entries.len();
        let mut lanes = indexed_lanes(road, indexed, locale);
        note_length_mismatch(entry_count, lanes.len(), &key, source, warnings);
        for (lane, entry) in lanes.iter_mut().zip(entries.iter()) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.parse::<Speed>() {
                Ok(speed) => {
                    let result = lane.max_speed.set(Infer::Direct(speed));
                    note_conflict(result, &key, source, warnings);
                }
                Err(e) => warnings.push(Diagnostic::new(
                    DiagnosticCode::UnknownValue,
                    format!("cannot parse {} entry '{}': {}", key, entry, e),
                    source.subset(&[key.as_str()]),
                )),
            }
        }
    }
    Ok(())
}

fn access_field<'l>(lane: &'l mut LaneBuilder, mode: &str) -> &'l mut Infer<Access> {
    match mode {
        "foot" => &mut lane.access.foot,
        "bicycle" => &mut lane.access.bicycle,
        "bus" => &mut lane.access.bus,
        "taxi" => &mut lane.access.taxi,
        "psv" => &mut lane.access.psv,
        // access= and vehicle= fall through to motor vehicles.
        _ => &mut lane.access.motor,
    }
}

fn apply_access(
    source: &TagSource,
    locale: &Locale,
    road: &mut RoadBuilder,
    warnings: &mut Diagnostics,
) {
    // Road-wide access applies to every travel lane.
    for mode in [
        "access",
        "foot",
        "bicycle",
        "motor_vehicle",
        "vehicle",
        "bus",
        "psv",
        "taxi",
    ] {
        let value = match source.get_consume(mode) {
            Some(value) => value,
            None => continue,
        };
        match value.to_ascii_lowercase().parse::<Access>() {
            Ok(access) => {
                // The blanket access= loses to a mode-specific key.
                let inferred = if mode == "access" {
                    Infer::Calculated(access)
                } else {
                    Infer::Direct(access)
                };
                for lane in road.lanes_ltr_mut(locale) {
                    if lane.is_travel() {
                        let result = access_field(lane, mode).set(inferred.clone());
                        note_conflict(result, mode, source, warnings);
                    }
                }
            }
            Err(_) => warnings.push(Diagnostic::new(
                DiagnosticCode::UnknownValue,
                format!("unknown {} value '{}'", mode, value),
                source.subset(&[mode]),
            )),
        }
    }

    // Per-lane access; bicycle:lanes=designated also switches the lane over.
    for mode in ["bicycle", "vehicle", "motor_vehicle", "foot", "taxi"] {
        for (suffix, indexed) in SUFFIXES {
            let key = format!("{}:lanes{}", mode, suffix);
            let value = match source.get_consume(&key) {
                Some(value) => value,
                None => continue,
            };
            let entries: Vec<&str> = value.split('|').collect();
            let entry_count = entries.len();
            let mut lanes = indexed_lanes(road, indexed, locale);
            note_length_mismatch(entry_count, lanes.len(), &key, source, warnings);
            for (lane, entry) in lanes.iter_mut().zip(entries.iter()) {
                match entry.trim().to_ascii_lowercase().as_str() {
                    "" => {}
                    "designated" if mode == "bicycle" => {
                        let result = lane.designated.set(Infer::Direct(Designated::Bicycle));
                        note_conflict(result, &key, source, warnings);
                    }
                    v => match v.parse::<Access>() {
                        Ok(access) => {
                            let result = access_field(lane, mode).set(Infer::Direct(access));
                            note_conflict(result, &key, source, warnings);
                        }
                        Err(_) => warnings.push(Diagnostic::new(
                            DiagnosticCode::UnknownValue,
                            format!("unknown {} value '{}'", key, v),
                            source.subset(&[key.as_str()]),
                        )),
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use osm_tags::{TagSource, Tags};

    use super::{apply, indexed_lanes, Indexed};
    use crate::locale::{DrivingSide, Locale};
    use crate::road::{Designated, Direction, Highway, HighwayType, TurnMarking};
    use crate::transform::tags_to_lanes::oneway::Oneway;
    use crate::transform::tags_to_lanes::road::RoadBuilder;
    use crate::transform::tags_to_lanes::TagsToLanesConfig;
    use crate::transform::Diagnostics;

    fn two_way_road(tags: &Tags, locale: &Locale) -> (RoadBuilder, Diagnostics) {
        let source = TagSource::new(tags);
        let mut warnings = Diagnostics::default();
        let road = RoadBuilder::seed(
            &source,
            Highway::active(HighwayType::Residential),
            Oneway::No,
            locale,
            &TagsToLanesConfig::default(),
            &mut warnings,
        )
        .unwrap();
        (road, warnings)
    }

    #[test]
    fn test_indexing_skips_centre_lane() {
        let locale = Locale::builder().driving_side(DrivingSide::Right).build();
        let tags = Tags::from_pairs([["lanes", "3"], ["lanes:both_ways", "1"]]).unwrap();
        let (mut road, _) = two_way_road(&tags, &locale);
        assert_eq!(road.len(), 3);
        let lanes = indexed_lanes(&mut road, Indexed::LeftToRight, &locale);
        assert_eq!(lanes.len(), 2);
    }

    #[test]
    fn test_turn_lanes() {
        let locale = Locale::builder().driving_side(DrivingSide::Right).build();
        let tags = Tags::from_pairs([
            ["lanes", "2"],
            ["turn:lanes:forward", "left;through"],
            ["turn:lanes:backward", "none"],
        ])
        .unwrap();
        let source = TagSource::new(&tags);
        let (mut road, mut warnings) = two_way_road(&tags, &locale);
        apply(&source, &locale, &mut road, &mut warnings).unwrap();
        let lanes = road.into_ltr(&locale);
        match &lanes[1] {
            crate::road::Lane::Travel {
                direction: Some(Direction::Forward),
                designated: Designated::Motor,
                turn: Some(turn),
                ..
            } => {
                assert_eq!(**turn, vec![TurnMarking::Left, TurnMarking::Through]);
            }
            other => panic!("unexpected lane {:?}", other),
        }
        match &lanes[0] {
            crate::road::Lane::Travel { turn: None, .. } => {}
            other => panic!("unexpected lane {:?}", other),
        }
    }

    #[test]
    fn test_excess_entries_warn() {
        let locale = Locale::builder().driving_side(DrivingSide::Right).build();
        let tags = Tags::from_pairs([["lanes", "2"], ["turn:lanes", "left|through|right"]]).unwrap();
        let source = TagSource::new(&tags);
        let (mut road, mut warnings) = two_way_road(&tags, &locale);
        apply(&source, &locale, &mut road, &mut warnings).unwrap();
        assert!(warnings
            .iter()
            .any(|d| d.code == crate::transform::DiagnosticCode::LaneCountMismatch));
    }

    #[test]
    fn test_negative_width_is_an_error() {
        let locale = Locale::builder().driving_side(DrivingSide::Right).build();
        let tags = Tags::from_pairs([["lanes", "1"], ["width", "-1"]]).unwrap();
        let source = TagSource::new(&tags);
        let (mut road, mut warnings) = two_way_road(&tags, &locale);
        let result = apply(&source, &locale, &mut road, &mut warnings);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().code,
            crate::transform::DiagnosticCode::NegativeWidth
        );
    }
}
