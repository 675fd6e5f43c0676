//! Project a road back to a minimal set of OSM tags that reproduces it.

use osm_tags::{TagKey, Tags};

use crate::locale::{DrivingSide, Locale};
use crate::metric::Speed;
use crate::road::{Access, Designated, Direction, Lane, Road};
use crate::transform::error::{
    Diagnostic, DiagnosticCode, Diagnostics, RoadError, TagsFromLanes,
};
use crate::transform::tags_to_lanes::{tags_to_lanes, TagsToLanesConfig};

/// Options for `lanes_to_tags`.
#[derive(Clone, Debug)]
pub struct LanesToTagsConfig {
    /// Re-parse the produced tags and warn when they don't reproduce the
    /// road.
    pub check_roundtrip: bool,
}

impl Default for LanesToTagsConfig {
    fn default() -> Self {
        Self {
            check_roundtrip: true,
        }
    }
}

/// Convert a road back to tags. The inverse of `tags_to_lanes`: re-parsing
/// the result reproduces the road up to locale-filled defaults.
///
/// # Errors
///
/// Only internal failures abort; a road the tag schemes cannot fully express
/// degrades to the closest tag set plus warnings.
pub fn lanes_to_tags(
    road: &Road,
    locale: &Locale,
    config: &LanesToTagsConfig,
) -> Result<TagsFromLanes, RoadError> {
    let mut warnings = Diagnostics::default();
    match project(road, locale, config, &mut warnings) {
        Ok(tags) => Ok(TagsFromLanes { tags, warnings }),
        Err(diagnostic) => Err(RoadError::new(diagnostic, warnings)),
    }
}

fn insert(
    tags: &mut Tags,
    key: impl Into<TagKey>,
    value: impl Into<String>,
) -> Result<(), Diagnostic> {
    tags.checked_insert(key, value)
        .map_err(|e| Diagnostic::new(DiagnosticCode::Internal, e.to_string(), Tags::empty()))
}

fn project(
    road: &Road,
    locale: &Locale,
    config: &LanesToTagsConfig,
    warnings: &mut Diagnostics,
) -> Result<Tags, Diagnostic> {
    let mut tags = Tags::empty();
    insert(&mut tags, "highway", road.highway.to_string())?;
    if road.highway.is_construction() {
        if road.highway.kind() != crate::road::HighwayType::UnknownRoad {
            insert(&mut tags, "construction", road.highway.kind().to_string())?;
        }
        finish(&mut tags, road)?;
        return Ok(tags);
    }

    // Separators carry no tags of their own.
    let lanes: Vec<&Lane> = road.lanes.iter().filter(|lane| !lane.is_separator()).collect();

    if !lanes.iter().any(|lane| lane.is_motor() || lane.is_bus()) {
        let directional: Vec<&&Lane> = lanes
            .iter()
            .filter(|lane| lane.direction().is_some())
            .collect();
        if !directional.is_empty()
            && directional
                .iter()
                .all(|lane| lane.direction() == Some(Direction::Forward))
        {
            insert(&mut tags, "oneway", "yes")?;
        }
        finish(&mut tags, road)?;
        return Ok(tags);
    }

    let busway = plan_busway(&lanes);
    set_lanes(&lanes, &busway, &mut tags)?;
    let oneway = set_oneway(&lanes, &busway, &mut tags)?;
    set_shoulder(&lanes, &mut tags)?;
    set_sidewalk(&lanes, &mut tags)?;
    set_parking(&lanes, &mut tags)?;
    set_cycleway(&lanes, &mut tags, oneway, locale)?;
    set_busway(&lanes, &busway, &mut tags, oneway)?;
    set_turns(&lanes, &mut tags, oneway)?;
    set_widths(&lanes, &mut tags, oneway)?;
    set_max_speed(&lanes, &mut tags, oneway, warnings)?;
    set_access(&lanes, &mut tags, warnings)?;
    finish(&mut tags, road)?;

    check_roundtrip(config, &tags, locale, road, warnings);
    Ok(tags)
}

fn finish(tags: &mut Tags, road: &Road) -> Result<(), Diagnostic> {
    if let Some(name) = &road.name {
        insert(tags, "name", name.clone())?;
    }
    if let Some(lit) = road.lit {
        insert(tags, "lit", lit.as_str())?;
    }
    for (key, value) in road.other_attrs.iter() {
        insert(tags, key.to_string(), value)?;
    }
    Ok(())
}

fn is_roadway(lane: &Lane) -> bool {
    lane.is_motor() || lane.is_bus()
}

/// The directional motor and bus lanes, left to right, matching the lanes
/// the `|`-separated schemes index over.
fn indexable<'l>(lanes: &[&'l Lane]) -> Vec<&'l Lane> {
    lanes
        .iter()
        .filter(|lane| is_roadway(lane) && lane.direction() != Some(Direction::Both))
        .copied()
        .collect()
}

/// How bus lanes will be tagged: the `busway=` scheme describes lanes in
/// addition to the `lanes=` count, the per-lane form describes converted
/// lanes within it.
struct BuswayEmission {
    left: bool,
    right: bool,
    bar: bool,
}

fn plan_busway(lanes: &[&Lane]) -> BuswayEmission {
    let roadway: Vec<&Lane> = lanes.iter().filter(|lane| is_roadway(lane)).copied().collect();
    if !roadway.iter().any(|lane| lane.is_bus()) || roadway.len() == 1 {
        return BuswayEmission {
            left: false,
            right: false,
            bar: roadway.len() == 1 && roadway[0].is_bus(),
        };
    }
    let inner_bus = roadway
        .iter()
        .enumerate()
        .any(|(i, lane)| lane.is_bus() && i != 0 && i != roadway.len() - 1);
    if inner_bus {
        BuswayEmission {
            left: false,
            right: false,
            bar: true,
        }
    } else {
        BuswayEmission {
            left: roadway.first().map_or(false, |lane| lane.is_bus()),
            right: roadway.last().map_or(false, |lane| lane.is_bus()),
            bar: false,
        }
    }
}

impl BuswayEmission {
    /// The roadway lanes `lanes=` counts: bus lanes tagged with `busway=`
    /// are extra.
    fn counted<'l>(&self, lanes: &[&'l Lane]) -> Vec<&'l Lane> {
        let roadway: Vec<&Lane> = lanes.iter().filter(|lane| is_roadway(lane)).copied().collect();
        let skip_front = usize::from(self.left);
        let take = roadway.len() - skip_front - usize::from(self.right);
        roadway.into_iter().skip(skip_front).take(take).collect()
    }
}

fn set_lanes(lanes: &[&Lane], busway: &BuswayEmission, tags: &mut Tags) -> Result<(), Diagnostic> {
    insert(tags, "lanes", busway.counted(lanes).len().to_string())
}

/// Returns whether the road was emitted as a oneway.
fn set_oneway(
    lanes: &[&Lane],
    busway: &BuswayEmission,
    tags: &mut Tags,
) -> Result<bool, Diagnostic> {
    let counted = busway.counted(lanes);
    if lanes
        .iter()
        .filter(|lane| is_roadway(lane))
        .all(|lane| lane.direction() == Some(Direction::Forward))
    {
        insert(tags, "oneway", "yes")?;
        return Ok(true);
    }
    let forward = counted
        .iter()
        .filter(|lane| lane.direction() == Some(Direction::Forward))
        .count();
    let backward = counted
        .iter()
        .filter(|lane| lane.direction() == Some(Direction::Backward))
        .count();
    insert(tags, "lanes:forward", forward.to_string())?;
    insert(tags, "lanes:backward", backward.to_string())?;
    if counted
        .iter()
        .any(|lane| lane.direction() == Some(Direction::Both))
    {
        insert(tags, "lanes:both_ways", "1")?;
    }
    Ok(false)
}

fn side_value(left: bool, right: bool) -> &'static str {
    match (left, right) {
        (false, false) => "no",
        (true, false) => "left",
        (false, true) => "right",
        (true, true) => "both",
    }
}

fn set_shoulder(lanes: &[&Lane], tags: &mut Tags) -> Result<(), Diagnostic> {
    let left = lanes.first().map_or(false, |lane| lane.is_shoulder());
    let right = lanes.last().map_or(false, |lane| lane.is_shoulder());
    insert(tags, "shoulder", side_value(left, right))
}

fn set_sidewalk(lanes: &[&Lane], tags: &mut Tags) -> Result<(), Diagnostic> {
    let left = lanes.first().map_or(false, |lane| lane.is_foot());
    let right = lanes.last().map_or(false, |lane| lane.is_foot());
    insert(tags, "sidewalk", side_value(left, right))
}

/// The lanes left of the roadway, outermost first.
fn left_segment<'l>(lanes: &[&'l Lane]) -> Vec<&'l Lane> {
    lanes
        .iter()
        .take_while(|lane| !is_roadway(lane))
        .copied()
        .collect()
}

/// The lanes right of the roadway, outermost first.
fn right_segment<'l>(lanes: &[&'l Lane]) -> Vec<&'l Lane> {
    lanes
        .iter()
        .rev()
        .take_while(|lane| !is_roadway(lane))
        .copied()
        .collect()
}

fn set_parking(lanes: &[&Lane], tags: &mut Tags) -> Result<(), Diagnostic> {
    let orientation = |segment: &[&Lane]| {
        segment.iter().find_map(|lane| match lane {
            Lane::Parking { orientation, .. } => Some(*orientation),
            _ => None,
        })
    };
    let left = orientation(&left_segment(lanes));
    let right = orientation(&right_segment(lanes));
    match (left, right) {
        (None, None) => {}
        (Some(o), None) => insert(tags, "parking:lane:left", o.as_str())?,
        (None, Some(o)) => insert(tags, "parking:lane:right", o.as_str())?,
        (Some(l), Some(r)) if l == r => insert(tags, "parking:lane:both", l.as_str())?,
        (Some(l), Some(r)) => {
            insert(tags, "parking:lane:left", l.as_str())?;
            insert(tags, "parking:lane:right", r.as_str())?;
        }
    }
    Ok(())
}

/// What one side's cycle infrastructure projects to.
#[derive(PartialEq)]
enum CycleSide {
    None,
    /// A single lane with the given direction.
    Lane(Option<Direction>),
    /// A two-way track, a pair of opposite lanes.
    Track,
}

fn cycle_side(segment: &[&Lane]) -> CycleSide {
    let cycles: Vec<&&Lane> = segment.iter().filter(|lane| lane.is_bicycle()).collect();
    match cycles.as_slice() {
        [] => CycleSide::None,
        [lane] => CycleSide::Lane(lane.direction()),
        _ => CycleSide::Track,
    }
}

fn set_cycleway(
    lanes: &[&Lane],
    tags: &mut Tags,
    oneway: bool,
    locale: &Locale,
) -> Result<(), Diagnostic> {
    let left = cycle_side(&left_segment(lanes));
    let right = cycle_side(&right_segment(lanes));

    // The default direction a cycle lane takes on each side, which needs no
    // extra :oneway tag.
    let left_default = if oneway {
        Direction::Forward
    } else {
        match locale.driving_side {
            DrivingSide::Right => Direction::Backward,
            DrivingSide::Left => Direction::Forward,
        }
    };
    let right_default = if oneway {
        Direction::Forward
    } else {
        left_default.reverse()
    };

    let emit = |tags: &mut Tags, side: &'static str, cycle: &CycleSide, default: Direction| {
        match cycle {
            CycleSide::None => Ok(()),
            CycleSide::Track => {
                insert(tags, format!("cycleway:{}", side), "track")?;
                insert(tags, format!("cycleway:{}:oneway", side), "no")
            }
            CycleSide::Lane(direction) => {
                insert(tags, format!("cycleway:{}", side), "lane")?;
                match direction {
                    Some(Direction::Both) => {
                        insert(tags, format!("cycleway:{}:oneway", side), "no")
                    }
                    Some(d) if *d != default => insert(
                        tags,
                        format!("cycleway:{}:oneway", side),
                        if *d == Direction::Forward { "yes" } else { "-1" },
                    ),
                    _ => Ok(()),
                }
            }
        }
    };

    // Prefer the side-agnostic form when both sides match plain lanes.
    if left == CycleSide::Lane(Some(left_default))
        && right == CycleSide::Lane(Some(right_default))
        && !oneway
    {
        insert(tags, "cycleway:both", "lane")?;
    } else {
        emit(tags, "left", &left, left_default)?;
        emit(tags, "right", &right, right_default)?;
    }

    // Make contraflow cycling visible to routers.
    if oneway
        && [&left, &right].iter().any(|side| {
            matches!(
                side,
                CycleSide::Lane(Some(Direction::Backward | Direction::Both)) | CycleSide::Track
            )
        })
    {
        insert(tags, "oneway:bicycle", "no")?;
    }

    // Cycle lane widths.
    for (side, segment) in [("left", left_segment(lanes)), ("right", right_segment(lanes))] {
        if let Some(width) = segment.iter().find_map(|lane| match lane {
            Lane::Travel {
                designated: Designated::Bicycle,
                width: Some(width),
                ..
            } => Some(*width),
            _ => None,
        }) {
            insert(
                tags,
                format!("cycleway:{}:width", side),
                width.val().to_string(),
            )?;
        }
    }
    Ok(())
}

fn set_busway(
    lanes: &[&Lane],
    busway: &BuswayEmission,
    tags: &mut Tags,
    oneway: bool,
) -> Result<(), Diagnostic> {
    if busway.bar {
        let value: Vec<&str> = indexable(lanes)
            .iter()
            .map(|lane| if lane.is_bus() { "designated" } else { "" })
            .collect();
        return insert(tags, "bus:lanes", value.join("|"));
    }
    let roadway: Vec<&Lane> = lanes.iter().filter(|lane| is_roadway(lane)).copied().collect();
    let value = |lane: &Lane| {
        if oneway && lane.direction() == Some(Direction::Backward) {
            "opposite_lane"
        } else {
            "lane"
        }
    };
    match (busway.left, busway.right) {
        (false, false) => {}
        (true, false) => insert(tags, "busway:left", value(roadway.first().unwrap()))?,
        (false, true) => insert(tags, "busway:right", value(roadway.last().unwrap()))?,
        (true, true) => insert(tags, "busway:both", "lane")?,
    }
    Ok(())
}

fn set_turns(lanes: &[&Lane], tags: &mut Tags, oneway: bool) -> Result<(), Diagnostic> {
    let turn_value = |lane: &Lane| match lane {
        Lane::Travel {
            turn: Some(turn), ..
        } => turn.to_tag_value(),
        _ => "none".to_string(),
    };
    let has_turns = |side: &[&Lane]| {
        side.iter()
            .any(|lane| matches!(lane, Lane::Travel { turn: Some(_), .. }))
    };

    let indexable = indexable(lanes);
    if oneway {
        if has_turns(&indexable) {
            let value: Vec<String> = indexable.iter().map(|lane| turn_value(lane)).collect();
            insert(tags, "turn:lanes", value.join("|"))?;
        }
        return Ok(());
    }
    for (suffix, direction) in [
        ("forward", Direction::Forward),
        ("backward", Direction::Backward),
    ] {
        let side: Vec<&Lane> = indexable
            .iter()
            .filter(|lane| lane.direction() == Some(direction))
            .copied()
            .collect();
        if has_turns(&side) {
            let value: Vec<String> = side.iter().map(|lane| turn_value(lane)).collect();
            insert(tags, format!("turn:lanes:{}", suffix), value.join("|"))?;
        }
    }
    Ok(())
}

fn set_widths(lanes: &[&Lane], tags: &mut Tags, oneway: bool) -> Result<(), Diagnostic> {
    let width_value = |lane: &Lane| match lane {
        Lane::Travel {
            width: Some(width), ..
        } => width.val().to_string(),
        _ => String::new(),
    };
    let has_widths = |side: &[&Lane]| {
        side.iter()
            .any(|lane| matches!(lane, Lane::Travel { width: Some(_), .. }))
    };

    let indexable = indexable(lanes);
    if oneway {
        if has_widths(&indexable) {
            let value: Vec<String> = indexable.iter().map(|lane| width_value(lane)).collect();
            insert(tags, "width:lanes", value.join("|"))?;
        }
    } else {
        for (suffix, direction) in [
            ("forward", Direction::Forward),
            ("backward", Direction::Backward),
        ] {
            let side: Vec<&Lane> = indexable
                .iter()
                .filter(|lane| lane.direction() == Some(direction))
                .copied()
                .collect();
            if has_widths(&side) {
                let value: Vec<String> = side.iter().map(|lane| width_value(lane)).collect();
                insert(tags, format!("width:lanes:{}", suffix), value.join("|"))?;
            }
        }
    }

    // A sidewalk width, when the foot lanes agree.
    let foot_widths: Vec<_> = lanes
        .iter()
        .filter_map(|lane| match lane {
            Lane::Travel {
                designated: Designated::Foot,
                width,
                ..
            } => Some(*width),
            _ => None,
        })
        .collect();
    if let Some(Some(width)) = foot_widths.first() {
        if foot_widths.iter().all(|w| w == foot_widths.first().unwrap()) {
            insert(tags, "sidewalk:width", width.val().to_string())?;
        }
    }
    Ok(())
}

fn set_max_speed(
    lanes: &[&Lane],
    tags: &mut Tags,
    oneway: bool,
    warnings: &mut Diagnostics,
) -> Result<(), Diagnostic> {
    let speed_of = |lane: &Lane| match lane {
        Lane::Travel { max_speed, .. } => *max_speed,
        _ => None,
    };
    let roadway: Vec<&Lane> = lanes.iter().filter(|lane| is_roadway(lane)).copied().collect();
    let speeds: Vec<Option<Speed>> = roadway.iter().map(|lane| speed_of(lane)).collect();
    if speeds.iter().all(Option::is_none) {
        return Ok(());
    }
    if let [first, ..] = speeds.as_slice() {
        if first.is_some() && speeds.iter().all(|speed| speed == first) {
            return insert(tags, "maxspeed", first.unwrap().to_string());
        }
    }

    let uniform = |direction: Direction| -> Option<Speed> {
        let side: Vec<Option<Speed>> = roadway
            .iter()
            .filter(|lane| lane.direction() == Some(direction))
            .map(|lane| speed_of(lane))
            .collect();
        match side.first() {
            Some(Some(speed)) if side.iter().all(|s| s == side.first().unwrap()) => Some(*speed),
            _ => None,
        }
    };
    if !oneway {
        if let (Some(forward), Some(backward)) =
            (uniform(Direction::Forward), uniform(Direction::Backward))
        {
            insert(tags, "maxspeed:forward", forward.to_string())?;
            insert(tags, "maxspeed:backward", backward.to_string())?;
            return Ok(());
        }
    }

    let value: Vec<String> = indexable(lanes)
        .iter()
        .map(|lane| speed_of(lane).map_or_else(String::new, |speed| speed.to_string()))
        .collect();
    insert(tags, "maxspeed:lanes", value.join("|"))?;
    if roadway
        .iter()
        .any(|lane| lane.direction() == Some(Direction::Both) && speed_of(lane).is_some())
    {
        warnings.push(Diagnostic::new(
            DiagnosticCode::Unrepresentable,
            "a centre lane speed limit has no per-lane tag",
            Tags::empty(),
        ));
    }
    Ok(())
}

fn set_access(
    lanes: &[&Lane],
    tags: &mut Tags,
    warnings: &mut Diagnostics,
) -> Result<(), Diagnostic> {
    let travel: Vec<&Lane> = lanes
        .iter()
        .filter(|lane| matches!(lane, Lane::Travel { .. }))
        .copied()
        .collect();
    for mode in ["foot", "bicycle", "motor_vehicle", "bus", "taxi", "psv"] {
        let values: Vec<Option<Access>> = travel
            .iter()
            .map(|lane| {
                let access = match lane {
                    Lane::Travel {
                        access: Some(access),
                        ..
                    } => access,
                    _ => return None,
                };
                match mode {
                    "foot" => access.foot,
                    "bicycle" => access.bicycle,
                    "motor_vehicle" => access.motor,
                    "bus" => access.bus,
                    "taxi" => access.taxi,
                    _ => access.psv,
                }
            })
            .collect();
        match values.first() {
            Some(Some(access)) if values.iter().all(|v| v == values.first().unwrap()) => {
                insert(tags, mode, access_value(*access))?;
            }
            Some(Some(_)) => warnings.push(Diagnostic::new(
                DiagnosticCode::Unrepresentable,
                format!("per-lane {} access differs between lanes", mode),
                Tags::empty(),
            )),
            _ => {}
        }
    }
    Ok(())
}

fn access_value(access: Access) -> &'static str {
    match access {
        Access::Yes => "yes",
        Access::No => "no",
        Access::Designated => "designated",
        Access::Private => "private",
        Access::Permissive => "permissive",
    }
}

fn check_roundtrip(
    config: &LanesToTagsConfig,
    tags: &Tags,
    locale: &Locale,
    road: &Road,
    warnings: &mut Diagnostics,
) {
    if !config.check_roundtrip {
        return;
    }
    let reparse_config = TagsToLanesConfig {
        include_separators: road.has_separators(),
        ..TagsToLanesConfig::default()
    };
    match tags_to_lanes(tags, locale, &reparse_config) {
        Ok(output) if output.road.lanes == road.lanes => {}
        Ok(_) => warnings.push(Diagnostic::new(
            DiagnosticCode::Roundtrip,
            "re-parsing the produced tags does not reproduce the road",
            tags.clone(),
        )),
        Err(e) => warnings.push(Diagnostic::new(
            DiagnosticCode::Roundtrip,
            format!("re-parsing the produced tags fails: {}", e),
            tags.clone(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use osm_tags::Tags;

    use super::{lanes_to_tags, LanesToTagsConfig};
    use crate::locale::{DrivingSide, Locale};
    use crate::transform::tags_to_lanes::{tags_to_lanes, TagsToLanesConfig};

    fn tags(kv: &[&str]) -> Tags {
        Tags::from_pairs(kv.iter().map(|pair| {
            let (k, v) = pair.split_once('=').unwrap();
            [k, v]
        }))
        .unwrap()
    }

    fn roundtrip(input: &[&str], side: DrivingSide) {
        let locale = Locale::builder().driving_side(side).build();
        let parsed = tags_to_lanes(&tags(input), &locale, &TagsToLanesConfig::default())
            .expect("parse failed");
        let projected = lanes_to_tags(&parsed.road, &locale, &LanesToTagsConfig::default())
            .expect("projection failed");
        assert!(
            !projected
                .warnings
                .iter()
                .any(|d| d.code == crate::transform::DiagnosticCode::Roundtrip),
            "roundtrip failed for {:?}: produced {}",
            input,
            projected.tags,
        );
        let reparsed = tags_to_lanes(&projected.tags, &locale, &TagsToLanesConfig::default())
            .expect("re-parse failed");
        assert_eq!(parsed.road.lanes, reparsed.road.lanes, "for {:?}", input);
    }

    #[test]
    fn test_roundtrip_basics() {
        roundtrip(&[], DrivingSide::Right);
        roundtrip(&["lanes=2"], DrivingSide::Right);
        roundtrip(&["lanes=4", "sidewalk=both"], DrivingSide::Left);
        roundtrip(&["lanes=2", "oneway=yes"], DrivingSide::Right);
    }

    #[test]
    fn test_roundtrip_modal() {
        roundtrip(
            &["lanes=2", "oneway=yes", "sidewalk=both", "cycleway:left=lane"],
            DrivingSide::Right,
        );
        roundtrip(&["lanes=2", "busway=lane"], DrivingSide::Right);
        roundtrip(&["lanes=2", "bus:lanes=designated|no"], DrivingSide::Right);
        roundtrip(&["lanes=2", "cycleway:both=lane"], DrivingSide::Right);
    }

    #[test]
    fn test_roundtrip_parking_and_shoulders() {
        roundtrip(
            &[
                "highway=residential",
                "lanes=4",
                "sidewalk=none",
                "parking:lane:both=parallel",
            ],
            DrivingSide::Right,
        );
        roundtrip(
            &["lanes=2", "parking:lane:right=diagonal", "sidewalk=both"],
            DrivingSide::Right,
        );
    }

    #[test]
    fn test_roundtrip_attributes() {
        roundtrip(
            &["lanes=2", "oneway=yes", "turn:lanes=left|through;right"],
            DrivingSide::Right,
        );
        roundtrip(&["lanes=2", "maxspeed=50"], DrivingSide::Right);
        roundtrip(&["lanes=2", "maxspeed=30 mph", "name=High Street"], DrivingSide::Right);
        roundtrip(&["lanes=2", "lit=yes", "surface=asphalt"], DrivingSide::Right);
    }

    #[test]
    fn test_projection_values() {
        let locale = Locale::builder().driving_side(DrivingSide::Right).build();
        let parsed = tags_to_lanes(
            &tags(&["lanes=3", "lanes:both_ways=1", "sidewalk=both"]),
            &locale,
            &TagsToLanesConfig::default(),
        )
        .unwrap();
        let projected = lanes_to_tags(&parsed.road, &locale, &LanesToTagsConfig::default())
            .unwrap()
            .tags;
        assert_eq!(projected.get("lanes"), Some("3"));
        assert_eq!(projected.get("lanes:both_ways"), Some("1"));
        assert_eq!(projected.get("lanes:forward"), Some("1"));
        assert_eq!(projected.get("lanes:backward"), Some("1"));
        assert_eq!(projected.get("sidewalk"), Some("both"));
        assert_eq!(projected.get("shoulder"), Some("no"));
    }

    #[test]
    fn test_non_motorized_projection() {
        let locale = Locale::builder().build();
        let parsed = tags_to_lanes(
            &tags(&["highway=footway"]),
            &locale,
            &TagsToLanesConfig::default(),
        )
        .unwrap();
        let projected = lanes_to_tags(&parsed.road, &locale, &LanesToTagsConfig::default())
            .unwrap()
            .tags;
        assert_eq!(projected.get("highway"), Some("footway"));
        assert_eq!(projected.get("lanes"), None);
    }
}
