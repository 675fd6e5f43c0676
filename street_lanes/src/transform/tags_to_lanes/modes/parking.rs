use osm_tags::{TagKey, TagSource};

use crate::locale::Locale;
use crate::road::{Designated, Direction, ParkingOrientation};
use crate::transform::error::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::transform::tags_to_lanes::infer::Infer;
use crate::transform::tags_to_lanes::road::{LaneBuilder, LaneType, RoadBuilder};

const PARKING_LANE: TagKey = TagKey::from_static("parking:lane");

fn orientation(
    source: &TagSource,
    key: &TagKey,
    warnings: &mut Diagnostics,
) -> Option<ParkingOrientation> {
    let value = source.get_consume(key)?.to_ascii_lowercase();
    match value.as_str() {
        "parallel" | "diagonal" | "perpendicular" => value.parse().ok(),
        // Restrictions and absence mean no parking lane.
        "no" | "none" | "no_parking" | "no_stopping" | "fire_lane" => None,
        v => {
            warnings.push(Diagnostic::new(
                DiagnosticCode::UnknownValue,
                format!("unknown parking value '{}'", v),
                source.subset(std::slice::from_ref(key)),
            ));
            None
        }
    }
}

fn parking_lane(direction: Direction, orientation: ParkingOrientation) -> LaneBuilder {
    LaneBuilder {
        kind: Infer::Direct(LaneType::Parking),
        direction: Infer::Direct(direction),
        designated: Infer::Direct(Designated::Motor),
        orientation: Infer::Direct(orientation),
        ..Default::default()
    }
}

/// The `parking:lane:{left,right,both}=` scheme. The longer key path wins
/// over `:both`.
pub fn parking(
    source: &TagSource,
    locale: &Locale,
    road: &mut RoadBuilder,
    warnings: &mut Diagnostics,
) -> Result<(), Diagnostic> {
    let both = orientation(source, &(PARKING_LANE + "both"), warnings);
    let forward_key = PARKING_LANE + locale.driving_side.tag();
    let backward_key = PARKING_LANE + locale.driving_side.opposite().tag();
    let forward_side = orientation(source, &forward_key, warnings);
    let backward_side = orientation(source, &backward_key, warnings);

    if both.is_some() && (forward_side.is_some() || backward_side.is_some()) {
        warnings.push(Diagnostic::new(
            DiagnosticCode::TagConflict,
            "parking:lane:both together with a per-side key",
            source.subset(&[PARKING_LANE + "both", forward_key, backward_key]),
        ));
    }

    if let Some(orientation) = forward_side.or(both) {
        road.push_forward_outside(parking_lane(Direction::Forward, orientation));
    }
    if let Some(orientation) = backward_side.or(both) {
        road.push_backward_outside(parking_lane(Direction::Backward, orientation));
    }
    Ok(())
}
