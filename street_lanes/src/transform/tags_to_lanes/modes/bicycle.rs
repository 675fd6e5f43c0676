use osm_tags::{TagKey, TagSource};

use crate::locale::Locale;
use crate::metric::Metre;
use crate::road::{Designated, Direction};
use crate::transform::error::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::transform::keys::CYCLEWAY;
use crate::transform::tags_to_lanes::infer::Infer;
use crate::transform::tags_to_lanes::per_lane::parse_width;
use crate::transform::tags_to_lanes::road::{LaneBuilder, RoadBuilder};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Variant {
    Lane,
    Track,
    /// Cyclists share a travel lane; no dedicated lane to add.
    Shared,
}

/// A cycleway value: the variant plus whether it was the deprecated
/// `opposite_*` form.
fn variant(
    source: &TagSource,
    key: &TagKey,
    warnings: &mut Diagnostics,
) -> Option<(Variant, bool)> {
    let value = source.get_consume(key)?.to_ascii_lowercase();
    match value.as_str() {
        "no" | "none" => None,
        "lane" => Some((Variant::Lane, false)),
        "track" => Some((Variant::Track, false)),
        "shared_lane" | "share_busway" | "shared" => Some((Variant::Shared, false)),
        "opposite_lane" | "opposite_track" | "opposite" => {
            warnings.push(Diagnostic::new(
                DiagnosticCode::DeprecatedTagForm,
                format!("{}={} is deprecated", key, value),
                source.subset(std::slice::from_ref(key)),
            ));
            match value.as_str() {
                "opposite_lane" => Some((Variant::Lane, true)),
                "opposite_track" => Some((Variant::Track, true)),
                _ => Some((Variant::Shared, true)),
            }
        }
        v => {
            warnings.push(Diagnostic::new(
                DiagnosticCode::UnknownValue,
                format!("unknown cycleway value '{}'", v),
                source.subset(std::slice::from_ref(key)),
            ));
            None
        }
    }
}

fn cycle(direction: Direction, width: Option<Metre>) -> LaneBuilder {
    let mut lane = LaneBuilder::travel(direction, Designated::Bicycle);
    lane.width = Infer::direct(width);
    lane
}

/// The cycleway scheme: `cycleway[:left|:right|:both]=` plus the `:oneway`
/// and `:width` sub-keys. See
/// <https://wiki.openstreetmap.org/wiki/Key:cycleway>.
pub fn bicycle(
    source: &TagSource,
    locale: &Locale,
    road: &mut RoadBuilder,
    warnings: &mut Diagnostics,
) -> Result<(), Diagnostic> {
    let oneway = road.oneway;
    let oneway_bicycle_no = source.is("oneway:bicycle", "no");

    let forward_key = CYCLEWAY + locale.driving_side.tag();
    let backward_key = CYCLEWAY + locale.driving_side.opposite().tag();

    let root = variant(source, &CYCLEWAY, warnings);
    let both = variant(source, &(CYCLEWAY + "both"), warnings);
    let forward_variant = variant(source, &forward_key, warnings);
    let backward_variant = variant(source, &backward_key, warnings);

    let root_width = match source.get_consume(CYCLEWAY + "width") {
        Some(value) => parse_width(value, "cycleway:width", source)?,
        None => None,
    };
    let side_width = |source: &TagSource, key: &TagKey| -> Result<Option<Metre>, Diagnostic> {
        match source.get_consume(key) {
            Some(value) => parse_width(value, key.as_str(), source),
            None => Ok(None),
        }
    };
    let forward_width = side_width(source, &(forward_key.clone() + "width"))?.or(root_width);
    let backward_width = side_width(source, &(backward_key.clone() + "width"))?.or(root_width);

    // The longer key path wins over the bare cycleway= form.
    let root = if root.is_some()
        && (both.is_some() || forward_variant.is_some() || backward_variant.is_some())
    {
        warnings.push(Diagnostic::new(
            DiagnosticCode::TagConflict,
            "cycleway together with per-side cycleway tags, using the per-side form",
            source.subset(&[
                CYCLEWAY,
                CYCLEWAY + "both",
                forward_key.clone(),
                backward_key.clone(),
            ]),
        ));
        None
    } else {
        root
    };

    let (forward_variant, backward_variant) = match (both, forward_variant, backward_variant) {
        (Some(b), f, bk) => (f.or(Some(b)), bk.or(Some(b))),
        (None, f, bk) => (f, bk),
    };

    let forward_oneway_key = forward_key + "oneway";
    let backward_oneway_key = backward_key + "oneway";

    match (forward_variant, backward_variant) {
        (None, None) => {
            if let Some((variant, opposite)) = root {
                if variant == Variant::Shared {
                    return Ok(());
                }
                if bool::from(oneway) {
                    if opposite {
                        road.push_backward_outside(cycle(Direction::Backward, backward_width));
                    } else {
                        road.push_forward_outside(cycle(Direction::Forward, forward_width));
                    }
                } else {
                    if opposite {
                        warnings.push(Diagnostic::new(
                            DiagnosticCode::AmbiguousDirection,
                            "cycleway=opposite_* without a oneway road",
                            source.subset(&[CYCLEWAY]),
                        ));
                    }
                    road.push_forward_outside(cycle(Direction::Forward, forward_width));
                    road.push_backward_outside(cycle(Direction::Backward, backward_width));
                }
            }
        }
        (forward_variant, backward_variant) => {
            if let Some((variant, opposite)) = forward_variant {
                if variant != Variant::Shared {
                    let bidirectional = source.is(&forward_oneway_key, "no") || oneway_bicycle_no;
                    if bidirectional && variant == Variant::Track {
                        // A two-way cycle track: the inner lane runs against
                        // the side's direction.
                        road.push_forward_outside(cycle(Direction::Backward, forward_width));
                        road.push_forward_outside(cycle(Direction::Forward, forward_width));
                    } else if bidirectional {
                        road.push_forward_outside(cycle(Direction::Both, forward_width));
                    } else if source.is(&forward_oneway_key, "-1") || opposite {
                        road.push_forward_outside(cycle(Direction::Backward, forward_width));
                    } else {
                        road.push_forward_outside(cycle(Direction::Forward, forward_width));
                    }
                }
            }
            if let Some((variant, opposite)) = backward_variant {
                if variant != Variant::Shared {
                    let bidirectional = source.is(&backward_oneway_key, "no") || oneway_bicycle_no;
                    if bidirectional && variant == Variant::Track {
                        road.push_backward_outside(cycle(Direction::Forward, backward_width));
                        road.push_backward_outside(cycle(Direction::Backward, backward_width));
                    } else if bidirectional {
                        road.push_backward_outside(cycle(Direction::Both, backward_width));
                    } else if source.is(&backward_oneway_key, "yes") {
                        // Explicitly with the way, on the wrong side.
                        road.push_backward_outside(cycle(Direction::Forward, backward_width));
                    } else if source.is(&backward_oneway_key, "-1") {
                        road.push_backward_outside(cycle(Direction::Backward, backward_width));
                    } else if bool::from(oneway) && !opposite {
                        // A oneway road with a cycleway on the wrong side
                        // still runs with the traffic.
                        road.push_backward_outside(cycle(Direction::Forward, backward_width));
                    } else {
                        // A contraflow bicycle lane.
                        road.push_backward_outside(cycle(Direction::Backward, backward_width));
                    }
                }
            }
        }
    }
    Ok(())
}
