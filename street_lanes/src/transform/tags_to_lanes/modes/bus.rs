use osm_tags::{TagKey, TagSource};

use crate::locale::Locale;
use crate::road::{Designated, Direction};
use crate::transform::error::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::transform::keys::{BUSWAY, ONEWAY};
use crate::transform::tags_to_lanes::oneway::Oneway;
use crate::transform::tags_to_lanes::per_lane::{apply_designated_overrides, Indexed};
use crate::transform::tags_to_lanes::road::{LaneBuilder, RoadBuilder};

/// Which sides of the road carry a dedicated bus lane.
#[derive(Debug, PartialEq, Eq)]
pub enum BuswayVariant {
    None,
    Forward,
    Backward,
    Both,
}

/// The `busway=` scheme. See
/// <https://wiki.openstreetmap.org/wiki/Bus_lanes>.
#[derive(Debug)]
pub struct BuswayScheme(BuswayVariant);

enum BuswayLane {
    None,
    Lane,
    Opposite,
}

fn get_busway_lane(source: &TagSource, key: &TagKey, warnings: &mut Diagnostics) -> BuswayLane {
    match source
        .get_consume(key)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        None | Some("no") => BuswayLane::None,
        Some("lane") => BuswayLane::Lane,
        Some("opposite_lane") => BuswayLane::Opposite,
        Some(v) => {
            warnings.push(Diagnostic::new(
                DiagnosticCode::UnknownValue,
                format!("unknown busway value '{}'", v),
                source.subset(std::slice::from_ref(key)),
            ));
            BuswayLane::None
        }
    }
}

impl BuswayScheme {
    pub fn from_source(
        source: &TagSource,
        road_oneway: Oneway,
        locale: &Locale,
        warnings: &mut Diagnostics,
    ) -> Self {
        let bus_oneway = match source.get_consume(ONEWAY + "bus") {
            Some("yes") => Oneway::Yes,
            Some("no") => Oneway::No,
            None => road_oneway,
            Some(v) => {
                warnings.push(Diagnostic::new(
                    DiagnosticCode::UnknownValue,
                    format!("unknown oneway:bus value '{}'", v),
                    source.subset(&[ONEWAY + "bus"]),
                ));
                road_oneway
            }
        };

        let root = match (get_busway_lane(source, &BUSWAY, warnings), bus_oneway) {
            (BuswayLane::None, _) => BuswayVariant::None,
            (BuswayLane::Lane, Oneway::No) => BuswayVariant::Both,
            (BuswayLane::Lane, Oneway::Yes) => BuswayVariant::Forward,
            (BuswayLane::Opposite, Oneway::Yes) => BuswayVariant::Backward,
            (BuswayLane::Opposite, Oneway::No) => {
                warnings.push(Diagnostic::new(
                    DiagnosticCode::AmbiguousDirection,
                    "busway=opposite_lane without a oneway road",
                    source.subset(&[BUSWAY, ONEWAY, ONEWAY + "bus"]),
                ));
                BuswayVariant::None
            }
        };

        let both = match get_busway_lane(source, &(BUSWAY + "both"), warnings) {
            BuswayLane::None => BuswayVariant::None,
            BuswayLane::Lane => BuswayVariant::Both,
            BuswayLane::Opposite => {
                warnings.push(Diagnostic::new(
                    DiagnosticCode::AmbiguousDirection,
                    "busway:both=opposite_lane makes no sense",
                    source.subset(&[BUSWAY + "both"]),
                ));
                BuswayVariant::None
            }
        };

        let forward_key = BUSWAY + locale.driving_side.tag();
        let backward_key = BUSWAY + locale.driving_side.opposite().tag();
        let forward_side = get_busway_lane(source, &forward_key, warnings);
        if let BuswayLane::Opposite = forward_side {
            warnings.push(Diagnostic::new(
                DiagnosticCode::AmbiguousDirection,
                "an opposite bus lane cannot be on the driving side",
                source.subset(&[forward_key.clone()]),
            ));
        }
        let backward_side = get_busway_lane(source, &backward_key, warnings);
        let per_side = match (forward_side, backward_side) {
            (BuswayLane::None | BuswayLane::Opposite, BuswayLane::None) => BuswayVariant::None,
            (BuswayLane::Lane, BuswayLane::None) => BuswayVariant::Forward,
            (BuswayLane::None | BuswayLane::Opposite, BuswayLane::Lane | BuswayLane::Opposite) => {
                BuswayVariant::Backward
            }
            (BuswayLane::Lane, BuswayLane::Lane | BuswayLane::Opposite) => BuswayVariant::Both,
        };

        // The most specific scheme wins.
        if both == BuswayVariant::Both {
            if per_side == BuswayVariant::Forward || per_side == BuswayVariant::Backward {
                warnings.push(Diagnostic::new(
                    DiagnosticCode::TagConflict,
                    "busway:both disagrees with per-side busway tags",
                    source.subset(&[BUSWAY + "both", forward_key, backward_key]),
                ));
            }
            Self(BuswayVariant::Both)
        } else if per_side != BuswayVariant::None {
            if root != BuswayVariant::None && root != per_side {
                warnings.push(Diagnostic::new(
                    DiagnosticCode::TagConflict,
                    "busway disagrees with per-side busway tags",
                    source.subset(&[BUSWAY, forward_key, backward_key]),
                ));
            }
            Self(per_side)
        } else {
            Self(root)
        }
    }
}

impl LaneBuilder {
    fn bus(direction: Direction) -> Self {
        LaneBuilder::travel(direction, Designated::Bus)
    }
}

/// Add dedicated bus lanes and apply the `bus:lanes`/`psv:lanes` per-lane
/// overrides.
pub fn bus(
    source: &TagSource,
    locale: &Locale,
    road: &mut RoadBuilder,
    warnings: &mut Diagnostics,
) -> Result<(), Diagnostic> {
    let has_busway = source.has_subtree("busway");
    let has_bar_strings = ["bus:lanes", "psv:lanes"]
        .iter()
        .any(|prefix| source.has_subtree(prefix));

    if has_busway && has_bar_strings {
        warnings.push(Diagnostic::new(
            DiagnosticCode::TagConflict,
            "both busway and bus:lanes present, using busway",
            source.subset(&["busway", "bus:lanes", "psv:lanes"]),
        ));
        // Reading the subtrees marks the ignored bar strings as used, so
        // they don't also warn as unconsumed.
        let _ = source.subtree("bus:lanes");
        let _ = source.subtree("psv:lanes");
    }

    if has_busway || !has_bar_strings {
        let scheme = BuswayScheme::from_source(source, road.oneway, locale, warnings);
        trace!("busway scheme: {:?}", scheme);
        if let BuswayVariant::Forward | BuswayVariant::Both = scheme.0 {
            road.push_forward_outside(LaneBuilder::bus(Direction::Forward));
        }
        if let BuswayVariant::Backward | BuswayVariant::Both = scheme.0 {
            road.push_backward_outside(LaneBuilder::bus(Direction::Backward));
        }
        return Ok(());
    }

    // bus:lanes=|designated| and friends override the designation of the
    // matching travel lane instead of adding one.
    for (base, designated) in [("bus", Designated::Bus), ("psv", Designated::Psv)] {
        for (suffix, indexed) in [
            ("", Indexed::LeftToRight),
            (":forward", Indexed::Forward),
            (":backward", Indexed::Backward),
        ] {
            let key = format!("{}:lanes{}", base, suffix);
            if let Some(value) = source.get_consume(&key) {
                apply_designated_overrides(
                    source, value, &key, designated, indexed, locale, road, warnings,
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use osm_tags::{TagSource, Tags};

    use super::{BuswayScheme, BuswayVariant};
    use crate::locale::{DrivingSide, Locale};
    use crate::transform::tags_to_lanes::oneway::Oneway;
    use crate::transform::Diagnostics;

    fn parse(pairs: &[[&str; 2]], oneway: Oneway) -> (BuswayScheme, Diagnostics) {
        let tags = Tags::from_pairs(pairs.iter().copied()).unwrap();
        let source = TagSource::new(&tags);
        let locale = Locale::builder().driving_side(DrivingSide::Right).build();
        let mut warnings = Diagnostics::default();
        let scheme = BuswayScheme::from_source(&source, oneway, &locale, &mut warnings);
        (scheme, warnings)
    }

    #[test]
    fn test_busway_root() {
        let (scheme, _) = parse(&[["busway", "lane"]], Oneway::No);
        assert_eq!(scheme.0, BuswayVariant::Both);
        let (scheme, _) = parse(&[["busway", "lane"]], Oneway::Yes);
        assert_eq!(scheme.0, BuswayVariant::Forward);
        let (scheme, _) = parse(&[["busway", "opposite_lane"]], Oneway::Yes);
        assert_eq!(scheme.0, BuswayVariant::Backward);
    }

    #[test]
    fn test_busway_sides() {
        let (scheme, _) = parse(&[["busway:right", "lane"]], Oneway::No);
        assert_eq!(scheme.0, BuswayVariant::Forward);
        let (scheme, _) = parse(&[["busway:left", "lane"]], Oneway::No);
        assert_eq!(scheme.0, BuswayVariant::Backward);
        let (scheme, _) = parse(&[["busway:both", "lane"]], Oneway::Yes);
        assert_eq!(scheme.0, BuswayVariant::Both);
    }

    #[test]
    fn test_conflicting_schemes_warn() {
        let (scheme, warnings) = parse(
            &[["busway", "lane"], ["busway:left", "lane"]],
            Oneway::Yes,
        );
        assert_eq!(scheme.0, BuswayVariant::Backward);
        assert_eq!(warnings.len(), 1);
    }
}
