use osm_tags::TagSource;

use crate::locale::Locale;
use crate::road::Designated;
use crate::transform::error::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::transform::keys::{SHOULDER, SIDEWALK};
use crate::transform::tags_to_lanes::infer::Infer;
use crate::transform::tags_to_lanes::road::{LaneBuilder, LaneType, RoadBuilder};
use crate::transform::tags_to_lanes::TagsToLanesConfig;

impl LaneBuilder {
    fn foot() -> Self {
        LaneBuilder {
            kind: Infer::Direct(LaneType::Travel),
            designated: Infer::Direct(Designated::Foot),
            ..Default::default()
        }
    }

    fn shoulder() -> Self {
        LaneBuilder {
            kind: Infer::Direct(LaneType::Shoulder),
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sidewalk {
    /// Nothing tagged; may be inferred away.
    None,
    No,
    Yes,
    /// Mapped as its own way, so no lane here.
    Separate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shoulder {
    None,
    No,
    Yes,
}

fn sidewalk_value(
    value: &str,
    key: &str,
    source: &TagSource,
    warnings: &mut Diagnostics,
) -> Option<Sidewalk> {
    match value.to_ascii_lowercase().as_str() {
        "yes" => Some(Sidewalk::Yes),
        "no" => Some(Sidewalk::No),
        "separate" => Some(Sidewalk::Separate),
        v => {
            warnings.push(Diagnostic::new(
                DiagnosticCode::UnknownValue,
                format!("unknown {} value '{}'", key, v),
                source.subset(&[key]),
            ));
            None
        }
    }
}

/// Resolve the sidewalk scheme to a per-side answer. The longer key path
/// wins over the shorter: `sidewalk:left=no` beats `sidewalk=both`.
///
/// Returns `(left, right, forced_shoulders)`; the deprecated `sidewalk=none`
/// means shoulders instead of sidewalks.
fn sidewalks(
    source: &TagSource,
    warnings: &mut Diagnostics,
) -> (Sidewalk, Sidewalk, bool) {
    let mut forced_shoulders = false;
    let (mut left, mut right) = match source
        .get_consume(SIDEWALK)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        None => (Sidewalk::None, Sidewalk::None),
        Some("both" | "yes") => (Sidewalk::Yes, Sidewalk::Yes),
        Some("left") => (Sidewalk::Yes, Sidewalk::No),
        Some("right") => (Sidewalk::No, Sidewalk::Yes),
        Some("no") => (Sidewalk::No, Sidewalk::No),
        Some("none") => {
            warnings.push(Diagnostic::new(
                DiagnosticCode::DeprecatedTagForm,
                "sidewalk=none means no sidewalk but a shoulder, prefer sidewalk=no",
                source.subset(&[SIDEWALK]),
            ));
            forced_shoulders = true;
            (Sidewalk::No, Sidewalk::No)
        }
        Some("separate") => (Sidewalk::Separate, Sidewalk::Separate),
        Some(v) => {
            warnings.push(Diagnostic::new(
                DiagnosticCode::UnknownValue,
                format!("unknown sidewalk value '{}'", v),
                source.subset(&[SIDEWALK]),
            ));
            (Sidewalk::None, Sidewalk::None)
        }
    };

    if let Some(value) = source.get_consume(SIDEWALK + "both") {
        let value = sidewalk_value(value, "sidewalk:both", source, warnings);
        override_side(&mut left, value, "sidewalk:both", source, warnings);
        override_side(&mut right, value, "sidewalk:both", source, warnings);
    }
    if let Some(value) = source.get_consume(SIDEWALK + "left") {
        let value = sidewalk_value(value, "sidewalk:left", source, warnings);
        override_side(&mut left, value, "sidewalk:left", source, warnings);
    }
    if let Some(value) = source.get_consume(SIDEWALK + "right") {
        let value = sidewalk_value(value, "sidewalk:right", source, warnings);
        override_side(&mut right, value, "sidewalk:right", source, warnings);
    }
    (left, right, forced_shoulders)
}

fn override_side(
    general: &mut Sidewalk,
    value: Option<Sidewalk>,
    key: &str,
    source: &TagSource,
    warnings: &mut Diagnostics,
) {
    if let Some(value) = value {
        if *general != Sidewalk::None && *general != value {
            warnings.push(Diagnostic::new(
                DiagnosticCode::TagConflict,
                format!("{} overrides the general sidewalk tag", key),
                source.subset(&[SIDEWALK.as_str(), key]),
            ));
        }
        *general = value;
    }
}

/// The `shoulder=` scheme, per physical side.
fn shoulders(source: &TagSource, warnings: &mut Diagnostics) -> (Shoulder, Shoulder) {
    match source
        .get_consume(SHOULDER)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        None => (Shoulder::None, Shoulder::None),
        Some("no") => (Shoulder::No, Shoulder::No),
        Some("yes" | "both") => (Shoulder::Yes, Shoulder::Yes),
        Some("left") => (Shoulder::Yes, Shoulder::No),
        Some("right") => (Shoulder::No, Shoulder::Yes),
        Some(v) => {
            warnings.push(Diagnostic::new(
                DiagnosticCode::UnknownValue,
                format!("unknown shoulder value '{}'", v),
                source.subset(&[SHOULDER]),
            ));
            (Shoulder::None, Shoulder::None)
        }
    }
}

/// Add sidewalks and shoulders to the assembled sides.
/// See <https://wiki.openstreetmap.org/wiki/Key:sidewalk> and
/// <https://wiki.openstreetmap.org/wiki/Key:shoulder>.
pub fn foot_and_shoulder(
    source: &TagSource,
    locale: &Locale,
    road: &mut RoadBuilder,
    config: &TagsToLanesConfig,
    warnings: &mut Diagnostics,
) -> Result<(), Diagnostic> {
    let (sidewalk_left, sidewalk_right, forced_shoulders) = sidewalks(source, warnings);
    let (mut shoulder_left, mut shoulder_right) = shoulders(source, warnings);
    if forced_shoulders {
        if shoulder_left == Shoulder::None {
            shoulder_left = Shoulder::Yes;
        }
        if shoulder_right == Shoulder::None {
            shoulder_right = Shoulder::Yes;
        }
    }

    // Physical sides back to way sides: forward traffic keeps to the
    // driving side.
    let (sidewalk_forward, sidewalk_backward, shoulder_forward, shoulder_backward) =
        match locale.driving_side {
            crate::locale::DrivingSide::Right => {
                (sidewalk_right, sidewalk_left, shoulder_right, shoulder_left)
            }
            crate::locale::DrivingSide::Left => {
                (sidewalk_left, sidewalk_right, shoulder_left, shoulder_right)
            }
        };

    // Motorways and single-lane oneways carry shoulders even untagged.
    let inferred_shoulder = config.include_shoulders
        && config.infer_defaults
        && !road.highway.kind().is_non_motorized()
        && (locale.has_shoulder(road.highway.kind())
            || (bool::from(road.oneway) && road.len() == 1));

    let mut add_side = |sidewalk: Sidewalk, shoulder: Shoulder, forward: bool| {
        let push = |road: &mut RoadBuilder, lane: LaneBuilder| {
            if forward {
                road.push_forward_outside(lane);
            } else {
                road.push_backward_outside(lane);
            }
        };
        match (sidewalk, shoulder) {
            (Sidewalk::Yes, Shoulder::Yes) => {
                // Both exist; the shoulder sits between the roadway and the
                // kerb.
                push(road, LaneBuilder::shoulder());
                push(road, LaneBuilder::foot());
            }
            (Sidewalk::Yes, Shoulder::No | Shoulder::None) => {
                push(road, LaneBuilder::foot());
            }
            (Sidewalk::No | Sidewalk::None | Sidewalk::Separate, Shoulder::Yes) => {
                push(road, LaneBuilder::shoulder());
            }
            (Sidewalk::None | Sidewalk::No | Sidewalk::Separate, Shoulder::None) => {
                // An outermost bicycle lane already serves as a refuge.
                let outer_is_bicycle = if forward {
                    road.forward_outside().map_or(false, LaneBuilder::is_bicycle)
                } else {
                    road.backward_outside().map_or(false, LaneBuilder::is_bicycle)
                };
                if inferred_shoulder && !outer_is_bicycle {
                    push(road, LaneBuilder::shoulder());
                }
            }
            (Sidewalk::No | Sidewalk::Separate, Shoulder::No) => {}
            (Sidewalk::None, Shoulder::No) => {}
        }
    };

    add_side(sidewalk_forward, shoulder_forward, true);
    add_side(sidewalk_backward, shoulder_backward, false);
    Ok(())
}

#[cfg(test)]
mod tests {
    use osm_tags::{TagSource, Tags};

    use super::foot_and_shoulder;
    use crate::locale::{DrivingSide, Locale};
    use crate::road::{Highway, HighwayType, Lane, Printable};
    use crate::transform::tags_to_lanes::oneway::Oneway;
    use crate::transform::tags_to_lanes::road::RoadBuilder;
    use crate::transform::tags_to_lanes::TagsToLanesConfig;
    use crate::transform::{DiagnosticCode, Diagnostics};

    fn ascii(
        pairs: &[[&str; 2]],
        highway: HighwayType,
        oneway: Oneway,
    ) -> (String, Diagnostics) {
        let tags = Tags::from_pairs(pairs.iter().copied()).unwrap();
        let source = TagSource::new(&tags);
        let locale = Locale::builder().driving_side(DrivingSide::Right).build();
        let mut warnings = Diagnostics::default();
        let config = TagsToLanesConfig::default();
        let mut road = RoadBuilder::seed(
            &source,
            Highway::active(highway),
            oneway,
            &locale,
            &config,
            &mut warnings,
        )
        .unwrap();
        foot_and_shoulder(&source, &locale, &mut road, &config, &mut warnings).unwrap();
        let lanes: Vec<Lane> = road.into_ltr(&locale);
        (lanes.iter().map(Printable::as_ascii).collect(), warnings)
    }

    #[test]
    fn test_sidewalk_both() {
        let (lanes, warnings) = ascii(
            &[["lanes", "2"], ["sidewalk", "both"]],
            HighwayType::Residential,
            Oneway::No,
        );
        assert_eq!(lanes, "sdds");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_sidewalk_none_means_shoulders() {
        let (lanes, warnings) = ascii(
            &[["lanes", "2"], ["sidewalk", "none"]],
            HighwayType::Residential,
            Oneway::No,
        );
        assert_eq!(lanes, "SddS");
        assert!(warnings
            .iter()
            .any(|d| d.code == DiagnosticCode::DeprecatedTagForm));
    }

    #[test]
    fn test_specific_side_wins() {
        let (lanes, warnings) = ascii(
            &[["sidewalk", "both"], ["sidewalk:left", "no"], ["lanes", "2"]],
            HighwayType::Residential,
            Oneway::No,
        );
        assert_eq!(lanes, "dds");
        assert!(warnings.iter().any(|d| d.code == DiagnosticCode::TagConflict));
    }

    #[test]
    fn test_motorway_shoulders_inferred() {
        let (lanes, _) = ascii(
            &[["lanes", "4"]],
            HighwayType::Classified(crate::road::HighwayImportance::Motorway),
            Oneway::No,
        );
        assert_eq!(lanes, "SddddS");
    }

    #[test]
    fn test_single_lane_oneway_gets_shoulders() {
        let (lanes, _) = ascii(
            &[["lanes", "1"], ["oneway", "yes"]],
            HighwayType::Residential,
            Oneway::Yes,
        );
        assert_eq!(lanes, "SdS");
    }

    #[test]
    fn test_residential_untagged_has_no_shoulders() {
        let (lanes, _) = ascii(&[["lanes", "2"]], HighwayType::Residential, Oneway::No);
        assert_eq!(lanes, "dd");
    }
}
