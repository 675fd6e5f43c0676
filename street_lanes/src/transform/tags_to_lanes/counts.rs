use osm_tags::{TagKey, TagSource};

use super::infer::Infer;
use super::oneway::Oneway;
use crate::locale::Locale;
use crate::transform::error::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::transform::keys;

/// The number of lanes for motor vehicle traffic, before any modal lanes are
/// added. See <https://wiki.openstreetmap.org/wiki/Key:lanes>.
#[derive(Debug)]
pub enum Counts {
    /// One bidirectional lane, e.g. an alleyway or narrow unmarked road.
    One,
    Directional {
        forward: Infer<usize>,
        backward: Infer<usize>,
        centre_turn_lane: Infer<bool>,
    },
}

fn count(source: &TagSource, key: &TagKey) -> Result<Option<usize>, Diagnostic> {
    match source.get_consume(key) {
        None => Ok(None),
        Some(v) => v.parse::<usize>().map(Some).map_err(|_| {
            Diagnostic::new(
                DiagnosticCode::MalformedLaneCount,
                format!("cannot parse {}={} as a lane count", key, v),
                source.subset(std::slice::from_ref(key)),
            )
        }),
    }
}

/// The deprecated `centre_turn_lane=` tag.
/// See <https://wiki.openstreetmap.org/wiki/Key:centre_turn_lane>.
fn deprecated_centre_turn_lane(source: &TagSource, warnings: &mut Diagnostics) -> Option<bool> {
    let value = source.get_consume(keys::CENTRE_TURN_LANE)?;
    warnings.push(Diagnostic::new(
        DiagnosticCode::DeprecatedTagForm,
        "centre_turn_lane is deprecated, use lanes:both_ways",
        source.subset(&[keys::CENTRE_TURN_LANE]),
    ));
    match value.to_ascii_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        v => {
            warnings.push(Diagnostic::new(
                DiagnosticCode::UnknownValue,
                format!("unknown centre_turn_lane value '{}'", v),
                source.subset(&[keys::CENTRE_TURN_LANE]),
            ));
            None
        }
    }
}

impl Counts {
    /// Parse and validate `lanes[:forward|:backward|:both_ways]=` plus the
    /// deprecated `centre_turn_lane=`.
    ///
    /// A centre turn lane counts towards `lanes=` only when it comes from
    /// `lanes:both_ways`; the deprecated tag describes a lane in addition to
    /// the counted ones.
    pub(super) fn new(
        source: &TagSource,
        oneway: Oneway,
        _locale: &Locale,
        warnings: &mut Diagnostics,
    ) -> Result<Self, Diagnostic> {
        let total = count(source, &keys::LANES)?;
        if total == Some(0) {
            return Err(Diagnostic::new(
                DiagnosticCode::MalformedLaneCount,
                "a road cannot have zero lanes",
                source.subset(&[keys::LANES]),
            ));
        }
        let forward = count(source, &(keys::LANES + "forward"))?;
        let backward = count(source, &(keys::LANES + "backward"))?;
        let both_ways = count(source, &(keys::LANES + "both_ways"))?;
        if both_ways.map_or(false, |n| n > 1) {
            warnings.push(Diagnostic::new(
                DiagnosticCode::LaneCountMismatch,
                "lanes:both_ways above 1 is not representable, using 1",
                source.subset(&[keys::LANES + "both_ways"]),
            ));
        }
        let deprecated_centre = deprecated_centre_turn_lane(source, warnings);

        if bool::from(oneway) {
            if both_ways.map_or(false, |n| n >= 1) || deprecated_centre == Some(true) {
                warnings.push(Diagnostic::new(
                    DiagnosticCode::InconsistentOneway,
                    "a oneway road cannot have a centre turn lane",
                    source.subset(&[
                        keys::ONEWAY,
                        keys::LANES + "both_ways",
                        keys::CENTRE_TURN_LANE,
                    ]),
                ));
            }
            if backward.map_or(false, |n| n > 0) {
                warnings.push(Diagnostic::new(
                    DiagnosticCode::InconsistentOneway,
                    "a oneway road cannot have backward lanes",
                    source.subset(&[keys::ONEWAY, keys::LANES + "backward"]),
                ));
            }
            let forward = match (total, forward) {
                (Some(t), Some(f)) => {
                    if t != f {
                        warnings.push(Diagnostic::new(
                            DiagnosticCode::TagConflict,
                            "lanes and lanes:forward disagree on a oneway road",
                            source.subset(&[keys::LANES, keys::LANES + "forward"]),
                        ));
                    }
                    Infer::Direct(f)
                }
                (Some(t), None) => Infer::Direct(t),
                (None, Some(f)) => Infer::Direct(f),
                (None, None) => Infer::Default(1),
            };
            return Ok(Self::Directional {
                forward,
                backward: Infer::Default(0),
                centre_turn_lane: Infer::Default(false),
            });
        }

        // Two-way. A centre lane from lanes:both_ways is part of the total.
        let centre_counted = usize::from(both_ways.map_or(false, |n| n >= 1));
        let centre_turn_lane = match (both_ways, deprecated_centre) {
            (Some(n), _) if n >= 1 => Infer::Direct(true),
            (_, Some(yes)) => Infer::Calculated(yes),
            (_, None) => Infer::Default(false),
        };

        Ok(match (total, forward, backward) {
            (Some(t), Some(f), Some(b)) => {
                if t != f + b + centre_counted {
                    warnings.push(Diagnostic::new(
                        DiagnosticCode::TagConflict,
                        "lanes does not equal lanes:forward + lanes:backward",
                        source.subset(&[
                            keys::LANES,
                            keys::LANES + "forward",
                            keys::LANES + "backward",
                            keys::LANES + "both_ways",
                        ]),
                    ));
                }
                Self::Directional {
                    forward: Infer::Direct(f),
                    backward: Infer::Direct(b),
                    centre_turn_lane,
                }
            }
            (None, Some(f), Some(b)) => Self::Directional {
                forward: Infer::Direct(f),
                backward: Infer::Direct(b),
                centre_turn_lane,
            },
            (Some(t), Some(f), None) => Self::Directional {
                forward: Infer::Direct(f),
                backward: Infer::Calculated(subtract_or_conflict(t, f + centre_counted, source, warnings)),
                centre_turn_lane,
            },
            (Some(t), None, Some(b)) => Self::Directional {
                forward: Infer::Calculated(subtract_or_conflict(t, b + centre_counted, source, warnings)),
                backward: Infer::Direct(b),
                centre_turn_lane,
            },
            (Some(1), None, None) => {
                if centre_counted == 1 {
                    warnings.push(Diagnostic::new(
                        DiagnosticCode::TagConflict,
                        "lanes=1 leaves no room next to the centre turn lane",
                        source.subset(&[keys::LANES, keys::LANES + "both_ways"]),
                    ));
                }
                Self::One
            }
            (Some(t), None, None) => {
                // Split a bare total evenly; the extra lane of an odd count
                // goes forward, which keeps the road identical under
                // mirroring between locales.
                let rem = subtract_or_conflict(t, centre_counted, source, warnings);
                let forward = (rem + 1) / 2;
                Self::Directional {
                    forward: Infer::Default(forward),
                    backward: Infer::Default(rem - forward),
                    centre_turn_lane,
                }
            }
            (None, f, b) => Self::Directional {
                forward: Infer::from(f).or_default(1),
                backward: Infer::from(b).or_default(1),
                centre_turn_lane,
            },
        })
    }
}

fn subtract_or_conflict(
    total: usize,
    used: usize,
    source: &TagSource,
    warnings: &mut Diagnostics,
) -> usize {
    total.checked_sub(used).unwrap_or_else(|| {
        warnings.push(Diagnostic::new(
            DiagnosticCode::TagConflict,
            "directional lane counts exceed the total",
            source.subset(&[
                keys::LANES,
                keys::LANES + "forward",
                keys::LANES + "backward",
                keys::LANES + "both_ways",
            ]),
        ));
        0
    })
}

#[cfg(test)]
mod tests {
    use osm_tags::{TagSource, Tags};

    use super::{Counts, Oneway};
    use crate::locale::{DrivingSide, Locale};
    use crate::transform::Diagnostics;

    fn parse(pairs: &[[&str; 2]], oneway: Oneway, side: DrivingSide) -> (Counts, Diagnostics) {
        let tags = Tags::from_pairs(pairs.iter().copied()).unwrap();
        let source = TagSource::new(&tags);
        let locale = Locale::builder().driving_side(side).build();
        let mut warnings = Diagnostics::default();
        let counts = Counts::new(&source, oneway, &locale, &mut warnings).unwrap();
        (counts, warnings)
    }

    fn directional(counts: &Counts) -> (usize, usize, bool) {
        match counts {
            Counts::One => panic!("expected directional counts"),
            Counts::Directional {
                forward,
                backward,
                centre_turn_lane,
            } => (
                *forward.as_option().unwrap(),
                *backward.as_option().unwrap(),
                *centre_turn_lane.as_option().unwrap(),
            ),
        }
    }

    #[test]
    fn test_even_split() {
        let (counts, warnings) = parse(&[["lanes", "4"]], Oneway::No, DrivingSide::Right);
        assert_eq!(directional(&counts), (2, 2, false));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_odd_split_extra_lane_forward() {
        let (counts, _) = parse(&[["lanes", "3"]], Oneway::No, DrivingSide::Right);
        assert_eq!(directional(&counts), (2, 1, false));
        let (counts, _) = parse(&[["lanes", "3"]], Oneway::No, DrivingSide::Left);
        assert_eq!(directional(&counts), (2, 1, false));
    }

    #[test]
    fn test_oneway_all_forward() {
        let (counts, warnings) = parse(
            &[["lanes", "2"], ["oneway", "yes"]],
            Oneway::Yes,
            DrivingSide::Right,
        );
        assert_eq!(directional(&counts), (2, 0, false));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_oneway_backward_warns() {
        let (counts, warnings) = parse(
            &[["lanes", "2"], ["oneway", "yes"], ["lanes:backward", "1"]],
            Oneway::Yes,
            DrivingSide::Right,
        );
        assert_eq!(directional(&counts), (2, 0, false));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_zero_lanes_is_an_error() {
        let tags = Tags::from_pair("lanes", "0");
        let source = TagSource::new(&tags);
        let locale = Locale::builder().build();
        let mut warnings = Diagnostics::default();
        assert!(Counts::new(&source, Oneway::No, &locale, &mut warnings).is_err());
    }

    #[test]
    fn test_both_ways_counts_towards_total() {
        let (counts, _) = parse(
            &[["lanes", "3"], ["lanes:both_ways", "1"]],
            Oneway::No,
            DrivingSide::Right,
        );
        assert_eq!(directional(&counts), (1, 1, true));
    }

    #[test]
    fn test_deprecated_centre_is_extra() {
        let (counts, warnings) = parse(
            &[["lanes", "3"], ["centre_turn_lane", "yes"]],
            Oneway::No,
            DrivingSide::Right,
        );
        assert_eq!(directional(&counts), (2, 1, true));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_untagged_defaults() {
        let (counts, _) = parse(&[], Oneway::No, DrivingSide::Right);
        assert_eq!(directional(&counts), (1, 1, false));
        let (counts, _) = parse(&[], Oneway::Yes, DrivingSide::Right);
        assert_eq!(directional(&counts), (1, 0, false));
    }

    #[test]
    fn test_single_lane_road() {
        let (counts, _) = parse(&[["lanes", "1"]], Oneway::No, DrivingSide::Right);
        assert!(matches!(counts, Counts::One));
    }
}
