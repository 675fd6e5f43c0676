//! Walk the assembled lane list and insert a separator between every pair of
//! adjacent lanes, plus a road-edge marker where a shoulder bounds the
//! pavement.

use crate::locale::Locale;
use crate::road::{Color, Direction, Lane, Marking, Markings, Semantic, Style};

fn solid(color: Color) -> Marking {
    Marking {
        style: Style::SolidLine,
        width: Some(Marking::DEFAULT_WIDTH),
        color: Some(color),
    }
}

fn separator(semantic: Semantic, markings: Vec<Marking>) -> Lane {
    Lane::Separator {
        semantic,
        markings: Markings::new(markings),
    }
}

/// The separator between two adjacent lanes, in left-to-right order.
/// `motor_lanes` is the road's total count of motor and bus travel lanes;
/// the centre line of a plain two-lane road is painted differently from a
/// wider road's.
fn between(left: &Lane, right: &Lane, motor_lanes: usize, locale: &Locale) -> Option<Lane> {
    if matches!(left, Lane::Construction { .. }) || matches!(right, Lane::Construction { .. }) {
        return None;
    }
    // Boundaries to the walkable edge.
    if left.is_shoulder() || right.is_shoulder() || left.is_foot() || right.is_foot() {
        return Some(separator(Semantic::Shoulder, vec![solid(Color::White)]));
    }
    // Parking is delimited like a lane of its own.
    if matches!(left, Lane::Parking { .. }) || matches!(right, Lane::Parking { .. }) {
        return Some(separator(Semantic::Lane, vec![solid(Color::White)]));
    }
    if let (
        Lane::Travel {
            direction: left_direction,
            designated: left_designated,
            ..
        },
        Lane::Travel {
            direction: right_direction,
            designated: right_designated,
            ..
        },
    ) = (left, right)
    {
        if left_designated != right_designated {
            return Some(separator(Semantic::Modal, vec![solid(Color::White)]));
        }
        return Some(match (left_direction, right_direction) {
            (Some(Direction::Forward), Some(Direction::Backward))
            | (Some(Direction::Backward), Some(Direction::Forward)) => {
                let line = Marking {
                    style: Style::SolidLine,
                    width: Some(locale.separator_width()),
                    color: Some(locale.separator_color()),
                };
                if motor_lanes == 2 {
                    // The plain two-way default: a single centre line.
                    separator(Semantic::Centre, vec![line])
                } else {
                    separator(
                        Semantic::Centre,
                        vec![
                            line.clone(),
                            Marking {
                                style: Style::NoFill,
                                width: Some(Marking::DEFAULT_SPACE),
                                color: None,
                            },
                            line,
                        ],
                    )
                }
            }
            (Some(Direction::Both), _) | (_, Some(Direction::Both)) => separator(
                Semantic::Centre,
                vec![Marking {
                    style: Style::SolidLine,
                    width: Some(locale.separator_width()),
                    color: Some(locale.separator_color()),
                }],
            ),
            _ => separator(
                Semantic::Lane,
                vec![Marking {
                    style: Style::BrokenLine,
                    width: Some(Marking::DEFAULT_WIDTH),
                    color: Some(Color::White),
                }],
            ),
        });
    }
    Some(separator(Semantic::Lane, vec![solid(Color::White)]))
}

/// The road-edge marker outside the outermost lane, if any. Only a shoulder
/// is marked off from the verge.
fn edge(outermost: &Lane) -> Option<Lane> {
    if outermost.is_shoulder() {
        Some(separator(Semantic::Shoulder, vec![solid(Color::White)]))
    } else {
        None
    }
}

pub fn insert_separators(lanes: Vec<Lane>, locale: &Locale) -> Vec<Lane> {
    let motor_lanes = lanes
        .iter()
        .filter(|lane| lane.is_motor() || lane.is_bus())
        .count();
    let mut result = Vec::with_capacity(2 * lanes.len() + 1);
    if let Some(first) = lanes.first() {
        if let Some(marker) = edge(first) {
            result.push(marker);
        }
    }
    for (i, lane) in lanes.iter().enumerate() {
        if i > 0 {
            if let Some(sep) = between(&lanes[i - 1], lane, motor_lanes, locale) {
                result.push(sep);
            }
        }
        result.push(lane.clone());
    }
    if let Some(last) = lanes.last() {
        if let Some(marker) = edge(last) {
            result.push(marker);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::insert_separators;
    use crate::locale::Locale;
    use crate::road::{
        Color, Designated, Direction, Lane, Marking, Semantic, Style,
    };

    fn motor(direction: Direction) -> Lane {
        Lane::Travel {
            direction: Some(direction),
            designated: Designated::Motor,
            width: None,
            max_speed: None,
            turn: None,
            access: None,
        }
    }

    fn semantic(lane: &Lane) -> Semantic {
        match lane {
            Lane::Separator { semantic, .. } => *semantic,
            _ => panic!("not a separator: {:?}", lane),
        }
    }

    #[test]
    fn test_two_lane_centre_is_a_single_line() {
        let locale = Locale::builder().build();
        let lanes = insert_separators(
            vec![motor(Direction::Backward), motor(Direction::Forward)],
            &locale,
        );
        assert_eq!(lanes.len(), 3);
        assert_eq!(semantic(&lanes[1]), Semantic::Centre);
        match &lanes[1] {
            Lane::Separator { markings, .. } => {
                assert_eq!(markings.len(), 1);
                assert_eq!(markings[0].style, Style::SolidLine);
                assert_eq!(markings[0].color, Some(Color::White));
                assert_eq!(markings[0].width, Some(Marking::DEFAULT_WIDTH));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_wide_road_centre_is_double_solid() {
        let locale = Locale::builder().build();
        let lanes = insert_separators(
            vec![
                motor(Direction::Backward),
                motor(Direction::Backward),
                motor(Direction::Forward),
            ],
            &locale,
        );
        assert_eq!(semantic(&lanes[3]), Semantic::Centre);
        match &lanes[3] {
            Lane::Separator { markings, .. } => {
                assert_eq!(markings.len(), 3);
                assert_eq!(markings[0].style, Style::SolidLine);
                assert_eq!(markings[1].style, Style::NoFill);
                assert_eq!(markings[2].style, Style::SolidLine);
                assert_eq!(markings[0].color, Some(Color::White));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_same_direction_is_broken_line() {
        let locale = Locale::builder().build();
        let lanes = insert_separators(
            vec![motor(Direction::Forward), motor(Direction::Forward)],
            &locale,
        );
        assert_eq!(semantic(&lanes[1]), Semantic::Lane);
        match &lanes[1] {
            Lane::Separator { markings, .. } => {
                assert_eq!(markings[0].style, Style::BrokenLine);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_modal_boundary() {
        let locale = Locale::builder().build();
        let bike = Lane::Travel {
            direction: Some(Direction::Forward),
            designated: Designated::Bicycle,
            width: None,
            max_speed: None,
            turn: None,
            access: None,
        };
        let lanes = insert_separators(vec![bike, motor(Direction::Forward)], &locale);
        assert_eq!(semantic(&lanes[1]), Semantic::Modal);
    }

    #[test]
    fn test_shoulder_edges() {
        let locale = Locale::builder().build();
        let lanes = insert_separators(
            vec![
                Lane::Shoulder { width: None },
                motor(Direction::Both),
                Lane::Shoulder { width: None },
            ],
            &locale,
        );
        // Edge markers flank the shoulders, boundaries separate them from
        // the roadway.
        assert_eq!(lanes.len(), 7);
        assert!(lanes.first().unwrap().is_separator());
        assert!(lanes.last().unwrap().is_separator());
        assert_eq!(semantic(&lanes[0]), Semantic::Shoulder);
        assert_eq!(semantic(&lanes[2]), Semantic::Shoulder);
    }

    #[test]
    fn test_construction_has_no_separators() {
        let locale = Locale::builder().build();
        let lanes = insert_separators(vec![Lane::Construction { width: None }], &locale);
        assert_eq!(lanes.len(), 1);
    }
}
