use osm_tags::TagSource;

use crate::transform::error::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::transform::keys;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Oneway {
    Yes,
    No,
}

impl From<bool> for Oneway {
    fn from(oneway: bool) -> Self {
        if oneway {
            Oneway::Yes
        } else {
            Oneway::No
        }
    }
}

impl From<Oneway> for bool {
    fn from(oneway: Oneway) -> Self {
        oneway == Oneway::Yes
    }
}

/// The `oneway=` scheme. `oneway=-1` means the way runs against its drawn
/// direction; it is normalized to a plain oneway here and every forward lane
/// flips to backward once the lane list is final.
#[derive(Debug)]
pub struct OnewayScheme {
    pub oneway: Oneway,
    pub reversed: bool,
}

impl OnewayScheme {
    pub fn from_source(source: &TagSource, warnings: &mut Diagnostics) -> Self {
        let roundabout = source.is(keys::JUNCTION, "roundabout");
        let (oneway, reversed) = match source
            .get_consume(keys::ONEWAY)
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yes" | "true" | "1") => (Oneway::Yes, false),
            Some("-1" | "reverse") => (Oneway::Yes, true),
            Some("no" | "false" | "0") => {
                if roundabout {
                    warnings.push(Diagnostic::new(
                        DiagnosticCode::AmbiguousDirection,
                        "oneway=no on a roundabout",
                        source.subset(&[keys::ONEWAY, keys::JUNCTION]),
                    ));
                    (Oneway::Yes, false)
                } else {
                    (Oneway::No, false)
                }
            }
            Some(v) => {
                warnings.push(Diagnostic::new(
                    DiagnosticCode::UnknownValue,
                    format!("unknown oneway value '{}'", v),
                    source.subset(&[keys::ONEWAY]),
                ));
                (Oneway::from(roundabout), false)
            }
            None => (Oneway::from(roundabout), false),
        };
        Self { oneway, reversed }
    }
}

#[cfg(test)]
mod tests {
    use osm_tags::{TagSource, Tags};

    use super::{Oneway, OnewayScheme};
    use crate::transform::Diagnostics;

    fn parse(tags: &Tags) -> (OnewayScheme, Diagnostics) {
        let source = TagSource::new(tags);
        let mut warnings = Diagnostics::default();
        let scheme = OnewayScheme::from_source(&source, &mut warnings);
        (scheme, warnings)
    }

    #[test]
    fn test_values() {
        let (scheme, warnings) = parse(&Tags::from_pair("oneway", "yes"));
        assert_eq!(scheme.oneway, Oneway::Yes);
        assert!(!scheme.reversed);
        assert!(warnings.is_empty());

        let (scheme, _) = parse(&Tags::from_pair("oneway", "-1"));
        assert_eq!(scheme.oneway, Oneway::Yes);
        assert!(scheme.reversed);

        let (scheme, _) = parse(&Tags::from_pair("junction", "roundabout"));
        assert_eq!(scheme.oneway, Oneway::Yes);

        let (scheme, warnings) = parse(&Tags::from_pair("oneway", "sideways"));
        assert_eq!(scheme.oneway, Oneway::No);
        assert_eq!(warnings.len(), 1);
    }
}
