use osm_tags::Tags;
use serde::Serialize;

use crate::road::Road;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// A stable identifier for each kind of issue the transformation can hit.
/// Codes keep their meaning across versions; callers may match on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    // Structural: assembly is meaningless, the call aborts.
    UnknownHighwayClass,
    MalformedLaneCount,
    UnitParseFailure,
    NegativeWidth,
    Internal,
    // Descriptive: input is ambiguous, assembly picked a defensible default.
    InconsistentOneway,
    UnconsumedKnownTag,
    TagConflict,
    LaneCountMismatch,
    DeprecatedTagForm,
    AmbiguousDirection,
    UnknownValue,
    Unrepresentable,
    Roundtrip,
}

impl DiagnosticCode {
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::UnknownHighwayClass
            | Self::MalformedLaneCount
            | Self::UnitParseFailure
            | Self::NegativeWidth
            | Self::Internal => Severity::Error,
            Self::InconsistentOneway
            | Self::UnconsumedKnownTag
            | Self::TagConflict
            | Self::LaneCountMismatch
            | Self::DeprecatedTagForm
            | Self::AmbiguousDirection
            | Self::UnknownValue
            | Self::Unrepresentable
            | Self::Roundtrip => Severity::Warning,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownHighwayClass => "unknown_highway_class",
            Self::MalformedLaneCount => "malformed_lane_count",
            Self::UnitParseFailure => "unit_parse_failure",
            Self::NegativeWidth => "negative_width",
            Self::Internal => "internal",
            Self::InconsistentOneway => "inconsistent_oneway",
            Self::UnconsumedKnownTag => "unconsumed_known_tag",
            Self::TagConflict => "tag_conflict",
            Self::LaneCountMismatch => "lane_count_mismatch",
            Self::DeprecatedTagForm => "deprecated_tag_form",
            Self::AmbiguousDirection => "ambiguous_direction",
            Self::UnknownValue => "unknown_value",
            Self::Unrepresentable => "unrepresentable",
            Self::Roundtrip => "roundtrip",
        }
    }
}

/// One issue found during a transformation: what went wrong and which input
/// tags triggered it.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    /// The offending input tags, for presentation.
    pub keys: Tags,
}

impl Serialize for Diagnostic {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Diagnostic", 4)?;
        state.serialize_field("severity", &self.severity())?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("offending_keys", &self.keys)?;
        state.end()
    }
}

impl Diagnostic {
    #[must_use]
    pub fn new(code: DiagnosticCode, message: impl Into<String>, keys: Tags) -> Self {
        Self {
            code,
            message: message.into(),
            keys,
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let severity = match self.severity() {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}[{}]: {}", severity, self.code.as_str(), self.message)?;
        if !self.keys.is_empty() {
            write!(f, " ({})", self.keys.to_vec().join(" "))?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// The accumulated warnings of one transformation call.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Diagnostic] {
        self.0.as_slice()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .map(Diagnostic::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}

/// A failed transformation: the structural error, plus whatever warnings had
/// accumulated before it.
#[derive(Clone, Debug, Serialize)]
pub struct RoadError {
    pub diagnostic: Diagnostic,
    pub warnings: Diagnostics,
}

impl RoadError {
    #[must_use]
    pub fn new(diagnostic: Diagnostic, warnings: Diagnostics) -> Self {
        Self {
            diagnostic,
            warnings,
        }
    }

    /// Promote accumulated warnings to an error, for callers that want
    /// strictness.
    #[must_use]
    pub fn promoted(warnings: Diagnostics) -> Self {
        let diagnostic = warnings.as_slice().first().cloned().unwrap_or_else(|| {
            Diagnostic::new(
                DiagnosticCode::Internal,
                "no warnings to promote",
                Tags::empty(),
            )
        });
        Self {
            diagnostic,
            warnings,
        }
    }
}

impl std::fmt::Display for RoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.diagnostic.fmt(f)
    }
}

impl std::error::Error for RoadError {}

/// A successful tags-to-lanes transformation.
#[derive(Clone, Debug, Serialize)]
pub struct RoadFromTags {
    pub road: Road,
    pub warnings: Diagnostics,
}

/// A successful lanes-to-tags projection.
#[derive(Clone, Debug, Serialize)]
pub struct TagsFromLanes {
    pub tags: Tags,
    pub warnings: Diagnostics,
}

#[cfg(test)]
mod tests {
    use osm_tags::Tags;

    use super::{Diagnostic, DiagnosticCode, Severity};

    #[test]
    fn test_severity() {
        assert_eq!(
            DiagnosticCode::MalformedLaneCount.severity(),
            Severity::Error
        );
        assert_eq!(DiagnosticCode::TagConflict.severity(), Severity::Warning);
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(
            DiagnosticCode::MalformedLaneCount,
            "cannot parse lane count",
            Tags::from_pair("lanes", "0"),
        );
        assert_eq!(
            diagnostic.to_string(),
            "error[malformed_lane_count]: cannot parse lane count (lanes=0)"
        );
    }

    #[test]
    fn test_serde() {
        let diagnostic = Diagnostic::new(
            DiagnosticCode::TagConflict,
            "conflicting sidewalk tags",
            Tags::from_pair("sidewalk", "both"),
        );
        assert_eq!(
            serde_json::to_string(&diagnostic).unwrap(),
            r#"{"severity":"warning","code":"tag_conflict","message":"conflicting sidewalk tags","offending_keys":{"sidewalk":"both"}}"#
        );
    }
}
