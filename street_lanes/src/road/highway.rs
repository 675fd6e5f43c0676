use serde::{Deserialize, Serialize};

/// The OSM highway classification of a way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighwayType {
    Classified(HighwayImportance),
    Link(HighwayImportance),
    Residential,
    Service,
    Unclassified,
    /// <https://wiki.openstreetmap.org/wiki/Tag:highway%3Droad>
    UnknownRoad,
    Track,
    LivingStreet,
    Footway,
    Cycleway,
    Path,
    Pedestrian,
    Steps,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd)]
pub enum HighwayImportance {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
}

impl std::fmt::Display for HighwayImportance {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Motorway => write!(f, "motorway"),
            Self::Trunk => write!(f, "trunk"),
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
            Self::Tertiary => write!(f, "tertiary"),
        }
    }
}

impl std::str::FromStr for HighwayType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "motorway" => Self::Classified(HighwayImportance::Motorway),
            "trunk" => Self::Classified(HighwayImportance::Trunk),
            "primary" => Self::Classified(HighwayImportance::Primary),
            "secondary" => Self::Classified(HighwayImportance::Secondary),
            "tertiary" => Self::Classified(HighwayImportance::Tertiary),
            "motorway_link" => Self::Link(HighwayImportance::Motorway),
            "trunk_link" => Self::Link(HighwayImportance::Trunk),
            "primary_link" => Self::Link(HighwayImportance::Primary),
            "secondary_link" => Self::Link(HighwayImportance::Secondary),
            "tertiary_link" => Self::Link(HighwayImportance::Tertiary),
            "residential" => Self::Residential,
            "service" => Self::Service,
            "unclassified" => Self::Unclassified,
            "road" => Self::UnknownRoad,
            "track" => Self::Track,
            "living_street" => Self::LivingStreet,
            "footway" => Self::Footway,
            "cycleway" => Self::Cycleway,
            "path" => Self::Path,
            "pedestrian" => Self::Pedestrian,
            "steps" => Self::Steps,
            _ => return Err(s.to_string()),
        })
    }
}

impl std::fmt::Display for HighwayType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Classified(importance) => write!(f, "{}", importance),
            Self::Link(importance) => write!(f, "{}_link", importance),
            Self::Residential => write!(f, "residential"),
            Self::Service => write!(f, "service"),
            Self::Unclassified => write!(f, "unclassified"),
            Self::UnknownRoad => write!(f, "road"),
            Self::Track => write!(f, "track"),
            Self::LivingStreet => write!(f, "living_street"),
            Self::Footway => write!(f, "footway"),
            Self::Cycleway => write!(f, "cycleway"),
            Self::Path => write!(f, "path"),
            Self::Pedestrian => write!(f, "pedestrian"),
            Self::Steps => write!(f, "steps"),
        }
    }
}

impl HighwayType {
    /// Ways that carry no motor traffic at all.
    #[must_use]
    pub fn is_non_motorized(self) -> bool {
        matches!(
            self,
            Self::Footway | Self::Cycleway | Self::Path | Self::Pedestrian | Self::Steps
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Active,
    Construction,
}

fn is_active(lifecycle: &Lifecycle) -> bool {
    *lifecycle == Lifecycle::Active
}

/// A highway classification plus its lifecycle state. A way tagged
/// `highway=construction` + `construction=residential` is a residential road
/// under construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highway {
    #[serde(
        rename = "highway",
        serialize_with = "serialize_display",
        deserialize_with = "deserialize_from_str"
    )]
    kind: HighwayType,
    #[serde(default, skip_serializing_if = "is_active")]
    lifecycle: Lifecycle,
}

impl Highway {
    #[must_use]
    pub fn active(kind: HighwayType) -> Self {
        Self {
            kind,
            lifecycle: Lifecycle::Active,
        }
    }

    #[must_use]
    pub fn construction(kind: HighwayType) -> Self {
        Self {
            kind,
            lifecycle: Lifecycle::Construction,
        }
    }

    #[must_use]
    pub fn kind(&self) -> HighwayType {
        self.kind
    }

    #[must_use]
    pub fn is_construction(&self) -> bool {
        self.lifecycle == Lifecycle::Construction
    }
}

impl std::fmt::Display for Highway {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_construction() {
            write!(f, "construction")
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

fn serialize_display<T: std::fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn deserialize_from_str<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    <T as std::str::FromStr>::Err: std::fmt::Display,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

/// The `lit=` scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lit {
    Yes,
    No,
}

impl std::str::FromStr for Lit {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(s.to_string()),
        }
    }
}

impl Lit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Highway, HighwayImportance, HighwayType};

    #[test]
    fn test_roundtrip_names() {
        for name in [
            "motorway",
            "primary_link",
            "residential",
            "living_street",
            "road",
            "cycleway",
        ] {
            let kind: HighwayType = name.parse().unwrap();
            assert_eq!(kind.to_string(), name);
        }
        assert!("spaceway".parse::<HighwayType>().is_err());
    }

    #[test]
    fn test_importance_order() {
        assert!(HighwayImportance::Motorway < HighwayImportance::Tertiary);
    }

    #[test]
    fn test_serde() {
        let highway = Highway::active(HighwayType::Residential);
        assert_eq!(
            serde_json::to_string(&highway).unwrap(),
            r#"{"highway":"residential"}"#
        );
        let back: Highway = serde_json::from_str(r#"{"highway":"residential"}"#).unwrap();
        assert_eq!(back, highway);
    }
}
