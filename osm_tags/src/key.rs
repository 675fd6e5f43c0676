use std::fmt;

/// An OSM tag key. Either a compile-time constant or built at runtime by
/// joining path segments with `:`.
#[derive(Clone, Debug)]
pub enum TagKey {
    Static(&'static str),
    String(String),
}

impl TagKey {
    pub const fn from_static(string: &'static str) -> Self {
        TagKey::Static(string)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Static(v) => v,
            Self::String(v) => v.as_str(),
        }
    }
}

impl From<&'static str> for TagKey {
    fn from(string: &'static str) -> Self {
        TagKey::Static(string)
    }
}

impl From<String> for TagKey {
    fn from(string: String) -> Self {
        TagKey::String(string)
    }
}

impl AsRef<str> for TagKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::ops::Add for TagKey {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        TagKey::String(format!("{}:{}", self.as_str(), other.as_str()))
    }
}

impl std::ops::Add<&'static str> for TagKey {
    type Output = Self;
    fn add(self, other: &'static str) -> Self {
        self.add(TagKey::from(other))
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PartialEq for TagKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TagKey {}

#[cfg(test)]
mod tests {
    use super::TagKey;

    #[test]
    fn test_join() {
        const CYCLEWAY: TagKey = TagKey::from_static("cycleway");
        let key = CYCLEWAY + "left" + "oneway";
        assert_eq!(key.as_str(), "cycleway:left:oneway");
    }
}
