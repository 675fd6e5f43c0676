/// A value at one of several confidence levels. Schemes layer evidence on
/// top of each other; stronger evidence replaces weaker, equal strength must
/// agree.
#[derive(Clone, Debug, PartialEq)]
pub enum Infer<T> {
    None,
    Default(T),
    Calculated(T),
    Direct(T),
}

#[derive(Debug)]
pub struct InferConflict;

impl std::fmt::Display for InferConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "inferred values conflict")
    }
}

impl std::error::Error for InferConflict {}

impl<T> Infer<T>
where
    T: PartialEq,
{
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Any non-`None` level as `Option::Some`.
    pub fn some(self) -> Option<T> {
        match self {
            Self::None => None,
            Self::Default(v) | Self::Calculated(v) | Self::Direct(v) => Some(v),
        }
    }

    /// Borrowing variant of `some`.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::None => None,
            Self::Default(v) | Self::Calculated(v) | Self::Direct(v) => Some(v),
        }
    }

    /// Only values read directly or derived from tags, not defaults.
    pub fn explicit(self) -> Option<T> {
        match self {
            Self::None | Self::Default(_) => None,
            Self::Calculated(v) | Self::Direct(v) => Some(v),
        }
    }

    /// `Direct` or `None` from an `Option`.
    pub fn direct(some: Option<T>) -> Self {
        match some {
            None => Self::None,
            Some(v) => Self::Direct(v),
        }
    }

    /// Replace with stronger (or equal and agreeing) evidence; a different
    /// value at the same confidence is a conflict.
    pub fn set(&mut self, value: Infer<T>) -> Result<(), InferConflict> {
        match (&mut *self, value) {
            (_, Infer::None)
            | (Infer::Direct(_), Infer::Calculated(_) | Infer::Default(_))
            | (Infer::Calculated(_), Infer::Default(_)) => Ok(()),
            (swap @ Infer::None, value)
            | (swap @ Infer::Default(_), value @ (Infer::Direct(_) | Infer::Calculated(_)))
            | (swap @ Infer::Calculated(_), value @ Infer::Direct(_)) => {
                *swap = value;
                Ok(())
            }
            (Infer::Default(left), Infer::Default(right))
            | (Infer::Calculated(left), Infer::Calculated(right))
            | (Infer::Direct(left), Infer::Direct(right)) => {
                if left == &right {
                    Ok(())
                } else {
                    Err(InferConflict)
                }
            }
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Infer<U> {
        match self {
            Infer::None => Infer::None,
            Infer::Default(v) => Infer::Default(f(v)),
            Infer::Calculated(v) => Infer::Calculated(f(v)),
            Infer::Direct(v) => Infer::Direct(f(v)),
        }
    }

    /// If `None`, fall back to `Default(d)`.
    #[must_use]
    pub fn or_default(self, d: T) -> Self {
        match self {
            Infer::None => Infer::Default(d),
            other => other,
        }
    }
}

impl<T> Default for Infer<T> {
    fn default() -> Self {
        Self::None
    }
}

impl<T> From<Option<T>> for Infer<T> {
    fn from(some: Option<T>) -> Self {
        match some {
            Some(v) => Self::Direct(v),
            None => Self::None,
        }
    }
}
