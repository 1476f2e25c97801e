use serde::{Deserialize, Deserializer};

/// Patch state of a nullable column.
///
/// Deserializes `null` as [`FieldPatch::Clear`] and a value as
/// [`FieldPatch::Set`]; pair with `#[serde(default)]` so a missing key becomes
/// [`FieldPatch::Unchanged`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldPatch<T> {
    Unchanged,
    Clear,
    Set(T),
}

impl<T> Default for FieldPatch<T> {
    fn default() -> Self {
        FieldPatch::Unchanged
    }
}

impl<T> FieldPatch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldPatch::Unchanged)
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<FieldPatch<U>, E> {
        Ok(match self {
            FieldPatch::Unchanged => FieldPatch::Unchanged,
            FieldPatch::Clear => FieldPatch::Clear,
            FieldPatch::Set(value) => FieldPatch::Set(f(value)?),
        })
    }

    /// The column value to write, or `None` when the column is left alone.
    pub fn into_update(self) -> Option<Option<T>> {
        match self {
            FieldPatch::Unchanged => None,
            FieldPatch::Clear => Some(None),
            FieldPatch::Set(value) => Some(Some(value)),
        }
    }
}

impl<'de, T> Deserialize<'de> for FieldPatch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => FieldPatch::Set(value),
            None => FieldPatch::Clear,
        })
    }
}
