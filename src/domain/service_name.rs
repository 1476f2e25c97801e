use serde::Serialize;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};
use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn parse(s: String) -> Result<ServiceName, String> {
        let trimmed = s.trim();
        match trimmed {
            _ if trimmed.is_empty() => Err(format!(
                "Service name is empty or contains whitespace only: `{s}`"
            )),
            _ if trimmed.graphemes(true).count() > MAX_GRAPHEMES => Err(format!(
                "Service name `{trimmed}` is longer than {MAX_GRAPHEMES} graphemes"
            )),
            _ => Ok(Self(trimmed.to_owned())),
        }
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Type<Postgres> for ServiceName {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

/// Rows are read back as stored. Rules are enforced when a value is written.
impl<'r> Decode<'r, Postgres> for ServiceName {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let name = String::decode(value)?;
        Ok(Self(name))
    }
}
