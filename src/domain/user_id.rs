use serde::Serialize;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};
use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 256;

/// Opaque owner identifier. Not checked against any user table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn parse(s: String) -> Result<UserId, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err(format!("User id is empty or contains whitespace only: `{s}`"))
        } else if trimmed.graphemes(true).count() > MAX_GRAPHEMES {
            Err(format!("User id is longer than {MAX_GRAPHEMES} graphemes"))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Type<Postgres> for UserId {
    fn type_info() -> PgTypeInfo {
        String::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for UserId {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let user_id = String::decode(value)?;
        Ok(Self(user_id))
    }
}
