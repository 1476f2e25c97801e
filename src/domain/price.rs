use serde::Serialize;
use sqlx::{
    error::BoxDynError,
    postgres::{PgTypeInfo, PgValueRef},
    Decode, Postgres, Type,
};

/// Monthly price in minor currency units. Always strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Price(i32);

impl Price {
    pub fn parse(value: i64) -> Result<Price, String> {
        match i32::try_from(value) {
            Ok(price) if price > 0 => Ok(Self(price)),
            Ok(_) => Err(format!("Price must be greater than zero, got `{value}`")),
            Err(_) => Err(format!("Price `{value}` is too large")),
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl Type<Postgres> for Price {
    fn type_info() -> PgTypeInfo {
        i32::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Price {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let price = i32::decode(value)?;
        Ok(Self(price))
    }
}
