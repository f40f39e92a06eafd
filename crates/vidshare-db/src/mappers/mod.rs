//! Entity <-> model mappers
//!
//! - `From<Model> for Entity`: convert database rows to domain objects
//! - `snowflakes` / `raw_ids`: convert id sets between `BIGINT[]` and `Snowflake`

mod channel;
mod comment;
mod user;
mod video;

use vidshare_core::value_objects::Snowflake;

/// Convert a `BIGINT[]` column to domain ids
pub fn snowflakes(raw: Vec<i64>) -> Vec<Snowflake> {
    raw.into_iter().map(Snowflake::new).collect()
}

/// Convert domain ids to a bindable `BIGINT[]`
pub fn raw_ids(ids: &[Snowflake]) -> Vec<i64> {
    ids.iter().map(|id| id.into_inner()).collect()
}
