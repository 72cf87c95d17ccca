//! Claim records and the claim schema
//!
//! Predicate, outcome and correlation identifier are always present and
//! typed on a stored claim; everything beyond the core record lives in an
//! open attribute map.

mod errors;
mod schema;
mod types;

pub use errors::{SchemaError, SchemaViolation};
pub use schema::{check_claim, parse_claim, RESERVED_FIELDS};
pub use types::{Attributes, Claim, NewClaim};
