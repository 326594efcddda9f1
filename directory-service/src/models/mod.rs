pub mod claims;
pub mod criterion;
pub mod identifier;
pub mod party;
pub mod permission;
pub mod query;
pub mod role;
pub mod user;

pub use claims::{Claims, WrappedClaims};
pub use criterion::{Criterion, WrappedCriterion};
pub use identifier::{Identifier, WrappedIdentifier};
pub use party::{Id, PartyDetails, PartyType};
pub use permission::{ApiPermission, ViewPermission};
pub use query::{Query, SortOrder};
pub use role::Role;
pub use user::User;
