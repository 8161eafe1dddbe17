//! Shared items related to user account control
//!
//! Backend payloads are received as the `Raw*` types and normalized into the
//! strict types before any access decision is made on them

mod errors;
mod evaluator;
mod ownership;
mod permissions;
mod responses;
mod role;
mod user;

pub use errors::AuthError;
pub use evaluator::{AccessRequirement, PermissionEvaluator};
pub use ownership::{OwnedResource, OwnershipRule, ResourceOwner};
pub use permissions::{GuardName, Permission, RawPermission};
pub use responses::{CurrentUserResponseData, LoginResponseData};
pub use role::{RawRole, Role, RoleName};
pub use user::{RawPartnerRef, RawUserProfile, UserProfile, Username};
