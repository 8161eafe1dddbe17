use crate::id::DbId;

use super::UserProfile;

/// Pair of permissions for acting on a type of resource: `broad` works on any
/// resource of the type, `narrow` only on the user's own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipRule<'a> {
    pub broad: &'a str,
    pub narrow: &'a str,
}

/// Who a resource belongs to, either directly or through a partner
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResourceOwner {
    pub user_id: Option<DbId>,
    pub partner_id: Option<DbId>,
}

pub trait OwnedResource {
    fn owner(&self) -> ResourceOwner;
}

impl OwnedResource for ResourceOwner {
    fn owner(&self) -> ResourceOwner {
        *self
    }
}

impl ResourceOwner {
    /// Owned when the owning user is this user or when both sides have the
    /// same partner. A missing partner never matches.
    pub fn is_owned_by(&self, user: &UserProfile) -> bool {
        let same_user = self.user_id == Some(user.id);
        let same_partner = match (self.partner_id, user.partner_id) {
            (Some(resource_partner), Some(user_partner)) => resource_partner == user_partner,
            _ => false,
        };
        same_user || same_partner
    }
}
