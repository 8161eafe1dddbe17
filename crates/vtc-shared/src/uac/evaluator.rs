use tracing::instrument;

use crate::const_config::uac::{UAC_ALL_ACCESS_GUARD, UAC_SUPER_ADMIN_ROLE};

use super::{OwnedResource, OwnershipRule, Permission, RoleName, UserProfile};

/// Answers "may the current user do X" from the user's roles
///
/// Holds no state of its own. Every question is answered from the user it was
/// created with so it should be recreated whenever the user may have changed.
/// Having no user (not logged in) denies everything.
#[derive(Debug, Clone, Copy)]
pub struct PermissionEvaluator<'a> {
    user: Option<&'a UserProfile>,
}

/// What a caller needs before showing or allowing something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRequirement<'a> {
    Single(&'a str),
    Many {
        guard_names: &'a [&'a str],
        require_all: bool,
    },
}

impl<'a> AccessRequirement<'a> {
    pub fn any(guard_names: &'a [&'a str]) -> Self {
        Self::from_list(guard_names, false)
    }

    pub fn all(guard_names: &'a [&'a str]) -> Self {
        Self::from_list(guard_names, true)
    }

    pub fn from_list(guard_names: &'a [&'a str], require_all: bool) -> Self {
        Self::Many {
            guard_names,
            require_all,
        }
    }
}

impl<'a> From<&'a str> for AccessRequirement<'a> {
    fn from(value: &'a str) -> Self {
        Self::Single(value)
    }
}

impl<'a> From<&'a [&'a str]> for AccessRequirement<'a> {
    /// Lists default to "any of"
    fn from(value: &'a [&'a str]) -> Self {
        Self::any(value)
    }
}

impl<'a> PermissionEvaluator<'a> {
    pub fn new(user: Option<&'a UserProfile>) -> Self {
        Self { user }
    }

    pub fn user(&self) -> Option<&'a UserProfile> {
        self.user
    }

    /// Every permission of every role the user has. May contain duplicates
    pub fn all_permissions(&self) -> impl Iterator<Item = &'a Permission> + 'a {
        self.user
            .into_iter()
            .flat_map(|user| user.roles.iter())
            .flat_map(|role| role.permissions.iter())
    }

    pub fn has_permission(&self, guard_name: &str) -> bool {
        self.all_permissions()
            .any(|permission| &*permission.guard_name == guard_name)
    }

    pub fn has_any_permission(&self, guard_names: &[&str]) -> bool {
        guard_names.iter().any(|x| self.has_permission(x))
    }

    /// NB: An empty list is allowed
    pub fn has_all_permissions(&self, guard_names: &[&str]) -> bool {
        guard_names.iter().all(|x| self.has_permission(x))
    }

    pub fn has_all_access(&self) -> bool {
        self.has_permission(UAC_ALL_ACCESS_GUARD)
    }

    pub fn role_names(&self) -> impl Iterator<Item = &'a RoleName> + 'a {
        self.user
            .into_iter()
            .flat_map(|user| user.roles.iter())
            .map(|role| &role.name)
    }

    pub fn has_role(&self, role_name: &str) -> bool {
        self.role_names().any(|name| &**name == role_name)
    }

    /// Checks the user's roles against an allow-list. The super admin role
    /// and the all access permission pass any list. An empty list allows any
    /// logged in user.
    #[instrument(ret, skip(self), fields(user = ?self.user.map(|x| &x.username)))]
    pub fn has_required_role(&self, required_roles: &[&str]) -> bool {
        if self.user.is_none() {
            return false;
        }
        if required_roles.is_empty() || self.has_all_access() {
            return true;
        }
        self.role_names().any(|name| {
            &**name == UAC_SUPER_ADMIN_ROLE || required_roles.iter().any(|x| &**name == *x)
        })
    }

    /// The single entry point used by the gating UI. All access is checked
    /// before the requirement itself.
    #[instrument(ret, skip(self), fields(user = ?self.user.map(|x| &x.username)))]
    pub fn allows(&self, requirement: &AccessRequirement<'_>) -> bool {
        if self.has_all_access() {
            return true;
        }
        match requirement {
            AccessRequirement::Single(guard_name) => self.has_permission(guard_name),
            AccessRequirement::Many {
                guard_names,
                require_all: true,
            } => self.has_all_permissions(guard_names),
            AccessRequirement::Many {
                guard_names,
                require_all: false,
            } => self.has_any_permission(guard_names),
        }
    }

    /// All access, or the broad permission, or the narrow permission on a
    /// resource the user owns
    #[instrument(ret, skip(self, resource), fields(user = ?self.user.map(|x| &x.username)))]
    pub fn can_act_on<R: OwnedResource + ?Sized>(
        &self,
        rule: &OwnershipRule<'_>,
        resource: &R,
    ) -> bool {
        let Some(user) = self.user else {
            return false;
        };
        self.has_all_access()
            || self.has_permission(rule.broad)
            || (self.has_permission(rule.narrow) && resource.owner().is_owned_by(user))
    }
}
