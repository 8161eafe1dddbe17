use std::{fmt::Display, ops::Deref};

use egui::WidgetText;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{errors::ConversionError, id::DbId};

use super::{Permission, RawPermission};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Role {
    pub id: Option<DbId>,
    pub name: RoleName,
    pub is_active: bool,
    pub permissions: Vec<Permission>,
}

/// Role as sent by the backend, nothing is guaranteed to be present
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RawRole {
    pub id: Option<DbId>,
    pub name: Option<String>,
    #[serde(alias = "isActive", alias = "active")]
    pub is_active: Option<bool>,
    pub permissions: Option<Vec<RawPermission>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoleName(String);

impl RoleName {
    pub const MAX_LENGTH: usize = 64;
}

impl TryFrom<String> for RoleName {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for RoleName {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

impl Deref for RoleName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0[..]
    }
}

impl Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&RoleName> for WidgetText {
    fn from(value: &RoleName) -> Self {
        (&value.0).into()
    }
}

impl TryFrom<RawRole> for Role {
    type Error = ConversionError;

    /// Permissions that cannot be normalized are dropped (and logged) instead
    /// of failing the whole role
    fn try_from(value: RawRole) -> Result<Self, Self::Error> {
        let name: RoleName = value
            .name
            .ok_or(ConversionError::MissingField("name"))?
            .try_into()?;
        let permissions = value
            .permissions
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| match Permission::try_from(raw.clone()) {
                Ok(permission) => Some(permission),
                Err(e) => {
                    warn!(role = %name, ?raw, "dropping invalid permission: {e}");
                    None
                }
            })
            .collect();
        Ok(Self {
            id: value.id,
            name,
            is_active: value.is_active.unwrap_or(true),
            permissions,
        })
    }
}
