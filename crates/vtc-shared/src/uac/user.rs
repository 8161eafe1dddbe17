use std::fmt::Display;

use egui::WidgetText;
use tracing::warn;

use crate::{errors::ConversionError, id::DbId};

use super::{RawRole, Role};

#[derive(
    Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
/// Represents a username and is constrained to not be an empty string
pub struct Username(String);

impl Username {
    pub const MAX_LENGTH: usize = 64;
}

impl TryFrom<String> for Username {
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

impl TryFrom<&str> for Username {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Username> for WidgetText {
    fn from(value: &Username) -> Self {
        (&value.0).into()
    }
}

/// The logged in user as known to the dashboard
///
/// Replaced as a whole on login or session restoration and never edited in
/// place
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: DbId,
    pub username: Username,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    /// Set when the user acts on behalf of a partner company
    pub partner_id: Option<DbId>,
    pub roles: Vec<Role>,
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RawPartnerRef {
    pub id: Option<DbId>,
}

/// User as sent by the backend, nothing is guaranteed to be present
#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RawUserProfile {
    pub id: Option<DbId>,
    #[serde(alias = "userName")]
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(alias = "phoneNumber", alias = "phone_number")]
    pub phone: Option<String>,
    #[serde(alias = "partnerId")]
    pub partner_id: Option<DbId>,
    pub partner: Option<RawPartnerRef>,
    pub roles: Option<Vec<RawRole>>,
}

impl TryFrom<RawUserProfile> for UserProfile {
    type Error = ConversionError;

    /// The username falls back to the email when the backend only identifies
    /// users by email. Roles that cannot be normalized are dropped (and
    /// logged).
    fn try_from(value: RawUserProfile) -> Result<Self, Self::Error> {
        let id = value.id.ok_or(ConversionError::MissingField("id"))?;
        let username: Username = value
            .username
            .filter(|x| !x.trim().is_empty())
            .or_else(|| value.email.clone())
            .ok_or(ConversionError::MissingField("username"))?
            .try_into()?;
        let partner_id = value
            .partner_id
            .or_else(|| value.partner.and_then(|partner| partner.id));
        let roles = value
            .roles
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| match Role::try_from(raw.clone()) {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!(user = %username, ?raw, "dropping invalid role: {e}");
                    None
                }
            })
            .collect();
        Ok(Self {
            id,
            username,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            partner_id,
            roles,
        })
    }
}

impl UserProfile {
    /// Full name if known otherwise the username
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .collect();
        if parts.is_empty() {
            self.username.to_string()
        } else {
            parts.join(" ")
        }
    }
}
