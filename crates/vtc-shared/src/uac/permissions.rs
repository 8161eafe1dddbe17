use std::{fmt::Display, ops::Deref};

use crate::{errors::ConversionError, id::DbId};

/// The stable key that every access check compares against
///
/// Always trimmed and never empty
#[derive(Debug, serde::Serialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GuardName(String);

impl GuardName {
    pub const MAX_LENGTH: usize = 128;
}

impl TryFrom<String> for GuardName {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConversionError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: trimmed.len(),
            });
        }
        if trimmed.len() == value.len() {
            Ok(Self(value))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl TryFrom<&str> for GuardName {
    type Error = ConversionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.to_string().try_into()
    }
}

impl<'de> serde::Deserialize<'de> for GuardName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

impl Deref for GuardName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0[..]
    }
}

impl AsRef<str> for GuardName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for GuardName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Permission {
    pub guard_name: GuardName,
    /// Human readable, only used for display
    pub name: String,
}

/// Permission as sent by the backend, nothing is guaranteed to be present
#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RawPermission {
    pub id: Option<DbId>,
    #[serde(alias = "guardName")]
    pub guard_name: Option<String>,
    pub name: Option<String>,
}

impl TryFrom<RawPermission> for Permission {
    type Error = ConversionError;

    fn try_from(value: RawPermission) -> Result<Self, Self::Error> {
        let guard_name: GuardName = value
            .guard_name
            .ok_or(ConversionError::MissingField("guard_name"))?
            .try_into()?;
        let name = match value.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => guard_name.to_string(),
        };
        Ok(Self { guard_name, name })
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.guard_name)
    }
}
