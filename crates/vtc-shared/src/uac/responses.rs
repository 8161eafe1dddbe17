use super::RawUserProfile;

/// The `data` of a successful login response
///
/// The user may be missing in which case it has to be requested separately
/// using the token
#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone)]
#[serde(default)]
pub struct LoginResponseData {
    #[serde(alias = "access_token", alias = "accessToken")]
    pub token: Option<String>,
    pub user: Option<RawUserProfile>,
}

/// The `data` of `/auth/me`, some deployments wrap the user and some do not
#[derive(Debug, serde::Deserialize, Clone)]
#[serde(untagged)]
pub enum CurrentUserResponseData {
    Wrapped { user: RawUserProfile },
    Bare(RawUserProfile),
}

impl From<CurrentUserResponseData> for RawUserProfile {
    fn from(value: CurrentUserResponseData) -> Self {
        match value {
            CurrentUserResponseData::Wrapped { user } | CurrentUserResponseData::Bare(user) => {
                user
            }
        }
    }
}
