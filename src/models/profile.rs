use serde::{Deserialize, Serialize};

use super::lenient_string;

const NOT_AVAILABLE: &str = "N/A";

/// Profile of the subject user, taken from the first social record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfileRecord {
    pub fid: String,
    pub profile_image_url: String,
}

/// Body of `GET /api/farscore`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FarscoreResponse {
    pub user_data: Option<FarscoreUserData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FarscoreUserData {
    #[serde(rename = "Socials")]
    pub socials: Option<Socials>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Socials {
    #[serde(rename = "Social")]
    pub social: Option<Vec<SocialRecord>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub profile_image: Option<String>,
}

impl FarscoreResponse {
    /// The first social record as a profile, or `None` when there isn't one.
    pub fn into_profile(self) -> Option<UserProfileRecord> {
        let social = self
            .user_data?
            .socials?
            .social?
            .into_iter()
            .next()?;

        Some(UserProfileRecord {
            fid: non_empty_or_na(social.user_id),
            profile_image_url: non_empty_or_na(social.profile_image),
        })
    }
}

fn non_empty_or_na(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
