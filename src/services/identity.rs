use crate::error::UpstreamError;
use crate::models::{FarscoreResponse, UserProfileRecord};
use crate::state::AppState;
use crate::utils::encode_uri_component;

const SERVICE: &str = "Identity API";

/// Looks up the profile for `fid`. An empty social list is an error here;
/// the caller decides how to degrade.
pub async fn fetch_profile(state: &AppState, fid: &str) -> Result<UserProfileRecord, UpstreamError> {
    let url = format!(
        "{}/api/farscore?userId={}",
        state.config.identity_api_url,
        encode_uri_component(fid)
    );

    let res = state
        .http
        .get(&url)
        .send()
        .await
        .map_err(UpstreamError::transport(SERVICE))?;

    if !res.status().is_success() {
        return Err(UpstreamError::Status {
            service: SERVICE,
            status: res.status(),
        });
    }

    let body: FarscoreResponse = res.json().await.map_err(UpstreamError::decode(SERVICE))?;
    body.into_profile().ok_or(UpstreamError::NoMatch)
}
