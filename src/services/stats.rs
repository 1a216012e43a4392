use tracing::debug;

use crate::error::UpstreamError;
use crate::models::StatsRecord;
use crate::result_ext::ResultExt;
use crate::state::AppState;
use crate::utils::encode_uri_component;

const SERVICE: &str = "Stats API";

/// Always returns a record. Failures are logged and replaced by the empty
/// record so rendering never sees an unset value.
pub async fn fetch_stats(state: &AppState, fid: Option<&str>) -> StatsRecord {
    request_stats(state, fid)
        .await
        .log("Fetch data error")
        .unwrap_or_default()
}

async fn request_stats(state: &AppState, fid: Option<&str>) -> Result<StatsRecord, UpstreamError> {
    let url = format!(
        "{}/api/stats/fid/{}",
        state.config.stats_api_url,
        encode_uri_component(fid.unwrap_or_default())
    );
    debug!(url = %url, "requesting stats");

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

    res.json::<StatsRecord>()
        .await
        .map_err(UpstreamError::decode(SERVICE))
}
