use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::UpstreamError;
use crate::models::FrameActionPayload;
use crate::result_ext::ResultExt;
use crate::state::AppState;

const SERVICE: &str = "Frame validator";

#[derive(Serialize)]
struct ValidateRequest<'a> {
    message_bytes_in_hex: &'a str,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ValidateResponse {
    valid: bool,
    action: Option<ValidatedAction>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ValidatedAction {
    interactor: Option<Interactor>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Interactor {
    fid: Option<u64>,
}

/// Requester fid for a frame action.
///
/// With an API key configured the signed message is checked remotely and only
/// a valid message yields an id. Without one the unsigned fid is taken as-is.
pub async fn verified_requester(state: &AppState, payload: &FrameActionPayload) -> Option<String> {
    match state.config.neynar_api_key.as_deref() {
        Some(api_key) => {
            let message_bytes = payload.message_bytes()?;
            validate(state, api_key, message_bytes)
                .await
                .log("Frame message validation failed")
                .ok()
                .flatten()
                .map(|fid| fid.to_string())
        }
        None => {
            let fid = payload.untrusted_fid()?;
            debug!(fid, "accepting unverified frame payload");
            Some(fid.to_string())
        }
    }
}

async fn validate(
    state: &AppState,
    api_key: &str,
    message_bytes: &str,
) -> Result<Option<u64>, UpstreamError> {
    let url = format!("{}/v2/farcaster/frame/validate", state.config.validator_url);

    let res = state
        .http
        .post(&url)
        .header("x-api-key", api_key)
        .json(&ValidateRequest {
            message_bytes_in_hex: message_bytes,
        })
        .send()
        .await
        .map_err(UpstreamError::transport(SERVICE))?;

    if !res.status().is_success() {
        return Err(UpstreamError::Status {
            service: SERVICE,
            status: res.status(),
        });
    }

    let body: ValidateResponse = res.json().await.map_err(UpstreamError::decode(SERVICE))?;
    if !body.valid {
        return Err(UpstreamError::Rejected { service: SERVICE });
    }

    Ok(body.action.and_then(|a| a.interactor).and_then(|i| i.fid))
}
