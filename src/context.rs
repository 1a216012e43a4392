use tracing::{info, warn};
use url::Url;

use crate::error::UpstreamError;
use crate::models::{FrameState, UserProfileRecord, ViewKind};

pub const USER_FID_PARAM: &str = "userfid";

/// Per-request values. Built when a request arrives and dropped with the
/// response.
#[derive(Debug, Default)]
pub struct RequestContext {
    pub requester_fid: Option<String>,
    pub request_url: Option<String>,
    pub prior_state: Option<FrameState>,
    pub profile: Option<UserProfileRecord>,
    /// Set only when the identity lookup fails.
    pub error: Option<String>,
}

impl RequestContext {
    /// Subject user id. The verified requester wins, then the `userfid`
    /// query parameter, then the id remembered in the frame state.
    pub fn resolve_user_id(&self) -> Option<String> {
        let fid = match &self.requester_fid {
            Some(fid) => Some(fid.clone()),
            None => match &self.request_url {
                Some(url) => {
                    let fid = extract_fid(url);
                    info!(fid = ?fid, "Extracted FID from URL");
                    fid
                }
                None => {
                    info!("No request URL available");
                    None
                }
            },
        };

        let fid = fid.filter(|fid| !fid.is_empty()).or_else(|| {
            let fid = self.prior_state.as_ref()?.last_fid()?.to_string();
            info!(fid = %fid, "Using FID from state");
            Some(fid)
        });

        info!(fid = ?fid, "Final FID used");
        fid
    }

    /// Whether a profile lookup is needed for `fid`.
    pub fn needs_profile(&self, fid: &str) -> bool {
        self.profile.as_ref().map_or(true, |profile| profile.fid != fid)
    }

    pub fn apply_profile(&mut self, result: Result<UserProfileRecord, UpstreamError>) {
        match result {
            Ok(profile) => self.profile = Some(profile),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub fn view(&self, fid: Option<&str>) -> ViewKind {
        select_view(fid.is_some(), self.error.is_some())
    }
}

/// Stats are shown only for a resolved id with no identity error. A failed
/// stats lookup does not affect the choice.
pub fn select_view(has_fid: bool, error_occurred: bool) -> ViewKind {
    if has_fid && !error_occurred {
        ViewKind::Stats
    } else {
        ViewKind::Prompt
    }
}

/// Reads `userfid` from a full URL. Unparseable URLs yield `None`.
pub fn extract_fid(raw_url: &str) -> Option<String> {
    match Url::parse(raw_url) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == USER_FID_PARAM)
            .map(|(_, value)| value.into_owned()),
        Err(err) => {
            warn!(url = raw_url, error = %err, "Error parsing URL");
            None
        }
    }
}
