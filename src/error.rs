use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to one of the upstream services.
///
/// None of these reach the caller; the frame handler degrades to a prompt
/// view or an empty stats record instead.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} HTTP error! status: {status}")]
    Status {
        service: &'static str,
        status: StatusCode,
    },

    #[error("{service} returned an unreadable body: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("No user data found")]
    NoMatch,

    #[error("{service} rejected the frame message")]
    Rejected { service: &'static str },
}

impl UpstreamError {
    pub fn transport(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| UpstreamError::Transport { service, source }
    }

    pub fn decode(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| UpstreamError::Decode { service, source }
    }
}
