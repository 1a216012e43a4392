use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use super::{lenient_string, lenient_uint};

pub const FRAME_STATE_VERSION: u8 = 1;

/// Body of a frame action POST. Both halves are optional so that a partial or
/// empty body still decodes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameActionPayload {
    pub untrusted_data: Option<UntrustedData>,
    pub trusted_data: Option<TrustedData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UntrustedData {
    #[serde(deserialize_with = "lenient_uint")]
    pub fid: Option<u64>,
    #[serde(deserialize_with = "lenient_uint")]
    pub button_index: Option<u8>,
    #[serde(deserialize_with = "lenient_string")]
    pub state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrustedData {
    /// Hex-encoded signed message.
    pub message_bytes: String,
}

impl FrameActionPayload {
    pub fn untrusted_fid(&self) -> Option<u64> {
        self.untrusted_data.as_ref()?.fid
    }

    pub fn button_index(&self) -> Option<u8> {
        self.untrusted_data.as_ref()?.button_index
    }

    pub fn message_bytes(&self) -> Option<&str> {
        self.trusted_data
            .as_ref()
            .map(|t| t.message_bytes.as_str())
            .filter(|bytes| !bytes.is_empty())
    }

    /// Prior state carried by the frame protocol, if it decodes.
    pub fn prior_state(&self) -> Option<FrameState> {
        let raw = self.untrusted_data.as_ref()?.state.as_deref()?;
        FrameState::decode(raw)
    }
}

/// State round-tripped through `fc:frame:state`.
///
/// Payloads without a version are read as version 1, which has the same
/// shape. Any other version is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameState {
    #[serde(default = "current_version")]
    pub v: u8,
    #[serde(rename = "lastFid", default, skip_serializing_if = "Option::is_none")]
    pub last_fid: Option<String>,
}

fn current_version() -> u8 {
    FRAME_STATE_VERSION
}

impl FrameState {
    pub fn new(last_fid: Option<String>) -> Self {
        Self {
            v: FRAME_STATE_VERSION,
            last_fid,
        }
    }

    /// Decodes raw or percent-encoded JSON. Returns `None` for anything that
    /// isn't a current-version state object.
    pub fn decode(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let state = serde_json::from_str::<FrameState>(raw).ok().or_else(|| {
            let decoded = percent_decode_str(raw).decode_utf8().ok()?;
            serde_json::from_str::<FrameState>(&decoded).ok()
        })?;

        if state.v != FRAME_STATE_VERSION {
            tracing::debug!(version = state.v, "ignoring frame state with unknown version");
            return None;
        }

        Some(state)
    }

    pub fn encode(&self) -> String {
        // A struct of a u8 and an optional string always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn last_fid(&self) -> Option<&str> {
        self.last_fid.as_deref().filter(|fid| !fid.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Prompt,
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAction {
    Post,
    Link,
}

impl ButtonAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonAction::Post => "post",
            ButtonAction::Link => "link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
    pub target: String,
}

/// Everything needed to emit the frame document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResponse {
    pub view: ViewKind,
    /// Rendered view as an image URL.
    pub image: String,
    pub buttons: Vec<Button>,
    pub title: String,
    pub description: String,
    pub post_url: String,
    pub state: FrameState,
}
