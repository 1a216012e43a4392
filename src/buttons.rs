use crate::config::AppConfig;
use crate::context::USER_FID_PARAM;
use crate::models::{Button, ButtonAction};
use crate::utils::encode_uri_component;

pub const REFRESH_LABEL: &str = "Check yours HUNT STATS";
pub const SHARE_LABEL: &str = "Share";
pub const SHARE_TEXT: &str = "Check yours HUNT STATS";

/// Refresh button, plus a share button when a profile resolved.
/// `cache_bust` is a millisecond timestamp placed in the shared embed URL.
pub fn build_buttons(
    config: &AppConfig,
    has_profile: bool,
    fid: Option<&str>,
    cache_bust: i64,
) -> Vec<Button> {
    let mut buttons = vec![Button {
        label: REFRESH_LABEL.to_string(),
        action: ButtonAction::Post,
        target: refresh_url(&config.app_url, fid),
    }];

    if has_profile {
        buttons.push(Button {
            label: SHARE_LABEL.to_string(),
            action: ButtonAction::Link,
            target: share_url(config, fid, cache_bust),
        });
    }

    buttons
}

pub fn refresh_url(app_url: &str, fid: Option<&str>) -> String {
    format!(
        "{}?{}={}",
        app_url,
        USER_FID_PARAM,
        encode_uri_component(fid.unwrap_or_default())
    )
}

pub fn embed_url(app_url: &str, fid: Option<&str>, cache_bust: i64) -> String {
    match fid {
        Some(fid) => format!(
            "{}?{}={}&c={}",
            app_url,
            USER_FID_PARAM,
            encode_uri_component(fid),
            cache_bust
        ),
        None => format!("{}?cache={}", app_url, cache_bust),
    }
}

pub fn share_url(config: &AppConfig, fid: Option<&str>, cache_bust: i64) -> String {
    format!(
        "{}?text={}&embeds[]={}",
        config.composer_url,
        encode_uri_component(SHARE_TEXT),
        encode_uri_component(&embed_url(&config.app_url, fid, cache_bust))
    )
}
