use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;

use super::escape_markup;
use crate::models::{StatsRecord, UserProfileRecord, ViewKind};
use crate::utils::format_number;

pub const WIDTH: u32 = 1146;
pub const HEIGHT: u32 = 600;
pub const ASPECT_RATIO: &str = "1.91:1";

const PROMPT_BACKGROUND: &str = "#fff";
const PROMPT_FOREGROUND: &str = "#FF6A72";
const STATS_BACKGROUND: &str = "#333333";
const STATS_FOREGROUND: &str = "#fff";
const HIGHLIGHT: &str = "#ffdc00";
const FONT: &str = "Inter, Helvetica, Arial, sans-serif";

/// Inputs to the view image.
pub struct ImageData<'a> {
    pub profile: Option<&'a UserProfileRecord>,
    pub stats: &'a StatsRecord,
}

/// Renders `view` as an SVG data URL.
pub fn render_view(view: ViewKind, data: &ImageData<'_>) -> String {
    let svg = match view {
        ViewKind::Prompt => prompt_svg(),
        ViewKind::Stats => stats_svg(data),
    };
    format!("data:image/svg+xml;base64,{}", B64.encode(svg))
}

fn open_svg(background: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="{w}" height="{h}" fill="{bg}"/>"#,
        w = WIDTH,
        h = HEIGHT,
        bg = background
    )
}

pub fn prompt_svg() -> String {
    let mut svg = open_svg(PROMPT_BACKGROUND);
    svg.push_str(&format!(
        r#"<text x="{x}" y="{y}" fill="{fg}" font-family="{font}" font-size="60" text-anchor="middle" dominant-baseline="middle">Check yours</text>"#,
        x = WIDTH / 2,
        y = HEIGHT / 2,
        fg = PROMPT_FOREGROUND,
        font = FONT
    ));
    svg.push_str("</svg>");
    svg
}

pub fn stats_svg(data: &ImageData<'_>) -> String {
    let center = WIDTH / 2;
    let mut svg = open_svg(STATS_BACKGROUND);

    // 128px avatar with a thin white border
    let avatar = data
        .profile
        .map(|p| p.profile_image_url.as_str())
        .filter(|url| url.starts_with("http"));
    if let Some(url) = avatar {
        svg.push_str(&format!(
            r#"<image href="{url}" x="{x}" y="70" width="128" height="128" preserveAspectRatio="xMidYMid slice"/><rect x="{x}" y="70" width="128" height="128" rx="6" fill="none" stroke="{fg}" stroke-width="1"/>"#,
            url = escape_markup(url),
            x = center - 64,
            fg = STATS_FOREGROUND
        ));
    }

    svg.push_str(&format!(
        r#"<text x="{x}" y="250" fill="{fg}" font-family="{font}" font-size="40" text-anchor="middle">@{name}</text>"#,
        x = center,
        fg = STATS_FOREGROUND,
        font = FONT,
        name = escape_markup(data.stats.username.as_deref().unwrap_or_default())
    ));

    let rows = [
        ("Allowance:", data.stats.tip_allowance, 330),
        ("Daily Remaining:", data.stats.remaining_allowance, 400),
        ("Total Received:", data.stats.received, 470),
    ];
    for (label, amount, y) in rows {
        svg.push_str(&format!(
            r#"<text x="{x}" y="{y}" fill="{fg}" font-family="{font}" font-size="40" text-anchor="middle">{label} <tspan fill="{hl}" dx="20">{amount}</tspan></text>"#,
            x = center,
            y = y,
            fg = STATS_FOREGROUND,
            font = FONT,
            label = label,
            hl = HIGHLIGHT,
            amount = format_number(amount)
        ));
    }

    svg.push_str("</svg>");
    svg
}
