use super::escape_markup;
use super::image::ASPECT_RATIO;
use crate::models::FrameResponse;

pub const FRAME_VERSION: &str = "vNext";

/// HTML page whose meta tags describe the frame.
pub fn render_document(frame: &FrameResponse) -> String {
    let mut meta: Vec<(String, String)> = vec![
        ("fc:frame".into(), FRAME_VERSION.to_string()),
        ("fc:frame:image".into(), frame.image.clone()),
        ("fc:frame:image:aspect_ratio".into(), ASPECT_RATIO.to_string()),
        ("fc:frame:post_url".into(), frame.post_url.clone()),
        ("fc:frame:state".into(), frame.state.encode()),
        ("og:image".into(), frame.image.clone()),
        ("og:title".into(), frame.title.clone()),
    ];

    for (i, button) in frame.buttons.iter().enumerate() {
        let n = i + 1;
        meta.push((format!("fc:frame:button:{}", n), button.label.clone()));
        meta.push((format!("fc:frame:button:{}:action", n), button.action.as_str().to_string()));
        meta.push((format!("fc:frame:button:{}:target", n), button.target.clone()));
    }

    let mut html = String::from("<!DOCTYPE html><html><head>");
    html.push_str(&format!("<title>{}</title>", escape_markup(&frame.title)));
    html.push_str(&format!(
        r#"<meta name="description" content="{}"/>"#,
        escape_markup(&frame.description)
    ));
    for (property, content) in meta {
        html.push_str(&format!(
            r#"<meta property="{}" content="{}"/>"#,
            property,
            escape_markup(&content)
        ));
    }
    html.push_str("</head><body></body></html>");
    html
}
