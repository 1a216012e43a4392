use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{debug, info, warn};

use crate::buttons::build_buttons;
use crate::context::RequestContext;
use crate::models::{FrameActionPayload, FrameResponse, FrameState};
use crate::render::{render_document, render_view, ImageData};
use crate::result_ext::ResultExt;
use crate::services::{identity, stats, validator};
use crate::state::AppState;

pub const TITLE: &str = "Farcaster Frame";
pub const DESCRIPTION: &str = "Use this frame to check yours";
pub const FRAME_JSON: &str = "application/frame+json";

/// GET and POST handler for the frame. Always answers 200; upstream failures
/// degrade the output instead.
pub async fn frame(req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> HttpResponse {
    let payload = parse_payload(&body);
    if let Some(button) = payload.button_index() {
        debug!(button, "frame action received");
    }

    let mut ctx = RequestContext {
        requester_fid: validator::verified_requester(&state, &payload).await,
        request_url: Some(request_url(&req)),
        prior_state: payload.prior_state(),
        ..Default::default()
    };

    let fid = ctx.resolve_user_id();

    let profile_lookup = async {
        match fid.as_deref() {
            Some(id) if ctx.needs_profile(id) => {
                Some(identity::fetch_profile(&state, id).await.log("Error fetching data"))
            }
            _ => None,
        }
    };
    let (profile, stats) = tokio::join!(profile_lookup, stats::fetch_stats(&state, fid.as_deref()));
    if let Some(result) = profile {
        ctx.apply_profile(result);
    }

    let view = ctx.view(fid.as_deref());
    let image = render_view(
        view,
        &ImageData {
            profile: ctx.profile.as_ref(),
            stats: &stats,
        },
    );
    let buttons = build_buttons(
        &state.config,
        ctx.profile.is_some(),
        fid.as_deref(),
        chrono::Utc::now().timestamp_millis(),
    );

    let response = FrameResponse {
        view,
        image,
        buttons,
        title: TITLE.to_string(),
        description: DESCRIPTION.to_string(),
        post_url: state.config.app_url.clone(),
        state: FrameState::new(fid.clone()),
    };
    info!(
        fid = ?fid,
        view = ?response.view,
        buttons = response.buttons.len(),
        error = ?ctx.error,
        "frame rendered"
    );

    if wants_frame_json(&req) {
        HttpResponse::Ok().json(&response)
    } else {
        HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(render_document(&response))
    }
}

fn parse_payload(body: &[u8]) -> FrameActionPayload {
    if body.iter().all(u8::is_ascii_whitespace) {
        return FrameActionPayload::default();
    }
    match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "ignoring malformed frame payload");
            FrameActionPayload::default()
        }
    }
}

fn request_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}{}", info.scheme(), info.host(), req.uri())
}

fn wants_frame_json(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains(FRAME_JSON))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::handlers;
    use actix_web::{test as actix_test, App};
    use base64::engine::general_purpose::STANDARD as B64;
    use base64::Engine;
    use percent_encoding::percent_decode_str;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const APP_URL: &str = "https://frame.example";

    fn app_state(upstream: &MockServer) -> web::Data<AppState> {
        let uri = upstream.uri();
        let config = AppConfig::from_lookup(|key| match key {
            "APP_URL" => Some(APP_URL.to_string()),
            "IDENTITY_API_URL" | "STATS_API_URL" => Some(uri.clone()),
            _ => None,
        })
        .unwrap();
        web::Data::new(AppState::new(config).unwrap())
    }

    async fn mock_identity(server: &MockServer, fid: &str) {
        Mock::given(method("GET"))
            .and(path("/api/farscore"))
            .and(query_param("userId", fid))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "userData": { "Socials": { "Social": [
                    { "userId": fid, "profileImage": format!("https://img.example/{}.png", fid) }
                ]}}
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mock_stats(server: &MockServer, fid: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/stats/fid/{}", fid)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "username": "alice",
                "tip_allowance": 12345,
                "remaining_allowance": "500",
                "received": 2500000
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn call_json(state: web::Data<AppState>, req: actix_test::TestRequest) -> Value {
        let app = actix_test::init_service(App::new().app_data(state).configure(handlers::configure)).await;
        let req = req.insert_header((header::ACCEPT, FRAME_JSON)).to_request();
        actix_test::call_and_read_body_json(&app, req).await
    }

    fn svg_of(frame: &Value) -> String {
        let image = frame["image"].as_str().unwrap();
        let encoded = image.strip_prefix("data:image/svg+xml;base64,").unwrap();
        String::from_utf8(B64.decode(encoded).unwrap()).unwrap()
    }

    fn action(fid: Option<u64>, state: Option<&str>) -> Value {
        json!({
            "untrustedData": {
                "fid": fid,
                "url": APP_URL,
                "buttonIndex": 1,
                "state": state
            },
            "trustedData": { "messageBytes": "0a" }
        })
    }

    #[actix_web::test]
    async fn requester_fid_wins_and_renders_stats() {
        let upstream = MockServer::start().await;
        mock_identity(&upstream, "42").await;
        mock_stats(&upstream, "42").await;

        let frame = call_json(
            app_state(&upstream),
            actix_test::TestRequest::post()
                .uri("/?userfid=1")
                .set_json(action(Some(42), Some(r#"{"v":1,"lastFid":"7"}"#))),
        )
        .await;

        assert_eq!(frame["view"], "stats");
        assert_eq!(frame["title"], "Farcaster Frame");
        assert_eq!(frame["description"], "Use this frame to check yours");
        assert_eq!(frame["state"], json!({ "v": 1, "lastFid": "42" }));

        let buttons = frame["buttons"].as_array().unwrap();
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0]["action"], "post");
        assert_eq!(buttons[0]["target"], "https://frame.example?userfid=42");
        assert_eq!(buttons[1]["action"], "link");

        let share = buttons[1]["target"].as_str().unwrap();
        let decoded = percent_decode_str(share).decode_utf8().unwrap();
        let marker = "https://frame.example?userfid=42&c=";
        let start = decoded.find(marker).unwrap() + marker.len();
        let cache_bust = &decoded[start..];
        assert!(!cache_bust.is_empty());
        assert!(cache_bust.chars().all(|c| c.is_ascii_digit()));

        let svg = svg_of(&frame);
        assert!(svg.contains("@alice"));
        assert!(svg.contains(">12,345</tspan>"));
        assert!(svg.contains(">500</tspan>"));
        assert!(svg.contains(">2.5M</tspan>"));
        assert!(svg.contains("https://img.example/42.png"));
    }

    #[actix_web::test]
    async fn query_fid_is_used_on_a_plain_load() {
        let upstream = MockServer::start().await;
        mock_identity(&upstream, "42").await;
        mock_stats(&upstream, "42").await;

        let frame = call_json(app_state(&upstream), actix_test::TestRequest::get().uri("/?userfid=42")).await;

        assert_eq!(frame["view"], "stats");
        assert_eq!(frame["buttons"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn state_fid_is_used_last() {
        let upstream = MockServer::start().await;
        mock_identity(&upstream, "7").await;
        mock_stats(&upstream, "7").await;

        let frame = call_json(
            app_state(&upstream),
            actix_test::TestRequest::post()
                .uri("/")
                .set_json(action(None, Some(r#"{"lastFid":"7"}"#))),
        )
        .await;

        assert_eq!(frame["view"], "stats");
        assert_eq!(frame["buttons"][0]["target"], "https://frame.example?userfid=7");
    }

    #[actix_web::test]
    async fn no_fid_renders_prompt_with_one_button() {
        let upstream = MockServer::start().await;
        Mock::given(path("/api/farscore"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&upstream)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/stats/fid/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&upstream)
            .await;

        let frame = call_json(app_state(&upstream), actix_test::TestRequest::get().uri("/")).await;

        assert_eq!(frame["view"], "prompt");
        assert_eq!(
            frame["buttons"],
            json!([{
                "label": "Check yours HUNT STATS",
                "action": "post",
                "target": "https://frame.example?userfid="
            }])
        );
        assert_eq!(frame["state"], json!({ "v": 1 }));
        assert!(svg_of(&frame).contains(">Check yours</text>"));
    }

    #[actix_web::test]
    async fn identity_failure_forces_prompt() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/farscore"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&upstream)
            .await;
        mock_stats(&upstream, "42").await;

        let frame = call_json(app_state(&upstream), actix_test::TestRequest::get().uri("/?userfid=42")).await;

        assert_eq!(frame["view"], "prompt");
        assert_eq!(frame["buttons"].as_array().unwrap().len(), 1);
        assert_eq!(frame["buttons"][0]["target"], "https://frame.example?userfid=42");
    }

    #[actix_web::test]
    async fn identity_without_socials_forces_prompt() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/farscore"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "userData": { "Socials": { "Social": [] } }
            })))
            .mount(&upstream)
            .await;
        mock_stats(&upstream, "42").await;

        let frame = call_json(app_state(&upstream), actix_test::TestRequest::get().uri("/?userfid=42")).await;

        assert_eq!(frame["view"], "prompt");
        assert_eq!(frame["buttons"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn stats_failure_keeps_stats_view_with_empty_values() {
        let upstream = MockServer::start().await;
        mock_identity(&upstream, "42").await;
        Mock::given(method("GET"))
            .and(path("/api/stats/fid/42"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&upstream)
            .await;

        let frame = call_json(app_state(&upstream), actix_test::TestRequest::get().uri("/?userfid=42")).await;

        assert_eq!(frame["view"], "stats");
        assert_eq!(frame["buttons"].as_array().unwrap().len(), 2);
        let svg = svg_of(&frame);
        assert_eq!(svg.matches(r#"dx="20">0</tspan>"#).count(), 3);
    }

    #[actix_web::test]
    async fn identical_upstreams_give_identical_frames_apart_from_cache_bust() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/farscore"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "userData": { "Socials": { "Social": [ { "userId": "42", "profileImage": "https://img.example/42.png" } ] } }
            })))
            .mount(&upstream)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/stats/fid/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "username": "alice" })))
            .mount(&upstream)
            .await;

        let state = app_state(&upstream);
        let request = || actix_test::TestRequest::post().uri("/").set_json(action(Some(42), None));
        let mut first = call_json(state.clone(), request()).await;
        let mut second = call_json(state, request()).await;

        for frame in [&mut first, &mut second] {
            let target = frame["buttons"][1]["target"].as_str().unwrap().to_string();
            let prefix = target.rsplit_once("%3D").unwrap().0.to_string();
            frame["buttons"][1]["target"] = Value::String(prefix);
        }
        assert_eq!(first, second);
    }

    #[actix_web::test]
    async fn malformed_body_is_treated_as_empty() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/stats/fid/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&upstream)
            .await;

        let frame = call_json(
            app_state(&upstream),
            actix_test::TestRequest::post()
                .uri("/")
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .set_payload("{not json"),
        )
        .await;

        assert_eq!(frame["view"], "prompt");
    }

    #[actix_web::test]
    async fn html_document_is_the_default() {
        let upstream = MockServer::start().await;
        mock_identity(&upstream, "42").await;
        mock_stats(&upstream, "42").await;

        let app = actix_test::init_service(
            App::new()
                .app_data(app_state(&upstream))
                .configure(handlers::configure),
        )
        .await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/?userfid=42").to_request()).await;

        assert!(res.status().is_success());
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        let body = actix_test::read_body(res).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains(r#"<meta property="fc:frame" content="vNext"/>"#));
        assert!(html.contains(r#"<meta property="fc:frame:button:2" content="Share"/>"#));
        assert!(html.contains(r#"<meta property="fc:frame:post_url" content="https://frame.example"/>"#));
        assert!(html.contains("&quot;lastFid&quot;:&quot;42&quot;"));
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = actix_test::init_service(App::new().configure(handlers::configure)).await;
        let body: Value =
            actix_test::call_and_read_body_json(&app, actix_test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(body["status"], "OK");
    }

    #[test]
    fn blank_body_parses_as_empty_payload() {
        assert!(parse_payload(b"").untrusted_data.is_none());
        assert!(parse_payload(b"  \n").untrusted_data.is_none());
        assert_eq!(parse_payload(br#"{"untrustedData":{"fid":5}}"#).untrusted_fid(), Some(5));
    }

    #[test]
    fn string_fid_keeps_state() {
        let payload = parse_payload(br#"{"untrustedData":{"fid":"42","state":"{\"lastFid\":\"7\"}"}}"#);
        assert_eq!(payload.untrusted_fid(), Some(42));
        assert_eq!(payload.prior_state().unwrap().last_fid(), Some("7"));
    }
}
