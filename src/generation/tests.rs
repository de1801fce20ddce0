use serde_json::json;

use super::*;
use crate::config::GenerationSettings;

#[test]
fn audio_file_url_item_is_normalized() {
    let req = GenerationRequest::new("abc");
    let body = json!({ "data": [{ "audio_file": { "url": "x.mp3" } }] }).to_string();
    let out = interpret_response(200, &body, &req).unwrap();
    assert_eq!(out.len(), 1);
    assert!(!out[0].id.is_empty());
    assert_eq!(out[0].url, "x.mp3");
    assert_eq!(out[0].title, "abc");
    assert_eq!(out[0].duration, 60);
}

#[test]
fn empty_data_is_no_music_generated() {
    let req = GenerationRequest::new("abc");
    let err = interpret_response(200, r#"{"data": []}"#, &req).unwrap_err();
    assert!(matches!(err, GenerationError::NoMusicGenerated));
    assert_eq!(err.to_string(), "No music generated. Please try again.");

    let err = interpret_response(200, "{}", &req).unwrap_err();
    assert!(matches!(err, GenerationError::NoMusicGenerated));
}

#[test]
fn server_error_message_is_surfaced() {
    let req = GenerationRequest::new("abc");
    let err = interpret_response(500, r#"{"error":"boom"}"#, &req).unwrap_err();
    assert!(err.to_string().contains("boom"));
    assert!(matches!(err, GenerationError::Api { status: 500, .. }));
}

#[test]
fn error_message_fallbacks() {
    assert_eq!(error_message(400, r#"{"error":{"message":"bad key"}}"#), "bad key");
    assert_eq!(error_message(400, r#"{"message":"slow down"}"#), "slow down");
    assert_eq!(
        error_message(200, r#"{"base_resp":{"status_code":1004,"status_msg":"auth failed"}}"#),
        "auth failed"
    );
    assert_eq!(error_message(502, "Bad Gateway"), "Bad Gateway");
    assert_eq!(error_message(503, ""), "request failed with status 503");
    assert_eq!(error_message(503, r#"{"unexpected":1}"#), "request failed with status 503");
}

#[test]
fn alternate_url_fields_and_ids() {
    let req = GenerationRequest::new("a fairly long prompt about rainy city nights").with_duration(90);
    let body = json!({
        "data": [
            { "id": "gen-1", "audio_file": "https://cdn/a.mp3" },
            { "id": 7, "url": "https://cdn/b.mp3" },
            { "url": "" },
            { "title": "no url at all" }
        ]
    })
    .to_string();
    let out = interpret_response(200, &body, &req).unwrap();
    let urls: Vec<&str> = out.iter().map(|m| m.url.as_str()).collect();
    assert_eq!(urls, vec!["https://cdn/a.mp3", "https://cdn/b.mp3"]);
    assert_eq!(out[0].id, "gen-1");
    assert_eq!(out[1].id, "7");
    assert_eq!(out[0].title, "a fairly long prompt about rai");
    assert_eq!(out[0].title.chars().count(), 30);
    assert!(out.iter().all(|m| m.duration == 90));
}

#[test]
fn single_embedded_audio_object_is_accepted() {
    let req = GenerationRequest::new("x");
    let body = json!({
        "data": { "audio": "https://cdn/one.mp3", "status": 2 },
        "base_resp": { "status_code": 0, "status_msg": "success" }
    })
    .to_string();
    let out = interpret_response(200, &body, &req).unwrap();
    assert_eq!(out[0].url, "https://cdn/one.mp3");
}

#[test]
fn ok_status_with_service_error_code_is_an_api_error() {
    let req = GenerationRequest::new("x");
    let body = json!({ "base_resp": { "status_code": 2013, "status_msg": "invalid params" } }).to_string();
    let err = interpret_response(200, &body, &req).unwrap_err();
    assert_eq!(err.to_string(), "invalid params");
}

#[test]
fn malformed_success_body_is_invalid_response() {
    let req = GenerationRequest::new("x");
    let err = interpret_response(200, "<html>", &req).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidResponse(_)));
}

#[test]
fn combined_prompt_skips_blank_parts() {
    let req = GenerationRequest::new("late night drive")
        .with_genre("electronic")
        .with_mood("dark");
    assert_eq!(req.combined_prompt(), "electronic, dark, late night drive");
    let req = GenerationRequest::new("just words").with_genre("  ");
    assert_eq!(req.combined_prompt(), "just words");
}

#[test]
fn default_lyrics_wrap_prompt() {
    let req = GenerationRequest::new("city lights");
    assert_eq!(
        req.lyrics_or_default(),
        "[Verse]\ncity lights\n[Chorus]\nMusic flows\n[Outro]"
    );
    assert_eq!(req.with_lyrics("la la").lyrics_or_default(), "la la");
}

#[test]
fn blank_title_falls_back() {
    let req = GenerationRequest {
        prompt: "   ".into(),
        ..GenerationRequest::default()
    };
    assert_eq!(req.title(), "AI Generated Music");
}

#[test]
fn payload_uses_fixed_encoding_and_optional_duration() {
    let settings = GenerationSettings::default();
    let payload = GenerationPayload::new(&GenerationRequest::new("p"), &settings);
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["model"], "music-2.5");
    assert_eq!(value["audio_setting"]["sample_rate"], 44100);
    assert_eq!(value["audio_setting"]["bitrate"], 256000);
    assert_eq!(value["audio_setting"]["format"], "mp3");
    assert!(value["audio_setting"].get("duration").is_none());

    let payload = GenerationPayload::new(&GenerationRequest::new("p").with_duration(30), &settings);
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["audio_setting"]["duration"], 30);
}

#[test]
fn validation_runs_before_network() {
    assert!(matches!(
        GenerationRequest::new(" ").validate(),
        Err(GenerationError::EmptyPrompt)
    ));
    assert!(matches!(
        GenerationRequest::new("x").with_duration(0).validate(),
        Err(GenerationError::InvalidDuration)
    ));
    assert!(GenerationError::EmptyPrompt.is_validation());
}

#[test]
fn client_without_key_fails_before_sending() {
    let settings = GenerationSettings {
        api_key: None,
        endpoint: "http://127.0.0.1:9/unreachable".into(),
        ..GenerationSettings::default()
    };
    // Only meaningful when the fallback variable is absent.
    if std::env::var_os(crate::config::API_KEY_ENV).is_some() {
        return;
    }
    let client = GenerationClient::new(settings).unwrap();
    let err = client.generate(&GenerationRequest::new("x")).unwrap_err();
    assert!(matches!(err, GenerationError::MissingApiKey));
    assert_eq!(err.to_string(), "API key not configured");

    let err = client.generate(&GenerationRequest::new("")).unwrap_err();
    assert!(matches!(err, GenerationError::EmptyPrompt));
}
