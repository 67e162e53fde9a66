use super::*;

#[test]
fn test_cdp_request_serialize() {
    let req = CdpRequest {
        id: 1,
        method: "Page.navigate".to_string(),
        params: Some(serde_json::json!({"url": "https://www.apple.com"})),
        session_id: Some("session-1".to_string()),
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["method"], "Page.navigate");
    assert_eq!(json["sessionId"], "session-1");
}

#[test]
fn test_cdp_request_omits_empty_fields() {
    let req = CdpRequest {
        id: 2,
        method: "Target.getTargets".to_string(),
        params: None,
        session_id: None,
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(!json.contains("params"));
    assert!(!json.contains("sessionId"));
}

#[test]
fn test_cdp_error_response_deserialize() {
    let json = r#"{"id": 7, "error": {"code": -32000, "message": "Cannot navigate to invalid URL"}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, Some(7));
    let error = resp.error.unwrap();
    assert_eq!(error.code, -32000);
    assert!(resp.result.is_none());
}

#[test]
fn test_browser_version_deserialize() {
    let json = r#"{
        "Browser": "Chrome/126.0.0.0",
        "Protocol-Version": "1.3",
        "User-Agent": "Mozilla/5.0",
        "webSocketDebuggerUrl": "ws://localhost:9222/devtools/browser/abc"
    }"#;
    let version: BrowserVersion = serde_json::from_str(json).unwrap();
    assert_eq!(version.protocol_version, "1.3");
    assert!(version.web_socket_debugger_url.starts_with("ws://"));
}

#[test]
fn test_event_type_serialize() {
    assert_eq!(
        serde_json::to_string(&MouseEventType::MousePressed).unwrap(),
        "\"mousePressed\""
    );
    assert_eq!(serde_json::to_string(&KeyEventType::KeyDown).unwrap(), "\"keyDown\"");
    assert_eq!(serde_json::to_string(&MouseButton::Left).unwrap(), "\"left\"");
}
