//! Input (mouse and keyboard) operations for CDP page session.

use serde_json::{Value, json};
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{KeyEventType, MouseButton, MouseEventType};

use super::core::PageSession;

impl PageSession {
    /// Click at coordinates.
    pub async fn click(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseMoved,
                "x": x,
                "y": y,
                "button": MouseButton::None,
            })),
        )
        .await?;

        for event in [MouseEventType::MousePressed, MouseEventType::MouseReleased] {
            self.call(
                "Input.dispatchMouseEvent",
                Some(json!({
                    "type": event,
                    "x": x,
                    "y": y,
                    "button": MouseButton::Left,
                    "clickCount": 1,
                })),
            )
            .await?;
        }

        debug!("Clicked at ({}, {})", x, y);
        Ok(())
    }

    /// Insert text at the focused element.
    pub async fn type_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({"text": text})))
            .await?;
        debug!("Typed {} characters", text.chars().count());
        Ok(())
    }

    /// Press and release a named key on the focused element.
    pub async fn press_key(&self, key: &str) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchKeyEvent",
            Some(Self::key_params(KeyEventType::KeyDown, key)),
        )
        .await?;

        self.call(
            "Input.dispatchKeyEvent",
            Some(Self::key_params(KeyEventType::KeyUp, key)),
        )
        .await?;

        Ok(())
    }

    /// `Input.dispatchKeyEvent` parameters. Keys that produce text carry it
    /// on key down so forms submit on Enter.
    pub(super) fn key_params(event: KeyEventType, key: &str) -> Value {
        let (code, virtual_key, text) = match key {
            "Enter" => ("Enter", 13, Some("\r")),
            "Tab" => ("Tab", 9, None),
            "Escape" => ("Escape", 27, None),
            "Backspace" => ("Backspace", 8, None),
            other => (other, 0, None),
        };

        let mut params = json!({
            "type": event,
            "key": key,
            "code": code,
            "windowsVirtualKeyCode": virtual_key,
            "nativeVirtualKeyCode": virtual_key,
        });
        if let (KeyEventType::KeyDown, Some(text)) = (event, text) {
            params["text"] = json!(text);
            params["unmodifiedText"] = json!(text);
        }
        params
    }
}
