// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform-independent translation between DOM values and Loupe types.

use kurbo::{Rect, Size, Vec2};
use loupe_discovery::DiscoveryConfig;
use loupe_overlay::{EventKind, Key, Phase, ViewportState};

use crate::error::WebError;

/// Pixels per line for wheel events reported in lines.
pub(crate) const LINE_HEIGHT: f64 = 16.0;

/// Parses an optional JSON configuration, falling back to the defaults for
/// a missing or blank string and for any field left out.
pub fn parse_config(json: Option<&str>) -> Result<DiscoveryConfig, WebError> {
    let config = match json.map(str::trim).filter(|json| !json.is_empty()) {
        Some(json) => serde_json::from_str(json)?,
        None => DiscoveryConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Maps a `KeyboardEvent.key` value.
pub(crate) fn key_from_dom(key: &str) -> Key {
    match key {
        "Escape" | "Esc" => Key::Escape,
        _ => Key::Other,
    }
}

/// Converts a wheel delta to pixels according to `WheelEvent.deltaMode`.
pub(crate) fn wheel_delta_pixels(delta: Vec2, mode: u32, page: Size) -> Vec2 {
    match mode {
        1 => delta * LINE_HEIGHT,
        2 => Vec2::new(delta.x * page.width, delta.y * page.height),
        _ => delta,
    }
}

/// DOM event type for `kind`.
pub(crate) fn event_name(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Click => "click",
        EventKind::KeyDown => "keydown",
        EventKind::Resize => "resize",
        EventKind::PointerDown => "pointerdown",
        EventKind::PointerMove => "pointermove",
        EventKind::PointerUp => "pointerup",
        EventKind::PointerCancel => "pointercancel",
        EventKind::Wheel => "wheel",
    }
}

/// Whether listeners for `kind` call `preventDefault` and so must not be
/// registered passive.
///
/// Wheel cancels page scrolling; pointer down cancels text selection and
/// native image drag on the diagram.
pub(crate) fn cancels_default(kind: EventKind) -> bool {
    matches!(kind, EventKind::Wheel | EventKind::PointerDown)
}

/// Value of the overlay's `data-phase` attribute.
pub(crate) fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Closed => "closed",
        Phase::Opening => "opening",
        Phase::Open => "open",
        Phase::Closing => "closing",
    }
}

/// CSS `transform` placing content point `p` at `translation + scale * p`
/// relative to the stage.
///
/// The surface lays its content box out starting at its own origin, so the
/// content origin is added back before scaling.
pub(crate) fn css_transform(content: Rect, state: ViewportState) -> String {
    let t = state.translation;
    format!(
        "translate({}px, {}px) scale({}) translate({}px, {}px)",
        t.x, t.y, state.scale, content.x0, content.y0
    )
}

/// Inline style for a mounted surface showing `content` at `state`.
pub(crate) fn surface_style(content: Rect, state: ViewportState) -> String {
    format!(
        "position:absolute;left:0;top:0;margin:0;max-width:none;max-height:none;\
         width:{}px;height:{}px;transform-origin:0 0;transform:{}",
        content.width(),
        content.height(),
        css_transform(content, state)
    )
}
