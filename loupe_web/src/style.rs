// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class names and the stylesheet injected on mount.

/// Root of the overlay; carries `data-phase`.
pub(crate) const OVERLAY_CLASS: &str = "loupe-overlay";
/// Added to the overlay while a surface is mounted.
pub(crate) const MOUNTED_CLASS: &str = "loupe-mounted";
pub(crate) const BACKDROP_CLASS: &str = "loupe-backdrop";
pub(crate) const STAGE_CLASS: &str = "loupe-stage";
pub(crate) const CONTROLS_CLASS: &str = "loupe-controls";
pub(crate) const BUTTON_CLASS: &str = "loupe-button";
/// The cloned diagram on the stage.
pub(crate) const SURFACE_CLASS: &str = "loupe-surface";
/// Inline containers that open the lightbox on click.
pub(crate) const WIRED_CLASS: &str = "loupe-wired";
/// Caption inserted above inline diagrams.
pub(crate) const HINT_CLASS: &str = "loupe-hint";
pub(crate) const HINT_SELECTOR: &str = ".loupe-hint";

/// Custom property holding the transition length.
pub(crate) const TRANSITION_VAR: &str = "--loupe-transition";

pub(crate) const STYLESHEET: &str = "\
.loupe-overlay {
  position: fixed;
  inset: 0;
  z-index: 1000;
  display: none;
  opacity: 0;
  transition: opacity var(--loupe-transition, 200ms) ease;
}
.loupe-overlay.loupe-mounted { display: block; }
.loupe-overlay[data-phase='open'] { opacity: 1; }
.loupe-backdrop {
  position: absolute;
  inset: 0;
  background: rgba(0, 0, 0, 0.8);
}
.loupe-stage {
  position: absolute;
  inset: 56px 24px 24px 24px;
  overflow: hidden;
  pointer-events: none;
}
.loupe-surface {
  pointer-events: auto;
  touch-action: none;
  cursor: grab;
  background: var(--ifm-background-color, #fff);
  border-radius: 4px;
}
.loupe-surface:active { cursor: grabbing; }
.loupe-controls {
  position: absolute;
  top: 12px;
  right: 24px;
  display: flex;
  gap: 8px;
}
.loupe-button {
  min-width: 32px;
  height: 32px;
  border: none;
  border-radius: 4px;
  background: rgba(255, 255, 255, 0.9);
  font-size: 18px;
  line-height: 32px;
  cursor: pointer;
}
.loupe-wired { cursor: zoom-in; }
.loupe-hint {
  font-size: 0.85em;
  opacity: 0.7;
  margin-bottom: 0.5em;
}
";
