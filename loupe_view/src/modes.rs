// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Clamp behavior for panning relative to the content bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClampMode {
    /// Translation is unconstrained; the content may be panned anywhere.
    #[default]
    None,
    /// Keep the content and the view nested inside one another.
    ///
    /// Content smaller than the view stays fully inside it along that axis;
    /// content larger than the view always covers it along that axis.
    Contain,
}
