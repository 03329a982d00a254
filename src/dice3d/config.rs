//! Render configuration for the dice view.
//!
//! Resolution order (later wins): built-in global defaults, built-in
//! per-side-count defaults, caller global override, caller per-side override.
//! Every numeric field is clamped to its documented range; wrong-typed or
//! non-finite override values fall back to the default for that field only,
//! so one bad field never poisons the rest. Resolution cannot fail.

use std::collections::HashMap;

use bevy::log::debug;
use serde::Deserialize;
use serde_json::Value;

/// Clamp ranges, one per numeric field.
pub const TILE_SIZE_RANGE: (u32, u32) = (64, 1024);
pub const UV_INSET_RANGE: (f32, f32) = (0.0, 0.25);
pub const FONT_SCALE_RANGE: (f32, f32) = (0.1, 0.9);
pub const FONT_OFFSET_RANGE: (f32, f32) = (-0.25, 0.25);
pub const FONT_WEIGHT_RANGE: (f32, f32) = (0.04, 0.25);
pub const BORDER_WIDTH_RANGE: (f32, f32) = (0.0, 0.2);
pub const UV_RADIUS_RANGE: (f32, f32) = (0.15, 0.49);
pub const D10_PADDING_RANGE: (f32, f32) = (0.0, 0.3);
pub const D10_GROUP_OFFSET_RANGE: (f32, f32) = (-0.2, 0.2);

/// Fully-resolved configuration consumed by the atlas and geometry builders.
///
/// Recomputed fresh on every geometry rebuild; never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct DiceRenderConfig {
    /// Atlas tile edge length in pixels.
    pub tile_size: u32,
    /// Inward inset of each tile's UV rect, as a fraction of one tile.
    pub uv_inset: f32,
    /// Label height as a fraction of the tile.
    pub font_scale: f32,
    /// Label center offset, as a fraction of the tile.
    pub font_offset_x: f32,
    pub font_offset_y: f32,
    /// Stroke thickness as a fraction of the glyph height.
    pub font_weight: f32,
    /// Glyph face name; unknown names fall back to the built-in segment face.
    pub font_family: String,
    /// Tile border width as a fraction of the tile.
    pub border_width: f32,
    pub border_color: String,
    pub text_color: String,
    pub background_color: String,
    /// Circumradius of triangular-face UVs inside the tile (d4/d8/d20).
    pub tri_uv_radius: f32,
    /// Circumradius of pentagonal-face UVs inside the tile (d12).
    pub pent_uv_radius: f32,
    /// Inward padding of the d10's projected UVs, as a fraction of the tile.
    pub d10_padding: f32,
    /// Shift the mean of each d10 face's UVs toward the tile center.
    pub d10_auto_center: bool,
    /// Per-cap UV nudges correcting top/bottom asymmetry of the d10 kites.
    pub d10_top_offset_x: f32,
    pub d10_top_offset_y: f32,
    pub d10_bottom_offset_x: f32,
    pub d10_bottom_offset_y: f32,
}

impl Default for DiceRenderConfig {
    fn default() -> Self {
        Self {
            tile_size: 256,
            uv_inset: 0.01,
            font_scale: 0.55,
            font_offset_x: 0.0,
            font_offset_y: 0.0,
            font_weight: 0.12,
            font_family: "segment".to_string(),
            border_width: 0.045,
            border_color: "#1a1a1a".to_string(),
            text_color: "#2b2b2b".to_string(),
            background_color: "#f5f0e6".to_string(),
            tri_uv_radius: 0.34,
            pent_uv_radius: 0.38,
            d10_padding: 0.08,
            d10_auto_center: true,
            d10_top_offset_x: 0.0,
            d10_top_offset_y: 0.015,
            d10_bottom_offset_x: 0.0,
            d10_bottom_offset_y: -0.015,
        }
    }
}

/// Caller-supplied partial overrides.
///
/// Both sections are loose JSON so that a single wrong-typed field degrades
/// to its default instead of failing the whole structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfigOverrides {
    #[serde(default)]
    pub global: Option<Value>,
    #[serde(default)]
    pub per_sides: HashMap<u32, Value>,
}

/// Resolve the configuration for one die.
///
/// Never fails; always returns a config with every field inside its range.
pub fn resolve_render_config(
    sides: u32,
    overrides: Option<&RenderConfigOverrides>,
) -> DiceRenderConfig {
    let mut config = DiceRenderConfig::default();
    apply_per_side_defaults(&mut config, sides);

    if let Some(overrides) = overrides {
        if let Some(global) = &overrides.global {
            merge_overrides(&mut config, global);
        }
        if let Some(per_side) = overrides.per_sides.get(&sides) {
            merge_overrides(&mut config, per_side);
        }
    }

    config.normalize();
    config
}

/// Built-in per-side-count tuning applied on top of the global defaults.
fn apply_per_side_defaults(config: &mut DiceRenderConfig, sides: u32) {
    match sides {
        4 => {
            // Labels sit inside a triangle, keep them small.
            config.font_scale = 0.42;
        }
        10 => {
            config.font_scale = 0.48;
        }
        12 => {
            config.font_scale = 0.46;
        }
        20 => {
            // Two-digit labels on small triangular faces.
            config.font_scale = 0.40;
            config.tri_uv_radius = 0.38;
        }
        _ => {}
    }
}

fn merge_overrides(config: &mut DiceRenderConfig, value: &Value) {
    let Some(map) = value.as_object() else {
        debug!("render config override is not an object, ignoring");
        return;
    };

    merge_u32(&mut config.tile_size, map.get("tile_size"), TILE_SIZE_RANGE);
    merge_f32(&mut config.uv_inset, map.get("uv_inset"), UV_INSET_RANGE);
    merge_f32(&mut config.font_scale, map.get("font_scale"), FONT_SCALE_RANGE);
    merge_f32(
        &mut config.font_offset_x,
        map.get("font_offset_x"),
        FONT_OFFSET_RANGE,
    );
    merge_f32(
        &mut config.font_offset_y,
        map.get("font_offset_y"),
        FONT_OFFSET_RANGE,
    );
    merge_f32(
        &mut config.font_weight,
        map.get("font_weight"),
        FONT_WEIGHT_RANGE,
    );
    merge_string(&mut config.font_family, map.get("font_family"));
    merge_f32(
        &mut config.border_width,
        map.get("border_width"),
        BORDER_WIDTH_RANGE,
    );
    merge_string(&mut config.border_color, map.get("border_color"));
    merge_string(&mut config.text_color, map.get("text_color"));
    merge_string(&mut config.background_color, map.get("background_color"));
    merge_f32(
        &mut config.tri_uv_radius,
        map.get("tri_uv_radius"),
        UV_RADIUS_RANGE,
    );
    merge_f32(
        &mut config.pent_uv_radius,
        map.get("pent_uv_radius"),
        UV_RADIUS_RANGE,
    );
    merge_f32(
        &mut config.d10_padding,
        map.get("d10_padding"),
        D10_PADDING_RANGE,
    );
    merge_bool(&mut config.d10_auto_center, map.get("d10_auto_center"));
    merge_f32(
        &mut config.d10_top_offset_x,
        map.get("d10_top_offset_x"),
        D10_GROUP_OFFSET_RANGE,
    );
    merge_f32(
        &mut config.d10_top_offset_y,
        map.get("d10_top_offset_y"),
        D10_GROUP_OFFSET_RANGE,
    );
    merge_f32(
        &mut config.d10_bottom_offset_x,
        map.get("d10_bottom_offset_x"),
        D10_GROUP_OFFSET_RANGE,
    );
    merge_f32(
        &mut config.d10_bottom_offset_y,
        map.get("d10_bottom_offset_y"),
        D10_GROUP_OFFSET_RANGE,
    );
}

fn merge_f32(target: &mut f32, value: Option<&Value>, range: (f32, f32)) {
    if let Some(v) = value.and_then(Value::as_f64) {
        let v = v as f32;
        if v.is_finite() {
            *target = v.clamp(range.0, range.1);
        }
    }
}

fn merge_u32(target: &mut u32, value: Option<&Value>, range: (u32, u32)) {
    if let Some(v) = value.and_then(Value::as_f64) {
        if v.is_finite() {
            *target = (v.round().max(0.0) as u32).clamp(range.0, range.1);
        }
    }
}

fn merge_bool(target: &mut bool, value: Option<&Value>) {
    if let Some(v) = value.and_then(Value::as_bool) {
        *target = v;
    }
}

fn merge_string(target: &mut String, value: Option<&Value>) {
    if let Some(v) = value.and_then(Value::as_str) {
        *target = v.to_string();
    }
}

impl DiceRenderConfig {
    /// Force every numeric field back into its documented range.
    fn normalize(&mut self) {
        self.tile_size = self.tile_size.clamp(TILE_SIZE_RANGE.0, TILE_SIZE_RANGE.1);
        self.uv_inset = clamp_finite(self.uv_inset, UV_INSET_RANGE, 0.01);
        self.font_scale = clamp_finite(self.font_scale, FONT_SCALE_RANGE, 0.55);
        self.font_offset_x = clamp_finite(self.font_offset_x, FONT_OFFSET_RANGE, 0.0);
        self.font_offset_y = clamp_finite(self.font_offset_y, FONT_OFFSET_RANGE, 0.0);
        self.font_weight = clamp_finite(self.font_weight, FONT_WEIGHT_RANGE, 0.12);
        self.border_width = clamp_finite(self.border_width, BORDER_WIDTH_RANGE, 0.045);
        self.tri_uv_radius = clamp_finite(self.tri_uv_radius, UV_RADIUS_RANGE, 0.34);
        self.pent_uv_radius = clamp_finite(self.pent_uv_radius, UV_RADIUS_RANGE, 0.38);
        self.d10_padding = clamp_finite(self.d10_padding, D10_PADDING_RANGE, 0.08);
        self.d10_top_offset_x = clamp_finite(self.d10_top_offset_x, D10_GROUP_OFFSET_RANGE, 0.0);
        self.d10_top_offset_y = clamp_finite(self.d10_top_offset_y, D10_GROUP_OFFSET_RANGE, 0.0);
        self.d10_bottom_offset_x =
            clamp_finite(self.d10_bottom_offset_x, D10_GROUP_OFFSET_RANGE, 0.0);
        self.d10_bottom_offset_y =
            clamp_finite(self.d10_bottom_offset_y, D10_GROUP_OFFSET_RANGE, 0.0);
    }
}

fn clamp_finite(v: f32, range: (f32, f32), fallback: f32) -> f32 {
    if v.is_finite() {
        v.clamp(range.0, range.1)
    } else {
        fallback
    }
}
