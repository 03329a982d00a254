//! Numbered texture atlas for die faces.
//!
//! One raster tile per face number, packed into a near-square grid. The GPU
//! image is created with a single mip level and an edge-clamped linear
//! sampler: adjacent tiles must never bleed into each other at small
//! on-screen sizes, so this is a correctness requirement rather than a
//! quality knob.

use bevy::image::{ImageAddressMode, ImageFilterMode, ImageSampler, ImageSamplerDescriptor};
use bevy::log::warn;
use bevy::math::Vec2;
use bevy::prelude::Image;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use image::{Rgba, RgbaImage};

use super::config::DiceRenderConfig;

/// Atlas grid shape plus the per-tile UV inset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasLayout {
    pub columns: u32,
    pub rows: u32,
    /// Inward inset of each tile's UV rect, as a fraction of one tile.
    pub tile_inset: f32,
}

/// Normalized UV rectangle of one tile (v grows upward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl UvRect {
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.u0 + self.u1) * 0.5, (self.v0 + self.v1) * 0.5)
    }

    /// Map a point in `[0,1]^2` tile-local space into this rect.
    pub fn lerp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.u0 + p.x * (self.u1 - self.u0),
            self.v0 + p.y * (self.v1 - self.v0),
        )
    }
}

impl AtlasLayout {
    /// Near-square grid able to hold `n` tiles.
    pub fn for_face_count(n: u32, tile_inset: f32) -> Self {
        let columns = (n.max(1) as f32).sqrt().ceil() as u32;
        let rows = n.max(1).div_ceil(columns);
        Self {
            columns,
            rows,
            tile_inset,
        }
    }

    /// UV rect of the tile for face `number` (1-indexed).
    pub fn rect_for(&self, number: u32) -> UvRect {
        let idx = number.saturating_sub(1).min(self.columns * self.rows - 1);
        let col = idx % self.columns;
        let row = idx / self.columns;
        let inset_u = self.tile_inset / self.columns as f32;
        let inset_v = self.tile_inset / self.rows as f32;
        UvRect {
            u0: col as f32 / self.columns as f32 + inset_u,
            v0: 1.0 - (row + 1) as f32 / self.rows as f32 + inset_v,
            u1: (col + 1) as f32 / self.columns as f32 - inset_u,
            v1: 1.0 - row as f32 / self.rows as f32 - inset_v,
        }
    }

    /// Inverse lookup: which face number owns the tile containing `(u, v)`.
    ///
    /// Coordinates are clamped into the grid, so any finite input maps to a
    /// valid tile.
    pub fn number_at(&self, u: f32, v: f32) -> u32 {
        let col = ((u * self.columns as f32).floor() as i64).clamp(0, self.columns as i64 - 1);
        let row =
            (((1.0 - v) * self.rows as f32).floor() as i64).clamp(0, self.rows as i64 - 1);
        (row as u32) * self.columns + col as u32 + 1
    }
}

/// A built atlas: raster bitmap, grid layout, and the resolved config the
/// geometry builders need downstream (propagated so they do not re-resolve).
#[derive(Debug, Clone)]
pub struct AtlasDescriptor {
    pub bitmap: RgbaImage,
    pub layout: AtlasLayout,
    pub config: DiceRenderConfig,
}

/// Rasterize the numbered atlas for a die with `sides` faces.
///
/// `background` overrides the config background when the caller supplied a
/// die color.
pub fn build_atlas(
    sides: u32,
    config: &DiceRenderConfig,
    background: Option<&str>,
) -> AtlasDescriptor {
    let layout = AtlasLayout::for_face_count(sides, config.uv_inset);
    let tile = config.tile_size;
    let mut bitmap = RgbaImage::from_pixel(
        layout.columns * tile,
        layout.rows * tile,
        Rgba([0, 0, 0, 0]),
    );

    let bg = parse_color(
        background.unwrap_or(&config.background_color),
        [245, 240, 230, 255],
    );
    let border = parse_color(&config.border_color, [26, 26, 26, 255]);
    let text = parse_color(&config.text_color, [43, 43, 43, 255]);

    for number in 1..=sides {
        let idx = number - 1;
        let x0 = (idx % layout.columns) * tile;
        let y0 = (idx / layout.columns) * tile;
        draw_tile(&mut bitmap, x0, y0, tile, number, config, bg, border, text);
    }

    AtlasDescriptor {
        bitmap,
        layout,
        config: config.clone(),
    }
}

/// Convert the raster atlas into a GPU image.
///
/// Single mip level, clamp-to-edge, linear filtering; see the module docs.
pub fn atlas_to_image(atlas: &AtlasDescriptor) -> Image {
    let (width, height) = atlas.bitmap.dimensions();
    let mut image = Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        atlas.bitmap.as_raw().clone(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::ClampToEdge,
        address_mode_v: ImageAddressMode::ClampToEdge,
        mag_filter: ImageFilterMode::Linear,
        min_filter: ImageFilterMode::Linear,
        mipmap_filter: ImageFilterMode::Linear,
        ..Default::default()
    });
    image
}

fn parse_color(s: &str, fallback: [u8; 4]) -> [u8; 4] {
    match csscolorparser::parse(s) {
        Ok(c) => c.to_rgba8(),
        Err(_) => {
            warn!("unparseable color {s:?}, using fallback");
            fallback
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_tile(
    bitmap: &mut RgbaImage,
    x0: u32,
    y0: u32,
    tile: u32,
    number: u32,
    config: &DiceRenderConfig,
    bg: [u8; 4],
    border: [u8; 4],
    text: [u8; 4],
) {
    let x0 = x0 as i32;
    let y0 = y0 as i32;
    let tile = tile as i32;

    fill_rect(bitmap, x0, y0, x0 + tile, y0 + tile, Rgba(bg));

    let bw = (config.border_width * tile as f32).round() as i32;
    if bw > 0 {
        let c = Rgba(border);
        fill_rect(bitmap, x0, y0, x0 + tile, y0 + bw, c);
        fill_rect(bitmap, x0, y0 + tile - bw, x0 + tile, y0 + tile, c);
        fill_rect(bitmap, x0, y0, x0 + bw, y0 + tile, c);
        fill_rect(bitmap, x0 + tile - bw, y0, x0 + tile, y0 + tile, c);
    }

    // Digit layout: glyph height from font_scale, width 0.6h per digit.
    let digits = number.to_string();
    let glyph_h = (config.font_scale * tile as f32) as i32;
    let glyph_w = (glyph_h as f32 * 0.6) as i32;
    let gap = (glyph_h as f32 * 0.15) as i32;
    let count = digits.len() as i32;
    let total_w = glyph_w * count + gap * (count - 1).max(0);

    let center_x = x0 + tile / 2 + (config.font_offset_x * tile as f32) as i32;
    let center_y = y0 + tile / 2 + (config.font_offset_y * tile as f32) as i32;
    let start_x = center_x - total_w / 2;
    let start_y = center_y - glyph_h / 2;

    let thickness = ((config.font_weight * glyph_h as f32) as i32).max(1);
    for (i, ch) in digits.chars().enumerate() {
        draw_segment_digit(
            bitmap,
            start_x + i as i32 * (glyph_w + gap),
            start_y,
            glyph_w,
            glyph_h,
            ch,
            thickness,
            Rgba(text),
        );
    }
}

/// Seven-segment digit renderer; the only built-in glyph face.
#[allow(clippy::too_many_arguments)]
fn draw_segment_digit(
    bitmap: &mut RgbaImage,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    ch: char,
    thickness: i32,
    color: Rgba<u8>,
) {
    let Some(segments) = segments_for(ch) else {
        return;
    };

    let t = thickness.max(1);

    // Horizontal segments: A (top), G (middle), D (bottom).
    // Vertical segments: F (top-left), B (top-right), E (bottom-left), C (bottom-right).
    if segments[0] {
        fill_rect(bitmap, x, y, x + w, y + t, color);
    }
    if segments[1] {
        fill_rect(bitmap, x + w - t, y, x + w, y + h / 2, color);
    }
    if segments[2] {
        fill_rect(bitmap, x + w - t, y + h / 2, x + w, y + h, color);
    }
    if segments[3] {
        fill_rect(bitmap, x, y + h - t, x + w, y + h, color);
    }
    if segments[4] {
        fill_rect(bitmap, x, y + h / 2, x + t, y + h, color);
    }
    if segments[5] {
        fill_rect(bitmap, x, y, x + t, y + h / 2, color);
    }
    if segments[6] {
        fill_rect(bitmap, x, y + h / 2 - t / 2, x + w, y + h / 2 + t / 2, color);
    }
}

fn segments_for(ch: char) -> Option<[bool; 7]> {
    // [A, B, C, D, E, F, G]
    Some(match ch {
        '0' => [true, true, true, true, true, true, false],
        '1' => [false, true, true, false, false, false, false],
        '2' => [true, true, false, true, true, false, true],
        '3' => [true, true, true, true, false, false, true],
        '4' => [false, true, true, false, false, true, true],
        '5' => [true, false, true, true, false, true, true],
        '6' => [true, false, true, true, true, true, true],
        '7' => [true, true, true, false, false, false, false],
        '8' => [true, true, true, true, true, true, true],
        '9' => [true, true, true, true, false, true, true],
        _ => return None,
    })
}

fn fill_rect(bitmap: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
    let w = bitmap.width() as i32;
    let h = bitmap.height() as i32;
    let x0 = x0.clamp(0, w);
    let y0 = y0.clamp(0, h);
    let x1 = x1.clamp(0, w);
    let y1 = y1.clamp(0, h);
    for yy in y0..y1 {
        for xx in x0..x1 {
            bitmap.put_pixel(xx as u32, yy as u32, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice3d::config::resolve_render_config;

    #[test]
    fn test_grid_is_near_square() {
        assert_eq!(AtlasLayout::for_face_count(4, 0.0).columns, 2);
        assert_eq!(AtlasLayout::for_face_count(4, 0.0).rows, 2);
        assert_eq!(AtlasLayout::for_face_count(6, 0.0).columns, 3);
        assert_eq!(AtlasLayout::for_face_count(6, 0.0).rows, 2);
        assert_eq!(AtlasLayout::for_face_count(10, 0.0).columns, 4);
        assert_eq!(AtlasLayout::for_face_count(10, 0.0).rows, 3);
        assert_eq!(AtlasLayout::for_face_count(20, 0.0).columns, 5);
        assert_eq!(AtlasLayout::for_face_count(20, 0.0).rows, 4);
    }

    #[test]
    fn test_tile_centers_round_trip() {
        for sides in [4u32, 6, 8, 10, 12, 20] {
            let layout = AtlasLayout::for_face_count(sides, 0.02);
            for number in 1..=sides {
                let center = layout.rect_for(number).center();
                assert_eq!(
                    layout.number_at(center.x, center.y),
                    number,
                    "tile center of {number} on a d{sides} must map back to {number}"
                );
            }
        }
    }

    #[test]
    fn test_inverse_lookup_clamps_out_of_range_coords() {
        let layout = AtlasLayout::for_face_count(6, 0.0);
        assert_eq!(layout.number_at(-1.0, 2.0), 1);
        let last = layout.columns * layout.rows;
        assert_eq!(layout.number_at(2.0, -1.0), last);
    }

    #[test]
    fn test_uv_rects_are_inset_and_ordered() {
        let layout = AtlasLayout::for_face_count(10, 0.05);
        for number in 1..=10 {
            let r = layout.rect_for(number);
            assert!(r.u0 < r.u1);
            assert!(r.v0 < r.v1);
            assert!(r.u0 >= 0.0 && r.u1 <= 1.0);
            assert!(r.v0 >= 0.0 && r.v1 <= 1.0);
        }
    }

    #[test]
    fn test_atlas_bitmap_dimensions() {
        let config = resolve_render_config(10, None);
        let atlas = build_atlas(10, &config, None);
        assert_eq!(
            atlas.bitmap.width(),
            atlas.layout.columns * config.tile_size
        );
        assert_eq!(atlas.bitmap.height(), atlas.layout.rows * config.tile_size);
    }

    #[test]
    fn test_tiles_have_background_and_label_pixels() {
        let config = resolve_render_config(6, None);
        let atlas = build_atlas(6, &config, Some("#ff0000"));
        let tile = config.tile_size;
        // Corner pixel inside the border band.
        let border = atlas.bitmap.get_pixel(1, 1);
        assert_eq!(border.0[3], 255);
        // A pixel just inside the border should carry the requested background.
        let bw = (config.border_width * tile as f32).round() as u32 + 2;
        let inside = atlas.bitmap.get_pixel(bw, bw);
        assert_eq!(inside.0[0], 255);
        assert_eq!(inside.0[1], 0);
    }
}
