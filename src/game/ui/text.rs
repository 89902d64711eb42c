//! Label Text
//!
//! 5x7 pixel font rasterised into screen-space quads, plus projection of
//! world-space anchors so names can float above their marbles.

use glam::{Mat4, Vec3};

use crate::render::LabelMesh;

/// Glyph cell in font pixels.
pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance per character (glyph + 1 pixel gap).
pub const GLYPH_ADVANCE: u32 = 6;

/// Row bitmaps for `c`, top row first, bit 4 = leftmost column.
///
/// Letters are case-insensitive; anything unknown renders as a filled box.
pub fn get_char_bitmap(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0E],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x06, 0x08, 0x10, 0x1F],
        '3' => [0x0E, 0x11, 0x01, 0x06, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x0E, 0x10, 0x1E, 0x11, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x01, 0x0E],
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        ':' => [0x00, 0x04, 0x00, 0x00, 0x00, 0x04, 0x00],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x04, 0x04, 0x08],
        '\'' => [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '#' => [0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A],
        '?' => [0x0E, 0x11, 0x01, 0x06, 0x04, 0x00, 0x04],
        '=' => [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00],
        _ => [0x1F; 7],
    }
}

/// Width in pixels of `text` at `scale` screen pixels per font pixel.
pub fn text_width(text: &str, scale: f32) -> f32 {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return 0.0;
    }
    (chars * GLYPH_ADVANCE - 1) as f32 * scale
}

/// Height in pixels of one line of text.
pub fn text_height(scale: f32) -> f32 {
    GLYPH_HEIGHT as f32 * scale
}

/// Append `text` with its top-left corner at pixel (`x`, `y`).
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    mesh: &mut LabelMesh,
    text: &str,
    x: f32,
    y: f32,
    scale: f32,
    color: [f32; 4],
    screen_width: f32,
    screen_height: f32,
) {
    let to_ndc = |px: f32, py: f32| LabelMesh::screen_to_ndc(px, py, screen_width, screen_height);
    let advance = GLYPH_ADVANCE as f32 * scale;

    for (char_idx, c) in text.chars().enumerate() {
        let char_x = x + char_idx as f32 * advance;

        for (row, &row_bits) in get_char_bitmap(c).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if (row_bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 1 {
                    let px = char_x + col as f32 * scale;
                    let py = y + row as f32 * scale;
                    // NDC y grows upward, so the bottom pixel edge is the min corner
                    let min = to_ndc(px, py + scale);
                    let max = to_ndc(px + scale, py);
                    mesh.add_quad(min, max, color);
                }
            }
        }
    }
}

/// Project a world point to pixel coordinates (origin top-left).
///
/// Returns `None` when the point is behind the camera or outside the
/// depth range.
pub fn project_to_screen(world: Vec3, view_proj: Mat4, width: f32, height: f32) -> Option<(f32, f32)> {
    let clip = view_proj * world.extend(1.0);
    if clip.w <= 1e-4 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    if !(0.0..=1.0).contains(&ndc.z) {
        return None;
    }
    Some(((ndc.x + 1.0) * 0.5 * width, (1.0 - ndc.y) * 0.5 * height))
}

/// Draw `text` centered horizontally above the projected `anchor`.
///
/// Returns `false` (and draws nothing) when the anchor is not visible.
#[allow(clippy::too_many_arguments)]
pub fn draw_label(
    mesh: &mut LabelMesh,
    text: &str,
    anchor: Vec3,
    view_proj: Mat4,
    scale: f32,
    color: [f32; 4],
    screen_width: f32,
    screen_height: f32,
) -> bool {
    let Some((sx, sy)) = project_to_screen(anchor, view_proj, screen_width, screen_height) else {
        return false;
    };
    let x = sx - text_width(text, scale) * 0.5;
    let y = sy - text_height(scale);
    draw_text(mesh, text, x, y, scale, color, screen_width, screen_height);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_pixels(c: char) -> u32 {
        get_char_bitmap(c).iter().map(|row| row.count_ones()).sum()
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        assert_eq!(get_char_bitmap('a'), get_char_bitmap('A'));
        assert_eq!(get_char_bitmap('z'), get_char_bitmap('Z'));
    }

    #[test]
    fn test_unknown_is_filled_box() {
        assert_eq!(get_char_bitmap('~'), [0x1F; 7]);
        assert_eq!(lit_pixels('\u{1F3C6}'), 35);
    }

    #[test]
    fn test_glyphs_fit_five_columns() {
        for c in "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789 .-+()_!:/,'#?=".chars() {
            assert!(get_char_bitmap(c).iter().all(|row| *row < 0x20), "glyph {c}");
        }
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut mesh = LabelMesh::new();
        draw_text(&mut mesh, "   ", 0.0, 0.0, 2.0, [1.0; 4], 800.0, 600.0);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_one_quad_per_lit_pixel() {
        let mut mesh = LabelMesh::new();
        draw_text(&mut mesh, "bob", 10.0, 10.0, 2.0, [1.0; 4], 800.0, 600.0);
        let expected = lit_pixels('B') * 2 + lit_pixels('O');
        assert_eq!(mesh.quad_count(), expected as usize);
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 2.0), 0.0);
        assert_eq!(text_width("A", 1.0), 5.0);
        assert_eq!(text_width("AB", 2.0), 22.0);
        assert_eq!(text_width("été", 1.0), 17.0);
    }

    #[test]
    fn test_project_center_and_behind() {
        let view = Mat4::look_to_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let proj = Mat4::perspective_rh(60.0_f32.to_radians(), 2.0, 0.1, 100.0);
        let vp = proj * view;

        let (x, y) = project_to_screen(Vec3::new(0.0, 0.0, -10.0), vp, 800.0, 400.0).unwrap();
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 200.0).abs() < 1e-3);

        assert!(project_to_screen(Vec3::new(0.0, 0.0, 10.0), vp, 800.0, 400.0).is_none());
    }

    #[test]
    fn test_point_above_projects_higher() {
        let view = Mat4::look_to_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let proj = Mat4::perspective_rh(60.0_f32.to_radians(), 1.0, 0.1, 100.0);
        let vp = proj * view;
        let (_, low) = project_to_screen(Vec3::new(0.0, 0.0, -10.0), vp, 500.0, 500.0).unwrap();
        let (_, high) = project_to_screen(Vec3::new(0.0, 2.0, -10.0), vp, 500.0, 500.0).unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_draw_label_hidden_behind_camera() {
        let view = Mat4::look_to_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
        let mut mesh = LabelMesh::new();
        let drawn = draw_label(&mut mesh, "x", Vec3::new(0.0, 0.0, 5.0), proj * view, 2.0, [1.0; 4], 100.0, 100.0);
        assert!(!drawn);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_draw_label_centered() {
        let view = Mat4::look_to_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
        let mut mesh = LabelMesh::new();
        assert!(draw_label(&mut mesh, "I", Vec3::new(0.0, 0.0, -5.0), proj * view, 2.0, [1.0; 4], 100.0, 100.0));
        let min_x = mesh.vertices.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = mesh.vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!((min_x + max_x).abs() < 1e-4);
    }
}
