//! Screen-space text from a 16x16 ASCII glyph atlas.

use orrery_render::GlyphVertex;

/// Glyph cells per atlas row and column.
pub const ATLAS_CELLS: u32 = 16;

/// Vertices emitted per character: two triangles.
pub const VERTICES_PER_GLYPH: u32 = 6;

/// Top-left corner and glyph size of a block of text, in NDC units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    pub origin: [f32; 2],
    pub glyph_size: [f32; 2],
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            origin: [-0.98, 0.97],
            glyph_size: [0.035, 0.06],
        }
    }
}

/// UV rectangle `[u0, v0, u1, v1]` of a character's atlas cell.
/// Non-ASCII characters use the cell for `?`.
pub fn glyph_cell(ch: char) -> [f32; 4] {
    let code = if ch.is_ascii() { ch as u32 } else { '?' as u32 };
    let cell = 1.0 / ATLAS_CELLS as f32;
    let u0 = (code % ATLAS_CELLS) as f32 * cell;
    let v0 = (code / ATLAS_CELLS) as f32 * cell;
    [u0, v0, u0 + cell, v0 + cell]
}

/// Build glyph quads for `text`. `\n` starts a new line and emits nothing.
pub fn layout_text(text: &str, layout: TextLayout) -> Vec<GlyphVertex> {
    let [width, height] = layout.glyph_size;
    let mut vertices = Vec::with_capacity(text.len() * VERTICES_PER_GLYPH as usize);
    let mut column = 0u32;
    let mut line = 0u32;

    for ch in text.chars() {
        if ch == '\n' {
            line += 1;
            column = 0;
            continue;
        }
        let x0 = layout.origin[0] + column as f32 * width;
        let y0 = layout.origin[1] - line as f32 * height;
        let (x1, y1) = (x0 + width, y0 - height);
        let [u0, v0, u1, v1] = glyph_cell(ch);

        let top_left = GlyphVertex { position: [x0, y0], uv: [u0, v0] };
        let top_right = GlyphVertex { position: [x1, y0], uv: [u1, v0] };
        let bottom_left = GlyphVertex { position: [x0, y1], uv: [u0, v1] };
        let bottom_right = GlyphVertex { position: [x1, y1], uv: [u1, v1] };
        vertices.extend_from_slice(&[
            top_left,
            bottom_left,
            top_right,
            top_right,
            bottom_left,
            bottom_right,
        ]);
        column += 1;
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_vertices_per_char() {
        let vertices = layout_text("FX ON", TextLayout::default());
        assert_eq!(vertices.len(), 5 * 6);
    }

    #[test]
    fn test_newline_emits_nothing() {
        let layout = TextLayout::default();
        let vertices = layout_text("A\nB", layout);
        assert_eq!(vertices.len(), 12);
        // Second line starts back at the left edge, one glyph lower.
        assert_eq!(vertices[6].position[0], layout.origin[0]);
        assert!((vertices[6].position[1] - (layout.origin[1] - layout.glyph_size[1])).abs() < 1e-6);
    }

    #[test]
    fn test_glyph_cell_indexing() {
        // 'A' is 65: column 1, row 4.
        let [u0, v0, u1, v1] = glyph_cell('A');
        assert!((u0 - 1.0 / 16.0).abs() < 1e-6);
        assert!((v0 - 4.0 / 16.0).abs() < 1e-6);
        assert!((u1 - u0 - 1.0 / 16.0).abs() < 1e-6);
        assert!((v1 - v0 - 1.0 / 16.0).abs() < 1e-6);
        assert_eq!(glyph_cell('é'), glyph_cell('?'));
    }

    #[test]
    fn test_triangles_wind_counter_clockwise() {
        let vertices = layout_text("X", TextLayout::default());
        for tri in vertices.chunks_exact(3) {
            let [a, b, c] = [tri[0].position, tri[1].position, tri[2].position];
            let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross > 0.0);
        }
    }
}
