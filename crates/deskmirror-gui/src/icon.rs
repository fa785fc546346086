//! DeskMirror application icon generator.
//!
//! Produces a procedural icon: a card stack on the left mirrored into a
//! folder on the right, with a thin divider between them. Rendered at any
//! resolution as RGBA pixel data for the window icon.

const CARD: [u8; 3] = [0x89, 0xb4, 0xfa];
const FOLDER: [u8; 3] = [0xf9, 0xe2, 0xaf];
const DIVIDER: [u8; 3] = [0xe4, 0xe4, 0xe8];

/// Generate a DeskMirror icon as egui `IconData`.
pub fn generate_icon(size: u32) -> egui::IconData {
    egui::IconData {
        rgba: render_icon(size),
        width: size,
        height: size,
    }
}

/// Render the icon into an RGBA pixel buffer (top-to-bottom row order).
pub fn render_icon(size: u32) -> Vec<u8> {
    let s = size as f32;
    let mut pixels = vec![0u8; (size * size * 4) as usize];

    // (centre x, centre y, half width, half height, corner radius, colour)
    let shapes: [(f32, f32, f32, f32, f32, [u8; 3]); 5] = [
        // Three stacked cards.
        (0.25, 0.30, 0.17, 0.08, 0.03, CARD),
        (0.25, 0.50, 0.17, 0.08, 0.03, CARD),
        (0.25, 0.70, 0.17, 0.08, 0.03, CARD),
        // Folder tab and body.
        (0.70, 0.34, 0.10, 0.05, 0.02, FOLDER),
        (0.75, 0.55, 0.19, 0.17, 0.04, FOLDER),
    ];
    let divider = (0.5, 0.5, 0.012, 0.40, 0.006, DIVIDER);

    for y in 0..size {
        for x in 0..size {
            let px = (x as f32 + 0.5) / s;
            let py = (y as f32 + 0.5) / s;

            let mut color = [0u8; 3];
            let mut alpha = 0.0f32;
            for &(cx, cy, hw, hh, r, c) in shapes.iter().chain(std::iter::once(&divider)) {
                let coverage = smooth_edge(rounded_rect_sdf(px - cx, py - cy, hw, hh, r) * s);
                if coverage > alpha {
                    alpha = coverage;
                    color = c;
                }
            }

            let i = ((y * size + x) * 4) as usize;
            pixels[i] = color[0];
            pixels[i + 1] = color[1];
            pixels[i + 2] = color[2];
            pixels[i + 3] = (alpha * 255.0).round() as u8;
        }
    }
    pixels
}

/// Signed distance from a point (relative to the centre) to a rounded
/// rectangle. Negative inside.
fn rounded_rect_sdf(dx: f32, dy: f32, half_w: f32, half_h: f32, radius: f32) -> f32 {
    let qx = dx.abs() - (half_w - radius);
    let qy = dy.abs() - (half_h - radius);
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    outside + qx.max(qy).min(0.0) - radius
}

/// One-pixel anti-aliased edge from a signed distance in pixels.
fn smooth_edge(distance_px: f32) -> f32 {
    (0.5 - distance_px).clamp(0.0, 1.0)
}
