//! Utility functions

// Stacked-cards mark, square viewBox so it doubles as the window icon
pub const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 96 96"><rect x="18" y="62" width="60" height="14" rx="4" fill="#3f3f46"/><rect x="13" y="42" width="70" height="14" rx="4" fill="#71717a"/><rect x="8" y="18" width="80" height="18" rx="5" fill="#a78bfa"/></svg>"##;

/// Rasterize the logo SVG at the given width, preserving aspect ratio.
pub fn rasterize_logo(width: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).unwrap();
    let svg_size = tree.size();
    let scale = width as f32 / svg_size.width();
    let height = (svg_size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), width, height)
}

/// Rasterize the logo to a square image (for window/taskbar icons).
pub fn rasterize_logo_square(size: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).unwrap();
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), size, size)
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}
