//! Software raster implementing `DrawingSurface` over an RGBA8 image
//!
//! Paths are flattened in device space and filled with a non-zero scanline
//! rasterizer. Each pixel row is sampled on four sub-scanlines with exact
//! horizontal span coverage, which is enough to keep petal edges smooth.
//! Pixels hold straight (non-premultiplied) alpha and blend source-over.

use image::RgbaImage;
use sakura_core::{
    Affine, DrawingSurface, Glow, Path, Rect, Result, Rgba, SakuraError, Vec2, Viewport,
};

/// Vertical samples per pixel row
const SUBSAMPLES: usize = 4;
/// Upper bound on the translucent expansions used to fake a blur
const MAX_GLOW_RINGS: usize = 8;

#[derive(Clone, Copy, Debug)]
struct State {
    transform: Affine,
    alpha: f32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
        }
    }
}

/// A non-horizontal polygon edge, stored top to bottom
#[derive(Clone, Copy, Debug)]
struct Edge {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    winding: i32,
}

impl Edge {
    fn new(a: Vec2, b: Vec2) -> Option<Self> {
        if a.y == b.y || !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite())
        {
            return None;
        }
        Some(if a.y < b.y {
            Edge {
                x0: a.x,
                y0: a.y,
                x1: b.x,
                y1: b.y,
                winding: 1,
            }
        } else {
            Edge {
                x0: b.x,
                y0: b.y,
                x1: a.x,
                y1: a.y,
                winding: -1,
            }
        })
    }

    fn x_at(&self, y: f32) -> f32 {
        self.x0 + (y - self.y0) * (self.x1 - self.x0) / (self.y1 - self.y0)
    }
}

/// CPU canvas the scenes draw into.
///
/// Drawing coordinates are logical pixels; the device scale factor is applied
/// underneath every transform so a 2x display gets a 2x raster.
pub struct Canvas {
    image: RgbaImage,
    device_scale: f32,
    state: State,
    stack: Vec<State>,
    coverage: Vec<f32>,
    crossings: Vec<(f32, i32)>,
}

impl Canvas {
    /// A transparent canvas of `width` x `height` device pixels at scale 1
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            device_scale: 1.0,
            state: State::default(),
            stack: Vec::new(),
            coverage: vec![0.0; width as usize],
            crossings: Vec::new(),
        }
    }

    /// A canvas covering `viewport` at the given device scale
    pub fn for_viewport(viewport: Viewport, device_scale: f32) -> Self {
        let mut canvas = Self::new(0, 0);
        canvas.resize(viewport, device_scale);
        canvas
    }

    /// Reallocate for a new logical size or scale factor. Contents and the
    /// transform stack are discarded.
    pub fn resize(&mut self, viewport: Viewport, device_scale: f32) {
        let scale = if device_scale.is_finite() && device_scale > 0.0 {
            device_scale
        } else {
            1.0
        };
        let width = (viewport.width.max(0.0) * scale).ceil() as u32;
        let height = (viewport.height.max(0.0) * scale).ceil() as u32;
        self.image = RgbaImage::new(width, height);
        self.device_scale = scale;
        self.state = State::default();
        self.stack.clear();
        self.coverage = vec![0.0; width as usize];
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn device_scale(&self) -> f32 {
        self.device_scale
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA8 rows, tightly packed
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Number of unmatched `save` calls
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// An opaque copy of the canvas composited over `background`
    pub fn flatten_over(&self, background: Rgba) -> RgbaImage {
        let bg = background.with_alpha(1.0);
        let mut out = RgbaImage::from_pixel(
            self.width(),
            self.height(),
            image::Rgba(bg.to_rgba8()),
        );
        for (dst, src) in out.pixels_mut().zip(self.image.pixels()) {
            let [r, g, b, a] = src.0;
            let color = Rgba::from_rgb8(r, g, b, 1.0);
            blend(&mut dst.0, color, a as f32 / 255.0);
        }
        out
    }

    /// Write a PNG. With a background the image is flattened first,
    /// otherwise transparency is kept.
    pub fn save_png(&self, path: &std::path::Path, background: Option<Rgba>) -> Result<()> {
        let result = match background {
            Some(bg) => self.flatten_over(bg).save(path),
            None => self.image.save(path),
        };
        result.map_err(|e| SakuraError::ImageError(format!("{}: {e}", path.display())))
    }

    fn device_transform(&self) -> Affine {
        Affine::scaling(self.device_scale, self.device_scale).then(&self.state.transform)
    }

    /// Map a path into device-space polygons
    fn device_polygons(&self, path: &Path) -> (Vec<Vec<Vec2>>, f32) {
        let transform = self.device_transform();
        let scale = transform.average_scale();
        let polys = path
            .flatten(scale)
            .into_iter()
            .map(|line| line.points.into_iter().map(|p| transform.apply(p)).collect())
            .collect();
        (polys, scale)
    }

    fn draw_glow(&mut self, polys: &[Vec<Vec2>], glow: Glow, scale: f32) {
        let blur = glow.blur * scale;
        let count = polys.iter().map(Vec::len).sum::<usize>();
        if blur < 0.5 || count == 0 {
            return;
        }

        let sum = polys
            .iter()
            .flatten()
            .fold(Vec2::ZERO, |acc, &p| acc + p);
        let center = sum * (1.0 / count as f32);
        let mean_radius = polys
            .iter()
            .flatten()
            .map(|&p| p.distance(center))
            .sum::<f32>()
            / count as f32;

        let rings = ((blur / 2.0).ceil() as usize).clamp(1, MAX_GLOW_RINGS);
        let color = glow.color.with_alpha(glow.color.a / (rings as f32 + 1.0));
        for k in (1..=rings).rev() {
            let spread = blur * k as f32 / rings as f32;
            let ring: Vec<Vec<Vec2>> = if mean_radius < 0.5 {
                let path = Path::circle(center, spread);
                path.flatten(1.0).into_iter().map(|l| l.points).collect()
            } else {
                let factor = (mean_radius + spread) / mean_radius;
                polys
                    .iter()
                    .map(|poly| poly.iter().map(|&p| center + (p - center) * factor).collect())
                    .collect()
            };
            self.fill_polygons(&ring, color);
        }
    }

    /// Non-zero fill of device-space polygons; each one closes implicitly
    fn fill_polygons(&mut self, polys: &[Vec<Vec2>], color: Rgba) {
        let alpha = (color.a * self.state.alpha).clamp(0.0, 1.0);
        let width = self.image.width() as usize;
        if alpha <= 0.0 || width == 0 {
            return;
        }

        let mut edges = Vec::new();
        let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
        for poly in polys.iter().filter(|p| p.len() >= 2) {
            for (i, &a) in poly.iter().enumerate() {
                let b = poly[(i + 1) % poly.len()];
                if let Some(edge) = Edge::new(a, b) {
                    min_y = min_y.min(edge.y0);
                    max_y = max_y.max(edge.y1);
                    edges.push(edge);
                }
            }
        }
        if edges.is_empty() {
            return;
        }

        let row_start = min_y.floor().max(0.0) as u32;
        let row_end = max_y.ceil().min(self.image.height() as f32).max(0.0) as u32;
        let weight = 1.0 / SUBSAMPLES as f32;

        for row in row_start..row_end {
            let (mut lo, mut hi) = (width, 0usize);
            for k in 0..SUBSAMPLES {
                let y = row as f32 + (k as f32 + 0.5) * weight;
                self.crossings.clear();
                for edge in &edges {
                    if y >= edge.y0 && y < edge.y1 {
                        self.crossings.push((edge.x_at(y), edge.winding));
                    }
                }
                if self.crossings.len() < 2 {
                    continue;
                }
                self.crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

                let mut winding = 0;
                for pair in self.crossings.windows(2) {
                    winding += pair[0].1;
                    if winding != 0 {
                        if let Some((a, b)) = add_span(&mut self.coverage, pair[0].0, pair[1].0, weight)
                        {
                            lo = lo.min(a);
                            hi = hi.max(b);
                        }
                    }
                }
            }

            for x in lo..hi {
                let cover = self.coverage[x].min(1.0);
                self.coverage[x] = 0.0;
                if cover > 0.0 {
                    let px = self.image.get_pixel_mut(x as u32, row);
                    blend(&mut px.0, color, alpha * cover);
                }
            }
        }
    }
}

/// Add horizontal coverage for `[x0, x1)`; returns the touched column range
fn add_span(coverage: &mut [f32], x0: f32, x1: f32, weight: f32) -> Option<(usize, usize)> {
    let width = coverage.len() as f32;
    let x0 = x0.max(0.0);
    let x1 = x1.min(width);
    if x1 <= x0 {
        return None;
    }
    let i0 = x0 as usize;
    let i1 = x1 as usize;
    if i0 == i1 {
        coverage[i0] += (x1 - x0) * weight;
        return Some((i0, i0 + 1));
    }
    coverage[i0] += (i0 as f32 + 1.0 - x0) * weight;
    for c in &mut coverage[i0 + 1..i1] {
        *c += weight;
    }
    if i1 < coverage.len() {
        coverage[i1] += (x1 - i1 as f32) * weight;
        return Some((i0, i1 + 1));
    }
    Some((i0, i1))
}

/// Straight-alpha source-over
fn blend(dst: &mut [u8; 4], color: Rgba, alpha: f32) {
    let sa = alpha.clamp(0.0, 1.0);
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    for (slot, src) in dst.iter_mut().zip([color.r, color.g, color.b]) {
        let d = *slot as f32 / 255.0;
        *slot = to_u8((src * sa + d * da * (1.0 - sa)) / out_a);
    }
    dst[3] = to_u8(out_a);
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl DrawingSurface for Canvas {
    fn clear_rect(&mut self, rect: Rect) {
        let s = self.device_scale;
        let x0 = (rect.x * s).floor().max(0.0) as u32;
        let y0 = (rect.y * s).floor().max(0.0) as u32;
        let x1 = ((rect.x + rect.width) * s).ceil().min(self.width() as f32).max(0.0) as u32;
        let y1 = ((rect.y + rect.height) * s).ceil().min(self.height() as f32).max(0.0) as u32;
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, image::Rgba([0, 0, 0, 0]));
            }
        }
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.state.transform = self.state.transform.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform.rotate(radians);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.scale(sx, sy);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_path(&mut self, path: &Path, color: Rgba, glow: Option<Glow>) {
        let (polys, scale) = self.device_polygons(path);
        if let Some(glow) = glow {
            self.draw_glow(&polys, glow, scale);
        }
        self.fill_polygons(&polys, color);
    }

    fn stroke_path(&mut self, path: &Path, color: Rgba, width: f32) {
        let (lines, scale) = {
            let transform = self.device_transform();
            let scale = transform.average_scale();
            let lines: Vec<(Vec<Vec2>, bool)> = path
                .flatten(scale)
                .into_iter()
                .map(|l| (l.points.into_iter().map(|p| transform.apply(p)).collect(), l.closed))
                .collect();
            (lines, scale)
        };
        let half = width * scale * 0.5;
        if half.is_nan() || half <= 0.0 {
            return;
        }

        let mut quads = Vec::new();
        for (points, closed) in &lines {
            let mut segments: Vec<(Vec2, Vec2)> =
                points.windows(2).map(|w| (w[0], w[1])).collect();
            if *closed {
                if let (Some(&last), Some(&first)) = (points.last(), points.first()) {
                    segments.push((last, first));
                }
            }
            for (a, b) in segments {
                let d = b - a;
                let len = d.length();
                if len < 1e-6 {
                    continue;
                }
                let n = Vec2::new(-d.y, d.x) * (half / len);
                quads.push(vec![a + n, b + n, b - n, a - n]);
            }
        }
        self.fill_polygons(&quads, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f32, y0: f32, x1: f32, y1: f32) -> Path {
        let mut path = Path::new();
        path.move_to(Vec2::new(x0, y0))
            .line_to(Vec2::new(x1, y0))
            .line_to(Vec2::new(x1, y1))
            .line_to(Vec2::new(x0, y1))
            .close();
        path
    }

    #[test]
    fn starts_transparent() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.as_bytes().len(), 4 * 3 * 4);
        assert!(canvas.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn fills_interior_and_not_outside() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_path(&square(2.0, 2.0, 8.0, 8.0), Rgba::WHITE, None);
        assert_eq!(canvas.pixel(5, 5), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(2, 2), [255, 255, 255, 255]);
        assert_eq!(canvas.pixel(8, 5)[3], 0);
        assert_eq!(canvas.pixel(0, 0)[3], 0);
    }

    #[test]
    fn partial_pixel_gets_partial_alpha() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_path(&square(2.5, 2.0, 8.0, 8.0), Rgba::WHITE, None);
        let px = canvas.pixel(2, 4);
        assert!((px[3] as i32 - 128).abs() <= 1, "{px:?}");
        assert_eq!(&px[..3], &[255, 255, 255]);
    }

    #[test]
    fn overlapping_subpaths_fill_once() {
        let mut path = square(0.0, 0.0, 6.0, 6.0);
        path.move_to(Vec2::new(3.0, 3.0))
            .line_to(Vec2::new(9.0, 3.0))
            .line_to(Vec2::new(9.0, 9.0))
            .line_to(Vec2::new(3.0, 9.0))
            .close();
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_path(&path, Rgba::WHITE.with_alpha(0.5), None);
        assert_eq!(canvas.pixel(4, 4)[3], canvas.pixel(1, 1)[3]);
        assert_eq!(canvas.pixel(1, 1)[3], 128);
    }

    #[test]
    fn source_over_blends_straight_alpha() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill_path(&square(0.0, 0.0, 2.0, 2.0), Rgba::from_hex(0x0000ff), None);
        canvas.fill_path(&square(0.0, 0.0, 2.0, 2.0), Rgba::new(1.0, 0.0, 0.0, 0.5), None);
        let px = canvas.pixel(0, 0);
        assert!((px[0] as i32 - 128).abs() <= 1);
        assert_eq!(px[1], 0);
        assert!((px[2] as i32 - 127).abs() <= 1);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn transform_and_global_alpha_restore() {
        let mut canvas = Canvas::new(20, 20);
        canvas.save();
        canvas.translate(10.0, 10.0);
        canvas.set_global_alpha(0.5);
        canvas.fill_circle(Vec2::ZERO, 3.0, Rgba::WHITE, None);
        canvas.restore();
        assert_eq!(canvas.depth(), 0);
        assert_eq!(canvas.pixel(10, 10)[3], 128);
        assert_eq!(canvas.pixel(1, 1)[3], 0);

        canvas.fill_path(&square(0.0, 0.0, 2.0, 2.0), Rgba::WHITE, None);
        assert_eq!(canvas.pixel(1, 1)[3], 255);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut canvas = Canvas::new(4, 4);
        canvas.restore();
        canvas.fill_path(&square(0.0, 0.0, 4.0, 4.0), Rgba::WHITE, None);
        assert_eq!(canvas.pixel(3, 3)[3], 255);
    }

    #[test]
    fn device_scale_enlarges_raster() {
        let mut canvas = Canvas::for_viewport(Viewport::new(10.0, 10.0), 2.0);
        assert_eq!((canvas.width(), canvas.height()), (20, 20));
        canvas.fill_path(&square(0.0, 0.0, 5.0, 5.0), Rgba::WHITE, None);
        assert_eq!(canvas.pixel(9, 9)[3], 255);
        assert_eq!(canvas.pixel(10, 10)[3], 0);

        canvas.clear_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(canvas.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn stroke_covers_its_width() {
        let mut canvas = Canvas::new(10, 10);
        canvas.stroke_path(
            &Path::line(Vec2::new(1.0, 5.0), Vec2::new(9.0, 5.0)),
            Rgba::WHITE,
            2.0,
        );
        assert_eq!(canvas.pixel(5, 4)[3], 255);
        assert_eq!(canvas.pixel(5, 5)[3], 255);
        assert_eq!(canvas.pixel(5, 6)[3], 0);
        assert_eq!(canvas.pixel(5, 3)[3], 0);
    }

    #[test]
    fn glow_spreads_beyond_the_fill() {
        let mut canvas = Canvas::new(32, 32);
        canvas.fill_circle(
            Vec2::new(16.0, 16.0),
            4.0,
            Rgba::WHITE,
            Some(Glow::new(6.0, Rgba::WHITE)),
        );
        let halo = canvas.pixel(22, 16)[3];
        assert!(halo > 0 && halo < 255, "{halo}");
        assert_eq!(canvas.pixel(16, 16)[3], 255);
        assert_eq!(canvas.pixel(0, 0)[3], 0);
    }

    #[test]
    fn flatten_over_background() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_path(&square(0.0, 0.0, 2.0, 4.0), Rgba::WHITE, None);
        let flat = canvas.flatten_over(Rgba::from_hex(0x0b1026));
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(flat.get_pixel(3, 0).0, [0x0b, 0x10, 0x26, 255]);
    }

    #[test]
    fn saves_png() {
        let mut canvas = Canvas::new(8, 6);
        canvas.fill_circle(Vec2::new(4.0, 3.0), 2.0, Rgba::WHITE, None);
        let path = std::env::temp_dir().join("sakura_canvas_test.png");
        canvas
            .save_png(&path, Some(Rgba::BLACK))
            .expect("png should save");
        let back = image::open(&path).expect("png should load").to_rgba8();
        assert_eq!(back.dimensions(), (8, 6));
        assert_eq!(back.get_pixel(0, 0).0, [0, 0, 0, 255]);
        let _ = std::fs::remove_file(&path);
    }
}
