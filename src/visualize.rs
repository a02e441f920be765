//! Render reconstructions as false-colour PNG figures.
//!
//! A [`Figure`] is a vertical stack of panels. Each panel shows one image,
//! row 0 at the top, coloured with viridis over the panel's own value range,
//! with a colour bar (maximum at the top) to its right. Panel titles are kept
//! with the figure and reported in the log; no text is drawn.

use std::path::Path;

use ::image::{Rgb, RgbImage};
use itertools::{Itertools, MinMaxResult};
use tracing::info;

use crate::error::Result;
use crate::image::Image;

const MARGIN   : u32 = 8;
const BAR_GAP  : u32 = 8;
const BAR_WIDTH: u32 = 16;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Approximate viridis: piecewise-linear through anchor colours `(t, r, g, b)`
const VIRIDIS: [(f32, f32, f32, f32); 5] = [
    (0.00, 0.267, 0.004, 0.329),
    (0.25, 0.282, 0.141, 0.458),
    (0.50, 0.127, 0.567, 0.551),
    (0.75, 0.454, 0.820, 0.322),
    (1.00, 0.993, 0.906, 0.144),
];

/// Colour of `t` in `[0, 1]`; values outside are clamped, NaN maps to 0
pub fn viridis(t: f32) -> Rgb<u8> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let i = VIRIDIS.iter()
        .skip(1)
        .position(|&(t1, ..)| t <= t1)
        .unwrap_or(VIRIDIS.len() - 2);
    let (t0, r0, g0, b0) = VIRIDIS[i];
    let (t1, r1, g1, b1) = VIRIDIS[i + 1];
    let frac = (t - t0) / (t1 - t0);
    let channel = |lo: f32, hi: f32| ((lo + frac * (hi - lo)) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb([channel(r0, r1), channel(g0, g1), channel(b0, b1)])
}

/// Smallest and largest finite values in `values`
pub fn value_range<'a>(values: impl IntoIterator<Item = &'a f32>) -> (f32, f32) {
    match values.into_iter().copied().filter(|v| v.is_finite()).minmax() {
        MinMaxResult::NoElements       => (0.0, 0.0),
        MinMaxResult::OneElement(v)    => (v, v),
        MinMaxResult::MinMax(min, max) => (min, max),
    }
}

#[derive(Clone, Debug)]
pub struct Panel {
    pub title: String,
    pub image: Image,
}

impl Panel {
    fn size(&self, scale: u32) -> (u32, u32) {
        let [nx, ny] = self.image.geometry.n;
        let width  = MARGIN + nx as u32 * scale + BAR_GAP + BAR_WIDTH + MARGIN;
        let height = MARGIN + ny as u32 * scale + MARGIN;
        (width, height)
    }

    fn draw(&self, canvas: &mut RgbImage, top: u32, scale: u32) {
        let (lo, hi) = value_range(self.image.data.iter());
        let span = hi - lo;
        let normalize = |v: f32| if span > 0.0 { (v - lo) / span } else { 0.0 };

        for ((row, col), &v) in self.image.data.indexed_iter() {
            let colour = viridis(normalize(v));
            let x0 = MARGIN + col as u32 * scale;
            let y0 = top + MARGIN + row as u32 * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    canvas.put_pixel(x0 + dx, y0 + dy, colour);
                }
            }
        }

        // Colour bar spanning the height of the image, maximum at the top
        let [nx, ny] = self.image.geometry.n;
        let bar_x = MARGIN + nx as u32 * scale + BAR_GAP;
        let bar_height = ny as u32 * scale;
        for y in 0..bar_height {
            let t = if bar_height > 1 { 1.0 - y as f32 / (bar_height - 1) as f32 } else { 1.0 };
            let colour = viridis(t);
            for x in 0..BAR_WIDTH {
                canvas.put_pixel(bar_x + x, top + MARGIN + y, colour);
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Figure {
    pub panels: Vec<Panel>,
    /// Each voxel is drawn as a `scale` x `scale` block of pixels
    pub scale: u32,
}

impl Figure {

    pub fn new(scale: u32) -> Self { Self { panels: vec![], scale: scale.max(1) } }

    pub fn with_panel(mut self, title: impl Into<String>, image: Image) -> Self {
        self.panels.push(Panel { title: title.into(), image });
        self
    }

    /// The three-row comparison of two reconstructions and their difference
    pub fn fista_vs_cgls(fista: &Image, cgls: &Image, difference: &Image, scale: u32) -> Self {
        Self::new(scale)
            .with_panel("FISTA reconstruction"     , fista     .clone())
            .with_panel("CGLS reconstruction"      , cgls      .clone())
            .with_panel("Difference reconstruction", difference.clone())
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> { self.panels.iter().map(|p| p.title.as_str()) }

    /// Size of the rendered figure in pixels
    pub fn size(&self) -> (u32, u32) {
        self.panels.iter()
            .map(|p| p.size(self.scale))
            .fold((0, 0), |(w, h), (pw, ph)| (w.max(pw), h + ph))
    }

    pub fn render(&self) -> RgbImage {
        let (width, height) = self.size();
        let mut canvas = RgbImage::from_pixel(width.max(1), height.max(1), BACKGROUND);
        let mut top = 0;
        for panel in &self.panels {
            panel.draw(&mut canvas, top, self.scale);
            top += panel.size(self.scale).1;
        }
        canvas
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.render().save(path)?;
        for (row, panel) in self.panels.iter().enumerate() {
            let (lo, hi) = value_range(panel.image.data.iter());
            info!(row = row + 1, title = %panel.title, min = lo, max = hi, "figure panel");
        }
        info!(path = %path.display(), "figure written");
        Ok(())
    }

}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;
    use units::mm;
    use crate::image::ImageGeometry;

    #[rstest(/**/ t  ,    expected    ,
             case(0.0, [ 68,   1,  84]),
             case(1.0, [253, 231,  37]),
             case(0.5, [ 32, 145, 141]),
             case(-3., [ 68,   1,  84]),
             case(7.0, [253, 231,  37]),
    )]
    fn viridis_anchors(t: f32, expected: [u8; 3]) {
        assert_eq!(viridis(t), Rgb(expected));
    }

    #[test]
    fn viridis_of_nan_is_bottom_colour() {
        assert_eq!(viridis(f32::NAN), viridis(0.0));
    }

    #[test]
    fn range_ignores_non_finite_values() {
        assert_eq!(value_range(&[3.0, f32::NAN, -1.0, f32::INFINITY, 2.0]), (-1.0, 3.0));
        assert_eq!(value_range(&[5.0]), (5.0, 5.0));
        assert_eq!(value_range(&[]), (0.0, 0.0));
    }

    fn ramp(nx: usize, ny: usize) -> Image {
        let geometry = ImageGeometry::new((nx, ny), (mm(1.0), mm(1.0))).unwrap();
        Image::from_vec(geometry, (0..nx * ny).map(|i| i as f32).collect()).unwrap()
    }

    #[test]
    fn three_panels_stack_vertically() {
        let image = ramp(5, 4);
        let figure = Figure::fista_vs_cgls(&image, &image, &image, 3);
        let titles: Vec<_> = figure.titles().collect();
        assert_eq!(titles, vec!["FISTA reconstruction", "CGLS reconstruction", "Difference reconstruction"]);
        let panel_width  = MARGIN + 15 + BAR_GAP + BAR_WIDTH + MARGIN;
        let panel_height = MARGIN + 12 + MARGIN;
        assert_eq!(figure.size(), (panel_width, 3 * panel_height));
        let canvas = figure.render();
        assert_eq!(canvas.dimensions(), figure.size());
    }

    #[test]
    fn each_panel_spans_its_own_range() {
        // Row 0 of the array holds the smallest values and is drawn at the top
        let image = ramp(5, 4);
        let canvas = Figure::new(1).with_panel("ramp", image).render();
        assert_eq!(*canvas.get_pixel(MARGIN,     MARGIN    ), viridis(0.0));
        assert_eq!(*canvas.get_pixel(MARGIN + 4, MARGIN + 3), viridis(1.0));
        // Colour bar: maximum at the top
        let bar_x = MARGIN + 5 + BAR_GAP;
        assert_eq!(*canvas.get_pixel(bar_x, MARGIN    ), viridis(1.0));
        assert_eq!(*canvas.get_pixel(bar_x, MARGIN + 3), viridis(0.0));
        assert_eq!(*canvas.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn constant_image_is_drawn_in_bottom_colour() {
        let geometry = ImageGeometry::square(3, mm(1.0)).unwrap();
        let canvas = Figure::new(2).with_panel("flat", Image::filled(geometry, 4.0)).render();
        assert_eq!(*canvas.get_pixel(MARGIN + 5, MARGIN + 5), viridis(0.0));
    }

    #[test]
    fn figure_is_written_as_png() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("figure.png");
        Figure::new(2).with_panel("ramp", ramp(6, 6)).save(&path)?;
        let bytes = std::fs::read(&path)?;
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        Ok(())
    }
}
