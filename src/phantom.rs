//! Synthetic test objects with known ground truth

use ndarray::s;

use units::Length;

use crate::error::Result;
use crate::image::{Image, ImageGeometry};

pub const OUTER_INTENSITY: f32 = 0.5;
pub const INNER_INTENSITY: f32 = 1.0;

/// Round `n * numerator / denominator` to the nearest integer, ties to even.
fn fraction_of(n: usize, numerator: usize, denominator: usize) -> usize {
    (n as f64 * numerator as f64 / denominator as f64).round_ties_even() as usize
}

/// Row and column ranges of the two rectangles for an `n` x `n` image:
/// `(outer, inner)`, each as `(rows, cols)`
pub fn rectangle_bounds(n: usize) -> ((std::ops::Range<usize>, std::ops::Range<usize>),
                                      (std::ops::Range<usize>, std::ops::Range<usize>)) {
    let f = |numerator| fraction_of(n, numerator, 8);
    let outer = (f(2)..f(6), f(2)..f(6));
    let inner = (f(1)..f(7), f(3)..f(5));
    (outer, inner)
}

/// A square of intensity 0.5 covering the central half of the image, with a
/// tall bar of intensity 1.0 painted over it.
///
/// Rows are the first array axis, so the bar is vertical when the image is
/// displayed with row 0 at the top.
pub fn two_rectangles(geometry: ImageGeometry) -> Image {
    let [nx, ny] = geometry.n;
    let mut image = Image::zeros(geometry);
    let rows = |a, b| fraction_of(ny, a, 8)..fraction_of(ny, b, 8);
    let cols = |a, b| fraction_of(nx, a, 8)..fraction_of(nx, b, 8);
    image.data.slice_mut(s![rows(2, 6), cols(2, 6)]).fill(OUTER_INTENSITY);
    image.data.slice_mut(s![rows(1, 7), cols(3, 5)]).fill(INNER_INTENSITY);
    image
}

/// The phantom on an `n` x `n` grid of square voxels
pub fn two_rectangles_square(n: usize, voxel_size: Length) -> Result<Image> {
    Ok(two_rectangles(ImageGeometry::square(n, voxel_size)?))
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;
    use units::mm;

    #[rstest(/**/ n ,   outer_rows,   inner_rows, inner_cols,
             case(75,     19..56    ,     9..66   ,   28..47  ),
             case( 8,      2..6     ,     1..7    ,    3..5   ),
             // 20/8 = 2.5 and 100/8 = 12.5 round to even
             case(20,      5..15    ,     2..18   ,    8..12  ),
             case( 4,      1..3     ,     0..4    ,    2..2   ),
    )]
    fn region_bounds(n: usize,
                     outer_rows: std::ops::Range<usize>,
                     inner_rows: std::ops::Range<usize>,
                     inner_cols: std::ops::Range<usize>) {
        let ((rows, cols), (irows, icols)) = rectangle_bounds(n);
        assert_eq!(rows, outer_rows);
        assert_eq!(cols, outer_rows);
        assert_eq!(irows, inner_rows);
        assert_eq!(icols, inner_cols);
    }

    #[rstest(n, case(75), case(8), case(20), case(33), case(1))]
    fn exactly_two_nested_regions(n: usize) {
        let image = two_rectangles_square(n, mm(1.0)).unwrap();
        let ((rows, cols), (irows, icols)) = rectangle_bounds(n);
        for ((r, c), &v) in image.data.indexed_iter() {
            let expected = if irows.contains(&r) && icols.contains(&c) { INNER_INTENSITY }
                      else if  rows.contains(&r) &&  cols.contains(&c) { OUTER_INTENSITY }
                      else                                             { 0.0 };
            assert_eq!(v, expected, "voxel row {r} col {c}");
        }
    }

    #[test]
    fn phantom_is_deterministic() {
        let a = two_rectangles_square(75, mm(1.0)).unwrap();
        let b = two_rectangles_square(75, mm(1.0)).unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn demo_phantom_totals() {
        // 37x37 outer square at 0.5, of which 37x19 overwritten, plus
        // 57x19 bar at 1.0
        let image = two_rectangles_square(75, mm(1.0)).unwrap();
        let outer_only = 37 * 37 - 37 * 19;
        let bar = 57 * 19;
        let ones  = image.data.iter().filter(|&&v| v == 1.0).count();
        let halfs = image.data.iter().filter(|&&v| v == 0.5).count();
        assert_eq!(ones, bar);
        assert_eq!(halfs, outer_only);
    }
}
