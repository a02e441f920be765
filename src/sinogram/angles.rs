use units::{Angle, radian};

/// `n` projection angles evenly spaced over the half turn `[0, π]`, both ends
/// included.
///
/// The angles are computed in double precision and then rounded to `f32`, so
/// the last one is exactly `π` as an `f32`.
pub fn linspace_angles(n: usize) -> Vec<Angle> {
    match n {
        0 => vec![],
        1 => vec![radian(0.0)],
        _ => {
            let step = std::f64::consts::PI / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { std::f64::consts::PI } else { i as f64 * step })
                .map(|a| radian(a as f32))
                .collect()
        }
    }
}
