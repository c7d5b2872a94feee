//! Piecewise-linear height spline.
//!
//! The curve is resampled at a fixed step once at construction so that
//! evaluation on worker threads is a clamp plus one lerp, with no search
//! over control points.

const STEP: f32 = 0.1;

#[derive(Clone, Debug)]
pub struct HeightSpline {
    samples: Vec<f32>,
}

impl HeightSpline {
    /// Builds the spline from `(x, y)` control points. Points are sorted by
    /// `x`; at least two are required and the domain starts at the first
    /// point's `x` truncated to zero.
    pub fn from_points(points: &[(f32, f32)]) -> Self {
        assert!(points.len() >= 2, "spline needs at least two control points");
        let mut pts = points.to_vec();
        pts.sort_by(|a, b| a.0.total_cmp(&b.0));
        let last_x = pts[pts.len() - 1].0;
        let n = (last_x / STEP) as usize;
        let mut samples = Vec::with_capacity(n + 1);
        for t in 0..=n {
            samples.push(eval_points(&pts, t as f32 * STEP));
        }
        Self { samples }
    }

    /// Evaluates the curve at `x`, scaled by `scale`. Inputs outside the
    /// sampled domain clamp to the nearest end.
    pub fn evaluate(&self, x: f32, scale: f32) -> f32 {
        let last = (self.samples.len() - 1) as f32;
        let t = (x / STEP).clamp(0.0, last);
        let i0 = t as usize;
        let i1 = (i0 + 1).min(self.samples.len() - 1);
        let frac = t - i0 as f32;
        let y = self.samples[i0] + (self.samples[i1] - self.samples[i0]) * frac;
        y * scale
    }

    /// Central-difference slope over a window of one unit on each side.
    pub fn slope_at(&self, x: f32) -> f32 {
        let y1 = self.evaluate(x - 1.0, 1.0);
        let y2 = self.evaluate(x + 1.0, 1.0);
        (y2 - y1) / 2.0
    }
}

fn eval_points(pts: &[(f32, f32)], x: f32) -> f32 {
    if x <= pts[0].0 {
        return pts[0].1;
    }
    for w in pts.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        if x <= x1 {
            if x1 - x0 <= f32::EPSILON {
                return y1;
            }
            let frac = (x - x0) / (x1 - x0);
            return y0 + (y1 - y0) * frac;
        }
    }
    pts[pts.len() - 1].1
}
