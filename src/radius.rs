use crate::*;
use std::f64::consts::PI;

/// Cross-section radius along a tube, used when the centerline carries no radius channel.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum RadiusProfile {
    /// The same radius at every vertex.
    Constant(f64),
    /// `radius(i) = start + (end - start) · sin(π · i / (n - 1))`.
    ///
    /// Note that this is a sine _envelope_: the radius begins at `start`, swells toward `end` at
    /// the middle of the tube and returns to `start` at the far end.
    Sine { start: f64, end: f64 },
}

impl Default for RadiusProfile {
    fn default() -> Self {
        RadiusProfile::Constant(0.8)
    }
}

impl RadiusProfile {
    /// The `(start, end)` pair this profile is defined by.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            RadiusProfile::Constant(r) => (r, r),
            RadiusProfile::Sine { start, end } => (start, end),
        }
    }

    /// Radii must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let (start, end) = self.bounds();
        for r in [start, end] {
            if !r.is_finite() || r < 0.0 {
                return Err(Error::InvalidRadius(r));
            }
        }
        Ok(())
    }

    /// The radius at vertex `i` of `n`.
    pub fn at(&self, i: usize, n: usize) -> f64 {
        let (r0, r1) = self.bounds();
        // a single vertex has no parametric extent, sit it at the start
        let t = if n > 1 {
            i as f64 / (n - 1) as f64
        } else {
            0.0
        };
        r0 + (r1 - r0) * (PI * t).sin()
    }

    /// Radii for `n` vertices.
    pub fn sample(&self, n: usize) -> Vec<f64> {
        (0..n).map(|i| self.at(i, n)).collect()
    }
}

/// Resolve the per-vertex radius for a centerline.
///
/// Supplied radii are used unmodified when _every_ point carries one, otherwise the `profile` is
/// sampled. A centerline with only _some_ radii present falls back to the profile.
pub fn resolve_radii(centerline: &Centerline, profile: &RadiusProfile) -> Vec<f64> {
    match centerline.radii() {
        Some(radii) => {
            log::debug!("using {} supplied radii", radii.len());
            radii
        }
        None => {
            if centerline.radius_channel() == RadiusChannel::Mixed {
                log::warn!(
                    "only some centerline points have a radius, using {:?} instead",
                    profile
                );
            }
            profile.sample(centerline.len())
        }
    }
}
