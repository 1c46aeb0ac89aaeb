//! Cross-section frames along a centerline.
//!
//! Frames are propagated with the minimal rotation between consecutive tangents (a
//! rotation-minimizing / parallel transport frame), so the cross-section does not twist about the
//! curve.
use crate::*;

/// Tangents closer to parallel than this (by the length of their cross product) are treated as
/// parallel, and the frame is carried forward without rotation.
const PARALLEL_TOL: f64 = 1e-9;

/// An orthonormal, right-handed basis attached to one centerline vertex.
///
/// `binormal = tangent × normal`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    pub tangent: Point3,
    pub normal: Point3,
    pub binormal: Point3,
}

impl Frame {
    /// Seed a frame from a (unit) tangent.
    ///
    /// The normal is the world axis least aligned with the tangent, projected off the tangent.
    pub fn from_tangent(tangent: Point3) -> Self {
        let tangent = tangent.try_unit().unwrap_or([0.0, 0.0, 1.0]);
        let normal = perpendicular(tangent);
        let binormal = xprod(tangent, normal);

        Self {
            tangent,
            normal,
            binormal,
        }
    }

    /// Move this frame onto the next (unit) tangent using the minimal rotation.
    pub fn transport(&self, tangent: Point3) -> Self {
        let axis = xprod(self.tangent, tangent);

        let normal = if axis.mag() > PARALLEL_TOL {
            let angle = dot_prod(self.tangent, tangent).clamp(-1.0, 1.0).acos();
            rotate_about(self.normal, axis.unit(), angle)
        } else {
            // (near) parallel, carry the normal over unchanged
            self.normal
        };

        // remove any drift off the new tangent so errors do not accumulate along the curve
        let normal = normal
            .sub(tangent.scale(dot_prod(normal, tangent)))
            .try_unit()
            .unwrap_or_else(|| perpendicular(tangent));
        let binormal = xprod(tangent, normal);

        Self {
            tangent,
            normal,
            binormal,
        }
    }

    /// The point on the unit circle in the cross-section plane at `angle` radians from the
    /// normal, sweeping toward the binormal.
    pub fn radial(&self, angle: f64) -> Point3 {
        let (sin, cos) = angle.sin_cos();
        self.normal.scale(cos).add(self.binormal.scale(sin))
    }
}

/// A unit vector perpendicular to the unit vector `v`.
fn perpendicular(v: Point3) -> Point3 {
    let [x, y, z] = v.map(f64::abs);

    let axis = if x <= y && x <= z {
        [1.0, 0.0, 0.0]
    } else if y <= z {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, 0.0, 1.0]
    };

    axis.sub(v.scale(dot_prod(axis, v)))
        .try_unit()
        // unreachable for a unit `v`, the least aligned axis is at most 1/√3 along it
        .unwrap_or([0.0, 1.0, 0.0])
}

/// Unit tangent at every vertex.
///
/// - The first vertex uses the outgoing segment, the last the incoming segment.
/// - Interior vertices use the bisector of the unit incoming and outgoing directions.
/// - Where a segment is degenerate (zero length) the neighbouring valid tangent is reused.
/// - A centerline with no valid segment at all is given `+Z`.
pub fn tangents(points: &[Point3]) -> Vec<Point3> {
    let n = points.len();
    let seg = |i: usize| points[i + 1].sub(points[i]).try_unit();

    let ts = (0..n)
        .map(|i| {
            let incoming = (i > 0).then(|| seg(i - 1)).flatten();
            let outgoing = (i + 1 < n).then(|| seg(i)).flatten();
            match (incoming, outgoing) {
                (Some(a), Some(b)) => a.add(b).try_unit().or(Some(b)),
                (a, b) => a.or(b),
            }
        })
        .collect::<Vec<_>>();

    // backfill leading gaps with the first valid tangent, then carry forward over later gaps
    let first = ts.iter().flatten().next().copied().unwrap_or([0.0, 0.0, 1.0]);
    let mut prev = first;
    ts.into_iter()
        .enumerate()
        .map(|(i, t)| match t {
            Some(t) => {
                prev = t;
                t
            }
            None => {
                log::debug!("degenerate tangent at vertex {}, reusing neighbour", i);
                prev
            }
        })
        .collect()
}

/// Compute a rotation-minimizing frame for every vertex.
///
/// Deterministic for a given set of points, and never produces NaNs for finite input.
pub fn sweep_frames(points: &[Point3]) -> Vec<Frame> {
    let ts = tangents(points);

    let mut frames = Vec::with_capacity(ts.len());
    let mut iter = ts.into_iter();

    let Some(t0) = iter.next() else {
        return frames;
    };
    let mut frame = Frame::from_tangent(t0);
    frames.push(frame);

    for t in iter {
        frame = frame.transport(t);
        frames.push(frame);
    }

    frames
}
