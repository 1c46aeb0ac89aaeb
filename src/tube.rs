use crate::*;
use rayon::prelude::*;
use std::f64::consts::TAU;

/// Configuration for sweeping a tube.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TubeConfig {
    /// Number of sides of the tube cross-section.
    pub sides: usize,
    /// Radius to use when the centerline does not supply one for every point.
    pub radius: RadiusProfile,
}

impl Default for TubeConfig {
    fn default() -> Self {
        Self {
            sides: 8,
            radius: RadiusProfile::default(),
        }
    }
}

impl TubeConfig {
    pub fn with_sides(mut self, sides: usize) -> Self {
        self.sides = sides;
        self
    }

    pub fn with_radius(mut self, radius: RadiusProfile) -> Self {
        self.radius = radius;
        self
    }

    /// Reject configurations which cannot produce a tube, before any mesh work begins.
    pub fn validate(&self) -> Result<()> {
        if self.sides < 3 {
            return Err(Error::TooFewSides(self.sides));
        }
        self.radius.validate()
    }
}

/// Sweep a tube mesh along the centerline.
///
/// This runs the whole pipeline: config validation, radius resolution ([`resolve_radii`]),
/// frame propagation ([`sweep_frames`]) and ring stitching ([`build_mesh`]).
///
/// # Example
/// ```rust
/// # use tube::*;
/// let c = Centerline::new([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]).unwrap();
/// let mesh = build_tube(&c, &TubeConfig::default()).unwrap();
///
/// assert_eq!(mesh.vertex_len(), 3 * 8);
/// assert_eq!(mesh.tri_len(), 2 * 8 * 2);
/// ```
pub fn build_tube(centerline: &Centerline, config: &TubeConfig) -> Result<TubeMesh> {
    config.validate()?;

    let positions = centerline.positions().collect::<Vec<_>>();
    let radii = resolve_radii(centerline, &config.radius);
    let frames = sweep_frames(&positions);

    let mesh = build_mesh(&positions, &radii, &frames, config.sides)?;

    log::info!(
        "swept tube over {} centerline points: {} vertices, {} triangles",
        positions.len(),
        mesh.vertex_len(),
        mesh.tri_len()
    );

    Ok(mesh)
}

/// Emit a ring of `sides` vertices around each centerline vertex and stitch consecutive rings
/// into triangles.
///
/// Rings are ring-major: ring `i` occupies vertices `[i·S, (i+1)·S)`. Ring vertex `k` sits at
/// angle `2πk/S` from the frame normal, toward the binormal. Each quad between ring `i` and
/// `i+1` is split into `(i,k) (i,k') (i+1,k')` and `(i,k) (i+1,k') (i+1,k)`, which faces outward
/// for a right-handed frame. No end caps are emitted.
///
/// A non-finite radius (NaN or infinite) collapses its ring onto the centerline point.
pub fn build_mesh(
    positions: &[Point3],
    radii: &[f64],
    frames: &[Frame],
    sides: usize,
) -> Result<TubeMesh> {
    if sides < 3 {
        return Err(Error::TooFewSides(sides));
    }
    let n = positions.len();
    if n < 2 {
        return Err(Error::NotEnoughPoints { found: n });
    }
    if radii.len() != n {
        return Err(Error::LengthMismatch {
            what: "radii",
            expected: n,
            found: radii.len(),
        });
    }
    if frames.len() != n {
        return Err(Error::LengthMismatch {
            what: "frames",
            expected: n,
            found: frames.len(),
        });
    }
    match n.checked_mul(sides) {
        Some(len) if u32::try_from(len).is_ok() => (),
        len => return Err(Error::MeshTooLarge(len.unwrap_or(usize::MAX))),
    }

    let vertices = positions
        .par_iter()
        .zip(radii)
        .zip(frames)
        .flat_map_iter(|((&p, &r), f)| ring(p, r, f, sides))
        .collect::<Vec<_>>();

    let s = sides as u32;
    let triangles = (0..n as u32 - 1)
        .flat_map(|i| (0..s).map(move |k| (i, k)))
        .flat_map(|(i, k)| {
            let k_ = (k + 1) % s;
            let a = i * s + k;
            let b = i * s + k_;
            let c = (i + 1) * s + k_;
            let d = (i + 1) * s + k;
            [(a, b, c), (a, c, d)]
        })
        .collect::<Vec<_>>();

    // stitching only references vertices within the rings
    Ok(TubeMesh {
        vertices,
        triangles,
    })
}

fn ring(
    centre: Point3,
    radius: f64,
    frame: &Frame,
    sides: usize,
) -> impl Iterator<Item = Point3> + '_ {
    let radius = if !radius.is_finite() {
        log::debug!("{} radius at {:?}, collapsing ring", radius, centre);
        0.0
    } else {
        radius
    };

    (0..sides).map(move |k| {
        let theta = TAU * k as f64 / sides as f64;
        centre.add(frame.radial(theta).scale(radius))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;

    fn line(n: usize) -> Centerline {
        Centerline::new((0..n).map(|x| [x as f64, 0.0, 0.0])).unwrap()
    }

    fn to_points(ps: Vec<(i8, i8, i8)>) -> Vec<Point3> {
        ps.into_iter()
            .map(|(x, y, z)| [x as f64, y as f64, z as f64])
            .collect()
    }

    #[test]
    fn three_point_line_constant_radius() {
        let c = line(3);
        let cfg = TubeConfig::default()
            .with_sides(8)
            .with_radius(RadiusProfile::Constant(0.8));
        let mesh = build_tube(&c, &cfg).unwrap();

        assert_eq!(mesh.vertex_len(), 24);
        assert_eq!(mesh.tri_len(), 32);

        for (i, ring) in mesh.vertices().chunks(8).enumerate() {
            let centre = c.pts()[i].position;
            for &v in ring {
                assert!((dist(v, centre) - 0.8).abs() < 1e-12);
            }
        }
    }

    #[quickcheck]
    fn mesh_closure_counts(ps: Vec<(i8, i8, i8)>, sides: u8) -> TestResult {
        let sides = sides as usize;
        if ps.len() < 2 || sides < 3 {
            return TestResult::discard();
        }
        let n = ps.len();
        let c = Centerline::new(to_points(ps)).unwrap();
        let mesh = build_tube(&c, &TubeConfig::default().with_sides(sides)).unwrap();

        let len = (n * sides) as u32;
        TestResult::from_bool(
            mesh.vertex_len() == n * sides
                && mesh.tri_len() == 2 * sides * (n - 1)
                && mesh
                    .tri_indices()
                    .iter()
                    .all(|&(a, b, c)| a < len && b < len && c < len),
        )
    }

    #[quickcheck]
    fn rings_reproduce_radius(ps: Vec<(i8, i8, i8)>, r: u8) -> TestResult {
        if ps.len() < 2 {
            return TestResult::discard();
        }
        let r = r as f64 / 16.0;
        let c = Centerline::new(to_points(ps)).unwrap();
        let cfg = TubeConfig::default()
            .with_sides(6)
            .with_radius(RadiusProfile::Constant(r));
        let mesh = build_tube(&c, &cfg).unwrap();

        let ok = mesh
            .vertices()
            .chunks(6)
            .zip(c.positions())
            .all(|(ring, centre)| ring.iter().all(|&v| (dist(v, centre) - r).abs() < 1e-9));

        TestResult::from_bool(ok && mesh.vertices().iter().flatten().all(|x| x.is_finite()))
    }

    #[test]
    fn triangles_face_outward() {
        let mesh = build_tube(&line(4), &TubeConfig::default().with_sides(12)).unwrap();

        for (tri, n) in mesh.tris().zip(mesh.facet_normals()) {
            let [_, cy, cz] = tri[0].add(tri[1]).add(tri[2]).scale(1.0 / 3.0);
            // the tube runs along x, so the outward direction is the yz offset
            let outward = [0.0, cy, cz];
            assert!(dot_prod(n, outward) > 0.0);
        }
    }

    #[test]
    fn stitching_order() {
        let mesh = build_tube(&line(2), &TubeConfig::default().with_sides(3)).unwrap();
        assert_eq!(
            mesh.tri_indices(),
            &[
                (0, 1, 4),
                (0, 4, 3),
                (1, 2, 5),
                (1, 5, 4),
                (2, 0, 3),
                (2, 3, 5),
            ]
        );
    }

    #[test]
    fn tube_is_open_at_both_ends() {
        let mesh = build_tube(&line(5), &TubeConfig::default().with_sides(8)).unwrap();
        let outlines = mesh.outlines();

        assert_eq!(outlines.len(), 2);
        for o in &outlines {
            assert_eq!(o.len(), 8);
            // each outline is one end ring, so all share an x
            assert!(o.iter().all(|p| (p[0] - o[0][0]).abs() < 1e-12));
        }
    }

    #[test]
    fn straight_tube_area() {
        // a regular polygon prism, perimeter 2·S·r·sin(π/S) times length
        let r = 0.8;
        let s = 8;
        let mesh = build_tube(
            &line(5),
            &TubeConfig::default()
                .with_sides(s)
                .with_radius(RadiusProfile::Constant(r)),
        )
        .unwrap();

        let exp = 2.0 * s as f64 * r * (std::f64::consts::PI / s as f64).sin() * 4.0;
        assert!((mesh.area() - exp).abs() < 1e-9);
    }

    #[test]
    fn supplied_radii_are_used() {
        let c = Centerline::new([
            CenterlinePoint::with_radius([0.0, 0.0, 0.0], 0.1),
            CenterlinePoint::with_radius([1.0, 0.0, 0.0], 0.5),
        ])
        .unwrap();
        let mesh = build_tube(&c, &TubeConfig::default().with_sides(4)).unwrap();

        let v = mesh.vertices();
        assert!(v[..4].iter().all(|&p| (dist(p, [0.0, 0.0, 0.0]) - 0.1).abs() < 1e-12));
        assert!(v[4..].iter().all(|&p| (dist(p, [1.0, 0.0, 0.0]) - 0.5).abs() < 1e-12));
    }

    #[test]
    fn degenerate_radii_collapse_rings() {
        let c = Centerline::new([
            CenterlinePoint::with_radius([0.0, 0.0, 0.0], 0.0),
            CenterlinePoint::with_radius([1.0, 0.0, 0.0], f64::NAN),
            CenterlinePoint::with_radius([2.0, 0.0, 0.0], 1.0),
        ])
        .unwrap();
        let mesh = build_tube(&c, &TubeConfig::default().with_sides(5)).unwrap();

        let v = mesh.vertices();
        assert!(v[..5].iter().all(|&p| p == [0.0, 0.0, 0.0]));
        assert!(v[5..10].iter().all(|&p| p == [1.0, 0.0, 0.0]));
        assert!(v.iter().flatten().all(|x| x.is_finite()));
    }

    #[test]
    fn coincident_points_still_mesh() {
        let c = Centerline::new([[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        let mesh = build_tube(&c, &TubeConfig::default()).unwrap();
        assert!(mesh.vertices().iter().flatten().all(|x| x.is_finite()));
    }

    #[test]
    fn configuration_errors() {
        let c = line(3);

        let e = build_tube(&c, &TubeConfig::default().with_sides(2)).unwrap_err();
        assert!(matches!(e, Error::TooFewSides(2)));

        let e = build_tube(
            &c,
            &TubeConfig::default().with_radius(RadiusProfile::Sine {
                start: -0.5,
                end: 1.0,
            }),
        )
        .unwrap_err();
        assert!(matches!(e, Error::InvalidRadius(_)));
    }

    #[test]
    fn builder_revalidates_inputs() {
        let ps = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let frames = sweep_frames(&ps);

        assert!(matches!(
            build_mesh(&ps[..1], &[1.0], &frames[..1], 4),
            Err(Error::NotEnoughPoints { found: 1 })
        ));
        assert!(matches!(
            build_mesh(&ps, &[1.0], &frames, 4),
            Err(Error::LengthMismatch { what: "radii", .. })
        ));
        assert!(matches!(
            build_mesh(&ps, &[1.0, 1.0], &frames[..1], 4),
            Err(Error::LengthMismatch { what: "frames", .. })
        ));
        assert!(matches!(
            build_mesh(&ps, &[1.0, 1.0], &frames, 0),
            Err(Error::TooFewSides(0))
        ));
    }

    #[test]
    fn infinite_radii_collapse_rings() {
        let c = Centerline::new([
            CenterlinePoint::with_radius([0.0, 0.0, 0.0], f64::INFINITY),
            CenterlinePoint::with_radius([1.0, 0.0, 0.0], f64::NEG_INFINITY),
            CenterlinePoint::with_radius([2.0, 0.0, 0.0], 0.5),
        ])
        .unwrap();
        let mesh = build_tube(&c, &TubeConfig::default().with_sides(6)).unwrap();

        let v = mesh.vertices();
        assert!(v[..6].iter().all(|&p| p == [0.0, 0.0, 0.0]));
        assert!(v[6..12].iter().all(|&p| p == [1.0, 0.0, 0.0]));
        assert!(v.iter().flatten().all(|x| x.is_finite()));
    }

    #[test]
    fn oversized_meshes_are_rejected() {
        let e = build_tube(&line(2), &TubeConfig::default().with_sides(usize::MAX)).unwrap_err();
        assert!(matches!(e, Error::MeshTooLarge(usize::MAX)));

        let big = usize::MAX / 2 + 1;
        let e = build_tube(&line(2), &TubeConfig::default().with_sides(big)).unwrap_err();
        assert!(matches!(e, Error::MeshTooLarge(_)));

        let e = build_tube(&line(2), &TubeConfig::default().with_sides(1 << 31)).unwrap_err();
        assert!(matches!(e, Error::MeshTooLarge(len) if len == 1 << 32));
    }

    #[test]
    fn config_defaults() {
        let cfg = TubeConfig::default();
        assert_eq!(cfg.sides, 8);
        assert_eq!(cfg.radius, RadiusProfile::Constant(0.8));
    }

    #[test]
    fn config_serde_fills_defaults() {
        let cfg: TubeConfig = serde_json::from_str(r#"{"sides":12}"#).unwrap();
        assert_eq!(cfg, TubeConfig::default().with_sides(12));

        let cfg: TubeConfig = serde_json::from_str(r#"{"radius":{"Constant":1.5}}"#).unwrap();
        assert_eq!(cfg.sides, 8);
        assert_eq!(cfg.radius, RadiusProfile::Constant(1.5));

        let cfg: TubeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, TubeConfig::default());
    }

    #[test]
    fn config_serde_sine_profile() {
        let cfg = TubeConfig::default().with_radius(RadiusProfile::Sine {
            start: 0.25,
            end: 1.5,
        });
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(
            json,
            r#"{"sides":8,"radius":{"Sine":{"start":0.25,"end":1.5}}}"#
        );
        assert_eq!(serde_json::from_str::<TubeConfig>(&json).unwrap(), cfg);
    }
}
