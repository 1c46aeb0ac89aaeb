use crate::*;

/// A single centerline vertex, with an optional radius channel.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CenterlinePoint {
    pub position: Point3,
    /// `None` when the source row carried no (valid) radius column.
    pub radius: Option<f64>,
}

impl CenterlinePoint {
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            radius: None,
        }
    }

    pub fn with_radius(position: Point3, radius: f64) -> Self {
        Self {
            position,
            radius: Some(radius),
        }
    }

    pub fn has_radius(&self) -> bool {
        self.radius.is_some()
    }
}

impl From<Point3> for CenterlinePoint {
    fn from(position: Point3) -> Self {
        Self::new(position)
    }
}

/// How the radius channel is populated across a centerline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RadiusChannel {
    /// Every point carries a radius.
    Full,
    /// Some points carry a radius, some do not.
    Mixed,
    /// No point carries a radius.
    Absent,
}

/// An ordered 3D polyline describing the medial path of a tube.
///
/// Always holds 2 or more points; insertion order is the physical curve order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Centerline(Vec<CenterlinePoint>);

impl Centerline {
    pub fn new<I, P>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<CenterlinePoint>,
    {
        let points = points.into_iter().map(Into::into).collect::<Vec<_>>();
        if points.len() < 2 {
            Err(Error::NotEnoughPoints {
                found: points.len(),
            })
        } else {
            Ok(Centerline(points))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A centerline is never empty, this exists to satisfy clippy.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pts(&self) -> &[CenterlinePoint] {
        &self.0
    }

    pub fn positions(&self) -> impl ExactSizeIterator<Item = Point3> + '_ {
        self.0.iter().map(|p| p.position)
    }

    pub fn radius_channel(&self) -> RadiusChannel {
        let n = self.0.iter().filter(|p| p.has_radius()).count();
        match n {
            0 => RadiusChannel::Absent,
            n if n == self.len() => RadiusChannel::Full,
            _ => RadiusChannel::Mixed,
        }
    }

    /// The supplied per-point radii, only if **every** point carries one.
    pub fn radii(&self) -> Option<Vec<f64>> {
        self.0.iter().map(|p| p.radius).collect()
    }
}

impl IntoIterator for Centerline {
    type Item = CenterlinePoint;
    type IntoIter = std::vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Aabb for Centerline {
    fn aabb(&self) -> Extents3 {
        self.positions().collect()
    }
}
