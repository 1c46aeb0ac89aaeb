use crate::*;

/// An axis aligned bounding box, stored as its minimum and maximum corners.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Extents3 {
    pub min: Point3,
    pub max: Point3,
}

impl Extents3 {
    pub fn zero() -> Self {
        Self {
            min: Point3::zero(),
            max: Point3::zero(),
        }
    }

    pub fn from_min_max(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> Point3 {
        self.max.sub(self.min)
    }
}

/// The component-wise min and max over the points.
/// If the iterator is empty, a zero-sized extents about the origin is returned.
impl FromIterator<Point3> for Extents3 {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Point3>,
    {
        let mut iter = iter.into_iter();
        let Some(init) = iter.next() else {
            return Self::zero();
        };

        let (min, max) = iter.fold((init, init), |(min, max), p| {
            (min.min_all(p), max.max_all(p))
        });

        Self { min, max }
    }
}

pub trait Aabb {
    fn aabb(&self) -> Extents3;
}

// ###### DIAGNOSTICS #########################################################

/// Summary of the radius channel, over only the points which carry a radius.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
pub struct RadiusStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl RadiusStats {
    /// Returns `None` when no point carries a radius.
    pub fn new(points: &[CenterlinePoint]) -> Option<Self> {
        let (count, min, max, sum) = points.iter().filter_map(|p| p.radius).fold(
            (0usize, f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(n, min, max, sum), r| (n + 1, min.min(r), max.max(r), sum + r),
        );

        (count > 0).then(|| Self {
            count,
            min,
            max,
            mean: sum / count as f64,
        })
    }
}

/// The diagnostic companion to ingestion: point count, header flag, bounding box, end points
/// and radius statistics.
///
/// Works on any number of points (including zero), it does not need a valid [`Centerline`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BoundsReport {
    pub count: usize,
    pub had_header: bool,
    /// `None` if there are no points.
    pub extents: Option<Extents3>,
    pub start: Option<Point3>,
    pub end: Option<Point3>,
    /// `None` if no point carries a radius.
    pub radius: Option<RadiusStats>,
}

impl BoundsReport {
    pub fn new(points: &[CenterlinePoint], had_header: bool) -> Self {
        let extents = (!points.is_empty()).then(|| points.iter().map(|p| p.position).collect());

        Self {
            count: points.len(),
            had_header,
            extents,
            start: points.first().map(|p| p.position),
            end: points.last().map(|p| p.position),
            radius: RadiusStats::new(points),
        }
    }
}

impl fmt::Display for BoundsReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "num of centerline points: {}", self.count)?;
        if self.had_header {
            write!(f, "(header)")?;
        }
        writeln!(f)?;

        if let Some(e) = &self.extents {
            let [x0, y0, z0] = e.min;
            let [x1, y1, z1] = e.max;
            writeln!(f, "AABB: [{x0}, {y0}, {z0}] - [{x1}, {y1}, {z1}]")?;
        }
        if let Some([x, y, z]) = self.start {
            writeln!(f, "start point: ({x}, {y}, {z})")?;
        }
        if let Some([x, y, z]) = self.end {
            writeln!(f, "end point: ({x}, {y}, {z})")?;
        }
        if let Some(r) = &self.radius {
            writeln!(
                f,
                "radius stats (from {} points): min={}, max={}, mean={}",
                r.count, r.min, r.max, r.mean
            )?;
        }

        Ok(())
    }
}
