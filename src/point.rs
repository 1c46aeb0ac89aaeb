use std::ops;

/// 3D Point (X,Y,Z).
pub type Point3 = [f64; 3];

/// Segments shorter than this are treated as having no direction.
pub const DEGENERATE_LEN: f64 = 1e-12;

pub trait Point: Copy + Sized + IntoIterator<Item = f64> {
    /// Set all the values to this value.
    fn all(v: f64) -> Self;

    /// Set all values to zero.
    fn zero() -> Self {
        Self::all(0.)
    }

    /// Scale point by multiplying all dimensions by `scalar`.
    fn scale(self, scalar: f64) -> Self;

    /// Calculate the magnitude of the vector.
    fn mag(self) -> f64 {
        self.into_iter()
            .zip(self)
            .map(|(a, b)| a * b)
            .sum::<f64>()
            .sqrt()
    }

    /// Normalise the vector by the magnitude.
    ///
    /// A zero length vector will produce NaNs, use [`Point::try_unit`] if that can occur.
    fn unit(self) -> Self {
        self.scale(self.mag().recip())
    }

    /// Normalise the vector, returning `None` if the magnitude is below [`DEGENERATE_LEN`] (or
    /// not finite).
    fn try_unit(self) -> Option<Self> {
        let m = self.mag();
        (m.is_finite() && m > DEGENERATE_LEN).then(|| self.scale(m.recip()))
    }

    /// Return the minimum of each dimension.
    fn min_all(self, b: Self) -> Self {
        xfm(self, b, f64::min)
    }

    /// Return the maximum of each dimension.
    fn max_all(self, b: Self) -> Self {
        xfm(self, b, f64::max)
    }

    /// Perform a transformation on each pair of dimensions.
    fn xfm<F: Fn(f64, f64) -> f64>(self, b: Self, f: F) -> Self;
}

pub trait Add<Rhs = Self> {
    fn add(self, rhs: Rhs) -> Self;
    fn sub(self, rhs: Rhs) -> Self
    where
        Self: Sized + Copy,
        Rhs: Point,
    {
        self.add(rhs.scale(-1.0))
    }
}

impl Add for Point3 {
    fn add(self, rhs: Self) -> Self {
        Self::xfm(self, rhs, ops::Add::add)
    }

    fn sub(self, rhs: Self) -> Self {
        Self::xfm(self, rhs, ops::Sub::sub)
    }
}

impl Point for Point3 {
    fn all(v: f64) -> Self {
        [v; 3]
    }
    fn scale(self, scalar: f64) -> Self {
        self.map(|f| f * scalar)
    }
    fn xfm<F: Fn(f64, f64) -> f64>(self, b: Self, f: F) -> Self {
        let [ax, ay, az] = self;
        let [bx, by, bz] = b;
        [f(ax, bx), f(ay, by), f(az, bz)]
    }
}

pub fn dot_prod(a: Point3, b: Point3) -> f64 {
    a.into_iter().zip(b).map(|(a, b)| a * b).sum()
}

#[allow(clippy::many_single_char_names)]
pub fn xprod(a: Point3, b: Point3) -> Point3 {
    let [ax, ay, az] = a;
    let [bx, by, bz] = b;
    let x = ay * bz - az * by;
    let y = az * bx - ax * bz;
    let z = ax * by - ay * bx;
    [x, y, z]
}

/// Euclidean distance between two points.
pub fn dist(a: Point3, b: Point3) -> f64 {
    a.sub(b).mag()
}

/// Rotate `v` by `angle` (radians) about the **unit** vector `axis`.
///
/// Uses Rodrigues' rotation formula:
/// `v cosθ + (k × v) sinθ + k (k · v)(1 - cosθ)`.
pub fn rotate_about(v: Point3, axis: Point3, angle: f64) -> Point3 {
    let (sin, cos) = angle.sin_cos();
    v.scale(cos)
        .add(xprod(axis, v).scale(sin))
        .add(axis.scale(dot_prod(axis, v) * (1.0 - cos)))
}

/// Apply an ordering to points by testing each x,y,z.
pub fn ordpt(a: Point3, b: Point3) -> std::cmp::Ordering {
    use std::cmp::Ordering::Equal;

    a.into_iter().zip(b).fold(
        Equal,
        |o, (a, b)| {
            if o == Equal {
                a.total_cmp(&b)
            } else {
                o
            }
        },
    )
}

/// Helper function which effectively transforms to [`Point::xfm`].
#[inline(always)]
pub fn xfm<P: Point, F: Fn(f64, f64) -> f64>(a: P, b: P, f: F) -> P {
    P::xfm(a, b, f)
}
