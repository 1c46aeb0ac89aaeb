use crate::*;

/// Triangle represented by 3 points (A, B, C).
pub type Tri = [Point3; 3];

/// An indexed triangle mesh, the output of sweeping a tube.
///
/// `PartialEq` is _derived_ but does _exact_ equality including structural equality. This is
/// **not** the same as value equality (it is a _subset_ of it) so `PartialEq` should not be used
/// for value equality.
#[derive(Debug, PartialEq, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TubeMesh {
    /// Vertex positions, for a swept tube these are ring-major.
    pub(crate) vertices: Vec<Point3>,
    /// Each _triangle_ is a triplet of indices back into `vertices`.
    pub(crate) triangles: Vec<(u32, u32, u32)>,
}

impl TubeMesh {
    /// Build a mesh from raw buffers, checking every triangle index references a vertex.
    pub fn from_raw(
        vertices: Vec<Point3>,
        triangles: Vec<(u32, u32, u32)>,
    ) -> std::result::Result<Self, &'static str> {
        let len = vertices.len();
        let valid = |i: u32| (i as usize) < len;
        if triangles
            .iter()
            .all(|&(a, b, c)| valid(a) && valid(b) && valid(c))
        {
            Ok(Self {
                vertices,
                triangles,
            })
        } else {
            Err("triangle index references a vertex outside the mesh")
        }
    }

    pub fn vertex_len(&self) -> usize {
        self.vertices.len()
    }

    pub fn tri_len(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    pub fn tri_indices(&self) -> &[(u32, u32, u32)] {
        &self.triangles
    }

    pub fn tris(&self) -> impl ExactSizeIterator<Item = Tri> + '_ {
        self.triangles.iter().map(move |&(a, b, c)| {
            [
                self.vertices[a as usize],
                self.vertices[b as usize],
                self.vertices[c as usize],
            ]
        })
    }

    /// Unit facet normals in triangle order, following the winding of each triangle.
    pub fn facet_normals(&self) -> impl ExactSizeIterator<Item = Point3> + '_ {
        self.tris().map(facet_normal)
    }

    /// Returns the boundary loops of the mesh (edges used by only one triangle, joined up).
    ///
    /// A closed mesh returns an empty vector; an open tube returns its two end rings.
    pub fn outlines(&self) -> Vec<Vec<Point3>> {
        let free_edges = outline::free_edges(self);

        let outlines = outline::get_outlines(free_edges.into_iter().collect());

        outlines
            .into_iter()
            .map(|o| {
                let take = if o.front() == o.back() {
                    o.len().saturating_sub(1)
                } else {
                    o.len()
                };

                o.into_iter()
                    .take(take)
                    .map(|idx| self.vertices[idx as usize])
                    .collect()
            })
            .collect()
    }
}

/// The unit normal of a triangle, `(b - a) × (c - a)`.
///
/// Degenerate triangles get a zero normal.
pub fn facet_normal([a, b, c]: Tri) -> Point3 {
    xprod(b.sub(a), c.sub(a))
        .try_unit()
        .unwrap_or_else(Point3::zero)
}

/// Builds a mesh from loose triangles, welding vertices which coincide (within `1e-7`).
impl FromIterator<Tri> for TubeMesh {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Tri>,
    {
        weld::weld(iter.into_iter())
    }
}

impl Area for TubeMesh {
    /// Surface area, the sum of the area of each triangle.
    fn area(&self) -> f64 {
        self.tris()
            .map(|[a, b, c]| xprod(b.sub(a), c.sub(a)).mag() * 0.5)
            .sum()
    }
}

impl Aabb for TubeMesh {
    fn aabb(&self) -> Extents3 {
        self.vertices().iter().copied().collect()
    }
}

/// Same point, with tolerance.
fn same_point(a: Point3, b: Point3) -> bool {
    const T: f64 = 1e-7;
    a.xfm(b, |a, b| (a - b).abs()).into_iter().all(|f| f < T)
}

mod outline {
    use super::*;
    use std::{collections::VecDeque, hash::*};

    #[derive(PartialEq, Eq, Copy, Clone, Debug, PartialOrd, Ord)]
    pub struct Edge(pub u32, pub u32);

    impl Edge {
        #[inline(always)]
        fn ord(self) -> Self {
            if self.0 <= self.1 {
                self
            } else {
                Edge(self.1, self.0)
            }
        }

        #[inline(always)]
        fn as_u64(&self) -> u64 {
            ((self.0 as u64) << 32) | self.1 as u64
        }
    }

    impl Hash for Edge {
        #[inline(always)]
        fn hash<H: Hasher>(&self, hasher: &mut H) {
            hasher.write_u64(self.as_u64())
        }
    }

    /// Edges referenced by an odd number of triangles.
    pub fn free_edges(mesh: &TubeMesh) -> HashSet<Edge> {
        let mut set: HashSet<Edge> =
            HashSet::with_capacity_and_hasher(mesh.tri_len(), Default::default());
        let mut toggle = |e: Edge| {
            if !set.remove(&e) {
                set.insert(e);
            }
        };

        for &(a, b, c) in mesh.tri_indices() {
            toggle(Edge(a, b).ord());
            toggle(Edge(a, c).ord());
            toggle(Edge(b, c).ord());
        }

        set
    }

    fn join_edges(edges: &mut Vec<Edge>) -> VecDeque<u32> {
        // worst case is O(n²)
        let mut v = VecDeque::with_capacity(edges.len());
        match edges.pop() {
            Some(Edge(a, b)) => {
                v.push_back(a);
                v.push_back(b);
            }
            None => return v,
        }

        // find (and remove) the edge touching `pos`, returning its other end
        let mut next = |pos: u32| {
            let i = edges.iter().rposition(|&Edge(a, b)| a == pos || b == pos)?;
            let Edge(a, b) = edges.swap_remove(i);
            Some(if a == pos { b } else { a })
        };

        let (mut has_front, mut has_back) = (true, true);

        while has_front || has_back {
            if has_front {
                match v.front().copied().and_then(&mut next) {
                    Some(x) => v.push_front(x),
                    None => has_front = false,
                }
            }

            if has_back {
                match v.back().copied().and_then(&mut next) {
                    Some(x) => v.push_back(x),
                    None => has_back = false,
                }
            }
        }

        v
    }

    pub fn get_outlines(mut edges: Vec<Edge>) -> Vec<VecDeque<u32>> {
        // sort so the output is deterministic regardless of hash order
        edges.sort_unstable();

        let mut v = Vec::new();
        while !edges.is_empty() {
            v.push(join_edges(&mut edges));
        }

        v
    }
}

mod weld {
    use super::*;
    use std::cmp::Ordering;

    // point wrapper which handles the ordering + equality with tolerance
    struct Pt {
        p: Point3,
        i: u32,
    }
    impl PartialEq for Pt {
        fn eq(&self, rhs: &Self) -> bool {
            same_point(self.p, rhs.p)
        }
    }
    impl Eq for Pt {}
    impl PartialOrd for Pt {
        fn partial_cmp(&self, rhs: &Self) -> Option<Ordering> {
            Some(self.cmp(rhs))
        }
    }
    impl Ord for Pt {
        fn cmp(&self, rhs: &Self) -> Ordering {
            if self.eq(rhs) {
                // expensive to check first, but handles the case for equality with tolerance
                return Ordering::Equal;
            }

            ordpt(self.p, rhs.p)
        }
    }

    pub fn weld(tris: impl Iterator<Item = Tri>) -> TubeMesh {
        let mut ordset = std::collections::BTreeSet::<Pt>::new();
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();

        let mut get_or_add = |p: Point3| {
            let pt = Pt {
                p,
                i: vertices.len() as u32,
            };
            match ordset.get(&pt) {
                Some(x) => x.i,
                None => {
                    let i = pt.i;
                    vertices.push(pt.p);
                    ordset.insert(pt);
                    i
                }
            }
        };

        for [a, b, c] in tris {
            let t = (get_or_add(a), get_or_add(b), get_or_add(c));
            triangles.push(t);
        }

        TubeMesh {
            vertices,
            triangles,
        }
    }
}
