use crate::core::types::{Number, Point3};
use crate::shared::aabb::Aabb;
use crate::shared::ray::Ray;
use crate::shared::scratch::QueryScratch;
use getset::CopyGetters;
use tracing::debug;

use crate::core::targets::ACCEL;

/// A binary bounding-volume hierarchy over an indexed triangle set, built
/// with a linear surface-area-heuristic (SAH) sweep.
///
/// Nodes live in one flat array, the root at index 0. Rather than re-sorting
/// triangles at every level, the build presorts the triangle indices once per
/// axis (by bounding-box centre) and then *stably* re-partitions those three
/// orderings in place at each split, which keeps the whole build at
/// O(n log n) amortised.
#[derive(Clone, Debug, Default)]
pub struct BvTree {
    nodes: Vec<Node>,
}

/// One tree node.
///
/// `left`/`right` are child indices into the flat node array. A node is a
/// leaf iff `left <= 0 && right == -1`, in which case `-left` is the index of
/// its single triangle.
#[derive(CopyGetters, Copy, Clone, Debug)]
#[getset(get_copy = "pub")]
pub struct Node {
    left: i32,
    right: i32,
    aabb: Aabb,
}

impl Node {
    pub fn is_leaf(&self) -> bool { self.left <= 0 && self.right == -1 }

    /// The index of this leaf's triangle. Meaningless for inner nodes.
    pub fn triangle_index(&self) -> u32 { (-self.left) as u32 }

    fn leaf(triangle: u32, aabb: Aabb) -> Self {
        Self {
            left: -(triangle as i32),
            right: -1,
            aabb,
        }
    }

    fn inner(aabb: Aabb) -> Self { Self { left: 0, right: 0, aabb } }
}

impl BvTree {
    /// Builds the hierarchy from an indexed triangle set.
    ///
    /// `triangles` holds vertex-index triples into `positions`. An empty
    /// triangle set yields an empty tree that never returns candidates.
    pub fn build(positions: &[Point3], triangles: &[[u32; 3]]) -> Self {
        let n = triangles.len();
        if n == 0 {
            return Self::default();
        }

        let mut builder = Builder::prepare(positions, triangles);

        let root_aabb = builder
            .triangle_boxes
            .iter()
            .fold(Aabb::EMPTY, |acc, b| acc.merged(b));

        if n == 1 {
            // No split to make; the root is itself a leaf.
            return Self {
                nodes: vec![Node::leaf(0, root_aabb)],
            };
        }

        builder.nodes.push(Node::inner(root_aabb));
        builder.split(0, 0, n);

        debug!(target: ACCEL, triangles = n, nodes = builder.nodes.len(), "built BVH");
        Self { nodes: builder.nodes }
    }

    pub fn nodes(&self) -> &[Node] { &self.nodes }

    /// Collects into `scratch.candidates` the indices of all triangles whose
    /// leaf bounding box is hit by `ray` within `max_lambda`.
    ///
    /// Iterative depth-first traversal; subtrees whose box the ray misses are
    /// pruned whole. The result is a *superset* of the truly intersected
    /// triangles, so callers must still run the exact per-triangle test on
    /// every candidate. Both the traversal stack and the candidate list live
    /// in the caller-supplied per-worker scratch.
    pub fn intersect_bounding_boxes(&self, ray: &Ray, max_lambda: Number, scratch: &mut QueryScratch) {
        scratch.candidates.clear();
        scratch.stack.clear();

        if self.nodes.is_empty() {
            return;
        }
        scratch.stack.push(0);

        while let Some(index) = scratch.stack.pop() {
            let node = &self.nodes[index as usize];
            if !node.aabb.any_intersection(ray, max_lambda) {
                continue;
            }
            if node.is_leaf() {
                scratch.candidates.push(node.triangle_index());
            } else {
                scratch.stack.push(node.left);
                scratch.stack.push(node.right);
            }
        }
    }
}

/// Transient build state: per-triangle boxes, the three per-axis sorted index
/// permutations, and the marker/buffer/area arrays reused at every split.
struct Builder {
    triangle_boxes: Vec<Aabb>,
    /// `sorted[i][axis]` is the index of the i-th triangle in the ordering
    /// sorted by box centre along `axis`
    sorted: Vec<[u32; 3]>,
    buffer: Vec<[u32; 3]>,
    marker: Vec<bool>,
    areas_left: Vec<[Number; 3]>,
    areas_right: Vec<[Number; 3]>,
    nodes: Vec<Node>,
}

impl Builder {
    fn prepare(positions: &[Point3], triangles: &[[u32; 3]]) -> Self {
        let n = triangles.len();

        let triangle_boxes: Vec<Aabb> = triangles
            .iter()
            .map(|tri| {
                Aabb::from_points(tri.iter().map(|&i| positions[i as usize]))
            })
            .collect();

        // One full permutation per axis, sorted by box centre. The factor of
        // two in `min + max` doesn't affect the ordering.
        let mut sorted = vec![[0u32; 3]; n];
        let mut permutation: Vec<u32> = (0..n as u32).collect();
        for axis in 0..3 {
            permutation.sort_by(|&a, &b| {
                let centre = |t: u32| {
                    let b = &triangle_boxes[t as usize];
                    b.min().as_array()[axis] + b.max().as_array()[axis]
                };
                centre(a).total_cmp(&centre(b))
            });
            for (slot, &tri) in sorted.iter_mut().zip(&permutation) {
                slot[axis] = tri;
            }
        }

        Self {
            triangle_boxes,
            sorted,
            buffer: vec![[0u32; 3]; n],
            marker: vec![false; n],
            areas_left: vec![[0.; 3]; n],
            areas_right: vec![[0.; 3]; n],
            nodes: Vec::with_capacity(2 * n - 1),
        }
    }

    /// Splits the triangle range `offset..offset + len` (in sorted order)
    /// below the node at `node_index`, recursing until every side is a single
    /// triangle. Requires `len >= 2`.
    fn split(&mut self, node_index: usize, offset: usize, len: usize) {
        debug_assert!(len >= 2);

        let total_area = self.nodes[node_index].aabb.area();
        self.compute_swept_areas(offset, len);

        // Linear SAH: cost of splitting after position i is the children's
        // areas weighted by their triangle counts.
        let mut split_axis = 0;
        let mut split_index = 0;
        let mut min_cost = Number::MAX;
        for axis in 0..3 {
            for i in 0..len - 1 {
                let left_area = self.areas_left[offset + i][axis];
                let right_area = self.areas_right[offset + i][axis];
                let cost = (left_area * (i + 1) as Number
                    + right_area * (len - 1 - i) as Number)
                    / total_area;
                if cost < min_cost {
                    min_cost = cost;
                    split_axis = axis;
                    split_index = i;
                }
            }
        }

        // Mark the first split_index + 1 triangles (in split-axis order) as
        // belonging to the left side.
        for i in 0..len {
            let tri = self.sorted[offset + i][split_axis] as usize;
            self.marker[tri] = i <= split_index;
        }

        // Stably re-partition the other two axis orderings into left/right
        // halves using the marker, so that within each half they remain
        // sorted. The right half is written back to front and reversed on the
        // copy back.
        for axis in 0..3 {
            if axis == split_axis {
                continue;
            }
            let mut left_count = 0;
            let mut right_count = 0;
            for i in 0..len {
                let tri = self.sorted[offset + i][axis];
                if self.marker[tri as usize] {
                    self.buffer[offset + left_count][axis] = tri;
                    left_count += 1;
                } else {
                    right_count += 1;
                    self.buffer[offset + len - right_count][axis] = tri;
                }
            }
            debug_assert_eq!(left_count, split_index + 1);
            debug_assert_eq!(right_count, len - split_index - 1);
            for i in 0..left_count {
                self.sorted[offset + i][axis] = self.buffer[offset + i][axis];
            }
            for i in 0..right_count {
                self.sorted[offset + left_count + i][axis] = self.buffer[offset + len - 1 - i][axis];
            }
        }

        let side_aabb = |builder: &Self, range: std::ops::Range<usize>| {
            range.fold(Aabb::EMPTY, |acc, i| {
                let tri = builder.sorted[offset + i][split_axis] as usize;
                acc.merged(&builder.triangle_boxes[tri])
            })
        };

        let left_aabb = side_aabb(self, 0..split_index + 1);
        let right_aabb = side_aabb(self, split_index + 1..len);

        self.nodes.push(Node::inner(left_aabb));
        let left_child = self.nodes.len() - 1;
        self.nodes[node_index].left = left_child as i32;

        self.nodes.push(Node::inner(right_aabb));
        let right_child = self.nodes.len() - 1;
        self.nodes[node_index].right = right_child as i32;

        if split_index == 0 {
            // Left side is a single triangle; the child becomes a leaf.
            let tri = self.sorted[offset][split_axis];
            self.nodes[left_child] = Node::leaf(tri, left_aabb);
        } else {
            self.split(left_child, offset, split_index + 1);
        }

        if split_index == len - 2 {
            let tri = self.sorted[offset + len - 1][split_axis];
            self.nodes[right_child] = Node::leaf(tri, right_aabb);
        } else {
            self.split(right_child, offset + split_index + 1, len - 1 - split_index);
        }
    }

    /// Fills `areas_left[offset + i][axis]` with the surface area of the box
    /// over the first `i + 1` triangles in `axis`-sorted order, and
    /// `areas_right[offset + i][axis]` with the area over triangles
    /// `i + 1..len`; these are the cumulative sweeps the SAH cost reads.
    fn compute_swept_areas(&mut self, offset: usize, len: usize) {
        for axis in 0..3 {
            let mut left_box = Aabb::EMPTY;
            for i in 0..len {
                let tri = self.sorted[offset + i][axis] as usize;
                left_box.merge(&self.triangle_boxes[tri]);
                self.areas_left[offset + i][axis] = left_box.area();
            }

            let mut right_box = Aabb::EMPTY;
            for i in (1..len).rev() {
                let tri = self.sorted[offset + i][axis] as usize;
                right_box.merge(&self.triangle_boxes[tri]);
                self.areas_right[offset + i - 1][axis] = right_box.area();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vector3;
    use crate::shared::math::intersect_ray_triangle;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn quad_mesh() -> (Vec<Point3>, Vec<[u32; 3]>) {
        // Two triangles forming the unit square in the z = 0 plane
        let positions = vec![
            Point3::new(0., 0., 0.),
            Point3::new(1., 0., 0.),
            Point3::new(1., 1., 0.),
            Point3::new(0., 1., 0.),
        ];
        let triangles = vec![[0, 1, 2], [0, 2, 3]];
        (positions, triangles)
    }

    fn random_mesh(rng: &mut SmallRng, triangles: usize) -> (Vec<Point3>, Vec<[u32; 3]>) {
        let mut positions = Vec::new();
        let mut indices = Vec::new();
        for t in 0..triangles {
            let base = Point3::new(
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
            );
            for _ in 0..3 {
                positions.push(
                    base + Vector3::new(
                        rng.gen_range(-0.5..0.5),
                        rng.gen_range(-0.5..0.5),
                        rng.gen_range(-0.5..0.5),
                    ),
                );
            }
            let i = (3 * t) as u32;
            indices.push([i, i + 1, i + 2]);
        }
        (positions, indices)
    }

    #[test]
    fn single_triangle_root_is_leaf() {
        let positions = vec![
            Point3::new(0., 0., 0.),
            Point3::new(1., 0., 0.),
            Point3::new(0., 1., 0.),
        ];
        let tree = BvTree::build(&positions, &[[0, 1, 2]]);

        assert_eq!(tree.nodes().len(), 1);
        let root = &tree.nodes()[0];
        assert!(root.is_leaf());
        assert_eq!(root.triangle_index(), 0);
    }

    #[test]
    fn two_triangles_split_into_two_leaves() {
        let (positions, triangles) = quad_mesh();
        let tree = BvTree::build(&positions, &triangles);

        assert_eq!(tree.nodes().len(), 3);
        let root = &tree.nodes()[0];
        assert!(!root.is_leaf());

        let left = &tree.nodes()[root.left() as usize];
        let right = &tree.nodes()[root.right() as usize];
        assert!(left.is_leaf() && right.is_leaf());

        let mut leaves = [left.triangle_index(), right.triangle_index()];
        leaves.sort_unstable();
        assert_eq!(leaves, [0, 1]);
    }

    #[test]
    fn inner_boxes_are_union_of_children() {
        let mut rng = SmallRng::seed_from_u64(7);
        let (positions, triangles) = random_mesh(&mut rng, 100);
        let tree = BvTree::build(&positions, &triangles);

        for node in tree.nodes() {
            if node.is_leaf() {
                continue;
            }
            let left = &tree.nodes()[node.left() as usize];
            let right = &tree.nodes()[node.right() as usize];
            let union = left.aabb().merged(&right.aabb());
            assert_eq!(node.aabb(), union);
        }
    }

    #[test]
    fn every_leaf_holds_exactly_one_triangle() {
        let mut rng = SmallRng::seed_from_u64(99);
        let (positions, triangles) = random_mesh(&mut rng, 64);
        let tree = BvTree::build(&positions, &triangles);

        let mut seen = vec![0u32; triangles.len()];
        for node in tree.nodes() {
            if node.is_leaf() {
                seen[node.triangle_index() as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    /// The candidate set must never miss a triangle the ray exactly hits
    /// within the query range.
    #[test]
    fn candidates_are_a_superset_of_exact_hits() {
        let mut rng = SmallRng::seed_from_u64(0xbeef);
        let mut scratch = QueryScratch::new();

        for _ in 0..50 {
            let (positions, triangles) = random_mesh(&mut rng, 40);
            let tree = BvTree::build(&positions, &triangles);

            for _ in 0..100 {
                let ray = Ray::new(
                    Point3::new(
                        rng.gen_range(-5.0..5.0),
                        rng.gen_range(-5.0..5.0),
                        rng.gen_range(-5.0..5.0),
                    ),
                    Vector3::new(
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..1.0),
                    ),
                );
                let max_lambda = rng.gen_range(0.1..20.0);

                tree.intersect_bounding_boxes(&ray, max_lambda, &mut scratch);

                for (index, tri) in triangles.iter().enumerate() {
                    let exact = intersect_ray_triangle(
                        &ray,
                        positions[tri[0] as usize],
                        positions[tri[1] as usize],
                        positions[tri[2] as usize],
                    );
                    if matches!(exact, Some((_, lambda)) if lambda > 0. && lambda <= max_lambda) {
                        assert!(
                            scratch.candidates.contains(&(index as u32)),
                            "triangle {index} intersects but was not a candidate"
                        );
                    }
                }
            }
        }
    }
}
