//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree over indices into a flat triangle list. The tree never owns
//! triangles, so one list can be shared by the tree and by shading code.

use lux_math::{Aabb, Intersection, Interval, Ray};

use crate::triangle::Triangle;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
#[derive(Debug)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of triangle indices.
    Leaf { primitives: Vec<u32>, bbox: Aabb },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Build a BVH over every triangle in `triangles`.
    pub fn new(triangles: &[Triangle]) -> Self {
        if triangles.is_empty() {
            return BvhNode::Empty;
        }
        let primitives = (0..triangles.len() as u32).collect();
        Self::build(triangles, primitives)
    }

    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort primitives by centroid on the
    /// longest centroid axis, split in half, recurse.
    fn build(triangles: &[Triangle], mut primitives: Vec<u32>) -> Self {
        let n = primitives.len();

        let bounds = primitives.iter().fold(Aabb::EMPTY, |acc, &i| {
            Aabb::surrounding(&acc, &triangles[i as usize].bounding_box())
        });

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                primitives,
                bbox: bounds,
            };
        }

        let centroid_bounds = primitives.iter().fold(Aabb::EMPTY, |acc, &i| {
            let c = triangles[i as usize].centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        primitives.sort_unstable_by(|&a, &b| {
            let a_val = triangles[a as usize].centroid()[axis];
            let b_val = triangles[b as usize].centroid()[axis];
            a_val
                .partial_cmp(&b_val)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = n / 2;
        let right_primitives = primitives.split_off(mid);
        let left = Self::build(triangles, primitives);
        let right = Self::build(triangles, right_primitives);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }

    /// Find the nearest triangle hit with `t` in `ray_t`.
    ///
    /// `closest` is updated with `(triangle index, intersection)` whenever a
    /// nearer hit is found; returns true if this subtree produced one.
    pub fn hit(
        &self,
        triangles: &[Triangle],
        ray: &Ray,
        ray_t: Interval,
        closest: &mut Option<(u32, Intersection)>,
    ) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { primitives, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut nearest = ray_t.max;

                for &i in primitives {
                    if let Some(hit) = triangles[i as usize].hit(ray, ray_t.with_max(nearest)) {
                        hit_anything = true;
                        nearest = hit.t;
                        *closest = Some((i, hit));
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(triangles, ray, ray_t, closest);

                // Only check right up to closest hit
                let right_max = match closest {
                    Some((_, hit)) if hit_left => hit.t,
                    _ => ray_t.max,
                };
                let hit_right = right.hit(triangles, ray, ray_t.with_max(right_max), closest);

                hit_left || hit_right
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Depth of the deepest leaf (0 for an empty tree).
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}
