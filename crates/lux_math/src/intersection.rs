/// Barycentric record of a ray-triangle hit.
///
/// `t` is the ray parameter of the hit, `u`/`v` the barycentric weights of
/// the second and third vertex. A record is only meaningful when
/// `u >= 0`, `v >= 0` and `u + v <= 1`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Intersection {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

impl Intersection {
    pub fn new(t: f32, u: f32, v: f32) -> Self {
        Self { t, u, v }
    }

    /// Weight of the first vertex.
    #[inline]
    pub fn w(&self) -> f32 {
        1.0 - self.u - self.v
    }

    /// True when the barycentric coordinates lie inside the triangle.
    pub fn is_valid(&self) -> bool {
        self.u >= 0.0 && self.v >= 0.0 && self.u + self.v <= 1.0
    }

    /// Interpolate a per-vertex attribute with these barycentric weights.
    #[inline]
    pub fn interpolate<T>(&self, a: T, b: T, c: T) -> T
    where
        T: std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
    {
        a * self.w() + b * self.u + c * self.v
    }
}
