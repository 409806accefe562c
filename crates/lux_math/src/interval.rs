/// A closed range of ray parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Same lower bound, new upper bound.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval::new(f32::INFINITY, f32::NEG_INFINITY);

    /// All non-negative ray parameters.
    pub const FORWARD: Interval = Interval::new(0.0, f32::INFINITY);
}
