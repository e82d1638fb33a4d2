use core::fmt;
use core::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_array(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn get(self, axis: Axis) -> f64 {
        self.to_array()[axis.index()]
    }

    pub fn distance(self, other: Point3) -> f64 {
        (self - other).norm()
    }

    /// Per-axis `floor`, saturating at the `i64` range.
    pub fn floor_index(self) -> [i64; 3] {
        self.to_array().map(|c| c.floor() as i64)
    }
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_array(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn get(self, axis: Axis) -> f64 {
        self.to_array()[axis.index()]
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Component-wise product.
    pub fn scale(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }

    pub fn product(self) -> f64 {
        self.x * self.y * self.z
    }
}

impl Add<Vec3> for Point3 {
    type Output = Point3;

    fn add(self, rhs: Vec3) -> Self::Output {
        Point3 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub<Vec3> for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Vec3) -> Self::Output {
        Point3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Sub<Point3> for Point3 {
    type Output = Vec3;

    fn sub(self, rhs: Point3) -> Self::Output {
        Vec3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Self::Output {
        Vec3 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Self::Output {
        Vec3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Self::Output {
        Vec3 {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Self::Output {
        rhs * self
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, Point3, Vec3};

    #[test]
    fn vec_ops_and_norm() {
        let a = Vec3::new(3.0, 4.0, 12.0);
        let b = Vec3::new(1.0, -2.0, 0.5);

        assert_eq!(a + b, Vec3::new(4.0, 2.0, 12.5));
        assert_eq!(a - b, Vec3::new(2.0, 6.0, 11.5));
        assert!((a.dot(b) - 1.0).abs() < 1e-12);
        assert!((a.norm() - 13.0).abs() < 1e-12);
        assert_eq!(a.scale(b), Vec3::new(3.0, -8.0, 6.0));
        assert!((Vec3::new(0.5, 2.0, 3.0).product() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn point_vec_ops_and_floor() {
        let p = Point3::new(2.0, 3.0, -1.0);
        let v = Vec3::new(0.5, -1.0, 2.0);

        assert_eq!(p + v, Point3::new(2.5, 2.0, 1.0));
        assert_eq!(p - v, Point3::new(1.5, 4.0, -3.0));
        assert_eq!(p - Point3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 2.0, -2.0));
        assert_eq!(Point3::new(1.9, -0.1, 0.0).floor_index(), [1, -1, 0]);
        assert_eq!(p.get(Axis::Z), -1.0);
        assert!((p.distance(Point3::new(2.0, 7.0, 2.0)) - 5.0).abs() < 1e-12);
    }
}
