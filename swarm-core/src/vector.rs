/// Float helpers that resolve to `std` when available and `libm` otherwise
pub(crate) mod math {
    pub fn sqrt(value: f32) -> f32 {
        #[cfg(feature = "std")]
        {
            value.sqrt()
        }
        #[cfg(not(feature = "std"))]
        {
            libm::sqrtf(value)
        }
    }

    pub fn abs(value: f32) -> f32 {
        #[cfg(feature = "std")]
        {
            value.abs()
        }
        #[cfg(not(feature = "std"))]
        {
            libm::fabsf(value)
        }
    }

    /// Euclidean remainder, always in `[0, modulus)` for a positive modulus
    pub fn rem_euclid(value: f32, modulus: f32) -> f32 {
        #[cfg(feature = "std")]
        let r = value % modulus;
        #[cfg(not(feature = "std"))]
        let r = libm::fmodf(value, modulus);

        let r = if r < 0.0 { r + modulus } else { r };
        // -tiny % m + m rounds up to m
        if r >= modulus {
            0.0
        } else {
            r
        }
    }
}

/// A 3D vector used for position, velocity and acceleration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn magnitude(&self) -> f32 {
        math::sqrt(self.magnitude_squared())
    }

    /// Unit vector in the same direction. The zero vector normalizes to itself.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
                z: self.z / mag,
            }
        } else {
            Self::zero()
        }
    }

    /// Scales the vector down to `max` if it is longer, otherwise returns it unchanged.
    pub fn limit(&self, max: f32) -> Self {
        let mag = self.magnitude();
        if mag > max {
            self.normalize() * max
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector3) -> f32 {
        (*self - *other).magnitude()
    }

    pub fn distance_squared(&self, other: &Vector3) -> f32 {
        (*self - *other).magnitude_squared()
    }

    pub fn dot(&self, other: &Vector3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl core::ops::Add for Vector3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl core::ops::Sub for Vector3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl core::ops::Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector3 {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl core::ops::Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl core::ops::AddAssign for Vector3 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl core::ops::SubAssign for Vector3 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector3_magnitude() {
        let v = Vector3::new(2.0, 3.0, 6.0);
        assert_eq!(v.magnitude(), 7.0);
    }

    #[test]
    fn test_vector3_normalize() {
        let v = Vector3::new(3.0, 4.0, 12.0);
        let normalized = v.normalize();
        assert!((normalized.magnitude() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_vector3_normalize_zero_is_zero() {
        let normalized = Vector3::zero().normalize();
        assert_eq!(normalized, Vector3::ZERO);
        assert!(normalized.is_finite());
    }

    #[test]
    fn test_vector3_limit() {
        let long = Vector3::new(0.0, 10.0, 0.0);
        assert_eq!(long.limit(2.0), Vector3::new(0.0, 2.0, 0.0));

        let short = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(short.limit(2.0), short);
    }

    #[test]
    fn test_vector3_operations() {
        let v1 = Vector3::new(1.0, 2.0, 3.0);
        let v2 = Vector3::new(4.0, 6.0, 8.0);

        assert_eq!(v1 + v2, Vector3::new(5.0, 8.0, 11.0));
        assert_eq!(v2 - v1, Vector3::new(3.0, 4.0, 5.0));
        assert_eq!(v1 * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(v2 / 2.0, Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(-v1, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(v1.dot(&v2), 40.0);

        let mut acc = v1;
        acc += v2;
        acc -= v1;
        assert_eq!(acc, v2);
    }

    #[test]
    fn test_vector3_distance() {
        let a = Vector3::new(1.0, 1.0, 1.0);
        let b = Vector3::new(1.0, 4.0, 5.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.distance_squared(&b), 25.0);
    }

    #[test]
    fn test_rem_euclid_wraps_into_range() {
        assert_eq!(math::rem_euclid(12.0, 10.0), 2.0);
        assert_eq!(math::rem_euclid(-1.0, 10.0), 9.0);
        assert_eq!(math::rem_euclid(10.0, 10.0), 0.0);
        assert!(math::rem_euclid(-1.0e-9, 10.0) < 10.0);
    }
}
