use crate::foundation::error::{FxError, FxResult};

/// Premultiplied RGBA color with `f32` channels (r,g,b already multiplied by a).
///
/// Equality is bitwise per channel so that it stays reflexive for every value and agrees
/// with the bytes written into program keys.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct PmColor4f {
    /// Red channel premultiplied by alpha.
    pub r: f32,
    /// Green channel premultiplied by alpha.
    pub g: f32,
    /// Blue channel premultiplied by alpha.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl PmColor4f {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Create a color from premultiplied channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from a `[r, g, b, a]` array.
    pub const fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Validated constructor used by descriptions.
    pub fn try_from_array(c: [f32; 4]) -> FxResult<Self> {
        if c.iter().any(|v| !v.is_finite()) {
            return Err(FxError::validation("color channels must be finite"));
        }
        Ok(Self::from_array(c))
    }

    /// Channels as `[r, g, b, a]`.
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Return `true` when alpha is exactly one.
    pub fn is_opaque(self) -> bool {
        self.a == 1.0
    }

    /// Component-wise product.
    pub fn mul(self, o: Self) -> Self {
        Self::new(self.r * o.r, self.g * o.g, self.b * o.b, self.a * o.a)
    }

    /// Multiply every channel by `s`.
    pub fn scale(self, s: f32) -> Self {
        Self::new(self.r * s, self.g * s, self.b * s, self.a * s)
    }

    /// Component-wise sum.
    pub fn add(self, o: Self) -> Self {
        Self::new(self.r + o.r, self.g + o.g, self.b + o.b, self.a + o.a)
    }

    /// Clamp every channel into `[0, 1]`.
    pub fn saturate(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Divide rgb by alpha. Transparent colors unpremultiply to transparent black.
    pub fn unpremul(self) -> Color4f {
        if self.a == 0.0 {
            return Color4f::new(0.0, 0.0, 0.0, 0.0);
        }
        let inv = 1.0 / self.a;
        Color4f::new(self.r * inv, self.g * inv, self.b * inv, self.a)
    }
}

impl PartialEq for PmColor4f {
    fn eq(&self, other: &Self) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for PmColor4f {}

/// Unpremultiplied RGBA color with `f32` channels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color4f {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color4f {
    /// Create a color from straight-alpha channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Multiply rgb by alpha.
    pub fn premul(self) -> PmColor4f {
        PmColor4f::new(self.r * self.a, self.g * self.a, self.b * self.a, self.a)
    }
}

/// Row-major 3x3 matrix applied to homogeneous sample coordinates.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Matrix3 {
    /// Row-major coefficients.
    pub m: [f32; 9],
}

impl Matrix3 {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    /// Create a matrix from row-major coefficients.
    pub const fn new(m: [f32; 9]) -> Self {
        Self { m }
    }

    /// Return `true` when the bottom row is not `[0, 0, 1]`.
    pub fn has_perspective(&self) -> bool {
        self.m[6] != 0.0 || self.m[7] != 0.0 || self.m[8] != 1.0
    }

    /// Map a point, dividing by the homogeneous coordinate.
    pub fn map_point(&self, p: [f32; 2]) -> [f32; 2] {
        let m = &self.m;
        let x = m[0] * p[0] + m[1] * p[1] + m[2];
        let y = m[3] * p[0] + m[4] * p[1] + m[5];
        let w = m[6] * p[0] + m[7] * p[1] + m[8];
        if w == 0.0 { [x, y] } else { [x / w, y / w] }
    }
}

impl From<kurbo::Affine> for Matrix3 {
    fn from(a: kurbo::Affine) -> Self {
        // kurbo coefficients are [a, b, c, d, e, f] for x' = a*x + c*y + e, y' = b*x + d*y + f.
        let [a, b, c, d, e, f] = a.as_coeffs().map(|v| v as f32);
        Self::new([a, c, e, b, d, f, 0.0, 0.0, 1.0])
    }
}

impl PartialEq for Matrix3 {
    fn eq(&self, other: &Self) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for Matrix3 {}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
