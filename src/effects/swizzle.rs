use crate::foundation::core::PmColor4f;
use crate::foundation::error::{FxError, FxResult};
use crate::node::flags::{OptimizationFlags, SampleUsage};
use crate::node::kind::EffectKind;
use crate::node::tree::EffectNode;

/// Source of one output channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwizzleChannel {
    /// Red.
    R,
    /// Green.
    G,
    /// Blue.
    B,
    /// Alpha.
    A,
    /// Constant `0`.
    Zero,
    /// Constant `1`.
    One,
}

impl SwizzleChannel {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'r' => Self::R,
            'g' => Self::G,
            'b' => Self::B,
            'a' => Self::A,
            '0' => Self::Zero,
            '1' => Self::One,
            _ => return None,
        })
    }

    fn as_char(self) -> char {
        match self {
            Self::R => 'r',
            Self::G => 'g',
            Self::B => 'b',
            Self::A => 'a',
            Self::Zero => '0',
            Self::One => '1',
        }
    }

    fn pick(self, c: PmColor4f) -> f32 {
        match self {
            Self::R => c.r,
            Self::G => c.g,
            Self::B => c.b,
            Self::A => c.a,
            Self::Zero => 0.0,
            Self::One => 1.0,
        }
    }

    fn wgsl(self, expr: &str) -> String {
        match self {
            Self::Zero => "0.0".to_string(),
            Self::One => "1.0".to_string(),
            ch => format!("{expr}.{}", ch.as_char()),
        }
    }

    fn key(self) -> u32 {
        match self {
            Self::R => 0,
            Self::G => 1,
            Self::B => 2,
            Self::A => 3,
            Self::Zero => 4,
            Self::One => 5,
        }
    }
}

/// A permutation of the four color channels, written like `"bgra"` or `"rrr1"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Swizzle([SwizzleChannel; 4]);

impl Swizzle {
    /// The identity permutation.
    pub const RGBA: Self = Self([
        SwizzleChannel::R,
        SwizzleChannel::G,
        SwizzleChannel::B,
        SwizzleChannel::A,
    ]);

    /// Build a swizzle from explicit channels.
    pub const fn new(channels: [SwizzleChannel; 4]) -> Self {
        Self(channels)
    }

    /// Parse a four-character swizzle string over `rgba01`.
    pub fn parse(s: &str) -> FxResult<Self> {
        let chars = s.chars().collect::<Vec<_>>();
        if chars.len() != 4 {
            return Err(FxError::validation(format!(
                "swizzle '{s}' must have exactly 4 channels"
            )));
        }
        let mut out = [SwizzleChannel::R; 4];
        for (slot, c) in out.iter_mut().zip(chars) {
            *slot = SwizzleChannel::from_char(c).ok_or_else(|| {
                FxError::validation(format!("swizzle '{s}' has invalid channel '{c}'"))
            })?;
        }
        Ok(Self(out))
    }

    /// Channels in output order.
    pub fn channels(&self) -> [SwizzleChannel; 4] {
        self.0
    }

    /// Apply the permutation to a color.
    pub fn apply_to(&self, c: PmColor4f) -> PmColor4f {
        PmColor4f::new(
            self.0[0].pick(c),
            self.0[1].pick(c),
            self.0[2].pick(c),
            self.0[3].pick(c),
        )
    }

    /// 16-bit key: four bits per channel.
    pub fn as_key(&self) -> u32 {
        self.0
            .iter()
            .enumerate()
            .fold(0u32, |k, (i, ch)| k | (ch.key() << (4 * i)))
    }

    /// Shading-language expression applying the swizzle to `expr`.
    pub(crate) fn wgsl_apply(&self, expr: &str) -> String {
        if self.0.iter().all(|c| !matches!(c, SwizzleChannel::Zero | SwizzleChannel::One)) {
            return format!("{expr}.{self}");
        }
        let parts = self.0.iter().map(|c| c.wgsl(expr)).collect::<Vec<_>>();
        format!("vec4<f32>({})", parts.join(", "))
    }

    fn preserves_alpha_opacity(&self) -> bool {
        matches!(self.0[3], SwizzleChannel::A | SwizzleChannel::One)
    }
}

impl std::fmt::Display for Swizzle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in self.0 {
            write!(f, "{}", c.as_char())?;
        }
        Ok(())
    }
}

/// Permute the channels of `fp`'s output.
///
/// Returns `None` for a `None` child and returns `fp` itself for the identity permutation.
pub fn swizzle_output(fp: Option<Box<EffectNode>>, swizzle: Swizzle) -> Option<Box<EffectNode>> {
    let fp = fp?;
    if swizzle == Swizzle::RGBA {
        return Some(fp);
    }
    let mut flags = fp.optimization_flags();
    if !swizzle.preserves_alpha_opacity() {
        flags.remove(OptimizationFlags::PRESERVES_OPAQUE_INPUT);
    }
    let mut node = EffectNode::new(EffectKind::Swizzle { swizzle }, flags);
    node.register_child(Some(fp), SampleUsage::pass_through());
    Some(node)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/swizzle.rs"]
mod tests;
