use crate::codegen::key::KeyBuilder;
use crate::effects::blend::{BlendBehavior, BlendMode};
use crate::effects::color_matrix::ColorMatrix;
use crate::effects::swizzle::Swizzle;
use crate::foundation::core::{Matrix3, PmColor4f};
use crate::foundation::ids::ClassId;
use crate::node::flags::{Capabilities, NodeFlags};

/// Variant-specific parameters of an [`EffectNode`](crate::EffectNode).
///
/// Equality over this type is the node-local half of structural equality: it compares the
/// node's own data and never looks at children.
#[derive(Clone, Debug)]
pub enum EffectKind {
    /// Ignores the input and yields `color`.
    Color {
        /// Output color.
        color: PmColor4f,
    },
    /// Evaluates child 0 with `color` instead of the input.
    OverrideInput {
        /// Replacement input.
        color: PmColor4f,
        /// Baked into the program instead of uploaded as a uniform.
        specialized: bool,
    },
    /// Reads the destination color.
    DestColor,
    /// Permutes child 0's channels.
    Swizzle {
        /// Channel permutation.
        swizzle: Swizzle,
    },
    /// Samples child 0 with opaque white, then multiplies by the premultiplied input.
    Premul,
    /// Child 0 applied to the output of child 1.
    Compose,
    /// Blends child 0 (src) with child 1 (dst); absent children stand for the input.
    Blend {
        /// Blend equation.
        mode: BlendMode,
        /// How operands see the input color.
        behavior: BlendBehavior,
    },
    /// Affine color transform of child 0's output (or of the input when absent).
    ColorMatrix(ColorMatrix),
    /// Clamps child 0's output.
    Clamp {
        /// Clamp rgb to `[0, alpha]` instead of `[0, 1]`.
        premul: bool,
    },
    /// Samples child 0 at the fragment position.
    DeviceSpace,
    /// Samples child 0 at the local coordinate mapped through `matrix`.
    Matrix {
        /// Coordinate transform.
        matrix: Matrix3,
    },
    /// Interpolates between two colors along the segment `start..end`.
    LinearGradient {
        /// Start point, in local coordinates.
        start: [f32; 2],
        /// End point, in local coordinates.
        end: [f32; 2],
        /// Colors at `start` and `end`.
        colors: [PmColor4f; 2],
    },
}

impl PartialEq for EffectKind {
    fn eq(&self, other: &Self) -> bool {
        use EffectKind as K;
        match (self, other) {
            (K::Color { color: a }, K::Color { color: b }) => a == b,
            (
                K::OverrideInput { color: a, specialized: sa },
                K::OverrideInput { color: b, specialized: sb },
            ) => a == b && sa == sb,
            (K::DestColor, K::DestColor)
            | (K::Premul, K::Premul)
            | (K::Compose, K::Compose)
            | (K::DeviceSpace, K::DeviceSpace) => true,
            (K::Swizzle { swizzle: a }, K::Swizzle { swizzle: b }) => a == b,
            (
                K::Blend { mode: ma, behavior: ba },
                K::Blend { mode: mb, behavior: bb },
            ) => ma == mb && ba == bb,
            (K::ColorMatrix(a), K::ColorMatrix(b)) => a == b,
            (K::Clamp { premul: a }, K::Clamp { premul: b }) => a == b,
            (K::Matrix { matrix: a }, K::Matrix { matrix: b }) => a == b,
            (
                K::LinearGradient { start: sa, end: ea, colors: ca },
                K::LinearGradient { start: sb, end: eb, colors: cb },
            ) => same_bits(sa, sb) && same_bits(ea, eb) && ca == cb,
            _ => false,
        }
    }
}

fn same_bits(a: &[f32; 2], b: &[f32; 2]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

impl EffectKind {
    /// Stable type tag.
    pub fn class_id(&self) -> ClassId {
        match self {
            Self::Color { .. } => ClassId::Color,
            Self::OverrideInput { .. } => ClassId::OverrideInput,
            Self::DestColor => ClassId::DestColor,
            Self::Swizzle { .. } => ClassId::Swizzle,
            Self::Premul => ClassId::Premul,
            Self::Compose => ClassId::Compose,
            Self::Blend { .. } => ClassId::Blend,
            Self::ColorMatrix(_) => ClassId::ColorMatrix,
            Self::Clamp { .. } => ClassId::Clamp,
            Self::DeviceSpace => ClassId::DeviceSpace,
            Self::Matrix { .. } => ClassId::Matrix,
            Self::LinearGradient { .. } => ClassId::LinearGradient,
        }
    }

    /// Human-readable variant name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Color { .. } => "Color",
            Self::OverrideInput { .. } => "OverrideInput",
            Self::DestColor => "DestColor",
            Self::Swizzle { .. } => "Swizzle",
            Self::Premul => "Premultiply",
            Self::Compose => "Compose",
            Self::Blend { .. } => "Blend",
            Self::ColorMatrix(_) => "ColorMatrix",
            Self::Clamp { premul: false } => "Clamp",
            Self::Clamp { premul: true } => "ClampPremul",
            Self::DeviceSpace => "DeviceSpace",
            Self::Matrix { .. } => "Matrix",
            Self::LinearGradient { .. } => "LinearGradient",
        }
    }

    pub(crate) fn intrinsic_flags(&self) -> NodeFlags {
        match self {
            Self::DestColor => NodeFlags::WILL_READ_DST_COLOR,
            Self::LinearGradient { .. } => NodeFlags::USES_COORDS_DIRECTLY,
            _ => NodeFlags::empty(),
        }
    }

    pub(crate) fn intrinsic_capabilities(&self) -> Capabilities {
        match self {
            Self::DeviceSpace => Capabilities::FRAG_COORD,
            _ => Capabilities::empty(),
        }
    }

    /// Parameter summary used by tree dumps.
    pub(crate) fn dump_params(&self) -> String {
        match self {
            Self::Color { color } => fmt_color(*color),
            Self::OverrideInput { color, specialized } => {
                format!("{}, specialized={specialized}", fmt_color(*color))
            }
            Self::Swizzle { swizzle } => swizzle.to_string(),
            Self::Blend { mode, behavior } => format!("{mode:?}, {behavior:?}"),
            Self::ColorMatrix(cm) => format!(
                "unpremul_input={}, clamp_rgb_output={}, premul_output={}",
                cm.unpremul_input, cm.clamp_rgb_output, cm.premul_output
            ),
            Self::Matrix { matrix } => format!("{:?}", matrix.m),
            Self::LinearGradient { start, end, colors } => format!(
                "{start:?} -> {end:?}, {} -> {}",
                fmt_color(colors[0]),
                fmt_color(colors[1])
            ),
            Self::DestColor
            | Self::Premul
            | Self::Compose
            | Self::Clamp { .. }
            | Self::DeviceSpace => String::new(),
        }
    }

    /// Write the state that selects a distinct compiled program.
    ///
    /// Uniform-backed values (colors, matrices) are not part of the key.
    pub(crate) fn add_key_fields(&self, b: &mut KeyBuilder) {
        match self {
            Self::OverrideInput { color, specialized } => {
                b.add_bool(*specialized);
                if *specialized {
                    for c in color.to_array() {
                        b.add_f32(c);
                    }
                }
            }
            Self::Swizzle { swizzle } => b.add32(swizzle.as_key()),
            Self::Blend { mode, behavior } => {
                b.add32(mode.key());
                b.add32(behavior.key());
            }
            Self::ColorMatrix(cm) => {
                b.add_bool(cm.unpremul_input);
                b.add_bool(cm.clamp_rgb_output);
                b.add_bool(cm.premul_output);
            }
            Self::Clamp { premul } => b.add_bool(*premul),
            Self::Matrix { matrix } => b.add_bool(matrix.has_perspective()),
            Self::Color { .. }
            | Self::DestColor
            | Self::Premul
            | Self::Compose
            | Self::DeviceSpace
            | Self::LinearGradient { .. } => {}
        }
    }
}

fn fmt_color(c: PmColor4f) -> String {
    format!("r={}, g={}, b={}, a={}", c.r, c.g, c.b, c.a)
}
