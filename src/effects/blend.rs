use crate::effects::color::make_color;
use crate::foundation::core::PmColor4f;
use crate::node::flags::{OptimizationFlags, SampleUsage};
use crate::node::kind::EffectKind;
use crate::node::tree::EffectNode;

/// Porter-Duff and separable blend modes supported by [`blend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// `0`
    Clear,
    /// `s`
    Src,
    /// `d`
    Dst,
    /// `s + (1 - sa) * d`
    SrcOver,
    /// `d + (1 - da) * s`
    DstOver,
    /// `s * da`
    SrcIn,
    /// `d * sa`
    DstIn,
    /// `s * (1 - da)`
    SrcOut,
    /// `d * (1 - sa)`
    DstOut,
    /// `s * da + d * (1 - sa)`
    SrcATop,
    /// `d * sa + s * (1 - da)`
    DstATop,
    /// `s * (1 - da) + d * (1 - sa)`
    Xor,
    /// `min(s + d, 1)`
    Plus,
    /// `s * d`
    Modulate,
    /// `s + d - s * d`
    Screen,
}

impl BlendMode {
    pub(crate) fn key(self) -> u32 {
        self as u32
    }

    /// Blend premultiplied colors on the CPU.
    pub fn apply(self, s: PmColor4f, d: PmColor4f) -> PmColor4f {
        match self {
            Self::Clear => PmColor4f::TRANSPARENT,
            Self::Src => s,
            Self::Dst => d,
            Self::SrcOver => s.add(d.scale(1.0 - s.a)),
            Self::DstOver => d.add(s.scale(1.0 - d.a)),
            Self::SrcIn => s.scale(d.a),
            Self::DstIn => d.scale(s.a),
            Self::SrcOut => s.scale(1.0 - d.a),
            Self::DstOut => d.scale(1.0 - s.a),
            Self::SrcATop => s.scale(d.a).add(d.scale(1.0 - s.a)),
            Self::DstATop => d.scale(s.a).add(s.scale(1.0 - d.a)),
            Self::Xor => s.scale(1.0 - d.a).add(d.scale(1.0 - s.a)),
            Self::Plus => {
                let c = s.add(d);
                PmColor4f::new(c.r.min(1.0), c.g.min(1.0), c.b.min(1.0), c.a.min(1.0))
            }
            Self::Modulate => s.mul(d),
            Self::Screen => s.add(d).add(s.mul(d).scale(-1.0)),
        }
    }

    /// Shading-language expression blending the values named `s` and `d`.
    pub(crate) fn wgsl_expr(self, s: &str, d: &str) -> String {
        match self {
            Self::Clear => "vec4<f32>(0.0)".to_string(),
            Self::Src => s.to_string(),
            Self::Dst => d.to_string(),
            Self::SrcOver => format!("{s} + (1.0 - {s}.a) * {d}"),
            Self::DstOver => format!("{d} + (1.0 - {d}.a) * {s}"),
            Self::SrcIn => format!("{s} * {d}.a"),
            Self::DstIn => format!("{d} * {s}.a"),
            Self::SrcOut => format!("{s} * (1.0 - {d}.a)"),
            Self::DstOut => format!("{d} * (1.0 - {s}.a)"),
            Self::SrcATop => format!("{s} * {d}.a + {d} * (1.0 - {s}.a)"),
            Self::DstATop => format!("{d} * {s}.a + {s} * (1.0 - {d}.a)"),
            Self::Xor => format!("{s} * (1.0 - {d}.a) + {d} * (1.0 - {s}.a)"),
            Self::Plus => format!("min({s} + {d}, vec4<f32>(1.0))"),
            Self::Modulate => format!("{s} * {d}"),
            Self::Screen => format!("{s} + {d} - {s} * {d}"),
        }
    }

    fn opaque_flags(self, src: OptimizationFlags, dst: OptimizationFlags) -> OptimizationFlags {
        let keep = OptimizationFlags::PRESERVES_OPAQUE_INPUT;
        match self {
            Self::SrcIn | Self::DstIn | Self::Modulate => src & dst & keep,
            Self::SrcOver | Self::DstOver | Self::Plus | Self::Screen => (src | dst) & keep,
            Self::SrcATop => dst & keep,
            Self::DstATop => src & keep,
            Self::Src => src & keep,
            Self::Dst => dst & keep,
            Self::Clear | Self::SrcOut | Self::DstOut | Self::Xor => OptimizationFlags::empty(),
        }
    }
}

/// How the blend operands see the input color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendBehavior {
    /// `ComposeTwo` with both operands, `ComposeOne` with one, `SkMode` with none.
    #[default]
    Default,
    /// One operand is the input color, the other is sampled with opaque white.
    ComposeOne,
    /// Both operands are sampled with opaque white and the result is scaled by input alpha.
    ComposeTwo,
    /// Both operands see the input color; an absent operand is the input color.
    SkMode,
}

impl BlendBehavior {
    pub(crate) fn key(self) -> u32 {
        self as u32
    }
}

/// Blend `src` over `dst` with `mode`. An absent operand stands for the input color.
///
/// `Clear` collapses to transparent, `Src` and `Dst` return the chosen operand unchanged.
pub fn blend(
    src: Option<Box<EffectNode>>,
    dst: Option<Box<EffectNode>>,
    mode: BlendMode,
    behavior: BlendBehavior,
) -> Option<Box<EffectNode>> {
    match mode {
        BlendMode::Clear => return Some(make_color(PmColor4f::TRANSPARENT)),
        BlendMode::Src => return src,
        BlendMode::Dst => return dst,
        _ => {}
    }

    let behavior = match behavior {
        BlendBehavior::Default => match (&src, &dst) {
            (Some(_), Some(_)) => BlendBehavior::ComposeTwo,
            (None, None) => BlendBehavior::SkMode,
            _ => BlendBehavior::ComposeOne,
        },
        b => b,
    };
    Some(make_blend_node(src, dst, mode, behavior))
}

fn make_blend_node(
    src: Option<Box<EffectNode>>,
    dst: Option<Box<EffectNode>>,
    mode: BlendMode,
    behavior: BlendBehavior,
) -> Box<EffectNode> {
    let src_flags = EffectNode::optimization_flags_of(src.as_deref());
    let dst_flags = EffectNode::optimization_flags_of(dst.as_deref());
    let mut flags = mode.opaque_flags(src_flags, dst_flags);
    flags |= src_flags & dst_flags & OptimizationFlags::CONSTANT_OUTPUT_FOR_CONSTANT_INPUT;

    let mut node = EffectNode::new(EffectKind::Blend { mode, behavior }, flags);
    node.register_child(src, SampleUsage::pass_through());
    node.register_child(dst, SampleUsage::pass_through());
    node
}

/// Blend on the CPU following `behavior`, given the already-evaluated operands.
///
/// `src`/`dst` are `None` when the operand is absent.
pub(crate) fn blend_constant(
    mode: BlendMode,
    behavior: BlendBehavior,
    src: Option<PmColor4f>,
    dst: Option<PmColor4f>,
    input: PmColor4f,
) -> PmColor4f {
    let s = src.unwrap_or(input);
    let d = dst.unwrap_or(input);
    let out = mode.apply(s, d);
    match behavior {
        BlendBehavior::ComposeTwo => out.scale(input.a),
        _ => out,
    }
}

/// Multiply the child's output (sampled with opaque white) by the input alpha.
///
/// Returns `None` for a `None` child.
pub fn mul_child_by_input_alpha(fp: Option<Box<EffectNode>>) -> Option<Box<EffectNode>> {
    let fp = fp?;
    blend(None, Some(fp), BlendMode::DstIn, BlendBehavior::Default)
}

/// Multiply the input color by the child's output alpha.
///
/// Returns `None` for a `None` child.
pub fn mul_input_by_child_alpha(fp: Option<Box<EffectNode>>) -> Option<Box<EffectNode>> {
    let fp = fp?;
    blend(None, Some(fp), BlendMode::SrcIn, BlendBehavior::Default)
}

/// Multiply `color` by the alpha of `input_fp` (or of the input color when absent).
pub fn modulate_alpha(input_fp: Option<Box<EffectNode>>, color: PmColor4f) -> Box<EffectNode> {
    let color_fp = make_color(color);
    make_blend_node(
        Some(color_fp),
        input_fp,
        BlendMode::SrcIn,
        BlendBehavior::SkMode,
    )
}

/// Multiply `color` by the output of `input_fp` (or by the input color when absent).
pub fn modulate_rgba(input_fp: Option<Box<EffectNode>>, color: PmColor4f) -> Box<EffectNode> {
    let color_fp = make_color(color);
    make_blend_node(
        Some(color_fp),
        input_fp,
        BlendMode::Modulate,
        BlendBehavior::SkMode,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blend.rs"]
mod tests;
