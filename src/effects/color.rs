use crate::foundation::core::PmColor4f;
use crate::node::flags::{OptimizationFlags, SampleUsage};
use crate::node::kind::EffectKind;
use crate::node::tree::EffectNode;

/// A leaf that ignores its input and always yields `color`.
pub fn make_color(color: PmColor4f) -> Box<EffectNode> {
    let mut flags = OptimizationFlags::CONSTANT_OUTPUT_FOR_CONSTANT_INPUT;
    if color.is_opaque() {
        flags |= OptimizationFlags::PRESERVES_OPAQUE_INPUT;
    }
    EffectNode::new(EffectKind::Color { color }, flags)
}

/// Evaluate `fp` with `color` as its input, ignoring the real input.
///
/// With `use_uniform` the color is uploaded as a uniform; otherwise it is specialized into the
/// program key. Returns `None` for a `None` child.
pub fn override_input(
    fp: Option<Box<EffectNode>>,
    color: PmColor4f,
    use_uniform: bool,
) -> Option<Box<EffectNode>> {
    let fp = fp?;
    let mut flags =
        fp.optimization_flags() & OptimizationFlags::CONSTANT_OUTPUT_FOR_CONSTANT_INPUT;
    if color.is_opaque() {
        flags |= OptimizationFlags::PRESERVES_OPAQUE_INPUT;
    }
    let mut node = EffectNode::new(
        EffectKind::OverrideInput {
            color,
            specialized: !use_uniform,
        },
        flags,
    );
    node.register_child(Some(fp), SampleUsage::pass_through());
    Some(node)
}

/// A leaf returning the destination (backdrop) color.
pub fn dest_color() -> Box<EffectNode> {
    EffectNode::new(EffectKind::DestColor, OptimizationFlags::empty())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color.rs"]
mod tests;
