use crate::foundation::core::{Matrix3, PmColor4f};
use crate::node::flags::{OptimizationFlags, SampleUsage};
use crate::node::kind::EffectKind;
use crate::node::tree::EffectNode;

/// Sample `fp` at the fragment position instead of the local coordinate.
///
/// The child is explicitly sampled, so its coordinate use does not propagate further up.
/// Moving the sample point does not change what the child does with its input, so the
/// child's optimization flags carry over. Returns `None` for a `None` child.
pub fn device_space(fp: Option<Box<EffectNode>>) -> Option<Box<EffectNode>> {
    let fp = fp?;
    let flags = fp.optimization_flags();
    let mut node = EffectNode::new(EffectKind::DeviceSpace, flags);
    node.register_child(Some(fp), SampleUsage::explicit());
    Some(node)
}

/// Sample `fp` at the local coordinate mapped through `matrix`.
///
/// Returns `None` for a `None` child.
pub fn matrix_effect(fp: Option<Box<EffectNode>>, matrix: Matrix3) -> Option<Box<EffectNode>> {
    let fp = fp?;
    let flags = fp.optimization_flags();
    let mut node = EffectNode::new(EffectKind::Matrix { matrix }, flags);
    node.register_child(
        Some(fp),
        SampleUsage::uniform_matrix(matrix.has_perspective()),
    );
    Some(node)
}

/// Two-stop linear gradient from `c0` at `start` to `c1` at `end`, clamped at both ends.
pub fn linear_gradient(
    start: [f32; 2],
    end: [f32; 2],
    c0: PmColor4f,
    c1: PmColor4f,
) -> Box<EffectNode> {
    let flags = if c0.is_opaque() && c1.is_opaque() {
        OptimizationFlags::PRESERVES_OPAQUE_INPUT
    } else {
        OptimizationFlags::empty()
    };
    EffectNode::new(
        EffectKind::LinearGradient {
            start,
            end,
            colors: [c0, c1],
        },
        flags,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/effects/coords.rs"]
mod tests;
