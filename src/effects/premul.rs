use crate::node::flags::{OptimizationFlags, SampleUsage};
use crate::node::kind::EffectKind;
use crate::node::tree::EffectNode;

/// Evaluate `fp` with opaque white, then scale the result by the input's rgb and alpha.
///
/// Adapts a child written for unpremultiplied input. Returns `None` for a `None` child.
pub fn premul_and_mul_by_output(fp: Option<Box<EffectNode>>) -> Option<Box<EffectNode>> {
    let fp = fp?;
    let flags = fp.optimization_flags()
        & (OptimizationFlags::PRESERVES_OPAQUE_INPUT
            | OptimizationFlags::CONSTANT_OUTPUT_FOR_CONSTANT_INPUT);
    let mut node = EffectNode::new(EffectKind::Premul, flags);
    node.register_child(Some(fp), SampleUsage::pass_through());
    Some(node)
}
