use smallvec::SmallVec;

use crate::codegen::key::{KeyBuilder, NULL_CHILD_KEY};
use crate::codegen::program::ProgramImpl;
use crate::effects::blend::{BlendBehavior, blend_constant};
use crate::foundation::core::{Color4f, PmColor4f};
use crate::foundation::error::{FxError, FxResult};
use crate::foundation::ids::{ClassId, NodeId};
use crate::node::flags::{Capabilities, NodeFlags, OptimizationFlags, SampleUsage};
use crate::node::iter::NodeIter;
use crate::node::kind::EffectKind;

/// One stage of a per-pixel color computation, owning its ordered child stages.
///
/// Nodes are built bottom-up by the factories in [`crate::effects`]. Children are attached
/// exactly once through [`EffectNode::register_child`], which propagates flags immediately;
/// afterwards the shape is fixed.
#[derive(Debug)]
pub struct EffectNode {
    id: NodeId,
    kind: EffectKind,
    children: SmallVec<[Option<Box<EffectNode>>; 2]>,
    parent: Option<NodeId>,
    flags: NodeFlags,
    usage: SampleUsage,
    optimization: OptimizationFlags,
    requested: Capabilities,
}

impl EffectNode {
    /// Create a childless node of `kind`.
    ///
    /// Intrinsic flags (destination reads, direct coordinate use) and capabilities are derived
    /// from the kind. Children must be attached with [`EffectNode::register_child`].
    pub fn new(kind: EffectKind, optimization: OptimizationFlags) -> Box<Self> {
        Box::new(Self {
            id: NodeId::next(),
            flags: kind.intrinsic_flags(),
            requested: kind.intrinsic_capabilities(),
            kind,
            children: SmallVec::new(),
            parent: None,
            usage: SampleUsage::unsampled(),
            optimization,
        })
    }

    /// Process-unique identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Variant parameters.
    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    /// Stable type tag.
    pub fn class_id(&self) -> ClassId {
        self.kind.class_id()
    }

    /// Variant name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The node that registered this one as a child, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Sampling usage recorded by the parent.
    pub fn sample_usage(&self) -> SampleUsage {
        self.usage
    }

    /// Tree-propagated flags.
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Optimization flags.
    pub fn optimization_flags(&self) -> OptimizationFlags {
        self.optimization
    }

    /// Optimization flags of an optional node; an absent node passes its input through and
    /// therefore has every optimization property.
    pub fn optimization_flags_of(node: Option<&EffectNode>) -> OptimizationFlags {
        node.map_or(OptimizationFlags::all(), |n| n.optimization)
    }

    pub fn preserves_opaque_input(&self) -> bool {
        self.optimization
            .contains(OptimizationFlags::PRESERVES_OPAQUE_INPUT)
    }

    pub fn has_constant_output_for_constant_input(&self) -> bool {
        self.optimization
            .contains(OptimizationFlags::CONSTANT_OUTPUT_FOR_CONSTANT_INPUT)
    }

    pub fn uses_coords_directly(&self) -> bool {
        self.flags.contains(NodeFlags::USES_COORDS_DIRECTLY)
    }

    pub fn uses_coords_indirectly(&self) -> bool {
        self.flags.contains(NodeFlags::USES_COORDS_INDIRECTLY)
    }

    /// Reads the sample coordinate directly or through a descendant.
    pub fn uses_coords(&self) -> bool {
        self.flags
            .intersects(NodeFlags::USES_COORDS_DIRECTLY | NodeFlags::USES_COORDS_INDIRECTLY)
    }

    pub fn is_sampled_with_explicit_coords(&self) -> bool {
        self.flags
            .contains(NodeFlags::SAMPLED_WITH_EXPLICIT_COORDS)
    }

    pub fn has_perspective_transform(&self) -> bool {
        self.flags.contains(NodeFlags::NET_PERSPECTIVE)
    }

    pub fn will_read_dst_color(&self) -> bool {
        self.flags.contains(NodeFlags::WILL_READ_DST_COLOR)
    }

    /// Union of the backend capabilities requested by this subtree.
    pub fn requested_capabilities(&self) -> Capabilities {
        self.requested
    }

    /// Number of child slots, absent ones included.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn num_non_null_children(&self) -> usize {
        self.children.iter().filter(|c| c.is_some()).count()
    }

    /// Child in slot `i`; `None` for an absent slot or an out-of-range index.
    pub fn child(&self, i: usize) -> Option<&EffectNode> {
        self.children.get(i).and_then(|c| c.as_deref())
    }

    /// Mutable access to the child in slot `i`, for leaf parameter updates.
    pub fn child_mut(&mut self, i: usize) -> Option<&mut EffectNode> {
        self.children.get_mut(i).and_then(|c| c.as_deref_mut())
    }

    /// Child slots in order, with `None` for absent slots.
    pub fn children(&self) -> impl ExactSizeIterator<Item = Option<&EffectNode>> + '_ {
        self.children.iter().map(|c| c.as_deref())
    }

    /// Pre-order walk over this subtree.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter::new([self])
    }

    /// Replace the literal of a constant-color node in place.
    ///
    /// The opacity of the color cannot change because ancestors derived their optimization
    /// flags from it.
    pub fn set_literal_color(&mut self, new_color: PmColor4f) -> FxResult<()> {
        let EffectKind::Color { color } = &mut self.kind else {
            return Err(FxError::validation(format!(
                "'{}' has no literal color",
                self.kind.name()
            )));
        };
        if color.is_opaque() != new_color.is_opaque() {
            return Err(FxError::validation(
                "literal color update cannot change opacity",
            ));
        }
        *color = new_color;
        Ok(())
    }

    /// Attach `child` in the next slot, recording `usage` on it and propagating flags.
    ///
    /// A `None` child occupies a slot without affecting flags or sibling indices. The child
    /// must be fresh (no parent, no sampling state) and `self` must not be attached yet:
    /// registration always happens bottom-up.
    pub fn register_child(&mut self, child: Option<Box<EffectNode>>, usage: SampleUsage) {
        let Some(mut child) = child else {
            self.children.push(None);
            return;
        };

        debug_assert!(
            child.parent.is_none()
                && !child.usage.is_sampled()
                && !child.is_sampled_with_explicit_coords()
                && !child.has_perspective_transform(),
            "child '{}' is already attached or carries sampling state",
            child.name()
        );

        child.usage = usage;

        if usage.is_explicit() {
            child.add_and_push_flag_to_children(NodeFlags::SAMPLED_WITH_EXPLICIT_COORDS);
        }
        if usage.has_perspective {
            child.add_and_push_flag_to_children(NodeFlags::NET_PERSPECTIVE);
        }

        if child.will_read_dst_color() {
            self.flags |= NodeFlags::WILL_READ_DST_COLOR;
        }

        // An explicitly sampled child resolves its own coordinates, hiding any coordinate
        // use below it from this node.
        if !child.is_sampled_with_explicit_coords() && child.uses_coords() {
            self.flags |= NodeFlags::USES_COORDS_INDIRECTLY;
        }

        self.requested |= child.requested;

        tracing::trace!(
            parent = self.name(),
            child = child.name(),
            slot = self.children.len(),
            "register child"
        );

        child.parent = Some(self.id);
        self.children.push(Some(child));

        debug_assert!(
            !self.is_sampled_with_explicit_coords()
                && !self.has_perspective_transform()
                && !self.usage.is_sampled()
                && self.parent.is_none(),
            "'{}' registered a child after being attached itself",
            self.name()
        );
    }

    fn add_and_push_flag_to_children(&mut self, flag: NodeFlags) {
        // Propagation is monotonic: a flagged node already has flagged descendants.
        if self.flags.contains(flag) {
            return;
        }
        self.flags |= flag;
        for child in self.children.iter_mut().flatten() {
            child.add_and_push_flag_to_children(flag);
        }
    }

    /// Structural equality: type tag, direct coordinate use, own parameters, then children
    /// pairwise with absent slots compared positionally.
    pub fn is_equal(&self, other: &EffectNode) -> bool {
        if self.class_id() != other.class_id() {
            return false;
        }
        if self.uses_coords_directly() != other.uses_coords_directly() {
            return false;
        }
        if self.kind != other.kind {
            return false;
        }
        if self.children.len() != other.children.len() {
            return false;
        }
        self.children().zip(other.children()).all(|pair| match pair {
            (None, None) => true,
            (Some(a), Some(b)) => a.is_equal(b),
            _ => false,
        })
    }

    /// Deep copy of this subtree. Children are re-registered so every derived flag is
    /// recomputed; the copy is a fresh root.
    pub fn clone_boxed(&self) -> Box<EffectNode> {
        let mut out = EffectNode::new(self.kind.clone(), self.optimization);
        for child in self.children() {
            match child {
                Some(c) => out.register_child(Some(c.clone_boxed()), c.usage),
                None => out.register_child(None, SampleUsage::pass_through()),
            }
        }
        out
    }

    /// Output for a constant `input`, computed on the CPU.
    ///
    /// Fails unless the node carries
    /// [`OptimizationFlags::CONSTANT_OUTPUT_FOR_CONSTANT_INPUT`].
    pub fn constant_output(&self, input: PmColor4f) -> FxResult<PmColor4f> {
        if !self.has_constant_output_for_constant_input() {
            return Err(FxError::evaluation(format!(
                "'{}' has no constant output for a constant input",
                self.name()
            )));
        }

        let out = match &self.kind {
            EffectKind::Color { color } => *color,
            EffectKind::OverrideInput { color, .. } => self.child_output(0, *color)?,
            EffectKind::Swizzle { swizzle } => swizzle.apply_to(self.child_output(0, input)?),
            EffectKind::Premul => {
                let child = self.child_output(0, PmColor4f::WHITE)?;
                Color4f::new(input.r, input.g, input.b, input.a)
                    .premul()
                    .mul(child)
            }
            EffectKind::Compose => {
                let g = self.child_output(1, input)?;
                self.child_output(0, g)?
            }
            EffectKind::Blend { mode, behavior } => {
                let probe = match behavior {
                    BlendBehavior::SkMode => input,
                    _ => PmColor4f::WHITE,
                };
                let src = self.child(0).map(|c| c.constant_output(probe)).transpose()?;
                let dst = self.child(1).map(|c| c.constant_output(probe)).transpose()?;
                blend_constant(*mode, *behavior, src, dst, input)
            }
            EffectKind::ColorMatrix(cm) => cm.apply(self.child_output(0, input)?),
            EffectKind::Clamp { premul } => {
                let c = self.child_output(0, input)?;
                if *premul {
                    let a = c.a.clamp(0.0, 1.0);
                    PmColor4f::new(c.r.clamp(0.0, a), c.g.clamp(0.0, a), c.b.clamp(0.0, a), a)
                } else {
                    c.saturate()
                }
            }
            EffectKind::Matrix { .. } | EffectKind::DeviceSpace => self.child_output(0, input)?,
            EffectKind::DestColor | EffectKind::LinearGradient { .. } => {
                return Err(FxError::evaluation(format!(
                    "'{}' cannot be evaluated on the CPU",
                    self.name()
                )));
            }
        };
        Ok(out)
    }

    fn child_output(&self, i: usize, input: PmColor4f) -> FxResult<PmColor4f> {
        constant_output_for_constant_input(self.child(i), input)
    }

    /// Whether the output is independent of the input color.
    pub(crate) fn ignores_input(&self) -> bool {
        let child_ignores = |i: usize| self.child(i).is_some_and(EffectNode::ignores_input);
        match &self.kind {
            EffectKind::Color { .. }
            | EffectKind::OverrideInput { .. }
            | EffectKind::DestColor
            | EffectKind::LinearGradient { .. } => true,
            EffectKind::Swizzle { .. }
            | EffectKind::ColorMatrix(_)
            | EffectKind::Clamp { .. }
            | EffectKind::DeviceSpace
            | EffectKind::Matrix { .. } => child_ignores(0),
            EffectKind::Premul => false,
            EffectKind::Compose => child_ignores(0) || child_ignores(1),
            EffectKind::Blend {
                behavior: BlendBehavior::SkMode,
                ..
            } => child_ignores(0) && child_ignores(1),
            EffectKind::Blend { .. } => false,
        }
    }

    /// One-line description of this node.
    pub fn dump_info(&self) -> String {
        let params = self.kind.dump_params();
        if params.is_empty() {
            self.name().to_string()
        } else {
            format!("{}({params})", self.name())
        }
    }

    /// Multi-line description of this subtree, one `(#i) -> ` line per child slot.
    pub fn dump_tree_info(&self) -> String {
        fn recurse(node: &EffectNode, indent: &str, text: &mut String) {
            for (i, child) in node.children().enumerate() {
                text.push_str(&format!("\n{indent}(#{i}) -> "));
                match child {
                    Some(c) => {
                        text.push_str(&c.dump_info());
                        recurse(c, &format!("{indent}\t"), text);
                    }
                    None => text.push_str("null"),
                }
            }
        }

        let mut text = self.dump_info();
        recurse(self, "\t", &mut text);
        text.push('\n');
        text
    }

    /// Append this subtree's program-key fragment.
    ///
    /// The fragment depends only on state compared by [`EffectNode::is_equal`], so equal
    /// subtrees write identical words. Child sampling usage is written by the parent.
    pub fn add_to_key(&self, b: &mut KeyBuilder) {
        b.add32(self.class_id() as u32);
        b.add_bool(self.uses_coords_directly());
        self.kind.add_key_fields(b);
        b.add32(self.children.len() as u32);
        for child in self.children() {
            match child {
                Some(c) => {
                    b.add32(c.usage.key_bits());
                    c.add_to_key(b);
                }
                None => b.add32(NULL_CHILD_KEY),
            }
        }
    }

    /// Build the code-emission mirror of this subtree.
    pub fn make_program_impl(&self) -> ProgramImpl {
        ProgramImpl::mirror(self)
    }
}

impl Clone for EffectNode {
    fn clone(&self) -> Self {
        *self.clone_boxed()
    }
}

impl PartialEq for EffectNode {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

/// CPU output of an optional node for a constant input; an absent node is the identity.
pub fn constant_output_for_constant_input(
    node: Option<&EffectNode>,
    input: PmColor4f,
) -> FxResult<PmColor4f> {
    match node {
        Some(n) => n.constant_output(input),
        None => Ok(input),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/tree.rs"]
mod tests;
