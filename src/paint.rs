use crate::node::iter::NodeIter;
use crate::node::tree::EffectNode;

/// The color and coverage effect trees of one draw.
#[derive(Debug, Default)]
pub struct Paint {
    color: Option<Box<EffectNode>>,
    coverage: Option<Box<EffectNode>>,
}

impl Paint {
    pub fn new(color: Option<Box<EffectNode>>, coverage: Option<Box<EffectNode>>) -> Self {
        Self { color, coverage }
    }

    pub fn color(&self) -> Option<&EffectNode> {
        self.color.as_deref()
    }

    pub fn coverage(&self) -> Option<&EffectNode> {
        self.coverage.as_deref()
    }

    /// Every node of both trees, color tree first.
    pub fn nodes(&self) -> NodeIter<'_> {
        NodeIter::from_paint(self)
    }
}

/// Ordered effect roots attached to a rendering stage: color roots, then coverage roots.
#[derive(Debug, Default)]
pub struct Stage {
    roots: Vec<Box<EffectNode>>,
    num_color: usize,
}

impl Stage {
    pub fn push_color(&mut self, fp: Box<EffectNode>) {
        self.roots.insert(self.num_color, fp);
        self.num_color += 1;
    }

    pub fn push_coverage(&mut self, fp: Box<EffectNode>) {
        self.roots.push(fp);
    }

    pub fn num_color_roots(&self) -> usize {
        self.num_color
    }

    pub fn num_roots(&self) -> usize {
        self.roots.len()
    }

    /// Roots in stage order.
    pub fn roots(&self) -> impl DoubleEndedIterator<Item = &EffectNode> + '_ {
        self.roots.iter().map(|r| r.as_ref())
    }

    /// Every node of every root, in stage order.
    pub fn nodes(&self) -> NodeIter<'_> {
        NodeIter::from_stage(self)
    }

    /// Return `true` when any attached tree reads the destination color.
    pub fn will_read_dst_color(&self) -> bool {
        self.roots().any(EffectNode::will_read_dst_color)
    }
}
