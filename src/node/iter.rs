use crate::node::tree::EffectNode;
use crate::paint::{Paint, Stage};

/// Pre-order walk over one or more effect trees.
///
/// Roots are visited in the order given, each parent before its children and children
/// left to right. Absent child slots are skipped. The walk uses an explicit stack and never
/// mutates the trees.
#[derive(Debug, Clone)]
pub struct NodeIter<'a> {
    stack: Vec<&'a EffectNode>,
}

impl<'a> NodeIter<'a> {
    /// Walk `roots` in order.
    pub fn new<I>(roots: I) -> Self
    where
        I: IntoIterator<Item = &'a EffectNode>,
        I::IntoIter: DoubleEndedIterator,
    {
        Self {
            stack: roots.into_iter().rev().collect(),
        }
    }

    /// Walk the color tree, then the coverage tree, of `paint`.
    pub fn from_paint(paint: &'a Paint) -> Self {
        let mut stack = Vec::with_capacity(2);
        if let Some(coverage) = paint.coverage() {
            stack.push(coverage);
        }
        if let Some(color) = paint.color() {
            stack.push(color);
        }
        Self { stack }
    }

    /// Walk every root attached to `stage`, color roots first.
    pub fn from_stage(stage: &'a Stage) -> Self {
        Self::new(stage.roots())
    }
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a EffectNode;

    fn next(&mut self) -> Option<&'a EffectNode> {
        let node = self.stack.pop()?;
        for i in (0..node.num_children()).rev() {
            if let Some(child) = node.child(i) {
                self.stack.push(child);
            }
        }
        Some(node)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/iter.rs"]
mod tests;
