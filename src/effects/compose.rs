use crate::effects::color::make_color;
use crate::foundation::core::PmColor4f;
use crate::node::flags::SampleUsage;
use crate::node::kind::EffectKind;
use crate::node::tree::EffectNode;

/// What is known about the color entering a series of nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AnalysisColor {
    /// Nothing is known.
    #[default]
    Unknown,
    /// The color is opaque but otherwise unknown.
    Opaque,
    /// The exact color is known.
    Constant(PmColor4f),
}

/// Forward analysis of a series of nodes applied one after another (`series[0]` first).
///
/// Tracks the longest leading run of nodes that can be replaced by a single constant color.
#[derive(Clone, Copy, Debug)]
pub struct ColorAnalysis {
    known: Option<PmColor4f>,
    is_opaque: bool,
    to_eliminate: usize,
    eliminated_color: PmColor4f,
    uses_coords: bool,
    will_read_dst_color: bool,
}

impl ColorAnalysis {
    pub fn new(input: AnalysisColor, series: &[&EffectNode]) -> Self {
        let mut known = match input {
            AnalysisColor::Constant(c) => Some(c),
            _ => None,
        };
        let mut is_opaque = match input {
            AnalysisColor::Unknown => false,
            AnalysisColor::Opaque => true,
            AnalysisColor::Constant(c) => c.is_opaque(),
        };
        let mut to_eliminate = 0;
        let mut eliminated_color = PmColor4f::TRANSPARENT;
        let mut uses_coords = false;
        let mut will_read_dst_color = false;

        for (i, fp) in series.iter().enumerate() {
            let folded = if fp.has_constant_output_for_constant_input() {
                match known {
                    Some(c) => fp.constant_output(c).ok(),
                    None if fp.ignores_input() => {
                        fp.constant_output(PmColor4f::TRANSPARENT).ok()
                    }
                    None => None,
                }
            } else {
                None
            };

            match folded {
                Some(c) => {
                    // Everything up to and including `fp` collapses into `c`.
                    known = Some(c);
                    is_opaque = c.is_opaque();
                    to_eliminate = i + 1;
                    eliminated_color = c;
                    uses_coords = false;
                    will_read_dst_color = false;
                }
                None => {
                    known = None;
                    is_opaque &= fp.preserves_opaque_input();
                    uses_coords |= fp.uses_coords();
                    will_read_dst_color |= fp.will_read_dst_color();
                }
            }
        }

        Self {
            known,
            is_opaque,
            to_eliminate,
            eliminated_color,
            uses_coords,
            will_read_dst_color,
        }
    }

    /// Number of leading nodes replaceable by a constant, with that constant.
    pub fn initial_nodes_to_eliminate(&self) -> Option<(usize, PmColor4f)> {
        if self.to_eliminate == 0 {
            return None;
        }
        Some((self.to_eliminate, self.eliminated_color))
    }

    /// The output of the whole series, when it is constant.
    pub fn output_color(&self) -> Option<PmColor4f> {
        self.known
    }

    /// Whether the series' output is known to be opaque.
    pub fn is_opaque(&self) -> bool {
        self.is_opaque
    }

    /// Whether a node that is not eliminated reads coordinates.
    pub fn uses_coords(&self) -> bool {
        self.uses_coords
    }

    /// Whether a node that is not eliminated reads the destination color.
    pub fn will_read_dst_color(&self) -> bool {
        self.will_read_dst_color
    }
}

/// `f(g(x))`. An absent operand is the identity, so `compose(None, g) == g`.
///
/// Leading constant runs are folded: when `g` alone is constant it becomes a color node, and
/// when the whole composition is constant a single color node is returned.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compose(
    f: Option<Box<EffectNode>>,
    g: Option<Box<EffectNode>>,
) -> Option<Box<EffectNode>> {
    let Some(f) = f else {
        return g;
    };
    let Some(g) = g else {
        return Some(f);
    };

    let analysis = ColorAnalysis::new(AnalysisColor::Unknown, &[g.as_ref(), f.as_ref()]);
    match analysis.initial_nodes_to_eliminate() {
        None => Some(make_compose_node(f, g)),
        Some((1, known)) => {
            tracing::debug!(f = f.name(), g = g.name(), "compose: inner node folded");
            Some(make_compose_node(f, make_color(known)))
        }
        Some((n, known)) => {
            debug_assert!(n <= 2, "eliminated {n} of 2 nodes");
            tracing::debug!(f = f.name(), g = g.name(), "compose: folded to constant");
            Some(make_color(known))
        }
    }
}

fn make_compose_node(f: Box<EffectNode>, g: Box<EffectNode>) -> Box<EffectNode> {
    let flags = f.optimization_flags() & g.optimization_flags();
    let mut node = EffectNode::new(EffectKind::Compose, flags);
    node.register_child(Some(f), SampleUsage::pass_through());
    node.register_child(Some(g), SampleUsage::pass_through());
    node
}

#[cfg(test)]
#[path = "../../tests/unit/effects/compose.rs"]
mod tests;
