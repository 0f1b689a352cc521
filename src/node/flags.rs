bitflags::bitflags! {
    /// Tree-propagated node properties.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        /// The node reads the incoming sample coordinate itself.
        const USES_COORDS_DIRECTLY = 1 << 0;
        /// A descendant reads coordinates and is not behind an explicit-sampling boundary.
        const USES_COORDS_INDIRECTLY = 1 << 1;
        /// The node (and every descendant) is invoked with caller-supplied coordinates.
        const SAMPLED_WITH_EXPLICIT_COORDS = 1 << 2;
        /// The sampling matrix chain above this node includes a perspective transform.
        const NET_PERSPECTIVE = 1 << 3;
        /// The node or a descendant reads the destination color.
        const WILL_READ_DST_COLOR = 1 << 4;
    }
}

bitflags::bitflags! {
    /// Optimization properties, independent of the tree flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OptimizationFlags: u32 {
        /// Output is opaque whenever the input is opaque.
        const PRESERVES_OPAQUE_INPUT = 1 << 0;
        /// Output can be computed on the CPU from a constant input.
        const CONSTANT_OUTPUT_FOR_CONSTANT_INPUT = 1 << 1;
    }
}

bitflags::bitflags! {
    /// Backend features requested by a node; the union over a subtree is visible at its root.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        /// Access to the fragment position.
        const FRAG_COORD = 1 << 0;
    }
}

/// How a child's sample coordinate relates to its parent's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleKind {
    /// Not attached to a parent yet.
    #[default]
    None,
    /// Sampled with the parent's coordinate unchanged.
    PassThrough,
    /// Sampled with the parent's coordinate mapped by a uniform matrix.
    UniformMatrix,
    /// Sampled with coordinates computed by the parent at emission time.
    Explicit,
}

/// Sampling descriptor recorded on a child at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SampleUsage {
    /// Coordinate relation to the parent.
    pub kind: SampleKind,
    /// Whether the mapping includes a perspective divide.
    pub has_perspective: bool,
}

impl SampleUsage {
    /// Usage of a node that is not attached to any parent.
    pub const fn unsampled() -> Self {
        Self {
            kind: SampleKind::None,
            has_perspective: false,
        }
    }

    /// Child sampled with the parent's coordinates.
    pub const fn pass_through() -> Self {
        Self {
            kind: SampleKind::PassThrough,
            has_perspective: false,
        }
    }

    /// Child sampled with coordinates supplied explicitly by the parent.
    pub const fn explicit() -> Self {
        Self {
            kind: SampleKind::Explicit,
            has_perspective: false,
        }
    }

    /// Child sampled through a uniform matrix.
    pub const fn uniform_matrix(has_perspective: bool) -> Self {
        Self {
            kind: SampleKind::UniformMatrix,
            has_perspective,
        }
    }

    /// Return `true` once the usage has been set by a parent.
    pub fn is_sampled(self) -> bool {
        self.kind != SampleKind::None
    }

    /// Return `true` for explicit sampling.
    pub fn is_explicit(self) -> bool {
        self.kind == SampleKind::Explicit
    }

    /// Return `true` for uniform-matrix sampling.
    pub fn is_uniform_matrix(self) -> bool {
        self.kind == SampleKind::UniformMatrix
    }

    pub(crate) fn key_bits(self) -> u32 {
        let kind = match self.kind {
            SampleKind::None => 0,
            SampleKind::PassThrough => 1,
            SampleKind::UniformMatrix => 2,
            SampleKind::Explicit => 3,
        };
        kind | (u32::from(self.has_perspective) << 2)
    }
}
