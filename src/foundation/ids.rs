use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of an effect node.
///
/// Used as the non-owning child-to-parent link. Clones receive fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Stable type tag of a node variant.
///
/// The numeric values are written into program keys and must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ClassId {
    /// Constant color.
    Color = 1,
    /// Child evaluated with a fixed input color.
    OverrideInput = 2,
    /// Destination (backdrop) color read.
    DestColor = 3,
    /// Channel permutation.
    Swizzle = 4,
    /// Premultiply input and multiply by child output.
    Premul = 5,
    /// `f(g(x))`.
    Compose = 6,
    /// Blend of two operands.
    Blend = 7,
    /// Affine color transform.
    ColorMatrix = 8,
    /// Saturating clamp.
    Clamp = 9,
    /// Child sampled at the fragment position.
    DeviceSpace = 10,
    /// Child sampled through a coordinate matrix.
    Matrix = 11,
    /// Two-stop linear gradient.
    LinearGradient = 12,
}
