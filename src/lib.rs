//! fxtree builds trees of per-pixel color effects and turns them into shader programs.
//!
//! - Build a tree bottom-up with the factories in [`effects`]; registration propagates
//!   coordinate, sampling, perspective and destination-read flags immediately
//! - Compare trees structurally with [`EffectNode::is_equal`] and deep-copy them with
//!   [`EffectNode::clone_boxed`]
//! - Compute a [`ProgramKey`] and emit shader source with [`build_program`]
//! - Walk one or more trees in pre-order with [`NodeIter`]
#![forbid(unsafe_code)]

mod codegen;
mod foundation;
mod node;
mod paint;
mod schema;

pub mod effects;

pub use crate::foundation::core::{Color4f, Matrix3, PmColor4f};
pub use crate::foundation::error::{FxError, FxResult};
pub use crate::foundation::ids::{ClassId, NodeId};

pub use crate::node::flags::{Capabilities, NodeFlags, OptimizationFlags, SampleKind, SampleUsage};
pub use crate::node::iter::NodeIter;
pub use crate::node::kind::EffectKind;
pub use crate::node::tree::{EffectNode, constant_output_for_constant_input};

pub use crate::paint::{Paint, Stage};

pub use crate::codegen::{
    FragmentProgram, KeyBuilder, ProgramFingerprint, ProgramImpl, ProgramKey, ShaderBuilder,
    UniformData, UniformDecl, UniformType, build_program,
};
pub use crate::schema::{ColorDesc, EffectDesc, MatrixDesc, ProgramOpts};
