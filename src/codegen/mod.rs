//! Program keys and shader emission for effect trees.

pub(crate) mod builder;
pub(crate) mod emit;
pub(crate) mod key;
pub(crate) mod program;

pub use builder::{ShaderBuilder, UniformData, UniformDecl, UniformType};
pub use key::{KeyBuilder, ProgramFingerprint, ProgramKey};
pub use program::{FragmentProgram, ProgramImpl, build_program};
