//! Factories for the standard node variants.
//!
//! Factories that take an `Option` child and return an `Option` propagate `None`: an absent
//! input produces an absent output.

pub(crate) mod blend;
pub(crate) mod color;
pub(crate) mod color_matrix;
pub(crate) mod compose;
pub(crate) mod coords;
pub(crate) mod premul;
pub(crate) mod swizzle;

pub use blend::{
    BlendBehavior, BlendMode, blend, modulate_alpha, modulate_rgba, mul_child_by_input_alpha,
    mul_input_by_child_alpha,
};
pub use color::{dest_color, make_color, override_input};
pub use color_matrix::{ColorMatrix, clamp_output, clamp_premul_output, color_matrix};
pub use compose::{AnalysisColor, ColorAnalysis, compose};
pub use coords::{device_space, linear_gradient, matrix_effect};
pub use premul::premul_and_mul_by_output;
pub use swizzle::{Swizzle, SwizzleChannel, swizzle_output};
