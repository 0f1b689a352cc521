use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::effects::{
    BlendBehavior, BlendMode, ColorMatrix, Swizzle, blend, clamp_output, clamp_premul_output,
    color_matrix, compose, dest_color, device_space, linear_gradient, make_color, matrix_effect,
    modulate_alpha, modulate_rgba, mul_child_by_input_alpha, mul_input_by_child_alpha,
    override_input, premul_and_mul_by_output, swizzle_output,
};
use crate::foundation::core::{Matrix3, PmColor4f};
use crate::foundation::error::{FxError, FxResult};
use crate::node::tree::EffectNode;

/// A premultiplied color, written as `[r, g, b, a]` or `{ "r": .., "g": .., "b": .., "a": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorDesc {
    Arr([f32; 4]),
    Obj {
        r: f32,
        g: f32,
        b: f32,
        #[serde(default = "one")]
        a: f32,
    },
}

fn one() -> f32 {
    1.0
}

impl ColorDesc {
    pub fn to_color(self) -> FxResult<PmColor4f> {
        match self {
            Self::Arr(c) => PmColor4f::try_from_array(c),
            Self::Obj { r, g, b, a } => PmColor4f::try_from_array([r, g, b, a]),
        }
    }
}

/// A coordinate transform: nine row-major values, or six affine coefficients
/// `[a, b, c, d, e, f]` in kurbo order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatrixDesc {
    Rows([f32; 9]),
    Affine([f64; 6]),
}

impl MatrixDesc {
    pub fn to_matrix(self) -> FxResult<Matrix3> {
        let m = match self {
            Self::Rows(m) => Matrix3::new(m),
            Self::Affine(c) => Matrix3::from(kurbo::Affine::new(c)),
        };
        if m.m.iter().any(|v| !v.is_finite()) {
            return Err(FxError::validation("matrix values must be finite"));
        }
        Ok(m)
    }
}

type Child = Option<Box<EffectDesc>>;

/// JSON description of an effect tree.
///
/// Every variant maps to one factory in [`crate::effects`]; [`EffectDesc::build`] goes
/// through those factories, so null inputs and folding behave exactly as in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectDesc {
    Color {
        color: ColorDesc,
    },
    DestColor,
    OverrideInput {
        #[serde(default)]
        child: Child,
        color: ColorDesc,
        #[serde(default)]
        use_uniform: bool,
    },
    Swizzle {
        #[serde(default)]
        child: Child,
        swizzle: String,
    },
    Premul {
        #[serde(default)]
        child: Child,
    },
    Compose {
        #[serde(default)]
        f: Child,
        #[serde(default)]
        g: Child,
    },
    Blend {
        #[serde(default)]
        src: Child,
        #[serde(default)]
        dst: Child,
        mode: BlendMode,
        #[serde(default)]
        behavior: BlendBehavior,
    },
    MulChildByInputAlpha {
        #[serde(default)]
        child: Child,
    },
    MulInputByChildAlpha {
        #[serde(default)]
        child: Child,
    },
    ModulateAlpha {
        #[serde(default)]
        child: Child,
        color: ColorDesc,
    },
    ModulateRgba {
        #[serde(default)]
        child: Child,
        color: ColorDesc,
    },
    ColorMatrix {
        #[serde(default)]
        child: Child,
        matrix: Vec<f32>,
        #[serde(default)]
        unpremul_input: bool,
        #[serde(default)]
        clamp_rgb_output: bool,
        #[serde(default)]
        premul_output: bool,
    },
    Clamp {
        #[serde(default)]
        child: Child,
        #[serde(default)]
        premul: bool,
    },
    DeviceSpace {
        #[serde(default)]
        child: Child,
    },
    Matrix {
        #[serde(default)]
        child: Child,
        matrix: MatrixDesc,
    },
    LinearGradient {
        start: [f32; 2],
        end: [f32; 2],
        colors: [ColorDesc; 2],
    },
}

impl EffectDesc {
    pub fn from_json(s: &str) -> FxResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> FxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FxError::validation(format!("open effect description '{}': {e}", path.display()))
        })?;
        Ok(serde_json::from_reader(BufReader::new(f))?)
    }

    pub fn to_json_pretty(&self) -> FxResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and build the described tree. `None` when a null-propagating factory
    /// received an absent child.
    pub fn build(&self) -> FxResult<Option<Box<EffectNode>>> {
        let out = match self {
            Self::Color { color } => Some(make_color(color.to_color()?)),
            Self::DestColor => Some(dest_color()),
            Self::OverrideInput {
                child,
                color,
                use_uniform,
            } => override_input(build_child(child)?, color.to_color()?, *use_uniform),
            Self::Swizzle { child, swizzle } => {
                swizzle_output(build_child(child)?, Swizzle::parse(swizzle)?)
            }
            Self::Premul { child } => premul_and_mul_by_output(build_child(child)?),
            Self::Compose { f, g } => compose(build_child(f)?, build_child(g)?),
            Self::Blend {
                src,
                dst,
                mode,
                behavior,
            } => blend(build_child(src)?, build_child(dst)?, *mode, *behavior),
            Self::MulChildByInputAlpha { child } => mul_child_by_input_alpha(build_child(child)?),
            Self::MulInputByChildAlpha { child } => mul_input_by_child_alpha(build_child(child)?),
            Self::ModulateAlpha { child, color } => {
                Some(modulate_alpha(build_child(child)?, color.to_color()?))
            }
            Self::ModulateRgba { child, color } => {
                Some(modulate_rgba(build_child(child)?, color.to_color()?))
            }
            Self::ColorMatrix {
                child,
                matrix,
                unpremul_input,
                clamp_rgb_output,
                premul_output,
            } => {
                let cm = ColorMatrix::from_slice(
                    matrix,
                    *unpremul_input,
                    *clamp_rgb_output,
                    *premul_output,
                )?;
                Some(color_matrix(build_child(child)?, cm))
            }
            Self::Clamp {
                child,
                premul: false,
            } => clamp_output(build_child(child)?),
            Self::Clamp {
                child,
                premul: true,
            } => clamp_premul_output(build_child(child)?),
            Self::DeviceSpace { child } => device_space(build_child(child)?),
            Self::Matrix { child, matrix } => {
                matrix_effect(build_child(child)?, matrix.to_matrix()?)
            }
            Self::LinearGradient { start, end, colors } => {
                if start.iter().chain(end).any(|v| !v.is_finite()) {
                    return Err(FxError::validation("gradient points must be finite"));
                }
                Some(linear_gradient(
                    *start,
                    *end,
                    colors[0].to_color()?,
                    colors[1].to_color()?,
                ))
            }
        };
        Ok(out)
    }
}

fn build_child(child: &Child) -> FxResult<Option<Box<EffectNode>>> {
    match child {
        Some(desc) => desc.build(),
        None => Ok(None),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/desc.rs"]
mod tests;
