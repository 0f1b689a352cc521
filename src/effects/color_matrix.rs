use crate::foundation::core::PmColor4f;
use crate::foundation::error::{FxError, FxResult};
use crate::node::flags::{OptimizationFlags, SampleUsage};
use crate::node::kind::EffectKind;
use crate::node::tree::EffectNode;

/// A 4x5 row-major color transform with compile-time toggles.
///
/// Row `i` computes output channel `i` as `m[i*5..i*5+4] · rgba + m[i*5+4]`.
#[derive(Clone, Copy, Debug)]
pub struct ColorMatrix {
    /// Row-major 4x5 coefficients.
    pub matrix: [f32; 20],
    /// Unpremultiply the input before the transform.
    pub unpremul_input: bool,
    /// Clamp all channels; otherwise only alpha is clamped.
    pub clamp_rgb_output: bool,
    /// Premultiply the output after clamping.
    pub premul_output: bool,
}

impl ColorMatrix {
    /// Build from a slice that must hold exactly 20 finite coefficients.
    pub fn from_slice(
        m: &[f32],
        unpremul_input: bool,
        clamp_rgb_output: bool,
        premul_output: bool,
    ) -> FxResult<Self> {
        let matrix: [f32; 20] = m.try_into().map_err(|_| {
            FxError::validation(format!(
                "color matrix needs 20 coefficients, got {}",
                m.len()
            ))
        })?;
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(FxError::validation(
                "color matrix coefficients must be finite",
            ));
        }
        Ok(Self {
            matrix,
            unpremul_input,
            clamp_rgb_output,
            premul_output,
        })
    }

    /// Apply the transform on the CPU.
    pub fn apply(&self, input: PmColor4f) -> PmColor4f {
        let v = if self.unpremul_input {
            let c = input.unpremul();
            [c.r, c.g, c.b, c.a]
        } else {
            input.to_array()
        };

        let mut out = [0.0f32; 4];
        for (i, o) in out.iter_mut().enumerate() {
            let row = &self.matrix[i * 5..i * 5 + 5];
            *o = row[0] * v[0] + row[1] * v[1] + row[2] * v[2] + row[3] * v[3] + row[4];
        }

        let mut c = PmColor4f::from_array(out);
        if self.clamp_rgb_output {
            c = c.saturate();
        } else {
            c.a = c.a.clamp(0.0, 1.0);
        }
        if self.premul_output {
            c = PmColor4f::new(c.r * c.a, c.g * c.a, c.b * c.a, c.a);
        }
        c
    }

    /// The 4x4 part in column-major order.
    pub(crate) fn columns(&self) -> [f32; 16] {
        let mut out = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = self.matrix[row * 5 + col];
            }
        }
        out
    }

    /// The translation column.
    pub(crate) fn offset(&self) -> [f32; 4] {
        [
            self.matrix[4],
            self.matrix[9],
            self.matrix[14],
            self.matrix[19],
        ]
    }
}

impl PartialEq for ColorMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.unpremul_input == other.unpremul_input
            && self.clamp_rgb_output == other.clamp_rgb_output
            && self.premul_output == other.premul_output
            && self
                .matrix
                .iter()
                .zip(other.matrix.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

/// Apply `cm` to the output of `child`, or to the input color when `child` is absent.
pub fn color_matrix(child: Option<Box<EffectNode>>, cm: ColorMatrix) -> Box<EffectNode> {
    let flags = EffectNode::optimization_flags_of(child.as_deref())
        & OptimizationFlags::CONSTANT_OUTPUT_FOR_CONSTANT_INPUT;
    let mut node = EffectNode::new(EffectKind::ColorMatrix(cm), flags);
    node.register_child(child, SampleUsage::pass_through());
    node
}

/// Clamp every channel of `fp`'s output into `[0, 1]`. Returns `None` for a `None` child.
pub fn clamp_output(fp: Option<Box<EffectNode>>) -> Option<Box<EffectNode>> {
    make_clamp(fp?, false)
}

/// Clamp alpha into `[0, 1]` and rgb into `[0, alpha]`. Returns `None` for a `None` child.
pub fn clamp_premul_output(fp: Option<Box<EffectNode>>) -> Option<Box<EffectNode>> {
    make_clamp(fp?, true)
}

fn make_clamp(fp: Box<EffectNode>, premul: bool) -> Option<Box<EffectNode>> {
    let flags = fp.optimization_flags()
        & (OptimizationFlags::PRESERVES_OPAQUE_INPUT
            | OptimizationFlags::CONSTANT_OUTPUT_FOR_CONSTANT_INPUT);
    let mut node = EffectNode::new(EffectKind::Clamp { premul }, flags);
    node.register_child(Some(fp), SampleUsage::pass_through());
    Some(node)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color_matrix.rs"]
mod tests;
