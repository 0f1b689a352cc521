use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{FxError, FxResult};

/// Options for [`crate::build_program`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgramOpts {
    /// Name of the generated entry function.
    pub entry_point: String,
    /// Bind group of the uniform block.
    pub uniform_group: u32,
    /// Binding index of the uniform block.
    pub uniform_binding: u32,
    /// Whether trees reading the destination color may be emitted.
    pub allow_dst_read: bool,
}

impl Default for ProgramOpts {
    fn default() -> Self {
        Self {
            entry_point: "main_color".to_string(),
            uniform_group: 0,
            uniform_binding: 0,
            allow_dst_read: true,
        }
    }
}

impl ProgramOpts {
    pub fn from_json(s: &str) -> FxResult<Self> {
        let opts: Self = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_path(path: impl AsRef<Path>) -> FxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FxError::validation(format!("open program options '{}': {e}", path.display()))
        })?;
        let opts: Self = serde_json::from_reader(BufReader::new(f))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check that the entry point is a plain identifier that cannot collide with the
    /// generated `fpN` functions or the reserved globals.
    pub fn validate(&self) -> FxResult<()> {
        let name = self.entry_point.as_str();
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        };
        if !valid {
            return Err(FxError::validation(format!(
                "entry point '{name}' is not an identifier"
            )));
        }
        if name.starts_with("__") || name.starts_with("sk_") || name == "u" {
            return Err(FxError::validation(format!(
                "entry point '{name}' uses a reserved name"
            )));
        }
        if let Some(digits) = name.strip_prefix("fp")
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(FxError::validation(format!(
                "entry point '{name}' collides with a generated function"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/opts.rs"]
mod tests;
