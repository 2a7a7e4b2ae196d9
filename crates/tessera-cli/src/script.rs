//! Line-oriented edit scripts for `tessera run`.
//!
//! One command per line; blank lines and lines starting with `#` are
//! ignored:
//!
//! ```text
//! apply roof zinc
//! apply door oak
//! remove door
//! undo
//! redo
//! ```

use anyhow::{bail, Result};
use tessera_ir::{MaterialId, PartId};

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Apply { part: PartId, material: MaterialId },
    Remove { part: PartId },
    Undo,
    Redo,
}

/// A parsed step with its 1-based source line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: Step,
}

pub fn parse(text: &str) -> Result<Vec<ScriptLine>> {
    let mut steps = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let words: Vec<&str> = trimmed.split_whitespace().collect();
        let step = match words.as_slice() {
            ["apply", part, material] => Step::Apply {
                part: PartId::from(*part),
                material: MaterialId::from(*material),
            },
            ["remove", part] => Step::Remove {
                part: PartId::from(*part),
            },
            ["undo"] => Step::Undo,
            ["redo"] => Step::Redo,
            _ => bail!("line {line}: cannot parse {trimmed:?}"),
        };
        steps.push(ScriptLine { line, step });
    }
    Ok(steps)
}
