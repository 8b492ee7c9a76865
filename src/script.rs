//! Script execution seam.
//!
//! twig does not parse or evaluate scripts itself. An embedding host plugs in
//! an [`Evaluator`] and, optionally, a [`Preprocessor`] that rewrites source
//! before evaluation. When a preprocessor is active, error positions refer to
//! the rewritten text; [`remap_error`] translates them back to the original
//! file, line and column through the preprocessor's [`SourceMap`].

use std::fmt;

use thiserror::Error;
use tracing::trace;

use crate::executer::Executer;

/// A position in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PosInfo {
    pub name: String,
    pub line: usize,
    pub column: usize,
}

impl PosInfo {
    pub fn new(name: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            name: name.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for PosInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.line, self.column)
    }
}

/// An error reported by an evaluator or preprocessor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// Error with a structured position
    #[error("{pos}: {message}")]
    Positioned { pos: PosInfo, message: String },

    /// Free-form error, usually `name:line:col: message`
    #[error("{0}")]
    Message(String),
}

impl ScriptError {
    pub fn positioned(pos: PosInfo, message: impl Into<String>) -> Self {
        ScriptError::Positioned {
            pos,
            message: message.into(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        ScriptError::Message(message.into())
    }

    pub fn pos(&self) -> Option<&PosInfo> {
        match self {
            ScriptError::Positioned { pos, .. } => Some(pos),
            ScriptError::Message(_) => None,
        }
    }
}

/// Parses and evaluates a script against an executer.
pub trait Evaluator {
    fn eval(&self, exec: &mut Executer, name: &str, code: &str) -> Result<(), ScriptError>;
}

impl<F> Evaluator for F
where
    F: Fn(&mut Executer, &str, &str) -> Result<(), ScriptError>,
{
    fn eval(&self, exec: &mut Executer, name: &str, code: &str) -> Result<(), ScriptError> {
        (self)(exec, name, code)
    }
}

/// Maps positions in preprocessed text back to the original source.
pub trait SourceMap {
    /// Original position of `line`/`column` in the processed text.
    fn offset_lc(&self, line: usize, column: usize) -> Option<PosInfo>;
}

/// Output of a [`Preprocessor`].
pub struct Processed {
    pub code: String,
    pub map: Box<dyn SourceMap>,
}

impl fmt::Debug for Processed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processed")
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}

/// Rewrites script source before evaluation.
pub trait Preprocessor {
    fn process(&self, name: &str, code: &str) -> Result<Processed, ScriptError>;
}

/// Line-granular [`SourceMap`].
///
/// Entry `i` records the origin of processed line `i + 1`. Columns are
/// passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTable {
    lines: Vec<(String, usize)>,
}

impl LineTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the next processed line came from `name:line`.
    pub fn push(&mut self, name: impl Into<String>, line: usize) {
        self.lines.push((name.into(), line));
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl SourceMap for LineTable {
    fn offset_lc(&self, line: usize, column: usize) -> Option<PosInfo> {
        let (name, origin) = self.lines.get(line.checked_sub(1)?)?;
        Some(PosInfo::new(name.clone(), *origin, column))
    }
}

/// Translate an error raised on preprocessed text back to original positions.
///
/// Positioned errors are mapped through `map`. Message errors of the form
/// `name:line:col: message` are parsed and rewritten; anything else is
/// returned unchanged.
pub fn remap_error(name: &str, map: &dyn SourceMap, err: ScriptError) -> ScriptError {
    match err {
        ScriptError::Positioned { pos, message } => {
            let pos = map.offset_lc(pos.line, pos.column).unwrap_or(pos);
            ScriptError::Positioned { pos, message }
        }
        ScriptError::Message(text) => match remap_message(name, map, &text) {
            Some(remapped) => ScriptError::Message(remapped),
            None => {
                trace!(script = %name, "error message has no position, not remapped");
                ScriptError::Message(text)
            }
        },
    }
}

fn remap_message(name: &str, map: &dyn SourceMap, text: &str) -> Option<String> {
    let rest = text.strip_prefix(name)?;
    let mut parts: Vec<String> = rest.split(':').map(str::to_string).collect();
    if parts.len() < 4 || !parts[0].is_empty() {
        return None;
    }
    let line: usize = parts[1].parse().ok()?;
    let column: usize = parts[2].parse().ok()?;

    let pos = map
        .offset_lc(line, column)
        .unwrap_or_else(|| PosInfo::new(name, line, column));
    parts[0] = pos.name;
    parts[1] = pos.line.to_string();
    parts[2] = pos.column.to_string();
    Some(parts.join(":"))
}
