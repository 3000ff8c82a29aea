use regex_automata::meta::Regex;

use super::substitution::{compile, replace_all};
use super::{CommandMarker, ConversionResult, Converter};
use crate::comment::Comment;
use crate::error::EngineResult;

/// A `\cmd` or `@cmd` that starts a word: preceded by line start or by a
/// character that cannot belong to a word, path or address
const COMMAND_PATTERN: &str = r"(?m)(?P<lead>^|[^\w\\@.])[\\@](?P<cmd>[A-Za-z][A-Za-z0-9_]*)";

/// Rewrites Doxygen command markers to one prefix
#[derive(Debug, Clone)]
pub struct CommandMarkerConverter {
    target: CommandMarker,
    pattern: Regex,
    replacement: String,
}

impl CommandMarkerConverter {
    pub fn new(target: CommandMarker) -> EngineResult<Self> {
        Ok(Self {
            target,
            pattern: compile(COMMAND_PATTERN)?,
            replacement: format!("${{lead}}{}${{cmd}}", target.as_char()),
        })
    }

    pub fn target(&self) -> CommandMarker {
        self.target
    }

    /// Rewrite command markers in arbitrary text
    pub fn normalize(&self, text: &str) -> String {
        replace_all(&self.pattern, text, &self.replacement)
    }
}

impl Converter for CommandMarkerConverter {
    fn convert(&self, comment: &Comment) -> ConversionResult {
        if !comment.style().is_doxygen() {
            return ConversionResult::unsupported(format!(
                "{} is not a doxygen style",
                comment.style()
            ));
        }
        let normalized = self.normalize(comment.text());
        if normalized == comment.text() {
            ConversionResult::empty(format!("markers already {}", self.target))
        } else {
            ConversionResult::Present(normalized)
        }
    }

    fn name(&self) -> &'static str {
        "markers"
    }
}
