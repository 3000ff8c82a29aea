use regex_automata::meta::Regex;

use super::{ConversionResult, Converter};
use crate::comment::Comment;
use crate::error::{EngineError, EngineResult};

/// Compile `pattern`, reporting failures as [`EngineError::InvalidPattern`]
pub(crate) fn compile(pattern: &str) -> EngineResult<Regex> {
    Regex::new(pattern).map_err(|e| EngineError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Replace every match of `re` in `haystack`, expanding `$n` / `${name}`
/// references in `replacement`
pub(crate) fn replace_all(re: &Regex, haystack: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for caps in re.captures_iter(haystack) {
        let Some(mat) = caps.get_match() else {
            continue;
        };
        out.push_str(&haystack[last..mat.start()]);
        caps.interpolate_string_into(haystack, replacement, &mut out);
        last = mat.end();
    }
    out.push_str(&haystack[last..]);
    out
}

/// Regex find-and-replace over the raw comment text, delimiters included
#[derive(Debug, Clone)]
pub struct SubstitutionConverter {
    pattern: Regex,
    replacement: String,
}

impl SubstitutionConverter {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> EngineResult<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            replacement: replacement.into(),
        })
    }
}

impl Converter for SubstitutionConverter {
    fn convert(&self, comment: &Comment) -> ConversionResult {
        let replaced = replace_all(&self.pattern, comment.text(), &self.replacement);
        if replaced == comment.text() {
            ConversionResult::empty("no match")
        } else {
            ConversionResult::Present(replaced)
        }
    }

    fn name(&self) -> &'static str {
        "substitute"
    }
}
