// WHY: The only strategy with side effects. The backend call blocks until it returns
// text or an error; async callers run it through spawn_blocking

use std::sync::OnceLock;

use regex_automata::meta::Regex;
use tracing::{debug, warn};

use super::substitution::compile;
use super::{CommandMarker, CommandMarkerConverter, ConversionResult, Converter};
use crate::comment::{extract, find_comment_groups, render, Comment, CommentStyle};
use crate::error::EngineResult;

/// First content line of every generated comment
pub const AI_GENERATED: &str = "AI_GENERATED";

/// Style all generated comments are rendered in
const GENERATED_STYLE: CommentStyle = CommentStyle::JavadocBlock;

const DEFAULT_SYSTEM_PROMPT: &str = "You document C and C++ code. Rewrite the comment \
you are given as Doxygen documentation for the declaration that follows it. Answer with \
a single comment and nothing else.";

/// Consecutive lines that each begin with `//`
const LINE_RUN: &str = r"(?m)(?:^[ \t]*//[^\n]*(?:\n|$))+";
/// Shortest `/* ... */` span
const BLOCK_RUN: &str = r"(?s)/\*.*?\*/";

/// Text generation service used to rewrite comments
pub trait LlmBackend: Send + Sync {
    fn call(&self, system: &str, user: &str) -> anyhow::Result<String>;
}

impl<F> LlmBackend for F
where
    F: Fn(&str, &str) -> anyhow::Result<String> + Send + Sync,
{
    fn call(&self, system: &str, user: &str) -> anyhow::Result<String> {
        self(system, user)
    }
}

fn comment_runs() -> &'static EngineResult<(Regex, Regex)> {
    static RUNS: OnceLock<EngineResult<(Regex, Regex)>> = OnceLock::new();
    RUNS.get_or_init(|| Ok((compile(LINE_RUN)?, compile(BLOCK_RUN)?)))
}

/// Content of the first comment found in `response`
///
/// A maximal run of line comments wins over any block comment.
pub fn extract_response_comment(response: &str) -> EngineResult<Option<String>> {
    let (line_run, block_run) = comment_runs().as_ref().map_err(Clone::clone)?;
    let Some(found) = line_run.find(response).or_else(|| block_run.find(response)) else {
        return Ok(None);
    };
    let snippet = response[found.range()].trim();

    let Some(group) = find_comment_groups(snippet).into_iter().next() else {
        return Ok(None);
    };
    let content = extract(group.text(snippet), group.style)?;
    Ok((!content.trim().is_empty()).then_some(content))
}

/// Documents function-like declarations through an [`LlmBackend`]
pub struct GeneratingConverter<B: LlmBackend> {
    backend: B,
    markers: CommandMarkerConverter,
    system_prompt: String,
}

impl<B: LlmBackend> GeneratingConverter<B> {
    pub fn new(backend: B) -> EngineResult<Self> {
        Self::with_marker(backend, CommandMarker::default())
    }

    /// Generated command markers are rewritten to `marker`
    pub fn with_marker(backend: B, marker: CommandMarker) -> EngineResult<Self> {
        Ok(Self {
            backend,
            markers: CommandMarkerConverter::new(marker)?,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        })
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

impl<B: LlmBackend> Converter for GeneratingConverter<B> {
    fn convert(&self, comment: &Comment) -> ConversionResult {
        let Some(symbol) = comment.symbol() else {
            return ConversionResult::unsupported("no documented symbol");
        };
        if !symbol.symbol_type.is_function_like() {
            return ConversionResult::unsupported(format!(
                "{:?} is not function-like",
                symbol.symbol_type
            ));
        }
        if comment.style().is_doxygen() {
            return ConversionResult::empty(format!("already {}", comment.style()));
        }

        let content = match comment.content() {
            Ok(content) => content,
            Err(e) => return ConversionResult::error(e.to_string()),
        };
        let prompt = format!("{}\n{}", render(&content, comment.style(), ""), symbol.text);

        debug!("Requesting documentation for `{}`", symbol.text);
        let response = match self.backend.call(&self.system_prompt, &prompt) {
            Ok(response) => response,
            Err(e) => {
                warn!("Backend call failed for `{}`: {:#}", symbol.text, e);
                return ConversionResult::error(format!("backend call failed: {e:#}"));
            }
        };

        let generated = match extract_response_comment(&response) {
            Ok(Some(generated)) => generated,
            Ok(None) => return ConversionResult::error("no comment found in backend response"),
            Err(e) => return ConversionResult::error(e.to_string()),
        };
        let generated = self.markers.normalize(&generated);
        if let Some(end) = GENERATED_STYLE.end_delimiter() {
            if generated.contains(end) {
                return ConversionResult::error(format!("generated content contains `{end}`"));
            }
        }

        let content = format!("{AI_GENERATED}\n{generated}");
        ConversionResult::Present(render(&content, GENERATED_STYLE, &symbol.indentation))
    }

    fn name(&self) -> &'static str {
        "generate"
    }
}
