//! Extract, filter, convert and splice one source buffer.

use tracing::{debug, warn};

use crate::comment::{CommentExtractor, SourceCommentExtractor};
use crate::conversion::{ConversionResult, Converter};
use crate::error::EngineResult;
use crate::filter::{AcceptAll, CommentFilter};
use crate::range::Range;
use crate::replacer::{apply_replacements, ReplaceMode, Replacer};

/// Why a comment was left alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipRecord {
    pub range: Range,
    pub reason: String,
}

/// A comment whose conversion failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub range: Range,
    pub reason: String,
}

/// Outcome of converting one buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Rewritten buffer; equal to the input when nothing converted
    pub output: String,
    pub converted: usize,
    pub unchanged: usize,
    pub skipped: Vec<SkipRecord>,
    pub failed: Vec<FailureRecord>,
}

impl ConversionReport {
    /// Comments the extractor produced
    pub fn total(&self) -> usize {
        self.converted + self.unchanged + self.skipped.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Comment conversion over whole buffers
pub struct Pipeline {
    extractor: Box<dyn CommentExtractor>,
    filter: Box<dyn CommentFilter>,
    converter: Box<dyn Converter>,
    mode: ReplaceMode,
    fail_fast: bool,
}

impl Pipeline {
    /// Pipeline with the default extractor, no filtering and `Replace` mode
    pub fn new(converter: impl Converter + 'static) -> Self {
        Self {
            extractor: Box::new(SourceCommentExtractor::with_scanner()),
            filter: Box::new(AcceptAll),
            converter: Box::new(converter),
            mode: ReplaceMode::Replace,
            fail_fast: false,
        }
    }

    pub fn with_extractor(mut self, extractor: impl CommentExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_filter(mut self, filter: impl CommentFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    pub fn with_mode(mut self, mode: ReplaceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Stop converting after the first failed comment
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn mode(&self) -> ReplaceMode {
        self.mode
    }

    pub fn converter_name(&self) -> &'static str {
        self.converter.name()
    }

    /// Convert `text` in the pipeline's mode
    pub fn convert(&self, text: &str) -> EngineResult<String> {
        self.convert_with_report(text, self.mode)
            .map(|report| report.output)
    }

    /// Convert `text` and account for every comment found
    ///
    /// Conversion failures are recorded per comment. Only an extraction bug or
    /// an inconsistent edit set is returned as `Err`.
    pub fn convert_with_report(&self, text: &str, mode: ReplaceMode) -> EngineResult<ConversionReport> {
        let comments = self.extractor.extract_comments(text)?;
        let mut report = ConversionReport::default();
        let mut results = Vec::new();
        let mut halted = false;

        for comment in comments {
            let range = comment.range();
            if halted {
                report.skipped.push(SkipRecord {
                    range,
                    reason: "not attempted after earlier failure".to_string(),
                });
                continue;
            }
            if !self.filter.is_valid(&comment) {
                report.skipped.push(SkipRecord {
                    range,
                    reason: "filtered".to_string(),
                });
                continue;
            }

            match self.converter.convert(&comment) {
                ConversionResult::Present(text) => {
                    report.converted += 1;
                    results.push((comment, ConversionResult::Present(text)));
                }
                ConversionResult::Empty(reason) => {
                    debug!("Comment {} unchanged: {}", range, reason);
                    report.unchanged += 1;
                }
                ConversionResult::Unsupported(reason) => {
                    debug!("Comment {} skipped: {}", range, reason);
                    report.skipped.push(SkipRecord { range, reason });
                }
                ConversionResult::Error(reason) => {
                    warn!("Comment {} failed in {}: {}", range, self.converter.name(), reason);
                    report.failed.push(FailureRecord { range, reason });
                    halted = self.fail_fast;
                }
            }
        }

        let edits = Replacer::new(mode).build(&results);
        report.output = apply_replacements(text, &edits)?;
        debug!(
            "{}: {} converted, {} unchanged, {} skipped, {} failed",
            self.converter.name(),
            report.converted,
            report.unchanged,
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }
}
