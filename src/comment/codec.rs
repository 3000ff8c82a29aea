// Content is kept free of delimiters, decoration and structural indentation

use super::lexer::find_comments;
use super::style::{CommentStyle, StyleCategory};
use crate::error::{EngineError, EngineResult};

/// Separator between a delimiter or decoration and the content it precedes
const GAP: &str = " ";

/// Extract semantic content from a comment's raw text
pub fn extract(text: &str, style: CommentStyle) -> EngineResult<String> {
    let lines = match style.category() {
        StyleCategory::Line => extract_line(text, style)?,
        StyleCategory::BlockInline => extract_inline(text, style),
        StyleCategory::Block => extract_block(text, style),
    };
    Ok(dedent(&lines))
}

fn extract_line(text: &str, style: CommentStyle) -> EngineResult<Vec<String>> {
    let delimiter = style.start_delimiter();
    text.split('\n')
        .enumerate()
        .map(|(index, line)| {
            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                // blank line inside a merged group
                return Ok(String::new());
            }
            trimmed
                .strip_prefix(delimiter)
                .map(str::to_string)
                .ok_or_else(|| EngineError::MalformedComment {
                    line: index + 1,
                    expected: delimiter,
                    text: line.to_string(),
                })
        })
        .collect()
}

fn extract_inline(text: &str, style: CommentStyle) -> Vec<String> {
    let start = style.start_delimiter();
    let end = style.end_delimiter().unwrap_or_default();
    find_comments(text)
        .iter()
        .map(|piece| {
            let raw = piece.text(text);
            let body = raw.strip_prefix(start).unwrap_or(raw);
            let body = body.strip_suffix(end).unwrap_or(body);
            body.strip_prefix(GAP).unwrap_or(body).trim_end().to_string()
        })
        .collect()
}

fn extract_block(text: &str, style: CommentStyle) -> Vec<String> {
    let start = style.start_delimiter();
    let end = style.end_delimiter().unwrap_or_default();
    let decoration = style.decoration_prefix();
    let raw_lines: Vec<&str> = text.split('\n').collect();
    let last_index = raw_lines.len() - 1;
    let mut lines = Vec::with_capacity(raw_lines.len());
    // leading whitespace of a remainder on the opening line is separator, not structure
    let mut opening_remainder = false;

    for (index, raw) in raw_lines.iter().enumerate() {
        let mut line: &str = raw;
        let mut is_delimiter_line = false;

        if index == 0 {
            let trimmed = line.trim_start();
            line = trimmed.strip_prefix(start).unwrap_or(trimmed);
            is_delimiter_line = true;
        }
        if index == last_index {
            let trimmed = line.trim_end();
            if let Some(body) = trimmed.strip_suffix(end) {
                line = body.trim_end();
                let rest = body.trim();
                if index > 0 && (rest.is_empty() || rest.chars().all(|c| decoration.contains(c))) {
                    continue;
                }
            }
        }

        if is_delimiter_line {
            if line.trim().is_empty() {
                continue;
            }
            opening_remainder = true;
            lines.push(line.to_string());
            continue;
        }

        let trimmed = line.trim_start();
        let body = if decoration.is_empty() {
            trimmed
        } else {
            trimmed.strip_prefix(decoration).unwrap_or(trimmed)
        };
        lines.push(body.to_string());
    }

    let mut lines = dedent_lines(lines);
    if opening_remainder {
        if let Some(first) = lines.first_mut() {
            *first = first.trim_start().to_string();
        }
    }
    lines
}

/// Common-indentation removal; whitespace-only lines become empty and do not
/// count towards the common prefix
fn dedent_lines(lines: Vec<String>) -> Vec<String> {
    let common = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .into_iter()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                // indentation is ASCII whitespace in practice; fall back to a
                // plain trim if the prefix is not on a char boundary
                line.get(common..)
                    .map(str::to_string)
                    .unwrap_or_else(|| line.trim_start().to_string())
            }
        })
        .collect()
}

fn dedent(lines: &[String]) -> String {
    dedent_lines(lines.to_vec()).join("\n")
}

/// Render content in `style`; continuation lines are prefixed with `indentation`
pub fn render(content: &str, style: CommentStyle, indentation: &str) -> String {
    let start = style.start_delimiter();
    let continuation = format!("\n{indentation}");

    match style.category() {
        StyleCategory::Line => content
            .split('\n')
            .map(|line| decorate(start, line))
            .collect::<Vec<_>>()
            .join(&continuation),
        StyleCategory::BlockInline => {
            let end = style.end_delimiter().unwrap_or_default();
            content
                .split('\n')
                .map(|line| {
                    if line.is_empty() {
                        format!("{start}{GAP}{end}")
                    } else {
                        format!("{start}{GAP}{line}{GAP}{end}")
                    }
                })
                .collect::<Vec<_>>()
                .join(&continuation)
        }
        StyleCategory::Block => {
            let end = style.end_delimiter().unwrap_or_default();
            let decoration = style.decoration_prefix();
            let mut out = String::with_capacity(content.len() * 2 + start.len() + end.len());
            out.push_str(start);
            for line in content.split('\n') {
                out.push_str(&continuation);
                out.push_str(GAP);
                out.push_str(&decorate(decoration, line));
            }
            out.push_str(&continuation);
            out.push_str(GAP);
            out.push_str(end);
            out
        }
    }
}

/// `"<marker> <line>"`, or the bare marker for an empty line
fn decorate(marker: &str, line: &str) -> String {
    if line.is_empty() {
        marker.to_string()
    } else {
        format!("{marker}{GAP}{line}")
    }
}
