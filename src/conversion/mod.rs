//! Conversion strategies.
//!
//! A strategy maps one [`Comment`] to a [`ConversionResult`]. Strategies never
//! touch the buffer; the replacer turns `Present` results into edits.

pub mod commands;
pub mod generate;
pub mod style;
pub mod substitution;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::comment::Comment;
use crate::error::EngineError;

pub use commands::CommandMarkerConverter;
pub use generate::{GeneratingConverter, LlmBackend, AI_GENERATED};
pub use style::StyleConverter;
pub use substitution::SubstitutionConverter;

/// Outcome of converting one comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    /// Replacement comment text
    Present(String),
    /// Nothing to do; the comment already satisfies the strategy
    Empty(String),
    /// The strategy does not apply to this comment
    Unsupported(String),
    /// The strategy applied but failed
    Error(String),
}

impl ConversionResult {
    pub fn is_present(&self) -> bool {
        matches!(self, ConversionResult::Present(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ConversionResult::Error(_))
    }

    /// New text, or the reason for having none
    pub fn message(&self) -> &str {
        match self {
            ConversionResult::Present(text)
            | ConversionResult::Empty(text)
            | ConversionResult::Unsupported(text)
            | ConversionResult::Error(text) => text,
        }
    }

    pub fn empty(reason: impl Into<String>) -> Self {
        ConversionResult::Empty(reason.into())
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        ConversionResult::Unsupported(reason.into())
    }

    pub fn error(reason: impl Into<String>) -> Self {
        ConversionResult::Error(reason.into())
    }
}

/// A comment conversion strategy
pub trait Converter: Send + Sync {
    fn convert(&self, comment: &Comment) -> ConversionResult;

    /// Short name used in logs and reports
    fn name(&self) -> &'static str;
}

impl<C: Converter + ?Sized> Converter for Box<C> {
    fn convert(&self, comment: &Comment) -> ConversionResult {
        (**self).convert(comment)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Prefix character of Doxygen commands
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandMarker {
    /// `\brief`
    #[default]
    Backslash,
    /// `@brief`
    At,
}

impl CommandMarker {
    pub fn as_char(self) -> char {
        match self {
            CommandMarker::Backslash => '\\',
            CommandMarker::At => '@',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CommandMarker::Backslash => "backslash",
            CommandMarker::At => "at",
        }
    }
}

impl fmt::Display for CommandMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandMarker {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backslash" | "\\" => Ok(CommandMarker::Backslash),
            "at" | "@" => Ok(CommandMarker::At),
            other => Err(EngineError::config(format!("unknown command marker `{other}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_accessors() {
        let present = ConversionResult::Present("/// a".into());
        assert!(present.is_present());
        assert_eq!(present.message(), "/// a");
        assert!(ConversionResult::error("boom").is_error());
        assert!(!ConversionResult::empty("same").is_present());
    }

    #[test]
    fn test_marker_parse() {
        assert_eq!("at".parse::<CommandMarker>().unwrap(), CommandMarker::At);
        assert_eq!("\\".parse::<CommandMarker>().unwrap(), CommandMarker::Backslash);
        assert!("hash".parse::<CommandMarker>().is_err());
        assert_eq!(CommandMarker::default().as_char(), '\\');
    }
}
