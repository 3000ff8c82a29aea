//! Engine configuration: defaults, an optional TOML file, CLI overrides.
//!
//! ```toml
//! strategy = "normalize"
//! style = "javadoc_block"
//! mode = "replace"
//! skip_doxygen = false
//! extensions = ["c", "h"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::comment::{CommentStyle, DeclarationScanner, Language, SourceCommentExtractor};
use crate::conversion::{
    CommandMarker, CommandMarkerConverter, GeneratingConverter, LlmBackend, StyleConverter,
    SubstitutionConverter,
};
use crate::discovery::{DiscoveryConfig, DEFAULT_EXTENSIONS};
use crate::error::{EngineError, EngineResult};
use crate::filter::{AcceptAll, SkipDoxygen};
use crate::pipeline::Pipeline;
use crate::processing::ProcessConfig;
use crate::replacer::ReplaceMode;

/// Conversion strategy selectable from configuration
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Re-render comments in one style
    #[default]
    Normalize,
    /// Rewrite Doxygen command markers
    Markers,
    /// Regex find-and-replace
    Substitute,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Normalize => "normalize",
            Strategy::Markers => "markers",
            Strategy::Substitute => "substitute",
        })
    }
}

impl FromStr for Strategy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normalize" => Ok(Strategy::Normalize),
            "markers" => Ok(Strategy::Markers),
            "substitute" => Ok(Strategy::Substitute),
            other => Err(EngineError::config(format!("unknown strategy `{other}`"))),
        }
    }
}

/// Everything needed to build a [`Pipeline`] and run it over a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub strategy: Strategy,
    /// Target style for `normalize`
    pub style: CommentStyle,
    pub mode: ReplaceMode,
    /// Target marker for `markers`
    pub marker: CommandMarker,
    /// Marker generated documentation is normalized to
    pub default_marker: CommandMarker,
    /// Regex for `substitute`
    pub pattern: Option<String>,
    /// Replacement for `substitute`, `$1` / `${name}` expand
    pub replacement: Option<String>,
    /// Leave comments already in a Doxygen style alone
    pub skip_doxygen: bool,
    pub fail_fast: bool,
    /// Source extensions to discover
    pub extensions: Vec<String>,
    /// Files converted at once; defaults to the CPU count
    pub concurrency: Option<usize>,
    /// Force a language instead of detecting it per file
    pub language: Option<Language>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Normalize,
            style: CommentStyle::JavadocBlock,
            mode: ReplaceMode::Replace,
            marker: CommandMarker::Backslash,
            default_marker: CommandMarker::Backslash,
            pattern: None,
            replacement: None,
            skip_doxygen: false,
            fail_fast: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            concurrency: None,
            language: None,
        }
    }
}

impl EngineConfig {
    /// Load a TOML file; missing keys keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Pipeline for the configured strategy
    pub fn build_pipeline(&self) -> EngineResult<Pipeline> {
        let pipeline = match self.strategy {
            Strategy::Normalize => Pipeline::new(StyleConverter::new(self.style)),
            Strategy::Markers => Pipeline::new(CommandMarkerConverter::new(self.marker)?),
            Strategy::Substitute => {
                let pattern = self
                    .pattern
                    .as_deref()
                    .ok_or_else(|| EngineError::config("`substitute` needs a pattern"))?;
                let replacement = self.replacement.clone().unwrap_or_default();
                Pipeline::new(SubstitutionConverter::new(pattern, replacement)?)
            }
        };
        Ok(self.configure(pipeline))
    }

    /// Pipeline documenting functions through `backend`
    pub fn build_generating_pipeline<B: LlmBackend + 'static>(&self, backend: B) -> EngineResult<Pipeline> {
        let converter = GeneratingConverter::with_marker(backend, self.default_marker)?;
        Ok(self.configure(Pipeline::new(converter)))
    }

    fn configure(&self, pipeline: Pipeline) -> Pipeline {
        let pipeline = pipeline
            .with_extractor(SourceCommentExtractor::new(DeclarationScanner::new(self.language)))
            .with_mode(self.mode)
            .with_fail_fast(self.fail_fast);
        if self.skip_doxygen {
            pipeline.with_filter(SkipDoxygen)
        } else {
            pipeline.with_filter(AcceptAll)
        }
    }

    pub fn discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            fail_fast: self.fail_fast,
            extensions: self.extensions.clone(),
            ..DiscoveryConfig::default()
        }
    }

    pub fn process_config(&self, dry_run: bool) -> ProcessConfig {
        ProcessConfig {
            mode: self.mode,
            fail_fast: self.fail_fast,
            dry_run,
            concurrency: self.concurrency.unwrap_or_else(num_cpus::get).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml(
            "strategy = \"markers\"\nmarker = \"at\"\nmode = \"append_inline\"\n",
        )
        .unwrap();
        assert_eq!(config.strategy, Strategy::Markers);
        assert_eq!(config.marker, CommandMarker::At);
        assert_eq!(config.mode, ReplaceMode::AppendInline);
        assert_eq!(config.style, CommentStyle::JavadocBlock);
        assert_eq!(config.extensions.len(), DEFAULT_EXTENSIONS.len());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(EngineConfig::from_toml("colour = \"blue\"").is_err());
        assert!(EngineConfig::from_toml("style = \"hash_line\"").is_err());
    }

    #[test]
    fn test_substitute_needs_pattern() {
        let config = EngineConfig {
            strategy: Strategy::Substitute,
            ..EngineConfig::default()
        };
        assert!(matches!(config.build_pipeline(), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_built_pipeline_converts() {
        let config = EngineConfig::from_toml("style = \"cpp_line\"\nskip_doxygen = true").unwrap();
        let pipeline = config.build_pipeline().unwrap();
        assert_eq!(pipeline.converter_name(), "normalize");
        assert_eq!(pipeline.convert("/* a */\nint x;").unwrap(), "/// a\nint x;");
    }

    #[test]
    fn test_generating_pipeline_uses_default_marker() {
        let config = EngineConfig {
            default_marker: CommandMarker::At,
            language: Some(Language::C),
            ..EngineConfig::default()
        };
        let backend = |_: &str, _: &str| -> anyhow::Result<String> { Ok("/// \\brief Adds.".to_string()) };
        let pipeline = config.build_generating_pipeline(backend).unwrap();
        let out = pipeline.convert("// adds\nint add(int a, int b);").unwrap();
        assert_eq!(out, "/**\n * AI_GENERATED\n * @brief Adds.\n */\nint add(int a, int b);");
    }
}
