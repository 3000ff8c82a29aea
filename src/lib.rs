pub mod comment;
pub mod config;
pub mod conversion;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod processing;
pub mod range;
pub mod replacer;

// Re-export main types for convenient access
pub use comment::{
    Comment, CommentExtractor, CommentStyle, CppSymbol, CSymbol, DeclarationScanner, Language,
    SourceCommentExtractor, StyleCategory, Symbol, SymbolProvider, SymbolType,
};
pub use config::{EngineConfig, Strategy};
pub use conversion::{
    CommandMarker, CommandMarkerConverter, ConversionResult, Converter, GeneratingConverter,
    LlmBackend, StyleConverter, SubstitutionConverter, AI_GENERATED,
};
pub use error::{EngineError, EngineResult};
pub use filter::{AcceptAll, CommentFilter, RequireSymbol, SkipDoxygen};
pub use pipeline::{ConversionReport, FailureRecord, Pipeline, SkipRecord};
pub use range::{Range, TextReplacement};
pub use replacer::{apply_replacements, ReplaceMode, Replacer, NEW_COMMENT};

// Re-export the file layer for the binary and benchmarks
pub use discovery::{collect_discovered_files, find_source_files, DiscoveryConfig, FileValidation};
pub use processing::{
    convert_file, process_files, write_stats, FileConversion, FileStats, ProcessConfig,
    RunStats,
};
