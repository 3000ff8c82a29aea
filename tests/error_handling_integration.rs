use docstyle::{
    apply_replacements, convert_file, process_files, CommentStyle, EngineConfig, EngineError,
    Pipeline, ProcessConfig, Range, ReplaceMode, StyleConverter, SubstitutionConverter,
    TextReplacement,
};
use std::sync::Arc;

mod integration;
use integration::TestFixture;

fn pipeline() -> Arc<Pipeline> {
    Arc::new(Pipeline::new(StyleConverter::new(CommentStyle::CppLine)))
}

/// Test conversion of a file that is not valid UTF-8
#[tokio::test]
async fn test_invalid_utf8_file_fails() {
    let fixture = TestFixture::new();
    let path = fixture.root_path.join("binary.c");
    std::fs::write(&path, [0xFF, 0xFE, 0xFD]).expect("Failed to write invalid UTF-8 file");

    let err = convert_file(pipeline(), &path, ReplaceMode::Replace, None)
        .await
        .expect_err("invalid UTF-8 must fail");
    assert!(format!("{err:#}").contains("binary.c"));

    let stats = process_files(pipeline(), vec![path], &ProcessConfig::default(), None).await;
    assert_eq!(stats[0].status, "failed");
    assert!(stats[0].error.is_some());
}

#[tokio::test]
async fn test_missing_file_fails() {
    let fixture = TestFixture::new();
    let missing = fixture.root_path.join("missing.cpp");
    assert!(convert_file(pipeline(), &missing, ReplaceMode::Replace, None).await.is_err());
}

/// Test files without comments and empty files
#[tokio::test]
async fn test_empty_and_comment_free_files() {
    let fixture = TestFixture::new();
    let empty = fixture.create_source_file("empty.c", "");
    let plain = fixture.create_source_file("plain.c", "int main(void) { return 0; }\n");

    for path in [empty, plain] {
        let result = convert_file(pipeline(), &path, ReplaceMode::Replace, None).await.unwrap();
        assert!(!result.written);
        assert_eq!(result.report.total(), 0);
    }
}

/// Unterminated comments are converted up to the end of the buffer
#[test]
fn test_unterminated_block_comment() {
    let pipeline = Pipeline::new(StyleConverter::new(CommentStyle::CppLine));
    let output = pipeline.convert("int x;\n/*\n * trailing").unwrap();
    assert_eq!(output, "int x;\n/// trailing");
}

/// `//` inside a string literal lexes as a trailing comment and is left alone
#[test]
fn test_string_literal_comment_is_skipped() {
    let source = "const char *url = \"http://example.com\";";
    let pipeline = Pipeline::new(StyleConverter::new(CommentStyle::CBlock));
    let report = pipeline.convert_with_report(source, ReplaceMode::Replace).unwrap();
    assert_eq!(report.output, source);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.failed.is_empty());
}

#[test]
fn test_overlapping_replacements_abort() {
    let edits = [
        TextReplacement::new(Range::new(0, 4).unwrap(), "X"),
        TextReplacement::new(Range::new(2, 5).unwrap(), "Y"),
    ];
    let err = apply_replacements("abcdefg", &edits).unwrap_err();
    assert!(matches!(err, EngineError::InvariantViolation(_)));

    let adjacent = [
        TextReplacement::new(Range::new(0, 4).unwrap(), "X"),
        TextReplacement::new(Range::new(4, 7).unwrap(), "Y"),
    ];
    assert_eq!(apply_replacements("abcdefg", &adjacent).unwrap(), "XY");
}

#[test]
fn test_invalid_inputs_are_typed_errors() {
    assert!(matches!(Range::new(5, 1), Err(EngineError::InvalidRange { start: 5, end: 1 })));
    assert!(matches!(
        SubstitutionConverter::new("[", ""),
        Err(EngineError::InvalidPattern { .. })
    ));
    assert!("doc_comment".parse::<CommentStyle>().is_err());
}

#[test]
fn test_bad_config_file() {
    let fixture = TestFixture::new();
    let path = fixture.create_source_file("docstyle.toml", "style = 3\n");
    let err = EngineConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("docstyle.toml"));

    assert!(EngineConfig::load(fixture.root_path.join("absent.toml")).is_err());
}
