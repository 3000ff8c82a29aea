use docstyle::{
    CommandMarker, CommandMarkerConverter, CommentStyle, GeneratingConverter, Pipeline, ReplaceMode,
    StyleConverter, NEW_COMMENT,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mod integration;
use integration::assert_golden_file;
use integration::fixtures::{C_HEADER, C_HEADER_JAVADOC, CPP_SHAPE, DRAW_GENERATED, DRAW_RESPONSE};

/// Normalizing a header to javadoc blocks leaves member comments alone
#[test]
fn test_normalize_header_to_javadoc() {
    let pipeline = Pipeline::new(StyleConverter::new(CommentStyle::JavadocBlock));
    let report = pipeline
        .convert_with_report(C_HEADER, ReplaceMode::Replace)
        .expect("conversion should succeed");

    assert_golden_file(&report.output, C_HEADER_JAVADOC, "javadoc normalization");
    assert_eq!(report.output, C_HEADER_JAVADOC);
    assert_eq!(report.converted, 3);
    assert_eq!(report.skipped.len(), 2, "member comments are skipped");
    assert!(report.failed.is_empty());
}

/// A second normalization pass finds nothing to do
#[test]
fn test_normalize_is_idempotent() {
    for style in [
        CommentStyle::JavadocBlock,
        CommentStyle::CppLine,
        CommentStyle::QtBlock,
        CommentStyle::CInline,
    ] {
        let pipeline = Pipeline::new(StyleConverter::new(style));
        let once = pipeline.convert(C_HEADER).unwrap();
        let report = pipeline.convert_with_report(&once, ReplaceMode::Replace).unwrap();
        assert_eq!(report.converted, 0, "{style} converted twice");
        assert_eq!(report.output, once, "{style} changed on second pass");
    }
}

/// Normalizing never changes the code around comments
#[test]
fn test_code_survives_normalization() {
    let pipeline = Pipeline::new(StyleConverter::new(CommentStyle::CppLine));
    let output = pipeline.convert(CPP_SHAPE).unwrap();
    for line in ["class Shape {", "    explicit Shape(int sides);", "    void draw() const;", "    int sides;"] {
        assert!(output.contains(line), "lost `{line}`");
    }
}

#[test]
fn test_marker_conversion() {
    let pipeline = Pipeline::new(CommandMarkerConverter::new(CommandMarker::At).unwrap());
    let report = pipeline.convert_with_report(CPP_SHAPE, ReplaceMode::Replace).unwrap();
    assert_eq!(report.output, CPP_SHAPE.replace("\\brief", "@brief"));
    assert_eq!(report.converted, 2);
}

#[test]
fn test_generation_replaces_plain_method_comment() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let backend = move |_system: &str, user: &str| -> anyhow::Result<String> {
        counter.fetch_add(1, Ordering::SeqCst);
        assert!(user.contains("void draw() const;"));
        Ok(DRAW_RESPONSE.to_string())
    };
    let pipeline = Pipeline::new(GeneratingConverter::new(backend).unwrap());

    let report = pipeline.convert_with_report(CPP_SHAPE, ReplaceMode::Replace).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1, "only the plain method comment reaches the backend");
    assert_eq!(report.converted, 1);
    assert_eq!(
        report.output,
        CPP_SHAPE.replace("// Draws the shape.", DRAW_GENERATED)
    );
}

#[test]
fn test_generation_append_keeps_original() {
    let backend = |_: &str, _: &str| -> anyhow::Result<String> { Ok(DRAW_RESPONSE.to_string()) };
    let pipeline = Pipeline::new(GeneratingConverter::new(backend).unwrap());

    let output = pipeline
        .convert_with_report(CPP_SHAPE, ReplaceMode::Append)
        .unwrap()
        .output;
    let expected = format!("// Draws the shape.\n    {DRAW_GENERATED}\n    void draw() const;");
    assert!(output.contains(&expected), "got:\n{output}");
}

#[test]
fn test_append_inline_merges_block_comments() {
    let pipeline = Pipeline::new(StyleConverter::new(CommentStyle::JavadocBlock));
    let output = pipeline
        .convert_with_report(C_HEADER, ReplaceMode::AppendInline)
        .unwrap()
        .output;

    let merged = format!(
        "/*\n * Point in the plane.\n * Coordinates are in pixels.\n *\n * {NEW_COMMENT}\n * Point in the plane.\n * Coordinates are in pixels.\n */\nstruct point {{"
    );
    assert!(output.contains(&merged), "got:\n{output}");
    // line comments cannot merge into a block and are appended instead
    assert!(output.contains("// Returns a non-negative value.\n/**\n * Distance between two points."));
}

/// Comments sharing a line with code never turn that code into comment text
#[test]
fn test_code_on_comment_lines_survives() {
    let cases = [
        ("    run(/* fast */ 1);\n", CommentStyle::CppLine),
        ("/* Adds\n * numbers */ int add(int a, int b);\n", CommentStyle::CLine),
        ("puts(\"see http://example.com\");\n", CommentStyle::JavadocBlock),
        ("g(1); // call g\n", CommentStyle::JavadocBlock),
    ];
    for (source, style) in cases {
        let report = Pipeline::new(StyleConverter::new(style))
            .convert_with_report(source, ReplaceMode::Replace)
            .unwrap();
        assert_eq!(report.output, source, "{style} rewrote code");
        assert_eq!(report.converted, 0);
        assert_eq!(report.skipped.len(), 1, "{style}: {:?}", report.skipped);
    }
}
