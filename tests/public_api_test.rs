// Exercises the library surface the way a downstream tool would

use docstyle::comment::{extract, find_comment_groups, find_comments, render};
use docstyle::{
    apply_replacements, AcceptAll, CSymbol, CommentExtractor, CommentStyle, ConversionResult,
    Converter, EngineError, Pipeline, Range, ReplaceMode, Replacer, SkipDoxygen,
    SourceCommentExtractor, StyleCategory, StyleConverter, SymbolType, TextReplacement,
};

#[test]
fn test_adjacent_line_comments_form_one_group() {
    let text = "// a\n// b";
    let raw = find_comments(text);
    assert_eq!(raw.len(), 2);
    assert!(raw.iter().all(|c| c.category == StyleCategory::Line));

    let groups = find_comment_groups(text);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].style, CommentStyle::CLine);
    assert_eq!(groups[0].span(), Range::new(0, text.len()).unwrap());
    assert_eq!(extract(groups[0].text(text), groups[0].style).unwrap(), "a\nb");
}

#[test]
fn test_block_comment_renders_as_javadoc() {
    let text = "/* a\n */";
    let groups = find_comment_groups(text);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].style, CommentStyle::CBlock);

    let content = extract(text, CommentStyle::CBlock).unwrap();
    assert_eq!(content, "a");
    assert_eq!(render(&content, CommentStyle::JavadocBlock, ""), "/**\n * a\n */");
}

#[test]
fn test_javadoc_comment_is_left_alone() {
    let code = "/**\n * Adds two values.\n */\nint add(int a, int b);\n";
    let comments = SourceCommentExtractor::with_scanner().extract_comments(code).unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].symbol_type(), Some(SymbolType::C(CSymbol::Function)));

    let result = StyleConverter::new(CommentStyle::JavadocBlock).convert(&comments[0]);
    assert!(matches!(result, ConversionResult::Empty(_)));
    assert_eq!(
        Pipeline::new(StyleConverter::new(CommentStyle::JavadocBlock)).convert(code).unwrap(),
        code
    );
}

#[test]
fn test_replacements_must_not_overlap() {
    let good = [
        TextReplacement::new(Range::new(0, 4).unwrap(), "X"),
        TextReplacement::new(Range::new(4, 7).unwrap(), "Y"),
    ];
    assert_eq!(apply_replacements("abcdefg", &good).unwrap(), "XY");

    let bad = [
        TextReplacement::new(Range::new(0, 4).unwrap(), "X"),
        TextReplacement::new(Range::new(2, 5).unwrap(), "Y"),
    ];
    assert!(matches!(
        apply_replacements("abcdefg", &bad),
        Err(EngineError::InvariantViolation(_))
    ));
}

#[test]
fn test_replacer_only_emits_present_results() {
    let code = "// one\nint a;\n\n\n// two\nint b;\n";
    let comments = SourceCommentExtractor::with_scanner().extract_comments(code).unwrap();
    assert_eq!(comments.len(), 2);

    let results = vec![
        (comments[0].clone(), ConversionResult::Present("/// one".to_string())),
        (comments[1].clone(), ConversionResult::unsupported("no")),
    ];
    let edits = Replacer::new(ReplaceMode::Replace).build(&results);
    assert_eq!(edits.len(), 1);
    assert_eq!(
        apply_replacements(code, &edits).unwrap(),
        "/// one\nint a;\n\n\n// two\nint b;\n"
    );
}

#[test]
fn test_filters_gate_conversion() {
    let code = "/// already doc\nint a;\n\n\n// plain\nint b;\n";
    let skip = Pipeline::new(StyleConverter::new(CommentStyle::JavadocInline)).with_filter(SkipDoxygen);
    let report = skip.convert_with_report(code, ReplaceMode::Replace).unwrap();
    assert_eq!(report.output, "/// already doc\nint a;\n\n\n/** plain */\nint b;\n");

    let all = Pipeline::new(StyleConverter::new(CommentStyle::JavadocInline)).with_filter(AcceptAll);
    let output = all.convert(code).unwrap();
    assert_eq!(output, "/** already doc */\nint a;\n\n\n/** plain */\nint b;\n");
}
