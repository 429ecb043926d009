use xmlcmp_rs::{
    compare_batch, compare_xml, format_batch, format_error, format_result, BatchItem,
    ComparisonOptions, OutputFormat, OutputOptions,
};

fn plain() -> OutputOptions {
    OutputOptions::default()
}

#[test]
fn test_plain_identical() {
    let options = ComparisonOptions::default();
    let result = compare_xml("<a>1</a>", "<a>1</a>", &options).unwrap();
    let output = format_result(&result, options.threshold, &OutputFormat::Plain, &plain()).unwrap();

    assert!(output.contains("No differences found."));
    assert!(output.contains("Differences: none"));
    assert!(output.ends_with("Match ratio: 100% (threshold 95%) PASS"));
}

#[test]
fn test_plain_lists_each_kind() {
    let options = ComparisonOptions::new(Vec::<String>::new(), 10.0);
    let result = compare_xml(
        r#"<r v="1"><a>1</a><b/><c>x</c><c>y</c></r>"#,
        r#"<r v="2"><a>2</a><d/><c>x</c></r>"#,
        &options,
    )
    .unwrap();
    let output = format_result(&result, options.threshold, &OutputFormat::Plain, &plain()).unwrap();

    assert!(output.contains("• r.v [attribute] Attribute values differ: 1 → 2"));
    assert!(output.contains("- r.b [element] Element missing in second document: <b/>"));
    assert!(output.contains("+ r.d [element] Element missing in first document: <d/>"));
    assert!(output.contains("• r.a [text] Text content differs: 1 → 2"));
    assert!(output.contains("• r.c [structure] Lengths differ: 2 → 1"));
    assert!(output.contains("- r.c[1] [structure] Missing in second document: y"));
    assert!(output.contains("Differences: 1 attribute, 2 element, 1 text, 2 structure"));
}

#[test]
fn test_plain_has_no_ansi_codes() {
    let options = ComparisonOptions::default();
    let result = compare_xml("<a>1</a>", "<a>2</a>", &options).unwrap();
    let output = format_result(&result, options.threshold, &OutputFormat::Plain, &plain()).unwrap();
    assert!(!output.contains('\u{1b}'));
}

#[test]
fn test_hide_ignored() {
    let options = ComparisonOptions::new(["id"], 95.0);
    let result = compare_xml(
        "<root><id>1</id><name>Bob</name></root>",
        "<root><id>2</id><name>Bob</name></root>",
        &options,
    )
    .unwrap();

    let shown = format_result(&result, 95.0, &OutputFormat::Plain, &plain()).unwrap();
    assert!(shown.contains("root.id [text] Text content differs: 1 → 2 (ignored)"));

    let hidden_options = OutputOptions {
        show_ignored: false,
        ..OutputOptions::default()
    };
    let hidden = format_result(&result, 95.0, &OutputFormat::Plain, &hidden_options).unwrap();
    assert!(!hidden.contains("root.id"));
    assert!(hidden.contains("(1 ignored)"));
    assert!(hidden.contains("PASS"));
}

#[test]
fn test_json_result_envelope() {
    let options = ComparisonOptions::new(["id"], 95.0);
    let result = compare_xml(
        "<root><id>1</id><name>Bob</name></root>",
        "<root><id>2</id><name>Bob</name></root>",
        &options,
    )
    .unwrap();
    let output = format_result(&result, 95.0, &OutputFormat::Json, &plain()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(json["success"], true);
    let data = &json["data"];
    assert_eq!(data["matchRatio"], 100.0);
    assert_eq!(data["isMatch"], true);
    assert!(data["processingTimeMs"].is_u64());

    let difference = &data["differences"][0];
    assert_eq!(difference["type"], "text");
    assert_eq!(difference["path"], "root.id");
    assert_eq!(difference["left"], "1");
    assert_eq!(difference["right"], "2");
    assert_eq!(difference["ignored"], true);
}

#[test]
fn test_json_omits_absent_values() {
    let options = ComparisonOptions::default();
    let result = compare_xml("<r><a/></r>", "<r/>", &options).unwrap();
    let output = format_result(&result, 95.0, &OutputFormat::Json, &plain()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    let difference = &json["data"]["differences"][0];
    assert_eq!(difference["left"], "<a/>");
    assert!(difference.get("right").is_none());
}

#[test]
fn test_json_batch_envelope() {
    let items = vec![
        BatchItem::inline("<a>1</a>", "<a>1</a>"),
        BatchItem::inline("<a>1</a>", "not xml"),
    ];
    let batch = compare_batch(&items, &ComparisonOptions::default());
    let output = format_batch(&batch, &items, &OutputFormat::Json, &plain()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["results"][0]["status"], "completed");
    assert_eq!(json["data"]["results"][0]["matchRatio"], 100.0);
    assert_eq!(json["data"]["results"][1]["status"], "failed");
    assert_eq!(json["data"]["results"][1]["side"], "second");
    assert_eq!(json["data"]["summary"]["total"], 2);
    assert_eq!(json["data"]["summary"]["passed"], 1);
    assert_eq!(json["data"]["summary"]["averageMatchRatio"], 100.0);
}

#[test]
fn test_batch_plain_uses_labels() {
    let items = vec![
        BatchItem::inline("<a>1</a>", "<a>1</a>").with_label("orders"),
        BatchItem::inline("<a>1</a>", "<a>1</a>"),
    ];
    let batch = compare_batch(&items, &ComparisonOptions::default());
    let output = format_batch(&batch, &items, &OutputFormat::Plain, &plain()).unwrap();

    assert!(output.contains("PASS orders: 100%"));
    assert!(output.contains("PASS #2: 100%"));
    assert!(output.ends_with(
        "Summary: 2 total, 2 passed, 0 failed (0 errored), average match ratio 100%"
    ));
}

#[test]
fn test_error_output() {
    let json = format_error("File not found: x.xml", &OutputFormat::Json).unwrap();
    assert!(json.contains("\"success\": false"));
    assert!(json.contains("\"message\": \"File not found: x.xml\""));

    let terminal = format_error("File not found: x.xml", &OutputFormat::Terminal).unwrap();
    assert!(terminal.contains("File not found: x.xml"));
}
