use xmlcmp_rs::{
    compare_documents, diff_documents, parse_xml, ComparisonError, ComparisonOptions, DiffConfig,
    DiffStats, Difference, DifferenceKind, IgnoreList,
};

fn diff_with(left: &str, right: &str, ignores: &[&str]) -> Vec<Difference> {
    let left = parse_xml(left).unwrap();
    let right = parse_xml(right).unwrap();
    diff_documents(
        &left,
        &right,
        &IgnoreList::new(ignores.iter().copied()),
        &DiffConfig::default(),
    )
    .unwrap()
}

fn diff(left: &str, right: &str) -> Vec<Difference> {
    diff_with(left, right, &[])
}

fn paths(differences: &[Difference]) -> Vec<String> {
    differences.iter().map(|d| d.path.to_string()).collect()
}

#[test]
fn test_identical_documents() {
    let xml = r#"<order id="1"><item sku="a">2</item><item sku="b">3</item><note/></order>"#;
    assert!(diff(xml, xml).is_empty());
}

#[test]
fn test_formatting_is_not_a_difference() {
    let compact = r#"<r><a x="1">t</a></r>"#;
    let pretty = "<?xml version=\"1.0\"?>\n<r>\n  <!-- c -->\n  <a  x='1'>\n    t\n  </a>\n</r>\n";
    assert!(diff(compact, pretty).is_empty());
}

#[test]
fn test_text_difference() {
    let diffs = diff(
        "<root><id>1</id><name>Bob</name></root>",
        "<root><id>2</id><name>Bob</name></root>",
    );
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].kind, DifferenceKind::Text);
    assert_eq!(diffs[0].path.to_string(), "root.id");
    assert_eq!(diffs[0].left.as_deref(), Some("1"));
    assert_eq!(diffs[0].right.as_deref(), Some("2"));
    assert_eq!(diffs[0].description, "Text content differs");
    assert!(!diffs[0].ignored);
}

#[test]
fn test_positional_comparison_of_repeated_siblings() {
    // reordering is reported position by position, never realigned
    let diffs = diff(
        "<r><item>a</item><item>b</item></r>",
        "<r><item>b</item><item>a</item></r>",
    );
    assert_eq!(paths(&diffs), vec!["r.item[0]", "r.item[1]"]);
    assert!(diffs.iter().all(|d| d.kind == DifferenceKind::Text));
}

#[test]
fn test_sequence_length_mismatch() {
    let diffs = diff(
        "<r><item>a</item><item>b</item></r>",
        "<r><item>a</item><item>b</item><item>c</item></r>",
    );
    assert_eq!(diffs.len(), 2);

    assert_eq!(diffs[0].kind, DifferenceKind::Structure);
    assert_eq!(diffs[0].path.to_string(), "r.item");
    assert_eq!(diffs[0].description, "Lengths differ");
    assert_eq!(diffs[0].left.as_deref(), Some("2"));
    assert_eq!(diffs[0].right.as_deref(), Some("3"));

    assert_eq!(diffs[1].path.to_string(), "r.item[2]");
    assert_eq!(diffs[1].description, "Missing in first document");
    assert_eq!(diffs[1].left, None);
    assert_eq!(diffs[1].right.as_deref(), Some("c"));
}

#[test]
fn test_single_to_sequence_uses_indexes() {
    let diffs = diff("<r><item>a</item></r>", "<r><item>a</item><item>b</item></r>");
    assert_eq!(paths(&diffs), vec!["r.item", "r.item[1]"]);
}

#[test]
fn test_missing_elements() {
    let diffs = diff(
        "<r><a>1</a><b>2</b></r>",
        "<r><a>1</a><c><d>3</d></c></r>",
    );
    assert_eq!(diffs.len(), 2);

    assert_eq!(diffs[0].kind, DifferenceKind::Element);
    assert_eq!(diffs[0].path.to_string(), "r.b");
    assert_eq!(diffs[0].left.as_deref(), Some("2"));
    assert_eq!(diffs[0].description, "Element missing in second document");

    assert_eq!(diffs[1].path.to_string(), "r.c");
    assert_eq!(diffs[1].right.as_deref(), Some("<c> { 1 child }"));
    assert_eq!(diffs[1].description, "Element missing in first document");
}

#[test]
fn test_missing_repeated_element_is_summarized() {
    let diffs = diff("<r><x>1</x><x>2</x></r>", "<r/>");
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].left.as_deref(), Some("[ 2 items ]"));
}

#[test]
fn test_different_root_names() {
    let diffs = diff("<a/>", "<b/>");
    assert_eq!(paths(&diffs), vec!["a", "b"]);
    assert!(diffs.iter().all(|d| d.kind == DifferenceKind::Element));
}

#[test]
fn test_attribute_differences() {
    let diffs = diff(
        r#"<r a="1" b="2" c="3"/>"#,
        r#"<r b="2" c="4" d="5"/>"#,
    );
    let descriptions: Vec<&str> = diffs.iter().map(|d| d.description.as_str()).collect();
    assert_eq!(
        descriptions,
        vec![
            "Attribute missing in second document",
            "Attribute missing in first document",
            "Attribute values differ",
        ]
    );
    assert_eq!(paths(&diffs), vec!["r.a", "r.d", "r.c"]);
    assert!(diffs.iter().all(|d| d.kind == DifferenceKind::Attribute));
}

#[test]
fn test_attribute_order_is_irrelevant() {
    assert!(diff(r#"<r a="1" b="2"/>"#, r#"<r b="2" a="1"/>"#).is_empty());
}

#[test]
fn test_attribute_change_does_not_produce_text_difference() {
    let diffs = diff(r#"<a x="1">t</a>"#, r#"<a x="2">t</a>"#);
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].kind, DifferenceKind::Attribute);
    assert_eq!(diffs[0].path.to_string(), "a.x");
}

#[test]
fn test_attribute_differences_come_first() {
    let diffs = diff(
        r#"<r><b>x</b><c k="1">y</c></r>"#,
        r#"<r><b>z</b><c k="2">y</c></r>"#,
    );
    assert_eq!(diffs[0].kind, DifferenceKind::Attribute);
    assert_eq!(diffs[0].path.to_string(), "r.c.k");
    assert_eq!(diffs[1].kind, DifferenceKind::Text);
    assert_eq!(diffs[1].path.to_string(), "r.b");
}

#[test]
fn test_text_versus_children() {
    let diffs = diff("<r><a>1</a></r>", "<r><a><b>1</b></a></r>");
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].kind, DifferenceKind::Text);
    assert_eq!(diffs[0].left.as_deref(), Some("1"));
    assert_eq!(diffs[0].right.as_deref(), Some("<a> { 1 child }"));
}

#[test]
fn test_text_versus_empty() {
    let diffs = diff("<r><a>1</a></r>", "<r><a/></r>");
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].left.as_deref(), Some("1"));
    assert_eq!(diffs[0].right.as_deref(), Some(""));
}

#[test]
fn test_mixed_content_text_runs() {
    let diffs = diff("<p>one<br/>two</p>", "<p>one<br/>three</p>");
    assert_eq!(paths(&diffs), vec!["p.#text[1]"]);
    assert_eq!(diffs[0].description, "Values differ");
}

#[test]
fn test_symmetry() {
    let left = r#"<r v="1"><a>1</a><b>2</b><c x="y"/></r>"#;
    let right = r#"<r v="2"><a>3</a><d/><c/></r>"#;

    let forward = diff(left, right);
    let backward = diff(right, left);

    assert_eq!(forward.len(), backward.len());
    for f in &forward {
        let mirror = backward
            .iter()
            .find(|b| b.path == f.path && b.kind == f.kind)
            .unwrap_or_else(|| panic!("No mirror for {}", f.path));
        assert_eq!(mirror.left, f.right);
        assert_eq!(mirror.right, f.left);
    }
}

#[test]
fn test_ignored_differences_are_kept() {
    let diffs = diff_with(
        r#"<r ts="1"><id>1</id><name>a</name></r>"#,
        r#"<r ts="2"><id>2</id><name>b</name></r>"#,
        &["ts", "id"],
    );
    assert_eq!(diffs.len(), 3);

    let ignored: Vec<String> = diffs
        .iter()
        .filter(|d| d.ignored)
        .map(|d| d.path.to_string())
        .collect();
    assert_eq!(ignored, vec!["r.ts", "r.id"]);
}

#[test]
fn test_ignored_subtree() {
    let diffs = diff_with(
        "<r><meta><a>1</a><b>1</b></meta><body>x</body></r>",
        "<r><meta><a>2</a><c/></meta><body>y</body></r>",
        &["r.meta"],
    );
    let stats = DiffStats::from_differences(&diffs);
    assert_eq!(stats.total(), 4);
    assert_eq!(stats.ignored, 3);
    assert_eq!(stats.scored(), 1);
}

#[test]
fn test_bare_name_ignores_nested_subtree() {
    let diffs = diff_with(
        "<root><metadata><created>1</created><tags><tag>x</tag></tags></metadata><v>1</v></root>",
        "<root><metadata><created>2</created></metadata><v>1</v></root>",
        &["metadata"],
    );
    assert_eq!(
        paths(&diffs),
        vec!["root.metadata.tags", "root.metadata.created"]
    );
    assert!(diffs.iter().all(|d| d.ignored));

    let left = parse_xml("<root><metadata><created>1</created></metadata></root>").unwrap();
    let right = parse_xml("<root><metadata><created>2</created></metadata></root>").unwrap();
    let options = ComparisonOptions::new(["metadata"], 95.0);
    let result = compare_documents(&left, &right, &options).unwrap();
    assert_eq!(result.match_ratio, 100.0);
}

#[test]
fn test_wildcard_ignore() {
    let diffs = diff_with(
        "<r><item><id>1</id></item><item><id>2</id></item></r>",
        "<r><item><id>9</id></item><item><id>8</id></item></r>",
        &["r.item[1].id"],
    );
    assert_eq!(paths(&diffs), vec!["r.item[0].id", "r.item[1].id"]);
    assert!(!diffs[0].ignored);
    assert!(diffs[1].ignored);

    let diffs = diff_with(
        "<r><item><id>1</id></item><item><id>2</id></item></r>",
        "<r><item><id>9</id></item><item><id>8</id></item></r>",
        &["r.*.id"],
    );
    assert!(diffs.iter().all(|d| d.ignored));

    let diffs = diff_with(
        "<r><a><b><c>1</c></b></a></r>",
        "<r><a><b><c>2</c></b></a></r>",
        &["**.c"],
    );
    assert!(diffs[0].ignored);
}

#[test]
fn test_depth_limit() {
    let left = parse_xml("<a><b><c><d>1</d></c></b></a>").unwrap();
    let right = parse_xml("<a><b><c><d>2</d></c></b></a>").unwrap();
    let config = DiffConfig {
        max_depth: 2,
        ..DiffConfig::default()
    };

    let err = diff_documents(&left, &right, &IgnoreList::default(), &config).unwrap_err();
    assert!(matches!(err, ComparisonError::DepthExceeded { limit: 2, .. }));
}

#[test]
fn test_element_preview_truncated() {
    let long = "x".repeat(50);
    let left = parse_xml(&format!("<r><a><b>{}</b><c/></a></r>", long)).unwrap();
    let right = parse_xml("<r/>").unwrap();
    let config = DiffConfig {
        max_value_length: 5,
        ..DiffConfig::default()
    };

    let diffs = diff_documents(&left, &right, &IgnoreList::default(), &config).unwrap();
    assert_eq!(diffs[0].left.as_deref(), Some("<a..."));
}
