//! Integration tests for formatting tabs with the stock and custom formats

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tabclip::record::records_from_json;
use tabclip::{
    format_record_at, format_records, BuiltinError, Config, Delimiter, FormatConfig, TabRecord,
    Timestamps,
};

fn tab() -> TabRecord {
    TabRecord::new("https://example.com/a_b?q=1", "Tom's \"Page\"")
}

fn fill(template: &str, record: &TabRecord) -> String {
    let times = Timestamps::at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    format_record_at(template, record, &FormatConfig::default(), &times)
        .expect("Should format")
        .plain_text
}

fn stock(label: &str) -> String {
    Config::default()
        .format(label)
        .expect("Should have format")
        .format
        .clone()
}

#[test]
fn test_stock_url_and_title_formats() {
    assert_eq!(fill(&stock("URL"), &tab()), "https://example.com/a_b?q=1");
    assert_eq!(
        fill(&stock("Title and URL"), &tab()),
        "Tom's \"Page\"\nhttps://example.com/a_b?q=1"
    );
}

#[test]
fn test_stock_html_link() {
    assert_eq!(
        fill(&stock("HTML Link"), &tab()),
        "<a title=\"Tom's &quot;Page&quot;\" href=\"https://example.com/a_b?q=1\">Tom's &quot;Page&quot;</a>"
    );
}

#[test]
fn test_stock_markdown() {
    assert_eq!(
        fill(&stock("Markdown"), &tab()),
        r#"[Tom\'s \"Page\"](https://example.com/a_b?q=1 "Tom\'s \"Page\"")"#
    );
}

#[test]
fn test_stock_markdown_list_indents_children() {
    let child = TabRecord::new("https://e.x/", "Child").with_indent_level(2);
    assert_eq!(
        fill(&stock("Markdown List"), &child),
        r#"    * [Child](https://e.x/ "Child")"#
    );
}

#[test]
fn test_replace_strips_query_from_url() {
    assert_eq!(
        fill(r#"%REPLACE(%URL%, "\\?.*$", "")%"#, &tab()),
        "https://example.com/a_b"
    );
}

#[test]
fn test_replace_pairs_apply_in_order_and_ignore_case() {
    assert_eq!(
        fill(
            r#"%REPLACE("%TITLE%", "PAGE", "Doc", "^tom", "Ann")%"#,
            &tab()
        ),
        "Ann's \"Doc\""
    );
}

#[test]
fn test_replace_with_capture_groups() {
    assert_eq!(
        fill(
            r#"%REPLACE(%URL%, "^https://([^/]+)/.*$", "$1")%"#,
            &tab()
        ),
        "example.com"
    );
}

#[test]
fn test_any_picks_first_non_empty() {
    let record = TabRecord {
        description: Some("About".to_string()),
        ..tab()
    };
    assert_eq!(fill("%ANY(%AUTHOR%, %DESC%, %TITLE%)%", &record), "About");
}

#[test]
fn test_time_placeholders() {
    assert_eq!(fill("%UTC_TIME%", &tab()), "Tue, 02 Jan 2024 03:04:05 GMT");
    assert_eq!(fill("%LOCAL_TIME%", &tab()).len(), "2024-01-02 03:04:05".len());
}

#[test]
fn test_batch_from_json_records() {
    let records = records_from_json(
        r#"[
            {"url": "https://a.example/", "title": "A"},
            {"url": "https://b.example/", "title": "B", "indent_level": 1}
        ]"#,
    )
    .expect("Should parse");
    let config = FormatConfig::new().with_crlf(true);
    let text = format_records("%TREE_INDENT%- %TITLE%", &records, &config);
    assert_eq!(text.plain_text, "- A\r\n  - B\r\n");
    assert_eq!(text.rich_text, None);
}

#[test]
fn test_batch_keeps_going_after_a_failing_record() {
    let config = FormatConfig::new().with_delimiter(Delimiter::Space);
    let records = vec![tab(), tab()];
    let text = format_records("%REPLACE(%URL%, x)%", &records, &config);
    let message = BuiltinError::MissingPair.to_string();
    assert_eq!(text.plain_text, format!("{} {}", message, message));
}

#[test]
fn test_config_file_formats() {
    let config = Config::from_str(
        r#"
delimiter = "tab"

[[formats]]
label = "Org"
format = "[[%URL%][%TITLE%]]"
"#,
    )
    .expect("Should parse");
    let template = &config.format("org").expect("Should find").format;
    let records = vec![
        TabRecord::new("https://a.example/", "A"),
        TabRecord::new("https://b.example/", "B"),
    ];
    let text = format_records(template, &records, &config.format_config());
    assert_eq!(
        text.plain_text,
        "[[https://a.example/][A]]\t[[https://b.example/][B]]"
    );
}
