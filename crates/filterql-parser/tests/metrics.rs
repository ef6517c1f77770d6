// Kept as the only test in this binary: the counters are process-wide and a
// concurrent test would break the exact counts below.

use filterql_parser::{
    ParseMetricsSnapshot, Parser, TokenizeMetricsSnapshot, parse_metrics_snapshot,
    reset_parse_metrics, reset_tokenize_metrics, tokenize, tokenize_metrics_snapshot,
};

#[test]
fn test_metrics_reset_and_exact_counts() {
    reset_tokenize_metrics();
    reset_parse_metrics();
    assert_eq!(tokenize_metrics_snapshot(), TokenizeMetricsSnapshot::default());
    assert_eq!(parse_metrics_snapshot(), ParseMetricsSnapshot::default());

    assert_eq!(tokenize("a # ? :p").len(), 4);
    assert_eq!(tokenize("x = 1").len(), 3);
    let snapshot = tokenize_metrics_snapshot();
    assert_eq!(snapshot.tokenize_calls_total, 2);
    assert_eq!(snapshot.tokens_total, 7);
    assert_eq!(snapshot.unmatched_tokens_total, 3);
    assert_eq!(snapshot.duration.count(), snapshot.tokenize_calls_total);

    assert!(Parser::new("a = 1").parse().is_ok());
    assert!(Parser::new("(a = 1").parse().is_err());
    let parsed = parse_metrics_snapshot();
    assert_eq!(parsed.parses_total, 2);
    assert_eq!(parsed.syntax_errors_total, 1);
    assert_eq!(parsed.max_depth_observed, 2);
    // Each parser tokenizes its input once.
    assert_eq!(tokenize_metrics_snapshot().tokenize_calls_total, 4);

    reset_tokenize_metrics();
    reset_parse_metrics();
    assert_eq!(tokenize_metrics_snapshot(), TokenizeMetricsSnapshot::default());
    assert_eq!(parse_metrics_snapshot(), ParseMetricsSnapshot::default());
}
