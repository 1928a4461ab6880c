//! Integration tests for responsive reconciliation

use frame2html::markup::Document;
use frame2html::responsive::{
    decide_responsive_strategy, merge_responsive_fragments, ViewportSet,
};
use frame2html::{
    reconcile, ReconcileConfig, Reconciled, ResponsiveFragments, Strategy, Viewport,
};
use pretty_assertions::assert_eq;

fn keyed(keys: &[String]) -> String {
    let children: String = keys
        .iter()
        .map(|k| format!(r#"<p data-key="{k}">{k}</p>"#))
        .collect();
    format!(r#"<div data-key="root">{children}</div>"#)
}

fn keys(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|i| format!("k{i}")).collect()
}

fn classes_of(html: &str, key: &str) -> Vec<String> {
    let doc = Document::parse(html).unwrap();
    doc.nodes
        .iter()
        .find(|n| n.attr("data-key") == Some(key))
        .map(|n| n.classes().as_slice().to_vec())
        .unwrap_or_default()
}

#[test]
fn test_high_overlap_and_order_merges() {
    // 20 of 21 keys shared, root included, and two adjacent pairs swapped
    let desktop = keys(0..20);
    let mut mobile = keys(0..19);
    mobile.push("extra".to_string());
    mobile.swap(3, 4);
    mobile.swap(10, 11);

    let fragments = ResponsiveFragments::new()
        .with_mobile(keyed(&mobile))
        .with_desktop(keyed(&desktop));
    let decision = decide_responsive_strategy(&fragments, &ReconcileConfig::default()).unwrap();

    assert_eq!(decision.base, Some(Viewport::Mobile));
    assert_eq!(decision.strategy, Strategy::Merge);
    let score = &decision.scores[0];
    assert_eq!(score.viewport, Viewport::Desktop);
    assert!((score.overlap - 20.0 / 21.0).abs() < 1e-9, "{}", score.overlap);
    assert!(score.order >= 0.85 && score.order < 1.0);
}

#[test]
fn test_button_count_forces_swap() {
    let mobile = r#"<div data-key="root"><p data-key="a">Hi</p><button data-key="b" type="button">Go</button></div>"#;
    let desktop = r#"<div data-key="root"><p data-key="a">Hi</p><div data-key="b">Go</div></div>"#;
    let fragments = ResponsiveFragments::new()
        .with_mobile(mobile)
        .with_desktop(desktop);
    let (reconciled, decision) = reconcile(&fragments, &ReconcileConfig::default()).unwrap();

    assert_eq!(decision.strategy, Strategy::Swap);
    assert_eq!(decision.scores[0].overlap, 1.0);
    assert_eq!(decision.scores[0].hard_fails, vec!["button count 1 != 0"]);
    assert_eq!(
        reconciled,
        Reconciled::Swap(ViewportSet(vec![
            (Viewport::Mobile, mobile.to_string()),
            (Viewport::Desktop, desktop.to_string()),
        ]))
    );
}

#[test]
fn test_merge_appends_bucketed_overrides() {
    let fragments = ResponsiveFragments::new()
        .with_desktop(r#"<section data-key="root" class="flex flex-col gap-8"><h1 data-key="title" class="text-[64px]">Hello</h1></section>"#)
        .with_mobile(r#"<section data-key="root" class="flex flex-row gap-8"><h1 data-key="title" class="text-[32px]">Hello</h1></section>"#);
    let (reconciled, decision) = reconcile(&fragments, &ReconcileConfig::default()).unwrap();
    assert_eq!(decision.strategy, Strategy::Merge);

    let Reconciled::Merged(html) = reconciled else {
        panic!("expected a merged document");
    };
    assert_eq!(
        classes_of(&html, "root"),
        vec!["flex", "flex-col", "gap-8", r#"[[data-bucket="mobile"]_&]:flex-row"#]
    );
    assert_eq!(
        classes_of(&html, "title"),
        vec!["text-[64px]", r#"[[data-bucket="mobile"]_&]:text-[32px]"#]
    );
}

#[test]
fn test_media_variant_tokens_are_not_bucketed() {
    let fragments = ResponsiveFragments::new()
        .with_desktop(r#"<div data-key="root" class="grid"></div>"#)
        .with_tablet(r#"<div data-key="root" class="grid md:grid-cols-2"></div>"#);
    let merged = merge_responsive_fragments(&fragments).unwrap();
    assert_eq!(classes_of(&merged, "root"), vec!["grid", "md:grid-cols-2"]);
}

#[test]
fn test_fallback_with_one_fragment() {
    let html = r#"<div data-key="root"></div>"#;
    let fragments = ResponsiveFragments::new().with_desktop(html);
    let (reconciled, decision) = reconcile(&fragments, &ReconcileConfig::default()).unwrap();
    assert_eq!(decision.strategy, Strategy::Single);
    assert_eq!(reconciled.to_html(), html);

    let (reconciled, decision) =
        reconcile(&ResponsiveFragments::new(), &ReconcileConfig::default()).unwrap();
    assert_eq!(decision.strategy, Strategy::Single);
    assert_eq!(decision.base, None);
    assert_eq!(reconciled.to_html(), "");
}

#[test]
fn test_thresholds_come_from_config() {
    let desktop = keys(0..10);
    let mut mobile = keys(0..8);
    mobile.extend(["x".to_string(), "y".to_string()]);
    let fragments = ResponsiveFragments::new()
        .with_mobile(keyed(&mobile))
        .with_desktop(keyed(&desktop));

    // 9 of 11 keys shared, root included
    let strict = decide_responsive_strategy(&fragments, &ReconcileConfig::default()).unwrap();
    assert_eq!(strict.strategy, Strategy::Swap);

    let lenient = ReconcileConfig::new().with_merge_overlap(0.8);
    let decision = decide_responsive_strategy(&fragments, &lenient).unwrap();
    assert_eq!(decision.strategy, Strategy::Merge);
}

#[test]
fn test_decision_serializes() {
    let fragments = ResponsiveFragments::new()
        .with_mobile(r#"<div data-key="root"></div>"#)
        .with_desktop(r#"<div data-key="root"></div>"#);
    let decision = decide_responsive_strategy(&fragments, &ReconcileConfig::default()).unwrap();
    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["strategy"], "merge");
    assert_eq!(json["base"], "mobile");
    assert_eq!(json["scores"][0]["viewport"], "desktop");
}
