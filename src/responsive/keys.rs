//! Element identity across independently exported viewport fragments

use std::collections::HashMap;

use crate::markup::Document;

/// Tags whose text content can identify them when primary keys disagree
const TEXT_BEARING: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "label", "li", "blockquote", "strong", "em",
    "small", "a", "button",
];

/// Primary key per element in document order: `data-key`, `data-node`,
/// `id`, else `tag#n` for the n-th occurrence of the tag
pub fn primary_keys(doc: &Document<'_>) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    doc.nodes
        .iter()
        .map(|node| {
            let count = seen.entry(node.tag.as_str()).or_insert(0);
            *count += 1;
            node.attr("data-key")
                .or_else(|| node.attr("data-node"))
                .or_else(|| node.attr("id"))
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}#{}", node.tag, count))
        })
        .collect()
}

fn tag_family(tag: &str) -> &str {
    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        other => other,
    }
}

/// `(tag family, normalized text)` for text-bearing elements with text
pub fn secondary_key(doc: &Document<'_>, index: usize) -> Option<String> {
    let node = doc.node(index);
    if !TEXT_BEARING.contains(&node.tag.as_str()) {
        return None;
    }
    let text = doc.text_content(index).to_lowercase();
    if text.is_empty() {
        return None;
    }
    Some(format!("{}|{}", tag_family(&node.tag), text))
}

pub fn secondary_keys(doc: &Document<'_>) -> Vec<Option<String>> {
    (0..doc.len()).map(|i| secondary_key(doc, i)).collect()
}
