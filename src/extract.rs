//! Label/value extraction from form-notification HTML

use crate::error::HtmlError;
use scraper::node::Node;
use scraper::{ElementRef, Html};
use tracing::debug;

/// Footer text that ends the form-derived content of a notification
pub const SENTINEL: &str = "Sent via form submission from";

const LABEL_TAG: &str = "b";
const VALUE_TAG: &str = "span";

/// Parse an HTML body and collect its `"<label> <value>"` strings in document order
pub fn extract_labels(html: &str) -> Result<Vec<String>, HtmlError> {
    if html.trim().is_empty() {
        return Err(HtmlError::Empty);
    }

    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        debug!(
            "HTML parser recovered from {} error(s)",
            document.errors.len()
        );
    }

    Ok(label_pairs(&document))
}

/// Walk the document in pre-order, pairing each `<b>` with its next `<span>` sibling.
///
/// The walk ends for good at the first text node starting with [`SENTINEL`];
/// nothing after it in document order is looked at.
#[must_use]
pub fn label_pairs(document: &Html) -> Vec<String> {
    document
        .tree
        .root()
        .descendants()
        .map_while(|node| match node.value() {
            Node::Text(text) if text.trim().starts_with(SENTINEL) => None,
            Node::Element(element) if element.name() == LABEL_TAG => {
                Some(ElementRef::wrap(node).and_then(labelled_value))
            }
            _ => Some(None),
        })
        .flatten()
        .collect()
}

fn labelled_value(label: ElementRef<'_>) -> Option<String> {
    label
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == VALUE_TAG)
        .map(|value| format!("{} {}", inner_text(label), inner_text(value)))
}

fn inner_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Strip the `label:` prefix from an extracted line.
///
/// Everything after the first colon is kept, so values such as `10:30`
/// survive. A line without a colon has no value and yields `""`.
#[must_use]
pub fn clean_field(line: &str) -> &str {
    line.split_once(':').map_or("", |(_, value)| value.trim())
}
