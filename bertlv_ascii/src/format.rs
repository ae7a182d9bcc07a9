use std::fmt::Write;

use bertlv::{Item, ParseOutcome, hex};

/// Formats items as indented human-readable ASCII text, one item per line.
pub fn to_ascii(items: &[Item]) -> String {
    let mut output = String::new();
    for item in items {
        format_item(&mut output, item, 0);
    }
    output
}

/// Formats everything a best-effort parse produced. On failure the complete
/// items are followed by the error and the partially decoded item, if any.
pub fn outcome_to_ascii(outcome: &ParseOutcome) -> String {
    let mut output = to_ascii(&outcome.items);
    if let Some(err) = &outcome.error {
        writeln!(output, "# {}", err).unwrap();
        if let Some(partial) = err.partial_item() {
            output.push_str("# partial:\n");
            format_item(&mut output, partial, 0);
        }
    }
    output
}

/// Formats an item with the given indentation level.
fn format_item(output: &mut String, item: &Item, indent: usize) {
    let indent_str = "  ".repeat(indent);
    write!(output, "{}[{}]", indent_str, item.tag()).unwrap();

    if let Some(value) = item.value() {
        if !value.is_empty() {
            write!(output, " {}", hex::encode(value)).unwrap();
        }
        output.push('\n');
        return;
    }

    let children = item.items().unwrap_or_default();
    if children.is_empty() {
        output.push_str(" {}\n");
        return;
    }
    output.push_str(" {\n");
    for child in children {
        format_item(output, child, indent + 1);
    }
    output.push_str(&indent_str);
    output.push_str("}\n");
}
