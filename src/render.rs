use std::{fmt::Write, path::Path};

use anyhow::Result;
use serde::Deserialize;

use crate::descriptions::{DescriptionMap, ALG_CREATOR, ALG_DESC, ALG_HELP_CREATOR};

/// One parameter or output of an algorithm: `name` is the key into the
/// description mapping, `description` the human-readable heading text.
#[derive(Debug, Clone, Deserialize)]
pub struct HelpField {
    pub name: String,
    pub description: String,
}

/// The externally-owned descriptor of the algorithm being documented. Not
/// mutated by this crate; parameter and output order is preserved in the
/// rendered document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlgorithmDescriptor {
    pub parameters: Vec<HelpField>,
    pub outputs: Vec<HelpField>,
}

/// Renders the help document for `alg` from the mapping stored at
/// `help_file`, or `Ok(None)` when no help file exists at that path.
pub fn html_from_help_file<P: AsRef<Path>>(
    alg: &AlgorithmDescriptor,
    help_file: P,
) -> Result<Option<String>> {
    let Some(descriptions) = DescriptionMap::load(help_file)? else {
        return Ok(None);
    };
    Ok(Some(render_help(alg, &descriptions)))
}

/// Renders the fixed help document: description section, one heading and
/// paragraph per parameter and output in descriptor order, and right-aligned
/// attribution lines. Absent mapping keys render as empty slots.
#[must_use]
pub fn render_help(alg: &AlgorithmDescriptor, descriptions: &DescriptionMap) -> String {
    let mut html = String::from("<html><body><h2>Algorithm description</h2>\n");
    push_paragraph(&mut html, &descriptions.lookup(ALG_DESC));

    html.push_str("<h2>Input parameters</h2>\n");
    for param in &alg.parameters {
        push_field(&mut html, param, descriptions);
    }

    html.push_str("<h2>Outputs</h2>\n");
    for output in &alg.outputs {
        push_field(&mut html, output, descriptions);
    }

    html.push_str("<br>");
    let _ = write!(
        html,
        "<p align=\"right\">Algorithm author: {}</p>",
        descriptions.lookup(ALG_CREATOR)
    );
    let _ = write!(
        html,
        "<p align=\"right\">Help author: {}</p>",
        descriptions.lookup(ALG_HELP_CREATOR)
    );
    html.push_str("</body></html>");
    html
}

fn push_field(html: &mut String, field: &HelpField, descriptions: &DescriptionMap) {
    html.push_str("<h3>");
    html.push_str(&field.description);
    html.push_str("</h3>\n");
    push_paragraph(html, &descriptions.lookup(&field.name));
}

fn push_paragraph(html: &mut String, text: &str) {
    html.push_str("<p>");
    html.push_str(text);
    html.push_str("</p>\n");
}
