//! Term maps: constant, column, and template-based value-producing
//! elements that convert a row (or a constant) into an RDF term.

use percent_encoding::{percent_encode_byte, AsciiSet, NON_ALPHANUMERIC};

use crate::term::{Node, NamespaceEnv, TermType};
use crate::value::Row;

/// The unreserved set of RFC 3986: everything *not* in this set is
/// percent-encoded as `%HH` with uppercase hex, per §4.3/§6. `-`, `_`, `.`,
/// and `~` are unreserved; `percent_encoding`'s `NON_ALPHANUMERIC` treats
/// them as reserved, so they are carved back out here.
const TEMPLATE_RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes `value` per the unreserved-character rule in §4.3/§6.
pub fn percent_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| {
            if TEMPLATE_RESERVED.contains(&b) {
                percent_encode_byte(b).to_string()
            } else {
                (b as char).to_string()
            }
        })
        .collect()
}

/// The value-generation strategy of a term map.
#[derive(Clone, Debug, PartialEq)]
pub enum TermMapKind {
    /// Returns the stored node unchanged, regardless of row.
    Constant(Node),
    /// Reads the named column from the row.
    Column(String),
    /// Expands `{COLUMN}` placeholders against the row, percent-encoding
    /// each substituted value.
    Template(String),
}

/// A term map: the value-generation strategy above, plus the shared
/// optional annotations every R2RML term map carries.
#[derive(Clone, Debug, PartialEq)]
pub struct TermMap {
    pub kind: TermMapKind,
    pub term_type: TermType,
    pub language: Option<String>,
    pub datatype: Option<String>,
    /// Parsed but never evaluated by the core.
    pub inverse_expression: Option<String>,
}

impl TermMap {
    pub fn constant(node: Node, term_type: TermType) -> Self {
        TermMap {
            kind: TermMapKind::Constant(node),
            term_type,
            language: None,
            datatype: None,
            inverse_expression: None,
        }
    }

    pub fn column(column: impl Into<String>, term_type: TermType) -> Self {
        TermMap {
            kind: TermMapKind::Column(column.into()),
            term_type,
            language: None,
            datatype: None,
            inverse_expression: None,
        }
    }

    pub fn template(template: impl Into<String>, term_type: TermType) -> Self {
        TermMap {
            kind: TermMapKind::Template(template.into()),
            term_type,
            language: None,
            datatype: None,
            inverse_expression: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        match &self.kind {
            TermMapKind::Constant(node) => !matches!(node, Node::Null)
                && match node {
                    Node::Iri(s) => !s.is_empty(),
                    _ => true,
                },
            TermMapKind::Column(c) => !c.is_empty(),
            TermMapKind::Template(t) => !t.is_empty(),
        }
    }

    /// Wraps `lexical` as an IRI, literal, or blank node per this term
    /// map's `term_type`, attaching `datatype`/`language` for literals.
    fn wrap(&self, lexical: String) -> Node {
        match self.term_type {
            TermType::Iri => Node::Iri(lexical),
            TermType::BlankNode => Node::BlankNode(lexical),
            TermType::Literal => Node::Literal {
                lexical,
                datatype: self.datatype.clone(),
                language: self.language.clone(),
            },
        }
    }

    /// Evaluates this term map against `row`, producing an RDF node
    /// (possibly [`Node::Null`]) per §4.3.
    pub fn evaluate(&self, row: &Row, _env: &NamespaceEnv) -> Node {
        match &self.kind {
            TermMapKind::Constant(node) => node.clone(),
            TermMapKind::Column(column) => {
                let value = row.get(column);
                match value.lexical_form() {
                    None => Node::Null,
                    Some(lexical) => self.wrap(lexical.into_owned()),
                }
            }
            TermMapKind::Template(template) => match expand_template(template, row) {
                None => Node::Null,
                Some(expanded) => self.wrap(expanded),
            },
        }
    }
}

/// Scans `template` left to right, copying literal runs verbatim and
/// substituting `{COLUMN}` placeholders with the row's percent-encoded
/// value. A `Null` column aborts expansion entirely (returns `None`). A
/// `{` with no matching `}` ends expansion early; the remainder of the
/// template (including the unmatched `{`) is treated as literal text.
fn expand_template(template: &str, row: &Row) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            match template[i + 1..].find('}') {
                None => {
                    // Malformed placeholder: treat the rest as literal text.
                    out.push_str(&template[i..]);
                    break;
                }
                Some(rel_end) => {
                    let end = i + 1 + rel_end;
                    let column = &template[i + 1..end];
                    let value = row.get(column);
                    match value.lexical_form() {
                        None => return None,
                        Some(lexical) => out.push_str(&percent_encode(&lexical)),
                    }
                    i = end + 1;
                }
            }
        } else {
            // Copy one UTF-8 character's worth of bytes.
            let ch_len = utf8_char_len(bytes[i]);
            out.push_str(&template[i..i + ch_len]);
            i += ch_len;
        }
    }
    Some(out)
}

fn utf8_char_len(lead_byte: u8) -> usize {
    if lead_byte & 0x80 == 0 {
        1
    } else if lead_byte & 0xE0 == 0xC0 {
        2
    } else if lead_byte & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}
