//! Serializer - Convert nodes to markup text
//!
//! This module handles:
//! - Assembling the attribute table into `name='v1 v2'` / bare-flag tokens
//! - Collapsing the mixed content list into a body string
//! - The suppression rule: a lone `false` content entry makes the whole
//!   node serialize to nothing
//! - Self-closing tags, which never carry a body

use crate::arena::NodeArena;
use crate::error::Result;
use crate::types::{AttrValue, Content, NodeId, DEFAULT_SELF_CLOSING};
use crate::utils::join_parts;

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    /// Tags emitted as `<tag attrs>` with no body and no closing tag
    pub self_closing: Vec<String>,
    /// Trim leading/trailing whitespace of the joined content string
    pub trim_content: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            self_closing: DEFAULT_SELF_CLOSING.iter().map(|s| s.to_string()).collect(),
            trim_content: false,
        }
    }
}

/// Per-node markup renderer
#[derive(Debug, Clone)]
pub struct Serializer {
    config: SerializerConfig,
}

impl Serializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Serialize a single node.
    ///
    /// `Ok(None)` means the node suppressed itself (its content collapsed
    /// to nothing); callers skip it entirely, tag included.
    pub fn serialize(&self, arena: &NodeArena, node_id: NodeId) -> Result<Option<String>> {
        let node = arena.get(node_id)?;
        let attrs = assemble_attrs(&node.attributes);

        if self.is_self_closing(&node.tag) {
            return Ok(Some(format!("<{} {}>", node.tag, attrs)));
        }

        match self.collapse(&node.content) {
            Some(body) => Ok(Some(format!("<{} {}>{}</{}>", node.tag, attrs, body, node.tag))),
            None => {
                tracing::debug!("[Serializer] node {} suppressed", node_id);
                Ok(None)
            }
        }
    }

    /// Collapse a content list into a body string.
    ///
    /// Returns `None` when the list suppresses: exactly one meaningful
    /// entry remains and it is `false`. Meaningful entries are those that
    /// either render or suppress; `true`, composites and already-suppressed
    /// fragments are dropped and count for nothing.
    pub fn collapse(&self, content: &[Content]) -> Option<String> {
        let mut parts: Vec<String> = Vec::with_capacity(content.len());
        let mut meaningful = 0usize;
        let mut false_entries = 0usize;

        for item in content {
            match item {
                Content::Text(text) => {
                    meaningful += 1;
                    parts.push(text.clone());
                }
                Content::Int(n) => {
                    meaningful += 1;
                    parts.push(n.to_string());
                }
                Content::Float(n) => {
                    meaningful += 1;
                    parts.push(n.to_string());
                }
                Content::Bool(false) => {
                    meaningful += 1;
                    false_entries += 1;
                    // A non-lone `false` joins as an empty token.
                    parts.push(String::new());
                }
                Content::Bool(true) | Content::Items(_) => {}
                Content::Fragment { html: Some(html), .. } => {
                    meaningful += 1;
                    parts.push(html.clone());
                }
                Content::Fragment { html: None, .. } => {}
            }
        }

        if meaningful == 1 && false_entries == 1 {
            return None;
        }

        let joined = join_parts(&parts, " ");
        if self.config.trim_content {
            Some(joined.trim().to_string())
        } else {
            Some(joined)
        }
    }

    fn is_self_closing(&self, tag: &str) -> bool {
        self.config.self_closing.iter().any(|t| t == tag)
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble an attribute table into a single string.
///
/// Iterates in insertion order; a flag entry emits the bare name, a valued
/// entry emits `name='v1 v2'`; entries with no remaining values are
/// absent. Pure and idempotent.
pub fn assemble_attrs(attributes: &[(String, AttrValue)]) -> String {
    let mut tokens: Vec<String> = Vec::with_capacity(attributes.len());

    for (name, value) in attributes {
        match value {
            AttrValue::Flag => tokens.push(name.clone()),
            AttrValue::Values(values) if values.is_empty() => {}
            AttrValue::Values(values) => {
                tokens.push(format!("{}='{}'", name, values.join(" ")));
            }
        }
    }

    join_parts(&tokens, " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttrInput, Node};

    fn node_with_attrs(pairs: &[(&str, AttrInput)]) -> Node {
        let mut node = Node::new(0, None);
        for (name, value) in pairs {
            node.set_attr(name, value.clone());
        }
        node
    }

    #[test]
    fn test_assemble_follows_insertion_order() {
        let node = node_with_attrs(&[
            ("src", AttrInput::from("x")),
            ("class", AttrInput::from("a")),
            ("async", AttrInput::Flag),
        ]);

        assert_eq!(assemble_attrs(&node.attributes), "src='x' class='a' async");
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let node = node_with_attrs(&[("class", AttrInput::from("a")), ("id", AttrInput::from("b"))]);

        let first = assemble_attrs(&node.attributes);
        let second = assemble_attrs(&node.attributes);
        assert_eq!(first, second);
        assert_eq!(first, "class='a' id='b'");
    }

    #[test]
    fn test_assemble_joins_accumulated_values() {
        let node = node_with_attrs(&[
            ("class", AttrInput::from("a")),
            ("class", AttrInput::from("b")),
        ]);

        assert_eq!(assemble_attrs(&node.attributes), "class='a b'");
    }

    #[test]
    fn test_assemble_skips_empty_value_lists() {
        let mut node = Node::new(0, None);
        node.attributes.push(("data-x".to_string(), AttrValue::Values(Vec::new())));
        node.set_attr("id", AttrInput::from("y"));

        assert_eq!(assemble_attrs(&node.attributes), "id='y'");
    }

    #[test]
    fn test_collapse_stringifies_numbers() {
        let serializer = Serializer::new();
        let content = vec![Content::from("n ="), Content::from(42i64), Content::from(2.5f64)];

        assert_eq!(serializer.collapse(&content), Some("n = 42 2.5".to_string()));
    }

    #[test]
    fn test_collapse_drops_true_and_composites() {
        let serializer = Serializer::new();
        let content = vec![
            Content::from("a"),
            Content::from(true),
            Content::from(vec![Content::from("hidden")]),
            Content::from("b"),
        ];

        assert_eq!(serializer.collapse(&content), Some("a b".to_string()));
    }

    #[test]
    fn test_collapse_lone_false_suppresses() {
        let serializer = Serializer::new();
        assert_eq!(serializer.collapse(&[Content::from(false)]), None);

        // Dropped entries don't rescue a lone false.
        let content = vec![Content::from(true), Content::from(false)];
        assert_eq!(serializer.collapse(&content), None);
    }

    #[test]
    fn test_collapse_accompanied_false_joins_empty() {
        let serializer = Serializer::new();
        let content = vec![Content::from("a"), Content::from(false), Content::from("b")];

        assert_eq!(serializer.collapse(&content), Some("a  b".to_string()));
    }

    #[test]
    fn test_collapse_trim_option() {
        let serializer = Serializer::with_config(SerializerConfig {
            trim_content: true,
            ..SerializerConfig::default()
        });
        let content = vec![Content::from(" padded "), Content::from("text")];

        assert_eq!(serializer.collapse(&content), Some("padded  text".to_string()));
    }

    #[test]
    fn test_collapse_skips_suppressed_fragments() {
        let serializer = Serializer::new();
        let content = vec![
            Content::from("before"),
            Content::Fragment { child: 1, html: None },
            Content::from("after"),
        ];

        assert_eq!(serializer.collapse(&content), Some("before after".to_string()));
    }

    #[test]
    fn test_serialize_plain_and_empty_attrs() {
        let mut arena = NodeArena::new();
        let id = arena.alloc(None);
        if let Ok(node) = arena.get_mut(id) {
            node.add_content(Content::from("hi"));
        }

        let serializer = Serializer::new();
        assert_eq!(
            serializer.serialize(&arena, id).unwrap(),
            Some("<div >hi</div>".to_string())
        );
    }

    #[test]
    fn test_serialize_self_closing_ignores_content() {
        let mut arena = NodeArena::new();
        let id = arena.alloc(None);
        if let Ok(node) = arena.get_mut(id) {
            node.set_tag("img");
            node.set_attr("src", AttrInput::from("x"));
            node.add_content(Content::from("invisible"));
        }

        let serializer = Serializer::new();
        assert_eq!(
            serializer.serialize(&arena, id).unwrap(),
            Some("<img src='x'>".to_string())
        );
    }

    #[test]
    fn test_serialize_respects_configured_self_closing_set() {
        let mut arena = NodeArena::new();
        let id = arena.alloc(None);
        if let Ok(node) = arena.get_mut(id) {
            node.set_tag("icon");
        }

        let serializer = Serializer::with_config(SerializerConfig {
            self_closing: vec!["icon".to_string()],
            ..SerializerConfig::default()
        });
        assert_eq!(serializer.serialize(&arena, id).unwrap(), Some("<icon >".to_string()));

        // The same tag with the default set gets a body and closing tag.
        let default_serializer = Serializer::new();
        assert_eq!(
            default_serializer.serialize(&arena, id).unwrap(),
            Some("<icon ></icon>".to_string())
        );
    }

    #[test]
    fn test_serialize_suppressed_node_yields_nothing() {
        let mut arena = NodeArena::new();
        let id = arena.alloc(None);
        if let Ok(node) = arena.get_mut(id) {
            node.set_tag("aside");
            node.add_content(Content::from(false));
        }

        let serializer = Serializer::new();
        assert_eq!(serializer.serialize(&arena, id).unwrap(), None);
    }
}
