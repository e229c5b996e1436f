//! Core type definitions for markup-element trees
//!
//! Key design principles:
//! 1. Use u32 indices (4 bytes vs 8 bytes pointer)
//! 2. Use SmallVec for small arrays (avoid heap allocation)
//! 3. Attribute order is observable in output, so attributes live in an
//!    ordered pair vector, never a hash map

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Node identifier (index into arena)
/// u32 allows 4 billion nodes, enough for any document
pub type NodeId = u32;

/// Tag applied to freshly opened nodes until `set_tag` overwrites it
pub const DEFAULT_TAG: &str = "div";

/// Tags that never carry a body or closing tag in output
pub const DEFAULT_SELF_CLOSING: &[&str] = &["img", "br", "hr", "source", "input", "meta", "embed"];

/// Attribute shortcut name → real attribute name
///
/// Statically enumerated; anything outside this table is rejected rather
/// than dispatched.
pub const SHORTCUT_ATTRIBUTES: &[(&str, &str)] = &[
    ("class", "class"),
    ("id", "id"),
    ("url", "href"),
    ("href", "href"),
    ("src", "src"),
    ("alt", "alt"),
    ("title", "title"),
    ("name", "name"),
    ("type", "type"),
    ("value", "value"),
    ("placeholder", "placeholder"),
    ("target", "target"),
    ("rel", "rel"),
    ("role", "role"),
];

/// Stored state of one attribute entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    /// Present with no value; assembles to the bare name
    Flag,
    /// Accumulated values, joined with a single space on assembly
    Values(Vec<String>),
}

/// Input to an attribute write. Three-way protocol:
/// `Remove` deletes the entry, `Flag` marks present-without-value,
/// `Value` appends to the entry's value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrInput {
    Remove,
    Flag,
    Value(String),
}

impl From<&str> for AttrInput {
    fn from(value: &str) -> Self {
        AttrInput::Value(value.to_string())
    }
}

impl From<String> for AttrInput {
    fn from(value: String) -> Self {
        AttrInput::Value(value)
    }
}

impl From<bool> for AttrInput {
    /// `true` marks a flag attribute, `false` removes the entry
    fn from(value: bool) -> Self {
        if value {
            AttrInput::Flag
        } else {
            AttrInput::Remove
        }
    }
}

/// Result of an attribute lookup. Never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrState<'a> {
    Absent,
    Flag,
    Values(&'a [String]),
}

/// One slot in a node's ordered content list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Content {
    /// Literal text, emitted as-is
    Text(String),
    /// Stringified to decimal form at collapse time
    Int(i64),
    /// Stringified to decimal form at collapse time
    Float(f64),
    /// `true` is dropped at collapse time; a lone `false` suppresses the
    /// whole node
    Bool(bool),
    /// Composite item; dropped at collapse time but keeps its slot
    Items(Vec<Content>),
    /// Frozen string snapshot of a closed child. `html` is `None` when the
    /// child serialized to nothing; the parent's joining skips it then.
    Fragment { child: NodeId, html: Option<String> },
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Content::Text(value.to_string())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Content::Text(value)
    }
}

impl From<i64> for Content {
    fn from(value: i64) -> Self {
        Content::Int(value)
    }
}

impl From<f64> for Content {
    fn from(value: f64) -> Self {
        Content::Float(value)
    }
}

impl From<bool> for Content {
    fn from(value: bool) -> Self {
        Content::Bool(value)
    }
}

impl From<Vec<Content>> for Content {
    fn from(value: Vec<Content>) -> Self {
        Content::Items(value)
    }
}

/// The tree node
///
/// Design:
/// - Navigation is by index: `parent_id` upward, `children_ids` downward
/// - `children_ids` holds only closed children; an open child is reachable
///   solely through the cursor until it closes
/// - `aliases` maps caller-chosen names to child ids, scoped to this node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub node_id: NodeId,
    pub parent_id: Option<NodeId>,

    pub tag: String,
    pub attributes: Vec<(String, AttrValue)>,
    pub content: Vec<Content>,
    content_keys: AHashMap<String, usize>,

    pub children_ids: SmallVec<[NodeId; 4]>,
    pub aliases: AHashMap<String, NodeId>,

    /// Opaque identity token, never reused
    pub uuid: String,
}

impl Node {
    /// Create a new node with the default tag
    pub fn new(node_id: NodeId, parent_id: Option<NodeId>) -> Self {
        Self {
            node_id,
            parent_id,
            tag: DEFAULT_TAG.to_string(),
            attributes: Vec::new(),
            content: Vec::new(),
            content_keys: AHashMap::new(),
            children_ids: SmallVec::new(),
            aliases: AHashMap::new(),
            uuid: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Overwrite the tag. Last write wins; an empty tag is ignored.
    pub fn set_tag(&mut self, tag: &str) {
        if tag.is_empty() {
            tracing::debug!("[Node] ignoring empty tag write on node {}", self.node_id);
            return;
        }
        self.tag = tag.to_string();
    }

    /// Apply one attribute write (see [`AttrInput`])
    pub fn set_attr(&mut self, name: &str, value: AttrInput) {
        let entry = self.attributes.iter().position(|(n, _)| n == name);
        match value {
            AttrInput::Remove => {
                self.attributes.retain(|(n, _)| n != name);
            }
            AttrInput::Flag => match entry {
                Some(idx) => self.attributes[idx].1 = AttrValue::Flag,
                None => self.attributes.push((name.to_string(), AttrValue::Flag)),
            },
            AttrInput::Value(v) => match entry {
                Some(idx) => match &mut self.attributes[idx].1 {
                    AttrValue::Values(values) => values.push(v),
                    // A plain value over a flag entry replaces the flag
                    // with a one-value list.
                    slot => *slot = AttrValue::Values(vec![v]),
                },
                None => self
                    .attributes
                    .push((name.to_string(), AttrValue::Values(vec![v]))),
            },
        }
    }

    /// Look up one attribute. Never fails.
    pub fn attr(&self, name: &str) -> AttrState<'_> {
        for (n, value) in &self.attributes {
            if n == name {
                return match value {
                    AttrValue::Flag => AttrState::Flag,
                    AttrValue::Values(values) => AttrState::Values(values),
                };
            }
        }
        AttrState::Absent
    }

    /// Append a content item
    pub fn add_content(&mut self, item: Content) {
        self.content.push(item);
    }

    /// Insert a content item under a caller key. A repeated key rewrites
    /// the original slot instead of appending.
    pub fn set_keyed_content(&mut self, key: &str, item: Content) {
        match self.content_keys.get(key) {
            Some(&slot) => self.content[slot] = item,
            None => {
                self.content_keys.insert(key.to_string(), self.content.len());
                self.content.push(item);
            }
        }
    }

    /// Slot index of the frozen fragment for `child`, if one exists
    pub fn fragment_slot(&self, child: NodeId) -> Option<usize> {
        self.content.iter().position(
            |item| matches!(item, Content::Fragment { child: c, .. } if *c == child),
        )
    }

    /// Record `alias → child`. A duplicate alias overwrites the stored id,
    /// not the child.
    pub fn set_alias(&mut self, alias: &str, child: NodeId) {
        self.aliases.insert(alias.to_string(), child);
    }

    /// Register a closed child. Idempotent.
    pub fn register_child(&mut self, child: NodeId) {
        if !self.children_ids.contains(&child) {
            self.children_ids.push(child);
        }
    }

    /// Whether `child` has been closed into this node
    pub fn has_closed_child(&self, child: NodeId) -> bool {
        self.children_ids.contains(&child)
    }
}
