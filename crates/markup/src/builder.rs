//! Builder - fluent construction of the element tree
//!
//! The builder owns the arena and a cursor: the one open node that chained
//! calls apply to. Opening descends into a fresh child, closing freezes
//! the child's markup into its parent and climbs back up, nesting revisits
//! a closed child by alias. Mutating calls return `&mut Self`; navigation
//! that can fail returns `Result<&mut Self>` so chains stay explicit.

use crate::arena::NodeArena;
use crate::error::{MarkupError, Result};
use crate::serializer::{Serializer, SerializerConfig};
use crate::types::{AttrInput, AttrState, Content, Node, NodeId, SHORTCUT_ATTRIBUTES};
use crate::utils::safe_name;

/// What a close does when the node already has a frozen fragment in its
/// parent (the node was closed before and reopened via `nest`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReopenPolicy {
    /// Every close appends a fresh fragment, so closing a reopened child a
    /// second time leaves both snapshots in the parent. This is the
    /// default.
    AppendDuplicate,
    /// A re-close rewrites the child's existing fragment slot in place,
    /// keeping its original position.
    ReplaceInPlace,
}

/// Configuration for a builder session
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    pub reopen_policy: ReopenPolicy,
    pub serializer: SerializerConfig,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            reopen_policy: ReopenPolicy::AppendDuplicate,
            serializer: SerializerConfig::default(),
        }
    }
}

/// Fluent element-tree builder
///
/// One builder is one single-threaded session; the arena, cursor, and all
/// node tables belong to it exclusively.
#[derive(Debug)]
pub struct Builder {
    config: BuilderConfig,
    serializer: Serializer,
    arena: NodeArena,
    cursor: NodeId,
}

impl Builder {
    /// Create a builder with a fresh root node (default tag)
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    /// Create a builder with custom config
    pub fn with_config(config: BuilderConfig) -> Self {
        let serializer = Serializer::with_config(config.serializer.clone());
        let mut arena = NodeArena::new();
        let root = arena.alloc(None);
        arena.set_root(root).ok();
        Self {
            config,
            serializer,
            arena,
            cursor: root,
        }
    }

    /// Get reference to internal arena
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Get mutable reference to internal arena
    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Id of the node the cursor is on
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// The node the cursor is on
    pub fn node(&self) -> Result<&Node> {
        self.arena.get(self.cursor)
    }

    // ------------------------------------------------------------------
    // Mutation of the current node
    // ------------------------------------------------------------------

    /// Overwrite the current node's tag. Last write wins.
    pub fn set_tag(&mut self, tag: &str) -> &mut Self {
        if let Ok(node) = self.arena.get_mut(self.cursor) {
            node.set_tag(tag);
        }
        self
    }

    /// Apply one attribute write (see [`AttrInput`])
    pub fn set_attr<V: Into<AttrInput>>(&mut self, name: &str, value: V) -> &mut Self {
        let value = value.into();
        if let Ok(node) = self.arena.get_mut(self.cursor) {
            node.set_attr(name, value);
        }
        self
    }

    /// Apply attribute writes per pair, in iteration order
    pub fn set_attrs<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrInput>,
    {
        for (name, value) in pairs {
            self.set_attr(name.as_ref(), value);
        }
        self
    }

    /// Look up an attribute on the current node. Never fails.
    pub fn attr(&self, name: &str) -> AttrState<'_> {
        match self.arena.get(self.cursor) {
            Ok(node) => node.attr(name),
            Err(_) => AttrState::Absent,
        }
    }

    /// `class` shortcut
    pub fn class(&mut self, value: &str) -> &mut Self {
        self.set_attr("class", value)
    }

    /// `id` shortcut
    pub fn id_attr(&mut self, value: &str) -> &mut Self {
        self.set_attr("id", value)
    }

    /// `href` shortcut, for links
    pub fn url(&mut self, value: &str) -> &mut Self {
        self.set_attr("href", value)
    }

    /// `style` shortcut. Each call appends one `property: value;`
    /// declaration to the style attribute.
    pub fn style(&mut self, property: &str, value: &str) -> &mut Self {
        let declaration = format!("{}: {};", property, value);
        self.set_attr("style", declaration)
    }

    /// Resolve a shortcut name through the static table and apply the
    /// write. Unknown shortcuts are rejected, never dispatched.
    pub fn set_shortcut<V: Into<AttrInput>>(&mut self, shortcut: &str, value: V) -> Result<&mut Self> {
        match SHORTCUT_ATTRIBUTES.iter().find(|(name, _)| *name == shortcut) {
            Some(&(_, attr)) => Ok(self.set_attr(attr, value)),
            None => {
                tracing::warn!("[Builder] unknown attribute shortcut {:?}", shortcut);
                Err(MarkupError::InvalidName(shortcut.to_string()))
            }
        }
    }

    /// Append a content item to the current node
    pub fn add_content<C: Into<Content>>(&mut self, item: C) -> &mut Self {
        let item = item.into();
        if let Ok(node) = self.arena.get_mut(self.cursor) {
            node.add_content(item);
        }
        self
    }

    /// Append a content item under a caller key; a repeated key rewrites
    /// the original slot. The key must pass the identifier rule.
    pub fn add_keyed_content<C: Into<Content>>(&mut self, key: &str, item: C) -> Result<&mut Self> {
        let Some(key) = safe_name(key) else {
            tracing::warn!("[Builder] rejected content key {:?}", key);
            return Err(MarkupError::InvalidName(key.to_string()));
        };
        let item = item.into();
        self.arena.get_mut(self.cursor)?.set_keyed_content(key, item);
        Ok(self)
    }

    /// Embed another builder's current element, serialized immediately.
    /// The stored string is terminal; later mutation of `other` does not
    /// reach it. A suppressed element embeds nothing.
    pub fn add_element(&mut self, other: &Builder) -> Result<&mut Self> {
        match other.serializer.serialize(&other.arena, other.cursor)? {
            Some(html) => Ok(self.add_content(Content::Text(html))),
            None => Ok(self),
        }
    }

    /// Alias lookup on the current node, gated by the identifier rule.
    /// Invalid names are rejected; nothing else is ever resolved.
    pub fn named(&self, name: &str) -> Result<Option<NodeId>> {
        let Some(name) = safe_name(name) else {
            return Err(MarkupError::InvalidName(name.to_string()));
        };
        Ok(self.node()?.aliases.get(name).copied())
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Open a new child and move the cursor to it. The child is not
    /// registered with its parent until it closes.
    pub fn open(&mut self) -> &mut Self {
        let child = self.arena.alloc(Some(self.cursor));
        tracing::debug!("[Builder] opened node {} under {}", child, self.cursor);
        self.cursor = child;
        self
    }

    /// Open a new child and record `alias → child` on the current node.
    /// A rejected alias creates nothing and leaves the cursor in place.
    pub fn open_as(&mut self, alias: &str) -> Result<&mut Self> {
        let Some(alias) = safe_name(alias) else {
            tracing::warn!("[Builder] rejected alias {:?}", alias);
            return Err(MarkupError::InvalidName(alias.to_string()));
        };
        let parent = self.cursor;
        let child = self.arena.alloc(Some(parent));
        if let Ok(node) = self.arena.get_mut(parent) {
            node.set_alias(alias, child);
        }
        tracing::debug!("[Builder] opened node {} under {} as {:?}", child, parent, alias);
        self.cursor = child;
        Ok(self)
    }

    /// Close the current node: freeze its markup into the parent's content,
    /// register it in the parent's child registry, and move the cursor up.
    /// All three happen together or not at all.
    ///
    /// Closing a root is a recoverable condition; the cursor stays put and
    /// the chain remains usable.
    pub fn close(&mut self) -> Result<&mut Self> {
        let cursor = self.cursor;
        let parent_id = match self.arena.get(cursor)?.parent_id {
            Some(parent_id) => parent_id,
            None => {
                tracing::warn!("[Builder] close on root node {}; cursor unchanged", cursor);
                return Err(MarkupError::CloseAtRoot);
            }
        };

        let html = self.serializer.serialize(&self.arena, cursor)?;
        let fragment = Content::Fragment { child: cursor, html };
        let policy = self.config.reopen_policy;

        let parent = self.arena.get_mut(parent_id)?;
        match policy {
            ReopenPolicy::ReplaceInPlace => match parent.fragment_slot(cursor) {
                Some(slot) => parent.content[slot] = fragment,
                None => parent.add_content(fragment),
            },
            ReopenPolicy::AppendDuplicate => parent.add_content(fragment),
        }
        parent.register_child(cursor);

        tracing::debug!("[Builder] closed node {} into {}", cursor, parent_id);
        self.cursor = parent_id;
        Ok(self)
    }

    /// Apply [`close`](Self::close) exactly `count` times; the first
    /// failure stops the sequence at that point.
    pub fn close_many(&mut self, count: usize) -> Result<&mut Self> {
        for _ in 0..count {
            self.close()?;
        }
        Ok(self)
    }

    /// Close until the cursor reaches a root. Infallible.
    pub fn close_all(&mut self) -> &mut Self {
        loop {
            let has_parent = matches!(self.arena.parent(self.cursor), Ok(Some(_)));
            if !has_parent || self.close().is_err() {
                break;
            }
        }
        self
    }

    /// Move the cursor back onto a closed child, resolved by alias or by a
    /// `/`-delimited alias path descending one level per segment. The
    /// child's frozen fragment in the parent is left untouched; see
    /// [`ReopenPolicy`] for what the next close does to it.
    ///
    /// An empty path is a no-op. An unresolved name is an explicit error
    /// and the cursor does not move.
    pub fn nest(&mut self, path: &str) -> Result<&mut Self> {
        if path.is_empty() {
            return Ok(self);
        }

        if path.contains('/') {
            let mut current = self.cursor;
            for segment in path.split('/') {
                current = self.resolve_alias(current, segment).map_err(|err| match err {
                    MarkupError::AliasNotFound { .. } | MarkupError::ChildNotClosed { .. } => {
                        tracing::warn!("[Builder] path {:?} unresolved at {:?}", path, segment);
                        MarkupError::PathNotResolved {
                            path: path.to_string(),
                            segment: segment.to_string(),
                        }
                    }
                    other => other,
                })?;
            }
            self.cursor = current;
        } else {
            self.cursor = self.resolve_alias(self.cursor, path)?;
        }

        tracing::debug!("[Builder] nested into node {} via {:?}", self.cursor, path);
        Ok(self)
    }

    /// Move the cursor to the tree root without closing anything
    pub fn rewind(&mut self) -> &mut Self {
        if let Some(root) = self.arena.root_id() {
            self.cursor = root;
        }
        self
    }

    fn resolve_alias(&self, from: NodeId, alias: &str) -> Result<NodeId> {
        let node = self.arena.get(from)?;
        let child = node
            .aliases
            .get(alias)
            .copied()
            .ok_or_else(|| MarkupError::AliasNotFound {
                alias: alias.to_string(),
            })?;
        if !node.has_closed_child(child) {
            return Err(MarkupError::ChildNotClosed {
                alias: alias.to_string(),
            });
        }
        Ok(child)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Serialize the current node. A suppressed node renders as the empty
    /// string.
    pub fn render(&self) -> Result<String> {
        Ok(self
            .serializer
            .serialize(&self.arena, self.cursor)?
            .unwrap_or_default())
    }

    /// Serialize from the tree root, wherever the cursor is
    pub fn render_root(&self) -> Result<String> {
        let root = self.arena.root()?.node_id;
        Ok(self
            .serializer
            .serialize(&self.arena, root)?
            .unwrap_or_default())
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
