//! Markup Element Tree Builder
//!
//! Builds nested markup-element trees through chained calls instead of
//! template strings, then serializes them to markup text.
//!
//! ## Core Design
//!
//! ```text
//! Fluent chain → NodeArena (owned) → frozen fragment at close → markup
//!                     ↓
//!                NodeId (u32)
//! ```
//!
//! - The builder holds a cursor: the one open node chained calls apply to
//! - `open` descends into a fresh child, `close` freezes the child's
//!   markup into its parent and climbs back up, `nest` revisits a closed
//!   child by alias or `/`-delimited alias path
//! - Serialization is explicit and deterministic: attribute order is
//!   insertion order, content joins with a single space, and a lone
//!   `false` content entry suppresses its node entirely

pub mod arena;
pub mod builder;
pub mod error;
pub mod serializer;
pub mod types;
pub mod utils;

pub use arena::NodeArena;
pub use builder::{Builder, BuilderConfig, ReopenPolicy};
pub use error::{MarkupError, Result};
pub use serializer::{assemble_attrs, Serializer, SerializerConfig};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_world_chain() {
        let mut page = Builder::new();
        page.set_tag("p").class("greeting").add_content("Hello, world!");

        assert_eq!(page.render().unwrap(), "<p class='greeting'>Hello, world!</p>");
    }
}
