//! HTML processing module
//!
//! This module contains everything that works on page markup without touching
//! the network:
//! - Minimization of rendered HTML into a compact structural form
//! - Read-only selector accessors (text and attribute lookups)
//! - Link discovery and resolution against a page URL

mod links;
mod minimize;
mod query;

pub use links::{links_in, resolve_link, DEFAULT_LINK_SELECTOR};
pub use minimize::{minimize, ABBREVIATIONS};
pub use query::{element_text, select_attr, select_attrs, select_text, select_texts, HtmlDocument};
