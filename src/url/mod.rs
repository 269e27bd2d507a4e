//! URL handling: link resolution, scope matching, and classification
//!
//! The resolution rules here are deliberately shallow (no dot-segment
//! collapsing, no case or port canonicalization). Two spellings of the same
//! resource can therefore produce two distinct frontier entries; callers
//! dedup on the resolved string, not on a canonical form.

mod classify;
mod normalize;
mod scope;

pub use classify::{classify_link, is_document_link, is_external_link, LinkClass};
pub use normalize::{anchor_fragment, resolve_href, strip_fragment, url_pathname};
pub use scope::{parse_scope_rules, path_in_scope, ScopeRule};
