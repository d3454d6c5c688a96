//! Goal tree construction from structured documents.
//!
//! Markup parsing is left to the caller: a reader converts its document
//! into [`Element`]s, and this module builds the typed tree from them.
//!
//! - Tags are matched case-insensitively; the root must be `logic`.
//! - Recognized node tags are `biconditional`, `conditional`,
//!   `conjunction`, `disjunction` and `function`; others are skipped.
//! - An `id` attribute becomes the node key.
//! - A `function` takes its operator from `type`, its objective from
//!   `objective`, and its operands from `parameter` children ordered by
//!   integer `index`. Parameter values are read as a float, else a
//!   boolean, else a quoted string literal or a parameter name.

mod element;
mod loader;

pub use element::Element;
pub use loader::node_from_element;
