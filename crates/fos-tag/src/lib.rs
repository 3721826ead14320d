//! fOS Tag - Markup Tag Tree
//!
//! Builder for nested markup nodes and their serializer. Event bindings
//! are recorded per node and written out as reserved attributes
//! (`data-__click__="k1;k2"`) so a delegating listener can decode them.
//!
//! ```
//! use fos_tag::{Attrs, Tag};
//!
//! let mut root = Tag::new("div");
//! root.ul(".todo").with(|ul| {
//!     ul.li(("#first", Attrs::new().text("milk")));
//! });
//! assert_eq!(
//!     root.to_markup(),
//!     r#"<div><ul class="todo"><li id="first">milk</li></ul></div>"#
//! );
//! ```

mod attrs;
mod classlist;
mod dataset;
mod event;
mod selector;
mod serialize;
mod style;
mod tag;

pub use attrs::{Apply, AttrValue, Attrs};
pub use classlist::ClassList;
pub use dataset::{DataValue, Dataset};
pub use event::EventKind;
pub use selector::Selector;
pub use serialize::{escape_attr, escape_text};
pub use style::Style;
pub use tag::{Embed, Tag};

/// Builder usage errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("Invalid selector {selector:?}: unexpected {found:?} at {position}")]
    InvalidSelector {
        selector: String,
        position: usize,
        found: char,
    },

    #[error("Invalid selector {selector:?}: empty name at {position}")]
    EmptySelectorName { selector: String, position: usize },
}
