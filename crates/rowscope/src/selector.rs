//! Selector values for locating elements and row scopes.
//!
//! # Design Philosophy
//!
//! - **Immutable**: deriving a child never touches the parent selector
//! - **Structural equality**: two selectors are interchangeable when their
//!   expressions are equal
//! - **CSS collapsing**: CSS parents absorb CSS child filters into a single
//!   descendant expression, so `table.orders` + `row:nth-of-type(2)` is the
//!   same value as `Selector::css("table.orders row:nth-of-type(2)")`;
//!   selector lists are kept apart as [`Selector::Scoped`]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

/// Filter appended to a selector to match descendants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChildFilter {
    /// The n-th element of a tag among its siblings (1-based)
    NthOfKind {
        /// Element tag
        tag: String,
        /// 1-based position among siblings of the same tag
        position: NonZeroUsize,
    },
    /// Every element of a tag
    Kind {
        /// Element tag
        tag: String,
    },
    /// Raw CSS fragment
    Css(String),
}

impl ChildFilter {
    /// Match the `position`-th element of `tag` among its siblings
    #[must_use]
    pub fn nth_of_kind(tag: impl Into<String>, position: NonZeroUsize) -> Self {
        Self::NthOfKind {
            tag: tag.into(),
            position,
        }
    }

    /// Match every element of `tag`
    #[must_use]
    pub fn kind(tag: impl Into<String>) -> Self {
        Self::Kind { tag: tag.into() }
    }

    /// Match a raw CSS fragment
    #[must_use]
    pub fn css(fragment: impl Into<String>) -> Self {
        Self::Css(fragment.into())
    }

    /// Render the filter as a CSS fragment
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::NthOfKind { tag, position } => format!("{tag}:nth-of-type({position})"),
            Self::Kind { tag } => tag.clone(),
            Self::Css(fragment) => fragment.clone(),
        }
    }
}

impl fmt::Display for ChildFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "table.orders tbody")
    Css(String),
    /// XPath selector
    XPath(String),
    /// Text content selector
    Text(String),
    /// Test ID selector (data-testid attribute)
    TestId(String),
    /// Non-CSS parent narrowed by a child filter
    Scoped {
        /// Selector of the enclosing scope
        parent: Box<Selector>,
        /// Filter applied to the parent's descendants
        filter: ChildFilter,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::XPath(expression.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Derive a new selector matching descendants of `self` that satisfy
    /// `filter`. The receiver is left unchanged.
    ///
    /// Selector lists (`a, b`) on either side are never folded into one
    /// CSS string; they produce [`Selector::Scoped`].
    #[must_use]
    pub fn derive_child(&self, filter: &ChildFilter) -> Self {
        let fragment = filter.to_css();
        if is_css_list(&fragment) {
            return self.scoped(filter);
        }
        match self {
            Self::Css(css) if !is_css_list(css) => Self::Css(format!("{css} {fragment}")),
            Self::TestId(id) => Self::Css(format!("{} {fragment}", test_id_css(id))),
            other => other.scoped(filter),
        }
    }

    fn scoped(&self, filter: &ChildFilter) -> Self {
        Self::Scoped {
            parent: Box::new(self.clone()),
            filter: filter.clone(),
        }
    }

    /// Whether the selector can be expressed as plain CSS
    #[must_use]
    pub const fn is_css(&self) -> bool {
        matches!(self, Self::Css(_) | Self::TestId(_))
    }
}

/// Whether `css` is a selector list, i.e. has a `,` outside brackets,
/// parentheses and strings
fn is_css_list(css: &str) -> bool {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = css.chars();
    while let Some(c) = chars.next() {
        match (quote, c) {
            (_, '\\') => {
                let _ = chars.next();
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => return true,
            (None, _) => {}
        }
    }
    false
}

/// `[data-testid="..."]` with the id written as a CSS string
fn test_id_css(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 16);
    out.push_str("[data-testid=\"");
    for c in id.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push('\u{fffd}'),
            c if c.is_control() => out.push_str(&format!("\\{:x} ", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push_str("\"]");
    out
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => f.write_str(css),
            Self::XPath(xpath) => write!(f, "xpath={xpath}"),
            Self::Text(text) => write!(f, "text={text}"),
            Self::TestId(id) => f.write_str(&test_id_css(id)),
            Self::Scoped { parent, filter } => write!(f, "{parent} >> {filter}"),
        }
    }
}
