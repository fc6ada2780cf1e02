//! Pattern grammar compiler and expansion for Incant syntax definitions.
//!
//! Syntax patterns are written in a compact bracket grammar:
//!
//! ```text
//! heal %player% [by %number% [hearts|hp]]
//! (1¦enable|2¦disable) pvp [in %worlds%]
//! send <.+> to the console
//! ```
//!
//! - `(a|b)` is a mandatory choice, `[a]` an optional group
//! - `N¦text` numbers a branch (ORed into the parse mark when chosen),
//!   `name:text` tags a branch (added to the tag set when chosen)
//! - `%type%` is a placeholder filled by parsing a nested expression of a
//!   compatible semantic type; `%a/b%` accepts either type
//! - `<regex>` matches a regular expression and captures the matched text
//! - `\(`, `\[`, `\%`, `\<`, `\|` escape the grammar characters
//!
//! [`compile`] turns a pattern string into an immutable [`Pattern`] tree;
//! [`expand`] enumerates a pattern's literal alternatives for static
//! conflict analysis.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod compiler;
pub mod expand;

pub use ast::{
    ChoiceBranch, Pattern, PatternNode, Placeholder, PlaceholderType, RegexElement, ResolvedType,
    TypeLookup,
};
pub use compiler::{PatternError, compile};
pub use expand::{WILDCARD, expand};
