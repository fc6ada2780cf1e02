//! Pattern string compilation.
//!
//! A single left-to-right scan over the pattern text. Groups compile
//! depth-first; the parent picks up scanning after the consumed range, so
//! no text is visited twice.

use thiserror::Error;

use crate::ast::{
    ChoiceBranch, Pattern, PatternNode, Placeholder, PlaceholderType, RegexElement, TypeLookup,
};

/// A pattern that could not be compiled.
///
/// Fatal to the single registration that supplied the pattern; other
/// registrations proceed.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A group was opened but never closed.
    #[error("missing closing '{expected}' for group opened at offset {position}")]
    UnbalancedGroup {
        /// The bracket that would close the group.
        expected: char,
        /// Offset of the opening bracket.
        position: usize,
    },

    /// A closing bracket appeared with no matching open group.
    #[error("stray '{found}' at offset {position}")]
    StrayBracket {
        /// The offending bracket.
        found: char,
        /// Offset of the bracket.
        position: usize,
    },

    /// A `|` appeared outside any group.
    #[error("choice separator '|' outside any group at offset {position}")]
    StrayChoiceSeparator {
        /// Offset of the separator.
        position: usize,
    },

    /// A `%` placeholder was opened but never closed.
    #[error("unclosed placeholder starting at offset {position}")]
    UnclosedPlaceholder {
        /// Offset of the opening `%`.
        position: usize,
    },

    /// A placeholder contained no type name.
    #[error("empty placeholder at offset {position}")]
    EmptyPlaceholder {
        /// Offset of the opening `%`.
        position: usize,
    },

    /// A placeholder referenced a type that is not registered.
    #[error("unknown type '{name}' in placeholder")]
    UnknownType {
        /// The unresolved name as written.
        name: String,
    },

    /// A numbered branch prefix did not fit a parse mark.
    #[error("invalid numeric mark '{text}'")]
    InvalidMark {
        /// The offending prefix text.
        text: String,
    },

    /// A `<` regex element was opened but never closed.
    #[error("unclosed regex starting at offset {position}")]
    UnclosedRegex {
        /// Offset of the opening `<`.
        position: usize,
    },

    /// A regex element failed to compile.
    #[error("invalid regex '{regex}'")]
    InvalidRegex {
        /// The regex source as written.
        regex: String,
        /// The underlying compile error.
        #[source]
        error: regex::Error,
    },
}

/// Compiles a pattern string into an immutable [`Pattern`] tree.
///
/// Placeholder type names are resolved through `types`; both singular and
/// plural registered names are accepted, and the form used decides the
/// slot's arity requirement.
///
/// # Errors
///
/// Returns a [`PatternError`] for unbalanced brackets, stray separators,
/// malformed placeholders, or invalid regex elements.
pub fn compile(source: &str, types: &dyn TypeLookup) -> Result<Pattern, PatternError> {
    let mut compiler = Compiler {
        chars: source.chars().collect(),
        pos: 0,
        types,
        slot_count: 0,
        capture_count: 0,
    };
    let root = compiler.parse_top()?;
    Ok(Pattern::new(
        source.to_string(),
        root,
        compiler.slot_count,
        compiler.capture_count,
    ))
}

struct Compiler<'a> {
    chars: Vec<char>,
    pos: usize,
    types: &'a dyn TypeLookup,
    slot_count: usize,
    capture_count: usize,
}

impl Compiler<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn parse_top(&mut self) -> Result<PatternNode, PatternError> {
        let mut parts = Vec::new();
        let mut buffer = String::new();

        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.pos += 1;
                    buffer.push(self.peek().unwrap_or('\\'));
                    self.pos += 1;
                }
                '(' | '[' => {
                    flush(&mut buffer, &mut parts);
                    parts.push(self.parse_group()?);
                }
                ')' | ']' => {
                    return Err(PatternError::StrayBracket {
                        found: c,
                        position: self.pos,
                    });
                }
                '|' => {
                    return Err(PatternError::StrayChoiceSeparator { position: self.pos });
                }
                '%' => {
                    flush(&mut buffer, &mut parts);
                    parts.push(self.parse_placeholder()?);
                }
                '<' => {
                    flush(&mut buffer, &mut parts);
                    parts.push(self.parse_regex()?);
                }
                _ => {
                    buffer.push(c);
                    self.pos += 1;
                }
            }
        }

        flush(&mut buffer, &mut parts);
        Ok(sequence(parts))
    }

    /// Parses a `(...)` or `[...]` group, positioned on the opening
    /// bracket. Leaves the scan just past the closing bracket.
    fn parse_group(&mut self) -> Result<PatternNode, PatternError> {
        let open = self.pos;
        let optional = self.peek() == Some('[');
        let terminator = if optional { ']' } else { ')' };
        let wrong = if optional { ')' } else { ']' };
        self.pos += 1;

        let mut branches: Vec<ChoiceBranch> = Vec::new();
        let mut parts: Vec<PatternNode> = Vec::new();
        let mut buffer = String::new();
        let (mut mark, mut tag) = self.parse_branch_prefix()?;

        loop {
            let Some(c) = self.peek() else {
                return Err(PatternError::UnbalancedGroup {
                    expected: terminator,
                    position: open,
                });
            };
            match c {
                '\\' => {
                    self.pos += 1;
                    buffer.push(self.peek().unwrap_or('\\'));
                    self.pos += 1;
                }
                c if c == terminator => {
                    self.pos += 1;
                    flush(&mut buffer, &mut parts);
                    branches.push(ChoiceBranch {
                        mark,
                        tag,
                        body: sequence(std::mem::take(&mut parts)),
                    });
                    return Ok(group(branches, optional));
                }
                c if c == wrong => {
                    return Err(PatternError::StrayBracket {
                        found: c,
                        position: self.pos,
                    });
                }
                '|' => {
                    self.pos += 1;
                    flush(&mut buffer, &mut parts);
                    branches.push(ChoiceBranch {
                        mark,
                        tag,
                        body: sequence(std::mem::take(&mut parts)),
                    });
                    (mark, tag) = self.parse_branch_prefix()?;
                }
                '(' | '[' => {
                    flush(&mut buffer, &mut parts);
                    parts.push(self.parse_group()?);
                }
                '%' => {
                    flush(&mut buffer, &mut parts);
                    parts.push(self.parse_placeholder()?);
                }
                '<' => {
                    flush(&mut buffer, &mut parts);
                    parts.push(self.parse_regex()?);
                }
                _ => {
                    buffer.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    /// Parses an optional `N¦` / `N:` mark or `name:` tag at the start of
    /// a branch. Rewinds on no match.
    fn parse_branch_prefix(&mut self) -> Result<(Option<u32>, Option<String>), PatternError> {
        let save = self.pos;

        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if !digits.is_empty() && matches!(self.peek(), Some('\u{a6}' | ':')) {
            self.pos += 1;
            let mark = digits
                .parse::<u32>()
                .map_err(|_| PatternError::InvalidMark { text: digits })?;
            return Ok((Some(mark), None));
        }

        self.pos = save;
        let mut name = String::new();
        if let Some(c) = self.peek() {
            if c.is_alphabetic() || c == '_' {
                name.push(c);
                self.pos += 1;
                while let Some(c) = self.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        name.push(c);
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                if self.peek() == Some(':') {
                    self.pos += 1;
                    return Ok((None, Some(name)));
                }
            }
        }

        self.pos = save;
        Ok((None, None))
    }

    /// Parses a `%[-~]type[/type...]%` placeholder, positioned on the
    /// opening `%`.
    fn parse_placeholder(&mut self) -> Result<PatternNode, PatternError> {
        let open = self.pos;
        self.pos += 1;

        let mut optional = false;
        let mut excluded = false;
        while let Some(c) = self.peek() {
            match c {
                '-' => {
                    optional = true;
                    self.pos += 1;
                }
                '~' => {
                    excluded = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }

        let mut body = String::new();
        loop {
            match self.peek() {
                None => return Err(PatternError::UnclosedPlaceholder { position: open }),
                Some('%') => {
                    self.pos += 1;
                    break;
                }
                Some(c) => {
                    body.push(c);
                    self.pos += 1;
                }
            }
        }

        if body.trim().is_empty() {
            return Err(PatternError::EmptyPlaceholder { position: open });
        }

        let mut types = Vec::new();
        for name in body.split('/') {
            let name = name.trim();
            if name.is_empty() {
                return Err(PatternError::EmptyPlaceholder { position: open });
            }
            let resolved =
                self.types
                    .resolve_type(name)
                    .ok_or_else(|| PatternError::UnknownType {
                        name: name.to_string(),
                    })?;
            types.push(PlaceholderType {
                name: name.to_string(),
                id: resolved.id,
                single: resolved.single,
            });
        }

        let slot = self.slot_count;
        self.slot_count += 1;
        Ok(PatternNode::Placeholder(Placeholder {
            slot,
            types,
            optional,
            excluded,
        }))
    }

    /// Parses a `<regex>` element, positioned on the opening `<`.
    fn parse_regex(&mut self) -> Result<PatternNode, PatternError> {
        let open = self.pos;
        self.pos += 1;

        let mut body = String::new();
        loop {
            match self.peek() {
                None => return Err(PatternError::UnclosedRegex { position: open }),
                Some('\\') if self.chars.get(self.pos + 1) == Some(&'>') => {
                    body.push('>');
                    self.pos += 2;
                }
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                Some(c) => {
                    body.push(c);
                    self.pos += 1;
                }
            }
        }

        let regex =
            regex::Regex::new(&format!("^(?:{body})")).map_err(|error| {
                PatternError::InvalidRegex {
                    regex: body.clone(),
                    error,
                }
            })?;
        let capture = self.capture_count;
        self.capture_count += 1;
        Ok(PatternNode::Regex(RegexElement {
            capture,
            source: body,
            regex,
        }))
    }
}

fn flush(buffer: &mut String, parts: &mut Vec<PatternNode>) {
    if !buffer.is_empty() {
        parts.push(PatternNode::Literal(std::mem::take(buffer)));
    }
}

fn sequence(mut parts: Vec<PatternNode>) -> PatternNode {
    if parts.len() == 1 {
        parts.pop().expect("length checked")
    } else {
        PatternNode::Sequence(parts)
    }
}

fn group(branches: Vec<ChoiceBranch>, optional: bool) -> PatternNode {
    let node = if branches.len() == 1 {
        let only = &branches[0];
        if only.mark.is_none() && only.tag.is_none() {
            branches.into_iter().next().expect("length checked").body
        } else {
            PatternNode::Choice(branches)
        }
    } else {
        PatternNode::Choice(branches)
    };
    if optional {
        PatternNode::Optional(Box::new(node))
    } else {
        node
    }
}
