//! Structural pattern matching.
//!
//! One pattern is matched against one text span by an explicit
//! depth-first work-list of match states; backtracking pops the next
//! state instead of unwinding a call stack, so a pathological pattern
//! cannot exhaust it. Placeholder spans are parsed through the
//! [`SlotParser`] callback, which is where the engine recurses into
//! nested expression parsing.

use std::collections::BTreeSet;

use incant_pattern::{ChoiceBranch, Pattern, PatternNode, Placeholder};
use incant_registry::Slot;

/// Parses one placeholder's candidate sub-span into a slot.
///
/// Returning `None` rejects the split; the matcher backtracks to the next
/// shorter one.
pub(crate) trait SlotParser {
    fn parse_slot(&mut self, span: &str, placeholder: &Placeholder) -> Option<Slot>;
}

/// Result of one structural attempt.
pub(crate) struct MatchAttempt {
    /// The accepting state, if the pattern matched the whole span.
    pub matched: Option<MatchedState>,
    /// Furthest input offset any explored state reached. This is the
    /// "closest intended match" depth surfaced by failure diagnostics.
    pub furthest: usize,
}

/// Accumulated side-channel results of an accepting state.
pub(crate) struct MatchedState {
    pub slots: Vec<Slot>,
    pub captures: Vec<Option<String>>,
    pub mark: u32,
    pub tags: BTreeSet<String>,
}

#[derive(Clone)]
enum Frame<'p> {
    Node(&'p PatternNode),
    /// A placeholder with its remaining candidate end offsets, longest
    /// first.
    Splits {
        placeholder: &'p Placeholder,
        ends: Vec<usize>,
    },
}

#[derive(Clone)]
struct State<'p> {
    /// Remaining work, next frame last.
    queue: Vec<Frame<'p>>,
    pos: usize,
    mark: u32,
    tags: BTreeSet<String>,
    slots: Vec<Slot>,
    captures: Vec<Option<String>>,
}

impl<'p> State<'p> {
    fn enter_branch(&mut self, branch: &'p ChoiceBranch) {
        if let Some(mark) = branch.mark {
            self.mark |= mark;
        }
        if let Some(tag) = &branch.tag {
            self.tags.insert(tag.clone());
        }
        self.queue.push(Frame::Node(&branch.body));
    }
}

/// Matches a compiled pattern against the full text span.
pub(crate) fn run_pattern(
    pattern: &Pattern,
    text: &str,
    parser: &mut dyn SlotParser,
) -> MatchAttempt {
    let mut stack = vec![State {
        queue: vec![Frame::Node(pattern.root())],
        pos: 0,
        mark: 0,
        tags: BTreeSet::new(),
        slots: vec![Slot::Absent; pattern.slot_count()],
        captures: vec![None; pattern.capture_count()],
    }];
    let mut furthest = 0;

    while let Some(mut state) = stack.pop() {
        'advance: loop {
            furthest = furthest.max(state.pos);
            let Some(frame) = state.queue.pop() else {
                if text[state.pos..].trim().is_empty() {
                    return MatchAttempt {
                        matched: Some(MatchedState {
                            slots: state.slots,
                            captures: state.captures,
                            mark: state.mark,
                            tags: state.tags,
                        }),
                        furthest: text.len(),
                    };
                }
                break 'advance;
            };
            match frame {
                Frame::Node(PatternNode::Sequence(children)) => {
                    for child in children.iter().rev() {
                        state.queue.push(Frame::Node(child));
                    }
                }
                Frame::Node(PatternNode::Literal(literal)) => {
                    match match_literal(text, state.pos, literal) {
                        Some(end) => state.pos = end,
                        None => break 'advance,
                    }
                }
                Frame::Node(PatternNode::Optional(child)) => {
                    // Greedy: include the inner match now, leave the
                    // excluded reading on the stack as the backtrack.
                    stack.push(state.clone());
                    state.queue.push(Frame::Node(child));
                }
                Frame::Node(PatternNode::Choice(branches)) => {
                    let Some((first, rest)) = branches.split_first() else {
                        continue 'advance;
                    };
                    for branch in rest.iter().rev() {
                        let mut alternative = state.clone();
                        alternative.enter_branch(branch);
                        stack.push(alternative);
                    }
                    state.enter_branch(first);
                }
                Frame::Node(PatternNode::Placeholder(placeholder)) => {
                    let ends = candidate_ends(text, state.pos, &state.queue);
                    if ends.is_empty() {
                        break 'advance;
                    }
                    state.queue.push(Frame::Splits { placeholder, ends });
                }
                Frame::Node(PatternNode::Regex(element)) => {
                    let Some(found) = element.regex.find(&text[state.pos..]) else {
                        break 'advance;
                    };
                    let end = state.pos + found.end();
                    state.captures[element.capture] = Some(text[state.pos..end].to_string());
                    state.pos = end;
                }
                Frame::Splits {
                    placeholder,
                    mut ends,
                } => {
                    let mut filled = false;
                    while !ends.is_empty() {
                        let end = ends.remove(0);
                        let Some(slot) = parser.parse_slot(&text[state.pos..end], placeholder)
                        else {
                            continue;
                        };
                        if !ends.is_empty() {
                            let mut alternative = state.clone();
                            alternative.queue.push(Frame::Splits {
                                placeholder,
                                ends: std::mem::take(&mut ends),
                            });
                            stack.push(alternative);
                        }
                        state.slots[placeholder.slot] = slot;
                        state.pos = end;
                        filled = true;
                        break;
                    }
                    if !filled {
                        break 'advance;
                    }
                }
            }
        }
    }

    MatchAttempt {
        matched: None,
        furthest,
    }
}

/// Candidate end offsets for a placeholder starting at `pos`, longest
/// sub-span first.
///
/// The continuation is scanned for the next literal that must appear; if
/// that anchor occurs nowhere in the remaining text the placeholder is
/// pruned immediately, without parsing a single sub-span.
fn candidate_ends(text: &str, pos: usize, queue: &[Frame<'_>]) -> Vec<usize> {
    let mut anchor: Option<&str> = None;
    // True when a node before the anchor may consume text (optionals,
    // choices, further placeholders), so the anchor need not start
    // exactly where this placeholder stops.
    let mut consumer_between = false;

    for frame in queue.iter().rev() {
        let stop = match frame {
            Frame::Node(node) => scan_for_anchor(node, &mut anchor, &mut consumer_between),
            Frame::Splits { .. } => {
                consumer_between = true;
                true
            }
        };
        if stop {
            break;
        }
    }

    let len = text.len();
    let ends_desc: Vec<usize> = (pos + 1..=len)
        .rev()
        .filter(|&i| text.is_char_boundary(i))
        .collect();

    match anchor {
        Some(anchor) => {
            let starts: Vec<usize> = ends_desc
                .iter()
                .copied()
                .filter(|&i| match_literal(text, i, anchor).is_some())
                .collect();
            let Some(&rightmost) = starts.first() else {
                return Vec::new();
            };
            if consumer_between {
                ends_desc.into_iter().filter(|&i| i <= rightmost).collect()
            } else {
                starts
            }
        }
        None if consumer_between => ends_desc,
        // Continuation consumes nothing solid: the placeholder takes the
        // whole remainder.
        None => vec![len],
    }
}

/// Scans one continuation node for the next mandatory literal.
/// Returns true when the scan cannot look further.
fn scan_for_anchor<'p>(
    node: &'p PatternNode,
    anchor: &mut Option<&'p str>,
    consumer_between: &mut bool,
) -> bool {
    match node {
        PatternNode::Literal(text) => {
            if text.trim().is_empty() {
                // Whitespace-only literal, consumes nothing solid.
                false
            } else {
                *anchor = Some(text);
                true
            }
        }
        PatternNode::Sequence(children) => children
            .iter()
            .any(|child| scan_for_anchor(child, anchor, consumer_between)),
        PatternNode::Optional(_) => {
            *consumer_between = true;
            false
        }
        PatternNode::Choice(_) | PatternNode::Placeholder(_) | PatternNode::Regex(_) => {
            *consumer_between = true;
            true
        }
    }
}

/// Matches literal text at `start`, case-insensitively.
///
/// A whitespace run in the literal matches any whitespace run in the
/// input, including an empty one; this keeps excluded optional groups
/// from leaving unmatchable gaps between their neighbours.
fn match_literal(text: &str, start: usize, literal: &str) -> Option<usize> {
    let mut pos = start;
    let mut lit = literal.chars().peekable();

    while let Some(&expected) = lit.peek() {
        if expected.is_whitespace() {
            while lit.peek().is_some_and(|c| c.is_whitespace()) {
                lit.next();
            }
            while let Some(actual) = text[pos..].chars().next() {
                if actual.is_whitespace() {
                    pos += actual.len_utf8();
                } else {
                    break;
                }
            }
        } else {
            lit.next();
            let actual = text[pos..].chars().next()?;
            if !actual.to_lowercase().eq(expected.to_lowercase()) {
                return None;
            }
            pos += actual.len_utf8();
        }
    }
    Some(pos)
}
