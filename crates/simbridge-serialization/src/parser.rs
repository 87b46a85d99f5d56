// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Symbolic-expression parser.
//!
//! Single left-to-right scan. Whitespace and parentheses end a leaf, `(` opens
//! a child list on an explicit stack and `)` closes it into a node of its
//! parent.

use crate::symbol_node::{Symbol, SymbolNode};

const EXCERPT_LEN: usize = 48;

/// Deepest nesting accepted, counting the outermost pair. Simulator messages
/// stay below 10.
pub const MAX_NESTING_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Empty text, text not enclosed in parentheses, or nesting too deep
    #[error("Malformed symbolic expression: {reason} (input: {excerpt:?})")]
    MalformedInput { reason: &'static str, excerpt: String },

    /// Nesting dropped below or never returned to level zero
    #[error("Unbalanced parentheses: {reason} (input: {excerpt:?})")]
    UnbalancedParentheses { reason: &'static str, excerpt: String },
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_LEN).collect()
}

fn malformed(reason: &'static str, text: &str) -> ParseError {
    ParseError::MalformedInput {
        reason,
        excerpt: excerpt(text),
    }
}

fn unbalanced(reason: &'static str, text: &str) -> ParseError {
    ParseError::UnbalancedParentheses {
        reason,
        excerpt: excerpt(text),
    }
}

/// Parse one parenthesized expression and return its body.
///
/// `"(a (b c) d)"` yields a node with children `a`, `(b c)` and `d`.
///
/// # Errors
///
/// - [`ParseError::MalformedInput`] if the text is empty, not wrapped in a single outer pair,
///   or nested deeper than [`MAX_NESTING_DEPTH`]
/// - [`ParseError::UnbalancedParentheses`] if nesting does not return to level zero
pub fn parse(text: &str) -> Result<SymbolNode, ParseError> {
    let trimmed = check_enclosed(text)?;

    let outer_close = closing_of_first_group(trimmed)?;
    if outer_close != trimmed.len() - 1 {
        return Err(malformed("not wrapped in a single outer parenthesis pair", text));
    }

    parse_body(&trimmed[1..outer_close], 1)
}

/// Parse a full simulator message: a concatenation of top-level expressions.
///
/// Every top-level expression becomes one child of the returned root, so a
/// message `(time (now 1.5))(GS (t 0))` yields a root with two children.
pub fn parse_message(text: &str) -> Result<SymbolNode, ParseError> {
    let trimmed = check_enclosed(text)?;
    parse_body(trimmed, 0)
}

fn check_enclosed(text: &str) -> Result<&str, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(malformed("empty input", text));
    }
    if !trimmed.starts_with('(') || !trimmed.ends_with(')') {
        return Err(malformed("not embedded in parentheses", text));
    }
    Ok(trimmed)
}

/// Byte index of the `)` closing the group opened at index 0.
fn closing_of_first_group(text: &str) -> Result<usize, ParseError> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return Err(unbalanced("closing parenthesis without opening", text));
                }
                depth -= 1;
                if depth == 0 {
                    // Remaining text must balance too, otherwise the fault is nesting, not wrapping.
                    check_balanced(&text[i + 1..]).map_err(|_| {
                        unbalanced("closing parenthesis without opening", text)
                    })?;
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(unbalanced("missing closing parenthesis", text))
}

fn check_balanced(text: &str) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| unbalanced("closing parenthesis without opening", text))?;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(unbalanced("missing closing parenthesis", text));
    }
    Ok(())
}

fn push_leaf(children: &mut Vec<Symbol>, text: &str, leaf_start: &mut Option<usize>, end: usize) {
    if let Some(start) = leaf_start.take() {
        children.push(Symbol::Leaf(text[start..end].to_string()));
    }
}

/// `outer_depth` is the nesting level `text` itself sits at.
fn parse_body(text: &str, outer_depth: usize) -> Result<SymbolNode, ParseError> {
    let mut current: Vec<Symbol> = Vec::new();
    let mut parents: Vec<Vec<Symbol>> = Vec::new();
    let mut leaf_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match c {
            '(' => {
                push_leaf(&mut current, text, &mut leaf_start, i);
                if outer_depth + parents.len() + 1 > MAX_NESTING_DEPTH {
                    return Err(malformed("nested too deeply", text));
                }
                parents.push(std::mem::take(&mut current));
            }
            ')' => {
                push_leaf(&mut current, text, &mut leaf_start, i);
                let Some(parent) = parents.pop() else {
                    return Err(unbalanced("closing parenthesis without opening", text));
                };
                let children = std::mem::replace(&mut current, parent);
                current.push(Symbol::Node(SymbolNode::new(children)));
            }
            c if c.is_whitespace() => push_leaf(&mut current, text, &mut leaf_start, i),
            _ => {
                if leaf_start.is_none() {
                    leaf_start = Some(i);
                }
            }
        }
    }

    if !parents.is_empty() {
        return Err(unbalanced("missing closing parenthesis", text));
    }
    push_leaf(&mut current, text, &mut leaf_start, text.len());

    Ok(SymbolNode::new(current))
}
