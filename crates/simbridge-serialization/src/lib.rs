//! # simbridge Serialization
//!
//! Codec for the simulator's symbolic-expression wire text.
//!
//! ## Core Components
//!
//! - **[`parse`]** / **[`parse_message`]** - turn wire text into a [`SymbolNode`] tree
//! - **[`SymbolNode`]** - immutable tree of [`Symbol::Leaf`] and [`Symbol::Node`] children
//! - **[`render_effector_message`]** - build the per-cycle agent message ending in `(syn)`
//!
//! ## Basic Usage
//!
//! ```rust
//! use simbridge_serialization::parse;
//!
//! let node = parse("(a (b c) d)").unwrap();
//! assert_eq!(node.len(), 3);
//! assert_eq!(node.node(1).unwrap().len(), 2);
//! assert_eq!(node.to_wire(), "(a (b c) d)");
//! ```

mod outbound;
mod parser;
mod symbol_node;

pub use outbound::{
    beam_message, init_message, render_effector_message, scene_message, SayMessage,
    SayMessageError, DEFAULT_SCENE, MAX_SAY_LENGTH, SYNC_TOKEN,
};
pub use parser::{parse, parse_message, ParseError, MAX_NESTING_DEPTH};
pub use symbol_node::{Symbol, SymbolNode};
