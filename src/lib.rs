//! Bidirectional codec between Go syntax trees and a portable JSON wire
//! form.
//!
//! - The parser builds an arena-allocated tree ([`ast`]) with a position
//!   index ([`position`]).
//! - The encoder ([`encode`]) turns that tree into a wire tree ([`wire`]):
//!   plain JSON with a `NodeType` discriminant per node, optional portable
//!   positions, and optional `RefId` identity tags.
//! - The decoder ([`decode`]) reconstructs a tree the printer ([`printer`])
//!   renders back to source text — byte-identical for canonical sources when
//!   positions travel along.
//!
//! Encode and decode are independent sessions: each owns its position index
//! and reference cache, so any number can run in parallel.

pub mod ast;
pub mod convert;
pub mod decode;
pub mod encode;
pub mod error;
pub mod kind;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod printer;
pub mod report;
pub mod token;
pub mod wire;

pub use decode::{DecodedFile, DecodedPackage, Unmarshaller};
pub use encode::Marshaller;
pub use error::{Error, ParseError, Result};
pub use parser::parse_file;
pub use printer::print_file;

/// Codec configuration, shared by encode and decode.
///
/// A decode configuration does not have to match the one used to encode:
/// decoding position-free output with `positions: true` simply yields the
/// no-position sentinel everywhere, and decoding with `comments: false`
/// drops comment groups the encoder kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// Emit/resolve portable `{Filename, Offset}` positions.
    pub positions: bool,
    /// Carry comment groups and their attachments.
    pub comments: bool,
    /// Assign RefIds on encode; reconstruct shared identity on decode.
    pub references: bool,
    /// Duplicate import specs into the file root's flattened import table.
    pub imports: bool,
}

impl Options {
    /// Everything on.
    pub const fn all() -> Self {
        Options {
            positions: true,
            comments: true,
            references: true,
            imports: true,
        }
    }

    /// Everything off: the bare structural tree.
    pub const fn none() -> Self {
        Options {
            positions: false,
            comments: false,
            references: false,
            imports: false,
        }
    }
}
