mod error;
mod kind;
mod lexer;
mod line_index;
mod parser;
mod text;
mod token;
mod tree;

pub use error::ParseError;
pub use parser::MAX_NESTING_DEPTH;
pub use kind::{DeclarationKind, Detail, Field, LiteralKind, MethodKind, NodeKind};
pub use lexer::{is_identifier_part, is_identifier_start, tokenize};
pub use line_index::{LineCol, LineIndex};
pub use text::TextRange;
pub use token::{Token, TokenKind};
pub use tree::{Node, NodeId, NodeRef, Tree, Walk, WalkEvent};
