/*!
## Rust Language Module

This Rust module provides diagnostics, lexical analysis, and parsing
of the textual three-address code.

*/

pub type LineNumber = u32;
pub type Column = u32;

#[macro_use]
mod error;
mod lex;
mod parse;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use error::Level;
pub use error::Location;
pub use lex::lex;
pub use parse::parse;
pub use parse::parse_with_table;
pub use parse::Unit;
pub use token::Literal;
pub use token::Token;
