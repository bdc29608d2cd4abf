//! Tokenizer and parser for the algebraic expressions accepted by the stepwise simplifier.
//!
//! The entry point is [`Parser`](parser::Parser):
//!
//! ```
//! use stepwise_parser::parser::{expr::Expr, Parser};
//!
//! let mut parser = Parser::new("2x^2 + 3");
//! let expr = parser.try_parse_full::<Expr>().unwrap();
//! assert_eq!(expr.span(), 0..8);
//! ```

pub mod parser;
pub mod tokenizer;
