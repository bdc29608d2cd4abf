pub mod binary;
pub mod call;
pub mod error;
pub mod expr;
pub mod literal;
pub mod paren;
pub mod token;
pub mod unary;

use error::{kind, Error};
use stepwise_error::ErrorKind;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// Attempts to parse a value using multiple parsing expressions in order. The first one that
/// succeeds is returned from the enclosing function.
///
/// Fatal errors short-circuit immediately. Otherwise, the macro evaluates to the error of the
/// last attempted expression.
#[macro_export]
macro_rules! try_parse_catch_fatal {
    ($($expr:expr),+ $(,)?) => {{
        $(
            match $expr {
                Ok(value) => return Ok(value),
                Err(err) if err.fatal => return Err(err),
                // ignore this error and try the next parser, or return it
                err => err,
            }
        )+
    }};
}

/// A high-level parser for algebraic expressions. This is the type to use to parse a piece of
/// text into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Creates a fatal error that points at the current token, or the end of the source code if
    /// the cursor is at the end of the stream.
    pub fn error_fatal(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new_fatal(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Moves the cursor of this parser to the cursor of another parser over the same source.
    pub(crate) fn set_cursor(&mut self, other: &Self) {
        self.cursor = other.cursor;
    }

    /// Skips whitespace, then returns true if the next token has the given kind. The cursor is
    /// left after the skipped whitespace.
    pub(crate) fn next_is(&mut self, kind: TokenKind) -> bool {
        self.skip_whitespace();
        self.current_token().map_or(false, |token| token.kind == kind)
    }

    fn skip_whitespace(&mut self) {
        while self.current_token().map_or(false, Token::is_whitespace) {
            self.cursor += 1;
        }
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        self.skip_whitespace();
        match self.tokens.get(self.cursor) {
            Some(token) => {
                self.cursor += 1;
                // cloning is cheap: only Range<_> is cloned
                Ok(token.clone())
            },
            None => Err(self.error(kind::UnexpectedEof)),
        }
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses one or more values delimited by the given token kind, backtracking
    /// if not even one value can be parsed.
    ///
    /// Fatal errors are returned even after some values were parsed.
    pub fn try_parse_delimited<T: Parse>(&mut self, delimiter: TokenKind) -> Result<Vec<T>, Error> {
        let start = self.cursor;
        let mut values = Vec::new();

        loop {
            match self.try_parse::<T>() {
                Ok(value) => values.push(value),
                Err(err) if err.fatal || values.is_empty() => {
                    self.cursor = start;
                    return Err(err);
                },
                Err(_) => return Ok(values),
            }

            if self.next_is(delimiter) {
                self.cursor += 1;
            } else {
                return Ok(values);
            }
        }
    }

    /// Speculatively parses a value using a custom parsing function, backtracking the cursor if
    /// parsing fails.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens (except
    /// trailing whitespace) must be consumed by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        self.skip_whitespace();
        if self.cursor == self.tokens.len() {
            Ok(value)
        } else {
            Err(self.error(kind::ExpectedEof))
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// `a op b op c` is evaluated as `a op (b op c)`. For unary operators, the operator appears
    /// to the left of its operand.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`, including implicit multiplication) and division (`/`),
    /// which separate factors.
    Factor,

    /// Precedence of unary subtraction (`-`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let left = *self as u8;
        let right = *other as u8;
        left.partial_cmp(&right)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use binary::Binary;
    use call::Call;
    use expr::Expr;
    use literal::{Literal, LitNum, LitSym};
    use paren::Paren;
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};
    use unary::Unary;

    fn parse(source: &str) -> Expr {
        Parser::new(source).try_parse_full::<Expr>().unwrap()
    }

    fn num(value: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Number(LitNum { value: value.to_string(), span }))
    }

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    fn bin(lhs: Expr, kind: BinOpKind, implicit: bool, op_span: Range<usize>, rhs: Expr) -> Expr {
        let span = lhs.span().start..rhs.span().end;
        Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op: BinOp { kind, implicit, span: op_span },
            rhs: Box::new(rhs),
            span,
        })
    }

    fn neg(op_start: usize, operand: Expr) -> Expr {
        let span = op_start..operand.span().end;
        Expr::Unary(Unary {
            operand: Box::new(operand),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: op_start..op_start + 1 },
            span,
        })
    }

    #[test]
    fn literal_int() {
        assert_eq!(parse("16"), num("16", 0..2));
    }

    #[test]
    fn literal_float() {
        assert_eq!(parse("3.14"), num("3.14", 0..4));
    }

    #[test]
    fn literal_symbol() {
        assert_eq!(parse("  x "), sym("x", 2..3));
    }

    #[test]
    fn precedence_of_terms_and_factors() {
        assert_eq!(parse("1 + 2 * 3"), bin(
            num("1", 0..1),
            BinOpKind::Add, false, 2..3,
            bin(num("2", 4..5), BinOpKind::Mul, false, 6..7, num("3", 8..9)),
        ));
    }

    #[test]
    fn left_associative_subtraction() {
        assert_eq!(parse("5-2-1"), bin(
            bin(num("5", 0..1), BinOpKind::Sub, false, 1..2, num("2", 2..3)),
            BinOpKind::Sub, false, 3..4,
            num("1", 4..5),
        ));
    }

    #[test]
    fn right_associative_exponent() {
        assert_eq!(parse("2^3^4"), bin(
            num("2", 0..1),
            BinOpKind::Exp, false, 1..2,
            bin(num("3", 2..3), BinOpKind::Exp, false, 3..4, num("4", 4..5)),
        ));
    }

    #[test]
    fn implicit_coefficient() {
        assert_eq!(parse("2x^2"), bin(
            num("2", 0..1),
            BinOpKind::Mul, true, 1..1,
            bin(sym("x", 1..2), BinOpKind::Exp, false, 2..3, num("2", 3..4)),
        ));
    }

    #[test]
    fn implicit_after_division() {
        // `2/3x` reads as `(2/3) * x`
        assert_eq!(parse("2/3x"), bin(
            bin(num("2", 0..1), BinOpKind::Div, false, 1..2, num("3", 2..3)),
            BinOpKind::Mul, true, 3..3,
            sym("x", 3..4),
        ));
    }

    #[test]
    fn implicit_inside_term() {
        assert_eq!(parse("1 + 3x^2"), bin(
            num("1", 0..1),
            BinOpKind::Add, false, 2..3,
            bin(
                num("3", 4..5),
                BinOpKind::Mul, true, 5..5,
                bin(sym("x", 5..6), BinOpKind::Exp, false, 6..7, num("2", 7..8)),
            ),
        ));
    }

    #[test]
    fn unary_binds_looser_than_exponent() {
        assert_eq!(parse("-x^2"), neg(0, bin(
            sym("x", 1..2),
            BinOpKind::Exp, false, 2..3,
            num("2", 3..4),
        )));
    }

    #[test]
    fn unary_binds_tighter_than_division() {
        assert_eq!(parse("-2/3"), bin(
            neg(0, num("2", 1..2)),
            BinOpKind::Div, false, 2..3,
            num("3", 3..4),
        ));
    }

    #[test]
    fn negative_exponent() {
        assert_eq!(parse("2^-1"), bin(
            num("2", 0..1),
            BinOpKind::Exp, false, 1..2,
            neg(2, num("1", 3..4)),
        ));
    }

    #[test]
    fn parenthesized_product() {
        assert_eq!(parse("(2+3)*x"), bin(
            Expr::Paren(Paren {
                expr: Box::new(bin(num("2", 1..2), BinOpKind::Add, false, 2..3, num("3", 3..4))),
                span: 0..5,
            }),
            BinOpKind::Mul, false, 5..6,
            sym("x", 6..7),
        ));
    }

    #[test]
    fn function_call_arguments() {
        assert_eq!(parse("nthRoot(x, 3)"), Expr::Call(Call {
            name: LitSym { name: "nthRoot".to_string(), span: 0..7 },
            args: vec![sym("x", 8..9), num("3", 11..12)],
            span: 0..13,
            paren_span: 7..13,
        }));
    }

    #[test]
    fn unclosed_parenthesis_is_fatal() {
        let err = Parser::new("(1 + 2").try_parse_full::<Expr>().unwrap_err();
        assert!(err.fatal);
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn stray_closing_parenthesis() {
        let err = Parser::new(")").try_parse_full::<Expr>().unwrap_err();
        assert!(err.fatal);
    }

    #[test]
    fn empty_parenthesis() {
        let err = Parser::new("2 * ()").try_parse_full::<Expr>().unwrap_err();
        assert!(err.fatal);
        assert_eq!(err.spans, vec![4..6]);
    }

    #[test]
    fn trailing_garbage() {
        let err = Parser::new("2 + 3 $").try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.spans, vec![6..7]);
    }

    #[test]
    fn display_round_trips_source() {
        for source in ["2x^2 + 3", "(x + 1) / (2 - y)", "-sqrt(x) * 4"] {
            assert_eq!(parse(source).to_string(), source);
        }
    }
}
