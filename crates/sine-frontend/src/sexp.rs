//! S-expressions, the surface syntax of SMT-LIB scripts.

use crate::lexer::Token;
use logos::Logos;
use std::fmt;
use thiserror::Error;

/// An S-expression
#[derive(Debug, Clone, PartialEq)]
pub enum SExpr {
    /// A symbol (quoted symbols are stored without the bars)
    Symbol(String),
    /// A keyword (:name)
    Keyword(String),
    /// A numeral
    Numeral(String),
    /// A decimal number
    Decimal(String),
    /// A string literal, quotes included
    String(String),
    /// Boolean true
    True,
    /// Boolean false
    False,
    /// A list of S-expressions
    List(Vec<SExpr>),
}

impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExpr::Symbol(s) => sine_core::term::write_symbol(f, s),
            SExpr::Keyword(k) => write!(f, "{k}"),
            SExpr::Numeral(n) => write!(f, "{n}"),
            SExpr::Decimal(d) => write!(f, "{d}"),
            SExpr::String(s) => write!(f, "{s}"),
            SExpr::True => write!(f, "true"),
            SExpr::False => write!(f, "false"),
            SExpr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl SExpr {
    /// Check if this is a symbol with the given name
    #[must_use]
    pub fn is_symbol(&self, name: &str) -> bool {
        matches!(self, SExpr::Symbol(s) if s == name)
    }

    /// Get the symbol name if this is a symbol
    #[must_use]
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            SExpr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Get the list contents if this is a list
    #[must_use]
    pub fn as_list(&self) -> Option<&[SExpr]> {
        match self {
            SExpr::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get the numeral text if this is a numeral
    #[must_use]
    pub fn as_numeral(&self) -> Option<&str> {
        match self {
            SExpr::Numeral(n) => Some(n),
            _ => None,
        }
    }
}

/// S-expression syntax error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at byte {position}: {message}")]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Byte offset in the input
    pub position: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// Deepest list nesting the parser accepts.
pub const MAX_NESTING: usize = 512;

/// S-expression parser
pub struct SExprParser<'a> {
    lexer: logos::Lexer<'a, Token<'a>>,
    current: Option<Result<Token<'a>, ()>>,
    depth: usize,
}

impl<'a> SExprParser<'a> {
    /// Create a new parser for the given input
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Token::lexer(input);
        let current = lexer.next();
        SExprParser {
            lexer,
            current,
            depth: 0,
        }
    }

    fn position(&self) -> usize {
        self.lexer.span().start
    }

    /// Parse a single S-expression
    pub fn parse_sexp(&mut self) -> Result<SExpr, ParseError> {
        let atom = match &self.current {
            None => return Err(ParseError::new("unexpected end of input", self.position())),
            Some(Err(())) => return Err(ParseError::new("invalid token", self.position())),
            Some(Ok(token)) => match token {
                Token::LParen => return self.parse_list(),
                Token::RParen => return Err(ParseError::new("unexpected ')'", self.position())),
                Token::Symbol(s) => SExpr::Symbol((*s).to_string()),
                Token::QuotedSymbol(s) => SExpr::Symbol(s[1..s.len() - 1].to_string()),
                Token::Keyword(k) => SExpr::Keyword((*k).to_string()),
                Token::Numeral(n) => SExpr::Numeral((*n).to_string()),
                Token::Decimal(d) => SExpr::Decimal((*d).to_string()),
                Token::String(s) => SExpr::String((*s).to_string()),
                Token::True => SExpr::True,
                Token::False => SExpr::False,
            },
        };
        self.advance();
        Ok(atom)
    }

    /// Parse a list (current token is `(`)
    fn parse_list(&mut self) -> Result<SExpr, ParseError> {
        let open = self.position();
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new(
                format!("lists nested deeper than {MAX_NESTING}"),
                open,
            ));
        }
        self.depth += 1;
        let list = self.parse_list_items(open);
        self.depth -= 1;
        list
    }

    fn parse_list_items(&mut self, open: usize) -> Result<SExpr, ParseError> {
        self.advance();
        let mut items = Vec::new();

        loop {
            match &self.current {
                None => return Err(ParseError::new("unclosed '('", open)),
                Some(Err(())) => {
                    return Err(ParseError::new("invalid token in list", self.position()))
                }
                Some(Ok(Token::RParen)) => {
                    self.advance();
                    return Ok(SExpr::List(items));
                }
                Some(Ok(_)) => items.push(self.parse_sexp()?),
            }
        }
    }

    fn advance(&mut self) {
        self.current = self.lexer.next();
    }

    /// Check if there are more tokens
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.current.is_none()
    }

    /// Parse all S-expressions from the input
    pub fn parse_all(&mut self) -> Result<Vec<SExpr>, ParseError> {
        let mut result = Vec::new();
        while !self.is_eof() {
            result.push(self.parse_sexp()?);
        }
        Ok(result)
    }
}

/// Parse a string into a single S-expression
pub fn parse_sexp(input: &str) -> Result<SExpr, ParseError> {
    SExprParser::new(input).parse_sexp()
}

/// Parse a string into multiple S-expressions
pub fn parse_sexps(input: &str) -> Result<Vec<SExpr>, ParseError> {
    SExprParser::new(input).parse_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> SExpr {
        SExpr::Symbol(s.to_string())
    }

    #[test]
    fn test_parse_nested_list() {
        let sexp = parse_sexp("(a (b c) d)").unwrap();
        assert_eq!(
            sexp,
            SExpr::List(vec![sym("a"), SExpr::List(vec![sym("b"), sym("c")]), sym("d")])
        );
    }

    #[test]
    fn test_parse_forall_with_pattern() {
        let sexp = parse_sexp("(forall ((x U)) (! (P x) :pattern ((P x))))").unwrap();
        let items = sexp.as_list().unwrap();
        assert!(items[0].is_symbol("forall"));
        let bang = items[2].as_list().unwrap();
        assert!(bang[0].is_symbol("!"));
        assert_eq!(bang[2], SExpr::Keyword(":pattern".to_string()));
    }

    #[test]
    fn test_parse_multiple() {
        let sexps = parse_sexps("(set-logic UF) (check-sat)").unwrap();
        assert_eq!(sexps.len(), 2);
        assert_eq!(sexps[1], SExpr::List(vec![sym("check-sat")]));
    }

    #[test]
    fn test_quoted_symbol_is_unquoted_and_requoted() {
        let sexp = parse_sexp("|quoted symbol|").unwrap();
        assert_eq!(sexp, sym("quoted symbol"));
        assert_eq!(sexp.to_string(), "|quoted symbol|");
    }

    #[test]
    fn test_display_round_trip() {
        let text = "(set-info :status unsat)";
        assert_eq!(parse_sexp(text).unwrap().to_string(), text);
    }

    #[test]
    fn test_unclosed_list_reports_opening_position() {
        let err = parse_sexp("  (a b").unwrap_err();
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}a{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        let err = parse_sexp(&deep).unwrap_err();
        assert_eq!(err.position, MAX_NESTING);
        assert!(err.message.contains("nested"));

        let ok = format!("{}a{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert!(parse_sexp(&ok).is_ok());
    }

    #[test]
    fn test_unexpected_rparen() {
        assert!(parse_sexp(")").is_err());
    }
}
