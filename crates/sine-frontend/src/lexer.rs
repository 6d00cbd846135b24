//! SMT-LIB lexer
//!
//! Tokenizes the SMT-LIB 2.6 subset accepted by the frontend using logos.

use logos::Logos;

/// SMT-LIB tokens
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\n\r]+")]
#[logos(skip r";[^\n]*")]
pub enum Token<'a> {
    /// Left parenthesis
    #[token("(")]
    LParen,

    /// Right parenthesis
    #[token(")")]
    RParen,

    /// Numeral (non-negative integer)
    #[regex(r"[0-9]+", |lex| lex.slice())]
    Numeral(&'a str),

    /// Decimal number
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice())]
    Decimal(&'a str),

    /// String literal
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice())]
    String(&'a str),

    /// Simple symbol
    #[regex(r"[a-zA-Z~!@$%^&*_+=<>.?/\-][a-zA-Z0-9~!@$%^&*_+=<>.?/\-]*", |lex| lex.slice())]
    Symbol(&'a str),

    /// Quoted symbol |...|
    #[regex(r"\|[^|]*\|", |lex| lex.slice())]
    QuotedSymbol(&'a str),

    /// Keyword (:keyword)
    #[regex(r":[a-zA-Z0-9~!@$%^&*_+=<>.?/\-]+", |lex| lex.slice())]
    Keyword(&'a str),

    /// Boolean true
    #[token("true")]
    True,

    /// Boolean false
    #[token("false")]
    False,
}
