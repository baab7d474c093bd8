//! Tokens of one decision-tree line.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r]+|#[^\n]*")]
pub(super) enum Token<'a> {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("!")]
    Not,
    /// Child of a leaf.
    #[token("-")]
    Dash,

    #[regex(r"[+-]?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),
    #[regex(r"[+-]?([0-9]+\.[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"[+-]?[0-9]+[eE][+-]?[0-9]+", parse_float)]
    Float(f64),

    #[regex(r"[A-Za-z_][A-Za-z0-9_+.']*", |lex| lex.slice())]
    Name(&'a str),
}

fn parse_float<'a>(lex: &mut logos::Lexer<'a, Token<'a>>) -> Option<f64> {
    lex.slice().parse().ok()
}

impl Token<'_> {
    /// Statistics are written as either integers or floats.
    pub(super) fn as_number(self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss, reason = "statistics are informational")]
            Token::Int(n) => Some(n as f64),
            Token::Float(x) => Some(x),
            _ => None,
        }
    }
}

/// Split a line into tokens, or name the text that is not a token.
pub(super) fn tokenize(line: &str) -> Result<Vec<Token<'_>>, String> {
    let mut lexer = Token::lexer(line);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push(token),
            Err(()) => return Err(format!("unexpected '{}'", lexer.slice())),
        }
    }
    Ok(tokens)
}
