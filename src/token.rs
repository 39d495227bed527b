//! Lexical token set and the wire-boundary canonicalizer.
//!
//! Every token the grammar can produce maps to exactly one canonical string
//! and back. The reverse table is built once, at first use, by enumerating
//! the full token range; a string outside the bijection is a fatal decode
//! error, never a silently-ignored default.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::Error;

/// A lexical token of the Go grammar.
///
/// Discriminant order follows the upstream token numbering: specials,
/// literals, operators/delimiters, keywords, `~`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Token {
    Illegal,
    Eof,
    Comment,

    // Literal classes. The token names double as the wire strings for
    // literal kinds (`BasicLit.Kind`).
    Ident,
    Int,
    Float,
    Imag,
    Char,
    String,

    // Operators and delimiters.
    Add,
    Sub,
    Mul,
    Quo,
    Rem,

    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,

    AddAssign,
    SubAssign,
    MulAssign,
    QuoAssign,
    RemAssign,

    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    AndNotAssign,

    LAnd,
    LOr,
    Arrow,
    Inc,
    Dec,

    Eql,
    Lss,
    Gtr,
    Assign,
    Not,

    Neq,
    Leq,
    Geq,
    Define,
    Ellipsis,

    Lparen,
    Lbrack,
    Lbrace,
    Comma,
    Period,

    Rparen,
    Rbrack,
    Rbrace,
    Semicolon,
    Colon,

    // Keywords.
    Break,
    Case,
    Chan,
    Const,
    Continue,

    Default,
    Defer,
    Else,
    Fallthrough,
    For,

    Func,
    Go,
    Goto,
    If,
    Import,

    Interface,
    Map,
    Package,
    Range,
    Return,

    Select,
    Struct,
    Switch,
    Type,
    Var,

    Tilde,
}

/// The full token range, in declaration order. The canonicalizer enumerates
/// this slice to build the reverse table, so adding a token here is all that
/// is needed to extend the bijection.
pub const ALL: &[Token] = &[
    Token::Illegal,
    Token::Eof,
    Token::Comment,
    Token::Ident,
    Token::Int,
    Token::Float,
    Token::Imag,
    Token::Char,
    Token::String,
    Token::Add,
    Token::Sub,
    Token::Mul,
    Token::Quo,
    Token::Rem,
    Token::And,
    Token::Or,
    Token::Xor,
    Token::Shl,
    Token::Shr,
    Token::AndNot,
    Token::AddAssign,
    Token::SubAssign,
    Token::MulAssign,
    Token::QuoAssign,
    Token::RemAssign,
    Token::AndAssign,
    Token::OrAssign,
    Token::XorAssign,
    Token::ShlAssign,
    Token::ShrAssign,
    Token::AndNotAssign,
    Token::LAnd,
    Token::LOr,
    Token::Arrow,
    Token::Inc,
    Token::Dec,
    Token::Eql,
    Token::Lss,
    Token::Gtr,
    Token::Assign,
    Token::Not,
    Token::Neq,
    Token::Leq,
    Token::Geq,
    Token::Define,
    Token::Ellipsis,
    Token::Lparen,
    Token::Lbrack,
    Token::Lbrace,
    Token::Comma,
    Token::Period,
    Token::Rparen,
    Token::Rbrack,
    Token::Rbrace,
    Token::Semicolon,
    Token::Colon,
    Token::Break,
    Token::Case,
    Token::Chan,
    Token::Const,
    Token::Continue,
    Token::Default,
    Token::Defer,
    Token::Else,
    Token::Fallthrough,
    Token::For,
    Token::Func,
    Token::Go,
    Token::Goto,
    Token::If,
    Token::Import,
    Token::Interface,
    Token::Map,
    Token::Package,
    Token::Range,
    Token::Return,
    Token::Select,
    Token::Struct,
    Token::Switch,
    Token::Type,
    Token::Var,
    Token::Tilde,
];

/// Lowest precedence of a binary operator, i.e. `||`.
pub const LOWEST_PREC: u8 = 0;
/// Precedence of unary operators.
pub const UNARY_PREC: u8 = 6;
/// Highest precedence (selectors, calls, indexing).
pub const HIGHEST_PREC: u8 = 7;

static STRING_TO_TOKEN: Lazy<HashMap<&'static str, Token>> = Lazy::new(|| {
    let mut m = HashMap::with_capacity(ALL.len());
    for &tok in ALL {
        m.insert(tok.as_str(), tok);
    }
    m
});

impl Token {
    /// Canonical string of the token: the operator/delimiter text, the
    /// keyword text, or the upper-case class name for specials and literal
    /// kinds.
    pub const fn as_str(self) -> &'static str {
        match self {
            Token::Illegal => "ILLEGAL",
            Token::Eof => "EOF",
            Token::Comment => "COMMENT",

            Token::Ident => "IDENT",
            Token::Int => "INT",
            Token::Float => "FLOAT",
            Token::Imag => "IMAG",
            Token::Char => "CHAR",
            Token::String => "STRING",

            Token::Add => "+",
            Token::Sub => "-",
            Token::Mul => "*",
            Token::Quo => "/",
            Token::Rem => "%",

            Token::And => "&",
            Token::Or => "|",
            Token::Xor => "^",
            Token::Shl => "<<",
            Token::Shr => ">>",
            Token::AndNot => "&^",

            Token::AddAssign => "+=",
            Token::SubAssign => "-=",
            Token::MulAssign => "*=",
            Token::QuoAssign => "/=",
            Token::RemAssign => "%=",

            Token::AndAssign => "&=",
            Token::OrAssign => "|=",
            Token::XorAssign => "^=",
            Token::ShlAssign => "<<=",
            Token::ShrAssign => ">>=",
            Token::AndNotAssign => "&^=",

            Token::LAnd => "&&",
            Token::LOr => "||",
            Token::Arrow => "<-",
            Token::Inc => "++",
            Token::Dec => "--",

            Token::Eql => "==",
            Token::Lss => "<",
            Token::Gtr => ">",
            Token::Assign => "=",
            Token::Not => "!",

            Token::Neq => "!=",
            Token::Leq => "<=",
            Token::Geq => ">=",
            Token::Define => ":=",
            Token::Ellipsis => "...",

            Token::Lparen => "(",
            Token::Lbrack => "[",
            Token::Lbrace => "{",
            Token::Comma => ",",
            Token::Period => ".",

            Token::Rparen => ")",
            Token::Rbrack => "]",
            Token::Rbrace => "}",
            Token::Semicolon => ";",
            Token::Colon => ":",

            Token::Break => "break",
            Token::Case => "case",
            Token::Chan => "chan",
            Token::Const => "const",
            Token::Continue => "continue",

            Token::Default => "default",
            Token::Defer => "defer",
            Token::Else => "else",
            Token::Fallthrough => "fallthrough",
            Token::For => "for",

            Token::Func => "func",
            Token::Go => "go",
            Token::Goto => "goto",
            Token::If => "if",
            Token::Import => "import",

            Token::Interface => "interface",
            Token::Map => "map",
            Token::Package => "package",
            Token::Range => "range",
            Token::Return => "return",

            Token::Select => "select",
            Token::Struct => "struct",
            Token::Switch => "switch",
            Token::Type => "type",
            Token::Var => "var",

            Token::Tilde => "~",
        }
    }

    /// Resolves a wire string back to its token.
    ///
    /// Fatal on anything outside the bijection: an unknown string means the
    /// wire tree is corrupt or from an incompatible grammar version.
    pub fn from_wire(s: &str) -> Result<Token, Error> {
        STRING_TO_TOKEN
            .get(s)
            .copied()
            .ok_or_else(|| Error::UnsupportedToken(s.to_string()))
    }

    /// Binary operator precedence; `LOWEST_PREC` for non-operators.
    pub const fn precedence(self) -> u8 {
        match self {
            Token::LOr => 1,
            Token::LAnd => 2,
            Token::Eql | Token::Neq | Token::Lss | Token::Leq | Token::Gtr | Token::Geq => 3,
            Token::Add | Token::Sub | Token::Or | Token::Xor => 4,
            Token::Mul
            | Token::Quo
            | Token::Rem
            | Token::Shl
            | Token::Shr
            | Token::And
            | Token::AndNot => 5,
            _ => LOWEST_PREC,
        }
    }

    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Token::Ident | Token::Int | Token::Float | Token::Imag | Token::Char | Token::String
        )
    }

    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Token::Break
                | Token::Case
                | Token::Chan
                | Token::Const
                | Token::Continue
                | Token::Default
                | Token::Defer
                | Token::Else
                | Token::Fallthrough
                | Token::For
                | Token::Func
                | Token::Go
                | Token::Goto
                | Token::If
                | Token::Import
                | Token::Interface
                | Token::Map
                | Token::Package
                | Token::Range
                | Token::Return
                | Token::Select
                | Token::Struct
                | Token::Switch
                | Token::Type
                | Token::Var
        )
    }

    /// `op=` tokens, plus plain `=` and `:=`.
    pub const fn is_assign_op(self) -> bool {
        matches!(
            self,
            Token::Assign
                | Token::Define
                | Token::AddAssign
                | Token::SubAssign
                | Token::MulAssign
                | Token::QuoAssign
                | Token::RemAssign
                | Token::AndAssign
                | Token::OrAssign
                | Token::XorAssign
                | Token::ShlAssign
                | Token::ShrAssign
                | Token::AndNotAssign
        )
    }

    /// Maps an identifier to its keyword token, if it is one.
    pub fn keyword(ident: &str) -> Option<Token> {
        match STRING_TO_TOKEN.get(ident).copied() {
            Some(tok) if tok.is_keyword() => Some(tok),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Channel direction
// =============================================================================

/// Channel direction marker, kept separate from the token set: it is a
/// property of a channel type, not a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Send,
    Recv,
    Both,
}

impl ChanDir {
    pub const fn as_str(self) -> &'static str {
        match self {
            ChanDir::Send => "SEND",
            ChanDir::Recv => "RECV",
            ChanDir::Both => "BOTH",
        }
    }

    pub fn from_wire(s: &str) -> Result<ChanDir, Error> {
        match s {
            "SEND" => Ok(ChanDir::Send),
            "RECV" => Ok(ChanDir::Recv),
            "BOTH" => Ok(ChanDir::Both),
            other => Err(Error::UnsupportedToken(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijection_is_total() {
        for &tok in ALL {
            assert_eq!(Token::from_wire(tok.as_str()).unwrap(), tok);
        }
    }

    #[test]
    fn canonical_strings_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for &tok in ALL {
            assert!(seen.insert(tok.as_str()), "duplicate string for {tok:?}");
        }
    }

    #[test]
    fn fabricated_string_is_fatal() {
        match Token::from_wire("@@unknown@@") {
            Err(Error::UnsupportedToken(s)) => assert_eq!(s, "@@unknown@@"),
            other => panic!("expected UnsupportedToken, got {other:?}"),
        }
    }

    #[test]
    fn chan_dir_round_trips() {
        for dir in [ChanDir::Send, ChanDir::Recv, ChanDir::Both] {
            assert_eq!(ChanDir::from_wire(dir.as_str()).unwrap(), dir);
        }
        assert!(ChanDir::from_wire("send").is_err());
    }

    #[test]
    fn precedence_orders_operators() {
        assert!(Token::Mul.precedence() > Token::Add.precedence());
        assert!(Token::Add.precedence() > Token::Eql.precedence());
        assert!(Token::Eql.precedence() > Token::LAnd.precedence());
        assert!(Token::LAnd.precedence() > Token::LOr.precedence());
        assert_eq!(Token::Assign.precedence(), LOWEST_PREC);
    }

    #[test]
    fn keyword_lookup() {
        assert_eq!(Token::keyword("func"), Some(Token::Func));
        assert_eq!(Token::keyword("IDENT"), None);
        assert_eq!(Token::keyword("x"), None);
    }
}
