//! Logos-based Go tokenizer with automatic semicolon insertion.
//!
//! The raw layer recognizes token shapes; the [`scan`] adapter maps keywords,
//! inserts the implicit semicolons the grammar requires, keeps comments as
//! positioned tokens (they are part of the tree, not trivia), and records
//! line starts for the position index.

use std::collections::VecDeque;

use logos::{Lexer as LogosLexer, Logos};

use crate::error::{LexErrorKind, ParseError, Span};
use crate::token::Token;

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(error = LexErrorKind)]
enum RawTok {
    #[regex(r"[\t\x0C\v ]+", logos::skip)]
    _Ws,

    // Newlines stay tokens so the adapter can insert semicolons.
    #[regex(r"\r\n|\n|\r")]
    Newline,

    #[regex(r"//[^\n\r]*")]
    LineComment,

    // Kept (not skipped): a block comment spanning lines acts as a newline.
    // The class-based shape avoids lazy quantifiers, which the DFA backend
    // cannot express.
    #[regex(r"/\*([^*]*\*+[^*/])*[^*]*\*+/")]
    BlockComment,

    #[regex(r"[_\p{XID_Start}][_\p{XID_Continue}]*")]
    Ident,

    // Raw string literal (backquoted); may span lines.
    #[regex(r"`[^`]*`")]
    RawString,

    #[regex(r#""([^"\\\n\r]|\\.)*""#, validate_interpreted_string)]
    String,

    #[regex(r"'([^'\\\n\r]|\\.)+'", validate_rune_lit)]
    Rune,

    #[regex(r"0[bB][01]([01_]*[01])?", validate_number)]
    #[regex(r"0[oO][0-7]([0-7_]*[0-7])?", validate_number)]
    #[regex(r"0[xX][0-9a-fA-F]([0-9a-fA-F_]*[0-9a-fA-F])?", validate_number)]
    #[regex(r"0([0-7_]*[0-7])?", validate_number)]
    #[regex(r"[1-9]([0-9_]*[0-9])?", validate_number)]
    Int,

    #[regex(
        r"([0-9]([0-9_]*[0-9])?\.([0-9]([0-9_]*[0-9])?)?([eE][+-]?[0-9]([0-9_]*[0-9])?)?)|([0-9]([0-9_]*[0-9])?[eE][+-]?[0-9]([0-9_]*[0-9])?)|(\.[0-9]([0-9_]*[0-9])?([eE][+-]?[0-9]([0-9_]*[0-9])?)?)",
        validate_number
    )]
    Float,

    #[regex(
        r"(((0[xX][0-9a-fA-F]([0-9a-fA-F_]*[0-9a-fA-F])?)|(0[bB][01]([01_]*[01])?)|(0[oO][0-7]([0-7_]*[0-7])?)|([0-9]([0-9_]*[0-9])?))i)|((([0-9]([0-9_]*[0-9])?\.([0-9]([0-9_]*[0-9])?)?([eE][+-]?[0-9]([0-9_]*[0-9])?)?)|([0-9]([0-9_]*[0-9])?[eE][+-]?[0-9]([0-9_]*[0-9])?)|(\.[0-9]([0-9_]*[0-9])?([eE][+-]?[0-9]([0-9_]*[0-9])?)?))i)",
        validate_number
    )]
    Imag,

    #[token("...")]
    Ellipsis,

    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token("&^=")]
    AndNotAssign,

    #[token("+=")]
    AddAssign,
    #[token("-=")]
    SubAssign,
    #[token("*=")]
    MulAssign,
    #[token("/=")]
    QuoAssign,
    #[token("%=")]
    RemAssign,
    #[token("&=")]
    AndAssign,
    #[token("|=")]
    OrAssign,
    #[token("^=")]
    XorAssign,

    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&^")]
    AndNot,

    #[token("&&")]
    LAnd,
    #[token("||")]
    LOr,

    #[token("==")]
    Eql,
    #[token("!=")]
    Neq,
    #[token("<=")]
    Leq,
    #[token(">=")]
    Geq,

    #[token("++")]
    Inc,
    #[token("--")]
    Dec,

    #[token(":=")]
    Define,
    #[token("<-")]
    Arrow,

    #[token("=")]
    Assign,
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Quo,
    #[token("%")]
    Rem,
    #[token("&")]
    And,
    #[token("|")]
    Or,
    #[token("^")]
    Xor,
    #[token("~")]
    Tilde,
    #[token("!")]
    Not,
    #[token("<")]
    Lss,
    #[token(">")]
    Gtr,

    #[token("(")]
    Lparen,
    #[token(")")]
    Rparen,
    #[token("[")]
    Lbrack,
    #[token("]")]
    Rbrack,
    #[token("{")]
    Lbrace,
    #[token("}")]
    Rbrace,

    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Period,
}

fn validate_interpreted_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice();
    let mut it = s[1..s.len() - 1].chars();
    while let Some(c) = it.next() {
        if c != '\\' {
            continue;
        }
        match it.next() {
            Some('a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' | '"' | '\'') => {}
            Some('x') => {
                for _ in 0..2 {
                    let h = it.next().ok_or(LexErrorKind::InvalidEscape)?;
                    if !h.is_ascii_hexdigit() {
                        return Err(LexErrorKind::InvalidEscape);
                    }
                }
            }
            Some('u') => {
                for _ in 0..4 {
                    let h = it.next().ok_or(LexErrorKind::InvalidEscape)?;
                    if !h.is_ascii_hexdigit() {
                        return Err(LexErrorKind::InvalidEscape);
                    }
                }
            }
            Some('U') => {
                for _ in 0..8 {
                    let h = it.next().ok_or(LexErrorKind::InvalidEscape)?;
                    if !h.is_ascii_hexdigit() {
                        return Err(LexErrorKind::InvalidEscape);
                    }
                }
            }
            Some('0'..='7') => {
                for _ in 0..2 {
                    if let Some(peek) = it.clone().next() {
                        if ('0'..='7').contains(&peek) {
                            it.next();
                        } else {
                            break;
                        }
                    }
                }
            }
            _ => return Err(LexErrorKind::InvalidEscape),
        }
    }
    Ok(())
}

fn validate_rune_lit(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice();
    if s.len() < 3 {
        return Err(LexErrorKind::InvalidToken);
    }
    // Escape forms are shared with strings; a strict single-rune check is a
    // semantic concern, tokenization only needs the shape.
    let mut it = s[1..s.len() - 1].chars();
    while let Some(c) = it.next() {
        if c != '\\' {
            continue;
        }
        match it.next() {
            Some('a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' | '"' | '\'') => {}
            Some('x' | 'u' | 'U' | '0'..='7') => {}
            _ => return Err(LexErrorKind::InvalidEscape),
        }
    }
    Ok(())
}

fn validate_number(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice();
    if s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return Err(LexErrorKind::InvalidNumber);
    }
    Ok(())
}

/// A scanned token: kind, byte span, and the literal text for identifiers,
/// literals and comments (empty for operators and keywords).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub tok: Token,
    pub offset: u32,
    pub end: u32,
    pub lit: String,
}

impl Lexeme {
    fn new(tok: Token, span: std::ops::Range<usize>, lit: &str) -> Self {
        Lexeme {
            tok,
            offset: span.start as u32,
            end: span.end as u32,
            lit: lit.to_string(),
        }
    }
}

/// The full scan result: every token (comments included, semicolons
/// inserted) plus the byte offsets where lines start.
#[derive(Debug)]
pub struct ScanResult {
    pub lexemes: Vec<Lexeme>,
    pub lines: Vec<u32>,
}

const fn can_end_statement(tok: Token) -> bool {
    matches!(
        tok,
        Token::Ident
            | Token::Int
            | Token::Float
            | Token::Imag
            | Token::Char
            | Token::String
            | Token::Break
            | Token::Continue
            | Token::Fallthrough
            | Token::Return
            | Token::Inc
            | Token::Dec
            | Token::Rparen
            | Token::Rbrack
            | Token::Rbrace
    )
}

fn map_raw(raw: RawTok, slice: &str) -> Token {
    match raw {
        RawTok::Ident => Token::keyword(slice).unwrap_or(Token::Ident),
        RawTok::Int => Token::Int,
        RawTok::Float => Token::Float,
        RawTok::Imag => Token::Imag,
        RawTok::Rune => Token::Char,
        RawTok::String | RawTok::RawString => Token::String,
        RawTok::LineComment | RawTok::BlockComment => Token::Comment,

        RawTok::Ellipsis => Token::Ellipsis,
        RawTok::ShlAssign => Token::ShlAssign,
        RawTok::ShrAssign => Token::ShrAssign,
        RawTok::AndNotAssign => Token::AndNotAssign,
        RawTok::AddAssign => Token::AddAssign,
        RawTok::SubAssign => Token::SubAssign,
        RawTok::MulAssign => Token::MulAssign,
        RawTok::QuoAssign => Token::QuoAssign,
        RawTok::RemAssign => Token::RemAssign,
        RawTok::AndAssign => Token::AndAssign,
        RawTok::OrAssign => Token::OrAssign,
        RawTok::XorAssign => Token::XorAssign,
        RawTok::Shl => Token::Shl,
        RawTok::Shr => Token::Shr,
        RawTok::AndNot => Token::AndNot,
        RawTok::LAnd => Token::LAnd,
        RawTok::LOr => Token::LOr,
        RawTok::Eql => Token::Eql,
        RawTok::Neq => Token::Neq,
        RawTok::Leq => Token::Leq,
        RawTok::Geq => Token::Geq,
        RawTok::Inc => Token::Inc,
        RawTok::Dec => Token::Dec,
        RawTok::Define => Token::Define,
        RawTok::Arrow => Token::Arrow,
        RawTok::Assign => Token::Assign,
        RawTok::Add => Token::Add,
        RawTok::Sub => Token::Sub,
        RawTok::Mul => Token::Mul,
        RawTok::Quo => Token::Quo,
        RawTok::Rem => Token::Rem,
        RawTok::And => Token::And,
        RawTok::Or => Token::Or,
        RawTok::Xor => Token::Xor,
        RawTok::Tilde => Token::Tilde,
        RawTok::Not => Token::Not,
        RawTok::Lss => Token::Lss,
        RawTok::Gtr => Token::Gtr,
        RawTok::Lparen => Token::Lparen,
        RawTok::Rparen => Token::Rparen,
        RawTok::Lbrack => Token::Lbrack,
        RawTok::Rbrack => Token::Rbrack,
        RawTok::Lbrace => Token::Lbrace,
        RawTok::Rbrace => Token::Rbrace,
        RawTok::Comma => Token::Comma,
        RawTok::Semi => Token::Semicolon,
        RawTok::Colon => Token::Colon,
        RawTok::Period => Token::Period,

        RawTok::Newline | RawTok::_Ws => Token::Illegal,
    }
}

/// Tokenizes a whole file, stopping at the first lexical error.
///
/// `filename` only feeds error locations; positions in the result are plain
/// byte offsets into `src`.
pub fn scan(filename: &str, src: &str) -> Result<ScanResult, ParseError> {
    let mut raw = RawTok::lexer(src);
    let mut lexemes: Vec<Lexeme> = Vec::new();
    let mut pending: VecDeque<Lexeme> = VecDeque::new();
    let mut lines: Vec<u32> = vec![0];
    let mut last_insertable = false;

    fn record_inner_lines(lines: &mut Vec<u32>, span: &std::ops::Range<usize>, s: &str) {
        for (i, b) in s.bytes().enumerate() {
            if b == b'\n' {
                lines.push((span.start + i + 1) as u32);
            }
        }
    }

    while let Some(item) = raw.next() {
        let span = raw.span();
        let slice = raw.slice();
        let raw_tok = match item {
            Ok(t) => t,
            Err(kind) => {
                let sp = Span::from_range(span.clone());
                let (line, col) = line_col(&lines, sp.start);
                return Err(ParseError::new(
                    format!("{filename}:{line}:{col}"),
                    kind.to_string(),
                ));
            }
        };

        match raw_tok {
            RawTok::_Ws => {}
            RawTok::Newline => {
                lines.push(span.end as u32);
                if last_insertable {
                    // The implicit semicolon carries the newline as its
                    // literal, the way the grammar's scanner reports it.
                    pending.push_back(Lexeme::new(
                        Token::Semicolon,
                        span.start..span.start,
                        "\n",
                    ));
                    last_insertable = false;
                }
            }
            RawTok::LineComment => {
                lexemes.extend(pending.drain(..));
                lexemes.push(Lexeme::new(Token::Comment, span, slice));
            }
            RawTok::BlockComment => {
                // A multi-line block comment terminates a statement like a
                // newline would.
                if slice.contains('\n') && last_insertable {
                    pending.push_back(Lexeme::new(
                        Token::Semicolon,
                        span.start..span.start,
                        "\n",
                    ));
                    last_insertable = false;
                }
                lexemes.extend(pending.drain(..));
                record_inner_lines(&mut lines, &span, slice);
                lexemes.push(Lexeme::new(Token::Comment, span, slice));
            }
            _ => {
                lexemes.extend(pending.drain(..));
                let tok = map_raw(raw_tok, slice);
                if raw_tok == RawTok::RawString {
                    record_inner_lines(&mut lines, &span, slice);
                }
                let lit = if tok.is_literal() || tok == Token::Ident {
                    slice
                } else {
                    ""
                };
                last_insertable = can_end_statement(tok);
                lexemes.push(Lexeme::new(tok, span, lit));
            }
        }
    }

    lexemes.extend(pending.drain(..));
    if last_insertable {
        let end = src.len();
        lexemes.push(Lexeme::new(Token::Semicolon, end..end, "\n"));
    }

    Ok(ScanResult { lexemes, lines })
}

fn line_col(lines: &[u32], offset: u32) -> (usize, usize) {
    let line = match lines.binary_search(&offset) {
        Ok(i) => i,
        Err(i) => i - 1,
    };
    (line + 1, (offset - lines[line]) as usize + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<Token> {
        scan("test.go", src)
            .unwrap()
            .lexemes
            .iter()
            .map(|l| l.tok)
            .collect()
    }

    #[test]
    fn inserts_semicolon_after_statement_enders() {
        assert_eq!(
            toks("x\n"),
            vec![Token::Ident, Token::Semicolon],
        );
        assert_eq!(
            toks("x++\ny"),
            vec![
                Token::Ident,
                Token::Inc,
                Token::Semicolon,
                Token::Ident,
                Token::Semicolon
            ],
        );
    }

    #[test]
    fn no_semicolon_after_operators() {
        assert_eq!(
            toks("x +\ny\n"),
            vec![
                Token::Ident,
                Token::Add,
                Token::Ident,
                Token::Semicolon
            ],
        );
    }

    #[test]
    fn keywords_are_mapped() {
        assert_eq!(
            toks("package p\n"),
            vec![Token::Package, Token::Ident, Token::Semicolon],
        );
        assert_eq!(
            toks("return\n"),
            vec![Token::Return, Token::Semicolon],
        );
    }

    #[test]
    fn comments_are_kept_with_text() {
        let result = scan("test.go", "// hello\nx\n").unwrap();
        assert_eq!(result.lexemes[0].tok, Token::Comment);
        assert_eq!(result.lexemes[0].lit, "// hello");
    }

    #[test]
    fn multiline_block_comment_acts_as_newline() {
        assert_eq!(
            toks("x /* a\nb */ y\n"),
            vec![
                Token::Ident,
                Token::Semicolon,
                Token::Comment,
                Token::Ident,
                Token::Semicolon
            ],
        );
    }

    #[test]
    fn line_table_covers_multiline_tokens() {
        let result = scan("test.go", "s := `a\nb`\nx\n").unwrap();
        // line starts: 0, after `a, after b`, after x
        assert_eq!(result.lines.len(), 4);
    }

    #[test]
    fn lexical_error_reports_location() {
        let err = scan("bad.go", "x := \"unterminated\n").unwrap_err();
        assert!(err.location.starts_with("bad.go:1:"));
    }

    #[test]
    fn numbers_and_strings() {
        assert_eq!(
            toks("0x1f 1_000 3.14 2i 'a' \"s\" `raw`\n"),
            vec![
                Token::Int,
                Token::Int,
                Token::Float,
                Token::Imag,
                Token::Char,
                Token::String,
                Token::String,
                Token::Semicolon
            ],
        );
    }
}
