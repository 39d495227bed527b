//! Recursive-descent parser producing the arena tree.
//!
//! The grammar walk follows the reference parser for the language closely:
//! precedence climbing for binary expressions, an expression-nesting level
//! that forbids composite literals directly inside control-clause headers,
//! and the usual disambiguations (labels, type switches, range clauses,
//! parameter name/type distribution, generic brackets).
//!
//! Comments are collected into groups up front; a group ending on the line
//! directly above a declaration, spec or field becomes its doc comment, and
//! a group starting on the same line after a spec or field becomes its line
//! comment. Every group also lands on the file root in source order.

use smallvec::smallvec;

use crate::ast::*;
use crate::error::{Error, ParseError, Result};
use crate::lexer::{scan, Lexeme};
use crate::position::{FileSet, Pos, NO_POS};
use crate::token::{ChanDir, Token, LOWEST_PREC};

/// Parses one source file into `arena`, registering `filename` in `fset`.
pub fn parse_file(
    fset: &mut FileSet,
    arena: &mut AstArena,
    filename: &str,
    src: &str,
) -> Result<File> {
    let scanned = scan(filename, src)?;
    let index = fset.add_file(filename, src.len() as u32);
    let base = fset.file(index).base();
    {
        let file = fset.file_mut(index);
        for &line in &scanned.lines {
            file.add_line(line);
        }
    }
    let mut parser = Parser::new(
        arena,
        filename,
        base,
        src.len() as u32,
        scanned.lexemes,
        scanned.lines,
    );
    parser.collect_comments();
    let file = parser.source_file()?;
    Ok(file)
}

/// One comment group with the layout facts attachment decisions need.
struct GroupInfo {
    group: CommentGroupId,
    start: u32,
    end: u32,
    start_line: usize,
    end_line: usize,
}

/// Outcome of a simple-statement parse; range clauses surface separately
/// because only `for` headers may absorb them.
enum Simple {
    Stmt(StmtId),
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        tok_pos: Pos,
        tok: Token,
        x: ExprId,
    },
}

struct Parser<'a> {
    arena: &'a mut AstArena,
    filename: &'a str,
    base: u32,
    src_len: u32,
    all: Vec<Lexeme>,
    /// Indices into `all`, comments excluded; what the grammar walk sees.
    toks: Vec<usize>,
    /// Offsets of the tokens in `toks`, for adjacency queries.
    tok_offsets: Vec<u32>,
    cursor: usize,
    lines: Vec<u32>,
    groups: Vec<GroupInfo>,
    expr_lev: i32,
}

impl<'a> Parser<'a> {
    fn new(
        arena: &'a mut AstArena,
        filename: &'a str,
        base: u32,
        src_len: u32,
        lexemes: Vec<Lexeme>,
        lines: Vec<u32>,
    ) -> Self {
        Parser {
            arena,
            filename,
            base,
            src_len,
            all: lexemes,
            toks: Vec::new(),
            tok_offsets: Vec::new(),
            cursor: 0,
            lines,
            groups: Vec::new(),
            expr_lev: 0,
        }
    }

    /// Splits comments out of the token stream, grouping runs of comments
    /// that are not interrupted by other tokens or blank lines.
    fn collect_comments(&mut self) {
        let mut current: Vec<CommentId> = Vec::new();
        let (mut start, mut end, mut start_line, mut end_line) = (0u32, 0u32, 0usize, 0usize);

        let all = std::mem::take(&mut self.all);
        for (i, lx) in all.iter().enumerate() {
            if lx.tok == Token::Comment {
                let line = self.line_of(lx.offset);
                let last_line = self.line_of(lx.end.saturating_sub(1));
                if current.is_empty() {
                    start = lx.offset;
                    start_line = line;
                } else if line > end_line + 1 {
                    self.flush_group(&mut current, start, end, start_line, end_line);
                    start = lx.offset;
                    start_line = line;
                }
                let id = self.arena.comments.alloc(Comment {
                    slash: self.base + lx.offset,
                    text: lx.lit.clone(),
                });
                current.push(id);
                end = lx.end;
                end_line = last_line;
            } else {
                // Implicit semicolons carry the newline that produced them
                // and do not break a comment group.
                let breaks = !(lx.tok == Token::Semicolon && lx.lit == "\n");
                if breaks && !current.is_empty() {
                    self.flush_group(&mut current, start, end, start_line, end_line);
                }
                self.toks.push(i);
                self.tok_offsets.push(lx.offset);
            }
        }
        if !current.is_empty() {
            self.flush_group(&mut current, start, end, start_line, end_line);
        }
        self.all = all;
    }

    fn flush_group(
        &mut self,
        current: &mut Vec<CommentId>,
        start: u32,
        end: u32,
        start_line: usize,
        end_line: usize,
    ) {
        let list = std::mem::take(current);
        let group = self.arena.comment_groups.alloc(CommentGroup { list });
        self.groups.push(GroupInfo {
            group,
            start,
            end,
            start_line,
            end_line,
        });
    }

    fn line_of(&self, offset: u32) -> usize {
        match self.lines.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }

    /// True when a non-comment token starts in `[lo, hi)`.
    fn has_token_between(&self, lo: u32, hi: u32) -> bool {
        let i = self.tok_offsets.partition_point(|&o| o < lo);
        self.tok_offsets.get(i).is_some_and(|&o| o < hi)
    }

    /// Doc comment for a node starting at `offset`: the group ending on the
    /// previous line (or the same line), with no token between the two.
    fn doc_before(&self, offset: u32) -> Option<CommentGroupId> {
        let node_line = self.line_of(offset);
        let mut best: Option<&GroupInfo> = None;
        for g in &self.groups {
            if g.end > offset {
                break;
            }
            best = Some(g);
        }
        let g = best?;
        let adjacent = g.end_line == node_line || g.end_line + 1 == node_line;
        if adjacent && !self.has_token_between(g.end, offset) {
            return Some(g.group);
        }
        None
    }

    /// Trailing line comment for a node ending at `end_offset`.
    fn trailing_after(&self, end_offset: u32) -> Option<CommentGroupId> {
        if end_offset == 0 {
            return None;
        }
        let node_line = self.line_of(end_offset - 1);
        self.groups
            .iter()
            .find(|g| g.start >= end_offset && g.start_line == node_line)
            .map(|g| g.group)
    }

    fn all_groups(&self) -> Vec<CommentGroupId> {
        self.groups.iter().map(|g| g.group).collect()
    }

    // --- Cursor ---

    fn lex(&self) -> Option<&Lexeme> {
        self.toks.get(self.cursor).map(|&i| &self.all[i])
    }

    fn tok(&self) -> Token {
        self.lex().map_or(Token::Eof, |l| l.tok)
    }

    fn lit(&self) -> &str {
        self.lex().map_or("", |l| l.lit.as_str())
    }

    fn offset(&self) -> u32 {
        self.lex().map_or(self.src_len, |l| l.offset)
    }

    fn end_offset(&self) -> u32 {
        self.lex().map_or(self.src_len, |l| l.end)
    }

    fn pos(&self) -> Pos {
        self.base + self.offset()
    }

    fn nth_tok(&self, n: usize) -> Token {
        self.toks
            .get(self.cursor + n)
            .map_or(Token::Eof, |&i| self.all[i].tok)
    }

    fn next(&mut self) {
        if self.cursor < self.toks.len() {
            self.cursor += 1;
        }
    }

    fn at(&self, tok: Token) -> bool {
        self.tok() == tok
    }

    fn error(&self, message: impl Into<String>) -> Error {
        let offset = self.offset();
        let line = self.line_of(offset);
        let col = offset - self.lines.get(line).copied().unwrap_or(0) + 1;
        Error::Parse(ParseError::new(
            format!("{}:{}:{}", self.filename, line + 1, col),
            message,
        ))
    }

    fn expect(&mut self, tok: Token) -> Result<Pos> {
        if !self.at(tok) {
            return Err(self.error(format!("expected {:?}, found {:?}", tok.as_str(), self.tok().as_str())));
        }
        let pos = self.pos();
        self.next();
        Ok(pos)
    }

    /// Consumes a statement terminator; closing delimiters satisfy it
    /// without being consumed.
    fn expect_semi(&mut self) -> Result<()> {
        match self.tok() {
            Token::Semicolon => {
                self.next();
                Ok(())
            }
            Token::Rparen | Token::Rbrace => Ok(()),
            _ => Err(self.error(format!(
                "expected \";\", found {:?}",
                self.tok().as_str()
            ))),
        }
    }

    // --- File ---

    fn source_file(&mut self) -> Result<File> {
        let doc = self.doc_before(self.offset());
        let package_pos = self.expect(Token::Package)?;
        let name = self.parse_ident()?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        let mut imports = Vec::new();
        while !self.at(Token::Eof) {
            let decl = self.parse_decl(&mut imports)?;
            decls.push(decl);
        }

        Ok(File {
            doc,
            package_pos,
            name,
            decls,
            imports,
            unresolved: Vec::new(),
            comments: self.all_groups(),
        })
    }

    // --- Declarations ---

    fn parse_decl(&mut self, imports: &mut Vec<ImportId>) -> Result<DeclId> {
        match self.tok() {
            Token::Import | Token::Const | Token::Type | Token::Var => {
                self.parse_gen_decl(imports)
            }
            Token::Func => self.parse_func_decl(),
            other => Err(self.error(format!(
                "expected declaration, found {:?}",
                other.as_str()
            ))),
        }
    }

    fn parse_gen_decl(&mut self, imports: &mut Vec<ImportId>) -> Result<DeclId> {
        let doc = self.doc_before(self.offset());
        let keyword = self.tok();
        let tok_pos = self.pos();
        self.next();

        let mut lparen = NO_POS;
        let mut rparen = NO_POS;
        let mut specs = Vec::new();

        if self.at(Token::Lparen) {
            lparen = self.pos();
            self.next();
            while !self.at(Token::Rparen) && !self.at(Token::Eof) {
                let spec_doc = self.doc_before(self.offset());
                let spec = self.parse_spec(keyword, spec_doc, imports)?;
                specs.push(spec);
                self.expect_semi()?;
            }
            rparen = self.expect(Token::Rparen)?;
            self.expect_semi()?;
        } else {
            let spec = self.parse_spec(keyword, None, imports)?;
            specs.push(spec);
            self.expect_semi()?;
        }

        Ok(self.arena.decls.alloc(Decl::Gen(GenDecl {
            doc,
            tok_pos,
            tok: keyword,
            lparen,
            specs,
            rparen,
        })))
    }

    fn parse_spec(
        &mut self,
        keyword: Token,
        doc: Option<CommentGroupId>,
        imports: &mut Vec<ImportId>,
    ) -> Result<SpecId> {
        match keyword {
            Token::Import => {
                let name = match self.tok() {
                    Token::Period => {
                        let pos = self.pos();
                        self.next();
                        Some(self.arena.alloc_ident(pos, "."))
                    }
                    Token::Ident => Some(self.parse_ident()?),
                    _ => None,
                };
                if !self.at(Token::String) {
                    return Err(self.error("expected import path string"));
                }
                let path_end = self.end_offset();
                let path = self.parse_basic_lit()?;
                let comment = self.trailing_after(path_end);
                let id = self.arena.import_specs.alloc(ImportSpec {
                    doc,
                    name,
                    path,
                    comment,
                    end_pos: NO_POS,
                });
                imports.push(id);
                Ok(self.arena.specs.alloc(Spec::Import(id)))
            }
            Token::Const | Token::Var => {
                let names = self.parse_ident_list()?;
                let typ = if !self.at(Token::Assign)
                    && !self.at(Token::Semicolon)
                    && !self.at(Token::Rparen)
                {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                let values = if self.at(Token::Assign) {
                    self.next();
                    self.parse_expr_list()?
                } else {
                    smallvec![]
                };
                let end = self.prev_end_offset();
                let comment = self.trailing_after(end);
                Ok(self.arena.specs.alloc(Spec::Value(ValueSpec {
                    doc,
                    names,
                    typ,
                    values,
                    comment,
                })))
            }
            Token::Type => {
                let name = self.parse_ident()?;
                let type_params = self.parse_type_spec_params()?;
                let assign = if self.at(Token::Assign) {
                    let pos = self.pos();
                    self.next();
                    pos
                } else {
                    NO_POS
                };
                let typ = self.parse_type()?;
                let end = self.prev_end_offset();
                let comment = self.trailing_after(end);
                Ok(self.arena.specs.alloc(Spec::Type(TypeSpec {
                    doc,
                    name,
                    type_params,
                    assign,
                    typ,
                    comment,
                })))
            }
            _ => Err(self.error("invalid declaration keyword")),
        }
    }

    /// End offset of the most recently consumed token.
    fn prev_end_offset(&self) -> u32 {
        if self.cursor == 0 {
            return 0;
        }
        self.toks
            .get(self.cursor - 1)
            .map_or(0, |&i| self.all[i].end)
    }

    /// Type parameters of a `type` spec, distinguished from an array or
    /// slice type by two-token lookahead: `[` `]`, `[` `...` and
    /// `[` ident `]` all belong to the type, anything else to a
    /// parameter list.
    fn parse_type_spec_params(&mut self) -> Result<Option<FieldListId>> {
        if !self.at(Token::Lbrack) {
            return Ok(None);
        }
        let second = self.nth_tok(1);
        let third = self.nth_tok(2);
        let is_type_params =
            second == Token::Ident && !matches!(third, Token::Rbrack | Token::Eof);
        if !is_type_params {
            return Ok(None);
        }
        Ok(Some(self.parse_bracketed_params()?))
    }

    fn parse_func_decl(&mut self) -> Result<DeclId> {
        let doc = self.doc_before(self.offset());
        let func_pos = self.expect(Token::Func)?;

        let recv = if self.at(Token::Lparen) {
            Some(self.parse_params()?)
        } else {
            None
        };

        let name = self.parse_ident()?;
        let type_params = if self.at(Token::Lbrack) {
            Some(self.parse_bracketed_params()?)
        } else {
            None
        };
        let params = self.parse_params()?;
        let results = self.parse_results()?;
        let typ = self.arena.func_types.alloc(FuncType {
            func_pos,
            type_params,
            params: Some(params),
            results,
        });

        let body = if self.at(Token::Lbrace) {
            Some(self.parse_block()?)
        } else {
            None
        };
        self.expect_semi()?;

        Ok(self.arena.decls.alloc(Decl::Func(FuncDecl {
            doc,
            recv,
            name,
            typ,
            body,
        })))
    }

    // --- Identifiers and literals ---

    fn parse_ident(&mut self) -> Result<IdentId> {
        if !self.at(Token::Ident) {
            return Err(self.error(format!(
                "expected identifier, found {:?}",
                self.tok().as_str()
            )));
        }
        let pos = self.pos();
        let name = self.lit().to_string();
        self.next();
        Ok(self.arena.alloc_ident(pos, name))
    }

    fn parse_ident_list(&mut self) -> Result<IdentList> {
        let mut list: IdentList = smallvec![self.parse_ident()?];
        while self.at(Token::Comma) {
            self.next();
            list.push(self.parse_ident()?);
        }
        Ok(list)
    }

    fn parse_basic_lit(&mut self) -> Result<BasicLitId> {
        let kind = self.tok();
        if !kind.is_literal() || kind == Token::Ident {
            return Err(self.error("expected literal"));
        }
        let pos = self.pos();
        let value = self.lit().to_string();
        self.next();
        Ok(self.arena.basic_lits.alloc(BasicLit {
            value_pos: pos,
            kind,
            value,
        }))
    }

    // --- Types ---

    fn is_type_start(&self) -> bool {
        matches!(
            self.tok(),
            Token::Ident
                | Token::Lbrack
                | Token::Struct
                | Token::Interface
                | Token::Map
                | Token::Chan
                | Token::Arrow
                | Token::Func
                | Token::Mul
                | Token::Lparen
        )
    }

    fn parse_type(&mut self) -> Result<ExprId> {
        match self.tok() {
            Token::Ident => self.parse_type_name(),
            Token::Lbrack => {
                let lbrack = self.pos();
                self.next();
                if self.at(Token::Rbrack) {
                    self.next();
                    let elt = self.parse_type()?;
                    Ok(self.arena.alloc_expr(Expr::ArrayType {
                        lbrack,
                        len: None,
                        elt,
                    }))
                } else if self.at(Token::Ellipsis) {
                    let pos = self.pos();
                    self.next();
                    let len = self.arena.alloc_expr(Expr::Ellipsis { pos, elt: None });
                    self.expect(Token::Rbrack)?;
                    let elt = self.parse_type()?;
                    Ok(self.arena.alloc_expr(Expr::ArrayType {
                        lbrack,
                        len: Some(len),
                        elt,
                    }))
                } else {
                    self.expr_lev += 1;
                    let len = self.parse_expr()?;
                    self.expr_lev -= 1;
                    self.expect(Token::Rbrack)?;
                    let elt = self.parse_type()?;
                    Ok(self.arena.alloc_expr(Expr::ArrayType {
                        lbrack,
                        len: Some(len),
                        elt,
                    }))
                }
            }
            Token::Struct => self.parse_struct_type(),
            Token::Interface => self.parse_interface_type(),
            Token::Map => {
                let map_pos = self.pos();
                self.next();
                self.expect(Token::Lbrack)?;
                let key = self.parse_type()?;
                self.expect(Token::Rbrack)?;
                let value = self.parse_type()?;
                Ok(self.arena.alloc_expr(Expr::MapType {
                    map_pos,
                    key,
                    value,
                }))
            }
            Token::Chan => {
                let begin = self.pos();
                self.next();
                let (arrow, dir) = if self.at(Token::Arrow) {
                    let arrow = self.pos();
                    self.next();
                    (arrow, ChanDir::Send)
                } else {
                    (NO_POS, ChanDir::Both)
                };
                let value = self.parse_type()?;
                Ok(self.arena.alloc_expr(Expr::ChanType {
                    begin,
                    arrow,
                    dir,
                    value,
                }))
            }
            Token::Arrow => {
                let begin = self.pos();
                self.next();
                let arrow = begin;
                self.expect(Token::Chan)?;
                let value = self.parse_type()?;
                Ok(self.arena.alloc_expr(Expr::ChanType {
                    begin,
                    arrow,
                    dir: ChanDir::Recv,
                    value,
                }))
            }
            Token::Func => {
                let func_pos = self.pos();
                self.next();
                let ft = self.parse_signature(func_pos)?;
                Ok(self.arena.alloc_expr(Expr::FuncType(ft)))
            }
            Token::Mul => {
                let star = self.pos();
                self.next();
                let x = self.parse_type()?;
                Ok(self.arena.alloc_expr(Expr::Star { star, x }))
            }
            Token::Lparen => {
                let lparen = self.pos();
                self.next();
                let x = self.parse_type()?;
                let rparen = self.expect(Token::Rparen)?;
                Ok(self.arena.alloc_expr(Expr::Paren { lparen, x, rparen }))
            }
            other => Err(self.error(format!("expected type, found {:?}", other.as_str()))),
        }
    }

    /// `T`, `pkg.T`, and generic instantiations of either.
    fn parse_type_name(&mut self) -> Result<ExprId> {
        let ident = self.parse_ident()?;
        let mut x = self.arena.ident_expr(ident);
        if self.at(Token::Period) {
            self.next();
            let sel = self.parse_ident()?;
            x = self.arena.alloc_expr(Expr::Selector { x, sel });
        }
        if self.at(Token::Lbrack) {
            x = self.parse_instantiation(x)?;
        }
        Ok(x)
    }

    fn parse_instantiation(&mut self, x: ExprId) -> Result<ExprId> {
        let lbrack = self.expect(Token::Lbrack)?;
        self.expr_lev += 1;
        let mut indices: ExprList = smallvec![self.parse_type()?];
        while self.at(Token::Comma) {
            self.next();
            indices.push(self.parse_type()?);
        }
        self.expr_lev -= 1;
        let rbrack = self.expect(Token::Rbrack)?;
        if indices.len() == 1 {
            let index = indices.remove(0);
            Ok(self.arena.alloc_expr(Expr::Index {
                x,
                lbrack,
                index,
                rbrack,
            }))
        } else {
            Ok(self.arena.alloc_expr(Expr::IndexList {
                x,
                lbrack,
                indices,
                rbrack,
            }))
        }
    }

    fn parse_struct_type(&mut self) -> Result<ExprId> {
        let struct_pos = self.expect(Token::Struct)?;
        let opening = self.expect(Token::Lbrace)?;
        let mut fields = Vec::new();
        while !self.at(Token::Rbrace) && !self.at(Token::Eof) {
            fields.push(self.parse_struct_field()?);
        }
        let closing = self.expect(Token::Rbrace)?;
        let list = self.arena.field_lists.alloc(FieldList {
            opening,
            list: fields,
            closing,
        });
        Ok(self.arena.alloc_expr(Expr::StructType {
            struct_pos,
            fields: list,
            incomplete: false,
        }))
    }

    fn parse_struct_field(&mut self) -> Result<FieldId> {
        let doc = self.doc_before(self.offset());
        let mut names: IdentList = smallvec![];
        let typ;

        if self.at(Token::Mul) {
            // Embedded pointer type.
            typ = Some(self.parse_type()?);
        } else if self.at(Token::Ident) {
            let first = self.parse_ident()?;
            if self.at(Token::Period) || self.at(Token::String) || self.at(Token::Semicolon)
                || self.at(Token::Rbrace)
            {
                // Embedded: qualified name or bare ident.
                let mut x = self.arena.ident_expr(first);
                if self.at(Token::Period) {
                    self.next();
                    let sel = self.parse_ident()?;
                    x = self.arena.alloc_expr(Expr::Selector { x, sel });
                }
                if self.at(Token::Lbrack) {
                    x = self.parse_instantiation(x)?;
                }
                typ = Some(x);
            } else if self.at(Token::Lbrack) {
                // `F []T` / `F [N]T` name the field; `List[T]` embeds an
                // instantiated type. Decide after the bracket contents.
                let lbrack = self.pos();
                self.next();
                if self.at(Token::Rbrack) {
                    self.next();
                    let elt = self.parse_type()?;
                    names.push(first);
                    typ = Some(self.arena.alloc_expr(Expr::ArrayType {
                        lbrack,
                        len: None,
                        elt,
                    }));
                } else {
                    self.expr_lev += 1;
                    let len = self.parse_expr()?;
                    self.expr_lev -= 1;
                    if self.at(Token::Comma) {
                        // Multi-argument instantiation, necessarily embedded.
                        let mut indices: ExprList = smallvec![len];
                        while self.at(Token::Comma) {
                            self.next();
                            indices.push(self.parse_type()?);
                        }
                        let rbrack = self.expect(Token::Rbrack)?;
                        let x = self.arena.ident_expr(first);
                        typ = Some(self.arena.alloc_expr(Expr::IndexList {
                            x,
                            lbrack,
                            indices,
                            rbrack,
                        }));
                    } else {
                        let rbrack = self.expect(Token::Rbrack)?;
                        if self.is_type_start() {
                            let elt = self.parse_type()?;
                            names.push(first);
                            typ = Some(self.arena.alloc_expr(Expr::ArrayType {
                                lbrack,
                                len: Some(len),
                                elt,
                            }));
                        } else {
                            let x = self.arena.ident_expr(first);
                            typ = Some(self.arena.alloc_expr(Expr::Index {
                                x,
                                lbrack,
                                index: len,
                                rbrack,
                            }));
                        }
                    }
                }
            } else {
                names.push(first);
                while self.at(Token::Comma) {
                    self.next();
                    names.push(self.parse_ident()?);
                }
                typ = Some(self.parse_type()?);
            }
        } else {
            return Err(self.error("expected field declaration"));
        }

        let tag = if self.at(Token::String) {
            Some(self.parse_basic_lit()?)
        } else {
            None
        };
        let end = self.prev_end_offset();
        self.expect_semi()?;
        let comment = self.trailing_after(end);

        Ok(self.arena.fields.alloc(Field {
            doc,
            names,
            typ,
            tag,
            comment,
        }))
    }

    fn parse_interface_type(&mut self) -> Result<ExprId> {
        let interface_pos = self.expect(Token::Interface)?;
        let opening = self.expect(Token::Lbrace)?;
        let mut fields = Vec::new();
        while !self.at(Token::Rbrace) && !self.at(Token::Eof) {
            let doc = self.doc_before(self.offset());
            let field = if self.at(Token::Ident) && self.nth_tok(1) == Token::Lparen {
                // Method: name(params) results.
                let name = self.parse_ident()?;
                let ft = self.parse_signature(NO_POS)?;
                let typ = self.arena.alloc_expr(Expr::FuncType(ft));
                Field {
                    doc,
                    names: smallvec![name],
                    typ: Some(typ),
                    tag: None,
                    comment: None,
                }
            } else {
                // Embedded interface or type-set term.
                let typ = self.parse_type_term()?;
                Field {
                    doc,
                    names: smallvec![],
                    typ: Some(typ),
                    tag: None,
                    comment: None,
                }
            };
            let end = self.prev_end_offset();
            self.expect_semi()?;
            let comment = self.trailing_after(end);
            let field = Field { comment, ..field };
            fields.push(self.arena.fields.alloc(field));
        }
        let closing = self.expect(Token::Rbrace)?;
        let list = self.arena.field_lists.alloc(FieldList {
            opening,
            list: fields,
            closing,
        });
        Ok(self.arena.alloc_expr(Expr::InterfaceType {
            interface_pos,
            methods: list,
            incomplete: false,
        }))
    }

    /// A type-set term: unions of (possibly `~`-approximated) types.
    fn parse_type_term(&mut self) -> Result<ExprId> {
        let mut x = self.parse_single_term()?;
        while self.at(Token::Or) {
            let op_pos = self.pos();
            self.next();
            let y = self.parse_single_term()?;
            x = self.arena.alloc_expr(Expr::Binary {
                x,
                op_pos,
                op: Token::Or,
                y,
            });
        }
        Ok(x)
    }

    fn parse_single_term(&mut self) -> Result<ExprId> {
        if self.at(Token::Tilde) {
            let op_pos = self.pos();
            self.next();
            let x = self.parse_type()?;
            return Ok(self.arena.alloc_expr(Expr::Unary {
                op_pos,
                op: Token::Tilde,
                x,
            }));
        }
        self.parse_type()
    }

    // --- Parameters ---

    fn parse_signature(&mut self, func_pos: Pos) -> Result<FuncTypeId> {
        let params = self.parse_params()?;
        let results = self.parse_results()?;
        Ok(self.arena.func_types.alloc(FuncType {
            func_pos,
            type_params: None,
            params: Some(params),
            results,
        }))
    }

    fn parse_params(&mut self) -> Result<FieldListId> {
        let opening = self.expect(Token::Lparen)?;
        let fields = self.parse_param_group(Token::Rparen)?;
        let closing = self.expect(Token::Rparen)?;
        Ok(self.arena.field_lists.alloc(FieldList {
            opening,
            list: fields,
            closing,
        }))
    }

    fn parse_bracketed_params(&mut self) -> Result<FieldListId> {
        let opening = self.expect(Token::Lbrack)?;
        let fields = self.parse_param_group(Token::Rbrack)?;
        let closing = self.expect(Token::Rbrack)?;
        Ok(self.arena.field_lists.alloc(FieldList {
            opening,
            list: fields,
            closing,
        }))
    }

    fn parse_results(&mut self) -> Result<Option<FieldListId>> {
        if self.at(Token::Lparen) {
            return Ok(Some(self.parse_params()?));
        }
        if self.is_type_start() {
            let typ = self.parse_type()?;
            let field = self.arena.fields.alloc(Field {
                doc: None,
                names: smallvec![],
                typ: Some(typ),
                tag: None,
                comment: None,
            });
            return Ok(Some(self.arena.field_lists.alloc(FieldList {
                opening: NO_POS,
                list: vec![field],
                closing: NO_POS,
            })));
        }
        Ok(None)
    }

    /// Parses a parameter list body up to `terminator`, then distributes
    /// bare identifiers onto the following named group (`a, b int`).
    fn parse_param_group(&mut self, terminator: Token) -> Result<Vec<FieldId>> {
        // Each raw entry is either a bare type or a name with its type.
        struct RawParam {
            name: Option<IdentId>,
            typ: ExprId,
        }

        let mut raw: Vec<RawParam> = Vec::new();
        while !self.at(terminator) && !self.at(Token::Eof) {
            let entry = if self.at(Token::Ellipsis) {
                let pos = self.pos();
                self.next();
                let elt = Some(self.parse_type()?);
                RawParam {
                    name: None,
                    typ: self.arena.alloc_expr(Expr::Ellipsis { pos, elt }),
                }
            } else if self.at(Token::Ident) {
                let ident = self.parse_ident()?;
                match self.tok() {
                    t if t == terminator || t == Token::Comma => RawParam {
                        name: None,
                        typ: self.arena.ident_expr(ident),
                    },
                    Token::Period => {
                        let mut x = self.arena.ident_expr(ident);
                        self.next();
                        let sel = self.parse_ident()?;
                        x = self.arena.alloc_expr(Expr::Selector { x, sel });
                        if self.at(Token::Lbrack) {
                            x = self.parse_instantiation(x)?;
                        }
                        RawParam { name: None, typ: x }
                    }
                    Token::Lbrack => {
                        let x = self.arena.ident_expr(ident);
                        let x = self.parse_instantiation(x)?;
                        RawParam { name: None, typ: x }
                    }
                    Token::Ellipsis => {
                        let pos = self.pos();
                        self.next();
                        let elt = Some(self.parse_type()?);
                        RawParam {
                            name: Some(ident),
                            typ: self.arena.alloc_expr(Expr::Ellipsis { pos, elt }),
                        }
                    }
                    _ => RawParam {
                        name: Some(ident),
                        typ: self.parse_type()?,
                    },
                }
            } else {
                RawParam {
                    name: None,
                    typ: self.parse_type()?,
                }
            };
            raw.push(entry);
            if self.at(Token::Comma) {
                self.next();
            } else {
                break;
            }
        }

        let named = raw.iter().any(|p| p.name.is_some());
        let mut fields = Vec::new();
        if !named {
            for p in raw {
                fields.push(self.arena.fields.alloc(Field {
                    doc: None,
                    names: smallvec![],
                    typ: Some(p.typ),
                    tag: None,
                    comment: None,
                }));
            }
            return Ok(fields);
        }

        // Named list: bare idents ahead of a named entry share its type.
        let mut pending: IdentList = smallvec![];
        for p in raw {
            match p.name {
                Some(name) => {
                    let mut names = std::mem::take(&mut pending);
                    names.push(name);
                    fields.push(self.arena.fields.alloc(Field {
                        doc: None,
                        names,
                        typ: Some(p.typ),
                        tag: None,
                        comment: None,
                    }));
                }
                None => match &self.arena.exprs[p.typ] {
                    Expr::Ident(id) => pending.push(*id),
                    _ => {
                        return Err(self
                            .error("cannot mix named and unnamed parameters"))
                    }
                },
            }
        }
        if !pending.is_empty() {
            return Err(self.error("missing parameter type"));
        }
        Ok(fields)
    }

    // --- Expressions ---

    fn parse_expr(&mut self) -> Result<ExprId> {
        self.parse_binary_expr(LOWEST_PREC + 1)
    }

    fn parse_expr_list(&mut self) -> Result<ExprList> {
        let mut list: ExprList = smallvec![self.parse_expr()?];
        while self.at(Token::Comma) {
            self.next();
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> Result<ExprId> {
        let mut x = self.parse_unary_expr()?;
        loop {
            let op = self.tok();
            let prec = op.precedence();
            if prec < min_prec {
                return Ok(x);
            }
            let op_pos = self.pos();
            self.next();
            let y = self.parse_binary_expr(prec + 1)?;
            x = self.arena.alloc_expr(Expr::Binary { x, op_pos, op, y });
        }
    }

    fn parse_unary_expr(&mut self) -> Result<ExprId> {
        match self.tok() {
            Token::Add | Token::Sub | Token::Not | Token::Xor | Token::And | Token::Tilde => {
                let op = self.tok();
                let op_pos = self.pos();
                self.next();
                let x = self.parse_unary_expr()?;
                Ok(self.arena.alloc_expr(Expr::Unary { op_pos, op, x }))
            }
            Token::Arrow => {
                // `<-x` receive, or the `<-chan T` type.
                let pos = self.pos();
                self.next();
                if self.at(Token::Chan) {
                    self.expect(Token::Chan)?;
                    let value = self.parse_type()?;
                    Ok(self.arena.alloc_expr(Expr::ChanType {
                        begin: pos,
                        arrow: pos,
                        dir: ChanDir::Recv,
                        value,
                    }))
                } else {
                    let x = self.parse_unary_expr()?;
                    Ok(self.arena.alloc_expr(Expr::Unary {
                        op_pos: pos,
                        op: Token::Arrow,
                        x,
                    }))
                }
            }
            Token::Mul => {
                let star = self.pos();
                self.next();
                let x = self.parse_unary_expr()?;
                Ok(self.arena.alloc_expr(Expr::Star { star, x }))
            }
            _ => self.parse_primary_expr(),
        }
    }

    fn parse_primary_expr(&mut self) -> Result<ExprId> {
        let mut x = self.parse_operand()?;
        loop {
            match self.tok() {
                Token::Period => {
                    self.next();
                    match self.tok() {
                        Token::Ident => {
                            let sel = self.parse_ident()?;
                            x = self.arena.alloc_expr(Expr::Selector { x, sel });
                        }
                        Token::Lparen => {
                            let lparen = self.pos();
                            self.next();
                            let typ = if self.at(Token::Type) {
                                self.next();
                                None
                            } else {
                                Some(self.parse_type()?)
                            };
                            let rparen = self.expect(Token::Rparen)?;
                            x = self.arena.alloc_expr(Expr::TypeAssert {
                                x,
                                lparen,
                                typ,
                                rparen,
                            });
                        }
                        _ => return Err(self.error("expected selector or type assertion")),
                    }
                }
                Token::Lbrack => {
                    x = self.parse_index_or_slice(x)?;
                }
                Token::Lparen => {
                    x = self.parse_call(x)?;
                }
                Token::Lbrace => {
                    if self.expr_lev >= 0 && self.is_literal_type(x) {
                        x = self.parse_composite_lit(Some(x))?;
                    } else {
                        return Ok(x);
                    }
                }
                _ => return Ok(x),
            }
        }
    }

    fn is_literal_type(&self, x: ExprId) -> bool {
        matches!(
            self.arena.exprs[x],
            Expr::Ident(_)
                | Expr::Selector { .. }
                | Expr::Index { .. }
                | Expr::IndexList { .. }
                | Expr::ArrayType { .. }
                | Expr::StructType { .. }
                | Expr::MapType { .. }
        )
    }

    fn parse_operand(&mut self) -> Result<ExprId> {
        match self.tok() {
            Token::Ident => {
                let ident = self.parse_ident()?;
                Ok(self.arena.ident_expr(ident))
            }
            Token::Int | Token::Float | Token::Imag | Token::Char | Token::String => {
                let lit = self.parse_basic_lit()?;
                Ok(self.arena.alloc_expr(Expr::BasicLit(lit)))
            }
            Token::Lparen => {
                let lparen = self.pos();
                self.next();
                self.expr_lev += 1;
                let x = self.parse_expr_or_type()?;
                self.expr_lev -= 1;
                let rparen = self.expect(Token::Rparen)?;
                Ok(self.arena.alloc_expr(Expr::Paren { lparen, x, rparen }))
            }
            Token::Func => {
                let func_pos = self.pos();
                self.next();
                let ft = self.parse_signature(func_pos)?;
                if self.at(Token::Lbrace) {
                    self.expr_lev += 1;
                    let body = self.parse_block()?;
                    self.expr_lev -= 1;
                    Ok(self.arena.alloc_expr(Expr::FuncLit { typ: ft, body }))
                } else {
                    Ok(self.arena.alloc_expr(Expr::FuncType(ft)))
                }
            }
            Token::Lbrack
            | Token::Struct
            | Token::Interface
            | Token::Map
            | Token::Chan => self.parse_type(),
            other => Err(self.error(format!(
                "expected operand, found {:?}",
                other.as_str()
            ))),
        }
    }

    /// Inside parentheses either an expression or a type may appear
    /// (conversions, `(*T)(x)`). Types that cannot start expressions are
    /// routed to the type parser.
    fn parse_expr_or_type(&mut self) -> Result<ExprId> {
        self.parse_expr()
    }

    fn parse_index_or_slice(&mut self, x: ExprId) -> Result<ExprId> {
        let lbrack = self.expect(Token::Lbrack)?;
        self.expr_lev += 1;

        // Slice form with absent low bound.
        if self.at(Token::Colon) {
            let result = self.parse_slice_rest(x, lbrack, None);
            self.expr_lev -= 1;
            return result;
        }

        let first = self.parse_expr()?;
        match self.tok() {
            Token::Colon => {
                let result = self.parse_slice_rest(x, lbrack, Some(first));
                self.expr_lev -= 1;
                result
            }
            Token::Comma => {
                let mut indices: ExprList = smallvec![first];
                while self.at(Token::Comma) {
                    self.next();
                    if self.at(Token::Rbrack) {
                        break;
                    }
                    indices.push(self.parse_expr()?);
                }
                self.expr_lev -= 1;
                let rbrack = self.expect(Token::Rbrack)?;
                Ok(self.arena.alloc_expr(Expr::IndexList {
                    x,
                    lbrack,
                    indices,
                    rbrack,
                }))
            }
            _ => {
                self.expr_lev -= 1;
                let rbrack = self.expect(Token::Rbrack)?;
                Ok(self.arena.alloc_expr(Expr::Index {
                    x,
                    lbrack,
                    index: first,
                    rbrack,
                }))
            }
        }
    }

    fn parse_slice_rest(
        &mut self,
        x: ExprId,
        lbrack: Pos,
        low: Option<ExprId>,
    ) -> Result<ExprId> {
        self.expect(Token::Colon)?;
        let high = if !self.at(Token::Colon) && !self.at(Token::Rbrack) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let (slice3, max) = if self.at(Token::Colon) {
            self.next();
            (true, Some(self.parse_expr()?))
        } else {
            (false, None)
        };
        let rbrack = self.expect(Token::Rbrack)?;
        Ok(self.arena.alloc_expr(Expr::Slice {
            x,
            lbrack,
            low,
            high,
            max,
            slice3,
            rbrack,
        }))
    }

    fn parse_call(&mut self, fun: ExprId) -> Result<ExprId> {
        let call = self.parse_call_inner(fun)?;
        Ok(self.arena.alloc_expr(Expr::Call(call)))
    }

    fn parse_call_inner(&mut self, fun: ExprId) -> Result<CallId> {
        let lparen = self.expect(Token::Lparen)?;
        self.expr_lev += 1;
        let mut args: ExprList = smallvec![];
        let mut ellipsis = NO_POS;
        while !self.at(Token::Rparen) && !self.at(Token::Eof) {
            args.push(self.parse_expr()?);
            if self.at(Token::Ellipsis) {
                ellipsis = self.pos();
                self.next();
            }
            if self.at(Token::Comma) {
                self.next();
            } else {
                break;
            }
        }
        self.expr_lev -= 1;
        let rparen = self.expect(Token::Rparen)?;
        Ok(self.arena.calls.alloc(CallExpr {
            fun,
            lparen,
            args,
            ellipsis,
            rparen,
        }))
    }

    fn parse_composite_lit(&mut self, typ: Option<ExprId>) -> Result<ExprId> {
        let lbrace = self.expect(Token::Lbrace)?;
        self.expr_lev += 1;
        let mut elts: ExprList = smallvec![];
        while !self.at(Token::Rbrace) && !self.at(Token::Eof) {
            elts.push(self.parse_element()?);
            if self.at(Token::Comma) {
                self.next();
            } else {
                break;
            }
        }
        self.expr_lev -= 1;
        let rbrace = self.expect(Token::Rbrace)?;
        Ok(self.arena.alloc_expr(Expr::CompositeLit {
            typ,
            lbrace,
            elts,
            rbrace,
            incomplete: false,
        }))
    }

    fn parse_element(&mut self) -> Result<ExprId> {
        let key = self.parse_element_value()?;
        if self.at(Token::Colon) {
            let colon = self.pos();
            self.next();
            let value = self.parse_element_value()?;
            return Ok(self.arena.alloc_expr(Expr::KeyValue { key, colon, value }));
        }
        Ok(key)
    }

    fn parse_element_value(&mut self) -> Result<ExprId> {
        if self.at(Token::Lbrace) {
            return self.parse_composite_lit(None);
        }
        self.parse_expr()
    }

    // --- Statements ---

    fn parse_block(&mut self) -> Result<BlockId> {
        let lbrace = self.expect(Token::Lbrace)?;
        let list = self.parse_stmt_list()?;
        let rbrace = self.expect(Token::Rbrace)?;
        Ok(self.arena.blocks.alloc(BlockStmt {
            lbrace,
            list,
            rbrace,
        }))
    }

    fn parse_stmt_list(&mut self) -> Result<Vec<StmtId>> {
        let mut list = Vec::new();
        while !matches!(
            self.tok(),
            Token::Rbrace | Token::Case | Token::Default | Token::Eof
        ) {
            list.push(self.parse_stmt()?);
        }
        Ok(list)
    }

    fn parse_stmt(&mut self) -> Result<StmtId> {
        match self.tok() {
            Token::Const | Token::Type | Token::Var => {
                let mut ignored = Vec::new();
                let decl = self.parse_gen_decl(&mut ignored)?;
                Ok(self.arena.stmts.alloc(Stmt::Decl(decl)))
            }
            Token::Go => {
                let go_pos = self.pos();
                self.next();
                let call = self.parse_call_stmt_target()?;
                self.expect_semi()?;
                Ok(self.arena.stmts.alloc(Stmt::Go { go_pos, call }))
            }
            Token::Defer => {
                let defer_pos = self.pos();
                self.next();
                let call = self.parse_call_stmt_target()?;
                self.expect_semi()?;
                Ok(self.arena.stmts.alloc(Stmt::Defer { defer_pos, call }))
            }
            Token::Return => {
                let return_pos = self.pos();
                self.next();
                let results = if !matches!(
                    self.tok(),
                    Token::Semicolon | Token::Rbrace | Token::Case | Token::Default | Token::Eof
                ) {
                    self.parse_expr_list()?
                } else {
                    smallvec![]
                };
                self.expect_semi()?;
                Ok(self.arena.stmts.alloc(Stmt::Return {
                    return_pos,
                    results,
                }))
            }
            Token::Break | Token::Continue | Token::Goto | Token::Fallthrough => {
                let tok = self.tok();
                let tok_pos = self.pos();
                self.next();
                let label = if tok != Token::Fallthrough && self.at(Token::Ident) {
                    Some(self.parse_ident()?)
                } else {
                    None
                };
                self.expect_semi()?;
                Ok(self.arena.stmts.alloc(Stmt::Branch { tok_pos, tok, label }))
            }
            Token::Lbrace => {
                let block = self.parse_block()?;
                self.expect_semi()?;
                Ok(self.arena.stmts.alloc(Stmt::Block(block)))
            }
            Token::If => self.parse_if_stmt(),
            Token::Switch => self.parse_switch_stmt(),
            Token::Select => self.parse_select_stmt(),
            Token::For => self.parse_for_stmt(),
            Token::Semicolon => {
                let semicolon = self.pos();
                let implicit = self.lit() == "\n";
                self.next();
                Ok(self.arena.stmts.alloc(Stmt::Empty {
                    semicolon,
                    implicit,
                }))
            }
            _ => {
                let simple = self.parse_simple_stmt(false, true)?;
                let Simple::Stmt(stmt) = simple else {
                    return Err(self.error("range clause outside for statement"));
                };
                // A labeled statement owns its trailing statement; every
                // other simple statement ends at a terminator.
                if !matches!(self.arena.stmts[stmt], Stmt::Labeled { .. }) {
                    self.expect_semi()?;
                }
                Ok(stmt)
            }
        }
    }

    fn parse_call_stmt_target(&mut self) -> Result<CallId> {
        let x = self.parse_expr()?;
        match &self.arena.exprs[x] {
            Expr::Call(c) => Ok(*c),
            _ => Err(self.error("expected function call")),
        }
    }

    fn parse_simple_stmt(&mut self, range_ok: bool, allow_label: bool) -> Result<Simple> {
        let lhs = self.parse_expr_list()?;

        let tok = self.tok();
        if tok.is_assign_op() {
            let tok_pos = self.pos();
            self.next();
            if range_ok && self.at(Token::Range) && matches!(tok, Token::Assign | Token::Define) {
                self.next();
                let x = self.parse_expr()?;
                let mut it = lhs.into_iter();
                return Ok(Simple::Range {
                    key: it.next(),
                    value: it.next(),
                    tok_pos,
                    tok,
                    x,
                });
            }
            let rhs = self.parse_expr_list()?;
            return Ok(Simple::Stmt(self.arena.stmts.alloc(Stmt::Assign {
                lhs,
                tok_pos,
                tok,
                rhs,
            })));
        }

        if lhs.len() != 1 {
            return Err(self.error("expected assignment after expression list"));
        }
        let x = lhs[0];

        match self.tok() {
            Token::Arrow => {
                let arrow = self.pos();
                self.next();
                let value = self.parse_expr()?;
                Ok(Simple::Stmt(self.arena.stmts.alloc(Stmt::Send {
                    chan: x,
                    arrow,
                    value,
                })))
            }
            Token::Inc | Token::Dec => {
                let tok = self.tok();
                let tok_pos = self.pos();
                self.next();
                Ok(Simple::Stmt(
                    self.arena.stmts.alloc(Stmt::IncDec { x, tok_pos, tok }),
                ))
            }
            Token::Colon if allow_label && matches!(&self.arena.exprs[x], Expr::Ident(_)) => {
                let label = match &self.arena.exprs[x] {
                    Expr::Ident(id) => *id,
                    _ => unreachable!("guarded by the match arm"),
                };
                let colon = self.pos();
                self.next();
                let stmt = self.parse_stmt()?;
                Ok(Simple::Stmt(self.arena.stmts.alloc(Stmt::Labeled {
                    label,
                    colon,
                    stmt,
                })))
            }
            _ => Ok(Simple::Stmt(self.arena.stmts.alloc(Stmt::Expr(x)))),
        }
    }

    fn parse_if_stmt(&mut self) -> Result<StmtId> {
        let if_pos = self.expect(Token::If)?;
        let (init, cond) = self.parse_if_header()?;
        let body = self.parse_block()?;
        let else_stmt = if self.at(Token::Else) {
            self.next();
            let stmt = match self.tok() {
                Token::If => self.parse_if_stmt()?,
                Token::Lbrace => {
                    let block = self.parse_block()?;
                    self.expect_semi()?;
                    self.arena.stmts.alloc(Stmt::Block(block))
                }
                _ => return Err(self.error("expected if statement or block after else")),
            };
            Some(stmt)
        } else {
            self.expect_semi()?;
            None
        };
        Ok(self.arena.stmts.alloc(Stmt::If {
            if_pos,
            init,
            cond,
            body,
            else_stmt,
        }))
    }

    fn parse_if_header(&mut self) -> Result<(Option<StmtId>, ExprId)> {
        let prev = self.expr_lev;
        self.expr_lev = -1;
        let first = self.parse_simple_stmt(false, false)?;
        let Simple::Stmt(first) = first else {
            self.expr_lev = prev;
            return Err(self.error("range clause in if header"));
        };

        let (init, cond) = if self.at(Token::Semicolon) {
            self.next();
            let second = self.parse_simple_stmt(false, false)?;
            let Simple::Stmt(second) = second else {
                self.expr_lev = prev;
                return Err(self.error("range clause in if header"));
            };
            (Some(first), self.stmt_as_expr(second)?)
        } else {
            (None, self.stmt_as_expr(first)?)
        };
        self.expr_lev = prev;
        Ok((init, cond))
    }

    fn stmt_as_expr(&mut self, stmt: StmtId) -> Result<ExprId> {
        match &self.arena.stmts[stmt] {
            Stmt::Expr(x) => Ok(*x),
            _ => Err(self.error("expected expression")),
        }
    }

    fn parse_switch_stmt(&mut self) -> Result<StmtId> {
        let switch_pos = self.expect(Token::Switch)?;

        let mut init: Option<StmtId> = None;
        let mut guard: Option<StmtId> = None;
        if !self.at(Token::Lbrace) {
            let prev = self.expr_lev;
            self.expr_lev = -1;
            if !self.at(Token::Semicolon) {
                match self.parse_simple_stmt(false, false)? {
                    Simple::Stmt(s) => guard = Some(s),
                    Simple::Range { .. } => {
                        self.expr_lev = prev;
                        return Err(self.error("range clause in switch header"));
                    }
                }
            }
            if self.at(Token::Semicolon) {
                self.next();
                init = guard.take();
                if !self.at(Token::Lbrace) {
                    match self.parse_simple_stmt(false, false)? {
                        Simple::Stmt(s) => guard = Some(s),
                        Simple::Range { .. } => {
                            self.expr_lev = prev;
                            return Err(self.error("range clause in switch header"));
                        }
                    }
                }
            }
            self.expr_lev = prev;
        }

        let type_switch = guard.map_or(false, |g| self.is_type_switch_guard(g));
        let lbrace = self.expect(Token::Lbrace)?;
        let mut clauses = Vec::new();
        while self.at(Token::Case) || self.at(Token::Default) {
            clauses.push(self.parse_case_clause(type_switch)?);
        }
        let rbrace = self.expect(Token::Rbrace)?;
        self.expect_semi()?;
        let body = self.arena.blocks.alloc(BlockStmt {
            lbrace,
            list: clauses,
            rbrace,
        });

        if type_switch {
            let Some(assign) = guard else {
                return Err(self.error("missing type switch guard"));
            };
            Ok(self.arena.stmts.alloc(Stmt::TypeSwitch {
                switch_pos,
                init,
                assign,
                body,
            }))
        } else {
            let tag = match guard {
                Some(g) => Some(self.stmt_as_expr(g)?),
                None => None,
            };
            Ok(self.arena.stmts.alloc(Stmt::Switch {
                switch_pos,
                init,
                tag,
                body,
            }))
        }
    }

    /// `x.(type)` or `i := x.(type)`.
    fn is_type_switch_guard(&self, stmt: StmtId) -> bool {
        let assert_with_no_type = |x: ExprId| {
            matches!(self.arena.exprs[x], Expr::TypeAssert { typ: None, .. })
        };
        match &self.arena.stmts[stmt] {
            Stmt::Expr(x) => assert_with_no_type(*x),
            Stmt::Assign { tok, rhs, .. } => {
                *tok == Token::Define && rhs.len() == 1 && assert_with_no_type(rhs[0])
            }
            _ => false,
        }
    }

    fn parse_case_clause(&mut self, type_switch: bool) -> Result<StmtId> {
        let case_pos = self.pos();
        let list: ExprList = if self.at(Token::Case) {
            self.next();
            if type_switch {
                let mut list: ExprList = smallvec![self.parse_type()?];
                while self.at(Token::Comma) {
                    self.next();
                    list.push(self.parse_type()?);
                }
                list
            } else {
                self.parse_expr_list()?
            }
        } else {
            self.expect(Token::Default)?;
            smallvec![]
        };
        let colon = self.expect(Token::Colon)?;
        let body = self.parse_stmt_list()?;
        Ok(self.arena.stmts.alloc(Stmt::CaseClause {
            case_pos,
            list,
            colon,
            body,
        }))
    }

    fn parse_select_stmt(&mut self) -> Result<StmtId> {
        let select_pos = self.expect(Token::Select)?;
        let lbrace = self.expect(Token::Lbrace)?;
        let mut clauses = Vec::new();
        while self.at(Token::Case) || self.at(Token::Default) {
            let case_pos = self.pos();
            let comm = if self.at(Token::Case) {
                self.next();
                match self.parse_simple_stmt(false, false)? {
                    Simple::Stmt(s) => Some(s),
                    Simple::Range { .. } => {
                        return Err(self.error("range clause in select case"))
                    }
                }
            } else {
                self.expect(Token::Default)?;
                None
            };
            let colon = self.expect(Token::Colon)?;
            let body = self.parse_stmt_list()?;
            clauses.push(self.arena.stmts.alloc(Stmt::CommClause {
                case_pos,
                comm,
                colon,
                body,
            }));
        }
        let rbrace = self.expect(Token::Rbrace)?;
        self.expect_semi()?;
        let body = self.arena.blocks.alloc(BlockStmt {
            lbrace,
            list: clauses,
            rbrace,
        });
        Ok(self.arena.stmts.alloc(Stmt::Select { select_pos, body }))
    }

    fn parse_for_stmt(&mut self) -> Result<StmtId> {
        let for_pos = self.expect(Token::For)?;

        let mut init: Option<StmtId> = None;
        let mut cond: Option<ExprId> = None;
        let mut post: Option<StmtId> = None;
        let mut range: Option<Simple> = None;

        if !self.at(Token::Lbrace) {
            let prev = self.expr_lev;
            self.expr_lev = -1;

            if self.at(Token::Range) {
                // `for range x`.
                self.next();
                let x = self.parse_expr()?;
                range = Some(Simple::Range {
                    key: None,
                    value: None,
                    tok_pos: NO_POS,
                    tok: Token::Illegal,
                    x,
                });
            } else {
                let mut first: Option<Simple> = None;
                if !self.at(Token::Semicolon) {
                    first = Some(self.parse_simple_stmt(true, false)?);
                }
                match first {
                    Some(Simple::Range {
                        key,
                        value,
                        tok_pos,
                        tok,
                        x,
                    }) => {
                        range = Some(Simple::Range {
                            key,
                            value,
                            tok_pos,
                            tok,
                            x,
                        });
                    }
                    other => {
                        if self.at(Token::Semicolon) {
                            self.next();
                            init = match other {
                                Some(Simple::Stmt(s)) => Some(s),
                                _ => None,
                            };
                            if !self.at(Token::Semicolon) {
                                cond = Some(self.parse_expr()?);
                            }
                            self.expect(Token::Semicolon)?;
                            if !self.at(Token::Lbrace) {
                                match self.parse_simple_stmt(false, false)? {
                                    Simple::Stmt(s) => post = Some(s),
                                    Simple::Range { .. } => {
                                        self.expr_lev = prev;
                                        return Err(
                                            self.error("range clause in for post statement")
                                        );
                                    }
                                }
                            }
                        } else if let Some(Simple::Stmt(s)) = other {
                            cond = Some(self.stmt_as_expr(s)?);
                        }
                    }
                }
            }
            self.expr_lev = prev;
        }

        let body = self.parse_block()?;
        self.expect_semi()?;

        if let Some(Simple::Range {
            key,
            value,
            tok_pos,
            tok,
            x,
        }) = range
        {
            return Ok(self.arena.stmts.alloc(Stmt::Range {
                for_pos,
                key,
                value,
                tok_pos,
                tok,
                x,
                body,
            }));
        }
        Ok(self.arena.stmts.alloc(Stmt::For {
            for_pos,
            init,
            cond,
            post,
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::FileSet;

    fn parse(src: &str) -> (AstArena, File) {
        let mut fset = FileSet::new();
        let mut arena = AstArena::new();
        let file = parse_file(&mut fset, &mut arena, "test.go", src)
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        (arena, file)
    }

    #[test]
    fn parses_minimal_file() {
        let (arena, file) = parse("package p\n");
        assert_eq!(arena.ident_name(file.name), "p");
        assert!(file.decls.is_empty());
    }

    #[test]
    fn parses_imports_and_decls() {
        let (arena, file) = parse(
            r#"package main

import (
	"fmt"
	_ "net/http"
)

const A = 1

var x, y int

type T struct {
	F int
}

func main() {
	fmt.Println(x)
}
"#,
        );
        assert_eq!(file.decls.len(), 5);
        assert_eq!(file.imports.len(), 2);
        let path = &arena.basic_lits[arena.import_specs[file.imports[0]].path];
        assert_eq!(path.value, "\"fmt\"");
    }

    #[test]
    fn parses_statements() {
        let (_, file) = parse(
            r#"package p

func f(x int) int {
	if x < 0 {
		return -x
	}
	for i := 0; i < 10; i++ {
		if i == 5 {
			break
		}
		continue
	}
	for k, v := range m {
		_ = k
		_ = v
	}
	switch x {
	case 0, 1:
		x++
	default:
		x = 3
	}
	switch v := any(x).(type) {
	case int:
		_ = v
	}
	select {
	case ch <- x:
		return x
	default:
		return 0
	}
}
"#,
        );
        assert_eq!(file.decls.len(), 1);
    }

    #[test]
    fn parses_expressions() {
        let (_, file) = parse(
            r#"package p

func f(a, b, c int, ch chan<- int) {
	_ = a + b*c - (a << 2)
	_ = a == b || a < c && b <= c
	_ = &a
	_ = <-done
	_ = []int{1, 2, 3}[0]
	_ = s[1:]
	_ = s[0:2:3]
	_ = map[string]int{"a": 1}
	_ = f(a, b, c)
	_ = g(xs...)
	_ = func(n int) int { return n }(3)
	_ = x.(io.Reader)
	_ = *p
	_ = T{F: 1}
}
"#,
        );
        assert_eq!(file.decls.len(), 1);
    }

    #[test]
    fn attaches_doc_comments() {
        let (arena, file) = parse(
            "package p\n\n// F is documented.\n// Second line.\nfunc F() {}\n",
        );
        let Decl::Func(f) = &arena.decls[file.decls[0]] else {
            panic!("expected func decl");
        };
        let doc = f.doc.expect("doc comment attached");
        assert_eq!(arena.comment_groups[doc].list.len(), 2);
        assert_eq!(file.comments.len(), 1);
    }

    #[test]
    fn label_and_goto() {
        let (_, file) = parse(
            "package p\n\nfunc f() {\nloop:\n\tfor {\n\t\tgoto loop\n\t}\n}\n",
        );
        assert_eq!(file.decls.len(), 1);
    }

    #[test]
    fn generic_declarations() {
        let (arena, file) = parse(
            r#"package p

type Pair[K comparable, V any] struct {
	Key K
	Val V
}

func Map[T, U any](xs []T, f func(T) U) []U {
	return nil
}

var _ = Pair[string, int]{Key: "a", Val: 1}
"#,
        );
        assert_eq!(file.decls.len(), 3);
        let Decl::Gen(g) = &arena.decls[file.decls[0]] else {
            panic!("expected type decl");
        };
        let Spec::Type(ts) = &arena.specs[g.specs[0]] else {
            panic!("expected type spec");
        };
        assert!(ts.type_params.is_some());
    }

    #[test]
    fn reports_error_position() {
        let mut fset = FileSet::new();
        let mut arena = AstArena::new();
        let err = parse_file(&mut fset, &mut arena, "bad.go", "package p\nfunc (")
            .unwrap_err();
        assert!(err.to_string().starts_with("bad.go:2:"));
    }
}
