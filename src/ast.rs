//! The native syntax tree: arena-allocated, grammar-faithful node shapes.
//!
//! All nodes live in typed arenas owned by an [`AstArena`]; children are
//! referenced through typed indices. Two parents holding the same index hold
//! the *same* node — index identity is the reference identity the wire
//! codec's RefId mechanism preserves across encode/decode.
//!
//! Node shapes mirror the source grammar one-to-one, including the position
//! of every significant token (`lbrace`, `tok_pos`, ...), because the wire
//! format records those positions individually. When position tracking is
//! off every position field holds [`NO_POS`].

use std::collections::BTreeMap;

use la_arena::{Arena, Idx};
use smallvec::SmallVec;

use crate::position::{Pos, NO_POS};
use crate::token::{ChanDir, Token};

pub type IdentId = Idx<Ident>;
pub type BasicLitId = Idx<BasicLit>;
pub type ExprId = Idx<Expr>;
pub type StmtId = Idx<Stmt>;
pub type SpecId = Idx<Spec>;
pub type DeclId = Idx<Decl>;
pub type FieldId = Idx<Field>;
pub type FieldListId = Idx<FieldList>;
pub type FuncTypeId = Idx<FuncType>;
pub type BlockId = Idx<BlockStmt>;
pub type CallId = Idx<CallExpr>;
pub type CommentId = Idx<Comment>;
pub type CommentGroupId = Idx<CommentGroup>;
pub type ImportId = Idx<ImportSpec>;

/// Identifier lists are short nearly everywhere (field names, spec names).
pub type IdentList = SmallVec<[IdentId; 2]>;
/// Expression lists (call args, assignment sides, return values).
pub type ExprList = SmallVec<[ExprId; 2]>;

// =============================================================================
// Leaf and structural nodes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name_pos: Pos,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    pub value_pos: Pos,
    /// Literal class: `Int`, `Float`, `Imag`, `Char` or `String`.
    pub kind: Token,
    /// Literal text exactly as written, quotes and prefixes included.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Position of the leading `/`.
    pub slash: Pos,
    /// Comment text including the `//` or `/* */` markers.
    pub text: String,
}

/// A run of comments with no blank line or other token between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub list: Vec<CommentId>,
}

/// A named (or anonymous) entry of a struct, interface, parameter or result
/// list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub doc: Option<CommentGroupId>,
    pub names: IdentList,
    pub typ: Option<ExprId>,
    pub tag: Option<BasicLitId>,
    pub comment: Option<CommentGroupId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList {
    pub opening: Pos,
    pub list: Vec<FieldId>,
    pub closing: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncType {
    /// Position of the `func` keyword; `NO_POS` inside method signatures.
    pub func_pos: Pos,
    pub type_params: Option<FieldListId>,
    pub params: Option<FieldListId>,
    pub results: Option<FieldListId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStmt {
    pub lbrace: Pos,
    pub list: Vec<StmtId>,
    pub rbrace: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub fun: ExprId,
    pub lparen: Pos,
    pub args: ExprList,
    /// Position of `...` after the final argument, `NO_POS` if absent.
    pub ellipsis: Pos,
    pub rparen: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub doc: Option<CommentGroupId>,
    pub name: Option<IdentId>,
    pub path: BasicLitId,
    pub comment: Option<CommentGroupId>,
    /// End of the spec, when it differs from the path literal's end.
    pub end_pos: Pos,
}

// =============================================================================
// Expressions (including type expressions)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Bad {
        from: Pos,
        to: Pos,
    },
    Ident(IdentId),
    Ellipsis {
        pos: Pos,
        elt: Option<ExprId>,
    },
    BasicLit(BasicLitId),
    FuncLit {
        typ: FuncTypeId,
        body: BlockId,
    },
    CompositeLit {
        typ: Option<ExprId>,
        lbrace: Pos,
        elts: ExprList,
        rbrace: Pos,
        incomplete: bool,
    },
    Paren {
        lparen: Pos,
        x: ExprId,
        rparen: Pos,
    },
    Selector {
        x: ExprId,
        sel: IdentId,
    },
    Index {
        x: ExprId,
        lbrack: Pos,
        index: ExprId,
        rbrack: Pos,
    },
    IndexList {
        x: ExprId,
        lbrack: Pos,
        indices: ExprList,
        rbrack: Pos,
    },
    Slice {
        x: ExprId,
        lbrack: Pos,
        low: Option<ExprId>,
        high: Option<ExprId>,
        max: Option<ExprId>,
        slice3: bool,
        rbrack: Pos,
    },
    TypeAssert {
        x: ExprId,
        lparen: Pos,
        /// `None` encodes the `x.(type)` form inside a type switch header.
        typ: Option<ExprId>,
        rparen: Pos,
    },
    Call(CallId),
    Star {
        star: Pos,
        x: ExprId,
    },
    Unary {
        op_pos: Pos,
        op: Token,
        x: ExprId,
    },
    Binary {
        x: ExprId,
        op_pos: Pos,
        op: Token,
        y: ExprId,
    },
    KeyValue {
        key: ExprId,
        colon: Pos,
        value: ExprId,
    },
    ArrayType {
        lbrack: Pos,
        len: Option<ExprId>,
        elt: ExprId,
    },
    StructType {
        struct_pos: Pos,
        fields: FieldListId,
        incomplete: bool,
    },
    FuncType(FuncTypeId),
    InterfaceType {
        interface_pos: Pos,
        methods: FieldListId,
        incomplete: bool,
    },
    MapType {
        map_pos: Pos,
        key: ExprId,
        value: ExprId,
    },
    ChanType {
        begin: Pos,
        arrow: Pos,
        dir: ChanDir,
        value: ExprId,
    },
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Bad {
        from: Pos,
        to: Pos,
    },
    Decl(DeclId),
    Empty {
        semicolon: Pos,
        implicit: bool,
    },
    Labeled {
        label: IdentId,
        colon: Pos,
        stmt: StmtId,
    },
    Expr(ExprId),
    Send {
        chan: ExprId,
        arrow: Pos,
        value: ExprId,
    },
    IncDec {
        x: ExprId,
        tok_pos: Pos,
        tok: Token,
    },
    Assign {
        lhs: ExprList,
        tok_pos: Pos,
        tok: Token,
        rhs: ExprList,
    },
    Go {
        go_pos: Pos,
        call: CallId,
    },
    Defer {
        defer_pos: Pos,
        call: CallId,
    },
    Return {
        return_pos: Pos,
        results: ExprList,
    },
    Branch {
        tok_pos: Pos,
        tok: Token,
        label: Option<IdentId>,
    },
    Block(BlockId),
    If {
        if_pos: Pos,
        init: Option<StmtId>,
        cond: ExprId,
        body: BlockId,
        else_stmt: Option<StmtId>,
    },
    CaseClause {
        case_pos: Pos,
        /// Match expressions; empty for `default`.
        list: ExprList,
        colon: Pos,
        body: Vec<StmtId>,
    },
    Switch {
        switch_pos: Pos,
        init: Option<StmtId>,
        tag: Option<ExprId>,
        body: BlockId,
    },
    TypeSwitch {
        switch_pos: Pos,
        init: Option<StmtId>,
        /// The `i := x.(type)` or `x.(type)` header statement.
        assign: StmtId,
        body: BlockId,
    },
    CommClause {
        case_pos: Pos,
        /// Send or receive statement; `None` for `default`.
        comm: Option<StmtId>,
        colon: Pos,
        body: Vec<StmtId>,
    },
    Select {
        select_pos: Pos,
        body: BlockId,
    },
    For {
        for_pos: Pos,
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
        body: BlockId,
    },
    Range {
        for_pos: Pos,
        key: Option<ExprId>,
        value: Option<ExprId>,
        tok_pos: Pos,
        /// `Define` or `Assign`; `Illegal` for the bare `for range x` form.
        tok: Token,
        x: ExprId,
        body: BlockId,
    },
}

// =============================================================================
// Specifications and declarations
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    pub doc: Option<CommentGroupId>,
    pub names: IdentList,
    pub typ: Option<ExprId>,
    pub values: ExprList,
    pub comment: Option<CommentGroupId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub doc: Option<CommentGroupId>,
    pub name: IdentId,
    pub type_params: Option<FieldListId>,
    /// Position of `=` for alias declarations, `NO_POS` otherwise.
    pub assign: Pos,
    pub typ: ExprId,
    pub comment: Option<CommentGroupId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spec {
    Import(ImportId),
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenDecl {
    pub doc: Option<CommentGroupId>,
    pub tok_pos: Pos,
    /// `Import`, `Const`, `Type` or `Var`.
    pub tok: Token,
    /// `NO_POS` unless the declaration is parenthesized.
    pub lparen: Pos,
    pub specs: Vec<SpecId>,
    pub rparen: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub doc: Option<CommentGroupId>,
    pub recv: Option<FieldListId>,
    pub name: IdentId,
    pub typ: FuncTypeId,
    pub body: Option<BlockId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Bad { from: Pos, to: Pos },
    Gen(GenDecl),
    Func(FuncDecl),
}

// =============================================================================
// Roots
// =============================================================================

/// A parsed source file. The arena that owns its nodes is kept separately so
/// several files (a package) can share one arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub doc: Option<CommentGroupId>,
    pub package_pos: Pos,
    pub name: IdentId,
    pub decls: Vec<DeclId>,
    /// Flattened view of every import spec, sharing the spec nodes that
    /// appear inside `decls`.
    pub imports: Vec<ImportId>,
    pub unresolved: Vec<IdentId>,
    /// Every comment group of the file, in source order.
    pub comments: Vec<CommentGroupId>,
}

/// A set of files belonging to one package, keyed by filename. Files are
/// ordered by name so walks over a package are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub files: BTreeMap<String, File>,
}

// =============================================================================
// Arena
// =============================================================================

/// Central owner of all node memory for one or more files.
#[derive(Debug, Default)]
pub struct AstArena {
    pub idents: Arena<Ident>,
    pub basic_lits: Arena<BasicLit>,
    pub exprs: Arena<Expr>,
    pub stmts: Arena<Stmt>,
    pub specs: Arena<Spec>,
    pub decls: Arena<Decl>,
    pub fields: Arena<Field>,
    pub field_lists: Arena<FieldList>,
    pub func_types: Arena<FuncType>,
    pub blocks: Arena<BlockStmt>,
    pub calls: Arena<CallExpr>,
    pub comments: Arena<Comment>,
    pub comment_groups: Arena<CommentGroup>,
    pub import_specs: Arena<ImportSpec>,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_ident(&mut self, name_pos: Pos, name: impl Into<String>) -> IdentId {
        self.idents.alloc(Ident {
            name_pos,
            name: name.into(),
        })
    }

    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.alloc(expr)
    }

    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.stmts.alloc(stmt)
    }

    #[inline]
    pub fn ident_expr(&mut self, id: IdentId) -> ExprId {
        self.exprs.alloc(Expr::Ident(id))
    }

    pub fn ident_name(&self, id: IdentId) -> &str {
        &self.idents[id].name
    }
}

// =============================================================================
// Node extents
// =============================================================================

#[inline]
fn after(p: Pos, n: usize) -> Pos {
    if p == NO_POS {
        NO_POS
    } else {
        p.saturating_add(n as u32)
    }
}

fn tok_len(tok: Token) -> usize {
    tok.as_str().len()
}

/// Start/end queries, mirroring the source grammar's notion of node extent:
/// `end` points just past the final token. With positions disabled both ends
/// are `NO_POS`, and callers must treat layout as unknown.
impl AstArena {
    pub fn ident_pos(&self, id: IdentId) -> Pos {
        self.idents[id].name_pos
    }

    pub fn ident_end(&self, id: IdentId) -> Pos {
        let n = &self.idents[id];
        after(n.name_pos, n.name.len())
    }

    pub fn lit_pos(&self, id: BasicLitId) -> Pos {
        self.basic_lits[id].value_pos
    }

    pub fn lit_end(&self, id: BasicLitId) -> Pos {
        let n = &self.basic_lits[id];
        after(n.value_pos, n.value.len())
    }

    pub fn comment_pos(&self, id: CommentId) -> Pos {
        self.comments[id].slash
    }

    pub fn comment_end(&self, id: CommentId) -> Pos {
        let n = &self.comments[id];
        after(n.slash, n.text.len())
    }

    pub fn comment_group_pos(&self, id: CommentGroupId) -> Pos {
        match self.comment_groups[id].list.first() {
            Some(&c) => self.comment_pos(c),
            None => NO_POS,
        }
    }

    pub fn comment_group_end(&self, id: CommentGroupId) -> Pos {
        match self.comment_groups[id].list.last() {
            Some(&c) => self.comment_end(c),
            None => NO_POS,
        }
    }

    pub fn field_pos(&self, id: FieldId) -> Pos {
        let f = &self.fields[id];
        if let Some(&name) = f.names.first() {
            return self.ident_pos(name);
        }
        f.typ.map_or(NO_POS, |t| self.expr_pos(t))
    }

    pub fn field_end(&self, id: FieldId) -> Pos {
        let f = &self.fields[id];
        if let Some(tag) = f.tag {
            return self.lit_end(tag);
        }
        if let Some(t) = f.typ {
            return self.expr_end(t);
        }
        f.names.last().map_or(NO_POS, |&n| self.ident_end(n))
    }

    pub fn field_list_pos(&self, id: FieldListId) -> Pos {
        let fl = &self.field_lists[id];
        if fl.opening != NO_POS {
            return fl.opening;
        }
        fl.list.first().map_or(NO_POS, |&f| self.field_pos(f))
    }

    pub fn field_list_end(&self, id: FieldListId) -> Pos {
        let fl = &self.field_lists[id];
        if fl.closing != NO_POS {
            return after(fl.closing, 1);
        }
        fl.list.last().map_or(NO_POS, |&f| self.field_end(f))
    }

    pub fn func_type_pos(&self, id: FuncTypeId) -> Pos {
        let ft = &self.func_types[id];
        if ft.func_pos != NO_POS {
            return ft.func_pos;
        }
        ft.params.map_or(NO_POS, |p| self.field_list_pos(p))
    }

    pub fn func_type_end(&self, id: FuncTypeId) -> Pos {
        let ft = &self.func_types[id];
        if let Some(r) = ft.results {
            return self.field_list_end(r);
        }
        ft.params.map_or(NO_POS, |p| self.field_list_end(p))
    }

    pub fn block_pos(&self, id: BlockId) -> Pos {
        self.blocks[id].lbrace
    }

    pub fn block_end(&self, id: BlockId) -> Pos {
        after(self.blocks[id].rbrace, 1)
    }

    pub fn call_pos(&self, id: CallId) -> Pos {
        self.expr_pos(self.calls[id].fun)
    }

    pub fn call_end(&self, id: CallId) -> Pos {
        after(self.calls[id].rparen, 1)
    }

    pub fn import_pos(&self, id: ImportId) -> Pos {
        let s = &self.import_specs[id];
        match s.name {
            Some(name) => self.ident_pos(name),
            None => self.lit_pos(s.path),
        }
    }

    pub fn import_end(&self, id: ImportId) -> Pos {
        let s = &self.import_specs[id];
        if s.end_pos != NO_POS {
            return s.end_pos;
        }
        self.lit_end(s.path)
    }

    pub fn expr_pos(&self, id: ExprId) -> Pos {
        match &self.exprs[id] {
            Expr::Bad { from, .. } => *from,
            Expr::Ident(n) => self.ident_pos(*n),
            Expr::Ellipsis { pos, .. } => *pos,
            Expr::BasicLit(n) => self.lit_pos(*n),
            Expr::FuncLit { typ, .. } => self.func_type_pos(*typ),
            Expr::CompositeLit { typ, lbrace, .. } => match typ {
                Some(t) => self.expr_pos(*t),
                None => *lbrace,
            },
            Expr::Paren { lparen, .. } => *lparen,
            Expr::Selector { x, .. } => self.expr_pos(*x),
            Expr::Index { x, .. } => self.expr_pos(*x),
            Expr::IndexList { x, .. } => self.expr_pos(*x),
            Expr::Slice { x, .. } => self.expr_pos(*x),
            Expr::TypeAssert { x, .. } => self.expr_pos(*x),
            Expr::Call(c) => self.call_pos(*c),
            Expr::Star { star, .. } => *star,
            Expr::Unary { op_pos, .. } => *op_pos,
            Expr::Binary { x, .. } => self.expr_pos(*x),
            Expr::KeyValue { key, .. } => self.expr_pos(*key),
            Expr::ArrayType { lbrack, .. } => *lbrack,
            Expr::StructType { struct_pos, .. } => *struct_pos,
            Expr::FuncType(ft) => self.func_type_pos(*ft),
            Expr::InterfaceType { interface_pos, .. } => *interface_pos,
            Expr::MapType { map_pos, .. } => *map_pos,
            Expr::ChanType { begin, .. } => *begin,
        }
    }

    pub fn expr_end(&self, id: ExprId) -> Pos {
        match &self.exprs[id] {
            Expr::Bad { to, .. } => *to,
            Expr::Ident(n) => self.ident_end(*n),
            Expr::Ellipsis { pos, elt } => match elt {
                Some(e) => self.expr_end(*e),
                None => after(*pos, 3),
            },
            Expr::BasicLit(n) => self.lit_end(*n),
            Expr::FuncLit { body, .. } => self.block_end(*body),
            Expr::CompositeLit { rbrace, .. } => after(*rbrace, 1),
            Expr::Paren { rparen, .. } => after(*rparen, 1),
            Expr::Selector { sel, .. } => self.ident_end(*sel),
            Expr::Index { rbrack, .. } => after(*rbrack, 1),
            Expr::IndexList { rbrack, .. } => after(*rbrack, 1),
            Expr::Slice { rbrack, .. } => after(*rbrack, 1),
            Expr::TypeAssert { rparen, .. } => after(*rparen, 1),
            Expr::Call(c) => self.call_end(*c),
            Expr::Star { x, .. } => self.expr_end(*x),
            Expr::Unary { x, .. } => self.expr_end(*x),
            Expr::Binary { y, .. } => self.expr_end(*y),
            Expr::KeyValue { value, .. } => self.expr_end(*value),
            Expr::ArrayType { elt, .. } => self.expr_end(*elt),
            Expr::StructType { fields, .. } => self.field_list_end(*fields),
            Expr::FuncType(ft) => self.func_type_end(*ft),
            Expr::InterfaceType { methods, .. } => self.field_list_end(*methods),
            Expr::MapType { value, .. } => self.expr_end(*value),
            Expr::ChanType { value, .. } => self.expr_end(*value),
        }
    }

    pub fn stmt_pos(&self, id: StmtId) -> Pos {
        match &self.stmts[id] {
            Stmt::Bad { from, .. } => *from,
            Stmt::Decl(d) => self.decl_pos(*d),
            Stmt::Empty { semicolon, .. } => *semicolon,
            Stmt::Labeled { label, .. } => self.ident_pos(*label),
            Stmt::Expr(e) => self.expr_pos(*e),
            Stmt::Send { chan, .. } => self.expr_pos(*chan),
            Stmt::IncDec { x, .. } => self.expr_pos(*x),
            Stmt::Assign { lhs, tok_pos, .. } => {
                lhs.first().map_or(*tok_pos, |&e| self.expr_pos(e))
            }
            Stmt::Go { go_pos, .. } => *go_pos,
            Stmt::Defer { defer_pos, .. } => *defer_pos,
            Stmt::Return { return_pos, .. } => *return_pos,
            Stmt::Branch { tok_pos, .. } => *tok_pos,
            Stmt::Block(b) => self.block_pos(*b),
            Stmt::If { if_pos, .. } => *if_pos,
            Stmt::CaseClause { case_pos, .. } => *case_pos,
            Stmt::Switch { switch_pos, .. } => *switch_pos,
            Stmt::TypeSwitch { switch_pos, .. } => *switch_pos,
            Stmt::CommClause { case_pos, .. } => *case_pos,
            Stmt::Select { select_pos, .. } => *select_pos,
            Stmt::For { for_pos, .. } => *for_pos,
            Stmt::Range { for_pos, .. } => *for_pos,
        }
    }

    pub fn stmt_end(&self, id: StmtId) -> Pos {
        match &self.stmts[id] {
            Stmt::Bad { to, .. } => *to,
            Stmt::Decl(d) => self.decl_end(*d),
            Stmt::Empty {
                semicolon,
                implicit,
            } => {
                if *implicit {
                    *semicolon
                } else {
                    after(*semicolon, 1)
                }
            }
            Stmt::Labeled { stmt, .. } => self.stmt_end(*stmt),
            Stmt::Expr(e) => self.expr_end(*e),
            Stmt::Send { value, .. } => self.expr_end(*value),
            Stmt::IncDec { tok_pos, .. } => after(*tok_pos, 2),
            Stmt::Assign { rhs, tok_pos, tok, .. } => rhs
                .last()
                .map_or(after(*tok_pos, tok_len(*tok)), |&e| self.expr_end(e)),
            Stmt::Go { call, .. } => self.call_end(*call),
            Stmt::Defer { call, .. } => self.call_end(*call),
            Stmt::Return {
                return_pos,
                results,
            } => results
                .last()
                .map_or(after(*return_pos, 6), |&e| self.expr_end(e)),
            Stmt::Branch { tok_pos, tok, label } => match label {
                Some(l) => self.ident_end(*l),
                None => after(*tok_pos, tok_len(*tok)),
            },
            Stmt::Block(b) => self.block_end(*b),
            Stmt::If {
                body, else_stmt, ..
            } => match else_stmt {
                Some(e) => self.stmt_end(*e),
                None => self.block_end(*body),
            },
            Stmt::CaseClause { colon, body, .. } => {
                body.last().map_or(after(*colon, 1), |&s| self.stmt_end(s))
            }
            Stmt::Switch { body, .. } => self.block_end(*body),
            Stmt::TypeSwitch { body, .. } => self.block_end(*body),
            Stmt::CommClause { colon, body, .. } => {
                body.last().map_or(after(*colon, 1), |&s| self.stmt_end(s))
            }
            Stmt::Select { body, .. } => self.block_end(*body),
            Stmt::For { body, .. } => self.block_end(*body),
            Stmt::Range { body, .. } => self.block_end(*body),
        }
    }

    pub fn spec_pos(&self, id: SpecId) -> Pos {
        match &self.specs[id] {
            Spec::Import(i) => self.import_pos(*i),
            Spec::Value(v) => v.names.first().map_or(NO_POS, |&n| self.ident_pos(n)),
            Spec::Type(t) => self.ident_pos(t.name),
        }
    }

    pub fn spec_end(&self, id: SpecId) -> Pos {
        match &self.specs[id] {
            Spec::Import(i) => self.import_end(*i),
            Spec::Value(v) => {
                if let Some(&e) = v.values.last() {
                    return self.expr_end(e);
                }
                if let Some(t) = v.typ {
                    return self.expr_end(t);
                }
                v.names.last().map_or(NO_POS, |&n| self.ident_end(n))
            }
            Spec::Type(t) => self.expr_end(t.typ),
        }
    }

    pub fn decl_pos(&self, id: DeclId) -> Pos {
        match &self.decls[id] {
            Decl::Bad { from, .. } => *from,
            Decl::Gen(g) => g.tok_pos,
            Decl::Func(f) => self.func_type_pos(f.typ),
        }
    }

    pub fn decl_end(&self, id: DeclId) -> Pos {
        match &self.decls[id] {
            Decl::Bad { to, .. } => *to,
            Decl::Gen(g) => {
                if g.rparen != NO_POS {
                    return after(g.rparen, 1);
                }
                g.specs.last().map_or(after(g.tok_pos, tok_len(g.tok)), |&s| {
                    self.spec_end(s)
                })
            }
            Decl::Func(f) => match f.body {
                Some(b) => self.block_end(b),
                None => self.func_type_end(f.typ),
            },
        }
    }

    pub fn file_pos(&self, file: &File) -> Pos {
        file.package_pos
    }

    pub fn file_end(&self, file: &File) -> Pos {
        file.decls
            .last()
            .map_or_else(|| self.ident_end(file.name), |&d| self.decl_end(d))
    }
}
