//! Encoder: native tree → wire tree.
//!
//! A [`Marshaller`] is one encode session. It owns the reference tracker;
//! the position index is borrowed from whoever parsed the tree. Output is a
//! pure function of the tree and the options — the walk order alone decides
//! field and RefId order, so identical inputs encode byte-identically.

use std::collections::HashMap;

use crate::ast::{
    AstArena, BasicLitId, BlockId, CallId, CommentGroupId, CommentId, Decl, DeclId, Expr, ExprId,
    Field, FieldId, FieldListId, File, FuncTypeId, IdentId, ImportId, Package, Spec, SpecId, Stmt,
    StmtId,
};
use crate::kind::NodeKind;
use crate::position::{FileSet, Pos};
use crate::wire::*;
use crate::Options;

/// Identity of a native node inside one encode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RefKey {
    Ident(IdentId),
    Lit(BasicLitId),
    Expr(ExprId),
    Stmt(StmtId),
    Spec(SpecId),
    Decl(DeclId),
    Field(FieldId),
    FieldList(FieldListId),
    FuncType(FuncTypeId),
    Block(BlockId),
    Call(CallId),
    Comment(CommentId),
    CommentGroup(CommentGroupId),
    Import(ImportId),
}

/// Assigns monotonically increasing RefIds, one per distinct identity.
/// An identity keeps its id for the whole session; repeats re-emit the full
/// node content and only reuse the id.
#[derive(Debug, Default)]
struct RefTracker {
    next: u64,
    seen: HashMap<RefKey, u64>,
}

impl RefTracker {
    fn assign(&mut self, key: RefKey) -> u64 {
        if let Some(&id) = self.seen.get(&key) {
            return id;
        }
        self.next += 1;
        self.seen.insert(key, self.next);
        self.next
    }
}

/// One encode session.
pub struct Marshaller<'a> {
    options: Options,
    fset: &'a FileSet,
    refs: RefTracker,
}

impl<'a> Marshaller<'a> {
    pub fn new(options: Options, fset: &'a FileSet) -> Self {
        Marshaller {
            options,
            fset,
            refs: RefTracker::default(),
        }
    }

    pub fn marshal_file(&mut self, a: &AstArena, file: &File) -> WireFile {
        WireFile {
            node_type: NodeKind::File.name(),
            ref_id: 0,
            doc: self.doc(a, file.doc),
            package_pos: self.pos(file.package_pos),
            name: self.ident(a, file.name),
            decls: file.decls.iter().map(|&d| self.decl(a, d)).collect(),
            imports: if self.options.imports {
                file.imports
                    .iter()
                    .map(|&i| self.import_spec(a, i))
                    .collect()
            } else {
                Vec::new()
            },
            unresolved: file.unresolved.iter().map(|&i| self.ident(a, i)).collect(),
            comments: if self.options.comments {
                file.comments
                    .iter()
                    .map(|&g| self.comment_group(a, g))
                    .collect()
            } else {
                Vec::new()
            },
        }
    }

    pub fn marshal_package(&mut self, a: &AstArena, pkg: &Package) -> WirePackage {
        WirePackage {
            node_type: NodeKind::Package.name(),
            ref_id: 0,
            name: pkg.name.clone(),
            files: pkg
                .files
                .iter()
                .map(|(name, file)| (name.clone(), self.marshal_file(a, file)))
                .collect(),
        }
    }

    // --- Leaves ---

    fn pos(&self, p: Pos) -> Option<WirePos> {
        if !self.options.positions {
            return None;
        }
        let resolved = self.fset.position(p)?;
        Some(WirePos {
            filename: resolved.filename,
            offset: resolved.offset,
        })
    }

    fn ref_id(&mut self, key: RefKey) -> u64 {
        if !self.options.references {
            return 0;
        }
        self.refs.assign(key)
    }

    fn ident(&mut self, a: &AstArena, id: IdentId) -> WireIdent {
        let n = &a.idents[id];
        WireIdent {
            node_type: NodeKind::Ident.name(),
            ref_id: self.ref_id(RefKey::Ident(id)),
            name_pos: self.pos(n.name_pos),
            name: n.name.clone(),
        }
    }

    fn idents(&mut self, a: &AstArena, ids: &[IdentId]) -> Vec<WireIdent> {
        ids.iter().map(|&i| self.ident(a, i)).collect()
    }

    fn basic_lit(&mut self, a: &AstArena, id: BasicLitId) -> WireBasicLit {
        let n = &a.basic_lits[id];
        WireBasicLit {
            node_type: NodeKind::BasicLit.name(),
            ref_id: self.ref_id(RefKey::Lit(id)),
            value_pos: self.pos(n.value_pos),
            kind: n.kind.as_str(),
            value: n.value.clone(),
        }
    }

    fn comment(&mut self, a: &AstArena, id: CommentId) -> WireComment {
        let n = &a.comments[id];
        WireComment {
            node_type: NodeKind::Comment.name(),
            ref_id: self.ref_id(RefKey::Comment(id)),
            slash: self.pos(n.slash),
            text: n.text.clone(),
        }
    }

    fn comment_group(&mut self, a: &AstArena, id: CommentGroupId) -> WireCommentGroup {
        let list = a.comment_groups[id]
            .list
            .iter()
            .map(|&c| self.comment(a, c))
            .collect();
        WireCommentGroup {
            node_type: NodeKind::CommentGroup.name(),
            ref_id: self.ref_id(RefKey::CommentGroup(id)),
            list,
        }
    }

    /// Comment-group attachment honoring the `comments` option.
    fn doc(&mut self, a: &AstArena, g: Option<CommentGroupId>) -> Option<WireCommentGroup> {
        if !self.options.comments {
            return None;
        }
        g.map(|g| self.comment_group(a, g))
    }

    // --- Structural nodes ---

    fn field(&mut self, a: &AstArena, id: FieldId) -> WireField {
        let ref_id = self.ref_id(RefKey::Field(id));
        let Field {
            doc,
            names,
            typ,
            tag,
            comment,
        } = a.fields[id].clone();
        WireField {
            node_type: NodeKind::Field.name(),
            ref_id,
            doc: self.doc(a, doc),
            names: self.idents(a, &names),
            typ: typ.map(|t| Box::new(self.expr(a, t))),
            tag: tag.map(|t| self.basic_lit(a, t)),
            comment: self.doc(a, comment),
        }
    }

    fn field_list(&mut self, a: &AstArena, id: FieldListId) -> WireFieldList {
        let ref_id = self.ref_id(RefKey::FieldList(id));
        let fl = a.field_lists[id].clone();
        WireFieldList {
            node_type: NodeKind::FieldList.name(),
            ref_id,
            opening: self.pos(fl.opening),
            list: fl.list.iter().map(|&f| self.field(a, f)).collect(),
            closing: self.pos(fl.closing),
        }
    }

    fn field_list_opt(&mut self, a: &AstArena, id: Option<FieldListId>) -> Option<WireFieldList> {
        id.map(|id| self.field_list(a, id))
    }

    fn func_type(&mut self, a: &AstArena, id: FuncTypeId) -> WireFuncType {
        let ref_id = self.ref_id(RefKey::FuncType(id));
        let ft = a.func_types[id].clone();
        WireFuncType {
            node_type: NodeKind::FuncType.name(),
            ref_id,
            func_pos: self.pos(ft.func_pos),
            type_params: self.field_list_opt(a, ft.type_params),
            params: self.field_list_opt(a, ft.params),
            results: self.field_list_opt(a, ft.results),
        }
    }

    fn block(&mut self, a: &AstArena, id: BlockId) -> WireBlockStmt {
        let ref_id = self.ref_id(RefKey::Block(id));
        let b = a.blocks[id].clone();
        WireBlockStmt {
            node_type: NodeKind::BlockStmt.name(),
            ref_id,
            lbrace: self.pos(b.lbrace),
            list: b.list.iter().map(|&s| self.stmt(a, s)).collect(),
            rbrace: self.pos(b.rbrace),
        }
    }

    fn call(&mut self, a: &AstArena, id: CallId) -> WireCallExpr {
        let ref_id = self.ref_id(RefKey::Call(id));
        let c = a.calls[id].clone();
        WireCallExpr {
            node_type: NodeKind::CallExpr.name(),
            ref_id,
            fun: Box::new(self.expr(a, c.fun)),
            lparen: self.pos(c.lparen),
            args: self.exprs(a, &c.args),
            ellipsis: self.pos(c.ellipsis),
            rparen: self.pos(c.rparen),
        }
    }

    fn import_spec(&mut self, a: &AstArena, id: ImportId) -> WireImportSpec {
        let ref_id = self.ref_id(RefKey::Import(id));
        let s = a.import_specs[id].clone();
        WireImportSpec {
            node_type: NodeKind::ImportSpec.name(),
            ref_id,
            doc: self.doc(a, s.doc),
            name: s.name.map(|n| self.ident(a, n)),
            path: self.basic_lit(a, s.path),
            comment: self.doc(a, s.comment),
            end_pos: self.pos(s.end_pos),
        }
    }

    // --- Expressions ---

    fn exprs(&mut self, a: &AstArena, ids: &[ExprId]) -> Vec<WireExpr> {
        ids.iter().map(|&e| self.expr(a, e)).collect()
    }

    fn expr_opt(&mut self, a: &AstArena, id: Option<ExprId>) -> Option<Box<WireExpr>> {
        id.map(|e| Box::new(self.expr(a, e)))
    }

    fn expr(&mut self, a: &AstArena, id: ExprId) -> WireExpr {
        // Wrapper variants first: their wire node is the wrapped node, which
        // carries its own identity, so no RefId is assigned to the wrapper.
        match &a.exprs[id] {
            Expr::Ident(n) => return WireExpr::Ident(self.ident(a, *n)),
            Expr::BasicLit(n) => return WireExpr::BasicLit(self.basic_lit(a, *n)),
            Expr::Call(c) => return WireExpr::Call(self.call(a, *c)),
            Expr::FuncType(ft) => return WireExpr::FuncType(self.func_type(a, *ft)),
            _ => {}
        }
        let ref_id = self.ref_id(RefKey::Expr(id));
        match a.exprs[id].clone() {
            Expr::Ident(_) | Expr::BasicLit(_) | Expr::Call(_) | Expr::FuncType(_) => {
                unreachable!("wrapper variants handled above")
            }

            Expr::Bad { from, to } => WireExpr::Bad(WireBadExpr {
                node_type: NodeKind::BadExpr.name(),
                ref_id,
                from: self.pos(from),
                to: self.pos(to),
            }),
            Expr::Ellipsis { pos, elt } => WireExpr::Ellipsis(WireEllipsis {
                node_type: NodeKind::Ellipsis.name(),
                ref_id,
                ellipsis: self.pos(pos),
                elt: self.expr_opt(a, elt),
            }),
            Expr::FuncLit { typ, body } => WireExpr::FuncLit(WireFuncLit {
                node_type: NodeKind::FuncLit.name(),
                ref_id,
                typ: self.func_type(a, typ),
                body: self.block(a, body),
            }),
            Expr::CompositeLit {
                typ,
                lbrace,
                elts,
                rbrace,
                incomplete,
            } => WireExpr::CompositeLit(WireCompositeLit {
                node_type: NodeKind::CompositeLit.name(),
                ref_id,
                typ: self.expr_opt(a, typ),
                lbrace: self.pos(lbrace),
                elts: self.exprs(a, &elts),
                rbrace: self.pos(rbrace),
                incomplete,
            }),
            Expr::Paren { lparen, x, rparen } => WireExpr::Paren(WireParenExpr {
                node_type: NodeKind::ParenExpr.name(),
                ref_id,
                lparen: self.pos(lparen),
                x: Box::new(self.expr(a, x)),
                rparen: self.pos(rparen),
            }),
            Expr::Selector { x, sel } => WireExpr::Selector(WireSelectorExpr {
                node_type: NodeKind::SelectorExpr.name(),
                ref_id,
                x: Box::new(self.expr(a, x)),
                sel: self.ident(a, sel),
            }),
            Expr::Index {
                x,
                lbrack,
                index,
                rbrack,
            } => WireExpr::Index(WireIndexExpr {
                node_type: NodeKind::IndexExpr.name(),
                ref_id,
                x: Box::new(self.expr(a, x)),
                lbrack: self.pos(lbrack),
                index: Box::new(self.expr(a, index)),
                rbrack: self.pos(rbrack),
            }),
            Expr::IndexList {
                x,
                lbrack,
                indices,
                rbrack,
            } => WireExpr::IndexList(WireIndexListExpr {
                node_type: NodeKind::IndexListExpr.name(),
                ref_id,
                x: Box::new(self.expr(a, x)),
                lbrack: self.pos(lbrack),
                indices: self.exprs(a, &indices),
                rbrack: self.pos(rbrack),
            }),
            Expr::Slice {
                x,
                lbrack,
                low,
                high,
                max,
                slice3,
                rbrack,
            } => WireExpr::Slice(WireSliceExpr {
                node_type: NodeKind::SliceExpr.name(),
                ref_id,
                x: Box::new(self.expr(a, x)),
                lbrack: self.pos(lbrack),
                low: self.expr_opt(a, low),
                high: self.expr_opt(a, high),
                max: self.expr_opt(a, max),
                slice3,
                rbrack: self.pos(rbrack),
            }),
            Expr::TypeAssert {
                x,
                lparen,
                typ,
                rparen,
            } => WireExpr::TypeAssert(WireTypeAssertExpr {
                node_type: NodeKind::TypeAssertExpr.name(),
                ref_id,
                x: Box::new(self.expr(a, x)),
                lparen: self.pos(lparen),
                typ: self.expr_opt(a, typ),
                rparen: self.pos(rparen),
            }),
            Expr::Star { star, x } => WireExpr::Star(WireStarExpr {
                node_type: NodeKind::StarExpr.name(),
                ref_id,
                star: self.pos(star),
                x: Box::new(self.expr(a, x)),
            }),
            Expr::Unary { op_pos, op, x } => WireExpr::Unary(WireUnaryExpr {
                node_type: NodeKind::UnaryExpr.name(),
                ref_id,
                op_pos: self.pos(op_pos),
                op: op.as_str(),
                x: Box::new(self.expr(a, x)),
            }),
            Expr::Binary { x, op_pos, op, y } => WireExpr::Binary(WireBinaryExpr {
                node_type: NodeKind::BinaryExpr.name(),
                ref_id,
                x: Box::new(self.expr(a, x)),
                op_pos: self.pos(op_pos),
                op: op.as_str(),
                y: Box::new(self.expr(a, y)),
            }),
            Expr::KeyValue { key, colon, value } => WireExpr::KeyValue(WireKeyValueExpr {
                node_type: NodeKind::KeyValueExpr.name(),
                ref_id,
                key: Box::new(self.expr(a, key)),
                colon: self.pos(colon),
                value: Box::new(self.expr(a, value)),
            }),
            Expr::ArrayType { lbrack, len, elt } => WireExpr::ArrayType(WireArrayType {
                node_type: NodeKind::ArrayType.name(),
                ref_id,
                lbrack: self.pos(lbrack),
                len: self.expr_opt(a, len),
                elt: Box::new(self.expr(a, elt)),
            }),
            Expr::StructType {
                struct_pos,
                fields,
                incomplete,
            } => WireExpr::StructType(WireStructType {
                node_type: NodeKind::StructType.name(),
                ref_id,
                struct_pos: self.pos(struct_pos),
                fields: self.field_list(a, fields),
                incomplete,
            }),
            Expr::InterfaceType {
                interface_pos,
                methods,
                incomplete,
            } => WireExpr::InterfaceType(WireInterfaceType {
                node_type: NodeKind::InterfaceType.name(),
                ref_id,
                interface_pos: self.pos(interface_pos),
                methods: self.field_list(a, methods),
                incomplete,
            }),
            Expr::MapType { map_pos, key, value } => WireExpr::MapType(WireMapType {
                node_type: NodeKind::MapType.name(),
                ref_id,
                map_pos: self.pos(map_pos),
                key: Box::new(self.expr(a, key)),
                value: Box::new(self.expr(a, value)),
            }),
            Expr::ChanType {
                begin,
                arrow,
                dir,
                value,
            } => WireExpr::ChanType(WireChanType {
                node_type: NodeKind::ChanType.name(),
                ref_id,
                begin: self.pos(begin),
                arrow: self.pos(arrow),
                dir: dir.as_str(),
                value: Box::new(self.expr(a, value)),
            }),
        }
    }

    // --- Statements ---

    fn stmts(&mut self, a: &AstArena, ids: &[StmtId]) -> Vec<WireStmt> {
        ids.iter().map(|&s| self.stmt(a, s)).collect()
    }

    fn stmt_opt(&mut self, a: &AstArena, id: Option<StmtId>) -> Option<Box<WireStmt>> {
        id.map(|s| Box::new(self.stmt(a, s)))
    }

    fn stmt(&mut self, a: &AstArena, id: StmtId) -> WireStmt {
        if let Stmt::Block(b) = &a.stmts[id] {
            // Wrapper variant, same as the expression wrappers.
            return WireStmt::Block(self.block(a, *b));
        }
        let ref_id = self.ref_id(RefKey::Stmt(id));
        match a.stmts[id].clone() {
            Stmt::Block(_) => unreachable!("wrapper variant handled above"),

            Stmt::Bad { from, to } => WireStmt::Bad(WireBadStmt {
                node_type: NodeKind::BadStmt.name(),
                ref_id,
                from: self.pos(from),
                to: self.pos(to),
            }),
            Stmt::Decl(d) => WireStmt::Decl(WireDeclStmt {
                node_type: NodeKind::DeclStmt.name(),
                ref_id,
                decl: Box::new(self.decl(a, d)),
            }),
            Stmt::Empty {
                semicolon,
                implicit,
            } => WireStmt::Empty(WireEmptyStmt {
                node_type: NodeKind::EmptyStmt.name(),
                ref_id,
                semicolon: self.pos(semicolon),
                implicit,
            }),
            Stmt::Labeled { label, colon, stmt } => WireStmt::Labeled(WireLabeledStmt {
                node_type: NodeKind::LabeledStmt.name(),
                ref_id,
                label: self.ident(a, label),
                colon: self.pos(colon),
                stmt: Box::new(self.stmt(a, stmt)),
            }),
            Stmt::Expr(x) => WireStmt::Expr(WireExprStmt {
                node_type: NodeKind::ExprStmt.name(),
                ref_id,
                x: Box::new(self.expr(a, x)),
            }),
            Stmt::Send { chan, arrow, value } => WireStmt::Send(WireSendStmt {
                node_type: NodeKind::SendStmt.name(),
                ref_id,
                chan: Box::new(self.expr(a, chan)),
                arrow: self.pos(arrow),
                value: Box::new(self.expr(a, value)),
            }),
            Stmt::IncDec { x, tok_pos, tok } => WireStmt::IncDec(WireIncDecStmt {
                node_type: NodeKind::IncDecStmt.name(),
                ref_id,
                x: Box::new(self.expr(a, x)),
                tok_pos: self.pos(tok_pos),
                tok: tok.as_str(),
            }),
            Stmt::Assign {
                lhs,
                tok_pos,
                tok,
                rhs,
            } => WireStmt::Assign(WireAssignStmt {
                node_type: NodeKind::AssignStmt.name(),
                ref_id,
                lhs: self.exprs(a, &lhs),
                tok_pos: self.pos(tok_pos),
                tok: tok.as_str(),
                rhs: self.exprs(a, &rhs),
            }),
            Stmt::Go { go_pos, call } => WireStmt::Go(WireGoStmt {
                node_type: NodeKind::GoStmt.name(),
                ref_id,
                go_pos: self.pos(go_pos),
                call: self.call(a, call),
            }),
            Stmt::Defer { defer_pos, call } => WireStmt::Defer(WireDeferStmt {
                node_type: NodeKind::DeferStmt.name(),
                ref_id,
                defer_pos: self.pos(defer_pos),
                call: self.call(a, call),
            }),
            Stmt::Return {
                return_pos,
                results,
            } => WireStmt::Return(WireReturnStmt {
                node_type: NodeKind::ReturnStmt.name(),
                ref_id,
                return_pos: self.pos(return_pos),
                results: self.exprs(a, &results),
            }),
            Stmt::Branch { tok_pos, tok, label } => WireStmt::Branch(WireBranchStmt {
                node_type: NodeKind::BranchStmt.name(),
                ref_id,
                tok_pos: self.pos(tok_pos),
                tok: tok.as_str(),
                label: label.map(|l| self.ident(a, l)),
            }),
            Stmt::If {
                if_pos,
                init,
                cond,
                body,
                else_stmt,
            } => WireStmt::If(WireIfStmt {
                node_type: NodeKind::IfStmt.name(),
                ref_id,
                if_pos: self.pos(if_pos),
                init: self.stmt_opt(a, init),
                cond: Box::new(self.expr(a, cond)),
                body: self.block(a, body),
                else_stmt: self.stmt_opt(a, else_stmt),
            }),
            Stmt::CaseClause {
                case_pos,
                list,
                colon,
                body,
            } => WireStmt::CaseClause(WireCaseClause {
                node_type: NodeKind::CaseClause.name(),
                ref_id,
                case_pos: self.pos(case_pos),
                list: self.exprs(a, &list),
                colon: self.pos(colon),
                body: self.stmts(a, &body),
            }),
            Stmt::Switch {
                switch_pos,
                init,
                tag,
                body,
            } => WireStmt::Switch(WireSwitchStmt {
                node_type: NodeKind::SwitchStmt.name(),
                ref_id,
                switch_pos: self.pos(switch_pos),
                init: self.stmt_opt(a, init),
                tag: self.expr_opt(a, tag),
                body: self.block(a, body),
            }),
            Stmt::TypeSwitch {
                switch_pos,
                init,
                assign,
                body,
            } => WireStmt::TypeSwitch(WireTypeSwitchStmt {
                node_type: NodeKind::TypeSwitchStmt.name(),
                ref_id,
                switch_pos: self.pos(switch_pos),
                init: self.stmt_opt(a, init),
                assign: Box::new(self.stmt(a, assign)),
                body: self.block(a, body),
            }),
            Stmt::CommClause {
                case_pos,
                comm,
                colon,
                body,
            } => WireStmt::CommClause(WireCommClause {
                node_type: NodeKind::CommClause.name(),
                ref_id,
                case_pos: self.pos(case_pos),
                comm: self.stmt_opt(a, comm),
                colon: self.pos(colon),
                body: self.stmts(a, &body),
            }),
            Stmt::Select { select_pos, body } => WireStmt::Select(WireSelectStmt {
                node_type: NodeKind::SelectStmt.name(),
                ref_id,
                select_pos: self.pos(select_pos),
                body: self.block(a, body),
            }),
            Stmt::For {
                for_pos,
                init,
                cond,
                post,
                body,
            } => WireStmt::For(WireForStmt {
                node_type: NodeKind::ForStmt.name(),
                ref_id,
                for_pos: self.pos(for_pos),
                init: self.stmt_opt(a, init),
                cond: self.expr_opt(a, cond),
                post: self.stmt_opt(a, post),
                body: self.block(a, body),
            }),
            Stmt::Range {
                for_pos,
                key,
                value,
                tok_pos,
                tok,
                x,
                body,
            } => WireStmt::Range(WireRangeStmt {
                node_type: NodeKind::RangeStmt.name(),
                ref_id,
                for_pos: self.pos(for_pos),
                key: self.expr_opt(a, key),
                value: self.expr_opt(a, value),
                tok_pos: self.pos(tok_pos),
                tok: tok.as_str(),
                x: Box::new(self.expr(a, x)),
                body: self.block(a, body),
            }),
        }
    }

    // --- Specifications and declarations ---

    fn spec(&mut self, a: &AstArena, id: SpecId) -> WireSpec {
        if let Spec::Import(i) = &a.specs[id] {
            // The wire node of an import spec is the shared ImportSpec
            // itself, so the root import table reuses its RefId.
            return WireSpec::Import(self.import_spec(a, *i));
        }
        let ref_id = self.ref_id(RefKey::Spec(id));
        match a.specs[id].clone() {
            Spec::Import(_) => unreachable!("wrapper variant handled above"),

            Spec::Value(v) => WireSpec::Value(WireValueSpec {
                node_type: NodeKind::ValueSpec.name(),
                ref_id,
                doc: self.doc(a, v.doc),
                names: self.idents(a, &v.names),
                typ: self.expr_opt(a, v.typ),
                values: self.exprs(a, &v.values),
                comment: self.doc(a, v.comment),
            }),
            Spec::Type(t) => WireSpec::Type(WireTypeSpec {
                node_type: NodeKind::TypeSpec.name(),
                ref_id,
                doc: self.doc(a, t.doc),
                name: self.ident(a, t.name),
                type_params: self.field_list_opt(a, t.type_params),
                assign: self.pos(t.assign),
                typ: Box::new(self.expr(a, t.typ)),
                comment: self.doc(a, t.comment),
            }),
        }
    }

    fn decl(&mut self, a: &AstArena, id: DeclId) -> WireDecl {
        let ref_id = self.ref_id(RefKey::Decl(id));
        match a.decls[id].clone() {
            Decl::Bad { from, to } => WireDecl::Bad(WireBadDecl {
                node_type: NodeKind::BadDecl.name(),
                ref_id,
                from: self.pos(from),
                to: self.pos(to),
            }),
            Decl::Gen(g) => WireDecl::Gen(WireGenDecl {
                node_type: NodeKind::GenDecl.name(),
                ref_id,
                doc: self.doc(a, g.doc),
                tok_pos: self.pos(g.tok_pos),
                tok: g.tok.as_str(),
                lparen: self.pos(g.lparen),
                specs: g.specs.iter().map(|&s| self.spec(a, s)).collect(),
                rparen: self.pos(g.rparen),
            }),
            Decl::Func(f) => WireDecl::Func(WireFuncDecl {
                node_type: NodeKind::FuncDecl.name(),
                ref_id,
                doc: self.doc(a, f.doc),
                recv: self.field_list_opt(a, f.recv),
                name: self.ident(a, f.name),
                typ: self.func_type(a, f.typ),
                body: f.body.map(|b| self.block(a, b)),
            }),
        }
    }
}
