//! Canonical source printer.
//!
//! Layout is deterministic: tab indentation, one statement per line, single
//! spaces around binary operators. When positions resolve, two discretionary
//! decisions are recovered from byte offsets alone:
//!
//! - a blank line is kept between consecutive declarations or statements
//!   when the source gap exceeds the newline-plus-indent separator width;
//! - a block is rendered on one line when its source span equals the width
//!   of the inline rendering (`{ return x }`).
//!
//! Output is byte-identical to the input for sources already in this
//! canonical form; anything else is normalized into it.

use std::collections::HashSet;

use crate::ast::*;
use crate::position::{FileSet, Pos, NO_POS};
use crate::token::ChanDir;

/// Renders a file back to source text.
pub fn print_file(arena: &AstArena, fset: &FileSet, file: &File) -> String {
    let printer = Printer { arena, fset };
    let mut out = String::new();
    printer.file(&mut out, file);
    out
}

struct Printer<'a> {
    arena: &'a AstArena,
    fset: &'a FileSet,
}

enum TopItem {
    Decl(DeclId),
    Comments(CommentGroupId),
}

impl<'a> Printer<'a> {
    fn offset(&self, pos: Pos) -> Option<u32> {
        self.fset.offset_of(pos)
    }

    /// Blank-line decision between an item ending at `prev_end` and one
    /// starting at `next_pos`, both printed at `indent` tabs. The separator
    /// itself is one newline plus the indent; any wider gap means the source
    /// had at least one blank line.
    fn wants_blank(&self, prev_end: Pos, next_pos: Pos, indent: usize) -> Option<bool> {
        let prev = self.offset(prev_end)?;
        let next = self.offset(next_pos)?;
        Some(next.saturating_sub(prev) as usize > 1 + indent)
    }

    fn push_indent(&self, out: &mut String, indent: usize) {
        for _ in 0..indent {
            out.push('\t');
        }
    }

    // --- File ---

    fn file(&self, out: &mut String, file: &File) {
        self.doc_group(out, 0, file.doc);
        out.push_str("package ");
        out.push_str(self.arena.ident_name(file.name));
        out.push('\n');

        let items = self.top_items(file);
        let mut prev_end = self.arena.ident_end(file.name);
        for item in items {
            let (start, end) = match &item {
                TopItem::Decl(d) => (self.decl_start(*d), self.arena.decl_end(*d)),
                TopItem::Comments(g) => (
                    self.arena.comment_group_pos(*g),
                    self.arena.comment_group_end(*g),
                ),
            };
            // Canonical layout separates top-level items with one blank
            // line; offsets override that when they witness tighter layout.
            let blank = self.wants_blank(prev_end, start, 0).unwrap_or(true);
            if blank {
                out.push('\n');
            }
            match item {
                TopItem::Decl(d) => self.decl(out, 0, d),
                TopItem::Comments(g) => self.comment_lines(out, 0, g),
            }
            prev_end = end;
        }
    }

    /// Declarations and the file-level comment groups that are not attached
    /// to (or contained in) any of them, in source order.
    fn top_items(&self, file: &File) -> Vec<TopItem> {
        let mut used: HashSet<CommentGroupId> = HashSet::new();
        used.extend(file.doc);
        for (_, field) in self.arena.fields.iter() {
            used.extend(field.doc);
            used.extend(field.comment);
        }
        for (_, spec) in self.arena.import_specs.iter() {
            used.extend(spec.doc);
            used.extend(spec.comment);
        }
        for (_, spec) in self.arena.specs.iter() {
            match spec {
                Spec::Import(_) => {}
                Spec::Value(v) => {
                    used.extend(v.doc);
                    used.extend(v.comment);
                }
                Spec::Type(t) => {
                    used.extend(t.doc);
                    used.extend(t.comment);
                }
            }
        }
        for (_, decl) in self.arena.decls.iter() {
            match decl {
                Decl::Bad { .. } => {}
                Decl::Gen(g) => used.extend(g.doc),
                Decl::Func(f) => used.extend(f.doc),
            }
        }

        let spans: Vec<(Pos, Pos)> = file
            .decls
            .iter()
            .map(|&d| (self.arena.decl_pos(d), self.arena.decl_end(d)))
            .collect();

        let mut items: Vec<TopItem> = file.decls.iter().map(|&d| TopItem::Decl(d)).collect();
        for &g in &file.comments {
            if used.contains(&g) {
                continue;
            }
            let pos = self.arena.comment_group_pos(g);
            if self.offset(pos).is_none() {
                // No way to place a floating group without positions.
                continue;
            }
            let inside = spans
                .iter()
                .any(|&(start, end)| pos > start && pos < end);
            if !inside {
                items.push(TopItem::Comments(g));
            }
        }

        items.sort_by_key(|item| match item {
            TopItem::Decl(d) => self.offset(self.decl_start(*d)).unwrap_or(u32::MAX),
            TopItem::Comments(g) => self
                .offset(self.arena.comment_group_pos(*g))
                .unwrap_or(u32::MAX),
        });
        items
    }

    /// Where a declaration starts for layout purposes: its doc comment when
    /// it has one.
    fn decl_start(&self, d: DeclId) -> Pos {
        let doc = match &self.arena.decls[d] {
            Decl::Gen(g) => g.doc,
            Decl::Func(f) => f.doc,
            Decl::Bad { .. } => None,
        };
        doc.map_or_else(|| self.arena.decl_pos(d), |g| self.arena.comment_group_pos(g))
    }

    // --- Comments ---

    fn comment_lines(&self, out: &mut String, indent: usize, group: CommentGroupId) {
        for &c in &self.arena.comment_groups[group].list {
            self.push_indent(out, indent);
            out.push_str(&self.arena.comments[c].text);
            out.push('\n');
        }
    }

    fn doc_group(&self, out: &mut String, indent: usize, doc: Option<CommentGroupId>) {
        if let Some(g) = doc {
            self.comment_lines(out, indent, g);
        }
    }

    fn trailing_comment(&self, out: &mut String, comment: Option<CommentGroupId>) {
        if let Some(g) = comment {
            for &c in &self.arena.comment_groups[g].list {
                out.push(' ');
                out.push_str(&self.arena.comments[c].text);
            }
        }
    }

    // --- Declarations ---

    fn decl(&self, out: &mut String, indent: usize, d: DeclId) {
        match &self.arena.decls[d] {
            Decl::Bad { .. } => {
                self.push_indent(out, indent);
                out.push_str("/* bad declaration */\n");
            }
            Decl::Gen(g) => self.gen_decl(out, indent, g),
            Decl::Func(f) => self.func_decl(out, indent, f),
        }
    }

    fn gen_decl(&self, out: &mut String, indent: usize, g: &GenDecl) {
        self.doc_group(out, indent, g.doc);
        self.push_indent(out, indent);
        out.push_str(g.tok.as_str());
        if g.lparen != NO_POS || g.specs.len() != 1 {
            out.push_str(" (\n");
            let mut prev_end = g.lparen;
            for &s in &g.specs {
                let start = self.spec_start(s);
                if self.wants_blank(prev_end, start, indent + 1) == Some(true) {
                    out.push('\n');
                }
                self.spec(out, indent + 1, s, true);
                prev_end = self
                    .spec_trailing(s)
                    .map_or_else(|| self.arena.spec_end(s), |g| self.arena.comment_group_end(g));
            }
            self.push_indent(out, indent);
            out.push_str(")\n");
        } else {
            out.push(' ');
            self.spec(out, indent, g.specs[0], false);
        }
    }

    fn spec_trailing(&self, s: SpecId) -> Option<CommentGroupId> {
        match &self.arena.specs[s] {
            Spec::Import(i) => self.arena.import_specs[*i].comment,
            Spec::Value(v) => v.comment,
            Spec::Type(t) => t.comment,
        }
    }

    fn spec_start(&self, s: SpecId) -> Pos {
        let doc = match &self.arena.specs[s] {
            Spec::Import(i) => self.arena.import_specs[*i].doc,
            Spec::Value(v) => v.doc,
            Spec::Type(t) => t.doc,
        };
        doc.map_or_else(|| self.arena.spec_pos(s), |g| self.arena.comment_group_pos(g))
    }

    fn spec(&self, out: &mut String, indent: usize, s: SpecId, own_line: bool) {
        match &self.arena.specs[s] {
            Spec::Import(i) => {
                let spec = &self.arena.import_specs[*i];
                if own_line {
                    self.doc_group(out, indent, spec.doc);
                    self.push_indent(out, indent);
                }
                if let Some(name) = spec.name {
                    out.push_str(self.arena.ident_name(name));
                    out.push(' ');
                }
                out.push_str(&self.arena.basic_lits[spec.path].value);
                self.trailing_comment(out, spec.comment);
                out.push('\n');
            }
            Spec::Value(v) => {
                if own_line {
                    self.doc_group(out, indent, v.doc);
                    self.push_indent(out, indent);
                }
                self.ident_list(out, &v.names);
                if let Some(t) = v.typ {
                    out.push(' ');
                    out.push_str(&self.expr(t, indent));
                }
                if !v.values.is_empty() {
                    out.push_str(" = ");
                    self.expr_list(out, &v.values, indent);
                }
                self.trailing_comment(out, v.comment);
                out.push('\n');
            }
            Spec::Type(t) => {
                if own_line {
                    self.doc_group(out, indent, t.doc);
                    self.push_indent(out, indent);
                }
                out.push_str(self.arena.ident_name(t.name));
                if let Some(tp) = t.type_params {
                    out.push('[');
                    self.param_fields(out, tp, indent);
                    out.push(']');
                }
                out.push(' ');
                if t.assign != NO_POS {
                    out.push_str("= ");
                }
                out.push_str(&self.expr(t.typ, indent));
                self.trailing_comment(out, t.comment);
                out.push('\n');
            }
        }
    }

    fn func_decl(&self, out: &mut String, indent: usize, f: &FuncDecl) {
        self.doc_group(out, indent, f.doc);
        self.push_indent(out, indent);
        out.push_str("func ");
        if let Some(recv) = f.recv {
            out.push('(');
            self.param_fields(out, recv, indent);
            out.push_str(") ");
        }
        out.push_str(self.arena.ident_name(f.name));
        let ft = &self.arena.func_types[f.typ];
        if let Some(tp) = ft.type_params {
            out.push('[');
            self.param_fields(out, tp, indent);
            out.push(']');
        }
        self.signature(out, f.typ, indent);
        if let Some(body) = f.body {
            out.push(' ');
            self.block(out, indent, body);
        }
        out.push('\n');
    }

    // --- Fields and signatures ---

    fn ident_list(&self, out: &mut String, names: &[IdentId]) {
        for (i, &name) in names.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(self.arena.ident_name(name));
        }
    }

    fn expr_list(&self, out: &mut String, exprs: &[ExprId], indent: usize) {
        for (i, &e) in exprs.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&self.expr(e, indent));
        }
    }

    /// Comma-separated field list (parameters, receivers, type parameters).
    fn param_fields(&self, out: &mut String, fl: FieldListId, indent: usize) {
        for (i, &f) in self.arena.field_lists[fl].list.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let field = &self.arena.fields[f];
            if !field.names.is_empty() {
                self.ident_list(out, &field.names);
                out.push(' ');
            }
            if let Some(t) = field.typ {
                out.push_str(&self.expr(t, indent));
            }
        }
    }

    /// `(params) results` of a function type (name and type parameters are
    /// the caller's business).
    fn signature(&self, out: &mut String, ft: FuncTypeId, indent: usize) {
        let ft = &self.arena.func_types[ft];
        out.push('(');
        if let Some(params) = ft.params {
            self.param_fields(out, params, indent);
        }
        out.push(')');
        if let Some(results) = ft.results {
            let fl = &self.arena.field_lists[results];
            let unnamed_single = fl.list.len() == 1
                && self.arena.fields[fl.list[0]].names.is_empty()
                && fl.opening == NO_POS;
            out.push(' ');
            if unnamed_single {
                if let Some(t) = self.arena.fields[fl.list[0]].typ {
                    out.push_str(&self.expr(t, indent));
                }
            } else {
                out.push('(');
                self.param_fields(out, results, indent);
                out.push(')');
            }
        }
    }

    /// One-per-line field list of a struct or interface body.
    fn body_fields(&self, out: &mut String, indent: usize, fl: FieldListId, interface: bool) {
        let list = &self.arena.field_lists[fl].list;
        let mut prev_end = self.arena.field_lists[fl].opening;
        for &f in list {
            let field = &self.arena.fields[f];
            let start = field
                .doc
                .map_or_else(|| self.arena.field_pos(f), |g| self.arena.comment_group_pos(g));
            if self.wants_blank(prev_end, start, indent) == Some(true) {
                out.push('\n');
            }
            self.doc_group(out, indent, field.doc);
            self.push_indent(out, indent);
            if !field.names.is_empty() {
                self.ident_list(out, &field.names);
                if let Some(t) = field.typ {
                    if interface {
                        // Methods render their signature directly after the
                        // name.
                        if let Expr::FuncType(ft) = &self.arena.exprs[t] {
                            self.signature(out, *ft, indent);
                        } else {
                            out.push(' ');
                            out.push_str(&self.expr(t, indent));
                        }
                    } else {
                        out.push(' ');
                        out.push_str(&self.expr(t, indent));
                    }
                }
            } else if let Some(t) = field.typ {
                out.push_str(&self.expr(t, indent));
            }
            if let Some(tag) = field.tag {
                out.push(' ');
                out.push_str(&self.arena.basic_lits[tag].value);
            }
            self.trailing_comment(out, field.comment);
            out.push('\n');
            // The separator gap starts after the trailing comment, when
            // there is one.
            prev_end = field
                .comment
                .map_or_else(|| self.arena.field_end(f), |g| self.arena.comment_group_end(g));
        }
    }

    // --- Expressions ---

    fn expr(&self, e: ExprId, indent: usize) -> String {
        let mut s = String::new();
        self.write_expr(&mut s, e, indent);
        s
    }

    fn write_expr(&self, out: &mut String, e: ExprId, indent: usize) {
        match &self.arena.exprs[e] {
            Expr::Bad { .. } => out.push_str("/* bad expression */"),
            Expr::Ident(id) => out.push_str(self.arena.ident_name(*id)),
            Expr::BasicLit(id) => out.push_str(&self.arena.basic_lits[*id].value),
            Expr::Ellipsis { elt, .. } => {
                out.push_str("...");
                if let Some(elt) = elt {
                    self.write_expr(out, *elt, indent);
                }
            }
            Expr::FuncLit { typ, body } => {
                out.push_str("func");
                self.signature(out, *typ, indent);
                out.push(' ');
                self.block(out, indent, *body);
            }
            Expr::CompositeLit { typ, elts, .. } => {
                if let Some(t) = typ {
                    self.write_expr(out, *t, indent);
                }
                out.push('{');
                self.expr_list(out, elts, indent);
                out.push('}');
            }
            Expr::Paren { x, .. } => {
                out.push('(');
                self.write_expr(out, *x, indent);
                out.push(')');
            }
            Expr::Selector { x, sel } => {
                self.write_expr(out, *x, indent);
                out.push('.');
                out.push_str(self.arena.ident_name(*sel));
            }
            Expr::Index { x, index, .. } => {
                self.write_expr(out, *x, indent);
                out.push('[');
                self.write_expr(out, *index, indent);
                out.push(']');
            }
            Expr::IndexList { x, indices, .. } => {
                self.write_expr(out, *x, indent);
                out.push('[');
                self.expr_list(out, indices, indent);
                out.push(']');
            }
            Expr::Slice {
                x,
                low,
                high,
                max,
                slice3,
                ..
            } => {
                self.write_expr(out, *x, indent);
                out.push('[');
                if let Some(low) = low {
                    self.write_expr(out, *low, indent);
                }
                out.push(':');
                if let Some(high) = high {
                    self.write_expr(out, *high, indent);
                }
                if *slice3 {
                    out.push(':');
                    if let Some(max) = max {
                        self.write_expr(out, *max, indent);
                    }
                }
                out.push(']');
            }
            Expr::TypeAssert { x, typ, .. } => {
                self.write_expr(out, *x, indent);
                out.push_str(".(");
                match typ {
                    Some(t) => self.write_expr(out, *t, indent),
                    None => out.push_str("type"),
                }
                out.push(')');
            }
            Expr::Call(c) => self.write_call(out, *c, indent),
            Expr::Star { x, .. } => {
                out.push('*');
                self.write_expr(out, *x, indent);
            }
            Expr::Unary { op, x, .. } => {
                out.push_str(op.as_str());
                self.write_expr(out, *x, indent);
            }
            Expr::Binary { x, op, y, .. } => {
                self.write_expr(out, *x, indent);
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                self.write_expr(out, *y, indent);
            }
            Expr::KeyValue { key, value, .. } => {
                self.write_expr(out, *key, indent);
                out.push_str(": ");
                self.write_expr(out, *value, indent);
            }
            Expr::ArrayType { len, elt, .. } => {
                out.push('[');
                if let Some(len) = len {
                    self.write_expr(out, *len, indent);
                }
                out.push(']');
                self.write_expr(out, *elt, indent);
            }
            Expr::StructType { fields, .. } => {
                if self.arena.field_lists[*fields].list.is_empty() {
                    out.push_str("struct{}");
                } else {
                    out.push_str("struct {\n");
                    self.body_fields(out, indent + 1, *fields, false);
                    self.push_indent(out, indent);
                    out.push('}');
                }
            }
            Expr::FuncType(ft) => {
                out.push_str("func");
                self.signature(out, *ft, indent);
            }
            Expr::InterfaceType { methods, .. } => {
                if self.arena.field_lists[*methods].list.is_empty() {
                    out.push_str("interface{}");
                } else {
                    out.push_str("interface {\n");
                    self.body_fields(out, indent + 1, *methods, true);
                    self.push_indent(out, indent);
                    out.push('}');
                }
            }
            Expr::MapType { key, value, .. } => {
                out.push_str("map[");
                self.write_expr(out, *key, indent);
                out.push(']');
                self.write_expr(out, *value, indent);
            }
            Expr::ChanType { dir, value, .. } => {
                match dir {
                    ChanDir::Both => out.push_str("chan "),
                    ChanDir::Send => out.push_str("chan<- "),
                    ChanDir::Recv => out.push_str("<-chan "),
                }
                self.write_expr(out, *value, indent);
            }
        }
    }

    fn write_call(&self, out: &mut String, c: CallId, indent: usize) {
        let call = &self.arena.calls[c];
        self.write_expr(out, call.fun, indent);
        out.push('(');
        self.expr_list(out, &call.args, indent);
        if call.ellipsis != NO_POS {
            out.push_str("...");
        }
        out.push(')');
    }

    // --- Statements ---

    /// Inline rendering of a statement, for one-line blocks. `None` for
    /// statement kinds that always occupy multiple lines.
    fn stmt_inline(&self, s: StmtId, indent: usize) -> Option<String> {
        let mut out = String::new();
        match &self.arena.stmts[s] {
            Stmt::Expr(x) => out.push_str(&self.expr(*x, indent)),
            Stmt::Send { chan, value, .. } => {
                out.push_str(&self.expr(*chan, indent));
                out.push_str(" <- ");
                out.push_str(&self.expr(*value, indent));
            }
            Stmt::IncDec { x, tok, .. } => {
                out.push_str(&self.expr(*x, indent));
                out.push_str(tok.as_str());
            }
            Stmt::Assign { lhs, tok, rhs, .. } => {
                self.expr_list(&mut out, lhs, indent);
                out.push(' ');
                out.push_str(tok.as_str());
                out.push(' ');
                self.expr_list(&mut out, rhs, indent);
            }
            Stmt::Go { call, .. } => {
                out.push_str("go ");
                self.write_call(&mut out, *call, indent);
            }
            Stmt::Defer { call, .. } => {
                out.push_str("defer ");
                self.write_call(&mut out, *call, indent);
            }
            Stmt::Return { results, .. } => {
                out.push_str("return");
                if !results.is_empty() {
                    out.push(' ');
                    self.expr_list(&mut out, results, indent);
                }
            }
            Stmt::Branch { tok, label, .. } => {
                out.push_str(tok.as_str());
                if let Some(label) = label {
                    out.push(' ');
                    out.push_str(self.arena.ident_name(*label));
                }
            }
            Stmt::Empty { .. } => {}
            _ => return None,
        }
        if out.contains('\n') {
            return None;
        }
        Some(out)
    }

    fn stmt(&self, out: &mut String, indent: usize, s: StmtId) {
        if let Some(inline) = self.stmt_inline(s, indent) {
            if !inline.is_empty() {
                self.push_indent(out, indent);
                out.push_str(&inline);
                out.push('\n');
            }
            return;
        }
        match &self.arena.stmts[s] {
            Stmt::Bad { .. } => {
                self.push_indent(out, indent);
                out.push_str("/* bad statement */\n");
            }
            Stmt::Decl(d) => self.decl(out, indent, *d),
            Stmt::Labeled { label, stmt, .. } => {
                self.push_indent(out, indent.saturating_sub(1));
                out.push_str(self.arena.ident_name(*label));
                out.push_str(":\n");
                self.stmt(out, indent, *stmt);
            }
            Stmt::Block(b) => {
                self.push_indent(out, indent);
                self.block(out, indent, *b);
                out.push('\n');
            }
            Stmt::If { .. } => {
                self.push_indent(out, indent);
                self.if_chain(out, indent, s);
                out.push('\n');
            }
            Stmt::Switch {
                init, tag, body, ..
            } => {
                self.push_indent(out, indent);
                out.push_str("switch ");
                if let Some(init) = init {
                    out.push_str(&self.stmt_inline(*init, indent).unwrap_or_default());
                    out.push_str("; ");
                }
                if let Some(tag) = tag {
                    out.push_str(&self.expr(*tag, indent));
                    out.push(' ');
                }
                self.clause_block(out, indent, *body);
                out.push('\n');
            }
            Stmt::TypeSwitch {
                init, assign, body, ..
            } => {
                self.push_indent(out, indent);
                out.push_str("switch ");
                if let Some(init) = init {
                    out.push_str(&self.stmt_inline(*init, indent).unwrap_or_default());
                    out.push_str("; ");
                }
                out.push_str(&self.stmt_inline(*assign, indent).unwrap_or_default());
                out.push(' ');
                self.clause_block(out, indent, *body);
                out.push('\n');
            }
            Stmt::Select { body, .. } => {
                self.push_indent(out, indent);
                out.push_str("select ");
                self.clause_block(out, indent, *body);
                out.push('\n');
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
                ..
            } => {
                self.push_indent(out, indent);
                out.push_str("for ");
                if init.is_some() || post.is_some() {
                    if let Some(init) = init {
                        out.push_str(&self.stmt_inline(*init, indent).unwrap_or_default());
                    }
                    out.push_str("; ");
                    if let Some(cond) = cond {
                        out.push_str(&self.expr(*cond, indent));
                    }
                    out.push_str("; ");
                    if let Some(post) = post {
                        out.push_str(&self.stmt_inline(*post, indent).unwrap_or_default());
                    }
                    out.push(' ');
                } else if let Some(cond) = cond {
                    out.push_str(&self.expr(*cond, indent));
                    out.push(' ');
                }
                self.block(out, indent, *body);
                out.push('\n');
            }
            Stmt::Range {
                key,
                value,
                tok,
                x,
                body,
                ..
            } => {
                self.push_indent(out, indent);
                out.push_str("for ");
                if let Some(key) = key {
                    out.push_str(&self.expr(*key, indent));
                    if let Some(value) = value {
                        out.push_str(", ");
                        out.push_str(&self.expr(*value, indent));
                    }
                    out.push(' ');
                    out.push_str(tok.as_str());
                    out.push(' ');
                }
                out.push_str("range ");
                out.push_str(&self.expr(*x, indent));
                out.push(' ');
                self.block(out, indent, *body);
                out.push('\n');
            }
            Stmt::CaseClause { .. } | Stmt::CommClause { .. } => {
                // Clauses are printed by their switch/select.
                self.case_clause(out, indent, s);
            }
            // Simple statements were handled by the inline renderer.
            _ => {}
        }
    }

    fn if_chain(&self, out: &mut String, indent: usize, s: StmtId) {
        let Stmt::If {
            init,
            cond,
            body,
            else_stmt,
            ..
        } = &self.arena.stmts[s]
        else {
            return;
        };
        out.push_str("if ");
        if let Some(init) = init {
            out.push_str(&self.stmt_inline(*init, indent).unwrap_or_default());
            out.push_str("; ");
        }
        out.push_str(&self.expr(*cond, indent));
        out.push(' ');
        self.block_multiline(out, indent, *body);
        if let Some(else_stmt) = else_stmt {
            out.push_str(" else ");
            match &self.arena.stmts[*else_stmt] {
                Stmt::If { .. } => self.if_chain(out, indent, *else_stmt),
                Stmt::Block(b) => self.block_multiline(out, indent, *b),
                _ => {}
            }
        }
    }

    fn case_clause(&self, out: &mut String, indent: usize, s: StmtId) {
        match &self.arena.stmts[s] {
            Stmt::CaseClause { list, body, .. } => {
                self.push_indent(out, indent);
                if list.is_empty() {
                    out.push_str("default:\n");
                } else {
                    out.push_str("case ");
                    self.expr_list(out, list, indent);
                    out.push_str(":\n");
                }
                for &inner in body {
                    self.stmt(out, indent + 1, inner);
                }
            }
            Stmt::CommClause { comm, body, .. } => {
                self.push_indent(out, indent);
                match comm {
                    Some(comm) => {
                        out.push_str("case ");
                        out.push_str(&self.stmt_inline(*comm, indent).unwrap_or_default());
                        out.push_str(":\n");
                    }
                    None => out.push_str("default:\n"),
                }
                for &inner in body {
                    self.stmt(out, indent + 1, inner);
                }
            }
            _ => {}
        }
    }

    /// Body of a switch or select: clauses sit at the same indent as the
    /// keyword.
    fn clause_block(&self, out: &mut String, indent: usize, b: BlockId) {
        let block = &self.arena.blocks[b];
        if block.list.is_empty() {
            out.push_str("{}");
            return;
        }
        out.push_str("{\n");
        for &clause in &block.list {
            self.case_clause(out, indent, clause);
        }
        self.push_indent(out, indent);
        out.push('}');
    }

    // --- Blocks ---

    fn block(&self, out: &mut String, indent: usize, b: BlockId) {
        if let Some(inline) = self.try_inline_block(b, indent) {
            out.push_str(&inline);
            return;
        }
        self.block_multiline(out, indent, b);
    }

    fn block_multiline(&self, out: &mut String, indent: usize, b: BlockId) {
        let block = &self.arena.blocks[b];
        if block.list.is_empty() {
            // An empty body spanning two lines keeps its shape; otherwise
            // collapse to the canonical `{}`.
            let span = self.block_span(block);
            if span.is_some_and(|w| w > 2) {
                out.push_str("{\n");
                self.push_indent(out, indent);
                out.push('}');
            } else {
                out.push_str("{}");
            }
            return;
        }
        out.push_str("{\n");
        let mut prev_end = block.lbrace;
        for &s in &block.list {
            if self.wants_blank(prev_end, self.arena.stmt_pos(s), indent + 1) == Some(true) {
                out.push('\n');
            }
            self.stmt(out, indent + 1, s);
            prev_end = self.arena.stmt_end(s);
        }
        self.push_indent(out, indent);
        out.push('}');
    }

    fn block_span(&self, block: &BlockStmt) -> Option<u32> {
        let l = self.offset(block.lbrace)?;
        let r = self.offset(block.rbrace)?;
        Some(r + 1 - l)
    }

    /// A block prints on one line exactly when its source span matches the
    /// inline rendering width; that is only decidable with positions.
    fn try_inline_block(&self, b: BlockId, indent: usize) -> Option<String> {
        let block = &self.arena.blocks[b];
        if block.list.is_empty() {
            let span = self.block_span(block);
            return match span {
                None | Some(2) => Some("{}".to_string()),
                _ => None,
            };
        }
        let span = self.block_span(block)?;
        let mut rendered = String::from("{ ");
        for (i, &s) in block.list.iter().enumerate() {
            if i > 0 {
                rendered.push_str("; ");
            }
            let inline = self.stmt_inline(s, indent)?;
            if inline.is_empty() {
                return None;
            }
            rendered.push_str(&inline);
        }
        rendered.push_str(" }");
        (rendered.len() as u32 == span).then_some(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_file;
    use crate::position::FileSet;

    fn round_trip(src: &str) -> String {
        let mut fset = FileSet::new();
        let mut arena = AstArena::new();
        let file = parse_file(&mut fset, &mut arena, "t.go", src)
            .unwrap_or_else(|e| panic!("parse failed: {e}"));
        print_file(&arena, &fset, &file)
    }

    fn assert_fixed_point(src: &str) {
        assert_eq!(round_trip(src), src);
    }

    #[test]
    fn prints_minimal_file() {
        assert_fixed_point("package p\n");
    }

    #[test]
    fn keeps_one_line_function_bodies() {
        assert_fixed_point("package p\nfunc f(x int) int { return x }\n");
    }

    #[test]
    fn expands_function_bodies_that_were_multiline() {
        assert_fixed_point("package p\n\nfunc f(x int) int {\n\treturn x\n}\n");
    }

    #[test]
    fn prints_declarations() {
        assert_fixed_point(
            "package p\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n\nconst A = 1\n\nvar x, y int\n\ntype T struct {\n\tF int\n\tG string `json:\"g\"`\n}\n\nfunc main() {\n\tfmt.Println(x, os.Args)\n}\n",
        );
    }

    #[test]
    fn prints_control_flow() {
        assert_fixed_point(
            "package p\n\nfunc f(x int) int {\n\tif x < 0 {\n\t\treturn -x\n\t} else if x == 0 {\n\t\treturn 1\n\t}\n\tfor i := 0; i < x; i++ {\n\t\tx += i\n\t}\n\tswitch x {\n\tcase 1, 2:\n\t\tx--\n\tdefault:\n\t\tx = 0\n\t}\n\treturn x\n}\n",
        );
    }

    #[test]
    fn prints_blank_line_preservation() {
        assert_fixed_point(
            "package p\n\nfunc f() {\n\tx := 1\n\n\ty := 2\n\t_, _ = x, y\n}\n",
        );
    }

    #[test]
    fn prints_doc_comments() {
        assert_fixed_point(
            "package p\n\n// F does nothing.\nfunc F() {}\n",
        );
    }

    #[test]
    fn keeps_floating_comment_groups_between_declarations() {
        assert_fixed_point("package p\n\n// setup notes\n\nvar x = 1\n");
    }

    #[test]
    fn prints_types_and_literals() {
        assert_fixed_point(
            "package p\n\nvar m = map[string][]int{\"a\": {1, 2}}\n\nvar ch chan<- int\n\nvar fn = func(a, b int) (int, error) { return a + b, nil }\n\nvar p2 = &T{F: 1}\n",
        );
    }

    #[test]
    fn prints_without_positions_in_canonical_form() {
        // Strip positions by decoding a positionless render path: here we
        // simply check printing is stable when offsets are absent.
        let mut fset = FileSet::new();
        let mut arena = AstArena::new();
        let file = parse_file(
            &mut fset,
            &mut arena,
            "t.go",
            "package p\n\nfunc f() int {\n\treturn 1\n}\n",
        )
        .unwrap();
        let fresh = FileSet::new();
        let text = print_file(&arena, &fresh, &file);
        assert_eq!(text, "package p\n\nfunc f() int {\n\treturn 1\n}\n");
    }
}
