//! Decoder: wire tree → native tree.
//!
//! One [`Unmarshaller`] is one decode session: it owns the arena being
//! built, a fresh position index, and the RefId cache. Dispatch is keyed on
//! the `NodeType` discriminant through the kind registry; an unknown
//! discriminant or token string is fatal, a position naming an unknown file
//! degrades to the no-position sentinel.
//!
//! The RefId cache is the identity arena: the first node carrying a given
//! RefId is decoded into an arena slot and the slot is cached; every later
//! node with the same RefId resolves to that slot and its (redundantly
//! re-serialized) content is discarded. That is the single mechanism that
//! turns the tree-shaped wire form back into a graph where the original had
//! sharing.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::ast::{
    AstArena, BasicLit, BasicLitId, BlockId, BlockStmt, CallExpr, CallId, Comment, CommentGroup,
    CommentGroupId, CommentId, Decl, DeclId, Expr, ExprId, ExprList, Field, FieldId, FieldList,
    FieldListId, File, FuncDecl, FuncType, FuncTypeId, GenDecl, IdentId, IdentList, ImportId,
    ImportSpec, Package, Spec, SpecId, Stmt, StmtId, TypeSpec, ValueSpec,
};
use crate::error::{Error, Result};
use crate::kind::NodeKind;
use crate::position::{FileSet, Pos, NO_POS};
use crate::token::{ChanDir, Token};
use crate::Options;

/// A decoded file together with the arena and position index that own it.
#[derive(Debug)]
pub struct DecodedFile {
    pub arena: AstArena,
    pub fset: FileSet,
    pub file: File,
}

/// A decoded package; all files share one arena and one position index.
#[derive(Debug)]
pub struct DecodedPackage {
    pub arena: AstArena,
    pub fset: FileSet,
    pub package: Package,
}

/// Arena slot a RefId resolved to.
#[derive(Debug, Clone, Copy)]
enum RefSlot {
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

fn class_mismatch(context: &str) -> Error {
    Error::malformed(context, "RefId resolves to a different node class")
}

// --- Shape helpers over the raw JSON values ---

const EMPTY: &[Value] = &[];

fn obj<'v>(v: &'v Value, context: &str) -> Result<&'v Map<String, Value>> {
    v.as_object()
        .ok_or_else(|| Error::malformed(context, "node is not a JSON object"))
}

/// Field access treating JSON `null` the same as an absent field.
fn get<'v>(m: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    match m.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => Some(v),
    }
}

fn req<'v>(m: &'v Map<String, Value>, key: &str, context: &str) -> Result<&'v Value> {
    get(m, key).ok_or_else(|| Error::malformed(context, format!("missing required field {key:?}")))
}

fn req_str<'v>(m: &'v Map<String, Value>, key: &str, context: &str) -> Result<&'v str> {
    req(m, key, context)?
        .as_str()
        .ok_or_else(|| Error::malformed(context, format!("field {key:?} is not a string")))
}

fn bool_field(m: &Map<String, Value>, key: &str, context: &str) -> Result<bool> {
    match get(m, key) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(Error::malformed(
            context,
            format!("field {key:?} is not a boolean"),
        )),
    }
}

fn list<'v>(m: &'v Map<String, Value>, key: &str, context: &str) -> Result<&'v [Value]> {
    match get(m, key) {
        None => Ok(EMPTY),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(Error::malformed(
            context,
            format!("field {key:?} is not an array"),
        )),
    }
}

/// Reads and resolves the `NodeType` discriminant. Unknown discriminants are
/// fatal: they mean the wire tree comes from a newer or corrupted registry.
fn node_kind(m: &Map<String, Value>) -> Result<NodeKind> {
    let name = match m.get("NodeType") {
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(Error::Malformed("NodeType is not a string".into())),
        None => return Err(Error::Malformed("node has no NodeType".into())),
    };
    NodeKind::from_name(name).ok_or_else(|| Error::UnknownNodeKind(name.to_string()))
}

fn ref_id_of(m: &Map<String, Value>) -> u64 {
    m.get("RefId").and_then(Value::as_u64).unwrap_or(0)
}

fn expect_kind(m: &Map<String, Value>, want: NodeKind, context: &str) -> Result<()> {
    let kind = node_kind(m)?;
    if kind.canonical() != want {
        return Err(Error::malformed(
            context,
            format!("expected {want} node, found {kind}"),
        ));
    }
    Ok(())
}

/// One decode session.
pub struct Unmarshaller {
    options: Options,
    arena: AstArena,
    fset: FileSet,
    refs: HashMap<u64, RefSlot>,
}

impl Unmarshaller {
    pub fn new(options: Options) -> Self {
        Unmarshaller {
            options,
            arena: AstArena::new(),
            fset: FileSet::new(),
            refs: HashMap::new(),
        }
    }

    /// Decodes a `File` root. Consumes the session: decoded trees outlive
    /// it, sessions are never reused.
    pub fn unmarshal_file(mut self, v: &Value) -> Result<DecodedFile> {
        let file = self.file(v)?;
        Ok(DecodedFile {
            arena: self.arena,
            fset: self.fset,
            file,
        })
    }

    /// Decodes a `Package` root.
    pub fn unmarshal_package(mut self, v: &Value) -> Result<DecodedPackage> {
        let m = obj(v, "Package")?;
        expect_kind(m, NodeKind::Package, "Package")?;
        let name = req_str(m, "Name", "Package")?.to_string();
        let mut files = BTreeMap::new();
        if let Some(file_map) = get(m, "Files") {
            let file_map = obj(file_map, "Package.Files")?;
            for (filename, file_value) in file_map {
                files.insert(filename.clone(), self.file(file_value)?);
            }
        }
        Ok(DecodedPackage {
            arena: self.arena,
            fset: self.fset,
            package: Package { name, files },
        })
    }

    // --- Reference cache ---

    fn cached(&self, rid: u64) -> Option<RefSlot> {
        if rid == 0 || !self.options.references {
            return None;
        }
        self.refs.get(&rid).copied()
    }

    fn remember(&mut self, rid: u64, slot: RefSlot) {
        if rid != 0 && self.options.references {
            self.refs.insert(rid, slot);
        }
    }

    // --- Positions ---

    /// Re-hosts a portable position into this session's index. Every miss —
    /// position tracking disabled, absent field, unknown file, offset out of
    /// range — yields the sentinel, never an error.
    fn pos(&mut self, v: Option<&Value>) -> Result<Pos> {
        if !self.options.positions {
            return Ok(NO_POS);
        }
        let Some(v) = v else {
            return Ok(NO_POS);
        };
        let m = obj(v, "Position")?;
        let filename = req_str(m, "Filename", "Position")?;
        let offset = req(m, "Offset", "Position")?
            .as_u64()
            .ok_or_else(|| Error::malformed("Position", "Offset is not an integer"))?;
        if offset > u32::MAX as u64 {
            return Ok(NO_POS);
        }
        Ok(self.fset.pos_for(filename, offset as u32))
    }

    // --- Leaves ---

    fn ident(&mut self, v: &Value) -> Result<IdentId> {
        let m = obj(v, "Ident")?;
        expect_kind(m, NodeKind::Ident, "Ident")?;
        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::Ident(id) => Ok(id),
                _ => Err(class_mismatch("Ident")),
            };
        }
        let name_pos = self.pos(get(m, "NamePos"))?;
        let name = req_str(m, "Name", "Ident")?.to_string();
        let id = self.arena.idents.alloc(crate::ast::Ident { name_pos, name });
        self.remember(rid, RefSlot::Ident(id));
        Ok(id)
    }

    fn ident_opt(&mut self, v: Option<&Value>) -> Result<Option<IdentId>> {
        v.map(|v| self.ident(v)).transpose()
    }

    fn idents(&mut self, items: &[Value]) -> Result<IdentList> {
        items.iter().map(|v| self.ident(v)).collect()
    }

    fn basic_lit(&mut self, v: &Value) -> Result<BasicLitId> {
        let m = obj(v, "BasicLit")?;
        expect_kind(m, NodeKind::BasicLit, "BasicLit")?;
        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::Lit(id) => Ok(id),
                _ => Err(class_mismatch("BasicLit")),
            };
        }
        let value_pos = self.pos(get(m, "ValuePos"))?;
        let kind = Token::from_wire(req_str(m, "Kind", "BasicLit")?)?;
        let value = req_str(m, "Value", "BasicLit")?.to_string();
        let id = self.arena.basic_lits.alloc(BasicLit {
            value_pos,
            kind,
            value,
        });
        self.remember(rid, RefSlot::Lit(id));
        Ok(id)
    }

    fn basic_lit_opt(&mut self, v: Option<&Value>) -> Result<Option<BasicLitId>> {
        v.map(|v| self.basic_lit(v)).transpose()
    }

    fn comment(&mut self, v: &Value) -> Result<CommentId> {
        let m = obj(v, "Comment")?;
        expect_kind(m, NodeKind::Comment, "Comment")?;
        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::Comment(id) => Ok(id),
                _ => Err(class_mismatch("Comment")),
            };
        }
        let slash = self.pos(get(m, "Slash"))?;
        let text = req_str(m, "Text", "Comment")?.to_string();
        let id = self.arena.comments.alloc(Comment { slash, text });
        self.remember(rid, RefSlot::Comment(id));
        Ok(id)
    }

    fn comment_group(&mut self, v: &Value) -> Result<CommentGroupId> {
        let m = obj(v, "CommentGroup")?;
        expect_kind(m, NodeKind::CommentGroup, "CommentGroup")?;
        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::CommentGroup(id) => Ok(id),
                _ => Err(class_mismatch("CommentGroup")),
            };
        }
        let comments = list(m, "List", "CommentGroup")?
            .iter()
            .map(|c| self.comment(c))
            .collect::<Result<Vec<_>>>()?;
        let id = self.arena.comment_groups.alloc(CommentGroup { list: comments });
        self.remember(rid, RefSlot::CommentGroup(id));
        Ok(id)
    }

    /// Comment attachment slot; drops the group entirely when the session
    /// was configured without comments.
    fn comment_group_opt(&mut self, v: Option<&Value>) -> Result<Option<CommentGroupId>> {
        if !self.options.comments {
            return Ok(None);
        }
        v.map(|v| self.comment_group(v)).transpose()
    }

    // --- Structural nodes ---

    fn field(&mut self, v: &Value) -> Result<FieldId> {
        let m = obj(v, "Field")?;
        expect_kind(m, NodeKind::Field, "Field")?;
        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::Field(id) => Ok(id),
                _ => Err(class_mismatch("Field")),
            };
        }
        let doc = self.comment_group_opt(get(m, "Doc"))?;
        let names = self.idents(list(m, "Names", "Field")?)?;
        let typ = self.expr_opt(get(m, "Type"))?;
        let tag = self.basic_lit_opt(get(m, "Tag"))?;
        let comment = self.comment_group_opt(get(m, "Comment"))?;
        let id = self.arena.fields.alloc(Field {
            doc,
            names,
            typ,
            tag,
            comment,
        });
        self.remember(rid, RefSlot::Field(id));
        Ok(id)
    }

    fn field_list(&mut self, v: &Value) -> Result<FieldListId> {
        let m = obj(v, "FieldList")?;
        expect_kind(m, NodeKind::FieldList, "FieldList")?;
        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::FieldList(id) => Ok(id),
                _ => Err(class_mismatch("FieldList")),
            };
        }
        let opening = self.pos(get(m, "Opening"))?;
        let fields = list(m, "List", "FieldList")?
            .iter()
            .map(|f| self.field(f))
            .collect::<Result<Vec<_>>>()?;
        let closing = self.pos(get(m, "Closing"))?;
        let id = self.arena.field_lists.alloc(FieldList {
            opening,
            list: fields,
            closing,
        });
        self.remember(rid, RefSlot::FieldList(id));
        Ok(id)
    }

    fn field_list_opt(&mut self, v: Option<&Value>) -> Result<Option<FieldListId>> {
        v.map(|v| self.field_list(v)).transpose()
    }

    fn func_type(&mut self, v: &Value) -> Result<FuncTypeId> {
        let m = obj(v, "FuncType")?;
        expect_kind(m, NodeKind::FuncType, "FuncType")?;
        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::FuncType(id) => Ok(id),
                _ => Err(class_mismatch("FuncType")),
            };
        }
        let func_pos = self.pos(get(m, "Func"))?;
        let type_params = self.field_list_opt(get(m, "TypeParams"))?;
        let params = self.field_list_opt(get(m, "Params"))?;
        let results = self.field_list_opt(get(m, "Results"))?;
        let id = self.arena.func_types.alloc(FuncType {
            func_pos,
            type_params,
            params,
            results,
        });
        self.remember(rid, RefSlot::FuncType(id));
        Ok(id)
    }

    fn block(&mut self, v: &Value) -> Result<BlockId> {
        let m = obj(v, "BlockStmt")?;
        expect_kind(m, NodeKind::BlockStmt, "BlockStmt")?;
        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::Block(id) => Ok(id),
                _ => Err(class_mismatch("BlockStmt")),
            };
        }
        let lbrace = self.pos(get(m, "Lbrace"))?;
        let stmts = list(m, "List", "BlockStmt")?
            .iter()
            .map(|s| self.stmt(s))
            .collect::<Result<Vec<_>>>()?;
        let rbrace = self.pos(get(m, "Rbrace"))?;
        let id = self.arena.blocks.alloc(BlockStmt {
            lbrace,
            list: stmts,
            rbrace,
        });
        self.remember(rid, RefSlot::Block(id));
        Ok(id)
    }

    fn block_opt(&mut self, v: Option<&Value>) -> Result<Option<BlockId>> {
        v.map(|v| self.block(v)).transpose()
    }

    fn call(&mut self, v: &Value) -> Result<CallId> {
        let m = obj(v, "CallExpr")?;
        expect_kind(m, NodeKind::CallExpr, "CallExpr")?;
        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::Call(id) => Ok(id),
                _ => Err(class_mismatch("CallExpr")),
            };
        }
        let fun = self.expr(req(m, "Fun", "CallExpr")?)?;
        let lparen = self.pos(get(m, "Lparen"))?;
        let args = self.exprs(list(m, "Args", "CallExpr")?)?;
        let ellipsis = self.pos(get(m, "Ellipsis"))?;
        let rparen = self.pos(get(m, "Rparen"))?;
        let id = self.arena.calls.alloc(CallExpr {
            fun,
            lparen,
            args,
            ellipsis,
            rparen,
        });
        self.remember(rid, RefSlot::Call(id));
        Ok(id)
    }

    fn import_spec(&mut self, v: &Value) -> Result<ImportId> {
        let m = obj(v, "ImportSpec")?;
        expect_kind(m, NodeKind::ImportSpec, "ImportSpec")?;
        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::Import(id) => Ok(id),
                _ => Err(class_mismatch("ImportSpec")),
            };
        }
        let doc = self.comment_group_opt(get(m, "Doc"))?;
        let name = self.ident_opt(get(m, "Name"))?;
        let path = self.basic_lit(req(m, "Path", "ImportSpec")?)?;
        let comment = self.comment_group_opt(get(m, "Comment"))?;
        let end_pos = self.pos(get(m, "EndPos"))?;
        let id = self.arena.import_specs.alloc(ImportSpec {
            doc,
            name,
            path,
            comment,
            end_pos,
        });
        self.remember(rid, RefSlot::Import(id));
        Ok(id)
    }

    // --- Expressions ---

    fn exprs(&mut self, items: &[Value]) -> Result<ExprList> {
        items.iter().map(|v| self.expr(v)).collect()
    }

    fn expr_opt(&mut self, v: Option<&Value>) -> Result<Option<ExprId>> {
        v.map(|v| self.expr(v)).transpose()
    }

    /// Expression decode group: exhaustively covers every expression kind;
    /// any other discriminant in an expression slot is a shape violation.
    fn expr(&mut self, v: &Value) -> Result<ExprId> {
        let m = obj(v, "expression")?;
        let kind = node_kind(m)?.canonical();

        // Kinds with their own arenas decode through their typed entry
        // point and get wrapped; the wrapper itself carries no identity.
        match kind {
            NodeKind::Ident => {
                let n = self.ident(v)?;
                return Ok(self.arena.exprs.alloc(Expr::Ident(n)));
            }
            NodeKind::BasicLit => {
                let n = self.basic_lit(v)?;
                return Ok(self.arena.exprs.alloc(Expr::BasicLit(n)));
            }
            NodeKind::CallExpr => {
                let c = self.call(v)?;
                return Ok(self.arena.exprs.alloc(Expr::Call(c)));
            }
            NodeKind::FuncType => {
                let ft = self.func_type(v)?;
                return Ok(self.arena.exprs.alloc(Expr::FuncType(ft)));
            }
            _ => {}
        }

        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::Expr(id) => Ok(id),
                _ => Err(class_mismatch("expression")),
            };
        }

        let node = match kind {
            NodeKind::BadExpr => Expr::Bad {
                from: self.pos(get(m, "From"))?,
                to: self.pos(get(m, "To"))?,
            },
            NodeKind::Ellipsis => Expr::Ellipsis {
                pos: self.pos(get(m, "Ellipsis"))?,
                elt: self.expr_opt(get(m, "Elt"))?,
            },
            NodeKind::FuncLit => Expr::FuncLit {
                typ: self.func_type(req(m, "Type", "FuncLit")?)?,
                body: self.block(req(m, "Body", "FuncLit")?)?,
            },
            NodeKind::CompositeLit => Expr::CompositeLit {
                typ: self.expr_opt(get(m, "Type"))?,
                lbrace: self.pos(get(m, "Lbrace"))?,
                elts: self.exprs(list(m, "Elts", "CompositeLit")?)?,
                rbrace: self.pos(get(m, "Rbrace"))?,
                incomplete: bool_field(m, "Incomplete", "CompositeLit")?,
            },
            NodeKind::ParenExpr => Expr::Paren {
                lparen: self.pos(get(m, "Lparen"))?,
                x: self.expr(req(m, "X", "ParenExpr")?)?,
                rparen: self.pos(get(m, "Rparen"))?,
            },
            NodeKind::SelectorExpr => Expr::Selector {
                x: self.expr(req(m, "X", "SelectorExpr")?)?,
                sel: self.ident(req(m, "Sel", "SelectorExpr")?)?,
            },
            NodeKind::IndexExpr => Expr::Index {
                x: self.expr(req(m, "X", "IndexExpr")?)?,
                lbrack: self.pos(get(m, "Lbrack"))?,
                index: self.expr(req(m, "Index", "IndexExpr")?)?,
                rbrack: self.pos(get(m, "Rbrack"))?,
            },
            NodeKind::IndexListExpr => Expr::IndexList {
                x: self.expr(req(m, "X", "IndexListExpr")?)?,
                lbrack: self.pos(get(m, "Lbrack"))?,
                indices: self.exprs(list(m, "Indices", "IndexListExpr")?)?,
                rbrack: self.pos(get(m, "Rbrack"))?,
            },
            NodeKind::SliceExpr => Expr::Slice {
                x: self.expr(req(m, "X", "SliceExpr")?)?,
                lbrack: self.pos(get(m, "Lbrack"))?,
                low: self.expr_opt(get(m, "Low"))?,
                high: self.expr_opt(get(m, "High"))?,
                max: self.expr_opt(get(m, "Max"))?,
                slice3: bool_field(m, "Slice3", "SliceExpr")?,
                rbrack: self.pos(get(m, "Rbrack"))?,
            },
            NodeKind::TypeAssertExpr => Expr::TypeAssert {
                x: self.expr(req(m, "X", "TypeAssertExpr")?)?,
                lparen: self.pos(get(m, "Lparen"))?,
                typ: self.expr_opt(get(m, "Type"))?,
                rparen: self.pos(get(m, "Rparen"))?,
            },
            NodeKind::StarExpr => Expr::Star {
                star: self.pos(get(m, "Star"))?,
                x: self.expr(req(m, "X", "StarExpr")?)?,
            },
            NodeKind::UnaryExpr => Expr::Unary {
                op_pos: self.pos(get(m, "OpPos"))?,
                op: Token::from_wire(req_str(m, "Op", "UnaryExpr")?)?,
                x: self.expr(req(m, "X", "UnaryExpr")?)?,
            },
            NodeKind::BinaryExpr => Expr::Binary {
                x: self.expr(req(m, "X", "BinaryExpr")?)?,
                op_pos: self.pos(get(m, "OpPos"))?,
                op: Token::from_wire(req_str(m, "Op", "BinaryExpr")?)?,
                y: self.expr(req(m, "Y", "BinaryExpr")?)?,
            },
            NodeKind::KeyValueExpr => Expr::KeyValue {
                key: self.expr(req(m, "Key", "KeyValueExpr")?)?,
                colon: self.pos(get(m, "Colon"))?,
                value: self.expr(req(m, "Value", "KeyValueExpr")?)?,
            },
            NodeKind::ArrayType => Expr::ArrayType {
                lbrack: self.pos(get(m, "Lbrack"))?,
                len: self.expr_opt(get(m, "Len"))?,
                elt: self.expr(req(m, "Elt", "ArrayType")?)?,
            },
            NodeKind::StructType => Expr::StructType {
                struct_pos: self.pos(get(m, "Struct"))?,
                fields: self.field_list(req(m, "Fields", "StructType")?)?,
                incomplete: bool_field(m, "Incomplete", "StructType")?,
            },
            NodeKind::InterfaceType => Expr::InterfaceType {
                interface_pos: self.pos(get(m, "Interface"))?,
                methods: self.field_list(req(m, "Methods", "InterfaceType")?)?,
                incomplete: bool_field(m, "Incomplete", "InterfaceType")?,
            },
            NodeKind::MapType => Expr::MapType {
                map_pos: self.pos(get(m, "Map"))?,
                key: self.expr(req(m, "Key", "MapType")?)?,
                value: self.expr(req(m, "Value", "MapType")?)?,
            },
            NodeKind::ChanType => Expr::ChanType {
                begin: self.pos(get(m, "Begin"))?,
                arrow: self.pos(get(m, "Arrow"))?,
                dir: ChanDir::from_wire(req_str(m, "Dir", "ChanType")?)?,
                value: self.expr(req(m, "Value", "ChanType")?)?,
            },
            other => {
                return Err(Error::malformed(
                    "expression",
                    format!("node kind {other} is not an expression"),
                ))
            }
        };
        let id = self.arena.exprs.alloc(node);
        self.remember(rid, RefSlot::Expr(id));
        Ok(id)
    }

    // --- Statements ---

    fn stmts(&mut self, items: &[Value]) -> Result<Vec<StmtId>> {
        items.iter().map(|v| self.stmt(v)).collect()
    }

    fn stmt_opt(&mut self, v: Option<&Value>) -> Result<Option<StmtId>> {
        v.map(|v| self.stmt(v)).transpose()
    }

    /// Statement decode group.
    fn stmt(&mut self, v: &Value) -> Result<StmtId> {
        let m = obj(v, "statement")?;
        let kind = node_kind(m)?.canonical();

        if kind == NodeKind::BlockStmt {
            let b = self.block(v)?;
            return Ok(self.arena.stmts.alloc(Stmt::Block(b)));
        }

        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::Stmt(id) => Ok(id),
                _ => Err(class_mismatch("statement")),
            };
        }

        let node = match kind {
            NodeKind::BadStmt => Stmt::Bad {
                from: self.pos(get(m, "From"))?,
                to: self.pos(get(m, "To"))?,
            },
            NodeKind::DeclStmt => Stmt::Decl(self.decl(req(m, "Decl", "DeclStmt")?)?),
            NodeKind::EmptyStmt => Stmt::Empty {
                semicolon: self.pos(get(m, "Semicolon"))?,
                implicit: bool_field(m, "Implicit", "EmptyStmt")?,
            },
            NodeKind::LabeledStmt => Stmt::Labeled {
                label: self.ident(req(m, "Label", "LabeledStmt")?)?,
                colon: self.pos(get(m, "Colon"))?,
                stmt: self.stmt(req(m, "Stmt", "LabeledStmt")?)?,
            },
            NodeKind::ExprStmt => Stmt::Expr(self.expr(req(m, "X", "ExprStmt")?)?),
            NodeKind::SendStmt => Stmt::Send {
                chan: self.expr(req(m, "Chan", "SendStmt")?)?,
                arrow: self.pos(get(m, "Arrow"))?,
                value: self.expr(req(m, "Value", "SendStmt")?)?,
            },
            NodeKind::IncDecStmt => Stmt::IncDec {
                x: self.expr(req(m, "X", "IncDecStmt")?)?,
                tok_pos: self.pos(get(m, "TokPos"))?,
                tok: Token::from_wire(req_str(m, "Tok", "IncDecStmt")?)?,
            },
            NodeKind::AssignStmt => Stmt::Assign {
                lhs: self.exprs(list(m, "Lhs", "AssignStmt")?)?,
                tok_pos: self.pos(get(m, "TokPos"))?,
                tok: Token::from_wire(req_str(m, "Tok", "AssignStmt")?)?,
                rhs: self.exprs(list(m, "Rhs", "AssignStmt")?)?,
            },
            NodeKind::GoStmt => Stmt::Go {
                go_pos: self.pos(get(m, "Go"))?,
                call: self.call(req(m, "Call", "GoStmt")?)?,
            },
            NodeKind::DeferStmt => Stmt::Defer {
                defer_pos: self.pos(get(m, "Defer"))?,
                call: self.call(req(m, "Call", "DeferStmt")?)?,
            },
            NodeKind::ReturnStmt => Stmt::Return {
                return_pos: self.pos(get(m, "Return"))?,
                results: self.exprs(list(m, "Results", "ReturnStmt")?)?,
            },
            NodeKind::BranchStmt => Stmt::Branch {
                tok_pos: self.pos(get(m, "TokPos"))?,
                tok: Token::from_wire(req_str(m, "Tok", "BranchStmt")?)?,
                label: self.ident_opt(get(m, "Label"))?,
            },
            NodeKind::IfStmt => Stmt::If {
                if_pos: self.pos(get(m, "If"))?,
                init: self.stmt_opt(get(m, "Init"))?,
                cond: self.expr(req(m, "Cond", "IfStmt")?)?,
                body: self.block(req(m, "Body", "IfStmt")?)?,
                else_stmt: self.stmt_opt(get(m, "Else"))?,
            },
            NodeKind::CaseClause => Stmt::CaseClause {
                case_pos: self.pos(get(m, "Case"))?,
                list: self.exprs(list(m, "List", "CaseClause")?)?,
                colon: self.pos(get(m, "Colon"))?,
                body: self.stmts(list(m, "Body", "CaseClause")?)?,
            },
            NodeKind::SwitchStmt => Stmt::Switch {
                switch_pos: self.pos(get(m, "Switch"))?,
                init: self.stmt_opt(get(m, "Init"))?,
                tag: self.expr_opt(get(m, "Tag"))?,
                body: self.block(req(m, "Body", "SwitchStmt")?)?,
            },
            NodeKind::TypeSwitchStmt => Stmt::TypeSwitch {
                switch_pos: self.pos(get(m, "Switch"))?,
                init: self.stmt_opt(get(m, "Init"))?,
                assign: self.stmt(req(m, "Assign", "TypeSwitchStmt")?)?,
                body: self.block(req(m, "Body", "TypeSwitchStmt")?)?,
            },
            NodeKind::CommClause => Stmt::CommClause {
                case_pos: self.pos(get(m, "Case"))?,
                comm: self.stmt_opt(get(m, "Comm"))?,
                colon: self.pos(get(m, "Colon"))?,
                body: self.stmts(list(m, "Body", "CommClause")?)?,
            },
            NodeKind::SelectStmt => Stmt::Select {
                select_pos: self.pos(get(m, "Select"))?,
                body: self.block(req(m, "Body", "SelectStmt")?)?,
            },
            NodeKind::ForStmt => Stmt::For {
                for_pos: self.pos(get(m, "For"))?,
                init: self.stmt_opt(get(m, "Init"))?,
                cond: self.expr_opt(get(m, "Cond"))?,
                post: self.stmt_opt(get(m, "Post"))?,
                body: self.block(req(m, "Body", "ForStmt")?)?,
            },
            NodeKind::RangeStmt => Stmt::Range {
                for_pos: self.pos(get(m, "For"))?,
                key: self.expr_opt(get(m, "Key"))?,
                value: self.expr_opt(get(m, "Value"))?,
                tok_pos: self.pos(get(m, "TokPos"))?,
                tok: Token::from_wire(req_str(m, "Tok", "RangeStmt")?)?,
                x: self.expr(req(m, "X", "RangeStmt")?)?,
                body: self.block(req(m, "Body", "RangeStmt")?)?,
            },
            other => {
                return Err(Error::malformed(
                    "statement",
                    format!("node kind {other} is not a statement"),
                ))
            }
        };
        let id = self.arena.stmts.alloc(node);
        self.remember(rid, RefSlot::Stmt(id));
        Ok(id)
    }

    // --- Specifications ---

    /// Specification decode group.
    fn spec(&mut self, v: &Value) -> Result<SpecId> {
        let m = obj(v, "specification")?;
        let kind = node_kind(m)?.canonical();

        if kind == NodeKind::ImportSpec {
            let i = self.import_spec(v)?;
            return Ok(self.arena.specs.alloc(Spec::Import(i)));
        }

        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::Spec(id) => Ok(id),
                _ => Err(class_mismatch("specification")),
            };
        }

        let node = match kind {
            NodeKind::ValueSpec => Spec::Value(ValueSpec {
                doc: self.comment_group_opt(get(m, "Doc"))?,
                names: self.idents(list(m, "Names", "ValueSpec")?)?,
                typ: self.expr_opt(get(m, "Type"))?,
                values: self.exprs(list(m, "Values", "ValueSpec")?)?,
                comment: self.comment_group_opt(get(m, "Comment"))?,
            }),
            NodeKind::TypeSpec => Spec::Type(TypeSpec {
                doc: self.comment_group_opt(get(m, "Doc"))?,
                name: self.ident(req(m, "Name", "TypeSpec")?)?,
                type_params: self.field_list_opt(get(m, "TypeParams"))?,
                assign: self.pos(get(m, "Assign"))?,
                typ: self.expr(req(m, "Type", "TypeSpec")?)?,
                comment: self.comment_group_opt(get(m, "Comment"))?,
            }),
            other => {
                return Err(Error::malformed(
                    "specification",
                    format!("node kind {other} is not a specification"),
                ))
            }
        };
        let id = self.arena.specs.alloc(node);
        self.remember(rid, RefSlot::Spec(id));
        Ok(id)
    }

    // --- Declarations ---

    /// Declaration decode group.
    fn decl(&mut self, v: &Value) -> Result<DeclId> {
        let m = obj(v, "declaration")?;
        let kind = node_kind(m)?.canonical();

        let rid = ref_id_of(m);
        if let Some(slot) = self.cached(rid) {
            return match slot {
                RefSlot::Decl(id) => Ok(id),
                _ => Err(class_mismatch("declaration")),
            };
        }

        let node = match kind {
            NodeKind::BadDecl => Decl::Bad {
                from: self.pos(get(m, "From"))?,
                to: self.pos(get(m, "To"))?,
            },
            NodeKind::GenDecl => Decl::Gen(GenDecl {
                doc: self.comment_group_opt(get(m, "Doc"))?,
                tok_pos: self.pos(get(m, "TokPos"))?,
                tok: Token::from_wire(req_str(m, "Tok", "GenDecl")?)?,
                lparen: self.pos(get(m, "Lparen"))?,
                specs: list(m, "Specs", "GenDecl")?
                    .iter()
                    .map(|s| self.spec(s))
                    .collect::<Result<Vec<_>>>()?,
                rparen: self.pos(get(m, "Rparen"))?,
            }),
            NodeKind::FuncDecl => Decl::Func(FuncDecl {
                doc: self.comment_group_opt(get(m, "Doc"))?,
                recv: self.field_list_opt(get(m, "Recv"))?,
                name: self.ident(req(m, "Name", "FuncDecl")?)?,
                typ: self.func_type(req(m, "Type", "FuncDecl")?)?,
                body: self.block_opt(get(m, "Body"))?,
            }),
            other => {
                return Err(Error::malformed(
                    "declaration",
                    format!("node kind {other} is not a declaration"),
                ))
            }
        };
        let id = self.arena.decls.alloc(node);
        self.remember(rid, RefSlot::Decl(id));
        Ok(id)
    }

    // --- Roots ---

    fn file(&mut self, v: &Value) -> Result<File> {
        let m = obj(v, "File")?;
        expect_kind(m, NodeKind::File, "File")?;
        let doc = self.comment_group_opt(get(m, "Doc"))?;
        let package_pos = self.pos(get(m, "Package"))?;
        let name = self.ident(req(m, "Name", "File")?)?;
        let decls = list(m, "Decls", "File")?
            .iter()
            .map(|d| self.decl(d))
            .collect::<Result<Vec<_>>>()?;
        let imports = if self.options.imports {
            list(m, "Imports", "File")?
                .iter()
                .map(|i| self.import_spec(i))
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };
        let unresolved = list(m, "Unresolved", "File")?
            .iter()
            .map(|i| self.ident(i))
            .collect::<Result<IdentList>>()?
            .into_vec();
        let comments = if self.options.comments {
            list(m, "Comments", "File")?
                .iter()
                .map(|g| self.comment_group(g))
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };
        Ok(File {
            doc,
            package_pos,
            name,
            decls,
            imports,
            unresolved,
            comments,
        })
    }
}
