//! Wire tree model: the JSON-shaped form of every node kind.
//!
//! Each node struct carries its own `NodeType` discriminant (set by the
//! encoder from the kind registry) and an optional numeric `RefId`. Field
//! names are frozen wire vocabulary — they serialize in declaration order,
//! which is what makes repeated encodes byte-identical.
//!
//! Absent optional children, empty lists, `false` flags and zero RefIds are
//! omitted rather than serialized, matching the format this codec has always
//! produced.

use std::collections::BTreeMap;

use serde::Serialize;

#[inline]
fn is_zero(v: &u64) -> bool {
    *v == 0
}

#[inline]
fn is_false(v: &bool) -> bool {
    !*v
}

/// Portable position: owning file name plus byte offset within it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WirePos {
    pub filename: String,
    pub offset: u32,
}

// =============================================================================
// Structural nodes
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireComment {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slash: Option<WirePos>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireCommentGroup {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<WireComment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireIdent {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_pos: Option<WirePos>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireBasicLit {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_pos: Option<WirePos>,
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireField {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<WireCommentGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<WireIdent>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub typ: Option<Box<WireExpr>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<WireBasicLit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<WireCommentGroup>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireFieldList {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening: Option<WirePos>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<WireField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing: Option<WirePos>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireFuncType {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Func", skip_serializing_if = "Option::is_none")]
    pub func_pos: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_params: Option<WireFieldList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<WireFieldList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<WireFieldList>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireBlockStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbrace: Option<WirePos>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<WireStmt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbrace: Option<WirePos>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireCallExpr {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub fun: Box<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lparen: Option<WirePos>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ellipsis: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rparen: Option<WirePos>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireImportSpec {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<WireCommentGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<WireIdent>,
    pub path: WireBasicLit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<WireCommentGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_pos: Option<WirePos>,
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireBadExpr {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<WirePos>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireEllipsis {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ellipsis: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elt: Option<Box<WireExpr>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireFuncLit {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Type")]
    pub typ: WireFuncType,
    pub body: WireBlockStmt,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireCompositeLit {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub typ: Option<Box<WireExpr>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbrace: Option<WirePos>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elts: Vec<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbrace: Option<WirePos>,
    #[serde(skip_serializing_if = "is_false")]
    pub incomplete: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireParenExpr {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lparen: Option<WirePos>,
    pub x: Box<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rparen: Option<WirePos>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireSelectorExpr {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub x: Box<WireExpr>,
    pub sel: WireIdent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireIndexExpr {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub x: Box<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbrack: Option<WirePos>,
    pub index: Box<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbrack: Option<WirePos>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireIndexListExpr {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub x: Box<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbrack: Option<WirePos>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbrack: Option<WirePos>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireSliceExpr {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub x: Box<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbrack: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Box<WireExpr>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Box<WireExpr>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Box<WireExpr>>,
    #[serde(skip_serializing_if = "is_false")]
    pub slice3: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbrack: Option<WirePos>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireTypeAssertExpr {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub x: Box<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lparen: Option<WirePos>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub typ: Option<Box<WireExpr>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rparen: Option<WirePos>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireStarExpr {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star: Option<WirePos>,
    pub x: Box<WireExpr>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireUnaryExpr {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op_pos: Option<WirePos>,
    pub op: &'static str,
    pub x: Box<WireExpr>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireBinaryExpr {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub x: Box<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op_pos: Option<WirePos>,
    pub op: &'static str,
    pub y: Box<WireExpr>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireKeyValueExpr {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub key: Box<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colon: Option<WirePos>,
    pub value: Box<WireExpr>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireArrayType {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbrack: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<Box<WireExpr>>,
    pub elt: Box<WireExpr>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireStructType {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Struct", skip_serializing_if = "Option::is_none")]
    pub struct_pos: Option<WirePos>,
    pub fields: WireFieldList,
    #[serde(skip_serializing_if = "is_false")]
    pub incomplete: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireInterfaceType {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Interface", skip_serializing_if = "Option::is_none")]
    pub interface_pos: Option<WirePos>,
    pub methods: WireFieldList,
    #[serde(skip_serializing_if = "is_false")]
    pub incomplete: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireMapType {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Map", skip_serializing_if = "Option::is_none")]
    pub map_pos: Option<WirePos>,
    pub key: Box<WireExpr>,
    pub value: Box<WireExpr>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireChanType {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow: Option<WirePos>,
    pub dir: &'static str,
    pub value: Box<WireExpr>,
}

/// Any expression node. Untagged: each payload struct already carries its
/// `NodeType` field.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WireExpr {
    Bad(WireBadExpr),
    Ident(WireIdent),
    Ellipsis(WireEllipsis),
    BasicLit(WireBasicLit),
    FuncLit(WireFuncLit),
    CompositeLit(WireCompositeLit),
    Paren(WireParenExpr),
    Selector(WireSelectorExpr),
    Index(WireIndexExpr),
    IndexList(WireIndexListExpr),
    Slice(WireSliceExpr),
    TypeAssert(WireTypeAssertExpr),
    Call(WireCallExpr),
    Star(WireStarExpr),
    Unary(WireUnaryExpr),
    Binary(WireBinaryExpr),
    KeyValue(WireKeyValueExpr),
    ArrayType(WireArrayType),
    StructType(WireStructType),
    FuncType(WireFuncType),
    InterfaceType(WireInterfaceType),
    MapType(WireMapType),
    ChanType(WireChanType),
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireBadStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<WirePos>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireDeclStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub decl: Box<WireDecl>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireEmptyStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Option<WirePos>,
    #[serde(skip_serializing_if = "is_false")]
    pub implicit: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireLabeledStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub label: WireIdent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colon: Option<WirePos>,
    pub stmt: Box<WireStmt>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireExprStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub x: Box<WireExpr>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireSendStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub chan: Box<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow: Option<WirePos>,
    pub value: Box<WireExpr>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireIncDecStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub x: Box<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tok_pos: Option<WirePos>,
    pub tok: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireAssignStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub lhs: Vec<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tok_pos: Option<WirePos>,
    pub tok: &'static str,
    pub rhs: Vec<WireExpr>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireGoStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Go", skip_serializing_if = "Option::is_none")]
    pub go_pos: Option<WirePos>,
    pub call: WireCallExpr,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireDeferStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Defer", skip_serializing_if = "Option::is_none")]
    pub defer_pos: Option<WirePos>,
    pub call: WireCallExpr,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireReturnStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Return", skip_serializing_if = "Option::is_none")]
    pub return_pos: Option<WirePos>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<WireExpr>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireBranchStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tok_pos: Option<WirePos>,
    pub tok: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<WireIdent>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireIfStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "If", skip_serializing_if = "Option::is_none")]
    pub if_pos: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init: Option<Box<WireStmt>>,
    pub cond: Box<WireExpr>,
    pub body: WireBlockStmt,
    #[serde(rename = "Else", skip_serializing_if = "Option::is_none")]
    pub else_stmt: Option<Box<WireStmt>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireCaseClause {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Case", skip_serializing_if = "Option::is_none")]
    pub case_pos: Option<WirePos>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colon: Option<WirePos>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<WireStmt>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireSwitchStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Switch", skip_serializing_if = "Option::is_none")]
    pub switch_pos: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init: Option<Box<WireStmt>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<Box<WireExpr>>,
    pub body: WireBlockStmt,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireTypeSwitchStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Switch", skip_serializing_if = "Option::is_none")]
    pub switch_pos: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init: Option<Box<WireStmt>>,
    pub assign: Box<WireStmt>,
    pub body: WireBlockStmt,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireCommClause {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Case", skip_serializing_if = "Option::is_none")]
    pub case_pos: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comm: Option<Box<WireStmt>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colon: Option<WirePos>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<WireStmt>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireSelectStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "Select", skip_serializing_if = "Option::is_none")]
    pub select_pos: Option<WirePos>,
    pub body: WireBlockStmt,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireForStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "For", skip_serializing_if = "Option::is_none")]
    pub for_pos: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init: Option<Box<WireStmt>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cond: Option<Box<WireExpr>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Box<WireStmt>>,
    pub body: WireBlockStmt,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireRangeStmt {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(rename = "For", skip_serializing_if = "Option::is_none")]
    pub for_pos: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Box<WireExpr>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Box<WireExpr>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tok_pos: Option<WirePos>,
    pub tok: &'static str,
    pub x: Box<WireExpr>,
    pub body: WireBlockStmt,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WireStmt {
    Bad(WireBadStmt),
    Decl(WireDeclStmt),
    Empty(WireEmptyStmt),
    Labeled(WireLabeledStmt),
    Expr(WireExprStmt),
    Send(WireSendStmt),
    IncDec(WireIncDecStmt),
    Assign(WireAssignStmt),
    Go(WireGoStmt),
    Defer(WireDeferStmt),
    Return(WireReturnStmt),
    Branch(WireBranchStmt),
    Block(WireBlockStmt),
    If(WireIfStmt),
    CaseClause(WireCaseClause),
    Switch(WireSwitchStmt),
    TypeSwitch(WireTypeSwitchStmt),
    CommClause(WireCommClause),
    Select(WireSelectStmt),
    For(WireForStmt),
    Range(WireRangeStmt),
}

// =============================================================================
// Specifications and declarations
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireValueSpec {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<WireCommentGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<WireIdent>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub typ: Option<Box<WireExpr>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<WireCommentGroup>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireTypeSpec {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<WireCommentGroup>,
    pub name: WireIdent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_params: Option<WireFieldList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign: Option<WirePos>,
    #[serde(rename = "Type")]
    pub typ: Box<WireExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<WireCommentGroup>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WireSpec {
    Import(WireImportSpec),
    Value(WireValueSpec),
    Type(WireTypeSpec),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireBadDecl {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<WirePos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<WirePos>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireGenDecl {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<WireCommentGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tok_pos: Option<WirePos>,
    pub tok: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lparen: Option<WirePos>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub specs: Vec<WireSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rparen: Option<WirePos>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireFuncDecl {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<WireCommentGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recv: Option<WireFieldList>,
    pub name: WireIdent,
    #[serde(rename = "Type")]
    pub typ: WireFuncType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<WireBlockStmt>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WireDecl {
    Bad(WireBadDecl),
    Gen(WireGenDecl),
    Func(WireFuncDecl),
}

// =============================================================================
// Roots
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireFile {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<WireCommentGroup>,
    #[serde(rename = "Package", skip_serializing_if = "Option::is_none")]
    pub package_pos: Option<WirePos>,
    pub name: WireIdent,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub decls: Vec<WireDecl>,
    /// Flattened import table, present only when the `imports` option is on.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<WireImportSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<WireIdent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<WireCommentGroup>,
}

/// Multi-file root. Files are keyed (and therefore serialized) by name, which
/// keeps package encodes deterministic.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WirePackage {
    pub node_type: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub ref_id: u64,
    pub name: String,
    pub files: BTreeMap<String, WireFile>,
}
