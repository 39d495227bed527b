//! Node kind registry: a stable `(id, name)` pair for every node shape.
//!
//! The numeric ids are frozen — they reproduce the registry this wire format
//! has always used. New kinds may only be appended; nothing is ever
//! renumbered or renamed, so stored wire trees from older grammars stay
//! decodable.
//!
//! A number of kinds exist twice, as a canonical tag and an `Alias` twin with
//! the identical payload shape. The encoder only emits canonical tags; the
//! decoder accepts both and maps them to the same native shape.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Every wire discriminant the decoder recognizes, with its frozen id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeKind {
    Node = 0,
    Position = 1,
    Comment = 2,
    CommentGroup = 3,
    Field = 4,
    FieldAlias = 5,
    FieldList = 6,
    BadExpr = 7,
    Ident = 8,
    Ellipsis = 9,
    EllipsisAlias = 10,
    BasicLit = 11,
    FuncLit = 12,
    CompositeLit = 13,
    CompositeLitAlias = 14,
    ParenExpr = 15,
    ParenExprAlias = 16,
    SelectorExpr = 17,
    SelectorExprAlias = 18,
    IndexExpr = 19,
    IndexExprAlias = 20,
    IndexListExpr = 21,
    IndexListExprAlias = 22,
    SliceExpr = 23,
    SliceExprAlias = 24,
    TypeAssertExpr = 25,
    TypeAssertExprAlias = 26,
    CallExpr = 27,
    CallExprAlias = 28,
    StarExpr = 29,
    StarExprAlias = 30,
    UnaryExpr = 31,
    UnaryExprAlias = 32,
    BinaryExpr = 33,
    BinaryExprAlias = 34,
    KeyValueExpr = 35,
    KeyValueExprAlias = 36,
    ArrayType = 37,
    ArrayTypeAlias = 38,
    StructType = 39,
    FuncType = 40,
    InterfaceType = 41,
    MapType = 42,
    MapTypeAlias = 43,
    ChanType = 44,
    ChanTypeAlias = 45,
    BadStmt = 46,
    DeclStmt = 47,
    DeclStmtAlias = 48,
    EmptyStmt = 49,
    LabeledStmt = 50,
    LabeledStmtAlias = 51,
    ExprStmt = 52,
    ExprStmtAlias = 53,
    SendStmt = 54,
    SendStmtAlias = 55,
    IncDecStmt = 56,
    IncDecStmtAlias = 57,
    AssignStmt = 58,
    AssignStmtAlias = 59,
    GoStmt = 60,
    DeferStmt = 61,
    ReturnStmt = 62,
    ReturnStmtAlias = 63,
    BranchStmt = 64,
    BlockStmt = 65,
    BlockStmtAlias = 66,
    IfStmt = 67,
    IfStmtAlias = 68,
    CaseClause = 69,
    CaseClauseAlias = 70,
    SwitchStmt = 71,
    SwitchStmtAlias = 72,
    TypeSwitchStmt = 73,
    TypeSwitchStmtAlias = 74,
    CommClause = 75,
    CommClauseAlias = 76,
    SelectStmt = 77,
    ForStmt = 78,
    ForStmtAlias = 79,
    RangeStmt = 80,
    RangeStmtAlias = 81,
    ImportSpec = 82,
    ValueSpec = 83,
    ValueSpecAlias = 84,
    TypeSpec = 85,
    TypeSpecAlias = 86,
    BadDecl = 87,
    GenDecl = 88,
    GenDeclAlias = 89,
    FuncDecl = 90,
    File = 91,
    FileAlias = 92,
    Package = 93,
}

/// All registered kinds in id order.
pub const ALL: &[NodeKind] = &[
    NodeKind::Node,
    NodeKind::Position,
    NodeKind::Comment,
    NodeKind::CommentGroup,
    NodeKind::Field,
    NodeKind::FieldAlias,
    NodeKind::FieldList,
    NodeKind::BadExpr,
    NodeKind::Ident,
    NodeKind::Ellipsis,
    NodeKind::EllipsisAlias,
    NodeKind::BasicLit,
    NodeKind::FuncLit,
    NodeKind::CompositeLit,
    NodeKind::CompositeLitAlias,
    NodeKind::ParenExpr,
    NodeKind::ParenExprAlias,
    NodeKind::SelectorExpr,
    NodeKind::SelectorExprAlias,
    NodeKind::IndexExpr,
    NodeKind::IndexExprAlias,
    NodeKind::IndexListExpr,
    NodeKind::IndexListExprAlias,
    NodeKind::SliceExpr,
    NodeKind::SliceExprAlias,
    NodeKind::TypeAssertExpr,
    NodeKind::TypeAssertExprAlias,
    NodeKind::CallExpr,
    NodeKind::CallExprAlias,
    NodeKind::StarExpr,
    NodeKind::StarExprAlias,
    NodeKind::UnaryExpr,
    NodeKind::UnaryExprAlias,
    NodeKind::BinaryExpr,
    NodeKind::BinaryExprAlias,
    NodeKind::KeyValueExpr,
    NodeKind::KeyValueExprAlias,
    NodeKind::ArrayType,
    NodeKind::ArrayTypeAlias,
    NodeKind::StructType,
    NodeKind::FuncType,
    NodeKind::InterfaceType,
    NodeKind::MapType,
    NodeKind::MapTypeAlias,
    NodeKind::ChanType,
    NodeKind::ChanTypeAlias,
    NodeKind::BadStmt,
    NodeKind::DeclStmt,
    NodeKind::DeclStmtAlias,
    NodeKind::EmptyStmt,
    NodeKind::LabeledStmt,
    NodeKind::LabeledStmtAlias,
    NodeKind::ExprStmt,
    NodeKind::ExprStmtAlias,
    NodeKind::SendStmt,
    NodeKind::SendStmtAlias,
    NodeKind::IncDecStmt,
    NodeKind::IncDecStmtAlias,
    NodeKind::AssignStmt,
    NodeKind::AssignStmtAlias,
    NodeKind::GoStmt,
    NodeKind::DeferStmt,
    NodeKind::ReturnStmt,
    NodeKind::ReturnStmtAlias,
    NodeKind::BranchStmt,
    NodeKind::BlockStmt,
    NodeKind::BlockStmtAlias,
    NodeKind::IfStmt,
    NodeKind::IfStmtAlias,
    NodeKind::CaseClause,
    NodeKind::CaseClauseAlias,
    NodeKind::SwitchStmt,
    NodeKind::SwitchStmtAlias,
    NodeKind::TypeSwitchStmt,
    NodeKind::TypeSwitchStmtAlias,
    NodeKind::CommClause,
    NodeKind::CommClauseAlias,
    NodeKind::SelectStmt,
    NodeKind::ForStmt,
    NodeKind::ForStmtAlias,
    NodeKind::RangeStmt,
    NodeKind::RangeStmtAlias,
    NodeKind::ImportSpec,
    NodeKind::ValueSpec,
    NodeKind::ValueSpecAlias,
    NodeKind::TypeSpec,
    NodeKind::TypeSpecAlias,
    NodeKind::BadDecl,
    NodeKind::GenDecl,
    NodeKind::GenDeclAlias,
    NodeKind::FuncDecl,
    NodeKind::File,
    NodeKind::FileAlias,
    NodeKind::Package,
];

static NAME_TO_KIND: Lazy<HashMap<&'static str, NodeKind>> = Lazy::new(|| {
    let mut m = HashMap::with_capacity(ALL.len());
    for &kind in ALL {
        m.insert(kind.name(), kind);
    }
    m
});

impl NodeKind {
    /// Frozen numeric id.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Wire discriminant string.
    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::Node => "Node",
            NodeKind::Position => "Position",
            NodeKind::Comment => "Comment",
            NodeKind::CommentGroup => "CommentGroup",
            NodeKind::Field => "Field",
            NodeKind::FieldAlias => "FieldAlias",
            NodeKind::FieldList => "FieldList",
            NodeKind::BadExpr => "BadExpr",
            NodeKind::Ident => "Ident",
            NodeKind::Ellipsis => "Ellipsis",
            NodeKind::EllipsisAlias => "EllipsisAlias",
            NodeKind::BasicLit => "BasicLit",
            NodeKind::FuncLit => "FuncLit",
            NodeKind::CompositeLit => "CompositeLit",
            NodeKind::CompositeLitAlias => "CompositeLitAlias",
            NodeKind::ParenExpr => "ParenExpr",
            NodeKind::ParenExprAlias => "ParenExprAlias",
            NodeKind::SelectorExpr => "SelectorExpr",
            NodeKind::SelectorExprAlias => "SelectorExprAlias",
            NodeKind::IndexExpr => "IndexExpr",
            NodeKind::IndexExprAlias => "IndexExprAlias",
            NodeKind::IndexListExpr => "IndexListExpr",
            NodeKind::IndexListExprAlias => "IndexListExprAlias",
            NodeKind::SliceExpr => "SliceExpr",
            NodeKind::SliceExprAlias => "SliceExprAlias",
            NodeKind::TypeAssertExpr => "TypeAssertExpr",
            NodeKind::TypeAssertExprAlias => "TypeAssertExprAlias",
            NodeKind::CallExpr => "CallExpr",
            NodeKind::CallExprAlias => "CallExprAlias",
            NodeKind::StarExpr => "StarExpr",
            NodeKind::StarExprAlias => "StarExprAlias",
            NodeKind::UnaryExpr => "UnaryExpr",
            NodeKind::UnaryExprAlias => "UnaryExprAlias",
            NodeKind::BinaryExpr => "BinaryExpr",
            NodeKind::BinaryExprAlias => "BinaryExprAlias",
            NodeKind::KeyValueExpr => "KeyValueExpr",
            NodeKind::KeyValueExprAlias => "KeyValueExprAlias",
            NodeKind::ArrayType => "ArrayType",
            NodeKind::ArrayTypeAlias => "ArrayTypeAlias",
            NodeKind::StructType => "StructType",
            NodeKind::FuncType => "FuncType",
            NodeKind::InterfaceType => "InterfaceType",
            NodeKind::MapType => "MapType",
            NodeKind::MapTypeAlias => "MapTypeAlias",
            NodeKind::ChanType => "ChanType",
            NodeKind::ChanTypeAlias => "ChanTypeAlias",
            NodeKind::BadStmt => "BadStmt",
            NodeKind::DeclStmt => "DeclStmt",
            NodeKind::DeclStmtAlias => "DeclStmtAlias",
            NodeKind::EmptyStmt => "EmptyStmt",
            NodeKind::LabeledStmt => "LabeledStmt",
            NodeKind::LabeledStmtAlias => "LabeledStmtAlias",
            NodeKind::ExprStmt => "ExprStmt",
            NodeKind::ExprStmtAlias => "ExprStmtAlias",
            NodeKind::SendStmt => "SendStmt",
            NodeKind::SendStmtAlias => "SendStmtAlias",
            NodeKind::IncDecStmt => "IncDecStmt",
            NodeKind::IncDecStmtAlias => "IncDecStmtAlias",
            NodeKind::AssignStmt => "AssignStmt",
            NodeKind::AssignStmtAlias => "AssignStmtAlias",
            NodeKind::GoStmt => "GoStmt",
            NodeKind::DeferStmt => "DeferStmt",
            NodeKind::ReturnStmt => "ReturnStmt",
            NodeKind::ReturnStmtAlias => "ReturnStmtAlias",
            NodeKind::BranchStmt => "BranchStmt",
            NodeKind::BlockStmt => "BlockStmt",
            NodeKind::BlockStmtAlias => "BlockStmtAlias",
            NodeKind::IfStmt => "IfStmt",
            NodeKind::IfStmtAlias => "IfStmtAlias",
            NodeKind::CaseClause => "CaseClause",
            NodeKind::CaseClauseAlias => "CaseClauseAlias",
            NodeKind::SwitchStmt => "SwitchStmt",
            NodeKind::SwitchStmtAlias => "SwitchStmtAlias",
            NodeKind::TypeSwitchStmt => "TypeSwitchStmt",
            NodeKind::TypeSwitchStmtAlias => "TypeSwitchStmtAlias",
            NodeKind::CommClause => "CommClause",
            NodeKind::CommClauseAlias => "CommClauseAlias",
            NodeKind::SelectStmt => "SelectStmt",
            NodeKind::ForStmt => "ForStmt",
            NodeKind::ForStmtAlias => "ForStmtAlias",
            NodeKind::RangeStmt => "RangeStmt",
            NodeKind::RangeStmtAlias => "RangeStmtAlias",
            NodeKind::ImportSpec => "ImportSpec",
            NodeKind::ValueSpec => "ValueSpec",
            NodeKind::ValueSpecAlias => "ValueSpecAlias",
            NodeKind::TypeSpec => "TypeSpec",
            NodeKind::TypeSpecAlias => "TypeSpecAlias",
            NodeKind::BadDecl => "BadDecl",
            NodeKind::GenDecl => "GenDecl",
            NodeKind::GenDeclAlias => "GenDeclAlias",
            NodeKind::FuncDecl => "FuncDecl",
            NodeKind::File => "File",
            NodeKind::FileAlias => "FileAlias",
            NodeKind::Package => "Package",
        }
    }

    /// Reverse lookup for decode dispatch. `None` means the discriminant is
    /// unknown to this registry and the wire tree cannot be decoded.
    pub fn from_name(name: &str) -> Option<NodeKind> {
        NAME_TO_KIND.get(name).copied()
    }

    /// True for the `Alias` twin of a canonical kind.
    pub const fn is_alias(self) -> bool {
        self.canonical() as u8 != self as u8
    }

    /// Collapses an alias to its canonical twin; canonical kinds map to
    /// themselves.
    pub const fn canonical(self) -> NodeKind {
        match self {
            NodeKind::FieldAlias => NodeKind::Field,
            NodeKind::EllipsisAlias => NodeKind::Ellipsis,
            NodeKind::CompositeLitAlias => NodeKind::CompositeLit,
            NodeKind::ParenExprAlias => NodeKind::ParenExpr,
            NodeKind::SelectorExprAlias => NodeKind::SelectorExpr,
            NodeKind::IndexExprAlias => NodeKind::IndexExpr,
            NodeKind::IndexListExprAlias => NodeKind::IndexListExpr,
            NodeKind::SliceExprAlias => NodeKind::SliceExpr,
            NodeKind::TypeAssertExprAlias => NodeKind::TypeAssertExpr,
            NodeKind::CallExprAlias => NodeKind::CallExpr,
            NodeKind::StarExprAlias => NodeKind::StarExpr,
            NodeKind::UnaryExprAlias => NodeKind::UnaryExpr,
            NodeKind::BinaryExprAlias => NodeKind::BinaryExpr,
            NodeKind::KeyValueExprAlias => NodeKind::KeyValueExpr,
            NodeKind::ArrayTypeAlias => NodeKind::ArrayType,
            NodeKind::MapTypeAlias => NodeKind::MapType,
            NodeKind::ChanTypeAlias => NodeKind::ChanType,
            NodeKind::DeclStmtAlias => NodeKind::DeclStmt,
            NodeKind::LabeledStmtAlias => NodeKind::LabeledStmt,
            NodeKind::ExprStmtAlias => NodeKind::ExprStmt,
            NodeKind::SendStmtAlias => NodeKind::SendStmt,
            NodeKind::IncDecStmtAlias => NodeKind::IncDecStmt,
            NodeKind::AssignStmtAlias => NodeKind::AssignStmt,
            NodeKind::ReturnStmtAlias => NodeKind::ReturnStmt,
            NodeKind::BlockStmtAlias => NodeKind::BlockStmt,
            NodeKind::IfStmtAlias => NodeKind::IfStmt,
            NodeKind::CaseClauseAlias => NodeKind::CaseClause,
            NodeKind::SwitchStmtAlias => NodeKind::SwitchStmt,
            NodeKind::TypeSwitchStmtAlias => NodeKind::TypeSwitchStmt,
            NodeKind::CommClauseAlias => NodeKind::CommClause,
            NodeKind::ForStmtAlias => NodeKind::ForStmt,
            NodeKind::RangeStmtAlias => NodeKind::RangeStmt,
            NodeKind::ValueSpecAlias => NodeKind::ValueSpec,
            NodeKind::TypeSpecAlias => NodeKind::TypeSpec,
            NodeKind::GenDeclAlias => NodeKind::GenDecl,
            NodeKind::FileAlias => NodeKind::File,
            other => other,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_frozen() {
        // Spot checks against the historical numbering; these must never
        // change, only new entries may be appended after Package.
        assert_eq!(NodeKind::Node.id(), 0);
        assert_eq!(NodeKind::Field.id(), 4);
        assert_eq!(NodeKind::Ident.id(), 8);
        assert_eq!(NodeKind::CallExpr.id(), 27);
        assert_eq!(NodeKind::ChanTypeAlias.id(), 45);
        assert_eq!(NodeKind::AssignStmt.id(), 58);
        assert_eq!(NodeKind::ImportSpec.id(), 82);
        assert_eq!(NodeKind::FuncDecl.id(), 90);
        assert_eq!(NodeKind::File.id(), 91);
        assert_eq!(NodeKind::Package.id(), 93);
        assert_eq!(ALL.len(), 94);
    }

    #[test]
    fn ids_are_dense_and_ordered() {
        for (i, &kind) in ALL.iter().enumerate() {
            assert_eq!(kind.id() as usize, i);
        }
    }

    #[test]
    fn names_round_trip() {
        for &kind in ALL {
            assert_eq!(NodeKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(NodeKind::from_name("NotAKind"), None);
    }

    #[test]
    fn aliases_collapse_to_canonical() {
        assert_eq!(NodeKind::CallExprAlias.canonical(), NodeKind::CallExpr);
        assert_eq!(NodeKind::FileAlias.canonical(), NodeKind::File);
        assert_eq!(NodeKind::Ident.canonical(), NodeKind::Ident);
        assert!(NodeKind::CallExprAlias.is_alias());
        assert!(!NodeKind::CallExpr.is_alias());
        // Every alias pairs with a canonical kind of the same payload.
        for &kind in ALL {
            if kind.is_alias() {
                assert!(!kind.canonical().is_alias());
            }
        }
    }
}
