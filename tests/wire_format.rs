//! Wire-level contracts: discriminants, alias tags, RefIds, token strings,
//! and failure modes for corrupt input.

use gowire::ast::AstArena;
use gowire::position::{FileSet, NO_POS};
use gowire::{parse_file, print_file, Error, Marshaller, Options, Unmarshaller};
use serde_json::{json, Value};

fn encode(src: &str, options: Options) -> Value {
    let mut fset = FileSet::new();
    let mut arena = AstArena::new();
    let file = parse_file(&mut fset, &mut arena, "main.go", src)
        .unwrap_or_else(|e| panic!("parse failed: {e}"));
    let wire = Marshaller::new(options, &fset).marshal_file(&arena, &file);
    serde_json::to_value(wire).expect("wire tree serializes")
}

fn decode_text(value: &Value, options: Options) -> String {
    let decoded = Unmarshaller::new(options)
        .unmarshal_file(value)
        .unwrap_or_else(|e| panic!("decode failed: {e}"));
    print_file(&decoded.arena, &decoded.fset, &decoded.file)
}

#[test]
fn unknown_discriminant_is_fatal() {
    let wire = json!({ "NodeType": "Widget", "Name": { "NodeType": "Ident", "Name": "p" } });
    let err = Unmarshaller::new(Options::none())
        .unmarshal_file(&wire)
        .unwrap_err();
    match err {
        Error::UnknownNodeKind(name) => assert_eq!(name, "Widget"),
        other => panic!("expected UnknownNodeKind, got {other:?}"),
    }
}

#[test]
fn unknown_discriminant_inside_the_tree_is_fatal() {
    let mut wire = encode("package p\n\nvar x = 1\n", Options::none());
    wire["Decls"][0]["Specs"][0]["Values"][0]["NodeType"] = json!("FrobExpr");
    let err = Unmarshaller::new(Options::none())
        .unmarshal_file(&wire)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownNodeKind(name) if name == "FrobExpr"));
}

#[test]
fn fabricated_token_string_is_fatal() {
    let mut wire = encode("package p\n\nvar x = a + b\n", Options::none());
    wire["Decls"][0]["Specs"][0]["Values"][0]["Op"] = json!("@@unknown@@");
    let err = Unmarshaller::new(Options::none())
        .unmarshal_file(&wire)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedToken(tok) if tok == "@@unknown@@"));
}

#[test]
fn alias_tags_decode_like_their_canonical_twins() {
    let src = "package p\n\nfunc f() {\n\tg()\n}\n";
    let canonical = encode(src, Options::none());

    let mut aliased = canonical.clone();
    aliased["Decls"][0]["Body"]["List"][0]["NodeType"] = json!("ExprStmtAlias");
    aliased["Decls"][0]["Body"]["List"][0]["X"]["NodeType"] = json!("CallExprAlias");
    aliased["NodeType"] = json!("FileAlias");

    assert_eq!(
        decode_text(&canonical, Options::none()),
        decode_text(&aliased, Options::none()),
    );
}

#[test]
fn references_off_emits_no_ref_ids() {
    fn assert_no_ref_id(v: &Value) {
        match v {
            Value::Object(m) => {
                assert!(!m.contains_key("RefId"), "unexpected RefId in {m:?}");
                m.values().for_each(assert_no_ref_id);
            }
            Value::Array(items) => items.iter().for_each(assert_no_ref_id),
            _ => {}
        }
    }
    let options = Options {
        references: false,
        ..Options::all()
    };
    assert_no_ref_id(&encode(
        "package p\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(1)\n}\n",
        options,
    ));
}

#[test]
fn ref_ids_are_monotonic_and_start_at_one() {
    fn collect(v: &Value, out: &mut Vec<u64>) {
        match v {
            Value::Object(m) => {
                if let Some(id) = m.get("RefId").and_then(Value::as_u64) {
                    out.push(id);
                }
                m.values().for_each(|v| collect(v, out));
            }
            Value::Array(items) => items.iter().for_each(|v| collect(v, out)),
            _ => {}
        }
    }
    let wire = encode("package p\n\nvar x, y = 1, 2\n", Options::all());
    let mut ids = Vec::new();
    collect(&wire, &mut ids);
    assert!(!ids.is_empty());
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.first(), Some(&1));
    assert_eq!(*sorted.last().unwrap(), sorted.len() as u64);
}

#[test]
fn repeated_ref_id_resolves_to_the_first_decoded_instance() {
    let wire = json!({
        "NodeType": "File",
        "Name": { "NodeType": "Ident", "Name": "p" },
        "Unresolved": [
            { "NodeType": "Ident", "RefId": 7, "Name": "a" },
            { "NodeType": "Ident", "RefId": 7, "Name": "ignored" },
        ],
    });
    let decoded = Unmarshaller::new(Options::all()).unmarshal_file(&wire).unwrap();
    assert_eq!(decoded.file.unresolved[0], decoded.file.unresolved[1]);
    assert_eq!(
        decoded.arena.ident_name(decoded.file.unresolved[0]),
        "a",
        "the redundant re-serialization of a repeat occurrence is discarded",
    );
}

#[test]
fn position_miss_degrades_to_the_sentinel() {
    // Offset far beyond the lazy registration capacity of the decode-side
    // file: resolution misses, nothing fails.
    let wire = json!({
        "NodeType": "File",
        "Package": { "Filename": "ghost.go", "Offset": 999_999_999u64 },
        "Name": {
            "NodeType": "Ident",
            "NamePos": { "Filename": "ghost.go", "Offset": 8 },
            "Name": "p",
        },
    });
    let decoded = Unmarshaller::new(Options::all()).unmarshal_file(&wire).unwrap();
    assert_eq!(decoded.file.package_pos, NO_POS);

    // The in-range position resolved into the session-local index.
    let name_pos = decoded.arena.ident_pos(decoded.file.name);
    assert_ne!(name_pos, NO_POS);
    let resolved = decoded.fset.position(name_pos).unwrap();
    assert_eq!((resolved.filename.as_str(), resolved.offset), ("ghost.go", 8));
}

#[test]
fn positions_rehost_into_a_fresh_index_per_session() {
    let src = "package p\n\nvar x = 1\n";
    let wire = encode(src, Options::all());
    let first = Unmarshaller::new(Options::all()).unmarshal_file(&wire).unwrap();
    let second = Unmarshaller::new(Options::all()).unmarshal_file(&wire).unwrap();

    // Same portable positions, independent indices.
    let a = first.fset.position(first.file.package_pos).unwrap();
    let b = second.fset.position(second.file.package_pos).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.filename, "main.go");
    assert_eq!(a.offset, 0);
}

#[test]
fn malformed_nodes_are_reported_as_such() {
    let missing_name = json!({ "NodeType": "File" });
    assert!(matches!(
        Unmarshaller::new(Options::none()).unmarshal_file(&missing_name),
        Err(Error::Malformed(_)),
    ));

    let wrong_child_kind = json!({
        "NodeType": "File",
        "Name": { "NodeType": "BasicLit", "Kind": "INT", "Value": "1" },
    });
    assert!(matches!(
        Unmarshaller::new(Options::none()).unmarshal_file(&wrong_child_kind),
        Err(Error::Malformed(_)),
    ));

    let not_an_object = json!(["File"]);
    assert!(matches!(
        Unmarshaller::new(Options::none()).unmarshal_file(&not_an_object),
        Err(Error::Malformed(_)),
    ));
}

#[test]
fn decode_configuration_is_independent_of_encode_configuration() {
    let src = "package p\n\n// Documented.\nfunc F() {}\n";
    let wire = encode(src, Options::all());

    // Decoding with everything off still reconstructs the structure.
    let decoded = Unmarshaller::new(Options::none()).unmarshal_file(&wire).unwrap();
    assert!(decoded.file.comments.is_empty());
    assert_eq!(decoded.file.package_pos, NO_POS);
    assert_eq!(decoded.file.decls.len(), 1);
}

#[test]
fn wire_positions_are_filename_offset_pairs() {
    let wire = encode("package p\n", Options::all());
    let pos = &wire["Package"];
    assert_eq!(pos["Filename"], "main.go");
    assert_eq!(pos["Offset"], 0);
    assert!(pos.get("Line").is_none(), "wire positions carry no line data");
}
