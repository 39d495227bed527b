//! End-to-end codec properties: parse → encode → decode → print.

use gowire::ast::{AstArena, Decl, Spec};
use gowire::position::{FileSet, NO_POS};
use gowire::{parse_file, print_file, DecodedFile, Marshaller, Options, Unmarshaller};
use serde_json::Value;

fn parse(src: &str) -> (FileSet, AstArena, gowire::ast::File) {
    let mut fset = FileSet::new();
    let mut arena = AstArena::new();
    let file = parse_file(&mut fset, &mut arena, "main.go", src)
        .unwrap_or_else(|e| panic!("parse failed: {e}"));
    (fset, arena, file)
}

fn encode(src: &str, options: Options) -> Value {
    let (fset, arena, file) = parse(src);
    let wire = Marshaller::new(options, &fset).marshal_file(&arena, &file);
    serde_json::to_value(wire).expect("wire tree serializes")
}

fn encode_string(src: &str, options: Options) -> String {
    let (fset, arena, file) = parse(src);
    let wire = Marshaller::new(options, &fset).marshal_file(&arena, &file);
    serde_json::to_string(&wire).expect("wire tree serializes")
}

fn decode(value: &Value, options: Options) -> DecodedFile {
    Unmarshaller::new(options)
        .unmarshal_file(value)
        .unwrap_or_else(|e| panic!("decode failed: {e}"))
}

fn round_trip(src: &str, options: Options) -> String {
    let decoded = decode(&encode(src, options), options);
    print_file(&decoded.arena, &decoded.fset, &decoded.file)
}

/// A canonical-form source exercising most of the node taxonomy.
const KITCHEN_SINK: &str = r#"package sink

import (
	"fmt"
	"os"
)

// answer is the only constant here.
const answer = 42

const (
	a = iota
	b
	c
)

var registry = map[string][]int{"a": {1, 2}}

type Alias = fmt.Stringer

type point struct {
	x, y int
	tag string
}

type Stringer interface {
	String() string
}

func (p *point) norm() int {
	return p.x + p.y
}

func scale(p *point, factor int, rest ...int) (int, error) {
	sum := p.x * factor + p.y
	for _, extra := range rest {
		sum += extra
	}
	if sum < 0 {
		return -sum, nil
	} else if sum == 0 {
		goto done
	}
	for i := 0; i < factor; i++ {
		switch {
		case i % 2 == 0:
			sum++
		default:
			sum--
		}
	}
done:
	return sum, nil
}

func pump(ch chan<- int, done <-chan struct{}) {
	defer close(ch)
	go fmt.Println("started")
	for {
		select {
		case ch <- 1:
		case <-done:
			return
		}
	}
}

func classify(v any) string {
	switch t := v.(type) {
	case int:
		_ = t
		return "int"
	case *point, []byte:
		return "pointer or bytes"
	default:
		return "other"
	}
}

func main() {
	p := point{x: 1, y: 2}
	n, err := scale(&p, answer, 1, 2, 3)
	if err != nil {
		os.Exit(1)
	}
	fmt.Println(n, registry["a"][0:1], classify(p))
}
"#;

#[test]
fn round_trip_is_byte_identical_with_positions() {
    assert_eq!(round_trip(KITCHEN_SINK, Options::all()), KITCHEN_SINK);
}

#[test]
fn round_trip_without_positions_matches_the_reformat_baseline() {
    let (fset, arena, file) = parse(KITCHEN_SINK);
    let baseline = print_file(&arena, &fset, &file);

    let options = Options {
        positions: false,
        ..Options::all()
    };
    assert_eq!(round_trip(KITCHEN_SINK, options), baseline);
}

#[test]
fn print_is_a_fixed_point() {
    let (fset, arena, file) = parse(KITCHEN_SINK);
    let once = print_file(&arena, &fset, &file);
    let (fset2, arena2, file2) = parse(&once);
    let twice = print_file(&arena2, &fset2, &file2);
    assert_eq!(once, twice);
}

#[test]
fn encoding_is_deterministic() {
    let first = encode_string(KITCHEN_SINK, Options::all());
    let second = encode_string(KITCHEN_SINK, Options::all());
    assert_eq!(first, second);

    // A fresh session over the same tree must also agree byte for byte.
    let (fset, arena, file) = parse(KITCHEN_SINK);
    let one = serde_json::to_string(&Marshaller::new(Options::all(), &fset).marshal_file(&arena, &file))
        .unwrap();
    let two = serde_json::to_string(&Marshaller::new(Options::all(), &fset).marshal_file(&arena, &file))
        .unwrap();
    assert_eq!(one, two);
}

#[test]
fn shared_import_specs_decode_to_the_same_instance() {
    let src = "package p\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n\nfunc main() {\n\tfmt.Println(os.Args)\n}\n";
    let decoded = decode(&encode(src, Options::all()), Options::all());

    let Decl::Gen(gen) = &decoded.arena.decls[decoded.file.decls[0]] else {
        panic!("expected import declaration");
    };
    let Spec::Import(first) = &decoded.arena.specs[gen.specs[0]] else {
        panic!("expected import spec");
    };
    let Spec::Import(second) = &decoded.arena.specs[gen.specs[1]] else {
        panic!("expected import spec");
    };

    // The flattened table entries are the very same arena slots as the
    // specs inside the declaration.
    assert_eq!(decoded.file.imports, vec![*first, *second]);
}

#[test]
fn identity_is_not_reconstructed_without_references() {
    let src = "package p\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(1)\n}\n";
    let options = Options {
        references: false,
        ..Options::all()
    };
    let decoded = decode(&encode(src, options), options);

    let Decl::Gen(gen) = &decoded.arena.decls[decoded.file.decls[0]] else {
        panic!("expected import declaration");
    };
    let Spec::Import(in_decl) = &decoded.arena.specs[gen.specs[0]] else {
        panic!("expected import spec");
    };
    assert_eq!(decoded.file.imports.len(), 1);
    assert_ne!(decoded.file.imports[0], *in_decl);
}

#[test]
fn shared_doc_comment_groups_decode_to_the_same_instance() {
    let src = "package p\n\n// F is documented.\nfunc F() {}\n";
    let decoded = decode(&encode(src, Options::all()), Options::all());

    let Decl::Func(f) = &decoded.arena.decls[decoded.file.decls[0]] else {
        panic!("expected func declaration");
    };
    let doc = f.doc.expect("doc survives the round trip");
    assert_eq!(decoded.file.comments, vec![doc]);
}

#[test]
fn positions_off_yields_the_sentinel_everywhere() {
    let options = Options {
        positions: false,
        ..Options::all()
    };
    let decoded = decode(&encode(KITCHEN_SINK, options), Options::all());

    assert_eq!(decoded.file.package_pos, NO_POS);
    assert_eq!(decoded.arena.ident_pos(decoded.file.name), NO_POS);
    for (id, _) in decoded.arena.exprs.iter() {
        assert_eq!(decoded.arena.expr_pos(id), NO_POS);
        assert_eq!(decoded.arena.expr_end(id), NO_POS);
    }
    for (id, _) in decoded.arena.stmts.iter() {
        assert_eq!(decoded.arena.stmt_pos(id), NO_POS);
    }
}

#[test]
fn one_line_function_scenario() {
    let src = "package p\nfunc f(x int) int { return x }\n";
    let wire = encode(src, Options::all());

    assert_eq!(wire["NodeType"], "File");
    let decl = &wire["Decls"][0];
    assert_eq!(decl["NodeType"], "FuncDecl");
    let field = &decl["Type"]["Params"]["List"][0];
    assert_eq!(field["Names"][0]["NodeType"], "Ident");
    assert_eq!(field["Names"][0]["Name"], "x");
    assert_eq!(field["Type"]["NodeType"], "Ident");
    assert_eq!(field["Type"]["Name"], "int");

    let decoded = decode(&wire, Options::all());
    assert_eq!(
        print_file(&decoded.arena, &decoded.fset, &decoded.file),
        src
    );
}

#[test]
fn package_roots_round_trip_with_files_in_name_order() {
    use gowire::ast::Package;
    use std::collections::BTreeMap;

    let mut fset = FileSet::new();
    let mut arena = AstArena::new();
    let file_a = parse_file(&mut fset, &mut arena, "a.go", "package demo\n\nfunc A() {}\n").unwrap();
    let file_b = parse_file(&mut fset, &mut arena, "b.go", "package demo\n\nfunc B() {}\n").unwrap();

    let mut files = BTreeMap::new();
    files.insert("b.go".to_string(), file_b);
    files.insert("a.go".to_string(), file_a);
    let pkg = Package {
        name: "demo".to_string(),
        files,
    };

    let wire = Marshaller::new(Options::all(), &fset).marshal_package(&arena, &pkg);
    let value = serde_json::to_value(wire).unwrap();
    assert_eq!(value["NodeType"], "Package");
    assert_eq!(value["Name"], "demo");
    let keys: Vec<&String> = value["Files"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["a.go", "b.go"]);

    let decoded = Unmarshaller::new(Options::all())
        .unmarshal_package(&value)
        .unwrap();
    assert_eq!(decoded.package.name, "demo");
    let text = print_file(&decoded.arena, &decoded.fset, &decoded.package.files["a.go"]);
    assert_eq!(text, "package demo\n\nfunc A() {}\n");
}

#[test]
fn comments_can_be_dropped_at_decode_time() {
    let src = "package p\n\n// F is documented.\nfunc F() {}\n";
    let options = Options {
        comments: false,
        ..Options::all()
    };
    let decoded = decode(&encode(src, Options::all()), options);
    assert!(decoded.file.comments.is_empty());
    let Decl::Func(f) = &decoded.arena.decls[decoded.file.decls[0]] else {
        panic!("expected func declaration");
    };
    assert!(f.doc.is_none());
}
