//! File-level conversion behavior: batch fan-out, failure isolation, and
//! atomic output writes.

use std::fs;

use gowire::convert::{self, BatchSummary};
use gowire::Options;

const GOOD_A: &str = "package a\n\nfunc A() int {\n\treturn 1\n}\n";
const GOOD_B: &str = "package b\n\nimport \"fmt\"\n\nfunc B() {\n\tfmt.Println(2)\n}\n";
const BROKEN: &str = "package c\n\nfunc (\n";

#[test]
fn batch_conversion_isolates_failures() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.go"), GOOD_A).unwrap();
    fs::write(dir.path().join("b.go"), GOOD_B).unwrap();
    fs::write(dir.path().join("c.go"), BROKEN).unwrap();
    fs::write(dir.path().join("ignored.txt"), "not go").unwrap();

    let summary =
        convert::convert_dir(dir.path(), out.path(), 2, Options::all()).unwrap();
    assert_eq!(
        summary,
        BatchSummary {
            converted: 2,
            failed: 1,
        }
    );

    assert!(out.path().join("a.go.json").exists());
    assert!(out.path().join("b.go.json").exists());
    // The failing sibling left nothing behind.
    assert!(!out.path().join("c.go.json").exists());
}

#[test]
fn failed_conversion_leaves_no_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.go");
    let output = dir.path().join("broken.json");
    fs::write(&input, BROKEN).unwrap();

    let err = convert::source_to_wire(&input, &output, 2, Options::all());
    assert!(err.is_err());
    assert!(!output.exists());
}

#[test]
fn wire_file_round_trips_through_the_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    let src_path = dir.path().join("in.go");
    let wire_path = dir.path().join("in.json");
    let out_path = dir.path().join("out.go");
    fs::write(&src_path, GOOD_B).unwrap();

    convert::source_to_wire(&src_path, &wire_path, 2, Options::all()).unwrap();
    convert::wire_to_source(&wire_path, &out_path, Options::all()).unwrap();

    assert_eq!(fs::read_to_string(&out_path).unwrap(), GOOD_B);
}

#[test]
fn reformat_is_the_identity_on_canonical_sources() {
    let dir = tempfile::tempdir().unwrap();
    let src_path = dir.path().join("in.go");
    let out_path = dir.path().join("out.go");
    fs::write(&src_path, GOOD_A).unwrap();

    convert::reformat(&src_path, &out_path).unwrap();
    assert_eq!(fs::read_to_string(&out_path).unwrap(), GOOD_A);
}

#[test]
fn compact_and_indented_encodings_carry_the_same_tree() {
    let dir = tempfile::tempdir().unwrap();
    let src_path = dir.path().join("in.go");
    fs::write(&src_path, GOOD_A).unwrap();

    let compact = dir.path().join("compact.json");
    let pretty = dir.path().join("pretty.json");
    convert::source_to_wire(&src_path, &compact, 0, Options::all()).unwrap();
    convert::source_to_wire(&src_path, &pretty, 4, Options::all()).unwrap();

    let a: serde_json::Value =
        serde_json::from_slice(&fs::read(&compact).unwrap()).unwrap();
    let b: serde_json::Value =
        serde_json::from_slice(&fs::read(&pretty).unwrap()).unwrap();
    assert_eq!(a, b);
    assert!(fs::read(&compact).unwrap().len() < fs::read(&pretty).unwrap().len());
}
