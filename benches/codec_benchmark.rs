use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use gowire::ast::AstArena;
use gowire::position::FileSet;
use gowire::{parse_file, print_file, Marshaller, Options, Unmarshaller};

const FIXTURE: &str = r#"package fixture

import (
	"fmt"
	"sort"
)

type record struct {
	key string
	hits int
}

func tally(lines []string) []record {
	counts := map[string]int{}
	for _, line := range lines {
		counts[line]++
	}
	out := make([]record, 0, len(counts))
	for key, hits := range counts {
		out = append(out, record{key: key, hits: hits})
	}
	sort.Slice(out, func(i, j int) bool { return out[i].hits > out[j].hits })
	return out
}

func main() {
	for _, r := range tally([]string{"a", "b", "a"}) {
		fmt.Println(r.key, r.hits)
	}
}
"#;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(FIXTURE.len() as u64));
    group.bench_function("file", |b| {
        b.iter(|| {
            let mut fset = FileSet::new();
            let mut arena = AstArena::new();
            parse_file(&mut fset, &mut arena, "bench.go", black_box(FIXTURE)).unwrap()
        })
    });
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut fset = FileSet::new();
    let mut arena = AstArena::new();
    let file = parse_file(&mut fset, &mut arena, "bench.go", FIXTURE).unwrap();

    let mut group = c.benchmark_group("encode");
    group.bench_function("all_options", |b| {
        b.iter(|| {
            let mut m = Marshaller::new(Options::all(), &fset);
            serde_json::to_string(&m.marshal_file(black_box(&arena), black_box(&file))).unwrap()
        })
    });
    group.bench_function("bare", |b| {
        b.iter(|| {
            let mut m = Marshaller::new(Options::none(), &fset);
            serde_json::to_string(&m.marshal_file(black_box(&arena), black_box(&file))).unwrap()
        })
    });
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut fset = FileSet::new();
    let mut arena = AstArena::new();
    let file = parse_file(&mut fset, &mut arena, "bench.go", FIXTURE).unwrap();
    let wire =
        serde_json::to_value(Marshaller::new(Options::all(), &fset).marshal_file(&arena, &file))
            .unwrap();

    let mut group = c.benchmark_group("decode");
    group.bench_function("all_options", |b| {
        b.iter(|| {
            Unmarshaller::new(Options::all())
                .unmarshal_file(black_box(&wire))
                .unwrap()
        })
    });
    group.finish();
}

fn bench_print(c: &mut Criterion) {
    let mut fset = FileSet::new();
    let mut arena = AstArena::new();
    let file = parse_file(&mut fset, &mut arena, "bench.go", FIXTURE).unwrap();

    c.bench_function("print", |b| {
        b.iter(|| print_file(black_box(&arena), black_box(&fset), black_box(&file)))
    });
}

criterion_group!(benches, bench_parse, bench_encode, bench_decode, bench_print);
criterion_main!(benches);
