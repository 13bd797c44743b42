use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use htmlsanitizer::{is_sanitized, sanitizer, Policy, Sanitizer, SanitizerOptions};

const CLEAN_COMMENT: &str = r#"<p>Thanks for the write-up! See <a href="https://example.com/notes">my notes</a> and
<b>bold</b> <i>claims</i>.</p><ul><li>one</li><li>two</li></ul><blockquote>quoted</blockquote>"#;

const HOSTILE_COMMENT: &str = r#"<div onclick="steal()"><script>alert(document.cookie)</script>
<img src="javascript:alert(1)" onerror="alert(2)"><a href="http://example.com" style="width: expression(x)">x</a>
<!-- hidden --><iframe src="http://evil.example"></iframe><td>orphan</td><foo>unknown</foo></div>"#;

fn document(fragment: &str, copies: usize) -> String {
    fragment.repeat(copies)
}

fn bench_sanitize_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("sanitize");

    let test_cases = [
        ("clean", CLEAN_COMMENT, 1),
        ("clean", CLEAN_COMMENT, 100),
        ("clean", CLEAN_COMMENT, 1_000),
        ("hostile", HOSTILE_COMMENT, 1),
        ("hostile", HOSTILE_COMMENT, 100),
        ("hostile", HOSTILE_COMMENT, 1_000),
    ];

    for (name, fragment, copies) in test_cases {
        let html = document(fragment, copies);

        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new(name, copies), &html, |b, html| {
            b.iter(|| std::hint::black_box(sanitizer(std::hint::black_box(html))));
        });
    }

    group.finish();
}

fn bench_validity_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_sanitized");

    for (name, fragment) in [("clean", CLEAN_COMMENT), ("hostile", HOSTILE_COMMENT)] {
        let html = document(fragment, 100);

        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("check", name), &html, |b, html| {
            b.iter(|| std::hint::black_box(is_sanitized(std::hint::black_box(html))));
        });
    }

    group.finish();
}

fn bench_custom_policy(c: &mut Criterion) {
    let policy = Policy::from_tags(&["p", "b", "i", "a"], &["script", "style"]).unwrap();
    let options = SanitizerOptions::builder().max_violations_tracked(10).build();
    let sanitizer = Sanitizer::new(policy, options).unwrap();
    let html = document(HOSTILE_COMMENT, 100);

    let mut group = c.benchmark_group("policy");
    group.throughput(Throughput::Bytes(html.len() as u64));
    group.bench_function("narrow_whitelist", |b| {
        b.iter(|| std::hint::black_box(sanitizer.sanitize(std::hint::black_box(&html))));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_sanitize_by_size,
    bench_validity_check,
    bench_custom_policy
);
criterion_main!(benches);
