//! Lexer benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use jsfront_parser::{Lexer, TokenKind};

const SAMPLE_SOURCE: &str = r#"
// Sample JavaScript code for benchmarking
function fibonacci(n) {
    if (n <= 1) return n;
    return fibonacci(n - 1) + fibonacci(n - 2);
}

class Calculator {
    #result = 0;

    add(x, y) {
        return x + y;
    }

    multiply(x, y) {
        return x * y;
    }

    async fetchData(url) {
        const response = await fetch(url);
        return response.json();
    }
}

const calc = new Calculator();
const numbers = [1, 2, 3, 4, 5].map(n => n * 2);
const { a, b, ...rest } = { a: 1, b: 2, c: 3, d: 4 };
const hex = 0xFF_FF, big = 123n, ratio = 1.5e-3;
const message = 'it\'s \u{1F600}';
"#;

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");
    group.throughput(Throughput::Bytes(SAMPLE_SOURCE.len() as u64));

    group.bench_function("sample", |b| {
        b.iter(|| {
            let mut lexer = Lexer::new(black_box(SAMPLE_SOURCE));
            let mut count = 0usize;
            while let Ok(token) = lexer.next_token() {
                if matches!(token.kind, TokenKind::Eof) {
                    break;
                }
                count += 1;
            }
            count
        });
    });

    let identifiers = "alpha beta gamma delta épsilon ζeta ".repeat(200);
    group.throughput(Throughput::Bytes(identifiers.len() as u64));
    group.bench_function("identifiers", |b| {
        b.iter(|| {
            let mut lexer = Lexer::new(black_box(&identifiers));
            while let Ok(token) = lexer.next_token() {
                if matches!(token.kind, TokenKind::Eof) {
                    break;
                }
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_lexer);
criterion_main!(benches);
