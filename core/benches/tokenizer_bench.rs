use criterion::{criterion_group, criterion_main, Criterion};
use splcore::tokenizer::{strip_conditional_lines, tokenize};

const SOURCE: &str = r#"
#include <stdio.h>
#ifdef HAVE_LOGGING
static int logging_level = 3;
#endif
int log_write(const char *msg) {
    if (logging_level > 2) { fprintf(stderr, "%s\n", msg); }
    return 0;
}
"#;

fn bench_tokenize(c: &mut Criterion) {
    let text = SOURCE.repeat(200);
    c.bench_function("tokenize_c_source", |b| b.iter(|| tokenize(&text)));
    c.bench_function("strip_ifdefs_then_tokenize", |b| {
        b.iter(|| tokenize(&strip_conditional_lines(&text)))
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
