use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use paneldue_communication::protocol::{frame_line, LineFramer, MessageValidator};

fn framed_stream(lines: usize) -> Vec<u8> {
    let mut stream = String::new();
    for seq in 1..=lines {
        stream.push_str(&frame_line(seq as i64, "G1 X10.5 Y-3.25 F3000"));
        stream.push('\n');
    }
    stream.into_bytes()
}

fn bench_validate(c: &mut Criterion) {
    let line = frame_line(42, "M408 S0");
    c.bench_function("validate_line", |b| {
        b.iter(|| {
            let mut validator = MessageValidator::new();
            validator.validate(black_box(&line))
        })
    });
}

fn bench_receive_path(c: &mut Criterion) {
    let stream = framed_stream(500);
    let mut group = c.benchmark_group("receive_path");
    group.throughput(Throughput::Bytes(stream.len() as u64));

    for chunk_size in [16usize, 64, 4096] {
        group.bench_function(format!("chunks_of_{}", chunk_size), |b| {
            b.iter(|| {
                let mut framer = LineFramer::new();
                let mut validator = MessageValidator::new();
                let mut accepted = 0;
                for chunk in stream.chunks(chunk_size) {
                    for line in framer.push(black_box(chunk)) {
                        if validator.validate(&line).is_accepted() {
                            accepted += 1;
                        }
                    }
                }
                accepted
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_validate, bench_receive_path);
criterion_main!(benches);
