//! Criterion benchmarks for the Reversi line codec.
//!
//! The receive loop decodes every server line on its own thread before the
//! board lock is taken, so decode cost adds directly to notification latency.
//!
//! Run with:
//! ```bash
//! cargo bench --package reversi-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reversi_core::protocol::codec::{decode_message, encode_event, encode_move};
use reversi_core::protocol::messages::ProtocolEvent;
use reversi_core::{CellMark, CellUpdate, Outcome, TurnOwner, MAX_DIMENSION};

// ── Message fixtures ──────────────────────────────────────────────────────────

/// A placement that flips a full row on the largest board.
fn make_wide_flip() -> ProtocolEvent {
    ProtocolEvent::CellsUpdated(
        (0..MAX_DIMENSION)
            .map(|col| CellUpdate::new(MAX_DIMENSION / 2, col, CellMark::PlayerTwo))
            .collect(),
    )
}

fn fixtures() -> Vec<(&'static str, ProtocolEvent)> {
    vec![
        ("Connect", ProtocolEvent::DimensionAnnounced(8)),
        (
            "MoveMade(1)",
            ProtocolEvent::CellsUpdated(vec![CellUpdate::new(3, 4, CellMark::PlayerOne)]),
        ),
        ("MoveMade(26)", make_wide_flip()),
        ("Turn", ProtocolEvent::TurnChanged(TurnOwner::Local)),
        ("GameWon", ProtocolEvent::GameOver(Outcome::Won)),
        (
            "Error",
            ProtocolEvent::ProtocolError("move (2, 2) does not capture anything".to_string()),
        ),
    ]
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_message");
    for (name, event) in fixtures() {
        let line = encode_event(&event).expect("encode must succeed for benchmark setup");
        group.bench_with_input(BenchmarkId::new("msg", name), &line, |b, line| {
            b.iter(|| decode_message(black_box(line)).expect("decode must succeed"))
        });
    }
    group.finish();
}

fn bench_encode_move(c: &mut Criterion) {
    c.bench_function("encode_move", |b| {
        b.iter(|| encode_move(black_box(3), black_box(4)).expect("encode must succeed"))
    });
}

criterion_group!(benches, bench_decode, bench_encode_move);
criterion_main!(benches);
