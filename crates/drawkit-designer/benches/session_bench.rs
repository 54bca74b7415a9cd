use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drawkit_core::{Point, PointerEvent};
use drawkit_designer::animation::AnimationKind;
use drawkit_designer::session::Session;

fn populated(count: usize) -> Session {
    let mut session = Session::default();
    session.activate_tool("rectangle").ok();
    for i in 0..count {
        let x = (i % 10) as f64 * 50.0;
        let y = (i / 10) as f64 * 50.0;
        let from = Point::new(x, y);
        let to = Point::new(x + 40.0, y + 40.0);
        session.pointer_down(&PointerEvent::down(from)).ok();
        session.pointer_up(&PointerEvent::moved(from, from, to)).ok();
    }
    session
}

fn bench_animation_tick(c: &mut Criterion) {
    let mut session = populated(100);
    let ids = session.canvas().top_level();
    session.animate(&ids, AnimationKind::Rotate).ok();
    session.start_animations(&ids).ok();

    c.bench_function("tick_100_rotating", |b| {
        b.iter(|| session.advance(black_box(1.0 / 60.0)))
    });
}

fn bench_group_tick(c: &mut Criterion) {
    let mut session = populated(100);
    let ids = session.canvas().top_level();
    let group = session.group(&ids).ok().flatten();
    if let Some(group) = group {
        session.animate(&[group], AnimationKind::Bounce).ok();
        session.start_animations(&[group]).ok();
    }

    c.bench_function("tick_grouped_bounce", |b| {
        b.iter(|| session.advance(black_box(1.0 / 60.0)))
    });
}

fn bench_hit_test(c: &mut Criterion) {
    let session = populated(100);
    c.bench_function("hit_test_100", |b| {
        b.iter(|| session.canvas().hit(black_box(Point::new(245.0, 245.0))))
    });
}

criterion_group!(benches, bench_animation_tick, bench_group_tick, bench_hit_test);
criterion_main!(benches);
