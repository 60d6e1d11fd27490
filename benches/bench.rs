use contactor::{narrow::swept, *};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A grid of squares, every other one moving right fast enough to be swept.
fn field(side: usize) -> CollisionManager {
   let mut manager = CollisionManager::new();
   for i in 0..side {
      for j in 0..side {
         let mut body = Body::new(
            vec![Collider::rect(0.0, 0.0, 8.0, 8.0, "hull"), Collider::circle(2.0, 4.0, 4.0, "core")],
            Vec2::new(i as Fp * 10.0, j as Fp * 10.0),
         );
         if (i + j) % 2 == 0 {
            body = body.with_velocity(Vec2::new(30.0, 0.0));
         }
         manager.register(body.into_handle()).unwrap();
      }
   }
   manager
}

fn criterion_benchmark(c: &mut Criterion) {
   let r1: Shape = Rect::new(0.0, 0.0, 1.0, 1.0).into();
   let r2: Shape = Rect::new(0.5, 0.5, 1.0, 1.0).into();
   let ci: Shape = Circle::new(0.5, 1.2, 1.2).into();
   c.bench_function("rect rect intersects", |b| b.iter(|| intersects(black_box(&r1), black_box(&r2))));
   c.bench_function("rect circle intersects", |b| b.iter(|| intersects(black_box(&r1), black_box(&ci))));

   let mover = Rect::new(0.0, 0.0, 10.0, 10.0);
   let target = Rect::new(20.0, 0.0, 10.0, 10.0);
   c.bench_function("rect sweep", |b| b.iter(|| swept::sweep_test(
      black_box(&mover),
      black_box(Vec2::new(50.0, 5.0)),
      black_box(&target))));

   let mut manager = field(16);
   c.bench_function("detect 256 bodies", |b| b.iter(|| manager.detect(black_box(1.0 / 60.0)).is_ok()));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
