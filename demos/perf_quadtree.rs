use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tilesweep::*;

#[derive(Copy, Clone)]
struct Actor {
    id: u32,
    rect: Rect,
}

impl SpatialItem for Actor {
    type Id = u32;
    fn id(&self) -> u32 { self.id }
    fn rect(&self) -> Rect { self.rect }
}

fn main() {
    let room = Rect::new(0.0, 0.0, 800.0, 600.0);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let n_actors = 5000u32;
    let actors: Vec<Actor> = (0..n_actors)
        .map(|id| Actor { id, rect: Rect::new(rng.gen_range(0.0..790.0), rng.gen_range(0.0..590.0), 10.0, 10.0) })
        .collect();
    let queries: Vec<Rect> = (0..1000)
        .map(|_| Rect::new(rng.gen_range(0.0..700.0), rng.gen_range(0.0..500.0), 100.0, 100.0))
        .collect();

    // Build
    let t0 = Instant::now();
    let mut tree = Quadtree::new(room);
    for a in &actors { if tree.insert(*a).is_err() { println!("rejected {}", a.id); } }
    let build = t0.elapsed().as_secs_f64();
    let stats = tree.stats();
    println!("build: items={} nodes={} leaves={} deepest={} secs={:.4}", stats.items, stats.nodes, stats.leaves, stats.deepest, build);

    // Brute force
    let t1 = Instant::now();
    let mut hits_bf = 0usize;
    for q in &queries { hits_bf += actors.iter().filter(|a| a.rect.overlaps(q)).count(); }
    let bf = t1.elapsed().as_secs_f64();
    println!("brute_force: queries={} secs={:.4} throughput={:.0} q/s hits={}", queries.len(), bf, queries.len() as f64 / bf, hits_bf);

    // Quadtree
    let t2 = Instant::now();
    let mut hits_qt = 0usize;
    let mut buf = Vec::new();
    for q in &queries { tree.search_into(*q, &mut buf); hits_qt += buf.len(); }
    let qt = t2.elapsed().as_secs_f64();
    println!("quadtree: queries={} secs={:.4} throughput={:.0} q/s hits={} speedup={:.1}x", queries.len(), qt, queries.len() as f64 / qt, hits_qt, bf / qt);
    assert_eq!(hits_bf, hits_qt);

    // Per-tick relocation
    let t3 = Instant::now();
    let ticks = 60;
    let mut moved = actors.clone();
    for _ in 0..ticks {
        for a in moved.iter_mut() {
            let step = glam::Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
            a.rect = a.rect.translated(step).clamped_within(&room);
            if tree.relocate(*a).is_err() { println!("lost {}", a.id); }
        }
    }
    let rel = t3.elapsed().as_secs_f64();
    println!("relocate: ticks={} actors={} secs={:.4} per_tick_ms={:.3}", ticks, n_actors, rel, rel * 1000.0 / ticks as f64);
}
