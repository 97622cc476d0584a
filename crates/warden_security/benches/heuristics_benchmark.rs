//! Benchmark for the per-tick detection pass.
//!
//! TARGET: 100 players per tick well under one millisecond
//!
//! Run with: cargo bench --package warden_security --bench heuristics_benchmark

#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use warden_security::combat::{self, FiredProjectile, ProjectileHit, TrackedProjectile};
use warden_security::mock::{MockGeometrySource, MockSessionControl};
use warden_security::{FrameTiming, Monitor, PlayerSnapshot, WardenConfig};
use warden_shared::Vec3;

/// Grid of players 5m apart, every other row behind a wall.
fn populated_world(players: u64) -> Arc<MockGeometrySource> {
    let world = Arc::new(MockGeometrySource::new());
    for id in 0..players {
        #[allow(clippy::cast_precision_loss)]
        let position = Vec3::new((id % 10) as f32 * 5.0, 0.0, (id / 10) as f32 * 5.0);
        world.upsert_player(PlayerSnapshot::new(id, format!("player_{id}"), position));
    }
    for row in (0..players / 10).step_by(2) {
        #[allow(clippy::cast_precision_loss)]
        let z = row as f32 * 5.0 + 2.5;
        world.add_wall(Vec3::new(22.5, 2.0, z), Vec3::new(25.0, 2.0, 0.2));
    }
    world
}

fn benchmark_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("player_tick");

    for players in [10_u64, 100] {
        let world = populated_world(players);
        let config = WardenConfig {
            kick_on_violation: false,
            log_violations: false,
            ..WardenConfig::default()
        };
        let Ok(monitor) = Monitor::new(config, Arc::clone(&world), Arc::new(MockSessionControl::new()))
        else {
            return;
        };

        group.throughput(Throughput::Elements(players));
        group.bench_with_input(BenchmarkId::from_parameter(players), &players, |b, &players| {
            let mut now = 0.0;
            b.iter(|| {
                now += 0.05;
                world.set_time(now);
                for id in 0..players {
                    black_box(monitor.on_player_tick(id));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_projectile_validation(c: &mut Criterion) {
    let config = WardenConfig::default();
    let attacker = PlayerSnapshot::new(1, "shooter", Vec3::ZERO);
    let velocity = Vec3::new(0.0, 0.0, 300.0);
    let tracked = TrackedProjectile {
        fired: FiredProjectile {
            projectile_id: 1,
            origin: attacker.eye_position,
            velocity,
        },
        body_forward: Vec3::Z,
        fired_at: 0.0,
    };
    let hit = ProjectileHit {
        projectile_id: 1,
        claimed_origin: attacker.head_position + Vec3::new(0.1, 0.0, 0.2),
        claimed_velocity: velocity,
        hit_position: Vec3::new(0.0, 1.6, 40.0),
    };
    let timing = FrameTiming::default();

    c.bench_function("validate_projectile_hit", |b| {
        b.iter(|| {
            black_box(combat::validate_projectile_hit(
                black_box(&attacker),
                black_box(&hit),
                &tracked,
                timing,
                &config,
            ))
        });
    });
}

criterion_group!(benches, benchmark_tick, benchmark_projectile_validation);
criterion_main!(benches);
