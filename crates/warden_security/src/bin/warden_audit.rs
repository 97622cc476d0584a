//! # WARDEN Audit
//!
//! Runs a scripted session against the in-memory host and prints what the
//! detection engine made of it. Useful for checking a config file before it
//! goes live.

use std::sync::Arc;

use warden_security::combat::{FiredProjectile, MeleeHit, MeleeWeapon, ProjectileHit};
use warden_security::heuristics::input::InputSample;
use warden_security::mock::{MockGeometrySource, MockSessionControl};
use warden_security::{Finding, GeometrySource, Monitor, PlayerId, PlayerSnapshot, WardenConfig};
use warden_shared::Vec3;

type AuditMonitor = Monitor<MockGeometrySource, MockSessionControl>;

const RUNNER: PlayerId = 1;
const BIRD: PlayerId = 2;
const PEEKER: PlayerId = 3;
const HIDDEN: PlayerId = 4;
const FLICKER: PlayerId = 5;
const SHOOTER: PlayerId = 6;
const BRAWLER: PlayerId = 7;
const MINER: PlayerId = 8;
const GLITCH: PlayerId = 9;

const TICK: f64 = 0.5;
const TICKS: u32 = 24;

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         WARDEN AUDIT                                             ║");
    println!("║         THE WATCHTOWER                                           ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading config: {path}");
            match WardenConfig::load(&path) {
                Ok(config) => config,
                Err(e) => {
                    println!("Error: {e}");
                    return;
                }
            }
        }
        None => {
            println!("Usage: warden_audit [config.toml]");
            println!("No config given, using defaults.");
            WardenConfig::default()
        }
    };
    println!();

    let world = Arc::new(MockGeometrySource::new());
    let session = Arc::new(MockSessionControl::new());
    let monitor = match Monitor::new(config, Arc::clone(&world), Arc::clone(&session)) {
        Ok(monitor) => monitor,
        Err(e) => {
            println!("Error: {e}");
            return;
        }
    };

    populate(&world);

    println!("┌─ SCENARIO ─────────────────────────────────────────────────────┐");
    for tick in 0..TICKS {
        world.set_time(f64::from(tick) * TICK);
        // Ninety degrees per sample
        #[allow(clippy::cast_precision_loss)]
        let yaw = (tick % 4) as f32 * 90.0;
        world.update_player(FLICKER, |p| p.eye_forward = Vec3::from_yaw_pitch(yaw, 0.0));

        for id in RUNNER..=GLITCH {
            print_findings(id, &monitor.on_player_tick(id));
        }
    }

    run_events(&world, &monitor);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let mut lines: Vec<String> = Vec::new();
    for id in RUNNER..=GLITCH {
        monitor.write_status(&mut lines, Some(id));
        lines.push(String::new());
    }
    monitor.write_status(&mut lines, None);
    for line in &lines {
        println!("{line}");
    }

    println!();
    println!(
        "Session layer: {} kicks, {} bans",
        session.kicks().len(),
        session.bans().len()
    );
}

/// One cheater per lane, lanes 20m apart along X, everyone facing +Z.
fn populate(world: &MockGeometrySource) {
    let lane = |n: u8| Vec3::new(f32::from(n) * 20.0, 0.0, 0.0);

    let mut runner = PlayerSnapshot::new(RUNNER, "runner", lane(0));
    runner.speed = 14.0;
    world.upsert_player(runner);

    let bird_spot = lane(1) + Vec3::new(0.0, 30.0, 0.0);
    world.upsert_player(PlayerSnapshot::new(BIRD, "bird", bird_spot));

    world.upsert_player(PlayerSnapshot::new(PEEKER, "peeker", lane(2)));
    world.upsert_player(PlayerSnapshot::new(HIDDEN, "hidden", lane(2) + Vec3::new(0.0, 0.0, 20.0)));
    world.add_wall(lane(2) + Vec3::new(0.0, 2.0, 10.0), Vec3::new(4.0, 3.0, 0.25));

    world.upsert_player(PlayerSnapshot::new(FLICKER, "flicker", lane(3)));
    world.upsert_player(PlayerSnapshot::new(SHOOTER, "shooter", lane(4)));
    world.upsert_player(PlayerSnapshot::new(BRAWLER, "brawler", lane(5)));
    world.upsert_player(PlayerSnapshot::new(MINER, "miner", lane(6)));
    world.upsert_player(PlayerSnapshot::new(GLITCH, "glitch", lane(7)));
}

fn run_events(world: &MockGeometrySource, monitor: &AuditMonitor) {
    // Ranged: shot claims to leave 25m ahead of the shooter's head
    if let Some(shooter) = world.player(SHOOTER) {
        let velocity = Vec3::new(0.0, 0.0, 300.0);
        monitor.on_projectile_fired(
            SHOOTER,
            FiredProjectile {
                projectile_id: 1,
                origin: shooter.eye_position,
                velocity,
            },
        );
        let hit = ProjectileHit {
            projectile_id: 1,
            claimed_origin: shooter.head_position + Vec3::new(0.0, 0.0, 25.0),
            claimed_velocity: velocity,
            hit_position: shooter.head_position + Vec3::new(0.0, 0.0, 60.0),
        };
        print_findings(SHOOTER, &monitor.on_projectile_hit(SHOOTER, &hit));
    }

    // Melee: strike lands behind the attacker
    if let Some(brawler) = world.player(BRAWLER) {
        let hit = MeleeHit {
            victim: None,
            weapon: MeleeWeapon {
                reach: 1.5,
                attack_radius: 0.3,
            },
            hit_position: brawler.eye_position + Vec3::new(0.0, 0.0, -1.4),
        };
        if let Some(finding) = monitor.on_melee_hit(BRAWLER, &hit) {
            print_findings(BRAWLER, &[finding]);
        }
    }

    let granted = monitor.on_resource_gather(MINER, "wood", 5000);
    println!("│ miner asked for 5000 wood, granted {granted}");

    let sample = InputSample {
        yaw: f32::NAN,
        pitch: 0.0,
        buttons: 0,
        position: Vec3::new(140.0, 0.0, 0.0),
    };
    if let Err(rejection) = monitor.on_player_input(GLITCH, &sample) {
        println!("│ glitch input rejected: {rejection}");
    }
}

fn print_findings(player: PlayerId, findings: &[Finding]) {
    for finding in findings {
        println!(
            "│ player {player}: [{}] {} -> {:?}",
            finding.violation.kind, finding.violation.description, finding.action
        );
    }
}
