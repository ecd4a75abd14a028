/// Run a crowd of wanderers without a window and report how they behaved
use bevy::prelude::*;
use meander::game::agent::{Agent, MotionSample};
use meander::game::config::{AgentSpawnConfig, BoundaryPolicyKind, InitialConfig};
use meander::game::math::flatten;
use meander::game::proximity::{AgentsSynced, ProximityRegistry};
use meander::game::simulation::{SimConfig, SimSet};
use meander::game::HeadlessSimPlugin;
use std::time::Instant;

const AGENTS: usize = 200;
const TICKS: usize = 60 * 60;

#[derive(Resource, Default)]
struct SyncCount(usize);

fn count_syncs(mut synced: MessageReader<AgentsSynced>, mut count: ResMut<SyncCount>) {
    count.0 += synced.read().count();
}

fn main() {
    let mut rng = fastrand::Rng::with_seed(42);

    // Alternate policies; pair every agent with the previous one
    let agents = (0..AGENTS)
        .map(|i| AgentSpawnConfig {
            tag: Some(format!("agent{}", i)),
            position: (rng.f32() * 36.0 - 18.0, rng.f32() * 36.0 - 18.0),
            heading: (rng.f32() - 0.5, rng.f32() - 0.5),
            speed: Some(1.0 + rng.f32() * 2.0),
            policy: Some(if i % 2 == 0 { BoundaryPolicyKind::Reflect } else { BoundaryPolicyKind::TurnLeft }),
            sync_with: (i > 0).then(|| format!("agent{}", i - 1)),
            ..default()
        })
        .collect();

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        AssetPlugin::default(),
        bevy::log::LogPlugin::default(),
    ));
    app.insert_resource(InitialConfig { agents, ..default() });
    app.add_plugins(HeadlessSimPlugin);
    app.init_resource::<SyncCount>();
    app.add_systems(FixedUpdate, count_syncs.after(SimSet::Integration));
    app.update();

    let start = Instant::now();
    for _ in 0..TICKS {
        app.world_mut().run_schedule(FixedUpdate);
    }
    let elapsed = start.elapsed();

    let bounds = app.world().resource::<SimConfig>().bounds;
    let mut query = app.world_mut().query_filtered::<(&Transform, &MotionSample), With<Agent>>();
    let mut outside = 0;
    let mut total_speed = 0.0;
    let mut count = 0;
    for (transform, motion) in query.iter(app.world()) {
        if !bounds.contains(flatten(transform.translation)) {
            outside += 1;
        }
        total_speed += motion.speed;
        count += 1;
    }

    let registry = app.world().resource::<ProximityRegistry>();
    let synced = registry
        .sorted_pairs()
        .iter()
        .filter(|(a, b)| registry.is_synced(*a, *b))
        .count();

    println!("Agents:        {}", count);
    println!("Ticks:         {} ({:.1} simulated seconds)", TICKS, TICKS as f32 / 60.0);
    println!("Wall time:     {:.2?} ({:.3} ms/tick)", elapsed, elapsed.as_secs_f64() * 1000.0 / TICKS as f64);
    println!("Outside area:  {}", outside);
    println!("Mean speed:    {:.2}", if count > 0 { total_speed / count as f32 } else { 0.0 });
    println!("Synced pairs:  {} of {} ({} messages)", synced, registry.len(), app.world().resource::<SyncCount>().0);
}
