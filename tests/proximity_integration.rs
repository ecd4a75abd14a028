use bevy::prelude::*;
use meander::game::config::{AgentSpawnConfig, InitialConfig};
use meander::game::proximity::{AgentsSynced, ProximityRegistry, SyncIndicator};
use meander::game::simulation::SimSet;
use meander::game::agent::AgentDirectory;
use meander::game::HeadlessSimPlugin;

#[derive(Resource, Default)]
struct SyncLog(Vec<AgentsSynced>);

fn record_syncs(mut synced: MessageReader<AgentsSynced>, mut log: ResMut<SyncLog>) {
    log.0.extend(synced.read().copied());
}

fn standing(tag: &str, position: (f32, f32), sync_with: Option<&str>) -> AgentSpawnConfig {
    AgentSpawnConfig {
        tag: Some(tag.to_string()),
        position,
        speed: Some(0.0),
        drift: false,
        sync_with: sync_with.map(str::to_string),
        ..default()
    }
}

fn build_app(agents: Vec<AgentSpawnConfig>) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(AssetPlugin::default());
    app.insert_resource(InitialConfig {
        proximity_distance: 5.0,
        sync_duration: 3.0,
        agents,
        ..default()
    });
    app.add_plugins(HeadlessSimPlugin);
    app.init_resource::<SyncLog>();
    app.add_systems(FixedUpdate, record_syncs.after(SimSet::Integration));
    app.update();
    app
}

fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

fn indicator(app: &App, tag: &str) -> bool {
    let entity = app.world().resource::<AgentDirectory>().get(tag);
    entity
        .and_then(|e| app.world().get::<SyncIndicator>(e))
        .is_some_and(|indicator| indicator.on)
}

#[test]
fn test_close_pair_syncs_after_duration() {
    let mut app = build_app(vec![
        standing("fox", (0.0, 0.0), None),
        standing("hare", (2.0, 0.0), Some("fox")),
    ]);

    // 100 ticks at 60 Hz is well short of three seconds
    run_ticks(&mut app, 100);
    assert_eq!(app.world().resource::<ProximityRegistry>().len(), 1);
    assert!(app.world().resource::<SyncLog>().0.is_empty());
    assert!(!indicator(&app, "fox"));

    run_ticks(&mut app, 100);
    let log = &app.world().resource::<SyncLog>().0;
    assert_eq!(log.len(), 1, "exactly one sync message");

    let directory = app.world().resource::<AgentDirectory>();
    let fox = directory.get("fox").unwrap();
    let hare = directory.get("hare").unwrap();
    assert!(app.world().resource::<ProximityRegistry>().is_synced(fox, hare));
    assert!(indicator(&app, "fox"));
    assert!(indicator(&app, "hare"));
}

#[test]
fn test_sync_fires_once_and_stays_latched() {
    let mut app = build_app(vec![
        standing("fox", (0.0, 0.0), None),
        standing("hare", (1.0, 1.0), Some("fox")),
    ]);

    run_ticks(&mut app, 600);
    assert_eq!(app.world().resource::<SyncLog>().0.len(), 1);
    assert!(indicator(&app, "hare"));
}

#[test]
fn test_distant_pair_never_syncs() {
    let mut app = build_app(vec![
        standing("fox", (-8.0, 0.0), None),
        standing("hare", (8.0, 0.0), Some("fox")),
    ]);

    run_ticks(&mut app, 600);
    assert!(app.world().resource::<SyncLog>().0.is_empty());
    assert!(!indicator(&app, "fox"));
    assert!(!indicator(&app, "hare"));
}

#[test]
fn test_sync_request_waits_for_partner_tag() {
    // The requester is listed first; its partner is tagged later in the same batch
    let mut app = build_app(vec![
        standing("hare", (2.0, 0.0), Some("fox")),
        standing("fox", (0.0, 0.0), None),
    ]);

    run_ticks(&mut app, 1);
    assert_eq!(app.world().resource::<ProximityRegistry>().len(), 1);
    assert_eq!(app.world().resource::<AgentDirectory>().pending(), 0);
}
