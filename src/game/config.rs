use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const INITIAL_CONFIG_PATH: &str = "assets/initial_config.ron";
pub const RUNTIME_CONFIG_ASSET: &str = "runtime_config.ron";

/// Static configuration read once at startup. Everything that shapes the
/// simulation (bounds, speeds, latch timing, spawn list) lives here; changing
/// these mid-run would make replays with the same seed diverge.
///
/// Missing fields fall back to [`InitialConfig::default`].
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InitialConfig {
    // Simulation clock & randomness
    pub tick_rate: f64,
    pub rng_seed: u64,

    // Wander area (horizontal XZ plane)
    pub bounds_min: (f32, f32),
    pub bounds_max: (f32, f32),
    pub bounds_margin: f32,

    // Boundary handling
    pub boundary_policy: BoundaryPolicyKind,
    pub reflect_jitter_degrees: f32,
    pub turn_epsilon: f32,
    pub turn_follow_step: f32,

    // Agent motion
    pub agent_speed: f32,
    pub turn_rate: f32,
    pub drift_amplitude: f32,
    pub drift_frequency: f32,
    pub waypoint_arrive_distance: f32,

    // Terrain
    pub fallback_height: f32,
    pub terrain_planes: Vec<TerrainPlaneConfig>,

    // Proximity latch
    pub proximity_distance: f32,
    pub sync_duration: f32,
    pub sync_fill_rate: f32,
    pub sync_decay_rate: f32,

    // Walk cycle & clip blending
    pub walk_phase_rate: f32,
    pub walk_swing: f32,
    pub walk_arm_ratio: f32,
    pub tail_swing: f32,
    pub tail_frequency: f32,
    pub blend_walk_speed: f32,
    pub blend_rate: f32,
    pub idle_clip: String,
    pub walk_clip: String,
    pub rig_search_ticks: u32,

    // First-person camera
    pub first_person_speed: f32,
    pub eye_height: f32,

    // Agents spawned at startup
    pub agents: Vec<AgentSpawnConfig>,
}

/// Boundary handling policy as written in config files.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BoundaryPolicyKind {
    #[default]
    Reflect,
    TurnLeft,
}

/// A flat walkable rectangle at a fixed height.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct TerrainPlaneConfig {
    pub min: (f32, f32),
    pub max: (f32, f32),
    pub height: f32,
}

/// One agent in the startup spawn list. An agent with waypoints follows them,
/// otherwise it wanders.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AgentSpawnConfig {
    pub tag: Option<String>,
    pub model: Option<String>,
    pub position: (f32, f32),
    pub heading: (f32, f32),
    pub speed: Option<f32>,
    pub drift: bool,
    pub policy: Option<BoundaryPolicyKind>,
    pub waypoints: Vec<(f32, f32)>,
    pub looped: bool,
    pub sync_with: Option<String>,
}

impl Default for AgentSpawnConfig {
    fn default() -> Self {
        Self {
            tag: None,
            model: None,
            position: (0.0, 0.0),
            heading: (1.0, 0.0),
            speed: None,
            drift: true,
            policy: None,
            waypoints: Vec::new(),
            looped: true,
            sync_with: None,
        }
    }
}

/// Runtime configuration that can be hot-reloaded while the demo runs.
/// Nothing in here affects the simulation itself (controls, camera feel, debug).
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
#[serde(default)]
pub struct RuntimeConfig {
    pub key_forward: KeyCode,
    pub key_backward: KeyCode,
    pub key_left: KeyCode,
    pub key_right: KeyCode,
    pub key_toggle_pointer_lock: KeyCode,
    pub key_debug_bounds: KeyCode,
    pub key_debug_headings: KeyCode,
    pub mouse_sensitivity: f32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            key_forward: KeyCode::KeyW,
            key_backward: KeyCode::KeyS,
            key_left: KeyCode::KeyA,
            key_right: KeyCode::KeyD,
            key_toggle_pointer_lock: KeyCode::Tab,
            key_debug_bounds: KeyCode::F1,
            key_debug_headings: KeyCode::F2,
            mouse_sensitivity: 0.002,
        }
    }
}

impl RuntimeConfig {
    /// Current runtime config, or the defaults while the asset is still loading.
    pub fn current(handle: Option<&RuntimeConfigHandle>, configs: Option<&Assets<RuntimeConfig>>) -> Self {
        match (handle, configs) {
            (Some(handle), Some(configs)) => configs.get(&handle.0).cloned().unwrap_or_default(),
            _ => RuntimeConfig::default(),
        }
    }
}

#[derive(Resource)]
pub struct RuntimeConfigHandle(pub Handle<RuntimeConfig>);

/// Why the initial config could not be used.
#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(ron::error::SpannedError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Read(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

impl InitialConfig {
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str::<InitialConfig>(contents)?)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }
}

pub struct GameConfigPlugin;

impl Plugin for GameConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<RuntimeConfig>::new(&["runtime_config.ron"]))
           .add_systems(Startup, (load_initial_config, setup_runtime_config).chain())
           .add_systems(Update, log_runtime_config_reloads);
    }
}

/// Load static initial configuration synchronously at startup.
/// A config already inserted by the host (tests, demos) is left alone.
fn load_initial_config(mut commands: Commands, existing: Option<Res<InitialConfig>>) {
    if existing.is_some() {
        info!("InitialConfig provided by host, skipping {}", INITIAL_CONFIG_PATH);
        return;
    }

    match InitialConfig::read(INITIAL_CONFIG_PATH) {
        Ok(config) => {
            info!("Loaded initial config from {} ({} agents)", INITIAL_CONFIG_PATH, config.agents.len());
            commands.insert_resource(config);
        }
        Err(e) => {
            error!("{} ({})", e, INITIAL_CONFIG_PATH);
            error!("Using default InitialConfig");
            commands.insert_resource(InitialConfig::default());
        }
    }
}

/// Load runtime configuration asynchronously (hot-reloaded by the asset server).
fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load(RUNTIME_CONFIG_ASSET);
    commands.insert_resource(RuntimeConfigHandle(handle));
}

/// Report when the runtime config finishes loading or is edited on disk.
/// Systems read the asset directly through [`RuntimeConfig::current`].
fn log_runtime_config_reloads(
    config_handle: Option<Res<RuntimeConfigHandle>>,
    runtime_configs: Res<Assets<RuntimeConfig>>,
    mut events: MessageReader<AssetEvent<RuntimeConfig>>,
) {
    let Some(config_handle) = config_handle else { return };
    for event in events.read() {
        if event.is_modified(config_handle.0.id()) || event.is_loaded_with_dependencies(config_handle.0.id()) {
            if let Some(config) = runtime_configs.get(&config_handle.0) {
                info!("Runtime config loaded/updated (mouse sensitivity {})", config.mouse_sensitivity);
            }
        }
    }
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            rng_seed: 42,
            bounds_min: (-20.0, -20.0),
            bounds_max: (20.0, 20.0),
            bounds_margin: 1.0,
            boundary_policy: BoundaryPolicyKind::Reflect,
            reflect_jitter_degrees: 20.0,
            turn_epsilon: 0.01,
            turn_follow_step: 0.05,
            agent_speed: 1.5,
            turn_rate: 6.0,
            drift_amplitude: 0.6,
            drift_frequency: 0.15,
            waypoint_arrive_distance: 0.3,
            fallback_height: 0.0,
            terrain_planes: Vec::new(),
            proximity_distance: 5.0,
            sync_duration: 3.0,
            sync_fill_rate: 1.0,
            sync_decay_rate: 2.0,
            walk_phase_rate: 3.0,
            walk_swing: 0.5,
            walk_arm_ratio: 0.5,
            tail_swing: 0.5,
            tail_frequency: 2.0,
            blend_walk_speed: 1.5,
            blend_rate: 5.0,
            idle_clip: "Idle".to_string(),
            walk_clip: "Walk".to_string(),
            rig_search_ticks: 120,
            first_person_speed: 4.0,
            eye_height: 1.6,
            agents: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_uses_defaults_for_missing_fields() {
        let config = InitialConfig::from_ron_str("(tick_rate: 30.0, boundary_policy: TurnLeft)").unwrap();
        assert_eq!(config.tick_rate, 30.0);
        assert_eq!(config.boundary_policy, BoundaryPolicyKind::TurnLeft);
        assert_eq!(config.sync_duration, InitialConfig::default().sync_duration);
        assert!(config.agents.is_empty());
    }

    #[test]
    fn test_agent_spawn_list_parses() {
        let config = InitialConfig::from_ron_str(
            r#"(
                agents: [
                    (tag: Some("fox"), position: (1.0, 2.0), heading: (0.0, 1.0)),
                    (waypoints: [(0.0, 0.0), (5.0, 0.0)], looped: false, sync_with: Some("fox")),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(config.agents.len(), 2);
        assert_eq!(config.agents[0].tag.as_deref(), Some("fox"));
        assert_eq!(config.agents[0].position, (1.0, 2.0));
        assert!(config.agents[0].drift, "drift defaults to on");
        assert_eq!(config.agents[1].waypoints.len(), 2);
        assert!(!config.agents[1].looped);
        assert_eq!(config.agents[1].heading, (1.0, 0.0));
    }

    #[test]
    fn test_malformed_ron_is_a_parse_error() {
        let err = InitialConfig::from_ron_str("(tick_rate: \"fast\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse config"));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = InitialConfig::read("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }

    #[test]
    fn test_runtime_config_from_json_keeps_unlisted_defaults() {
        let config: RuntimeConfig = serde_json::from_str(r#"{ "mouse_sensitivity": 0.01 }"#).unwrap();
        assert_eq!(config.mouse_sensitivity, 0.01);
        assert_eq!(config.key_forward, KeyCode::KeyW);
    }

    #[test]
    fn test_shipped_initial_config_parses() {
        let config = InitialConfig::read(INITIAL_CONFIG_PATH).unwrap();
        assert!(config.tick_rate > 0.0);
        assert!(!config.agents.is_empty());
    }
}
