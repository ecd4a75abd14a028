use bevy::prelude::*;

pub mod agent;
pub mod animation;
pub mod camera;
pub mod config;
pub mod loading;
pub mod math;
pub mod proximity;
pub mod simulation;
pub mod steering;

use agent::{AgentPlugin, AgentVisualsPlugin};
use animation::AgentAnimationPlugin;
use camera::FirstPersonCameraPlugin;
use config::GameConfigPlugin;
use loading::LoadingPlugin;
use proximity::ProximityPlugin;
use simulation::{SimConfig, SimulationDebugPlugin, SimulationPlugin};
use steering::SteeringPlugin;

/// Everything that runs without a window: config, fixed-tick simulation,
/// agents and their animation state. Tests and demos build on this.
pub struct HeadlessSimPlugin;

impl Plugin for HeadlessSimPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            GameConfigPlugin,
            SimulationPlugin,
            SteeringPlugin,
            ProximityPlugin,
            AgentPlugin,
            LoadingPlugin,
            AgentAnimationPlugin,
        ));
    }
}

/// The windowed demo: the headless simulation plus rendering, first-person
/// camera and debug overlays.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.85)))
           .add_plugins((
               HeadlessSimPlugin,
               AgentVisualsPlugin,
               FirstPersonCameraPlugin,
               SimulationDebugPlugin,
           ))
           .add_systems(PostStartup, setup_scene.after(simulation::init_sim_config_from_initial));
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim_config: Res<SimConfig>,
    terrain: Option<Res<simulation::terrain::Terrain>>,
) {
    info!("Scene setup started");

    // Ground plane covering the wander area with some slack
    let size = (sim_config.bounds.max() - sim_config.bounds.min()) + Vec2::splat(10.0);
    let center = sim_config.bounds.center();
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(size.x, size.y))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Transform::from_xyz(center.x, sim_config.fallback_height, center.y),
    ));

    // Raised terrain planes as thin slabs
    if let Some(terrain) = terrain {
        let slab = materials.add(Color::srgb(0.45, 0.4, 0.35));
        for surface in terrain.surfaces() {
            if let simulation::terrain::Surface::Plane { min, max, height } = surface {
                let extent = *max - *min;
                let mid = (*min + *max) * 0.5;
                let depth = (height - sim_config.fallback_height).max(0.05);
                commands.spawn((
                    Mesh3d(meshes.add(Cuboid::new(extent.x, depth, extent.y))),
                    MeshMaterial3d(slab.clone()),
                    Transform::from_xyz(mid.x, height - depth * 0.5, mid.y),
                ));
            }
        }
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(8.0, 16.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    info!("Scene setup complete");
}
