use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use crate::game::config::{RuntimeConfig, RuntimeConfigHandle};
use crate::game::math::{flatten, lift};
use crate::game::simulation::terrain::{ground_height, HeightQuery, NoTerrain, Terrain};
use crate::game::simulation::{init_sim_config_from_initial, SimConfig, SimSet};
use crate::game::steering::Boundary;

pub struct FirstPersonCameraPlugin;

impl Plugin for FirstPersonCameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FirstPersonInput>()
           .init_resource::<PointerLock>()
           .add_systems(PostStartup, spawn_camera.after(init_sim_config_from_initial))
           .add_systems(Update, (toggle_pointer_lock, gather_first_person_input).chain())
           .add_systems(FixedUpdate, move_first_person.in_set(SimSet::Steering));
    }
}

/// First-person movement tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstPersonParams {
    /// Walking speed in units per second.
    pub speed: f32,
    pub eye_height: f32,
    /// Pitch limit in radians, either way.
    pub max_pitch: f32,
}

impl Default for FirstPersonParams {
    fn default() -> Self {
        Self {
            speed: 4.0,
            eye_height: 1.6,
            max_pitch: 89f32.to_radians(),
        }
    }
}

#[derive(Component)]
pub struct FirstPersonCamera;

/// Eye position and look angles. Yaw 0 looks down -Z.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct FirstPersonState {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl FirstPersonState {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// Input gathered each frame and consumed by the fixed-tick movement.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct FirstPersonInput {
    /// Strafe (x, + is right) and forward (y, + is forward) axes in [-1, 1].
    pub movement: Vec2,
    /// Mouse delta in pixels since the last fixed tick.
    pub look: Vec2,
}

/// Whether the cursor is captured; mouse look only applies while it is.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerLock(pub bool);

/// Planar forward direction for a yaw angle.
pub fn forward_for_yaw(yaw: f32) -> Vec2 {
    Vec2::new(-yaw.sin(), -yaw.cos())
}

/// Planar right direction for a yaw angle.
pub fn right_for_yaw(yaw: f32) -> Vec2 {
    Vec2::new(yaw.cos(), -yaw.sin())
}

/// Apply one tick of look and movement input.
///
/// Look deltas are scaled by `sensitivity` (radians per pixel); pitch is
/// clamped to `params.max_pitch`. Diagonal movement is no faster than
/// straight movement. The eye stays inside the boundary's inner rectangle
/// at `eye_height` above the ground.
#[allow(clippy::too_many_arguments)]
pub fn step_first_person(
    state: FirstPersonState,
    input: FirstPersonInput,
    dt: f32,
    sensitivity: f32,
    params: &FirstPersonParams,
    bounds: &Boundary,
    terrain: &dyn HeightQuery,
    fallback_height: f32,
) -> FirstPersonState {
    let mut next = state;

    if input.look.is_finite() && sensitivity.is_finite() {
        next.yaw -= input.look.x * sensitivity;
        next.pitch -= input.look.y * sensitivity;
    }
    let max_pitch = params.max_pitch.abs();
    next.pitch = if next.pitch.is_finite() { next.pitch.clamp(-max_pitch, max_pitch) } else { 0.0 };
    if !next.yaw.is_finite() {
        next.yaw = 0.0;
    }

    let mut planar = flatten(state.position);
    if dt > 0.0 && input.movement.is_finite() {
        let direction = right_for_yaw(next.yaw) * input.movement.x + forward_for_yaw(next.yaw) * input.movement.y;
        planar += direction.clamp_length_max(1.0) * params.speed * dt;
    }
    let planar = bounds.clamp(planar);

    next.position = lift(planar, ground_height(terrain, planar, fallback_height) + params.eye_height);
    next
}

fn spawn_camera(mut commands: Commands, config: Res<SimConfig>) {
    let center = config.bounds.center();
    let state = FirstPersonState {
        position: lift(center + Vec2::new(0.0, 8.0), config.fallback_height + config.first_person.eye_height),
        yaw: 0.0,
        pitch: -0.2,
    };

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(state.position).with_rotation(state.rotation()),
        FirstPersonCamera,
        state,
    ));
}

fn toggle_pointer_lock(
    keys: Res<ButtonInput<KeyCode>>,
    config_handle: Option<Res<RuntimeConfigHandle>>,
    runtime_configs: Option<Res<Assets<RuntimeConfig>>>,
    mut lock: ResMut<PointerLock>,
    mut cursors: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let config = RuntimeConfig::current(config_handle.as_deref(), runtime_configs.as_deref());
    if !keys.just_pressed(config.key_toggle_pointer_lock) {
        return;
    }

    lock.0 = !lock.0;
    if let Ok(mut cursor) = cursors.single_mut() {
        cursor.grab_mode = if lock.0 { CursorGrabMode::Locked } else { CursorGrabMode::None };
        cursor.visible = !lock.0;
    }
    info!("Pointer lock {}", if lock.0 { "engaged" } else { "released" });
}

fn gather_first_person_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    config_handle: Option<Res<RuntimeConfigHandle>>,
    runtime_configs: Option<Res<Assets<RuntimeConfig>>>,
    lock: Res<PointerLock>,
    mut input: ResMut<FirstPersonInput>,
) {
    let config = RuntimeConfig::current(config_handle.as_deref(), runtime_configs.as_deref());

    let mut movement = Vec2::ZERO;
    if keys.pressed(config.key_forward) {
        movement.y += 1.0;
    }
    if keys.pressed(config.key_backward) {
        movement.y -= 1.0;
    }
    if keys.pressed(config.key_right) {
        movement.x += 1.0;
    }
    if keys.pressed(config.key_left) {
        movement.x -= 1.0;
    }
    input.movement = movement;

    for motion in mouse_motion.read() {
        if lock.0 {
            input.look += motion.delta;
        }
    }
}

fn move_first_person(
    mut cameras: Query<(&mut Transform, &mut FirstPersonState), With<FirstPersonCamera>>,
    mut input: ResMut<FirstPersonInput>,
    sim_config: Res<SimConfig>,
    terrain: Option<Res<Terrain>>,
    config_handle: Option<Res<RuntimeConfigHandle>>,
    runtime_configs: Option<Res<Assets<RuntimeConfig>>>,
) {
    let config = RuntimeConfig::current(config_handle.as_deref(), runtime_configs.as_deref());
    let terrain: &dyn HeightQuery = match terrain.as_deref() {
        Some(terrain) => terrain,
        None => &NoTerrain,
    };

    let frame_input = *input;
    input.look = Vec2::ZERO;

    for (mut transform, mut state) in cameras.iter_mut() {
        *state = step_first_person(
            *state,
            frame_input,
            sim_config.fixed_dt(),
            config.mouse_sensitivity,
            &sim_config.first_person,
            &sim_config.bounds,
            terrain,
            sim_config.fallback_height,
        );
        transform.translation = state.position;
        transform.rotation = state.rotation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::simulation::terrain::FlatGround;

    fn bounds() -> Boundary {
        Boundary::new(Vec2::splat(-10.0), Vec2::splat(10.0), 1.0)
    }

    fn at_origin() -> FirstPersonState {
        FirstPersonState { position: Vec3::new(0.0, 1.6, 0.0), yaw: 0.0, pitch: 0.0 }
    }

    fn step(state: FirstPersonState, movement: Vec2, look: Vec2, dt: f32) -> FirstPersonState {
        step_first_person(
            state,
            FirstPersonInput { movement, look },
            dt,
            0.01,
            &FirstPersonParams::default(),
            &bounds(),
            &NoTerrain,
            0.0,
        )
    }

    #[test]
    fn test_forward_at_zero_yaw_is_negative_z() {
        let next = step(at_origin(), Vec2::new(0.0, 1.0), Vec2::ZERO, 0.5);
        assert!((next.position - Vec3::new(0.0, 1.6, -2.0)).length() < 1e-5, "got {:?}", next.position);

        let next = step(at_origin(), Vec2::new(1.0, 0.0), Vec2::ZERO, 0.5);
        assert!((next.position - Vec3::new(2.0, 1.6, 0.0)).length() < 1e-5, "strafe right is +X");
    }

    #[test]
    fn test_camera_looks_where_it_walks() {
        let state = FirstPersonState { yaw: 0.7, ..at_origin() };
        let look = state.rotation() * Vec3::NEG_Z;
        let walk = forward_for_yaw(state.yaw);
        assert!((Vec2::new(look.x, look.z) - walk).length() < 1e-5);
    }

    #[test]
    fn test_diagonal_is_not_faster() {
        let next = step(at_origin(), Vec2::new(1.0, 1.0), Vec2::ZERO, 0.5);
        let moved = flatten(next.position).length();
        assert!((moved - 2.0).abs() < 1e-5, "moved {moved}");
    }

    #[test]
    fn test_pitch_clamps_and_yaw_turns() {
        let next = step(at_origin(), Vec2::ZERO, Vec2::new(10.0, -1000.0), 0.1);
        assert!((next.yaw + 0.1).abs() < 1e-6, "mouse right turns right");
        assert!((next.pitch - 89f32.to_radians()).abs() < 1e-6);

        let next = step(at_origin(), Vec2::ZERO, Vec2::new(0.0, 1000.0), 0.1);
        assert!((next.pitch + 89f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_position_stays_in_bounds() {
        let mut state = at_origin();
        for _ in 0..200 {
            state = step(state, Vec2::new(0.3, 1.0), Vec2::ZERO, 0.1);
            assert!(bounds().contains(flatten(state.position)));
        }
        assert_eq!(state.position.z, -9.0);
    }

    #[test]
    fn test_eye_rides_on_terrain() {
        let next = step_first_person(
            at_origin(),
            FirstPersonInput::default(),
            0.1,
            0.01,
            &FirstPersonParams::default(),
            &bounds(),
            &FlatGround(2.0),
            0.0,
        );
        assert!((next.position.y - 3.6).abs() < 1e-6);
    }

    #[test]
    fn test_zero_dt_only_looks() {
        let next = step(at_origin(), Vec2::new(0.0, 1.0), Vec2::new(5.0, 0.0), 0.0);
        assert_eq!(flatten(next.position), Vec2::ZERO);
        assert!(next.yaw < 0.0);
    }
}
