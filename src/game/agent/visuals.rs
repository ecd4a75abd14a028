use bevy::prelude::*;
use crate::game::loading::AgentModel;
use crate::game::proximity::SyncIndicator;

use super::components::{Agent, AgentBody, SyncRing};

/// Shared mesh handles for agent rendering
#[derive(Resource)]
pub struct AgentMesh {
    pub body: Handle<Mesh>,
    pub ring: Handle<Mesh>,
}

/// Shared material handles for agent rendering
#[derive(Resource)]
pub struct AgentMaterials {
    pub body: Handle<StandardMaterial>,
    pub sync_ring: Handle<StandardMaterial>,
}

/// Sets up shared agent rendering resources (meshes and materials)
pub(super) fn setup_agent_resources(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(AgentMesh {
        body: meshes.add(Capsule3d::new(0.3, 0.8)),
        ring: meshes.add(Annulus::new(0.6, 0.7)),
    });

    commands.insert_resource(AgentMaterials {
        body: materials.add(Color::srgb(0.8, 0.7, 0.6)),
        sync_ring: materials.add(StandardMaterial {
            base_color: Color::srgb(0.2, 1.0, 0.2),
            unlit: true,
            ..default()
        }),
    });
}

/// Gives new agents a placeholder body (unless they load a model) and a
/// hidden sync ring.
///
/// Only runs on Added<Agent>, so it is not a hot path.
pub(super) fn spawn_agent_visuals(
    mut commands: Commands,
    query: Query<(Entity, Has<AgentModel>), Added<Agent>>,
    agent_mesh: Res<AgentMesh>,
    agent_materials: Res<AgentMaterials>,
) {
    for (entity, has_model) in query.iter() {
        commands.entity(entity).insert(Visibility::default()).with_children(|parent| {
            if !has_model {
                parent.spawn((
                    Mesh3d(agent_mesh.body.clone()),
                    MeshMaterial3d(agent_materials.body.clone()),
                    // Capsule origin is its center; stand it on the ground
                    Transform::from_xyz(0.0, 0.7, 0.0),
                    AgentBody,
                ));
            }
            parent.spawn((
                Mesh3d(agent_mesh.ring.clone()),
                MeshMaterial3d(agent_materials.sync_ring.clone()),
                Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2))
                    .with_translation(Vec3::new(0.0, 0.02, 0.0)),
                Visibility::Hidden,
                SyncRing,
            ));
        });
    }
}

/// Shows the sync ring once an agent's indicator is switched on
pub(super) fn update_sync_rings(
    q_agents: Query<(&SyncIndicator, &Children), Changed<SyncIndicator>>,
    mut q_rings: Query<&mut Visibility, With<SyncRing>>,
) {
    for (indicator, children) in q_agents.iter() {
        for child in children.iter() {
            if let Ok(mut visibility) = q_rings.get_mut(child) {
                *visibility = if indicator.on { Visibility::Visible } else { Visibility::Hidden };
            }
        }
    }
}
