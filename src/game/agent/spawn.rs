use bevy::prelude::*;
use rustc_hash::FxHashMap;
use crate::game::config::InitialConfig;
use crate::game::loading::{AgentModel, ModelReady};
use crate::game::math::{facing_for_heading, flatten, lift, try_direction};
use crate::game::proximity::{ProximityRegistry, SyncIndicator};
use crate::game::simulation::terrain::{ground_height, HeightQuery, NoTerrain, Terrain};
use crate::game::simulation::{AgentBehavior, DespawnAgentCommand, SimConfig, SpawnAgentCommand};
use crate::game::steering::{WanderAgent, WaypointFollower, WaypointRoute};

use super::components::{Agent, MotionSample};

/// Tag -> entity lookup plus sync requests waiting for their partner.
#[derive(Resource, Debug, Default)]
pub struct AgentDirectory {
    tags: FxHashMap<String, Entity>,
    pending_sync: Vec<(Entity, String)>,
}

impl AgentDirectory {
    pub fn get(&self, tag: &str) -> Option<Entity> {
        self.tags.get(tag).copied()
    }

    /// Register `tag` for `entity`, returning the entity it used to name.
    pub fn insert(&mut self, tag: impl Into<String>, entity: Entity) -> Option<Entity> {
        self.tags.insert(tag.into(), entity)
    }

    pub fn request_sync(&mut self, entity: Entity, partner: impl Into<String>) {
        self.pending_sync.push((entity, partner.into()));
    }

    pub fn pending(&self) -> usize {
        self.pending_sync.len()
    }

    /// Drop every tag and pending request involving `entity`.
    pub fn remove_entity(&mut self, entity: Entity) {
        self.tags.retain(|_, e| *e != entity);
        self.pending_sync.retain(|(e, _)| *e != entity);
    }

    /// Take every sync request whose partner tag is now known.
    pub fn resolve_pending(&mut self) -> Vec<(Entity, Entity)> {
        let tags = &self.tags;
        let mut resolved = Vec::new();
        self.pending_sync.retain(|(entity, partner)| match tags.get(partner) {
            Some(&other) => {
                resolved.push((*entity, other));
                false
            }
            None => true,
        });
        resolved
    }
}

/// Queue the agents listed in [`InitialConfig`] as spawn commands.
pub fn queue_configured_agents(
    initial_config: Option<Res<InitialConfig>>,
    sim_config: Res<SimConfig>,
    mut spawns: MessageWriter<SpawnAgentCommand>,
) {
    let Some(config) = initial_config else {
        return;
    };

    for agent in &config.agents {
        let behavior = if agent.waypoints.is_empty() {
            AgentBehavior::Wander {
                heading: Vec2::new(agent.heading.0, agent.heading.1),
                drift: agent.drift,
                policy: agent.policy.map(|kind| sim_config.policy_for(kind)),
            }
        } else {
            AgentBehavior::Waypoints {
                points: agent.waypoints.iter().map(|&(x, z)| Vec2::new(x, z)).collect(),
                looped: agent.looped,
            }
        };

        spawns.write(SpawnAgentCommand {
            position: Vec2::new(agent.position.0, agent.position.1),
            speed: agent.speed,
            behavior,
            model: agent.model.clone(),
            tag: agent.tag.clone(),
            sync_with: agent.sync_with.clone(),
        });
    }

    info!("Queued {} configured agents", config.agents.len());
}

/// Spawn and despawn agents from their commands.
///
/// Spawn order follows message order, so the same command stream always
/// yields the same entities in the same order.
pub fn process_spawn_commands(
    mut commands: Commands,
    mut spawns: MessageReader<SpawnAgentCommand>,
    mut despawns: MessageReader<DespawnAgentCommand>,
    mut directory: ResMut<AgentDirectory>,
    mut registry: ResMut<ProximityRegistry>,
    sim_config: Res<SimConfig>,
    terrain: Option<Res<Terrain>>,
) {
    let terrain: &dyn HeightQuery = match terrain.as_deref() {
        Some(terrain) => terrain,
        None => &NoTerrain,
    };

    for command in despawns.read() {
        if let Ok(mut entity) = commands.get_entity(command.entity) {
            entity.despawn();
        }
        directory.remove_entity(command.entity);
        registry.forget(command.entity);
    }

    for command in spawns.read() {
        let planar = if command.position.is_finite() {
            command.position
        } else {
            warn!("Spawn position {:?} is not finite, using bounds center", command.position);
            sim_config.bounds.center()
        };
        let position = lift(planar, ground_height(terrain, planar, sim_config.fallback_height));
        let speed = command.speed.unwrap_or(sim_config.agent_speed);

        let facing = match &command.behavior {
            AgentBehavior::Wander { heading, .. } => try_direction(*heading).map(facing_for_heading),
            AgentBehavior::Waypoints { .. } => None,
        };

        let mut entity = commands.spawn((
            Agent,
            Transform::from_translation(position).with_rotation(facing.unwrap_or(Quat::IDENTITY)),
            MotionSample { previous: Some(flatten(position)), speed: 0.0 },
            SyncIndicator::default(),
        ));

        match &command.behavior {
            AgentBehavior::Wander { heading, drift, policy } => {
                let drift = if *drift { sim_config.drift } else { None };
                let agent = WanderAgent::new(*heading, speed, drift);
                if agent.heading == Vec2::ZERO {
                    warn!("Agent spawned with an unusable heading {:?}, it will stand still", heading);
                }
                entity.insert(agent);
                if let Some(policy) = policy {
                    entity.insert(*policy);
                }
            }
            AgentBehavior::Waypoints { points, looped } => {
                let mut route = WaypointRoute::new(points.iter().copied(), *looped, sim_config.waypoint_arrive_distance);
                let moved = route.clamp_into(&sim_config.bounds);
                if moved > 0 {
                    warn!("{} waypoints lie outside the wander area, pulled inside", moved);
                }
                if route.finished {
                    warn!("Agent spawned with an empty waypoint route");
                }
                entity.insert((route, WaypointFollower { speed }));
            }
        }

        match &command.model {
            Some(path) => {
                entity.insert(AgentModel::new(path.clone()));
            }
            None => {
                entity.insert(ModelReady);
            }
        }

        let id = entity.id();
        if let Some(tag) = &command.tag {
            if let Some(previous) = directory.insert(tag.clone(), id) {
                warn!("Agent tag '{}' moved from {:?} to {:?}", tag, previous, id);
            }
        }
        if let Some(partner) = &command.sync_with {
            directory.request_sync(id, partner.clone());
        }

        debug!("Spawned agent {:?} at ({:.2}, {:.2})", id, planar.x, planar.y);
    }

    for (a, b) in directory.resolve_pending() {
        if registry.register(a, b) {
            info!("Tracking proximity between {:?} and {:?}", a, b);
        }
    }
}

/// Record how far each agent moved horizontally since the previous tick.
pub fn sample_motion(mut agents: Query<(&Transform, &mut MotionSample), With<Agent>>, sim_config: Res<SimConfig>) {
    let dt = sim_config.fixed_dt();
    for (transform, mut motion) in agents.iter_mut() {
        let current = flatten(transform.translation);
        motion.speed = match motion.previous {
            Some(previous) if dt > 0.0 => {
                let speed = previous.distance(current) / dt;
                if speed.is_finite() { speed } else { 0.0 }
            }
            _ => 0.0,
        };
        motion.previous = Some(current);
    }
}
