use bevy::animation::graph::{AnimationGraphHandle, AnimationNodeIndex};
use bevy::prelude::*;
use smallvec::{smallvec, SmallVec};
use crate::game::agent::MotionSample;
use crate::game::loading::ModelReady;
use crate::game::simulation::SimConfig;

use super::blend::ClipWeights;
use super::gait::{pose_bone, BoneRole, WalkCycle};

/// Bones of an agent's model that take part in the procedural walk.
#[derive(Component, Debug, Clone, Default)]
pub struct GaitRig {
    pub bones: SmallVec<[(Entity, BoneRole); 8]>,
}

/// Present while the spawned scene is still being searched for bones and an
/// animation player. Counts fixed ticks spent searching.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct RigSearch {
    pub ticks: u32,
}

/// Animation graph nodes for the model's named idle and walk clips.
#[derive(Component, Debug, Clone)]
pub struct ClipNodes {
    pub graph: Handle<AnimationGraph>,
    pub idle: Option<AnimationNodeIndex>,
    pub walk: Option<AnimationNodeIndex>,
}

/// The scene entity holding the agent's `AnimationPlayer`.
#[derive(Component, Debug, Clone, Copy)]
pub struct ClipPlayer(pub Entity);

struct RigScan {
    bones: SmallVec<[(Entity, BoneRole); 8]>,
    player: Option<Entity>,
}

fn scan_rig(
    root: Entity,
    children: &Query<&Children>,
    names: &Query<&Name>,
    players: &Query<&mut AnimationPlayer>,
) -> RigScan {
    let mut scan = RigScan { bones: SmallVec::new(), player: None };
    let mut stack: SmallVec<[Entity; 32]> = smallvec![root];

    while let Some(entity) = stack.pop() {
        if entity != root {
            if let Some(role) = names.get(entity).ok().and_then(|name| BoneRole::classify(name.as_str())) {
                scan.bones.push((entity, role));
            }
        }
        if scan.player.is_none() && players.contains(entity) {
            scan.player = Some(entity);
        }
        if let Ok(kids) = children.get(entity) {
            stack.extend(kids.iter());
        }
    }

    scan
}

/// Look through a ready agent's scene for walk-cycle bones and its animation
/// player.
///
/// Procedural gait is only used when the model has no walk clip. The search
/// gives up after `rig_search_ticks` and keeps whatever it found.
pub fn bind_rigs(
    mut commands: Commands,
    mut agents: Query<(Entity, &mut RigSearch, Option<&ClipNodes>, Has<GaitRig>, Has<ClipPlayer>), With<ModelReady>>,
    children: Query<&Children>,
    names: Query<&Name>,
    mut players: Query<&mut AnimationPlayer>,
    sim_config: Res<SimConfig>,
) {
    for (entity, mut search, clips, has_rig, has_player) in agents.iter_mut() {
        search.ticks += 1;
        let scan = scan_rig(entity, &children, &names, &players);
        let mut done = true;

        if let Some(clips) = clips.filter(|_| !has_player) {
            match scan.player {
                Some(player_entity) => {
                    if let Ok(mut player) = players.get_mut(player_entity) {
                        if let Some(idle) = clips.idle {
                            player.play(idle).repeat().set_weight(1.0);
                        }
                        if let Some(walk) = clips.walk {
                            player.play(walk).repeat().set_weight(0.0);
                        }
                    }
                    commands.entity(player_entity).insert(AnimationGraphHandle(clips.graph.clone()));
                    commands.entity(entity).insert((ClipPlayer(player_entity), ClipWeights::default()));
                    debug!("{:?} bound animation player {:?}", entity, player_entity);
                }
                None => done = false,
            }
        }

        let wants_gait = clips.map_or(true, |clips| clips.walk.is_none());
        if wants_gait && !has_rig {
            if scan.bones.is_empty() {
                done = false;
            } else {
                info!("{:?} walk rig bound with {} bones", entity, scan.bones.len());
                commands.entity(entity).insert((GaitRig { bones: scan.bones }, WalkCycle::default()));
            }
        }

        if done {
            commands.entity(entity).remove::<RigSearch>();
        } else if search.ticks >= sim_config.rig_search_ticks {
            warn!("{:?} rig search gave up after {} ticks", entity, search.ticks);
            commands.entity(entity).remove::<RigSearch>();
        }
    }
}

/// Advance each walk cycle and pose its bones.
pub fn animate_gait(
    mut rigs: Query<(&GaitRig, &mut WalkCycle)>,
    mut bones: Query<&mut Transform>,
    sim_config: Res<SimConfig>,
) {
    let dt = sim_config.fixed_dt();
    for (rig, mut cycle) in rigs.iter_mut() {
        cycle.advance(dt, &sim_config.gait);
        let pose = cycle.pose(&sim_config.gait);
        for &(bone, role) in &rig.bones {
            if let Ok(mut transform) = bones.get_mut(bone) {
                transform.rotation = pose_bone(transform.rotation, role, &pose);
            }
        }
    }
}

/// Ease idle/walk weights toward what the agent's observed speed calls for.
pub fn blend_clip_weights(mut agents: Query<(&MotionSample, &mut ClipWeights)>, sim_config: Res<SimConfig>) {
    let dt = sim_config.fixed_dt();
    for (motion, mut weights) in agents.iter_mut() {
        weights.blend_toward(motion.speed, dt, &sim_config.blend);
    }
}

pub fn apply_clip_weights(
    agents: Query<(&ClipWeights, &ClipNodes, &ClipPlayer), Changed<ClipWeights>>,
    mut players: Query<&mut AnimationPlayer>,
) {
    for (weights, nodes, clip_player) in agents.iter() {
        let Ok(mut player) = players.get_mut(clip_player.0) else {
            continue;
        };
        if let Some(animation) = nodes.idle.and_then(|idle| player.animation_mut(idle)) {
            animation.set_weight(weights.idle());
        }
        if let Some(animation) = nodes.walk.and_then(|walk| player.animation_mut(walk)) {
            animation.set_weight(weights.walk());
        }
    }
}

#[cfg(test)]
#[path = "rig_tests.rs"]
mod tests;
