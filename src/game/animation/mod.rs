/// Agent animation: a procedural walk cycle for rigs without clips, and
/// idle/walk clip blending driven by observed speed for models that ship
/// named clips.

use bevy::prelude::*;
use crate::game::simulation::SimSet;

mod blend;
mod gait;
mod rig;

pub use blend::{BlendParams, ClipWeights};
pub use gait::{pose_bone, BoneRole, GaitParams, GaitPose, WalkCycle};
pub use rig::{animate_gait, apply_clip_weights, bind_rigs, blend_clip_weights, ClipNodes, ClipPlayer, GaitRig, RigSearch};

pub struct AgentAnimationPlugin;

impl Plugin for AgentAnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (bind_rigs, animate_gait, blend_clip_weights, apply_clip_weights)
                .chain()
                .in_set(SimSet::Presentation),
        );
    }
}
