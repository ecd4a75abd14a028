use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Procedural walk-cycle tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaitParams {
    /// Phase advance in radians per second.
    pub phase_rate: f32,
    /// Peak leg swing in radians.
    pub swing: f32,
    /// Arm swing as a fraction of the leg swing.
    pub arm_ratio: f32,
    /// Limb pitch (Euler X) in the rest pose.
    pub rest_pitch: f32,
    pub tail_swing: f32,
    /// Tail oscillations per leg cycle.
    pub tail_frequency: f32,
}

impl Default for GaitParams {
    fn default() -> Self {
        Self {
            phase_rate: 3.0,
            swing: 0.5,
            arm_ratio: 0.5,
            rest_pitch: -FRAC_PI_2,
            tail_swing: 0.5,
            tail_frequency: 2.0,
        }
    }
}

/// What a rig bone does in the walk cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneRole {
    Tail,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl BoneRole {
    /// Recognize a bone by its (case-insensitive) name. The first match in
    /// the order tail, shoulderL, shoulderR, thighL, thighR wins.
    pub fn classify(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name.contains("tail") {
            Some(BoneRole::Tail)
        } else if name.contains("shoulderl") {
            Some(BoneRole::LeftArm)
        } else if name.contains("shoulderr") {
            Some(BoneRole::RightArm)
        } else if name.contains("thighl") {
            Some(BoneRole::LeftLeg)
        } else if name.contains("thighr") {
            Some(BoneRole::RightLeg)
        } else {
            None
        }
    }
}

/// Bone angles for one instant of the walk cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaitPose {
    pub left_leg: f32,
    pub right_leg: f32,
    pub left_arm: f32,
    pub right_arm: f32,
    pub tail_yaw: f32,
}

impl GaitPose {
    /// Pose with the tail phase derived from the limb phase.
    pub fn sample(phase: f32, params: &GaitParams) -> Self {
        Self::from_phases(phase, phase * params.tail_frequency, params)
    }

    pub fn from_phases(phase: f32, tail_phase: f32, params: &GaitParams) -> Self {
        let swing = phase.sin() * params.swing;
        let arm = swing * params.arm_ratio;
        let rest = params.rest_pitch;
        Self {
            left_leg: rest + swing,
            right_leg: rest - swing,
            left_arm: rest - arm,
            right_arm: rest + arm,
            tail_yaw: tail_phase.sin() * params.tail_swing,
        }
    }

    pub fn angle(&self, role: BoneRole) -> f32 {
        match role {
            BoneRole::Tail => self.tail_yaw,
            BoneRole::LeftArm => self.left_arm,
            BoneRole::RightArm => self.right_arm,
            BoneRole::LeftLeg => self.left_leg,
            BoneRole::RightLeg => self.right_leg,
        }
    }
}

/// Phase accumulators for an agent's procedural walk.
///
/// Limbs and tail keep separate phases, each wrapped to `[0, TAU)`, so a
/// non-integer tail frequency neither jumps at the wrap nor lets the phase
/// grow without bound.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct WalkCycle {
    pub phase: f32,
    pub tail_phase: f32,
}

impl WalkCycle {
    pub fn advance(&mut self, dt: f32, params: &GaitParams) {
        if !(dt > 0.0) || !params.phase_rate.is_finite() {
            return;
        }
        let step = params.phase_rate * dt;
        self.phase = (self.phase + step).rem_euclid(TAU);
        if params.tail_frequency.is_finite() {
            self.tail_phase = (self.tail_phase + step * params.tail_frequency).rem_euclid(TAU);
        }
    }

    pub fn pose(&self, params: &GaitParams) -> GaitPose {
        GaitPose::from_phases(self.phase, self.tail_phase, params)
    }
}

/// Replace one Euler angle of a bone's local rotation.
///
/// Limbs swing around X, the tail around Y; the other two XYZ angles of
/// `rotation` are preserved.
pub fn pose_bone(rotation: Quat, role: BoneRole, pose: &GaitPose) -> Quat {
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    let angle = pose.angle(role);
    match role {
        BoneRole::Tail => Quat::from_euler(EulerRot::XYZ, x, angle, z),
        _ => Quat::from_euler(EulerRot::XYZ, angle, y, z),
    }
}
