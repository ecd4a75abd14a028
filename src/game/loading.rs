use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use crate::game::animation::{ClipNodes, RigSearch};
use crate::game::simulation::{SimConfig, SimSet};

/// Tracks when agent models finish loading.
///
/// Agents with a model are inert until it is fully loaded (dependencies
/// included); then the scene is attached as a child, named clips are wired
/// into an animation graph and the agent is marked [`ModelReady`].
pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, detect_loaded_models.in_set(SimSet::Input));
    }
}

/// glTF model requested for an agent.
#[derive(Component, Debug, Clone)]
pub struct AgentModel {
    pub path: String,
    pub handle: Option<Handle<Gltf>>,
    /// Set once a load failure has been reported, so it is logged only once.
    pub failed: bool,
}

impl AgentModel {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            handle: None,
            failed: false,
        }
    }
}

/// Marks an agent whose model (if any) is loaded; movement systems filter on it.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ModelReady;

/// Request pending models and promote agents whose model has loaded.
///
/// Without an asset server (headless runs) there is nothing to wait for and
/// agents are marked ready straight away.
pub fn detect_loaded_models(
    mut commands: Commands,
    mut agents: Query<(Entity, &mut AgentModel), Without<ModelReady>>,
    asset_server: Option<Res<AssetServer>>,
    gltfs: Option<Res<Assets<Gltf>>>,
    mut graphs: Option<ResMut<Assets<AnimationGraph>>>,
    sim_config: Res<SimConfig>,
) {
    let Some(asset_server) = asset_server else {
        for (entity, model) in agents.iter() {
            warn!("No asset server, {:?} runs without model {}", entity, model.path);
            commands.entity(entity).insert(ModelReady);
        }
        return;
    };

    for (entity, mut model) in agents.iter_mut() {
        if model.failed {
            continue;
        }

        let handle = match &model.handle {
            Some(handle) => handle.clone(),
            None => {
                info!("Loading model {} for {:?}", model.path, entity);
                let handle: Handle<Gltf> = asset_server.load(model.path.clone());
                model.handle = Some(handle.clone());
                handle
            }
        };

        if let LoadState::Failed(err) = asset_server.load_state(&handle) {
            error!("Model {} for {:?} failed to load: {}", model.path, entity, err);
            model.failed = true;
            continue;
        }
        if !asset_server.is_loaded_with_dependencies(&handle) {
            continue;
        }

        let Some(gltf) = gltfs.as_ref().and_then(|gltfs| gltfs.get(&handle)) else {
            continue;
        };

        let Some(scene) = gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned()) else {
            error!("Model {} has no scene", model.path);
            model.failed = true;
            continue;
        };

        let idle = gltf.named_animations.get(sim_config.idle_clip.as_str()).cloned();
        let walk = gltf.named_animations.get(sim_config.walk_clip.as_str()).cloned();

        let mut agent = commands.entity(entity);
        agent.insert((ModelReady, RigSearch::default())).with_children(|parent| {
            parent.spawn(SceneRoot(scene));
        });

        if idle.is_some() || walk.is_some() {
            if let Some(graphs) = graphs.as_mut() {
                let mut graph = AnimationGraph::new();
                let root = graph.root;
                let idle = idle.map(|clip| graph.add_clip(clip, 1.0, root));
                let walk = walk.map(|clip| graph.add_clip(clip, 0.0, root));
                agent.insert(ClipNodes { graph: graphs.add(graph), idle, walk });
            }
        }

        info!(
            "Model {} ready for {:?} ({} named clips)",
            model.path,
            entity,
            gltf.named_animations.len()
        );
    }
}
