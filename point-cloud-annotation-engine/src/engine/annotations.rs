use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::camera::focus;
use crate::engine::camera::view::Views;
use crate::engine::core::canvas_state::ColorBy;
use crate::engine::cuboid::CuboidPose;
use crate::tools::interaction::state::ReferencePlanes;

/// Mirror of one store-owned annotation object. The pose travels as the
/// 16-float record the store persists: position (3), rotation (3), scale (3)
/// and seven reserved slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub client_id: i64,
    pub points: [f32; 16],
    pub label_color: [f32; 3],
    pub instance_color: [f32; 3],
    pub group_color: [f32; 3],
    #[serde(default)]
    pub occluded: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub hidden: bool,
}

impl ObjectRecord {
    pub fn pose(&self) -> CuboidPose {
        CuboidPose::from_record(&self.points)
    }

    pub fn color(&self, by: ColorBy) -> [f32; 3] {
        match by {
            ColorBy::Label => self.label_color,
            ColorBy::Instance => self.instance_color,
            ColorBy::Group => self.group_color,
        }
    }
}

/// Store snapshot of every annotated object on the current frame.
#[derive(Event, Debug, Clone)]
pub struct ObjectsUpdatedEvent {
    pub objects: Vec<ObjectRecord>,
}

/// The host activated (or cleared) an object for editing.
#[derive(Event, Debug, Clone, Copy)]
pub struct ActivateObjectEvent {
    pub client_id: Option<i64>,
}

#[derive(Resource, Debug, Default, Clone)]
pub struct AnnotatedObjects {
    pub objects: Vec<ObjectRecord>,
}

impl AnnotatedObjects {
    pub fn get(&self, client_id: i64) -> Option<&ObjectRecord> {
        self.objects.iter().find(|o| o.client_id == client_id)
    }

    pub fn get_mut(&mut self, client_id: i64) -> Option<&mut ObjectRecord> {
        self.objects.iter_mut().find(|o| o.client_id == client_id)
    }
}

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ActiveElement {
    pub client_id: Option<i64>,
}

/// The one live pose record for the active cuboid. Every view renders from
/// this; gestures mutate it and commit writes it back to the store record.
#[derive(Resource, Debug, Clone)]
pub struct SelectedCuboid {
    pub client_id: i64,
    pub pose: CuboidPose,
    pub locked: bool,
    pub pinned: bool,
    pub hidden: bool,
}

impl SelectedCuboid {
    fn from_record(record: &ObjectRecord) -> Self {
        Self {
            client_id: record.client_id,
            pose: record.pose(),
            locked: record.locked,
            pinned: record.pinned,
            hidden: record.hidden,
        }
    }
}

/// Keeps the object mirror and the selected cuboid in sync with the store,
/// and refocuses the cameras when the active element changes.
pub fn sync_selected_object(
    mut commands: Commands,
    mut updates: EventReader<ObjectsUpdatedEvent>,
    mut activations: EventReader<ActivateObjectEvent>,
    mut objects: ResMut<AnnotatedObjects>,
    mut active: ResMut<ActiveElement>,
    mut views: ResMut<Views>,
    mut planes: ResMut<ReferencePlanes>,
) {
    let mut refresh = false;
    for update in updates.read() {
        objects.objects = update.objects.clone();
        refresh = true;
    }
    for activation in activations.read() {
        active.client_id = activation.client_id;
        refresh = true;
    }
    if !refresh {
        return;
    }

    let selected = active.client_id.and_then(|id| objects.get(id));
    match selected {
        Some(record) => {
            let cuboid = SelectedCuboid::from_record(record);
            planes.reset_for(&cuboid.pose);
            focus::fit_cameras_to_object(&mut views, &cuboid.pose);
            info!("activated object {}", cuboid.client_id);
            commands.insert_resource(cuboid);
        }
        None => {
            commands.remove_resource::<SelectedCuboid>();
        }
    }
}
