//! The multi-view interaction state machine: scanning, translating,
//! rotating and resizing the active cuboid across four synchronized
//! viewports.

use bevy::prelude::*;

use crate::engine::core::canvas_state::CanvasStage;
use crate::engine::core::input::track_cursor;

pub mod commit;
pub mod resize;
pub mod rotate;
pub mod scan;
pub mod state;
pub mod translate;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<state::Interaction>()
            .init_resource::<state::ReferencePlanes>()
            .init_resource::<scan::TransformModeState>()
            .add_systems(Update, scan::handle_transform_mode)
            .add_systems(
                Update,
                (
                    track_cursor,
                    scan::begin_scan,
                    scan::resolve_scan,
                    translate::update_translation,
                    resize::update_resize,
                    rotate::update_rotation,
                    commit::complete_on_release,
                    commit::abort_without_selection,
                    scan::pick_on_click,
                )
                    .chain()
                    .run_if(in_state(CanvasStage::Running)),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::state::{Interaction, InteractionAction};
    use bevy::prelude::*;

    use crate::AnnotationCanvasPlugin;
    use crate::engine::annotations::{
        ActivateObjectEvent, ObjectRecord, ObjectsUpdatedEvent, SelectedCuboid,
    };
    use crate::engine::camera::view::{CameraMode, ViewKind, Views};
    use crate::engine::core::canvas_state::CanvasStage;
    use crate::engine::core::events::{CanvasPointerEvent, EditedEvent, PointerKind};
    use crate::engine::point_cloud::PointCloudLoadedEvent;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(AnnotationCanvasPlugin);
        app
    }

    fn record(client_id: i64) -> ObjectRecord {
        let mut points = [0.0; 16];
        points[6] = 1.0;
        points[7] = 1.0;
        points[8] = 1.0;
        ObjectRecord {
            client_id,
            points,
            label_color: [1.0, 0.0, 0.0],
            instance_color: [0.0, 1.0, 0.0],
            group_color: [0.0, 0.0, 1.0],
            occluded: false,
            locked: false,
            pinned: false,
            hidden: false,
        }
    }

    fn load_cloud(app: &mut App) {
        let mut positions = Vec::new();
        for i in -3..=3 {
            for j in -3..=3 {
                positions.push(Vec3::new(i as f32 * 0.5, j as f32 * 0.5, 0.0));
            }
        }
        app.world_mut().send_event(PointCloudLoadedEvent {
            positions,
            colors: None,
            intensities: None,
        });
        app.update();
        app.update();
        let stage = app.world().resource::<State<CanvasStage>>();
        assert_eq!(*stage.get(), CanvasStage::Running);
    }

    fn activate(app: &mut App, object: ObjectRecord) {
        let client_id = object.client_id;
        app.world_mut().send_event(ObjectsUpdatedEvent {
            objects: vec![object],
        });
        app.world_mut().send_event(ActivateObjectEvent {
            client_id: Some(client_id),
        });
        app.update();
        assert!(app.world().get_resource::<SelectedCuboid>().is_some());
    }

    fn pointer(app: &mut App, view: ViewKind, kind: PointerKind, ndc: Vec2) {
        app.world_mut().send_event(CanvasPointerEvent {
            view,
            kind,
            ndc,
            screen: Vec2::new(400.0, 300.0),
        });
        app.update();
    }

    fn drain_edited(app: &mut App) -> Vec<EditedEvent> {
        app.world_mut()
            .resource_mut::<Events<EditedEvent>>()
            .drain()
            .collect()
    }

    fn action_is_idle(app: &App) -> bool {
        matches!(
            app.world().resource::<Interaction>().action,
            InteractionAction::Idle
        )
    }

    #[test]
    fn translate_gesture_commits_exactly_once() {
        let mut app = test_app();
        load_cloud(&mut app);
        activate(&mut app, record(7));
        drain_edited(&mut app);

        pointer(&mut app, ViewKind::Top, PointerKind::Press, Vec2::ZERO);
        pointer(&mut app, ViewKind::Top, PointerKind::Move, Vec2::new(0.2, 0.1));
        pointer(&mut app, ViewKind::Top, PointerKind::Release, Vec2::new(0.2, 0.1));

        let edits = drain_edited(&mut app);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].client_id, 7);
        assert!(edits[0].points[0] > 0.1);
        assert!(action_is_idle(&app));
    }

    #[test]
    fn unresolved_scan_is_a_no_op() {
        let mut app = test_app();
        load_cloud(&mut app);
        activate(&mut app, record(1));
        drain_edited(&mut app);

        pointer(&mut app, ViewKind::Top, PointerKind::Press, Vec2::new(0.9, 0.9));
        pointer(&mut app, ViewKind::Top, PointerKind::Release, Vec2::new(0.9, 0.9));

        assert!(drain_edited(&mut app).is_empty());
        assert!(action_is_idle(&app));
    }

    #[test]
    fn locked_object_rejects_every_gesture() {
        let mut app = test_app();
        load_cloud(&mut app);
        let mut object = record(2);
        object.locked = true;
        activate(&mut app, object);
        drain_edited(&mut app);

        pointer(&mut app, ViewKind::Top, PointerKind::Press, Vec2::ZERO);
        pointer(&mut app, ViewKind::Top, PointerKind::Move, Vec2::new(0.3, 0.0));
        pointer(&mut app, ViewKind::Top, PointerKind::Release, Vec2::new(0.3, 0.0));

        assert!(drain_edited(&mut app).is_empty());
        assert!(action_is_idle(&app));
    }

    #[test]
    fn pinned_object_refuses_translation() {
        let mut app = test_app();
        load_cloud(&mut app);
        let mut object = record(3);
        object.pinned = true;
        activate(&mut app, object);
        drain_edited(&mut app);

        pointer(&mut app, ViewKind::Top, PointerKind::Press, Vec2::ZERO);
        pointer(&mut app, ViewKind::Top, PointerKind::Move, Vec2::new(0.3, 0.0));
        pointer(&mut app, ViewKind::Top, PointerKind::Release, Vec2::new(0.3, 0.0));

        assert!(drain_edited(&mut app).is_empty());
        assert!(action_is_idle(&app));
        let selected = app.world().resource::<SelectedCuboid>();
        assert_eq!(selected.pose.center, Vec3::ZERO);
    }

    #[test]
    fn corner_handle_resolves_to_a_resize_commit() {
        let mut app = test_app();
        load_cloud(&mut app);
        activate(&mut app, record(4));
        drain_edited(&mut app);

        // Project the +X+Y+Z corner through the fitted top camera.
        let corner_ndc = {
            let views = app.world().resource::<Views>();
            let state = views.get(ViewKind::Top);
            state
                .camera
                .world_to_ndc(Vec3::new(0.5, 0.5, 0.5), state.aspect())
                .unwrap()
                .truncate()
        };
        pointer(&mut app, ViewKind::Top, PointerKind::Press, corner_ndc);
        {
            let interaction = app.world().resource::<Interaction>();
            assert!(matches!(interaction.action, InteractionAction::Resizing(_)));
        }
        let dragged = corner_ndc + Vec2::new(corner_ndc.x * 0.2, 0.0);
        pointer(&mut app, ViewKind::Top, PointerKind::Move, dragged);
        pointer(&mut app, ViewKind::Top, PointerKind::Release, dragged);

        let edits = drain_edited(&mut app);
        assert_eq!(edits.len(), 1);
        // Scale grew along X by the cursor ratio, stayed put along Y.
        assert!((edits[0].points[6] - 1.2).abs() < 1e-3);
        assert!((edits[0].points[7] - 1.0).abs() < 1e-3);
        assert!(action_is_idle(&app));
    }

    #[test]
    fn rotation_handle_spins_and_reparents_cameras() {
        let mut app = test_app();
        load_cloud(&mut app);
        activate(&mut app, record(5));
        drain_edited(&mut app);

        let handle_ndc = {
            let views = app.world().resource::<Views>();
            let state = views.get(ViewKind::Top);
            state
                .camera
                .world_to_ndc(Vec3::new(0.75, 0.0, 0.0), state.aspect())
                .unwrap()
                .truncate()
        };
        pointer(&mut app, ViewKind::Top, PointerKind::Press, handle_ndc);
        {
            let world = app.world();
            assert!(matches!(
                world.resource::<Interaction>().action,
                InteractionAction::Rotating(_)
            ));
            let views = world.resource::<Views>();
            assert!(matches!(
                views.get(ViewKind::Side).camera.mode,
                CameraMode::TrackingObject { .. }
            ));
        }

        // Sweep the cursor clockwise around the viewport center.
        app.world_mut().send_event(CanvasPointerEvent {
            view: ViewKind::Top,
            kind: PointerKind::Move,
            ndc: handle_ndc + Vec2::new(0.0, -0.1),
            screen: Vec2::new(500.0, 250.0),
        });
        app.update();
        pointer(&mut app, ViewKind::Top, PointerKind::Release, handle_ndc);

        let edits = drain_edited(&mut app);
        assert_eq!(edits.len(), 1);
        let step = std::f32::consts::PI / constants::canvas_settings::ROTATION_SPEED;
        assert!((edits[0].points[5].abs() - step).abs() < 1e-4);
        assert!(action_is_idle(&app));
        let views = app.world().resource::<Views>();
        assert!(matches!(
            views.get(ViewKind::Side).camera.mode,
            CameraMode::Free
        ));
    }
}
