//! Point colorization: the colormap fallback plus per-object painting of
//! every point inside an annotated cuboid.

use bevy::prelude::*;

use constants::canvas_settings::MEMBERSHIP_EPSILON;

use crate::engine::annotations::AnnotatedObjects;
use crate::engine::core::canvas_state::CanvasOptions;
use crate::engine::point_cloud::PointCloud;
use crate::engine::spatial_index::GridPointIndex;

/// Repaints the whole cloud: colormap fallback first, then every annotated
/// object claims its member points. O(N) plus one grid query per object, so
/// it only runs when objects or color options actually change.
pub fn colorize_full_cloud(
    mut cloud: ResMut<PointCloud>,
    index: Option<Res<GridPointIndex>>,
    objects: Res<AnnotatedObjects>,
    options: Res<CanvasOptions>,
) {
    cloud.apply_colormap(options.colormap, options.colormap_mode);
    let Some(index) = index else {
        return;
    };

    let mut painted = 0usize;
    for object in &objects.objects {
        if object.hidden {
            continue;
        }
        let pose = object.pose();
        let color = object.color(options.color_by);
        for candidate in index.query(&pose, 1.0) {
            if pose.contains(cloud.position(candidate), 1.0, MEMBERSHIP_EPSILON) {
                cloud.paint(candidate, color);
                painted += 1;
            }
        }
    }
    debug!(
        "colorized cloud: {} objects, {painted} points claimed",
        objects.objects.len()
    );
}

/// Change-driven wrapper: recolor when the object set or the color options
/// moved, never on a quiet frame.
pub fn colorize_on_change(
    cloud: ResMut<PointCloud>,
    index: Option<Res<GridPointIndex>>,
    objects: Res<AnnotatedObjects>,
    options: Res<CanvasOptions>,
) {
    if !objects.is_changed() && !options.is_changed() {
        return;
    }
    colorize_full_cloud(cloud, index, objects, options);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    use crate::engine::annotations::ObjectRecord;
    use crate::engine::cuboid::CuboidPose;

    fn record(client_id: i64, pose: CuboidPose) -> ObjectRecord {
        ObjectRecord {
            client_id,
            points: pose.to_record(),
            label_color: [1.0, 0.0, 0.0],
            instance_color: [0.0, 1.0, 0.0],
            group_color: [0.0, 0.0, 1.0],
            occluded: false,
            locked: false,
            pinned: false,
            hidden: false,
        }
    }

    fn world_with(objects: Vec<ObjectRecord>, positions: Vec<Vec3>) -> bevy::ecs::world::World {
        let mut world = bevy::ecs::world::World::new();
        let cloud = PointCloud::new(positions, None, None);
        let index = GridPointIndex::build(cloud.positions(), 1.0).unwrap();
        world.insert_resource(cloud);
        world.insert_resource(index);
        world.insert_resource(AnnotatedObjects { objects });
        world.insert_resource(CanvasOptions::default());
        world
    }

    #[test]
    fn member_points_take_the_object_color() {
        let mut world = world_with(
            vec![record(1, CuboidPose::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE))],
            vec![Vec3::ZERO, Vec3::new(0.4, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)],
        );
        world.run_system_once(colorize_full_cloud).expect("system runs");

        let cloud = world.resource::<PointCloud>();
        assert_eq!(cloud.colors()[0], [1.0, 0.0, 0.0]);
        assert_eq!(cloud.colors()[1], [1.0, 0.0, 0.0]);
        assert_ne!(cloud.colors()[2], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn hidden_objects_do_not_paint() {
        let mut object = record(1, CuboidPose::default());
        object.hidden = true;
        let mut world = world_with(vec![object], vec![Vec3::ZERO]);
        world.run_system_once(colorize_full_cloud).expect("system runs");

        let cloud = world.resource::<PointCloud>();
        assert_ne!(cloud.colors()[0], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn color_follows_the_color_by_mode() {
        use crate::engine::core::canvas_state::ColorBy;
        let object = record(1, CuboidPose::default());
        assert_eq!(object.color(ColorBy::Label), [1.0, 0.0, 0.0]);
        assert_eq!(object.color(ColorBy::Instance), [0.0, 1.0, 0.0]);
        assert_eq!(object.color(ColorBy::Group), [0.0, 0.0, 1.0]);
    }
}
