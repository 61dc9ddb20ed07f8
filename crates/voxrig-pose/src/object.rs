use voxrig_model::AnimationType;

use crate::PoseFrame;

/// Objects move only as a whole; part tags are ignored.
pub(crate) fn apply(frame: &mut PoseFrame, animation: AnimationType, t: f64) {
    let root = &mut frame.root;
    match animation {
        AnimationType::Spin => {
            root.rotation.y = t as f32;
            root.position.y += ((t * 2.0).sin() * 0.1) as f32;
        }
        AnimationType::Float => {
            root.position.y += (t.sin() * 0.3) as f32;
            root.rotation.x = ((t * 0.5).sin() * 0.05) as f32;
            root.rotation.z = ((t * 0.4).cos() * 0.05) as f32;
        }
        AnimationType::Idle => {
            root.position.y += (t.sin() * 0.05) as f32;
        }
        _ => {}
    }
}
