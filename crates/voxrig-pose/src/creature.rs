use std::f64::consts::{FRAC_PI_2, PI};

use voxrig_model::{AnimationType, BodyPart};

use crate::PoseFrame;

const WALK_RATE: f64 = 6.0;
const RUN_RATE: f64 = 10.0;
const WALK_SWING: f32 = 0.4;
const RUN_SWING: f32 = 0.6;
const JUMP_RATE: f64 = 4.0;
const JUMP_HEIGHT: f64 = 3.0;
/// Root height above which the airborne tuck applies.
const TUCK_THRESHOLD: f32 = 0.5;
const STRIKE_RATE: f64 = 8.0;

pub(crate) fn apply(frame: &mut PoseFrame, animation: AnimationType, t: f64, flex: f32) {
    match animation {
        AnimationType::Idle => idle(frame, t, flex),
        AnimationType::Walk => locomotion(frame, t, flex, WALK_RATE, WALK_SWING),
        AnimationType::Run => locomotion(frame, t, flex, RUN_RATE, RUN_SWING),
        AnimationType::Jump => jump(frame, t, flex),
        AnimationType::Attack => attack(frame, t, flex),
        // Object-only vocabulary leaves creatures at rest.
        AnimationType::None | AnimationType::Spin | AnimationType::Float => {}
    }
}

#[inline]
fn sin(x: f64) -> f32 {
    x.sin() as f32
}

fn idle(frame: &mut PoseFrame, t: f64, flex: f32) {
    let breathe = sin(t * 2.0) * 0.05 * flex;
    frame.adjust(BodyPart::Torso, |tr| tr.position.y += breathe);
    frame.adjust(BodyPart::Head, |tr| {
        tr.position.y += breathe * 0.5;
        tr.rotation.x = sin(t * 1.5) * 0.05 * flex;
    });
    frame.adjust(BodyPart::Tail, |tr| tr.rotation.x = sin(t * 3.0) * 0.1 * flex);

    // Wing flap ignores stiffness.
    let flap = sin(t * 4.0) * 0.2;
    frame.adjust(BodyPart::WingL, |tr| tr.rotation.z = flap);
    frame.adjust(BodyPart::WingR, |tr| tr.rotation.z = -flap);

    let sway = sin(t * 2.0) * 0.05;
    frame.adjust(BodyPart::LeftArm, |tr| tr.rotation.z = (0.1 + sway) * flex);
    frame.adjust(BodyPart::RightArm, |tr| tr.rotation.z = (-0.1 - sway) * flex);
}

fn locomotion(frame: &mut PoseFrame, t: f64, flex: f32, rate: f64, swing: f32) {
    let cycle = t * rate;
    let amp = swing * flex;

    frame.root.position.y += sin(cycle).abs() * 0.2 * flex;
    frame.root.rotation.x = sin(cycle) * 0.05 * flex;

    let fwd = sin(cycle) * amp;
    let back = sin(cycle + PI) * amp;
    frame.adjust(BodyPart::LeftLeg, |tr| tr.rotation.x = fwd);
    frame.adjust(BodyPart::RightLeg, |tr| tr.rotation.x = back);
    // Arms counter-swing against the leg on the same side.
    frame.adjust(BodyPart::LeftArm, |tr| tr.rotation.x = back);
    frame.adjust(BodyPart::RightArm, |tr| tr.rotation.x = fwd);

    let double = sin(cycle * 2.0);
    frame.adjust(BodyPart::Head, |tr| tr.rotation.x = double * 0.05 * flex);
    frame.adjust(BodyPart::Tail, |tr| tr.rotation.x = double * 0.2 * flex);
    frame.adjust(BodyPart::WingL, |tr| tr.rotation.z = double * 0.5);
    frame.adjust(BodyPart::WingR, |tr| tr.rotation.z = -double * 0.5);
}

fn jump(frame: &mut PoseFrame, t: f64, flex: f32) {
    let height = ((t * JUMP_RATE).sin() * JUMP_HEIGHT).max(0.0) as f32;
    frame.root.position.y += height;
    if height <= TUCK_THRESHOLD {
        return;
    }
    for leg in [BodyPart::LeftLeg, BodyPart::RightLeg] {
        frame.adjust(leg, |tr| tr.rotation.x = -0.5 * flex);
    }
    for arm in [BodyPart::LeftArm, BodyPart::RightArm] {
        frame.adjust(arm, |tr| tr.rotation.x = 0.3 * flex);
    }
    frame.adjust(BodyPart::WingL, |tr| tr.rotation.z = 0.8);
    frame.adjust(BodyPart::WingR, |tr| tr.rotation.z = -0.8);
}

fn attack(frame: &mut PoseFrame, t: f64, flex: f32) {
    let strike = (t * STRIKE_RATE).sin();
    frame.adjust(BodyPart::Torso, |tr| tr.rotation.y = (strike * 0.3) as f32 * flex);
    frame.adjust(BodyPart::Head, |tr| tr.rotation.y = (strike * 0.2) as f32 * flex);
    frame.adjust(BodyPart::RightArm, |tr| {
        tr.rotation.x = (-FRAC_PI_2 + strike * 1.5) as f32 * flex;
    });
}
