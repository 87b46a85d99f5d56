//! Decoding a complete simulator cycle message.

use simbridge_sensorimotor::{LocalFieldView, PerceptionDecoder};
use simbridge_structures::{BodyPart, DVec3, FlagId, GoalPostId, JointId, PlayMode};

const CYCLE: &str = "(time (now 104.58))\
(GS (unum 1) (team left) (t 12.34) (pm PlayOn))\
(GYR (n torso) (rt 0.01 -0.07 0.46))\
(ACC (n torso) (a 0.00 0.32 9.81))\
(HJ (n hj1) (ax 30.00))(HJ (n hj2) (ax -10.00))\
(See (G1L (pol 8.42 -31.62 1.35)) (G2R (pol 20.1 12.0 0.5)) (F1R (pol 3.2 50.0 -2.0)) \
(B (pol 1.51 -20.00 -24.17)) \
(P (team Rivals) (id 7) (head (pol 4.1 10.0 2.0)) (rfoot (pol 4.0 11.0 -8.0))) \
(P (team Robots) (id 1) (head (pol 0.1 0.0 0.0))) \
(L (pol 3.0 -40.0 -10.0) (pol 5.0 30.0 -6.0)))\
(HJ (n llj4) (ax -60.5))\
(FRP (n lf) (c -0.01 -0.02 -0.01) (f 0.00 0.00 22.79))\
(FRP (n rf) (c 0.01 0.02 -0.01) (f 0.00 0.00 23.01))\
(hear 12.30 -45.00 pass)";

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn decodes_every_perceptor() {
    let mut decoder = PerceptionDecoder::new();
    let snapshot = decoder.decode(CYCLE);

    assert_eq!(snapshot.server_time, Some(104.58));
    let game = snapshot.game_state.expect("game state");
    assert_eq!(game.play_time, 12.34);
    assert_eq!(game.play_mode, Some(PlayMode::PlayOn));

    assert_eq!(snapshot.gyro, Some(DVec3::new(0.01, -0.07, 0.46)));
    assert_eq!(snapshot.accelerometer, Some(DVec3::new(0.0, 0.32, 9.81)));
    assert!(close(snapshot.joint_angles[JointId::NeckYaw], 30f64.to_radians()));
    assert!(close(snapshot.joint_angles[JointId::NeckPitch], (-10f64).to_radians()));
    assert!(close(snapshot.joint_angles[JointId::LeftKneePitch], (-60.5f64).to_radians()));

    let left = snapshot.left_foot.expect("left foot");
    assert_eq!(left.force, DVec3::new(0.0, 0.0, 22.79));
    assert!(snapshot.right_foot.is_some());

    let vision = snapshot.vision.as_ref().expect("vision");
    let ball = vision.ball.expect("ball");
    assert!(close(ball.azimuth, (-20f64).to_radians()));
    assert!(vision.goal_post(GoalPostId::G1L).is_some());
    assert!(vision.goal_post(GoalPostId::G1R).is_none());
    assert!(vision.flag(FlagId::F1R).is_some());
    assert_eq!(vision.lines.len(), 1);
    assert_eq!(vision.players.len(), 2);
    assert!(vision.players[0].body_part(BodyPart::RightFoot).is_some());

    assert_eq!(snapshot.heard.len(), 1);
    assert_eq!(snapshot.heard[0].text, "pass");
    assert_eq!(decoder.fragment_errors(), 0);
}

#[test]
fn field_view_drops_own_body_and_rotates_by_neck() {
    let mut decoder = PerceptionDecoder::new();
    let snapshot = decoder.decode(CYCLE);
    let mut view = LocalFieldView::new("Robots", "1");
    view.update(&snapshot);

    let players: Vec<_> = view.players().collect();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].value.id.as_deref(), Some("7"));

    let ball = view.ball_in_view().expect("ball in view");
    assert!(close(ball.azimuth, 10f64.to_radians()));
    assert!(close(ball.elevation, (-34.17f64).to_radians()));
}

#[test]
fn snapshot_serializes_to_json() {
    let mut decoder = PerceptionDecoder::new();
    let snapshot = decoder.decode(CYCLE);
    let json = serde_json::to_value(&snapshot).expect("serializable");

    assert_eq!(json["server_time"], serde_json::json!(104.58));
    assert_eq!(json["game_state"]["play_mode"], serde_json::json!("PlayOn"));
    assert_eq!(json["joint_angles"].as_array().map(Vec::len), Some(22));
    assert!(json["vision"]["goal_posts"]["G1L"].is_object());
}
