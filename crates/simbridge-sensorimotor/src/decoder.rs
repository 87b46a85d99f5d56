// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Perception decoder.
//!
//! Walks the top-level fragments of a simulator message and dispatches on
//! their tag. A fragment that fails to convert is logged and skipped; the rest
//! of the message is still decoded.

use simbridge_serialization::{parse_message, ParseError, SymbolNode};
use simbridge_structures::{
    DVec3, FlagId, GoalPostId, JointId, JointVector, PlayMode, PolarCoordinate,
};
use tracing::{debug, trace, warn};

use crate::error::{PerceptionError, Result};
use crate::snapshot::{
    ForceReading, GameState, HeardMessage, LineDetection, PlayerDetection, SensorSnapshot,
    VisionFrame,
};

const TAG_TIME: &str = "time";
const TAG_HINGE_JOINT: &str = "HJ";
const TAG_GYRO: &str = "GYR";
const TAG_ACCELEROMETER: &str = "ACC";
const TAG_FORCE_RESISTANCE: &str = "FRP";
const TAG_VISION: &str = "See";
const TAG_HEAR: &str = "hear";
const TAG_GAME_STATE: &str = "GS";

const SELF_SPEAKER: &str = "self";

#[derive(Debug, Clone, Default)]
pub struct PerceptionDecoder {
    joint_angles: JointVector,
    cycles_decoded: u64,
    fragment_errors: u64,
}

impl PerceptionDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one raw message. Never fails: an unparsable message yields a
    /// snapshot holding only the carried-forward joint angles.
    pub fn decode(&mut self, raw: &str) -> SensorSnapshot {
        match self.try_decode(raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "discarding unparsable perception message");
                SensorSnapshot::with_joint_angles(self.joint_angles)
            }
        }
    }

    /// Like [`decode`](Self::decode) but reports a message that is not a
    /// well-formed expression list, which means the stream is out of sync.
    pub fn try_decode(&mut self, raw: &str) -> std::result::Result<SensorSnapshot, ParseError> {
        let root = parse_message(raw)?;
        Ok(self.decode_tree(&root))
    }

    /// Decode an already parsed message root.
    pub fn decode_tree(&mut self, root: &SymbolNode) -> SensorSnapshot {
        let mut snapshot = SensorSnapshot::with_joint_angles(self.joint_angles);

        for fragment in root.nodes() {
            let Some(tag) = fragment.tag() else {
                trace!(fragment = %fragment, "fragment without tag");
                continue;
            };
            let outcome = match tag {
                TAG_TIME => decode_time(fragment, &mut snapshot),
                TAG_HINGE_JOINT => decode_hinge_joint(fragment, &mut snapshot),
                TAG_GYRO => decode_gyro(fragment, &mut snapshot),
                TAG_ACCELEROMETER => decode_accelerometer(fragment, &mut snapshot),
                TAG_FORCE_RESISTANCE => decode_force_resistance(fragment, &mut snapshot),
                TAG_VISION => decode_vision(fragment, &mut snapshot),
                TAG_HEAR => decode_hear(fragment, &mut snapshot),
                TAG_GAME_STATE => decode_game_state(fragment, &mut snapshot),
                _ => {
                    trace!(tag, "ignoring unknown perceptor");
                    Ok(())
                }
            };
            if let Err(e) = outcome {
                self.fragment_errors += 1;
                warn!(tag, error = %e, "skipping malformed perceptor fragment");
            }
        }

        self.joint_angles = snapshot.joint_angles;
        self.cycles_decoded += 1;
        snapshot
    }

    /// Joint angles from the most recent cycle, in radians.
    pub fn last_joint_angles(&self) -> &JointVector {
        &self.joint_angles
    }

    pub fn cycles_decoded(&self) -> u64 {
        self.cycles_decoded
    }

    /// Fragments skipped since creation.
    pub fn fragment_errors(&self) -> u64 {
        self.fragment_errors
    }
}

fn field<'a>(fragment: &'a SymbolNode, name: &'static str) -> Result<&'a SymbolNode> {
    fragment.find(name).ok_or(PerceptionError::MissingField(name))
}

fn leaf<'a>(node: &'a SymbolNode, field: &'static str, index: usize) -> Result<&'a str> {
    node.leaf(index)
        .ok_or(PerceptionError::MissingValue { field, index })
}

/// The simulator occasionally sends `nan`; treat anything non-finite as unreadable.
fn finite(text: &str) -> Result<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| PerceptionError::InvalidNumber(text.to_string()))
}

fn number(node: &SymbolNode, field: &'static str, index: usize) -> Result<f64> {
    finite(leaf(node, field, index)?)
}

/// `(tag x y z)`
fn vector(node: &SymbolNode, field: &'static str) -> Result<DVec3> {
    Ok(DVec3::new(
        number(node, field, 1)?,
        number(node, field, 2)?,
        number(node, field, 3)?,
    ))
}

/// `(pol distance azimuth elevation)` with angles in degrees.
fn polar(node: &SymbolNode) -> Result<PolarCoordinate> {
    if node.len() != 4 || node.tag() != Some("pol") {
        return Err(PerceptionError::Malformed(format!(
            "expected (pol d a e), got ({})",
            node
        )));
    }
    Ok(PolarCoordinate::from_degrees(
        number(node, "pol", 1)?,
        number(node, "pol", 2)?,
        number(node, "pol", 3)?,
    ))
}

/// `(time (now 46.20))`
fn decode_time(fragment: &SymbolNode, snapshot: &mut SensorSnapshot) -> Result<()> {
    snapshot.server_time = Some(number(field(fragment, "now")?, "now", 1)?);
    Ok(())
}

/// `(HJ (n hj1) (ax -0.00))`, angle in degrees
fn decode_hinge_joint(fragment: &SymbolNode, snapshot: &mut SensorSnapshot) -> Result<()> {
    let name = leaf(field(fragment, "n")?, "n", 1)?;
    let joint = JointId::from_perceptor_id(name).ok_or_else(|| {
        PerceptionError::UnknownIdentifier {
            kind: "hinge joint",
            id: name.to_string(),
        }
    })?;
    let degrees = number(field(fragment, "ax")?, "ax", 1)?;
    snapshot.joint_angles.set(joint, degrees.to_radians());
    Ok(())
}

/// `(GYR (n torso) (rt 0.01 0.07 0.46))`
fn decode_gyro(fragment: &SymbolNode, snapshot: &mut SensorSnapshot) -> Result<()> {
    snapshot.gyro = Some(vector(field(fragment, "rt")?, "rt")?);
    Ok(())
}

/// `(ACC (n torso) (a 0.00 -0.00 9.81))`
fn decode_accelerometer(fragment: &SymbolNode, snapshot: &mut SensorSnapshot) -> Result<()> {
    snapshot.accelerometer = Some(vector(field(fragment, "a")?, "a")?);
    Ok(())
}

/// `(FRP (n lf) (c -0.01 -0.02 -0.01) (f 0.00 0.00 22.79))`
fn decode_force_resistance(fragment: &SymbolNode, snapshot: &mut SensorSnapshot) -> Result<()> {
    let name = leaf(field(fragment, "n")?, "n", 1)?;
    let reading = ForceReading {
        contact: vector(field(fragment, "c")?, "c")?,
        force: vector(field(fragment, "f")?, "f")?,
    };
    match name {
        "lf" => snapshot.left_foot = Some(reading),
        "rf" => snapshot.right_foot = Some(reading),
        other => {
            return Err(PerceptionError::UnknownIdentifier {
                kind: "foot",
                id: other.to_string(),
            })
        }
    }
    Ok(())
}

/// `(See (G1L (pol ..)) (F2R (pol ..)) (B (pol ..)) (L (pol ..) (pol ..)) (P (team T) (id 3) (head (pol ..)) ..))`
///
/// Individual detections that fail to convert are treated as not seen.
fn decode_vision(fragment: &SymbolNode, snapshot: &mut SensorSnapshot) -> Result<()> {
    let mut vision = VisionFrame::default();

    for entity in fragment.nodes() {
        let Some(kind) = entity.tag() else {
            continue;
        };
        match kind {
            "B" => match entity_polar(entity) {
                Ok(position) => vision.ball = Some(position),
                Err(e) => debug!(entity = kind, error = %e, "ball not detected"),
            },
            "L" => match decode_line(entity) {
                Ok(line) => vision.lines.push(line),
                Err(e) => debug!(entity = kind, error = %e, "line not detected"),
            },
            "P" => vision.players.push(decode_player(entity)),
            _ if kind.starts_with('G') => match GoalPostId::from_wire(kind) {
                Some(id) => match entity_polar(entity) {
                    Ok(position) => {
                        vision.goal_posts.insert(id, position);
                    }
                    Err(e) => debug!(entity = kind, error = %e, "goal post not detected"),
                },
                None => debug!(entity = kind, "unknown goal post"),
            },
            _ if kind.starts_with('F') => match FlagId::from_wire(kind) {
                Some(id) => match entity_polar(entity) {
                    Ok(position) => {
                        vision.flags.insert(id, position);
                    }
                    Err(e) => debug!(entity = kind, error = %e, "flag not detected"),
                },
                None => debug!(entity = kind, "unknown flag"),
            },
            _ => trace!(entity = kind, "ignoring unknown vision entity"),
        }
    }

    snapshot.vision = Some(vision);
    Ok(())
}

/// `(X (pol d a e))`
fn entity_polar(entity: &SymbolNode) -> Result<PolarCoordinate> {
    polar(field(entity, "pol")?)
}

/// `(L (pol d a e) (pol d a e))`
fn decode_line(entity: &SymbolNode) -> Result<LineDetection> {
    let mut ends = entity.nodes().filter(|node| node.tag() == Some("pol"));
    let start = polar(ends.next().ok_or(PerceptionError::MissingField("pol"))?)?;
    let end = polar(ends.next().ok_or(PerceptionError::MissingField("pol"))?)?;
    Ok(LineDetection { start, end })
}

/// `(P (team Rivals) (id 7) (head (pol ..)) (rlowerarm (pol ..)) ..)`
fn decode_player(entity: &SymbolNode) -> PlayerDetection {
    let mut player = PlayerDetection::default();
    for part in entity.nodes() {
        match part.tag() {
            Some("team") => player.team = part.leaf(1).map(str::to_string),
            Some("id") => player.id = part.leaf(1).map(str::to_string),
            Some(name) => match part.node(1).map(polar) {
                Some(Ok(position)) => {
                    player.body_parts.insert(name.to_string(), position);
                }
                Some(Err(e)) => debug!(body_part = name, error = %e, "body part not detected"),
                None => trace!(body_part = name, "body part without coordinate"),
            },
            None => {}
        }
    }
    player
}

/// `(hear 12.34 self hello)`, `(hear 12.34 -30.5 hello)` or, from newer
/// simulators, `(hear Team 12.34 -30.5 hello)`.
fn decode_hear(fragment: &SymbolNode, snapshot: &mut SensorSnapshot) -> Result<()> {
    let first = leaf(fragment, "hear", 1)?;
    let (team, offset) = match finite(first) {
        Ok(_) => (None, 1),
        Err(_) => (Some(first.to_string()), 2),
    };

    let time = number(fragment, "hear", offset)?;
    let direction = leaf(fragment, "hear", offset + 1)?;
    if direction == SELF_SPEAKER {
        return Ok(());
    }
    let direction = finite(direction)?.to_radians();

    let words: Vec<String> = fragment.children()[offset + 2..]
        .iter()
        .map(ToString::to_string)
        .collect();
    if words.is_empty() {
        return Err(PerceptionError::MissingValue {
            field: "hear",
            index: offset + 2,
        });
    }

    snapshot.heard.push(HeardMessage {
        time,
        direction,
        team,
        text: words.join(" "),
    });
    Ok(())
}

/// `(GS (unum 1) (team left) (t 0.00) (pm BeforeKickOff))`
fn decode_game_state(fragment: &SymbolNode, snapshot: &mut SensorSnapshot) -> Result<()> {
    let mut state = GameState {
        play_time: 0.0,
        play_mode: None,
    };
    for entry in fragment.nodes() {
        match entry.tag() {
            Some("t") => state.play_time = number(entry, "t", 1)?,
            Some("pm") => {
                let mode = leaf(entry, "pm", 1)?;
                state.play_mode = PlayMode::from_wire(mode);
                if state.play_mode.is_none() {
                    debug!(play_mode = mode, "unknown play mode");
                }
            }
            Some(other) => trace!(field = other, "ignoring game state field"),
            None => {}
        }
    }
    snapshot.game_state = Some(state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag_only_yields_empty_snapshot() {
        let mut decoder = PerceptionDecoder::new();
        let snapshot = decoder.decode("(XYZ (foo 1 2 3))");
        assert_eq!(snapshot, SensorSnapshot::default());
        assert_eq!(decoder.fragment_errors(), 0);
    }

    #[test]
    fn test_unparsable_message_does_not_escape_decode() {
        let mut decoder = PerceptionDecoder::new();
        decoder.decode("(HJ (n hj1) (ax 90.0))");

        let snapshot = decoder.decode("(time (now 1.0)");
        assert!(snapshot.server_time.is_none());
        assert!((snapshot.joint_angles[JointId::NeckYaw] - 90f64.to_radians()).abs() < 1e-12);
        assert!(decoder.try_decode("(time (now 1.0)").is_err());
    }

    #[test]
    fn test_nan_azimuth_leaves_entity_absent() {
        let mut decoder = PerceptionDecoder::new();
        let snapshot =
            decoder.decode("(See (B (pol 3.0 nan 1.0)) (G1L (pol 10.0 20.0 nan)) (F1R (pol 5.0 -10.0 2.0)))");
        let vision = snapshot.vision.expect("See fragment present");
        assert!(vision.ball.is_none());
        assert!(vision.goal_post(GoalPostId::G1L).is_none());
        assert!(vision.flag(FlagId::F1R).is_some());
    }

    #[test]
    fn test_hinge_joint_in_radians_and_carried_forward() {
        let mut decoder = PerceptionDecoder::new();
        let first = decoder.decode("(HJ (n laj1) (ax -90.00))(HJ (n rlj4) (ax 45))");
        assert!((first.joint_angles[JointId::LeftShoulderPitch] + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((first.joint_angles[JointId::RightKneePitch] - std::f64::consts::FRAC_PI_4).abs() < 1e-12);

        let second = decoder.decode("(time (now 2.0))");
        assert_eq!(second.joint_angles, first.joint_angles);
        assert_eq!(second.server_time, Some(2.0));
    }

    #[test]
    fn test_malformed_fragment_does_not_abort_cycle() {
        let mut decoder = PerceptionDecoder::new();
        let snapshot = decoder.decode(
            "(time (now 3.5))(GYR (n torso) (rt 1 nan 3))(HJ (n xx9) (ax 1))(ACC (n torso) (a 0.1 0.2 9.8))",
        );
        assert_eq!(snapshot.server_time, Some(3.5));
        assert!(snapshot.gyro.is_none());
        assert_eq!(snapshot.accelerometer, Some(DVec3::new(0.1, 0.2, 9.8)));
        assert_eq!(decoder.fragment_errors(), 2);
    }

    #[test]
    fn test_optional_fields_do_not_carry_forward() {
        let mut decoder = PerceptionDecoder::new();
        let first = decoder.decode("(GYR (n torso) (rt 1 2 3))(GS (t 1.0) (pm PlayOn))");
        assert!(first.gyro.is_some());
        assert!(first.game_state.is_some());

        let second = decoder.decode("(time (now 1.02))");
        assert!(second.gyro.is_none());
        assert!(second.game_state.is_none());
    }

    #[test]
    fn test_hear_skips_own_messages() {
        let mut decoder = PerceptionDecoder::new();
        let snapshot = decoder.decode(
            "(hear 12.3 self ignored)(hear 12.3 -90 go left)(hear Rivals 12.4 45.0 mine)",
        );
        assert_eq!(snapshot.heard.len(), 2);
        assert_eq!(snapshot.heard[0].text, "go left");
        assert!((snapshot.heard[0].direction + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(snapshot.heard[0].team, None);
        assert_eq!(snapshot.heard[1].team.as_deref(), Some("Rivals"));
        assert_eq!(snapshot.heard[1].time, 12.4);
    }
}
