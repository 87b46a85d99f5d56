// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Agent-to-simulator messages.

use std::fmt::Write;

use simbridge_structures::JointId;

/// Acknowledgement token closing every agent message.
pub const SYNC_TOKEN: &str = "(syn)";

/// Longest text the simulator relays through `say`.
pub const MAX_SAY_LENGTH: usize = 20;

/// Scene file selecting the humanoid embodiment.
pub const DEFAULT_SCENE: &str = "rsg/agent/nao/nao.rsg";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SayMessageError {
    #[error("Say message is empty")]
    Empty,
    #[error("Say message has {length} characters, at most {max} are allowed", max = MAX_SAY_LENGTH)]
    TooLong { length: usize },
    #[error("Say message contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Text accepted by the simulator's `say` effector: 1 to 20 printable ASCII
/// characters, no whitespace, no parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SayMessage(String);

impl SayMessage {
    pub fn new(text: &str) -> Result<Self, SayMessageError> {
        if text.is_empty() {
            return Err(SayMessageError::Empty);
        }
        if let Some(bad) = text
            .chars()
            .find(|c| !c.is_ascii_graphic() || *c == '(' || *c == ')')
        {
            return Err(SayMessageError::InvalidCharacter(bad));
        }
        if text.len() > MAX_SAY_LENGTH {
            return Err(SayMessageError::TooLong { length: text.len() });
        }
        Ok(SayMessage(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Render one cycle's effector message.
///
/// Joint commands appear in the order given, followed by the optional `say`
/// and the terminating [`SYNC_TOKEN`].
pub fn render_effector_message<I>(joint_velocities: I, say: Option<&SayMessage>) -> String
where
    I: IntoIterator<Item = (JointId, f64)>,
{
    let mut message = String::new();
    for (joint, velocity) in joint_velocities {
        // Writing into a String cannot fail.
        let _ = write!(message, "({} {})", joint.effector_id(), velocity);
    }
    if let Some(say) = say {
        let _ = write!(message, "(say {})", say.as_str());
    }
    message.push_str(SYNC_TOKEN);
    message
}

pub fn scene_message(scene: &str) -> String {
    format!("(scene {})", scene)
}

pub fn init_message(unum: u8, team: &str) -> String {
    format!("(init (unum {})(teamname {}))", unum, team)
}

pub fn beam_message(x: f64, y: f64, rotation: f64) -> String {
    format!("(beam {} {} {})", x, y, rotation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effector_message_layout() {
        let say = SayMessage::new("hello").unwrap();
        let message = render_effector_message(
            [(JointId::NeckYaw, 0.5), (JointId::RightArmYaw, -1.25)],
            Some(&say),
        );
        assert_eq!(message, "(he1 0.5)(rae4 -1.25)(say hello)(syn)");
    }

    #[test]
    fn test_empty_message_is_sync_only() {
        assert_eq!(render_effector_message(Vec::new(), None), "(syn)");
    }

    #[test]
    fn test_say_validation() {
        assert!(SayMessage::new("pass_to_7").is_ok());
        assert_eq!(SayMessage::new(""), Err(SayMessageError::Empty));
        assert_eq!(
            SayMessage::new("abcdefghijklmnopqrstu"),
            Err(SayMessageError::TooLong { length: 21 })
        );
        assert_eq!(
            SayMessage::new("two words"),
            Err(SayMessageError::InvalidCharacter(' '))
        );
        assert_eq!(
            SayMessage::new("a(b"),
            Err(SayMessageError::InvalidCharacter('('))
        );
    }

    #[test]
    fn test_handshake_messages() {
        assert_eq!(scene_message(DEFAULT_SCENE), "(scene rsg/agent/nao/nao.rsg)");
        assert_eq!(init_message(3, "Robots"), "(init (unum 3)(teamname Robots))");
        assert_eq!(beam_message(-3.5, 0.0, 90.0), "(beam -3.5 0 90)");
    }
}
