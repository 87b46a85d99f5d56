// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Local field view
//!
//! Keeps the most recent sighting of every visible object, rotated from the
//! camera frame into the torso frame using the neck joint angles of the same
//! cycle. Items stay "in view" for [`UP_TO_DATE_PERIOD`] seconds of server
//! time after their last sighting.

use std::collections::BTreeMap;

use serde::Serialize;
use simbridge_structures::{FlagId, GoalPostId, JointId, PolarCoordinate};
use tracing::trace;

use crate::snapshot::{LineDetection, PlayerDetection, SensorSnapshot};

/// Seconds an item counts as currently visible after it was last seen.
pub const UP_TO_DATE_PERIOD: f64 = 0.05;

/// Last sighting of something, with the server time it was made at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedItem<T> {
    pub value: T,
    pub timestamp: f64,
    pub in_view: bool,
}

impl<T> DatedItem<T> {
    fn seen(value: T, timestamp: f64) -> Self {
        DatedItem {
            value,
            timestamp,
            in_view: true,
        }
    }

    fn expire(&mut self, now: f64) {
        if now - self.timestamp > UP_TO_DATE_PERIOD {
            self.in_view = false;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerModel {
    pub team: Option<String>,
    pub id: Option<String>,
    pub body_parts: BTreeMap<String, PolarCoordinate>,
}

/// Torso-relative model of the surroundings, refreshed once per cycle.
#[derive(Debug, Clone)]
pub struct LocalFieldView {
    own_team: String,
    own_id: String,
    now: f64,
    ball: Option<DatedItem<PolarCoordinate>>,
    goal_posts: BTreeMap<GoalPostId, DatedItem<PolarCoordinate>>,
    flags: BTreeMap<FlagId, DatedItem<PolarCoordinate>>,
    lines: Vec<DatedItem<LineDetection>>,
    players: BTreeMap<String, DatedItem<PlayerModel>>,
}

impl LocalFieldView {
    /// `own_team` and `own_id` identify the agent itself; its own body is
    /// never recorded as another player.
    pub fn new(own_team: impl Into<String>, own_id: impl Into<String>) -> Self {
        LocalFieldView {
            own_team: own_team.into(),
            own_id: own_id.into(),
            now: 0.0,
            ball: None,
            goal_posts: BTreeMap::new(),
            flags: BTreeMap::new(),
            lines: Vec::new(),
            players: BTreeMap::new(),
        }
    }

    pub fn update(&mut self, snapshot: &SensorSnapshot) {
        if let Some(time) = snapshot.server_time {
            self.now = time;
        }
        let now = self.now;
        let yaw = snapshot.joint_angles[JointId::NeckYaw];
        let pitch = snapshot.joint_angles[JointId::NeckPitch];
        let vision = snapshot.vision.as_ref();

        match vision {
            Some(frame) => {
                self.lines = frame
                    .lines
                    .iter()
                    .map(|line| {
                        let corrected = LineDetection {
                            start: line.start.rotated(yaw, pitch),
                            end: line.end.rotated(yaw, pitch),
                        };
                        DatedItem::seen(corrected, now)
                    })
                    .collect();
            }
            None => {
                let stale = self
                    .lines
                    .first()
                    .is_some_and(|line| now - line.timestamp > UP_TO_DATE_PERIOD);
                if stale {
                    self.lines.clear();
                }
            }
        }

        match vision.and_then(|frame| frame.ball) {
            Some(ball) => self.ball = Some(DatedItem::seen(ball.rotated(yaw, pitch), now)),
            None => {
                if let Some(ball) = self.ball.as_mut() {
                    ball.expire(now);
                }
            }
        }

        for id in GoalPostId::ALL {
            match vision.and_then(|frame| frame.goal_post(id)) {
                Some(post) => {
                    self.goal_posts
                        .insert(id, DatedItem::seen(post.rotated(yaw, pitch), now));
                }
                None => {
                    if let Some(post) = self.goal_posts.get_mut(&id) {
                        post.expire(now);
                    }
                }
            }
        }

        for id in FlagId::ALL {
            match vision.and_then(|frame| frame.flag(id)) {
                Some(flag) => {
                    self.flags
                        .insert(id, DatedItem::seen(flag.rotated(yaw, pitch), now));
                }
                None => {
                    if let Some(flag) = self.flags.get_mut(&id) {
                        flag.expire(now);
                    }
                }
            }
        }

        if let Some(frame) = vision {
            for player in &frame.players {
                if self.is_self(player) {
                    trace!("skipping own body in vision");
                    continue;
                }
                let model = PlayerModel {
                    team: player.team.clone(),
                    id: player.id.clone(),
                    body_parts: player
                        .body_parts
                        .iter()
                        .map(|(name, position)| (name.clone(), position.rotated(yaw, pitch)))
                        .collect(),
                };
                self.players
                    .insert(player_key(player), DatedItem::seen(model, now));
            }
        }
        for player in self.players.values_mut() {
            player.expire(now);
        }
    }

    fn is_self(&self, player: &PlayerDetection) -> bool {
        player.team.as_deref() == Some(self.own_team.as_str())
            && player.id.as_deref() == Some(self.own_id.as_str())
    }

    /// Server time of the latest update.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn ball(&self) -> Option<&DatedItem<PolarCoordinate>> {
        self.ball.as_ref()
    }

    /// Ball position if it was seen within the last [`UP_TO_DATE_PERIOD`].
    pub fn ball_in_view(&self) -> Option<&PolarCoordinate> {
        self.ball
            .as_ref()
            .filter(|ball| ball.in_view)
            .map(|ball| &ball.value)
    }

    pub fn goal_post(&self, id: GoalPostId) -> Option<&DatedItem<PolarCoordinate>> {
        self.goal_posts.get(&id)
    }

    pub fn flag(&self, id: FlagId) -> Option<&DatedItem<PolarCoordinate>> {
        self.flags.get(&id)
    }

    pub fn lines(&self) -> &[DatedItem<LineDetection>] {
        &self.lines
    }

    /// Every other player seen so far, including those currently out of view.
    pub fn players(&self) -> impl Iterator<Item = &DatedItem<PlayerModel>> {
        self.players.values()
    }
}

fn player_key(player: &PlayerDetection) -> String {
    format!(
        "{}{}",
        player.team.as_deref().unwrap_or_default(),
        player.id.as_deref().unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::VisionFrame;
    use std::f64::consts::FRAC_PI_4;

    fn player(team: &str, id: &str) -> PlayerDetection {
        let mut detection = PlayerDetection {
            team: Some(team.to_string()),
            id: Some(id.to_string()),
            ..PlayerDetection::default()
        };
        detection
            .body_parts
            .insert("head".to_string(), PolarCoordinate::new(2.0, 0.0, 0.0));
        detection
    }

    fn snapshot_at(time: f64, vision: Option<VisionFrame>) -> SensorSnapshot {
        SensorSnapshot {
            server_time: Some(time),
            vision,
            ..SensorSnapshot::default()
        }
    }

    #[test]
    fn test_head_pose_is_applied() {
        let mut view = LocalFieldView::new("Us", "1");
        let mut snapshot = snapshot_at(
            1.0,
            Some(VisionFrame {
                ball: Some(PolarCoordinate::new(3.0, 0.1, -0.2)),
                ..VisionFrame::default()
            }),
        );
        snapshot.joint_angles[JointId::NeckYaw] = FRAC_PI_4;
        snapshot.joint_angles[JointId::NeckPitch] = -0.1;
        view.update(&snapshot);

        let ball = view.ball_in_view().expect("ball seen");
        assert!((ball.azimuth - (0.1 + FRAC_PI_4)).abs() < 1e-12);
        assert!((ball.elevation + 0.3).abs() < 1e-12);
        assert_eq!(ball.distance, 3.0);
    }

    #[test]
    fn test_items_expire_after_period() {
        let mut view = LocalFieldView::new("Us", "1");
        let mut frame = VisionFrame {
            ball: Some(PolarCoordinate::new(3.0, 0.0, 0.0)),
            ..VisionFrame::default()
        };
        frame
            .goal_posts
            .insert(GoalPostId::G2R, PolarCoordinate::new(9.0, 0.2, 0.0));
        view.update(&snapshot_at(1.00, Some(frame)));

        view.update(&snapshot_at(1.04, None));
        assert!(view.ball_in_view().is_some());
        assert!(view.goal_post(GoalPostId::G2R).unwrap().in_view);

        view.update(&snapshot_at(1.06, None));
        assert!(view.ball_in_view().is_none());
        let ball = view.ball().expect("last sighting kept");
        assert_eq!(ball.timestamp, 1.00);
        assert!(!view.goal_post(GoalPostId::G2R).unwrap().in_view);
    }

    #[test]
    fn test_own_body_filtered_case_sensitive() {
        let mut view = LocalFieldView::new("Us", "1");
        let frame = VisionFrame {
            players: vec![player("Us", "1"), player("us", "1"), player("Them", "1")],
            ..VisionFrame::default()
        };
        view.update(&snapshot_at(2.0, Some(frame)));

        let teams: Vec<_> = view
            .players()
            .map(|p| p.value.team.clone().unwrap_or_default())
            .collect();
        assert_eq!(teams, vec!["Them".to_string(), "us".to_string()]);
    }

    #[test]
    fn test_lines_replaced_then_cleared_when_stale() {
        let mut view = LocalFieldView::new("Us", "1");
        let line = LineDetection {
            start: PolarCoordinate::new(1.0, 0.0, 0.0),
            end: PolarCoordinate::new(2.0, 0.5, 0.0),
        };
        let frame = VisionFrame {
            lines: vec![line, line],
            ..VisionFrame::default()
        };
        view.update(&snapshot_at(5.0, Some(frame)));
        assert_eq!(view.lines().len(), 2);

        view.update(&snapshot_at(5.02, None));
        assert_eq!(view.lines().len(), 2);

        view.update(&snapshot_at(5.1, None));
        assert!(view.lines().is_empty());
    }
}
