//! The core crate for simbridge. Defines the data types shared by the wire
//! codec, the perception decoder and the motion engine: the 22-joint model,
//! landmark identifiers, play modes and polar coordinates.

mod error;
pub mod field;
pub mod geometry;
pub mod joints;

pub use error::SimbridgeDataError;
pub use field::{FlagId, GoalPostId, PlayMode};
pub use geometry::PolarCoordinate;
pub use joints::{BodyPart, JointId, JointVector, JOINT_COUNT};

/// Re-export so downstream crates share one vector type.
pub use glam::DVec3;

/// Length of one simulation cycle in milliseconds.
pub const CYCLE_MS: u32 = 20;
