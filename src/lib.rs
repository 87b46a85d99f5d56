//! # simbridge
//!
//! Real-time bridge between an agent and a physics-simulated humanoid robot.
//! The simulator talks a parenthesized symbolic protocol over TCP, one message
//! per 20 ms cycle; simbridge decodes the sensor report, tracks joint state and
//! turns recorded keyframe poses into per-cycle joint velocity commands.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! simbridge = "0.1"  # Default: all libraries plus the agent runtime
//! ```
//!
//! ## Feature Flags
//!
//! - **`agent`** (default): cycle loop, behaviors and the `simbridge-agent` binary
//! - **`file-logging`**: per-run log folders with per-crate JSON files
//!
//! ## Usage Examples
//!
//! ### Decoding a sensor message
//!
//! ```rust
//! use simbridge::prelude::*;
//!
//! let mut decoder = PerceptionDecoder::new();
//! let snapshot = decoder.decode("(time (now 12.5))(HJ (n hj1) (ax 45))");
//! assert_eq!(snapshot.server_time, Some(12.5));
//! assert!((snapshot.joint_angles[JointId::NeckYaw] - 45f64.to_radians()).abs() < 1e-12);
//! ```
//!
//! ### Replaying a keyframe
//!
//! ```rust
//! use simbridge::prelude::*;
//!
//! let mut target = JointVector::zeros();
//! target[JointId::NeckYaw] = 30.0;
//!
//! let mut motion = MotionInterpolator::new(MotionCatalogue::new());
//! motion.select(KeyframeSequence::new(vec![Keyframe::new(200, target)]));
//!
//! let mut output = EffectorOutput::new();
//! motion.drive(&JointVector::zeros(), &mut output);
//! assert!(output.flush().starts_with("(he1 "));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: simbridge-structures                       │
//! │  (JointId, JointVector, field vocabulary, geometry)     │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Wire: simbridge-serialization, simbridge-io            │
//! │  (symbolic expressions, framed TCP, handshake)          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Sensorimotor: simbridge-sensorimotor, simbridge-motion │
//! │  (perception decoding, keyframe interpolation)          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application: simbridge-agent                           │
//! │  (sense-think-act loop, behaviors, binaries)            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use simbridge_structures as structures;

// Re-export wire layer
pub use simbridge_io as io;
pub use simbridge_serialization as serialization;

// Re-export sensorimotor layer
pub use simbridge_motion as motion;
pub use simbridge_sensorimotor as sensorimotor;

// Re-export infrastructure
pub use simbridge_config as config;
pub use simbridge_observability as observability;

#[cfg(feature = "agent")]
pub use simbridge_agent as agent;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::structures::{
        BodyPart, FlagId, GoalPostId, JointId, JointVector, PlayMode, PolarCoordinate, CYCLE_MS,
        DVec3,
    };

    pub use crate::serialization::{parse, parse_message, ParseError, SayMessage, SymbolNode};

    pub use crate::io::{BeamPose, RobotIdentity, SimulatorConnection, TransportError};

    pub use crate::sensorimotor::{
        ActuatorSink, EffectorOutput, LocalFieldView, PerceptionDecoder, SensorSnapshot,
    };

    pub use crate::motion::{
        GaitPhase, HeadScan, Keyframe, KeyframeSequence, LatencyCompensation, MotionCatalogue,
        MotionInterpolator, MotionName,
    };

    #[cfg(feature = "agent")]
    pub use crate::agent::{Behavior, BehaviorKind, SimAgent};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        assert_eq!(JointId::NeckYaw.effector_id(), "he1");
        assert_eq!(CYCLE_MS, 20);
    }
}
