// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The sense-think-act loop.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};

use simbridge_io::{BeamPose, RobotIdentity, SimulatorConnection};
use simbridge_motion::{HeadScan, MotionCatalogue, MotionInterpolator};
use simbridge_sensorimotor::{
    ActuatorSink, EffectorOutput, LocalFieldView, PerceptionDecoder, SensorSnapshot,
};
use tracing::{debug, info, trace, warn};

use crate::behavior::{Behavior, DecisionContext};
use crate::error::{AgentError, Result};
use crate::settings::AgentSettings;
use crate::stop::StopSignal;

/// What happened in one call to [`SimAgent::run_cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle was answered.
    Completed { cycle: u64 },
    /// The simulator closed the connection before sending a message.
    Disconnected,
}

/// Why [`SimAgent::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    CycleLimit,
    Stopped,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub reason: StopReason,
}

/// One robot on the field: connection, perception state and motion player.
pub struct SimAgent<S = TcpStream> {
    connection: SimulatorConnection<S>,
    decoder: PerceptionDecoder,
    field: LocalFieldView,
    motion: MotionInterpolator,
    output: EffectorOutput,
    head_scan: Option<HeadScan>,
    snapshot_trace: Option<Box<dyn Write + Send>>,
    last_snapshot: SensorSnapshot,
}

impl SimAgent<TcpStream> {
    /// Connect to the simulator and load the motion catalogue.
    ///
    /// The robot is not placed on the field yet, see [`SimAgent::initialize`].
    pub fn connect(settings: &AgentSettings) -> Result<Self> {
        let catalogue = MotionCatalogue::load_from_dir(&settings.keyframe_dir)?;
        let connection = SimulatorConnection::connect(&settings.host, settings.port)?
            .with_max_frame_bytes(settings.max_frame_bytes);

        let mut agent = SimAgent::new(connection, &settings.identity, catalogue)
            .with_motion(|motion| motion.with_latency_compensation(settings.compensation));
        if settings.head_scan {
            agent = agent.with_head_scan();
        }
        if let Some(path) = &settings.snapshot_trace {
            let file = std::fs::File::create(path).map_err(AgentError::Trace)?;
            info!(path = %path.display(), "writing snapshot trace");
            agent = agent.with_snapshot_trace(std::io::BufWriter::new(file));
        }
        Ok(agent)
    }

    /// Stop signal bound to this agent's socket.
    pub fn stop_signal(&self) -> Result<StopSignal> {
        Ok(StopSignal::new(self.connection.shutdown_handle()?))
    }
}

impl<S: Read + Write> SimAgent<S> {
    pub fn new(
        connection: SimulatorConnection<S>,
        identity: &RobotIdentity,
        catalogue: MotionCatalogue,
    ) -> Self {
        SimAgent {
            connection,
            decoder: PerceptionDecoder::new(),
            field: LocalFieldView::new(identity.team.clone(), identity.unum.to_string()),
            motion: MotionInterpolator::new(catalogue),
            output: EffectorOutput::new(),
            head_scan: None,
            snapshot_trace: None,
            last_snapshot: SensorSnapshot::default(),
        }
    }

    /// Reconfigure the motion player, e.g. its latency compensation.
    pub fn with_motion(mut self, f: impl FnOnce(MotionInterpolator) -> MotionInterpolator) -> Self {
        self.motion = f(self.motion);
        self
    }

    /// Keep the head sweeping; overrides the neck commands of any motion.
    pub fn with_head_scan(mut self) -> Self {
        self.head_scan = Some(HeadScan::new());
        self
    }

    /// Write every decoded snapshot as one JSON line.
    pub fn with_snapshot_trace(mut self, writer: impl Write + Send + 'static) -> Self {
        self.snapshot_trace = Some(Box::new(writer));
        self
    }

    pub fn connection(&self) -> &SimulatorConnection<S> {
        &self.connection
    }

    pub fn field(&self) -> &LocalFieldView {
        &self.field
    }

    pub fn motion(&self) -> &MotionInterpolator {
        &self.motion
    }

    pub fn last_snapshot(&self) -> &SensorSnapshot {
        &self.last_snapshot
    }

    pub fn decoder(&self) -> &PerceptionDecoder {
        &self.decoder
    }

    /// Place the robot on the field and let its sensors settle.
    pub fn initialize(&mut self, identity: &RobotIdentity, pose: &BeamPose) -> Result<()> {
        self.connection.initialize_robot(identity, pose)?;
        Ok(())
    }

    /// Run exactly one cycle: receive and decode, let `behavior` decide,
    /// command the joints and answer the simulator.
    pub fn run_cycle<B: Behavior + ?Sized>(&mut self, behavior: &mut B) -> Result<CycleOutcome> {
        let Some((ticket, message)) = self.connection.begin_cycle()? else {
            return Ok(CycleOutcome::Disconnected);
        };
        let cycle = ticket.cycle();

        let snapshot = self
            .decoder
            .try_decode(&message)
            .map_err(|source| AgentError::Desync { cycle, source })?;
        trace!(cycle, server_time = ?snapshot.server_time, "sensed");

        self.field.update(&snapshot);
        self.motion.refresh_posture(&snapshot);

        let mut ctx = DecisionContext {
            cycle,
            snapshot: &snapshot,
            field: &self.field,
            motion: &mut self.motion,
            output: &mut self.output,
        };
        behavior.decide(&mut ctx)?;

        let sensed = snapshot.joint_angles;
        self.motion.drive(&sensed, &mut self.output);
        if let Some(scan) = self.head_scan.as_mut() {
            scan.drive(&sensed, &mut self.output);
        }

        let answer = self.output.flush();
        self.connection.end_cycle(ticket, &answer)?;

        self.write_trace(&snapshot)?;
        self.last_snapshot = snapshot;
        Ok(CycleOutcome::Completed { cycle })
    }

    /// Run cycles until `stop` is set, the cycle limit is reached or the
    /// simulator disconnects.
    pub fn run<B: Behavior + ?Sized>(
        &mut self,
        behavior: &mut B,
        stop: &AtomicBool,
        max_cycles: Option<u64>,
    ) -> Result<RunSummary> {
        info!(behavior = behavior.name(), max_cycles = ?max_cycles, "agent loop started");
        let mut cycles = 0;

        let reason = loop {
            if stop.load(Ordering::Relaxed) {
                break StopReason::Stopped;
            }
            if max_cycles.is_some_and(|limit| cycles >= limit) {
                break StopReason::CycleLimit;
            }
            // A stop request closes the socket; the failures that follow are the stop itself.
            match self.run_cycle(behavior) {
                Ok(CycleOutcome::Completed { .. }) => cycles += 1,
                Ok(CycleOutcome::Disconnected) if stop.load(Ordering::SeqCst) => {
                    break StopReason::Stopped
                }
                Ok(CycleOutcome::Disconnected) => break StopReason::Disconnected,
                Err(AgentError::Transport(e)) if stop.load(Ordering::SeqCst) => {
                    debug!(error = %e, "connection closed on stop request");
                    break StopReason::Stopped;
                }
                Err(e) => return Err(e),
            }
        };

        if self.decoder.fragment_errors() > 0 {
            warn!(
                fragments = self.decoder.fragment_errors(),
                "malformed sensor fragments were skipped"
            );
        }
        self.flush_trace()?;
        info!(cycles, reason = ?reason, "agent loop finished");
        Ok(RunSummary { cycles, reason })
    }

    fn write_trace(&mut self, snapshot: &SensorSnapshot) -> Result<()> {
        if let Some(writer) = self.snapshot_trace.as_mut() {
            serde_json::to_writer(&mut *writer, snapshot)
                .map_err(|e| AgentError::Trace(e.into()))?;
            writer.write_all(b"\n").map_err(AgentError::Trace)?;
        }
        Ok(())
    }

    fn flush_trace(&mut self) -> Result<()> {
        if let Some(writer) = self.snapshot_trace.as_mut() {
            writer.flush().map_err(AgentError::Trace)?;
            debug!("snapshot trace flushed");
        }
        Ok(())
    }

    pub fn into_connection(self) -> SimulatorConnection<S> {
        self.connection
    }
}
