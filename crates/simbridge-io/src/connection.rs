// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Blocking connection to the simulator.
//!
//! The simulator runs in lockstep: it sends one message per cycle and waits
//! for the agent's answer. [`SimulatorConnection::begin_cycle`] hands out a
//! [`CycleTicket`] that [`SimulatorConnection::end_cycle`] consumes, so each
//! received message is answered exactly once.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};

use simbridge_serialization::{beam_message, init_message, scene_message, SYNC_TOKEN};
use tracing::{debug, info, trace};

use crate::error::{Result, TransportError};
use crate::framing::{read_frame, write_frame, DEFAULT_MAX_FRAME_BYTES};

/// Empty cycles after the beam so the inertial sensors can settle.
pub const SETTLE_CYCLES: usize = 100;

/// Who the agent is on the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotIdentity {
    pub unum: u8,
    pub team: String,
    pub scene: String,
}

/// Starting pose sent with `beam`: field coordinates in meters, rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamPose {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

/// Proof that a cycle message was received and still needs its answer.
#[must_use = "every received cycle must be answered with end_cycle"]
#[derive(Debug)]
pub struct CycleTicket {
    cycle: u64,
}

impl CycleTicket {
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}

/// Closes the socket from another thread, unblocking a pending receive.
#[derive(Debug)]
pub struct ShutdownHandle {
    stream: TcpStream,
}

impl ShutdownHandle {
    pub fn shutdown(&self) -> std::io::Result<()> {
        self.stream.shutdown(Shutdown::Both)
    }
}

pub struct SimulatorConnection<S = TcpStream> {
    stream: S,
    peer: String,
    max_frame_bytes: usize,
    open_cycle: Option<u64>,
    cycles_completed: u64,
}

impl SimulatorConnection<TcpStream> {
    /// Connect with Nagle's algorithm disabled; every frame is latency critical.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let address = format!("{}:{}", host, port);
        let stream = TcpStream::connect((host, port)).map_err(|source| TransportError::Connect {
            address: address.clone(),
            source,
        })?;
        stream
            .set_nodelay(true)
            .map_err(|source| TransportError::Connect {
                address: address.clone(),
                source,
            })?;
        info!(peer = %address, "connected to simulator");
        Ok(Self::from_stream(stream, address))
    }

    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        let stream = self
            .stream
            .try_clone()
            .map_err(|source| TransportError::Connect {
                address: self.peer.clone(),
                source,
            })?;
        Ok(ShutdownHandle { stream })
    }
}

impl<S: Read + Write> SimulatorConnection<S> {
    pub fn from_stream(stream: S, peer: impl Into<String>) -> Self {
        SimulatorConnection {
            stream,
            peer: peer.into(),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            open_cycle: None,
            cycles_completed: 0,
        }
    }

    pub fn with_max_frame_bytes(mut self, max_frame_bytes: usize) -> Self {
        self.max_frame_bytes = max_frame_bytes;
        self
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn send_frame(&mut self, payload: &[u8]) -> Result<()> {
        trace!(bytes = payload.len(), "send frame");
        write_frame(&mut self.stream, payload)
    }

    /// Blocks until a full frame arrives. `Ok(None)` if the peer closed.
    pub fn receive_frame(&mut self) -> Result<Option<Vec<u8>>> {
        let frame = read_frame(&mut self.stream, self.max_frame_bytes)?;
        match &frame {
            Some(bytes) => trace!(bytes = bytes.len(), "received frame"),
            None => debug!(peer = %self.peer, "peer closed the connection"),
        }
        Ok(frame)
    }

    pub fn send_message(&mut self, message: &str) -> Result<()> {
        self.send_frame(message.as_bytes())
    }

    pub fn receive_message(&mut self) -> Result<Option<String>> {
        match self.receive_frame()? {
            Some(bytes) => Ok(Some(String::from_utf8(bytes)?)),
            None => Ok(None),
        }
    }

    /// Receive the next cycle message. `Ok(None)` once the simulator has gone away.
    pub fn begin_cycle(&mut self) -> Result<Option<(CycleTicket, String)>> {
        if let Some(open) = self.open_cycle {
            return Err(TransportError::CycleStillOpen { open });
        }
        let Some(message) = self.receive_message()? else {
            return Ok(None);
        };
        let cycle = self.cycles_completed;
        self.open_cycle = Some(cycle);
        Ok(Some((CycleTicket { cycle }, message)))
    }

    /// Answer the cycle identified by `ticket`.
    pub fn end_cycle(&mut self, ticket: CycleTicket, message: &str) -> Result<()> {
        if self.open_cycle != Some(ticket.cycle) {
            return Err(TransportError::CycleMismatch {
                ticket: ticket.cycle,
                open: self.open_cycle,
            });
        }
        self.send_message(message)?;
        self.open_cycle = None;
        self.cycles_completed += 1;
        Ok(())
    }

    /// Scene, init and beam, each acknowledged, then [`SETTLE_CYCLES`] empty cycles.
    pub fn initialize_robot(&mut self, identity: &RobotIdentity, pose: &BeamPose) -> Result<()> {
        info!(
            unum = identity.unum,
            team = %identity.team,
            x = pose.x,
            y = pose.y,
            rotation = pose.rotation,
            "initializing robot"
        );

        self.send_message(&format!("{}{}", scene_message(&identity.scene), SYNC_TOKEN))?;
        self.expect_message("scene selection")?;

        self.send_message(&format!(
            "{}{}",
            init_message(identity.unum, &identity.team),
            SYNC_TOKEN
        ))?;
        self.expect_message("player registration")?;

        self.send_message(&format!(
            "{}{}",
            beam_message(pose.x, pose.y, pose.rotation),
            SYNC_TOKEN
        ))?;

        for _ in 0..SETTLE_CYCLES {
            self.expect_message("sensor settling")?;
            self.send_message(SYNC_TOKEN)?;
        }
        debug!(cycles = SETTLE_CYCLES, "robot initialized");
        Ok(())
    }

    fn expect_message(&mut self, stage: &'static str) -> Result<String> {
        self.receive_message()?.ok_or(TransportError::Closed(stage))
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// In-memory duplex: reads from `inbound`, records writes.
    struct Duplex {
        inbound: Cursor<Vec<u8>>,
        outbound: Vec<u8>,
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inbound.read(buf)
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.outbound.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn duplex_with(frames: &[&str]) -> Duplex {
        let mut inbound = Vec::new();
        for frame in frames {
            write_frame(&mut inbound, frame.as_bytes()).unwrap();
        }
        Duplex {
            inbound: Cursor::new(inbound),
            outbound: Vec::new(),
        }
    }

    fn decode_all(mut bytes: &[u8]) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(frame) = read_frame(&mut bytes, DEFAULT_MAX_FRAME_BYTES).unwrap() {
            out.push(String::from_utf8(frame).unwrap());
        }
        out
    }

    #[test]
    fn test_cycle_ticket_is_answered_once() {
        let mut conn = SimulatorConnection::from_stream(duplex_with(&["(time (now 1))"]), "mem");
        let (ticket, message) = conn.begin_cycle().unwrap().unwrap();
        assert_eq!(message, "(time (now 1))");
        assert_eq!(ticket.cycle(), 0);

        conn.end_cycle(ticket, "(syn)").unwrap();
        assert_eq!(conn.cycles_completed(), 1);
        assert_eq!(decode_all(&conn.into_inner().outbound), vec!["(syn)"]);
    }

    #[test]
    fn test_second_receive_without_answer_is_rejected() {
        let mut conn = SimulatorConnection::from_stream(duplex_with(&["(a)", "(b)"]), "mem");
        let (_ticket, _) = conn.begin_cycle().unwrap().unwrap();
        assert!(matches!(
            conn.begin_cycle(),
            Err(TransportError::CycleStillOpen { open: 0 })
        ));
    }

    #[test]
    fn test_begin_cycle_after_close_is_none() {
        let mut conn = SimulatorConnection::from_stream(duplex_with(&[]), "mem");
        assert!(conn.begin_cycle().unwrap().is_none());
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let mut inbound = Vec::new();
        write_frame(&mut inbound, &[0xff, 0xfe]).unwrap();
        let stream = Duplex {
            inbound: Cursor::new(inbound),
            outbound: Vec::new(),
        };
        let mut conn = SimulatorConnection::from_stream(stream, "mem");
        assert!(matches!(
            conn.receive_message(),
            Err(TransportError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_handshake_message_order() {
        let replies = vec!["(time (now 0))"; 2 + SETTLE_CYCLES];
        let mut conn = SimulatorConnection::from_stream(duplex_with(&replies), "mem");
        let identity = RobotIdentity {
            unum: 4,
            team: "Newbies".to_string(),
            scene: "rsg/agent/nao/nao.rsg".to_string(),
        };
        let pose = BeamPose {
            x: -3.0,
            y: 1.5,
            rotation: 0.0,
        };
        conn.initialize_robot(&identity, &pose).unwrap();

        let sent = decode_all(&conn.into_inner().outbound);
        assert_eq!(sent.len(), 3 + SETTLE_CYCLES);
        assert_eq!(sent[0], "(scene rsg/agent/nao/nao.rsg)(syn)");
        assert_eq!(sent[1], "(init (unum 4)(teamname Newbies))(syn)");
        assert_eq!(sent[2], "(beam -3 1.5 0)(syn)");
        assert!(sent[3..].iter().all(|m| m == "(syn)"));
    }

    #[test]
    fn test_handshake_fails_when_simulator_leaves() {
        let mut conn = SimulatorConnection::from_stream(duplex_with(&["(ok)"]), "mem");
        let identity = RobotIdentity {
            unum: 1,
            team: "A".to_string(),
            scene: "rsg/agent/nao/nao.rsg".to_string(),
        };
        let pose = BeamPose {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
        };
        assert!(matches!(
            conn.initialize_robot(&identity, &pose),
            Err(TransportError::Closed("player registration"))
        ));
    }
}
