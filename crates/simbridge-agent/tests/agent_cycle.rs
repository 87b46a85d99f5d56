//! Full agent run against an in-process fake simulator over TCP.

use std::fmt::Write as _;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Duration;

use simbridge_agent::{AgentSettings, BehaviorKind, SimAgent, StopReason};
use simbridge_config::SimbridgeConfig;
use simbridge_io::{read_frame, write_frame, DEFAULT_MAX_FRAME_BYTES, SETTLE_CYCLES};
use simbridge_motion::LatencyCompensation;
use simbridge_serialization::parse_message;
use simbridge_structures::JOINT_COUNT;
use tempfile::tempdir;

const CYCLE_SECONDS: f64 = 0.02;

struct SimulatorLog {
    handshake: Vec<String>,
    neck_velocities: Vec<f64>,
    answers: Vec<String>,
    final_neck_yaw_deg: f64,
}

fn receive(stream: &mut TcpStream) -> Option<String> {
    read_frame(stream, DEFAULT_MAX_FRAME_BYTES)
        .expect("read failed")
        .map(|bytes| String::from_utf8(bytes).expect("agent sent invalid UTF-8"))
}

fn send(stream: &mut TcpStream, message: &str) {
    write_frame(stream, message.as_bytes()).expect("write failed");
}

/// Plays the server side: handshake, settling, then one cycle per answer
/// until the agent hangs up. Neck yaw readings trail the commands by one cycle.
fn spawn_simulator(listener: TcpListener) -> thread::JoinHandle<SimulatorLog> {
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept failed");
        let mut log = SimulatorLog {
            handshake: Vec::new(),
            neck_velocities: Vec::new(),
            answers: Vec::new(),
            final_neck_yaw_deg: 0.0,
        };

        for _ in 0..2 {
            log.handshake.push(receive(&mut stream).expect("handshake message"));
            send(&mut stream, "(time (now 0.00))");
        }
        log.handshake.push(receive(&mut stream).expect("beam message"));
        for _ in 0..SETTLE_CYCLES {
            send(&mut stream, "(time (now 0.00))");
            assert_eq!(receive(&mut stream).as_deref(), Some("(syn)"));
        }

        let mut position = 0.0_f64;
        let mut reported = 0.0_f64;
        let mut time = 0.0;
        loop {
            time += CYCLE_SECONDS;
            let message = format!(
                "(time (now {:.2}))(ACC (n torso) (a 0.00 0.00 9.81))(HJ (n hj1) (ax {}))",
                time,
                reported.to_degrees()
            );
            send(&mut stream, &message);

            let Some(answer) = receive(&mut stream) else {
                break;
            };
            let root = parse_message(&answer).expect("agent answer must parse");
            let velocity = root
                .find("he1")
                .and_then(|node| node.leaf(1))
                .map(|v| v.parse::<f64>().expect("numeric velocity"))
                .unwrap_or(0.0);

            reported = position;
            position += velocity * CYCLE_SECONDS;
            log.neck_velocities.push(velocity);
            log.answers.push(answer);
        }

        log.final_neck_yaw_deg = position.to_degrees();
        log
    })
}

fn test_keyframe_line(duration_ms: u32, neck_yaw_deg: f64) -> String {
    let mut line = format!("{} {}", duration_ms, neck_yaw_deg);
    for _ in 1..JOINT_COUNT {
        let _ = write!(line, " 0");
    }
    line
}

#[test]
fn keyframe_developer_turns_the_head_over_tcp() {
    let keyframes = tempdir().unwrap();
    std::fs::write(
        keyframes.path().join("test.txt"),
        format!("// turn the head\n{}\n", test_keyframe_line(200, 30.0)),
    )
    .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to reserve free TCP port");
    let port = listener.local_addr().unwrap().port();
    let simulator = spawn_simulator(listener);

    let mut config = SimbridgeConfig::default();
    config.server.port = port;
    config.robot.team = "Testers".to_string();
    config.robot.unum = 7;
    config.motion.keyframe_dir = keyframes.path().to_path_buf();
    config.motion.latency_compensation = "previous_tick".to_string();
    config.agent.behavior = "keyframe_developer".to_string();
    config.agent.max_cycles = 30;

    let settings = AgentSettings::from_config(&config).unwrap();
    assert_eq!(settings.behavior, BehaviorKind::KeyframeDeveloper);
    assert_eq!(settings.compensation, LatencyCompensation::PreviousTick);

    let mut agent = SimAgent::connect(&settings).expect("connect failed");
    agent.initialize(&settings.identity, &settings.pose).unwrap();

    let mut behavior = settings.behavior.build();
    let summary = agent
        .run(&mut behavior, &AtomicBool::new(false), settings.max_cycles)
        .unwrap();
    assert_eq!(summary.cycles, 30);
    assert_eq!(summary.reason, StopReason::CycleLimit);
    assert!(agent.motion().ready());
    drop(agent);

    let log = simulator.join().unwrap();
    assert_eq!(log.handshake[0], "(scene rsg/agent/nao/nao.rsg)(syn)");
    assert_eq!(log.handshake[1], "(init (unum 7)(teamname Testers))(syn)");
    assert!(log.handshake[2].starts_with("(beam -1 0 0)"));

    assert_eq!(log.answers.len(), 30);
    assert!(log.answers.iter().all(|answer| answer.ends_with("(syn)")));

    // 10 ticks: 9 moving ones and the closing zero tick
    let moving = log.neck_velocities.iter().filter(|v| **v != 0.0).count();
    assert_eq!(moving, 9);
    assert!(log.neck_velocities[..9].iter().all(|v| *v > 0.0));
    assert!((log.final_neck_yaw_deg - 30.0).abs() < 1e-6);

    // Once the motion is over the agent only keeps the simulator in sync.
    assert_eq!(log.answers.last().map(String::as_str), Some("(syn)"));
}

#[test]
fn agent_reports_disconnect() {
    let keyframes = tempdir().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to reserve free TCP port");
    let port = listener.local_addr().unwrap().port();
    let simulator = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept failed");
        send(&mut stream, "(time (now 1.00))");
        receive(&mut stream)
    });

    let mut config = SimbridgeConfig::default();
    config.server.port = port;
    config.motion.keyframe_dir = keyframes.path().to_path_buf();
    let settings = AgentSettings::from_config(&config).unwrap();

    let mut agent = SimAgent::connect(&settings).expect("connect failed");
    let mut behavior = settings.behavior.build();
    let summary = agent
        .run(&mut behavior, &AtomicBool::new(false), None)
        .unwrap();

    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.reason, StopReason::Disconnected);
    assert_eq!(simulator.join().unwrap().as_deref(), Some("(syn)"));
}

#[test]
fn stop_signal_wakes_a_loop_waiting_on_a_stalled_simulator() {
    let keyframes = tempdir().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to reserve free TCP port");
    let port = listener.local_addr().unwrap().port();
    let simulator = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept failed");
        send(&mut stream, "(time (now 1.00))");
        let answer = receive(&mut stream);
        // stall: no second message, wait for the agent to hang up
        let after_stop = receive(&mut stream);
        (answer, after_stop)
    });

    let mut config = SimbridgeConfig::default();
    config.server.port = port;
    config.motion.keyframe_dir = keyframes.path().to_path_buf();
    let settings = AgentSettings::from_config(&config).unwrap();

    let mut agent = SimAgent::connect(&settings).expect("connect failed");
    let stop = agent.stop_signal().unwrap();
    let trigger = stop.clone();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        trigger.trigger()
    });

    let mut behavior = settings.behavior.build();
    let summary = agent.run(&mut behavior, stop.flag(), None).unwrap();

    assert!(stopper.join().unwrap());
    assert!(!stop.trigger());
    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.reason, StopReason::Stopped);

    let (answer, after_stop) = simulator.join().unwrap();
    assert_eq!(answer.as_deref(), Some("(syn)"));
    assert_eq!(after_stop, None);
}
