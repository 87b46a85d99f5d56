// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use simbridge_agent::{logging_options, AgentSettings, SimAgent, StopReason};
use simbridge_config::{load_config_or_default, validate_config};
use simbridge_observability::{debug_flags_help, init_logging, CrateDebugFlags, DEBUG_ENV};
use tracing::{info, warn};

/// simbridge agent - drives one simulated humanoid robot
#[derive(Parser, Debug)]
#[command(
    name = "simbridge-agent",
    version,
    author,
    long_about = None,
    after_help = debug_flags_help()
)]
struct Args {
    /// Path to simbridge.toml (searched for when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulator host
    #[arg(long)]
    host: Option<String>,

    /// Simulator agent port
    #[arg(short, long)]
    port: Option<u16>,

    /// Team name
    #[arg(short, long)]
    team: Option<String>,

    /// Player number (1-11)
    #[arg(short, long)]
    unum: Option<u8>,

    /// Directory holding the keyframe files
    #[arg(short, long)]
    keyframe_dir: Option<PathBuf>,

    /// Behavior: idle, keyframe_developer or walk_to_ball
    #[arg(short, long)]
    behavior: Option<String>,

    /// Sequence replayed by keyframe_developer: file, general_range_test,
    /// crouch_and_head_turn or neck_yaw_min_max
    #[arg(long)]
    developer_sequence: Option<String>,

    /// Latency compensation: accumulated or previous_tick
    #[arg(long)]
    latency_compensation: Option<String>,

    /// Stop after this many cycles (0 = unlimited)
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Sweep the head continuously
    #[arg(long, default_value_t = false)]
    head_scan: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (text or json)
    #[arg(long)]
    log_format: Option<String>,
}

impl Args {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                overrides.insert(key.to_string(), value);
            }
        };
        put("host", self.host.clone());
        put("port", self.port.map(|p| p.to_string()));
        put("team", self.team.clone());
        put("unum", self.unum.map(|u| u.to_string()));
        put(
            "keyframe_dir",
            self.keyframe_dir.as_ref().map(|d| d.display().to_string()),
        );
        put("behavior", self.behavior.clone());
        put("developer_sequence", self.developer_sequence.clone());
        put("latency_compensation", self.latency_compensation.clone());
        put("max_cycles", self.max_cycles.map(|c| c.to_string()));
        put("head_scan", self.head_scan.then(|| "true".to_string()));
        put("log_level", self.log_level.clone());
        put("log_format", self.log_format.clone());
        overrides
    }
}

fn main() -> Result<()> {
    // `--debug-<crate>` flags are not clap options
    let (debug_args, cli_args): (Vec<String>, Vec<String>) =
        std::env::args().partition(|arg| arg.starts_with("--debug-"));
    let args = Args::parse_from(cli_args);

    let mut debug_flags = CrateDebugFlags::from_args(debug_args);
    if let Ok(value) = std::env::var(DEBUG_ENV) {
        debug_flags.merge_env_value(&value);
    }

    let config = load_config_or_default(args.config.as_deref(), Some(&args.overrides()))
        .context("Failed to load configuration")?;
    validate_config(&config).context("Invalid configuration")?;

    let _logging = init_logging(&debug_flags, &logging_options(&config)?)
        .context("Failed to initialize logging")?;

    let settings = AgentSettings::from_config(&config)?;
    info!(
        version = simbridge_agent::VERSION,
        team = %settings.identity.team,
        unum = settings.identity.unum,
        behavior = %settings.behavior,
        "starting simbridge agent"
    );

    let mut agent = SimAgent::connect(&settings).with_context(|| {
        format!(
            "Failed to start agent against {}:{}",
            settings.host, settings.port
        )
    })?;

    let stop = agent.stop_signal().context("Failed to create stop signal")?;
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || {
        handler_stop.trigger();
    })
    .context("Failed to install Ctrl-C handler")?;

    if let Err(e) = agent.initialize(&settings.identity, &settings.pose) {
        if stop.is_requested() {
            info!("stopped during robot initialization");
            return Ok(());
        }
        return Err(e).context("Robot initialization failed");
    }

    let mut behavior = settings.build_behavior();
    let summary = agent
        .run(&mut behavior, stop.flag(), settings.max_cycles)
        .context("Agent loop failed")?;

    match summary.reason {
        StopReason::Disconnected => warn!(cycles = summary.cycles, "simulator disconnected"),
        StopReason::Stopped | StopReason::CycleLimit => {
            info!(cycles = summary.cycles, "simbridge agent shutdown complete")
        }
    }
    Ok(())
}
