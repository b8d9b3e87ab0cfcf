use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use mio::net::UdpSocket;
use mio::{Events, Interest, Poll, Token};
use thread_priority::{
    RealtimeThreadSchedulePolicy, ScheduleParams, ThreadBuilder, ThreadPriority, ThreadSchedulePolicy,
};

use commander::commander::Commander;
use commander::config::CommanderConfig;
use commander::link;
use commander::logger::Logger;
use commander::modes::{FlightMode, FLIGHT_MODES};
use commander::watchdog::Stage;

const UPLINK: Token = Token(0);
const UPLINK_ADDR: &str = "0.0.0.0:1766";
const CONTROL_PERIOD: Duration = Duration::from_millis(10);

fn main() -> Result<()> {
    let mut log_sink = Logger::init();

    let config = CommanderConfig::load().unwrap_or_else(|e| {
        warn!("{:#}, using defaults", e);
        CommanderConfig::default()
    });

    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown))
        .context("Registering SIGINT handler")?;

    let start = Instant::now();
    let (commander, writer) = Commander::new(config, 0);

    let (frame_tx, frame_rx) = channel();

    let ingest_shutdown = Arc::clone(&shutdown);
    let ingest = thread::Builder::new()
        .name("ingest".into())
        .spawn(move || {
            if let Err(e) = ingest_loop(frame_tx, ingest_shutdown) {
                warn!("uplink ingest stopped: {:#}", e);
            }
        })
        .context("Spawning ingest thread")?;

    let uplink = thread::Builder::new()
        .name("link".into())
        .spawn(move || link::run(writer, frame_rx, move || start.elapsed().as_millis() as u64))
        .context("Spawning link thread")?;

    let control_shutdown = Arc::clone(&shutdown);
    let control_commander = Arc::clone(&commander);
    let control = ThreadBuilder::default()
        .name("control")
        .policy(ThreadSchedulePolicy::Realtime(RealtimeThreadSchedulePolicy::Fifo))
        .priority(ThreadPriority::from_posix(ScheduleParams {
            sched_priority: 40,
        }))
        .spawn_careless(move || {
            control_loop(control_commander, control_shutdown, move || {
                start.elapsed().as_millis() as u64
            })
        })
        .context("Spawning control thread")?;

    info!("commander up, listening on {}", UPLINK_ADDR);
    for mode in FLIGHT_MODES {
        debug!("flightmode {} = {}", mode.name(), commander.modes().get(mode));
    }
    while !shutdown.load(Ordering::Relaxed) {
        log_sink.handle_logs();
        thread::sleep(Duration::from_millis(10));
    }

    let _ = ingest.join();
    let _ = uplink.join();
    let _ = control.join();
    log_sink.handle_logs();
    Ok(())
}

/// Producer side of the demo: forward every UDP datagram to the link
/// channel. Framing and dispatch stay outside the commander itself.
fn ingest_loop(frames: Sender<Vec<u8>>, shutdown: Arc<AtomicBool>) -> Result<()> {
    let mut socket = UdpSocket::bind(UPLINK_ADDR.parse()?).context("Binding uplink socket")?;
    let mut poll = Poll::new().context("Creating event poller")?;
    let mut events = Events::with_capacity(8);
    poll.registry()
        .register(&mut socket, UPLINK, Interest::READABLE)
        .context("Registering uplink socket")?;

    let mut buf = [0u8; 64];
    while !shutdown.load(Ordering::Relaxed) {
        poll.poll(&mut events, Some(Duration::from_millis(100)))
            .context("Polling events")?;
        for event in events.iter() {
            if event.token() != UPLINK {
                continue;
            }
            loop {
                match socket.recv_from(&mut buf) {
                    Ok((len, _)) => {
                        if frames.send(buf[..len].to_vec()).is_err() {
                            return Ok(());
                        }
                    },
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                    Err(e) => return Err(e).context("Receiving uplink frame"),
                }
            }
        }
    }
    Ok(())
}

/// Consumer side of the demo: poll the accessor at the control cadence and
/// report degradation and mode activations. A real vehicle would feed the
/// values into its attitude controller here.
fn control_loop<C>(commander: Arc<Commander>, shutdown: Arc<AtomicBool>, clock: C)
where
    C: Fn() -> u64,
{
    let mut last_stage = Stage::Active;
    while !shutdown.load(Ordering::Relaxed) {
        let now = clock();

        let thrust = commander.thrust(now);
        let attitude = commander.attitude(now);
        debug!("setpoint thrust {} attitude {:?}", thrust, attitude);

        let stage = commander.stage(now);
        if stage != last_stage {
            match stage {
                Stage::Active => info!("command link recovered"),
                Stage::DegradedAttitude => {
                    warn!("no setpoint for {} ms, attitude neutralized", commander.inactivity(now))
                },
                Stage::Shutdown => {
                    warn!("no setpoint for {} ms, thrust cut", commander.inactivity(now))
                },
            }
            last_stage = stage;
        }

        let hold = commander.alt_hold_adjustment();
        if hold.just_activated {
            info!("altitude hold engaged, delta {:.2}", hold.delta);
        }
        let (_, takeoff_started) = commander.modes().get_with_edge(FlightMode::Takeoff);
        if takeoff_started {
            info!("takeoff requested");
        }
        let (_, landing_started) = commander.modes().get_with_edge(FlightMode::Landing);
        if landing_started {
            info!("landing requested");
        }

        thread::sleep(CONTROL_PERIOD);
    }
}
