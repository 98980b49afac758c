//! Builds a `Player<SymphoniaBackend>`, wires the §6 callbacks, opens the
//! input, and polls `dump()` until playback winds down — the teacher's
//! `Reporter` polling idiom, adapted to this crate's `DumpInfo`.

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use clap::ArgMatches;
use log::{error, info};

use mediaplay_core::{PipelineConfig, Player, PlayerState};
use mediaplay_symphonia::SymphoniaBackend;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

fn parse_config(args: &ArgMatches) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    if let Some(mib) = args.get_one::<String>("max-packet-buffer-mib").and_then(|v| v.parse::<usize>().ok()) {
        config.max_packet_buffer_size = mib * 1024 * 1024;
    }
    if let Some(secs) = args.get_one::<String>("max-buffer-duration-secs").and_then(|v| v.parse::<f64>().ok()) {
        config.max_buffer_duration_secs = secs;
    }
    if let Some(count) = args.get_one::<String>("max-frame-queue-size").and_then(|v| v.parse::<usize>().ok()) {
        config.max_frame_queue_size = count;
    }
    config
}

pub fn run(args: &ArgMatches) -> Result<i32, Box<dyn Error>> {
    info!("starting mediaplay");

    let input = args.get_one::<String>("INPUT").cloned().unwrap_or_default();
    let volume = args
        .get_one::<String>("volume")
        .and_then(|v| v.parse::<f32>().ok())
        .unwrap_or(100.0)
        .clamp(0.0, 100.0)
        / 100.0;
    let seek_to = args.get_one::<String>("seek").and_then(|v| v.parse::<f64>().ok());

    let player = Player::with_config(SymphoniaBackend, parse_config(args));

    player.set_on_video_render(|frame| {
        println!("frame {}x{} @ pts {}", frame.width, frame.height, frame.pts_ticks);
    });
    player.set_on_position_changed(|position| {
        info!("position: {position:.3}s");
    });

    // `open()` dispatches asynchronously and a failed open can bounce
    // straight back to `Stopped` faster than this thread's first poll, so
    // "did the open attempt even start" can't be read off `state()` alone
    // (the `Stopped` it observes might be the failure, not the initial
    // value). `settled` is set by the callback on *any* transition,
    // including the guaranteed `Opening` one every open attempt makes
    // first, giving the initial wait below an unambiguous signal.
    let settled = Arc::new(AtomicBool::new(false));
    let reached_playing = Arc::new(AtomicBool::new(false));
    {
        let settled = settled.clone();
        let reached_playing = reached_playing.clone();
        player.set_on_state_changed(move |state| {
            info!("state: {state:?}");
            settled.store(true, Ordering::SeqCst);
            if state == PlayerState::Playing {
                reached_playing.store(true, Ordering::SeqCst);
            }
        });
    }
    player.set_on_buffering_changed(|buffering| {
        info!("buffering: {buffering}");
    });

    player.set_volume(volume);
    player.open(input);

    while player.state() == PlayerState::Stopped && !settled.load(Ordering::SeqCst) {
        sleep(POLL_INTERVAL);
    }

    if let Some(seek_to) = seek_to {
        while player.state() != PlayerState::Playing && player.state() != PlayerState::Stopped {
            sleep(POLL_INTERVAL);
        }
        player.seek(seek_to);
    }

    loop {
        let state = player.state();
        if state == PlayerState::Stopped {
            break;
        }
        let info = player.dump();
        println!(
            "position={:.2}s duration={:?} buffering={} fps={} speed={:.1}B/s vq={} aq={}",
            player.position(),
            player.duration(),
            player.buffering(),
            player.fps(),
            player.download_speed(),
            info.video_frame_queue_size,
            info.audio_frame_queue_size,
        );
        sleep(POLL_INTERVAL);
    }

    if reached_playing.load(Ordering::SeqCst) {
        Ok(0)
    } else {
        error!("open failed, see above for the reason");
        Ok(1)
    }
}
