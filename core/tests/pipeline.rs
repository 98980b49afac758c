//! End-to-end tests assembling the five stages against in-memory test
//! doubles (§17), exercising S1/S2/S3/S4/S6 from spec.md §8 without real
//! media files or audio hardware.

mod support;

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mediaplay_core::{Player, PlayerState};

use support::{wait_until, MockBackend, Scenario};

const TIMEOUT: Duration = Duration::from_secs(10);

/// S1 — happy path: open reaches Playing, position advances, and natural
/// end-of-stream reports `end_reached = true` with a final `Stopped`.
#[test]
fn happy_path_reaches_playing_then_stops_with_end_reached() {
    let mut scenarios = HashMap::new();
    scenarios.insert(
        "happy".to_string(),
        Scenario {
            total_ticks: 1500,
            duration_seconds: Some(1.5),
            hard_eof: true,
            ..Default::default()
        },
    );
    let backend = MockBackend::new(scenarios);
    let player = Player::new(backend.clone());

    let reached_playing = Arc::new(std::sync::atomic::AtomicBool::new(false));
    {
        let reached_playing = reached_playing.clone();
        player.set_on_state_changed(move |state| {
            if state == PlayerState::Playing {
                reached_playing.store(true, Ordering::SeqCst);
            }
        });
    }

    player.open("happy");

    assert!(
        wait_until(TIMEOUT, || reached_playing.load(Ordering::SeqCst)),
        "player never reached Playing"
    );
    assert!(player.duration().is_some());
    assert!(player.seekable());

    assert!(
        wait_until(TIMEOUT, || player.state() == PlayerState::Stopped),
        "player never reached Stopped, state={:?}",
        player.state()
    );
    assert!(player.end_reached(), "hard EOF should set end_reached");
    assert!(
        backend.audio_rendered.load(Ordering::SeqCst),
        "audio sink never rendered a frame"
    );
    assert!(
        !backend.video_frames.lock().unwrap().is_empty(),
        "video sink never presented a frame"
    );
}

/// S2 — seek mid-play: after seeking, the structural flush guarantee (no
/// pre-marker frame follows the marker) shows up as at most one backward
/// jump in presented pts, landing near the seek target.
#[test]
fn seek_mid_play_does_not_resurrect_pre_seek_frames() {
    let mut scenarios = HashMap::new();
    scenarios.insert(
        "long".to_string(),
        Scenario {
            total_ticks: 4000,
            duration_seconds: Some(4.0),
            hard_eof: true,
            ..Default::default()
        },
    );
    let backend = MockBackend::new(scenarios);
    let player = Player::new(backend.clone());

    player.open("long");
    assert!(
        wait_until(TIMEOUT, || player.state() == PlayerState::Playing),
        "player never reached Playing"
    );
    assert!(
        wait_until(TIMEOUT, || !backend.video_frames.lock().unwrap().is_empty()),
        "no frame rendered before seeking"
    );

    player.seek(3.0);

    assert!(
        wait_until(TIMEOUT, || player.state() == PlayerState::Stopped),
        "player never reached Stopped after seek"
    );

    let frames = backend.video_frames.lock().unwrap();
    let pts_seconds: Vec<f64> = frames.iter().map(|f| f.pts_ticks as f64 / 1000.0).collect();

    let drops: Vec<usize> = (1..pts_seconds.len())
        .filter(|&i| pts_seconds[i] < pts_seconds[i - 1])
        .collect();
    assert!(
        drops.len() <= 1,
        "expected at most one backward jump in presented pts (the seek), saw {drops:?}: {pts_seconds:?}"
    );
    if let Some(&drop_at) = drops.first() {
        assert!(
            (pts_seconds[drop_at] - 3.0).abs() < 1.0,
            "seek landed at {} s, expected close to 3.0s",
            pts_seconds[drop_at]
        );
        for window in pts_seconds[drop_at..].windows(2) {
            assert!(window[1] >= window[0], "pts regressed after the seek landed");
        }
    }
}

/// S3 — stop overrides open: a `stop()` issued while a slow `open()` is
/// still blocked in the demuxer cancels it via the interrupt hook; no
/// frames are ever presented.
#[test]
fn stop_cancels_a_slow_open_and_presents_nothing() {
    let mut scenarios = HashMap::new();
    scenarios.insert(
        "slow".to_string(),
        Scenario {
            open_delay_steps: 200, // ~2s of blocking open, cancelled well before that
            ..Default::default()
        },
    );
    let backend = MockBackend::new(scenarios);
    let player = Player::new(backend.clone());

    player.open("slow");
    std::thread::sleep(Duration::from_millis(30));
    player.stop();

    assert!(
        wait_until(TIMEOUT, || player.state() == PlayerState::Stopped),
        "player never reached Stopped after stop() cancelled the open, state={:?}",
        player.state()
    );
    assert!(
        backend.video_frames.lock().unwrap().is_empty(),
        "no frame should have been presented for a cancelled open"
    );
}

/// S4 — open supersede: a second `open()` issued while the first is still
/// mid-open cancels the first; exactly one `Playing` transition follows,
/// and only the second URL's content is ever presented.
#[test]
fn second_open_supersedes_a_slow_first_open() {
    let mut scenarios = HashMap::new();
    scenarios.insert(
        "a".to_string(),
        Scenario {
            video_width: 100,
            open_delay_steps: 200,
            total_ticks: 2000,
            duration_seconds: Some(2.0),
            ..Default::default()
        },
    );
    scenarios.insert(
        "b".to_string(),
        Scenario {
            video_width: 200,
            open_delay_steps: 0,
            total_ticks: 500,
            duration_seconds: Some(0.5),
            hard_eof: true,
            ..Default::default()
        },
    );
    let backend = MockBackend::new(scenarios);
    let player = Player::new(backend.clone());

    let playing_transitions = Arc::new(Mutex::new(0u32));
    {
        let playing_transitions = playing_transitions.clone();
        player.set_on_state_changed(move |state| {
            if state == PlayerState::Playing {
                *playing_transitions.lock().unwrap() += 1;
            }
        });
    }

    player.open("a");
    std::thread::sleep(Duration::from_millis(30));
    player.open("b");

    assert!(
        wait_until(TIMEOUT, || player.state() == PlayerState::Stopped),
        "player never reached Stopped, state={:?}",
        player.state()
    );

    assert_eq!(
        *playing_transitions.lock().unwrap(),
        1,
        "exactly one session should have reached Playing"
    );

    let frames = backend.video_frames.lock().unwrap();
    assert!(!frames.is_empty(), "the surviving open should have presented frames");
    assert!(
        frames.iter().all(|f| f.width == 200),
        "only scenario b's frames should ever have been presented, got widths: {:?}",
        frames.iter().map(|f| f.width).collect::<Vec<_>>()
    );
}

/// S6 — unseekable stream: `seekable() == false`, `seek()` is a no-op, and
/// `end_reached` reflects whether the underlying EOF was hard or soft.
#[test]
fn unseekable_stream_ignores_seek_and_tracks_soft_eof() {
    let mut scenarios = HashMap::new();
    scenarios.insert(
        "live".to_string(),
        Scenario {
            total_ticks: 800,
            duration_seconds: None,
            seekable: false,
            hard_eof: false,
            ..Default::default()
        },
    );
    let backend = MockBackend::new(scenarios);
    let player = Player::new(backend);

    player.open("live");
    assert!(
        wait_until(TIMEOUT, || player.state() == PlayerState::Playing),
        "player never reached Playing"
    );
    assert!(!player.seekable());
    assert!(player.duration().is_none());

    player.seek(5.0);
    std::thread::sleep(Duration::from_millis(50));
    assert!(
        player.position() < 1.0,
        "seek on an unseekable stream must be a no-op, position={}",
        player.position()
    );

    assert!(
        wait_until(TIMEOUT, || player.state() == PlayerState::Stopped),
        "player never reached Stopped"
    );
    assert!(
        !player.end_reached(),
        "a soft EOF must not set end_reached"
    );
}

/// The "exactly one stream" policy (design note): a container missing
/// either required kind is an OpenFailure, not a partial session.
#[test]
fn open_fails_without_both_required_streams() {
    let mut scenarios = HashMap::new();
    scenarios.insert(
        "audio-only".to_string(),
        Scenario {
            has_video: false,
            has_audio: true,
            total_ticks: 500,
            ..Default::default()
        },
    );
    let backend = MockBackend::new(scenarios);
    let player = Player::new(backend.clone());

    let reached_playing = Arc::new(std::sync::atomic::AtomicBool::new(false));
    {
        let reached_playing = reached_playing.clone();
        player.set_on_state_changed(move |state| {
            if state == PlayerState::Playing {
                reached_playing.store(true, Ordering::SeqCst);
            }
        });
    }

    player.open("audio-only");

    assert!(
        wait_until(TIMEOUT, || player.state() == PlayerState::Stopped),
        "player never settled back to Stopped after a malformed open"
    );
    assert!(
        !reached_playing.load(Ordering::SeqCst),
        "a container missing a required stream must never reach Playing"
    );
    assert!(backend.video_frames.lock().unwrap().is_empty());
}
