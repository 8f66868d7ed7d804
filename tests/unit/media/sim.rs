use super::*;

#[test]
fn load_is_immediate_without_latency() {
    let mut m = SimMedia::new(640, 360, 5.0);
    assert_eq!(m.ready_state(), ReadyState::Unloaded);
    assert!(m.natural_size().is_none());

    m.load();
    assert_eq!(m.ready_state(), ReadyState::HaveCurrentData);
    assert_eq!(m.natural_size(), Some((640.0, 360.0)));
    assert_eq!(m.duration(), Some(5.0));
}

#[test]
fn load_latency_counts_advance_ticks() {
    let mut m = SimMedia::new(640, 360, 5.0).with_load_latency(2);
    m.load();
    assert_eq!(m.ready_state(), ReadyState::Loading);
    assert!(m.current_frame().is_none());

    m.advance(0.016);
    assert_eq!(m.ready_state(), ReadyState::Loading);
    m.advance(0.016);
    assert_eq!(m.ready_state(), ReadyState::HaveCurrentData);
    assert!(m.current_frame().is_some());
}

#[test]
fn advance_moves_time_only_while_playing() {
    let mut m = SimMedia::new(64, 64, 10.0);
    m.load();
    m.advance(1.0);
    assert_eq!(m.current_time(), 0.0);

    m.play();
    m.set_rate(2.0);
    m.advance(1.0);
    assert_eq!(m.current_time(), 2.0);

    m.pause();
    m.advance(1.0);
    assert_eq!(m.current_time(), 2.0);
}

#[test]
fn time_clamps_to_duration() {
    let mut m = SimMedia::new(64, 64, 3.0);
    m.load();
    m.play();
    m.advance(10.0);
    assert_eq!(m.current_time(), 3.0);

    m.seek(-1.0);
    assert_eq!(m.current_time(), 0.0);
    m.seek(99.0);
    assert_eq!(m.current_time(), 3.0);
}

#[test]
fn stills_have_no_duration_bound() {
    let mut m = SimMedia::still(800, 600);
    m.load();
    assert!(m.duration().is_none());
    m.seek(1000.0);
    assert_eq!(m.current_time(), 1000.0);
}

#[test]
fn write_counters_record_every_control_call() {
    let mut m = SimMedia::new(64, 64, 5.0);
    m.load();
    m.seek(1.0);
    m.seek(1.0);
    m.play();
    m.pause();
    m.set_rate(1.5);
    m.set_volume(0.5);
    m.set_muted(true);

    let w = m.writes();
    assert_eq!(w.seeks, 2);
    assert_eq!(w.plays, 1);
    assert_eq!(w.pauses, 1);
    assert_eq!(w.rate_writes, 1);
    assert_eq!(w.volume_writes, 1);
    assert_eq!(w.mute_writes, 1);

    assert_eq!(m.take_writes(), w);
    assert_eq!(m.writes(), SimWrites::default());
}

#[test]
fn clones_share_state() {
    let handle = SimMedia::new(64, 64, 5.0);
    let mut boxed: Box<dyn MediaElement> = Box::new(handle.clone());
    boxed.load();
    boxed.seek(2.0);

    assert_eq!(handle.ready_state(), ReadyState::HaveCurrentData);
    assert_eq!(handle.current_time(), 2.0);
    assert_eq!(handle.writes().seeks, 1);
}

#[test]
fn frames_are_premultiplied_solid_color() {
    let mut m = SimMedia::new(2, 1, 5.0).with_color([200, 100, 0, 128]);
    m.load();
    let frame = m.current_frame().unwrap();
    assert_eq!((frame.width, frame.height), (2, 1));
    assert_eq!(frame.rgba8_premul.len(), 8);
    assert_eq!(&frame.rgba8_premul[..4], &[100, 50, 0, 128]);
}
