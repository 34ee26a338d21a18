//! End-to-end scenarios driving the subscriber through a replay source
//!
//! Only batch content is controlled here; nothing depends on delivery timing.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use pretty_assertions::assert_eq;
use vitals_core::{
    EntryBatch, EntryType, FirstInputEntry, LayoutShiftEvent, LcpEntry, MetricName, MetricSample,
    MonitorConfig, Rating, ReplaySource, SubscriptionHandle, VitalsError, VitalsMonitor,
};

fn recording_subscription(
    source: &ReplaySource,
    config: &MonitorConfig,
) -> (SubscriptionHandle, Rc<RefCell<Vec<MetricSample>>>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let updates = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&updates);
    let handle = SubscriptionHandle::start(source, config, move |sample| {
        sink.borrow_mut().push(sample)
    });
    (handle, updates)
}

fn last_for(updates: &[MetricSample], name: MetricName) -> Option<MetricSample> {
    updates.iter().rev().find(|s| s.name() == name).copied()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn scenario_a_shifts_within_window_accumulate() {
    let source = ReplaySource::new();
    let (handle, updates) = recording_subscription(&source, &MonitorConfig::default());

    source.deliver(EntryBatch::LayoutShift(vec![
        LayoutShiftEvent::new(0.0, 0.05),
        LayoutShiftEvent::new(100.0, 0.03),
    ]));

    let updates = updates.borrow();
    // One update per scored event
    assert_eq!(updates.len(), 2);
    assert!(approx(updates[0].value(), 0.05));

    let cls = last_for(&updates, MetricName::Cls).unwrap();
    assert!(approx(cls.value(), 0.08));
    assert_eq!(cls.rating(), Rating::Good);
    assert!(approx(handle.cls_running_score(), 0.08));
}

#[test]
fn scenario_b_gap_starts_new_session() {
    let source = ReplaySource::new();
    let (handle, updates) = recording_subscription(&source, &MonitorConfig::default());

    source.deliver(EntryBatch::LayoutShift(vec![LayoutShiftEvent::new(0.0, 0.2)]));
    source.deliver(EntryBatch::LayoutShift(vec![LayoutShiftEvent::new(600.0, 0.1)]));

    let cls = last_for(&updates.borrow(), MetricName::Cls).unwrap();
    assert!(approx(cls.value(), 0.1));
    assert_eq!(cls.rating(), Rating::Good);
    assert!(approx(handle.cls_running_score(), 0.1));
}

#[test]
fn scenario_c_recent_input_is_ignored() {
    let source = ReplaySource::new();
    let (handle, updates) = recording_subscription(&source, &MonitorConfig::default());

    source.deliver(EntryBatch::LayoutShift(vec![LayoutShiftEvent::new(0.0, 0.04)]));
    source.deliver(EntryBatch::LayoutShift(vec![
        LayoutShiftEvent::new(50.0, 0.5).with_recent_input()
    ]));

    assert_eq!(updates.borrow().len(), 1);
    assert!(approx(handle.cls_running_score(), 0.04));
}

#[test]
fn scenario_d_lcp_falls_back_to_load_time() {
    let source = ReplaySource::new();
    let (_handle, updates) = recording_subscription(&source, &MonitorConfig::default());

    source.deliver(EntryBatch::LargestContentfulPaint(vec![
        LcpEntry {
            render_time: 1800.0,
            load_time: 0.0,
        },
        LcpEntry {
            render_time: 0.0,
            load_time: 2600.0,
        },
    ]));

    let lcp = last_for(&updates.borrow(), MetricName::Lcp).unwrap();
    assert_eq!(lcp.value(), 2600.0);
    assert_eq!(lcp.rating(), Rating::NeedsImprovement);
}

#[test]
fn scenario_e_first_input_delay() {
    let source = ReplaySource::new();
    let (_handle, updates) = recording_subscription(&source, &MonitorConfig::default());

    source.deliver(EntryBatch::FirstInput(vec![FirstInputEntry {
        start_time: 1000.0,
        processing_start: 1050.0,
    }]));

    let fid = last_for(&updates.borrow(), MetricName::Fid).unwrap();
    assert_eq!(fid.value(), 50.0);
    assert_eq!(fid.rating(), Rating::Good);
}

#[test]
fn lcp_takes_latest_update_without_comparison() {
    let source = ReplaySource::new();
    let (_handle, updates) = recording_subscription(&source, &MonitorConfig::default());

    source.deliver(EntryBatch::LargestContentfulPaint(vec![LcpEntry {
        render_time: 4500.0,
        load_time: 0.0,
    }]));
    source.deliver(EntryBatch::LargestContentfulPaint(vec![LcpEntry {
        render_time: 1200.0,
        load_time: 0.0,
    }]));

    let lcp = last_for(&updates.borrow(), MetricName::Lcp).unwrap();
    assert_eq!(lcp.value(), 1200.0);
    assert_eq!(lcp.rating(), Rating::Good);
}

#[test]
fn unsupported_stream_does_not_block_others() {
    let source = ReplaySource::new();
    source.mark_unsupported(EntryType::LayoutShift);
    let (handle, updates) = recording_subscription(&source, &MonitorConfig::default());

    assert_eq!(
        handle.active_streams(),
        vec![EntryType::LargestContentfulPaint, EntryType::FirstInput]
    );
    assert_eq!(handle.failures().len(), 1);
    assert!(matches!(
        handle.failures()[0],
        VitalsError::ObservationUnsupported {
            entry_type: EntryType::LayoutShift,
            ..
        }
    ));

    assert_eq!(
        source.deliver(EntryBatch::LayoutShift(vec![LayoutShiftEvent::new(0.0, 0.3)])),
        0
    );
    source.deliver(EntryBatch::FirstInput(vec![FirstInputEntry {
        start_time: 10.0,
        processing_start: 210.0,
    }]));

    let updates = updates.borrow();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].rating(), Rating::NeedsImprovement);
}

#[test]
fn all_streams_unsupported_still_starts_and_stops() {
    let source = ReplaySource::new();
    for entry_type in EntryType::ALL {
        source.mark_unsupported(entry_type);
    }
    let (mut handle, _updates) = recording_subscription(&source, &MonitorConfig::default());

    assert!(handle.active_streams().is_empty());
    assert_eq!(handle.failures().len(), 3);
    handle.stop();
    handle.stop();
    assert!(handle.is_stopped());
}

#[test]
fn stop_releases_every_stream_and_is_idempotent() {
    let source = ReplaySource::new();
    let (mut handle, updates) = recording_subscription(&source, &MonitorConfig::default());
    for entry_type in EntryType::ALL {
        assert_eq!(source.listener_count(entry_type), 1);
    }

    handle.stop();
    handle.stop();

    for entry_type in EntryType::ALL {
        assert_eq!(source.listener_count(entry_type), 0);
    }
    source.deliver(EntryBatch::LayoutShift(vec![LayoutShiftEvent::new(0.0, 0.3)]));
    assert!(updates.borrow().is_empty());
}

#[test]
fn dropping_handle_disconnects() {
    let source = ReplaySource::new();
    {
        let (_handle, _updates) = recording_subscription(&source, &MonitorConfig::default());
        assert_eq!(source.listener_count(EntryType::FirstInput), 1);
    }
    assert_eq!(source.listener_count(EntryType::FirstInput), 0);
}

#[test]
fn reset_clears_session_and_publishes_zero() {
    let source = ReplaySource::new();
    let (handle, updates) = recording_subscription(&source, &MonitorConfig::default());

    source.deliver(EntryBatch::LayoutShift(vec![LayoutShiftEvent::new(0.0, 0.3)]));
    let sample = handle.reset_cls();
    let again = handle.reset_cls();

    assert_eq!(sample, again);
    assert_eq!(sample.value(), 0.0);
    assert_eq!(sample.rating(), Rating::Good);
    assert_eq!(handle.cls_running_score(), 0.0);

    // The next shift opens a fresh session instead of extending the old one
    source.deliver(EntryBatch::LayoutShift(vec![LayoutShiftEvent::new(100.0, 0.02)]));
    let cls = last_for(&updates.borrow(), MetricName::Cls).unwrap();
    assert!(approx(cls.value(), 0.02));
}

#[test]
fn malformed_shift_values_count_as_zero() {
    let source = ReplaySource::new();
    let (handle, updates) = recording_subscription(&source, &MonitorConfig::default());

    source.deliver(EntryBatch::LayoutShift(vec![
        LayoutShiftEvent::new(0.0, 0.05),
        LayoutShiftEvent::new(50.0, f64::NAN),
        LayoutShiftEvent::new(100.0, -0.2),
        LayoutShiftEvent::new(f64::NAN, 0.02),
    ]));

    let updates = updates.borrow();
    assert_eq!(updates.len(), 4);
    assert!(updates.iter().all(|s| s.value().is_finite()));
    assert!(approx(updates[1].value(), 0.05));
    assert!(approx(updates[2].value(), 0.05));

    let cls = last_for(&updates, MetricName::Cls).unwrap();
    assert!(approx(cls.value(), 0.07));
    assert_eq!(cls.rating(), Rating::Good);
    assert!(approx(handle.cls_running_score(), 0.07));
}

#[test]
fn disabled_streams_are_not_observed() {
    let source = ReplaySource::new();
    let config = MonitorConfig {
        streams: vec![EntryType::LayoutShift],
        ..MonitorConfig::default()
    };
    let (handle, _updates) = recording_subscription(&source, &config);

    assert_eq!(handle.active_streams(), vec![EntryType::LayoutShift]);
    assert!(handle.failures().is_empty());
    assert_eq!(source.listener_count(EntryType::FirstInput), 0);
}

#[test]
fn monitor_board_follows_updates() {
    let source = ReplaySource::new();
    let mut monitor = VitalsMonitor::new(MonitorConfig::default());
    let changes = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&changes);
    monitor.start(&source, move |_board| *counter.borrow_mut() += 1);
    assert!(monitor.is_running());

    source.deliver(EntryBatch::LayoutShift(vec![
        LayoutShiftEvent::new(0.0, 0.15),
        LayoutShiftEvent::new(200.0, 0.15),
    ]));
    source.deliver(EntryBatch::FirstInput(vec![FirstInputEntry {
        start_time: 1000.0,
        processing_start: 1050.0,
    }]));

    let board = monitor.snapshot();
    assert_eq!(board.get(MetricName::Cls).unwrap().rating(), Rating::Poor);
    assert!(approx(board.cls_running_score(), 0.3));
    assert_eq!(board.get(MetricName::Lcp), None);
    assert_eq!(*changes.borrow(), 3);

    let rows = board.rows();
    assert_eq!(rows[0].display, "Loading...");
    assert_eq!(rows[1].display, "50ms");
    assert_eq!(rows[2].display, "0.300");

    monitor.reset_cls();
    let board = monitor.snapshot();
    assert_eq!(board.cls_running_score(), 0.0);
    assert_eq!(board.get(MetricName::Cls).unwrap().rating(), Rating::Good);
    assert_eq!(*changes.borrow(), 4);

    monitor.stop();
    assert!(!monitor.is_running());
    assert_eq!(source.listener_count(EntryType::LayoutShift), 0);
}

#[test]
fn reset_from_change_callback_clears_board() {
    let source = ReplaySource::new();
    let monitor = Rc::new(RefCell::new(VitalsMonitor::new(MonitorConfig::default())));
    let weak: Weak<RefCell<VitalsMonitor>> = Rc::downgrade(&monitor);

    monitor.borrow_mut().start(&source, move |board| {
        if board.cls_running_score() > 0.25 {
            if let Some(monitor) = weak.upgrade() {
                monitor.borrow_mut().reset_cls();
            }
        }
    });

    source.deliver(EntryBatch::LayoutShift(vec![LayoutShiftEvent::new(0.0, 0.3)]));

    let board = monitor.borrow().snapshot();
    assert_eq!(board.cls_running_score(), 0.0);
    let cls = board.get(MetricName::Cls).unwrap();
    assert_eq!(cls.value(), 0.0);
    assert_eq!(cls.rating(), Rating::Good);

    monitor.borrow_mut().stop();
    assert_eq!(source.listener_count(EntryType::LayoutShift), 0);
}
