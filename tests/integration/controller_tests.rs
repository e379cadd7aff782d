//! End-to-end behaviour of the light controller: trigger lines in, relay
//! pulses and NVS writes out.

use crate::mock_hw::{MockNvs, Rig};

use tricolor::app::events::AppEvent;
use tricolor::drivers::triggers::TriggerLine;
use tricolor::fsm::CycleState;
use tricolor::mode::Mode;

// ── Mode selection ───────────────────────────────────────────

#[test]
fn white_to_mix_takes_one_pulse() {
    let mut rig = Rig::lit(Mode::White);
    rig.forget_history();

    rig.press(TriggerLine::Mix);
    assert_eq!(rig.app.remaining_pulses(), 1);
    assert_eq!(rig.hw.relay_log, vec![false], "relay drops at pulse start");

    rig.advance(399);
    assert!(rig.app.is_cycling());
    assert!(!rig.hw.relay);

    rig.advance(1);
    assert!(!rig.app.is_cycling());
    assert_eq!(rig.app.mode(), Mode::Mix);
    assert_eq!(rig.hw.relay_log, vec![false, true]);
    assert_eq!(rig.app.store().writes, vec!["mode=2"]);
    assert_eq!(rig.sink.events.last(), Some(&AppEvent::ModeUpdated(Mode::Mix)));
}

#[test]
fn mix_to_white_takes_two_pulses_through_yellow() {
    let mut rig = Rig::lit(Mode::Mix);
    rig.forget_history();

    rig.press(TriggerLine::White);
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::CycleStarted {
            from: Mode::Mix,
            target: Mode::White,
            pulses: 2
        }]
    );

    rig.advance(400);
    assert_eq!(rig.app.mode(), Mode::Yellow, "first pulse lands on Yellow");
    assert!(rig.app.is_cycling());
    assert!(!rig.hw.relay, "second pulse starts immediately");

    rig.advance(399);
    assert_eq!(rig.app.mode(), Mode::Yellow);
    rig.advance(1);

    assert_eq!(rig.app.mode(), Mode::White);
    assert!(!rig.app.is_cycling());
    assert_eq!(rig.hw.relay_log, vec![false, true, false, true]);
    assert_eq!(rig.app.store().writes, vec!["mode=0", "mode=1"]);
    assert_eq!(rig.sink.pulses(), 2);
}

#[test]
fn selecting_current_mode_is_a_no_op() {
    let mut rig = Rig::lit(Mode::White);
    rig.forget_history();

    rig.press(TriggerLine::White);
    assert!(!rig.app.is_cycling());
    assert_eq!(rig.app.mode(), Mode::White);
    assert!(rig.hw.relay_log.is_empty());
    assert!(rig.app.store().writes.is_empty());
}

#[test]
fn no_op_select_still_consumes_the_debounce_window() {
    let mut rig = Rig::lit(Mode::White);
    rig.press(TriggerLine::White);
    rig.advance(20);
    rig.press(TriggerLine::Mix);
    assert!(!rig.app.is_cycling(), "MIX inside the window must be ignored");

    rig.advance(20);
    rig.advance(20);
    rig.press(TriggerLine::Mix);
    assert!(rig.app.is_cycling());
}

#[test]
fn select_while_off_changes_nothing() {
    let mut rig = Rig::boot(MockNvs::with_snapshot(false, 1));
    rig.forget_history();

    rig.press(TriggerLine::Mix);
    rig.advance(500);

    assert!(!rig.app.power());
    assert_eq!(rig.app.mode(), Mode::White);
    assert_eq!(rig.app.cycle_state(), CycleState::Idle);
    assert!(rig.hw.relay_log.is_empty());
    assert!(rig.sink.events.is_empty());
}

// ── Power ────────────────────────────────────────────────────

#[test]
fn on_forces_yellow_and_persists_both_fields() {
    let mut rig = Rig::boot(MockNvs::with_snapshot(false, 2));
    rig.forget_history();

    rig.press(TriggerLine::On);

    assert!(rig.app.power());
    assert_eq!(rig.app.mode(), Mode::Yellow);
    assert!(!rig.app.is_cycling());
    assert_eq!(rig.hw.relay_log, vec![true]);
    assert_eq!(rig.app.store().writes, vec!["power=true", "mode=0"]);
    assert_eq!(rig.sink.events, vec![AppEvent::PoweredOn]);
}

#[test]
fn off_keeps_mode_and_persists_power_only() {
    let mut rig = Rig::lit(Mode::Mix);
    rig.forget_history();

    rig.press(TriggerLine::Off);

    assert!(!rig.app.power());
    assert_eq!(rig.app.mode(), Mode::Mix);
    assert_eq!(rig.hw.relay_log, vec![false]);
    assert_eq!(rig.app.store().writes, vec!["power=false"]);
    assert_eq!(rig.sink.events, vec![AppEvent::PoweredOff]);
}

#[test]
fn on_while_on_resets_to_yellow() {
    let mut rig = Rig::lit(Mode::White);
    rig.press(TriggerLine::On);
    assert_eq!(rig.app.mode(), Mode::Yellow);
    assert!(rig.hw.relay);
}

// ── Debounce ─────────────────────────────────────────────────

#[test]
fn second_edge_inside_window_is_ignored() {
    let mut rig = Rig::lit(Mode::Yellow);
    rig.press(TriggerLine::Off);
    assert!(!rig.app.power());

    rig.advance(30);
    rig.press(TriggerLine::On);
    assert!(!rig.app.power(), "ON 30 ms after OFF is debounced");

    rig.advance(30);
    rig.press(TriggerLine::On);
    assert!(rig.app.power(), "ON 60 ms after OFF is accepted");
}

#[test]
fn inputs_inside_boot_window_are_ignored() {
    let mut rig = Rig::boot(MockNvs::new());
    rig.now = 40;
    rig.press(TriggerLine::On);
    assert!(!rig.app.power());
}

// ── Cycling priority ─────────────────────────────────────────

#[test]
fn inputs_are_not_sampled_while_cycling() {
    let mut rig = Rig::lit(Mode::Mix);
    rig.press(TriggerLine::White);
    let reads = rig.hw.reads;

    for line in [TriggerLine::Off, TriggerLine::On, TriggerLine::Mix] {
        rig.advance(100);
        rig.press(line);
    }

    assert_eq!(rig.hw.reads, reads, "no sampling during a pulse train");
    assert!(rig.app.power(), "OFF during cycling is not honoured");
    rig.run_until_idle(10);
    assert_eq!(rig.app.mode(), Mode::White);
    assert!(rig.hw.relay);
}

#[test]
fn power_stays_on_through_every_pulse() {
    let mut rig = Rig::lit(Mode::Mix);
    rig.press(TriggerLine::White);
    while rig.app.is_cycling() {
        assert!(rig.app.power());
        rig.advance(7);
    }
    assert!(rig.app.power());
}

#[test]
fn line_held_through_cycle_fires_afterwards() {
    let mut rig = Rig::lit(Mode::White);
    rig.press(TriggerLine::Mix);

    rig.advance(100);
    rig.hw.levels = tricolor::drivers::triggers::TriggerLevels::only(TriggerLine::Off);
    rig.run_until_idle(100);
    assert!(rig.app.power());

    // First idle tick samples the still-held OFF line against the
    // pre-cycle levels.
    rig.advance(1);
    assert!(!rig.app.power());
    assert_eq!(rig.app.mode(), Mode::Mix);
}

// ── Persistence failure ──────────────────────────────────────

#[test]
fn failed_writes_do_not_stall_the_controller() {
    let mut rig = Rig::lit(Mode::Yellow);
    rig.app.store_mut().fail_writes = true;

    rig.press(TriggerLine::Mix);
    rig.run_until_idle(50);

    assert_eq!(rig.app.mode(), Mode::Mix);
    assert!(rig.app.store().writes.is_empty());

    // The store still holds the pre-cycle snapshot: live and durable
    // state have diverged.
    let reboot = Rig::boot(std::mem::take(rig.app.store_mut()));
    assert!(reboot.app.power());
    assert_eq!(reboot.app.mode(), Mode::Yellow);
}
