//! Startup restore: what the controller does with whatever NVS holds.

use crate::mock_hw::{MockNvs, Rig};

use tricolor::app::events::AppEvent;
use tricolor::app::ports::StoragePort;
use tricolor::drivers::triggers::TriggerLine;
use tricolor::mode::Mode;

#[test]
fn empty_store_boots_off_in_yellow() {
    let rig = Rig::boot(MockNvs::new());

    assert!(!rig.app.power());
    assert_eq!(rig.app.mode(), Mode::Yellow);
    assert_eq!(rig.hw.relay_log, vec![false]);
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::Restored {
            power: false,
            mode: Mode::Yellow
        }]
    );
    assert!(rig.app.store().writes.is_empty(), "restore never writes");
}

#[test]
fn stored_power_on_energises_relay() {
    let rig = Rig::boot(MockNvs::with_snapshot(true, 2));

    assert!(rig.app.power());
    assert_eq!(rig.app.mode(), Mode::Mix);
    assert_eq!(rig.hw.relay_log, vec![true]);
}

#[test]
fn stored_power_off_keeps_mode() {
    let rig = Rig::boot(MockNvs::with_snapshot(false, 1));

    assert!(!rig.app.power());
    assert_eq!(rig.app.mode(), Mode::White);
    assert!(!rig.hw.relay);
}

#[test]
fn out_of_range_mode_restores_as_yellow() {
    for raw in [-1, 3, 42, i32::MAX] {
        let rig = Rig::boot(MockNvs::with_snapshot(true, raw));
        assert_eq!(rig.app.mode(), Mode::Yellow, "stored mode {}", raw);
        assert!(rig.app.power());
    }
}

#[test]
fn wrongly_typed_entry_falls_back_to_default() {
    let mut nvs = MockNvs::new();
    nvs.set_i32("light", "power", 1).unwrap();
    nvs.set_i32("light", "mode", 1).unwrap();

    let rig = Rig::boot(nvs);
    assert!(!rig.app.power());
    assert_eq!(rig.app.mode(), Mode::White);
}

#[test]
fn mode_survives_reboot_after_cycle() {
    let mut rig = Rig::lit(Mode::Yellow);
    rig.press(TriggerLine::White);
    rig.run_until_idle(25);
    assert_eq!(rig.app.mode(), Mode::White);

    let reboot = Rig::boot(std::mem::take(rig.app.store_mut()));
    assert!(reboot.app.power());
    assert_eq!(reboot.app.mode(), Mode::White);
    assert!(reboot.hw.relay);
}

#[test]
fn off_then_reboot_stays_off_with_last_mode() {
    let mut rig = Rig::lit(Mode::Mix);
    rig.press(TriggerLine::Off);

    let reboot = Rig::boot(std::mem::take(rig.app.store_mut()));
    assert!(!reboot.app.power());
    assert_eq!(reboot.app.mode(), Mode::Mix);
    assert_eq!(reboot.hw.relay_log, vec![false]);
}

#[test]
fn restored_state_gates_first_select() {
    let mut rig = Rig::boot(MockNvs::with_snapshot(true, 0));
    rig.press(TriggerLine::Mix);
    assert!(rig.app.is_cycling());
    assert_eq!(rig.app.remaining_pulses(), 2);
}
