// Licensed under the Apache-2.0 license

#![allow(dead_code)]

use pmc_drivers::testing::FakeEamHw;
use pmc_eam::{Eam, Platform, PlatformServices};
use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    Shutdown(u32),
    Restart(u32),
    Recovery(u32),
    OverTemp(u32),
    NotifyPeers(u32),
    Halt,
}

/// Records every collaborator call. `halt()` panics so tests can observe
/// the point where firmware would stop; so does a liveness loop that runs
/// past `live_limit`.
pub struct TestServices {
    calls: RefCell<Vec<Call>>,
    pub status: Cell<i32>,
    pub over_temp_clears: Cell<bool>,
    pub peers_ready: Cell<bool>,
    pub live_beats: Cell<u32>,

    /// Liveness beats after which a hold loop is treated as reached
    pub live_limit: Cell<u32>,
}

impl Default for TestServices {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            status: Cell::new(0),
            over_temp_clears: Cell::new(true),
            peers_ready: Cell::new(true),
            live_beats: Cell::new(0),
            live_limit: Cell::new(10_000),
        }
    }
}

impl TestServices {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn called(&self, call: &Call) -> bool {
        self.calls.borrow().contains(call)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl PlatformServices for TestServices {
    fn subsystem_shutdown(&self, subsystem_id: u32, _: u32, _: u32, _: u32) -> i32 {
        self.record(Call::Shutdown(subsystem_id));
        self.status.get()
    }

    fn subsystem_restart(&self, subsystem_id: u32) -> i32 {
        self.record(Call::Restart(subsystem_id));
        self.status.get()
    }

    fn execute_recovery_procedure(&self, procedure_id: u32) -> i32 {
        self.record(Call::Recovery(procedure_id));
        self.status.get()
    }

    fn wait_for_over_temperature_clear(&self, max_wait_ms: u32) -> bool {
        self.record(Call::OverTemp(max_wait_ms));
        self.over_temp_clears.get()
    }

    fn notify_peers(&self, response: u32) {
        self.record(Call::NotifyPeers(response));
    }

    fn peer_handshake_done(&self) -> bool {
        self.peers_ready.get()
    }

    fn set_live_status(&self) {
        let beats = self.live_beats.get() + 1;
        self.live_beats.set(beats);
        if beats >= self.live_limit.get() {
            panic!("held");
        }
    }

    fn halt(&self) -> ! {
        self.record(Call::Halt);
        panic!("halted");
    }
}

/// Register model for `platform`. Keep the returned handle for stimulus
/// and hand a clone to the manager.
pub fn hw_for(platform: &Platform) -> FakeEamHw {
    FakeEamHw::new(platform.banks)
}

/// Construct and run boot-time bring-up.
pub fn booted<'a>(
    platform: &'a Platform,
    bus: &'a mut FakeEamHw,
    services: &'a TestServices,
) -> Eam<'a> {
    let mut eam = Eam::new(platform, bus, services).unwrap();
    eam.init().unwrap();
    eam
}

/// Run `f`, expecting it to end in `halt()`.
pub fn expect_halt<F: FnOnce()>(f: F) {
    let result = catch_unwind(AssertUnwindSafe(f));
    assert!(result.is_err(), "expected halt");
}
