/*++

Licensed under the Apache-2.0 license.

File Name:

    tamper.rs

Abstract:

    File contains the tamper / secure lockdown state machine and the
    lockdown procedure that ends in a handoff to the boundary logic.

--*/

use crate::manager::Eam;
use bitflags::bitflags;
use pmc_drivers::{cprintln, wait, ActionReg, ResetKind};
use pmc_error::{PmcError, PmcResult};

mod fsm {
    use smlang::statemachine;

    statemachine! {
        transitions: {
            // Trigger is accepted exactly once per boot
            *NotTriggered + Trigger = Triggered,

            // InProgress is terminal
            Triggered + Process = InProgress,
        }
    }

    pub struct Context;

    impl StateMachineContext for Context {}
}

bitflags! {
    /// Tamper response word
    pub struct TamperResponse: u32 {
        const SYSTEM_RESET = 1 << 1;
        const LOCKDOWN_0 = 1 << 2;
        const LOCKDOWN_1 = 1 << 3;
    }
}

impl TamperResponse {
    /// A response must carry at least one of these bits.
    pub const VALID_MASK: u32 = 0xE;

    pub fn parse(raw: u32) -> PmcResult<Self> {
        if raw & Self::VALID_MASK == 0 {
            return Err(PmcError::TAMPER_INVALID_RESPONSE);
        }
        Ok(Self::from_bits_truncate(raw))
    }

    pub fn needs_lockdown(&self) -> bool {
        self.intersects(Self::LOCKDOWN_0 | Self::LOCKDOWN_1)
    }
}

/// Where `trigger` runs the response
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TamperMode {
    /// Inline, in the caller's context
    Immediate,

    /// In the critical-priority tamper task
    Task,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TamperState {
    NotTriggered,
    Triggered,
    InProgress,
}

pub struct Tamper {
    sm: fsm::StateMachine<fsm::Context>,
    response: TamperResponse,
    task_pending: bool,
}

impl Default for Tamper {
    fn default() -> Self {
        Self::new()
    }
}

impl Tamper {
    pub fn new() -> Self {
        Self {
            sm: fsm::StateMachine::new(fsm::Context),
            response: TamperResponse::empty(),
            task_pending: false,
        }
    }

    pub fn state(&self) -> TamperState {
        match self.sm.state() {
            fsm::States::NotTriggered => TamperState::NotTriggered,
            fsm::States::Triggered => TamperState::Triggered,
            fsm::States::InProgress => TamperState::InProgress,
        }
    }

    pub fn response(&self) -> TamperResponse {
        self.response
    }

    /// Check-then-set. Only the first call per boot returns true.
    pub fn trigger(&mut self, response: TamperResponse) -> bool {
        let accepted = self.sm.process_event(fsm::Events::Trigger).is_ok();
        if accepted {
            self.response = response;
        }
        accepted
    }

    /// Triggered to InProgress.
    pub fn begin(&mut self) -> bool {
        self.sm.process_event(fsm::Events::Process).is_ok()
    }

    pub fn schedule(&mut self) {
        self.task_pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.task_pending
    }

    pub fn take_pending(&mut self) -> bool {
        core::mem::take(&mut self.task_pending)
    }
}

impl Eam<'_> {
    /// Start the tamper response `raw`. Later triggers, from any source,
    /// are no-ops.
    pub fn trigger_tamper(&mut self, raw: u32, mode: TamperMode) -> PmcResult<()> {
        let response = TamperResponse::parse(raw)?;
        if !self.tamper.trigger(response) {
            cprintln!("EAM: tamper response 0x{:08X} ignored, already triggered", raw);
            return Ok(());
        }
        cprintln!("EAM: tamper triggered, response 0x{:08X}", raw);
        if response.needs_lockdown() {
            self.services.notify_peers(response.bits());
        }
        match mode {
            TamperMode::Immediate => self.process_tamper(),
            TamperMode::Task => {
                self.tamper.schedule();
                Ok(())
            }
        }
    }

    pub fn tamper_state(&self) -> TamperState {
        self.tamper.state()
    }

    /// Body of the tamper task. Never returns.
    pub(crate) fn process_tamper(&mut self) -> ! {
        self.tamper.begin();
        let response = self.tamper.response();
        if !response.needs_lockdown() {
            self.system_reset(ResetKind::Soft)
        }
        self.lockdown(response)
    }

    fn lockdown(&mut self, response: TamperResponse) -> ! {
        let services = self.services;
        let platform = self.platform;
        let layout = &platform.layout;
        let tamper = &layout.tamper;

        cprintln!("EAM: secure lockdown, response 0x{:08X}", response.bits());
        if wait::until_bounded(
            || services.peer_handshake_done(),
            tamper.handshake_polls,
            || services.set_live_status(),
        )
        .is_err()
        {
            cprintln!(
                "EAM: warning 0x{:08X}, continuing without peers",
                u32::from(PmcError::TAMPER_HANDSHAKE_TIMEOUT)
            );
        }

        for bank in platform.banks {
            // The verification result does not matter once lockdown runs.
            let _ = bank.disable(&mut *self.bus, ActionReg::Irq, bank.valid_bits);
        }
        layout.irq.disable(&mut *self.bus);

        self.bus.write(tamper.clock_divisor, tamper.clock_divisor_lockdown);

        let status = services.execute_recovery_procedure(tamper.recovery_procedure);
        if status != 0 {
            cprintln!(
                "EAM: warning 0x{:08X}, recovery procedure returned {}",
                u32::from(PmcError::TAMPER_RECOVERY_FAILED),
                status
            );
        }

        self.bus.write(tamper.boundary_response, response.bits());
        self.bus.write(tamper.boundary_trigger, tamper.boundary_trigger_mask);
        services.halt()
    }
}
