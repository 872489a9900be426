/*++

Licensed under the Apache-2.0 license.

File Name:

    dispatch.rs

Abstract:

    File contains the error interrupt fast path, the scheduler drain and
    the error task that walks the banks.

--*/

use crate::action::ErrorAction;
use crate::config::{route, Route};
use crate::manager::Eam;
use crate::node::{ErrorId, ErrorNodeId, SetBits};
use crate::tamper::{TamperMode, TamperResponse, TamperState};
use pmc_drivers::{cprintln, ActionReg, BankGroup};
use pmc_error::PmcError;

/// Outcome of walking one bank.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Walk {
    Completed,

    /// A handler started the tamper response; nothing else may run.
    Superseded,
}

impl Eam<'_> {
    /// Error interrupt entry. Only the tamper source is serviced here; all
    /// other errors are deferred to the error task.
    pub fn isr(&mut self) {
        self.fast_path_tamper();
        self.schedule_task();
        self.platform.layout.irq.disable(&mut *self.bus);
    }

    fn fast_path_tamper(&mut self) {
        let platform = self.platform;
        let tamper = &platform.layout.tamper;
        let source = tamper.source;
        let bank = self.bank(source.bank());
        if bank.read_status(&*self.bus) & source.mask() == 0
            || bank.armed(&*self.bus, ActionReg::Irq) & source.mask() == 0
        {
            return;
        }

        let raw = self.bus.read(tamper.response);
        if TamperResponse::parse(raw).is_err() {
            // Left to the error task and the installed lockdown handler.
            return;
        }
        let _ = bank.disable_all(&mut *self.bus, source.mask());
        if let Err(e) = self.trigger_tamper(raw, TamperMode::Task) {
            cprintln!("EAM: tamper trigger failed 0x{:08X}", u32::from(e));
        }
        bank.clear_status(&mut *self.bus, source.mask());
    }

    /// Mark the error task pending. Repeated calls before it runs coalesce.
    pub(crate) fn schedule_task(&mut self) {
        self.task_pending = true;
    }

    pub fn is_task_pending(&self) -> bool {
        self.task_pending
    }

    /// Number of times the error task has run.
    pub fn task_runs(&self) -> u32 {
        self.task_runs
    }

    /// Scheduler drain. A pending tamper task runs first and never
    /// returns. Returns whether the error task ran.
    pub fn run_pending(&mut self) -> bool {
        if self.tamper.take_pending() {
            self.process_tamper()
        }
        if !core::mem::take(&mut self.task_pending) {
            return false;
        }
        self.run_error_task();
        true
    }

    fn run_error_task(&mut self) {
        self.task_runs += 1;
        let platform = self.platform;
        for (idx, bank) in platform.banks.iter().enumerate() {
            if bank.group == BankGroup::Secondary {
                continue;
            }
            if self.walk_bank(idx) == Walk::Superseded {
                cprintln!("EAM: error task stopped by tamper response");
                return;
            }
        }
        platform.layout.irq.clear(&mut *self.bus);
        platform.layout.irq.enable(&mut *self.bus);
    }

    /// Service every set status bit of bank `idx`, low to high.
    pub(crate) fn walk_bank(&mut self, idx: usize) -> Walk {
        let bank = self.bank(idx);
        let (status, irq_armed, any_armed) = if bank.is_software() {
            (self.sw_status[idx], u32::MAX, u32::MAX)
        } else {
            let bus = &*self.bus;
            (
                bank.read_status(bus),
                bank.armed(bus, ActionReg::Irq),
                ActionReg::ALL
                    .iter()
                    .fold(0, |acc, reg| acc | bank.armed(bus, *reg)),
            )
        };
        if status == 0 {
            return Walk::Completed;
        }
        let node = ErrorNodeId::new(bank.group, idx);
        cprintln!(
            "EAM: {} node 0x{:08X} status 0x{:08X}",
            bank.name,
            node.raw(),
            status
        );

        for bit in SetBits(status) {
            let id = ErrorId::new(idx, bit);
            let mask = id.mask();
            let Some(desc) = self.registry.entry(id).copied() else {
                continue;
            };
            match (route(bank, desc.action), desc.handler) {
                (Route::Software, Some(handler)) if irq_armed & mask != 0 => {
                    if let Err(e) = self.disable_routes(idx, mask) {
                        cprintln!(
                            "EAM: disable failed 0x{:08X} node 0x{:08X} mask 0x{:08X} id {}",
                            u32::from(e),
                            node.raw(),
                            mask,
                            id.0
                        );
                    }
                    handler.handle(self, node, mask);
                    if !self.holds_error_out_line(id) {
                        self.clear_status(idx, mask);
                    }

                    // A handler may have reconfigured its own error.
                    let current = self.registry.entry(id).map(|d| d.action);
                    if current == Some(desc.action) {
                        if desc.action.is_one_shot() {
                            self.registry.reset_action(id);
                        } else if let Err(e) = self.arm(idx, mask, Route::Software) {
                            cprintln!(
                                "EAM: re-arm failed 0x{:08X} node 0x{:08X} mask 0x{:08X} id {}",
                                u32::from(e),
                                node.raw(),
                                mask,
                                id.0
                            );
                        }
                    }
                    if self.tamper.state() != TamperState::NotTriggered {
                        return Walk::Superseded;
                    }
                }
                (Route::Hardware(reg), _) if bank.armed(&*self.bus, reg) & mask != 0 => {
                    cprintln!(
                        "EAM: {} escalated by hardware node 0x{:08X} mask 0x{:08X} id {}",
                        desc.action.name(),
                        node.raw(),
                        mask,
                        id.0
                    );
                }
                // Disarmed or already serviced once; left for whoever
                // re-arms it.
                _ if matches!(desc.action, ErrorAction::None | ErrorAction::Invalid)
                    || any_armed & mask == 0 => {}
                _ => {
                    cprintln!(
                        "EAM: warning 0x{:08X}, unhandled node 0x{:08X} mask 0x{:08X} id {}",
                        u32::from(PmcError::EAM_UNHANDLED_ERROR),
                        node.raw(),
                        mask,
                        id.0
                    );
                }
            }
        }
        Walk::Completed
    }
}
