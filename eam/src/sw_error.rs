/*++

Licensed under the Apache-2.0 license.

File Name:

    sw_error.rs

Abstract:

    File contains the entry points firmware uses to report its own errors:
    software-bank events and firmware error codes.

--*/

use crate::action::ErrorAction;
use crate::manager::Eam;
use crate::node::ErrorId;
use crate::tamper::{TamperMode, TamperResponse};
use pmc_drivers::memory_layout::{BOOT_MODE_JTAG, BOOT_MODE_SMAP, BOOT_MODE_USB};
use pmc_drivers::printer::HexBytes;
use pmc_drivers::{cprintln, error_reporter, EamScratch};
use pmc_error::{PmcError, PmcResult};
use zerocopy::IntoBytes;

impl Eam<'_> {
    /// Raise software error `id` and schedule the error task. Errors with
    /// no action installed are dropped.
    pub fn report_sw_error(&mut self, id: ErrorId) -> PmcResult<()> {
        let action = self.registry.get_descriptor(id)?.action;
        if !self.bank(id.bank()).is_software() {
            return Err(PmcError::EAM_INVALID_ERROR_ID);
        }
        if action == ErrorAction::None {
            cprintln!("EAM: software error id {} has no action, ignored", id.0);
            return Ok(());
        }
        self.sw_status[id.bank()] |= id.mask();
        self.schedule_task();
        Ok(())
    }

    /// Record a firmware error. Warnings are only logged. An error before
    /// boot completes ends the boot attempt: JTAG boots hold for debug, a
    /// blown halt-boot fuse locks the device down, slave boot modes stop,
    /// and everything else falls back to the next boot image.
    pub fn report_fw_error(&mut self, err: PmcError) {
        if err.is_warning() {
            cprintln!("EAM: firmware warning 0x{:08X}", u32::from(err));
            return;
        }
        cprintln!("EAM: firmware error 0x{:08X}", u32::from(err));
        error_reporter::report_fw_error(&mut *self.bus, self.platform.layout.fw_err, err);
        if self.boot_complete {
            return;
        }

        let platform = self.platform;
        let layout = &platform.layout;
        self.dump_registers();

        let boot_mode = self.bus.read(layout.boot_mode) & layout.boot_mode_mask;
        if boot_mode == BOOT_MODE_JTAG {
            cprintln!("EAM: error during JTAG boot, holding");
            let services = self.services;
            loop {
                services.set_live_status();
            }
        }

        if self.halt_boot_policy {
            cprintln!("EAM: error during boot, halting");
            // LOCKDOWN_0 always parses; a second trigger is a no-op.
            let _ = self.trigger_tamper(TamperResponse::LOCKDOWN_0.bits(), TamperMode::Immediate);
        }

        if boot_mode == BOOT_MODE_USB || boot_mode == BOOT_MODE_SMAP {
            cprintln!("EAM: error during slave boot, stopping");
            self.services.halt();
        }
        self.fall_back();
    }

    /// Point the boot ROM at the next image and raise the fallback error.
    fn fall_back(&mut self) {
        let platform = self.platform;
        let layout = &platform.layout;
        let next = self.bus.read(layout.multi_boot).wrapping_add(1);
        self.bus.write(layout.multi_boot, next);
        cprintln!("EAM: falling back to boot image {}", next);

        let fallback = layout.fallback_error;
        if matches!(
            self.registry.get_descriptor(fallback).map(|d| d.action),
            Ok(ErrorAction::PowerOnReset | ErrorAction::SoftReset)
        ) {
            self.sysmon_clk_set_iro();
        }
        self.bank(fallback.bank()).raise(&mut *self.bus, fallback.mask());
    }

    fn dump_registers(&self) {
        let platform = self.platform;
        let bus = &*self.bus;
        cprintln!("EAM: register dump");
        cprintln!("EAM: FW_ERR 0x{:08X}", bus.read(platform.layout.fw_err));
        for bank in platform.banks.iter().filter(|b| !b.is_software()) {
            cprintln!("EAM: {} status 0x{:08X}", bank.name, bank.read_status(bus));
        }
        let scratch = EamScratch::load(bus, platform.layout.scratch);
        cprintln!("EAM: scratch {}", HexBytes(scratch.as_bytes()));
    }

    /// Ends the window in which errors halt the boot.
    pub fn mark_boot_complete(&mut self) {
        self.boot_complete = true;
    }

    pub fn is_boot_complete(&self) -> bool {
        self.boot_complete
    }
}
