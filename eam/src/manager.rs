/*++

Licensed under the Apache-2.0 license.

File Name:

    manager.rs

Abstract:

    File contains the error manager object and its boot-time bring-up.

--*/

use crate::action::ErrorAction;
use crate::error_out::ErrorOutCounter;
use crate::handler::HandlerRef;
use crate::nested::Nested;
use crate::node::ErrorId;
use crate::platform::Platform;
use crate::registry::Registry;
use crate::services::PlatformServices;
use crate::tamper::Tamper;
use pmc_drivers::{
    cprintln, error_reporter, BankDescriptor, BankGroup, EamScratch, RegisterBus, ResetKind,
    BITS_PER_BANK, MAX_BANKS,
};
use pmc_error::{PmcError, PmcResult};

/// Keep the first failure, let later steps still run.
pub(crate) fn first_err(acc: &mut PmcResult<()>, result: PmcResult<()>) {
    if acc.is_ok() {
        *acc = result;
    }
}

/// Error and event manager. All mutation happens from task context; the
/// fast path (`isr`) only touches the tamper state, the pending flag and
/// interrupt masks.
pub struct Eam<'a> {
    pub(crate) platform: &'a Platform,
    pub(crate) bus: &'a mut dyn RegisterBus,
    pub(crate) services: &'a dyn PlatformServices,
    pub(crate) registry: Registry<'a>,
    pub(crate) err_out: ErrorOutCounter,
    pub(crate) err_out_outstanding: [u32; MAX_BANKS],
    pub(crate) sw_status: [u32; MAX_BANKS],
    pub(crate) secondary_ready: [bool; MAX_BANKS],
    pub(crate) tamper: Tamper,
    pub(crate) task_pending: bool,
    pub(crate) task_runs: u32,
    pub(crate) halt_boot_policy: bool,
    pub(crate) boot_complete: bool,
}

impl<'a> Eam<'a> {
    pub fn new(
        platform: &'a Platform,
        bus: &'a mut dyn RegisterBus,
        services: &'a dyn PlatformServices,
    ) -> PmcResult<Self> {
        platform.validate()?;
        Ok(Self {
            platform,
            bus,
            services,
            registry: Registry::new(platform),
            err_out: ErrorOutCounter::new(),
            err_out_outstanding: [0; MAX_BANKS],
            sw_status: [0; MAX_BANKS],
            secondary_ready: [false; MAX_BANKS],
            tamper: Tamper::new(),
            task_pending: false,
            task_runs: 0,
            halt_boot_policy: false,
            boot_complete: false,
        })
    }

    /// Boot-time bring-up of the primary and software banks.
    pub fn init(&mut self) -> PmcResult<()> {
        let platform = self.platform;
        let layout = &platform.layout;
        cprintln!("EAM: init {}", platform.name);

        if !self
            .services
            .wait_for_over_temperature_clear(layout.over_temp_wait_ms)
        {
            cprintln!("EAM: over-temperature did not clear");
            return Err(PmcError::DRIVER_OVER_TEMP_TIMEOUT);
        }

        EamScratch::store_marker(&mut *self.bus, layout.scratch);
        error_reporter::clear_fw_error(&mut *self.bus, layout.fw_err, layout.scratch);

        let mut result = Ok(());
        for (idx, bank) in platform.banks.iter().enumerate() {
            if bank.group != BankGroup::Secondary {
                first_err(&mut result, self.bring_up_bank(idx));
            }
        }

        self.halt_boot_policy = self.bus.read(layout.halt_boot_fuse) & layout.halt_boot_mask != 0;

        layout.irq.clear(&mut *self.bus);
        layout.irq.enable(&mut *self.bus);
        result
    }

    /// Bring-up of the secondary banks, once their subsystem is running.
    pub fn init_secondary(&mut self) -> PmcResult<()> {
        let platform = self.platform;
        let mut result = Ok(());
        for (idx, bank) in platform.banks.iter().enumerate() {
            if bank.group == BankGroup::Secondary {
                self.secondary_ready[idx] = true;
                first_err(&mut result, self.bring_up_bank(idx));
            }
        }
        result
    }

    /// Mask everything, record and clear boot-time status, then install
    /// the table defaults.
    fn bring_up_bank(&mut self, idx: usize) -> PmcResult<()> {
        let bank = self.bank(idx);
        let mut result = bank.disable_all(&mut *self.bus, bank.valid_bits);

        let status = if bank.is_software() {
            core::mem::take(&mut self.sw_status[idx])
        } else {
            bank.read_status(&*self.bus)
        };
        EamScratch::store_bank_status(&mut *self.bus, self.platform.layout.scratch, idx, status);
        if status != 0 {
            cprintln!("EAM: {} status at boot 0x{:08X}", bank.name, status);
            bank.clear_status(&mut *self.bus, status);
        }

        for bit in 0..BITS_PER_BANK {
            let id = ErrorId::new(idx, bit);
            let entry = self.platform.errors[id.index()];
            if matches!(entry.action, ErrorAction::Invalid | ErrorAction::None) {
                continue;
            }
            let handler: Option<HandlerRef<'a>> = if self.platform.is_aggregate(id) {
                Some(&Nested)
            } else {
                None
            };
            first_err(
                &mut result,
                self.install(idx, id, entry.action, handler, entry.subsystem_id),
            );
        }
        result
    }

    pub fn registry(&self) -> &Registry<'a> {
        &self.registry
    }

    pub fn platform(&self) -> &'a Platform {
        self.platform
    }

    pub fn services(&self) -> &'a dyn PlatformServices {
        self.services
    }

    pub fn is_secondary_ready(&self, bank: usize) -> bool {
        self.secondary_ready.get(bank).copied().unwrap_or(false)
    }

    pub(crate) fn bank(&self, idx: usize) -> &'a BankDescriptor {
        &self.platform.banks[idx]
    }

    /// Move the sysmon to the internal oscillator so it keeps running
    /// through a firmware-driven reset.
    pub(crate) fn sysmon_clk_set_iro(&mut self) {
        let layout = &self.platform().layout;
        self.bus.modify(layout.sysmon_clk, layout.sysmon_clk_srcsel_mask, 0);
    }

    /// Request a reset and wait for it.
    pub(crate) fn system_reset(&mut self, kind: ResetKind) -> ! {
        let name = match kind {
            ResetKind::PowerOn => {
                self.sysmon_clk_set_iro();
                "power-on"
            }
            ResetKind::Soft => "soft",
        };
        cprintln!("EAM: {} reset", name);
        self.platform.layout.reset.request(&mut *self.bus, kind);
        self.services.halt()
    }
}
