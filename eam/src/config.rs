/*++

Licensed under the Apache-2.0 license.

File Name:

    config.rs

Abstract:

    File contains the action configurator: validation, the strictly
    ordered disable/clear/record/arm sequence, and route control.

--*/

use crate::action::ErrorAction;
use crate::handler::{builtin, HandlerRef};
use crate::manager::{first_err, Eam};
use crate::node::{ErrorId, ErrorNodeId, SetBits};
use crate::restrict;
use pmc_drivers::{cprintln, ActionReg, BankDescriptor};
use pmc_error::{PmcError, PmcResult};

/// Where an action is carried out on a given bank.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Route {
    Disarmed,
    Hardware(ActionReg),
    Software,
}

pub(crate) fn route(bank: &BankDescriptor, action: ErrorAction) -> Route {
    match action {
        ErrorAction::None | ErrorAction::Invalid => Route::Disarmed,
        a if a.is_hardware() && !bank.is_software() => a
            .hw_route()
            .filter(|reg| bank.route(*reg).is_some())
            .map_or(Route::Software, Route::Hardware),
        _ => Route::Software,
    }
}

impl<'a> Eam<'a> {
    /// Configure `action` for every error named by `mask` in bank `node`.
    ///
    /// Bits are handled one at a time, low to high. A bit that fails
    /// validation is left untouched and the remaining bits are still
    /// processed; the first failure is returned.
    pub fn set_action(
        &mut self,
        node: ErrorNodeId,
        mask: u32,
        action: ErrorAction,
        handler: Option<HandlerRef<'a>>,
        subsystem_id: u32,
    ) -> PmcResult<()> {
        let idx = node.decode(self.platform.banks)?;
        let mut result = Ok(());
        for bit in SetBits(mask) {
            let id = ErrorId::new(idx, bit);
            let step = self
                .validate(idx, id, action, handler.is_some())
                .and_then(|_| self.install(idx, id, action, handler, subsystem_id));
            if let Err(e) = step {
                cprintln!(
                    "EAM: set {} failed 0x{:08X} node 0x{:08X} mask 0x{:08X} id {}",
                    action.name(),
                    u32::from(e),
                    node.raw(),
                    id.mask(),
                    id.0
                );
                first_err(&mut result, Err(e));
            }
        }
        result
    }

    fn validate(
        &self,
        idx: usize,
        id: ErrorId,
        action: ErrorAction,
        has_handler: bool,
    ) -> PmcResult<()> {
        let bank = self.bank(idx);
        if action.is_software() && !bank.can_dispatch_software() {
            return Err(PmcError::EAM_INVALID_HANDLER);
        }
        if action == ErrorAction::Custom && !has_handler {
            return Err(PmcError::EAM_INVALID_HANDLER);
        }
        if action == ErrorAction::Invalid {
            return Err(PmcError::EAM_INVALID_ACTION);
        }
        if bank.valid_bits & id.mask() == 0 {
            return Err(PmcError::EAM_INVALID_ERROR_ID);
        }
        self.registry.get_descriptor(id)?;
        restrict::allow(self.platform, &self.secondary_ready, idx, id.mask(), action)?;
        if route(bank, action) == Route::Software && !bank.can_dispatch_software() {
            return Err(PmcError::EAM_INVALID_ERROR_TYPE);
        }
        Ok(())
    }

    /// Disable, clear, record and arm one error. No policy checks; boot
    /// uses this directly to install the table defaults.
    pub(crate) fn install(
        &mut self,
        idx: usize,
        id: ErrorId,
        action: ErrorAction,
        handler: Option<HandlerRef<'a>>,
        subsystem_id: u32,
    ) -> PmcResult<()> {
        let bank = self.bank(idx);
        let mut result = self.disable_routes(idx, id.mask());
        first_err(&mut result, self.clear_error(id));

        let route = route(bank, action);
        let handler = match route {
            Route::Software if action.is_hardware() => builtin(bank, action),
            Route::Software => handler.or_else(|| builtin(bank, action)),
            _ => handler,
        };
        self.registry.set_descriptor(id, action, handler, subsystem_id)?;

        first_err(&mut result, self.arm(idx, id.mask(), route));
        result
    }

    pub(crate) fn arm(&mut self, idx: usize, mask: u32, route: Route) -> PmcResult<()> {
        let bank = self.bank(idx);
        match route {
            Route::Hardware(reg) => bank.enable(&mut *self.bus, reg, mask),
            Route::Software if !bank.is_software() => {
                bank.enable(&mut *self.bus, ActionReg::Irq, mask)
            }
            _ => Ok(()),
        }
    }

    /// Mask every route of `mask`. The software bank has no routes.
    pub(crate) fn disable_routes(&mut self, idx: usize, mask: u32) -> PmcResult<()> {
        let bank = self.bank(idx);
        if bank.is_software() {
            return Ok(());
        }
        bank.disable_all(&mut *self.bus, mask)
    }

    /// Clear status without touching error-out accounting.
    pub(crate) fn clear_status(&mut self, idx: usize, mask: u32) {
        let bank = self.bank(idx);
        if bank.is_software() {
            self.sw_status[idx] &= !mask;
        } else {
            bank.clear_status(&mut *self.bus, mask);
        }
    }

    fn check_mask(&self, node: ErrorNodeId, mask: u32) -> PmcResult<usize> {
        let idx = node.decode(self.platform.banks)?;
        if mask & !self.bank(idx).valid_bits != 0 {
            return Err(PmcError::EAM_INVALID_ERROR_ID);
        }
        Ok(idx)
    }

    /// Mask every route of the errors in `mask`, leaving their descriptors.
    pub fn disable_action(&mut self, node: ErrorNodeId, mask: u32) -> PmcResult<()> {
        let idx = self.check_mask(node, mask)?;
        self.disable_routes(idx, mask)
    }

    /// Re-arm the installed action of every error in `mask`.
    pub fn enable_action(&mut self, node: ErrorNodeId, mask: u32) -> PmcResult<()> {
        let idx = self.check_mask(node, mask)?;
        let bank = self.bank(idx);
        if bank.is_software() {
            return Ok(());
        }
        let mut result = Ok(());
        for bit in SetBits(mask) {
            let id = ErrorId::new(idx, bit);
            let action = match self.registry.get_descriptor(id) {
                Ok(desc) => desc.action,
                Err(e) => {
                    first_err(&mut result, Err(e));
                    continue;
                }
            };
            first_err(&mut result, self.arm(idx, id.mask(), route(bank, action)));
        }
        result
    }

    /// Hand the errors in `mask` to `subsystem_id` without touching their
    /// actions or routes. Reserved bits are skipped.
    pub fn update_subsystem_id(
        &mut self,
        node: ErrorNodeId,
        mask: u32,
        subsystem_id: u32,
    ) -> PmcResult<()> {
        let idx = self.check_mask(node, mask)?;
        for bit in SetBits(mask) {
            let id = ErrorId::new(idx, bit);
            if self.registry.set_subsystem_id(id, subsystem_id).is_err() {
                cprintln!(
                    "EAM: reserved id {} keeps no subsystem, node 0x{:08X} mask 0x{:08X}",
                    id.0,
                    node.raw(),
                    id.mask()
                );
            }
        }
        Ok(())
    }

    /// Clear the status of `id` and acknowledge any error-out it holds.
    ///
    /// The error-out line itself stays set while other sources are
    /// outstanding.
    pub fn clear_error(&mut self, id: ErrorId) -> PmcResult<()> {
        self.registry.get_descriptor(id)?;
        if !self.holds_error_out_line(id) {
            self.clear_status(id.bank(), id.mask());
        }
        self.acknowledge_error_out(id);
        Ok(())
    }
}
