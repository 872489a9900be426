/*++

Licensed under the Apache-2.0 license.

File Name:

    handler.rs

Abstract:

    File contains the error handler interface and the built-in handlers
    behind every software-executed action.

--*/

use crate::action::ErrorAction;
use crate::manager::Eam;
use crate::node::{ErrorId, ErrorNodeId};
use crate::services::{SHUTDOWN_CMD_FLAGS, SHUTDOWN_SUBTYPE_SUBSYSTEM, SHUTDOWN_TYPE_SHUTDOWN};
use crate::tamper::{TamperMode, TamperResponse};
use pmc_drivers::{cprintln, BankDescriptor, ResetKind};
use pmc_error::PmcError;

/// Called from the error task with the node and the single-bit mask of the
/// error being serviced.
pub trait ErrorHandler {
    fn handle(&self, eam: &mut Eam<'_>, node: ErrorNodeId, mask: u32);
}

pub type HandlerRef<'a> = &'a dyn ErrorHandler;

/// Plain callbacks only see the node and mask.
impl<F: Fn(ErrorNodeId, u32)> ErrorHandler for F {
    fn handle(&self, _eam: &mut Eam<'_>, node: ErrorNodeId, mask: u32) {
        self(node, mask)
    }
}

pub struct PrintToLog;

impl ErrorHandler for PrintToLog {
    fn handle(&self, _eam: &mut Eam<'_>, node: ErrorNodeId, mask: u32) {
        let id = ErrorId::from_node(node, mask).map_or(u32::MAX, |id| id.0);
        cprintln!(
            "EAM: received error node 0x{:08X} mask 0x{:08X} id {}",
            node.raw(),
            mask,
            id
        );
    }
}

/// SubsystemShutdown and SubsystemRestart
pub struct SubsystemAction;

impl ErrorHandler for SubsystemAction {
    fn handle(&self, eam: &mut Eam<'_>, node: ErrorNodeId, mask: u32) {
        let Some(id) = ErrorId::from_node(node, mask) else {
            return;
        };
        let Ok(desc) = eam.registry().get_descriptor(id) else {
            return;
        };
        let (action, subsystem_id) = (desc.action, desc.subsystem_id);
        let services = eam.services();
        let status = match action {
            ErrorAction::SubsystemShutdown => services.subsystem_shutdown(
                subsystem_id,
                SHUTDOWN_TYPE_SHUTDOWN,
                SHUTDOWN_SUBTYPE_SUBSYSTEM,
                SHUTDOWN_CMD_FLAGS,
            ),
            ErrorAction::SubsystemRestart => services.subsystem_restart(subsystem_id),
            _ => return,
        };
        if status != 0 {
            cprintln!(
                "EAM: {} of subsystem 0x{:08X} failed ({}) node 0x{:08X} mask 0x{:08X} id {}",
                action.name(),
                subsystem_id,
                status,
                node.raw(),
                mask,
                id.0
            );
            eam.report_fw_error(PmcError::EAM_HANDLER_FAILED);
        }
    }
}

/// SecureLockdown and SecureLockdownWithTriState
pub struct Lockdown;

impl ErrorHandler for Lockdown {
    fn handle(&self, eam: &mut Eam<'_>, node: ErrorNodeId, mask: u32) {
        let Some(id) = ErrorId::from_node(node, mask) else {
            return;
        };
        let response = match eam.registry().get_descriptor(id).map(|d| d.action) {
            Ok(ErrorAction::SecureLockdownWithTriState) => TamperResponse::LOCKDOWN_1,
            _ => TamperResponse::LOCKDOWN_0,
        };
        cprintln!(
            "EAM: lockdown requested node 0x{:08X} mask 0x{:08X} id {}",
            node.raw(),
            mask,
            id.0
        );
        if let Err(e) = eam.trigger_tamper(response.bits(), TamperMode::Task) {
            eam.report_fw_error(e);
        }
    }
}

/// PowerOnReset and SoftReset on banks without a hardware reset route
pub struct SoftwareReset;

impl ErrorHandler for SoftwareReset {
    fn handle(&self, eam: &mut Eam<'_>, node: ErrorNodeId, mask: u32) {
        let Some(id) = ErrorId::from_node(node, mask) else {
            return;
        };
        let kind = match eam.registry().get_descriptor(id).map(|d| d.action) {
            Ok(ErrorAction::PowerOnReset) => ResetKind::PowerOn,
            Ok(ErrorAction::SoftReset) => ResetKind::Soft,
            _ => return,
        };
        cprintln!(
            "EAM: reset requested node 0x{:08X} mask 0x{:08X} id {}",
            node.raw(),
            mask,
            id.0
        );
        eam.system_reset(kind)
    }
}

/// ErrorOut on banks without a hardware error-out route
pub struct SoftwareErrorOut;

impl ErrorHandler for SoftwareErrorOut {
    fn handle(&self, eam: &mut Eam<'_>, node: ErrorNodeId, mask: u32) {
        if let Some(id) = ErrorId::from_node(node, mask) {
            eam.assert_error_out(id);
        }
    }
}

/// Handler installed for `action` on `bank` when the caller supplies none,
/// or when the action is a hardware action the bank can only carry out in
/// software.
pub(crate) fn builtin(bank: &BankDescriptor, action: ErrorAction) -> Option<HandlerRef<'static>> {
    match action {
        ErrorAction::PrintToLog => Some(&PrintToLog),
        ErrorAction::SubsystemShutdown | ErrorAction::SubsystemRestart => Some(&SubsystemAction),
        ErrorAction::SecureLockdown | ErrorAction::SecureLockdownWithTriState => Some(&Lockdown),
        ErrorAction::PowerOnReset | ErrorAction::SoftReset | ErrorAction::ErrorOut => {
            let routed = action.hw_route().and_then(|reg| bank.route(reg)).is_some();
            if routed && !bank.is_software() {
                None
            } else if action == ErrorAction::ErrorOut {
                Some(&SoftwareErrorOut)
            } else {
                Some(&SoftwareReset)
            }
        }
        ErrorAction::Custom | ErrorAction::None | ErrorAction::Invalid => None,
    }
}
