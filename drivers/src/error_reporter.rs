/*++

Licensed under the Apache-2.0 license.

File Name:

    error_reporter.rs

Abstract:

    File contains API for reporting firmware errors through the platform
    firmware error register.

--*/
use crate::bus::{RegAddr, RegisterBus};
use crate::persistent::EamScratch;
use pmc_error::PmcError;

/// Report F/W error
///
/// # Arguments
///
/// * `reg` - Firmware error register.
/// * `err` - F/W error code.
pub fn report_fw_error<B: RegisterBus + ?Sized>(bus: &mut B, reg: RegAddr, err: PmcError) {
    bus.write(reg, err.into());
}

/// Get F/W error
pub fn get_fw_error<B: RegisterBus + ?Sized>(bus: &B, reg: RegAddr) -> u32 {
    bus.read(reg)
}

/// Clear F/W error
///
/// A non-zero value is saved in the scratch record before the register is
/// zeroed, so the previous boot's failure survives for inspection.
pub fn clear_fw_error<B: RegisterBus + ?Sized>(bus: &mut B, reg: RegAddr, scratch: RegAddr) {
    match get_fw_error(bus, reg) {
        0 => {}
        val => {
            EamScratch::store_fw_error(bus, scratch, val);
            bus.write(reg, 0);
        }
    }
}
