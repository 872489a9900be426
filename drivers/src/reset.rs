/*++

Licensed under the Apache-2.0 license.

File Name:

    reset.rs

Abstract:

    File contains the system reset request API

--*/

use crate::bus::{RegAddr, RegisterBus};

/// Reset requested by firmware on behalf of an error action
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ResetKind {
    /// Power-on reset of the whole device
    PowerOn,

    /// System soft reset
    Soft,
}

/// Reset controller register and its request bits
#[derive(Debug, Copy, Clone)]
pub struct ResetCtrl {
    pub reg: RegAddr,
    pub por_mask: u32,
    pub srst_mask: u32,
}

impl ResetCtrl {
    /// Write the reset request. On hardware the device resets before the
    /// write returns; callers still follow up with a terminal wait.
    pub fn request<B: RegisterBus + ?Sized>(&self, bus: &mut B, kind: ResetKind) {
        let mask = match kind {
            ResetKind::PowerOn => self.por_mask,
            ResetKind::Soft => self.srst_mask,
        };
        bus.modify(self.reg, mask, mask);
    }
}
