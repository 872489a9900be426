/*++

Licensed under the Apache-2.0 license.

File Name:

    irq.rs

Abstract:

    File contains a driver for the aggregate error interrupt line of the
    interrupt controller.

--*/

use crate::bus::{RegAddr, RegisterBus};

/// One interrupt controller source: `enable` is a read-modify-write enable
/// register, `ack` clears a pending source by writing 1.
#[derive(Clone, Copy, Debug)]
pub struct ErrorIrq {
    pub enable: RegAddr,
    pub ack: RegAddr,
    pub mask: u32,
}

impl ErrorIrq {
    pub fn enable<B: RegisterBus + ?Sized>(&self, bus: &mut B) {
        bus.modify(self.enable, self.mask, self.mask);
    }

    pub fn disable<B: RegisterBus + ?Sized>(&self, bus: &mut B) {
        bus.modify(self.enable, self.mask, 0);
    }

    pub fn clear<B: RegisterBus + ?Sized>(&self, bus: &mut B) {
        bus.write(self.ack, self.mask);
    }

    pub fn is_enabled<B: RegisterBus + ?Sized>(&self, bus: &B) -> bool {
        bus.read(self.enable) & self.mask != 0
    }
}
