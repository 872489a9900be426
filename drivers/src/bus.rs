/*++

Licensed under the Apache-2.0 license.

File Name:

    bus.rs

Abstract:

    File contains the register access trait used by every error management
    driver, and its memory-mapped implementation.

--*/

/// Register address
pub type RegAddr = u32;

/// Register data
pub type RegData = u32;

/// 32-bit register access. Firmware uses [`Mmio`]; host tests plug in a
/// register file model.
pub trait RegisterBus {
    /// Read the word at `addr`.
    fn read(&self, addr: RegAddr) -> RegData;

    /// Write `val` to the word at `addr`.
    fn write(&mut self, addr: RegAddr, val: RegData);

    /// Read-modify-write: bits in `mask` take their value from `val`.
    fn modify(&mut self, addr: RegAddr, mask: RegData, val: RegData) {
        let cur = self.read(addr);
        self.write(addr, (cur & !mask) | (val & mask));
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    fn read(&self, addr: RegAddr) -> RegData {
        (**self).read(addr)
    }

    fn write(&mut self, addr: RegAddr, val: RegData) {
        (**self).write(addr, val)
    }
}

/// Volatile access to the physical register space.
pub struct Mmio {
    _priv: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Every address later passed to this bus must be a valid, word-aligned
    /// device register on the running platform.
    pub unsafe fn new() -> Self {
        Self { _priv: () }
    }
}

impl RegisterBus for Mmio {
    fn read(&self, addr: RegAddr) -> RegData {
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    fn write(&mut self, addr: RegAddr, val: RegData) {
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, val) }
    }
}
