/*++

Licensed under the Apache-2.0 license.

File Name:

    bank.rs

Abstract:

    File contains the error bank register model: a 32-bit status register
    plus one masked-enable register set per escalation route.

--*/

use crate::bus::{RegAddr, RegisterBus};
use pmc_error::{PmcError, PmcResult};

/// Number of error sources in one bank
pub const BITS_PER_BANK: u32 = 32;

/// Largest bank table any platform may declare
pub const MAX_BANKS: usize = 8;

/// Controller owning a bank
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BankGroup {
    /// Banks of the boot/management controller itself
    Primary,

    /// Banks of a secondary controller, reached through an aggregate bit
    Secondary,

    /// RAM-backed bank for errors raised by firmware
    Software,
}

impl BankGroup {
    pub const fn code(self) -> u32 {
        match self {
            Self::Primary => 1,
            Self::Secondary => 2,
            Self::Software => 3,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Primary),
            2 => Some(Self::Secondary),
            3 => Some(Self::Software),
            _ => None,
        }
    }
}

/// Escalation route of a bank
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionReg {
    ErrOut,
    Por,
    Irq,
    Srst,
}

impl ActionReg {
    pub const ALL: [ActionReg; 4] = [Self::ErrOut, Self::Por, Self::Irq, Self::Srst];
}

/// Masked-enable register set. Reading `mask` gives 1 for every disabled
/// source; writing 1 to `en` unmasks and writing 1 to `dis` masks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MaskReg(pub RegAddr);

impl MaskReg {
    pub const EN_OFFSET: u32 = 0x4;
    pub const DIS_OFFSET: u32 = 0x8;

    pub const fn mask(&self) -> RegAddr {
        self.0
    }

    pub const fn en(&self) -> RegAddr {
        self.0 + Self::EN_OFFSET
    }

    pub const fn dis(&self) -> RegAddr {
        self.0 + Self::DIS_OFFSET
    }
}

/// Static description of one error bank.
#[derive(Clone, Copy, Debug)]
pub struct BankDescriptor {
    pub name: &'static str,
    pub group: BankGroup,

    /// Write-1-to-clear status register. `None` for the software bank.
    pub status: Option<RegAddr>,

    /// Writing a bit here sets the same bit in `status`.
    pub trigger: Option<RegAddr>,

    pub err_out: Option<MaskReg>,
    pub por: Option<MaskReg>,
    pub srst: Option<MaskReg>,
    pub irq: Option<MaskReg>,

    /// Bits that name real error sources
    pub valid_bits: u32,

    /// Flat error id of the aggregate bit summarizing this bank.
    pub parent: Option<u32>,
}

impl BankDescriptor {
    pub const fn hardware(name: &'static str, group: BankGroup, status: RegAddr) -> Self {
        Self {
            name,
            group,
            status: Some(status),
            trigger: None,
            err_out: None,
            por: None,
            srst: None,
            irq: None,
            valid_bits: u32::MAX,
            parent: None,
        }
    }

    pub const fn software(name: &'static str) -> Self {
        Self {
            name,
            group: BankGroup::Software,
            status: None,
            trigger: None,
            err_out: None,
            por: None,
            srst: None,
            irq: None,
            valid_bits: u32::MAX,
            parent: None,
        }
    }

    pub const fn with_trigger(mut self, trigger: RegAddr) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub const fn with_err_out(mut self, mask: RegAddr) -> Self {
        self.err_out = Some(MaskReg(mask));
        self
    }

    pub const fn with_por(mut self, mask: RegAddr) -> Self {
        self.por = Some(MaskReg(mask));
        self
    }

    pub const fn with_srst(mut self, mask: RegAddr) -> Self {
        self.srst = Some(MaskReg(mask));
        self
    }

    pub const fn with_irq(mut self, mask: RegAddr) -> Self {
        self.irq = Some(MaskReg(mask));
        self
    }

    pub const fn with_valid_bits(mut self, valid_bits: u32) -> Self {
        self.valid_bits = valid_bits;
        self
    }

    pub const fn with_parent(mut self, parent: u32) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn route(&self, reg: ActionReg) -> Option<MaskReg> {
        match reg {
            ActionReg::ErrOut => self.err_out,
            ActionReg::Por => self.por,
            ActionReg::Irq => self.irq,
            ActionReg::Srst => self.srst,
        }
    }

    pub fn is_software(&self) -> bool {
        self.group == BankGroup::Software
    }

    /// Whether a software handler can be reached for errors of this bank.
    pub fn can_dispatch_software(&self) -> bool {
        self.is_software() || self.irq.is_some()
    }

    /// Raw status. The software bank has no status register and reads 0.
    pub fn read_status<B: RegisterBus + ?Sized>(&self, bus: &B) -> u32 {
        self.status.map_or(0, |addr| bus.read(addr) & self.valid_bits)
    }

    pub fn clear_status<B: RegisterBus + ?Sized>(&self, bus: &mut B, mask: u32) {
        if let Some(addr) = self.status {
            bus.write(addr, mask);
        }
    }

    /// Set status bits through the trigger register. Returns false when the
    /// bank has no trigger register.
    pub fn raise<B: RegisterBus + ?Sized>(&self, bus: &mut B, mask: u32) -> bool {
        match self.trigger {
            Some(addr) => {
                bus.write(addr, mask);
                true
            }
            None => false,
        }
    }

    /// Bits currently unmasked on `reg`.
    pub fn armed<B: RegisterBus + ?Sized>(&self, bus: &B, reg: ActionReg) -> u32 {
        self.route(reg)
            .map_or(0, |m| !bus.read(m.mask()) & self.valid_bits)
    }

    /// Mask `mask` on `reg` and verify the read-back.
    pub fn disable<B: RegisterBus + ?Sized>(
        &self,
        bus: &mut B,
        reg: ActionReg,
        mask: u32,
    ) -> PmcResult<()> {
        let Some(m) = self.route(reg) else {
            return Ok(());
        };
        bus.write(m.dis(), mask);
        if bus.read(m.mask()) & mask != mask {
            return Err(PmcError::EAM_ACTION_NOT_DISABLED);
        }
        Ok(())
    }

    /// Unmask `mask` on `reg` and verify the read-back.
    pub fn enable<B: RegisterBus + ?Sized>(
        &self,
        bus: &mut B,
        reg: ActionReg,
        mask: u32,
    ) -> PmcResult<()> {
        let Some(m) = self.route(reg) else {
            return Err(PmcError::EAM_INVALID_ERROR_TYPE);
        };
        bus.write(m.en(), mask);
        if bus.read(m.mask()) & mask != 0 {
            return Err(PmcError::EAM_ACTION_NOT_ENABLED);
        }
        Ok(())
    }

    /// Mask `mask` on every route. All routes are attempted; the first
    /// failure is returned.
    pub fn disable_all<B: RegisterBus + ?Sized>(&self, bus: &mut B, mask: u32) -> PmcResult<()> {
        let mut result = Ok(());
        for reg in ActionReg::ALL {
            if let Err(e) = self.disable(bus, reg, mask) {
                result = result.and(Err(e));
            }
        }
        result
    }
}
