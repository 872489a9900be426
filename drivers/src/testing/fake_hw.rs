/*++

Licensed under the Apache-2.0 license.

File Name:

    fake_hw.rs

Abstract:

    File contains a register file model of the error banks, implementing
    the RegisterBus trait for host tests.

--*/
use crate::bank::BankDescriptor;
use crate::bus::{RegAddr, RegData, RegisterBus};
use crate::testing::Log;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

#[derive(Clone, Copy, Default)]
struct MaskState {
    value: u32,
    stuck_masked: u32,
    stuck_unmasked: u32,
}

impl MaskState {
    fn settle(&mut self) {
        self.value = (self.value | self.stuck_masked) & !self.stuck_unmasked;
    }
}

enum Kind {
    Mask(RegAddr),
    En(RegAddr),
    Dis(RegAddr),
    Status,
    Trigger(RegAddr),
}

#[derive(Default)]
struct Regs {
    kinds: HashMap<RegAddr, Kind>,
    masks: HashMap<RegAddr, MaskState>,
    ram: HashMap<RegAddr, RegData>,
}

/// Behavioral model of a bank register file:
///
/// * mask registers reset to all-masked, and only change through EN/DIS
/// * status registers are write-1-to-clear
/// * trigger registers set the matching status bits
/// * every other address is plain RAM reading 0 until written
///
/// Clones share state, so tests keep a handle for stimulus and inspection
/// while the code under test owns another clone as its bus.
#[derive(Clone)]
pub struct FakeEamHw {
    regs: Rc<RefCell<Regs>>,
    pub log: Log,
}

impl FakeEamHw {
    pub fn new(banks: &[BankDescriptor]) -> Self {
        let mut regs = Regs::default();
        for bank in banks {
            if let Some(status) = bank.status {
                regs.kinds.insert(status, Kind::Status);
                if let Some(trigger) = bank.trigger {
                    regs.kinds.insert(trigger, Kind::Trigger(status));
                }
            }
            for m in [bank.err_out, bank.por, bank.srst, bank.irq]
                .into_iter()
                .flatten()
            {
                regs.kinds.insert(m.mask(), Kind::Mask(m.mask()));
                regs.kinds.insert(m.en(), Kind::En(m.mask()));
                regs.kinds.insert(m.dis(), Kind::Dis(m.mask()));
                regs.masks.insert(
                    m.mask(),
                    MaskState {
                        value: u32::MAX,
                        ..Default::default()
                    },
                );
            }
        }
        Self {
            regs: Rc::new(RefCell::new(regs)),
            log: Log::new(),
        }
    }

    /// Hardware detected errors: set status bits directly.
    pub fn set_status(&self, status: RegAddr, bits: u32) {
        *self.regs.borrow_mut().ram.entry(status).or_default() |= bits;
    }

    /// Set a plain register without going through the bus.
    pub fn poke(&self, addr: RegAddr, val: RegData) {
        self.regs.borrow_mut().ram.insert(addr, val);
    }

    pub fn peek(&self, addr: RegAddr) -> RegData {
        self.read(addr)
    }

    /// Force `bits` of a mask register to read as masked.
    pub fn stick_masked(&self, mask: RegAddr, bits: u32) {
        let mut regs = self.regs.borrow_mut();
        let state = regs.masks.entry(mask).or_default();
        state.stuck_masked |= bits;
        state.settle();
    }

    /// Force `bits` of a mask register to read as unmasked.
    pub fn stick_unmasked(&self, mask: RegAddr, bits: u32) {
        let mut regs = self.regs.borrow_mut();
        let state = regs.masks.entry(mask).or_default();
        state.stuck_unmasked |= bits;
        state.settle();
    }
}

impl RegisterBus for FakeEamHw {
    fn read(&self, addr: RegAddr) -> RegData {
        let regs = self.regs.borrow();
        match regs.kinds.get(&addr) {
            Some(Kind::Mask(base)) => regs.masks.get(base).map_or(u32::MAX, |m| m.value),
            Some(Kind::En(_)) | Some(Kind::Dis(_)) | Some(Kind::Trigger(_)) => 0,
            Some(Kind::Status) | None => regs.ram.get(&addr).copied().unwrap_or(0),
        }
    }

    fn write(&mut self, addr: RegAddr, val: RegData) {
        self.log.record(addr, val);
        let mut regs = self.regs.borrow_mut();
        let regs = &mut *regs;
        match regs.kinds.get(&addr) {
            Some(Kind::Mask(_)) => {}
            Some(Kind::En(base)) => {
                let state = regs.masks.entry(*base).or_default();
                state.value &= !val;
                state.settle();
            }
            Some(Kind::Dis(base)) => {
                let state = regs.masks.entry(*base).or_default();
                state.value |= val;
                state.settle();
            }
            Some(Kind::Status) => {
                *regs.ram.entry(addr).or_default() &= !val;
            }
            Some(Kind::Trigger(status)) => {
                *regs.ram.entry(*status).or_default() |= val;
            }
            None => {
                regs.ram.insert(addr, val);
            }
        }
    }
}
