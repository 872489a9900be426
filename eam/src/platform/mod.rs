/*++

Licensed under the Apache-2.0 license.

File Name:

    mod.rs

Abstract:

    File contains the per-platform configuration consumed by the error
    management core: bank geometry, default error table, restriction rules
    and the addresses of the blocks the core drives.

--*/

pub mod gen1;
pub mod gen2;

use crate::action::ErrorAction;
use crate::node::ErrorId;
use pmc_drivers::{
    BankDescriptor, BankGroup, ErrorIrq, RegAddr, ResetCtrl, BITS_PER_BANK, MAX_BANKS,
};
use pmc_error::{PmcError, PmcResult};

/// Default binding of one error id.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ErrorEntry {
    pub action: ErrorAction,
    pub subsystem_id: u32,
}

impl ErrorEntry {
    pub const RESERVED: Self = Self::new(ErrorAction::Invalid);
    pub const NONE: Self = Self::new(ErrorAction::None);

    pub const fn new(action: ErrorAction) -> Self {
        Self {
            action,
            subsystem_id: 0,
        }
    }

    pub const fn for_subsystem(action: ErrorAction, subsystem_id: u32) -> Self {
        Self {
            action,
            subsystem_id,
        }
    }
}

/// Configuration restriction on one error id.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rule {
    /// Only hardware actions or `None`
    HardwareOnly(ErrorId),

    /// Bound to exactly this action
    Fixed(ErrorId, ErrorAction),

    /// Never reconfigurable
    Locked(ErrorId),
}

#[derive(Clone, Copy, Debug)]
pub struct TamperLayout {
    /// Primary bank bit raised by the tamper detector
    pub source: ErrorId,

    /// Configured response word
    pub response: RegAddr,

    pub boundary_response: RegAddr,
    pub boundary_trigger: RegAddr,
    pub boundary_trigger_mask: u32,

    pub clock_divisor: RegAddr,
    pub clock_divisor_lockdown: u32,

    pub recovery_procedure: u32,

    /// Polls of the peer handshake before lockdown goes on alone
    pub handshake_polls: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct Layout {
    /// Primary bank bit driving the fatal error-out line
    pub error_out_line: ErrorId,

    pub fw_err: RegAddr,
    pub scratch: RegAddr,
    pub irq: ErrorIrq,
    pub reset: ResetCtrl,

    pub halt_boot_fuse: RegAddr,
    pub halt_boot_mask: u32,

    pub over_temp_wait_ms: u32,

    pub boot_mode: RegAddr,
    pub boot_mode_mask: u32,

    /// Incremented so the boot ROM tries the next image
    pub multi_boot: RegAddr,

    /// Primary bank bit raised to hand a failed boot back to the boot ROM
    pub fallback_error: ErrorId,

    /// Sysmon clock select, moved to the internal oscillator before a
    /// firmware-driven reset
    pub sysmon_clk: RegAddr,
    pub sysmon_clk_srcsel_mask: u32,

    pub tamper: TamperLayout,
}

pub struct Platform {
    pub name: &'static str,
    pub banks: &'static [BankDescriptor],

    /// One entry per error id, `banks.len() * 32` long
    pub errors: &'static [ErrorEntry],

    pub rules: &'static [Rule],
    pub layout: Layout,
}

impl Platform {
    /// Whether `id` summarizes one or more secondary banks.
    pub fn is_aggregate(&self, id: ErrorId) -> bool {
        self.banks.iter().any(|b| b.parent == Some(id.0))
    }

    fn bank_of(&self, id: ErrorId) -> Option<&BankDescriptor> {
        self.banks.get(id.bank())
    }

    pub fn validate(&self) -> PmcResult<()> {
        let bad = PmcError::EAM_INVALID_PLATFORM_TABLE;

        if self.banks.is_empty()
            || self.banks.len() > MAX_BANKS
            || self.errors.len() != self.banks.len() * BITS_PER_BANK as usize
        {
            return Err(bad);
        }

        for (idx, bank) in self.banks.iter().enumerate() {
            let has_parent = bank.parent.is_some();
            if (bank.group == BankGroup::Secondary) != has_parent {
                return Err(bad);
            }
            if let Some(parent) = bank.parent {
                let parent = ErrorId(parent);
                match self.bank_of(parent) {
                    Some(p) if p.group == BankGroup::Primary && p.irq.is_some() => {}
                    _ => return Err(bad),
                }
                if self.errors[parent.index()].action != ErrorAction::Custom {
                    return Err(bad);
                }
            }
            for bit in 0..BITS_PER_BANK {
                let id = ErrorId::new(idx, bit);
                let entry = self.errors[id.index()];
                if bank.valid_bits & id.mask() == 0 && entry.action != ErrorAction::Invalid {
                    return Err(bad);
                }
                // A default custom action has no caller to supply a handler.
                if entry.action == ErrorAction::Custom && !self.is_aggregate(id) {
                    return Err(bad);
                }
            }
        }

        let ids = self.rules.iter().map(|r| match r {
            Rule::HardwareOnly(id) | Rule::Fixed(id, _) | Rule::Locked(id) => *id,
        });
        let layout = &self.layout;
        for id in ids.chain([layout.error_out_line, layout.tamper.source, layout.fallback_error]) {
            if id.index() >= self.errors.len() || self.errors[id.index()].action == ErrorAction::Invalid {
                return Err(bad);
            }
        }

        let raisable = |id: ErrorId| {
            self.bank_of(id)
                .is_some_and(|b| b.group == BankGroup::Primary && b.trigger.is_some())
        };
        let tamper_primary = self
            .bank_of(layout.tamper.source)
            .is_some_and(|b| b.group == BankGroup::Primary);
        if raisable(layout.error_out_line) && raisable(layout.fallback_error) && tamper_primary {
            Ok(())
        } else {
            Err(bad)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_platforms_are_valid() {
        assert_eq!(gen1::GEN1.validate(), Ok(()));
        assert_eq!(gen2::GEN2.validate(), Ok(()));
    }

    #[test]
    fn test_aggregate_lookup() {
        assert!(gen1::GEN1.is_aggregate(gen1::PSM_AGGREGATE));
        assert!(!gen1::GEN1.is_aggregate(gen1::PMC_WDT));
        assert!(gen2::GEN2.is_aggregate(gen2::LPD_AGGREGATE));
    }

    #[test]
    fn test_rejects_short_table() {
        let broken = Platform {
            name: "broken",
            banks: gen1::GEN1.banks,
            errors: &gen1::GEN1.errors[..32],
            rules: &[],
            layout: gen1::GEN1.layout,
        };
        assert_eq!(broken.validate(), Err(PmcError::EAM_INVALID_PLATFORM_TABLE));
    }

    #[test]
    fn test_rejects_orphan_secondary() {
        static BANKS: [BankDescriptor; 2] = [
            BankDescriptor::hardware("P", BankGroup::Primary, 0x100).with_trigger(0x104),
            BankDescriptor::hardware("S", BankGroup::Secondary, 0x200),
        ];
        static ERRORS: [ErrorEntry; 64] = [ErrorEntry::NONE; 64];
        let broken = Platform {
            name: "orphan",
            banks: &BANKS,
            errors: &ERRORS,
            rules: &[],
            layout: Layout {
                error_out_line: ErrorId::new(0, 0),
                tamper: TamperLayout {
                    source: ErrorId::new(0, 1),
                    ..gen1::GEN1.layout.tamper
                },
                ..gen1::GEN1.layout
            },
        };
        assert_eq!(broken.validate(), Err(PmcError::EAM_INVALID_PLATFORM_TABLE));
    }

    #[test]
    fn test_rejects_fallback_without_trigger() {
        let broken = Platform {
            name: "no-fallback",
            layout: Layout {
                fallback_error: ErrorId::new(gen1::PSM_ERR1_BANK, 0),
                ..gen1::GEN1.layout
            },
            ..gen1::GEN1
        };
        assert_eq!(broken.validate(), Err(PmcError::EAM_INVALID_PLATFORM_TABLE));
    }
}
