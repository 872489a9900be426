/*++

Licensed under the Apache-2.0 license.

File Name:

    gen2.rs

Abstract:

    File contains the second generation platform: two primary banks, the
    LPD secondary bank with its own soft reset route, and the software bank.

--*/

use super::{ErrorEntry, Layout, Platform, Rule, TamperLayout};
use crate::action::ErrorAction;
use crate::node::{ErrorId, ErrorNodeId};
use pmc_drivers::memory_layout::*;
use pmc_drivers::{BankDescriptor, BankGroup, ErrorIrq, ResetCtrl};

pub const PMC_ERR1_BANK: usize = 0;
pub const PMC_ERR2_BANK: usize = 1;
pub const LPD_ERR_BANK: usize = 2;
pub const SW_ERR_BANK: usize = 3;

pub const PMC_ERR1: ErrorNodeId = ErrorNodeId::new(BankGroup::Primary, PMC_ERR1_BANK);
pub const PMC_ERR2: ErrorNodeId = ErrorNodeId::new(BankGroup::Primary, PMC_ERR2_BANK);
pub const LPD_ERR: ErrorNodeId = ErrorNodeId::new(BankGroup::Secondary, LPD_ERR_BANK);
pub const SW_ERR: ErrorNodeId = ErrorNodeId::new(BankGroup::Software, SW_ERR_BANK);

pub const FW_CR: ErrorId = ErrorId::new(PMC_ERR1_BANK, 3);
pub const FW_NCR: ErrorId = ErrorId::new(PMC_ERR1_BANK, 4);
pub const PMX_WWDT: ErrorId = ErrorId::new(PMC_ERR1_BANK, 5);
pub const TAMPER: ErrorId = ErrorId::new(PMC_ERR1_BANK, 12);

pub const TRIAD_SRST: ErrorId = ErrorId::new(PMC_ERR2_BANK, 0);
pub const TRIAD_POR: ErrorId = ErrorId::new(PMC_ERR2_BANK, 1);
pub const TRIAD_ERR_OUT: ErrorId = ErrorId::new(PMC_ERR2_BANK, 2);
pub const LPD_AGGREGATE: ErrorId = ErrorId::new(PMC_ERR2_BANK, 3);

pub const LPD_SWDT: ErrorId = ErrorId::new(LPD_ERR_BANK, 0);

/// Subsystem owning the LPD bank
pub const SUBSYS_LPD: u32 = 0x1C00_0004;

const BANKS: [BankDescriptor; 4] = [
    BankDescriptor::hardware("PMC_ERR1", BankGroup::Primary, G2_PMC_ERR1_STATUS)
        .with_trigger(G2_PMC_ERR1_TRIG)
        .with_err_out(G2_PMC_ERR_OUT1_MASK)
        .with_por(G2_PMC_POR1_MASK)
        .with_irq(G2_PMC_IRQ1_MASK)
        .with_srst(G2_PMC_SRST1_MASK)
        .with_valid_bits(0x0000_FFFF),
    BankDescriptor::hardware("PMC_ERR2", BankGroup::Primary, G2_PMC_ERR2_STATUS)
        .with_trigger(G2_PMC_ERR2_TRIG)
        .with_err_out(G2_PMC_ERR_OUT2_MASK)
        .with_por(G2_PMC_POR2_MASK)
        .with_irq(G2_PMC_IRQ2_MASK)
        .with_srst(G2_PMC_SRST2_MASK)
        .with_valid_bits(0x0000_00FF),
    BankDescriptor::hardware("LPD_ERR", BankGroup::Secondary, LPD_ERR_STATUS)
        .with_irq(LPD_ERR_IRQ_MASK)
        .with_srst(LPD_ERR_SRST_MASK)
        .with_valid_bits(0x0000_FFFF)
        .with_parent(LPD_AGGREGATE.0),
    BankDescriptor::software("SW_ERR").with_valid_bits(0x0000_00FF),
];

const ERROR_COUNT: usize = BANKS.len() * 32;

const fn errors() -> [ErrorEntry; ERROR_COUNT] {
    let mut table = [ErrorEntry::NONE; ERROR_COUNT];
    let mut i = 0;
    while i < ERROR_COUNT {
        if BANKS[i / 32].valid_bits & (1 << (i % 32)) == 0 {
            table[i] = ErrorEntry::RESERVED;
        }
        i += 1;
    }

    table[FW_CR.index()] = ErrorEntry::new(ErrorAction::ErrorOut);
    table[FW_NCR.index()] = ErrorEntry::new(ErrorAction::PrintToLog);
    table[PMX_WWDT.index()] = ErrorEntry::new(ErrorAction::PowerOnReset);
    table[TAMPER.index()] = ErrorEntry::new(ErrorAction::SecureLockdownWithTriState);

    table[TRIAD_SRST.index()] = ErrorEntry::new(ErrorAction::SoftReset);
    table[TRIAD_POR.index()] = ErrorEntry::new(ErrorAction::PowerOnReset);
    table[TRIAD_ERR_OUT.index()] = ErrorEntry::new(ErrorAction::ErrorOut);
    table[LPD_AGGREGATE.index()] = ErrorEntry::for_subsystem(ErrorAction::Custom, SUBSYS_LPD);

    table[LPD_SWDT.index()] = ErrorEntry::for_subsystem(ErrorAction::SoftReset, SUBSYS_LPD);
    table
}

static ERRORS: [ErrorEntry; ERROR_COUNT] = errors();

static RULES: [Rule; 5] = [
    Rule::HardwareOnly(PMX_WWDT),
    Rule::Fixed(TRIAD_SRST, ErrorAction::SoftReset),
    Rule::Fixed(TRIAD_POR, ErrorAction::PowerOnReset),
    Rule::Fixed(TRIAD_ERR_OUT, ErrorAction::ErrorOut),
    Rule::Locked(LPD_AGGREGATE),
];

pub static GEN2: Platform = Platform {
    name: "gen2",
    banks: &BANKS,
    errors: &ERRORS,
    rules: &RULES,
    layout: Layout {
        error_out_line: FW_CR,
        fw_err: G2_PMC_FW_ERR,
        scratch: RTCA_EAM_SCRATCH,
        irq: ErrorIrq {
            enable: IOMODULE_IER,
            ack: IOMODULE_IAR,
            mask: IOMODULE_ERR_IRQ_MASK,
        },
        reset: ResetCtrl {
            reg: CRP_RST_PS,
            por_mask: CRP_RST_PS_POR_MASK,
            srst_mask: CRP_RST_PS_SRST_MASK,
        },
        halt_boot_fuse: EFUSE_CACHE_MISC_CTRL,
        halt_boot_mask: EFUSE_HALT_BOOT_ERROR_MASK,
        over_temp_wait_ms: 2000,
        boot_mode: CRP_BOOT_MODE_USER,
        boot_mode_mask: CRP_BOOT_MODE_USER_MASK,
        multi_boot: G2_PMC_MULTI_BOOT,
        fallback_error: FW_NCR,
        sysmon_clk: CRP_SYSMON_REF_CTRL,
        sysmon_clk_srcsel_mask: CRP_SYSMON_REF_CTRL_SRCSEL_MASK,
        tamper: TamperLayout {
            source: TAMPER,
            response: G2_PMC_TAMPER_RESP,
            boundary_response: G2_PMC_BOUNDARY_RESP,
            boundary_trigger: G2_PMC_BOUNDARY_TRIG,
            boundary_trigger_mask: 0x1,
            clock_divisor: CRP_PMC_CLK_DIV,
            clock_divisor_lockdown: CRP_PMC_CLK_DIV_LOCKDOWN,
            recovery_procedure: 0x0002,
            handshake_polls: 250,
        },
    },
};
