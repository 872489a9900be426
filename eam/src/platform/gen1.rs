/*++

Licensed under the Apache-2.0 license.

File Name:

    gen1.rs

Abstract:

    File contains the first generation platform: three primary banks, two
    secondary banks behind one aggregate bit, and the software bank.

--*/

use super::{ErrorEntry, Layout, Platform, Rule, TamperLayout};
use crate::action::ErrorAction;
use crate::node::{ErrorId, ErrorNodeId};
use pmc_drivers::memory_layout::*;
use pmc_drivers::{BankDescriptor, BankGroup, ErrorIrq, ResetCtrl};

pub const PMC_ERR1_BANK: usize = 0;
pub const PMC_ERR2_BANK: usize = 1;
pub const PMC_ERR3_BANK: usize = 2;
pub const PSM_ERR1_BANK: usize = 3;
pub const PSM_ERR2_BANK: usize = 4;
pub const SW_ERR_BANK: usize = 5;

pub const PMC_ERR1: ErrorNodeId = ErrorNodeId::new(BankGroup::Primary, PMC_ERR1_BANK);
pub const PMC_ERR2: ErrorNodeId = ErrorNodeId::new(BankGroup::Primary, PMC_ERR2_BANK);
pub const PMC_ERR3: ErrorNodeId = ErrorNodeId::new(BankGroup::Primary, PMC_ERR3_BANK);
pub const PSM_ERR1: ErrorNodeId = ErrorNodeId::new(BankGroup::Secondary, PSM_ERR1_BANK);
pub const PSM_ERR2: ErrorNodeId = ErrorNodeId::new(BankGroup::Secondary, PSM_ERR2_BANK);
pub const SW_ERR: ErrorNodeId = ErrorNodeId::new(BankGroup::Software, SW_ERR_BANK);

// PMC_ERR1
pub const PMC_WDT: ErrorId = ErrorId::new(PMC_ERR1_BANK, 0);
pub const BOOT_CR: ErrorId = ErrorId::new(PMC_ERR1_BANK, 1);
pub const BOOT_NCR: ErrorId = ErrorId::new(PMC_ERR1_BANK, 2);
pub const FW_CR: ErrorId = ErrorId::new(PMC_ERR1_BANK, 3);
pub const FW_NCR: ErrorId = ErrorId::new(PMC_ERR1_BANK, 4);
pub const GSW_CR: ErrorId = ErrorId::new(PMC_ERR1_BANK, 5);
pub const GSW_NCR: ErrorId = ErrorId::new(PMC_ERR1_BANK, 6);
pub const CFU: ErrorId = ErrorId::new(PMC_ERR1_BANK, 7);
pub const CFRAME: ErrorId = ErrorId::new(PMC_ERR1_BANK, 8);
pub const TAMPER: ErrorId = ErrorId::new(PMC_ERR1_BANK, 16);
pub const PMC_ERR1_RESERVED: ErrorId = ErrorId::new(PMC_ERR1_BANK, 24);

// PMC_ERR3: catastrophic triad and the secondary aggregate
pub const TRIAD_SRST: ErrorId = ErrorId::new(PMC_ERR3_BANK, 0);
pub const TRIAD_POR: ErrorId = ErrorId::new(PMC_ERR3_BANK, 1);
pub const TRIAD_ERR_OUT: ErrorId = ErrorId::new(PMC_ERR3_BANK, 2);
pub const PSM_AGGREGATE: ErrorId = ErrorId::new(PMC_ERR3_BANK, 3);

// SW_ERR
pub const HB_MON_0: ErrorId = ErrorId::new(SW_ERR_BANK, 0);
pub const HB_MON_1: ErrorId = ErrorId::new(SW_ERR_BANK, 1);
pub const PLM_EXCEPTION: ErrorId = ErrorId::new(SW_ERR_BANK, 2);

/// Subsystem owning the PSM banks
pub const SUBSYS_PSM: u32 = 0x1C00_0003;

const BANKS: [BankDescriptor; 6] = [
    BankDescriptor::hardware("PMC_ERR1", BankGroup::Primary, PMC_ERR1_STATUS)
        .with_trigger(PMC_ERR1_TRIG)
        .with_err_out(PMC_ERR_OUT1_MASK)
        .with_por(PMC_POR1_MASK)
        .with_irq(PMC_IRQ1_MASK)
        .with_srst(PMC_SRST1_MASK)
        .with_valid_bits(0x00FF_FFFF),
    BankDescriptor::hardware("PMC_ERR2", BankGroup::Primary, PMC_ERR2_STATUS)
        .with_trigger(PMC_ERR2_TRIG)
        .with_err_out(PMC_ERR_OUT2_MASK)
        .with_por(PMC_POR2_MASK)
        .with_irq(PMC_IRQ2_MASK)
        .with_srst(PMC_SRST2_MASK)
        .with_valid_bits(0x0FFF_DFFF),
    BankDescriptor::hardware("PMC_ERR3", BankGroup::Primary, PMC_ERR3_STATUS)
        .with_trigger(PMC_ERR3_TRIG)
        .with_err_out(PMC_ERR_OUT3_MASK)
        .with_por(PMC_POR3_MASK)
        .with_irq(PMC_IRQ3_MASK)
        .with_srst(PMC_SRST3_MASK)
        .with_valid_bits(0x0000_00FF),
    BankDescriptor::hardware("PSM_ERR1", BankGroup::Secondary, PSM_ERR1_STATUS)
        .with_irq(PSM_IRQ1_MASK)
        .with_parent(PSM_AGGREGATE.0),
    BankDescriptor::hardware("PSM_ERR2", BankGroup::Secondary, PSM_ERR2_STATUS)
        .with_irq(PSM_IRQ2_MASK)
        .with_valid_bits(0x0000_FFFF)
        .with_parent(PSM_AGGREGATE.0),
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

    table[PMC_WDT.index()] = ErrorEntry::new(ErrorAction::SoftReset);
    table[BOOT_CR.index()] = ErrorEntry::new(ErrorAction::ErrorOut);
    table[BOOT_NCR.index()] = ErrorEntry::new(ErrorAction::PrintToLog);
    table[FW_CR.index()] = ErrorEntry::new(ErrorAction::ErrorOut);
    table[FW_NCR.index()] = ErrorEntry::new(ErrorAction::PrintToLog);
    table[GSW_CR.index()] = ErrorEntry::new(ErrorAction::ErrorOut);
    table[TAMPER.index()] = ErrorEntry::new(ErrorAction::SecureLockdown);

    table[TRIAD_SRST.index()] = ErrorEntry::new(ErrorAction::SoftReset);
    table[TRIAD_POR.index()] = ErrorEntry::new(ErrorAction::PowerOnReset);
    table[TRIAD_ERR_OUT.index()] = ErrorEntry::new(ErrorAction::ErrorOut);
    table[PSM_AGGREGATE.index()] = ErrorEntry::for_subsystem(ErrorAction::Custom, SUBSYS_PSM);

    // PSM_ERR1 bit 0: PSM firmware correctable error
    table[ErrorId::new(PSM_ERR1_BANK, 0).index()] =
        ErrorEntry::for_subsystem(ErrorAction::PrintToLog, SUBSYS_PSM);
    table
}

static ERRORS: [ErrorEntry; ERROR_COUNT] = errors();

static RULES: [Rule; 5] = [
    Rule::HardwareOnly(PMC_WDT),
    Rule::Fixed(TRIAD_SRST, ErrorAction::SoftReset),
    Rule::Fixed(TRIAD_POR, ErrorAction::PowerOnReset),
    Rule::Fixed(TRIAD_ERR_OUT, ErrorAction::ErrorOut),
    Rule::Locked(PSM_AGGREGATE),
];

pub static GEN1: Platform = Platform {
    name: "gen1",
    banks: &BANKS,
    errors: &ERRORS,
    rules: &RULES,
    layout: Layout {
        error_out_line: FW_CR,
        fw_err: PMC_FW_ERR,
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
        over_temp_wait_ms: 1000,
        boot_mode: CRP_BOOT_MODE_USER,
        boot_mode_mask: CRP_BOOT_MODE_USER_MASK,
        multi_boot: PMC_MULTI_BOOT,
        fallback_error: FW_NCR,
        sysmon_clk: CRP_SYSMON_REF_CTRL,
        sysmon_clk_srcsel_mask: CRP_SYSMON_REF_CTRL_SRCSEL_MASK,
        tamper: TamperLayout {
            source: TAMPER,
            response: PMC_TAMPER_RESP,
            boundary_response: PMC_BOUNDARY_RESP,
            boundary_trigger: PMC_BOUNDARY_TRIG,
            boundary_trigger_mask: 0x1,
            clock_divisor: CRP_PMC_CLK_DIV,
            clock_divisor_lockdown: CRP_PMC_CLK_DIV_LOCKDOWN,
            recovery_procedure: 0x0001,
            handshake_polls: 100,
        },
    },
};
