/*++
Licensed under the Apache-2.0 license.

File Name:

    memory_layout.rs

Abstract:

    The file contains the register and memory map used by the error
    management core. Each masked-enable block keeps EN at +0x4 and DIS at
    +0x8 from its MASK register.

--*/

//
// Gen1: PMC global error banks
//
pub const PMC_GLOBAL_BASE: u32 = 0xF111_0000;

/// Boot image index the boot ROM tries next
pub const PMC_MULTI_BOOT: u32 = PMC_GLOBAL_BASE + 0x0004;

pub const PMC_ERR1_STATUS: u32 = PMC_GLOBAL_BASE + 0x0530;
pub const PMC_ERR2_STATUS: u32 = PMC_GLOBAL_BASE + 0x0534;
pub const PMC_ERR3_STATUS: u32 = PMC_GLOBAL_BASE + 0x0538;

pub const PMC_ERR1_TRIG: u32 = PMC_GLOBAL_BASE + 0x0A20;
pub const PMC_ERR2_TRIG: u32 = PMC_GLOBAL_BASE + 0x0A24;
pub const PMC_ERR3_TRIG: u32 = PMC_GLOBAL_BASE + 0x0A28;

pub const PMC_ERR_OUT1_MASK: u32 = PMC_GLOBAL_BASE + 0x0540;
pub const PMC_ERR_OUT2_MASK: u32 = PMC_GLOBAL_BASE + 0x0550;
pub const PMC_ERR_OUT3_MASK: u32 = PMC_GLOBAL_BASE + 0x0560;
pub const PMC_POR1_MASK: u32 = PMC_GLOBAL_BASE + 0x0570;
pub const PMC_POR2_MASK: u32 = PMC_GLOBAL_BASE + 0x0580;
pub const PMC_POR3_MASK: u32 = PMC_GLOBAL_BASE + 0x0590;
pub const PMC_IRQ1_MASK: u32 = PMC_GLOBAL_BASE + 0x05A0;
pub const PMC_IRQ2_MASK: u32 = PMC_GLOBAL_BASE + 0x05B0;
pub const PMC_IRQ3_MASK: u32 = PMC_GLOBAL_BASE + 0x05C0;
pub const PMC_SRST1_MASK: u32 = PMC_GLOBAL_BASE + 0x05D0;
pub const PMC_SRST2_MASK: u32 = PMC_GLOBAL_BASE + 0x05E0;
pub const PMC_SRST3_MASK: u32 = PMC_GLOBAL_BASE + 0x05F0;

/// Configured tamper response, fused at provisioning
pub const PMC_TAMPER_RESP: u32 = PMC_GLOBAL_BASE + 0x0604;
/// Firmware error word visible to the platform
pub const PMC_FW_ERR: u32 = PMC_GLOBAL_BASE + 0x0610;
/// Boundary (boot ROM) lockdown response and trigger
pub const PMC_BOUNDARY_RESP: u32 = PMC_GLOBAL_BASE + 0x0620;
pub const PMC_BOUNDARY_TRIG: u32 = PMC_GLOBAL_BASE + 0x0624;

//
// Gen1: secondary (PSM) banks
//
pub const PSM_GLOBAL_BASE: u32 = 0xFFC9_0000;

pub const PSM_ERR1_STATUS: u32 = PSM_GLOBAL_BASE + 0x1000;
pub const PSM_ERR2_STATUS: u32 = PSM_GLOBAL_BASE + 0x1004;
pub const PSM_IRQ1_MASK: u32 = PSM_GLOBAL_BASE + 0x1010;
pub const PSM_IRQ2_MASK: u32 = PSM_GLOBAL_BASE + 0x1020;

//
// Gen2: primary banks are relocated and the secondary bank is LPD SLCR
//
pub const G2_PMC_BASE: u32 = 0xF112_0000;

pub const G2_PMC_MULTI_BOOT: u32 = G2_PMC_BASE + 0x0004;

pub const G2_PMC_ERR1_STATUS: u32 = G2_PMC_BASE + 0x0100;
pub const G2_PMC_ERR2_STATUS: u32 = G2_PMC_BASE + 0x0104;
pub const G2_PMC_ERR1_TRIG: u32 = G2_PMC_BASE + 0x0110;
pub const G2_PMC_ERR2_TRIG: u32 = G2_PMC_BASE + 0x0114;
pub const G2_PMC_ERR_OUT1_MASK: u32 = G2_PMC_BASE + 0x0200;
pub const G2_PMC_ERR_OUT2_MASK: u32 = G2_PMC_BASE + 0x0210;
pub const G2_PMC_POR1_MASK: u32 = G2_PMC_BASE + 0x0220;
pub const G2_PMC_POR2_MASK: u32 = G2_PMC_BASE + 0x0230;
pub const G2_PMC_IRQ1_MASK: u32 = G2_PMC_BASE + 0x0240;
pub const G2_PMC_IRQ2_MASK: u32 = G2_PMC_BASE + 0x0250;
pub const G2_PMC_SRST1_MASK: u32 = G2_PMC_BASE + 0x0260;
pub const G2_PMC_SRST2_MASK: u32 = G2_PMC_BASE + 0x0270;
pub const G2_PMC_TAMPER_RESP: u32 = G2_PMC_BASE + 0x0300;
pub const G2_PMC_FW_ERR: u32 = G2_PMC_BASE + 0x0304;
pub const G2_PMC_BOUNDARY_RESP: u32 = G2_PMC_BASE + 0x0310;
pub const G2_PMC_BOUNDARY_TRIG: u32 = G2_PMC_BASE + 0x0314;

pub const LPD_SLCR_BASE: u32 = 0xEB41_0000;

pub const LPD_ERR_STATUS: u32 = LPD_SLCR_BASE + 0x0040;
pub const LPD_ERR_IRQ_MASK: u32 = LPD_SLCR_BASE + 0x0050;
pub const LPD_ERR_SRST_MASK: u32 = LPD_SLCR_BASE + 0x0060;

//
// Shared blocks
//
pub const IOMODULE_BASE: u32 = 0xF028_0000;
/// Interrupt acknowledge, write 1 to clear a pending source
pub const IOMODULE_IAR: u32 = IOMODULE_BASE + 0x003C;
/// Interrupt enable
pub const IOMODULE_IER: u32 = IOMODULE_BASE + 0x0038;
/// Aggregate error interrupt line
pub const IOMODULE_ERR_IRQ_MASK: u32 = 1 << 16;

pub const CRP_BASE: u32 = 0xF126_0000;
pub const CRP_RST_PS: u32 = CRP_BASE + 0x0320;
pub const CRP_RST_PS_POR_MASK: u32 = 1 << 0;
pub const CRP_RST_PS_SRST_MASK: u32 = 1 << 1;
pub const CRP_PMC_CLK_DIV: u32 = CRP_BASE + 0x0104;
/// Divisor programmed while lockdown runs
pub const CRP_PMC_CLK_DIV_LOCKDOWN: u32 = 0x0000_00FF;
/// Sysmon reference clock; SRCSEL cleared selects the internal oscillator
pub const CRP_SYSMON_REF_CTRL: u32 = CRP_BASE + 0x0138;
pub const CRP_SYSMON_REF_CTRL_SRCSEL_MASK: u32 = 1 << 2;

pub const CRP_BOOT_MODE_USER: u32 = CRP_BASE + 0x0200;
pub const CRP_BOOT_MODE_USER_MASK: u32 = 0x0000_000F;
pub const BOOT_MODE_JTAG: u32 = 0x0;
pub const BOOT_MODE_QSPI32: u32 = 0x2;
pub const BOOT_MODE_USB: u32 = 0x7;
pub const BOOT_MODE_SMAP: u32 = 0xA;

pub const EFUSE_CACHE_BASE: u32 = 0xF125_0000;
pub const EFUSE_CACHE_MISC_CTRL: u32 = EFUSE_CACHE_BASE + 0x00A0;
pub const EFUSE_HALT_BOOT_ERROR_MASK: u32 = 0x0000_C000;

/// Persistent scratch (RTCA) record for post-mortem inspection
pub const RTCA_EAM_SCRATCH: u32 = 0xF201_4100;

#[cfg(feature = "emu")]
pub const UART_TX: u32 = 0xF000_0030;
