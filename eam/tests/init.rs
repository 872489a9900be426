// Licensed under the Apache-2.0 license

mod common;

use common::{booted, hw_for, Call, TestServices};
use pmc_drivers::memory_layout::*;
use pmc_drivers::persistent::EAM_SCRATCH_MARKER;
use pmc_drivers::EamScratch;
use pmc_eam::platform::gen1::{self, GEN1};
use pmc_eam::platform::gen2::GEN2;
use pmc_eam::{Eam, ErrorAction, ErrorId};
use pmc_error::PmcError;

#[test]
fn test_over_temperature_blocks_init() {
    let hw = hw_for(&GEN1);
    let mut bus = hw.clone();
    let services = TestServices::default();
    services.over_temp_clears.set(false);

    let mut eam = Eam::new(&GEN1, &mut bus, &services).unwrap();
    assert_eq!(eam.init(), Err(PmcError::DRIVER_OVER_TEMP_TIMEOUT));
    assert_eq!(services.calls(), vec![Call::OverTemp(1000)]);
    // Nothing was armed.
    assert_eq!(hw.peek(PMC_SRST1_MASK), u32::MAX);
}

#[test]
fn test_boot_snapshot_and_fw_error_saved() {
    let hw = hw_for(&GEN1);
    hw.set_status(PMC_ERR1_STATUS, 0b1_0010);
    hw.set_status(PMC_ERR3_STATUS, 0b100);
    hw.poke(PMC_FW_ERR, 0x0001_0003);
    let mut bus = hw.clone();
    let services = TestServices::default();
    let _eam = booted(&GEN1, &mut bus, &services);

    assert_eq!(hw.peek(PMC_ERR1_STATUS), 0);
    assert_eq!(hw.peek(PMC_ERR3_STATUS), 0);
    assert_eq!(hw.peek(PMC_FW_ERR), 0);

    let scratch = EamScratch::load(&hw, RTCA_EAM_SCRATCH);
    assert_eq!(scratch.marker, EAM_SCRATCH_MARKER);
    assert_eq!(scratch.saved_fw_error, 0x0001_0003);
    assert_eq!(scratch.bank_status[gen1::PMC_ERR1_BANK], 0b1_0010);
    assert_eq!(scratch.bank_status[gen1::PMC_ERR3_BANK], 0b100);
    // Secondary banks wait for their own bring-up.
    assert_eq!(scratch.bank_status[gen1::PSM_ERR1_BANK], 0);
}

#[test]
fn test_defaults_installed_and_armed() {
    let hw = hw_for(&GEN1);
    let mut bus = hw.clone();
    let services = TestServices::default();
    let eam = booted(&GEN1, &mut bus, &services);

    let action = |id: ErrorId| eam.registry().get_descriptor(id).unwrap().action;
    assert_eq!(action(gen1::PMC_WDT), ErrorAction::SoftReset);
    assert_eq!(action(gen1::FW_NCR), ErrorAction::PrintToLog);
    assert_eq!(action(gen1::TAMPER), ErrorAction::SecureLockdown);
    assert_eq!(action(gen1::PSM_AGGREGATE), ErrorAction::Custom);
    assert_eq!(action(gen1::CFU), ErrorAction::None);
    assert!(eam
        .registry()
        .get_descriptor(gen1::PSM_AGGREGATE)
        .unwrap()
        .handler
        .is_some());
    assert_eq!(
        eam.registry().get_descriptor(gen1::PMC_ERR1_RESERVED).err(),
        Some(PmcError::EAM_INVALID_ERROR_ID)
    );

    assert_eq!(hw.peek(PMC_SRST1_MASK) & gen1::PMC_WDT.mask(), 0);
    assert_eq!(hw.peek(PMC_ERR_OUT1_MASK) & gen1::FW_CR.mask(), 0);
    assert_eq!(hw.peek(PMC_IRQ1_MASK) & gen1::FW_NCR.mask(), 0);
    assert_eq!(hw.peek(PMC_IRQ1_MASK) & gen1::TAMPER.mask(), 0);
    assert_eq!(hw.peek(PMC_IRQ3_MASK) & gen1::PSM_AGGREGATE.mask(), 0);
    assert_ne!(hw.peek(PMC_IRQ1_MASK) & gen1::CFU.mask(), 0);

    assert_ne!(hw.peek(IOMODULE_IER) & IOMODULE_ERR_IRQ_MASK, 0);
    assert_eq!(hw.peek(IOMODULE_IAR), IOMODULE_ERR_IRQ_MASK);
    assert!(!eam.error_out_asserted());
    assert_eq!(eam.error_out_count(), 0);
}

#[test]
fn test_secondary_bring_up() {
    let hw = hw_for(&GEN1);
    hw.set_status(PSM_ERR2_STATUS, 0x30);
    let mut bus = hw.clone();
    let services = TestServices::default();
    let mut eam = booted(&GEN1, &mut bus, &services);

    // Default exists in the table but is not installed yet.
    let psm_cr = ErrorId::new(gen1::PSM_ERR1_BANK, 0);
    assert_eq!(
        eam.registry().get_descriptor(psm_cr).unwrap().action,
        ErrorAction::None
    );
    assert_eq!(hw.peek(PSM_ERR2_STATUS), 0x30);

    eam.init_secondary().unwrap();
    let desc = eam.registry().get_descriptor(psm_cr).unwrap();
    assert_eq!(desc.action, ErrorAction::PrintToLog);
    assert_eq!(desc.subsystem_id, gen1::SUBSYS_PSM);
    assert_eq!(hw.peek(PSM_IRQ1_MASK) & 0b1, 0);
    assert_eq!(hw.peek(PSM_ERR2_STATUS), 0);
    assert_eq!(
        EamScratch::load(&hw, RTCA_EAM_SCRATCH).bank_status[gen1::PSM_ERR2_BANK],
        0x30
    );
}

#[test]
fn test_gen2_boot() {
    let hw = hw_for(&GEN2);
    let mut bus = hw.clone();
    let services = TestServices::default();
    let mut eam = booted(&GEN2, &mut bus, &services);
    eam.init_secondary().unwrap();

    assert_eq!(services.calls(), vec![Call::OverTemp(2000)]);
    assert_eq!(eam.platform().name, "gen2");
    assert_eq!(hw.peek(G2_PMC_IRQ2_MASK) & (1 << 3), 0);
    assert_eq!(hw.peek(LPD_ERR_SRST_MASK) & 0b1, 0);
}
