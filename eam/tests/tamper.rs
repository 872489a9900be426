// Licensed under the Apache-2.0 license

mod common;

use common::{booted, expect_halt, hw_for, Call, TestServices};
use pmc_drivers::memory_layout::*;
use pmc_drivers::testing::take_log;
use pmc_eam::platform::gen1::{self, GEN1};
use pmc_eam::platform::gen2::GEN2;
use pmc_eam::{TamperMode, TamperResponse, TamperState};
use pmc_error::PmcError;

const SLD_0: u32 = 0x4;
const SLD_1: u32 = 0x8;
const SRST: u32 = 0x2;

#[test]
fn test_second_trigger_is_noop() {
    let hw = hw_for(&GEN1);
    let mut bus = hw.clone();
    let services = TestServices::default();
    let mut eam = booted(&GEN1, &mut bus, &services);

    eam.trigger_tamper(SLD_0, TamperMode::Task).unwrap();
    assert_eq!(eam.tamper_state(), TamperState::Triggered);
    // Would diverge if it took effect.
    eam.trigger_tamper(SLD_1, TamperMode::Immediate).unwrap();
    assert_eq!(eam.tamper_state(), TamperState::Triggered);
    assert_eq!(
        services.calls().iter().filter(|c| matches!(c, Call::NotifyPeers(_))).count(),
        1
    );

    expect_halt(|| {
        eam.run_pending();
    });
    assert_eq!(eam.tamper_state(), TamperState::InProgress);
    assert_eq!(hw.peek(PMC_BOUNDARY_RESP), SLD_0);

    eam.trigger_tamper(SRST, TamperMode::Immediate).unwrap();
    assert_eq!(eam.tamper_state(), TamperState::InProgress);
}

#[test]
fn test_invalid_response_rejected() {
    let hw = hw_for(&GEN1);
    let mut bus = hw.clone();
    let services = TestServices::default();
    let mut eam = booted(&GEN1, &mut bus, &services);

    assert_eq!(
        eam.trigger_tamper(0x1, TamperMode::Immediate),
        Err(PmcError::TAMPER_INVALID_RESPONSE)
    );
    assert_eq!(eam.tamper_state(), TamperState::NotTriggered);
}

#[test]
fn test_fast_path_lockdown_sequence() {
    let hw = hw_for(&GEN1);
    let mut bus = hw.clone();
    let services = TestServices::default();
    let mut eam = booted(&GEN1, &mut bus, &services);

    hw.poke(PMC_TAMPER_RESP, SLD_0);
    hw.set_status(PMC_ERR1_STATUS, gen1::TAMPER.mask());
    eam.isr();
    assert_eq!(eam.tamper_state(), TamperState::Triggered);
    assert_eq!(hw.peek(PMC_ERR1_STATUS) & gen1::TAMPER.mask(), 0);
    assert!(services.called(&Call::NotifyPeers(SLD_0)));

    hw.log.take();
    expect_halt(|| {
        eam.run_pending();
    });
    // The tamper task preempts the error task.
    assert_eq!(eam.task_runs(), 0);

    assert_eq!(hw.peek(PMC_IRQ1_MASK), u32::MAX);
    assert_eq!(hw.peek(IOMODULE_IER) & IOMODULE_ERR_IRQ_MASK, 0);
    assert_eq!(hw.peek(CRP_PMC_CLK_DIV), CRP_PMC_CLK_DIV_LOCKDOWN);
    assert_eq!(hw.peek(PMC_BOUNDARY_RESP), SLD_0);
    assert_eq!(hw.peek(PMC_BOUNDARY_TRIG), 0x1);

    let clk = hw.log.position(CRP_PMC_CLK_DIV).unwrap();
    let resp = hw.log.position(PMC_BOUNDARY_RESP).unwrap();
    let trig = hw.log.position(PMC_BOUNDARY_TRIG).unwrap();
    assert!(clk < resp && resp < trig);
    assert_eq!(
        services.calls()[services.calls().len() - 2..],
        [Call::Recovery(1), Call::Halt]
    );
}

#[test]
fn test_unreadable_response_falls_back_to_handler() {
    let hw = hw_for(&GEN1);
    let mut bus = hw.clone();
    let services = TestServices::default();
    let mut eam = booted(&GEN1, &mut bus, &services);

    // No response configured: the fast path leaves the bit to the task.
    hw.set_status(PMC_ERR1_STATUS, gen1::TAMPER.mask());
    eam.isr();
    assert_eq!(eam.tamper_state(), TamperState::NotTriggered);

    assert!(eam.run_pending());
    assert_eq!(eam.tamper_state(), TamperState::Triggered);
    // The walk was abandoned; the interrupt stays off.
    assert_eq!(hw.peek(IOMODULE_IER) & IOMODULE_ERR_IRQ_MASK, 0);
    assert!(take_log().contains("error task stopped by tamper response"));

    expect_halt(|| {
        eam.run_pending();
    });
    assert_eq!(hw.peek(PMC_BOUNDARY_RESP), TamperResponse::LOCKDOWN_0.bits());
}

#[test]
fn test_tristate_lockdown_on_gen2() {
    let hw = hw_for(&GEN2);
    let mut bus = hw.clone();
    let services = TestServices::default();
    let mut eam = booted(&GEN2, &mut bus, &services);

    hw.set_status(G2_PMC_ERR1_STATUS, pmc_eam::platform::gen2::TAMPER.mask());
    eam.isr();
    eam.run_pending();
    expect_halt(|| {
        eam.run_pending();
    });
    assert_eq!(hw.peek(G2_PMC_BOUNDARY_RESP), SLD_1);
    assert!(services.called(&Call::Recovery(2)));
}

#[test]
fn test_reset_only_response() {
    let hw = hw_for(&GEN1);
    let mut bus = hw.clone();
    let services = TestServices::default();
    let mut eam = booted(&GEN1, &mut bus, &services);

    expect_halt(|| {
        let _ = eam.trigger_tamper(SRST, TamperMode::Immediate);
    });
    assert_ne!(hw.peek(CRP_RST_PS) & CRP_RST_PS_SRST_MASK, 0);
    assert_eq!(hw.peek(PMC_BOUNDARY_TRIG), 0);
    assert!(!services.called(&Call::NotifyPeers(SRST)));
}

#[test]
fn test_handshake_timeout_and_recovery_failure_continue() {
    let hw = hw_for(&GEN1);
    let mut bus = hw.clone();
    let services = TestServices::default();
    services.peers_ready.set(false);
    services.status.set(5);
    let mut eam = booted(&GEN1, &mut bus, &services);

    take_log();
    expect_halt(|| {
        let _ = eam.trigger_tamper(SLD_0, TamperMode::Immediate);
    });
    assert_eq!(services.live_beats.get(), 100);
    let log = take_log();
    assert!(log.contains("warning 0x80020002, continuing without peers"));
    assert!(log.contains("warning 0x80020003, recovery procedure returned 5"));
    assert_eq!(hw.peek(PMC_BOUNDARY_TRIG), 0x1);
}

#[test]
fn test_halt_boot_policy() {
    let hw = hw_for(&GEN1);
    hw.poke(EFUSE_CACHE_MISC_CTRL, EFUSE_HALT_BOOT_ERROR_MASK);
    hw.poke(CRP_BOOT_MODE_USER, BOOT_MODE_QSPI32);
    let mut bus = hw.clone();
    let services = TestServices::default();
    let mut eam = booted(&GEN1, &mut bus, &services);

    // Warnings never halt.
    eam.report_fw_error(PmcError::EAM_HANDLER_FAILED);
    assert_eq!(hw.peek(PMC_FW_ERR), 0);

    expect_halt(|| eam.report_fw_error(PmcError::EAM_INVALID_ACTION));
    assert_eq!(hw.peek(PMC_FW_ERR), u32::from(PmcError::EAM_INVALID_ACTION));
    assert_eq!(hw.peek(PMC_BOUNDARY_RESP), SLD_0);
    // Lockdown wins over the image fallback.
    assert_eq!(hw.peek(PMC_MULTI_BOOT), 0);
}

#[test]
fn test_errors_after_boot_only_recorded() {
    let hw = hw_for(&GEN1);
    hw.poke(EFUSE_CACHE_MISC_CTRL, EFUSE_HALT_BOOT_ERROR_MASK);
    let mut bus = hw.clone();
    let services = TestServices::default();
    let mut eam = booted(&GEN1, &mut bus, &services);

    eam.mark_boot_complete();
    assert!(eam.is_boot_complete());
    eam.report_fw_error(PmcError::EAM_INVALID_ACTION);
    assert_eq!(hw.peek(PMC_FW_ERR), u32::from(PmcError::EAM_INVALID_ACTION));
    assert_eq!(eam.tamper_state(), TamperState::NotTriggered);
    assert_eq!(hw.peek(PMC_MULTI_BOOT), 0);
    assert_eq!(services.live_beats.get(), 0);
}
