/*++

Licensed under the Apache-2.0 license.

File Name:

    services.rs

Abstract:

    File contains the interface to the platform services the error
    management core calls out to but does not implement.

--*/

/// Shutdown type passed for a subsystem shutdown action
pub const SHUTDOWN_TYPE_SHUTDOWN: u32 = 0;

/// Shutdown subtype selecting a single subsystem
pub const SHUTDOWN_SUBTYPE_SUBSYSTEM: u32 = 0;

/// Command flags for shutdowns requested by the error manager
pub const SHUTDOWN_CMD_FLAGS: u32 = 0;

/// Platform collaborators. Status-returning calls report 0 on success.
pub trait PlatformServices {
    fn subsystem_shutdown(
        &self,
        subsystem_id: u32,
        shutdown_type: u32,
        subtype: u32,
        cmd_flags: u32,
    ) -> i32;

    fn subsystem_restart(&self, subsystem_id: u32) -> i32;

    fn execute_recovery_procedure(&self, procedure_id: u32) -> i32;

    /// Block until the over-temperature condition has cleared, at most
    /// `max_wait_ms`. Returns false on timeout.
    fn wait_for_over_temperature_clear(&self, max_wait_ms: u32) -> bool;

    /// Tell peer dies a lockdown response is about to run.
    fn notify_peers(&self, _response: u32) {}

    /// Whether every peer die has acknowledged the lockdown notification.
    fn peer_handshake_done(&self) -> bool {
        true
    }

    /// Liveness signal, called while busy-waiting.
    fn set_live_status(&self) {}

    /// Terminal wait once control belongs to the reset or boundary logic.
    fn halt(&self) -> !;
}
