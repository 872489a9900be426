/*++

Licensed under the Apache-2.0 license.

File Name:

    error_out.rs

Abstract:

    File contains the saturating counter of outstanding error-out sources
    and the error-out line control built on it.

--*/

use crate::manager::Eam;
use crate::node::ErrorId;
use pmc_drivers::cprintln;

/// Outstanding error-out sources. The line is released only when the count
/// returns to zero.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ErrorOutCounter {
    count: u32,
}

impl ErrorOutCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn increment(&mut self) -> u32 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    pub fn decrement(&mut self) -> u32 {
        self.count = self.count.saturating_sub(1);
        self.count
    }
}

impl Eam<'_> {
    /// Count `id` as an outstanding error-out source and assert the line.
    pub(crate) fn assert_error_out(&mut self, id: ErrorId) {
        if self.registry.get_descriptor(id).is_err() {
            cprintln!("EAM: error-out from unknown id {} ignored", id.0);
            return;
        }
        let Some(outstanding) = self.err_out_outstanding.get_mut(id.bank()) else {
            return;
        };
        if *outstanding & id.mask() == 0 {
            *outstanding |= id.mask();
            self.err_out.increment();
        }
        let line = self.platform.layout.error_out_line;
        self.bank(line.bank()).raise(&mut *self.bus, line.mask());
        cprintln!(
            "EAM: error-out asserted by id {} mask 0x{:08X} count {}",
            id.0,
            id.mask(),
            self.err_out.count()
        );
    }

    /// Acknowledge `id` if it holds the line. Releases the line once no
    /// source is outstanding.
    pub(crate) fn acknowledge_error_out(&mut self, id: ErrorId) {
        let Some(outstanding) = self.err_out_outstanding.get_mut(id.bank()) else {
            return;
        };
        if *outstanding & id.mask() == 0 {
            return;
        }
        *outstanding &= !id.mask();
        if self.err_out.decrement() == 0 {
            let line = self.platform.layout.error_out_line;
            self.bank(line.bank()).clear_status(&mut *self.bus, line.mask());
            cprintln!("EAM: error-out released by id {}", id.0);
        }
    }

    /// Whether clearing `id` would drop the error-out line while sources
    /// are still outstanding.
    pub(crate) fn holds_error_out_line(&self, id: ErrorId) -> bool {
        id == self.platform.layout.error_out_line && self.err_out.count() > 0
    }

    pub fn error_out_count(&self) -> u32 {
        self.err_out.count()
    }

    /// Error-out line state as seen in its bank status register.
    pub fn error_out_asserted(&self) -> bool {
        let line = self.platform.layout.error_out_line;
        self.bank(line.bank()).read_status(&*self.bus) & line.mask() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturates_at_zero() {
        let mut counter = ErrorOutCounter::new();
        assert_eq!(counter.decrement(), 0);
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.decrement(), 0);
        assert_eq!(counter.decrement(), 0);
    }

    #[test]
    fn test_saturates_at_max() {
        let mut counter = ErrorOutCounter { count: u32::MAX - 1 };
        assert_eq!(counter.increment(), u32::MAX);
        assert_eq!(counter.increment(), u32::MAX);
        assert_eq!(counter.decrement(), u32::MAX - 1);
    }

    #[test]
    fn test_bounds_over_mixed_sequence() {
        let mut counter = ErrorOutCounter::new();
        let mut model: i64 = 0;
        for step in 0..200u32 {
            if step % 3 == 0 || step % 7 == 0 {
                counter.decrement();
                model = (model - 1).max(0);
            } else {
                counter.increment();
                model += 1;
            }
            assert_eq!(i64::from(counter.count()), model);
        }
    }
}
