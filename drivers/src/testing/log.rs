/*++

Licensed under the Apache-2.0 license.

File Name:

    log.rs

Abstract:

    File contains the register write trace kept by the fake hardware.

--*/
use crate::bus::{RegAddr, RegData};
use std::{cell::RefCell, fmt::Write, rc::Rc};

/// Register writes in issue order. Clones share the same buffer, so a test
/// can keep a handle while the code under test owns the bus.
#[derive(Clone, Default)]
pub struct Log {
    writes: Rc<RefCell<Vec<(RegAddr, RegData)>>>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, addr: RegAddr, val: RegData) {
        self.writes.borrow_mut().push((addr, val));
    }

    /// Drain the trace and render it one `write(addr, val)` per line.
    pub fn take(&self) -> String {
        let mut out = String::new();
        for (addr, val) in self.writes.borrow_mut().drain(..) {
            let _ = writeln!(out, "write({addr:#x}, {val:#x})");
        }
        out
    }

    /// Drain the trace as raw pairs.
    pub fn take_writes(&self) -> Vec<(RegAddr, RegData)> {
        std::mem::take(&mut *self.writes.borrow_mut())
    }

    /// Values written to `addr`, oldest first, without draining.
    pub fn writes_to(&self, addr: RegAddr) -> Vec<RegData> {
        self.writes
            .borrow()
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Position of the first write to `addr`, if any.
    pub fn position(&self, addr: RegAddr) -> Option<usize> {
        self.writes.borrow().iter().position(|(a, _)| *a == addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_trace() {
        let log = Log::new();
        log.clone().record(0x10, 1);
        log.record(0x14, 2);
        log.record(0x10, 3);
        assert_eq!(log.writes_to(0x10), vec![1, 3]);
        assert_eq!(log.position(0x14), Some(1));
        assert_eq!(log.take(), "write(0x10, 0x1)\nwrite(0x14, 0x2)\nwrite(0x10, 0x3)\n");
        assert_eq!(log.take(), "");
        assert!(log.take_writes().is_empty());
    }
}
