/*++

Licensed under the Apache-2.0 license.

File Name:

    nested.rs

Abstract:

    File contains the handler installed on aggregate bits, which walks the
    secondary banks they summarize.

--*/

use crate::dispatch::Walk;
use crate::handler::ErrorHandler;
use crate::manager::Eam;
use crate::node::{ErrorId, ErrorNodeId};
use pmc_drivers::cprintln;

pub struct Nested;

impl ErrorHandler for Nested {
    fn handle(&self, eam: &mut Eam<'_>, node: ErrorNodeId, mask: u32) {
        if let Some(aggregate) = ErrorId::from_node(node, mask) {
            eam.walk_nested(aggregate);
        }
    }
}

impl Eam<'_> {
    /// Walk the secondary banks under `aggregate`. One level deep only.
    pub(crate) fn walk_nested(&mut self, aggregate: ErrorId) -> Walk {
        let platform = self.platform;
        for (idx, bank) in platform.banks.iter().enumerate() {
            if bank.parent != Some(aggregate.0) {
                continue;
            }
            if !self.secondary_ready[idx] {
                cprintln!("EAM: {} not initialized, skipped", bank.name);
                continue;
            }
            if self.walk_bank(idx) == Walk::Superseded {
                return Walk::Superseded;
            }
        }
        Walk::Completed
    }
}
