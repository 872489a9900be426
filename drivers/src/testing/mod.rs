/*++

Licensed under the Apache-2.0 license.

File Name:

    mod.rs

Abstract:

    File contains host-side test doubles for the error management drivers.

--*/

mod fake_hw;
mod log;

pub use crate::printer::take_log;
pub use fake_hw::FakeEamHw;
pub use log::Log;
