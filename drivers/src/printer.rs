/*++

Licensed under the Apache-2.0 license.

File Name:

    printer.rs

Abstract:

    File contains the log sink used by the error management core and the
    cprint!/cprintln! macros that format into it.

--*/
use core::convert::Infallible;
use ufmt::{uDisplay, uWrite};

#[derive(Default)]
pub struct Printer;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        std::thread_local! {
            static CAPTURED: core::cell::RefCell<String> = const {
                core::cell::RefCell::new(String::new())
            };
        }

        /// Drain everything printed on this thread so far.
        pub fn take_log() -> String {
            CAPTURED.with(|c| core::mem::take(&mut *c.borrow_mut()))
        }

        impl uWrite for Printer {
            type Error = Infallible;

            fn write_str(&mut self, str: &str) -> Result<(), Self::Error> {
                print!("{str}");
                CAPTURED.with(|c| c.borrow_mut().push_str(str));
                Ok(())
            }
        }
    } else {
        impl uWrite for Printer {
            type Error = Infallible;

            #[inline(never)]
            fn write_str(&mut self, _str: &str) -> Result<(), Self::Error> {
                #[cfg(feature = "emu")]
                for b in _str.bytes() {
                    unsafe {
                        core::ptr::write_volatile(
                            crate::memory_layout::UART_TX as usize as *mut u32,
                            b as u32,
                        )
                    };
                }
                Ok(())
            }
        }
    }
}

#[macro_export]
macro_rules! cprint {
    ($($tt:tt)*) => {{
        let _ = ufmt::uwrite!(&mut $crate::printer::Printer::default(), $($tt)*);
    }}
}

#[macro_export]
macro_rules! cprintln {
    ($($tt:tt)*) => {{
        let _ = ufmt::uwriteln!(&mut $crate::printer::Printer::default(), $($tt)*);
    }}
}

/// Bytes rendered as upper-case hex with no separators.
pub struct HexBytes<'a>(pub &'a [u8]);

impl uDisplay for HexBytes<'_> {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
        for &x in self.0.iter() {
            f.write_char(DIGITS[(x >> 4) as usize] as char)?;
            f.write_char(DIGITS[(x & 0xf) as usize] as char)?;
        }
        Ok(())
    }
}
