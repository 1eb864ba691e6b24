//! POWER peripheral: reset reason, System OFF and soft reset

use embassy_nrf::interrupt::{self, InterruptExt};
use kennel_core::registers::power::{RESETREAS_CLEAR_ALL, SYSTEMOFF_ENTER};
use kennel_core::reset::ResetCause;
use kennel_core::traits::{InterruptMask, ResetReasonRegister, SystemControl};
use nrf52832_pac as pac;

fn power() -> &'static pac::power::RegisterBlock {
    unsafe { &*pac::POWER::ptr() }
}

/// `RESETREAS`
pub struct NrfResetReason {
    _private: (),
}

impl NrfResetReason {
    /// Take the reset reason register
    ///
    /// Create once at boot; the register is shared by the whole chip.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for NrfResetReason {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetReasonRegister for NrfResetReason {
    fn read(&self) -> ResetCause {
        ResetCause::from_register(power().resetreas.read().bits())
    }

    fn clear_all(&mut self) {
        power()
            .resetreas
            .write(|w| unsafe { w.bits(RESETREAS_CLEAR_ALL) });
    }
}

/// System OFF and soft reset
pub struct NrfSystem {
    _private: (),
}

impl NrfSystem {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for NrfSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemControl for NrfSystem {
    fn system_off(&mut self) -> ! {
        cortex_m::asm::dsb();
        power()
            .systemoff
            .write(|w| unsafe { w.bits(SYSTEMOFF_ENTER) });
        // In debug interface mode System OFF is emulated and execution
        // continues here
        loop {
            cortex_m::asm::wfe();
        }
    }

    fn system_reset(&mut self) -> ! {
        cortex_m::peripheral::SCB::sys_reset()
    }
}

/// NVIC lines of the GPIOTE and WDT handlers
pub struct NrfInterruptMask {
    _private: (),
}

impl NrfInterruptMask {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for NrfInterruptMask {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptMask for NrfInterruptMask {
    fn mask_all(&mut self) {
        interrupt::GPIOTE.disable();
        interrupt::WDT.disable();
    }
}
