//! Interrupt handler slots
//!
//! Each interrupt source has one slot, filled once at initialization. The
//! `#[interrupt]` functions only dispatch into their slot.

use core::cell::RefCell;

use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use kennel_core::app::{InterruptHandler, IrqSource};
use kennel_core::error::IrqError;

type Handler = &'static mut (dyn InterruptHandler + Send);
type Slot = Mutex<CriticalSectionRawMutex, RefCell<Option<Handler>>>;

static GPIOTE_HANDLER: Slot = Mutex::new(RefCell::new(None));
static WDT_HANDLER: Slot = Mutex::new(RefCell::new(None));

/// Install `handler` in the slot of its source and enable that interrupt
///
/// The NVIC line is enabled only after the slot is filled, so an event
/// latched earlier is serviced by the new handler.
pub fn register(handler: Handler) -> Result<(), IrqError> {
    let source = handler.source();
    let slot = match source {
        IrqSource::Gpiote => &GPIOTE_HANDLER,
        IrqSource::WatchdogTimeout => &WDT_HANDLER,
    };

    slot.lock(|cell| {
        let mut cell = cell.borrow_mut();
        if cell.is_some() {
            return Err(IrqError::AlreadyRegistered(source));
        }
        *cell = Some(handler);
        Ok(())
    })?;

    match source {
        IrqSource::Gpiote => {
            interrupt::GPIOTE.set_priority(Priority::P2);
            unsafe { interrupt::GPIOTE.enable() };
        }
        IrqSource::WatchdogTimeout => {
            interrupt::WDT.set_priority(Priority::P1);
            unsafe { interrupt::WDT.enable() };
        }
    }
    Ok(())
}

fn dispatch(slot: &Slot) {
    slot.lock(|cell| {
        if let Some(handler) = cell.borrow_mut().as_mut() {
            handler.on_interrupt();
        }
    });
}

#[interrupt]
fn GPIOTE() {
    dispatch(&GPIOTE_HANDLER);
}

#[interrupt]
fn WDT() {
    dispatch(&WDT_HANDLER);
}
