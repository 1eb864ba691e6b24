//! GPIOTE event channels

use kennel_core::error::IrqError;
use kennel_core::registers::gpiote::{intenset_in, GpioteConfig, CHANNEL_COUNT};
use kennel_hal::EdgeEvent;
use nrf52832_pac as pac;

fn gpiote() -> &'static pac::gpiote::RegisterBlock {
    unsafe { &*pac::GPIOTE::ptr() }
}

/// Put `channel` in event mode with `config` and set its `INTENSET` bit
///
/// Any event latched before configuration is discarded. The NVIC line is
/// left to whoever installs the GPIOTE handler.
pub fn configure_event_channel(channel: u8, config: GpioteConfig) -> Result<NrfEdgeEvent, IrqError> {
    if channel >= CHANNEL_COUNT {
        return Err(IrqError::ChannelOutOfRange);
    }
    let mask = intenset_in(channel)?;
    let regs = gpiote();
    let ch = channel as usize;

    regs.config[ch].write(|w| unsafe { w.bits(config.bits()) });
    regs.events_in[ch].write(|w| unsafe { w.bits(0) });
    regs.intenset.write(|w| unsafe { w.bits(mask) });

    Ok(NrfEdgeEvent { channel, mask })
}

/// `EVENTS_IN[channel]` of a configured channel
pub struct NrfEdgeEvent {
    channel: u8,
    mask: u32,
}

impl EdgeEvent for NrfEdgeEvent {
    fn is_pending(&self) -> bool {
        let regs = gpiote();
        regs.events_in[self.channel as usize].read().bits() != 0
            && regs.intenset.read().bits() & self.mask != 0
    }

    fn clear(&mut self) {
        gpiote().events_in[self.channel as usize].write(|w| unsafe { w.bits(0) });
    }
}
