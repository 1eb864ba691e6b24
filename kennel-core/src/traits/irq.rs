//! Interrupt masking

/// Stops interrupt delivery for the rest of the boot
///
/// Latched events stay pending; nothing services them until the next
/// reset re-registers the handlers.
pub trait InterruptMask {
    fn mask_all(&mut self);
}
