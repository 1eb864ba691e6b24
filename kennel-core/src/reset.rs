//! Reset cause decoding
//!
//! `RESETREAS` latches one bit per reset source and keeps accumulating
//! until software clears it, so it is read exactly once at boot and then
//! cleared. An empty set means the chip came up from power-on or brown-out.

use bitflags::bitflags;

use crate::registers::power::{
    RESETREAS_DIF, RESETREAS_DOG, RESETREAS_LOCKUP, RESETREAS_LPCOMP, RESETREAS_OFF,
    RESETREAS_RESETPIN, RESETREAS_SREQ,
};

bitflags! {
    /// Set of reset sources latched in `RESETREAS`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResetCause: u32 {
        /// Pin reset
        const PIN = RESETREAS_RESETPIN;
        /// Watchdog timeout
        const WATCHDOG = RESETREAS_DOG;
        /// Soft reset request
        const SOFTWARE = RESETREAS_SREQ;
        /// CPU lock-up
        const LOCKUP = RESETREAS_LOCKUP;
        /// Wake from System OFF by a GPIO DETECT signal
        const WAKE_GPIO = RESETREAS_OFF;
        /// Wake from System OFF by the low-power comparator
        const WAKE_LPCOMP = RESETREAS_LPCOMP;
        /// Wake from System OFF by entering debug interface mode
        const WAKE_DEBUG = RESETREAS_DIF;
    }
}

impl ResetCause {
    /// Order in which causes are mapped onto the indicator LEDs
    pub const REPORT_ORDER: [ResetCause; 7] = [
        ResetCause::PIN,
        ResetCause::WATCHDOG,
        ResetCause::SOFTWARE,
        ResetCause::LOCKUP,
        ResetCause::WAKE_GPIO,
        ResetCause::WAKE_LPCOMP,
        ResetCause::WAKE_DEBUG,
    ];

    /// Decode a raw `RESETREAS` value, dropping reserved bits
    pub const fn from_register(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }

    /// Check whether no reset source is latched (power-on reset)
    pub const fn is_power_on(self) -> bool {
        self.is_empty()
    }

    /// Check whether this boot is a wake from System OFF
    pub const fn is_wake(self) -> bool {
        self.intersects(
            ResetCause::WAKE_GPIO
                .union(ResetCause::WAKE_LPCOMP)
                .union(ResetCause::WAKE_DEBUG),
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ResetCause {
    fn format(&self, f: defmt::Formatter) {
        if self.is_empty() {
            defmt::write!(f, "ResetCause(POWER_ON)");
            return;
        }
        defmt::write!(f, "ResetCause(");
        for (i, (name, _)) in self.iter_names().enumerate() {
            if i > 0 {
                defmt::write!(f, " | ");
            }
            defmt::write!(f, "{=str}", name);
        }
        defmt::write!(f, ")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_bits() {
        assert_eq!(ResetCause::PIN.bits(), 1 << 0);
        assert_eq!(ResetCause::WATCHDOG.bits(), 1 << 1);
        assert_eq!(ResetCause::SOFTWARE.bits(), 1 << 2);
        assert_eq!(ResetCause::LOCKUP.bits(), 1 << 3);
        assert_eq!(ResetCause::WAKE_GPIO.bits(), 1 << 16);
        assert_eq!(ResetCause::WAKE_LPCOMP.bits(), 1 << 17);
        assert_eq!(ResetCause::WAKE_DEBUG.bits(), 1 << 18);
    }

    #[test]
    fn test_reserved_bits_dropped() {
        let cause = ResetCause::from_register(0xFFFF_FFFF);
        assert_eq!(cause, ResetCause::all());
        assert_eq!(cause.bits(), 0x0007_000F);
    }

    #[test]
    fn test_power_on() {
        assert!(ResetCause::from_register(0).is_power_on());
        assert!(!ResetCause::WATCHDOG.is_power_on());
    }

    #[test]
    fn test_report_order_covers_all() {
        let all = ResetCause::REPORT_ORDER
            .iter()
            .fold(ResetCause::empty(), |acc, c| acc | *c);
        assert_eq!(all, ResetCause::all());
    }

    #[test]
    fn test_wake() {
        assert!(ResetCause::WAKE_GPIO.is_wake());
        assert!((ResetCause::WAKE_DEBUG | ResetCause::PIN).is_wake());
        assert!(!(ResetCause::SOFTWARE | ResetCause::WATCHDOG).is_wake());
    }
}
