//! POWER peripheral registers: `RESETREAS` and `SYSTEMOFF`

/// Reset from the pin reset
pub const RESETREAS_RESETPIN: u32 = 1 << 0;
/// Reset from the watchdog
pub const RESETREAS_DOG: u32 = 1 << 1;
/// Reset from a soft reset request
pub const RESETREAS_SREQ: u32 = 1 << 2;
/// Reset from a CPU lock-up
pub const RESETREAS_LOCKUP: u32 = 1 << 3;
/// Wake from System OFF by a GPIO DETECT signal
pub const RESETREAS_OFF: u32 = 1 << 16;
/// Wake from System OFF by the low-power comparator
pub const RESETREAS_LPCOMP: u32 = 1 << 17;
/// Wake from System OFF by entering debug interface mode
pub const RESETREAS_DIF: u32 = 1 << 18;

/// `RESETREAS` is write-one-to-clear; this clears every field
pub const RESETREAS_CLEAR_ALL: u32 = 0xFFFF_FFFF;

/// Value written to `SYSTEMOFF` to enter System OFF
pub const SYSTEMOFF_ENTER: u32 = 1;
