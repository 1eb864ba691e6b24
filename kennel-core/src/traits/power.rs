//! Reset reason and system control traits

use crate::reset::ResetCause;

/// Access to the `RESETREAS` latch
pub trait ResetReasonRegister {
    /// Read the latched causes without clearing them
    fn read(&self) -> ResetCause;

    /// Clear every latched cause
    fn clear_all(&mut self);

    /// Read the latched causes, then clear them
    fn take(&mut self) -> ResetCause {
        let cause = self.read();
        self.clear_all();
        cause
    }
}

/// Operations that end the current boot
pub trait SystemControl {
    /// Enter System OFF; execution resumes only through a reset
    fn system_off(&mut self) -> !;

    /// Request a soft reset
    fn system_reset(&mut self) -> !;
}
