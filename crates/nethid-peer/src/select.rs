use nethid_transport::Readiness;

use crate::error::{PeerError, Result};

/// The front side's next blocking action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// A kernel event is pending on the virtual device.
    ServiceKernel,
    /// Nothing pending locally: pull the next input report from the back side.
    FetchInput,
}

/// Choose between the two blocking actions. Kernel events always win.
pub fn select_next(kernel: Readiness) -> Result<Next> {
    match kernel {
        Readiness::Readable => Ok(Next::ServiceKernel),
        Readiness::Idle => Ok(Next::FetchInput),
        Readiness::Exceptional(revents) => Err(PeerError::DeviceHangup { revents }),
    }
}
