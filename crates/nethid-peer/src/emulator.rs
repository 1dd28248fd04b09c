use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use nethid_device::{CreateParams, UhidEvent, UhidRequest, VirtualHidDevice};
use tracing::{debug, info};

use crate::client::RemoteDevice;
use crate::error::{PeerError, Result};
use crate::select::{select_next, Next};
use crate::session::SessionEnd;

/// Front-side creation settings the remote device does not supply.
#[derive(Debug, Clone)]
pub struct EmulatorConfig {
    pub version: u32,
    pub country: u32,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            version: 1,
            country: 0,
        }
    }
}

/// Presents a remote HID device as a local virtual one.
pub struct Emulator<V, R, W> {
    device: V,
    remote: RemoteDevice<R, W>,
    config: EmulatorConfig,
}

impl<V: VirtualHidDevice, R: Read, W: Write> Emulator<V, R, W> {
    /// Create an emulator with default configuration.
    pub fn new(device: V, remote: RemoteDevice<R, W>) -> Self {
        Self::with_config(device, remote, EmulatorConfig::default())
    }

    /// Create an emulator with explicit configuration.
    pub fn with_config(device: V, remote: RemoteDevice<R, W>, config: EmulatorConfig) -> Self {
        Self {
            device,
            remote,
            config,
        }
    }

    /// Fetch identity, name and report descriptor from the back side and
    /// create the virtual device from them.
    pub fn create_device(&mut self) -> Result<CreateParams> {
        let identity = self.remote.fetch_identity()?;
        let name = self.remote.fetch_name()?;
        let report_descriptor = self.remote.fetch_report_descriptor()?;

        let params = CreateParams {
            name,
            phys: Vec::new(),
            uniq: Vec::new(),
            // bus_type is an int in hidraw but a u16 in uhid.
            bus: identity.bus_type as u16,
            vendor: u32::from(identity.vendor),
            product: u32::from(identity.product),
            version: self.config.version,
            country: self.config.country,
            report_descriptor,
        };

        self.device.create(&params)?;
        Ok(params)
    }

    /// One loop iteration: service a pending kernel event if there is one,
    /// otherwise inject the next input report from the back side.
    pub fn step(&mut self) -> Result<Next> {
        let next = select_next(self.device.poll_event()?)?;
        match next {
            Next::ServiceKernel => self.service_event()?,
            Next::FetchInput => self.inject_input()?,
        }
        Ok(next)
    }

    /// Create the device, then step until the channel closes, a signal
    /// interrupts a blocking call, `stop` is raised, or a step fails.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<SessionEnd> {
        if let Err(err) = self.create_device() {
            return SessionEnd::from_error(err);
        }
        info!("virtual device running");

        loop {
            // A signal landing between this check and the next blocking call
            // is only seen once that call returns.
            if stop.load(Ordering::SeqCst) {
                return Ok(SessionEnd::Stopped);
            }
            if let Err(err) = self.step() {
                return SessionEnd::from_error(err);
            }
        }
    }

    fn service_event(&mut self) -> Result<()> {
        match self.device.read_event()? {
            UhidEvent::Start { dev_flags } => debug!(dev_flags, "device started"),
            UhidEvent::Open => debug!("device opened"),
            UhidEvent::GetReport {
                id, report_number, ..
            } => {
                let data = self.remote.fetch_feature_report(report_number)?;
                debug!(id, report_number, len = data.len(), "answering feature report");
                self.device
                    .send(&UhidRequest::GetReportReply { id, err: 0, data })?;
            }
            UhidEvent::Output { size, .. } => debug!(size, "dropping output report"),
            other => return Err(PeerError::UnexpectedEvent(other.name())),
        }
        Ok(())
    }

    fn inject_input(&mut self) -> Result<()> {
        let data = self.remote.fetch_queued_report()?;
        self.device.send(&UhidRequest::Input2 { data })?;
        Ok(())
    }

    /// Borrow the virtual device.
    pub fn device(&self) -> &V {
        &self.device
    }
}
