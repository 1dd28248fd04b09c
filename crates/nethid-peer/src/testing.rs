//! Scripted devices for session tests.

use std::collections::{HashMap, VecDeque};

use nethid_device::{
    CreateParams, DeviceError, DeviceIdentity, RawHidDevice, Result, UhidEvent, UhidRequest,
    VirtualHidDevice, NAME_CAPACITY,
};
use nethid_transport::Readiness;

/// A hidraw stand-in. Queued reports are "pending"; once they run out, a
/// blocking read returns `next_blocking`, or fails as interrupted.
#[derive(Debug, Clone)]
pub(crate) struct FakeHidraw {
    pub identity: DeviceIdentity,
    pub name: [u8; NAME_CAPACITY],
    pub descriptor: Vec<u8>,
    pub features: HashMap<u8, Vec<u8>>,
    pub pending: VecDeque<Vec<u8>>,
    pub next_blocking: Option<Vec<u8>>,
    pub blocking_reads: usize,
    pub hangup: Option<i16>,
}

impl Default for FakeHidraw {
    fn default() -> Self {
        Self {
            identity: DeviceIdentity::default(),
            name: [0u8; NAME_CAPACITY],
            descriptor: Vec::new(),
            features: HashMap::new(),
            pending: VecDeque::new(),
            next_blocking: None,
            blocking_reads: 0,
            hangup: None,
        }
    }
}

impl FakeHidraw {
    pub fn queue(&mut self, report: &[u8]) {
        self.pending.push_back(report.to_vec());
    }
}

fn copy_report(report: &[u8], buf: &mut [u8]) -> usize {
    let n = report.len().min(buf.len());
    buf[..n].copy_from_slice(&report[..n]);
    n
}

impl RawHidDevice for FakeHidraw {
    fn identity(&mut self) -> Result<DeviceIdentity> {
        Ok(self.identity)
    }

    fn name(&mut self) -> Result<[u8; NAME_CAPACITY]> {
        Ok(self.name)
    }

    fn report_descriptor(&mut self) -> Result<Vec<u8>> {
        Ok(self.descriptor.clone())
    }

    fn feature_report(&mut self, report_number: u8, buf: &mut [u8]) -> Result<usize> {
        match self.features.get(&report_number) {
            Some(report) => Ok(copy_report(report, buf)),
            None => Err(DeviceError::Query {
                op: "HIDIOCGFEATURE",
                source: std::io::Error::from_raw_os_error(32),
            }),
        }
    }

    fn poll_report(&mut self) -> Result<Readiness> {
        if let Some(revents) = self.hangup {
            return Ok(Readiness::Exceptional(revents));
        }
        if self.pending.is_empty() {
            Ok(Readiness::Idle)
        } else {
            Ok(Readiness::Readable)
        }
    }

    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        if let Some(report) = self.pending.pop_front() {
            return Ok(copy_report(&report, buf));
        }
        self.blocking_reads += 1;
        match self.next_blocking.take() {
            Some(report) => Ok(copy_report(&report, buf)),
            None => Err(DeviceError::Interrupted),
        }
    }
}

/// A uhid stand-in that replays scripted kernel events and records what
/// userspace sends back.
#[derive(Debug, Default)]
pub(crate) struct FakeUhid {
    pub events: VecDeque<UhidEvent>,
    pub created: Option<CreateParams>,
    pub inputs: Vec<Vec<u8>>,
    pub replies: Vec<(u32, u16, Vec<u8>)>,
}

impl VirtualHidDevice for FakeUhid {
    fn create(&mut self, params: &CreateParams) -> Result<()> {
        let mut scratch = [0u8; nethid_device::UHID_EVENT_SIZE];
        UhidRequest::Create2(params).encode_into(&mut scratch)?;
        self.created = Some(params.clone());
        Ok(())
    }

    fn poll_event(&mut self) -> Result<Readiness> {
        if self.events.is_empty() {
            Ok(Readiness::Idle)
        } else {
            Ok(Readiness::Readable)
        }
    }

    fn read_event(&mut self) -> Result<UhidEvent> {
        self.events.pop_front().ok_or(DeviceError::Interrupted)
    }

    fn send(&mut self, request: &UhidRequest<'_>) -> Result<()> {
        match request {
            UhidRequest::Create2(params) => self.created = Some((*params).clone()),
            UhidRequest::Input2 { data } => self.inputs.push(data.to_vec()),
            UhidRequest::GetReportReply { id, err, data } => {
                self.replies.push((*id, *err, data.to_vec()))
            }
        }
        Ok(())
    }
}
