use std::fs::{File, OpenOptions};
use std::io::Read;
use std::os::fd::AsFd;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use nethid_transport::{poll_readable, Readiness};
use tracing::{debug, info};

use crate::error::{DeviceError, Result};
use crate::identity::{DeviceIdentity, HID_MAX_DESCRIPTOR_SIZE, NAME_CAPACITY};
use crate::ioctl::{
    hidiocgfeature, hidiocgrawname, HidrawDevInfo, HidrawReportDescriptor, HIDIOCGRAWINFO,
    HIDIOCGRDESC, HIDIOCGRDESCSIZE,
};

/// The queries the back side needs from a real HID device.
pub trait RawHidDevice {
    /// Bus type, vendor and product.
    fn identity(&mut self) -> Result<DeviceIdentity>;

    /// The raw 128-byte name record; padding is driver-defined.
    fn name(&mut self) -> Result<[u8; NAME_CAPACITY]>;

    /// The report descriptor, exactly as long as the driver says.
    fn report_descriptor(&mut self) -> Result<Vec<u8>>;

    /// Fetch feature report `report_number` into `buf` and return its
    /// length. `buf.len()` bounds the reply.
    fn feature_report(&mut self, report_number: u8, buf: &mut [u8]) -> Result<usize>;

    /// Zero-timeout check for a pending input report.
    fn poll_report(&mut self) -> Result<Readiness>;

    /// Read one input report into `buf` (blocking) and return its length.
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// A `/dev/hidraw*` node.
#[derive(Debug)]
pub struct HidrawDevice {
    file: File,
}

impl HidrawDevice {
    /// Open a hidraw node read-write, in blocking mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| DeviceError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), "opened hidraw device");
        Ok(Self { file })
    }
}

impl RawHidDevice for HidrawDevice {
    fn identity(&mut self) -> Result<DeviceIdentity> {
        let mut raw = HidrawDevInfo::default();
        // SAFETY: `raw` is a writable `hidraw_devinfo` matching the size
        // encoded in the request number; the fd is an open hidraw node.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), HIDIOCGRAWINFO, &mut raw) };
        if rc < 0 {
            return Err(DeviceError::query(
                "HIDIOCGRAWINFO",
                std::io::Error::last_os_error(),
            ));
        }

        let identity = DeviceIdentity {
            bus_type: raw.bustype as i32,
            vendor: u16::from_ne_bytes(raw.vendor.to_ne_bytes()),
            product: u16::from_ne_bytes(raw.product.to_ne_bytes()),
        };
        debug!(%identity, "queried identity");
        Ok(identity)
    }

    fn name(&mut self) -> Result<[u8; NAME_CAPACITY]> {
        let mut name = [0u8; NAME_CAPACITY];
        // SAFETY: `name` is writable for exactly the length encoded in the
        // request number.
        let rc = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                hidiocgrawname(name.len()),
                name.as_mut_ptr(),
            )
        };
        if rc < 0 {
            return Err(DeviceError::query(
                "HIDIOCGRAWNAME",
                std::io::Error::last_os_error(),
            ));
        }
        Ok(name)
    }

    fn report_descriptor(&mut self) -> Result<Vec<u8>> {
        let fd = self.file.as_raw_fd();

        let mut size: libc::c_int = 0;
        // SAFETY: `size` is a writable int, as the request number encodes.
        let rc = unsafe { libc::ioctl(fd, HIDIOCGRDESCSIZE, &mut size) };
        if rc < 0 {
            return Err(DeviceError::query(
                "HIDIOCGRDESCSIZE",
                std::io::Error::last_os_error(),
            ));
        }

        let size = descriptor_size(size)?;

        // Zero-filled, so any byte past `size` the kernel looks at is 0.
        let mut desc = Box::<HidrawReportDescriptor>::default();
        desc.size = size as u32;
        // SAFETY: `desc` points to a writable `hidraw_report_descriptor`
        // whose `size` is within `value`.
        let rc = unsafe { libc::ioctl(fd, HIDIOCGRDESC, &mut *desc) };
        if rc < 0 {
            return Err(DeviceError::query(
                "HIDIOCGRDESC",
                std::io::Error::last_os_error(),
            ));
        }

        debug!(size, "queried report descriptor");
        Ok(desc.value[..size].to_vec())
    }

    fn feature_report(&mut self, report_number: u8, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        buf.fill(0);
        buf[0] = report_number;

        // SAFETY: `buf` is writable for exactly the length encoded in the
        // request number, and starts with the report number as required.
        let rc = unsafe {
            libc::ioctl(
                self.file.as_raw_fd(),
                hidiocgfeature(buf.len()),
                buf.as_mut_ptr(),
            )
        };
        if rc < 0 {
            return Err(DeviceError::query(
                "HIDIOCGFEATURE",
                std::io::Error::last_os_error(),
            ));
        }

        let len = (rc as usize).min(buf.len());
        debug!(report_number, len, "queried feature report");
        Ok(len)
    }

    fn poll_report(&mut self) -> Result<Readiness> {
        Ok(poll_readable(self.file.as_fd())?)
    }

    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        // hidraw hands out one whole report per read.
        self.file.read(buf).map_err(DeviceError::read)
    }
}

/// Validate the size `HIDIOCGRDESCSIZE` reported.
fn descriptor_size(raw: libc::c_int) -> Result<usize> {
    let size = usize::try_from(raw).map_err(|_| DeviceError::Query {
        op: "HIDIOCGRDESCSIZE",
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("negative descriptor size {raw}"),
        ),
    })?;
    if size > HID_MAX_DESCRIPTOR_SIZE {
        return Err(DeviceError::TooLarge {
            what: "report descriptor",
            size,
            max: HID_MAX_DESCRIPTOR_SIZE,
        });
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_size_bounds() {
        assert_eq!(descriptor_size(0).unwrap(), 0);
        assert_eq!(descriptor_size(4096).unwrap(), HID_MAX_DESCRIPTOR_SIZE);
        assert!(matches!(
            descriptor_size(4097).unwrap_err(),
            DeviceError::TooLarge { size: 4097, .. }
        ));
        assert!(matches!(
            descriptor_size(-1).unwrap_err(),
            DeviceError::Query {
                op: "HIDIOCGRDESCSIZE",
                ..
            }
        ));
    }

    #[test]
    fn open_missing_node() {
        let err = HidrawDevice::open("/dev/nethid-test-no-such-hidraw").unwrap_err();
        match err {
            DeviceError::Open { path, source } => {
                assert_eq!(path, Path::new("/dev/nethid-test-no-such-hidraw"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn queries_on_a_non_hidraw_file_fail() {
        let mut device = HidrawDevice {
            file: File::open("/dev/null").unwrap(),
        };
        let err = device.identity().unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Query {
                op: "HIDIOCGRAWINFO",
                ..
            }
        ));
        assert!(!err.is_shutdown());
    }
}
