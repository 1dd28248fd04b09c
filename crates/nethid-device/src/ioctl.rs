//! hidraw ioctl request numbers.
//!
//! Encoded with the generic Linux `_IOC` layout (x86, arm, riscv).

use crate::identity::HID_MAX_DESCRIPTOR_SIZE;

const IOC_NRBITS: u32 = 8;
const IOC_TYPEBITS: u32 = 8;
const IOC_SIZEBITS: u32 = 14;
const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = IOC_NRSHIFT + IOC_NRBITS;
const IOC_SIZESHIFT: u32 = IOC_TYPESHIFT + IOC_TYPEBITS;
const IOC_DIRSHIFT: u32 = IOC_SIZESHIFT + IOC_SIZEBITS;
const IOC_WRITE: u32 = 1;
const IOC_READ: u32 = 2;

const HIDRAW_IOCTL_TYPE: u8 = b'H';
const HIDIOC_NR_GRDESCSIZE: u8 = 0x01;
const HIDIOC_NR_GRDESC: u8 = 0x02;
const HIDIOC_NR_GRAWINFO: u8 = 0x03;
const HIDIOC_NR_GRAWNAME: u8 = 0x04;
const HIDIOC_NR_GFEATURE: u8 = 0x07;

/// `struct hidraw_devinfo`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HidrawDevInfo {
    pub bustype: u32,
    pub vendor: i16,
    pub product: i16,
}

/// `struct hidraw_report_descriptor`.
#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct HidrawReportDescriptor {
    pub size: u32,
    pub value: [u8; HID_MAX_DESCRIPTOR_SIZE],
}

impl Default for HidrawReportDescriptor {
    fn default() -> Self {
        Self {
            size: 0,
            value: [0u8; HID_MAX_DESCRIPTOR_SIZE],
        }
    }
}

const fn ioctl_code(direction: u32, kind: u8, nr: u8, size: usize) -> libc::c_ulong {
    ((direction << IOC_DIRSHIFT)
        | ((kind as u32) << IOC_TYPESHIFT)
        | ((nr as u32) << IOC_NRSHIFT)
        | ((size as u32) << IOC_SIZESHIFT)) as libc::c_ulong
}

pub(crate) const HIDIOCGRDESCSIZE: libc::c_ulong = ioctl_code(
    IOC_READ,
    HIDRAW_IOCTL_TYPE,
    HIDIOC_NR_GRDESCSIZE,
    std::mem::size_of::<libc::c_int>(),
);
pub(crate) const HIDIOCGRDESC: libc::c_ulong = ioctl_code(
    IOC_READ,
    HIDRAW_IOCTL_TYPE,
    HIDIOC_NR_GRDESC,
    std::mem::size_of::<HidrawReportDescriptor>(),
);
pub(crate) const HIDIOCGRAWINFO: libc::c_ulong = ioctl_code(
    IOC_READ,
    HIDRAW_IOCTL_TYPE,
    HIDIOC_NR_GRAWINFO,
    std::mem::size_of::<HidrawDevInfo>(),
);

pub(crate) const fn hidiocgrawname(len: usize) -> libc::c_ulong {
    ioctl_code(IOC_READ, HIDRAW_IOCTL_TYPE, HIDIOC_NR_GRAWNAME, len)
}

pub(crate) const fn hidiocgfeature(len: usize) -> libc::c_ulong {
    ioctl_code(
        IOC_READ | IOC_WRITE,
        HIDRAW_IOCTL_TYPE,
        HIDIOC_NR_GFEATURE,
        len,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // Values from <linux/hidraw.h> on x86_64.
    #[test]
    fn request_numbers_match_kernel_headers() {
        assert_eq!(HIDIOCGRDESCSIZE, 0x8004_4801);
        assert_eq!(HIDIOCGRDESC, 0x9004_4802);
        assert_eq!(HIDIOCGRAWINFO, 0x8008_4803);
        assert_eq!(hidiocgrawname(128), 0x8080_4804);
        assert_eq!(hidiocgfeature(4096), 0xD000_4807);
    }

    #[test]
    fn devinfo_is_eight_bytes() {
        assert_eq!(std::mem::size_of::<HidrawDevInfo>(), 8);
    }
}
