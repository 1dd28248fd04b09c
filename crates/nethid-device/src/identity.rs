use bytes::{Buf, BufMut};

/// Largest report descriptor the kernel accepts.
pub const HID_MAX_DESCRIPTOR_SIZE: usize = 4096;

/// Largest report payload carried by a uhid event.
pub const UHID_DATA_MAX: usize = 4096;

/// Fixed size of a device name record.
pub const NAME_CAPACITY: usize = 128;

/// Size of an identity record on the wire.
pub const IDENTITY_WIRE_SIZE: usize = 8;

/// Bus type, vendor and product of a HID device, as the driver reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceIdentity {
    pub bus_type: i32,
    pub vendor: u16,
    pub product: u16,
}

impl DeviceIdentity {
    /// Encode as the driver's native 8-byte record: bus (4), vendor (2),
    /// product (2), host byte order.
    pub fn to_wire(&self) -> [u8; IDENTITY_WIRE_SIZE] {
        let mut out = [0u8; IDENTITY_WIRE_SIZE];
        let mut dst = &mut out[..];
        dst.put_i32_ne(self.bus_type);
        dst.put_u16_ne(self.vendor);
        dst.put_u16_ne(self.product);
        out
    }

    /// Decode the native 8-byte record.
    pub fn from_wire(src: &[u8; IDENTITY_WIRE_SIZE]) -> Self {
        let mut src = &src[..];
        Self {
            bus_type: src.get_i32_ne(),
            vendor: src.get_u16_ne(),
            product: src.get_u16_ne(),
        }
    }
}

impl std::fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "bus {:#04x} vendor {:04x} product {:04x}",
            self.bus_type, self.vendor, self.product
        )
    }
}

/// Render a raw name record for humans: up to the first NUL, lossy UTF-8.
pub fn display_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_layout_matches_hidraw_devinfo() {
        let identity = DeviceIdentity {
            bus_type: 0x03,
            vendor: 0x046d,
            product: 0xc52b,
        };
        let wire = identity.to_wire();
        assert_eq!(wire[..4], 3i32.to_ne_bytes());
        assert_eq!(wire[4..6], 0x046du16.to_ne_bytes());
        assert_eq!(wire[6..], 0xc52bu16.to_ne_bytes());
    }

    #[test]
    fn identity_survives_the_wire() {
        let identity = DeviceIdentity {
            bus_type: -1,
            vendor: u16::MAX,
            product: 1,
        };
        assert_eq!(DeviceIdentity::from_wire(&identity.to_wire()), identity);
    }

    #[test]
    fn display_name_stops_at_nul() {
        let mut raw = [0u8; NAME_CAPACITY];
        raw[..8].copy_from_slice(b"Keyboard");
        assert_eq!(display_name(&raw), "Keyboard");
    }

    #[test]
    fn display_name_without_nul() {
        assert_eq!(display_name(b"abc"), "abc");
    }
}
