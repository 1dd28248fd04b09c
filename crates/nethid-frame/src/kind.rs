//! Request kinds.
//!
//! The numeric tags are part of the wire format and must never be reordered.

/// The six request kinds the front side can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageKind {
    /// Fetch the report descriptor.
    ReportDescriptor = 0,
    /// Fetch bus type, vendor and product.
    Identity = 1,
    /// Fetch the 128-byte device name.
    Name = 2,
    /// Fetch a feature report; payload is one report-number byte.
    FeatureReport = 3,
    /// Deliver an output report. Not supported by the back side.
    Output = 4,
    /// Fetch the most recent pending input report, or wait for the next.
    QueuedReport = 5,
}

impl MessageKind {
    /// All kinds, in tag order.
    pub const ALL: [MessageKind; 6] = [
        MessageKind::ReportDescriptor,
        MessageKind::Identity,
        MessageKind::Name,
        MessageKind::FeatureReport,
        MessageKind::Output,
        MessageKind::QueuedReport,
    ];

    /// Decode a wire tag.
    pub fn from_wire(tag: u32) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }

    /// The wire tag.
    pub fn as_wire(self) -> u32 {
        self as u32
    }

    /// A human-readable name for logs.
    pub fn name(self) -> &'static str {
        match self {
            MessageKind::ReportDescriptor => "REPORT_DESCRIPTOR",
            MessageKind::Identity => "IDENTITY",
            MessageKind::Name => "NAME",
            MessageKind::FeatureReport => "FEATURE_REPORT",
            MessageKind::Output => "OUTPUT",
            MessageKind::QueuedReport => "QUEUED_REPORT",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_stable() {
        assert_eq!(MessageKind::ReportDescriptor.as_wire(), 0);
        assert_eq!(MessageKind::Identity.as_wire(), 1);
        assert_eq!(MessageKind::Name.as_wire(), 2);
        assert_eq!(MessageKind::FeatureReport.as_wire(), 3);
        assert_eq!(MessageKind::Output.as_wire(), 4);
        assert_eq!(MessageKind::QueuedReport.as_wire(), 5);
    }

    #[test]
    fn from_wire_matches_as_wire() {
        for kind in MessageKind::ALL {
            assert_eq!(MessageKind::from_wire(kind.as_wire()), Some(kind));
        }
    }

    #[test]
    fn unknown_tags_rejected() {
        assert_eq!(MessageKind::from_wire(6), None);
        assert_eq!(MessageKind::from_wire(u32::MAX), None);
    }
}
