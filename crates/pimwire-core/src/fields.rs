//! Field, attribute and class codes for the three record kinds.
//!
//! Codes are small integers namespaced per record kind; the interchange
//! codecs map them to and from the textual property labels. The numbering
//! follows the JSR-75 constants so records exchanged with existing device
//! stores keep their identities.

/// The kind of PIM record a field code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RecordKind {
    Contact,
    Event,
    Todo,
}

impl RecordKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Event => "event",
            Self::Todo => "todo",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact field codes.
pub mod contact {
    pub const ADDR: u32 = 100;
    pub const BIRTHDAY: u32 = 101;
    pub const CLASS: u32 = 102;
    pub const EMAIL: u32 = 103;
    pub const FORMATTED_ADDR: u32 = 104;
    pub const FORMATTED_NAME: u32 = 105;
    pub const NAME: u32 = 106;
    pub const NICKNAME: u32 = 107;
    pub const NOTE: u32 = 108;
    pub const ORG: u32 = 109;
    pub const PHOTO: u32 = 110;
    pub const PHOTO_URL: u32 = 111;
    pub const PUBLIC_KEY: u32 = 112;
    pub const PUBLIC_KEY_STRING: u32 = 113;
    pub const REVISION: u32 = 114;
    pub const TEL: u32 = 115;
    pub const TITLE: u32 = 116;
    pub const UID: u32 = 117;
    pub const URL: u32 = 118;

    /// Number of parts in a NAME string array.
    pub const NAME_SIZE: usize = 5;
    /// Number of parts in an ADDR string array.
    pub const ADDR_SIZE: usize = 7;
}

/// Event field codes.
pub mod event {
    pub const ALARM: u32 = 100;
    pub const CLASS: u32 = 101;
    pub const END: u32 = 102;
    pub const LOCATION: u32 = 103;
    pub const NOTE: u32 = 104;
    pub const REVISION: u32 = 105;
    pub const START: u32 = 106;
    pub const SUMMARY: u32 = 107;
    pub const UID: u32 = 108;
}

/// To-do field codes.
pub mod todo {
    pub const CLASS: u32 = 100;
    pub const COMPLETED: u32 = 101;
    pub const COMPLETION_DATE: u32 = 102;
    pub const DUE: u32 = 103;
    pub const NOTE: u32 = 104;
    pub const PRIORITY: u32 = 105;
    pub const REVISION: u32 = 106;
    pub const SUMMARY: u32 = 107;
    pub const UID: u32 = 108;
}

/// Contact attribute qualifier flags. Combined as a bitmask per value.
pub mod attr {
    pub const NONE: u32 = 0;
    pub const ASST: u32 = 1;
    pub const AUTO: u32 = 2;
    pub const FAX: u32 = 4;
    pub const HOME: u32 = 8;
    pub const MOBILE: u32 = 16;
    pub const OTHER: u32 = 32;
    pub const PAGER: u32 = 64;
    pub const PREFERRED: u32 = 128;
    pub const SMS: u32 = 256;
    pub const WORK: u32 = 512;
}

/// Access class values, shared in shape across record kinds.
pub mod class {
    pub const CONFIDENTIAL: u32 = 200;
    pub const PRIVATE: u32 = 201;
    pub const PUBLIC: u32 = 202;
}
