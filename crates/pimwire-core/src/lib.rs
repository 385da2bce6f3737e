//! Boundary types shared between the interchange codecs and a host PIM
//! store: record kinds and field codes, the in-memory record value
//! store, the recurrence rule value type, the timestamp service and the
//! capability-query traits.

pub mod error;
pub mod fields;
pub mod item;
pub mod repeat;
pub mod source;
pub mod support;
pub mod time;

pub use error::{CoreError, CoreResult};
pub use fields::RecordKind;
pub use item::{FieldEntry, FieldValue, PimRecord};
pub use repeat::{Frequency, RepeatRule};
pub use source::{LineSource, StrLineSource};
pub use support::{AllFields, FieldSupport};
