//! Wire codecs between PIM records and their interchange text formats.
//!
//! Contacts travel as vCard 2.1 or 3.0, events and to-dos as
//! vCalendar 1.0. The codecs share one property-line grammar, one
//! attribute resolver and hand-rolled Base64 and Quoted-Printable
//! transforms whose lenient edge behavior existing device data relies
//! on.

pub mod charset;
pub mod encoding;
pub mod error;
pub mod line;
pub mod resolve;
pub mod rrule;
pub mod vcalendar;
pub mod vcard;

pub use charset::Charset;
pub use error::{FormatError, FormatErrorKind, FormatResult};
pub use line::{PropertyLine, is_end_of_record};
pub use resolve::Encoding;
pub use vcard::VCardVersion;

#[cfg(test)]
mod tests;
