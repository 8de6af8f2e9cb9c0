//! # syxkit
//!
//! `syxkit` identifies MIDI System Exclusive messages, decodes known
//! device layouts into named parameter values, and builds messages back
//! from values with fresh checksums.
//!
//! ```no_run
//! let message = syxkit::load("rom1a.syx")?;
//! println!("{} {:?} {:?}", message.manufacturer_name().unwrap_or("?"),
//!     message.device(), message.type_name());
//! for name in message.item_names()?.unwrap_or_default() {
//!     println!("{}", name);
//! }
//! # Ok::<(), syxkit::SysexError>(())
//! ```

pub mod behringer;
pub mod checksum;
pub mod dispatch;
pub mod error;
pub mod field;
pub mod format;
pub mod framing;
pub mod manufacturer;
pub mod message;
pub mod pattern;
pub mod roland;
pub mod universal;
pub mod yamaha;

use std::fs;
use std::path::Path;

pub use error::{MalformedInput, Result, SysexError};
pub use field::{Field, FieldSet, NumericField, TextField, ValidationFailure, Value};
pub use format::Format;
pub use framing::{join, split};
pub use manufacturer::{Manufacturer, ManufacturerGroup, Originator};
pub use message::{Kind, Message};
pub use universal::UniversalKind;

/// Manufacturer specific SysEx message initiator.
pub const INITIATOR: u8 = 0xf0;

/// Manufacturer specific SysEx message terminator.
pub const TERMINATOR: u8 = 0xf7;

/// Development/non-commercial SysEx manufacturer ID.
pub const DEVELOPMENT: u8 = 0x7d;

/// Universal non-real-time SysEx message indicator.
pub const NON_REAL_TIME: u8 = 0x7e;

/// Universal real-time SysEx message indicator.
pub const REAL_TIME: u8 = 0x7f;

/// Identifies `data` as a single or composite message.
pub fn parse(data: &[u8], name: Option<&str>) -> Result<Message> {
    dispatch::parse(data, name)
}

/// Reads and identifies a file. The file name without extension
/// becomes the message name.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Message> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let name = path.file_stem().map(|s| s.to_string_lossy().into_owned());
    parse(&data, name.as_deref())
}
