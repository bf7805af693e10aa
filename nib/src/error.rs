//! The kinds of failures reading, writing and joining mappings can run into.
//!
//! All functions of this crate return [`anyhow::Result`]. If the failure is one of the kinds below, the root cause
//! of the returned error is a [`MappingsError`], which you can get back with [`anyhow::Error::downcast_ref`]:
//!
//! ```
//! use nib::error::MappingsError;
//!
//! let input = "tiny\t2\t0\tnamespaceA\tnamespaceB\nx\tA\tB\n";
//! let error = nib::tiny_v2::read::<2>(input.as_bytes()).unwrap_err();
//!
//! assert!(matches!(error.downcast_ref::<MappingsError>(), Some(MappingsError::Format { line: 2, .. })));
//! ```
//!
//! Failures of the underlying reader or writer keep their [`std::io::Error`] as root cause.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingsError {
	/// A line of a mappings file doesn't have the expected shape.
	#[error("malformed input in line {line}: {message}")]
	Format {
		/// The one-based line number, `0` if the problem isn't tied to a line.
		line: usize,
		message: String,
	},
	/// A namespace was asked for that the mappings don't have.
	#[error("cannot find namespace {namespace:?}, only got {available:?}")]
	Namespace {
		namespace: String,
		available: Vec<String>,
	},
	/// A field or method can't be written because it doesn't have a descriptor.
	#[error("member {member:?} in class {class:?} has no descriptor, but writing it requires one")]
	MissingDescriptor {
		class: String,
		/// The obfuscated name of the field or method.
		member: String,
	},
}

impl MappingsError {
	pub(crate) fn format(line: usize, message: impl Into<String>) -> MappingsError {
		MappingsError::Format { line, message: message.into() }
	}
}
