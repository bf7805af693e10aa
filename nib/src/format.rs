//! Choosing between the two text formats.
//!
//! [`TinyFormat`] dispatches to the functions of [`tiny_v1`][crate::tiny_v1] and [`tiny_v2`][crate::tiny_v2]. The
//! format has to be known, there's no detection.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use crate::error::MappingsError;
use crate::tree::mappings::Mappings;
use crate::writer::WriterConfig;
use crate::{tiny_v1, tiny_v2};

/// A text format for mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TinyFormat {
	/// The flat, legacy format, with a `v1` header.
	V1,
	/// The nested format, with a `tiny 2 0` header.
	V2,
}

impl TinyFormat {
	/// Reads mappings with `N` namespaces.
	pub fn read<const N: usize>(self, reader: impl Read) -> Result<Mappings<N>> {
		match self {
			TinyFormat::V1 => tiny_v1::read(reader),
			TinyFormat::V2 => tiny_v2::read(reader),
		}
	}

	pub fn read_file<const N: usize>(self, path: impl AsRef<Path>) -> Result<Mappings<N>> {
		let path = path.as_ref();
		let file = File::open(path)
			.with_context(|| anyhow!("failed to open mappings file {path:?}"))?;
		self.read(file)
			.with_context(|| anyhow!("failed to read mappings file {path:?} as {self} file"))
	}

	/// Reads mappings with `N` namespaces, and makes a translation table from `from` to `to` out of them.
	///
	/// Fails with [`MappingsError::Namespace`] if one of the namespaces isn't in the input.
	///
	/// ```
	/// use nib::error::MappingsError;
	/// use nib::format::TinyFormat;
	/// let input = "tiny\t2\t0\tofficial\tintermediary\tnamed\nc\ta\tclass_1\tHello\n";
	///
	/// let mappings = TinyFormat::V2.read_translation::<3>(input.as_bytes(), "intermediary", "named").unwrap();
	/// assert_eq!(mappings.classes["class_1"].info.names.dst().unwrap(), "Hello");
	///
	/// let error = TinyFormat::V2.read_translation::<3>(input.as_bytes(), "official", "mojang").unwrap_err();
	/// assert!(matches!(error.downcast_ref::<MappingsError>(), Some(MappingsError::Namespace { .. })));
	/// ```
	pub fn read_translation<const N: usize>(self, reader: impl Read, from: &str, to: &str) -> Result<Mappings<2>> {
		self.read::<N>(reader)?.translate(from, to)
	}

	/// Writes the translation table with its own namespace names, ordered by the default [`WriterConfig`].
	pub fn write(self, mappings: &Mappings<2>, w: &mut impl Write) -> Result<()> {
		let [from, to] = mappings.info.namespaces.names();
		self.write_with(mappings, from, to, &WriterConfig::default(), w)
	}

	/// Writes the translation table, with the namespace names `from` and `to` in the header.
	pub fn write_with(self, mappings: &Mappings<2>, from: &str, to: &str, config: &WriterConfig, w: &mut impl Write) -> Result<()> {
		match self {
			TinyFormat::V1 => tiny_v1::write(mappings, from, to, config, w),
			TinyFormat::V2 => tiny_v2::write(mappings, from, to, config, w),
		}
	}

	pub fn write_string(self, mappings: &Mappings<2>) -> Result<String> {
		let mut vec = Vec::new();
		self.write(mappings, &mut vec)?;
		String::from_utf8(vec).context("failed to convert written mappings to utf8")
	}

	/// Writes the translation table to a file.
	///
	/// Everything is written into memory first, so that nothing touches the file if writing fails.
	pub fn write_file(self, mappings: &Mappings<2>, from: &str, to: &str, config: &WriterConfig, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();

		let mut vec = Vec::new();
		self.write_with(mappings, from, to, config, &mut vec)
			.with_context(|| anyhow!("failed to write mappings as {self}"))?;

		std::fs::write(path, vec)
			.with_context(|| anyhow!("failed to write mappings file {path:?}"))
	}

	/// Gets the number of namespaces declared in the header line of this format.
	///
	/// This allows choosing the right `N` for reading.
	///
	/// ```
	/// use nib::format::TinyFormat;
	///
	/// assert_eq!(TinyFormat::V1.namespace_count("v1\tofficial\tnamed\n").unwrap(), 2);
	/// assert_eq!(TinyFormat::V2.namespace_count("tiny\t2\t0\tofficial\tintermediary\tnamed").unwrap(), 3);
	/// assert!(TinyFormat::V2.namespace_count("v1\tofficial\tnamed").is_err());
	/// ```
	pub fn namespace_count(self, header_line: &str) -> Result<usize> {
		let header_line = header_line.trim_end_matches(['\r', '\n']);

		let prefix = match self {
			TinyFormat::V1 => "v1\t",
			TinyFormat::V2 => "tiny\t2\t0\t",
		};

		header_line.strip_prefix(prefix)
			.map(|namespaces| namespaces.split('\t').count())
			.ok_or_else(|| MappingsError::format(1, format!("header isn't a {self} header: {header_line:?}")).into())
	}
}

impl std::fmt::Display for TinyFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TinyFormat::V1 => f.write_str("tiny v1"),
			TinyFormat::V2 => f.write_str("tiny v2"),
		}
	}
}
