//! Functions to read and write mappings in the legacy "Tiny v1" format.
//!
//! A Tiny v1 file starts with a `v1` header listing the namespaces, followed by flat `CLASS`, `FIELD` and
//! `METHOD` lines. Fields and methods name their owner class by its name in the first namespace:
//! ```txt,ignore
//! v1	official	named
//! CLASS	a	org/example/Hello
//! FIELD	a	I	b	count
//! METHOD	a	()V	c	greet
//! ```
//!
//! Writing only supports translation tables (`Mappings<2>`). Only entries that have a deobfuscated name are written.

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use anyhow::{Context, Result};
use log::trace;
use crate::error::MappingsError;
use crate::lines::Line;
use crate::lines::tiny_line::TinyLine;
use crate::name::{ClassName, FieldDescriptor, FieldName, MethodDescriptor, MethodName};
use crate::tree::mappings::{MappingInfo, Mappings};
use crate::tree::names::Names;
use crate::tree::NodeInfo;
use crate::writer::{check_descriptors, Member, WriterConfig};

#[allow(clippy::tabs_in_doc_comments)]
/// Reads the tiny v1 format, from the given reader.
///
/// Owner classes of fields and methods don't need to be declared before, they're created if they don't exist yet.
/// Empty names are read as "no name".
///
/// ```
/// use nib::tree::mappings::Mappings;
/// let string = "\
/// v1	official	named
/// CLASS	a	Hello
/// METHOD	a	()V	b	greet
/// ";
///
/// let mappings: Mappings<2> = nib::tiny_v1::read(string.as_bytes()).unwrap();
///
/// mappings.info.namespaces.check_that(["official", "named"]).unwrap();
/// assert_eq!(mappings.classes.len(), 1);
/// assert_eq!(mappings.classes["a"].methods.len(), 1);
/// ```
pub fn read<const N: usize>(reader: impl Read) -> Result<Mappings<N>> {
	if N < 2 {
		return Err(MappingsError::format(0, format!("must read at least two namespaces, {N} is less than that")).into());
	}

	let mut lines = BufReader::new(reader)
		.lines()
		.enumerate()
		.filter(|(line_number, line)| match line {
			Ok(line) if line.is_empty() => {
				trace!("skipping empty line {}", line_number + 1);
				false
			},
			_ => true,
		})
		.map(|(line_number, line)| -> Result<TinyLine> {
			TinyLine::new(line_number + 1, &line?)
		});

	let header = lines.next().ok_or_else(|| MappingsError::format(1, "no header line"))??;

	if header.first_field != "v1" {
		return Err(header.error(format!("header isn't a tiny v1 header: {header:?}")));
	}

	let namespaces = header.into_namespaces()?;

	let mut mappings = Mappings::new(MappingInfo { namespaces });

	for line in lines {
		let mut line = line?;
		let line_number = line.get_line_number();

		if line.get_idents() != 0 {
			return Err(line.error("tiny v1 lines must not be indented"));
		}

		match line.first_field.as_str() {
			"CLASS" => {
				let names: Names<N, ClassName> = line.into_names()?;
				let name = first_name(&names, line_number)?;

				mappings.get_or_create_class(name).info.names = names;
			},
			"FIELD" => {
				let owner = ClassName::from(line.next()?);
				let desc = Some(line.next()?).filter(|x| !x.is_empty()).map(FieldDescriptor::from);
				let names: Names<N, FieldName> = line.into_names()?;
				let name = first_name(&names, line_number)?;

				mappings.get_or_create_class(owner)
					.get_or_create_field(name, desc)
					.info.names = names;
			},
			"METHOD" => {
				let owner = ClassName::from(line.next()?);
				let desc = line.next()?;
				if desc.is_empty() {
					return Err(line.error("method descriptor must not be empty"));
				}
				let desc = MethodDescriptor::from(desc);
				let names: Names<N, MethodName> = line.into_names()?;
				let name = first_name(&names, line_number)?;

				mappings.get_or_create_class(owner)
					.get_or_create_method(name, desc)
					.info.names = names;
			},
			tag => {
				return Err(MappingsError::format(line_number, format!("unknown record tag {tag:?}")).into());
			},
		}
	}

	Ok(mappings)
}

pub(crate) fn first_name<const N: usize, T: Clone>(names: &Names<N, T>, line_number: usize) -> Result<T> {
	names.names()[0].clone()
		.ok_or_else(|| MappingsError::format(line_number, "the name in the first namespace must not be empty").into())
}

#[allow(clippy::tabs_in_doc_comments)]
/// Writes the given translation table to the given writer, in the tiny v1 format.
///
/// The header is written with the namespace names `from` and `to`. All classes having a deobfuscated name are
/// written first, then all fields having one, then all methods having one. Each of these is sorted with the
/// comparators of the given [`WriterConfig`].
///
/// Fails with [`MappingsError::MissingDescriptor`] if a field or method that would be written has no descriptor. This is
/// checked before anything is written.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use nib::writer::WriterConfig;
/// let input = "\
/// v1	official	named
/// METHOD	b	()V	a	run
/// CLASS	b	Second
/// FIELD	a	I	a	count
/// CLASS	a	First
/// ";
///
/// let mappings = nib::tiny_v1::read(input.as_bytes()).unwrap();
///
/// let mut buf: Vec<u8> = Vec::new();
/// nib::tiny_v1::write(&mappings, "official", "named", &WriterConfig::default(), &mut buf).unwrap();
///
/// let output = "\
/// v1	official	named
/// CLASS	a	First
/// CLASS	b	Second
/// FIELD	a	I	a	count
/// METHOD	b	()V	a	run
/// ";
///
/// assert_eq!(String::from_utf8(buf).unwrap(), output);
/// ```
pub fn write(mappings: &Mappings<2>, from: &str, to: &str, config: &WriterConfig, w: &mut impl Write) -> Result<()> {
	check_descriptors(mappings)?;

	let mut classes = Vec::new();
	let mut fields = Vec::new();
	let mut methods = Vec::new();

	for (owner, class) in &mappings.classes {
		if class.info.names.dst().is_some() {
			classes.push(class);
		}
		for member in class.fields.values().filter(|x| x.info.names.dst().is_some()) {
			fields.push(Member { owner, member });
		}
		for member in class.methods.values().filter(|x| x.info.names.dst().is_some()) {
			methods.push(Member { owner, member });
		}
	}

	config.sort_classes(&mut classes);
	config.sort_fields(&mut fields);
	config.sort_methods(&mut methods);

	// the buffering makes it much faster
	let mut w = BufWriter::new(w);

	writeln!(w, "v1\t{from}\t{to}")?;

	for class in classes {
		if let (Some(src), Some(dst)) = (class.info.names.src(), class.info.names.dst()) {
			writeln!(w, "CLASS\t{src}\t{dst}")?;
		}
	}

	for Member { owner, member } in fields {
		if let (Some(src), Some(dst), Some(desc)) = (member.info.names.src(), member.info.names.dst(), &member.info.desc) {
			writeln!(w, "FIELD\t{owner}\t{desc}\t{src}\t{dst}")?;
		}
	}

	for Member { owner, member } in methods {
		if let (Some(src), Some(dst)) = (member.info.names.src(), member.info.names.dst()) {
			writeln!(w, "METHOD\t{owner}\t{}\t{src}\t{dst}", member.info.desc)?;
		}
	}

	w.flush().context("failed to flush tiny v1 output")?;

	Ok(())
}
