//! Functions to read and write mappings in the "Tiny v2" format.
//!
//! # Reading
//! You can read a `.tiny` file using the [`read_file`] method, by passing a path.
//! If you already have a [`Read`]er, you can use the [`read`] method.
//!
//! It's recommended to check that the namespaces are indeed the ones expected.
//! See [`Namespaces::check_that`][crate::tree::names::Namespaces::check_that] for more info.
//!
//! # Writing
//! Writing is only supported for translation tables, that is `Mappings<2>`. There are the [`write`][fn@write] as
//! well as the [`write_vec`] and [`write_string`] methods.
//!
//! Inner classes are written as their own top level `c` lines, with their fully qualified names, directly after
//! the members of their outer class. Classes, methods and fields that carry no mappings are left out.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use log::{debug, trace};
use crate::error::MappingsError;
use crate::lines::tiny_line::TinyLine;
use crate::lines::{Line, WithMoreIdentIter};
use crate::name::{ClassName, FieldDescriptor, FieldName, MethodDescriptor, MethodName, ParameterName};
use crate::tiny_v1::first_name;
use crate::tree::mappings::{ClassNowodeMapping, MappingInfo, Mappings};
use crate::tree::names::Names;
use crate::tree::NodeInfo;
use crate::writer::{check_descriptors, full_deobfuscated_name, ClassHierarchy, Member, WriterConfig};

/// Reads a `.tiny` file (tiny v2), by opening the file given by the path.
///
/// It's recommended to check that the namespaces are indeed the ones expected.
pub fn read_file<const N: usize>(path: impl AsRef<Path>) -> Result<Mappings<N>> {
	read(File::open(&path)?)
		.with_context(|| anyhow!("failed to read mappings file {:?} as tiny v2 file", path.as_ref()))
}

#[allow(clippy::tabs_in_doc_comments)]
/// Reads the tiny v2 format, from the given reader.
///
/// Comment lines are accepted and ignored. Empty names are read as "no name". Entries that are declared more than
/// once are merged, with the names of the last declaration.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use nib::tree::mappings::Mappings;
/// let string = "\
/// tiny	2	0	namespaceA	namespaceB	namespaceC
/// c	A	B	C
/// 	c	a class comment
/// 	f	LA;	a	b	c
/// 	m	(LA;)V	a	b	c
/// 		p	1	x	y	z
/// ";
///
/// let reader = &mut string.as_bytes();
/// let mappings: Mappings<3> = nib::tiny_v2::read(reader).unwrap();
///
/// mappings.info.namespaces.check_that(["namespaceA", "namespaceB", "namespaceC"]).unwrap();
/// assert_eq!(mappings.classes.len(), 1);
/// assert_eq!(mappings.classes["A"].fields.len(), 1);
/// ```
pub fn read<const N: usize>(reader: impl Read) -> Result<Mappings<N>> {
	if N < 2 {
		return Err(MappingsError::format(0, format!("must read at least two namespaces, {N} is less than that")).into());
	}

	let mut lines = BufReader::new(reader)
		.lines()
		.enumerate()
		.map(|(line_number, line)| -> Result<TinyLine> {
			TinyLine::new(line_number + 1, &line?)
		})
		.peekable();

	let mut header = lines.next().ok_or_else(|| MappingsError::format(1, "no header line"))??;

	if header.first_field != "tiny" || header.next()? != "2" || header.next()? != "0" {
		return Err(header.error(format!("header version isn't tiny v2.0: {header:?}")));
	}

	let namespaces = header.into_namespaces()?;

	let mut mappings = Mappings::new(MappingInfo { namespaces });

	WithMoreIdentIter::new(&mut lines).on_every_line(|iter, line| {
		let line_number = line.get_line_number();
		match line.first_field.as_str() {
			"c" => {
				let names: Names<N, ClassName> = line.into_names()?;
				let class = mappings.get_or_create_class(first_name(&names, line_number)?);
				class.info.names = names;

				iter.next_level().on_every_line(|iter, mut line| {
					let line_number = line.get_line_number();
					match line.first_field.as_str() {
						"f" => {
							let desc = Some(line.next()?).filter(|x| !x.is_empty()).map(FieldDescriptor::from);
							let names: Names<N, FieldName> = line.into_names()?;
							let field = class.get_or_create_field(first_name(&names, line_number)?, desc);
							field.info.names = names;

							iter.next_level().on_every_line(|_, line| skip_comment(line))
						},
						"m" => {
							let desc = line.next()?;
							if desc.is_empty() {
								return Err(line.error("method descriptor must not be empty"));
							}
							let desc = MethodDescriptor::from(desc);
							let names: Names<N, MethodName> = line.into_names()?;
							let method = class.get_or_create_method(first_name(&names, line_number)?, desc);
							method.info.names = names;

							iter.next_level().on_every_line(|iter, mut line| {
								match line.first_field.as_str() {
									"p" => {
										let index = line.next()?;
										let index: usize = index.parse()
											.map_err(|e| line.error(format!("invalid parameter index {index:?}: {e}")))?;
										let names: Names<N, ParameterName> = line.into_names()?;
										method.get_or_create_parameter(index).info.names = names;

										iter.next_level().on_every_line(|_, line| skip_comment(line))
									},
									_ => skip_comment(line),
								}
							})
						},
						_ => skip_comment(line),
					}
				})
			},
			tag => Err(line.error(format!("unknown record tag {tag:?}"))),
		}
	}).context("reading lines")?;

	Ok(mappings)
}

fn skip_comment(line: TinyLine) -> Result<()> {
	if line.first_field == "c" {
		trace!("ignoring comment in line {}", line.get_line_number());
		Ok(())
	} else {
		Err(line.error(format!("unknown record tag {:?}", line.first_field)))
	}
}

/// Writes the given mappings into a `String`, in the tiny v2 format.
///
/// The namespace names of the mappings are used for the header, and entries are ordered with the default
/// [`WriterConfig`].
///
/// This method is of most use in test cases, where you also use the `pretty_assertions` crate for viewing string diffs.
pub fn write_string(mappings: &Mappings<2>) -> Result<String> {
	let vec = write_vec(mappings)?;
	String::from_utf8(vec).context("failed to convert written mappings to utf8")
}

/// Writes the given mappings into a `Vec<u8>`, in the tiny v2 format.
///
/// Note that there's also the helper method [`write_string`] that also tries to convert the `Vec<u8>` into a `String`.
pub fn write_vec(mappings: &Mappings<2>) -> Result<Vec<u8>> {
	let [from, to] = mappings.info.namespaces.names();
	let mut vec = Vec::new();
	write(mappings, from, to, &WriterConfig::default(), &mut vec)?;
	Ok(vec)
}

#[allow(clippy::tabs_in_doc_comments)]
/// Writes the given translation table to the given writer, in the tiny v2 format.
///
/// The header is written with the namespace names `from` and `to`. Within a class, methods come before fields, and
/// the class' inner classes follow after them. A method that's only written because one of its parameters has a
/// name keeps its obfuscated name.
///
/// Fails with [`MappingsError::MissingDescriptor`] if a field or method that would be written has no descriptor. This is
/// checked before anything is written.
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use nib::tree::mappings::Mappings;
/// use nib::writer::WriterConfig;
/// let input = concat!(
///     "tiny\t2\t0\tofficial\tnamed\n",
///     "c\tb\tSecond\n",
///     "c\ta$c\t\n",
///     "\tf\tI\tx\tcount\n",
///     "c\ta\tFirst\n",
///     "\tf\tI\tb\tb\n",
///     "\tm\t()V\tc\tc\n",
///     "\tm\t(I)V\td\t\n",
///     "\t\tp\t1\t\tvalue\n",
///     "c\te\t\n",
/// );
///
/// let mappings: Mappings<2> = nib::tiny_v2::read(input.as_bytes()).unwrap();
///
/// let mut buf: Vec<u8> = Vec::new();
/// nib::tiny_v2::write(&mappings, "official", "named", &WriterConfig::default(), &mut buf).unwrap();
///
/// let output = "\
/// tiny	2	0	official	named
/// c	a	First
/// 	m	()V	c	c
/// 	m	(I)V	d	d
/// 		p	1		value
/// 	f	I	b	b
/// c	a$c	First$c
/// 	f	I	x	count
/// c	b	Second
/// ";
///
/// assert_eq!(String::from_utf8(buf).unwrap(), output);
/// ```
pub fn write(mappings: &Mappings<2>, from: &str, to: &str, config: &WriterConfig, w: &mut impl Write) -> Result<()> {
	check_descriptors(mappings)?;

	let hierarchy = ClassHierarchy::new(mappings);

	// the buffering makes it much faster
	let mut w = BufWriter::new(w);

	writeln!(w, "tiny\t2\t0\t{from}\t{to}")?;

	write_classes(&mut w, mappings, &hierarchy, config, &hierarchy.top_level)?;

	w.flush().context("failed to flush tiny v2 output")?;

	Ok(())
}

fn write_classes(
	w: &mut impl Write,
	mappings: &Mappings<2>,
	hierarchy: &ClassHierarchy,
	config: &WriterConfig,
	classes: &[&ClassNowodeMapping<2>],
) -> Result<()> {
	let mut classes: Vec<_> = classes.iter()
		.copied()
		.filter(|class| hierarchy.has_mappings(class))
		.collect();
	config.sort_classes(&mut classes);

	for class in classes {
		let Some(owner) = class.info.names.src() else {
			debug!("skipping class without obfuscated name: {class:?}");
			continue;
		};

		writeln!(w, "c\t{owner}\t{}", full_deobfuscated_name(mappings, owner))?;

		let mut methods: Vec<_> = class.methods.values()
			.filter(|method| method.has_mappings())
			.map(|member| Member { owner, member })
			.collect();
		config.sort_methods(&mut methods);

		for Member { member: method, .. } in methods {
			let Some(src) = method.info.names.src() else { continue };
			let dst = method.info.names.dst().unwrap_or(src);
			writeln!(w, "\tm\t{}\t{src}\t{dst}", method.info.desc)?;

			let mut parameters: Vec<_> = method.parameters.values()
				.filter_map(|parameter| parameter.info.names.dst().map(|dst| (parameter.info.index, dst)))
				.collect();
			parameters.sort_by_key(|(index, _)| *index);

			for (index, dst) in parameters {
				writeln!(w, "\t\tp\t{index}\t\t{dst}")?;
			}
		}

		let mut fields: Vec<_> = class.fields.values()
			.filter(|field| field.info.names.dst().is_some())
			.map(|member| Member { owner, member })
			.collect();
		config.sort_fields(&mut fields);

		for Member { member: field, .. } in fields {
			if let (Some(src), Some(dst), Some(desc)) = (field.info.names.src(), field.info.names.dst(), &field.info.desc) {
				writeln!(w, "\tf\t{desc}\t{src}\t{dst}")?;
			}
		}

		write_classes(w, mappings, hierarchy, config, hierarchy.inner_classes(owner))?;
	}

	Ok(())
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::error::MappingsError;
	use crate::tree::mappings::Mappings;

	#[test]
	fn comments_are_ignored() -> anyhow::Result<()> {
		let input = concat!(
			"tiny\t2\t0\tofficial\tnamed\n",
			"c\ta\tHello\n",
			"\tc\tthe class\n",
			"\tf\tI\tb\tcount\n",
			"\t\tc\tthe field\n",
			"\tm\t()V\tc\tgreet\n",
			"\t\tc\tthe method\n",
			"\t\tp\t0\t\targ0\n",
			"\t\t\tc\tthe parameter\n",
		);
		let mappings: Mappings<2> = super::read(input.as_bytes())?;

		let class = &mappings.classes["a"];
		assert_eq!(class.fields.len(), 1);
		assert_eq!(class.methods.len(), 1);
		let method = &class.methods[0];
		assert_eq!(method.parameters.len(), 1);
		assert_eq!(method.parameters[0].info.names.dst().map(|x| x.as_str()), Some("arg0"));
		assert_eq!(method.parameters[0].info.names.src(), None);
		Ok(())
	}

	#[test]
	fn redeclared_class_is_merged() -> anyhow::Result<()> {
		let input = concat!(
			"tiny\t2\t0\tofficial\tnamed\n",
			"c\ta\tFirst\n",
			"\tf\tI\tb\tcount\n",
			"c\ta\tSecond\n",
			"\tm\t()V\tc\tgreet\n",
		);
		let mappings: Mappings<2> = super::read(input.as_bytes())?;

		assert_eq!(mappings.classes.len(), 1);
		let class = &mappings.classes["a"];
		assert_eq!(class.info.names.dst().map(|x| x.as_str()), Some("Second"));
		assert_eq!(class.fields.len(), 1);
		assert_eq!(class.methods.len(), 1);
		Ok(())
	}

	#[test]
	fn elided_class() -> anyhow::Result<()> {
		let mappings: Mappings<2> = super::read("tiny\t2\t0\tofficial\tnamed\nc\ta\t\n".as_bytes())?;
		assert_eq!(mappings.classes.len(), 1);

		assert_eq!(super::write_string(&mappings)?, "tiny\t2\t0\tofficial\tnamed\n");
		Ok(())
	}

	fn format_error_line(input: &str) -> Option<usize> {
		match super::read::<2>(input.as_bytes()) {
			Err(e) => match e.downcast_ref::<MappingsError>() {
				Some(MappingsError::Format { line, .. }) => Some(*line),
				_ => None,
			},
			Ok(_) => None,
		}
	}

	#[test]
	fn malformed() {
		assert_eq!(format_error_line(""), Some(1));
		assert_eq!(format_error_line("tiny\t2\t1\tofficial\tnamed\n"), Some(1));
		assert_eq!(format_error_line("v1\tofficial\tnamed\n"), Some(1));
		assert_eq!(format_error_line("tiny\t2\t0\tofficial\tnamed\nx\ta\tb\n"), Some(2));
		assert_eq!(format_error_line("tiny\t2\t0\tofficial\tnamed\nc\ta\tb\n\tx\ta\tb\n"), Some(3));
		assert_eq!(format_error_line("tiny\t2\t0\tofficial\tnamed\nc\ta\tb\tc\n"), Some(2));
		assert_eq!(format_error_line("tiny\t2\t0\tofficial\tnamed\nc\ta\tb\n\t\tf\tI\ta\tb\n"), Some(3));
		assert_eq!(format_error_line("tiny\t2\t0\tofficial\tnamed\nc\ta\tb\n\tm\t()V\ta\tb\n\t\tp\tx\t\tc\n"), Some(4));
		assert_eq!(format_error_line("tiny\t2\t0\tofficial\tnamed\n\n"), Some(2));
	}
}
