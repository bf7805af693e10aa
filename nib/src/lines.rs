use std::cmp::Ordering;
use std::fmt::Debug;
use std::iter::Peekable;
use anyhow::{anyhow, Context, Result};
use crate::error::MappingsError;

pub(crate) trait Line: Debug {
	fn get_idents(&self) -> usize;
	fn get_line_number(&self) -> usize;
}

/// Iterates over the lines of one indentation level, stopping at the first line with less indentation.
pub(super) struct WithMoreIdentIter<'a, I: Iterator> {
	depth: usize,
	iter: &'a mut Peekable<I>,
}

impl<'a, I, L> WithMoreIdentIter<'a, I>
where
	I: Iterator<Item=Result<L>>,
	L: Line,
{
	pub(super) fn new(iter: &'a mut Peekable<I>) -> WithMoreIdentIter<'a, I> {
		WithMoreIdentIter { depth: 0, iter }
	}

	pub(super) fn next_level(&mut self) -> WithMoreIdentIter<'_, I> {
		WithMoreIdentIter {
			depth: self.depth + 1,
			iter: self.iter,
		}
	}

	pub(super) fn on_every_line(mut self, mut f: impl FnMut(&mut Self, L) -> Result<()>) -> Result<()> {
		while let Some(line) = self.next() {
			let line = line?;
			let line_number = line.get_line_number();

			f(&mut self, line)
				.with_context(|| anyhow!("in line {line_number}"))?;
		}
		Ok(())
	}
}

impl<I, L> Iterator for WithMoreIdentIter<'_, I>
where
	I: Iterator<Item=Result<L>>,
	L: Line,
{
	type Item = Result<L>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.iter.peek()? {
			Ok(line) => {
				match line.get_idents().cmp(&self.depth) {
					Ordering::Less => None, // cancel an inner loop
					Ordering::Equal => self.iter.next(), // actually give back the value
					Ordering::Greater => Some(Err(MappingsError::format(
						line.get_line_number(),
						format!("expected an indentation of {}, got {}: {line:?}", self.depth, line.get_idents()),
					).into())),
				}
			},
			Err(_) => self.iter.next(),
		}
	}
}


pub(crate) mod tiny_line {
	use anyhow::Result;
	use crate::error::MappingsError;
	use crate::lines::Line;
	use crate::tree::names::{Names, Namespaces};

	/// One line of a tab separated mappings file, with the leading tabs counted and cut off.
	#[derive(Debug)]
	pub(crate) struct TinyLine {
		line_number: usize,
		idents: usize,
		pub(crate) first_field: String,
		fields: std::vec::IntoIter<String>,
	}

	impl TinyLine {
		pub(crate) fn new(line_number: usize, line: &str) -> Result<TinyLine> {
			// '\t' is a single byte, so the count is also a byte index
			let idents = line.bytes().take_while(|x| *x == b'\t').count();
			let line = &line[idents..];

			let mut fields = line.split('\t').map(|x| x.to_owned());

			let first_field = fields.next()
				.ok_or_else(|| MappingsError::format(line_number, "no first field"))?;

			let vec: Vec<String> = fields.collect();

			Ok(TinyLine {
				line_number,
				idents,
				first_field,
				fields: vec.into_iter(),
			})
		}

		pub(crate) fn error(&self, message: impl Into<String>) -> anyhow::Error {
			MappingsError::format(self.line_number, message).into()
		}

		pub(crate) fn next(&mut self) -> Result<String> {
			match self.fields.next() {
				Some(field) => Ok(field),
				None => Err(self.error(format!("expected another field: {self:?}"))),
			}
		}

		pub(crate) fn into_namespaces<const N: usize>(self) -> Result<Namespaces<N>> {
			let line_number = self.line_number;
			<[String; N]>::try_from(self.fields.collect::<Vec<String>>())
				.map_err(|vec| anyhow::Error::from(MappingsError::format(line_number,
					format!("contained more or less namespaces ({}) than the expected {N}: {vec:?}", vec.len()))))
				.and_then(|array| Namespaces::try_from(array)
					.map_err(|e| anyhow::Error::from(MappingsError::format(line_number, format!("{e:#}")))))
		}

		/// Takes all remaining fields as names, one for each namespace. Empty fields become `None`.
		pub(crate) fn into_names<const N: usize, T>(self) -> Result<Names<N, T>>
		where
			T: From<String> + AsRef<str>,
		{
			let line_number = self.line_number;
			<[String; N]>::try_from(self.fields.collect::<Vec<String>>())
				.map(|array| Names::from(array.map(T::from)))
				.map_err(|vec| anyhow::Error::from(MappingsError::format(line_number,
					format!("contained more or less names ({}) than the expected {N}: {vec:?}", vec.len()))))
		}
	}

	impl Line for TinyLine {
		fn get_idents(&self) -> usize {
			self.idents
		}
		fn get_line_number(&self) -> usize {
			self.line_number
		}
	}

}
