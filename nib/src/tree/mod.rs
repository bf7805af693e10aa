use anyhow::{bail, Result};
use crate::tree::names::{Names, Namespace};

pub mod mappings;

pub trait NodeInfo<I> {
	fn get_node_info(&self) -> &I;
	fn get_node_info_mut(&mut self) -> &mut I;
	fn new(info: I) -> Self;
}

pub trait FromKey<K> {
	fn from_key(key: K) -> Self;
}

pub trait GetNames<const N: usize, T> {
	fn get_names(&self) -> &Names<N, T>;
	fn get_names_mut(&mut self) -> &mut Names<N, T>;

	/// Sets the name in the given namespace, returning the previous one. Setting a name twice overwrites it.
	///
	/// The first namespace can't be changed like this, as it needs to be kept in sync with the keys.
	fn set_name(&mut self, namespace: Namespace<N>, name: Option<T>) -> Result<Option<T>> {
		if namespace.0 == 0 {
			bail!("cannot edit the first namespace, as it needs to be kept in sync with the keys");
		}
		Ok(std::mem::replace(&mut self.get_names_mut()[namespace], name))
	}

	fn get_name(&self, namespace: Namespace<N>) -> Option<&T> {
		self.get_names()[namespace].as_ref()
	}
}

pub mod names {
	use std::fmt::{Debug, Formatter};
	use std::ops::{Index, IndexMut};
	use anyhow::{anyhow, bail, Context, Error, Result};
	use crate::error::MappingsError;

	/// Describes a given namespace of a mapping tree.
	///
	/// This object exists to remove out of bounds checks. If this object exists from a given mapping (obtained via
	/// [`Namespaces::get_namespace`]), no range checking is necessary.
	#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
	pub struct Namespace<const N: usize>(pub(super) usize);

	impl<const N: usize> Namespace<N> {
		pub fn new(id: usize) -> Result<Namespace<N>> {
			if id >= N {
				bail!("cannot create namespace with id larger or equal to number of namespaces: {id} >= {N}");
			}
			Ok(Namespace(id))
		}

		/// The namespace every entry is keyed by.
		pub fn first() -> Namespace<N> {
			Namespace(0)
		}
	}

	/// A struct storing the names of the namespaces.
	///
	/// Implements the [Index] and [IndexMut] traits for [Namespace].
	#[derive(Clone, PartialEq)]
	pub struct Namespaces<const N: usize> {
		names: [String; N]
	}

	impl<const N: usize> Index<Namespace<N>> for Namespaces<N> {
		type Output = String;

		fn index(&self, index: Namespace<N>) -> &Self::Output {
			&self.names[index.0]
		}
	}

	impl<const N: usize> IndexMut<Namespace<N>> for Namespaces<N> {
		fn index_mut(&mut self, index: Namespace<N>) -> &mut Self::Output {
			&mut self.names[index.0]
		}
	}

	impl<const N: usize> Namespaces<N> {
		pub fn names(&self) -> &[String; N] {
			&self.names
		}

		/// Finds the namespace with the given name.
		///
		/// Fails with [`MappingsError::Namespace`] if there's no such namespace.
		pub fn get_namespace(&self, name: &str) -> Result<Namespace<N>> {
			for (id, namespace) in self.names.iter().enumerate() {
				if namespace == name {
					return Ok(Namespace(id))
				}
			}
			Err(MappingsError::Namespace {
				namespace: name.to_owned(),
				available: self.names.to_vec(),
			}.into())
		}

		/// Returns an error if the names of `self` aren't the names given in the argument.
		/// This can be used to check that after reading mappings, you have the correct namespaces in them.
		pub fn check_that(&self, names: [&str; N]) -> Result<()> {
			if self.names != names {
				bail!("expected namespaces {names:?}, got {self:?}");
			}
			Ok(())
		}
	}

	impl<const N: usize> Debug for Namespaces<N> {
		fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
			f.debug_list()
				.entries(&self.names)
				.finish()
		}
	}

	impl<const N: usize> TryFrom<[String; N]> for Namespaces<N> {
		type Error = Error;

		fn try_from(value: [String; N]) -> Result<Self> {
			if value.iter().any(|i| i.is_empty()) {
				bail!("found empty namespace name in {value:?}, every namespace name must be non-empty");
			}

			Ok(Namespaces { names: value })
		}
	}

	impl<const N: usize> TryFrom<[&str; N]> for Namespaces<N> {
		type Error = Error;

		fn try_from(value: [&str; N]) -> Result<Self> {
			value.map(String::from).try_into()
		}
	}

	impl<const N: usize> From<Namespaces<N>> for [String; N] {
		fn from(value: Namespaces<N>) -> Self {
			value.names
		}
	}

	/// A struct storing names for namespaces.
	///
	/// A `None` means there's no name in that namespace. What that means is up to the user: this type never
	/// substitutes the name of another namespace.
	///
	/// Implements the [Index] and [IndexMut] traits for [Namespace].
	#[derive(Clone, PartialEq, PartialOrd, Eq, Ord)]
	pub struct Names<const N: usize, T> {
		names: [Option<T>; N],
	}

	impl<const N: usize, T> Index<Namespace<N>> for Names<N, T> {
		type Output = Option<T>;

		fn index(&self, index: Namespace<N>) -> &Self::Output {
			&self.names[index.0]
		}
	}

	impl<const N: usize, T> IndexMut<Namespace<N>> for Names<N, T> {
		fn index_mut(&mut self, index: Namespace<N>) -> &mut Self::Output {
			&mut self.names[index.0]
		}
	}

	impl<const N: usize, T> Names<N, T> {
		pub(crate) fn none() -> Names<N, T> {
			let names = std::array::from_fn(|_| None);
			Names { names }
		}

		pub(crate) fn from_first_name(src: T) -> Names<N, T> {
			let mut names = std::array::from_fn(|_| None);
			if let Some(zero) = names.first_mut() {
				*zero = Some(src);
			}
			Names { names }
		}

		pub fn first_name(&self) -> Result<&T> where T: Debug {
			self.names.first().context("N = 0 is too small for having a name in first namespace")?
				.as_ref().with_context(|| anyhow!("no name for the first namespace: {self:?}"))
		}

		pub fn names(&self) -> &[Option<T>; N] {
			&self.names
		}
	}

	impl<T> Names<2, T> {
		/// The name in the obfuscated role of a translation.
		pub fn src(&self) -> Option<&T> {
			self.names[0].as_ref()
		}

		/// The name in the deobfuscated role of a translation.
		pub fn dst(&self) -> Option<&T> {
			self.names[1].as_ref()
		}
	}

	impl<const N: usize, T: Debug> Debug for Names<N, T> {
		fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
			f.debug_list()
				.entries(&self.names)
				.finish()
		}
	}

	/// Note that empty inputs are converted into `None`.
	///
	/// Emptiness is determined by the `AsRef<str>` implementation, and then `.is_empty()`.
	impl<const N: usize, T> From<[T; N]> for Names<N, T> where T: AsRef<str> {
		fn from(value: [T; N]) -> Self {
			let names = value.map(|x| if x.as_ref().is_empty() { None } else { Some(x) });

			Names { names }
		}
	}

	impl<const N: usize, T> TryFrom<[Option<T>; N]> for Names<N, T> where T: AsRef<str> + Debug {
		type Error = Error;

		fn try_from(value: [Option<T>; N]) -> Result<Self> {
			if value.iter().any(|i| i.as_ref().is_some_and(|i| i.as_ref().is_empty())) {
				bail!("cannot create names where an existing name is an empty string: {value:?}");
			}

			Ok(Names { names: value })
		}
	}

	impl<const N: usize, T> From<Names<N, T>> for [Option<T>; N] {
		fn from(value: Names<N, T>) -> Self {
			value.names
		}
	}
}
