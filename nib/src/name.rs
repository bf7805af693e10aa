//! String like types for the names and descriptors stored in mappings.
//!
//! These don't check their contents: mapping files may contain names that a class file would reject, and
//! this crate only moves names around.

use std::fmt::{Display, Formatter};

macro_rules! make_name {
	(
		$( #[$doc:meta] )*
		$vis:vis $name:ident;
	) => {
		$( #[$doc] )*
		#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
		$vis struct $name(String);

		impl $name {
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl Display for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}

		// hashes like the inner `String`, so maps keyed by this can be queried with a `&str`
		impl std::borrow::Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}

		impl From<String> for $name {
			fn from(value: String) -> Self {
				$name(value)
			}
		}

		impl From<&str> for $name {
			fn from(value: &str) -> Self {
				$name(value.to_owned())
			}
		}

		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}

		impl PartialEq<str> for $name {
			fn eq(&self, other: &str) -> bool {
				self.0 == other
			}
		}

		impl PartialEq<&str> for $name {
			fn eq(&self, other: &&str) -> bool {
				self.0 == *other
			}
		}
	}
}

make_name!(
	/// Represents a fully qualified class name, like `org/example/Outer$Inner`.
	pub ClassName;
);
make_name!(
	pub FieldName;
);
make_name!(
	pub MethodName;
);
make_name!(
	pub ParameterName;
);
make_name!(
	/// A field descriptor, like `I` or `Ljava/lang/String;`.
	pub FieldDescriptor;
);
make_name!(
	/// A method descriptor, like `(ILjava/lang/String;)V`.
	pub MethodDescriptor;
);

impl ClassName {
	/// Creates a class name for joining together an inner class parent name and an inner class name.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use nib::name::ClassName;
	///
	/// let parent = ClassName::from("org/example/OuterClass");
	/// assert_eq!(ClassName::from_inner_class(&parent, "InnerClass"), "org/example/OuterClass$InnerClass");
	/// ```
	pub fn from_inner_class(parent: &ClassName, inner_name: &str) -> ClassName {
		let mut s = String::with_capacity(parent.0.len() + 1 + inner_name.len());
		s.push_str(&parent.0);
		s.push('$');
		s.push_str(inner_name);
		ClassName(s)
	}

	/// Gets the inner class parent name from a class name.
	///
	/// The inner class parent name is the part before the last `$`, in the last (`/`-separated) section.
	///
	/// ```
	/// use nib::name::ClassName;
	///
	/// assert_eq!(ClassName::from("org/example/A$B$C").get_inner_class_parent(), Some("org/example/A$B"));
	/// assert_eq!(ClassName::from("org/example/A").get_inner_class_parent(), None);
	/// ```
	pub fn get_inner_class_parent(&self) -> Option<&str> {
		self.split_inner_class_parent_and_name().map(|(parent, _)| parent)
	}

	/// Gets the inner class name from a class name, the part after the last `$`.
	///
	/// ```
	/// use nib::name::ClassName;
	///
	/// assert_eq!(ClassName::from("org/example/A$B$C").get_inner_class_name(), Some("C"));
	/// assert_eq!(ClassName::from("org/example/A$").get_inner_class_name(), None);
	/// ```
	pub fn get_inner_class_name(&self) -> Option<&str> {
		self.split_inner_class_parent_and_name().map(|(_, inner)| inner)
	}

	/// Splits the class name in the inner class parent name and the inner class name.
	pub fn split_inner_class_parent_and_name(&self) -> Option<(&str, &str)> {
		split_inner_class_parent_and_name(&self.0)
	}
}

pub(crate) fn split_inner_class_parent_and_name(name: &str) -> Option<(&str, &str)> {
	let (parent, inner) = name.rsplit_once('$')?;
	if !parent.is_empty() && !inner.is_empty() && !parent.ends_with('/') && !inner.contains('/') {
		Some((parent, inner))
	} else {
		None
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::name::ClassName;

	#[test]
	fn inner_class_split() {
		assert_eq!(ClassName::from("a$b").split_inner_class_parent_and_name(), Some(("a", "b")));
		assert_eq!(ClassName::from("org/a$b$c").split_inner_class_parent_and_name(), Some(("org/a$b", "c")));
		assert_eq!(ClassName::from("$b").split_inner_class_parent_and_name(), None);
		assert_eq!(ClassName::from("a$").split_inner_class_parent_and_name(), None);
		assert_eq!(ClassName::from("org/$b").split_inner_class_parent_and_name(), None);
		assert_eq!(ClassName::from("a$b/c").split_inner_class_parent_and_name(), None);
	}
}
