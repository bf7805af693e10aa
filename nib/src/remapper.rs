//! Remapping of class names and descriptors between namespaces.
//!
//! Fields and methods only store their descriptor in the first namespace of a mapping tree. The descriptor in any
//! other namespace is obtained by replacing the class names inside it, see [`ARemapper`] and
//! [`Mappings::remapper_a`].
//!
//! # What is a "remapper"?
//! A remapper answers the question for you "what is the name of X in namespace Y?"

use anyhow::Result;
use indexmap::IndexMap;
use crate::error::MappingsError;
use crate::name::{ClassName, FieldDescriptor, MethodDescriptor};
use crate::tree::mappings::Mappings;
use crate::tree::names::Namespace;

/// A remapper supporting remapping of class names and descriptors.
pub trait ARemapper {
	/// Maps a class name to a new one, if the mapping exists.
	///
	/// If the mapping doesn't exist, returns `Ok(None)`.
	fn map_class_fail(&self, class: &str) -> Result<Option<ClassName>>;

	/// Maps a class name to a new one, if the mapping doesn't exist, return the old one.
	///
	/// Do not implement this yourself.
	fn map_class(&self, class: &str) -> Result<ClassName> {
		Ok(self.map_class_fail(class)?.unwrap_or_else(|| ClassName::from(class)))
	}

	/// Maps a field descriptor to a new one.
	///
	/// Note that this relies on the fact that for non-existing class mappings class names are just copied over.
	///
	/// Do not implement this yourself.
	fn map_field_desc(&self, desc: &FieldDescriptor) -> Result<FieldDescriptor> {
		map_desc(self, desc.as_str()).map(FieldDescriptor::from)
	}

	/// Maps a method descriptor to a new one.
	///
	/// Note that this relies on the fact that for non-existing class mappings class names are just copied over.
	///
	/// Do not implement this yourself.
	fn map_method_desc(&self, desc: &MethodDescriptor) -> Result<MethodDescriptor> {
		map_desc(self, desc.as_str()).map(MethodDescriptor::from)
	}
}

/// Maps a descriptor to a new one, by replacing every `L...;` class reference in it.
fn map_desc(remapper: &(impl ARemapper + ?Sized), desc: &str) -> Result<String> {
	let mut s = String::with_capacity(desc.len());

	let mut iter = desc.chars();

	while let Some(ch) = iter.next() {
		s.push(ch);

		if ch == 'L' {
			let mut class_name = String::new();
			for ch in iter.by_ref() {
				class_name.push(ch);
				if ch == ';' {
					break;
				}
			}
			if class_name.pop() != Some(';') {
				return Err(MappingsError::format(0, format!("descriptor {desc:?} has a missing semicolon somewhere")).into());
			}

			let new_class_name = remapper.map_class(&class_name)?;

			s.push_str(new_class_name.as_str());
			s.push(';');
		}
	}

	Ok(s)
}

#[derive(Debug)]
pub struct ARemapperImpl<'a, const N: usize> {
	classes: IndexMap<&'a str, &'a ClassName>,
}

impl<const N: usize> ARemapper for ARemapperImpl<'_, N> {
	fn map_class_fail(&self, class: &str) -> Result<Option<ClassName>> {
		Ok(self.classes.get(class).map(|&class| class.clone()))
	}
}

impl<const N: usize> Mappings<N> {
	/// Creates a remapper for class names and descriptors from the namespace `from` to the namespace `to`.
	///
	/// Classes without a name in either namespace are left as they are.
	pub fn remapper_a(&self, from: Namespace<N>, to: Namespace<N>) -> ARemapperImpl<'_, N> {
		let mut classes = IndexMap::new();
		for class in self.classes.values() {
			if let (Some(from), Some(to)) = (&class.info.names[from], &class.info.names[to]) {
				classes.insert(from.as_str(), to);
			}
		}
		ARemapperImpl { classes }
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::error::MappingsError;
	use crate::name::{FieldDescriptor, MethodDescriptor};
	use crate::remapper::ARemapper;
	use crate::tree::mappings::{MappingInfo, Mappings};
	use crate::tree::names::Namespace;
	use crate::tree::{GetNames, NodeInfo};

	fn mappings() -> anyhow::Result<Mappings<2>> {
		let mut mappings = Mappings::new(MappingInfo { namespaces: ["official", "named"].try_into()? });
		let named = Namespace::new(1)?;
		mappings.get_or_create_class("a".into()).info.set_name(named, Some("org/example/Hello".into()))?;
		mappings.get_or_create_class("b".into());
		Ok(mappings)
	}

	#[test]
	fn remap_descriptors() -> anyhow::Result<()> {
		let mappings = mappings()?;
		let remapper = mappings.remapper_a(Namespace::first(), Namespace::new(1)?);

		assert_eq!(remapper.map_class("a")?, "org/example/Hello");
		assert_eq!(remapper.map_class("b")?, "b");
		assert_eq!(remapper.map_class("c")?, "c");

		assert_eq!(
			remapper.map_field_desc(&FieldDescriptor::from("[La;"))?,
			FieldDescriptor::from("[Lorg/example/Hello;")
		);
		assert_eq!(
			remapper.map_method_desc(&MethodDescriptor::from("(ILa;Lb;[J)La;"))?,
			MethodDescriptor::from("(ILorg/example/Hello;Lb;[J)Lorg/example/Hello;")
		);
		Ok(())
	}

	#[test]
	fn missing_semicolon() -> anyhow::Result<()> {
		let mappings = mappings()?;
		let remapper = mappings.remapper_a(Namespace::first(), Namespace::new(1)?);

		let error = remapper.map_method_desc(&MethodDescriptor::from("(La)V")).unwrap_err();
		assert!(matches!(error.downcast_ref::<MappingsError>(), Some(MappingsError::Format { .. })));
		Ok(())
	}
}
