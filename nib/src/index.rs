//! Lookup of the entries of a mapping tree by their name in one namespace.

use indexmap::IndexMap;
use log::debug;
use crate::tree::mappings::{ClassNowodeMapping, FieldNowodeMapping, Mappings, MethodNowodeMapping};
use crate::tree::names::Namespace;

/// Maps the names in one namespace to the classes, fields and methods declaring them.
///
/// Fields and methods are indexed over the whole tree, not per class: this relies on names in the indexed namespace
/// being unique across the tree, as intermediate names are. If two entries of the same kind share a name anyway,
/// the one inserted last wins.
///
/// Entries without a name in the namespace aren't indexed.
#[derive(Debug)]
pub struct NamespaceIndex<'a, const N: usize> {
	classes: IndexMap<&'a str, &'a ClassNowodeMapping<N>>,
	fields: IndexMap<&'a str, &'a FieldNowodeMapping<N>>,
	methods: IndexMap<&'a str, &'a MethodNowodeMapping<N>>,
}

impl<'a, const N: usize> NamespaceIndex<'a, N> {
	pub fn new(mappings: &'a Mappings<N>, namespace: Namespace<N>) -> NamespaceIndex<'a, N> {
		let mut classes = IndexMap::new();
		let mut fields = IndexMap::new();
		let mut methods = IndexMap::new();

		for class in mappings.classes.values() {
			if let Some(name) = &class.info.names[namespace] {
				if classes.insert(name.as_str(), class).is_some() {
					debug!("class name {name:?} is declared twice, keeping the last one");
				}
			}

			for field in class.fields.values() {
				if let Some(name) = &field.info.names[namespace] {
					if fields.insert(name.as_str(), field).is_some() {
						debug!("field name {name:?} is declared twice, keeping the last one");
					}
				}
			}

			for method in class.methods.values() {
				if let Some(name) = &method.info.names[namespace] {
					if methods.insert(name.as_str(), method).is_some() {
						debug!("method name {name:?} is declared twice, keeping the last one");
					}
				}
			}
		}

		NamespaceIndex { classes, fields, methods }
	}

	pub fn class(&self, name: &str) -> Option<&'a ClassNowodeMapping<N>> {
		self.classes.get(name).copied()
	}

	pub fn field(&self, name: &str) -> Option<&'a FieldNowodeMapping<N>> {
		self.fields.get(name).copied()
	}

	pub fn method(&self, name: &str) -> Option<&'a MethodNowodeMapping<N>> {
		self.methods.get(name).copied()
	}
}
