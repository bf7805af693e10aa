//! What writing translation tables in either format has in common: the order of the entries, the nesting of
//! inner classes, and the checks done before anything is written.

use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use anyhow::Result;
use indexmap::IndexMap;
use crate::error::MappingsError;
use crate::name::{split_inner_class_parent_and_name, ClassName};
use crate::tree::mappings::{ClassNowodeMapping, FieldNowodeMapping, Mappings, MethodNowodeMapping};

/// A field or method together with the class declaring it.
///
/// The link to the owner is only used to get the fully qualified name of the member.
#[derive(Debug)]
pub struct Member<'a, T> {
	pub owner: &'a ClassName,
	pub member: &'a T,
}

impl Member<'_, FieldNowodeMapping<2>> {
	/// The fully qualified obfuscated name, `owner/name`.
	pub fn full_obfuscated_name(&self) -> String {
		full_member_name(self.owner, self.member.info.names.src().map(|x| x.as_str()))
	}
}

impl Member<'_, MethodNowodeMapping<2>> {
	/// The fully qualified obfuscated name, `owner/name`.
	pub fn full_obfuscated_name(&self) -> String {
		full_member_name(self.owner, self.member.info.names.src().map(|x| x.as_str()))
	}
}

fn full_member_name(owner: &ClassName, name: Option<&str>) -> String {
	format!("{owner}/{}", name.unwrap_or(""))
}

pub type ClassComparator = Box<dyn Fn(&ClassNowodeMapping<2>, &ClassNowodeMapping<2>) -> Ordering>;
pub type FieldComparator = Box<dyn Fn(&Member<'_, FieldNowodeMapping<2>>, &Member<'_, FieldNowodeMapping<2>>) -> Ordering>;
pub type MethodComparator = Box<dyn Fn(&Member<'_, MethodNowodeMapping<2>>, &Member<'_, MethodNowodeMapping<2>>) -> Ordering>;

/// The order entries are written in.
///
/// The default orders everything by the fully qualified obfuscated name, methods with their descriptor appended.
/// Parameters are always ordered by their index.
pub struct WriterConfig {
	pub class_order: ClassComparator,
	pub field_order: FieldComparator,
	pub method_order: MethodComparator,
}

impl Default for WriterConfig {
	fn default() -> Self {
		WriterConfig {
			class_order: Box::new(compare_classes),
			field_order: Box::new(compare_fields),
			method_order: Box::new(compare_methods),
		}
	}
}

fn compare_classes(a: &ClassNowodeMapping<2>, b: &ClassNowodeMapping<2>) -> Ordering {
	a.info.names.src().cmp(&b.info.names.src())
}

fn compare_fields(a: &Member<'_, FieldNowodeMapping<2>>, b: &Member<'_, FieldNowodeMapping<2>>) -> Ordering {
	a.full_obfuscated_name().cmp(&b.full_obfuscated_name())
		.then_with(|| a.member.info.desc.cmp(&b.member.info.desc))
}

fn compare_methods(a: &Member<'_, MethodNowodeMapping<2>>, b: &Member<'_, MethodNowodeMapping<2>>) -> Ordering {
	let a = a.full_obfuscated_name() + a.member.info.desc.as_str();
	let b = b.full_obfuscated_name() + b.member.info.desc.as_str();
	a.cmp(&b)
}

impl Debug for WriterConfig {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WriterConfig").finish_non_exhaustive()
	}
}

impl WriterConfig {
	pub(crate) fn sort_classes(&self, classes: &mut [&ClassNowodeMapping<2>]) {
		classes.sort_by(|a, b| (self.class_order)(a, b));
	}

	pub(crate) fn sort_fields(&self, fields: &mut [Member<'_, FieldNowodeMapping<2>>]) {
		fields.sort_by(|a, b| (self.field_order)(a, b));
	}

	pub(crate) fn sort_methods(&self, methods: &mut [Member<'_, MethodNowodeMapping<2>>]) {
		methods.sort_by(|a, b| (self.method_order)(a, b));
	}
}

/// Fails if a field or method that would be written has no descriptor.
///
/// Runs before anything is written, so that there's no partial output.
pub(crate) fn check_descriptors(mappings: &Mappings<2>) -> Result<()> {
	let missing = |class: &ClassName, member: Option<&str>| -> anyhow::Error {
		MappingsError::MissingDescriptor {
			class: class.to_string(),
			member: member.unwrap_or_default().to_owned(),
		}.into()
	};

	for (class_name, class) in &mappings.classes {
		for field in class.fields.values() {
			let has_desc = field.info.desc.as_ref().is_some_and(|desc| !desc.as_str().is_empty());
			if !has_desc && field.info.names.dst().is_some() {
				return Err(missing(class_name, field.info.names.src().map(|x| x.as_str())));
			}
		}
		for method in class.methods.values() {
			if method.info.desc.as_str().is_empty() && method.has_mappings() {
				return Err(missing(class_name, method.info.names.src().map(|x| x.as_str())));
			}
		}
	}
	Ok(())
}

/// The classes of a mapping tree, nested by their inner class relation.
///
/// A class is an inner class of the longest `$` separated prefix of its name that's a class in the tree. If there's
/// no such prefix, it's a top level class.
#[derive(Debug)]
pub(crate) struct ClassHierarchy<'a> {
	pub(crate) top_level: Vec<&'a ClassNowodeMapping<2>>,
	inner: IndexMap<&'a str, Vec<&'a ClassNowodeMapping<2>>>,
}

impl<'a> ClassHierarchy<'a> {
	pub(crate) fn new(mappings: &'a Mappings<2>) -> ClassHierarchy<'a> {
		let mut top_level = Vec::new();
		let mut inner: IndexMap<&str, Vec<_>> = IndexMap::new();

		for (name, class) in &mappings.classes {
			match outer_class(mappings, name.as_str()) {
				Some(outer) => inner.entry(outer).or_default().push(class),
				None => top_level.push(class),
			}
		}

		ClassHierarchy { top_level, inner }
	}

	pub(crate) fn inner_classes(&self, class: &ClassName) -> &[&'a ClassNowodeMapping<2>] {
		self.inner.get(class.as_str()).map(|x| x.as_slice()).unwrap_or(&[])
	}

	/// Whether the class, or any of its (nested) inner classes has mappings.
	pub(crate) fn has_mappings(&self, class: &ClassNowodeMapping<2>) -> bool {
		class.has_mappings() || class.info.names.src()
			.is_some_and(|name| self.inner_classes(name).iter().any(|inner| self.has_mappings(inner)))
	}
}

fn outer_class<'a>(mappings: &'a Mappings<2>, name: &str) -> Option<&'a str> {
	let mut name = name;
	while let Some((parent, _)) = split_inner_class_parent_and_name(name) {
		if let Some((key, _)) = mappings.classes.get_key_value(parent) {
			return Some(key.as_str());
		}
		name = parent;
	}
	None
}

/// The fully qualified deobfuscated name of a class.
///
/// If the class has no deobfuscated name, the name is made up from the outer class' deobfuscated name and the
/// obfuscated inner class name. Without an outer class in the tree, the obfuscated name is used.
pub(crate) fn full_deobfuscated_name(mappings: &Mappings<2>, class: &ClassName) -> ClassName {
	if let Some(dst) = mappings.get_class(class.as_str()).and_then(|c| c.info.names.dst()) {
		return dst.clone();
	}

	match outer_class(mappings, class.as_str()) {
		Some(outer) => {
			// the part of the name after the outer class, possibly containing `$` itself
			let inner_name = &class.as_str()[outer.len() + 1..];
			let outer = full_deobfuscated_name(mappings, &ClassName::from(outer));
			ClassName::from_inner_class(&outer, inner_name)
		},
		None => class.clone(),
	}
}
