use anyhow::Result;
use indexmap::IndexMap;
use crate::name::{ClassName, FieldDescriptor, FieldName, MethodDescriptor, MethodName, ParameterName};
use crate::tree::names::{Names, Namespace, Namespaces};
use crate::tree::{FromKey, GetNames, NodeInfo};

/// A mapping table: classes with their fields, methods and method parameters, each having a name per namespace.
///
/// Every class, field and method is keyed by its name in the first namespace. The first name is therefore always
/// present on these, and must not be changed after creation. Lookups go through the `get_or_create_*` methods,
/// which never duplicate an entry.
///
/// A `Mappings<2>` is used as a translation table: the first namespace holds the obfuscated names, the second
/// one the deobfuscated names. A missing second name means there's no known translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Mappings<const N: usize> {
	pub info: MappingInfo<N>,
	pub classes: IndexMap<ClassName, ClassNowodeMapping<N>>,
}

impl<const N: usize> NodeInfo<MappingInfo<N>> for Mappings<N> {
	fn get_node_info(&self) -> &MappingInfo<N> {
		&self.info
	}

	fn get_node_info_mut(&mut self) -> &mut MappingInfo<N> {
		&mut self.info
	}

	fn new(info: MappingInfo<N>) -> Self {
		Mappings {
			info,
			classes: IndexMap::new(),
		}
	}
}

impl<const N: usize> Mappings<N> {
	/// Returns the class with the given name in the first namespace, creating it if it doesn't exist yet.
	pub fn get_or_create_class(&mut self, name: ClassName) -> &mut ClassNowodeMapping<N> {
		self.classes.entry(name)
			.or_insert_with_key(|key| ClassNowodeMapping::new(ClassMapping::from_key(key.clone())))
	}

	pub fn get_class(&self, name: &str) -> Option<&ClassNowodeMapping<N>> {
		self.classes.get(name)
	}

	pub fn get_namespace(&self, name: &str) -> Result<Namespace<N>> {
		self.info.namespaces.get_namespace(name)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassNowodeMapping<const N: usize> {
	pub info: ClassMapping<N>,
	pub fields: IndexMap<FieldKey, FieldNowodeMapping<N>>,
	pub methods: IndexMap<MethodKey, MethodNowodeMapping<N>>,
}

impl<const N: usize> NodeInfo<ClassMapping<N>> for ClassNowodeMapping<N> {
	fn get_node_info(&self) -> &ClassMapping<N> {
		&self.info
	}

	fn get_node_info_mut(&mut self) -> &mut ClassMapping<N> {
		&mut self.info
	}

	fn new(info: ClassMapping<N>) -> Self {
		ClassNowodeMapping {
			info,
			fields: IndexMap::new(),
			methods: IndexMap::new(),
		}
	}
}

impl<const N: usize> ClassNowodeMapping<N> {
	pub fn get_or_create_field(&mut self, name: FieldName, desc: Option<FieldDescriptor>) -> &mut FieldNowodeMapping<N> {
		self.fields.entry(FieldKey { name, desc })
			.or_insert_with_key(|key| FieldNowodeMapping::new(FieldMapping::from_key(key.clone())))
	}

	pub fn get_or_create_method(&mut self, name: MethodName, desc: MethodDescriptor) -> &mut MethodNowodeMapping<N> {
		self.methods.entry(MethodKey { name, desc })
			.or_insert_with_key(|key| MethodNowodeMapping::new(MethodMapping::from_key(key.clone())))
	}
}

impl ClassNowodeMapping<2> {
	/// Whether this class, or any of its fields or methods carry a deobfuscated name.
	///
	/// Inner classes are stored as their own classes, see [`Mappings::classes`], and aren't considered here.
	pub fn has_mappings(&self) -> bool {
		self.info.names.dst().is_some() ||
			self.fields.values().any(|field| field.info.names.dst().is_some()) ||
			self.methods.values().any(MethodNowodeMapping::has_mappings)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldNowodeMapping<const N: usize> {
	pub info: FieldMapping<N>,
}

impl<const N: usize> NodeInfo<FieldMapping<N>> for FieldNowodeMapping<N> {
	fn get_node_info(&self) -> &FieldMapping<N> {
		&self.info
	}

	fn get_node_info_mut(&mut self) -> &mut FieldMapping<N> {
		&mut self.info
	}

	fn new(info: FieldMapping<N>) -> FieldNowodeMapping<N> {
		FieldNowodeMapping { info }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodNowodeMapping<const N: usize> {
	pub info: MethodMapping<N>,
	pub parameters: IndexMap<ParameterKey, ParameterNowodeMapping<N>>,
}

impl<const N: usize> NodeInfo<MethodMapping<N>> for MethodNowodeMapping<N> {
	fn get_node_info(&self) -> &MethodMapping<N> {
		&self.info
	}

	fn get_node_info_mut(&mut self) -> &mut MethodMapping<N> {
		&mut self.info
	}

	fn new(info: MethodMapping<N>) -> Self {
		MethodNowodeMapping {
			info,
			parameters: IndexMap::new(),
		}
	}
}

impl<const N: usize> MethodNowodeMapping<N> {
	pub fn get_or_create_parameter(&mut self, index: usize) -> &mut ParameterNowodeMapping<N> {
		self.parameters.entry(ParameterKey { index })
			.or_insert_with_key(|key| ParameterNowodeMapping::new(ParameterMapping::from_key(key.clone())))
	}
}

impl MethodNowodeMapping<2> {
	/// Whether this method, or any of its parameters carry a deobfuscated name.
	pub fn has_mappings(&self) -> bool {
		self.info.names.dst().is_some() ||
			self.parameters.values().any(|parameter| parameter.info.names.dst().is_some())
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNowodeMapping<const N: usize> {
	pub info: ParameterMapping<N>,
}

impl<const N: usize> NodeInfo<ParameterMapping<N>> for ParameterNowodeMapping<N> {
	fn get_node_info(&self) -> &ParameterMapping<N> {
		&self.info
	}

	fn get_node_info_mut(&mut self) -> &mut ParameterMapping<N> {
		&mut self.info
	}

	fn new(info: ParameterMapping<N>) -> ParameterNowodeMapping<N> {
		ParameterNowodeMapping { info }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingInfo<const N: usize> {
	pub namespaces: Namespaces<N>,
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord)]
pub struct ClassMapping<const N: usize> {
	pub names: Names<N, ClassName>,
}

impl<const N: usize> GetNames<N, ClassName> for ClassMapping<N> {
	fn get_names(&self) -> &Names<N, ClassName> {
		&self.names
	}

	fn get_names_mut(&mut self) -> &mut Names<N, ClassName> {
		&mut self.names
	}
}

impl<const N: usize> FromKey<ClassName> for ClassMapping<N> {
	fn from_key(key: ClassName) -> ClassMapping<N> {
		ClassMapping {
			names: Names::from_first_name(key),
		}
	}
}

/// The key of a field inside a class.
///
/// A field may have no descriptor: that's only a problem when writing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
	pub name: FieldName,
	pub desc: Option<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord)]
pub struct FieldMapping<const N: usize> {
	/// The descriptor in the first namespace.
	pub desc: Option<FieldDescriptor>,
	pub names: Names<N, FieldName>,
}

impl<const N: usize> GetNames<N, FieldName> for FieldMapping<N> {
	fn get_names(&self) -> &Names<N, FieldName> {
		&self.names
	}

	fn get_names_mut(&mut self) -> &mut Names<N, FieldName> {
		&mut self.names
	}
}

impl<const N: usize> FromKey<FieldKey> for FieldMapping<N> {
	fn from_key(key: FieldKey) -> FieldMapping<N> {
		FieldMapping {
			desc: key.desc,
			names: Names::from_first_name(key.name),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodKey {
	pub name: MethodName,
	pub desc: MethodDescriptor,
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord)]
pub struct MethodMapping<const N: usize> {
	/// The descriptor in the first namespace.
	pub desc: MethodDescriptor,
	pub names: Names<N, MethodName>,
}

impl<const N: usize> GetNames<N, MethodName> for MethodMapping<N> {
	fn get_names(&self) -> &Names<N, MethodName> {
		&self.names
	}

	fn get_names_mut(&mut self) -> &mut Names<N, MethodName> {
		&mut self.names
	}
}

impl<const N: usize> FromKey<MethodKey> for MethodMapping<N> {
	fn from_key(key: MethodKey) -> MethodMapping<N> {
		MethodMapping {
			desc: key.desc,
			names: Names::from_first_name(key.name),
		}
	}
}

/// Parameters are keyed by their zero-based position alone, so unlike the other entries they don't need a name
/// in the first namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterKey {
	pub index: usize,
}

#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord)]
pub struct ParameterMapping<const N: usize> {
	pub index: usize,
	pub names: Names<N, ParameterName>,
}

impl<const N: usize> GetNames<N, ParameterName> for ParameterMapping<N> {
	fn get_names(&self) -> &Names<N, ParameterName> {
		&self.names
	}

	fn get_names_mut(&mut self) -> &mut Names<N, ParameterName> {
		&mut self.names
	}
}

impl<const N: usize> FromKey<ParameterKey> for ParameterMapping<N> {
	fn from_key(key: ParameterKey) -> ParameterMapping<N> {
		ParameterMapping {
			index: key.index,
			names: Names::none(),
		}
	}
}
