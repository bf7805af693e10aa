//! Projecting a mapping tree with many namespaces onto a translation table.

use anyhow::{Context, Result};
use log::debug;
use crate::remapper::ARemapper;
use crate::tree::mappings::{MappingInfo, Mappings};
use crate::tree::names::{Names, Namespace};
use crate::tree::{GetNames, NodeInfo};

impl<const N: usize> Mappings<N> {
	/// Creates a translation table from the namespace `from` to the namespace `to`.
	///
	/// Classes, fields, methods and parameters are carried over, with the name in `from` becoming the obfuscated
	/// name and the name in `to` becoming the deobfuscated one. Descriptors are remapped into `from`. Entries that
	/// have no name in `from` can't be keyed and are left out (parameters are kept, with an empty obfuscated name).
	///
	/// Fails with [`MappingsError::Namespace`][crate::error::MappingsError::Namespace] before looking at any entry if
	/// either namespace doesn't exist.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use nib::tree::mappings::Mappings;
	/// let input = concat!(
	///     "tiny\t2\t0\tofficial\tintermediary\tnamed\n",
	///     "c\ta\tclass_1\tHello\n",
	///     "\tm\t(La;)V\tb\tmethod_2\tgreet\n",
	/// );
	/// let mappings: Mappings<3> = nib::tiny_v2::read(input.as_bytes()).unwrap();
	///
	/// let translated = mappings.translate("intermediary", "named").unwrap();
	///
	/// let class = &translated.classes["class_1"];
	/// assert_eq!(class.info.names.dst().unwrap(), "Hello");
	/// assert_eq!(class.methods[0].info.desc.as_str(), "(Lclass_1;)V");
	/// ```
	pub fn translate(&self, from: &str, to: &str) -> Result<Mappings<2>> {
		let from_namespace = self.get_namespace(from)?;
		let to_namespace = self.get_namespace(to)?;

		let remapper = self.remapper_a(Namespace::first(), from_namespace);
		let dst = Namespace::new(1)?;

		let mut translated: Mappings<2> = Mappings::new(MappingInfo { namespaces: [from, to].try_into()? });

		for class in self.classes.values() {
			let Some(name) = &class.info.names[from_namespace] else {
				debug!("skipping class without name in {from:?}: {:?}", class.info.names);
				continue;
			};

			let translated_class = translated.get_or_create_class(name.clone());
			translated_class.info.set_name(dst, class.info.names[to_namespace].clone())?;

			for field in class.fields.values() {
				let Some(field_name) = &field.info.names[from_namespace] else {
					debug!("skipping field without name in {from:?}: {:?}", field.info.names);
					continue;
				};
				let desc = field.info.desc.as_ref()
					.map(|desc| remapper.map_field_desc(desc))
					.transpose()
					.with_context(|| format!("failed to remap descriptor of field {field_name:?} in class {name:?}"))?;

				translated_class.get_or_create_field(field_name.clone(), desc)
					.info.set_name(dst, field.info.names[to_namespace].clone())?;
			}

			for method in class.methods.values() {
				let Some(method_name) = &method.info.names[from_namespace] else {
					debug!("skipping method without name in {from:?}: {:?}", method.info.names);
					continue;
				};
				let desc = remapper.map_method_desc(&method.info.desc)
					.with_context(|| format!("failed to remap descriptor of method {method_name:?} in class {name:?}"))?;

				let translated_method = translated_class.get_or_create_method(method_name.clone(), desc);
				translated_method.info.set_name(dst, method.info.names[to_namespace].clone())?;

				for parameter in method.parameters.values() {
					let names = [
						parameter.info.names[from_namespace].clone(),
						parameter.info.names[to_namespace].clone(),
					];
					translated_method.get_or_create_parameter(parameter.info.index)
						.info.names = Names::try_from(names)?;
				}
			}
		}

		Ok(translated)
	}
}
