//! Joining two mapping trees through a namespace they share.
//!
//! Two independently produced mapping trees, say one from `official` to `intermediary` of one version and another
//! from `intermediary` to `named` of a different version, can be combined into a translation table, as long as the
//! intermediate names are stable. Classes, fields and methods are matched by their name in the shared namespace
//! only: a method whose descriptor changed between the two versions still matches.
//!
//! The lookup only happens in one direction, from the first tree into the second one. Joining the trees the other
//! way around doesn't give the inverse result in general.
//!
//! Parameters aren't joined.

use anyhow::{Context, Result};
use log::{debug, trace};
use crate::index::NamespaceIndex;
use crate::remapper::ARemapper;
use crate::tree::mappings::{MappingInfo, Mappings};
use crate::tree::names::Namespace;
use crate::tree::{GetNames, NodeInfo};

/// What the deobfuscated name becomes if an entry has no match in the other tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unmatched {
	/// There's no deobfuscated name.
	Absent,
	/// The obfuscated name is used.
	KeepName,
}

/// The namespaces of a join, already resolved in their trees.
struct JoinNamespaces<const A: usize, const B: usize> {
	from: Namespace<A>,
	/// The names of the first tree looked up in the index.
	probe: Namespace<A>,
	to: Namespace<B>,
	/// The names of the second tree the index is built from.
	key: Namespace<B>,
}

impl Mappings<2> {
	/// Joins two mapping trees into a translation table from `from` (a namespace of `tree_a`) to `to` (a namespace
	/// of `tree_b`).
	///
	/// Every class, field and method of `tree_a` with a name in `from` becomes an entry of the result, with that
	/// name as obfuscated name. Its name in `match_b` is looked up in an index of `tree_b` by the names in `match_a`.
	/// So `match_a` is a namespace of `tree_b`, and `match_b` one of `tree_a`. If there's a match, its name in `to`
	/// becomes the deobfuscated name. If there's no match, the entry doesn't get a deobfuscated name. Members are
	/// looked up in the whole of `tree_b`, not just in the matched class.
	///
	/// All four namespaces are resolved before anything else is done, failing with
	/// [`MappingsError::Namespace`][crate::error::MappingsError::Namespace] if one is missing.
	///
	/// The namespaces of the result are named `from` and `to`.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use nib::tree::mappings::Mappings;
	/// let a: Mappings<2> = nib::tiny_v2::read("tiny\t2\t0\tofficial\tintermediary\nc\ta\tI1\n".as_bytes()).unwrap();
	/// let b: Mappings<2> = nib::tiny_v2::read("tiny\t2\t0\tintermediary\tnamed\nc\tI1\tWorld\n".as_bytes()).unwrap();
	///
	/// let joined = Mappings::join(&a, "official", "intermediary", &b, "named", "intermediary").unwrap();
	///
	/// joined.info.namespaces.check_that(["official", "named"]).unwrap();
	/// assert_eq!(joined.classes["a"].info.names.dst().unwrap(), "World");
	/// ```
	pub fn join<const A: usize, const B: usize>(
		tree_a: &Mappings<A>,
		from: &str,
		match_a: &str,
		tree_b: &Mappings<B>,
		to: &str,
		match_b: &str,
	) -> Result<Mappings<2>> {
		let namespaces = JoinNamespaces {
			from: tree_a.get_namespace(from)?,
			probe: tree_a.get_namespace(match_b)?,
			to: tree_b.get_namespace(to)?,
			key: tree_b.get_namespace(match_a)?,
		};

		join_with(tree_a, tree_b, namespaces, [from, to], Unmatched::Absent)
	}

	/// Joins two mapping trees that share the namespace `matching`.
	///
	/// This is [`Mappings::join`] with `matching` for both `match_a` and `match_b`.
	pub fn join_shared<const A: usize, const B: usize>(
		tree_a: &Mappings<A>,
		from: &str,
		tree_b: &Mappings<B>,
		to: &str,
		matching: &str,
	) -> Result<Mappings<2>> {
		Mappings::join(tree_a, from, matching, tree_b, to, matching)
	}

	/// Migrates the names of `source` to the names of `target`, matching them through `matching`.
	///
	/// Both trees need to have the namespaces `matching` and `named`. This creates a translation table from the
	/// `named` names in `source` to the `named` names in `target`, which allows moving over everything that uses
	/// the names of `source`.
	///
	/// Unlike [`Mappings::join`], an entry that has no match in `target` keeps its name: the deobfuscated name is
	/// then the same as the obfuscated one. If there's a match without a `named` name, there's no deobfuscated name.
	///
	/// The namespaces of the result are named after `labels`.
	pub fn migrate<const A: usize, const B: usize>(
		source: &Mappings<A>,
		target: &Mappings<B>,
		matching: &str,
		named: &str,
		labels: [&str; 2],
	) -> Result<Mappings<2>> {
		let namespaces = JoinNamespaces {
			from: source.get_namespace(named)?,
			probe: source.get_namespace(matching)?,
			to: target.get_namespace(named)?,
			key: target.get_namespace(matching)?,
		};

		join_with(source, target, namespaces, labels, Unmatched::KeepName)
	}
}

fn join_with<const A: usize, const B: usize>(
	tree_a: &Mappings<A>,
	tree_b: &Mappings<B>,
	namespaces: JoinNamespaces<A, B>,
	labels: [&str; 2],
	unmatched: Unmatched,
) -> Result<Mappings<2>> {
	let JoinNamespaces { from, probe, to, key } = namespaces;

	let index = NamespaceIndex::new(tree_b, key);
	let remapper = tree_a.remapper_a(Namespace::first(), from);
	let dst = Namespace::new(1)?;

	// picks the deobfuscated name to set: the name of the match, or what to do without one
	// an entry without a match never replaces a name set before
	fn pick<T: Clone>(own: &T, matched: Option<Option<&T>>, unmatched: Unmatched, current: Option<&T>) -> Option<T> {
		match (matched, unmatched) {
			(Some(name), _) => name.cloned(),
			(None, Unmatched::KeepName) if current.is_none() => Some(own.clone()),
			(None, _) => None,
		}
	}

	let mut joined: Mappings<2> = Mappings::new(MappingInfo { namespaces: labels.try_into()? });

	for class_a in tree_a.classes.values() {
		let Some(class_name) = &class_a.info.names[from] else {
			debug!("skipping class without source name: {:?}", class_a.info.names);
			continue;
		};

		let matched = class_a.info.names[probe].as_ref()
			.and_then(|name| index.class(name.as_str()))
			.map(|class_b| class_b.info.names[to].as_ref());
		trace!("class {class_name:?} matched: {}", matched.is_some());

		let class = joined.get_or_create_class(class_name.clone());
		if let Some(name) = pick(class_name, matched, unmatched, class.info.names.dst()) {
			class.info.set_name(dst, Some(name))?;
		}

		for field_a in class_a.fields.values() {
			let Some(field_name) = &field_a.info.names[from] else {
				debug!("skipping field without source name in class {class_name:?}: {:?}", field_a.info.names);
				continue;
			};
			let desc = field_a.info.desc.as_ref()
				.map(|desc| remapper.map_field_desc(desc))
				.transpose()
				.with_context(|| format!("failed to remap descriptor of field {field_name:?} in class {class_name:?}"))?;

			let matched = field_a.info.names[probe].as_ref()
				.and_then(|name| index.field(name.as_str()))
				.map(|field_b| field_b.info.names[to].as_ref());

			let field = class.get_or_create_field(field_name.clone(), desc);
			if let Some(name) = pick(field_name, matched, unmatched, field.info.names.dst()) {
				field.info.set_name(dst, Some(name))?;
			}
		}

		for method_a in class_a.methods.values() {
			let Some(method_name) = &method_a.info.names[from] else {
				debug!("skipping method without source name in class {class_name:?}: {:?}", method_a.info.names);
				continue;
			};
			let desc = remapper.map_method_desc(&method_a.info.desc)
				.with_context(|| format!("failed to remap descriptor of method {method_name:?} in class {class_name:?}"))?;

			let matched = method_a.info.names[probe].as_ref()
				.and_then(|name| index.method(name.as_str()))
				.map(|method_b| method_b.info.names[to].as_ref());

			let method = class.get_or_create_method(method_name.clone(), desc);
			if let Some(name) = pick(method_name, matched, unmatched, method.info.names.dst()) {
				method.info.set_name(dst, Some(name))?;
			}
		}
	}

	Ok(joined)
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::error::MappingsError;
	use crate::tree::mappings::Mappings;

	fn old() -> anyhow::Result<Mappings<3>> {
		let input = concat!(
			"tiny\t2\t0\tofficial\tintermediary\tnamed\n",
			"c\ta\tclass_1\tHello\n",
			"\tf\tLa;\tb\tfield_1\tcount\n",
			"\tm\t()V\tc\tmethod_1\tgreet\n",
			"\t\tp\t0\t\t\tvalue\n",
			"c\tb\tclass_2\tGone\n",
		);
		crate::tiny_v2::read(input.as_bytes())
	}

	fn new() -> anyhow::Result<Mappings<3>> {
		let input = concat!(
			"tiny\t2\t0\tofficial\tintermediary\tnamed\n",
			"c\tx\tclass_1\tWorld\n",
			"\tf\tLx;\ty\tfield_1\tamount\n",
			"\tm\t(I)V\tz\tmethod_1\tsayHello\n",
			"c\tw\tclass_3\t\n",
		);
		crate::tiny_v2::read(input.as_bytes())
	}

	fn dst<T: AsRef<str>>(name: Option<&T>) -> Option<&str> {
		name.map(|x| x.as_ref())
	}

	#[test]
	fn join() -> anyhow::Result<()> {
		let old = old()?;
		let new = new()?;

		let joined = Mappings::join(&old, "official", "intermediary", &new, "named", "intermediary")?;
		joined.info.namespaces.check_that(["official", "named"])?;

		let class = &joined.classes["a"];
		assert_eq!(dst(class.info.names.dst()), Some("World"));
		assert_eq!(class.fields[0].info.desc.as_ref().map(|x| x.as_str()), Some("La;"));
		assert_eq!(dst(class.fields[0].info.names.dst()), Some("amount"));

		// matched by name only, the descriptor changed
		let method = &class.methods[0];
		assert_eq!(method.info.desc.as_str(), "()V");
		assert_eq!(dst(method.info.names.dst()), Some("sayHello"));
		assert!(method.parameters.is_empty());

		// no match, and no fallback to the source name
		assert_eq!(joined.classes["b"].info.names.dst(), None);
		Ok(())
	}

	#[test]
	fn join_is_not_symmetric() -> anyhow::Result<()> {
		let old = old()?;
		let new = new()?;

		let forward = Mappings::join_shared(&old, "official", &new, "named", "intermediary")?;
		let backward = Mappings::join_shared(&new, "official", &old, "named", "intermediary")?;

		assert_eq!(forward.classes.len(), 2);
		assert_eq!(backward.classes.len(), 2);
		assert!(forward.classes.contains_key("b"));
		assert!(backward.classes.contains_key("w"));
		assert_eq!(dst(backward.classes["x"].info.names.dst()), Some("Hello"));
		assert_eq!(backward.classes["w"].info.names.dst(), None);
		Ok(())
	}

	#[test]
	fn migrate() -> anyhow::Result<()> {
		let old = old()?;
		let new = new()?;

		let migrated = Mappings::migrate(&old, &new, "intermediary", "named", ["old", "new"])?;
		migrated.info.namespaces.check_that(["old", "new"])?;

		let class = &migrated.classes["Hello"];
		assert_eq!(dst(class.info.names.dst()), Some("World"));
		assert_eq!(class.fields[0].info.desc.as_ref().map(|x| x.as_str()), Some("LHello;"));
		assert_eq!(dst(class.fields[0].info.names.dst()), Some("amount"));
		assert_eq!(dst(class.methods[0].info.names.dst()), Some("sayHello"));

		// no match, keeps its own name
		assert_eq!(dst(migrated.classes["Gone"].info.names.dst()), Some("Gone"));
		Ok(())
	}

	#[test]
	fn join_with_different_matching_namespaces() -> anyhow::Result<()> {
		let a: Mappings<2> = crate::tiny_v2::read("tiny\t2\t0\tofficial\tinter_a\nc\ta\tI1\n".as_bytes())?;
		let b: Mappings<2> = crate::tiny_v2::read("tiny\t2\t0\tinter_b\tnamed\nc\tI1\tWorld\n".as_bytes())?;

		// `inter_b` indexes the second tree, the first tree is looked up with its `inter_a` names
		let joined = Mappings::join(&a, "official", "inter_b", &b, "named", "inter_a")?;
		assert_eq!(dst(joined.classes["a"].info.names.dst()), Some("World"));

		let error = Mappings::join(&a, "official", "inter_a", &b, "named", "inter_b").unwrap_err();
		match error.downcast_ref::<MappingsError>() {
			Some(MappingsError::Namespace { namespace, available }) => {
				assert_eq!(namespace, "inter_b");
				assert_eq!(available, &["official", "inter_a"]);
			},
			other => panic!("expected a namespace error, got {other:?}"),
		}
		Ok(())
	}

	#[test]
	fn unmatched_entry_keeps_earlier_match() -> anyhow::Result<()> {
		// both classes end up as `a`, but only the first one has a match
		let a: Mappings<3> = crate::tiny_v2::read(concat!(
			"tiny\t2\t0\tobf\tofficial\tintermediary\n",
			"c\tx\ta\tI1\n",
			"c\ty\ta\tI9\n",
		).as_bytes())?;
		let b: Mappings<2> = crate::tiny_v2::read("tiny\t2\t0\tintermediary\tnamed\nc\tI1\tWorld\n".as_bytes())?;

		let joined = Mappings::join_shared(&a, "official", &b, "named", "intermediary")?;
		assert_eq!(joined.classes.len(), 1);
		assert_eq!(dst(joined.classes["a"].info.names.dst()), Some("World"));
		Ok(())
	}

	#[test]
	fn missing_namespace_fails_fast() -> anyhow::Result<()> {
		let old = old()?;
		let new = new()?;

		let error = Mappings::join(&old, "official", "intermediary", &new, "named", "hashed").unwrap_err();
		match error.downcast_ref::<MappingsError>() {
			Some(MappingsError::Namespace { namespace, .. }) => assert_eq!(namespace, "hashed"),
			other => panic!("expected a namespace error, got {other:?}"),
		}
		Ok(())
	}
}
