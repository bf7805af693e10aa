use anyhow::Result;
use pretty_assertions::assert_eq;
use nib::error::MappingsError;
use nib::format::TinyFormat;
use nib::tree::mappings::{MappingInfo, Mappings};
use nib::tree::names::Namespace;
use nib::tree::{GetNames, NodeInfo};

#[test]
fn round_trip() -> Result<()> {
	let input = include_str!("round_trip.tiny");

	let mappings: Mappings<2> = nib::tiny_v2::read(input.as_bytes())?;
	let written = nib::tiny_v2::write_string(&mappings)?;

	assert_eq!(written, input, "left: written, right: input");

	let read_again: Mappings<2> = nib::tiny_v2::read(written.as_bytes())?;
	assert_eq!(read_again, mappings);

	Ok(())
}

#[test]
fn read_v1_class() -> Result<()> {
	let mappings: Mappings<2> = TinyFormat::V1.read("v1\tofficial\tnamed\nCLASS\ta\tHello\n".as_bytes())?;

	mappings.info.namespaces.check_that(["official", "named"])?;
	assert_eq!(mappings.classes.len(), 1);

	let class = &mappings.classes["a"];
	assert_eq!(class.info.names.src().map(|x| x.as_str()), Some("a"));
	assert_eq!(class.info.names.dst().map(|x| x.as_str()), Some("Hello"));

	Ok(())
}

#[test]
fn read_v2_parameter() -> Result<()> {
	let input = "tiny\t2\t0\tofficial\tnamed\nc\ta\tHello\n\tm\t()V\tb\tgreet\n\t\tp\t0\t\targ0\n";
	let mappings: Mappings<2> = TinyFormat::V2.read(input.as_bytes())?;

	let class = &mappings.classes["a"];
	assert_eq!(class.info.names.dst().map(|x| x.as_str()), Some("Hello"));

	let method = &class.methods[0];
	assert_eq!(method.info.desc.as_str(), "()V");
	assert_eq!(method.info.names.src().map(|x| x.as_str()), Some("b"));
	assert_eq!(method.info.names.dst().map(|x| x.as_str()), Some("greet"));

	let parameter = &method.parameters[0];
	assert_eq!(parameter.info.index, 0);
	assert_eq!(parameter.info.names.dst().map(|x| x.as_str()), Some("arg0"));

	Ok(())
}

#[test]
fn class_without_mappings_is_left_out() -> Result<()> {
	let mut mappings = Mappings::new(MappingInfo { namespaces: ["official", "named"].try_into()? });
	mappings.get_or_create_class("a".into());

	assert_eq!(TinyFormat::V2.write_string(&mappings)?, "tiny\t2\t0\tofficial\tnamed\n");
	assert_eq!(TinyFormat::V1.write_string(&mappings)?, "v1\tofficial\tnamed\n");

	Ok(())
}

#[test]
fn field_without_descriptor_fails_without_output() -> Result<()> {
	let mut mappings = Mappings::new(MappingInfo { namespaces: ["official", "named"].try_into()? });
	let named = Namespace::new(1)?;

	let class = mappings.get_or_create_class("a".into());
	class.info.set_name(named, Some("Hello".into()))?;
	class.get_or_create_field("b".into(), None).info.set_name(named, Some("count".into()))?;

	for format in [TinyFormat::V1, TinyFormat::V2] {
		let mut buf = Vec::new();
		let error = format.write(&mappings, &mut buf).unwrap_err();

		match error.downcast_ref::<MappingsError>() {
			Some(MappingsError::MissingDescriptor { class, member }) => {
				assert_eq!(class, "a");
				assert_eq!(member, "b");
			},
			other => panic!("expected a missing descriptor error, got {other:?}"),
		}
		assert!(buf.is_empty());
	}

	Ok(())
}

#[test]
fn translation_with_missing_namespace() -> Result<()> {
	let input = "tiny\t2\t0\tofficial\tintermediary\n";

	let error = TinyFormat::V2.read_translation::<2>(input.as_bytes(), "official", "named").unwrap_err();

	match error.downcast_ref::<MappingsError>() {
		Some(MappingsError::Namespace { namespace, available }) => {
			assert_eq!(namespace, "named");
			assert_eq!(available, &["official", "intermediary"]);
		},
		other => panic!("expected a namespace error, got {other:?}"),
	}

	Ok(())
}

#[test]
fn wrong_number_of_names() -> Result<()> {
	let input = "tiny\t2\t0\tofficial\tnamed\nc\ta\tHello\n\tm\t()V\tb\n";

	let error = TinyFormat::V2.read::<2>(input.as_bytes()).unwrap_err();

	assert!(matches!(error.downcast_ref::<MappingsError>(), Some(MappingsError::Format { line: 3, .. })));

	Ok(())
}

#[test]
fn empty_field_descriptor_fails_on_write() -> Result<()> {
	let input = "v1\tofficial\tnamed\nFIELD\ta\t\tb\tcount\n";
	let mappings: Mappings<2> = TinyFormat::V1.read(input.as_bytes())?;

	// read like an empty field descriptor of tiny v2: as no descriptor
	assert_eq!(mappings.classes["a"].fields[0].info.desc, None);

	for format in [TinyFormat::V1, TinyFormat::V2] {
		let mut buf = Vec::new();
		let error = format.write(&mappings, &mut buf).unwrap_err();

		match error.downcast_ref::<MappingsError>() {
			Some(MappingsError::MissingDescriptor { class, member }) => {
				assert_eq!(class, "a");
				assert_eq!(member, "b");
			},
			other => panic!("expected a missing descriptor error, got {other:?}"),
		}
		assert!(buf.is_empty());
	}

	Ok(())
}

#[test]
fn empty_method_descriptor_is_rejected() -> Result<()> {
	let inputs = [
		(TinyFormat::V1, "v1\tofficial\tnamed\nCLASS\ta\tHello\nMETHOD\ta\t\tc\tgreet\n"),
		(TinyFormat::V2, "tiny\t2\t0\tofficial\tnamed\nc\ta\tHello\n\tm\t\tc\tgreet\n"),
	];

	for (format, input) in inputs {
		let error = format.read::<2>(input.as_bytes()).unwrap_err();
		assert!(
			matches!(error.downcast_ref::<MappingsError>(), Some(MappingsError::Format { line: 3, .. })),
			"{format}: {error:?}",
		);
	}

	Ok(())
}

mod order {
	use std::cmp::Ordering;
	use nib::tree::mappings::{ClassNowodeMapping, FieldNowodeMapping, MethodNowodeMapping};
	use nib::writer::{Member, WriterConfig};

	fn classes(a: &ClassNowodeMapping<2>, b: &ClassNowodeMapping<2>) -> Ordering {
		b.info.names.src().cmp(&a.info.names.src())
	}

	fn fields(a: &Member<'_, FieldNowodeMapping<2>>, b: &Member<'_, FieldNowodeMapping<2>>) -> Ordering {
		b.full_obfuscated_name().cmp(&a.full_obfuscated_name())
	}

	fn methods(a: &Member<'_, MethodNowodeMapping<2>>, b: &Member<'_, MethodNowodeMapping<2>>) -> Ordering {
		b.full_obfuscated_name().cmp(&a.full_obfuscated_name())
	}

	pub(super) fn reversed() -> WriterConfig {
		WriterConfig {
			class_order: Box::new(classes),
			field_order: Box::new(fields),
			method_order: Box::new(methods),
		}
	}
}

const ORDER_INPUT: &str = concat!(
	"v1\tofficial\tnamed\n",
	"METHOD\tb\t()V\tm\trunB\n",
	"CLASS\tb\tSecond\n",
	"FIELD\tb\tI\tx\tcountB\n",
	"CLASS\ta$c\tFirst$Inner\n",
	"METHOD\ta\t()V\tn\tstopA\n",
	"FIELD\ta\tI\tx\tcountA\n",
	"CLASS\ta\tFirst\n",
	"METHOD\ta\t()V\tm\trunA\n",
);

#[test]
fn default_order() -> Result<()> {
	let mappings: Mappings<2> = TinyFormat::V1.read(ORDER_INPUT.as_bytes())?;

	let v1 = concat!(
		"v1\tofficial\tnamed\n",
		"CLASS\ta\tFirst\n",
		"CLASS\ta$c\tFirst$Inner\n",
		"CLASS\tb\tSecond\n",
		"FIELD\ta\tI\tx\tcountA\n",
		"FIELD\tb\tI\tx\tcountB\n",
		"METHOD\ta\t()V\tm\trunA\n",
		"METHOD\ta\t()V\tn\tstopA\n",
		"METHOD\tb\t()V\tm\trunB\n",
	);
	assert_eq!(TinyFormat::V1.write_string(&mappings)?, v1);

	let v2 = concat!(
		"tiny\t2\t0\tofficial\tnamed\n",
		"c\ta\tFirst\n",
		"\tm\t()V\tm\trunA\n",
		"\tm\t()V\tn\tstopA\n",
		"\tf\tI\tx\tcountA\n",
		"c\ta$c\tFirst$Inner\n",
		"c\tb\tSecond\n",
		"\tm\t()V\tm\trunB\n",
		"\tf\tI\tx\tcountB\n",
	);
	assert_eq!(TinyFormat::V2.write_string(&mappings)?, v2);

	Ok(())
}

#[test]
fn custom_order() -> Result<()> {
	let mappings: Mappings<2> = TinyFormat::V1.read(ORDER_INPUT.as_bytes())?;
	let config = order::reversed();

	let mut v1 = Vec::new();
	TinyFormat::V1.write_with(&mappings, "official", "named", &config, &mut v1)?;
	let expected = concat!(
		"v1\tofficial\tnamed\n",
		"CLASS\tb\tSecond\n",
		"CLASS\ta$c\tFirst$Inner\n",
		"CLASS\ta\tFirst\n",
		"FIELD\tb\tI\tx\tcountB\n",
		"FIELD\ta\tI\tx\tcountA\n",
		"METHOD\tb\t()V\tm\trunB\n",
		"METHOD\ta\t()V\tn\tstopA\n",
		"METHOD\ta\t()V\tm\trunA\n",
	);
	assert_eq!(String::from_utf8(v1)?, expected);

	// inner classes still follow their outer class
	let mut v2 = Vec::new();
	TinyFormat::V2.write_with(&mappings, "official", "named", &config, &mut v2)?;
	let expected = concat!(
		"tiny\t2\t0\tofficial\tnamed\n",
		"c\tb\tSecond\n",
		"\tm\t()V\tm\trunB\n",
		"\tf\tI\tx\tcountB\n",
		"c\ta\tFirst\n",
		"\tm\t()V\tn\tstopA\n",
		"\tm\t()V\tm\trunA\n",
		"\tf\tI\tx\tcountA\n",
		"c\ta$c\tFirst$Inner\n",
	);
	assert_eq!(String::from_utf8(v2)?, expected);

	Ok(())
}

#[test]
fn read_v2_file() -> Result<()> {
	let input = include_str!("round_trip.tiny");
	let path = std::env::temp_dir().join(format!("nib-read-v2-file-{}.tiny", std::process::id()));
	std::fs::write(&path, input)?;

	let result = nib::tiny_v2::read_file::<2>(&path);
	std::fs::remove_file(&path)?;

	assert_eq!(result?, nib::tiny_v2::read::<2>(input.as_bytes())?);
	assert!(nib::tiny_v2::read_file::<2>(&path).is_err());

	Ok(())
}
