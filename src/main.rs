use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, LevelFilter};
use nib::format::TinyFormat;
use nib::tree::mappings::Mappings;
use nib::writer::WriterConfig;

/// Runs `$body` with `$n` being a `const usize` equal to the runtime value `$count`.
///
/// Reading mappings needs the number of namespaces at compile time.
macro_rules! with_namespace_count {
	($count:expr, $n:ident => $body:expr) => {
		match $count {
			2 => { const $n: usize = 2; $body },
			3 => { const $n: usize = 3; $body },
			4 => { const $n: usize = 4; $body },
			5 => { const $n: usize = 5; $body },
			count => bail!("mappings with {count} namespaces aren't supported, only 2 to 5 are"),
		}
	};
}

#[derive(Debug, Parser)]
struct Cli {
	/// Be verbose.
	#[arg(short = 'v', long = "verbose")]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Converts a mappings file into another format, keeping two of its namespaces
	Convert {
		input: PathBuf,
		output: PathBuf,
		#[arg(long = "input-format", value_enum, default_value_t)]
		input_format: Format,
		#[arg(long = "output-format", value_enum, default_value_t)]
		output_format: Format,
		/// The namespace holding the obfuscated names, defaults to the first one of the input
		#[arg(long = "from")]
		from: Option<String>,
		/// The namespace holding the deobfuscated names, defaults to the second one of the input
		#[arg(long = "to")]
		to: Option<String>,
	},
	/// Joins two mappings files through a namespace they share
	Join {
		input_a: PathBuf,
		input_b: PathBuf,
		output: PathBuf,
		#[arg(long = "input-format", value_enum, default_value_t)]
		input_format: Format,
		#[arg(long = "output-format", value_enum, default_value_t)]
		output_format: Format,
		/// The namespace of the first file becoming the obfuscated names
		#[arg(long = "from")]
		from: String,
		/// The namespace of the second file becoming the deobfuscated names
		#[arg(long = "to")]
		to: String,
		/// The namespace both files share, used for matching
		#[arg(long = "match", conflicts_with_all = ["match_a", "match_b"])]
		matching: Option<String>,
		/// The namespace of the second file whose names are matched against
		#[arg(long = "match-a", requires = "match_b")]
		match_a: Option<String>,
		/// The namespace of the first file whose names are looked up in the second file
		#[arg(long = "match-b", requires = "match_a")]
		match_b: Option<String>,
	},
	/// Creates mappings from the names of one version to the names of another version
	Migrate {
		source: PathBuf,
		target: PathBuf,
		output: PathBuf,
		#[arg(long = "input-format", value_enum, default_value_t)]
		input_format: Format,
		#[arg(long = "output-format", value_enum, default_value_t)]
		output_format: Format,
		/// The namespace both files share, used for matching
		#[arg(long = "match")]
		matching: String,
		/// The namespace that's migrated
		#[arg(long = "named")]
		named: String,
		#[arg(long = "source-label", default_value = "source")]
		source_label: String,
		#[arg(long = "target-label", default_value = "target")]
		target_label: String,
	},
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Format {
	/// The flat `v1` format.
	V1,
	#[default]
	/// The nested `tiny 2 0` format.
	V2,
}

impl From<Format> for TinyFormat {
	fn from(value: Format) -> TinyFormat {
		match value {
			Format::V1 => TinyFormat::V1,
			Format::V2 => TinyFormat::V2,
		}
	}
}

fn main() -> Result<()> {
	let Cli { verbose, command } = Cli::parse();

	setup_logger(verbose)?;

	match command {
		Command::Convert { input, output, input_format, output_format, from, to } => {
			let mappings = read_translation(&input, input_format.into(), from.as_deref(), to.as_deref())?;

			write(&mappings, output_format.into(), &output)
		},
		Command::Join { input_a, input_b, output, input_format, output_format, from, to, matching, match_a, match_b } => {
			let (match_a, match_b) = match (matching, match_a, match_b) {
				(Some(matching), None, None) => (matching.clone(), matching),
				(None, Some(match_a), Some(match_b)) => (match_a, match_b),
				_ => bail!("either --match, or both --match-a and --match-b must be given"),
			};

			let format: TinyFormat = input_format.into();
			let (a, count_a) = read_with_namespace_count(&input_a, format)?;
			let (b, count_b) = read_with_namespace_count(&input_b, format)?;

			let mappings = with_namespace_count!(count_a, A => with_namespace_count!(count_b, B => {
				let tree_a: Mappings<A> = format.read(a.as_bytes())
					.with_context(|| anyhow!("failed to read {input_a:?}"))?;
				let tree_b: Mappings<B> = format.read(b.as_bytes())
					.with_context(|| anyhow!("failed to read {input_b:?}"))?;

				Mappings::join(&tree_a, &from, &match_a, &tree_b, &to, &match_b)?
			}));

			write(&mappings, output_format.into(), &output)
		},
		Command::Migrate { source, target, output, input_format, output_format, matching, named, source_label, target_label } => {
			let format: TinyFormat = input_format.into();
			let (a, count_a) = read_with_namespace_count(&source, format)?;
			let (b, count_b) = read_with_namespace_count(&target, format)?;

			let mappings = with_namespace_count!(count_a, A => with_namespace_count!(count_b, B => {
				let source_tree: Mappings<A> = format.read(a.as_bytes())
					.with_context(|| anyhow!("failed to read {source:?}"))?;
				let target_tree: Mappings<B> = format.read(b.as_bytes())
					.with_context(|| anyhow!("failed to read {target:?}"))?;

				Mappings::migrate(&source_tree, &target_tree, &matching, &named, [source_label.as_str(), target_label.as_str()])?
			}));

			write(&mappings, output_format.into(), &output)
		},
	}
}

fn setup_logger(verbose: bool) -> Result<()> {
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(if verbose { LevelFilter::Trace } else { LevelFilter::Info })
		.chain(std::io::stderr())
		.apply()
		.context("failed to set up logging")
}

/// Reads the whole file, and gets the number of namespaces from its header.
fn read_with_namespace_count(path: &Path, format: TinyFormat) -> Result<(String, usize)> {
	let content = std::fs::read_to_string(path)
		.with_context(|| anyhow!("failed to read mappings file {path:?}"))?;

	let header = content.lines().next().unwrap_or("");
	let count = format.namespace_count(header)
		.with_context(|| anyhow!("failed to read header of {path:?}"))?;

	Ok((content, count))
}

fn read_translation(path: &Path, format: TinyFormat, from: Option<&str>, to: Option<&str>) -> Result<Mappings<2>> {
	let (content, count) = read_with_namespace_count(path, format)?;

	with_namespace_count!(count, N => {
		let mappings: Mappings<N> = format.read(content.as_bytes())
			.with_context(|| anyhow!("failed to read {path:?}"))?;

		let names = mappings.info.namespaces.names();
		let from = from.or_else(|| names.first().map(String::as_str)).context("no first namespace")?;
		let to = to.or_else(|| names.get(1).map(String::as_str)).context("no second namespace")?;
		info!("converting {path:?} from {from:?} to {to:?}");

		mappings.translate(from, to)
	})
}

fn write(mappings: &Mappings<2>, format: TinyFormat, path: &Path) -> Result<()> {
	let [from, to] = mappings.info.namespaces.names();

	format.write_file(mappings, from, to, &WriterConfig::default(), path)?;

	info!("wrote {} classes to {path:?}", mappings.classes.len());
	Ok(())
}
