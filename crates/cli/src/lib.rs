#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `sendstream-dump` front-end: it decodes a btrfs send
//! stream from a file or standard input and prints one line per operation.
//!
//! # Design
//!
//! [`run`] accepts an argument iterator together with handles for standard
//! output and error, so tests drive it without spawning a process. A `clap`
//! command definition parses the flags, which are then mapped onto
//! [`engine::DecodeConfig`] and [`logging::VerbosityConfig`]. Decoding goes
//! through [`engine::decode_with_config`] with an [`engine::DumpRenderer`] as
//! the handler.
//!
//! # Errors
//!
//! | Exit code | Meaning |
//! |-----------|---------|
//! | 0 | every stream decoded |
//! | 1 | the input could not be opened or decoding failed |
//! | 2 | the command line was invalid |
//!
//! A decode failure prints the error, including the byte offset of the
//! failing record, once on standard error. Lines already written for earlier
//! operations stay on standard output.
//!
//! # Examples
//!
//! ```
//! use cli::run;
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = run(["sendstream-dump", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("sendstream-dump "));
//! assert!(stderr.is_empty());
//! ```

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser, value_parser};
use engine::{DecodeConfig, DecodeError, DumpRenderer, decode_with_config};
use logging::VerbosityConfig;

/// Program name used in diagnostics.
const PROGRAM: &str = "sendstream-dump";

/// Exit code for a successful run.
pub const EXIT_OK: i32 = 0;
/// Exit code when the input cannot be read or decoded.
pub const EXIT_DECODE_FAILED: i32 = 1;
/// Exit code for command-line errors.
pub const EXIT_USAGE: i32 = 2;

/// Deterministic help text.
const HELP_TEXT: &str = concat!(
    "Usage: sendstream-dump [OPTIONS] [FILE|-]\n",
    "\n",
    "Decode a btrfs send stream and print one line per operation. The stream\n",
    "is read from FILE, or from standard input when FILE is '-' or omitted.\n",
    "\n",
    "Options:\n",
    "  -v, --verbose            Increase diagnostic output on stderr (repeatable).\n",
    "  -e, --stop-at-end        Stop after the first end command.\n",
    "      --root DIR           Directory paths are resolved under (default '.').\n",
    "      --max-attribute-size N  Reject attribute values longer than N bytes.\n",
    "  -h, --help               Show this help message and exit.\n",
    "  -V, --version            Output version information and exit.\n",
);

/// Parsed command produced by [`parse_args`].
#[derive(Debug, Default)]
struct ParsedArgs {
    show_help: bool,
    show_version: bool,
    verbose: u8,
    stop_at_end: bool,
    root: Option<PathBuf>,
    max_attribute_size: Option<usize>,
    input: Option<OsString>,
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new(PROGRAM)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output on stderr.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("stop-at-end")
                .long("stop-at-end")
                .short('e')
                .help("Stop after the first end command.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("DIR")
                .help("Directory paths are resolved under.")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("max-attribute-size")
                .long("max-attribute-size")
                .value_name("N")
                .help("Reject attribute values longer than N bytes.")
                .value_parser(value_parser!(usize))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .help("Stream to decode; '-' or nothing reads standard input.")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Set),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();

    if args.is_empty() {
        args.push(OsString::from(PROGRAM));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        verbose: matches.get_count("verbose"),
        stop_at_end: matches.get_flag("stop-at-end"),
        root: matches.remove_one::<PathBuf>("root"),
        max_attribute_size: matches.remove_one::<usize>("max-attribute-size"),
        input: matches.remove_one::<OsString>("input"),
    })
}

/// Runs the CLI using the provided argument iterator and output handles.
///
/// Returns the process exit code the caller should use.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(parsed, stdout, stderr),
        Err(error) => {
            let _ = write!(stderr, "{PROGRAM}: {error}");
            EXIT_USAGE
        }
    }
}

fn execute<Out, Err>(parsed: ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    if parsed.show_help {
        return if stdout.write_all(HELP_TEXT.as_bytes()).is_ok() {
            EXIT_OK
        } else {
            EXIT_DECODE_FAILED
        };
    }

    if parsed.show_version {
        return if writeln!(stdout, "{PROGRAM} {}", env!("CARGO_PKG_VERSION")).is_ok() {
            EXIT_OK
        } else {
            EXIT_DECODE_FAILED
        };
    }

    // A subscriber may already be installed when `run` is called repeatedly.
    let _ = logging::init_tracing(&VerbosityConfig::from_verbose_level(parsed.verbose));

    let mut builder = DecodeConfig::builder().stop_at_end(parsed.stop_at_end);
    if let Some(root) = parsed.root {
        builder = builder.root(root);
    }
    if let Some(max) = parsed.max_attribute_size {
        builder = builder.max_attribute_len(max);
    }
    let config = builder.build();

    let source = match open_input(parsed.input.as_deref()) {
        Ok(source) => source,
        Err(error) => {
            let name = parsed
                .input
                .as_deref()
                .map_or_else(|| "-".into(), |name| name.to_string_lossy());
            let _ = writeln!(stderr, "{PROGRAM}: cannot open {name}: {error}");
            return EXIT_DECODE_FAILED;
        }
    };

    let mut renderer = DumpRenderer::new(BufWriter::new(stdout));
    let outcome = decode_with_config(source, &config, &mut renderer);
    let flushed = renderer.into_inner().flush();

    match (outcome, flushed) {
        (Ok(summary), Ok(())) => {
            tracing::debug!(
                streams = summary.streams(),
                commands = summary.commands(),
                "dump complete"
            );
            EXIT_OK
        }
        (Err(error), _) => report_decode_error(&error, stderr),
        (Ok(_), Err(error)) => {
            let _ = writeln!(stderr, "{PROGRAM}: cannot write output: {error}");
            EXIT_DECODE_FAILED
        }
    }
}

fn open_input(input: Option<&std::ffi::OsStr>) -> io::Result<Box<dyn Read>> {
    match input {
        None => Ok(Box::new(io::stdin().lock())),
        Some(name) if name == "-" => Ok(Box::new(io::stdin().lock())),
        Some(name) => Ok(Box::new(File::open(name)?)),
    }
}

fn report_decode_error<Err: Write>(error: &DecodeError, stderr: &mut Err) -> i32 {
    tracing::debug!(
        kind = error.name(),
        offset = error.offset(),
        command = ?error.command(),
        "decode failed"
    );
    let _ = writeln!(stderr, "{PROGRAM}: error: {error}");
    EXIT_DECODE_FAILED
}
