mod config;
mod test_runner;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use blocks::Layout;
use blocks::node::BlockNode;
use blocks::parser::ParseError;

use crate::config::{Config, MetadataOverrides};

const SUBCOMMANDS: &[&str] = &["build", "check", "test", "help"];

/// Options whose value is the following argument unless written `--opt=value`.
const VALUE_OPTIONS: &[&str] = &[
    "-o",
    "--output",
    "--config",
    "--reference",
    "--base-url",
    "--html-class",
    "--body-class",
    "--stylesheet",
    "-c",
    "--category",
];

#[derive(Parser)]
#[command(
    name = "blocks",
    version,
    about = "Compile page-builder layout exports to static HTML"
)]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a layout export to an HTML document
    Build(BuildArgs),

    /// Parse a layout export without compiling it
    Check(CheckArgs),

    /// Run .test.json fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Layout export (JSON) to compile
    file: String,

    /// Output file, or `-` for stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Config file (defaults to ./blocks.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Saved copy of the live page to take html/body classes and stylesheets from
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Base URL for resolving relative stylesheet links in the reference page
    #[arg(long)]
    base_url: Option<String>,

    /// Class list appended to <html>
    #[arg(long)]
    html_class: Option<String>,

    /// Class list for <body>
    #[arg(long)]
    body_class: Option<String>,

    /// Stylesheet URL to link (repeatable; replaces any configured list)
    #[arg(long = "stylesheet")]
    stylesheets: Vec<String>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Layout export (JSON) to parse
    file: String,

    /// Print an outline of the block tree
    #[arg(long)]
    tree: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.json file or directory containing them
    path: String,

    /// Run only fixtures in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

/// `blocks layout.json` is shorthand for `blocks build layout.json`.
///
/// The first argument that is neither an option nor an option's value
/// decides: unless it names a subcommand, `build` is inserted up front.
fn imply_build(args: &mut Vec<String>) {
    let mut rest = args.iter().skip(1);
    let mut first_positional = None;
    while let Some(arg) = rest.next() {
        if VALUE_OPTIONS.contains(&arg.as_str()) {
            rest.next();
        } else if !arg.starts_with('-') {
            first_positional = Some(arg.as_str());
            break;
        }
    }
    let implied = first_positional.is_some_and(|arg| !SUBCOMMANDS.contains(&arg));
    if implied {
        args.insert(1, "build".to_string());
    }
}

fn main() {
    let mut args: Vec<String> = std::env::args().collect();
    imply_build(&mut args);

    let cli = Cli::parse_from(&args);
    init_logging(cli.verbose);

    match cli.command {
        Command::Build(build_args) => do_build(build_args, cli.no_color),
        Command::Check(check_args) => do_check(check_args, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

/// Read and parse a layout file, printing diagnostics. Exits on fatal errors.
fn load_layout(file: &str, no_color: bool) -> Layout {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file, e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(file.to_string(), source.clone());

    let parser = blocks::parser::Parser::new(source, file_id);
    match parser.parse() {
        Ok(layout) => {
            emit_diagnostics(&files, &layout.diagnostics, no_color);
            layout
        }
        Err(errors) => {
            emit_diagnostics(&files, &errors, no_color);
            process::exit(1);
        }
    }
}

fn do_build(args: BuildArgs, no_color: bool) {
    let layout = load_layout(&args.file, no_color);

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let overrides = MetadataOverrides {
        reference: args.reference,
        base_url: args.base_url,
        html_class: args.html_class,
        body_class: args.body_class,
        stylesheets: args.stylesheets,
    };
    let metadata = match config.resolve_metadata(&overrides) {
        Ok(metadata) => metadata,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let document = match renderer::compile_layout(&layout, &metadata) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let output = config.output_path(args.output.as_deref());
    let written = if output == "-" {
        std::io::stdout().write_all(document.as_bytes())
    } else {
        std::fs::write(&output, &document)
    };
    if let Err(e) = written {
        eprintln!("error: cannot write '{}': {}", output, e);
        process::exit(1);
    }

    if output != "-" {
        eprintln!("wrote {} ({} bytes)", output, document.len());
    }
}

fn do_check(args: CheckArgs, no_color: bool) {
    let layout = load_layout(&args.file, no_color);

    if args.tree {
        fn print_tree(nodes: &[BlockNode], indent: usize) {
            for node in nodes {
                let pad = "  ".repeat(indent);
                let tag = renderer::compiler::resolve_tag_name(node);
                let component = match node.component_name() {
                    "" => String::new(),
                    name => format!(" [{}]", name),
                };
                let id = node
                    .id
                    .as_deref()
                    .map(|id| format!(" #{}", id))
                    .unwrap_or_default();
                println!("{}<{}>{}{}", pad, tag, id, component);
                print_tree(&node.children, indent + 1);
            }
        }
        print_tree(&layout.blocks, 0);
        return;
    }

    if layout.root().is_none() {
        eprintln!("error: {}", renderer::RenderError::NoRootBlock);
        process::exit(1);
    }

    eprintln!(
        "ok: {} parsed successfully ({} top-level block(s), {} warning(s))",
        args.file,
        layout.blocks.len(),
        layout.diagnostics.len()
    );
}

fn emit_diagnostics(files: &SimpleFiles<String, String>, diagnostics: &[ParseError], no_color: bool) {
    if diagnostics.is_empty() {
        return;
    }
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for diagnostic in diagnostics {
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic.to_diagnostic());
    }
}
