use clap::Parser;
use std::path::{Path, PathBuf};

use nodegen::nodes;
use nodegen::Driver;

/// A generator for compiler syntax-tree node declarations
#[derive(Parser)]
#[clap(author, version, about)]
enum Cli {
    /// Generate the node declarations, printing the result to stdout
    Generate {
        /// Path to write the generated header to
        #[clap(long = "output", name = "FILE", display_order = 0)]
        output: Option<PathBuf>,
        /// Inclusion-guard name to frame the output with
        ///
        /// Defaults to a name derived from the output file name.
        #[clap(long = "guard", name = "GUARD", display_order = 1)]
        guard: Option<String>,
    },
    /// Validate the built-in node schema without generating anything
    Check,
}

fn main() -> ! {
    match Cli::parse() {
        Cli::Generate { output, guard } => {
            let mut driver = Driver::new();
            let schema = nodes::definition();
            let guard = guard.unwrap_or_else(|| guard_name(output.as_deref()));

            let status = driver.generate(&schema, &guard, output.as_deref());

            std::process::exit(status.exit_code());
        }
        Cli::Check => {
            let mut driver = Driver::new();
            let schema = nodes::definition();

            let status = driver.check_schema(&schema);

            std::process::exit(status.exit_code());
        }
    }
}

/// Derive an inclusion-guard name from the output file name, falling
/// back to `AST_HPP` when writing to stdout.
fn guard_name(output: Option<&Path>) -> String {
    match output.and_then(Path::file_name).and_then(|name| name.to_str()) {
        Some(name) => name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect(),
        None => "AST_HPP".to_owned(),
    }
}
