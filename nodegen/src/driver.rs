//! Generation driver.
//!
//! Ties the pipeline together: validate the schema, lower it, render the
//! artifact into an in-memory buffer, and only then touch the output
//! medium. A run either produces the complete header or nothing; a
//! partially written artifact is never observable.

use codespan_reporting::diagnostic::{Diagnostic, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{BufferedStandardStream, ColorChoice, WriteColor};
use std::cell::RefCell;
use std::io::Write;
use std::path::Path;

use crate::compile;
use crate::decl::emit;
use crate::schema::validate;
use crate::schema::Schema;

#[derive(Debug, Copy, Clone)]
pub enum Status {
    Ok,
    Error,
}

impl Status {
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Error => 1,
        }
    }
}

pub struct Driver {
    codespan_config: term::Config,
    diagnostic_writer: RefCell<Box<dyn WriteColor>>,
    seen_errors: RefCell<bool>,
}

impl Driver {
    pub fn new() -> Driver {
        Driver {
            codespan_config: term::Config::default(),
            diagnostic_writer: RefCell::new(Box::new(BufferedStandardStream::stderr(
                if atty::is(atty::Stream::Stderr) {
                    ColorChoice::Auto
                } else {
                    ColorChoice::Never
                },
            ))),
            seen_errors: RefCell::new(false),
        }
    }

    /// Set the writer to use when rendering diagnostics
    pub fn set_diagnostic_writer(&mut self, stream: impl 'static + WriteColor) {
        self.diagnostic_writer = RefCell::new(Box::new(stream) as Box<dyn WriteColor>);
    }

    /// Validate the schema, reporting every violation as a diagnostic.
    pub fn check_schema(&mut self, schema: &Schema) -> Status {
        validate::validate(schema, &mut |message| {
            self.emit_diagnostic(message.to_diagnostic());
        });

        if *self.seen_errors.borrow() {
            return Status::Error;
        }
        Status::Ok
    }

    /// Generate the declaration header for `schema`, framed by `guard`,
    /// writing the complete artifact to `output` (or stdout).
    pub fn generate(&mut self, schema: &Schema, guard: &str, output: Option<&Path>) -> Status {
        if let Status::Error = self.check_schema(schema) {
            return Status::Error;
        }

        let header = compile::compile_schema(schema, guard);

        // Render into memory first: the output medium sees either the
        // whole artifact or nothing at all.
        let mut buffer = Vec::new();
        if let Err(error) = emit::emit_header(&mut buffer, &header) {
            self.emit_write_diagnostic("<buffer>", &error);
            return Status::Error;
        }

        let result = match output {
            Some(path) => std::fs::write(path, &buffer).map_err(|error| {
                self.emit_write_diagnostic(path.display(), &error);
            }),
            None => {
                let mut stdout = std::io::stdout();
                stdout
                    .write_all(&buffer)
                    .and_then(|()| stdout.flush())
                    .map_err(|error| {
                        self.emit_write_diagnostic("<stdout>", &error);
                    })
            }
        };

        match result {
            Ok(()) => Status::Ok,
            Err(()) => Status::Error,
        }
    }

    fn emit_diagnostic(&self, diagnostic: Diagnostic<usize>) {
        let mut writer = self.diagnostic_writer.borrow_mut();
        let config = &self.codespan_config;
        // Validation messages carry no source labels, so an empty file
        // database suffices.
        let files = SimpleFiles::<String, String>::new();

        term::emit(&mut *writer, config, &files, &diagnostic).unwrap();
        writer.flush().unwrap();

        if diagnostic.severity >= Severity::Error {
            *self.seen_errors.borrow_mut() = true;
        }
    }

    fn emit_write_diagnostic(&self, name: impl std::fmt::Display, error: &std::io::Error) {
        self.emit_diagnostic(
            Diagnostic::error().with_message(format!("couldn't write `{name}`: {error}")),
        );
    }
}
