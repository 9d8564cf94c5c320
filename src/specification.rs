/*!
The driver behind the `hlex` binary. Owns the source files, runs the generator, and renders every
positioned error as a diagnostic against the file it came from.
*/

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::{self, termcolor::{ColorChoice, StandardStream}};
use hlex::codegen::escape_into;
use hlex::{Generator, ToDiagnostic};
use log::info;

use crate::options::{Options, DEFAULT_OUTPUT_PATH};

static DEFAULT_TEMPLATE: &str = include_str!("../templates/lexer.rs.in");

type Writer = Box<dyn FnMut(&str) -> std::io::Result<()>>;


pub struct Specification {
  pub options : Options,
  files       : SimpleFiles<String, String>, //< Source code database
  rules_file  : usize,                       //< id of the rule file in `files`
}

impl Specification {
  /// Reads the rule file named by `options`.
  pub fn new(options: Options) -> Result<Specification> {
    let source = read(&options.in_file)?;
    let mut files = SimpleFiles::new();
    let rules_file = files.add(options.in_file.display().to_string(), source);

    Ok(Specification { options, files, rules_file })
  }

  /// Runs the generator. Returns `Ok(false)` when a diagnostic was reported.
  pub fn run(&mut self) -> Result<bool> {
    let source = self.files.get(self.rules_file)?.source().clone();
    let generator =
        match Generator::new(&source) {
          Ok(generator) => generator,
          Err(error) => {
            self.report(&error.to_diagnostic(self.rules_file))?;
            return Ok(false);
          }
        };

    if self.options.dump {
      print!("{}", generator.table());
    }

    match self.options.scan.clone() {
      Some(path) => self.scan(&generator, &path),
      None => {
        self.generate(&generator)?;
        Ok(true)
      }
    }
  }

  /// Tokenizes `path`, printing one `TAG<tab>text` line per token.
  fn scan(&mut self, generator: &Generator, path: &Path) -> Result<bool> {
    let input = read(path)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for token in generator.scanner().tokens(&input) {
      match token {
        Ok(token) => {
          let mut text = String::with_capacity(token.text.len());
          token.text.chars().for_each(|c| escape_into(&mut text, c));
          writeln!(out, "{}\t{}", token.tag, text)?;
        }
        Err(error) => {
          out.flush()?;
          let file = self.files.add(path.display().to_string(), input.clone());
          self.report(&error.to_diagnostic(file))?;
          return Ok(false);
        }
      }
    }

    Ok(true)
  }

  fn generate(&self, generator: &Generator) -> Result<()> {
    let template =
        match &self.options.template {
          Some(path) => read(path)?,
          None => DEFAULT_TEMPLATE.to_string(),
        };

    let output = generator.emit(&template);
    let mut writer = self.writer()?;
    writer(&output).context("unable to write the generated scanner")?;
    info!("Wrote {} bytes", output.len());
    Ok(())
  }

  /// Establishes the output stream: the output file, stdout, or both.
  fn writer(&self) -> Result<Writer> {
    let path =
        match (&self.options.out_file, self.options.stdout) {
          (Some(path), _) => Some(path.clone()),
          (None, true) => None,
          (None, false) => Some(PathBuf::from(DEFAULT_OUTPUT_PATH)),
        };

    let mut file_writer =
        match path {
          Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("unable to create file: {}", path.display()))?;
            Some(BufWriter::new(file))
          }
          None => None,
        };
    let to_stdout = self.options.stdout;

    Ok(Box::new(move |buf: &str| {
      if let Some(file_writer) = file_writer.as_mut() {
        file_writer.write_all(buf.as_bytes())?;
        file_writer.flush()?;
      }
      if to_stdout {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        out.write_all(buf.as_bytes())?;
        out.flush()?;
      }
      Ok(())
    }))
  }

  fn report(&self, diagnostic: &Diagnostic<usize>) -> Result<()> {
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = term::Config::default();
    term::emit(&mut writer.lock(), &config, &self.files, diagnostic)?;
    Ok(())
  }
}


fn read(path: &Path) -> Result<String> {
  fs::read_to_string(path).with_context(|| format!("unable to read {}", path.display()))
}
