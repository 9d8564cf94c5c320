use std::path::PathBuf;

use log::LevelFilter;
use structopt::StructOpt;


pub static DEFAULT_OUTPUT_PATH: &str = "lex.yy.rs";


#[derive(Debug, StructOpt)]
#[structopt(name = "hlex", about = "A lexer generator.")]
pub struct Options {
  #[structopt(name = "FILE", parse(from_os_str))]
  /// The rule file
  pub in_file: PathBuf,

  #[structopt(short = "o", long, parse(from_os_str))]
  /// Write the generated scanner to FILE (default lex.yy.rs)
  pub out_file: Option<PathBuf>,

  #[structopt(long)]
  /// Write the generated scanner to stdout, and to FILE only if -o is given
  pub stdout: bool,

  #[structopt(short = "t", long, parse(from_os_str))]
  /// Use the template in FILE instead of the built-in scanner
  pub template: Option<PathBuf>,

  #[structopt(short = "s", long, parse(from_os_str))]
  /// Tokenize FILE with the compiled rules and print the tokens instead of generating code
  pub scan: Option<PathBuf>,

  #[structopt(long)]
  /// Print the compiled state table
  pub dump: bool,

  #[structopt(short = "v", long, parse(from_occurrences))]
  /// Log more; repeat for more detail
  pub verbose: u8,
}

impl Options {
  /// The log level selected by `-v`.
  pub fn log_level(&self) -> LevelFilter {
    match self.verbose {
      0 => LevelFilter::Warn,
      1 => LevelFilter::Info,
      2 => LevelFilter::Debug,
      _ => LevelFilter::Trace,
    }
  }
}
