mod options;
mod specification;

use structopt::StructOpt;

use options::Options;
use specification::Specification;

fn main() {
  let options = Options::from_args();
  env_logger::Builder::new()
      .filter_level(options.log_level())
      .parse_default_env()
      .init();

  let code =
      match Specification::new(options).and_then(|mut specification| specification.run()) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
          eprintln!("error: {:#}", error);
          2
        }
      };

  std::process::exit(code);
}
