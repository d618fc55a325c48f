use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use disasm_8086::{emit, Disassembly};
use log::{info, warn};

/// Disassembles 8086 MOV instructions into reassemblable `bits 16` source
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// Machine-code file to disassemble
  input: PathBuf,

  /// Write the listing here instead of stdout
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// What to do with bytes that do not decode
  #[arg(long, value_enum, default_value_t = OnError::Abort)]
  on_error: OnError,

  /// Verbosity level (-v, -vv, -vvv)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OnError {
  /// Stop at the first error, keeping what decoded so far
  Abort,
  /// Emit the byte as `db` and retry from the next one
  Skip,
}

fn main() -> anyhow::Result<()> {
  let args = Args::parse();

  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
    match args.verbose {
      0 => "warn",
      1 => "info",
      2 => "debug",
      _ => "trace",
    },
  ))
  .init();

  if !args.input.is_file() {
    bail!("{} is not a regular file", args.input.display());
  }
  let data = fs::read(&args.input)
    .with_context(|| format!("reading {}", args.input.display()))?;
  info!("disassembling {} ({} bytes)", args.input.display(), data.len());

  let mut lines = Vec::new();
  let mut failure = None;
  let mut disassembly = Disassembly::new(&data);
  while let Some(result) = disassembly.next() {
    match result {
      Ok(instruction) => lines.push(instruction.to_string()),
      Err(err) if args.on_error == OnError::Skip => {
        warn!("{err}; emitting the byte as data");
        if let Some(byte) = disassembly.skip_byte() {
          lines.push(emit::data_byte(byte));
        }
      }
      Err(err) => {
        failure = Some(err);
        break;
      }
    }
  }

  let listing = emit::render(&lines);
  match &args.output {
    Some(path) => {
      fs::write(path, &listing).with_context(|| format!("writing {}", path.display()))?
    }
    None => print!("{listing}"),
  }

  if let Some(err) = failure {
    return Err(err).with_context(|| format!("disassembling {}", args.input.display()));
  }
  Ok(())
}
