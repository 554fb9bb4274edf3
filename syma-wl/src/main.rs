/*!

`syma-wl` — a command-line host for the term-rewriting runtime (§6.3). It plays the role the
specification leaves external: a surface parser (§6.2, demo-grade only) and a driver that loads
modules from a directory, compiles them, and exercises `dispatch`/`project` from the terminal.

*/

mod parse;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use syma_abs::{tracing, HashMap, IString};
use syma_core::module::{compile, CompileMode, ModuleSource};
use syma_core::normalize::{normalize, DEFAULT_MAX_STEPS};
use syma_core::term::Term;
use syma_core::{dispatch, project, wire, Universe};

#[derive(ClapParser)]
#[command(name = "syma-wl", about = "A command-line host for the syma term-rewriting runtime")]
struct Cli {
  /// Enable process-wide step tracing (§6.3 setTrace).
  #[arg(long, global = true)]
  trace: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Compile a module directory to a Universe and print its JSON wire form.
  Compile {
    /// Directory of `.syma` source files, each containing one `Module[...]` term.
    #[arg(long)]
    dir: PathBuf,
    /// Name of the entry module.
    #[arg(long)]
    entry: String,
    /// Omit Program from the emitted Universe even if the entry module has one.
    #[arg(long)]
    library: bool,
  },
  /// Compile a module directory, then dispatch one action against it and print the new Program.
  Dispatch {
    #[arg(long)]
    dir: PathBuf,
    #[arg(long)]
    entry: String,
    /// The action term, in surface syntax, e.g. `Inc` or `{SetName "x"}`.
    action: String,
  },
  /// Compile a module directory, then project one part and print the resulting term.
  Project {
    #[arg(long)]
    dir: PathBuf,
    #[arg(long)]
    entry: String,
    /// The part term, in surface syntax.
    part: String,
  },
  /// Normalize a bare expression against an empty rule set — exercises just the primitive folder.
  Eval { expr: String },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let cli = Cli::parse();
  syma_core::trace::set_trace(cli.trace);

  match cli.command {
    Command::Compile { dir, entry, library } => {
      let universe = compile_dir(&dir, &entry, library)?;
      print_json(&wire::universe_to_json(&universe));
    }
    Command::Dispatch { dir, entry, action } => {
      let universe = compile_dir(&dir, &entry, false)?;
      let action_term = parse::parse_term(&action)?;
      let after = dispatch(&universe, action_term)?;
      print_json(&wire::to_json(after.program.as_ref().expect("dispatch preserves Program")));
    }
    Command::Project { dir, entry, part } => {
      let universe = compile_dir(&dir, &entry, false)?;
      let part_term = parse::parse_term(&part)?;
      let result = project(&universe, part_term)?;
      print_json(&wire::to_json(&result));
    }
    Command::Eval { expr } => {
      let term = parse::parse_term(&expr)?;
      let result = normalize(&term, &[], DEFAULT_MAX_STEPS)?;
      println!("{result}");
    }
  }

  Ok(())
}

fn compile_dir(dir: &PathBuf, entry: &str, library: bool) -> Result<Universe> {
  let mut modules: HashMap<IString, Term> = HashMap::new();
  for entry_file in fs::read_dir(dir).with_context(|| format!("reading module directory {}", dir.display()))? {
    let path = entry_file?.path();
    if path.extension().and_then(|e| e.to_str()) != Some("syma") {
      continue;
    }
    let source = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let term = parse::parse_term(&source).with_context(|| format!("parsing {}", path.display()))?;
    let name = term
      .as_call()
      .and_then(|(_, args)| args.first())
      .and_then(Term::as_symbol)
      .with_context(|| format!("{}: not a Module[name, ...] term", path.display()))?;
    modules.insert(name, term);
  }

  let mode = if library { CompileMode::Library } else { CompileMode::Entry };
  let universe = compile(entry, &modules as &dyn ModuleSource, mode)?;
  tracing::info!(entry, module_count = modules.len(), "compiled module graph");
  Ok(universe)
}

fn print_json(value: &serde_json::Value) {
  println!("{}", serde_json::to_string_pretty(value).expect("Value is always serializable"));
}
