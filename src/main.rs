//! vexc — compile vex highlighting rules into the binary artifact the
//! viewer's matching runtime loads.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use vexc::syntax::Compiler;

/// Compile a vex syntax file into its binary artifact.
#[derive(Parser)]
#[command(name = "vexc", version)]
struct Args {
    /// Path to the syntax source file.
    source: PathBuf,
    /// Path the compiled artifact is written to.
    output: PathBuf,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // clap renders its own usage/help text; the exit status is ours.
            // Help and version requests are not usage errors.
            let _ = err.print();
            process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    let source = match fs::read_to_string(&args.source) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {err}", args.source.display());
            process::exit(1);
        }
    };

    // The output path is not touched until the artifact is complete.
    let artifact = match Compiler::compile(&source) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprint!("{}", err.render(&source));
            process::exit(err.exit_code());
        }
    };

    if let Err(err) = fs::write(&args.output, &artifact) {
        eprintln!("{}: {err}", args.output.display());
        process::exit(1);
    }
}
