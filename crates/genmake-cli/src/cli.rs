//! CLI argument parsing using clap derive

use clap::Parser;
use genmake_core::descriptor::DEFAULT_MAKE_PROGRAM;

/// Generate a Makefile and optionally a qmake project for an Arduino sketch
///
/// The Makefile builds, uploads and runs the sketch from the command line
/// through arduino-cli. The qmake project lets Qt Creator browse, build and
/// run it. Both are described by one or more YAML configuration files.
#[derive(Parser, Debug)]
#[command(name = "arduino-genmakefile")]
#[command(author, version, about)]
pub struct Cli {
    /// Arduino sketch path
    #[arg(long, value_name = "PATH")]
    pub sketch: String,

    /// Configuration file path, may be passed multiple times
    #[arg(long = "config", value_name = "PATH", required = true)]
    pub configs: Vec<String>,

    /// Makefile generation path; the file name must start with "Makefile"
    #[arg(long, value_name = "PATH")]
    pub makefile: String,

    /// Makefile template path
    #[arg(long, value_name = "PATH")]
    pub makefile_template: Option<String>,

    /// qmake project generation path, ending with ".pro". If not passed, no
    /// qmake project is generated
    #[arg(long, value_name = "PATH")]
    pub qmake: Option<String>,

    /// qmake project template path; a ".pri" template must sit next to it.
    /// Ignored without --qmake
    #[arg(long, value_name = "PATH")]
    pub qmake_template: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Program used to run Makefile rules while harvesting definitions
    #[arg(
        long,
        hide = true,
        env = "ARDUINO_GENMAKEFILE_MAKE",
        default_value = DEFAULT_MAKE_PROGRAM
    )]
    pub make: String,
}
