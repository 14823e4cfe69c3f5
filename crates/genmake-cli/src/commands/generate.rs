//! Generate command implementation

use std::path::Path;

use colored::Colorize;
use genmake_core::descriptor::MakeRunner;
use genmake_core::{
    ConfigComposer, GenerateRequest, GeneratedHeader, GenerationReport, QmakeRequest,
    TemplateSource,
};
use genmake_fs::{PathResolver, ProjectPath};

use crate::cli::Cli;
use crate::error::Result;

/// Run a generation for the paths given on the command line.
///
/// Relative paths are resolved against `cwd`.
pub fn run_generate(cwd: &Path, cli: &Cli, header: &GeneratedHeader) -> Result<()> {
    let resolver = PathResolver::new();
    let request = build_request(&resolver, cwd, cli)?;

    let prepared = request.prepare(&ConfigComposer::with_resolver(resolver))?;
    let config = prepared.config();

    println!();
    println!("{}", "Loaded configuration:".bold());
    print!("{config}");
    println!();
    for warning in &config.warnings {
        eprintln!("{}: {}", "warning".yellow().bold(), warning);
    }

    let runner = MakeRunner::new(&cli.make);
    let report = prepared.generate(header, &runner)?;
    print_report(&report);
    Ok(())
}

fn build_request(resolver: &PathResolver, cwd: &Path, cli: &Cli) -> Result<GenerateRequest> {
    let resolve = |raw: &str| -> Result<ProjectPath> { Ok(resolver.resolve(raw, Some(cwd))?) };
    let template = |raw: Option<&str>, builtin: fn() -> TemplateSource| -> Result<TemplateSource> {
        match raw {
            Some(raw) => Ok(TemplateSource::File(resolve(raw)?)),
            None => Ok(builtin()),
        }
    };

    let qmake = match &cli.qmake {
        Some(project) => Some(QmakeRequest {
            project: resolve(project)?,
            template: template(cli.qmake_template.as_deref(), TemplateSource::builtin_qmake)?,
        }),
        None => None,
    };

    Ok(GenerateRequest {
        sketch: resolve(&cli.sketch)?,
        configs: cli
            .configs
            .iter()
            .map(|config| resolve(config))
            .collect::<Result<_>>()?,
        makefile: resolve(&cli.makefile)?,
        makefile_template: template(
            cli.makefile_template.as_deref(),
            TemplateSource::builtin_makefile,
        )?,
        qmake,
    })
}

fn print_report(report: &GenerationReport) {
    for path in &report.written {
        println!("{} {}", "Generated".green(), path);
    }
    for warning in &report.warnings {
        eprintln!("{}: {}", "warning".yellow().bold(), warning);
    }
    println!(
        "Files generated in {:.3} seconds",
        report.elapsed.as_secs_f64()
    );
}
