//! End-to-end integration tests across the workspace crates
//!
//! These tests exercise the complete flow: path resolution -> configuration
//! composition -> Makefile generation -> qmake project generation.

use genmake_core::{
    BuildRunner, ConfigComposer, Error, GenerateRequest, GeneratedHeader, QmakeRequest,
    TemplateSource,
};
use genmake_fs::{PathResolver, ProjectPath};
use genmake_test_utils::project::TestProject;
use pretty_assertions::assert_eq;

/// A toolchain whose build prints a fixed compiler line.
struct CannedBuild(&'static str);

impl BuildRunner for CannedBuild {
    fn run_rule(&self, _makefile: &ProjectPath, rule: &str) -> genmake_core::Result<String> {
        Ok(if rule == "build" {
            self.0.to_string()
        } else {
            String::new()
        })
    }
}

fn resolve(project: &TestProject, raw: &str) -> ProjectPath {
    PathResolver::new().resolve(raw, Some(project.root())).unwrap()
}

fn header() -> GeneratedHeader {
    GeneratedHeader::new("arduino-genmakefile")
}

/// Set up a sketch in `a/` using the library `libA/` next to it.
fn setup_project() -> TestProject {
    let project = TestProject::new();
    project.write_sketch("a/sketch.ino");
    project.write_file("a/helpers.h", "");
    project.write_file("libA/libA.h", "");
    project.write_file("libA/src/libA.cpp", "");
    project.write_config("a/config.yaml", "fqbn: arduino:avr:uno\nlibs: [../libA]\n");
    project
}

#[test]
fn test_library_is_relative_to_each_descriptor() {
    let project = setup_project();
    let request = GenerateRequest {
        sketch: resolve(&project, "a/sketch.ino"),
        configs: vec![resolve(&project, "a/config.yaml")],
        makefile: resolve(&project, "a/Makefile"),
        makefile_template: TemplateSource::builtin_makefile(),
        qmake: Some(QmakeRequest {
            project: resolve(&project, "a/b/proj.pro"),
            template: TemplateSource::builtin_qmake(),
        }),
    };

    let report = request
        .prepare(&ConfigComposer::new())
        .unwrap()
        .generate(&header(), &CannedBuild("avr-g++ -DARDUINO=10819 sketch.ino.cpp"))
        .unwrap();

    let written: Vec<_> = report
        .written
        .iter()
        .map(|p| p.location().to_path_buf())
        .collect();
    assert_eq!(
        written,
        vec![
            project.path("a/Makefile"),
            project.path("a/b/proj.pro"),
            project.path("a/b/proj.pri"),
            project.path("a/b/proj"),
        ]
    );

    project.assert_file_contains("a/Makefile", "\t\t--library \"$(MAKEFILE_DIR)/../libA\" \\\n");
    project.assert_file_contains("a/Makefile", "SKETCH := $(MAKEFILE_DIR)/sketch.ino\n");
    project.assert_file_contains("a/Makefile", "FQBN := arduino:avr:uno\n");

    let pro = project.read("a/b/proj.pro");
    for expected in [
        "TARGET = proj\n",
        "include(proj.pri)\n",
        "make -C $$PWD -f ../Makefile build\n",
        "\tARDUINO=10819 \\\n",
        "\t../Makefile \\\n",
        "\t../config.yaml \\\n",
        "\t../sketch.ino \\\n",
        "\t../../libA/src/libA.cpp \\\n",
        "\t../helpers.h \\\n",
        "\t../../libA/libA.h \\\n",
        "\t.. \\\n",
        "\t../../libA \\\n",
    ] {
        assert!(pro.contains(expected), "missing {expected:?} in:\n{pro}");
    }

    project.assert_file_contains("a/b/proj", "make -f ../Makefile run\n");
}

#[test]
fn test_user_templates() {
    let project = setup_project();
    project.write_file(
        "tpl/Makefile.in",
        "board=FQBN_PLACEHOLDER\ndir=BINDIR_PLACEHOLDER\nbin=BINFILE_PLACEHOLDER\nflags=CFLAGS_PLACEHOLDER\n",
    );
    project.write_file(
        "tpl/ide.pro",
        "TARGET = TARGET_PLACEHOLDER\nDEFINES += \\\n\tDEFINES_PLACEHOLDER\n",
    );
    project.write_file("tpl/ide.pri", "INCLUDEPATH += \\\n\tINCLUDEPATH_PLACEHOLDER\n");
    project.write_config("a/flags.yaml", "cflags: [-Wall, -Wextra]\nbaudrate: 9600\n");

    let request = GenerateRequest {
        sketch: resolve(&project, "a/sketch.ino"),
        configs: vec![
            resolve(&project, "a/config.yaml"),
            resolve(&project, "a/flags.yaml"),
        ],
        makefile: resolve(&project, "a/Makefile.release"),
        makefile_template: TemplateSource::File(resolve(&project, "tpl/Makefile.in")),
        qmake: Some(QmakeRequest {
            project: resolve(&project, "a/release.pro"),
            template: TemplateSource::File(resolve(&project, "tpl/ide.pro")),
        }),
    };

    let prepared = request.prepare(&ConfigComposer::new()).unwrap();
    assert_eq!(prepared.config().baudrate, "9600");
    prepared
        .generate(&header(), &CannedBuild("gcc \"-DNAME=\\\"x\\\"\" -c"))
        .unwrap();

    assert_eq!(
        project.read("a/Makefile.release"),
        "# Generated by arduino-genmakefile\n#\n# Command line:\n# arduino-genmakefile\n\n\
         board=arduino:avr:uno\ndir=bin.release\nbin=sketch.ino.bin\nflags=-Wall -Wextra\n"
    );
    assert_eq!(
        project.read("a/release.pro"),
        "# Generated by arduino-genmakefile\n#\n# Command line:\n# arduino-genmakefile\n\n\
         TARGET = release\nDEFINES += \\\n\tNAME=\\\\\\\"x\\\\\\\" \\\n"
    );
    // Every include path is project relative, so the include file lists none.
    assert_eq!(
        project.read("a/release.pri"),
        "# Generated by arduino-genmakefile\n#\n# Command line:\n# arduino-genmakefile\n\n\
         INCLUDEPATH += \\\n"
    );
}

#[test]
fn test_missing_include_template_stops_the_run() {
    let project = setup_project();
    project.write_file("tpl/ide.pro", "TARGET = TARGET_PLACEHOLDER\n");

    let request = GenerateRequest {
        sketch: resolve(&project, "a/sketch.ino"),
        configs: vec![resolve(&project, "a/config.yaml")],
        makefile: resolve(&project, "a/Makefile"),
        makefile_template: TemplateSource::builtin_makefile(),
        qmake: Some(QmakeRequest {
            project: resolve(&project, "a/ide.pro"),
            template: TemplateSource::File(resolve(&project, "tpl/ide.pro")),
        }),
    };

    let err = request.prepare(&ConfigComposer::new()).unwrap_err();

    match err {
        Error::Fs(genmake_fs::Error::RequiredFileMissing { path }) => {
            assert_eq!(path, project.path("tpl/ide.pri"));
        }
        other => panic!("unexpected error: {other}"),
    }
    project.assert_file_not_exists("a/Makefile");
}

#[test]
fn test_qmake_dirs_and_exclusions() {
    let project = setup_project();
    project.write_file("extra/tool.cpp", "");
    project.write_file("extra/tests/test_tool.cpp", "");
    project.write_file("extra/.cache/generated.cpp", "");
    project.write_config(
        "a/config.yaml",
        "fqbn: arduino:avr:uno\nqmake_dirs: [../extra]\nqmake_exclude_dirs: [../extra/tests]\n",
    );

    let request = GenerateRequest {
        sketch: resolve(&project, "a/sketch.ino"),
        configs: vec![resolve(&project, "a/config.yaml")],
        makefile: resolve(&project, "a/Makefile"),
        makefile_template: TemplateSource::builtin_makefile(),
        qmake: Some(QmakeRequest {
            project: resolve(&project, "a/sketch.pro"),
            template: TemplateSource::builtin_qmake(),
        }),
    };

    request
        .prepare(&ConfigComposer::new())
        .unwrap()
        .generate(&header(), &CannedBuild(""))
        .unwrap();

    let pro = project.read("a/sketch.pro");
    assert!(pro.contains("\t../extra/tool.cpp \\\n"));
    assert!(!pro.contains("test_tool.cpp"));
    assert!(!pro.contains("generated.cpp"));
    assert!(!pro.contains("libA"));
}
