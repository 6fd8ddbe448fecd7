//! # Trestle CLI
//!
//! Runs a bridge analysis and prints the report.
//!
//! ```text
//! trestle [project.json]
//! ```
//!
//! Without an argument the built-in demonstration bridge is analysed: a
//! 1200 mm matboard box girder under the standard 400 N train. Set
//! `RUST_LOG=debug` to see sweep and buckling details.

use std::path::Path;
use std::process::ExitCode;

use trestle_core::calculations::AnalysisReport;
use trestle_core::errors::{CalcError, CalcResult};
use trestle_core::file_io::load_project;
use trestle_core::loads::SweepDirection;
use trestle_core::project::Project;
use trestle_core::section::{CompositeCrossSection, JointOrientation, RectangularElement};

/// Matboard box girder with glue tabs under the top flange.
fn demo_project() -> CalcResult<Project> {
    let t = 1.27;
    let mut section = CompositeCrossSection::new();
    let bottom = section.add_element(RectangularElement::new(80.0, t, 0.0));
    let left_web = section.add_element(RectangularElement::new(t, 75.0 - t, t));
    let right_web = section.add_element(RectangularElement::new(t, 75.0 - t, t).at_x(80.0 - t));
    let left_tab = section.add_element(RectangularElement::new(5.0, t, 75.0 - t).at_x(t));
    let right_tab = section.add_element(RectangularElement::new(5.0, t, 75.0 - t).at_x(75.0 - t));
    let top = section.add_element(RectangularElement::new(100.0, t, 75.0).at_x(-10.0));

    section.add_adhesive_joint(left_web, bottom, JointOrientation::Horizontal, t);
    section.add_adhesive_joint(right_web, bottom, JointOrientation::Horizontal, t);
    section.add_adhesive_joint(top, left_tab, JointOrientation::Horizontal, 5.0 + t);
    section.add_adhesive_joint(top, right_tab, JointOrientation::Horizontal, 5.0 + t);

    let mut project = Project::new("", "demo", "");
    project.set_geometry(&section)?;
    Ok(project)
}

fn run(path: Option<&Path>) -> CalcResult<AnalysisReport> {
    let project = match path {
        Some(path) => load_project(path)?,
        None => {
            log::info!("no project given, analysing the demonstration bridge");
            demo_project()?
        }
    };

    let mut beam = project.build_model()?;
    beam.sweep(SweepDirection::LeftToRight)?;
    beam.analyze()
}

fn print_error(err: &CalcError) {
    eprintln!("Error: {}", err);
    if let Ok(json) = serde_json::to_string_pretty(err) {
        eprintln!("{}", json);
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let arg = std::env::args().nth(1);
    println!("Trestle - Moving-Load Beam Analysis");
    println!("===================================");
    println!();

    match run(arg.as_deref().map(Path::new)) {
        Ok(report) => {
            println!("{}", report);
            println!();
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    print_error(&CalcError::serialization(e));
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_error(&err);
            ExitCode::FAILURE
        }
    }
}
