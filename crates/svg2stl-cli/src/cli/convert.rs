//! Convert command implementation.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use svg2stl::{
    Conversion, ConvertOptions, Renderer, convert_file, default_output_path, describe, read_svg,
};

use super::summary::{JsonEntityCounts, JsonSummary};
use crate::Cli;

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Execute the convert command.
pub fn cmd_convert(args: &Cli) -> Result<()> {
    let emit_to_stdout = args.emit_scad.as_deref().is_some_and(is_stdio);
    if emit_to_stdout && args.json {
        bail!("--json and --emit-scad - both write to stdout; pick one");
    }

    let options = ConvertOptions {
        dpi: args.dpi,
        curve_steps: args.curve_steps,
    };

    let summary = match &args.emit_scad {
        Some(scad_path) => emit_program(args, &options, scad_path)?,
        None => render_mesh(args, &options)?,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&summary)?;
        println!("{}", json);
    }

    Ok(())
}

/// Write the OpenSCAD program instead of rendering it.
fn emit_program(args: &Cli, options: &ConvertOptions, scad_path: &Path) -> Result<JsonSummary> {
    let conversion = load(args, options)?;
    let mut summary = summarize(args, &conversion, options);

    let program = conversion.description.to_string();
    if is_stdio(scad_path) {
        io::stdout()
            .write_all(program.as_bytes())
            .context("failed to write OpenSCAD program to stdout")?;
    } else {
        fs::write(scad_path, program)
            .with_context(|| format!("failed to write {}", scad_path.display()))?;
        if !args.quiet {
            eprintln!("Wrote: {}", scad_path.display());
        }
        summary.scad = Some(scad_path.display().to_string());
    }
    Ok(summary)
}

/// Render the mesh with OpenSCAD.
fn render_mesh(args: &Cli, options: &ConvertOptions) -> Result<JsonSummary> {
    let output = output_path(args)?;
    let renderer = Renderer::new(&args.openscad);

    let conversion = if is_stdio(&args.input) {
        let conversion = load(args, options)?;
        if !args.quiet {
            eprintln!("Rendering {} with {}", output.display(), renderer.program.display());
        }
        renderer
            .render(&conversion.description, &output)
            .with_context(|| format!("failed to render {}", output.display()))?;
        conversion
    } else {
        if !args.quiet {
            eprintln!("Loading: {}", args.input.display());
            eprintln!("Rendering {} with {}", output.display(), renderer.program.display());
        }
        let conversion = convert_file(&args.input, &output, options, &renderer)
            .with_context(|| format!("failed to convert {}", args.input.display()))?;
        report_loaded(args, &conversion);
        conversion
    };

    if !args.quiet {
        eprintln!("Wrote: {}", output.display());
    }
    let mut summary = summarize(args, &conversion, options);
    summary.output = Some(output.display().to_string());
    Ok(summary)
}

/// Read the SVG from a file or stdin and describe it.
fn load(args: &Cli, options: &ConvertOptions) -> Result<Conversion> {
    let svg = if is_stdio(&args.input) {
        if !args.quiet {
            eprintln!("Reading SVG from stdin...");
        }
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read SVG from stdin")?;
        buffer
    } else {
        if !args.quiet {
            eprintln!("Loading: {}", args.input.display());
        }
        read_svg(&args.input)?
    };

    let conversion = describe(&svg, options)
        .with_context(|| format!("failed to convert {}", args.input.display()))?;
    report_loaded(args, &conversion);
    Ok(conversion)
}

fn report_loaded(args: &Cli, conversion: &Conversion) {
    if args.quiet {
        return;
    }
    let counts = JsonEntityCounts::from_entities(&conversion.document.entities);
    eprintln!(
        "Loaded {} entities ({} paths, {} circles, {} rects, {} skipped), scale {}",
        counts.total(),
        counts.paths,
        counts.circles,
        counts.rects,
        counts.skipped,
        conversion.scale.value()
    );
}

fn summarize(args: &Cli, conversion: &Conversion, options: &ConvertOptions) -> JsonSummary {
    JsonSummary::new(
        args.input.display().to_string(),
        conversion,
        options.dpi,
        options.curve_steps.get(),
    )
}

/// Explicit output, or the input path with an `.stl` extension.
fn output_path(args: &Cli) -> Result<PathBuf> {
    match &args.output {
        Some(path) => Ok(path.clone()),
        None if is_stdio(&args.input) => {
            bail!("an output path is required when reading SVG from stdin")
        }
        None => Ok(default_output_path(&args.input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn output_defaults_next_to_input() {
        let args = Cli::parse_from(["svg2stl", "art/logo.svg"]);
        assert_eq!(output_path(&args).unwrap(), PathBuf::from("art/logo.stl"));

        let args = Cli::parse_from(["svg2stl", "art/logo.svg", "out/plate.stl"]);
        assert_eq!(output_path(&args).unwrap(), PathBuf::from("out/plate.stl"));
    }

    #[test]
    fn stdin_needs_explicit_output() {
        let args = Cli::parse_from(["svg2stl", "-"]);
        assert!(output_path(&args).is_err());
    }

    #[test]
    fn defaults_match_library() {
        let args = Cli::parse_from(["svg2stl", "a.svg"]);
        let defaults = ConvertOptions::default();
        assert_eq!(args.dpi, defaults.dpi);
        assert_eq!(args.curve_steps, defaults.curve_steps);
        assert_eq!(args.openscad, PathBuf::from("openscad"));
        assert!(!args.json && !args.quiet);
    }

    #[test]
    fn zero_values_are_rejected_by_parser() {
        assert!(Cli::try_parse_from(["svg2stl", "a.svg", "--dpi", "0"]).is_err());
        assert!(Cli::try_parse_from(["svg2stl", "a.svg", "--curve-steps", "0"]).is_err());
    }
}
