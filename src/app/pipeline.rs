//! Command pipelines shared by the CLI surface.
//!
//! Each command follows the same shape: resolve inputs, run the relevant
//! core steps, report, write outputs. Keeping the workflows here leaves
//! `cli` with parsing only and the `filter` modules free of any I/O.

use crate::cli::prompt::ConsoleSession;
use crate::cli::{
    CenterArgs, ExtractRawArgs, ExtractRingArgs, FilterArgs, PlotArgs, SampleArgs,
    normalize_object_name,
};
use crate::console;
use crate::data::archive::ArchiveClient;
use crate::data::sample::{SampleSpec, generate_sample};
use crate::domain::{Dataset, FilterMethod, GridAxis, PlotKind, SkyPoint};
use crate::error::AppError;
use crate::filter::grid::{range_from_endpoints, validate_grid};
use crate::filter::refine::{RefineOutcome, run_refinement_loop};
use crate::filter::{apply_mask, build_ring_mask, classify_members, ensure_annulus};
use crate::io::selection::{read_selection_json, write_selection_json};
use crate::io::table::{TableRead, read_table, write_table};
use crate::plot::{render_sky_scatter, render_vpd_scatter};
use crate::report;

/// Resolve the search center from explicit coordinates or an object name.
fn resolve_center(client: &ArchiveClient, args: &CenterArgs) -> Result<SkyPoint, AppError> {
    if let (Some(ra), Some(dec)) = (args.ra, args.dec) {
        if !(0.0..360.0).contains(&ra) || !(-90.0..=90.0).contains(&dec) {
            return Err(AppError::input(format!(
                "Center out of range: ra={ra} (expected [0, 360)), dec={dec} (expected [-90, 90])."
            )));
        }
        return Ok(SkyPoint { ra, dec });
    }
    if let Some(name) = &args.name {
        normalize_object_name(name)?;
        let center = client.resolve_center(name)?;
        console::info(&format!(
            "Resolved '{name}' to ra={:.5}, dec={:.5}.",
            center.ra, center.dec
        ));
        return Ok(center);
    }
    Err(AppError::input(
        "Provide either --name or both --ra and --dec. Example: --ra 10.0 --dec -20.0",
    ))
}

fn report_ingest(read: &TableRead) -> Result<(), AppError> {
    print!("{}", report::format_ingest_summary(read));
    if read.dataset.is_empty() {
        return Err(AppError::no_data("No usable rows in the table."));
    }
    Ok(())
}

pub fn run_extract_raw(args: ExtractRawArgs) -> Result<(), AppError> {
    let client = ArchiveClient::from_env();
    let center = resolve_center(&client, &args.center)?;
    let radius_deg = args.unit.to_degrees(args.radius);

    console::info(&format!(
        "Querying cone: center=({:.5}, {:.5}), radius={radius_deg:.5} deg.",
        center.ra, center.dec
    ));
    let read = client.fetch_cone(center, radius_deg, args.limit)?;
    report_ingest(&read)?;

    write_table(&args.output, &read.dataset)?;
    console::success(&format!(
        "Saved {} rows to '{}'.",
        read.dataset.len(),
        args.output.display()
    ));
    Ok(())
}

pub fn run_extract_ring(args: ExtractRingArgs) -> Result<(), AppError> {
    let outer_deg = args.unit.to_degrees(args.outer);
    let inner_deg = args.unit.to_degrees(args.inner);
    // Fail before the archive round-trip, not after.
    ensure_annulus(outer_deg, inner_deg)?;

    let client = ArchiveClient::from_env();
    let center = resolve_center(&client, &args.center)?;

    console::info(&format!(
        "Querying ring: center=({:.5}, {:.5}), outer={outer_deg:.5} deg, inner={inner_deg:.5} deg.",
        center.ra, center.dec
    ));
    let read = client.fetch_cone(center, outer_deg, args.limit)?;
    report_ingest(&read)?;

    let mask = build_ring_mask(&read.dataset, center, inner_deg);
    let ring = apply_mask(&read.dataset, &mask)?;
    console::info(&format!(
        "Inner disk excluded {} of {} rows.",
        read.dataset.len() - mask.count_kept(),
        read.dataset.len()
    ));
    if ring.is_empty() {
        return Err(AppError::no_data("No rows left outside the inner radius."));
    }

    write_table(&args.output, &ring)?;
    console::success(&format!(
        "Saved {} ring rows to '{}'.",
        ring.len(),
        args.output.display()
    ));
    Ok(())
}

pub fn run_filter(args: FilterArgs) -> Result<(), AppError> {
    match args.method {
        FilterMethod::Vpd => {}
        FilterMethod::Cordoni => {
            return Err(AppError::input(
                "The Cordoni sigma-clipping filter is not available in this build; use --method vpd.",
            ));
        }
    }

    let read = read_table(&args.file)?;
    report_ingest(&read)?;

    let center = vpd_center(&read.dataset, args.pmra, args.pmdec);
    console::info(&format!(
        "VPD anchor: pmra={:.3}, pmdec={:.3} mas/yr.",
        center.0, center.1
    ));

    let width = range_from_endpoints(GridAxis::Width, &args.width, args.width_steps)?;
    let height = range_from_endpoints(GridAxis::Height, &args.height, args.height_steps)?;
    let inclination =
        range_from_endpoints(GridAxis::Inclination, &args.inclination, args.inclination_steps)?;
    let grid = validate_grid(width, height, inclination)?;

    let mut session = ConsoleSession {
        plot_width: args.plot_width,
        plot_height: args.plot_height,
    };
    let progress = console::PercentProgress::new();

    match run_refinement_loop(&read.dataset, center, grid, &mut session, &progress)? {
        RefineOutcome::Accepted(selection) => {
            write_table(&args.output, &selection.filtered)?;
            if let Some(path) = &args.save_selection {
                write_selection_json(
                    path,
                    &selection.outcome.best,
                    read.dataset.len(),
                    &selection.grid,
                )?;
                console::info(&format!("Selection saved to '{}'.", path.display()));
            }
            console::success(&format!(
                "Saved {} member rows to '{}' ({:.1}% of the input).",
                selection.filtered.len(),
                args.output.display(),
                report::survival_percent(selection.filtered.len(), read.dataset.len()),
            ));
        }
        RefineOutcome::Aborted => {
            console::info("Aborted at user request; nothing saved.");
        }
    }
    Ok(())
}

pub fn run_plot(args: PlotArgs) -> Result<(), AppError> {
    let read = read_table(&args.file)?;
    report_ingest(&read)?;

    let rendered = match args.kind {
        PlotKind::Sky => render_sky_scatter(&read.dataset, args.width, args.height)?,
        PlotKind::Vpd => match &args.selection {
            Some(path) => {
                let selection = read_selection_json(path)?;
                let (_, tags) = classify_members(&read.dataset, &selection.best.ellipse);
                render_vpd_scatter(
                    &read.dataset,
                    Some(&tags),
                    Some(&selection.best.ellipse),
                    args.width,
                    args.height,
                )?
            }
            None => render_vpd_scatter(&read.dataset, None, None, args.width, args.height)?,
        },
    };
    println!("{rendered}");
    Ok(())
}

pub fn run_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = SampleSpec {
        center: SkyPoint {
            ra: args.ra,
            dec: args.dec,
        },
        radius_deg: args.unit.to_degrees(args.radius),
        n_field: args.n_field,
        n_cluster: args.n_cluster,
        cluster_pm: (args.pmra, args.pmdec),
        cluster_dispersion: args.dispersion,
        field_spread: args.spread,
        seed: args.seed,
    };
    let dataset = generate_sample(&spec)?;
    write_table(&args.output, &dataset)?;
    console::success(&format!(
        "Saved {} synthetic stars ({} field + {} cluster) to '{}'.",
        dataset.len(),
        args.n_field,
        args.n_cluster,
        args.output.display()
    ));
    Ok(())
}

/// Median proper motion of the table, used when no explicit anchor is given.
fn vpd_center(dataset: &Dataset, pmra: Option<f64>, pmdec: Option<f64>) -> (f64, f64) {
    let x = pmra.unwrap_or_else(|| median(dataset.records.iter().map(|r| r.pmra).collect()));
    let y = pmdec.unwrap_or_else(|| median(dataset.records.iter().map(|r| r.pmdec).collect()));
    (x, y)
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}
