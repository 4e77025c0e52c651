//! Run a TDGL simulation against a compiled mesh and write a time series of
//! order-parameter/potential snapshots.

use clap::Parser;
use log::info;
use simple_logger::SimpleLogger;
use tdgl::config::SimulateArgs;
use tdgl::mesh::SelectOp;
use tdgl::persistence::DataHandler;
use tdgl::runner::reporter::{IndicatifReporter, MinitersReporter, NullReporter, Reporter};
use tdgl::runner::{RunConfig, Runner};
use tdgl::tdgl::operators::symmetric_gauge_vector_potential;
use tdgl::tdgl::{StepParams, TdglOperators};
use tdgl::{Result, TdglError};

fn main() -> Result<()> {
    let args = SimulateArgs::parse();
    SimpleLogger::new()
        .with_level(args.log_level())
        .init()
        .expect("logger already initialized");

    let start = std::time::Instant::now();
    info!("loading mesh from {:?}", args.input);

    let input_handler = DataHandler::open_read_only(&args.input)?;
    let mesh = input_handler.load_mesh()?;
    let alpha = input_handler.load_disorder()?.unwrap_or_else(|| vec![1.0; mesh.num_sites()]);

    let (input_rect, output_rect) = mesh.get_flow_edges()?;
    let rect_predicates = |r: [f64; 4]| -> Vec<Box<dyn Fn(f64, f64) -> bool>> {
        vec![
            Box::new(move |x: f64, _: f64| x >= r[0] && x <= r[1]),
            Box::new(move |_: f64, y: f64| y >= r[2] && y <= r[3]),
        ]
    };

    let input_edges = mesh.select_boundary_edges(&rect_predicates(input_rect), SelectOp::And);
    let output_edges = mesh.select_boundary_edges(&rect_predicates(output_rect), SelectOp::And);

    let metal_boundary: Vec<usize> = mesh
        .select_boundary_sites(&rect_predicates(input_rect), SelectOp::And)
        .into_iter()
        .chain(mesh.select_boundary_sites(&rect_predicates(output_rect), SelectOp::And))
        .collect();

    let voltage_points = mesh
        .voltage_points
        .ok_or_else(|| TdglError::InvalidMesh("mesh has no voltage_points configured".into()))?;

    let vector_potential = symmetric_gauge_vector_potential(&mesh, args.magnetic_field);

    info!("assembling operators");
    let operators = TdglOperators::build(&mesh, &metal_boundary, &vector_potential)?;

    let config = RunConfig {
        steps: args.steps,
        save_every: args.save_every,
        skip: args.skip,
        current: args.current,
        current_max: args.current_max,
        steps_per_current: args.steps_per_current,
        vector_potential: vector_potential.clone(),
        magnetic_field: args.magnetic_field,
        params: StepParams {
            dt: args.time_step,
            complex_time_scale: args.complex_time_scale,
            gamma: args.gamma,
            alpha,
        },
        metal_boundary,
        input_edges,
        output_edges,
        voltage_points,
    };

    let output_handler = DataHandler::create(&args.output)?;
    output_handler.save_mesh(&mesh)?;
    output_handler.save_disorder(&config.params.alpha)?;

    let mut reporter: Box<dyn Reporter> = if let Some(miniters) = args.miniters {
        Box::new(MinitersReporter::new(miniters))
    } else if atty_stdout() {
        Box::new(IndicatifReporter::new())
    } else {
        Box::new(NullReporter)
    };

    let runner = Runner::new(&mesh, operators, config, &output_handler, reporter.as_mut());
    runner.run()?;

    output_handler.close()?;
    info!("finished in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn atty_stdout() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}
