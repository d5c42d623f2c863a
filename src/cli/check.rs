//! Command line interface for checking the interpolation operators on a synthetic
//! problem.

use super::utils;
use crate::{
    dispatch::{Dispatcher, Parallelism},
    exit_on_error, exit_on_false,
    field::sample_inner_product,
    geometry::In2D,
    interp2::{Interp2Params, TableInterp2},
    interpolation::InterpOrder,
    io::Verbosity,
    num::TableValue,
    random,
    table::KernelTable,
};
use clap::{Arg, ArgAction, ArgMatches, Command};
use num::Complex;
use std::{f64::consts::PI, time::Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KernelKind {
    Real,
    Complex,
}

/// Builds a representation of the `check` command line subcommand.
pub fn create_check_subcommand() -> Command {
    Command::new("check")
        .about("Verify the interpolation operators on a synthetic problem")
        .long_about(
            "Verify the interpolation operators on a synthetic problem.\n\
             Random grid values, sample values and sample coordinates are drawn, and\n\
             the forward and adjoint operators are applied to them. The command reports\n\
             how well the two operators agree with each other and how much the result\n\
             depends on the number of worker threads.",
        )
        .arg(
            Arg::new("grid-shape")
                .long("grid-shape")
                .require_equals(true)
                .value_name("K1,K2")
                .value_delimiter(',')
                .help("Number of grid cells along each axis")
                .default_value("64"),
        )
        .arg(
            Arg::new("support")
                .short('J')
                .long("support")
                .require_equals(true)
                .value_name("J1,J2")
                .value_delimiter(',')
                .help("Width of the kernel support along each axis, in grid cells")
                .default_value("6"),
        )
        .arg(
            Arg::new("oversampling")
                .short('L')
                .long("oversampling")
                .require_equals(true)
                .value_name("L1,L2")
                .value_delimiter(',')
                .help("Number of kernel table entries per grid cell along each axis")
                .default_value("512"),
        )
        .arg(
            Arg::new("sign-flips")
                .long("sign-flips")
                .require_equals(true)
                .value_name("FLIP1,FLIP2")
                .value_delimiter(',')
                .help("Whether the kernel changes sign when wrapping around each axis")
                .default_value("false"),
        )
        .arg(
            Arg::new("order")
                .short('o')
                .long("order")
                .require_equals(true)
                .value_name("ORDER")
                .help("Interpolation between kernel table entries")
                .value_parser(["nearest", "linear", "0", "1"])
                .default_value("linear"),
        )
        .arg(
            Arg::new("kernel")
                .short('k')
                .long("kernel")
                .require_equals(true)
                .value_name("KIND")
                .help(
                    "Kind of kernel table to use:\n\
                     real: Triangular kernel\n\
                     complex: Triangular kernel with a linearly varying phase",
                )
                .value_parser(["real", "complex"])
                .default_value("real"),
        )
        .arg(
            Arg::new("samples")
                .short('m')
                .long("samples")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of random samples")
                .default_value("100000"),
        )
        .arg(
            Arg::new("periods")
                .long("periods")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of grid periods the sample coordinates are spread over")
                .default_value("3"),
        )
        .arg(
            Arg::new("threads")
                .short('n')
                .long("threads")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of worker threads [default: number of available cores]"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Seed for the random number generator [default: random]"),
        )
        .arg(
            Arg::new("tolerance")
                .long("tolerance")
                .require_equals(true)
                .value_name("VALUE")
                .help("Largest acceptable relative mismatch")
                .default_value("1e-10"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Print status messages"),
        )
        .arg(
            Arg::new("progress")
                .short('p')
                .long("progress")
                .action(ArgAction::SetTrue)
                .help("Show progress bars"),
        )
}

/// Runs the actions for the `check` subcommand using the given arguments.
pub fn run_check_subcommand(arguments: &ArgMatches) {
    let grid_shape: In2D<usize> =
        utils::get_in2d_values_from_required_parseable_argument(arguments, "grid-shape");
    let support: In2D<usize> =
        utils::get_in2d_values_from_required_parseable_argument(arguments, "support");
    let oversampling: In2D<usize> =
        utils::get_in2d_values_from_required_parseable_argument(arguments, "oversampling");
    let sign_flips: In2D<bool> =
        utils::get_in2d_values_from_required_parseable_argument(arguments, "sign-flips");
    let order: InterpOrder = utils::get_value_from_required_parseable_argument(arguments, "order");
    let kernel_kind = utils::get_value_from_required_constrained_argument(
        arguments,
        "kernel",
        &["real", "complex"],
        &[KernelKind::Real, KernelKind::Complex],
    );

    let n_samples: usize = utils::get_value_from_required_parseable_argument(arguments, "samples");
    let n_periods: f64 = utils::get_value_from_required_parseable_argument(arguments, "periods");
    exit_on_false!(
        n_periods.is_finite() && n_periods > 0.0,
        "Error: periods must be a positive number"
    );
    let tolerance: f64 = utils::get_value_from_required_parseable_argument(arguments, "tolerance");

    let parallelism = match utils::get_value_from_parseable_argument(arguments, "threads") {
        Some(n_threads) => exit_on_error!(
            Parallelism::new(n_threads),
            "Error: Invalid number of threads: {}"
        ),
        None => Parallelism::available(),
    };
    let seed: Option<u64> = utils::get_value_from_parseable_argument(arguments, "seed");
    let verbosity = utils::parse_verbosity(arguments, true);

    let params = exit_on_error!(
        Interp2Params::new(grid_shape, support, oversampling, order),
        "Error: Invalid interpolation parameters: {}"
    )
    .with_sign_flips(sign_flips);

    let config = CheckConfig {
        n_samples,
        n_periods,
        tolerance,
        parallelism,
        seed,
        verbosity,
    };

    match kernel_kind {
        KernelKind::Real => {
            let tables = In2D::with_each_component(|dim| {
                exit_on_error!(
                    KernelTable::<f64>::triangular(params.support()[dim], params.oversampling()[dim]),
                    "Error: Could not tabulate kernel: {}"
                )
            });
            run_check(&params, tables, &config);
        }
        KernelKind::Complex => {
            let tables = In2D::with_each_component(|dim| {
                exit_on_error!(
                    tabulate_phased_triangular(params.support()[dim], params.oversampling()[dim]),
                    "Error: Could not tabulate kernel: {}"
                )
            });
            run_check(&params, tables, &config);
        }
    }
}

struct CheckConfig {
    n_samples: usize,
    n_periods: f64,
    tolerance: f64,
    parallelism: Parallelism,
    seed: Option<u64>,
    verbosity: Verbosity,
}

fn tabulate_phased_triangular(
    support: usize,
    oversampling: usize,
) -> crate::InterpResult<KernelTable<Complex<f64>>> {
    let half_width = 0.5 * support as f64;
    KernelTable::tabulate(support, oversampling, |offset: f64| {
        let magnitude = (1.0 - offset.abs() / half_width).max(0.0);
        Complex::from_polar(magnitude, 0.5 * PI * offset / half_width)
    })
}

fn run_check<V>(params: &Interp2Params, tables: In2D<KernelTable<V>>, config: &CheckConfig)
where
    V: TableValue<Real = f64>,
{
    let operator = exit_on_error!(
        TableInterp2::new(params, tables),
        "Error: Invalid kernel tables: {}"
    );
    let verbosity = &config.verbosity;

    let mut rng = random::create_rng(config.seed);
    let grid_values = random::draw_grid_values(params.grid_shape().clone(), &mut rng);
    let coords = random::draw_sample_coords(
        params.grid_shape(),
        config.n_periods,
        config.n_samples,
        &mut rng,
    );
    let sample_values = random::draw_sample_values(config.n_samples, &mut rng);

    if verbosity.print_messages() {
        println!(
            "Checking {} {} kernel with support {} and oversampling {} on grid of shape {} (sign flips: {})",
            if V::IS_COMPLEX { "complex" } else { "real" },
            operator.order(),
            params.support(),
            params.oversampling(),
            params.grid_shape(),
            params.sign_flips()
        );
    }

    let dispatcher = exit_on_error!(
        Dispatcher::new(&config.parallelism),
        "Error: Could not create worker pool: {}"
    );

    let start_instant = Instant::now();
    let forward = exit_on_error!(
        operator.forward(&grid_values, &coords, &dispatcher, verbosity),
        "Error: Forward interpolation failed: {}"
    );
    let forward_time = start_instant.elapsed().as_secs_f64();

    let start_instant = Instant::now();
    let adjoint = exit_on_error!(
        operator.adjoint(&sample_values, &coords, &dispatcher, verbosity),
        "Error: Adjoint interpolation failed: {}"
    );
    let adjoint_time = start_instant.elapsed().as_secs_f64();

    let sample_side = sample_inner_product(&forward, &sample_values);
    let grid_side = grid_values.inner_product(&adjoint);
    let adjointness_mismatch =
        (sample_side - grid_side).norm() / sample_side.norm().max(grid_side.norm()).max(f64::MIN_POSITIVE);

    let sequential = exit_on_error!(
        Dispatcher::new(&Parallelism::sequential()),
        "Error: Could not create worker pool: {}"
    );
    let sequential_forward = exit_on_error!(
        operator.forward(&grid_values, &coords, &sequential, &Verbosity::Quiet),
        "Error: Forward interpolation failed: {}"
    );
    let sequential_adjoint = exit_on_error!(
        operator.adjoint(&sample_values, &coords, &sequential, &Verbosity::Quiet),
        "Error: Adjoint interpolation failed: {}"
    );
    let thread_deviation = relative_deviation(forward.iter(), sequential_forward.iter()).max(
        relative_deviation(adjoint.as_slice().iter(), sequential_adjoint.as_slice().iter()),
    );

    println!(
        "Forward:  {} samples in {:.3} s",
        config.n_samples, forward_time
    );
    println!(
        "Adjoint:  {} samples in {:.3} s",
        config.n_samples, adjoint_time
    );
    println!("Adjointness mismatch: {:e}", adjointness_mismatch);
    println!(
        "Deviation between 1 and {} threads: {:e}",
        config.parallelism.n_threads(),
        thread_deviation
    );

    exit_on_false!(
        adjointness_mismatch <= config.tolerance,
        "Error: Adjointness mismatch {:e} exceeds tolerance {:e}",
        adjointness_mismatch,
        config.tolerance
    );
    exit_on_false!(
        thread_deviation <= config.tolerance,
        "Error: Thread count deviation {:e} exceeds tolerance {:e}",
        thread_deviation,
        config.tolerance
    );
}

fn relative_deviation<'a, I>(values: I, reference: I) -> f64
where
    I: Iterator<Item = &'a Complex<f64>>,
{
    let (difference, norm) = values
        .zip(reference)
        .fold((0.0, 0.0), |(difference, norm), (value, reference)| {
            (
                difference + (value - reference).norm_sqr(),
                norm + reference.norm_sqr(),
            )
        });
    if difference == 0.0 {
        0.0
    } else {
        (difference / norm.max(f64::MIN_POSITIVE)).sqrt()
    }
}
