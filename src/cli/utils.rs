//! Utilities for creating the command line interface.

use crate::{exit_on_error, exit_on_false, geometry::In2D, io::Verbosity};
use clap::ArgMatches;
use indicatif::ProgressStyle;
use lazy_static::lazy_static;
use std::str::FromStr;

lazy_static! {
    static ref DEFAULT_PROGRESS_STYLE: ProgressStyle = ProgressStyle::default_bar()
        .template("Progress: {bar:40}  {percent}% | ETA: {eta}")
        .expect("Invalid progress bar template");
}

pub fn parse_value_string<T>(argument_name: &str, value_string: &str) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    exit_on_error!(
        value_string.parse(),
        "Error: Could not parse value for {0}: {1}",
        argument_name
    )
}

fn verify_argument_value_count<T>(argument_name: &str, values: &[T], required_count: usize) {
    let count = values.len();
    exit_on_false!(
        count == required_count,
        "Error: {} must have {} values, got {}",
        argument_name,
        required_count,
        count
    );
}

pub fn get_value_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    parse_value_string(
        argument_name,
        arguments
            .get_one::<String>(argument_name)
            .expect("No value for required argument"),
    )
}

pub fn get_value_from_parseable_argument<T>(arguments: &ArgMatches, argument_name: &str) -> Option<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    arguments
        .get_one::<String>(argument_name)
        .map(|value_string| parse_value_string(argument_name, value_string))
}

/// Parses an argument taking one value per grid axis.
///
/// A single value is used for both axes.
pub fn get_in2d_values_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> In2D<T>
where
    T: FromStr + Copy,
    <T as FromStr>::Err: std::fmt::Display,
{
    let mut values: Vec<T> = arguments
        .get_many::<String>(argument_name)
        .expect("No value for argument with default")
        .map(|value_string| parse_value_string(argument_name, value_string))
        .collect();
    if values.len() == 1 {
        values.push(values[0]);
    }
    verify_argument_value_count(argument_name, &values, 2);
    In2D::new(values[0], values[1])
}

pub fn get_value_from_required_constrained_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
    possible_value_strings: &[&str],
    possible_values: &[T],
) -> T
where
    T: Copy,
{
    let value_string = arguments
        .get_one::<String>(argument_name)
        .expect("No value for required argument");
    possible_value_strings
        .iter()
        .zip(possible_values)
        .find_map(|(possible_value_string, possible_value)| {
            if possible_value_string == value_string {
                Some(*possible_value)
            } else {
                None
            }
        })
        .unwrap_or_else(|| {
            crate::exit_with_error!(
                "Error: Invalid value for {}: {}",
                argument_name,
                value_string
            )
        })
}

pub fn parse_verbosity(arguments: &ArgMatches, support_progress: bool) -> Verbosity {
    if support_progress && arguments.get_flag("progress") {
        Verbosity::Progress(DEFAULT_PROGRESS_STYLE.clone())
    } else if arguments.get_flag("verbose") {
        Verbosity::Messages
    } else {
        Verbosity::Quiet
    }
}
