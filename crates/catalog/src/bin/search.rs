use catalog::{
    filter::{Criteria, filter_courses},
    group::group_by_letter,
    loader::{DataSource, load_all_terms},
};
use log::{error, info};
use models::term::Term;
use std::{env, process::ExitCode};

/// Prints results grouped by subject letter and department instead of as a flat list
const GROUPED_FLAG: &str = "--grouped";

/// Command line arguments
#[derive(Debug, Default)]
struct Args {
    term: Term,
    grouped: bool,
    fields: Vec<(String, String)>,
}

/// Parses `[term] [--grouped] [key=value ...]`
///
/// # Arguments
/// * `args` - Arguments after the program name
///
/// # Returns
/// The parsed arguments, or a message naming the argument that was not understood
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();

    for (index, arg) in args.into_iter().enumerate() {
        if arg == GROUPED_FLAG {
            parsed.grouped = true;
        } else if let Some((key, value)) = arg.split_once('=') {
            parsed.fields.push((key.to_owned(), value.to_owned()));
        } else if index == 0 {
            parsed.term = arg
                .parse()
                .map_err(|_| format!("Unknown term '{arg}'"))?;
        } else {
            return Err(format!("Expected key=value, got '{arg}'"));
        }
    }

    Ok(parsed)
}

/// Searches one term of the catalog and prints the matches as JSON
#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let criteria = match Criteria::from_pairs(args.fields.iter().map(|(k, v)| (k, v))) {
        Ok(criteria) => criteria,
        Err(e) => {
            error!("Invalid search: {e}");
            return ExitCode::FAILURE;
        }
    };

    if criteria.is_empty() {
        info!("No search criteria given, listing every {} course", args.term);
    }

    let catalog = match load_all_terms(&DataSource::from_env()).await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let courses = filter_courses(&catalog.term(args.term).courses, &criteria);
    info!("{} {} courses match", courses.len(), args.term);

    let output = if args.grouped {
        serde_json::to_string_pretty(&group_by_letter(&courses))
    } else {
        serde_json::to_string_pretty(&courses)
    };

    match output {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize results: {e}");
            ExitCode::FAILURE
        }
    }
}
