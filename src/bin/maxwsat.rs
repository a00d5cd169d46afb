use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::error;
use log::info;
use log::LevelFilter;
use thiserror::Error;
use u_maxwsat::random::parse_seed;
use u_maxwsat::random::RandomSource;
use u_maxwsat::sa::Annealer;
use u_maxwsat::sa::ConfigError;
use u_maxwsat::sa::Criteria;
use u_maxwsat::sa::SaConfig;
use u_maxwsat::sa::StepEvent;
use u_maxwsat::sat::parse_mwcnf;
use u_maxwsat::sat::Assignment;
use u_maxwsat::sat::DimacsParseError;
use u_maxwsat::sat::Instance;
use u_maxwsat::sat::InstanceError;
use u_maxwsat::sat::SatProblem;

#[derive(Debug, Parser)]
#[command(author, version, about = "Maximum weighted SAT by simulated annealing", long_about = None)]
struct Args {
    /// The instance to solve, in the weighted DIMACS ('p mwcnf') format.
    #[arg(short, long)]
    file: PathBuf,

    /// Seed of the random generator as a hexadecimal number, with or without
    /// a '0x' prefix. A random seed is used if omitted.
    #[arg(short, long, value_parser = parse_seed)]
    seed: Option<u64>,

    /// The temperature the search starts at.
    #[arg(short = 't', long = "start-temperature", alias = "startTemperature", default_value_t = 1.0)]
    start_temperature: f64,

    /// The search freezes once the temperature drops to this value.
    #[arg(short = 'T', long = "end-temperature", alias = "endTemperature", default_value_t = 1e-4)]
    end_temperature: f64,

    /// Factor the temperature is multiplied by after each equilibrium.
    #[arg(short, long, default_value_t = 0.99)]
    cooling: f64,

    /// Number of steps taken at one temperature.
    #[arg(short, long, default_value_t = 100)]
    equilibrium: u64,

    /// Writes one 'step satisfiedCount weight bestWeight' line per search
    /// step to the given file.
    #[arg(short, long)]
    debug: Option<PathBuf>,

    /// Stop after this many search steps.
    #[arg(short = 'i', long = "max-iter", alias = "maxIter")]
    max_iter: Option<u64>,

    /// Stop after this many steps without finding a better configuration.
    #[arg(short, long)]
    gain: Option<u64>,

    /// Stop after this many steps without accepting a move.
    #[arg(short, long)]
    adjustment: Option<u64>,

    /// Enables log messages from the search.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Failed to read file {1}, more details: {0}")]
    FileReadingError(std::io::Error, String),
    #[error("The instance file was invalid: {0}")]
    InvalidDimacs(#[from] DimacsParseError),
    #[error("The instance was invalid: {0}")]
    InvalidInstance(#[from] InstanceError),
    #[error("Invalid annealing parameters: {0}")]
    InvalidConfig(#[from] ConfigError),
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "c ")?;
            write!(buf, "{} ", record.level())?;
            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Execution failed, error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether a satisfying configuration was found.
fn run() -> Result<bool, CliError> {
    let args = Args::parse();
    configure_logging(args.verbose);

    let file = File::open(&args.file)
        .map_err(|e| CliError::FileReadingError(e, args.file.display().to_string()))?;
    let parsed = parse_mwcnf(BufReader::new(file))?;
    let instance = Instance::try_from(parsed)?;

    let mut config = SaConfig::default()
        .with_initial_temperature(args.start_temperature)
        .with_stop_temperature(args.end_temperature)
        .with_cooling_factor(args.cooling)
        .with_equilibrium_steps(args.equilibrium);
    config.max_total_steps = args.max_iter;
    config.max_steps_without_betterment = args.gain;
    config.max_steps_without_change = args.adjustment;

    let mut rng = match args.seed {
        Some(seed) => RandomSource::from_seed(seed),
        None => RandomSource::from_entropy(),
    };
    if let Some(seed) = rng.seed() {
        println!("c seed {seed:#x}");
    }

    let mut trace = match &args.debug {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };

    let mut annealer = Annealer::new(SatProblem::new(&instance), config, &mut rng)?;
    while annealer.step() {
        if annealer.last_event() == Some(StepEvent::Cooled) {
            continue;
        }
        if let Some(writer) = trace.as_mut() {
            writeln!(
                writer,
                "{} {} {} {}",
                annealer.steps_total(),
                annealer.current_criteria().satisfied_count(),
                annealer.current_criteria().weight(),
                annealer.best_criteria().weight()
            )?;
        }
    }
    if let Some(mut writer) = trace {
        writer.flush()?;
    }

    let result = annealer.result();
    println!(
        "c steps {} accepted {} improving {} cooling ticks {}",
        result.iterations, result.accepted_moves, result.improving_moves, result.cooling_ticks
    );
    println!("c final temperature {:.6e}", result.final_temperature);
    if let Some(reason) = result.stop_reason {
        println!("c stopped: {reason}");
    }
    println!(
        "c satisfied clauses {}/{}",
        result.best_criteria.satisfied_count(),
        instance.clause_count()
    );

    let found = result.best_criteria.is_valid();
    if found {
        println!("s SATISFIED");
        println!("o {}", result.best_criteria.weight());
        println!("{}", value_line(&result.best));
    } else {
        println!("s UNKNOWN");
    }
    Ok(found)
}

fn value_line(assignment: &Assignment) -> String {
    let mut line = String::from("v");
    for (index, value) in assignment.iter().enumerate() {
        let id = index as i64 + 1;
        line.push_str(&format!(" {}", if value { id } else { -id }));
    }
    line.push_str(" 0");
    line
}
