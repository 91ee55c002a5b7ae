use std::error::Error;
use std::process;
use std::time::{Duration, Instant};

use clap::{App, Arg, ArgGroup, ArgMatches};
use log::debug;
use prettytable::{Cell, Row, Table};
use separator::Separatable;

use sokoban_search::config::{Algorithm, Config, Deadlock, Deadlocks, Format, HeuristicKind};
use sokoban_search::level::Level;
use sokoban_search::solver::SolverOk;
use sokoban_search::{LoadLevel, Solve};

/// Algorithm and heuristic pairs compared by `--benchmark`.
const BENCHMARK_RUNS: [(Algorithm, HeuristicKind); 4] = [
    (Algorithm::IdaStar, HeuristicKind::ManhattanGreedySafe),
    (Algorithm::IdaStar, HeuristicKind::ExactMatching),
    (Algorithm::Annealing, HeuristicKind::Annealing),
    (Algorithm::Annealing, HeuristicKind::ExactMatching),
];

const DEADLOCK_FLAGS: [(&str, Deadlock); 5] = [
    ("corner", Deadlock::Corner),
    ("tunnel", Deadlock::Tunnel),
    ("edge", Deadlock::Edge),
    ("square", Deadlock::Square),
    ("dead-squares", Deadlock::DeadSquares),
];

fn main() {
    env_logger::init();

    let matches = App::new("sokoban-search")
        .author("martin-t")
        .version("0.1")
        .about("Solves sokoban levels using IDA* or simulated annealing")
        .arg(
            Arg::with_name("custom")
                .short("c")
                .long("custom")
                .help("print boards in the custom format"),
        )
        .arg(
            Arg::with_name("xsb")
                .short("x")
                .long("xsb")
                .help("print boards in the XSB format (default)"),
        )
        .group(ArgGroup::with_name("format").arg("custom").arg("xsb"))
        .arg(
            Arg::with_name("algorithm")
                .short("a")
                .long("algorithm")
                .takes_value(true)
                .possible_values(&["ida-star", "annealing"])
                .help("search algorithm (default ida-star)"),
        )
        .arg(
            Arg::with_name("heuristic")
                .short("H")
                .long("heuristic")
                .takes_value(true)
                .possible_values(&[
                    "manhattan-sum",
                    "hungarian",
                    "exact-matching",
                    "annealing",
                    "manhattan",
                ])
                .help("heuristic used by the algorithm (default exact-matching)"),
        )
        .arg(Arg::with_name("corner").long("corner").help("detect boxes stuck in corners"))
        .arg(Arg::with_name("tunnel").long("tunnel").help("detect boxes stuck in tunnels without goals"))
        .arg(Arg::with_name("edge").long("edge").help("detect boxes stuck on the border without goals"))
        .arg(Arg::with_name("square").long("square").help("detect 2x2 blocks of boxes"))
        .arg(
            Arg::with_name("dead-squares")
                .long("dead-squares")
                .help("detect boxes on cells from which no goal can be reached"),
        )
        .arg(
            Arg::with_name("no-deadlocks")
                .long("no-deadlocks")
                .help("disable all deadlock detection, overrides the flags above"),
        )
        .arg(Arg::with_name("no-pulls").long("no-pulls").help("only allow pushing boxes"))
        .arg(
            Arg::with_name("max-depth")
                .long("max-depth")
                .takes_value(true)
                .help("IDA* depth limit (default 100)"),
        )
        .arg(
            Arg::with_name("initial-temp")
                .long("initial-temp")
                .takes_value(true)
                .help("annealing starting temperature (default 1000)"),
        )
        .arg(
            Arg::with_name("decay-rate")
                .long("decay-rate")
                .takes_value(true)
                .help("fraction of temperature lost every annealing round (default 0.000003)"),
        )
        .arg(
            Arg::with_name("min-temp")
                .long("min-temp")
                .takes_value(true)
                .help("annealing stops below this temperature (default 1)"),
        )
        .arg(
            Arg::with_name("scale")
                .long("scale")
                .takes_value(true)
                .help("temperature scale in the acceptance probability (default 0.01)"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("annealing RNG seed (random if not set)"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("only print the summary, not the boards"),
        )
        .arg(
            Arg::with_name("benchmark")
                .long("benchmark")
                .help("compare algorithms and heuristics on all files"),
        )
        .arg(Arg::with_name("files").required(true).multiple(true))
        .get_matches();

    let format = if matches.is_present("custom") {
        Format::Custom
    } else {
        Format::Xsb
    };
    let quiet = matches.is_present("quiet");

    let config = parse_config(&matches).unwrap_or_else(|err| {
        eprintln!("Invalid arguments: {}", err);
        process::exit(1);
    });
    debug!("{:?}", config);

    let paths: Vec<&str> = matches
        .values_of("files")
        .map(|values| values.collect())
        .unwrap_or_default();

    let success = if matches.is_present("benchmark") {
        benchmark(&paths, &config)
    } else {
        // solve all even if some fail
        paths
            .iter()
            .map(|path| solve_file(path, &config, format, quiet))
            .fold(true, |acc, solved| acc && solved)
    };

    if !success {
        process::exit(1);
    }
}

fn parse_config(matches: &ArgMatches<'_>) -> Result<Config, Box<dyn Error>> {
    let mut config = Config::default();
    if let Some(algorithm) = matches.value_of("algorithm") {
        config.algorithm = algorithm.parse()?;
    }
    let heuristic = match matches.value_of("heuristic") {
        Some(heuristic) => heuristic.parse()?,
        None => config.heuristic(),
    };
    config = config.with_search(heuristic, parse_deadlocks(matches));
    config.pulls_allowed = !matches.is_present("no-pulls");

    if let Some(max_depth) = matches.value_of("max-depth") {
        config.ida.max_depth = max_depth.parse()?;
    }
    if let Some(temp) = matches.value_of("initial-temp") {
        config.annealing.initial_temp = temp.parse()?;
    }
    if let Some(rate) = matches.value_of("decay-rate") {
        config.annealing.decay_rate = rate.parse()?;
    }
    if let Some(temp) = matches.value_of("min-temp") {
        config.annealing.min_temp = temp.parse()?;
    }
    if let Some(scale) = matches.value_of("scale") {
        config.annealing.scale = scale.parse()?;
    }
    if let Some(seed) = matches.value_of("seed") {
        config.annealing.seed = Some(seed.parse()?);
    }
    Ok(config)
}

fn parse_deadlocks(matches: &ArgMatches<'_>) -> Deadlocks {
    if matches.is_present("no-deadlocks") {
        return Deadlocks::none();
    }
    Deadlocks::new(
        DEADLOCK_FLAGS
            .iter()
            .filter(|&&(flag, _)| matches.is_present(flag))
            .map(|&(_, deadlock)| deadlock),
    )
}

/// Returns whether a solution was found.
fn solve_file(path: &str, config: &Config, format: Format, quiet: bool) -> bool {
    let level = match path.load_level() {
        Ok(level) => level,
        Err(err) => {
            eprintln!("Can't load level {}: {}", path, err);
            return false;
        }
    };

    println!("Solving {}...", path);
    let started = Instant::now();
    let solution = match level.solve(config) {
        Ok(solution) => solution,
        Err(err) => {
            eprintln!("Can't solve {}: {}", path, err);
            return false;
        }
    };
    let elapsed = started.elapsed();

    print_solution(&level, &solution, format, quiet, elapsed);
    solution.moves.is_some()
}

fn print_solution(
    level: &Level,
    solution: &SolverOk,
    format: Format,
    quiet: bool,
    elapsed: Duration,
) {
    println!("Algorithm: {}", solution.algorithm);
    println!("Heuristic: {}", solution.heuristic);
    if !quiet {
        if let Some(ref stats) = solution.stats {
            println!("{}", stats);
        }
    }

    match solution.moves {
        None => println!("No solution"),
        Some(ref moves) => {
            if !quiet {
                println!("Found solution:");
                print!("{}", level.format_solution(format, moves, true));
            }
            println!("{}", moves);
            println!("Moves: {}", moves.move_cnt());
            println!("Pushes: {}", moves.push_cnt());
        }
    }
    println!("Pulls: {}", solution.pulls);
    println!("States expanded: {}", solution.nodes_expanded.separated_string());
    println!("Time: {:.3} s", elapsed.as_secs_f64());
}

/// Returns whether all levels could be loaded.
fn benchmark(paths: &[&str], config: &Config) -> bool {
    let mut success = true;
    let mut table = Table::new();
    table.set_titles(Row::new(
        ["Level", "Algorithm", "Heuristic", "Moves", "Expanded", "Pulls", "Time"]
            .iter()
            .map(|title| Cell::new(title))
            .collect(),
    ));

    for path in paths {
        let level = match path.load_level() {
            Ok(level) => level,
            Err(err) => {
                eprintln!("Can't load level {}: {}", path, err);
                success = false;
                continue;
            }
        };

        for &(algorithm, heuristic) in &BENCHMARK_RUNS {
            let mut run_config = config.clone();
            run_config.algorithm = algorithm;
            let run_config = run_config.with_search(heuristic, config.deadlocks().clone());

            let started = Instant::now();
            let (moves, expanded, pulls) = match level.solve(&run_config) {
                Ok(solution) => (
                    solution
                        .moves
                        .map_or_else(|| "-".to_string(), |moves| moves.move_cnt().to_string()),
                    solution.nodes_expanded.separated_string(),
                    solution.pulls.to_string(),
                ),
                Err(err) => (err.to_string(), "-".to_string(), "-".to_string()),
            };
            let elapsed = started.elapsed();

            table.add_row(Row::new(vec![
                Cell::new(path),
                Cell::new(&algorithm.to_string()),
                Cell::new(&heuristic.to_string()),
                Cell::new(&moves),
                Cell::new(&expanded),
                Cell::new(&pulls),
                Cell::new(&format!("{:.3} s", elapsed.as_secs_f64())),
            ]));
        }
    }

    table.printstd();
    success
}
