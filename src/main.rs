/***************************************/
/*        3rd party libraries          */
/***************************************/
use clap::{Arg, ArgMatches, Command};
use log::error;
use std::io;
use std::sync::Arc;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use elevator_sim::clock::SystemClock;
use elevator_sim::config::{self, Config, DisplayMode};
use elevator_sim::ui::{random_floors, ConsoleMenu, Simulation};
use elevator_sim::{logging, unwrap_or_exit, ElevatorSystem};

const GRID_REFRESH: Duration = Duration::from_secs(1);

fn cli() -> Command<'static> {
    Command::new("elevator_sim")
        .about("Multi-elevator dispatch simulation")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .takes_value(true)
                .possible_values(["interactive", "simulation"])
                .help("Overrides [display] mode"),
        )
        .arg(
            Arg::new("requests")
                .short('n')
                .long("requests")
                .takes_value(true)
                .help("Number of random requests in simulation mode"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the final state of every elevator as JSON"),
        )
}

/// Folds command line overrides into the loaded configuration.
fn apply_overrides(config: &mut Config, matches: &ArgMatches) {
    match matches.value_of("mode") {
        Some("interactive") => config.display.mode = DisplayMode::Interactive,
        Some("simulation") => config.display.mode = DisplayMode::Simulation,
        _ => {}
    }
    if matches.is_present("requests") {
        config.display.simulation_requests = unwrap_or_exit!(
            matches.value_of_t::<usize>("requests"),
            "Invalid --requests value"
        );
    }
}

/* Main */
fn main() {
    let matches = cli().get_matches();

    // Load the configuration
    let config_path = matches.value_of("config").unwrap_or("config.toml");
    let mut config = unwrap_or_exit!(
        config::load_config(config_path),
        "Failed to load configuration"
    );
    apply_overrides(&mut config, &matches);
    logging::init(&config.logging);

    // Start the elevator system
    let system = unwrap_or_exit!(
        ElevatorSystem::start(&config, Arc::new(SystemClock)),
        "Failed to start the elevator system"
    );

    let outcome = match config.display.mode {
        DisplayMode::Interactive => {
            let stdin = io::stdin();
            ConsoleMenu::new(&system, stdin.lock(), io::stdout()).run()
        }
        DisplayMode::Simulation => {
            let floors = random_floors(
                &mut rand::thread_rng(),
                config.elevator_system.n_floors,
                config.display.simulation_requests,
            );
            Simulation::new(&system, GRID_REFRESH).run(&floors, &mut io::stdout())
        }
    };
    if let Err(e) = outcome {
        error!("Front end stopped: {}", e);
        eprintln!("ERROR: {}", e);
    }

    if matches.is_present("json") {
        match system.list_elevators() {
            Ok(elevators) => match serde_json::to_string_pretty(&elevators) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to serialize elevator state: {}", e),
            },
            Err(e) => error!("Failed to read elevator state: {}", e),
        }
    }

    system.shutdown();
}
