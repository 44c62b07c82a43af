use std::process::ExitCode;

use coziboy::{parse_args, run, Config};

fn main() -> ExitCode {
    env_logger::init();

    let path = match parse_args(std::env::args().skip(1)) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(err.exit_code());
        }
    };

    println!("Loading file \"{}\"...", path.display());

    let config = Config::from_env(path);
    match run(&config) {
        Ok(report) => {
            log::info!(
                "executed {} step(s) in {} cycles",
                report.instructions,
                report.cycles
            );
            println!("{}", report.registers);
            match report.fault {
                Some(err) => {
                    eprintln!("Error: {err}");
                    ExitCode::from(3)
                }
                None => ExitCode::SUCCESS,
            }
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(3)
        }
    }
}
