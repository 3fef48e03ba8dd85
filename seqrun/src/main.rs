#[macro_use]
extern crate clap;

use clap::Arg;
use std::fs;
use std::io;
use std::process;

use seqrun::{dump, exit_code, run_source, StageTrace};
use seqvm::{NullObserver, Observer};

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("ASSEMBLY")
                .help("Sets the assembly file to run")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("memory")
                .short("m")
                .long("memory")
                .takes_value(true)
                .value_name("BYTES")
                .default_value("1024")
                .help("Sets the size of the memory"),
        )
        .arg(
            Arg::with_name("sp")
                .short("s")
                .long("sp")
                .takes_value(true)
                .value_name("ADDR")
                .default_value("200")
                .help("Sets the initial stack pointer"),
        )
        .arg(
            Arg::with_name("trace")
                .short("t")
                .long("trace")
                .help("Prints the stages completed each tick"),
        )
        .arg(
            Arg::with_name("delay")
                .short("d")
                .long("delay")
                .takes_value(true)
                .value_name("MS")
                .default_value("0")
                .help("Milliseconds to sleep between ticks (with --trace)"),
        )
        .arg(
            Arg::with_name("dump")
                .long("dump")
                .help("Dumps registers and memory after the run"),
        )
        .get_matches();

    let memory = value_t!(matches.value_of("memory"), u32).unwrap_or_else(|e| e.exit());
    let sp = value_t!(matches.value_of("sp"), u32).unwrap_or_else(|e| e.exit());
    let delay = value_t!(matches.value_of("delay"), u64).unwrap_or_else(|e| e.exit());
    let path = matches.value_of("ASSEMBLY").unwrap();

    let input = match fs::read_to_string(path) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("{}: {}", path, err);
            process::exit(1);
        }
    };

    let mut trace = StageTrace::new(delay);
    let mut null = NullObserver;
    let observer: &mut dyn Observer = if matches.is_present("trace") {
        &mut trace
    } else {
        &mut null
    };

    let result = run_source(&input, memory, sp, observer);
    match &result {
        Ok(machine) => {
            if matches.is_present("dump") {
                if let Err(err) = dump(machine, &mut io::stdout()) {
                    eprintln!("{}", err);
                }
            }
        }
        Err(err) => eprintln!("{}", err),
    }
    process::exit(exit_code(&result));
}
