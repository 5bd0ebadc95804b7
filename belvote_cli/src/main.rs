use belvote::*;
use clap::{App, AppSettings, Arg, SubCommand};

fn main() {
    let matches = App::new("Belvote CLI")
        .version("1.0")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .about("Verifies and generates ballots for a Belenios-style election")
        .subcommand(
            SubCommand::with_name("verify")
                .about("Verify ballots against an election setup")
                .arg(
                    Arg::with_name("SETUP")
                        .index(1)
                        .required(true)
                        .help("Election setup file in JSON format"),
                )
                .arg(
                    Arg::with_name("BALLOTS")
                        .index(2)
                        .required(true)
                        .help("Ballot file, one JSON ballot per line"),
                ),
        )
        .subcommand(
            SubCommand::with_name("generate")
                .about("Generate a signed ballot")
                .arg(
                    Arg::with_name("SETUP")
                        .index(1)
                        .required(true)
                        .help("Election setup file in JSON format"),
                )
                .arg(
                    Arg::with_name("code")
                        .long("code")
                        .takes_value(true)
                        .required(true)
                        .help("Secret voting code (XXXXX-XXXXXX-XXXXX-XXXXXX)"),
                )
                .arg(
                    Arg::with_name("choices")
                        .long("choices")
                        .takes_value(true)
                        .required(true)
                        .help("Selections per question, e.g. '1,0;0,1'"),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("verify") {
        command_verify(matches);
    }
    if let Some(matches) = matches.subcommand_matches("generate") {
        command_generate(matches);
    }
}

fn load_setup(filename: &str) -> ElectionSetup {
    let json = match std::fs::read_to_string(filename) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("belvote: unable to read {}: {}", filename, e);
            std::process::exit(1);
        }
    };
    match ElectionSetup::from_json(&json) {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("belvote: unable to parse {}: {}", filename, e);
            std::process::exit(1);
        }
    }
}

fn command_verify(matches: &clap::ArgMatches) {
    let setup = load_setup(matches.value_of("SETUP").unwrap());

    let filename = matches.value_of("BALLOTS").unwrap();
    let raw = match std::fs::read_to_string(filename) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("belvote verify: unable to read {}: {}", filename, e);
            std::process::exit(1);
        }
    };

    let registry = BallotRegistry::new();
    let verifier = Verifier::new(&setup, &registry);

    let mut invalid = 0;
    let mut total = 0;
    for (line_number, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        total += 1;

        let ballot = match Ballot::parse(line) {
            Ok(ballot) => ballot,
            Err(e) => {
                invalid += 1;
                println!("✘ ballot on line {}: {}", line_number + 1, e);
                continue;
            }
        };

        let report = verifier.verify(&ballot);
        if report.is_valid() {
            let marker = if report.is_fully_checked() { "✔" } else { "✔ (partially checked)" };
            println!("{} ballot {}", marker, ballot.payload_hash);
            for check in &report.checks {
                if let CheckStatus::Unsupported(reason) = &check.status {
                    println!("    skipped: {}: {}", check.message, reason);
                }
            }
        } else {
            invalid += 1;
            println!("✘ ballot {}", ballot.payload_hash);
            for failure in report.failures() {
                if let CheckStatus::Fail(reason) = &failure.status {
                    println!("    failed: {}: {}", failure.message, reason);
                }
            }
        }
    }

    println!("{} of {} ballots valid", total - invalid, total);
    if invalid > 0 {
        std::process::exit(1);
    }
}

fn command_generate(matches: &clap::ArgMatches) {
    let setup = load_setup(matches.value_of("SETUP").unwrap());
    let code = matches.value_of("code").unwrap();

    // One group of comma-separated 0/1 selections per question, questions
    // separated by ';'
    let choices_arg = matches.value_of("choices").unwrap();
    let mut choices = Vec::new();
    for group in choices_arg.split(';') {
        let mut selections = Vec::new();
        for entry in group.split(',') {
            match entry.trim().parse::<u64>() {
                Ok(m) => selections.push(m),
                Err(_) => {
                    eprintln!("belvote generate: invalid selection '{}'", entry);
                    std::process::exit(1);
                }
            }
        }
        choices.push(selections);
    }

    let mut csprng = rand::rngs::OsRng {};
    match generate_ballot(&setup, code, &choices, &mut csprng) {
        Ok(ballot) => println!("{}", ballot.to_json()),
        Err(e) => {
            eprintln!("belvote generate: {}", e);
            std::process::exit(1);
        }
    }
}
