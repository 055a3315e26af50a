//! A small offline CLI over the tally analytics.
//! It runs exactly the same code as the corresponding API endpoints, so its
//! output always agrees with the server's.

use std::fs::File;
use std::io::BufReader;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use rocket::serde::json::serde_json;

use tally_backend::analytics::{
    audit::{kaplan_markov_p_value, AuditResult},
    schulze::{resolve, SchulzeRequest, SchulzeResult},
};
use tally_backend::error::Error as TallyError;
use tally_backend::toy_crypto::homomorphic;

const PROGRAM_NAME: &str = "tally-analytics";

const ABOUT_TEXT: &str = "Offline election analytics: Schulze ranking, toy homomorphic \
tallies and risk-limiting audit p-values.

EXIT CODES:
     0: Success.
     1: Could not read or parse the input.
     2: The input was rejected as invalid.";

const BALLOTS_PATH: &str = "BALLOTS_PATH";
const BALLOTS_PATH_HELP: &str = "The path to a JSON file of the form\n\
`{\"candidates\": [...], \"ballots\": [[...], ...]}`,\n\
as accepted by `POST /api/votes/rcv/schulze`";

const CIPHERTEXT: &str = "CIPHERTEXT";
const PLAINTEXT: &str = "PLAINTEXT";
const COMBINED: &str = "COMBINED";
const SECRET: &str = "SECRET";
const COUNT: &str = "COUNT";
const WINNER_VOTES: &str = "WINNER_VOTES";
const LOSER_VOTES: &str = "LOSER_VOTES";
const MARGIN: &str = "MARGIN";

fn secret_arg() -> Arg {
    Arg::new(SECRET)
        .long("secret")
        .help("Secret the keystream is derived from")
        .action(ArgAction::Set)
        .required(true)
}

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .subcommand(
            Command::new("schulze")
                .about("Resolve ranked ballots with the Schulze method")
                .arg(
                    Arg::new(BALLOTS_PATH)
                        .help(BALLOTS_PATH_HELP)
                        .action(ArgAction::Set)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("combine")
                .about("Homomorphically add ciphertexts")
                .arg(
                    Arg::new(CIPHERTEXT)
                        .help("Hex ciphertexts, with or without a 0x prefix")
                        .action(ArgAction::Append)
                        .num_args(1..)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("encrypt")
                .about("Encrypt a single plaintext")
                .arg(
                    Arg::new(PLAINTEXT)
                        .value_parser(value_parser!(u64))
                        .action(ArgAction::Set)
                        .required(true),
                )
                .arg(secret_arg()),
        )
        .subcommand(
            Command::new("decrypt")
                .about("Decrypt a combined ciphertext")
                .arg(Arg::new(COMBINED).action(ArgAction::Set).required(true))
                .arg(secret_arg())
                .arg(
                    Arg::new(COUNT)
                        .long("count")
                        .help("Number of ciphertexts that were combined")
                        .value_parser(value_parser!(u64))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("audit")
                .about("Kaplan-Markov p-value for a hand-counted sample")
                .arg(
                    Arg::new(WINNER_VOTES)
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true)
                        .required(true),
                )
                .arg(
                    Arg::new(LOSER_VOTES)
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true)
                        .required(true),
                )
                .arg(
                    Arg::new(MARGIN)
                        .value_parser(value_parser!(f64))
                        .allow_negative_numbers(true)
                        .required(true),
                ),
        )
}

/// Errors that this program may produce.
#[derive(Debug, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the JSON input.
    Format(String),
    /// The analytics rejected the input.
    Invalid(TallyError),
}

impl From<TallyError> for Error {
    fn from(err: TallyError) -> Self {
        Self::Invalid(err)
    }
}

/// Load ranked ballots from a file and resolve them.
fn schulze(path: &str) -> Result<SchulzeResult, Error> {
    let file = BufReader::new(File::open(path).map_err(|e| Error::IO(e.to_string()))?);
    let request: SchulzeRequest =
        serde_json::from_reader(file).map_err(|e| Error::Format(e.to_string()))?;
    Ok(resolve(&request)?)
}

/// Run the chosen subcommand, returning the lines to print.
fn execute(args: &ArgMatches) -> Result<Vec<String>, Error> {
    // Required arguments are guaranteed to be present, so the unwraps below are safe.
    match args.subcommand() {
        Some(("schulze", sub)) => {
            let path: &String = sub.get_one(BALLOTS_PATH).unwrap();
            let result = schulze(path)?;
            let mut lines = vec![format!("Winners: {}", result.winners.join(", "))];
            lines.extend(result.matrix.iter().map(|row| {
                row.iter()
                    .map(u64::to_string)
                    .collect::<Vec<_>>()
                    .join("\t")
            }));
            Ok(lines)
        }
        Some(("combine", sub)) => {
            let ciphertexts = sub.get_many::<String>(CIPHERTEXT).unwrap().collect::<Vec<_>>();
            Ok(vec![homomorphic::combine(&ciphertexts)?])
        }
        Some(("encrypt", sub)) => {
            let plaintext: u64 = *sub.get_one(PLAINTEXT).unwrap();
            let secret: &String = sub.get_one(SECRET).unwrap();
            Ok(vec![homomorphic::encrypt(plaintext, secret)])
        }
        Some(("decrypt", sub)) => {
            let combined: &String = sub.get_one(COMBINED).unwrap();
            let secret: &String = sub.get_one(SECRET).unwrap();
            let plaintext = match sub.get_one::<u64>(COUNT) {
                Some(&count) => homomorphic::decrypt_sum(combined, secret, count)?,
                None => homomorphic::decrypt(combined, secret)?,
            };
            Ok(vec![plaintext.to_string()])
        }
        Some(("audit", sub)) => {
            let winner: i64 = *sub.get_one(WINNER_VOTES).unwrap();
            let loser: i64 = *sub.get_one(LOSER_VOTES).unwrap();
            let margin: f64 = *sub.get_one(MARGIN).unwrap();
            let AuditResult { n, p_value, .. } = kaplan_markov_p_value(winner, loser, margin)?;
            Ok(vec![format!("n = {n}, p-value = {p_value}")])
        }
        _ => unreachable!("a subcommand is required"),
    }
}

/// Run the subcommand, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    match execute(args) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            0
        }
        Err(Error::IO(msg)) => {
            println!("IO error: {msg}");
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid JSON: {msg}");
            1
        }
        Err(Error::Invalid(err)) => {
            println!("{err}");
            2
        }
    }
}

fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}
