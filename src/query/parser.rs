use nom::{IResult, Parser};
use nom::bytes::complete::take_till1;
use nom::character::complete::{digit1, space1};
use nom::combinator::{all_consuming, opt};
use nom::multi::separated_list1;
use nom::sequence::preceded;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{parse_date, DriverId};
use crate::query::ast::{ProfileKey, Query};
use crate::search::range::DateRange;

pub const COMMENT_PREFIX: char = '#';

fn argument(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace()).parse(input)
}

/// `<kind>[ <arg>]*`
fn query_line(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    all_consuming((digit1, opt(preceded(space1, separated_list1(space1, argument)))))
        .map(|(kind, args)| (kind, args.unwrap_or_default()))
        .parse(input)
}

/// Query parser for converting query lines to `Query`
#[derive(Debug, Clone, Default)]
pub struct QueryParser;

impl QueryParser {
    pub fn new() -> Self {
        QueryParser
    }

    /// Parses one query line.
    ///
    /// Blank lines and lines starting with `#` yield `Ok(None)`.
    /// Examples:
    /// - "1 SaCruz110" -> user profile
    /// - "1 000000004780" -> driver profile
    /// - "2 10" -> top 10 drivers
    /// - "6 Vila Real 01/01/2021 31/12/2021" -> average distance in a city
    /// - "7 5 Braga" -> top 5 drivers in a city
    pub fn parse(&self, input: &str) -> Result<Option<Query>> {
        let line = input.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            return Ok(None);
        }

        let (_, (kind, args)) = query_line(line)
            .map_err(|_| Error::new(ErrorKind::Parse, format!("Malformed query '{}'", line)))?;

        let query = match kind {
            "1" => {
                let key = single(&args, "1")?;
                if key.bytes().all(|b| b.is_ascii_digit()) {
                    Query::Profile(ProfileKey::Driver(DriverId(parse_count(key, "driver id")? as u64)))
                } else {
                    Query::Profile(ProfileKey::User(key.to_string()))
                }
            }
            "2" => Query::TopDrivers { n: parse_count(single(&args, "2")?, "number of drivers")? },
            "3" => Query::TopUsers { n: parse_count(single(&args, "3")?, "number of users")? },
            "4" => {
                at_least(&args, 1, "4")?;
                Query::AveragePriceInCity { city: args.join(" ") }
            }
            "5" => {
                exactly(&args, 2, "5")?;
                Query::AveragePriceInRange { range: parse_range(args[0], args[1])? }
            }
            "6" => {
                at_least(&args, 3, "6")?;
                let split = args.len() - 2;
                Query::AverageDistanceInCity {
                    city: args[..split].join(" "),
                    range: parse_range(args[split], args[split + 1])?,
                }
            }
            "7" => {
                at_least(&args, 2, "7")?;
                Query::TopDriversInCity {
                    n: parse_count(args[0], "number of drivers")?,
                    city: args[1..].join(" "),
                }
            }
            "9" => {
                exactly(&args, 2, "9")?;
                Query::TippedRides { range: parse_range(args[0], args[1])? }
            }
            other => {
                return Err(Error::new(ErrorKind::UnsupportedQuery, format!("Unknown query kind '{}'", other)));
            }
        };

        Ok(Some(query))
    }
}

fn exactly(args: &[&str], expected: usize, kind: &str) -> Result<()> {
    if args.len() != expected {
        return Err(Error::invalid_argument(format!(
            "Query {} takes {} argument(s), got {}", kind, expected, args.len()
        )));
    }
    Ok(())
}

fn at_least(args: &[&str], expected: usize, kind: &str) -> Result<()> {
    if args.len() < expected {
        return Err(Error::invalid_argument(format!(
            "Query {} takes at least {} argument(s), got {}", kind, expected, args.len()
        )));
    }
    Ok(())
}

fn single<'a>(args: &[&'a str], kind: &str) -> Result<&'a str> {
    exactly(args, 1, kind)?;
    Ok(args[0])
}

fn parse_count(text: &str, what: &str) -> Result<usize> {
    text.parse()
        .map_err(|_| Error::invalid_argument(format!("Couldn't parse {} '{}'", what, text)))
}

fn parse_range(start: &str, end: &str) -> Result<DateRange> {
    let start = parse_date(start)
        .map_err(|e| Error::invalid_argument(format!("Bad start date: {}", e.context)))?;
    let end = parse_date(end)
        .map_err(|e| Error::invalid_argument(format!("Bad end date: {}", e.context)))?;
    Ok(DateRange::new(start, end))
}
