//! Script commands
//!
//! | Command | Arguments |
//! |---------|-----------|
//! | `REGISTER` | `id [parent]` |
//! | `LOAD` | `path` |
//! | `LEVEL` | `id year quarter` |
//! | `REWARDS` | `id year quarter` |
//! | `ALL_REWARDS` | `id` |

use std::collections::HashMap;
use std::io::Write;

use loyalty_types::{PartnerId, ReportingPeriod};

use crate::error::{CliError, CliResult};
use crate::output;
use crate::session::Session;

/// Contract batch used by `loyalty demo`.
pub const DEMO_CONTRACTS: &str = include_str!("../data/demo.csv");

const DEMO_PARTNERS: [&str; 3] = ["REGISTER 1", "REGISTER 2 1", "REGISTER 3 2"];

const DEMO_QUERIES: [&str; 10] = [
    "LEVEL 1 2011 1",
    "LEVEL 2 2011 1",
    "LEVEL 3 2011 1",
    "REWARDS 1 2006 3",
    "REWARDS 2 2010 1",
    "REWARDS 3 2009 1",
    "REWARDS 3 2011 1",
    "ALL_REWARDS 1",
    "ALL_REWARDS 2",
    "ALL_REWARDS 3",
];

/// A command implementation. Receives the arguments after the command name.
pub type Handler<W> = fn(&mut Session<W>, &[&str]) -> CliResult<()>;

pub fn command_map<W: Write>() -> HashMap<&'static str, Handler<W>> {
    let mut map: HashMap<&'static str, Handler<W>> = HashMap::new();
    map.insert("REGISTER", register::<W>);
    map.insert("LOAD", load::<W>);
    map.insert("LEVEL", level::<W>);
    map.insert("REWARDS", rewards::<W>);
    map.insert("ALL_REWARDS", all_rewards::<W>);
    map
}

fn register<W: Write>(session: &mut Session<W>, args: &[&str]) -> CliResult<()> {
    if args.is_empty() || args.len() > 2 {
        return Err(CliError::InvalidArgument(
            "REGISTER takes 1 or 2 arguments".to_string(),
        ));
    }
    let partner = parse_partner(args[0])?;
    let parent = args.get(1).map(|arg| parse_partner(arg)).transpose()?;

    session.book.register(partner, parent)?;
    output::print_registered(&mut session.out, session.format, partner, parent)
}

fn load<W: Write>(session: &mut Session<W>, args: &[&str]) -> CliResult<()> {
    let [path] = args else {
        return Err(CliError::InvalidArgument(
            "LOAD takes exactly 1 argument".to_string(),
        ));
    };
    let report = session.loader.load_path(&mut session.book, path)?;
    output::print_ingest(&mut session.out, session.format, &report)
}

fn level<W: Write>(session: &mut Session<W>, args: &[&str]) -> CliResult<()> {
    let (partner, period) = parse_query("LEVEL", args)?;
    let level = session.engine().partner_level(partner, period)?;
    output::print_level(&mut session.out, session.format, partner, period, level)
}

fn rewards<W: Write>(session: &mut Session<W>, args: &[&str]) -> CliResult<()> {
    let (partner, period) = parse_query("REWARDS", args)?;
    let breakdown = session.engine().partner_reward_breakdown(partner, period)?;
    output::print_reward(&mut session.out, session.format, &breakdown)
}

fn all_rewards<W: Write>(session: &mut Session<W>, args: &[&str]) -> CliResult<()> {
    let [id] = args else {
        return Err(CliError::InvalidArgument(
            "ALL_REWARDS takes exactly 1 argument".to_string(),
        ));
    };
    let partner = parse_partner(id)?;
    let rewards = session.engine().partner_all_rewards(partner)?;
    output::print_all_rewards(&mut session.out, session.format, partner, &rewards)
}

/// Register the demo chain 1 ← 2 ← 3, load the bundled contracts and print
/// the standard level and reward queries. Stops at the first failure.
pub fn demo<W: Write>(session: &mut Session<W>) -> CliResult<()> {
    for command in DEMO_PARTNERS {
        output::print_command(&mut session.out, session.format, command)?;
        session.execute(command)?;
    }

    output::print_command(&mut session.out, session.format, "LOAD <demo contracts>")?;
    let report = session.loader.load_str(&mut session.book, DEMO_CONTRACTS)?;
    output::print_ingest(&mut session.out, session.format, &report)?;

    for command in DEMO_QUERIES {
        output::print_command(&mut session.out, session.format, command)?;
        session.execute(command)?;
    }
    session.out.flush()?;
    Ok(())
}

fn parse_partner(arg: &str) -> CliResult<PartnerId> {
    arg.parse::<u64>()
        .map(PartnerId)
        .map_err(|_| CliError::InvalidArgument(format!("invalid partner id '{}'", arg)))
}

fn parse_query(command: &str, args: &[&str]) -> CliResult<(PartnerId, ReportingPeriod)> {
    let [id, year, quarter] = args else {
        return Err(CliError::InvalidArgument(format!(
            "{} takes exactly 3 arguments",
            command
        )));
    };
    let partner = parse_partner(id)?;
    let year = year
        .parse::<i32>()
        .map_err(|_| CliError::InvalidArgument(format!("invalid year '{}'", year)))?;
    let quarter = quarter
        .parse::<u32>()
        .map_err(|_| CliError::InvalidArgument(format!("invalid quarter '{}'", quarter)))?;
    Ok((partner, ReportingPeriod::new(year, quarter)?))
}
