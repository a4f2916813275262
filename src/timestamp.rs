use std::fmt;

use nom::bytes::complete::{tag, take_while_m_n};
use nom::character::complete::{digit1, one_of};
use nom::combinator::{map_res, opt};
use nom::sequence::preceded;
use nom::IResult;

/// A point on the subtitle timeline, held with millisecond precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Rounds to the nearest millisecond. Instants before the start of the
    /// timeline clamp to zero rather than going negative.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs * 1000.0).round().max(0.0) as u64)
    }

    /// Parses the timestamp at the start of `input`, ignoring whatever
    /// trails it.
    pub fn parse(input: &str) -> Option<Self> {
        timestamp(input.trim()).ok().map(|(_, ts)| ts)
    }
}

/// Accepts `H:MM:SS`, optionally followed by `,` or `.` and up to three
/// fraction digits. Hours may run to any number of digits.
fn timestamp(input: &str) -> IResult<&str, Timestamp> {
    const MILLIS_MAX: usize = 3;
    let take_millis = map_res(
        take_while_m_n(0, MILLIS_MAX, |c: char| c.is_ascii_digit()),
        |s: &str| {
            // A short fraction like `,2` is not valid SRT, but it shows up
            // in the wild. Read it as `,200`: right-pad to three digits.
            format!("{:0<3}", s).parse::<u64>()
        },
    );

    const HMS_MAX: usize = 2;
    let take_hms = || {
        map_res(take_while_m_n(1, HMS_MAX, |c: char| c.is_ascii_digit()), |s: &str| {
            s.parse::<u64>()
        })
    };

    let (input, hours) = map_res(digit1, |s: &str| s.parse::<u64>())(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, minutes) = take_hms()(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, seconds) = take_hms()(input)?;
    let (input, millis) = opt(preceded(one_of(",."), take_millis))(input)?;

    Ok((
        input,
        Timestamp::from_millis(
            millis.unwrap_or(0) + seconds * 1000 + minutes * 60 * 1000 + hours * 60 * 60 * 1000,
        ),
    ))
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let total_secs = self.0 / 1000;
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;
        let millis = self.0 % 1000;
        write!(f, "{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}
