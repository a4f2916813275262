use crate::srt::Subtitle;
use crate::timestamp::Timestamp;

use regex::Regex;

/// Scanner state for the line-oriented SRT reader. The record under
/// construction travels inside the state instead of sitting in a separate
/// mutable slot.
enum ScanState {
    ExpectId,
    ExpectRange { id: u64 },
    ExpectBody { sub: Subtitle },
}

pub struct Parser {
    arrow: Regex,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            // The `-->` separator as found in the wild: any run of dashes
            // before the `>`, whitespace on both sides.
            arrow: Regex::new(r"\s+-+>\s+").unwrap(),
        }
    }

    /// Reads a whole SRT document into records. Scanning is deliberately
    /// lenient: lines that fit no state are skipped, and a block whose time
    /// range does not parse is dropped without complaint.
    pub fn parse(&self, input: &str) -> Vec<Subtitle> {
        let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
        let mut subs = Vec::new();
        let mut state = ScanState::ExpectId;
        for line in input.lines() {
            state = self.advance(state, line, &mut subs);
        }
        // A final record missing its blank-line terminator is flushed, not lost.
        if let ScanState::ExpectBody { sub } = state {
            subs.push(sub);
        }
        subs
    }

    fn advance(&self, state: ScanState, line: &str, out: &mut Vec<Subtitle>) -> ScanState {
        match state {
            ScanState::ExpectId => match line.trim().parse() {
                Ok(id) => ScanState::ExpectRange { id },
                Err(_) => ScanState::ExpectId,
            },
            ScanState::ExpectRange { id } => match self.time_range(line) {
                Some((show_at, hide_at)) => ScanState::ExpectBody {
                    sub: Subtitle {
                        id,
                        show_at,
                        hide_at,
                        text: Vec::new(),
                    },
                },
                None => ScanState::ExpectId,
            },
            ScanState::ExpectBody { mut sub } => {
                if line.trim().is_empty() {
                    out.push(sub);
                    ScanState::ExpectId
                } else {
                    sub.text.push(line.to_string());
                    ScanState::ExpectBody { sub }
                }
            }
        }
    }

    fn time_range(&self, line: &str) -> Option<(Timestamp, Timestamp)> {
        let mut halves = self.arrow.splitn(line.trim(), 2);
        let show_at = Timestamp::parse(halves.next()?)?;
        let hide_at = Timestamp::parse(halves.next()?)?;
        Some((show_at, hide_at))
    }
}
