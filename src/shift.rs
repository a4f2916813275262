use crate::error::SubsyncError;
use crate::srt::Subtitle;
use crate::timestamp::Timestamp;

/// One `<position><+|-><seconds>` token from the command line.
///
/// `at` is `None` for the `@` sentinel and for positions that do not parse
/// as a timestamp. Such anchors place no control point of their own, but
/// their shift still seeds the boundary points when they come first or last
/// on the command line.
struct Anchor {
    at: Option<Timestamp>,
    shift: f64,
}

fn parse_anchor(token: &str) -> Option<Anchor> {
    let split = token.find(|c| c == '+' || c == '-')?;
    let (position, rest) = token.split_at(split);
    let magnitude: f64 = rest[1..].parse().ok()?;
    if !magnitude.is_finite() || magnitude < 0.0 {
        return None;
    }
    let shift = if rest.starts_with('-') { -magnitude } else { magnitude };
    Some(Anchor {
        at: Timestamp::parse(position),
        shift,
    })
}

#[derive(Debug, Clone, Copy)]
struct ControlPoint {
    at: f64,
    shift: f64,
}

/// A piecewise-linear shift function spanning the whole track.
pub struct Shifter {
    points: Vec<ControlPoint>,
}

impl Shifter {
    /// Builds the control-point list from raw anchor tokens.
    ///
    /// Two boundary points are synthesised so the function is defined from
    /// before the track to just past `track_end`. They take their shift
    /// from the first and last token in command-line order, read before
    /// sorting, not from the earliest and latest anchor by time.
    pub fn from_specs<S: AsRef<str>>(
        specs: &[S],
        track_end: Timestamp,
    ) -> Result<Self, SubsyncError> {
        let anchors: Vec<Anchor> = specs
            .iter()
            .filter_map(|spec| {
                let anchor = parse_anchor(spec.as_ref());
                if anchor.is_none() {
                    eprintln!("Ignoring malformed anchor '{}'", spec.as_ref());
                }
                anchor
            })
            .collect();

        let (first, last) = match (anchors.first(), anchors.last()) {
            (Some(first), Some(last)) => (first.shift, last.shift),
            _ => return Err(SubsyncError::NoValidAnchors),
        };

        let mut points = vec![ControlPoint {
            at: -1.0,
            shift: first,
        }];
        points.extend(anchors.iter().filter_map(|anchor| {
            anchor.at.map(|at| ControlPoint {
                at: at.as_secs_f64(),
                shift: anchor.shift,
            })
        }));
        points.push(ControlPoint {
            at: track_end.as_secs_f64() + 1.0,
            shift: last,
        });
        points.sort_by(|a, b| a.at.total_cmp(&b.at));

        Ok(Self { points })
    }

    /// Evaluates the shift function at `at` and returns the shifted instant.
    pub fn shift(&self, at: Timestamp) -> Timestamp {
        let pos = at.as_secs_f64();
        let k = self
            .points
            .partition_point(|p| p.at < pos)
            .clamp(1, self.points.len() - 1);
        let (start, end) = (self.points[k - 1], self.points[k]);
        // Coincident control points adopt the later one's shift outright.
        let shift = if end.at == start.at {
            end.shift
        } else {
            let fraction = (pos - start.at) / (end.at - start.at);
            start.shift + fraction * (end.shift - start.shift)
        };
        Timestamp::from_secs_f64(pos + shift)
    }

    pub fn apply(&self, mut sub: Subtitle) -> Subtitle {
        sub.show_at = self.shift(sub.show_at);
        sub.hide_at = self.shift(sub.hide_at);
        sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Timestamp {
        Timestamp::from_millis(s * 1000)
    }

    macro_rules! test_parse_anchor {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (token, expected): (&str, Option<(Option<u64>, f64)>) = $value;

                let parsed = parse_anchor(token)
                    .map(|a| (a.at.map(Timestamp::as_millis), a.shift));

                assert_eq!(parsed, expected);
            }
        )*
        }
    }

    test_parse_anchor! {
        test_parse_anchor_start_plus: ("@+1", Some((None, 1.0))),
        test_parse_anchor_start_minus: ("@-0.5", Some((None, -0.5))),
        test_parse_anchor_timed_plus: ("1:00:00+4", Some((Some(3_600_000), 4.0))),
        test_parse_anchor_timed_minus: ("0:10:00-2.5", Some((Some(600_000), -2.5))),
        test_parse_anchor_fractional_position: ("0:00:01.5+2", Some((Some(1500), 2.0))),
        test_parse_anchor_bad_position_keeps_shift: ("soon+2", Some((None, 2.0))),
        test_parse_anchor_no_sign: ("5", None),
        test_parse_anchor_empty_magnitude: ("@+", None),
        test_parse_anchor_junk_magnitude: ("@+x2", None),
        test_parse_anchor_double_signed: ("+-5", None),
        test_parse_anchor_empty: ("", None),
    }

    #[test]
    fn no_valid_anchors_is_an_error() {
        assert!(matches!(
            Shifter::from_specs::<&str>(&[], secs(100)),
            Err(SubsyncError::NoValidAnchors)
        ));
        assert!(matches!(
            Shifter::from_specs(&["garbage"], secs(100)),
            Err(SubsyncError::NoValidAnchors)
        ));
    }

    #[test]
    fn zero_shift_anchors_leave_times_untouched() {
        let shifter = Shifter::from_specs(&["0:30:00+0", "1:00:00+0"], secs(7200)).unwrap();

        for t in [0, 1, 1_800_000, 3_599_999, 7_200_000] {
            let t = Timestamp::from_millis(t);
            assert_eq!(shifter.shift(t), t);
        }
    }

    #[test]
    fn control_points_are_sorted_and_padded() {
        // Tokens deliberately out of timeline order: the boundary shifts
        // must come from command-line order, not sorted order.
        let shifter = Shifter::from_specs(&["1:00:00+4", "0:30:00+2"], secs(7200)).unwrap();

        let ats: Vec<f64> = shifter.points.iter().map(|p| p.at).collect();
        let shifts: Vec<f64> = shifter.points.iter().map(|p| p.shift).collect();
        assert_eq!(ats, vec![-1.0, 1800.0, 3600.0, 7201.0]);
        assert_eq!(shifts, vec![4.0, 2.0, 4.0, 2.0]);
    }

    #[test]
    fn anchors_without_a_position_produce_only_boundaries() {
        let shifter = Shifter::from_specs(&["@+1"], secs(2)).unwrap();

        assert_eq!(shifter.points.len(), 2);
        assert_eq!(shifter.shift(secs(0)), secs(1));
        assert_eq!(shifter.shift(secs(1)), secs(2));
        assert_eq!(shifter.shift(secs(2)), secs(3));
    }

    #[test]
    fn interpolates_linearly_between_anchors() {
        let shifter = Shifter::from_specs(&["0:10:00+0", "0:20:00+10"], secs(1800)).unwrap();

        // Midpoint of (600, +0) and (1200, +10) shifts by the mean, +5.
        assert_eq!(shifter.shift(secs(900)), Timestamp::from_millis(905_000));
        assert_eq!(shifter.shift(secs(600)), secs(600));
        assert_eq!(shifter.shift(secs(1200)), secs(1210));
    }

    #[test]
    fn holds_the_last_shift_flat_past_the_final_anchor() {
        let shifter = Shifter::from_specs(&["@+0", "1:00:00+4"], secs(7200)).unwrap();

        assert_eq!(shifter.shift(secs(3600)), secs(3604));
        assert_eq!(shifter.shift(secs(5400)), secs(5404));
        assert_eq!(shifter.shift(secs(7200)), secs(7204));
        // Near the track start the ramp from the -1 boundary has barely
        // begun: one millisecond of shift at t=0.
        assert_eq!(shifter.shift(secs(0)), Timestamp::from_millis(1));
    }

    #[test]
    fn coincident_control_points_take_the_later_shift() {
        // The second anchor lands exactly on the synthesised end boundary
        // at 600s. Queries past both must not divide by zero.
        let shifter = Shifter::from_specs(&["0:10:00+2", "@+9"], secs(599)).unwrap();

        assert_eq!(shifter.shift(secs(700)), secs(709));
    }

    #[test]
    fn applies_to_both_ends_of_a_record() {
        let shifter = Shifter::from_specs(&["@+1"], secs(10)).unwrap();
        let sub = Subtitle {
            id: 1,
            show_at: secs(1),
            hide_at: secs(2),
            text: vec!["Hello".to_string()],
        };

        let shifted = shifter.apply(sub);

        assert_eq!(shifted.show_at, secs(2));
        assert_eq!(shifted.hide_at, secs(3));
    }
}
