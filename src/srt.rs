use crate::timestamp::Timestamp;

#[derive(Debug, Clone, PartialEq)]
pub struct Subtitle {
    pub(crate) id: u64,
    pub(crate) show_at: Timestamp,
    pub(crate) hide_at: Timestamp,
    pub(crate) text: Vec<String>,
}

/// The latest timestamp appearing anywhere in the track, or zero for an
/// empty track.
pub fn latest_timestamp(subs: &[Subtitle]) -> Timestamp {
    subs.iter()
        .map(|sub| sub.show_at.max(sub.hide_at))
        .max()
        .unwrap_or_default()
}
