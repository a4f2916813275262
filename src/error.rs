use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SubsyncError {
    NoValidAnchors,
}

impl Error for SubsyncError {}

impl fmt::Display for SubsyncError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubsyncError::NoValidAnchors => write!(
                fmt,
                "None of the anchor specifications could be parsed. \
                 Expected <position><+|-><seconds>, e.g. '@+1' or '1:00:00-4'."
            ),
        }
    }
}
