/// The input segment strings were faulty.
///
/// Noders validate every input string before building any chains,
/// so an error means nothing was delivered to the collector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A segment string had fewer than two coordinates.
    TooFewPoints {
        /// Position of the string in the noder input.
        string: usize,
        /// Number of coordinates it had.
        len: usize,
    },
    /// A segment string had a NaN or infinite coordinate.
    NonFinite {
        /// Position of the string in the noder input.
        string: usize,
        /// Index of the offending coordinate within the string.
        vertex: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TooFewPoints { string, len } => write!(
                f,
                "segment string {string} has {len} coordinate(s), at least 2 are required"
            ),
            Error::NonFinite { string, vertex } => write!(
                f,
                "segment string {string} has a non-finite coordinate at vertex {vertex}"
            ),
        }
    }
}

impl std::error::Error for Error {}
