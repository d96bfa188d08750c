// ********* Public data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// A single voter's ballot: candidates mapped to a preference rank.
///
/// Higher values are more preferred. Candidates absent from the map are
/// implicitly ranked 0, below every explicitly ranked candidate. Entries for
/// candidates that are not part of the election are ignored.
pub type Ballot<A> = HashMap<A, u32>;

// ********* Configuration **********

/// Selects the procedure used to turn the ranked contests into winners.
///
/// Both procedures lock in the same victories and return the same winner set
/// for every valid input. `SinglePass` is the default; `LockGraph` re-checks
/// the whole graph for cycles after every tentative edge and is kept as the
/// slower reference procedure.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum WinnerMethod {
    /// Tracks defeated candidates in one pass over the ranked contests,
    /// touching the locked edges only when the contest winner has already
    /// been defeated.
    SinglePass,
    /// Materializes the lock graph edge by edge with a full cycle check per
    /// insertion.
    LockGraph,
}

impl WinnerMethod {
    pub const DEFAULT: WinnerMethod = WinnerMethod::SinglePass;
}

// ********* Errors **********

/// Errors that prevent a tabulation from starting.
///
/// All of them are detected before any algorithmic work begins; once the
/// inputs pass validation, the tabulation cannot fail.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TallyError {
    /// The candidate list was empty.
    NoCandidates,
    /// The ballot list was empty.
    NoVotes,
    /// The candidate list contained the same candidate more than once.
    DuplicateCandidates,
}

impl Error for TallyError {}

impl Display for TallyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyError::NoCandidates => write!(f, "no candidates"),
            TallyError::NoVotes => write!(f, "no votes"),
            TallyError::DuplicateCandidates => write!(f, "repeated candidates"),
        }
    }
}
