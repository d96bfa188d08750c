pub use crate::config::*;

use crate::{full_order_weighted, resolve_weighted};

use std::collections::HashSet;
use std::hash::Hash;

/// A builder for assembling an election vote by vote.
///
/// ```
/// pub use ranked_pairs::builder::Builder;
///
/// let mut builder = Builder::new()
///     .candidates(&["Anna".to_string(), "Bob".to_string(), "Clara".to_string()]);
///
/// builder.add_ranking(&["Anna".to_string(), "Clara".to_string(), "Bob".to_string()]);
/// builder.add_ranking(&["Anna".to_string(), "Bob".to_string(), "Clara".to_string()]);
/// builder.add_ranking(&["Clara".to_string(), "Anna".to_string(), "Bob".to_string()]);
///
/// let winners = builder.resolve()?;
/// assert!(winners.contains("Anna"));
///
/// # Ok::<(), ranked_pairs::TallyError>(())
/// ```
pub struct Builder<A> {
    pub(crate) _candidates: Vec<A>,
    pub(crate) _ballots: Vec<(Ballot<A>, u64)>,
}

impl<A: Clone + Eq + Hash> Builder<A> {
    pub fn new() -> Builder<A> {
        Builder {
            _candidates: Vec::new(),
            _ballots: Vec::new(),
        }
    }

    pub fn candidates(self, cands: &[A]) -> Builder<A> {
        Builder {
            _candidates: cands.to_vec(),
            _ballots: self._ballots,
        }
    }

    /// Adds one voter's preference map.
    pub fn add_ballot(&mut self, ballot: &Ballot<A>) {
        self.add_weighted_ballot(ballot, 1);
    }

    /// Adds a preference map that counts as `count` identical ballots.
    pub fn add_weighted_ballot(&mut self, ballot: &Ballot<A>, count: u64) {
        self._ballots.push((ballot.clone(), count));
    }

    /// Adds a ballot given as an ordered ranking, most preferred first.
    ///
    /// Candidates missing from the ranking are left unranked. A candidate
    /// listed more than once keeps its best position.
    pub fn add_ranking(&mut self, ranking: &[A]) {
        let len = ranking.len() as u32;
        let mut ballot = Ballot::new();
        for (ix, candidate) in ranking.iter().enumerate() {
            ballot.entry(candidate.clone()).or_insert(len - ix as u32);
        }
        self._ballots.push((ballot, 1));
    }

    pub fn resolve(&self) -> Result<HashSet<A>, TallyError> {
        self.resolve_with(WinnerMethod::DEFAULT)
    }

    pub fn resolve_with(&self, method: WinnerMethod) -> Result<HashSet<A>, TallyError> {
        let ballots: Vec<(&Ballot<A>, u64)> =
            self._ballots.iter().map(|(b, c)| (b, *c)).collect();
        resolve_weighted(&self._candidates, &ballots, method)
    }

    pub fn full_order(&self) -> Result<Vec<HashSet<A>>, TallyError> {
        self.full_order_with(WinnerMethod::DEFAULT)
    }

    pub fn full_order_with(&self, method: WinnerMethod) -> Result<Vec<HashSet<A>>, TallyError> {
        let ballots: Vec<(&Ballot<A>, u64)> =
            self._ballots.iter().map(|(b, c)| (b, *c)).collect();
        full_order_weighted(&self._candidates, &ballots, method)
    }
}

impl<A: Clone + Eq + Hash> Default for Builder<A> {
    fn default() -> Builder<A> {
        Builder::new()
    }
}
