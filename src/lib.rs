//! Tabulation of preferential elections with the Ranked Pairs (Tideman)
//! method: pairwise victories are ordered by strength and locked in one at a
//! time, skipping any victory that would contradict stronger ones, until the
//! undefeated candidates emerge.
//!
//! See the [manual] module for the ballot conventions and a walkthrough.

mod config;
pub mod builder;
pub mod manual;

use log::{debug, info};

use std::{
    cmp::Reverse,
    collections::{HashMap, HashSet},
    hash::Hash,
    ops::AddAssign,
};

pub use crate::config::*;

// **** Private structures ****

/// Dense index of a candidate, assigned in candidate-list order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CandidateId(u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

// A ballot after normalization: one preference per candidate, in candidate
// order. Candidates the voter left unranked sit at preference 0.
#[derive(Eq, PartialEq, Debug, Clone)]
struct VoteInternal {
    prefs: Vec<u32>,
    count: VoteCount,
}

// A pairwise contest that survived tie filtering: `support` ballots prefer
// the winner, `opposition` ballots prefer the loser, support > opposition.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
struct RankedPair {
    winner: CandidateId,
    loser: CandidateId,
    support: VoteCount,
    opposition: VoteCount,
}

// Row-major n*n matrix of ballot counts: entry (i, j) is the number of
// ballots preferring candidate i over candidate j. The diagonal stays zero.
struct PairwiseTally {
    n: usize,
    counts: Vec<VoteCount>,
}

impl PairwiseTally {
    /// Tallies every head-to-head contest. Both directions of a contest are
    /// accumulated in the same pass over the ballots, since both are needed.
    fn compute(n: usize, votes: &[VoteInternal]) -> PairwiseTally {
        let mut counts = vec![VoteCount::EMPTY; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let mut fwd = VoteCount::EMPTY;
                let mut rev = VoteCount::EMPTY;
                for v in votes.iter() {
                    if v.prefs[i] > v.prefs[j] {
                        fwd += v.count;
                    } else if v.prefs[j] > v.prefs[i] {
                        rev += v.count;
                    }
                    // Equal preferences count for neither direction.
                }
                counts[i * n + j] = fwd;
                counts[j * n + i] = rev;
            }
        }
        PairwiseTally { n, counts }
    }

    fn get(&self, winner: usize, loser: usize) -> VoteCount {
        self.counts[winner * self.n + loser]
    }
}

// **** Public API ****

/// Runs a Ranked Pairs tabulation and returns the winner set.
///
/// Arguments:
/// * `candidates` the candidates standing in this election, without
///   duplicates. Their order fixes the tie-break order for contests with
///   identical strength.
/// * `ballots` the voters' preference maps. Higher values are more
///   preferred; unranked candidates count as rank 0. Preference values are
///   taken as-is and are not otherwise validated.
///
/// The result is non-empty and contains more than one candidate only when
/// the leaders are exactly tied.
pub fn resolve<A>(candidates: &[A], ballots: &[Ballot<A>]) -> Result<HashSet<A>, TallyError>
where
    A: Clone + Eq + Hash,
{
    resolve_with(candidates, ballots, WinnerMethod::DEFAULT)
}

/// Same as [resolve], with an explicit choice of winner extraction
/// procedure.
pub fn resolve_with<A>(
    candidates: &[A],
    ballots: &[Ballot<A>],
    method: WinnerMethod,
) -> Result<HashSet<A>, TallyError>
where
    A: Clone + Eq + Hash,
{
    let weighted: Vec<(&Ballot<A>, u64)> = ballots.iter().map(|b| (b, 1)).collect();
    resolve_weighted(candidates, &weighted, method)
}

/// Runs repeated Ranked Pairs tabulations to produce the full finish order.
///
/// Each tier holds the winner set over the candidates that have not finished
/// yet; `[{b}, {a, c}, {d}]` puts b first, a and c tied for second, and d
/// last. Validation failures propagate from the first tabulation.
pub fn full_order<A>(
    candidates: &[A],
    ballots: &[Ballot<A>],
) -> Result<Vec<HashSet<A>>, TallyError>
where
    A: Clone + Eq + Hash,
{
    full_order_with(candidates, ballots, WinnerMethod::DEFAULT)
}

/// Same as [full_order], with an explicit choice of winner extraction
/// procedure.
pub fn full_order_with<A>(
    candidates: &[A],
    ballots: &[Ballot<A>],
    method: WinnerMethod,
) -> Result<Vec<HashSet<A>>, TallyError>
where
    A: Clone + Eq + Hash,
{
    let weighted: Vec<(&Ballot<A>, u64)> = ballots.iter().map(|b| (b, 1)).collect();
    full_order_weighted(candidates, &weighted, method)
}

// Entry point shared with the builder, which carries per-ballot weights.
// A ballot with weight w counts as w identical ballots.
pub(crate) fn resolve_weighted<A>(
    candidates: &[A],
    ballots: &[(&Ballot<A>, u64)],
    method: WinnerMethod,
) -> Result<HashSet<A>, TallyError>
where
    A: Clone + Eq + Hash,
{
    let votes = check(candidates, ballots)?;
    let n = candidates.len();
    info!(
        "resolve: tabulating {:?} ballots over {:?} candidates",
        votes.len(),
        n
    );

    let tally = PairwiseTally::compute(n, &votes);
    let pairs = rank_pairs(&tally);
    debug!(
        "resolve: {:?} decisive contests after tie filtering: {:?}",
        pairs.len(),
        pairs
    );

    let winner_ids = match method {
        WinnerMethod::SinglePass => single_pass_winners(n, &pairs),
        WinnerMethod::LockGraph => lock_graph_winners(n, &pairs),
    };
    debug!("resolve: winners: {:?}", winner_ids);

    Ok(winner_ids
        .iter()
        .map(|cid| candidates[cid.0 as usize].clone())
        .collect())
}

pub(crate) fn full_order_weighted<A>(
    candidates: &[A],
    ballots: &[(&Ballot<A>, u64)],
    method: WinnerMethod,
) -> Result<Vec<HashSet<A>>, TallyError>
where
    A: Clone + Eq + Hash,
{
    let mut pool: Vec<A> = candidates.to_vec();
    let mut order: Vec<HashSet<A>> = Vec::new();
    // Every tabulation returns a non-empty subset of the pool, so the pool
    // shrinks on every iteration. Ballots are reused unmodified; entries
    // for candidates that already finished are ignored by normalization.
    while !pool.is_empty() {
        let tier = resolve_weighted(&pool, ballots, method)?;
        pool.retain(|c| !tier.contains(c));
        order.push(tier);
    }
    Ok(order)
}

// **** Validation and normalization ****

// Rejects invalid input, then rewrites each ballot as a dense preference
// row in candidate order. The caller's ballots are never mutated.
fn check<A>(candidates: &[A], ballots: &[(&Ballot<A>, u64)]) -> Result<Vec<VoteInternal>, TallyError>
where
    A: Clone + Eq + Hash,
{
    if candidates.is_empty() {
        return Err(TallyError::NoCandidates);
    }
    if ballots.is_empty() {
        return Err(TallyError::NoVotes);
    }
    let mut index: HashMap<&A, usize> = HashMap::with_capacity(candidates.len());
    for (ix, candidate) in candidates.iter().enumerate() {
        if index.insert(candidate, ix).is_some() {
            return Err(TallyError::DuplicateCandidates);
        }
    }

    let n = candidates.len();
    let votes = ballots
        .iter()
        .map(|(ballot, count)| {
            let mut prefs = vec![0u32; n];
            for (candidate, &rank) in ballot.iter() {
                // Entries for unknown candidates can never join a contest.
                if let Some(&ix) = index.get(candidate) {
                    prefs[ix] = rank;
                }
            }
            VoteInternal {
                prefs,
                count: VoteCount(*count),
            }
        })
        .collect();
    Ok(votes)
}

// **** Pair ranking ****

// Keeps the decisive direction of every contest and sorts the survivors:
// strongest victories first, and among victories of equal strength, the one
// whose loser had the fewest supporting ballots first. Contests with
// identical keys keep their enumeration order (the sort is stable and the
// enumeration follows the candidate-list order), so the result never
// depends on hash iteration order.
fn rank_pairs(tally: &PairwiseTally) -> Vec<RankedPair> {
    let n = tally.n;
    let mut pairs: Vec<RankedPair> = Vec::new();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let support = tally.get(i, j);
            let opposition = tally.get(j, i);
            // Exact ties are not a victory in either direction.
            if support > opposition {
                pairs.push(RankedPair {
                    winner: CandidateId(i as u32),
                    loser: CandidateId(j as u32),
                    support,
                    opposition,
                });
            }
        }
    }
    pairs.sort_by_key(|p| (Reverse(p.support), p.opposition));
    pairs
}

// **** Winner extraction ****

// Reference procedure: build the lock graph edge by edge, re-checking the
// whole graph for a cycle after every tentative insertion. The winners are
// the sources of the final graph.
fn lock_graph_winners(n: usize, pairs: &[RankedPair]) -> Vec<CandidateId> {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut attempted: HashSet<(u32, u32)> = HashSet::new();
    for p in pairs.iter() {
        if attempted.contains(&(p.loser.0, p.winner.0)) {
            // The opposite direction was already processed; a contest is
            // decided at most once.
            continue;
        }
        let (i, j) = (p.winner.0 as usize, p.loser.0 as usize);
        adjacency[i].push(j);
        if has_cycle(&adjacency) {
            // The victory contradicts stronger ones already locked in.
            // Remove the edge and skip the contest permanently.
            adjacency[i].pop();
        }
        attempted.insert((p.winner.0, p.loser.0));
    }

    let mut has_incoming = vec![false; n];
    for targets in adjacency.iter() {
        for &t in targets.iter() {
            has_incoming[t] = true;
        }
    }
    (0..n)
        .filter(|&c| !has_incoming[c])
        .map(|c| CandidateId(c as u32))
        .collect()
}

// Default procedure. Tracks the defeated candidates and locks each contest
// without touching the graph whenever the contest winner is still
// undefeated: a cycle closed by the edge i -> j would need a path back into
// i, and an undefeated i has no incoming edge. Only when the winner has
// already lost does the lock decision need a reachability probe.
//
// The probe makes this procedure agree with the lock graph on every input.
// The shortcut it replaces (skipping every contest whose winner had already
// lost) does not: with ranked contests [(a,b), (b,c)] and the (a,c) contest
// exactly tied, b -> c locks fine, yet the shortcut would leave c
// undefeated and report two winners instead of one.
fn single_pass_winners(n: usize, pairs: &[RankedPair]) -> Vec<CandidateId> {
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut locked_as_loser = vec![false; n];
    let mut consumed: HashSet<(u32, u32)> = HashSet::new();
    for p in pairs.iter() {
        if consumed.contains(&(p.loser.0, p.winner.0)) {
            continue;
        }
        let (i, j) = (p.winner.0 as usize, p.loser.0 as usize);
        if !locked_as_loser[i] || !reaches(&adjacency, j, i) {
            adjacency[i].push(j);
            locked_as_loser[j] = true;
            consumed.insert((p.winner.0, p.loser.0));
        }
    }
    (0..n)
        .filter(|&c| !locked_as_loser[c])
        .map(|c| CandidateId(c as u32))
        .collect()
}

// Depth-first search for any cycle, visiting each node at most once.
// 0 = unvisited, 1 = on the current path, 2 = fully explored.
fn has_cycle(adjacency: &[Vec<usize>]) -> bool {
    let mut state = vec![0u8; adjacency.len()];
    for start in 0..adjacency.len() {
        if state[start] == 0 && visit_finds_cycle(adjacency, start, &mut state) {
            return true;
        }
    }
    false
}

fn visit_finds_cycle(adjacency: &[Vec<usize>], node: usize, state: &mut [u8]) -> bool {
    state[node] = 1;
    for &next in adjacency[node].iter() {
        match state[next] {
            1 => return true,
            0 => {
                if visit_finds_cycle(adjacency, next, state) {
                    return true;
                }
            }
            _ => {}
        }
    }
    state[node] = 2;
    false
}

// Is `to` reachable from `from` over the locked edges?
fn reaches(adjacency: &[Vec<usize>], from: usize, to: usize) -> bool {
    let mut visited = vec![false; adjacency.len()];
    let mut stack = vec![from];
    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if visited[node] {
            continue;
        }
        visited[node] = true;
        for &next in adjacency[node].iter() {
            if !visited[next] {
                stack.push(next);
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ballot(prefs: &[(&'static str, u32)]) -> Ballot<&'static str> {
        prefs.iter().cloned().collect()
    }

    fn winners(
        candidates: &[&'static str],
        ballots: &[Ballot<&'static str>],
    ) -> HashSet<&'static str> {
        let fast = resolve_with(candidates, ballots, WinnerMethod::SinglePass).unwrap();
        let reference = resolve_with(candidates, ballots, WinnerMethod::LockGraph).unwrap();
        assert_eq!(fast, reference);
        fast
    }

    #[test]
    fn single_winner_beats_both_rivals() {
        let candidates = ["A", "B", "C"];
        let ballots = [
            ballot(&[("A", 3), ("B", 2), ("C", 1)]),
            ballot(&[("A", 3), ("B", 2), ("C", 1)]),
            ballot(&[("C", 3), ("B", 2), ("A", 1)]),
        ];
        // A beats B 2-1, A beats C 2-1, B beats C 2-1.
        assert_eq!(winners(&candidates, &ballots), HashSet::from(["A"]));

        let order = full_order(&candidates, &ballots).unwrap();
        assert_eq!(
            order,
            vec![
                HashSet::from(["A"]),
                HashSet::from(["B"]),
                HashSet::from(["C"]),
            ]
        );
    }

    #[test]
    fn exact_tie_returns_both_candidates() {
        let candidates = ["A", "B"];
        let ballots = [
            ballot(&[("A", 2), ("B", 1)]),
            ballot(&[("B", 2), ("A", 1)]),
        ];
        assert_eq!(winners(&candidates, &ballots), HashSet::from(["A", "B"]));
    }

    #[test]
    fn no_net_preference_keeps_everyone() {
        let candidates = ["A", "B", "C"];
        let ballots = [ballot(&[("A", 1), ("B", 1), ("C", 1)])];
        assert_eq!(
            winners(&candidates, &ballots),
            HashSet::from(["A", "B", "C"])
        );
        let order = full_order(&candidates, &ballots).unwrap();
        assert_eq!(order, vec![HashSet::from(["A", "B", "C"])]);
    }

    #[test]
    fn majority_cycle_skips_the_weakest_victory() {
        // Rock-paper-scissors electorate: A > B > C > A, every victory 2-1.
        // The C -> A victory is processed last and would close the cycle.
        let candidates = ["A", "B", "C"];
        let ballots = [
            ballot(&[("A", 3), ("B", 2), ("C", 1)]),
            ballot(&[("B", 3), ("C", 2), ("A", 1)]),
            ballot(&[("C", 3), ("A", 2), ("B", 1)]),
        ];
        assert_eq!(winners(&candidates, &ballots), HashSet::from(["A"]));
    }

    #[test]
    fn defeated_winner_still_locks_its_victory() {
        // Ranked contests come out as [(A,B), (B,C)] with the (A,C) contest
        // exactly tied. B has already lost when (B,C) is processed, but the
        // victory locks anyway and C finishes defeated.
        let candidates = ["A", "B", "C"];
        let ballots = [
            ballot(&[("A", 3), ("B", 2), ("C", 1)]),
            ballot(&[("C", 3), ("A", 2), ("B", 1)]),
            ballot(&[("B", 2), ("A", 1), ("C", 1)]),
        ];
        assert_eq!(winners(&candidates, &ballots), HashSet::from(["A"]));
    }

    #[test]
    fn unranked_candidates_default_to_zero() {
        let candidates = ["A", "B"];
        let ballots = [ballot(&[("A", 1)]), ballot(&[("A", 2)])];
        assert_eq!(winners(&candidates, &ballots), HashSet::from(["A"]));
    }

    #[test]
    fn unknown_ballot_entries_are_ignored() {
        let candidates = ["A", "B"];
        let ballots = [
            ballot(&[("A", 1), ("Z", 9)]),
            ballot(&[("A", 1), ("Z", 9)]),
        ];
        assert_eq!(winners(&candidates, &ballots), HashSet::from(["A"]));
    }

    #[test]
    fn single_candidate_wins_alone() {
        let candidates = ["A"];
        let ballots = [ballot(&[])];
        assert_eq!(winners(&candidates, &ballots), HashSet::from(["A"]));
    }

    #[test]
    fn empty_candidates_are_rejected() {
        let candidates: [&str; 0] = [];
        let ballots = [ballot(&[])];
        assert_eq!(
            resolve(&candidates, &ballots),
            Err(TallyError::NoCandidates)
        );
        assert_eq!(
            full_order(&candidates, &ballots),
            Err(TallyError::NoCandidates)
        );
    }

    #[test]
    fn empty_ballots_are_rejected() {
        let candidates = ["A"];
        let ballots: [Ballot<&str>; 0] = [];
        assert_eq!(resolve(&candidates, &ballots), Err(TallyError::NoVotes));
        assert_eq!(full_order(&candidates, &ballots), Err(TallyError::NoVotes));
    }

    #[test]
    fn repeated_candidates_are_rejected() {
        let candidates = ["A", "A"];
        let ballots = [ballot(&[("A", 1)])];
        assert_eq!(
            resolve(&candidates, &ballots),
            Err(TallyError::DuplicateCandidates)
        );
    }

    #[test]
    fn resolving_twice_gives_the_same_result() {
        let candidates = ["A", "B", "C"];
        let ballots = [
            ballot(&[("A", 3), ("B", 2), ("C", 1)]),
            ballot(&[("B", 3), ("C", 2), ("A", 1)]),
            ballot(&[("A", 3), ("C", 2), ("B", 1)]),
        ];
        assert_eq!(
            resolve(&candidates, &ballots).unwrap(),
            resolve(&candidates, &ballots).unwrap()
        );
        assert_eq!(
            full_order(&candidates, &ballots).unwrap(),
            full_order(&candidates, &ballots).unwrap()
        );
    }

    // The ranking itself, on a hand-built tally.
    fn tally_from(n: usize, entries: &[(usize, usize, u64)]) -> PairwiseTally {
        let mut counts = vec![VoteCount::EMPTY; n * n];
        for &(i, j, c) in entries.iter() {
            counts[i * n + j] = VoteCount(c);
        }
        PairwiseTally { n, counts }
    }

    #[test]
    fn ranking_prefers_strength_then_weak_opposition() {
        // (2,3) wins 5-1, (0,1) wins 5-2: equal support, so the contest
        // with the weaker loser resolves first.
        let tally = tally_from(4, &[(0, 1, 5), (1, 0, 2), (2, 3, 5), (3, 2, 1)]);
        let pairs = rank_pairs(&tally);
        assert_eq!(pairs.len(), 2);
        assert_eq!((pairs[0].winner, pairs[0].loser), (CandidateId(2), CandidateId(3)));
        assert_eq!((pairs[1].winner, pairs[1].loser), (CandidateId(0), CandidateId(1)));
    }

    #[test]
    fn ranking_keeps_enumeration_order_on_equal_keys() {
        let tally = tally_from(4, &[(0, 1, 5), (1, 0, 2), (0, 2, 5), (2, 0, 2)]);
        let pairs = rank_pairs(&tally);
        assert_eq!(pairs.len(), 2);
        assert_eq!((pairs[0].winner, pairs[0].loser), (CandidateId(0), CandidateId(1)));
        assert_eq!((pairs[1].winner, pairs[1].loser), (CandidateId(0), CandidateId(2)));
    }

    #[test]
    fn ranking_drops_exact_ties_entirely() {
        let tally = tally_from(2, &[(0, 1, 3), (1, 0, 3)]);
        assert!(rank_pairs(&tally).is_empty());
    }
}
