/*!

This is the long-form manual for `ranked_pairs`.

## The method in one paragraph

Ranked Pairs (also known as the Tideman method) elects the candidate that
survives every head-to-head comparison that can be honored without
contradiction. Every pair of candidates is compared across all ballots; the
decisive comparisons are sorted from the most lopsided to the closest, and
are then locked in one at a time. A comparison that would contradict
stronger ones already locked in (a cycle such as A beats B beats C beats A)
is skipped. The winners are the candidates left undefeated at the end.

## Ballots

A ballot maps each candidate to an unsigned preference rank, **higher =
more preferred**:

```text
{ "Anna": 3, "Bob": 2, "Clara": 1 }   Anna over Bob over Clara
{ "Anna": 1 }                         Anna over everyone else
{ }                                   no preference at all
```

Conventions:

* Candidates missing from a ballot are implicitly ranked 0, below every
  explicitly ranked candidate.
* Two candidates with the same rank are an expression of indifference; such
  a ballot supports neither side of that comparison.
* Entries for candidates that are not standing in the election are ignored.
* Identical ballots may be submitted any number of times and each counts
  independently. The [builder](crate::builder) can attach a weight to a
  ballot instead of repeating it.

The numeric values themselves carry no meaning beyond their order, and the
library does not validate them: a ballot of `{A: 1000000, B: 1}` is the same
statement as `{A: 2, B: 1}`.

## Ties and cycles

Ranked Pairs degrades gracefully rather than failing:

* A head-to-head comparison with no majority either way is dropped; it
  constrains nothing.
* A cyclic electorate is resolved in favor of the stronger majorities; the
  weakest comparison in the cycle is skipped.
* [resolve](crate::resolve) returns more than one winner only when the
  leaders cannot be separated by any majority, which is an exact tie. In
  the degenerate case of an electorate with no net preference at all,
  every candidate is returned.

Comparisons of equal strength are ordered by the strength of the opposing
minority (weaker opposition resolves first), and beyond that by the order of
the candidate list, so a tabulation is fully reproducible from its inputs.

## Choosing a winner method

[resolve](crate::resolve) and [full_order](crate::full_order) use the
single-pass procedure. The variants taking a
[WinnerMethod](crate::WinnerMethod) can select the explicit lock-graph
procedure instead, which re-checks the graph for cycles after every locked
comparison. The two produce identical results on every valid input; the
lock graph is retained as the reference the fast procedure is tested
against, and for callers that want the full transparency of the textbook
construction.

## Cost

For `n` candidates and `m` ballots a tabulation costs `O(n² · m)` time in
the pairwise comparison stage, which dominates everything else. The number
of candidates is expected to be small (tens); the number of ballots is
unbounded.

*/
