//! Schulze ranked-choice resolution.
//!
//! Ballots rank candidates from most to least preferred. A candidate missing
//! from a ballot is ranked below every candidate that is present, and two
//! missing candidates are not ranked against each other at all.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An n×n matrix indexed by position in the candidate list.
pub type Matrix = Vec<Vec<u64>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchulzeRequest {
    pub candidates: Vec<String>,
    pub ballots: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchulzeResult {
    /// Every candidate not beaten by any other, in candidate-list order.
    pub winners: Vec<String>,
    /// Strongest path strengths, `matrix[a][b]` being the strength from `a` to `b`.
    pub matrix: Matrix,
}

/// Index every candidate, rejecting a list that names anyone twice.
fn index_candidates(candidates: &[String]) -> Result<HashMap<&str, usize>> {
    let mut index = HashMap::with_capacity(candidates.len());
    for (i, candidate) in candidates.iter().enumerate() {
        if index.insert(candidate.as_str(), i).is_some() {
            return Err(Error::InvalidArgument(format!(
                "Candidate '{candidate}' is listed more than once"
            )));
        }
    }
    Ok(index)
}

/// `d[a][b]`: the number of ballots ranking `a` strictly above `b`.
pub fn preferences<B: AsRef<[String]>>(candidates: &[String], ballots: &[B]) -> Result<Matrix> {
    let index = index_candidates(candidates)?;
    let n = candidates.len();
    let mut d = vec![vec![0; n]; n];
    for ballot in ballots {
        // A candidate named twice keeps its later position.
        let mut rank: Vec<Option<usize>> = vec![None; n];
        for (position, name) in ballot.as_ref().iter().enumerate() {
            if let Some(&i) = index.get(name.as_str()) {
                rank[i] = Some(position);
            }
        }
        for a in 0..n {
            for b in 0..n {
                let prefers = match (rank[a], rank[b]) {
                    (Some(ra), Some(rb)) => ra < rb,
                    (Some(_), None) => true,
                    (None, _) => false,
                };
                if a != b && prefers {
                    d[a][b] += 1;
                }
            }
        }
    }
    Ok(d)
}

/// Strongest path strengths from the preference matrix.
///
/// Only direct majorities seed the matrix. The widest-path closure must run
/// with the intermediate candidate as the outermost loop.
pub fn path_strengths(d: &Matrix) -> Matrix {
    let n = d.len();
    let mut p = vec![vec![0; n]; n];
    for a in 0..n {
        for b in 0..n {
            if a != b && d[a][b] > d[b][a] {
                p[a][b] = d[a][b];
            }
        }
    }
    for i in 0..n {
        for j in 0..n {
            if j == i {
                continue;
            }
            for k in 0..n {
                if k == i || k == j {
                    continue;
                }
                p[j][k] = p[j][k].max(p[j][i].min(p[i][k]));
            }
        }
    }
    p
}

/// Indices of the candidates whose strongest path to every rival is at least as
/// strong as the rival's path back.
pub fn winners(p: &Matrix) -> Vec<usize> {
    let n = p.len();
    (0..n)
        .filter(|&i| (0..n).all(|j| i == j || p[i][j] >= p[j][i]))
        .collect()
}

/// Resolve a ranked-choice election with the Schulze method.
pub fn resolve(request: &SchulzeRequest) -> Result<SchulzeResult> {
    let d = preferences(&request.candidates, &request.ballots)?;
    let matrix = path_strengths(&d);
    let winners = winners(&matrix)
        .into_iter()
        .map(|i| request.candidates[i].clone())
        .collect();
    Ok(SchulzeResult { winners, matrix })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn request(candidates: &[&str], ballots: &[&[&str]]) -> SchulzeRequest {
        SchulzeRequest {
            candidates: strings(candidates),
            ballots: ballots.iter().map(|b| strings(b)).collect(),
        }
    }

    #[test]
    fn four_ballot_cycle() {
        let result = resolve(&request(
            &["A", "B", "C"],
            &[&["A", "B", "C"], &["B", "C", "A"], &["A", "C", "B"], &["C", "A", "B"]],
        ))
        .unwrap();

        assert!(!result.winners.is_empty());
        assert_eq!(result.matrix.len(), 3);
        for (i, row) in result.matrix.iter().enumerate() {
            assert_eq!(row.len(), 3);
            assert_eq!(row[i], 0);
        }
        // A beats B 3-1; the rest are 2-2 ties.
        assert_eq!(result.matrix, vec![vec![0, 3, 0], vec![0, 0, 0], vec![0, 0, 0]]);
        assert_eq!(result.winners, strings(&["A", "C"]));
    }

    #[test]
    fn preference_counts() {
        let candidates = strings(&["A", "B", "C"]);
        let ballots = vec![strings(&["A", "B", "C"]), strings(&["B", "A"])];
        let d = preferences(&candidates, &ballots).unwrap();
        assert_eq!(d, vec![vec![0, 1, 2], vec![1, 0, 2], vec![0, 0, 0]]);
    }

    #[test]
    fn unranked_pairs_contribute_nothing() {
        let candidates = strings(&["A", "B", "C"]);
        let ballots = vec![strings(&["A"])];
        let d = preferences(&candidates, &ballots).unwrap();
        assert_eq!(d[0], vec![0, 1, 1]);
        assert_eq!(d[1][2], 0);
        assert_eq!(d[2][1], 0);
    }

    #[test]
    fn unknown_and_repeated_names() {
        let candidates = strings(&["A", "B"]);
        // "Z" is ignored; "A" keeps its later position, so B is preferred.
        let ballots = vec![strings(&["Z", "A", "B", "A"])];
        let d = preferences(&candidates, &ballots).unwrap();
        assert_eq!(d, vec![vec![0, 0], vec![1, 0]]);
    }

    #[test]
    fn beatpath_through_intermediate() {
        // A beats B 3-2, B beats C 4-1, C beats A 3-2.
        let result = resolve(&request(
            &["A", "B", "C"],
            &[
                &["A", "B", "C"],
                &["A", "B", "C"],
                &["B", "C", "A"],
                &["B", "C", "A"],
                &["C", "A", "B"],
            ],
        ))
        .unwrap();
        // B reaches A through C with strength min(4, 3) = 3, drawing level with A.
        assert_eq!(result.matrix, vec![vec![0, 3, 3], vec![3, 0, 4], vec![3, 3, 0]]);
        assert_eq!(result.winners, strings(&["A", "B"]));
    }

    #[test]
    fn condorcet_winner_wins() {
        let result = resolve(&request(
            &["A", "B", "C", "D"],
            &[&["B", "A", "C", "D"], &["B", "D"], &["A", "B", "C"]],
        ))
        .unwrap();
        assert_eq!(result.winners, strings(&["B"]));
    }

    #[test]
    fn empty_inputs() {
        let result = resolve(&request(&[], &[])).unwrap();
        assert!(result.winners.is_empty());
        assert!(result.matrix.is_empty());

        let result = resolve(&request(&["A", "B"], &[])).unwrap();
        assert_eq!(result.winners, strings(&["A", "B"]));
        assert_eq!(result.matrix, vec![vec![0, 0], vec![0, 0]]);
    }

    #[test]
    fn duplicate_candidates_rejected() {
        assert!(matches!(
            resolve(&request(&["A", "A"], &[])),
            Err(Error::InvalidArgument(_))
        ));
    }
}
