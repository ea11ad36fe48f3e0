#![allow(clippy::cast_possible_truncation)]

use crate::config::COSINE_EPSILON;
use crate::error::{RagError, Result};
use crate::pipeline::lexical::Candidate;
use crate::service::embed::Embedding;

/// A candidate scored against the query embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate<'a> {
    pub candidate: Candidate<'a>,
    pub similarity: f32,
}

impl RankedCandidate<'_> {
    pub fn document_id(&self) -> &str {
        &self.candidate.document.id
    }

    pub fn snippet(&self) -> &str {
        &self.candidate.snippet
    }

    /// Similarity as a percentage for display. Clamped to `[-100, 100]`;
    /// ranking always uses the raw score.
    pub fn similarity_percent(&self) -> f32 {
        similarity_percent(self.similarity)
    }
}

pub fn similarity_percent(similarity: f32) -> f32 {
    similarity.clamp(-1.0, 1.0) * 100.0
}

/// `dot(a, b) / (|a| * |b| + ε)`, unclamped.
///
/// Vectors of different length are a contract violation.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RagError::ContractViolation(format!(
            "embedding dimensions differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt() + COSINE_EPSILON)) as f32)
}

/// Score every candidate against `query` and sort by descending similarity.
/// The sort is stable, so equal scores keep their input order.
pub fn rank<'a>(
    query: &[f32],
    scored: Vec<(Candidate<'a>, Embedding)>,
) -> Result<Vec<RankedCandidate<'a>>> {
    let mut ranked = scored
        .into_iter()
        .map(|(candidate, embedding)| {
            cosine_similarity(query, &embedding).map(|similarity| RankedCandidate {
                candidate,
                similarity,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::Document;

    fn candidate(document: &Document) -> Candidate<'_> {
        Candidate {
            document,
            snippet: document.content.clone(),
        }
    }

    #[test]
    fn identical_vectors_score_one() {
        let sim = cosine_similarity(&[0.3, -1.2, 4.0], &[0.3, -1.2, 4.0]).unwrap();
        assert!((sim - 1.0).abs() < 1e-6, "got {sim}");
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = [0.1, 0.7, -0.2, 0.9];
        let b = [0.5, -0.3, 0.8, 0.05];
        assert_eq!(
            cosine_similarity(&a, &b).unwrap(),
            cosine_similarity(&b, &a).unwrap()
        );
    }

    #[test]
    fn orthogonal_and_opposite_vectors() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        let opposite = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((opposite + 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_zero_instead_of_nan() {
        let sim = cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap();
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn dimension_mismatch_is_contract_violation() {
        let err = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "contract violation: embedding dimensions differ: 2 vs 3"
        );
    }

    #[test]
    fn rank_sorts_descending() {
        let docs = [
            Document::new("low", "l"),
            Document::new("high", "h"),
            Document::new("mid", "m"),
        ];
        let ranked = rank(
            &[1.0, 0.0],
            vec![
                (candidate(&docs[0]), vec![0.0, 1.0]),
                (candidate(&docs[1]), vec![1.0, 0.0]),
                (candidate(&docs[2]), vec![1.0, 1.0]),
            ],
        )
        .unwrap();

        let ids: Vec<_> = ranked.iter().map(RankedCandidate::document_id).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
        assert!(ranked.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    }

    #[test]
    fn rank_is_stable_for_ties() {
        let docs = [
            Document::new("first", "a"),
            Document::new("second", "b"),
            Document::new("third", "c"),
        ];
        let ranked = rank(
            &[1.0, 1.0],
            vec![
                (candidate(&docs[0]), vec![2.0, 2.0]),
                (candidate(&docs[1]), vec![0.0, 1.0]),
                (candidate(&docs[2]), vec![3.0, 3.0]),
            ],
        )
        .unwrap();

        let ids: Vec<_> = ranked.iter().map(RankedCandidate::document_id).collect();
        assert_eq!(ids, vec!["first", "third", "second"]);
    }

    #[test]
    fn rank_fails_on_any_mismatched_embedding() {
        let docs = [Document::new("ok", "a"), Document::new("bad", "b")];
        let err = rank(
            &[1.0, 0.0],
            vec![
                (candidate(&docs[0]), vec![1.0, 0.0]),
                (candidate(&docs[1]), vec![1.0]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, RagError::ContractViolation(_)));
    }

    #[test]
    fn percent_is_clamped_for_display() {
        assert_eq!(similarity_percent(1.000_001), 100.0);
        assert_eq!(similarity_percent(-1.5), -100.0);
        assert!((similarity_percent(0.5) - 50.0).abs() < 1e-4);
    }
}
