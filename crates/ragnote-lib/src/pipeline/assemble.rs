use crate::config::CHUNK_OVERHEAD_TOKENS;
use crate::pipeline::rank::RankedCandidate;

/// Separator between snippet blocks in the context.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Whitespace-delimited word count. Stands in for a real tokenizer.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Approximate token cost of including `snippet` in the context.
pub fn chunk_cost(snippet: &str) -> usize {
    word_count(snippet) + CHUNK_OVERHEAD_TOKENS
}

/// Result of greedy packing: the number of leading candidates that fit and
/// the approximate tokens they use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packing {
    pub included: usize,
    pub tokens: usize,
}

/// Take the longest prefix of `ranked` whose summed cost stays within
/// `token_budget`. Packing stops at the first candidate that does not fit;
/// later, smaller candidates are not considered.
pub fn pack(ranked: &[RankedCandidate<'_>], token_budget: usize) -> Packing {
    let mut tokens = 0;
    let mut included = 0;
    for candidate in ranked {
        let next = tokens + chunk_cost(candidate.snippet());
        if next > token_budget {
            break;
        }
        tokens = next;
        included += 1;
    }
    Packing { included, tokens }
}

/// Render candidates as `File: {id}\n{snippet}` blocks separated by a blank
/// line.
pub fn render(ranked: &[RankedCandidate<'_>]) -> String {
    ranked
        .iter()
        .map(|c| format!("File: {}\n{}", c.document_id(), c.snippet()))
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Build the context string from the best candidates that fit the budget.
pub fn assemble(ranked: &[RankedCandidate<'_>], token_budget: usize) -> String {
    let packing = pack(ranked, token_budget);
    render(&ranked[..packing.included])
}
