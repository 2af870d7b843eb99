/// One chunk of source text carrying its origin for diagnostics
/// (spec.md §4.11 step 3).
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub origin: String,
    pub text: String,
}

/// A group of chunks dispatched to Extract as a single LLM call
/// (spec.md §4.11 step 3: "pack chunks into batches up to
/// `batchCharBudget`, compute `batchMaxTokens` proportional to chunk
/// count").
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub index: usize,
    pub chunks: Vec<Chunk>,
    pub max_tokens: usize,
}

/// Output tokens budgeted per chunk when sizing a batch's Extract call.
/// A batch of N chunks gets `N * TOKENS_PER_CHUNK` max output tokens,
/// floored at one chunk's worth so a one-chunk batch always gets a
/// usable budget.
const TOKENS_PER_CHUNK: usize = 250;

/// Greedily bin-pack `chunks` into batches whose combined char length
/// stays at or under `batch_char_budget`; a chunk that alone exceeds the
/// budget still gets its own batch (never dropped).
pub fn pack_batches(chunks: Vec<Chunk>, batch_char_budget: usize) -> Vec<Batch> {
    let budget = batch_char_budget.max(1);
    let mut batches: Vec<Vec<Chunk>> = Vec::new();
    let mut current: Vec<Chunk> = Vec::new();
    let mut current_len = 0usize;

    for chunk in chunks {
        let chunk_len = chunk.text.len();
        if !current.is_empty() && current_len + chunk_len > budget {
            batches.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current_len += chunk_len;
        current.push(chunk);
    }
    if !current.is_empty() {
        batches.push(current);
    }

    batches
        .into_iter()
        .enumerate()
        .map(|(index, chunks)| {
            let max_tokens = chunks.len().max(1) * TOKENS_PER_CHUNK;
            Batch { index, chunks, max_tokens }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(origin: &str, len: usize) -> Chunk {
        Chunk { origin: origin.into(), text: "x".repeat(len) }
    }

    #[test]
    fn packs_chunks_up_to_char_budget() {
        let chunks = vec![chunk("a", 40), chunk("b", 40), chunk("c", 40)];
        let batches = pack_batches(chunks, 100);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].chunks.len(), 2);
        assert_eq!(batches[1].chunks.len(), 1);
    }

    #[test]
    fn oversized_single_chunk_gets_its_own_batch() {
        let chunks = vec![chunk("a", 200)];
        let batches = pack_batches(chunks, 100);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].chunks.len(), 1);
    }

    #[test]
    fn max_tokens_scales_with_chunk_count() {
        let chunks = vec![chunk("a", 10), chunk("b", 10)];
        let batches = pack_batches(chunks, 1000);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].max_tokens, 2 * TOKENS_PER_CHUNK);
    }

    #[test]
    fn batch_indices_are_sequential() {
        let chunks = vec![chunk("a", 60), chunk("b", 60), chunk("c", 60)];
        let batches = pack_batches(chunks, 50);
        assert_eq!(batches.iter().map(|b| b.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
