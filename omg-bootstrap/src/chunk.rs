/// Split `text` into chunks of at most `chunk_char_budget` characters,
/// preferring paragraph (blank-line) boundaries and hard-splitting any
/// paragraph that alone exceeds the budget (spec.md §4.11 step 3: "chunk
/// text (bounded char count per chunk)").
pub fn chunk_text(text: &str, chunk_char_budget: usize) -> Vec<String> {
    let budget = chunk_char_budget.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if paragraph.len() > budget {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.extend(hard_split(paragraph, budget));
            continue;
        }

        let candidate_len = current.len() + if current.is_empty() { 0 } else { 2 } + paragraph.len();
        if candidate_len > budget && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn hard_split(text: &str, budget: usize) -> Vec<String> {
    text.chars()
        .collect::<Vec<char>>()
        .chunks(budget)
        .map(|c| c.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_paragraphs_up_to_budget() {
        let text = "para one here\n\npara two here\n\npara three here";
        let chunks = chunk_text(text, 30);
        assert!(chunks.iter().all(|c| c.len() <= 30));
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn oversized_paragraph_is_hard_split() {
        let long = "x".repeat(100);
        let chunks = chunk_text(&long, 40);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 40);
        assert_eq!(chunks[2].len(), 20);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text("\n\n\n", 100).is_empty());
    }
}
