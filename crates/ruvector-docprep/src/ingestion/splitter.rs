//! Paragraph-bounded section splitting

/// Separator between paragraphs
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Splits long text into sections at paragraph boundaries
///
/// Paragraphs are packed greedily in order. A paragraph longer than the
/// limit becomes its own section; text is never cut inside a paragraph.
#[derive(Debug, Clone, Copy)]
pub struct SectionSplitter {
    /// Maximum section length in characters
    max_len: usize,
}

impl SectionSplitter {
    /// Create a splitter with the given maximum section length
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Split `text` into ordered sections
    pub fn split(&self, text: &str) -> Vec<String> {
        let separator_len = PARAGRAPH_SEPARATOR.chars().count();
        let mut sections = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for paragraph in text.split(PARAGRAPH_SEPARATOR) {
            let paragraph_len = paragraph.chars().count();

            if current_len > 0 && current_len + paragraph_len + separator_len > self.max_len {
                sections.push(current.trim().to_string());
                current = paragraph.to_string();
                current_len = paragraph_len;
            } else {
                if current_len > 0 {
                    current.push_str(PARAGRAPH_SEPARATOR);
                    current_len += separator_len;
                }
                current.push_str(paragraph);
                current_len += paragraph_len;
            }
        }

        let last = current.trim();
        if !last.is_empty() {
            sections.push(last.to_string());
        }

        sections
    }
}

impl Default for SectionSplitter {
    fn default() -> Self {
        Self::new(3000)
    }
}
