mod llm;

pub use crate::record::Category;
pub use llm::LlmClassifier;

/// Decides whether a URL is a shopping destination.
///
/// Implementations return an already-normalized verdict; any fuzzy
/// interpretation of free text happens behind this boundary.
#[async_trait::async_trait]
pub trait CategoryClassifier: Send + Sync {
    async fn classify(&self, url: &str) -> Result<Category, ClassifyError>;
}

/// Classification errors. The pipeline treats both as "Information".
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    #[error("Classifier returned an uninterpretable verdict: {0:?}")]
    MalformedResponse(String),
}

/// Interpret a free-text model reply as a category.
///
/// The reply is split into words; it must name exactly one of
/// "shopping" / "information". Replies naming both or neither are
/// rejected rather than guessed.
pub fn parse_verdict(reply: &str) -> Result<Category, ClassifyError> {
    let lowered = reply.to_lowercase();
    let mut shopping = false;
    let mut information = false;

    for word in lowered.split(|c: char| !c.is_alphanumeric()) {
        match word {
            "shopping" => shopping = true,
            "information" | "informational" => information = true,
            _ => {}
        }
    }

    match (shopping, information) {
        (true, false) => Ok(Category::Shopping),
        (false, true) => Ok(Category::Information),
        _ => Err(ClassifyError::MalformedResponse(reply.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word_replies() {
        assert_eq!(parse_verdict("Shopping").unwrap(), Category::Shopping);
        assert_eq!(parse_verdict(" information.\n").unwrap(), Category::Information);
        assert_eq!(parse_verdict("'SHOPPING'").unwrap(), Category::Shopping);
        assert_eq!(parse_verdict("Informational").unwrap(), Category::Information);
    }

    #[test]
    fn test_sentence_reply() {
        assert_eq!(
            parse_verdict("The category of this URL is shopping.").unwrap(),
            Category::Shopping
        );
    }

    #[test]
    fn test_both_words_rejected() {
        assert!(matches!(
            parse_verdict("Not shopping, information"),
            Err(ClassifyError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_neither_word_rejected() {
        assert!(matches!(
            parse_verdict("Entertainment"),
            Err(ClassifyError::MalformedResponse(_))
        ));
        assert!(matches!(parse_verdict(""), Err(ClassifyError::MalformedResponse(_))));
    }

    #[test]
    fn test_substring_inside_word_not_counted() {
        // "shoppingcart" is one token, not the verdict word
        assert!(parse_verdict("shoppingcart").is_err());
    }
}
