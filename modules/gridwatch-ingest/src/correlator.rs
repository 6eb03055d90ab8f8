//! Reply/context correlation: a provider reply is classified together with
//! the post it answers.

use gridwatch_common::RawPost;

/// The unit of extraction for a post: its own text, joined with the original
/// post's text when reply context is present. Mentions carry no context and
/// pass through unchanged.
pub fn combined_text(post: &RawPost) -> String {
    match &post.original_text {
        Some(original) => format!("{}\n{}", post.text, original),
        None => post.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(text: &str, original: Option<&str>) -> RawPost {
        RawPost {
            id: "1".to_string(),
            text: text.to_string(),
            created_at: None,
            author_id: None,
            is_reply: original.is_some(),
            original_text: original.map(str::to_string),
            metrics: Default::default(),
        }
    }

    #[test]
    fn standalone_post_passes_through() {
        let p = post("Power outage in Kigali", None);
        assert_eq!(combined_text(&p), "Power outage in Kigali");
    }

    #[test]
    fn reply_joins_original_with_newline() {
        let p = post("Crews dispatched", Some("No power in Huye since morning"));
        assert_eq!(
            combined_text(&p),
            "Crews dispatched\nNo power in Huye since morning"
        );
    }
}
