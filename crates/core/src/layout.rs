//! Site markup description.
//!
//! Every selector, attribute and tag name the crawler relies on lives in
//! [`ForumLayout`]. The default describes Discuz-style thread pages.

/// Selectors and names describing a forum's thread-page markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumLayout {
    /// Individual posts, in display order.
    pub post_selector: String,
    /// Content subtree of a post, relative to the post element.
    pub content_selector: String,
    /// Prefix stripped from a post's `id` to get the post number.
    pub post_id_prefix: String,
    /// Prefix of the floor marker's id; the post number is appended.
    pub floor_id_prefix: String,
    /// Container whose first element child may be the post's own heading.
    pub header_container_selector: String,
    /// Tag of that heading.
    pub header_tag: String,
    /// "Last page" pagination link.
    pub last_page_selector: String,
    /// Pagination entries, last one being the "next" control.
    pub pagination_selector: String,
    /// Class that marks the "next" control.
    pub next_page_class: String,
    /// Page-level thread subject.
    pub subject_selector: String,
    /// Banner shown for deleted threads or missing permissions.
    pub error_banner_selector: String,
    /// Lazy-load attribute holding an image's real source.
    pub image_source_attr: String,
    /// Wrapper tag with no meaning of its own.
    pub pass_through_tag: String,
    /// Elements pruned from a post before it is visited.
    pub removal_selectors: Vec<String>,
}

impl Default for ForumLayout {
    fn default() -> Self {
        Self {
            post_selector: "#postlist .plhin".to_string(),
            content_selector: ".pct .t_f".to_string(),
            post_id_prefix: "pid".to_string(),
            floor_id_prefix: "postnum".to_string(),
            header_container_selector: ".pct .pcb".to_string(),
            header_tag: "h2".to_string(),
            last_page_selector: "a.last".to_string(),
            pagination_selector: ".pgt .pg a".to_string(),
            next_page_class: "nxt".to_string(),
            subject_selector: "#thread_subject".to_string(),
            error_banner_selector: "#messagetext".to_string(),
            image_source_attr: "file".to_string(),
            pass_through_tag: "ignore_js_op".to_string(),
            removal_selectors: ["style", "script", ".pstatus", ".quote", ".tip"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ForumLayout {
    /// Selector for the floor marker of the post with element id `post_element_id`.
    ///
    /// Returns `None` when the id does not carry the expected prefix.
    pub fn floor_selector(&self, post_element_id: &str) -> Option<String> {
        let post_number = post_element_id.strip_prefix(self.post_id_prefix.as_str())?;
        if post_number.is_empty() {
            return None;
        }
        Some(format!("#{}{}", self.floor_id_prefix, post_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_selector() {
        let layout = ForumLayout::default();
        assert_eq!(layout.floor_selector("pid12345"), Some("#postnum12345".to_string()));
        assert_eq!(layout.floor_selector("post_1"), None);
        assert_eq!(layout.floor_selector("pid"), None);
    }

    #[test]
    fn test_default_removal_set() {
        let layout = ForumLayout::default();
        assert_eq!(layout.removal_selectors, vec!["style", "script", ".pstatus", ".quote", ".tip"]);
    }
}
