use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::dtos::AuthUserDto;
use crate::features::comments::models::CommentWithAuthor;
use crate::shared::constants::COMMENT_PAGE_SIZE;

/// Request DTO for creating a comment
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentDto {
    /// Comment body (HTML from the rich-text editor; sanitized before storage)
    #[validate(length(min = 1, max = 20000, message = "Comment must be 1-20000 characters"))]
    pub body: String,

    /// If set, this comment is a reply to another comment of the same
    /// feedback item
    pub parent_id: Option<Uuid>,
}

/// Query params for listing root comments
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ListCommentsQuery {
    /// Page number over root comments (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Root comments per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,

    /// Reply levels to attach below each root; absent means unbounded
    pub depth: Option<u32>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    COMMENT_PAGE_SIZE
}

impl ListCommentsQuery {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    pub fn limit(&self) -> i64 {
        self.page_size
            .clamp(1, crate::shared::constants::MAX_PAGE_SIZE)
    }
}

/// Flat view of a single comment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponseDto {
    pub id: Uuid,
    pub feedback_id: Uuid,
    pub author: AuthUserDto,
    pub body: String,
    pub parent_id: Option<Uuid>,
    /// Users this comment mentions, derived from the mention ledger
    pub mentioned_user_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl CommentResponseDto {
    pub fn from_row(row: &CommentWithAuthor, mentioned_user_ids: Vec<Uuid>) -> Self {
        Self {
            id: row.id,
            feedback_id: row.product_feedback_id,
            author: AuthUserDto {
                id: row.user_id,
                name: row.author_name.clone(),
                email: row.author_email.clone(),
                created_at: None,
            },
            body: row.body.clone(),
            parent_id: row.parent_id,
            mentioned_user_ids,
            created_at: row.created_at,
        }
    }
}

/// Comment with its reply subtree attached
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(no_recursion)]
pub struct CommentTreeDto {
    #[serde(flatten)]
    pub comment: CommentResponseDto,
    pub replies: Vec<CommentTreeDto>,
}

/// Single-comment view: the node with its subtree, plus its immediate parent
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentDetailDto {
    #[serde(flatten)]
    pub comment: CommentTreeDto,
    pub parent: Option<CommentResponseDto>,
}

impl CommentTreeDto {
    /// Assemble the comment forest for one feedback item from a flat fetch.
    ///
    /// Roots come back newest first; replies within a parent stay in
    /// chronological order. `mentions` maps comment id to the mentioned user
    /// ids recorded in the ledger.
    pub fn build_forest(
        comments: &[CommentWithAuthor],
        mentions: &HashMap<Uuid, Vec<Uuid>>,
    ) -> Vec<CommentTreeDto> {
        let mut children: HashMap<Option<Uuid>, Vec<&CommentWithAuthor>> = HashMap::new();
        for c in comments {
            children.entry(c.parent_id).or_default().push(c);
        }
        // Flat fetch is ordered oldest first, so each child list is already
        // chronological.
        let mut roots: Vec<CommentTreeDto> = children
            .get(&None)
            .map(|roots| {
                roots
                    .iter()
                    .map(|c| Self::build_node(c, &children, mentions))
                    .collect()
            })
            .unwrap_or_default();

        roots.sort_by(|a, b| b.comment.created_at.cmp(&a.comment.created_at));
        roots
    }

    /// Build the subtree rooted at one comment.
    pub fn build_subtree(
        root: &CommentWithAuthor,
        comments: &[CommentWithAuthor],
        mentions: &HashMap<Uuid, Vec<Uuid>>,
    ) -> CommentTreeDto {
        let mut children: HashMap<Option<Uuid>, Vec<&CommentWithAuthor>> = HashMap::new();
        for c in comments {
            children.entry(c.parent_id).or_default().push(c);
        }
        Self::build_node(root, &children, mentions)
    }

    fn build_node(
        comment: &CommentWithAuthor,
        children: &HashMap<Option<Uuid>, Vec<&CommentWithAuthor>>,
        mentions: &HashMap<Uuid, Vec<Uuid>>,
    ) -> CommentTreeDto {
        let replies = children
            .get(&Some(comment.id))
            .map(|kids| {
                kids.iter()
                    .map(|c| Self::build_node(c, children, mentions))
                    .collect()
            })
            .unwrap_or_default();

        CommentTreeDto {
            comment: CommentResponseDto::from_row(
                comment,
                mentions.get(&comment.id).cloned().unwrap_or_default(),
            ),
            replies,
        }
    }

    /// Drop replies below `depth` levels; 0 keeps roots only.
    pub fn trim_to_depth(&mut self, depth: u32) {
        if depth == 0 {
            self.replies.clear();
        } else {
            for reply in &mut self.replies {
                reply.trim_to_depth(depth - 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(
        id: u128,
        parent: Option<u128>,
        minute: u32,
    ) -> CommentWithAuthor {
        CommentWithAuthor {
            id: Uuid::from_u128(id),
            product_feedback_id: Uuid::from_u128(999),
            user_id: Uuid::from_u128(7),
            body: format!("comment {}", id),
            parent_id: parent.map(Uuid::from_u128),
            created_at: Utc.with_ymd_and_hms(2025, 8, 10, 12, minute, 0).unwrap(),
            author_name: "Alice".to_string(),
            author_email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn test_roots_are_newest_first() {
        let comments = vec![row(1, None, 0), row(2, None, 5)];
        let forest = CommentTreeDto::build_forest(&comments, &HashMap::new());
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].comment.id, Uuid::from_u128(2));
        assert_eq!(forest[1].comment.id, Uuid::from_u128(1));
    }

    #[test]
    fn test_reply_attaches_under_root() {
        let comments = vec![row(1, None, 0), row(2, Some(1), 1)];
        let forest = CommentTreeDto::build_forest(&comments, &HashMap::new());
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].replies.len(), 1);
        assert_eq!(forest[0].replies[0].comment.id, Uuid::from_u128(2));
    }

    #[test]
    fn test_deep_nesting_is_preserved() {
        let comments = vec![
            row(1, None, 0),
            row(2, Some(1), 1),
            row(3, Some(2), 2),
            row(4, Some(3), 3),
        ];
        let forest = CommentTreeDto::build_forest(&comments, &HashMap::new());
        let level3 = &forest[0].replies[0].replies[0].replies[0];
        assert_eq!(level3.comment.id, Uuid::from_u128(4));
    }

    #[test]
    fn test_replies_stay_chronological() {
        let comments = vec![row(1, None, 0), row(2, Some(1), 2), row(3, Some(1), 1)];
        let forest = CommentTreeDto::build_forest(&comments, &HashMap::new());
        let ids: Vec<Uuid> = forest[0]
            .replies
            .iter()
            .map(|r| r.comment.id)
            .collect();
        assert_eq!(ids, vec![Uuid::from_u128(3), Uuid::from_u128(2)]);
    }

    #[test]
    fn test_trim_to_depth() {
        let comments = vec![
            row(1, None, 0),
            row(2, Some(1), 1),
            row(3, Some(2), 2),
        ];
        let mut forest = CommentTreeDto::build_forest(&comments, &HashMap::new());
        forest[0].trim_to_depth(1);
        assert_eq!(forest[0].replies.len(), 1);
        assert!(forest[0].replies[0].replies.is_empty());
    }

    #[test]
    fn test_mentions_are_attached_from_ledger_map() {
        let comments = vec![row(1, None, 0)];
        let mut mentions = HashMap::new();
        mentions.insert(Uuid::from_u128(1), vec![Uuid::from_u128(42)]);
        let forest = CommentTreeDto::build_forest(&comments, &mentions);
        assert_eq!(
            forest[0].comment.mentioned_user_ids,
            vec![Uuid::from_u128(42)]
        );
    }
}
