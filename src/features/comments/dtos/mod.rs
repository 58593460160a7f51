mod comment_dto;

pub use comment_dto::{
    CommentDetailDto, CommentResponseDto, CommentTreeDto, CreateCommentDto, ListCommentsQuery,
};
