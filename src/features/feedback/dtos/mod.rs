mod feedback_dto;

pub use feedback_dto::{
    CreateFeedbackDto, FeedbackDetailDto, FeedbackResponseDto, UpdateFeedbackDto,
};
