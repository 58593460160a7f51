mod mention_dto;

pub use mention_dto::{MentionResponseDto, MentionStatsDto};
