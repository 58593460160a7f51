mod product_feedback;

pub use product_feedback::FeedbackWithAuthor;
