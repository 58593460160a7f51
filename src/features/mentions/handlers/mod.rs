mod mention_handler;

pub use mention_handler::*;
