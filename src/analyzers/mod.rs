//! Engagement grading and the aggregations behind the dashboard.
//!
//! Every post is graded from its like count, then summarized as a like-count
//! histogram, an hourly trend, mean body length per grade and a ranking of
//! frequent words per grade.

pub mod aggregate;
pub mod analyzer;
pub mod grade;
pub mod lexical;
pub mod types;
pub mod utility;
