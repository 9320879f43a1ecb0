pub mod explain;
pub mod matrix;
pub mod recommender;
pub mod similarity;

pub use explain::Reason;
pub use matrix::InteractionMatrix;
pub use recommender::{Recommendation, Recommender, RecommenderError, MAX_RECOMMENDATIONS};
pub use similarity::SimilarityMatrix;
