//! Feature extraction
//!
//! Converts the historical tables into per-matchup feature vectors.

pub mod form;
pub mod rankings;
pub mod vector;
pub mod window;

pub use form::{FormFeatures, GameFormExtractor, LONG_WINDOW, SHORT_WINDOW};
pub use rankings::{RankingFeatureExtractor, RankingFeatures, TeamRankingFeatures};
pub use vector::{FeatureVector, MatchupVectorBuilder, Mode};
pub use window::{Perspective, TeamGameView, WindowSelector};
