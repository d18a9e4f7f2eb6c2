pub mod agent;
pub mod random;
pub mod scoring;

pub use agent::Agent;
pub use random::RandomAgent;
pub use scoring::ScoringAgent;
