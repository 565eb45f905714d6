// Resume screening: attribute extraction, heuristic scoring and batch bias detection.
// External lookups (phone numbers, city names, PDF text) are injected, never global.

pub mod bias;
pub mod collaborators;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod scoring;
