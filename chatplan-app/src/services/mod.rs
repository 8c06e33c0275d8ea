//! Pipeline services and external API clients

pub mod keyword_extractor;
pub mod llm_client;
pub mod pipeline;
pub mod place_resolver;
pub mod places_client;
pub mod presenter;
pub mod query_planner;
pub mod session_store;

pub use llm_client::{CompletionClient, LlmError, OpenAiClient};
pub use pipeline::{PipelineError, PlanPipeline};
pub use places_client::{GooglePlacesClient, PlaceCandidate, PlaceSearch, PlacesError};
pub use presenter::{build_map_view, MapView};
pub use session_store::SessionStore;
