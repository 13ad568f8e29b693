pub mod documents;
pub mod form;
pub mod keywords;
pub mod notifier;
pub mod pose_store;
pub mod recommendation;
pub mod thesaurus;

// Re-export public types
pub use documents::{DocumentRenderer, RenderedDocument};
pub use form::{FormController, FormOutcome};
pub use keywords::KeywordExtractor;
pub use notifier::{Mailer, SmtpNotifier};
pub use pose_store::{InMemoryPoseStore, MongoPoseStore, PoseFilter, PoseStore};
pub use recommendation::RecommendationService;
pub use thesaurus::{Lexicon, Thesaurus};
