pub mod accounts;
pub mod classifier;
pub mod insights;
pub mod interests;
pub mod news;
pub mod providers;
pub mod recommendations;

pub use accounts::AccountService;
pub use classifier::{ClassificationError, Classifier, GenerativeClassifier};
pub use interests::{ClassificationOptions, InterestAggregator};
pub use providers::{GeminiProvider, NewsApiProvider, NewsProvider, TextGenerator};
pub use recommendations::RecommendationSelector;
