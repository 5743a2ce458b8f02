pub mod article;
pub mod category;
pub mod generative;
pub mod news;
pub mod user;

pub use article::{InterestEntry, NewArticle, RecommendationsResponse, SavedArticle};
pub use category::Category;
pub use generative::{
    ContentRequest, GenerateContentRequest, GenerateContentResponse, Sentiment,
    SentimentResponse, SummaryResponse,
};
pub use news::{ApiHeadlinesResponse, Headline, HeadlineQuery, NewsCategory};
pub use user::{
    AuthResponse, LoginRequest, NewUser, RegisterRequest, TopicPreferences, User, UserProfile,
};
