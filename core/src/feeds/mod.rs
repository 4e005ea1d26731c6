pub mod fire;
pub mod news;
pub mod quake;

pub use fire::{FireDetection, FireFeed, StubFireFeed};
pub use news::{NewsArticle, NewsClient};
pub use quake::{QuakeClient, QuakeEvent};
