//! PaperClub Engine
//!
//! Query and ranking logic for the paper-sharing platform:
//! - Identity: registration, login, paper ownership
//! - Paper catalog with sanitised tags
//! - Likes between users and papers
//! - Timelines, tag and keyword browsing, popularity rankings
//! - Collaborative recommendations
//! - Activity and tag statistics
//!
//! All services are cheap to clone and hold only a [`DbPool`] handle. Each
//! public call is one unit of work; nothing is held open between calls.

pub mod feed;
pub mod identity;
pub mod papers;
pub mod recommend;
pub mod social;
pub mod stats;
pub mod tags;

mod query;

pub use feed::FeedService;
pub use identity::{Credentials, IdentityService};
pub use papers::{NewPaper, PaperService};
pub use recommend::Recommender;
pub use social::SocialService;
pub use stats::StatsService;
pub use tags::{sanitize_tag, sanitize_tags};

use paperclub_common::config::{AppConfig, FeedConfig};
use paperclub_common::db::schema;
use paperclub_common::errors::Result;
use paperclub_common::{metrics, DbPool};
use tracing::info;

/// Every engine service over one store
#[derive(Clone)]
pub struct Engine {
    pub identity: IdentityService,
    pub papers: PaperService,
    pub social: SocialService,
    pub feed: FeedService,
    pub recommend: Recommender,
    pub stats: StatsService,
    db: DbPool,
}

impl Engine {
    pub fn new(db: DbPool, feed: &FeedConfig) -> Self {
        Self {
            identity: IdentityService::new(db.clone()),
            papers: PaperService::new(db.clone()),
            social: SocialService::new(db.clone()),
            feed: FeedService::new(db.clone(), feed.clone()),
            recommend: Recommender::new(db.clone(), feed.clone()),
            stats: StatsService::new(db.clone(), feed.clone()),
            db,
        }
    }

    /// Connect using `config`, describe the engine's metrics and install the
    /// schema if it is missing
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        metrics::register_metrics();

        let db = DbPool::new(&config.database).await?;
        let engine = Self::new(db, &config.feed);
        engine.bootstrap().await?;
        Ok(engine)
    }

    /// Install the schema if it is missing
    pub async fn bootstrap(&self) -> Result<()> {
        schema::ensure_schema(self.db.write()).await?;
        info!(
            version = paperclub_common::VERSION,
            backend = ?self.db.backend(),
            "Engine ready"
        );
        Ok(())
    }

    pub fn pool(&self) -> &DbPool {
        &self.db
    }
}
