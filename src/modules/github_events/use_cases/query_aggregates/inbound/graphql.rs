use async_graphql::{Context, Object, Result as GqlResult, SimpleObject};

use crate::modules::github_events::use_cases::query_aggregates::views::{
    ActorView, EventCountView, RepoView,
};
use crate::shell::state::AppState;

#[derive(SimpleObject, Clone)]
#[graphql(name = "Repo")]
pub struct GqlRepo {
    #[graphql(name = "repoURL")]
    pub repo_url: String,
    #[graphql(name = "repoName")]
    pub repo_name: String,
    #[graphql(name = "repoId")]
    pub repo_id: i64,
    pub stars: u64,
}

impl From<RepoView> for GqlRepo {
    fn from(v: RepoView) -> Self {
        Self {
            repo_url: v.repo_url,
            repo_name: v.repo_name,
            repo_id: v.repo_id,
            stars: v.stars,
        }
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(name = "Actor")]
pub struct GqlActor {
    pub login: String,
    pub name: String,
    pub email: String,
}

impl From<ActorView> for GqlActor {
    fn from(v: ActorView) -> Self {
        Self {
            login: v.login,
            name: v.name,
            email: v.email,
        }
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(name = "EventCount")]
pub struct GqlEventCount {
    #[graphql(name = "type")]
    pub event_type: String,
    pub count: u64,
}

impl From<EventCountView> for GqlEventCount {
    fn from(v: EventCountView) -> Self {
        Self {
            event_type: v.event_type,
            count: v.count,
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[graphql(name = "Repos")]
    async fn repos(&self, context: &Context<'_>) -> GqlResult<Vec<GqlRepo>> {
        let state = context.data_unchecked::<AppState>();
        let list = state.queries.list_repos().await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    #[graphql(name = "Actors")]
    async fn actors(&self, context: &Context<'_>) -> GqlResult<Vec<GqlActor>> {
        let state = context.data_unchecked::<AppState>();
        let list = state.queries.list_actors().await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    #[graphql(name = "Events")]
    async fn events(&self, context: &Context<'_>) -> GqlResult<Vec<GqlEventCount>> {
        let state = context.data_unchecked::<AppState>();
        let list = state.queries.list_event_counts().await?;
        Ok(list.into_iter().map(Into::into).collect())
    }
}
