//! Read-only financial tips: the `financial_tips` table and its endpoints.

use api_types::tips::{TipView, TipsQuery, TipsResponse};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use sea_orm::{ConnectionTrait, QueryOrder, QuerySelect, Statement, entity::prelude::*};

use crate::{ServerError, server::ServerState};

const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 50;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "financial_tips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub summary: Option<String>,
    pub category: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub tags: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub views_count: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub published_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for TipView {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let tags = match model.tags.as_deref() {
            None | Some("") => Vec::new(),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|err| DbErr::Custom(format!("invalid tags of tip {}: {err}", model.id)))?,
        };
        Ok(Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            content: model.content,
            summary: model.summary,
            category: model.category,
            tags,
            author: model.author,
            image_url: model.image_url,
            is_published: model.is_published,
            views_count: model.views_count,
            created_at: model.created_at,
            published_at: model.published_at,
        })
    }
}

/// Handle requests for published tips, most recently published first.
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<TipsQuery>, QueryRejection>,
) -> Result<Json<TipsResponse>, ServerError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    let mut select = Entity::find().filter(Column::IsPublished.eq(true));
    if let Some(category) = query.category.filter(|category| !category.is_empty()) {
        select = select.filter(Column::Category.eq(category));
    }

    let tips = select
        .order_by_desc(Column::PublishedAt)
        .order_by_desc(Column::Id)
        .limit(limit)
        .all(&state.db)
        .await?
        .into_iter()
        .map(TipView::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(TipsResponse {
        total: tips.len(),
        tips,
    }))
}

/// Handle a request for one published tip. Each successful read counts as
/// a view.
pub async fn detail(
    State(state): State<ServerState>,
    tip_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<TipView>, ServerError> {
    let Path(tip_id) = tip_id?;

    let mut tip = Entity::find_by_id(tip_id)
        .filter(Column::IsPublished.eq(true))
        .one(&state.db)
        .await?
        .ok_or(ServerError::NotFound)?;

    state
        .db
        .execute(Statement::from_sql_and_values(
            state.db.get_database_backend(),
            "UPDATE financial_tips SET views_count = views_count + 1 WHERE id = ?;",
            vec![tip_id.into()],
        ))
        .await?;
    tip.views_count = tip.views_count.saturating_add(1);

    Ok(Json(TipView::try_from(tip)?))
}
