//! Calculation history: the `calculations` table and its endpoint.

use api_types::history::{CalculationType, CalculationView, HistoryQuery, HistoryResponse};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use axum_extra::TypedHeader;
use chrono::Utc;
use sea_orm::{ActiveValue, QueryOrder, QuerySelect, entity::prelude::*};
use serde::Serialize;

use crate::{ServerError, server::CallerId, server::ServerState};

const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "calculations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub calculation_type: String,
    #[sea_orm(column_type = "Text")]
    pub input_data: String,
    #[sea_orm(column_type = "Text")]
    pub result_data: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for CalculationView {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|err| DbErr::Custom(format!("invalid calculation id {}: {err}", model.id)))?;
        let input = serde_json::from_str(&model.input_data)
            .map_err(|err| DbErr::Custom(format!("invalid input of {id}: {err}")))?;
        let result = serde_json::from_str(&model.result_data)
            .map_err(|err| DbErr::Custom(format!("invalid result of {id}: {err}")))?;
        Ok(Self {
            id,
            calculation_type: model.calculation_type,
            input,
            result,
            created_at: model.created_at,
        })
    }
}

/// Store one successful calculation for `user_id`.
pub(crate) async fn record<I, R>(
    db: &DatabaseConnection,
    user_id: &str,
    kind: CalculationType,
    input: &I,
    result: &R,
) -> Result<(), DbErr>
where
    I: Serialize,
    R: Serialize,
{
    let input_data =
        serde_json::to_string(input).map_err(|err| DbErr::Custom(err.to_string()))?;
    let result_data =
        serde_json::to_string(result).map_err(|err| DbErr::Custom(err.to_string()))?;

    ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4().to_string()),
        user_id: ActiveValue::Set(user_id.to_string()),
        calculation_type: ActiveValue::Set(kind.as_str().to_string()),
        input_data: ActiveValue::Set(input_data),
        result_data: ActiveValue::Set(result_data),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await?;

    Ok(())
}

/// Handle requests for the caller's past calculations, newest first.
pub async fn list(
    caller: Option<TypedHeader<CallerId>>,
    State(state): State<ServerState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, ServerError> {
    let Some(TypedHeader(CallerId(user_id))) = caller else {
        return Err(ServerError::Unauthorized);
    };
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    let mut select = Entity::find().filter(Column::UserId.eq(user_id));
    if let Some(kind) = query.calculation_type {
        select = select.filter(Column::CalculationType.eq(kind.as_str()));
    }

    let calculations = select
        .order_by_desc(Column::CreatedAt)
        .limit(limit)
        .all(&state.db)
        .await?
        .into_iter()
        .map(CalculationView::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(HistoryResponse { calculations }))
}
