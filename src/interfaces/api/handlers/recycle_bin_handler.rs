use std::future::Future;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::Query;
use serde::Serialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::application::dtos::recycle_bin_dto::{parse_item_id, BatchItemResult, IdsQuery};
use crate::application::ports::recycle_bin_ports::RecycleBinUseCase;
use crate::common::di::AppState;
use crate::common::errors::RecycleBinError;
use crate::domain::entities::member::Member;
use crate::interfaces::middleware::auth::AuthMember;

fn respond<T: Serialize>(result: Result<T, RecycleBinError>) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            debug!("Error devuelto al cliente: {}", e);
            e.into_response()
        }
    }
}

/// Ejecuta `operation` para cada id de la query.
///
/// Por encima de `max_items_with_response` las operaciones se lanzan en
/// segundo plano y se responde 202 con los ids recibidos; los fallos sólo
/// quedan en el log. Por debajo se ejecutan en orden y cada posición de la
/// respuesta lleva su resultado o su error.
async fn run_batch<T, F, Fut>(state: &AppState, member: Member, query: &IdsQuery, operation: F) -> Response
where
    T: Serialize + Send + 'static,
    F: Fn(Arc<dyn RecycleBinUseCase>, Member, Uuid) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, RecycleBinError>> + Send + 'static,
{
    let ids = match query.parse(&state.config) {
        Ok(ids) => ids,
        Err(e) => return e.into_response(),
    };

    if state.config.is_fire_and_forget(ids.len()) {
        info!("Procesando {} elementos en segundo plano", ids.len());
        for id in ids {
            let pending = operation(state.recycle_bin_service.clone(), member.clone(), id);
            tokio::spawn(async move {
                if let Err(e) = pending.await {
                    error!("Operación en segundo plano fallida para {}: {}", id, e);
                }
            });
        }
        return (StatusCode::ACCEPTED, Json(query.id.clone())).into_response();
    }

    let mut results = Vec::with_capacity(ids.len());
    for id in ids {
        let result = operation(state.recycle_bin_service.clone(), member.clone(), id).await;
        if let Err(e) = &result {
            error!("Error procesando elemento {}: {}", id, e);
        }
        results.push(BatchItemResult::from(result));
    }
    (StatusCode::OK, Json(results)).into_response()
}

/// Elementos reciclados del miembro actual
#[instrument(skip(state, member), fields(member = %member.id))]
pub async fn get_recycled_items(
    State(state): State<AppState>,
    AuthMember(member): AuthMember,
) -> Response {
    debug!("Solicitud para listar elementos reciclados");
    respond(state.recycle_bin_service.get_own_recycled_items(&member).await)
}

#[instrument(skip(state, member), fields(member = %member.id))]
pub async fn recycle_item(
    State(state): State<AppState>,
    AuthMember(member): AuthMember,
    Path(id): Path<String>,
) -> Response {
    let item_id = match parse_item_id(&id) {
        Ok(item_id) => item_id,
        Err(e) => return e.into_response(),
    };
    info!("Reciclando elemento '{}'", item_id);
    respond(state.recycle_bin_service.recycle_item(&member, &item_id).await)
}

#[instrument(skip(state, member, query), fields(member = %member.id))]
pub async fn recycle_many(
    State(state): State<AppState>,
    AuthMember(member): AuthMember,
    Query(query): Query<IdsQuery>,
) -> Response {
    info!("Reciclando elementos {:?}", query.id);
    run_batch(&state, member, &query, |service, member, id| async move {
        service.recycle_item(&member, &id).await
    })
    .await
}

#[instrument(skip(state, member), fields(member = %member.id))]
pub async fn restore_item(
    State(state): State<AppState>,
    AuthMember(member): AuthMember,
    Path(id): Path<String>,
) -> Response {
    let item_id = match parse_item_id(&id) {
        Ok(item_id) => item_id,
        Err(e) => return e.into_response(),
    };
    info!("Restaurando elemento '{}'", item_id);
    respond(state.recycle_bin_service.restore_item(&member, &item_id).await)
}

#[instrument(skip(state, member, query), fields(member = %member.id))]
pub async fn restore_many(
    State(state): State<AppState>,
    AuthMember(member): AuthMember,
    Query(query): Query<IdsQuery>,
) -> Response {
    info!("Restaurando elementos {:?}", query.id);
    run_batch(&state, member, &query, |service, member, id| async move {
        service.restore_item(&member, &id).await
    })
    .await
}

#[instrument(skip(state, member), fields(member = %member.id))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthMember(member): AuthMember,
    Path(id): Path<String>,
) -> Response {
    let item_id = match parse_item_id(&id) {
        Ok(item_id) => item_id,
        Err(e) => return e.into_response(),
    };
    info!("Eliminando elemento reciclado '{}'", item_id);
    respond(state.recycle_bin_service.delete_item(&member, &item_id).await)
}

#[instrument(skip(state, member, query), fields(member = %member.id))]
pub async fn delete_many(
    State(state): State<AppState>,
    AuthMember(member): AuthMember,
    Query(query): Query<IdsQuery>,
) -> Response {
    info!("Eliminando elementos reciclados {:?}", query.id);
    run_batch(&state, member, &query, |service, member, id| async move {
        service.delete_item(&member, &id).await
    })
    .await
}
