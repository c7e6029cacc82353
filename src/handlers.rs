use crate::catalog::{Catalog, CatalogFilter};
use crate::errors::AppError;
use crate::models::{
    CatalogQuery, CatalogResponse, Notice, RoutineForm, SelectionView, SubmissionResponse,
    ToggleForm, ToggleRequest, ToggleResponse,
};
use crate::state::AppState;
use crate::storage::persist_selection;
use crate::submission::{submit, ConfirmError, DialogState, SubmissionOutcome};
use crate::ui::{render_catalog, render_notice, render_review, CatalogPage};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use tracing::{error, info};

pub async fn index(State(state): State<AppState>, Query(query): Query<CatalogQuery>) -> Html<String> {
    catalog_page(&state, &state.catalog, "Catálogo de ejercicios", "/", &query).await
}

pub async fn muscle_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<CatalogQuery>,
) -> Result<Html<String>, AppError> {
    let catalog = state
        .catalog
        .for_muscle(&slug)
        .ok_or_else(|| AppError::not_found(format!("unknown muscle '{slug}'")))?;
    let title = slug.replace('-', " ");
    let back = format!("/musculo/{slug}");
    Ok(catalog_page(&state, &catalog, &title, &back, &query).await)
}

async fn catalog_page(
    state: &AppState,
    catalog: &Catalog,
    title: &str,
    path: &str,
    query: &CatalogQuery,
) -> Html<String> {
    let filter = CatalogFilter::from(query);
    let selection = state.selection.lock().await;
    let cards = catalog.cards(&filter, &selection);

    Html(render_catalog(&CatalogPage {
        title,
        path,
        cards: &cards,
        categories: &catalog.categories(),
        filter: &filter,
        selected_count: selection.len(),
    })
    .into_string())
}

pub async fn toggle_form(
    State(state): State<AppState>,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect, AppError> {
    apply_toggle(&state, &form.id).await?;
    let back = form
        .back
        .filter(|back| back.starts_with('/') && !back.starts_with("//"))
        .unwrap_or_else(|| "/".to_string());
    Ok(Redirect::to(&back))
}

pub async fn review_page(State(state): State<AppState>) -> Html<String> {
    let selection = state.selection.lock().await;
    let mut dialog = state.dialog.lock().await;
    match dialog.open(&selection) {
        Ok(()) => Html(
            render_review(selection.entries(), dialog.state(), &RoutineForm::default()).into_string(),
        ),
        Err(notice) => Html(render_notice(&notice, selection.len()).into_string()),
    }
}

pub async fn remove_form(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    apply_remove(&state, &id).await;
    Redirect::to("/rutina")
}

pub async fn submit_form(State(state): State<AppState>, Form(form): Form<RoutineForm>) -> Response {
    match run_submission(&state, &form).await {
        Ok(response) => {
            Html(render_notice(&response.notice, response.selection.count).into_string()).into_response()
        }
        Err(SubmitFailure::Empty(notice)) => {
            (StatusCode::BAD_REQUEST, Html(render_notice(&notice, 0).into_string())).into_response()
        }
        Err(SubmitFailure::Invalid(message)) => {
            let selection = state.selection.lock().await;
            let page = render_review(
                selection.entries(),
                &DialogState::Open { message: Some(message) },
                &form,
            );
            (StatusCode::BAD_REQUEST, Html(page.into_string())).into_response()
        }
        Err(failure) => AppError::from(failure).into_response(),
    }
}

pub async fn api_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<CatalogResponse> {
    let filter = CatalogFilter::from(&query);
    let selection = state.selection.lock().await;
    let cards = state.catalog.cards(&filter, &selection);

    Json(CatalogResponse {
        visible_count: cards.iter().filter(|card| card.visible).count(),
        selected_count: selection.len(),
        cards,
    })
}

pub async fn api_selection(State(state): State<AppState>) -> Json<SelectionView> {
    Json(state.selection.lock().await.view())
}

pub async fn api_toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    Ok(Json(apply_toggle(&state, &payload.id).await?))
}

pub async fn api_remove(State(state): State<AppState>, Path(id): Path<String>) -> Json<SelectionView> {
    Json(apply_remove(&state, &id).await)
}

pub async fn api_submit(
    State(state): State<AppState>,
    Json(form): Json<RoutineForm>,
) -> Result<Json<SubmissionResponse>, AppError> {
    Ok(Json(run_submission(&state, &form).await?))
}

async fn apply_toggle(state: &AppState, id: &str) -> Result<ToggleResponse, AppError> {
    let id = id.trim();
    let item = state
        .catalog
        .get(id)
        .ok_or_else(|| AppError::not_found(format!("unknown exercise '{id}'")))?;

    let mut selection = state.selection.lock().await;
    let selected = selection.toggle(item);
    persist_selection(&state.data_path, &selection).await;
    info!(id, selected, count = selection.len(), "selection toggled");

    Ok(ToggleResponse {
        id: id.to_string(),
        selected,
        selection: selection.view(),
    })
}

async fn apply_remove(state: &AppState, id: &str) -> SelectionView {
    let mut selection = state.selection.lock().await;
    if selection.remove(id) {
        info!(id, count = selection.len(), "removed from selection");
    }
    persist_selection(&state.data_path, &selection).await;
    selection.view()
}

enum SubmitFailure {
    Empty(Notice),
    Invalid(String),
    Busy,
}

impl From<SubmitFailure> for AppError {
    fn from(failure: SubmitFailure) -> Self {
        match failure {
            SubmitFailure::Empty(notice) => AppError::bad_request(notice.text),
            SubmitFailure::Invalid(message) => AppError::bad_request(message),
            SubmitFailure::Busy => AppError::conflict("a routine submission is already in progress"),
        }
    }
}

async fn run_submission(state: &AppState, form: &RoutineForm) -> Result<SubmissionResponse, SubmitFailure> {
    let (draft, ids) = {
        let selection = state.selection.lock().await;
        let mut dialog = state.dialog.lock().await;
        dialog.open(&selection).map_err(SubmitFailure::Empty)?;
        let draft = dialog.confirm(form, &selection).map_err(|err| match err {
            ConfirmError::Invalid(message) => SubmitFailure::Invalid(message),
            ConfirmError::AlreadySubmitting => SubmitFailure::Busy,
        })?;
        (draft, selection.ids())
    };

    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let outcome = submit(&task_state.upstream, &draft, ids).await;

        let mut selection = task_state.selection.lock().await;
        if outcome.apply_to(&mut selection) {
            persist_selection(&task_state.data_path, &selection).await;
        }
        task_state.dialog.lock().await.finish(&outcome);
        (outcome, selection.view())
    });

    let (outcome, selection) = match task.await {
        Ok(result) => result,
        Err(err) => {
            error!("submission task failed: {err}");
            let outcome = SubmissionOutcome::TransportFailed;
            state.dialog.lock().await.finish(&outcome);
            (outcome, state.selection.lock().await.view())
        }
    };

    Ok(SubmissionResponse {
        outcome: outcome.label(),
        rutina_id: outcome.routine_id(),
        notice: outcome.notice(),
        selection,
    })
}
