use crate::error::AppError;
use crate::views::{self, EditPage, IndexPage};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use core_types::{
    parse_id, parse_min_score, parse_score, CoreError, SortColumn, SortOrder, Student,
    StudentInput,
};
use serde::Deserialize;
use std::sync::Arc;

/// Query string of the list page. Every field is optional text; parsing and
/// fallbacks happen in the handler so bad input never becomes a 422 rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IndexParams {
    pub sort_by: String,
    pub order: String,
    pub search: String,
    pub min_nilai: String,
    pub deleted: String,
    pub nim: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub nama: String,
    pub nim: String,
    pub nilai: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditParams {
    pub success: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateForm {
    pub id: String,
    pub nama: String,
    pub nim: String,
    pub nilai: String,
}

/// # GET /
/// Lists students, sorted or filtered by the search form.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IndexParams>,
) -> Response {
    let sort = SortColumn::parse_or_default(&params.sort_by);
    let order = SortOrder::parse_or_default(&params.order);

    let min_score = match parse_min_score(&params.min_nilai) {
        Ok(min_score) => min_score,
        Err(e) => return index_with_error(&state, e.into()).await,
    };

    // Any submitted search text selects the search path, even if it trims to
    // nothing; the repository then returns no rows for it.
    let students = if !params.search.is_empty() || min_score.is_some() {
        state.db_repo.search_students(&params.search, min_score).await
    } else {
        state.db_repo.list_students(sort, order).await
    };
    let students = match students {
        Ok(students) => students,
        Err(e) => {
            let err = AppError::from(e);
            err.log();
            return page(
                err.status_code(),
                views::render_index(&IndexPage::with_error(Vec::new(), err.to_string())),
            );
        }
    };

    let deleted_nim = (params.deleted == "true" && !params.nim.is_empty()).then_some(params.nim);

    page(
        StatusCode::OK,
        views::render_index(&IndexPage {
            students,
            error: None,
            deleted_nim,
            sort,
            order,
            search_text: params.search,
            min_score_text: params.min_nilai,
        }),
    )
}

/// # POST /add
pub async fn add_student(
    State(state): State<Arc<AppState>>,
    Form(form): Form<StudentForm>,
) -> Response {
    let input = match StudentInput::parse(&form.nama, &form.nim, &form.nilai) {
        Ok(input) => input,
        Err(e) => return index_with_error(&state, e.into()).await,
    };

    match state.db_repo.create_student(&input).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => index_with_error(&state, e.into()).await,
    }
}

/// # POST /delete
/// Reads the student first so the confirmation can name the deleted NIM.
pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let id = match parse_id(&form.id) {
        Ok(id) => id,
        Err(e) => return index_with_error(&state, e.into()).await,
    };

    let student = match state.db_repo.get_student(id).await {
        Ok(student) => student,
        Err(e) => return index_with_error(&state, e.into()).await,
    };

    if let Err(e) = state.db_repo.delete_student(id).await {
        return index_with_error(&state, e.into()).await;
    }

    Redirect::to(&deleted_location(&student.nim)).into_response()
}

/// # GET /edit/:id
pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<EditParams>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return index_with_error(&state, e.into()).await,
    };

    match state.db_repo.get_student(id).await {
        Ok(student) => page(
            StatusCode::OK,
            views::render_edit(&EditPage {
                student,
                error: None,
                success: params.success == "true",
            }),
        ),
        Err(e) => index_with_error(&state, e.into()).await,
    }
}

/// # POST /edit
/// Saves the form and shows the edit page again, with either the stored
/// record and a success banner or the submitted values and an error.
pub async fn update_student(
    State(state): State<Arc<AppState>>,
    Form(form): Form<UpdateForm>,
) -> Response {
    let id = match parse_id(&form.id) {
        Ok(id) => id,
        Err(e) => return index_with_error(&state, e.into()).await,
    };

    let score = match parse_score(&form.nilai) {
        Ok(score) => score,
        // An out-of-range number can still be echoed into the form.
        Err(CoreError::ScoreOutOfRange(score)) => {
            let submitted = submitted_student(id, &form, score);
            return edit_with_error(submitted, CoreError::ScoreOutOfRange(score).into());
        }
        Err(e) => return index_with_error(&state, e.into()).await,
    };

    let input = StudentInput {
        nim: form.nim.clone(),
        name: form.nama.clone(),
        score,
    };
    if let Err(e) = state.db_repo.update_student(id, &input).await {
        let err = AppError::from(e);
        return match err {
            AppError::NotFound => index_with_error(&state, err).await,
            _ => edit_with_error(input.with_id(id), err),
        };
    }

    match state.db_repo.get_student(id).await {
        Ok(student) => page(
            StatusCode::OK,
            views::render_edit(&EditPage {
                student,
                error: None,
                success: true,
            }),
        ),
        Err(e) => {
            AppError::from(e).log();
            Redirect::to("/").into_response()
        }
    }
}

/// Renders the list page with an inline error. The listing is best effort:
/// if it fails too, the page shows the original error over an empty table.
async fn index_with_error(state: &AppState, err: AppError) -> Response {
    err.log();
    let students = state
        .db_repo
        .list_students(SortColumn::default(), SortOrder::default())
        .await
        .unwrap_or_else(|list_err| {
            tracing::warn!(error = %list_err, "Could not list students for the error page.");
            Vec::new()
        });
    page(
        err.status_code(),
        views::render_index(&IndexPage::with_error(students, err.to_string())),
    )
}

fn edit_with_error(student: Student, err: AppError) -> Response {
    err.log();
    page(
        err.status_code(),
        views::render_edit(&EditPage {
            student,
            error: Some(err.to_string()),
            success: false,
        }),
    )
}

fn submitted_student(id: i32, form: &UpdateForm, score: f64) -> Student {
    Student {
        id,
        nim: form.nim.clone(),
        name: form.nama.clone(),
        score,
    }
}

fn page(status: StatusCode, html: String) -> Response {
    (status, Html(html)).into_response()
}

/// `/?deleted=true&nim=<nim>`, with the NIM percent-encoded.
fn deleted_location(nim: &str) -> String {
    let query = serde_urlencoded::to_string([("deleted", "true"), ("nim", nim)])
        .unwrap_or_else(|_| "deleted=true".to_string());
    format!("/?{query}")
}
