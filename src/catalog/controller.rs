use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest, GetBookCommandResponse};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest, ListBooksCommandResponse};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest, RemoveBookCommandResponse};
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(describe))
        .route("/books", get(list_books).post(add_book))
        .route("/books/:isbn", get(find_book_by_isbn).delete(remove_book))
        .route("/health", get(health))
        .with_state(state)
}

pub(crate) async fn describe() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the library catalog API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /books": "List all books",
            "POST /books": "Add a book by ISBN",
            "GET /books/{isbn}": "Find a book by ISBN",
            "DELETE /books/{isbn}": "Remove a book",
            "GET /health": "Health check",
        }
    }))
}

pub(crate) async fn list_books(
    State(state): State<AppState>) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    let res = ListBooksCommand::new(state.catalog).execute(ListBooksCommandRequest::default()).await?;
    Ok(Json(res))
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    json: Result<Json<AddBookCommandRequest>, JsonRejection>) -> Result<Json<AddBookCommandResponse>, ServerError> {
    let Json(req) = json.map_err(json_to_server_error)?;
    let res = AddBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_book_by_isbn(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    let req = GetBookCommandRequest { isbn };
    let res = GetBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<Json<RemoveBookCommandResponse>, ServerError> {
    let req = RemoveBookCommandRequest { isbn };
    let res = RemoveBookCommand::new(state.catalog).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<Value> {
    let total = state.catalog.list_books().await.len();
    Json(json!({
        "status": "healthy",
        "total_books": total,
        "data_file": state.config.data_file,
        "message": "API is running",
    }))
}
