use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Book, BookId, Genre, Transaction, TxAction, TxId, User, UserId};
use crate::services::{explain, Reason, Recommender};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: UserId,
    pub username: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub book_id: BookId,
    pub title: String,
    pub genre: Genre,
}

impl From<&Book> for BookResponse {
    fn from(book: &Book) -> Self {
        Self {
            book_id: book.book_id,
            title: book.title.clone(),
            genre: book.genre,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordTransactionRequest {
    pub user_id: UserId,
    pub book_id: BookId,
    pub action: TxAction,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub tx_id: TxId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub action: TxAction,
    pub timestamp: DateTime<Utc>,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            tx_id: tx.tx_id,
            user_id: tx.user_id,
            book_id: tx.book_id,
            action: tx.action,
            timestamp: tx.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub book_id: BookId,
    pub title: String,
    pub genre: Genre,
    pub score: f64,
    pub reasons: Vec<Reason>,
    pub explanation: String,
}

#[derive(Debug, Serialize)]
pub struct PopularBookResponse {
    pub book_id: BookId,
    pub title: String,
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    #[serde(default = "default_popular_limit")]
    pub limit: usize,
}

fn default_popular_limit() -> usize {
    8
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Register a username, or select the existing user carrying it
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(AppError::InvalidInput("username must not be empty".to_string()));
    }

    let mut inner = state.inner.write().await;
    let (user, created) = inner.register_user(username);

    let status = if created {
        tracing::info!(user_id = user.user_id, "registered user");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(UserResponse::from(&user))))
}

/// Get all registered users
pub async fn get_users(State(state): State<AppState>) -> Json<Vec<UserResponse>> {
    let inner = state.inner.read().await;
    let mut users: Vec<UserResponse> = inner.users.values().map(UserResponse::from).collect();
    users.sort_by_key(|user| user.user_id);
    Json(users)
}

/// Get the book catalog
pub async fn get_books(State(state): State<AppState>) -> Json<Vec<BookResponse>> {
    let inner = state.inner.read().await;
    let books: Vec<BookResponse> = inner.books.values().map(BookResponse::from).collect();
    Json(books)
}

/// Append a borrow/return event to the transaction log
pub async fn record_transaction(
    State(state): State<AppState>,
    Json(request): Json<RecordTransactionRequest>,
) -> AppResult<(StatusCode, Json<TransactionResponse>)> {
    let mut inner = state.inner.write().await;

    if !inner.users.contains_key(&request.user_id) {
        return Err(AppError::NotFound(format!("user {} does not exist", request.user_id)));
    }
    if !inner.books.contains_key(&request.book_id) {
        return Err(AppError::NotFound(format!("book {} does not exist", request.book_id)));
    }

    let tx = inner.append_transaction(request.user_id, request.book_id, request.action);
    tracing::info!(
        user_id = tx.user_id,
        book_id = tx.book_id,
        action = ?tx.action,
        "recorded transaction"
    );
    Ok((StatusCode::CREATED, Json(TransactionResponse::from(&tx))))
}

/// Get the full transaction log in insertion order
pub async fn get_transactions(State(state): State<AppState>) -> Json<Vec<TransactionResponse>> {
    let inner = state.inner.read().await;
    let transactions: Vec<TransactionResponse> = inner
        .transactions
        .iter()
        .map(TransactionResponse::from)
        .collect();
    Json(transactions)
}

/// Get the books a user currently holds
pub async fn get_borrowed(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<Vec<BookId>>> {
    let inner = state.inner.read().await;
    let recommender = Recommender::new(&inner.users, &inner.books, &inner.transactions);
    let borrowed = recommender.current_borrows(user_id)?;
    Ok(Json(borrowed.into_iter().collect()))
}

/// Get ranked book recommendations for a user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<Vec<RecommendationResponse>>> {
    let inner = state.inner.read().await;
    let recommender = Recommender::new(&inner.users, &inner.books, &inner.transactions);
    let recommendations = recommender.recommend(user_id)?;

    let response: Vec<RecommendationResponse> = recommendations
        .into_iter()
        .filter_map(|rec| {
            inner.books.get(&rec.book_id).map(|book| RecommendationResponse {
                book_id: rec.book_id,
                title: book.title.clone(),
                genre: book.genre,
                score: rec.score,
                explanation: explain::explanation_line(&rec.reasons),
                reasons: rec.reasons,
            })
        })
        .collect();
    Ok(Json(response))
}

/// Get the most-borrowed books for the insights view
pub async fn get_popular(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> Json<Vec<PopularBookResponse>> {
    let inner = state.inner.read().await;
    let recommender = Recommender::new(&inner.users, &inner.books, &inner.transactions);

    let popular: Vec<PopularBookResponse> = recommender
        .top_popular(params.limit)
        .into_iter()
        .filter_map(|(book_id, count)| {
            inner.books.get(&book_id).map(|book| PopularBookResponse {
                book_id,
                title: book.title.clone(),
                count,
            })
        })
        .collect();
    Json(popular)
}
