use std::sync::Arc;

use axum::{
    extract::State,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderName, Method,
    },
    middleware::from_fn_with_state,
    routing::{get, post, put, MethodRouter},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handler::*,
    middleware::{mw_require_admin, ADMIN_TOKEN_HEADER},
    model::Board,
    AppState,
};

/// GET lists the newest rows of `board`, POST appends one.
pub fn board_routes(board: Board) -> MethodRouter<Arc<AppState>> {
    let list = get(move |state: State<Arc<AppState>>| list_board(state, board));
    match board {
        Board::Homework => list.post(create_homework),
        Board::News => list.post(create_news),
        Board::Events => list.post(create_event),
        Board::Feedback => list.post(create_feedback),
    }
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(health_checker_handler))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/api/users", get(list_users))
        .route("/api/tasks", get(get_tasks).post(create_task))
        .route("/api/tasks/{id}", put(toggle_task).delete(delete_task))
        .route("/api/chat", get(get_chat).post(post_chat));

    for board in Board::ALL {
        app = app.route(board.path(), board_routes(board));
    }

    if app_state.admin.is_some() {
        let danger = Router::new()
            .route("/danger/clear-database", post(clear_database))
            .route_layer(from_fn_with_state(app_state.clone(), mw_require_admin));
        app = app.merge(danger);
    }

    // Any origin, as the browser front-end is served from elsewhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([ACCEPT, CONTENT_TYPE, HeaderName::from_static(ADMIN_TOKEN_HEADER)]);

    app.with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
