use std::{future::Future, sync::Arc};

use tokio::net::TcpListener;

use crate::{
    config::{GameSettings, ServerArgs},
    domain::QuestionRepository,
    infrastructure::{CleanupReceiver, repository::JsonFileQuestionRepository},
    ui::state::AppState,
    usecase::DisconnectPlayerUseCase,
};

use super::{error::ServerError, router::build_router, signal::shutdown_signal};

/// Bind the configured address and serve until a shutdown signal arrives.
pub async fn run(args: ServerArgs) -> Result<(), ServerError> {
    let addr = args.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    let questions = JsonFileQuestionRepository::new(&args.questions);
    // The bank is re-read per game; this only reports problems early
    match questions.load_questions().await {
        Ok(bank) => tracing::info!(
            "Question bank '{}' has {} question(s)",
            args.questions.display(),
            bank.len()
        ),
        Err(e) => tracing::warn!("Question bank is not usable yet: {}", e),
    }

    serve(
        listener,
        Arc::new(questions),
        args.game_settings(),
        shutdown_signal(),
    )
    .await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    questions: Arc<dyn QuestionRepository>,
    settings: GameSettings,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (state, cleanup) = AppState::new(questions, settings);
    let state = Arc::new(state);
    let reaper = tokio::spawn(reap_disconnected(state.clone(), cleanup));

    let app = build_router(state);
    match listener.local_addr() {
        Ok(addr) => tracing::info!("Listening on {}", addr),
        Err(e) => tracing::warn!("Listening on an unknown address: {}", e),
    }

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve);
    reaper.abort();
    result
}

/// Disconnect players whose outbound queue was found closed.
async fn reap_disconnected(state: Arc<AppState>, mut cleanup: CleanupReceiver) {
    let usecase = DisconnectPlayerUseCase::new(
        state.players.clone(),
        state.rooms.clone(),
        state.broadcaster.clone(),
    );
    while let Some(player_id) = cleanup.recv().await {
        tracing::debug!("Cleaning up unreachable player {}", player_id);
        usecase.execute(&player_id).await;
    }
}
