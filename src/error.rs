use thiserror::Error;

/// Errors surfaced by task operations.
///
/// Messages are user-facing and in Portuguese, like the rest of the UI.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Título é obrigatório")]
    MissingTitle,

    #[error("Data de vencimento é obrigatória")]
    MissingDueDate,

    #[error("Data de vencimento inválida '{0}' (use AAAA-MM-DD)")]
    InvalidDueDate(String),

    /// No session; callers send the user to sign in.
    #[error("Faça login para continuar")]
    NotSignedIn,

    #[error("Acesso negado para {0}")]
    AccessDenied(String),

    #[error("Usuário não encontrado")]
    UserNotFound,

    /// Also returned when the task exists but belongs to someone else.
    #[error("Tarefa não encontrada")]
    TaskNotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
