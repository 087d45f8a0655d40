use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ynab error: {0}")]
    Ynab(#[from] backend::YnabError),
    #[error(transparent)]
    Ui(#[from] tui::AppError),
}
