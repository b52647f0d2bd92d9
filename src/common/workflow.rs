// src/common/workflow.rs

use std::future::Future;

use crate::common::error::AppError;

/// Máquina de estados de um campo `status`.
///
/// Cada entidade declara a tabela `(estado, ação) -> estado`; qualquer par fora
/// da tabela vira `AppError::InvalidTransition` e nada é gravado.
pub trait Workflow: Copy + Sized {
    type Action: Copy;

    /// Chave de tradução do nome da entidade.
    const ENTITY: &'static str;

    fn next(self, action: Self::Action) -> Option<Self>;

    /// Nome do status como trafega na API (ex.: "PENDENTE").
    fn label(self) -> &'static str;

    /// Chave de tradução da ação.
    fn action_label(action: Self::Action) -> &'static str;

    fn apply(self, action: Self::Action) -> Result<Self, AppError> {
        self.next(action).ok_or_else(|| self.rejection(action))
    }

    fn rejection(self, action: Self::Action) -> AppError {
        AppError::InvalidTransition {
            entity: Self::ENTITY,
            from: self.label(),
            action: Self::action_label(action),
        }
    }
}

/// Resultado de uma gravação condicional (`... AND status = <esperado>`).
///
/// `None` significa que outra requisição mudou o status (ou removeu o registro)
/// entre a leitura e a escrita; o erro é montado a partir do status atual.
pub async fn settle<T, S, F>(written: Option<T>, action: S::Action, current: F) -> Result<T, AppError>
where
    S: Workflow,
    F: Future<Output = Result<S, AppError>>,
{
    match written {
        Some(row) => Ok(row),
        None => Err(current.await?.rejection(action)),
    }
}
