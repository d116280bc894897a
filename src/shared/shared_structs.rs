// src/shared/shared_structs.rs

use serde::{Deserialize, Serialize};

/// Quantidade de produtos por página em todas as listagens do catálogo.
pub const TAMANHO_PAGINA: i64 = 20;

/// Estrutura genérica para padronizar as respostas da API.
/// 'T' é o tipo do corpo da resposta, que pode ser opcional.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenericResponse<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")] // Não serializa 'body' se for None
    pub body: Option<T>,
}

impl<T> GenericResponse<T> {
    /// Resposta de sucesso com corpo.
    pub fn sucesso(message: impl Into<String>, body: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            body: Some(body),
        }
    }
}

impl GenericResponse<()> {
    /// Resposta de sucesso sem corpo.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            body: None,
        }
    }

    pub fn erro(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            body: None,
        }
    }
}

/// Parâmetro `?pagina=` das listagens paginadas (começa em 0).
#[derive(Debug, Default, Deserialize)]
pub struct PaginaQuery {
    #[serde(default)]
    pub pagina: u32,
}

/// Intervalo de linhas de uma página: `offset` e `limit` prontos para o SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginacao {
    pub offset: i64,
    pub limit: i64,
}

impl Paginacao {
    /// A página `n` cobre as linhas `[20n, 20n + 19]`.
    pub fn pagina(numero: u32) -> Self {
        Self {
            offset: i64::from(numero) * TAMANHO_PAGINA,
            limit: TAMANHO_PAGINA,
        }
    }

    pub fn primeiros(limit: i64) -> Self {
        Self { offset: 0, limit }
    }
}
