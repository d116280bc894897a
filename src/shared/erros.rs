// src/shared/erros.rs

//! Erro único das rotas HTTP.
//!
//! Cada serviço tem o seu próprio enum de erro; aqui eles são convertidos em
//! `ApiError`, que sabe escolher o status HTTP e montar o `GenericResponse`.
//! Detalhes internos vão para o log e nunca para o cliente.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use super::shared_structs::GenericResponse;
use crate::carrinho::carrinho_service::ErroCarrinho;
use crate::favoritos::favoritos_service::ErroFavorito;
use crate::pedidos::pedidos_service::ErroPedido;
use crate::repositorio::ErroRepositorio;
use crate::usuarios::usuario_service::ErroAutenticacao;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NaoEncontrado(String),

    #[error("{0}")]
    RequisicaoInvalida(String),

    #[error("{0}")]
    NaoAutorizado(String),

    #[error("{0}")]
    Conflito(String),

    #[error("erro interno: {0}")]
    Interno(String),

    #[error(transparent)]
    Repositorio(#[from] ErroRepositorio),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NaoEncontrado(_) => StatusCode::NOT_FOUND,
            ApiError::RequisicaoInvalida(_) => StatusCode::BAD_REQUEST,
            ApiError::NaoAutorizado(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflito(_) => StatusCode::CONFLICT,
            ApiError::Interno(_) | ApiError::Repositorio(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Interno(_) | ApiError::Repositorio(_) => {
                tracing::error!(error = %self, "Falha ao processar requisição");
                "Erro interno do servidor.".to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(GenericResponse::erro(message))
    }
}

impl From<ErroCarrinho> for ApiError {
    fn from(e: ErroCarrinho) -> Self {
        match e {
            ErroCarrinho::ProdutoNaoEncontrado(_) => ApiError::NaoEncontrado(e.to_string()),
            ErroCarrinho::EstoqueInsuficiente { .. } => ApiError::Conflito(e.to_string()),
            ErroCarrinho::CriacaoFalhou(_) | ErroCarrinho::Repositorio(_) => {
                ApiError::Interno(e.to_string())
            }
        }
    }
}

impl From<ErroPedido> for ApiError {
    fn from(e: ErroPedido) -> Self {
        match e {
            ErroPedido::CarrinhoNaoEncontrado => ApiError::NaoEncontrado(e.to_string()),
            ErroPedido::CarrinhoVazio => ApiError::RequisicaoInvalida(e.to_string()),
            ErroPedido::CarrinhoJaFinalizado => ApiError::Conflito(e.to_string()),
            ErroPedido::VerificacaoFalhou(_)
            | ErroPedido::ComposicaoIndisponivel(_)
            | ErroPedido::PrecosIndisponiveis(_)
            | ErroPedido::CriacaoFalhou(_) => ApiError::Interno(e.to_string()),
        }
    }
}

impl From<ErroFavorito> for ApiError {
    fn from(e: ErroFavorito) -> Self {
        match e {
            ErroFavorito::ProdutoNaoEncontrado(_) => ApiError::NaoEncontrado(e.to_string()),
            ErroFavorito::Repositorio(inner) => ApiError::Repositorio(inner),
        }
    }
}

impl From<ErroAutenticacao> for ApiError {
    fn from(e: ErroAutenticacao) -> Self {
        match e {
            ErroAutenticacao::UsuarioJaExiste => ApiError::Conflito(e.to_string()),
            ErroAutenticacao::CredenciaisInvalidas | ErroAutenticacao::SessaoInvalida => {
                ApiError::NaoAutorizado(e.to_string())
            }
            ErroAutenticacao::DadosInvalidos(_) => ApiError::RequisicaoInvalida(e.to_string()),
            ErroAutenticacao::Hash(_)
            | ErroAutenticacao::Token(_)
            | ErroAutenticacao::Repositorio(_) => ApiError::Interno(e.to_string()),
        }
    }
}
