// src/testes.rs

//! Apoio aos testes das rotas.

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;

use crate::repositorio::memoria::MemRepositorio;
use crate::usuarios::usuario_service;
use crate::usuarios::usuario_structs::{LoginRequest, NovoUsuario, TipoLogin};
use crate::AppState;

pub const SEGREDO_TESTE: &str = "segredo-jwt-usado-apenas-nos-testes";

/// Estado da aplicação sobre um repositório em memória.
/// Devolve também o repositório, para semear e inspecionar linhas.
pub fn estado_de_teste(repo: MemRepositorio) -> (web::Data<AppState>, Arc<MemRepositorio>) {
    let repo = Arc::new(repo);
    let estado = web::Data::new(AppState {
        repositorio: repo.clone(),
        jwt_secret: SEGREDO_TESTE.to_string(),
        duracao_sessao: Duration::hours(1),
    });
    (estado, repo)
}

/// Cadastra um usuário com o e-mail informado e devolve um token de sessão válido.
pub async fn token_para(estado: &web::Data<AppState>, repo: &MemRepositorio, email: &str) -> String {
    let novo = NovoUsuario {
        nome: "Cliente de Teste".to_string(),
        tipo_login: TipoLogin::Email,
        login: email.to_string(),
        senha: "senha-de-teste".to_string(),
    };
    usuario_service::cadastrar(repo, &novo).await.unwrap();

    let credenciais = LoginRequest {
        tipo_login: TipoLogin::Email,
        login: email.to_string(),
        senha: novo.senha,
    };
    usuario_service::login(repo, &credenciais, &estado.jwt_secret, estado.duracao_sessao)
        .await
        .unwrap()
        .token
}
