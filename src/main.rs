// src/main.rs

use std::io;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

// Importa os módulos
mod carrinho;   // Módulo do carrinho
mod categorias; // Módulo de categorias
mod config;     // Configuração via variáveis de ambiente
mod favoritos;  // Módulo de favoritos
mod pedidos;    // Módulo de pedidos (finalização do carrinho)
mod produtos;   // Módulo de produtos
mod repositorio; // Acesso ao banco
mod rotas;      // Registro das rotas
mod shared;     // Módulo shared
mod usuarios;   // Módulo de usuários
mod vendedores; // Módulo de vendedores

#[cfg(test)]
mod testes;

use config::Config;
use repositorio::postgres::PgRepositorio;
use repositorio::Repositorio;

// Estado compartilhado entre as rotas.
pub struct AppState {
    pub repositorio: Arc<dyn Repositorio>,
    pub jwt_secret: String,            // Chave secreta para JWT
    pub duracao_sessao: chrono::Duration, // Validade de cada login
}

fn iniciar_logs() {
    let filtro = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false);

    // init() também instala a ponte log -> tracing usada pelo Logger do actix
    if json {
        tracing_subscriber::fmt().with_env_filter(filtro).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filtro).init();
    }
}

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = Config::from_env().map_err(io::Error::other)?;
    iniciar_logs();
    tracing::debug!(?config, "Configuração carregada");

    // Certifique-se de que as colunas de preço sejam NUMERIC
    // para a compatibilidade com bigdecimal::BigDecimal.
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Falha ao conectar ao banco PostgreSQL");
            io::Error::other(e)
        })?;

    if config.executar_migracoes {
        sqlx::migrate!("./migrations").run(&db_pool).await.map_err(|e| {
            tracing::error!(error = %e, "Falha ao aplicar migrações");
            io::Error::other(e)
        })?;
        tracing::info!("Migrações aplicadas");
    }

    let app_state = web::Data::new(AppState {
        repositorio: Arc::new(PgRepositorio::new(db_pool)),
        jwt_secret: config.jwt_secret.clone(),
        duracao_sessao: config.duracao_sessao,
    });

    tracing::info!(endereco = %config.bind_addr, "Iniciando API da vitrine");

    // Configura e inicia o servidor HTTP.
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            // .clone() é necessário porque a closure roda uma vez por worker
            .app_data(app_state.clone())
            .configure(rotas::configurar)
    })
    .bind(config.bind_addr)?
    .run()
    .await
}
