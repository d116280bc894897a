// src/produtos/produtos_router.rs

use actix_web::{get, web, HttpResponse};

// Importa as structs definidas no módulo `produtos_structs` dentro da mesma pasta `produtos`
use super::produtos_structs::{BuscaQuery, DestaquesQuery};
use super::produtos_service;
use crate::shared::erros::ApiError;
use crate::shared::shared_structs::{GenericResponse, PaginaQuery};
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Rota para listar o catálogo, uma página por vez (mais novos primeiro).
#[get("/produtos")]
pub async fn buscar_produtos(data: web::Data<AppState>, query: web::Query<PaginaQuery>) -> HttpResponse {
    let produtos = produtos_service::pagina_produtos(data.repositorio.as_ref(), query.pagina).await;

    HttpResponse::Ok().json(GenericResponse::sucesso("Produtos listados com sucesso!", produtos))
}

/// Rota para os produtos em destaque da página principal.
#[get("/produtos/destaques")]
pub async fn buscar_destaques(data: web::Data<AppState>, query: web::Query<DestaquesQuery>) -> HttpResponse {
    let produtos = produtos_service::produtos_em_destaque(data.repositorio.as_ref(), query.limite).await;

    HttpResponse::Ok().json(GenericResponse::sucesso("Produtos em destaque.", produtos))
}

/// Rota de busca por nome e/ou categoria.
///
/// `termo` procura um trecho do nome sem diferenciar maiúsculas;
/// `categoria_id` aceita tanto a categoria quanto a subcategoria do produto.
#[get("/produtos/busca")]
pub async fn pesquisar_produtos(data: web::Data<AppState>, query: web::Query<BuscaQuery>) -> HttpResponse {
    let query = query.into_inner();
    let produtos = produtos_service::buscar_produtos(
        data.repositorio.as_ref(),
        query.termo.as_deref(),
        query.categoria_id,
        query.pagina,
    )
    .await;

    HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("{} produto(s) encontrado(s).", produtos.len()),
        produtos,
    ))
}

/// Rota para buscar um produto por ID, com fotos e nomes de material, cor e categorias.
#[get("/produtos/{id}")]
pub async fn buscar_produto_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    match produtos_service::detalhe_produto(data.repositorio.as_ref(), id).await? {
        Some(detalhe) => Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
            format!("Produto com ID {} encontrado.", id),
            detalhe,
        ))),
        None => Err(ApiError::NaoEncontrado(format!("Produto com ID {} não encontrado.", id))),
    }
}
