// src/vendedores/vendedores_router.rs

use actix_web::{get, web, HttpResponse};

use crate::produtos::produtos_service;
use crate::shared::erros::ApiError;
use crate::shared::shared_structs::{GenericResponse, PaginaQuery};
use crate::AppState;

/// Rota para o perfil público de um vendedor.
#[get("/vendedores/{id}")]
pub async fn buscar_vendedor(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    match data.repositorio.buscar_vendedor(id).await? {
        Some(vendedor) => Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
            format!("Vendedor com ID {} encontrado.", id),
            vendedor,
        ))),
        None => Err(ApiError::NaoEncontrado(format!("Vendedor com ID {} não encontrado.", id))),
    }
}

/// Rota para os produtos de um vendedor, uma página por vez.
#[get("/vendedores/{id}/produtos")]
pub async fn buscar_produtos_do_vendedor(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    query: web::Query<PaginaQuery>,
) -> HttpResponse {
    let produtos =
        produtos_service::produtos_do_vendedor(data.repositorio.as_ref(), path.into_inner(), query.pagina).await;

    HttpResponse::Ok().json(GenericResponse::sucesso("Produtos do vendedor.", produtos))
}
