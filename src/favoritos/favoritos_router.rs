// src/favoritos/favoritos_router.rs

use actix_web::{get, post, web, HttpResponse};

use super::favoritos_service;
use super::favoritos_structs::EstadoFavorito;
use crate::shared::erros::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::UsuarioAutenticado;
use crate::AppState;

/// Rota para listar os produtos favoritos do usuário.
#[get("/favoritos")]
pub async fn listar_favoritos(data: web::Data<AppState>, usuario: UsuarioAutenticado) -> HttpResponse {
    let produtos = favoritos_service::listar_favoritos(data.repositorio.as_ref(), usuario.usuario_id).await;

    HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("{} favorito(s).", produtos.len()),
        produtos,
    ))
}

/// Rota para saber se um produto é favorito do usuário.
#[get("/favoritos/{produto_id}")]
pub async fn consultar_favorito(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    path: web::Path<i32>,
) -> HttpResponse {
    let produto_id = path.into_inner();
    let favorito = favoritos_service::eh_favorito(data.repositorio.as_ref(), usuario.usuario_id, produto_id).await;

    HttpResponse::Ok().json(GenericResponse::sucesso(
        "Estado do favorito.",
        EstadoFavorito { produto_id, favorito },
    ))
}

/// Rota para marcar/desmarcar um produto como favorito.
#[post("/favoritos/{produto_id}/alternar")]
pub async fn alternar_favorito(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let produto_id = path.into_inner();
    let favorito =
        favoritos_service::alternar_favorito(data.repositorio.as_ref(), usuario.usuario_id, produto_id).await?;

    let message = if favorito {
        "Produto adicionado aos favoritos."
    } else {
        "Produto removido dos favoritos."
    };
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(message, EstadoFavorito { produto_id, favorito })))
}
