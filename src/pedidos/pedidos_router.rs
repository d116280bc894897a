// src/pedidos/pedidos_router.rs

use actix_web::{get, post, web, HttpResponse};

use super::pedidos_service;
use crate::shared::erros::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::UsuarioAutenticado;
use crate::AppState;

/// Rota para finalizar o carrinho ativo como um pedido.
#[post("/pedidos")]
pub async fn finalizar_pedido(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
) -> Result<HttpResponse, ApiError> {
    let pedido = pedidos_service::criar_pedido(data.repositorio.as_ref(), usuario.usuario_id).await?;

    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        format!("Pedido {} criado com sucesso!", pedido.id),
        pedido,
    )))
}

/// Rota para o histórico de pedidos do usuário.
#[get("/pedidos")]
pub async fn listar_pedidos(data: web::Data<AppState>, usuario: UsuarioAutenticado) -> HttpResponse {
    let pedidos = pedidos_service::listar_pedidos(data.repositorio.as_ref(), usuario.usuario_id).await;

    HttpResponse::Ok().json(GenericResponse::sucesso("Pedidos do usuário.", pedidos))
}
