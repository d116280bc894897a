// src/carrinho/carrinho_router.rs

use actix_web::{get, post, web, HttpResponse};

use super::carrinho_service;
use super::carrinho_structs::{AlterarQuantidadeRequest, CarrinhoResponse, QuantidadeResponse};
use crate::shared::erros::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::UsuarioAutenticado;
use crate::AppState;

/// Rota para ver o carrinho ativo com os produtos e o valor total.
#[get("/carrinho")]
pub async fn ver_carrinho(data: web::Data<AppState>, usuario: UsuarioAutenticado) -> HttpResponse {
    let repo = data.repositorio.as_ref();
    let itens = carrinho_service::itens_com_produtos(repo, usuario.usuario_id).await;
    let total_itens = itens.iter().map(|i| i64::from(i.quantidade)).sum();
    let valor_total = carrinho_service::valor_total(&itens);

    HttpResponse::Ok().json(GenericResponse::sucesso(
        "Carrinho encontrado.",
        CarrinhoResponse {
            itens,
            total_itens,
            valor_total,
        },
    ))
}

/// Rota para o total de unidades no carrinho (o contador do ícone).
#[get("/carrinho/total")]
pub async fn total_do_carrinho(data: web::Data<AppState>, usuario: UsuarioAutenticado) -> HttpResponse {
    let total = carrinho_service::total_itens(data.repositorio.as_ref(), usuario.usuario_id).await;

    HttpResponse::Ok().json(GenericResponse::sucesso("Total de itens no carrinho.", total))
}

/// Rota para a quantidade de um produto no carrinho.
#[get("/carrinho/itens/{produto_id}")]
pub async fn quantidade_no_carrinho(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    path: web::Path<i32>,
) -> HttpResponse {
    let produto_id = path.into_inner();
    let repo = data.repositorio.as_ref();

    let quantidade = carrinho_service::quantidade_do_produto(repo, usuario.usuario_id, produto_id).await;
    let total_carrinho = carrinho_service::total_itens(repo, usuario.usuario_id).await;

    HttpResponse::Ok().json(GenericResponse::sucesso(
        "Quantidade do produto no carrinho.",
        QuantidadeResponse {
            produto_id,
            quantidade,
            total_carrinho,
        },
    ))
}

/// Rota para somar `delta` (positivo ou negativo) à quantidade de um produto.
///
/// Aumentos são barrados quando a quantidade atual já alcançou o estoque.
#[post("/carrinho/itens/{produto_id}")]
pub async fn alterar_item(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
    path: web::Path<i32>,
    req: web::Json<AlterarQuantidadeRequest>,
) -> Result<HttpResponse, ApiError> {
    let produto_id = path.into_inner();
    let delta = req.delta;
    let repo = data.repositorio.as_ref();

    if delta > 0 {
        let produto = repo
            .buscar_produto(produto_id)
            .await?
            .ok_or_else(|| ApiError::NaoEncontrado(format!("Produto com ID {} não encontrado.", produto_id)))?;
        let atual = carrinho_service::quantidade_do_produto(repo, usuario.usuario_id, produto_id)
            .await
            .unwrap_or(0);
        carrinho_service::conferir_estoque(produto.estoque, atual, delta)?;
    }

    let quantidade = carrinho_service::alterar_quantidade(repo, usuario.usuario_id, produto_id, delta).await?;
    let total_carrinho = carrinho_service::total_itens(repo, usuario.usuario_id).await;

    tracing::debug!(usuario_id = usuario.usuario_id, produto_id, delta, ?quantidade, "Carrinho alterado");

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Carrinho atualizado.",
        QuantidadeResponse {
            produto_id,
            quantidade,
            total_carrinho,
        },
    )))
}
